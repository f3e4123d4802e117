//! Wire protocol types for the virtmenu window engine.
//!
//! Defines the vocabulary shared between the engine core and whatever
//! transport adapter feeds it: click classification, window layouts,
//! identifiers, the outbound action stream, the inbound interaction
//! record, and the persistable static shape of a window.
//!
//! Nothing in this crate does I/O; it is pure data plus the click
//! decision table.

pub mod action;
pub mod click;
pub mod shape;
pub mod types;

pub use action::{SlotPayload, WindowAction, WindowClick};
pub use click::{ClickMode, ClickType, ClickTypeSet, OUTSIDE_WINDOW_SLOT, classify};
pub use shape::WindowShape;
pub use types::{ViewerId, WindowId, WindowLayout};
