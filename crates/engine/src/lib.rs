//! Virtual window engine.
//!
//! Emulates a stateful container/window protocol toward remote clients
//! without a native server-side backing structure: windows own slot-bound
//! icons and a viewer set, inbound clicks are dispatched to handlers, and
//! a periodic scheduler pushes incremental visual updates to viewers.
//!
//! All outbound protocol actions and platform queries go through the
//! [`Bridge`], the single adapter seam; the engine itself never performs
//! I/O.

mod bridge;
mod engine;
mod icon;
mod window;

#[cfg(test)]
pub(crate) mod testutil;

pub use bridge::{ActionSink, Bridge, Platform};
pub use engine::{Engine, EngineConfig, WindowDef};
pub use icon::{HandlerError, Icon, IconId};
pub use window::{ClickCtx, RefreshMode, Window};

/// Errors produced while wiring the adapter boundary.
#[derive(Debug, thiserror::Error)]
pub enum BindError {
    #[error("{0} adapter already bound")]
    AlreadyBound(&'static str),
}
