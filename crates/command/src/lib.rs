//! Declarative command dispatch for virtmenu.
//!
//! A statically built table maps command name to required permission,
//! player-only flag, ordered argument kinds and a handler closure;
//! argument kinds resolve through a fixed parser table. All user-facing
//! failures are delivered as messages to the acting party — nothing is
//! raised past the dispatch boundary.

mod args;
mod registry;
mod table;

pub use args::{ArgError, ArgKind, ArgReason, ArgValue};
pub use registry::MenuRegistry;
pub use table::{
    CommandError, CommandSpec, CommandTable, EngineResolver, Invocation, Resolver, Sender,
};
