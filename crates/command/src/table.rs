//! The declarative command table.
//!
//! Commands are registered statically: name, usage string, required
//! permission, player-only flag, ordered argument kinds, handler closure.
//! Dispatch delivers every user-facing failure as a message to the acting
//! party and never raises past this boundary; handler faults are logged.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use virtmenu_engine::{Bridge, HandlerError};
use virtmenu_protocol::ViewerId;

use crate::args::{ArgKind, ArgValue};
use crate::registry::MenuRegistry;

/// The acting principal of a command invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    Viewer(ViewerId),
    Console,
}

impl Sender {
    pub fn is_console(&self) -> bool {
        matches!(self, Sender::Console)
    }

    pub fn viewer(&self) -> Option<ViewerId> {
        match self {
            Sender::Viewer(v) => Some(*v),
            Sender::Console => None,
        }
    }
}

/// Name and permission resolution plus message delivery for dispatch.
pub trait Resolver: Send + Sync {
    fn find_viewer(&self, name: &str) -> Option<ViewerId>;

    fn has_menu(&self, name: &str) -> bool;

    fn message(&self, sender: &Sender, text: &str);

    fn sender_has_permission(&self, sender: &Sender, node: &str) -> bool;
}

/// [`Resolver`] backed by the engine's bridge and a menu registry.
pub struct EngineResolver {
    bridge: Arc<Bridge>,
    menus: Arc<MenuRegistry>,
}

impl EngineResolver {
    pub fn new(bridge: Arc<Bridge>, menus: Arc<MenuRegistry>) -> Self {
        Self { bridge, menus }
    }
}

impl Resolver for EngineResolver {
    fn find_viewer(&self, name: &str) -> Option<ViewerId> {
        self.bridge.platform().find_viewer(name)
    }

    fn has_menu(&self, name: &str) -> bool {
        self.menus.contains(name)
    }

    fn message(&self, sender: &Sender, text: &str) {
        match sender {
            Sender::Viewer(v) => self.bridge.platform().send_message(*v, text),
            Sender::Console => tracing::info!("{text}"),
        }
    }

    fn sender_has_permission(&self, sender: &Sender, node: &str) -> bool {
        match sender {
            Sender::Viewer(v) => self.bridge.platform().has_permission(*v, node),
            Sender::Console => true,
        }
    }
}

/// A command invocation handed to the handler: parsing and the
/// permission/eligibility gates have already passed.
pub struct Invocation<'a> {
    pub sender: Sender,
    pub args: &'a [ArgValue],
}

type CommandHandler = Arc<dyn Fn(&Invocation<'_>) -> Result<(), HandlerError> + Send + Sync>;

/// One registered command.
pub struct CommandSpec {
    name: String,
    usage: String,
    permission: Option<String>,
    player_only: bool,
    args: Vec<ArgKind>,
    handler: CommandHandler,
}

impl CommandSpec {
    pub fn new(
        name: impl Into<String>,
        handler: impl Fn(&Invocation<'_>) -> Result<(), HandlerError> + Send + Sync + 'static,
    ) -> Self {
        let name = name.into();
        Self {
            usage: format!("/{name}"),
            name,
            permission: None,
            player_only: false,
            args: Vec::new(),
            handler: Arc::new(handler),
        }
    }

    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    pub fn permission(mut self, node: impl Into<String>) -> Self {
        self.permission = Some(node.into());
        self
    }

    pub fn player_only(mut self) -> Self {
        self.player_only = true;
        self
    }

    /// Appends an argument position.
    pub fn arg(mut self, kind: ArgKind) -> Self {
        self.args.push(kind);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("permission", &self.permission)
            .field("player_only", &self.player_only)
            .field("args", &self.args)
            .finish()
    }
}

/// Errors produced while building the command table.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("command '{0}' already registered")]
    Duplicate(String),
}

/// Statically built name-to-command table.
#[derive(Default)]
pub struct CommandTable {
    commands: HashMap<String, CommandSpec>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a command; duplicate names are rejected.
    pub fn register(&mut self, spec: CommandSpec) -> Result<(), CommandError> {
        if self.commands.contains_key(spec.name()) {
            return Err(CommandError::Duplicate(spec.name().to_string()));
        }
        tracing::debug!(command = %spec.name(), "command registered");
        self.commands.insert(spec.name().to_string(), spec);
        Ok(())
    }

    /// Registered command names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Dispatches an invocation.
    ///
    /// Every failure short of a handler fault turns into a message to the
    /// sender; nothing is raised to the caller. Returns `true` when the
    /// handler actually ran.
    pub fn dispatch(
        &self,
        resolver: &dyn Resolver,
        sender: Sender,
        name: &str,
        raw_args: &[&str],
    ) -> bool {
        let Some(spec) = self.commands.get(name) else {
            resolver.message(&sender, &format!("Unknown command '{name}'."));
            return false;
        };

        if spec.player_only && sender.is_console() {
            resolver.message(&sender, "Only a player can run this command.");
            return false;
        }

        if let Some(node) = &spec.permission {
            if !resolver.sender_has_permission(&sender, node) {
                resolver.message(&sender, "You do not have permission to run this command.");
                return false;
            }
        }

        if raw_args.len() != spec.args.len() {
            resolver.message(&sender, &format!("Usage: {}", spec.usage));
            return false;
        }

        let mut args = Vec::with_capacity(spec.args.len());
        for (index, (kind, raw)) in spec.args.iter().zip(raw_args).enumerate() {
            match kind.parse(index, raw, resolver) {
                Ok(value) => args.push(value),
                Err(e) => {
                    resolver.message(&sender, &e.to_string());
                    return false;
                }
            }
        }

        let invocation = Invocation {
            sender,
            args: &args,
        };
        match panic::catch_unwind(AssertUnwindSafe(|| (spec.handler)(&invocation))) {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                tracing::error!(command = %spec.name, "command handler failed: {e}");
                false
            }
            Err(_) => {
                tracing::error!(command = %spec.name, "command handler panicked");
                false
            }
        }
    }
}
