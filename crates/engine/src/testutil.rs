//! Shared test fixtures: a recording action sink and a stub platform.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use virtmenu_protocol::{ViewerId, WindowAction};

use crate::bridge::{ActionSink, Bridge, Platform};

/// Action sink that records everything the engine emits.
pub(crate) struct RecordingSink {
    actions: Mutex<Vec<WindowAction>>,
}

impl RecordingSink {
    pub(crate) fn new() -> Self {
        Self {
            actions: Mutex::new(Vec::new()),
        }
    }

    /// Drains and returns the recorded actions.
    pub(crate) fn take(&self) -> Vec<WindowAction> {
        std::mem::take(&mut *self.actions.lock())
    }

    pub(crate) fn count(&self) -> usize {
        self.actions.lock().len()
    }
}

impl ActionSink for RecordingSink {
    fn emit(&self, action: WindowAction) {
        self.actions.lock().push(action);
    }
}

/// Platform stub: records messages/commands, grants all permissions
/// except explicitly denied nodes, resolves names from a fixed map.
pub(crate) struct StubPlatform {
    pub(crate) messages: Mutex<Vec<(ViewerId, String)>>,
    pub(crate) commands: Mutex<Vec<String>>,
    pub(crate) denied: Mutex<Vec<String>>,
    pub(crate) names: Mutex<HashMap<String, ViewerId>>,
}

impl StubPlatform {
    pub(crate) fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            commands: Mutex::new(Vec::new()),
            denied: Mutex::new(Vec::new()),
            names: Mutex::new(HashMap::new()),
        }
    }
}

impl Platform for StubPlatform {
    fn has_permission(&self, _viewer: ViewerId, node: &str) -> bool {
        !self.denied.lock().iter().any(|n| n == node)
    }

    fn send_message(&self, viewer: ViewerId, message: &str) {
        self.messages.lock().push((viewer, message.to_string()));
    }

    fn send_actionbar(&self, _viewer: ViewerId, _text: &str) {}

    fn send_title_timed(
        &self,
        _viewer: ViewerId,
        _title: &str,
        _subtitle: &str,
        _fade_in: i32,
        _stay: i32,
        _fade_out: i32,
    ) {
    }

    fn run_command(&self, _viewer: ViewerId, command: &str) {
        self.commands.lock().push(command.to_string());
    }

    fn run_command_elevated(&self, _viewer: ViewerId, command: &str) {
        self.commands.lock().push(format!("elevated:{command}"));
    }

    fn run_console_command(&self, command: &str) {
        self.commands.lock().push(format!("console:{command}"));
    }

    fn viewer_name(&self, viewer: ViewerId) -> Option<String> {
        self.names
            .lock()
            .iter()
            .find(|(_, id)| **id == viewer)
            .map(|(name, _)| name.clone())
    }

    fn find_viewer(&self, name: &str) -> Option<ViewerId> {
        self.names.lock().get(name).copied()
    }
}

/// A bridge bound to fresh fixtures.
pub(crate) fn bound_bridge() -> (Arc<Bridge>, Arc<RecordingSink>, Arc<StubPlatform>) {
    let sink = Arc::new(RecordingSink::new());
    let platform = Arc::new(StubPlatform::new());
    let bridge = Bridge::with(sink.clone(), platform.clone());
    (bridge, sink, platform)
}
