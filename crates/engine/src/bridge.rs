//! The adapter boundary.
//!
//! Two roles, each bound exactly once for the life of the engine: the
//! [`ActionSink`] carries outbound protocol actions, the [`Platform`]
//! answers queries (permissions, messaging, command execution). Both must
//! be bound before any window is opened; using an unbound role is a
//! programming error and panics.

use std::sync::{Arc, OnceLock};

use virtmenu_protocol::{ViewerId, WindowAction};

use crate::BindError;

/// Outbound protocol action emitter.
///
/// Implementations map the logical window identifier to the transport's
/// identifier space and must not block: the engine emits fire-and-forget,
/// possibly while holding a window lock.
pub trait ActionSink: Send + Sync + 'static {
    fn emit(&self, action: WindowAction);
}

/// Platform query service: pure pass-through, nothing is cached.
pub trait Platform: Send + Sync + 'static {
    fn has_permission(&self, viewer: ViewerId, node: &str) -> bool;

    fn send_message(&self, viewer: ViewerId, message: &str);

    fn send_actionbar(&self, viewer: ViewerId, text: &str);

    fn send_title(&self, viewer: ViewerId, title: &str) {
        self.send_title_timed(viewer, title, "", 10, 70, 20);
    }

    fn send_title_timed(
        &self,
        viewer: ViewerId,
        title: &str,
        subtitle: &str,
        fade_in: i32,
        stay: i32,
        fade_out: i32,
    );

    /// Executes a command as the viewer.
    fn run_command(&self, viewer: ViewerId, command: &str);

    /// Executes a command as the viewer with elevated rights.
    fn run_command_elevated(&self, viewer: ViewerId, command: &str);

    /// Executes a command as the non-interactive console principal.
    fn run_console_command(&self, command: &str);

    /// Display name of a viewer, if the platform still knows it.
    fn viewer_name(&self, viewer: ViewerId) -> Option<String>;

    /// Resolves a viewer by exact name.
    fn find_viewer(&self, name: &str) -> Option<ViewerId>;
}

/// The engine's adapter seam: one set-once cell per role.
///
/// There is no global registry; the engine owns exactly one `Bridge`,
/// injected at construction. Binding a role twice is rejected with
/// [`BindError::AlreadyBound`].
#[derive(Default)]
pub struct Bridge {
    actions: OnceLock<Arc<dyn ActionSink>>,
    platform: OnceLock<Arc<dyn Platform>>,
}

impl Bridge {
    /// An unbound bridge; roles are bound later in either order.
    pub fn new() -> Self {
        Self::default()
    }

    /// A fully bound bridge, for construction-time injection.
    pub fn with(actions: Arc<dyn ActionSink>, platform: Arc<dyn Platform>) -> Arc<Self> {
        let bridge = Self::new();
        // Fresh cells cannot already be set.
        let _ = bridge.actions.set(actions);
        let _ = bridge.platform.set(platform);
        Arc::new(bridge)
    }

    pub fn bind_actions(&self, sink: Arc<dyn ActionSink>) -> Result<(), BindError> {
        self.actions
            .set(sink)
            .map_err(|_| BindError::AlreadyBound("action sink"))?;
        tracing::info!("action sink bound");
        Ok(())
    }

    pub fn bind_platform(&self, platform: Arc<dyn Platform>) -> Result<(), BindError> {
        self.platform
            .set(platform)
            .map_err(|_| BindError::AlreadyBound("platform"))?;
        tracing::info!("platform bound");
        Ok(())
    }

    /// Whether both roles are bound.
    pub fn is_bound(&self) -> bool {
        self.actions.get().is_some() && self.platform.get().is_some()
    }

    /// The bound action sink.
    ///
    /// # Panics
    /// If called before [`bind_actions`](Self::bind_actions) — windows
    /// must not be opened against an unbound bridge.
    pub fn actions(&self) -> &dyn ActionSink {
        self.actions
            .get()
            .map(Arc::as_ref)
            .expect("action sink used before binding")
    }

    /// The bound platform.
    ///
    /// # Panics
    /// If called before [`bind_platform`](Self::bind_platform).
    pub fn platform(&self) -> &dyn Platform {
        self.platform
            .get()
            .map(Arc::as_ref)
            .expect("platform used before binding")
    }

    pub(crate) fn emit(&self, action: WindowAction) {
        self.actions().emit(action);
    }
}

impl std::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("actions", &self.actions.get().is_some())
            .field("platform", &self.platform.get().is_some())
            .finish()
    }
}
