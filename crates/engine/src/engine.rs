//! The engine: window/session registries and the refresh scheduler.
//!
//! Keeps the one-window-per-viewer invariant, routes inbound clicks, and
//! drives periodic refresh from a single tick loop. Windows are created
//! when first opened and pruned as soon as their viewer set empties, so
//! the scheduler never iterates a dead window.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use virtmenu_protocol::{
    ClickType, ViewerId, WindowClick, WindowId, WindowLayout, WindowShape, classify,
};

use crate::bridge::Bridge;
use crate::icon::{HandlerError, HandlerFn, Icon};
use crate::window::{ClickCtx, RefreshMode, Window};

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Duration of one scheduler tick.
    pub tick: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(50),
        }
    }
}

/// Static description a window is instantiated from: title, layout,
/// refresh policy, icon placement and window-level bindings.
#[derive(Clone)]
pub struct WindowDef {
    title: String,
    layout: WindowLayout,
    refresh: i64,
    mode: RefreshMode,
    icons: Vec<(usize, Icon)>,
    bindings: Vec<(ClickType, HandlerFn)>,
}

impl WindowDef {
    pub fn new(title: impl Into<String>, layout: WindowLayout) -> Self {
        Self {
            title: title.into(),
            layout,
            refresh: 0,
            mode: RefreshMode::Slot,
            icons: Vec::new(),
            bindings: Vec::new(),
        }
    }

    /// Refresh interval in ticks; `<= 0` (the default) disables scheduled
    /// refresh.
    pub fn refresh(mut self, ticks: i64) -> Self {
        self.refresh = ticks;
        self
    }

    pub fn mode(mut self, mode: RefreshMode) -> Self {
        self.mode = mode;
        self
    }

    /// Places an icon. Slots outside the layout are dropped at
    /// instantiation.
    pub fn icon(mut self, slot: usize, icon: Icon) -> Self {
        self.icons.push((slot, icon));
        self
    }

    /// Adds a window-level binding for a click type.
    pub fn bind(
        mut self,
        click: ClickType,
        run: impl Fn(&mut ClickCtx<'_>) -> Result<(), HandlerError> + Send + Sync + 'static,
    ) -> Self {
        self.bindings.push((click, Arc::new(run)));
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn layout(&self) -> WindowLayout {
        self.layout
    }

    /// Builds a definition from a persisted shape, resolving each slot's
    /// icon key through `resolve`. Unknown keys leave the slot vacant.
    pub fn from_shape(shape: &WindowShape, resolve: impl Fn(&str) -> Option<Icon>) -> Self {
        let mut def = Self::new(shape.title.clone(), shape.layout);
        for (slot, key) in shape.slots.iter().enumerate() {
            let Some(key) = key else { continue };
            match resolve(key) {
                Some(icon) => def = def.icon(slot, icon),
                None => tracing::warn!(slot, key = %key, "no icon registered for shape key"),
            }
        }
        def
    }

    /// The persistable static shape of this definition.
    pub fn shape(&self) -> WindowShape {
        let mut slots: Vec<Option<String>> = vec![None; self.layout.slot_count()];
        for (slot, icon) in &self.icons {
            if let Some(entry) = slots.get_mut(*slot) {
                *entry = Some(icon.key().to_string());
            }
        }
        WindowShape::new(self.title.clone(), self.layout, slots)
    }
}

impl std::fmt::Debug for WindowDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowDef")
            .field("title", &self.title)
            .field("layout", &self.layout)
            .field("refresh", &self.refresh)
            .field("icons", &self.icons.len())
            .finish()
    }
}

/// The virtual window engine.
///
/// All entry points are synchronous and may be called from any task or
/// thread; [`run`](Self::run) drives the refresh scheduler until
/// [`shutdown`](Self::shutdown).
pub struct Engine {
    bridge: Arc<Bridge>,
    config: EngineConfig,
    windows: Mutex<HashMap<WindowId, Arc<Window>>>,
    sessions: Mutex<HashMap<ViewerId, WindowId>>,
    next_window: AtomicU32,
    cancel: CancellationToken,
}

impl Engine {
    /// Creates an engine around an adapter bridge.
    ///
    /// Both bridge roles must be bound before the first window is opened;
    /// opening against an unbound bridge panics.
    pub fn new(config: EngineConfig, bridge: Arc<Bridge>) -> Arc<Self> {
        Arc::new(Self {
            bridge,
            config,
            windows: Mutex::new(HashMap::new()),
            sessions: Mutex::new(HashMap::new()),
            next_window: AtomicU32::new(1),
            cancel: CancellationToken::new(),
        })
    }

    pub fn bridge(&self) -> &Arc<Bridge> {
        &self.bridge
    }

    /// Instantiates a window from a definition and opens it for `viewer`.
    pub fn open_window(&self, def: &WindowDef, viewer: ViewerId) -> Arc<Window> {
        let id = WindowId(self.next_window.fetch_add(1, Ordering::Relaxed));
        let mut slots: Vec<Option<Icon>> = Vec::new();
        slots.resize_with(def.layout.slot_count(), || None);
        for (slot, icon) in &def.icons {
            match slots.get_mut(*slot) {
                Some(entry) => *entry = Some(icon.clone()),
                None => {
                    tracing::warn!(window = %id, slot, "icon slot outside layout, dropped");
                }
            }
        }
        let bindings = def
            .bindings
            .iter()
            .map(|(click, run)| (*click, run.clone()))
            .collect();
        let window = Arc::new(Window::new(
            id,
            def.title.clone(),
            def.layout,
            def.refresh,
            def.mode,
            self.bridge.clone(),
            slots,
            bindings,
        ));
        tracing::debug!(window = %id, title = %def.title, "window created");
        self.open_for(&window, viewer);
        window
    }

    /// Opens an existing window for a viewer, tearing down the viewer's
    /// previous session first (a viewer observes at most one window).
    pub fn open_for(&self, window: &Arc<Window>, viewer: ViewerId) {
        let mut sessions = self.sessions.lock();
        if let Some(old_id) = sessions.get(&viewer).copied() {
            if old_id != window.id() {
                let old = self.windows.lock().get(&old_id).cloned();
                if let Some(old) = old {
                    old.close(viewer);
                    self.prune_if_empty(&old);
                }
            }
        }
        window.open(viewer);
        sessions.insert(viewer, window.id());
        // The scheduler prunes windows whose viewer set emptied; listing
        // after open keeps the now-occupied window on the schedule.
        self.windows
            .lock()
            .entry(window.id())
            .or_insert_with(|| window.clone());
    }

    /// Closes whatever window the viewer currently observes. No-op for
    /// viewers with no session.
    pub fn close_for(&self, viewer: ViewerId) {
        let mut sessions = self.sessions.lock();
        let Some(id) = sessions.remove(&viewer) else {
            return;
        };
        let window = self.windows.lock().get(&id).cloned();
        if let Some(window) = window {
            window.close(viewer);
            self.prune_if_empty(&window);
        }
    }

    /// Handles an inbound interaction record.
    ///
    /// Clicks from viewers with no session, or against a window the
    /// viewer is no longer looking at, are dropped silently.
    pub fn handle_click(&self, click: WindowClick) {
        let window = {
            let sessions = self.sessions.lock();
            match sessions.get(&click.viewer) {
                Some(id) if *id == click.window => self.windows.lock().get(id).cloned(),
                Some(_) => {
                    tracing::debug!(viewer = %click.viewer, window = %click.window, "stale window id, click dropped");
                    None
                }
                None => None,
            }
        };
        let Some(window) = window else { return };

        let click_type = classify(click.mode, click.button, click.raw_slot);
        let outcome = window.click(click.viewer, click.raw_slot, click_type);
        if outcome.close_requested {
            self.close_for(click.viewer);
        }
    }

    /// The window a viewer currently observes.
    pub fn session_of(&self, viewer: ViewerId) -> Option<WindowId> {
        self.sessions.lock().get(&viewer).copied()
    }

    pub fn window(&self, id: WindowId) -> Option<Arc<Window>> {
        self.windows.lock().get(&id).cloned()
    }

    /// Number of live windows.
    pub fn window_count(&self) -> usize {
        self.windows.lock().len()
    }

    /// Runs the refresh scheduler until cancellation.
    pub async fn run(&self) {
        let mut interval = tokio::time::interval(self.config.tick);
        let mut tick: u64 = 0;
        tracing::info!(tick = ?self.config.tick, "refresh scheduler started");
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    tracing::info!("refresh scheduler stopped");
                    break;
                }
                _ = interval.tick() => {
                    let windows: Vec<Arc<Window>> = {
                        let mut map = self.windows.lock();
                        map.retain(|_, w| !w.is_empty());
                        map.values().cloned().collect()
                    };
                    for window in windows {
                        window.refresh_tick(tick);
                    }
                    tick = tick.wrapping_add(1);
                }
            }
        }
    }

    /// Stops the refresh scheduler.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    fn prune_if_empty(&self, window: &Arc<Window>) {
        if window.is_empty() {
            self.windows.lock().remove(&window.id());
            tracing::debug!(window = %window.id(), "window destroyed");
        }
    }
}
