//! Windows: the virtual menus viewers look at.
//!
//! A window owns a fixed-length array of optional icons, the set of
//! current viewers with their per-viewer view caches, and a table of
//! window-level click bindings. Every operation takes the window's mutex
//! for its full duration — that mutex is the exclusion scope that keeps
//! the click path and the refresh path from interleaving.

use std::collections::HashMap;

use parking_lot::Mutex;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use virtmenu_protocol::{
    ClickType, SlotPayload, ViewerId, WindowAction, WindowId, WindowLayout, WindowShape,
};

use crate::bridge::Bridge;
use crate::icon::{HandlerError, HandlerFn, Icon, IconId};

/// How a scheduled refresh pushes updates to viewers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshMode {
    /// One `SetSlot` per slot whose rendered payload changed.
    #[default]
    Slot,
    /// One `WindowItems` snapshot covering all slots.
    Window,
}

/// Per-viewer session: the cache of last-rendered payloads, keyed by
/// icon identity. Exists exactly as long as the viewer is registered.
#[derive(Default)]
pub(crate) struct ViewerSession {
    cache: HashMap<IconId, SlotPayload>,
}

struct WindowState {
    icons: Vec<Option<Icon>>,
    viewers: HashMap<ViewerId, ViewerSession>,
    bindings: HashMap<ClickType, HandlerFn>,
}

/// A virtual window rendered to remote viewers.
pub struct Window {
    id: WindowId,
    title: String,
    layout: WindowLayout,
    refresh: i64,
    mode: RefreshMode,
    bridge: Arc<Bridge>,
    state: Mutex<WindowState>,
}

/// What a click dispatch asked the engine to do afterwards.
#[derive(Debug, Default)]
pub(crate) struct ClickOutcome {
    pub(crate) close_requested: bool,
}

impl Window {
    pub(crate) fn new(
        id: WindowId,
        title: String,
        layout: WindowLayout,
        refresh: i64,
        mode: RefreshMode,
        bridge: Arc<Bridge>,
        mut icons: Vec<Option<Icon>>,
        bindings: HashMap<ClickType, HandlerFn>,
    ) -> Self {
        icons.resize_with(layout.slot_count(), || None);
        Self {
            id,
            title,
            layout,
            refresh,
            mode,
            bridge,
            state: Mutex::new(WindowState {
                icons,
                viewers: HashMap::new(),
                bindings,
            }),
        }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn layout(&self) -> WindowLayout {
        self.layout
    }

    /// Refresh interval in ticks; `<= 0` disables scheduled refresh.
    pub fn refresh_interval(&self) -> i64 {
        self.refresh
    }

    pub fn refresh_mode(&self) -> RefreshMode {
        self.mode
    }

    pub fn viewers(&self) -> Vec<ViewerId> {
        self.state.lock().viewers.keys().copied().collect()
    }

    pub fn contains(&self, viewer: ViewerId) -> bool {
        self.state.lock().viewers.contains_key(&viewer)
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().viewers.is_empty()
    }

    /// The icon occupying `slot`, if any. No side effects.
    pub fn dispatch(&self, slot: i32) -> Option<Icon> {
        let st = self.state.lock();
        usize::try_from(slot)
            .ok()
            .and_then(|idx| st.icons.get(idx))
            .and_then(|slot| slot.clone())
    }

    /// Registers a viewer and sends the opening action pair.
    ///
    /// Returns `false` (and does nothing) if the viewer is already
    /// registered to this window.
    pub(crate) fn open(&self, viewer: ViewerId) -> bool {
        let mut st = self.state.lock();
        if st.viewers.contains_key(&viewer) {
            return false;
        }
        let WindowState { icons, viewers, .. } = &mut *st;
        let mut session = ViewerSession::default();
        let payloads: Vec<SlotPayload> = icons
            .iter()
            .map(|slot| match slot {
                Some(icon) => {
                    let payload = icon.view(viewer);
                    session.cache.insert(icon.id(), payload.clone());
                    payload
                }
                None => SlotPayload::empty(),
            })
            .collect();
        viewers.insert(viewer, session);

        self.bridge.emit(WindowAction::OpenWindow {
            viewer,
            window: self.id,
            layout: self.layout,
            title: self.title.clone(),
        });
        self.bridge.emit(WindowAction::WindowItems {
            viewer,
            window: self.id,
            payloads,
        });
        tracing::debug!(window = %self.id, viewer = %viewer, "viewer opened");
        true
    }

    /// Removes a viewer and its session. Idempotent.
    pub(crate) fn close(&self, viewer: ViewerId) -> bool {
        let mut st = self.state.lock();
        if st.viewers.remove(&viewer).is_none() {
            return false;
        }
        self.bridge.emit(WindowAction::CloseWindow {
            viewer,
            window: self.id,
        });
        tracing::debug!(window = %self.id, viewer = %viewer, "viewer closed");
        true
    }

    /// Dispatches a classified click.
    ///
    /// Out-of-range and vacant slots are silent no-ops. For an occupied
    /// slot, the window-level binding for the click type fires first,
    /// then the icon's action if the type is in its accepted set. Both
    /// run inside the window lock via [`ClickCtx`]; icon mutations are
    /// flushed as slot updates before the lock is released.
    pub(crate) fn click(&self, viewer: ViewerId, slot: i32, click: ClickType) -> ClickOutcome {
        let Ok(idx) = usize::try_from(slot) else {
            return ClickOutcome::default();
        };
        let mut st = self.state.lock();
        if idx >= st.icons.len() || !st.viewers.contains_key(&viewer) {
            return ClickOutcome::default();
        }
        if st.icons[idx].is_none() {
            return ClickOutcome::default();
        }

        let (changed, removed, close) = {
            let WindowState {
                icons, bindings, ..
            } = &mut *st;
            let bound = bindings.get(&click).cloned();
            let icon_run = icons[idx].as_ref().and_then(|i| i.handler_for(click));
            if bound.is_none() && icon_run.is_none() {
                return ClickOutcome::default();
            }

            let mut ctx = ClickCtx {
                viewer,
                window: self.id,
                slot: idx,
                click,
                icons,
                bridge: &self.bridge,
                changed: Vec::new(),
                removed: Vec::new(),
                close: false,
            };
            if let Some(run) = bound {
                invoke_handler(&run, &mut ctx, "window binding");
            }
            if let Some(run) = icon_run {
                invoke_handler(&run, &mut ctx, "icon action");
            }
            (ctx.changed, ctx.removed, ctx.close)
        };

        let WindowState { icons, viewers, .. } = &mut *st;
        for session in viewers.values_mut() {
            for id in &removed {
                session.cache.remove(id);
            }
        }
        let mut changed = changed;
        changed.sort_unstable();
        changed.dedup();
        for slot in changed {
            push_slot(icons, viewers, &self.bridge, self.id, slot);
        }
        ClickOutcome {
            close_requested: close,
        }
    }

    /// Replaces the icon at `slot` and pushes the update to all viewers.
    /// Out-of-range slots are ignored.
    pub fn set_icon(&self, slot: usize, icon: Icon) {
        let mut st = self.state.lock();
        let WindowState { icons, viewers, .. } = &mut *st;
        let Some(entry) = icons.get_mut(slot) else {
            return;
        };
        let old_id = entry.as_ref().map(Icon::id);
        *entry = Some(icon);
        if let Some(old_id) = old_id {
            for session in viewers.values_mut() {
                session.cache.remove(&old_id);
            }
        }
        push_slot(icons, viewers, &self.bridge, self.id, slot);
    }

    /// Vacates `slot` and pushes the update to all viewers.
    pub fn clear_icon(&self, slot: usize) {
        let mut st = self.state.lock();
        let WindowState { icons, viewers, .. } = &mut *st;
        let Some(entry) = icons.get_mut(slot) else {
            return;
        };
        let Some(old) = entry.take() else {
            return;
        };
        for session in viewers.values_mut() {
            session.cache.remove(&old.id());
        }
        push_slot(icons, viewers, &self.bridge, self.id, slot);
    }

    /// Adds a window-level binding fired for every occupied-slot click of
    /// the given type.
    pub fn bind(
        &self,
        click: ClickType,
        run: impl Fn(&mut ClickCtx<'_>) -> Result<(), HandlerError> + Send + Sync + 'static,
    ) {
        self.state.lock().bindings.insert(click, Arc::new(run));
    }

    /// One scheduler tick. Fires iff the interval is positive and `tick`
    /// is a multiple of it; then pushes updates per the refresh mode.
    pub fn refresh_tick(&self, tick: u64) {
        if self.refresh <= 0 {
            return;
        }
        if tick % self.refresh as u64 != 0 {
            return;
        }
        let mut st = self.state.lock();
        let WindowState { icons, viewers, .. } = &mut *st;
        match self.mode {
            RefreshMode::Window => {
                for (viewer, session) in viewers.iter_mut() {
                    let mut payloads = Vec::with_capacity(icons.len());
                    for slot in icons.iter() {
                        let payload = match slot {
                            Some(icon) => {
                                let payload = icon.view(*viewer);
                                session.cache.insert(icon.id(), payload.clone());
                                payload
                            }
                            None => SlotPayload::empty(),
                        };
                        payloads.push(payload);
                    }
                    self.bridge.emit(WindowAction::WindowItems {
                        viewer: *viewer,
                        window: self.id,
                        payloads,
                    });
                }
            }
            RefreshMode::Slot => {
                for (viewer, session) in viewers.iter_mut() {
                    for (idx, slot) in icons.iter().enumerate() {
                        let Some(icon) = slot else { continue };
                        let payload = icon.view(*viewer);
                        if session.cache.get(&icon.id()) == Some(&payload) {
                            continue;
                        }
                        session.cache.insert(icon.id(), payload.clone());
                        self.bridge.emit(WindowAction::SetSlot {
                            viewer: *viewer,
                            window: self.id,
                            slot: idx as u16,
                            payload,
                        });
                    }
                }
            }
        }
    }

    /// The window's persistable static shape.
    pub fn shape(&self) -> WindowShape {
        let st = self.state.lock();
        WindowShape::new(
            self.title.clone(),
            self.layout,
            st.icons
                .iter()
                .map(|slot| slot.as_ref().map(|i| i.key().to_string()))
                .collect(),
        )
    }
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("layout", &self.layout)
            .field("refresh", &self.refresh)
            .finish()
    }
}

/// Mutation surface handed to click handlers.
///
/// Lives inside the window's exclusion scope, so handlers may mutate any
/// icon without racing the refresh pass. Platform calls pass straight
/// through; slot changes are flushed when the handler returns.
pub struct ClickCtx<'a> {
    viewer: ViewerId,
    window: WindowId,
    slot: usize,
    click: ClickType,
    icons: &'a mut Vec<Option<Icon>>,
    bridge: &'a Bridge,
    changed: Vec<usize>,
    removed: Vec<IconId>,
    close: bool,
}

impl ClickCtx<'_> {
    /// The viewer who clicked.
    pub fn viewer(&self) -> ViewerId {
        self.viewer
    }

    pub fn window(&self) -> WindowId {
        self.window
    }

    /// The clicked slot.
    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn click_type(&self) -> ClickType {
        self.click
    }

    /// Identity of the icon at `slot`, if occupied.
    pub fn icon_id(&self, slot: usize) -> Option<IconId> {
        self.icons.get(slot).and_then(|s| s.as_ref()).map(Icon::id)
    }

    /// Replaces the icon at `slot`; the update is pushed after the
    /// handler returns. Out-of-range slots are ignored.
    pub fn set_icon(&mut self, slot: usize, icon: Icon) {
        let Some(entry) = self.icons.get_mut(slot) else {
            return;
        };
        if let Some(old) = entry.as_ref() {
            self.removed.push(old.id());
        }
        *entry = Some(icon);
        self.changed.push(slot);
    }

    /// Vacates `slot`; the update is pushed after the handler returns.
    pub fn clear_icon(&mut self, slot: usize) {
        let Some(entry) = self.icons.get_mut(slot) else {
            return;
        };
        if let Some(old) = entry.take() {
            self.removed.push(old.id());
            self.changed.push(slot);
        }
    }

    /// Marks `slot` dirty so its payload is re-rendered and pushed even
    /// though the icon itself was not replaced.
    pub fn touch(&mut self, slot: usize) {
        if slot < self.icons.len() {
            self.changed.push(slot);
        }
    }

    /// Requests that the clicking viewer's window be closed once dispatch
    /// completes.
    pub fn close_window(&mut self) {
        self.close = true;
    }

    pub fn message(&self, text: &str) {
        self.bridge.platform().send_message(self.viewer, text);
    }

    pub fn actionbar(&self, text: &str) {
        self.bridge.platform().send_actionbar(self.viewer, text);
    }

    pub fn title(&self, text: &str) {
        self.bridge.platform().send_title(self.viewer, text);
    }

    pub fn has_permission(&self, node: &str) -> bool {
        self.bridge.platform().has_permission(self.viewer, node)
    }

    pub fn run_command(&self, command: &str) {
        self.bridge.platform().run_command(self.viewer, command);
    }

    pub fn run_command_elevated(&self, command: &str) {
        self.bridge
            .platform()
            .run_command_elevated(self.viewer, command);
    }

    pub fn run_console_command(&self, command: &str) {
        self.bridge.platform().run_console_command(command);
    }
}

/// Runs a handler with fault isolation: an `Err` or a panic is logged
/// with dispatch context and swallowed.
fn invoke_handler(run: &HandlerFn, ctx: &mut ClickCtx<'_>, what: &str) {
    let window = ctx.window;
    let slot = ctx.slot;
    let click = ctx.click;
    match panic::catch_unwind(AssertUnwindSafe(|| run(ctx))) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            tracing::error!(window = %window, slot, click = ?click, "{what} failed: {e}");
        }
        Err(_) => {
            tracing::error!(window = %window, slot, click = ?click, "{what} panicked");
        }
    }
}

/// Re-renders `slot` for every viewer, refreshes their caches, and emits
/// one `SetSlot` each.
fn push_slot(
    icons: &[Option<Icon>],
    viewers: &mut HashMap<ViewerId, ViewerSession>,
    bridge: &Bridge,
    window: WindowId,
    slot: usize,
) {
    for (viewer, session) in viewers.iter_mut() {
        let payload = match &icons[slot] {
            Some(icon) => {
                let payload = icon.view(*viewer);
                session.cache.insert(icon.id(), payload.clone());
                payload
            }
            None => SlotPayload::empty(),
        };
        bridge.emit(WindowAction::SetSlot {
            viewer: *viewer,
            window,
            slot: slot as u16,
            payload,
        });
    }
}
