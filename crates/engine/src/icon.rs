//! Slot-bound visual units.
//!
//! An [`Icon`] pairs a payload producer (re-evaluated per viewer on each
//! refresh) with an optional click action limited to a set of click
//! types. Identity is fixed at construction; the rendered payload is not.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use uuid::Uuid;
use virtmenu_protocol::{ClickType, ClickTypeSet, SlotPayload, ViewerId};

use crate::window::ClickCtx;

/// Error type click handlers may return; faults are logged at the
/// dispatch boundary, never propagated.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

pub(crate) type RenderFn = Arc<dyn Fn(ViewerId) -> SlotPayload + Send + Sync>;
pub(crate) type HandlerFn =
    Arc<dyn Fn(&mut ClickCtx<'_>) -> Result<(), HandlerError> + Send + Sync>;

/// Identity of an icon, stable across payload updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IconId(Uuid);

impl std::fmt::Display for IconId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

pub(crate) struct IconAction {
    pub(crate) types: ClickTypeSet,
    pub(crate) run: HandlerFn,
}

/// A stateful visual unit occupying one window slot.
#[derive(Clone)]
pub struct Icon {
    id: IconId,
    key: String,
    render: RenderFn,
    action: Option<Arc<IconAction>>,
}

impl Icon {
    /// Creates an icon whose payload is produced per viewer by `render`.
    ///
    /// `key` is the identity used when the owning window's shape is
    /// persisted.
    pub fn new(
        key: impl Into<String>,
        render: impl Fn(ViewerId) -> SlotPayload + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: IconId(Uuid::new_v4()),
            key: key.into(),
            render: Arc::new(render),
            action: None,
        }
    }

    /// Creates an icon with a payload that never changes.
    pub fn fixed(key: impl Into<String>, payload: SlotPayload) -> Self {
        Self::new(key, move |_| payload.clone())
    }

    /// Attaches a click action fired only for the given click types.
    pub fn on_click(
        mut self,
        types: ClickTypeSet,
        run: impl Fn(&mut ClickCtx<'_>) -> Result<(), HandlerError> + Send + Sync + 'static,
    ) -> Self {
        self.action = Some(Arc::new(IconAction {
            types,
            run: Arc::new(run),
        }));
        self
    }

    pub fn id(&self) -> IconId {
        self.id
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether the icon's action responds to `click`.
    pub fn accepts(&self, click: ClickType) -> bool {
        self.action.as_ref().is_some_and(|a| a.types.contains(click))
    }

    pub(crate) fn handler_for(&self, click: ClickType) -> Option<HandlerFn> {
        self.action
            .as_ref()
            .filter(|a| a.types.contains(click))
            .map(|a| a.run.clone())
    }

    /// Produces the current payload for a viewer.
    ///
    /// A panicking producer is contained here: the fault is logged and
    /// the slot renders vacant for this pass.
    pub fn view(&self, viewer: ViewerId) -> SlotPayload {
        match panic::catch_unwind(AssertUnwindSafe(|| (self.render)(viewer))) {
            Ok(payload) => payload,
            Err(_) => {
                tracing::error!(icon = %self.id, key = %self.key, "icon payload producer panicked");
                SlotPayload::empty()
            }
        }
    }
}

impl std::fmt::Debug for Icon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Icon")
            .field("id", &self.id)
            .field("key", &self.key)
            .field("action", &self.action.is_some())
            .finish()
    }
}
