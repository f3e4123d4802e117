//! Persistable static shape of a window.
//!
//! The engine delegates persistence to an external collaborator; the only
//! contract is that title, layout kind and per-slot icon identity survive
//! a serialize/deserialize round trip.

use serde::{Deserialize, Serialize};

use crate::types::WindowLayout;

/// Static description of a window: title, layout, and the icon identity
/// occupying each slot (`None` for vacant slots).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowShape {
    pub title: String,
    pub layout: WindowLayout,
    pub slots: Vec<Option<String>>,
}

impl WindowShape {
    /// Creates a shape, normalizing `slots` to the layout's slot count
    /// (excess entries are dropped, missing ones become vacant).
    pub fn new(
        title: impl Into<String>,
        layout: WindowLayout,
        mut slots: Vec<Option<String>>,
    ) -> Self {
        slots.resize(layout.slot_count(), None);
        Self {
            title: title.into(),
            layout,
            slots,
        }
    }

    /// Icon identity at `slot`, if the index is valid and occupied.
    pub fn icon_key(&self, slot: usize) -> Option<&str> {
        self.slots.get(slot).and_then(|s| s.as_deref())
    }
}
