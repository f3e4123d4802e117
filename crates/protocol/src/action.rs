//! Outbound action stream and inbound interaction record.
//!
//! [`WindowAction`] is everything the core ever asks the transport to do;
//! [`WindowClick`] is the already-decoded interaction record the core
//! consumes. Byte-level framing is the adapter's concern.

use serde::{Deserialize, Serialize};

use crate::click::ClickMode;
use crate::types::{ViewerId, WindowId, WindowLayout};

/// Opaque visual payload occupying one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotPayload {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub icon: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tooltip: Vec<String>,
    #[serde(default, skip_serializing_if = "is_zero_u8")]
    pub quantity: u8,
}

impl SlotPayload {
    /// Payload of a vacant slot.
    pub fn empty() -> Self {
        Self {
            icon: String::new(),
            label: String::new(),
            tooltip: Vec::new(),
            quantity: 0,
        }
    }

    /// Single unit of `icon` with a label.
    pub fn new(icon: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            icon: icon.into(),
            label: label.into(),
            tooltip: Vec::new(),
            quantity: 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.icon.is_empty() && self.quantity == 0
    }
}

/// An outbound protocol action emitted through the adapter boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WindowAction {
    /// Open a window for a viewer.
    #[serde(rename_all = "camelCase")]
    OpenWindow {
        viewer: ViewerId,
        window: WindowId,
        layout: WindowLayout,
        title: String,
    },
    /// Close a viewer's window.
    #[serde(rename_all = "camelCase")]
    CloseWindow { viewer: ViewerId, window: WindowId },
    /// Replace a single slot.
    #[serde(rename_all = "camelCase")]
    SetSlot {
        viewer: ViewerId,
        window: WindowId,
        slot: u16,
        payload: SlotPayload,
    },
    /// Replace every slot at once.
    #[serde(rename_all = "camelCase")]
    WindowItems {
        viewer: ViewerId,
        window: WindowId,
        payloads: Vec<SlotPayload>,
    },
}

impl WindowAction {
    /// The viewer this action targets.
    pub fn viewer(&self) -> ViewerId {
        match self {
            WindowAction::OpenWindow { viewer, .. }
            | WindowAction::CloseWindow { viewer, .. }
            | WindowAction::SetSlot { viewer, .. }
            | WindowAction::WindowItems { viewer, .. } => *viewer,
        }
    }

    /// The logical window this action concerns.
    pub fn window(&self) -> WindowId {
        match self {
            WindowAction::OpenWindow { window, .. }
            | WindowAction::CloseWindow { window, .. }
            | WindowAction::SetSlot { window, .. }
            | WindowAction::WindowItems { window, .. } => *window,
        }
    }
}

/// Inbound interaction record decoded by the transport collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowClick {
    pub viewer: ViewerId,
    pub window: WindowId,
    pub raw_slot: i32,
    pub mode: ClickMode,
    pub button: i32,
}

fn is_zero_u8(v: &u8) -> bool {
    *v == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_payload_omits_empty_fields() {
        let json = serde_json::to_string(&SlotPayload::empty()).unwrap();
        assert_eq!(json, "{}");

        let json = serde_json::to_string(&SlotPayload::new("emerald", "Confirm")).unwrap();
        assert!(json.contains("\"icon\":\"emerald\""));
        assert!(!json.contains("tooltip"));
    }

    #[test]
    fn slot_payload_roundtrip() {
        let p = SlotPayload {
            icon: "paper".into(),
            label: "Page 2".into(),
            tooltip: vec!["Next page".into()],
            quantity: 2,
        };
        let json = serde_json::to_string(&p).unwrap();
        let parsed: SlotPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(p, parsed);
    }

    #[test]
    fn action_tag_names() {
        let viewer = ViewerId::random();
        let action = WindowAction::SetSlot {
            viewer,
            window: WindowId(1),
            slot: 4,
            payload: SlotPayload::new("stone", ""),
        };
        let json = serde_json::to_string(&action).unwrap();
        assert!(json.contains("\"type\":\"set_slot\""));
        let parsed: WindowAction = serde_json::from_str(&json).unwrap();
        assert_eq!(action, parsed);
    }

    #[test]
    fn open_window_roundtrip() {
        let action = WindowAction::OpenWindow {
            viewer: ViewerId::random(),
            window: WindowId(3),
            layout: WindowLayout::Grid9x3,
            title: "Shop".into(),
        };
        let json = serde_json::to_string(&action).unwrap();
        assert!(json.contains("\"type\":\"open_window\""));
        assert!(json.contains("\"layout\":\"grid9x3\""));
        let parsed: WindowAction = serde_json::from_str(&json).unwrap();
        assert_eq!(action, parsed);
        assert_eq!(parsed.window(), WindowId(3));
    }

    #[test]
    fn window_click_field_names() {
        let click = WindowClick {
            viewer: ViewerId::random(),
            window: WindowId(9),
            raw_slot: -999,
            mode: ClickMode::Throw,
            button: 1,
        };
        let json = serde_json::to_string(&click).unwrap();
        assert!(json.contains("\"rawSlot\":-999"));
        assert!(json.contains("\"mode\":\"throw\""));
        let parsed: WindowClick = serde_json::from_str(&json).unwrap();
        assert_eq!(click, parsed);
    }
}
