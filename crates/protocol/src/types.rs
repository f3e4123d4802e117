use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of a remote party viewing a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewerId(Uuid);

impl ViewerId {
    /// Generates a fresh random identity.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for ViewerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Logical window identifier assigned by the engine.
///
/// The transport adapter is responsible for mapping this to whatever
/// identifier space the wire protocol requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub u32);

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Fixed layout shapes a window can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowLayout {
    Grid9x1,
    Grid9x2,
    Grid9x3,
    Grid9x4,
    Grid9x5,
    Grid9x6,
    Hopper5,
    Dropper3x3,
}

impl WindowLayout {
    /// Number of rows in the layout.
    pub fn rows(self) -> usize {
        match self {
            WindowLayout::Grid9x1 => 1,
            WindowLayout::Grid9x2 => 2,
            WindowLayout::Grid9x3 => 3,
            WindowLayout::Grid9x4 => 4,
            WindowLayout::Grid9x5 => 5,
            WindowLayout::Grid9x6 => 6,
            WindowLayout::Hopper5 => 1,
            WindowLayout::Dropper3x3 => 3,
        }
    }

    /// Number of columns in the layout.
    pub fn columns(self) -> usize {
        match self {
            WindowLayout::Hopper5 => 5,
            WindowLayout::Dropper3x3 => 3,
            _ => 9,
        }
    }

    /// Total slot count; slot indices are valid in `0..slot_count()`.
    pub fn slot_count(self) -> usize {
        self.rows() * self.columns()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_slot_counts() {
        assert_eq!(WindowLayout::Grid9x1.slot_count(), 9);
        assert_eq!(WindowLayout::Grid9x6.slot_count(), 54);
        assert_eq!(WindowLayout::Hopper5.slot_count(), 5);
        assert_eq!(WindowLayout::Dropper3x3.slot_count(), 9);
    }

    #[test]
    fn layout_wire_names() {
        assert_eq!(
            serde_json::to_string(&WindowLayout::Grid9x3).unwrap(),
            "\"grid9x3\""
        );
        let parsed: WindowLayout = serde_json::from_str("\"hopper5\"").unwrap();
        assert_eq!(parsed, WindowLayout::Hopper5);
    }

    #[test]
    fn viewer_id_transparent_serde() {
        let id = ViewerId::random();
        let json = serde_json::to_string(&id).unwrap();
        // A bare UUID string, not an object.
        assert!(json.starts_with('"'));
        let parsed: ViewerId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn window_id_display() {
        assert_eq!(WindowId(7).to_string(), "#7");
    }
}
