//! Click classification.
//!
//! Maps the raw `(mode, button, slot)` triple reported by the client to a
//! semantic [`ClickType`]. The table is the de-facto contract clients rely
//! on, so it is reproduced exactly; anything unmatched is [`ClickType::Unknown`],
//! never an error.

use serde::{Deserialize, Serialize};

/// Slot value the client sends for a click outside the window bounds.
pub const OUTSIDE_WINDOW_SLOT: i32 = -999;

/// Raw interaction mode carried by an inbound window click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickMode {
    /// Plain cursor pickup/place.
    Pickup,
    /// Shift-click transfer.
    QuickMove,
    /// Number-key hotbar swap.
    Swap,
    /// Duplicate-item gesture (creative middle click).
    Clone,
    /// Drop gesture.
    Throw,
    /// Drag-paint gesture.
    QuickCraft,
    /// Double-click-to-collect gesture.
    PickupAll,
}

/// Semantic click category produced by [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickType {
    Left,
    Right,
    ShiftLeft,
    ShiftRight,
    NumberKey,
    Middle,
    Drop,
    ControlDrop,
    WindowBorderLeft,
    WindowBorderRight,
    DoubleClick,
    Unknown,
}

impl ClickType {
    /// All variants, in declaration order.
    pub const ALL: [ClickType; 12] = [
        ClickType::Left,
        ClickType::Right,
        ClickType::ShiftLeft,
        ClickType::ShiftRight,
        ClickType::NumberKey,
        ClickType::Middle,
        ClickType::Drop,
        ClickType::ControlDrop,
        ClickType::WindowBorderLeft,
        ClickType::WindowBorderRight,
        ClickType::DoubleClick,
        ClickType::Unknown,
    ];

    const fn bit(self) -> u16 {
        1 << self as u16
    }
}

/// Classifies a raw interaction into a [`ClickType`].
///
/// Total over the input domain: every combination yields exactly one
/// variant. Unmatched drag-paint combinations are `Unknown` — they are
/// not reinterpreted as a collect gesture.
pub fn classify(mode: ClickMode, button: i32, slot: i32) -> ClickType {
    match mode {
        ClickMode::Pickup => match button {
            0 => ClickType::Left,
            1 => ClickType::Right,
            _ => ClickType::Unknown,
        },
        ClickMode::QuickMove => match button {
            0 => ClickType::ShiftLeft,
            1 => ClickType::ShiftRight,
            _ => ClickType::Unknown,
        },
        ClickMode::Swap => ClickType::NumberKey,
        ClickMode::Clone => ClickType::Middle,
        ClickMode::Throw => {
            if slot >= 0 {
                match button {
                    0 => ClickType::Drop,
                    1 => ClickType::ControlDrop,
                    _ => ClickType::Unknown,
                }
            } else if slot == OUTSIDE_WINDOW_SLOT {
                match button {
                    0 => ClickType::WindowBorderLeft,
                    1 => ClickType::WindowBorderRight,
                    _ => ClickType::Unknown,
                }
            } else {
                ClickType::Unknown
            }
        }
        ClickMode::QuickCraft => {
            if slot >= 0 {
                match button {
                    1 => ClickType::Left,
                    5 => ClickType::Right,
                    _ => ClickType::Unknown,
                }
            } else if slot == OUTSIDE_WINDOW_SLOT {
                match button {
                    0 | 1 | 2 => ClickType::Left,
                    4 | 5 | 6 => ClickType::Right,
                    8 | 9 | 10 => ClickType::Middle,
                    _ => ClickType::Unknown,
                }
            } else {
                ClickType::Unknown
            }
        }
        ClickMode::PickupAll => ClickType::DoubleClick,
    }
}

/// Set of [`ClickType`] values, used by icons to declare which clicks
/// they respond to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClickTypeSet(u16);

impl ClickTypeSet {
    /// The empty set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// The set containing every click type.
    pub const fn all() -> Self {
        Self((1 << ClickType::ALL.len()) - 1)
    }

    /// Builds a set from a slice of types.
    pub fn of(types: &[ClickType]) -> Self {
        types.iter().copied().collect()
    }

    pub fn insert(&mut self, t: ClickType) {
        self.0 |= t.bit();
    }

    pub fn contains(self, t: ClickType) -> bool {
        self.0 & t.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<ClickType> for ClickTypeSet {
    fn from_iter<I: IntoIterator<Item = ClickType>>(iter: I) -> Self {
        let mut set = Self::empty();
        for t in iter {
            set.insert(t);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pickup_buttons() {
        assert_eq!(classify(ClickMode::Pickup, 0, 3), ClickType::Left);
        assert_eq!(classify(ClickMode::Pickup, 1, 3), ClickType::Right);
        assert_eq!(classify(ClickMode::Pickup, 2, 3), ClickType::Unknown);
        // Slot is irrelevant for pickup.
        assert_eq!(classify(ClickMode::Pickup, 0, -999), ClickType::Left);
    }

    #[test]
    fn quick_move_buttons() {
        assert_eq!(classify(ClickMode::QuickMove, 0, 0), ClickType::ShiftLeft);
        assert_eq!(classify(ClickMode::QuickMove, 1, 0), ClickType::ShiftRight);
        assert_eq!(classify(ClickMode::QuickMove, 40, 0), ClickType::Unknown);
    }

    #[test]
    fn swap_and_clone_ignore_button() {
        for button in [0, 1, 8, 40] {
            assert_eq!(classify(ClickMode::Swap, button, 5), ClickType::NumberKey);
            assert_eq!(classify(ClickMode::Clone, button, 5), ClickType::Middle);
        }
    }

    #[test]
    fn throw_inside_window() {
        assert_eq!(classify(ClickMode::Throw, 0, 7), ClickType::Drop);
        assert_eq!(classify(ClickMode::Throw, 1, 7), ClickType::ControlDrop);
        assert_eq!(classify(ClickMode::Throw, 2, 7), ClickType::Unknown);
    }

    #[test]
    fn throw_outside_window() {
        assert_eq!(
            classify(ClickMode::Throw, 0, OUTSIDE_WINDOW_SLOT),
            ClickType::WindowBorderLeft
        );
        assert_eq!(
            classify(ClickMode::Throw, 1, OUTSIDE_WINDOW_SLOT),
            ClickType::WindowBorderRight
        );
        assert_eq!(
            classify(ClickMode::Throw, 2, OUTSIDE_WINDOW_SLOT),
            ClickType::Unknown
        );
        // Negative slots other than the sentinel match nothing.
        assert_eq!(classify(ClickMode::Throw, 0, -1), ClickType::Unknown);
    }

    #[test]
    fn quick_craft_inside_window() {
        assert_eq!(classify(ClickMode::QuickCraft, 1, 0), ClickType::Left);
        assert_eq!(classify(ClickMode::QuickCraft, 5, 0), ClickType::Right);
        assert_eq!(classify(ClickMode::QuickCraft, 0, 0), ClickType::Unknown);
        assert_eq!(classify(ClickMode::QuickCraft, 9, 0), ClickType::Unknown);
    }

    #[test]
    fn quick_craft_outside_window() {
        let cases = [
            (0, ClickType::Left),
            (1, ClickType::Left),
            (2, ClickType::Left),
            (4, ClickType::Right),
            (5, ClickType::Right),
            (6, ClickType::Right),
            (8, ClickType::Middle),
            (9, ClickType::Middle),
            (10, ClickType::Middle),
            (3, ClickType::Unknown),
            (7, ClickType::Unknown),
            (11, ClickType::Unknown),
        ];
        for (button, expected) in cases {
            assert_eq!(
                classify(ClickMode::QuickCraft, button, OUTSIDE_WINDOW_SLOT),
                expected,
                "button {button}"
            );
        }
    }

    #[test]
    fn quick_craft_unmatched_slot_is_unknown() {
        // Not a double click: unmatched drag-paint input stays Unknown.
        assert_eq!(classify(ClickMode::QuickCraft, 0, -5), ClickType::Unknown);
        assert_eq!(classify(ClickMode::QuickCraft, 3, -999), ClickType::Unknown);
    }

    #[test]
    fn pickup_all_always_double_click() {
        for (button, slot) in [(0, 0), (1, -999), (7, -3)] {
            assert_eq!(
                classify(ClickMode::PickupAll, button, slot),
                ClickType::DoubleClick
            );
        }
    }

    #[test]
    fn classify_is_total() {
        let modes = [
            ClickMode::Pickup,
            ClickMode::QuickMove,
            ClickMode::Swap,
            ClickMode::Clone,
            ClickMode::Throw,
            ClickMode::QuickCraft,
            ClickMode::PickupAll,
        ];
        for mode in modes {
            for button in -2..=12 {
                for slot in [-1000, -999, -1, 0, 5, 53] {
                    let t = classify(mode, button, slot);
                    assert!(ClickType::ALL.contains(&t));
                }
            }
        }
    }

    #[test]
    fn click_type_set_membership() {
        let mut set = ClickTypeSet::empty();
        assert!(set.is_empty());
        set.insert(ClickType::Left);
        set.insert(ClickType::ShiftLeft);
        assert!(set.contains(ClickType::Left));
        assert!(set.contains(ClickType::ShiftLeft));
        assert!(!set.contains(ClickType::Right));

        let all = ClickTypeSet::all();
        for t in ClickType::ALL {
            assert!(all.contains(t));
        }

        let from_slice = ClickTypeSet::of(&[ClickType::Left, ClickType::Right]);
        assert!(from_slice.contains(ClickType::Right));
        assert!(!from_slice.contains(ClickType::Middle));
    }

    #[test]
    fn click_mode_wire_names() {
        assert_eq!(
            serde_json::to_string(&ClickMode::QuickCraft).unwrap(),
            "\"quick_craft\""
        );
        assert_eq!(
            serde_json::to_string(&ClickType::WindowBorderLeft).unwrap(),
            "\"window_border_left\""
        );
        let parsed: ClickMode = serde_json::from_str("\"pickup_all\"").unwrap();
        assert_eq!(parsed, ClickMode::PickupAll);
    }
}
