// Location entity
// A physical site with its own prize inventory

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value_objects::SlotVector;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub slots: SlotVector,
}

impl Location {
    pub fn new(name: impl Into<String>, slots: SlotVector) -> Self {
        Self {
            name: name.into(),
            slots,
        }
    }
}

/// Location id -> location, ordered so persisted documents diff cleanly.
pub type Inventory = BTreeMap<String, Location>;

/// Result of a conditional "decrement slot i if it is still > 0".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecrementOutcome {
    /// Slot was decremented; carries the vector after the write.
    Applied(SlotVector),
    /// Slot was already zero; carries the current vector untouched.
    Depleted(SlotVector),
    UnknownLocation,
}

const BASELINE: [(&str, &str, [u32; 8]); 8] = [
    ("location1", "Goma", [80, 60, 45, 30, 20, 15, 10, 5]),
    ("location2", "Butembo", [75, 55, 40, 25, 18, 12, 8, 4]),
    ("location3", "Beni", [70, 50, 35, 20, 15, 10, 5, 2]),
    ("location4", "Bukavu", [65, 45, 30, 15, 10, 7, 3, 1]),
    ("location5", "Kindu", [85, 65, 48, 32, 22, 16, 11, 6]),
    ("location6", "Kalemie", [70, 55, 42, 28, 20, 14, 9, 5]),
    ("location7", "Bunia", [75, 58, 42, 28, 18, 12, 7, 4]),
    ("location8", "Uvira", [72, 55, 40, 25, 16, 11, 6, 3]),
];

/// Built-in baseline used for first-time seeding and admin resets.
pub fn default_inventory() -> Inventory {
    BASELINE
        .iter()
        .map(|(id, name, slots)| (id.to_string(), Location::new(*name, SlotVector::new(*slots))))
        .collect()
}
