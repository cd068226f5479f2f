// Weighted draw engine
// Selects an outcome with probability slots[i] / sum(slots)

use crate::services::random::RandomSource;
use crate::value_objects::{Outcome, SlotVector};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Draw {
    Won(Outcome),
    /// Every slot is empty; nothing may be awarded or decremented.
    Exhausted,
}

pub fn draw(slots: &SlotVector, rng: &mut dyn RandomSource) -> Draw {
    let total = slots.total();
    if total == 0 {
        return Draw::Exhausted;
    }
    let ticket = rng.next_below(total).min(total - 1);
    pick(slots, ticket)
}

/// Maps a ticket in `[0, total)` to the slot whose cumulative range holds it.
/// Equivalent to indexing the expanded multiset of outcomes.
pub fn pick(slots: &SlotVector, ticket: u64) -> Draw {
    let mut cumulative = 0u64;
    for (index, &count) in slots.as_array().iter().enumerate() {
        cumulative += u64::from(count);
        if ticket < cumulative {
            return Outcome::from_index(index).map_or(Draw::Exhausted, Draw::Won);
        }
    }
    Draw::Exhausted
}
