// Slot vector value object
// Remaining prize inventory per outcome; index i belongs to outcome i + 1

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::value_objects::outcome::Outcome;

pub const SLOT_COUNT: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotVectorError {
    #[error("slot vector must have exactly 8 entries, got {0}")]
    WrongLength(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub struct SlotVector([u32; SLOT_COUNT]);

impl SlotVector {
    pub const fn new(slots: [u32; SLOT_COUNT]) -> Self {
        Self(slots)
    }

    pub fn zeroed() -> Self {
        Self([0; SLOT_COUNT])
    }

    pub fn as_array(&self) -> &[u32; SLOT_COUNT] {
        &self.0
    }

    pub fn get(&self, outcome: Outcome) -> u32 {
        self.0[outcome.index()]
    }

    pub fn total(&self) -> u64 {
        self.0.iter().map(|&count| u64::from(count)).sum()
    }

    pub fn is_exhausted(&self) -> bool {
        self.total() == 0
    }

    /// Copy with the outcome's slot lowered by one, never below zero.
    pub fn decremented(&self, outcome: Outcome) -> Self {
        let mut next = self.0;
        let slot = &mut next[outcome.index()];
        *slot = slot.saturating_sub(1);
        Self(next)
    }

    /// Builds a vector from loosely typed admin input.
    ///
    /// Negative, fractional or non-numeric entries never fail the edit; they
    /// are coerced the way a form field would be (`"12abc"` -> 12, `-4` -> 0,
    /// `"x"` -> 0). Only the entry count is validated.
    pub fn from_admin_input(values: &[Value]) -> Result<Self, SlotVectorError> {
        if values.len() != SLOT_COUNT {
            return Err(SlotVectorError::WrongLength(values.len()));
        }
        let mut slots = [0u32; SLOT_COUNT];
        for (slot, value) in slots.iter_mut().zip(values) {
            *slot = coerce_slot(value);
        }
        Ok(Self(slots))
    }
}

impl TryFrom<Vec<u32>> for SlotVector {
    type Error = SlotVectorError;

    fn try_from(value: Vec<u32>) -> Result<Self, Self::Error> {
        let len = value.len();
        let slots: [u32; SLOT_COUNT] = value
            .try_into()
            .map_err(|_| SlotVectorError::WrongLength(len))?;
        Ok(Self(slots))
    }
}

impl From<SlotVector> for Vec<u32> {
    fn from(value: SlotVector) -> Self {
        value.0.to_vec()
    }
}

fn coerce_slot(value: &Value) -> u32 {
    match value {
        Value::Number(number) => {
            if let Some(unsigned) = number.as_u64() {
                clamp_u64(unsigned)
            } else if number.as_i64().is_some() {
                0
            } else {
                number.as_f64().map(clamp_f64).unwrap_or(0)
            }
        }
        Value::String(text) => parse_leading_int(text).map(clamp_i128).unwrap_or(0),
        _ => 0,
    }
}

fn clamp_u64(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn clamp_i128(value: i128) -> u32 {
    if value <= 0 {
        0
    } else {
        u32::try_from(value).unwrap_or(u32::MAX)
    }
}

fn clamp_f64(value: f64) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        0
    } else if value >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        value.trunc() as u32
    }
}

fn parse_leading_int(text: &str) -> Option<i128> {
    let trimmed = text.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    // Long digit runs saturate rather than fail.
    let magnitude = digits[..end].parse::<i128>().unwrap_or(i128::MAX);
    Some(if negative { -magnitude } else { magnitude })
}
