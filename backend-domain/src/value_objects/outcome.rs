// Outcome value object
// A wheel segment / prize number in 1..=8

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value_objects::slot_vector::SLOT_COUNT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Outcome(u8);

impl Outcome {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = SLOT_COUNT as u8;

    pub fn new(number: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&number).then_some(Self(number))
    }

    /// Outcome for a 0-based slot index.
    pub fn from_index(index: usize) -> Option<Self> {
        u8::try_from(index + 1).ok().and_then(Self::new)
    }

    pub fn number(self) -> u8 {
        self.0
    }

    pub fn index(self) -> usize {
        usize::from(self.0 - 1)
    }

    pub fn all() -> impl Iterator<Item = Outcome> {
        (Self::MIN..=Self::MAX).map(Outcome)
    }
}

impl TryFrom<u8> for Outcome {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Outcome::new(value).ok_or_else(|| format!("outcome must be within 1..=8, got {}", value))
    }
}

impl From<Outcome> for u8 {
    fn from(value: Outcome) -> Self {
        value.0
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
