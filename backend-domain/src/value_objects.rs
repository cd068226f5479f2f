// Domain value objects
pub mod frequency_band;
pub mod outcome;
pub mod slot_vector;

pub use frequency_band::*;
pub use outcome::*;
pub use slot_vector::*;
