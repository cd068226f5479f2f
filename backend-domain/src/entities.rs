// Domain entities

pub mod location;
pub mod model;
pub mod report;
pub mod spin_record;

pub use location::*;
pub use model::*;
pub use report::*;
pub use spin_record::*;
