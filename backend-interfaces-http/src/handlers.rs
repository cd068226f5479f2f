pub mod distribution_handlers;
pub mod ops_handlers;
pub mod report_handlers;
pub mod spin_handlers;

pub use distribution_handlers::*;
pub use ops_handlers::*;
pub use report_handlers::*;
pub use spin_handlers::*;
