pub mod history_writer;
pub mod inventory_refresh;
pub mod report_service;

pub use history_writer::*;
pub use inventory_refresh::*;
pub use report_service::*;
