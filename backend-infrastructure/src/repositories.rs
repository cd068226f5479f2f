pub mod clickhouse_history;
pub mod inventory_file;
pub mod memory;

pub use clickhouse_history::*;
pub use inventory_file::*;
pub use memory::*;
