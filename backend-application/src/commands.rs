pub mod distribution_commands;
pub mod inventory_sync_commands;
pub mod spin_commands;
