// Pure domain services: no I/O, no hidden state

pub mod draw_engine;
pub mod random;
pub mod report_aggregator;

pub use draw_engine::*;
pub use random::*;
pub use report_aggregator::*;
