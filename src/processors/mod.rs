pub mod block_processor;
pub mod station_table;

pub use block_processor::{BlockProcessor, ProcessingSummary};
pub use station_table::StationTable;
