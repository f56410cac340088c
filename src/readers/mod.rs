pub mod container_reader;
pub mod record_scanner;

pub use container_reader::{BlockHeader, ContainerReader};
pub use record_scanner::{Record, RecordScanner};
