pub mod container_writer;
pub mod json_writer;

pub use container_writer::{ContainerSummary, ContainerWriter};
pub use json_writer::{JsonWriter, ResultsDocument};
