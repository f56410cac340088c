pub mod cli;
pub mod compression;
pub mod config;
pub mod error;
pub mod generator;
pub mod models;
pub mod processors;
pub mod readers;
pub mod utils;
pub mod writers;

pub use config::ProcessorConfig;
pub use error::{ProcessingError, Result};
