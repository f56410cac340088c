//! Run configuration, built once at the CLI boundary.

use crate::error::{ProcessingError, Result};
use crate::utils::constants::{DEFAULT_INPUT_FILE, DEFAULT_OUTPUT_FILE, MAX_STATIONS};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorConfig {
    /// Container to read.
    pub input: PathBuf,
    /// Where the JSON results go.
    pub output: PathBuf,
    /// Draw a block progress bar when stderr is a terminal.
    pub show_progress: bool,
    /// Distinct stations tolerated before the input is rejected.
    pub max_stations: usize,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT_FILE),
            output: PathBuf::from(DEFAULT_OUTPUT_FILE),
            show_progress: true,
            max_stations: MAX_STATIONS,
        }
    }
}

impl ProcessorConfig {
    pub fn with_input(mut self, input: Option<PathBuf>) -> Self {
        if let Some(input) = input {
            self.input = input;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.input.as_os_str().is_empty() {
            return Err(ProcessingError::Config("input path is empty".to_string()));
        }
        if self.max_stations == 0 {
            return Err(ProcessingError::Config(
                "station limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProcessorConfig::default();
        assert_eq!(config.input, PathBuf::from("measurements-1.cle"));
        assert_eq!(config.output, PathBuf::from("results.json"));
        assert_eq!(config.max_stations, 10_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_input_override() {
        let config = ProcessorConfig::default().with_input(Some(PathBuf::from("data/m-3.cle")));
        assert_eq!(config.input, PathBuf::from("data/m-3.cle"));

        let config = ProcessorConfig::default().with_input(None);
        assert_eq!(config.input, PathBuf::from(DEFAULT_INPUT_FILE));
    }

    #[test]
    fn test_empty_input_rejected() {
        let config = ProcessorConfig::default().with_input(Some(PathBuf::new()));
        assert!(matches!(config.validate(), Err(ProcessingError::Config(_))));
    }
}
