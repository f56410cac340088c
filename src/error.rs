use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Truncated container: {context} needs {expected} bytes, only {actual} available")]
    TruncatedContainer {
        context: String,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid container header: {0}")]
    InvalidHeader(String),

    #[error("Decompression of block {block} failed: {message}")]
    Decompression { block: usize, message: String },

    #[error("Compression error: {0}")]
    Compression(String),

    #[error("Malformed record at byte {offset}: {reason}")]
    MalformedRecord { offset: usize, reason: String },

    #[error("Station limit exceeded: {count} distinct stations, limit is {limit}")]
    TooManyStations { count: usize, limit: usize },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ProcessingError {
    pub(crate) fn malformed(offset: usize, reason: impl Into<String>) -> Self {
        ProcessingError::MalformedRecord {
            offset,
            reason: reason.into(),
        }
    }
}
