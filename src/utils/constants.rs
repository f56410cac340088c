/// File names
pub const DEFAULT_INPUT_FILE: &str = "measurements-1.cle";
pub const DEFAULT_OUTPUT_FILE: &str = "results.json";
pub const SAMPLE_FILE_PREFIX: &str = "measurements-";
pub const SAMPLE_FILE_EXTENSION: &str = "cle";

/// Record format constraints
pub const RECORD_DELIMITER: u8 = b';';
pub const RECORD_TERMINATOR: u8 = b'\n';
pub const MAX_STATION_NAME_LEN: usize = 100;
pub const MIN_TEMP_X10: i32 = -999;
pub const MAX_TEMP_X10: i32 = 999;

/// Producer guarantee on distinct station names
pub const MAX_STATIONS: usize = 10_000;

/// Container layout: i32 block count, then (i32 compressed, i32 original) per block
pub const BLOCK_COUNT_LEN: usize = 4;
pub const BLOCK_HEADER_LEN: usize = 8;

/// Processing defaults
pub const DEFAULT_BLOCK_SIZE: usize = 512 * 1024 * 1024; // 512 MiB
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB

/// Sample generation
pub const MIN_SAMPLE_BLOCKS: usize = 1;
pub const MAX_SAMPLE_BLOCKS: usize = 100;
pub const SAMPLE_STD_MIN: f64 = 1.0;
pub const SAMPLE_STD_MAX: f64 = 4.0;
