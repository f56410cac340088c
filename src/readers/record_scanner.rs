use crate::error::{ProcessingError, Result};
use crate::models::temperature::decode_temperature;
use crate::utils::constants::{MAX_STATION_NAME_LEN, RECORD_DELIMITER, RECORD_TERMINATOR};
use std::iter::FusedIterator;

/// A `<station>;<temperature>` line, borrowed from the block it was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    pub station: &'a [u8],
    pub temperature_x10: i32,
}

/// Zero-copy, single-pass splitter over one decompressed block.
///
/// Every record must end in `\n` or at the end of the block. The first
/// malformed record is reported once and ends the scan.
pub struct RecordScanner<'a> {
    buf: &'a [u8],
    pos: usize,
    failed: bool,
}

impl<'a> RecordScanner<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            failed: false,
        }
    }

    #[inline(always)]
    fn scan_record(&mut self) -> Result<Record<'a>> {
        let start = self.pos;
        let rest = &self.buf[start..];

        let delimiter = match rest
            .iter()
            .position(|&b| b == RECORD_DELIMITER || b == RECORD_TERMINATOR)
        {
            Some(i) if rest[i] == RECORD_DELIMITER => start + i,
            Some(i) => {
                return Err(ProcessingError::malformed(
                    start + i,
                    "line ends before the ';' delimiter",
                ))
            }
            None => {
                return Err(ProcessingError::malformed(
                    start,
                    format!("{} trailing bytes without a ';' delimiter", rest.len()),
                ))
            }
        };

        let station = &self.buf[start..delimiter];
        if station.is_empty() || station.len() > MAX_STATION_NAME_LEN {
            return Err(ProcessingError::malformed(
                start,
                format!(
                    "station name is {} bytes, expected 1..={}",
                    station.len(),
                    MAX_STATION_NAME_LEN
                ),
            ));
        }

        let (temperature_x10, end) = decode_temperature(self.buf, delimiter + 1)?;

        self.pos = match self.buf.get(end) {
            None => end,
            Some(&RECORD_TERMINATOR) => end + 1,
            Some(_) => {
                return Err(ProcessingError::malformed(
                    end,
                    "temperature is not followed by a newline",
                ))
            }
        };

        Ok(Record {
            station,
            temperature_x10,
        })
    }
}

impl<'a> Iterator for RecordScanner<'a> {
    type Item = Result<Record<'a>>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.buf.len() {
            return None;
        }

        let record = self.scan_record();
        if record.is_err() {
            self.failed = true;
        }
        Some(record)
    }
}

impl FusedIterator for RecordScanner<'_> {}
