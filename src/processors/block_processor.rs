use crate::compression::BlockCompressor;
use crate::error::{ProcessingError, Result};
use crate::processors::StationTable;
use crate::readers::{ContainerReader, RecordScanner};
use crate::utils::constants::MAX_STATIONS;
use crate::utils::progress::ProgressReporter;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessingSummary {
    pub blocks: usize,
    pub records: u64,
    pub stations: usize,
}

impl ProcessingSummary {
    pub fn summary(&self) -> String {
        format!(
            "Processed {} records from {} blocks ({} stations)",
            self.records, self.blocks, self.stations
        )
    }
}

/// Drives container blocks through the scanner into a station table.
pub struct BlockProcessor {
    max_stations: usize,
    show_progress: bool,
}

impl BlockProcessor {
    pub fn new() -> Self {
        Self {
            max_stations: MAX_STATIONS,
            show_progress: false,
        }
    }

    pub fn with_max_stations(mut self, max_stations: usize) -> Self {
        self.max_stations = max_stations;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn process_file(&self, path: &Path) -> Result<(StationTable, ProcessingSummary)> {
        info!(input = %path.display(), "processing container");
        let reader = ContainerReader::open(path)?;
        self.process_container(reader)
    }

    /// Consumes every block in order. Any failure aborts the whole run.
    pub fn process_container<R: Read, C: BlockCompressor>(
        &self,
        mut reader: ContainerReader<R, C>,
    ) -> Result<(StationTable, ProcessingSummary)> {
        let block_count = reader.block_count();
        let progress =
            ProgressReporter::for_terminal(block_count as u64, "Processing blocks...", self.show_progress);

        let mut table = StationTable::with_capacity(self.max_stations.min(MAX_STATIONS));
        let mut summary = ProcessingSummary::default();

        while let Some(block) = reader.next_block()? {
            let index = summary.blocks;
            let records = Self::process_block(&mut table, block).map_err(|e| match e {
                ProcessingError::MalformedRecord { offset, reason } => {
                    ProcessingError::MalformedRecord {
                        offset,
                        reason: format!("block {}: {}", index, reason),
                    }
                }
                other => other,
            })?;

            if table.len() > self.max_stations {
                progress.abandon();
                return Err(ProcessingError::TooManyStations {
                    count: table.len(),
                    limit: self.max_stations,
                });
            }

            summary.blocks += 1;
            summary.records += records;
            debug!(block = index, records, stations = table.len(), "block processed");
            progress.increment(1);
        }

        summary.stations = table.len();
        progress.finish_with_message(&summary.summary());
        info!(
            blocks = summary.blocks,
            records = summary.records,
            stations = summary.stations,
            "container processed"
        );

        Ok((table, summary))
    }

    /// Folds one decompressed block into `table`, returning the record count.
    pub fn process_block(table: &mut StationTable, block: &[u8]) -> Result<u64> {
        let mut records = 0;
        for record in RecordScanner::new(block) {
            let record = record?;
            table.record(record.station, record.temperature_x10);
            records += 1;
        }
        Ok(records)
    }
}

impl Default for BlockProcessor {
    fn default() -> Self {
        Self::new()
    }
}
