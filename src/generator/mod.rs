//! Synthetic measurement generation.
//!
//! The generator owns its random number generator, so a fixed seed always
//! produces the same file.

pub mod stations;

pub use stations::DEFAULT_STATIONS;

use crate::error::{ProcessingError, Result};
use crate::utils::constants::{
    MAX_TEMP_X10, MIN_TEMP_X10, SAMPLE_FILE_EXTENSION, SAMPLE_FILE_PREFIX, SAMPLE_STD_MAX,
    SAMPLE_STD_MIN,
};
use crate::utils::progress::ProgressReporter;
use crate::writers::ContainerWriter;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use std::io::{Seek, Write};
use std::path::PathBuf;

#[derive(Debug)]
struct SampleStation {
    name: String,
    distribution: Normal<f64>,
}

pub struct SampleGenerator {
    stations: Vec<SampleStation>,
    rng: StdRng,
    show_progress: bool,
}

impl SampleGenerator {
    /// Each station gets a spread drawn uniformly from `[1.0, 4.0)` up front.
    pub fn new(profiles: &[(&str, f64)], seed: u64) -> Result<Self> {
        if profiles.is_empty() {
            return Err(ProcessingError::Config(
                "at least one station is required".to_string(),
            ));
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let stations = profiles
            .iter()
            .map(|&(name, mean)| {
                let spread = rng.random_range(SAMPLE_STD_MIN..SAMPLE_STD_MAX);
                let distribution = Normal::new(mean, spread).map_err(|e| {
                    ProcessingError::Config(format!("invalid distribution for {}: {}", name, e))
                })?;
                Ok(SampleStation {
                    name: name.to_string(),
                    distribution,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            stations,
            rng,
            show_progress: false,
        })
    }

    pub fn with_default_stations(seed: u64) -> Result<Self> {
        Self::new(DEFAULT_STATIONS, seed)
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// One `(station, temperature_x10)` draw, clamped to the record range.
    pub fn next_measurement(&mut self) -> (&str, i32) {
        let index = self.rng.random_range(0..self.stations.len());
        let station = &self.stations[index];
        let value = station.distribution.sample(&mut self.rng);
        let value_x10 = ((value * 10.0).round() as i32).clamp(MIN_TEMP_X10, MAX_TEMP_X10);
        (&station.name, value_x10)
    }

    /// Fill exactly `blocks` blocks, each packed up to the writer's block budget.
    pub fn fill_container<W: Write + Seek>(
        &mut self,
        writer: &mut ContainerWriter<W>,
        blocks: usize,
    ) -> Result<()> {
        if blocks == 0 {
            return Ok(());
        }

        let progress =
            ProgressReporter::for_terminal(blocks as u64, "Generating blocks...", self.show_progress);
        let block_size = writer.block_size();
        let mut completed = writer.blocks_written();
        let target = completed + blocks;

        loop {
            let (name, value_x10) = self.next_measurement();
            let len = record_len(name, value_x10);
            let pending = writer.pending_bytes();

            if pending > 0 && pending + len > block_size && writer.blocks_written() + 1 == target {
                break;
            }
            writer.push_measurement(name, value_x10)?;

            if writer.blocks_written() > completed {
                progress.increment((writer.blocks_written() - completed) as u64);
                completed = writer.blocks_written();
            }
        }

        writer.flush_pending()?;
        progress.finish_with_message(&format!("Generated {} blocks", blocks));
        Ok(())
    }
}

/// Encoded length of `<station>;<temperature>\n`.
pub fn record_len(station: &str, value_x10: i32) -> usize {
    let digits = if value_x10.unsigned_abs() >= 100 { 4 } else { 3 };
    station.len() + 1 + usize::from(value_x10 < 0) + digits + 1
}

/// `measurements-<blocks>.cle`
pub fn sample_file_name(blocks: usize) -> PathBuf {
    PathBuf::from(format!(
        "{}{}.{}",
        SAMPLE_FILE_PREFIX, blocks, SAMPLE_FILE_EXTENSION
    ))
}
