use crate::cli::args::Cli;
use crate::config::ProcessorConfig;
use crate::error::Result;
use crate::processors::{BlockProcessor, ProcessingSummary};
use crate::writers::JsonWriter;
use tracing::info;

pub fn run(cli: Cli) -> Result<ProcessingSummary> {
    let config = ProcessorConfig::default().with_input(cli.input);
    run_with_config(&config)
}

/// Read the container, aggregate every block, then export.
///
/// Nothing is written unless every block was processed successfully.
pub fn run_with_config(config: &ProcessorConfig) -> Result<ProcessingSummary> {
    config.validate()?;

    let processor = BlockProcessor::new()
        .with_max_stations(config.max_stations)
        .with_progress(config.show_progress);

    let (table, summary) = processor.process_file(&config.input)?;

    let writer = JsonWriter::new();
    writer.write_results(&table, &config.output)?;

    info!(output = %config.output.display(), "{}", summary.summary());
    Ok(summary)
}
