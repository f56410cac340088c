use anyhow::Context;
use clap::Parser;
use cle_processor::generator::{sample_file_name, SampleGenerator};
use cle_processor::utils::constants::{DEFAULT_BLOCK_SIZE, MAX_SAMPLE_BLOCKS, MIN_SAMPLE_BLOCKS};
use cle_processor::utils::init_logging;
use cle_processor::writers::ContainerWriter;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "create-samples")]
#[command(about = "Generate a block-compressed measurements file")]
#[command(version)]
struct Args {
    /// Number of blocks to generate, clamped to 1..=100
    #[arg(allow_negative_numbers = true)]
    blocks: i64,

    #[arg(long, default_value_t = DEFAULT_BLOCK_SIZE, help = "Uncompressed bytes per block")]
    block_size: usize,

    #[arg(long, help = "Seed for reproducible output [default: random]")]
    seed: Option<u64>,

    #[arg(short, long, help = "Output file [default: measurements-{BLOCKS}.cle]")]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    init_logging("info");
    let args = Args::parse();

    let blocks = args
        .blocks
        .clamp(MIN_SAMPLE_BLOCKS as i64, MAX_SAMPLE_BLOCKS as i64) as usize;
    let seed = args.seed.unwrap_or_else(rand::random);
    let output = args.output.unwrap_or_else(|| sample_file_name(blocks));

    info!(blocks, block_size = args.block_size, seed, "generating samples");

    let mut generator = SampleGenerator::with_default_stations(seed)
        .context("Failed to set up station distributions")?
        .with_progress(true);
    let mut writer = ContainerWriter::create(&output, args.block_size)
        .with_context(|| format!("Failed to create {}", output.display()))?;

    generator
        .fill_container(&mut writer, blocks)
        .with_context(|| format!("Failed to write samples to {}", output.display()))?;
    let summary = writer.finish().context("Failed to finalize container")?;

    println!("Done: {} ({})", output.display(), summary.summary());
    Ok(())
}
