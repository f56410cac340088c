use clap::Parser;
use cle_processor::cli::{run, Cli};
use cle_processor::utils::init_logging;
use std::process::ExitCode;

fn main() -> ExitCode {
    init_logging("warn");
    let cli = Cli::parse();

    match run(cli) {
        Ok(summary) => {
            println!("{}", summary.summary());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
