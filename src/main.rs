use anyhow::Context;
use clap::Parser;
use postal_extremes::cli::{self, Args};
use postal_extremes::ExtremesProcessor;
use std::process;

fn main() {
    let args = Args::parse();

    if let Err(e) = cli::setup_logging(&args) {
        eprintln!("Warning: {}", e);
    }

    match run(&args) {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let config = args.load_config().context("invalid configuration")?;
    let processor = ExtremesProcessor::new(config)?;

    let (_, stats) = processor
        .process()
        .with_context(|| format!("failed to process {}", processor.config().input_path.display()))?;

    if !args.quiet {
        cli::print_summary(&stats);
    }
    Ok(())
}
