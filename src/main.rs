//! Heatfilm - Thin-film Heater Stack Simulator
//!
//! Transient heat conduction in a layered heater stack.
//!
//! # Usage
//!
//! ```bash
//! heatfilm input.deck --output results/ --verbose
//! ```

use std::path::PathBuf;

use clap::Parser;
use heatfilm_core::{error::Result, input, output::FileOutput, Simulator};
use tracing::{info, Level};

/// Thin-film heater stack thermal simulator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the input deck
    #[arg(value_name = "DECK")]
    deck: PathBuf,

    /// Directory for result files
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Log every Newton iteration
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    // Read the deck
    let config = input::parse_file(&args.deck)?;

    // Build mesh and equations
    let mut simulator = Simulator::new(&config)?;

    // Integrate
    let mut sink = FileOutput::new(&args.output)?;
    let summary = simulator.run(&mut sink)?;

    info!(
        steps = summary.steps,
        time = summary.final_time,
        termination = ?summary.termination,
        "run finished"
    );

    Ok(())
}
