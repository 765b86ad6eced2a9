//! Command-line interface for seglh-qc.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **run**: Search directories for pipeline outputs and write module data files
//! - **parse**: Parse a single file with one module and print the normalized metrics
//! - **modules**: List the available modules and their default search patterns
//!
//! ## Usage
//!
//! ```text
//! # Run every module over a results directory
//! seglh-qc run /data/runs/240301_NB551068
//!
//! # Only TSO500 and som.py, JSON data files, skip negative controls
//! seglh-qc run results/ --module tso500 --module sompy --data-format json --ignore-samples 'NTC*'
//!
//! # Inspect one file
//! seglh-qc parse exomedepth results/batch1_readCount.csv --format tsv
//! ```

use clap::{Parser, Subcommand};

pub mod modules;
pub mod parse;
pub mod run;

#[derive(Parser)]
#[command(name = "seglh-qc")]
#[command(version)]
#[command(about = "Collect SEGLH pipeline QC metrics into per-sample summaries")]
#[command(
    long_about = "seglh-qc finds TSO500, ExomeDepth, sambamba/chanjo and som.py outputs under one or more directories.\n\nFor each module it:\n- Extracts per-sample metrics into a normalized sample -> metric -> value table\n- Groups metrics into report sections with column display hints\n- Writes multiqc_<module> data files and a provenance file"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run modules over one or more directories
    Run(run::RunArgs),

    /// Parse a single file with one module
    Parse(parse::ParseArgs),

    /// List available modules
    Modules,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
