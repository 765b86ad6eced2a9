//! # seglh-qc
//!
//! A library for collecting QC metrics from SEGLH genomics pipeline outputs.
//!
//! Each pipeline step writes its quality metrics in its own semi-structured
//! text format: bracket-sectioned TSV from the Illumina TSO500 app, tab-
//! delimited ExomeDepth read-count summaries, per-sample gene coverage from
//! sambamba/chanjo, and som.py benchmarking CSVs. `seglh-qc` parses all of
//! them into one normalized `sample -> metric -> value` shape that a report
//! host can render as tables.
//!
//! ## Features
//!
//! - **Format-specific parsers** on top of a shared line classifier
//! - **Display groups**: metrics are grouped into report sections, with fixed
//!   overrides for coverage and contamination metrics
//! - **Spec limits**: TSO500 lower/upper guidelines become column ranges
//! - **Discovery**: glob and content-sniffing search over result directories
//! - **Data files**: `multiqc_<module>` TSV or JSON dumps that read back losslessly
//!
//! ## Example
//!
//! ```rust
//! use seglh_qc::core::sample::DEFAULT_CLEAN_EXTENSIONS;
//! use seglh_qc::modules::ExomeDepthModule;
//! use seglh_qc::report::discovery::InputFile;
//! use seglh_qc::report::MetricsModule;
//!
//! let text = "sample\trefsamples\tcorrelations\n\
//!             NGS401_12_298765_JD_M_ONC1234_Pan4969_S1\t10\t0.987\n";
//! let input = InputFile::from_text("batch_readCount.csv", text, DEFAULT_CLEAN_EXTENSIONS);
//!
//! let mut module = ExomeDepthModule::new();
//! module.parse(&input).unwrap();
//!
//! for section in module.sections() {
//!     println!("{}: {} columns", section.name, section.table.columns.len());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Metric values, sample identifiers and sample filtering
//! - [`parsing`]: Parsers for the four pipeline output formats
//! - [`modules`]: Report modules wrapping each parser
//! - [`report`]: Module interface, discovery, data files and the runner
//! - [`config`]: Run configuration
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod config;
pub mod core;
pub mod modules;
pub mod parsing;
pub mod report;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::ReportConfig;
pub use core::types::*;
pub use report::runner::{run_all, run_module};
pub use report::{MetricsModule, ModuleOutcome, ModuleReport};
