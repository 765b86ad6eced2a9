//! Parsers for pipeline QC output files.
//!
//! This module provides parsers for:
//!
//! - **TSO500 `MetricsOutput.tsv`**: bracket-sectioned metrics with spec limits
//! - **ExomeDepth read-count metrics**: one row per sample, tab-delimited
//! - **sambamba/chanjo gene coverage**: gene -> percentage covered, one file per sample
//! - **som.py benchmark stats**: comma-delimited, one row per variant category
//!
//! All of them sit on top of the shared line classifier in [`lines`].
//!
//! ## Example
//!
//! ```rust
//! use seglh_qc::parsing::tso500::parse_tso500_text;
//!
//! let text = "[DNA Library QC Metrics]\n\
//!             Metric (UOM)\tLSL Guideline\tUSL Guideline\tS1\n\
//!             MEDIAN_INSERT_SIZE (bp)\t70\tNA\t180\n";
//! let parsed = parse_tso500_text(text).unwrap();
//! assert_eq!(parsed.samples["S1"].len(), 1);
//! ```
//!
//! ## Failure policy
//!
//! | Condition | Result |
//! |-----------|--------|
//! | Row whose sample id fails the naming convention | skipped, logged at debug |
//! | Row with fewer fields than the header declares (ExomeDepth) | truncated, logged at debug |
//! | TSO500 row with fewer values than sample columns | [`ParseError::TooFewFields`] |
//! | TSO500 limit or value that is not a number | [`ParseError::InvalidValue`] |

use thiserror::Error;

pub mod coverage;
pub mod exomedepth;
pub mod lines;
pub mod sompy;
pub mod tso500;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Line {line}: expected at least {expected} fields, found {found}")]
    TooFewFields {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Line {line}: invalid value for '{field}': '{value}'")]
    InvalidValue {
        line: usize,
        field: String,
        value: String,
    },

    #[error(
        "Too many samples: {0} exceeds maximum allowed ({max})",
        max = crate::utils::validation::MAX_SAMPLES
    )]
    TooManySamples(usize),
}
