//! Host integration: the module interface and the shared machinery around it.
//!
//! A report module parses one tool's output format. Everything that is the
//! same for every format lives here instead:
//!
//! - [`discovery`]: finding input files by name glob and content sniffing
//! - [`datafile`]: writing and reading the flat `multiqc_<module>` data files
//! - [`headers`]: column display hints for the host's table renderer
//! - [`runner`]: the discover -> parse -> filter -> export sequence
//!
//! ## Outcomes
//!
//! | Situation | Result |
//! |-----------|--------|
//! | Module disabled by configuration | [`ModuleOutcome::Disabled`], no I/O |
//! | No usable samples after filtering | [`ModuleOutcome::NoData`] |
//! | Samples found | [`ModuleOutcome::Report`] with sections and provenance |
//! | A single file fails to parse | logged, other files still processed |

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ReportConfig;
use crate::core::sample::SampleFilter;
use crate::core::types::SampleMetrics;
use crate::parsing::ParseError;
use crate::utils::validation::ValidationError;

pub mod datafile;
pub mod discovery;
pub mod headers;
pub mod runner;

use discovery::{InputFile, SearchPattern};
use headers::ColumnHeader;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid search pattern: {0}")]
    Pattern(#[from] globset::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to persist data file: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("Invalid data file name: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid data file: {0}")]
    InvalidDataFile(String),

    #[error("Invalid input file: {0}")]
    InvalidInput(String),
}

/// Static description of a module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModuleInfo {
    /// Short identifier used in config and search patterns
    pub key: &'static str,
    /// Display name
    pub name: &'static str,
    /// HTML anchor for the module's sections
    pub anchor: &'static str,
    pub href: &'static str,
    pub description: &'static str,
    /// Stem of the data file written for this module
    pub data_file: &'static str,
}

/// Provenance of one parsed input file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSource {
    pub module: String,
    pub section: String,
    pub sample_name: String,
    pub source: PathBuf,
}

/// A table ready for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSpec {
    pub id: String,
    pub title: String,
    pub namespace: String,
    pub no_beeswarm: bool,
    pub columns: Vec<ColumnHeader>,
    pub rows: SampleMetrics,
}

/// One report section: a titled table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub name: String,
    pub anchor: String,
    pub description: String,
    pub table: TableSpec,
}

/// Everything a module hands back to the host
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleReport {
    pub info: ModuleInfo,
    pub samples: SampleMetrics,
    pub sections: Vec<Section>,
    pub sources: Vec<DataSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ModuleOutcome {
    /// Switched off by configuration; nothing was read or written
    Disabled,
    /// Inputs were searched but no usable sample survived
    NoData,
    Report(Box<ModuleReport>),
}

impl ModuleOutcome {
    #[must_use]
    pub fn report(&self) -> Option<&ModuleReport> {
        match self {
            Self::Report(report) => Some(report),
            _ => None,
        }
    }
}

/// A parser for one pipeline output format.
///
/// Implementations accumulate state across [`MetricsModule::parse`] calls;
/// one instance covers one report run.
pub trait MetricsModule {
    fn info(&self) -> ModuleInfo;

    fn key(&self) -> &'static str {
        self.info().key
    }

    /// Default file search pattern
    fn search_pattern(&self) -> SearchPattern;

    /// Find this module's input files under `roots`, honouring config overrides
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Pattern` if the search pattern is invalid.
    fn discover_inputs(
        &self,
        roots: &[PathBuf],
        config: &ReportConfig,
    ) -> Result<Vec<InputFile>, ReportError> {
        let pattern = config
            .search_patterns
            .get(self.key())
            .cloned()
            .unwrap_or_else(|| self.search_pattern());
        discovery::discover_inputs(roots, &pattern, &config.clean_extensions)
    }

    /// Parse one input and merge it into the module's state.
    /// Returns the number of samples the file contributed.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the file is malformed; the module's state is
    /// left unchanged in that case.
    fn parse(&mut self, input: &InputFile) -> Result<usize, ParseError>;

    /// Drop ignored samples
    fn filter_samples(&mut self, filter: &SampleFilter);

    fn sample_count(&self) -> usize;

    /// Flat sample -> metric -> value dump for the data file
    fn export(&self) -> SampleMetrics;

    /// Report sections in display order
    fn sections(&self) -> Vec<Section>;
}
