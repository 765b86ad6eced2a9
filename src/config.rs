//! Run configuration.
//!
//! Loaded from an optional JSON file and then overridden from the command
//! line. The resulting value is passed explicitly to every module run.
//!
//! ```json
//! {
//!   "disabled": false,
//!   "modules": ["tso500", "sompy"],
//!   "ignore_samples": ["NTC*"],
//!   "data_dir": "multiqc_data",
//!   "data_format": "json",
//!   "search_patterns": {
//!     "tso500": { "fn": "*MetricsOutput.tsv" }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::sample::{SampleFilter, DEFAULT_CLEAN_EXTENSIONS};
use crate::report::datafile::DataFormat;
use crate::report::discovery::SearchPattern;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid sample ignore pattern: {0}")]
    InvalidPattern(#[from] globset::Error),
}

/// Default output directory for data files
pub const DEFAULT_DATA_DIR: &str = "multiqc_data";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Turn every module into a no-op
    pub disabled: bool,

    /// Restrict the run to these module keys; all modules when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modules: Option<Vec<String>>,

    /// Glob patterns of sample names to drop after parsing
    pub ignore_samples: Vec<String>,

    /// Where data files are written
    pub data_dir: PathBuf,

    pub data_format: DataFormat,

    /// Per-module replacements for the default search patterns
    pub search_patterns: BTreeMap<String, SearchPattern>,

    /// Extensions stripped from file names to derive sample names
    pub clean_extensions: Vec<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            disabled: false,
            modules: None,
            ignore_samples: Vec::new(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            data_format: DataFormat::default(),
            search_patterns: BTreeMap::new(),
            clean_extensions: DEFAULT_CLEAN_EXTENSIONS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

impl ReportConfig {
    /// Load configuration from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadError` if the file cannot be read or
    /// `ConfigError::ParseError` if it is not a valid configuration.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse configuration from a JSON string; missing fields take defaults
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` for invalid JSON or unknown fields.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Whether the module with `key` should run
    #[must_use]
    pub fn is_module_enabled(&self, key: &str) -> bool {
        if self.disabled {
            return false;
        }
        self.modules
            .as_ref()
            .map_or(true, |keys| keys.iter().any(|k| k == key))
    }

    /// Compile the sample ignore patterns
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPattern` for an invalid glob.
    pub fn sample_filter(&self) -> Result<SampleFilter, ConfigError> {
        Ok(SampleFilter::new(&self.ignore_samples)?)
    }
}
