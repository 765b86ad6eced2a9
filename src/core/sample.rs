//! Sample identifiers and sample-level filtering.
//!
//! Lab sample names follow a fixed convention:
//!
//! ```text
//! NGS123_01_456789_AB_M_CODE_Pan4567_S1
//! │      │  │      │  │ │    │       └── optional sequencer suffix
//! │      │  │      │  │ │    └── panel number
//! │      │  │      │  │ └── arbitrary code
//! │      │  │      │  └── sex marker (M, F or U)
//! │      │  │      └── two-letter code
//! │      │  └── lab id
//! │      └── two-digit batch
//! └── project/plate code
//! ```

use std::collections::BTreeMap;
use std::sync::OnceLock;

use globset::{Glob, GlobSet, GlobSetBuilder};
use regex::Regex;

fn sample_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([^_]+_\d{2}_[^_]+_\w{2}_[MFU]_[^_]+_Pan\d+(?:_S\d+)?)")
            .expect("sample pattern is valid")
    })
}

/// Extract the sample identifier from the start of `text`.
///
/// Anything after the identifier (lane suffixes, file extensions) is ignored.
///
/// # Examples
///
/// ```
/// use seglh_qc::core::sample::extract_sample_id;
///
/// assert_eq!(
///     extract_sample_id("NGS123_01_456789_AB_M_CODE_Pan4567_S1_R1.bam"),
///     Some("NGS123_01_456789_AB_M_CODE_Pan4567_S1")
/// );
/// assert_eq!(extract_sample_id("refsamples"), None);
/// ```
#[must_use]
pub fn extract_sample_id(text: &str) -> Option<&str> {
    sample_pattern()
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Extensions stripped from file names when deriving a sample name
pub const DEFAULT_CLEAN_EXTENSIONS: &[&str] = &[
    ".gz",
    ".tsv",
    ".csv",
    ".txt",
    ".chanjo_txt",
    ".stats",
    "_readCount",
];

/// Derive a display sample name from a file name by repeatedly stripping
/// known trailing extensions.
#[must_use]
pub fn clean_sample_name<S: AsRef<str>>(file_name: &str, extensions: &[S]) -> String {
    let mut name = file_name;
    loop {
        let stripped = extensions.iter().find_map(|ext| {
            let ext: &str = ext.as_ref();
            if ext.is_empty() {
                return None;
            }
            name.strip_suffix(ext).filter(|rest| !rest.is_empty())
        });
        match stripped {
            Some(rest) => name = rest,
            None => break,
        }
    }
    name.to_string()
}

/// Glob-based sample exclusion applied after parsing
#[derive(Debug, Clone)]
pub struct SampleFilter {
    patterns: Vec<String>,
    set: GlobSet,
}

impl SampleFilter {
    /// Build a filter from glob patterns (e.g. `NTC_*`, `*_Pan0000*`)
    ///
    /// # Errors
    ///
    /// Returns the glob error for an invalid pattern.
    pub fn new(patterns: &[String]) -> Result<Self, globset::Error> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            builder.add(Glob::new(pattern)?);
        }
        Ok(Self {
            patterns: patterns.to_vec(),
            set: builder.build()?,
        })
    }

    /// A filter that keeps everything
    #[must_use]
    pub fn none() -> Self {
        Self {
            patterns: Vec::new(),
            set: GlobSet::empty(),
        }
    }

    #[must_use]
    pub fn is_ignored(&self, sample: &str) -> bool {
        !self.patterns.is_empty() && self.set.is_match(sample)
    }

    /// Remove ignored samples in place; returns how many were dropped
    pub fn retain<V>(&self, samples: &mut BTreeMap<String, V>) -> usize {
        let before = samples.len();
        samples.retain(|name, _| !self.is_ignored(name));
        before - samples.len()
    }
}

impl Default for SampleFilter {
    fn default() -> Self {
        Self::none()
    }
}
