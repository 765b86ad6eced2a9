//! Parser for som.py benchmarking output (`*.stats.csv`).
//!
//! som.py writes one row per variant category. The sample is not part of the
//! file name; it is the basename of the `-o` output prefix in the command line
//! recorded in the `sompycmd` column.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::core::types::{MetricMap, MetricValue};
use crate::parsing::lines::{classify, HeaderRule, LineKind, LineRules};

pub const SOMPY_RULES: LineRules = LineRules {
    delimiter: ',',
    header: HeaderRule::Suffix("sompyversion,sompycmd"),
    sections: false,
};

/// Column holding the som.py command line
pub const COMMAND_FIELD: &str = "sompycmd";

/// Variant category -> display group
pub const CATEGORY_GROUPS: &[(&str, &str)] = &[
    ("records", "Combined Benchmark"),
    ("SNVs", "SNV Benchmark"),
    ("indels", "Indel Benchmark"),
];

/// Sample -> variant category -> metrics
pub type SompyData = BTreeMap<String, BTreeMap<String, MetricMap>>;

fn output_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?:^|\s)-o\s*(\S+)").expect("output pattern is valid"))
}

/// Display group for a som.py variant category
///
/// # Examples
///
/// ```
/// use seglh_qc::parsing::sompy::category_display_name;
///
/// assert_eq!(category_display_name("SNVs"), Some("SNV Benchmark"));
/// assert_eq!(category_display_name("indels"), Some("Indel Benchmark"));
/// assert_eq!(category_display_name("unknown"), None);
/// ```
#[must_use]
pub fn category_display_name(category: &str) -> Option<&'static str> {
    CATEGORY_GROUPS
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, display)| *display)
}

/// Sample name from a som.py command line: basename of the last `-o` argument
#[must_use]
pub fn sample_from_command(command: &str) -> Option<String> {
    let output = output_pattern()
        .captures_iter(command)
        .last()?
        .get(1)?
        .as_str();
    Path::new(output)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
}

/// Parse som.py stats text into sample -> category -> metrics.
///
/// Rows without a preceding header, without a command column or without an
/// `-o` argument are skipped. A repeated (sample, category) keeps the last row.
#[must_use]
pub fn parse_sompy_text(text: &str) -> SompyData {
    let mut data = SompyData::new();
    let mut header: Vec<&str> = Vec::new();

    for line in classify(text, SOMPY_RULES) {
        match line.kind {
            LineKind::ColumnHeader(fields) => header = fields,
            LineKind::Data(fields) => {
                if header.is_empty() || fields.len() < 2 {
                    debug!(line = line.number, "Skipping row without header or category");
                    continue;
                }

                let category = fields[1].to_string();
                let metrics: MetricMap = header
                    .iter()
                    .skip(2)
                    .zip(fields.iter().skip(2))
                    .filter(|(_, raw)| !raw.is_empty())
                    .map(|(name, raw)| ((*name).to_string(), MetricValue::infer(raw)))
                    .collect();

                let Some(sample) = metrics
                    .get(COMMAND_FIELD)
                    .and_then(MetricValue::as_text)
                    .and_then(sample_from_command)
                else {
                    debug!(line = line.number, category, "Skipping row without an output name");
                    continue;
                };

                data.entry(sample).or_default().insert(category, metrics);
            }
            LineKind::Section(_) | LineKind::Comment | LineKind::Blank => {}
        }
    }

    data
}
