//! Parser for Illumina TSO500 `MetricsOutput.tsv` files.
//!
//! The file is a series of bracketed sections separated by blank lines:
//!
//! ```text
//! [Header]
//! Output Date	2024-03-01
//!
//! [DNA Library QC Metrics]
//! Metric (UOM)	LSL Guideline	USL Guideline	SAMPLE_A	SAMPLE_B
//! CONTAMINATION_SCORE (NA)	NA	3106	212	187
//! MEDIAN_INSERT_SIZE (bp)	70	NA	181	176
//! ```
//!
//! Only `DNA*` sections carry per-sample values. `[Header]` content is
//! discarded, other sections are ignored.

use std::collections::BTreeMap;

use tracing::debug;

use crate::core::types::{MetricGroups, MetricValue, SampleMetrics, SpecLimit};
use crate::parsing::lines::{classify, HeaderRule, LineKind, LineRules};
use crate::parsing::ParseError;
use crate::utils::validation::check_sample_limit;

pub const TSO500_RULES: LineRules = LineRules {
    delimiter: '\t',
    header: HeaderRule::Prefix("Metric "),
    sections: true,
};

/// Section whose content is global run information, not sample metrics
pub const HEADER_SECTION: &str = "Header";

/// Metrics displayed in a fixed group regardless of the section they appear in
pub const SPECIAL_GROUPS: &[(&str, &str)] = &[
    ("PCT_EXON_100X (%)", "Coverage metrics"),
    ("PCT_EXON_50X (%)", "Coverage metrics"),
    ("MEAN_TARGET_COVERAGE (Count)", "Coverage metrics"),
    ("MEDIAN_TARGET_COVERAGE (Count)", "Coverage metrics"),
    ("MEDIAN_EXON_COVERAGE (Count)", "Coverage metrics"),
    ("PCT_TARGET_0.4X_MEAN (%)", "Coverage metrics"),
    ("PCT_TARGET_100X (%)", "Coverage metrics"),
    ("PCT_TARGET_250X (%)", "Coverage metrics"),
    ("CONTAMINATION_P_VALUE (NA)", "Contamination"),
    ("PCT_CONTAMINATION_EST (%)", "Contamination"),
    ("CONTAMINATION_SCORE (NA)", "Contamination"),
];

/// Fixed display group for `metric`, if it has one
#[must_use]
pub fn special_group(metric: &str) -> Option<&'static str> {
    SPECIAL_GROUPS
        .iter()
        .find(|(name, _)| *name == metric)
        .map(|(_, group)| *group)
}

/// Display group for a metric found in `section`
#[must_use]
pub fn display_group<'a>(metric: &str, section: &'a str) -> &'a str {
    special_group(metric).unwrap_or(section)
}

/// Everything extracted from one or more TSO500 metrics files
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tso500Metrics {
    /// Sample -> metric -> value (always floats)
    pub samples: SampleMetrics,
    /// Metric -> spec limits
    pub limits: BTreeMap<String, SpecLimit>,
    /// Metric names in the order they were first seen
    pub metric_order: Vec<String>,
    /// Display group -> metrics
    pub groups: MetricGroups,
}

impl Tso500Metrics {
    /// Merge `other` into `self`. Later limits replace earlier ones.
    pub fn merge(&mut self, other: Tso500Metrics) {
        for (sample, metrics) in other.samples {
            self.samples.entry(sample).or_default().extend(metrics);
        }
        for metric in other.metric_order {
            if !self.limits.contains_key(&metric) {
                self.metric_order.push(metric);
            }
        }
        self.limits.extend(other.limits);
        self.groups.extend(&other.groups);
    }

    fn record_limit(&mut self, metric: &str, limit: SpecLimit) {
        if self.limits.insert(metric.to_string(), limit).is_none() {
            self.metric_order.push(metric.to_string());
        }
    }
}

/// Parse a TSO500 metrics file.
///
/// # Errors
///
/// Returns `ParseError::TooFewFields` if a `DNA*` data row has fewer than three
/// fields or fewer values than declared sample columns,
/// `ParseError::InvalidValue` if a limit or value is not a number, or
/// `ParseError::TooManySamples` if a header declares too many samples.
pub fn parse_tso500_text(text: &str) -> Result<Tso500Metrics, ParseError> {
    let mut parsed = Tso500Metrics::default();
    let mut group: Option<&str> = None;
    let mut sample_names: Vec<&str> = Vec::new();

    for line in classify(text, TSO500_RULES) {
        match line.kind {
            LineKind::Comment => {}
            LineKind::Blank => {
                group = None;
                sample_names.clear();
            }
            LineKind::Section(label) => group = Some(label),
            LineKind::ColumnHeader(fields) | LineKind::Data(fields)
                if !group.is_some_and(|g| g.starts_with("DNA")) =>
            {
                if group == Some(HEADER_SECTION) {
                    debug!(line = line.number, field = fields[0], "Skipping header metric");
                }
            }
            LineKind::ColumnHeader(fields) => {
                sample_names = fields.into_iter().skip(3).collect();
                if check_sample_limit(sample_names.len()).is_some() {
                    return Err(ParseError::TooManySamples(sample_names.len()));
                }
                for sample in &sample_names {
                    parsed.samples.entry((*sample).to_string()).or_default();
                }
            }
            LineKind::Data(fields) => {
                let section = group.unwrap_or_default();
                parse_data_row(&mut parsed, section, &sample_names, &fields, line.number)?;
            }
        }
    }

    Ok(parsed)
}

fn parse_data_row(
    parsed: &mut Tso500Metrics,
    section: &str,
    sample_names: &[&str],
    fields: &[&str],
    line: usize,
) -> Result<(), ParseError> {
    if fields.len() < 3 {
        return Err(ParseError::TooFewFields {
            line,
            expected: 3,
            found: fields.len(),
        });
    }

    let metric = fields[0];
    let bound = |raw: &str, which: &str| {
        SpecLimit::parse_bound(raw).map_err(|_| ParseError::InvalidValue {
            line,
            field: format!("{metric} {which}"),
            value: raw.to_string(),
        })
    };
    let limit = SpecLimit::new(bound(fields[1], "LSL")?, bound(fields[2], "USL")?);
    parsed.record_limit(metric, limit);
    parsed.groups.assign(display_group(metric, section), metric);

    let values = &fields[3..];
    if values.len() < sample_names.len() {
        return Err(ParseError::TooFewFields {
            line,
            expected: 3 + sample_names.len(),
            found: fields.len(),
        });
    }

    for (sample, raw) in sample_names.iter().zip(values) {
        let raw = raw.trim();
        if raw.is_empty() || raw == "NA" {
            debug!(line, sample, metric, "No value reported");
            continue;
        }
        let value: f64 = raw
            .parse()
            .ok()
            .filter(|v: &f64| v.is_finite())
            .ok_or_else(|| ParseError::InvalidValue {
                line,
                field: format!("{metric} ({sample})"),
                value: raw.to_string(),
            })?;
        parsed
            .samples
            .entry((*sample).to_string())
            .or_default()
            .insert(metric.to_string(), MetricValue::Float(value));
    }

    Ok(())
}
