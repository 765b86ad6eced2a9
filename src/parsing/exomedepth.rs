//! Parser for ExomeDepth read-count metrics (`*_readCount.csv`).
//!
//! Despite the extension these files are tab-delimited. The first record is
//! the header and must start with `sample`; every following row describes one
//! sample, identified by the lab naming convention in its first column.

use tracing::debug;

use crate::core::sample::extract_sample_id;
use crate::core::types::{MetricMap, MetricValue, SampleMetrics};
use crate::parsing::lines::{classify, HeaderRule, LineKind, LineRules};

pub const EXOMEDEPTH_RULES: LineRules = LineRules {
    delimiter: '\t',
    header: HeaderRule::FirstRecordPrefix("sample"),
    sections: false,
};

/// Parse ExomeDepth metrics text.
///
/// Rows whose first field is not a valid sample identifier are skipped. A
/// sample seen twice keeps only its last row. Empty cells are left out of
/// the sample's metrics.
#[must_use]
pub fn parse_exomedepth_text(text: &str) -> SampleMetrics {
    let mut samples = SampleMetrics::new();
    let mut header: Option<Vec<&str>> = None;

    for line in classify(text, EXOMEDEPTH_RULES) {
        match line.kind {
            LineKind::ColumnHeader(fields) => header = Some(fields),
            LineKind::Data(fields) => {
                let Some(sample) = extract_sample_id(fields[0]) else {
                    debug!(
                        line = line.number,
                        id = fields[0],
                        "Skipping row without a sample identifier"
                    );
                    continue;
                };
                let Some(header) = header.as_ref() else {
                    debug!(line = line.number, sample, "Skipping row before header");
                    continue;
                };
                if fields.len() != header.len() {
                    debug!(
                        line = line.number,
                        sample,
                        expected = header.len(),
                        found = fields.len(),
                        "Field count does not match header"
                    );
                }

                let metrics: MetricMap = header
                    .iter()
                    .skip(1)
                    .zip(fields.iter().skip(1))
                    .filter(|(_, raw)| !raw.is_empty())
                    .map(|(name, raw)| ((*name).to_string(), MetricValue::infer(raw)))
                    .collect();

                if samples.insert(sample.to_string(), metrics).is_some() {
                    debug!(line = line.number, sample, "Replacing earlier row for sample");
                }
            }
            LineKind::Section(_) | LineKind::Comment | LineKind::Blank => {}
        }
    }

    samples
}
