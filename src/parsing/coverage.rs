//! Parser for sambamba/chanjo gene-level coverage files.
//!
//! One file per sample, named after the sample, one gene per line:
//!
//! ```text
//! gene_symbol	percent_bases_covered at 100x
//! BRCA1	99.87
//! BRCA2	98.12
//! ```
//!
//! The header line is optional. When a row has more than two columns the
//! first is the gene symbol and the last the coverage percentage.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::sample::extract_sample_id;
use crate::parsing::lines::{classify, HeaderRule, LineKind, LineRules};

pub const COVERAGE_HEADER_SUFFIX: &str = "percent_bases_covered at 100x";

pub const COVERAGE_RULES: LineRules = LineRules {
    delimiter: '\t',
    header: HeaderRule::Suffix(COVERAGE_HEADER_SUFFIX),
    sections: false,
};

/// Percentage of a gene's bases covered at the target depth, for one sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageRecord {
    pub sample: String,
    pub gene: String,
    pub coverage: f64,
}

/// Parse a coverage file. The sample comes from `file_name`; a file name that
/// does not follow the sample naming convention yields no records.
#[must_use]
pub fn parse_coverage_text(file_name: &str, text: &str) -> Vec<CoverageRecord> {
    let Some(sample) = extract_sample_id(file_name) else {
        debug!(file = file_name, "File name does not contain a sample identifier");
        return Vec::new();
    };

    let mut records = Vec::new();
    for line in classify(text, COVERAGE_RULES) {
        let LineKind::Data(fields) = line.kind else {
            continue;
        };
        if fields.len() < 2 {
            debug!(line = line.number, "Skipping row without a coverage value");
            continue;
        }

        let gene = fields[0].trim();
        let raw = fields[fields.len() - 1].trim();
        match raw.parse::<f64>() {
            Ok(coverage) if !gene.is_empty() && coverage.is_finite() => {
                records.push(CoverageRecord {
                    sample: sample.to_string(),
                    gene: gene.to_string(),
                    coverage,
                });
            }
            _ => debug!(line = line.number, gene, value = raw, "Skipping invalid coverage row"),
        }
    }

    records
}
