//! TSO500 `MetricsOutput.tsv` report module.

use std::sync::OnceLock;

use regex::Regex;

use crate::core::sample::SampleFilter;
use crate::core::types::{SampleMetrics, SpecLimit};
use crate::modules::PLUGIN_HREF;
use crate::parsing::tso500::{parse_tso500_text, Tso500Metrics};
use crate::parsing::ParseError;
use crate::report::discovery::{InputFile, SearchPattern};
use crate::report::headers::{capitalize, ColumnHeader};
use crate::report::{MetricsModule, ModuleInfo, Section, TableSpec};

const INFO: ModuleInfo = ModuleInfo {
    key: "tso500",
    name: "TSO500 metrics",
    anchor: "tso500",
    href: PLUGIN_HREF,
    description: "Illumina TSO500 analysis blackbox plugin.",
    data_file: "multiqc_tso500",
};

fn metric_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([^\(]+)\(([^\)]+)\)").expect("metric pattern is valid"))
}

/// Column header for a `NAME (UNIT)` metric, or `None` if the name has no unit.
///
/// Unit defaults are applied first, then per-metric overrides, then the
/// spec limits as min/max.
#[must_use]
pub fn tso500_header(metric: &str, limit: SpecLimit) -> Option<ColumnHeader> {
    let caps = metric_pattern().captures(metric)?;
    let name = caps[1].trim_end().replace("PCT_", "").replace('_', " ");
    let unit = &caps[2];

    let header = ColumnHeader::new(metric, capitalize(&name)).description(metric);
    let header = match unit {
        "NA" => header.scale("RdYlGn-rev").format("{:,.2f}"),
        "Count" => header.suffix("").scale("BuPu").format("{:.0f}"),
        "bp" => header.suffix("bp").scale("RdYlGn").format("{:.0f}"),
        "%" => header
            .suffix("%")
            .range(Some(0.0), Some(100.0))
            .format("{:.0f}")
            .scale("RdYlGn"),
        _ => header.scale("RdYlGn-rev").format("{:,.0f}"),
    };

    Some(apply_override(metric, header).range(limit.lower, limit.upper))
}

fn apply_override(metric: &str, header: ColumnHeader) -> ColumnHeader {
    match metric {
        "CONTAMINATION_SCORE (NA)" => header
            .title("Contamination Score")
            .description("Estimated contamination of sample")
            .scale("Blues"),
        "CONTAMINATION_P_VALUE (NA)" => header
            .title("Contamination significance")
            .description("Contamination P-value")
            .range(Some(0.05), None)
            .suffix(" (p-value)")
            .scale("Greens")
            .format("{:,.2f}"),
        "PCT_CONTAMINATION_EST (%)" => header
            .title("Estimated contamination")
            .description("Estimated Contamination (%)")
            .suffix("%")
            .scale("Reds"),
        "COVERAGE_MAD (Count)" => header
            .title("Coverage MAD")
            .description("Median absolute deviation of coverage")
            .suffix("")
            .scale("Oranges")
            .format("{:,.3f}"),
        "PCT_EXON_50X (%)" => header.placement(990),
        "PCT_EXON_100X (%)" => header.placement(991),
        "MEDIAN_EXON_COVERAGE (Count)" => header.placement(992),
        "PCT_TARGET_0.4X_MEAN (%)" => header.placement(1001),
        "PCT_TARGET_100X (%)" => header.placement(1002),
        "PCT_TARGET_250X (%)" => header.placement(1003),
        "MEDIAN_TARGET_COVERAGE (Count)" => header.placement(1004),
        "MEAN_TARGET_COVERAGE (Count)" => header.placement(1005),
        _ => header,
    }
}

#[derive(Debug, Default)]
pub struct Tso500Module {
    data: Tso500Metrics,
}

impl Tso500Module {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn data(&self) -> &Tso500Metrics {
        &self.data
    }

    /// Columns for the metrics in one display group, in first-seen order
    fn columns(&self, metrics: &[String]) -> Vec<ColumnHeader> {
        self.data
            .metric_order
            .iter()
            .filter(|metric| metrics.contains(*metric))
            .filter_map(|metric| {
                let limit = self.data.limits.get(metric).copied().unwrap_or_default();
                tso500_header(metric, limit)
            })
            .collect()
    }
}

impl MetricsModule for Tso500Module {
    fn info(&self) -> ModuleInfo {
        INFO
    }

    fn search_pattern(&self) -> SearchPattern {
        SearchPattern::new("MetricsOutput.tsv")
    }

    fn parse(&mut self, input: &InputFile) -> Result<usize, ParseError> {
        let parsed = parse_tso500_text(&input.content)?;
        let count = parsed.samples.len();
        self.data.merge(parsed);
        Ok(count)
    }

    fn filter_samples(&mut self, filter: &SampleFilter) {
        filter.retain(&mut self.data.samples);
    }

    fn sample_count(&self) -> usize {
        self.data.samples.len()
    }

    fn export(&self) -> SampleMetrics {
        self.data.samples.clone()
    }

    fn sections(&self) -> Vec<Section> {
        self.data
            .groups
            .iter()
            .map(|(group, metrics)| {
                let rows: SampleMetrics = self
                    .data
                    .samples
                    .iter()
                    .map(|(sample, values)| {
                        let values = values
                            .iter()
                            .filter(|(metric, _)| metrics.contains(*metric))
                            .map(|(metric, value)| (metric.clone(), value.clone()))
                            .collect();
                        (sample.clone(), values)
                    })
                    .collect();

                Section {
                    name: group.clone(),
                    anchor: format!("{}-bysample", INFO.anchor),
                    description: String::new(),
                    table: TableSpec {
                        id: "tso500-sample-stats-table".to_string(),
                        title: "TSO500 Sample Statistics".to_string(),
                        namespace: INFO.key.to_string(),
                        no_beeswarm: true,
                        columns: self.columns(metrics),
                        rows,
                    },
                }
            })
            .collect()
    }
}
