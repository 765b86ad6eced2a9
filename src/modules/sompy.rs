//! som.py variant calling benchmark report module.

use crate::core::sample::SampleFilter;
use crate::core::types::{MetricMap, SampleMetrics};
use crate::modules::PLUGIN_HREF;
use crate::parsing::sompy::{
    category_display_name, parse_sompy_text, SompyData, CATEGORY_GROUPS,
};
use crate::parsing::ParseError;
use crate::report::discovery::{InputFile, SearchPattern};
use crate::report::headers::{ColumnHeader, Comparison, ConditionalFormat};
use crate::report::{MetricsModule, ModuleInfo, Section, TableSpec};

const INFO: ModuleInfo = ModuleInfo {
    key: "sompy",
    name: "som.py metrics",
    anchor: "sompy",
    href: PLUGIN_HREF,
    description: "som.py variant call benchmarking.",
    data_file: "multiqc_sompy",
};

/// The fixed som.py column set
#[must_use]
pub fn sompy_columns() -> Vec<ColumnHeader> {
    vec![
        ColumnHeader::new("unk", "Unknown")
            .description("Number of calls outside the confident regions")
            .hidden(),
        ColumnHeader::new("total.truth", "Truth: Total")
            .description("Total number of truth variants")
            .hidden(),
        ColumnHeader::new("total.query", "Query: Total")
            .description("Total number of query calls")
            .hidden(),
        ColumnHeader::new("tp", "True Positives")
            .description("Number of true-positive calls")
            .suffix(" variants")
            .scale("Reds"),
        ColumnHeader::new("fn", "False Negatives")
            .description("Calls in truth without matching query call")
            .suffix(" variants")
            .scale("Reds"),
        ColumnHeader::new("fp", "False Positives")
            .description("Number of false-positive calls")
            .scale("Reds")
            .hidden(),
        ColumnHeader::new("recall", "Recall")
            .description("Recall for truth variant representation = TRUTH.TP / (TRUTH.TP + TRUTH.FN)")
            .range(Some(0.0), Some(1.0))
            .format("{:.4f}")
            .conditional(ConditionalFormat::new(
                "verygreen",
                "#007000",
                &[(Comparison::Gte, 0.99)],
            ))
            .conditional(ConditionalFormat::new(
                "green",
                "#238823",
                &[(Comparison::Lt, 0.99), (Comparison::Gt, 0.98)],
            ))
            .conditional(ConditionalFormat::new(
                "amber",
                "#FFBF00",
                &[(Comparison::Lt, 0.98), (Comparison::Gt, 0.90)],
            ))
            .conditional(ConditionalFormat::new("red", "#D2222D", &[(Comparison::Lt, 0.90)])),
        ColumnHeader::new("precision", "Precision")
            .description("Precision of query variants = QUERY.TP / (QUERY.TP + QUERY.FP)")
            .range(Some(0.0), Some(1.0))
            .format("{:.4f}")
            .hidden(),
    ]
}

#[derive(Debug, Default)]
pub struct SompyModule {
    data: SompyData,
}

impl SompyModule {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn data(&self) -> &SompyData {
        &self.data
    }

    /// Rows for one variant category; samples without it are left out
    fn category_rows(&self, category: &str) -> SampleMetrics {
        self.data
            .iter()
            .filter_map(|(sample, categories)| {
                categories
                    .get(category)
                    .map(|metrics| (sample.clone(), metrics.clone()))
            })
            .collect()
    }
}

impl MetricsModule for SompyModule {
    fn info(&self) -> ModuleInfo {
        INFO
    }

    fn search_pattern(&self) -> SearchPattern {
        SearchPattern::new("*.stats.csv").with_contents(",sompyversion,sompycmd", Some(1))
    }

    fn parse(&mut self, input: &InputFile) -> Result<usize, ParseError> {
        let parsed = parse_sompy_text(&input.content);
        let count = parsed.len();
        for (sample, categories) in parsed {
            self.data.entry(sample).or_default().extend(categories);
        }
        Ok(count)
    }

    fn filter_samples(&mut self, filter: &SampleFilter) {
        filter.retain(&mut self.data);
    }

    fn sample_count(&self) -> usize {
        self.data.len()
    }

    /// Flattens categories into `{category}_{metric}` keys
    fn export(&self) -> SampleMetrics {
        self.data
            .iter()
            .map(|(sample, categories)| {
                let flat: MetricMap = categories
                    .iter()
                    .flat_map(|(category, metrics)| {
                        metrics
                            .iter()
                            .map(move |(metric, value)| {
                                (format!("{category}_{metric}"), value.clone())
                            })
                    })
                    .collect();
                (sample.clone(), flat)
            })
            .collect()
    }

    fn sections(&self) -> Vec<Section> {
        let mut categories: Vec<&str> = CATEGORY_GROUPS.iter().map(|(c, _)| *c).collect();
        categories.sort_unstable();

        categories
            .into_iter()
            .filter_map(|category| {
                let rows = self.category_rows(category);
                if rows.is_empty() {
                    return None;
                }
                let name = category_display_name(category).unwrap_or(category);
                Some(Section {
                    name: name.to_string(),
                    anchor: format!("{}-bysample", INFO.anchor),
                    description: String::new(),
                    table: TableSpec {
                        id: format!("sompy-sample-stats-table-{category}"),
                        title: format!("sompy Sample Statistics ({category})"),
                        namespace: INFO.key.to_string(),
                        no_beeswarm: true,
                        columns: sompy_columns(),
                        rows,
                    },
                })
            })
            .collect()
    }
}
