//! sambamba/chanjo gene-level coverage report module.

use std::collections::BTreeMap;

use crate::core::sample::SampleFilter;
use crate::core::types::{MetricValue, SampleMetrics};
use crate::modules::PLUGIN_HREF;
use crate::parsing::coverage::parse_coverage_text;
use crate::parsing::ParseError;
use crate::report::discovery::{InputFile, SearchPattern};
use crate::report::headers::ColumnHeader;
use crate::report::{MetricsModule, ModuleInfo, Section, TableSpec};

const INFO: ModuleInfo = ModuleInfo {
    key: "sambamba_chanjo",
    name: "sambamba_chanjo metrics",
    anchor: "sambamba_chanjo",
    href: PLUGIN_HREF,
    description: "sambamba_chanjo gene level coverage for Illumina TSO500 samples.",
    data_file: "multiqc_sambamba_chanjo",
};

/// Sample -> gene -> percentage of bases covered
type GeneCoverage = BTreeMap<String, BTreeMap<String, f64>>;

#[derive(Debug, Default)]
pub struct CoverageModule {
    coverage: GeneCoverage,
}

impl CoverageModule {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Coverage of `gene` in `sample`
    #[must_use]
    pub fn coverage(&self, sample: &str, gene: &str) -> Option<f64> {
        self.coverage.get(sample)?.get(gene).copied()
    }
}

fn gene_header(gene: &str) -> ColumnHeader {
    ColumnHeader::new(gene, gene)
        .description(format!("{gene}: percentage of bases covered at 100X"))
        .range(Some(0.0), Some(100.0))
        .suffix("%")
        .scale("Reds")
        .format("{:,.2f}")
}

impl MetricsModule for CoverageModule {
    fn info(&self) -> ModuleInfo {
        INFO
    }

    fn search_pattern(&self) -> SearchPattern {
        SearchPattern::new("*.chanjo_txt")
    }

    fn parse(&mut self, input: &InputFile) -> Result<usize, ParseError> {
        let records = parse_coverage_text(&input.file_name, &input.content);
        let mut added = 0;
        for record in records {
            let genes = self.coverage.entry(record.sample).or_default();
            if genes.insert(record.gene, record.coverage).is_none() {
                added += 1;
            }
        }
        Ok(added)
    }

    fn filter_samples(&mut self, filter: &SampleFilter) {
        filter.retain(&mut self.coverage);
    }

    fn sample_count(&self) -> usize {
        self.coverage.len()
    }

    fn export(&self) -> SampleMetrics {
        self.coverage
            .iter()
            .map(|(sample, genes)| {
                let metrics = genes
                    .iter()
                    .map(|(gene, pct)| (gene.clone(), MetricValue::Float(*pct)))
                    .collect();
                (sample.clone(), metrics)
            })
            .collect()
    }

    fn sections(&self) -> Vec<Section> {
        let mut genes: Vec<&String> = self.coverage.values().flat_map(BTreeMap::keys).collect();
        genes.sort_unstable();
        genes.dedup();

        vec![Section {
            name: "Gene coverage".to_string(),
            anchor: format!("{}-bysample", INFO.anchor),
            description: "Percentage of bases covered at 100X per gene".to_string(),
            table: TableSpec {
                id: "sambamba_chanjo-sample-stats-table".to_string(),
                title: "sambamba_chanjo Gene Coverage".to_string(),
                namespace: INFO.key.to_string(),
                no_beeswarm: true,
                columns: genes.into_iter().map(|g| gene_header(g)).collect(),
                rows: self.export(),
            },
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sample::DEFAULT_CLEAN_EXTENSIONS;

    const S1: &str = "NGS401_12_298765_JD_M_ONC1234_Pan4969_S1";

    fn input(name: &str, text: &str) -> InputFile {
        InputFile::from_text(name, text, DEFAULT_CLEAN_EXTENSIONS)
    }

    #[test]
    fn test_files_for_same_sample_merge() {
        let mut module = CoverageModule::new();
        let added = module
            .parse(&input(
                &format!("{S1}.chanjo_txt"),
                "gene_symbol\tpercent_bases_covered at 100x\nBRCA1\t99.5\n",
            ))
            .unwrap();
        assert_eq!(added, 1);
        module
            .parse(&input(&format!("{S1}.part2.chanjo_txt"), "BRCA2\t97.25\n"))
            .unwrap();

        assert_eq!(module.sample_count(), 1);
        assert_eq!(module.coverage(S1, "BRCA1"), Some(99.5));
        assert_eq!(module.coverage(S1, "BRCA2"), Some(97.25));
        assert_eq!(module.export()[S1]["BRCA2"], MetricValue::Float(97.25));
    }

    #[test]
    fn test_unmatched_file_name_adds_nothing() {
        let mut module = CoverageModule::new();
        assert_eq!(module.parse(&input("sample1.chanjo_txt", "BRCA1\t99.5\n")).unwrap(), 0);
        assert_eq!(module.sample_count(), 0);
    }

    #[test]
    fn test_one_column_per_gene() {
        let mut module = CoverageModule::new();
        module
            .parse(&input(&format!("{S1}.chanjo_txt"), "TP53\t100\nBRCA1\t99.5\n"))
            .unwrap();

        let sections = module.sections();
        assert_eq!(sections.len(), 1);
        let keys: Vec<&str> = sections[0].table.columns.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["BRCA1", "TP53"]);
        assert_eq!(sections[0].table.columns[0].suffix.as_deref(), Some("%"));
    }
}
