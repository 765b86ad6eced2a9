//! ExomeDepth CNV calling metrics report module.

use crate::core::sample::SampleFilter;
use crate::core::types::SampleMetrics;
use crate::modules::PLUGIN_HREF;
use crate::parsing::exomedepth::parse_exomedepth_text;
use crate::parsing::ParseError;
use crate::report::discovery::{InputFile, SearchPattern};
use crate::report::headers::{capitalize, ColumnHeader};
use crate::report::{MetricsModule, ModuleInfo, Section, TableSpec};

const INFO: ModuleInfo = ModuleInfo {
    key: "exomedepth",
    name: "ExomeDepth metrics",
    anchor: "exomedepth",
    href: PLUGIN_HREF,
    description: "SEGLH CNV analysis metrics.",
    data_file: "multiqc_exomedepth",
};

/// Column header for an ExomeDepth metric
#[must_use]
pub fn exomedepth_header(metric: &str) -> ColumnHeader {
    let title = capitalize(&metric.replace('.', "").replace('_', " "));
    let header = ColumnHeader::new(metric, title).description(metric);

    match metric {
        "min.refs" => header
            .title("Minimum Reference Samples")
            .description("Requested minimum number of reference samples")
            .range(Some(1.0), None)
            .suffix(" samples")
            .hidden(),
        "refsamples" => header
            .title("Reference samples")
            .description("Size of reference set")
            .range(Some(1.0), None)
            .suffix(" samples")
            .scale("Greens")
            .format("{:,.0f}"),
        "correlations" => header
            .title("Reference correlation")
            .description("Correlation of reference samples")
            .scale("RdYlGn")
            .range(Some(0.8), Some(1.0))
            .format("{:,.3f}"),
        "expected.BF" => header
            .title("Expected BF")
            .description("Expected Bayes Factor")
            .scale("Greens")
            .format("{:,.2f}"),
        "phi" => header
            .title("Dispersion")
            .description("Phi dispersion metric of fitted model")
            .scale("Greens")
            .format("{:,.2e}"),
        "RatioSd" => header.title("RatioSd").hidden(),
        "mean.p" => header.title("Mean p").hidden(),
        "median.depth" => header
            .title("Depth (median)")
            .description("Median Read Depth")
            .suffix("x")
            .format("{:,.0f}"),
        "batch.maxcor" => header
            .title("Correlation (max)")
            .description("Maximum correlation within batch")
            .range(Some(0.8), Some(1.0))
            .format("{:,.3f}"),
        "batch.mediancor" => header
            .title("Correlation (median)")
            .description("Median correlation within batch")
            .range(Some(0.8), Some(1.0))
            .format("{:,.3f}"),
        "coeff.var" => header
            .title("Variation")
            .description("Coefficient of variation (RPKM)")
            .scale("Reds")
            .format("{:,.2f}"),
        _ => header,
    }
}

#[derive(Debug, Default)]
pub struct ExomeDepthModule {
    samples: SampleMetrics,
}

impl ExomeDepthModule {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// One column per metric, ordered by first appearance across samples
    fn columns(&self) -> Vec<ColumnHeader> {
        let mut seen: Vec<&str> = Vec::new();
        for metric in self.samples.values().flat_map(|m| m.keys()) {
            if !seen.contains(&metric.as_str()) {
                seen.push(metric);
            }
        }
        seen.into_iter().map(exomedepth_header).collect()
    }
}

impl MetricsModule for ExomeDepthModule {
    fn info(&self) -> ModuleInfo {
        INFO
    }

    fn search_pattern(&self) -> SearchPattern {
        SearchPattern::new("*_readCount.csv").with_contents("refsamples", Some(1))
    }

    fn parse(&mut self, input: &InputFile) -> Result<usize, ParseError> {
        let parsed = parse_exomedepth_text(&input.content);
        let count = parsed.len();
        // a later file replaces a sample's row rather than merging into it
        self.samples.extend(parsed);
        Ok(count)
    }

    fn filter_samples(&mut self, filter: &SampleFilter) {
        filter.retain(&mut self.samples);
    }

    fn sample_count(&self) -> usize {
        self.samples.len()
    }

    fn export(&self) -> SampleMetrics {
        self.samples.clone()
    }

    fn sections(&self) -> Vec<Section> {
        vec![Section {
            name: "Sample Statistics".to_string(),
            anchor: format!("{}-bysample", INFO.anchor),
            description: "ExomeDepth metrics for each sample".to_string(),
            table: TableSpec {
                id: "exomedepth-sample-stats-table".to_string(),
                title: "Exomedepth Sample Statistics".to_string(),
                namespace: INFO.key.to_string(),
                no_beeswarm: false,
                columns: self.columns(),
                rows: self.samples.clone(),
            },
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sample::DEFAULT_CLEAN_EXTENSIONS;
    use crate::core::types::MetricValue;

    const READ_COUNT: &str = "sample\trefsamples\tmin.refs\tcorrelations\tphi\tmedian.depth\tcoeff.var
NGS401_12_298765_JD_M_ONC1234_Pan4969_S1\t10\t5\t0.987\t1.2e-05\t250\t0.45
NGS401_12_298766_JD_F_ONC1234_Pan4969_S2\t10\t5\t0.991\t3.4e-05\t180\tNA
";

    fn input(name: &str, text: &str) -> InputFile {
        InputFile::from_text(name, text, DEFAULT_CLEAN_EXTENSIONS)
    }

    #[test]
    fn test_default_titles() {
        assert_eq!(exomedepth_header("total.reads").title, "Totalreads");
        assert_eq!(exomedepth_header("mean_count").title, "Mean count");
        assert_eq!(exomedepth_header("mean_count").description, "mean_count");
    }

    #[test]
    fn test_override_table() {
        let header = exomedepth_header("correlations");
        assert_eq!(header.title, "Reference correlation");
        assert_eq!(header.min, Some(0.8));
        assert_eq!(header.max, Some(1.0));

        assert!(exomedepth_header("min.refs").hidden);
        assert!(exomedepth_header("RatioSd").hidden);
        assert_eq!(exomedepth_header("phi").format.as_deref(), Some("{:,.2e}"));
    }

    #[test]
    fn test_single_section() {
        let mut module = ExomeDepthModule::new();
        assert_eq!(module.parse(&input("run_readCount.csv", READ_COUNT)).unwrap(), 2);

        let sections = module.sections();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].anchor, "exomedepth-bysample");
        assert!(!sections[0].table.no_beeswarm);
        assert_eq!(sections[0].table.columns.len(), 6);
        assert_eq!(
            sections[0].table.rows["NGS401_12_298766_JD_F_ONC1234_Pan4969_S2"]["coeff.var"],
            MetricValue::Text("NA".to_string())
        );
    }

    #[test]
    fn test_later_file_replaces_sample() {
        let mut module = ExomeDepthModule::new();
        module.parse(&input("a_readCount.csv", READ_COUNT)).unwrap();
        module
            .parse(&input(
                "b_readCount.csv",
                "sample\trefsamples\nNGS401_12_298765_JD_M_ONC1234_Pan4969_S1\t7\n",
            ))
            .unwrap();

        let samples = module.export();
        let s1 = &samples["NGS401_12_298765_JD_M_ONC1234_Pan4969_S1"];
        assert_eq!(s1.len(), 1);
        assert_eq!(s1["refsamples"], MetricValue::Integer(7));
        assert_eq!(module.sample_count(), 2);
    }
}
