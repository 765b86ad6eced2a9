//! Flat data files written alongside the report for downstream reuse.
//!
//! Each module dumps its normalized `sample -> metric -> value` map as either
//! a TSV table (one row per sample, one column per metric) or a JSON object.
//! Both formats read back into the same structure.

use std::collections::BTreeSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::core::types::{MetricMap, MetricValue, SampleMetrics};
use crate::report::{DataSource, ReportError};
use crate::utils::validation::validate_data_file_name;

/// First column of a TSV data file
const SAMPLE_COLUMN: &str = "Sample";

/// Serialization used for data files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DataFormat {
    #[default]
    Tsv,
    Json,
}

impl DataFormat {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Tsv => "tsv",
            Self::Json => "json",
        }
    }

    /// Format implied by a file extension
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_lowercase().as_str() {
            "tsv" | "txt" => Some(Self::Tsv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Cell text for TSV output; tabs and newlines would break the row
fn tsv_cell(value: &str) -> String {
    value.replace(['\t', '\n', '\r'], " ")
}

/// Render samples as a TSV table. Columns are the union of all metric names.
#[must_use]
pub fn samples_to_tsv(samples: &SampleMetrics) -> String {
    let columns: BTreeSet<&String> = samples.values().flat_map(MetricMap::keys).collect();

    let mut out = String::from(SAMPLE_COLUMN);
    for column in &columns {
        out.push('\t');
        out.push_str(&tsv_cell(column));
    }
    out.push('\n');

    for (sample, metrics) in samples {
        out.push_str(&tsv_cell(sample));
        for column in &columns {
            out.push('\t');
            if let Some(value) = metrics.get(*column) {
                out.push_str(&tsv_cell(&value.to_string()));
            }
        }
        out.push('\n');
    }
    out
}

/// Parse a TSV data file back into samples. Empty cells are treated as missing.
///
/// # Errors
///
/// Returns `ReportError::InvalidDataFile` if the header is missing or does
/// not start with the sample column.
pub fn samples_from_tsv(text: &str) -> Result<SampleMetrics, ReportError> {
    let mut lines = text.lines();
    let header: Vec<&str> = lines
        .next()
        .map(|l| l.split('\t').collect())
        .unwrap_or_default();
    if header.first() != Some(&SAMPLE_COLUMN) {
        return Err(ReportError::InvalidDataFile(format!(
            "expected first column '{SAMPLE_COLUMN}'"
        )));
    }

    let mut samples = SampleMetrics::new();
    for line in lines.filter(|l| !l.trim().is_empty()) {
        let mut fields = line.split('\t');
        let Some(sample) = fields.next() else {
            continue;
        };
        let metrics: MetricMap = header[1..]
            .iter()
            .zip(fields)
            .filter(|(_, raw)| !raw.is_empty())
            .map(|(name, raw)| ((*name).to_string(), MetricValue::infer(raw)))
            .collect();
        samples.insert(sample.to_string(), metrics);
    }
    Ok(samples)
}

/// Write `contents` to `dir/name.ext` through a temporary file so readers
/// never see a partial file.
fn write_atomic(
    dir: &Path,
    name: &str,
    format: DataFormat,
    contents: &[u8],
) -> Result<PathBuf, ReportError> {
    let name = validate_data_file_name(name)?;
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{name}.{}", format.extension()));

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.flush()?;
    tmp.persist(&path)?;
    Ok(path)
}

/// Write a module's normalized data to `dir/name.{tsv,json}`
///
/// # Errors
///
/// Returns `ReportError::Validation` for an unsafe name, `ReportError::Io` or
/// `ReportError::Persist` if the file cannot be written, or
/// `ReportError::Json` if serialization fails.
pub fn write_data_file(
    dir: &Path,
    name: &str,
    samples: &SampleMetrics,
    format: DataFormat,
) -> Result<PathBuf, ReportError> {
    let contents = match format {
        DataFormat::Tsv => samples_to_tsv(samples),
        DataFormat::Json => serde_json::to_string_pretty(samples)?,
    };
    write_atomic(dir, name, format, contents.as_bytes())
}

/// Read a data file written by [`write_data_file`]
///
/// # Errors
///
/// Returns `ReportError::Io` if the file cannot be read,
/// `ReportError::InvalidDataFile` for an unknown extension or malformed TSV,
/// or `ReportError::Json` for malformed JSON.
pub fn read_data_file(path: &Path) -> Result<SampleMetrics, ReportError> {
    let format = DataFormat::from_path(path).ok_or_else(|| {
        ReportError::InvalidDataFile(format!("unknown data file type: {}", path.display()))
    })?;
    let text = std::fs::read_to_string(path)?;
    match format {
        DataFormat::Tsv => samples_from_tsv(&text),
        DataFormat::Json => Ok(serde_json::from_str(&text)?),
    }
}

/// Write the provenance of every parsed input to `dir/multiqc_sources.{tsv,json}`
///
/// # Errors
///
/// Same as [`write_data_file`].
pub fn write_sources_file(
    dir: &Path,
    sources: &[DataSource],
    format: DataFormat,
) -> Result<PathBuf, ReportError> {
    let contents = match format {
        DataFormat::Tsv => {
            let mut out = String::from("Module\tSection\tSample Name\tSource\n");
            for source in sources {
                out.push_str(&format!(
                    "{}\t{}\t{}\t{}\n",
                    tsv_cell(&source.module),
                    tsv_cell(&source.section),
                    tsv_cell(&source.sample_name),
                    tsv_cell(&source.source.display().to_string()),
                ));
            }
            out
        }
        DataFormat::Json => serde_json::to_string_pretty(sources)?,
    };
    write_atomic(dir, "multiqc_sources", format, contents.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_data() -> SampleMetrics {
        let mut samples = SampleMetrics::new();
        let s1 = samples.entry("S1".to_string()).or_default();
        s1.insert("phi".to_string(), MetricValue::Float(1.2e-5));
        s1.insert("refsamples".to_string(), MetricValue::Integer(10));
        s1.insert("correlations".to_string(), MetricValue::Float(1.0));
        let s2 = samples.entry("S2".to_string()).or_default();
        s2.insert("refsamples".to_string(), MetricValue::Integer(8));
        s2.insert("note".to_string(), MetricValue::Text("low depth".to_string()));
        samples
    }

    #[test]
    fn test_tsv_layout() {
        let tsv = samples_to_tsv(&sample_data());
        let lines: Vec<&str> = tsv.lines().collect();
        assert_eq!(lines[0], "Sample\tcorrelations\tnote\tphi\trefsamples");
        assert_eq!(lines[1], "S1\t1.0\t\t1.2e-5\t10");
        assert_eq!(lines[2], "S2\t\tlow depth\t\t8");
    }

    #[test]
    fn test_tsv_and_json_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let data = sample_data();

        for format in [DataFormat::Tsv, DataFormat::Json] {
            let path = write_data_file(dir.path(), "multiqc_exomedepth", &data, format).unwrap();
            assert_eq!(path.extension().unwrap(), format.extension());
            assert_eq!(read_data_file(&path).unwrap(), data);
        }
    }

    #[test]
    fn test_rejects_unsafe_name() {
        let dir = tempfile::tempdir().unwrap();
        let result = write_data_file(dir.path(), "../escape", &sample_data(), DataFormat::Tsv);
        assert!(matches!(result, Err(ReportError::Validation(_))));
    }

    #[test]
    fn test_invalid_tsv_header() {
        assert!(matches!(
            samples_from_tsv("Name\tphi\nS1\t0.1\n"),
            Err(ReportError::InvalidDataFile(_))
        ));
    }

    #[test]
    fn test_sources_file() {
        let dir = tempfile::tempdir().unwrap();
        let sources = vec![DataSource {
            module: "tso500".to_string(),
            section: "tso500-bysample".to_string(),
            sample_name: "MetricsOutput".to_string(),
            source: PathBuf::from("/runs/r1/MetricsOutput.tsv"),
        }];
        let path = write_sources_file(dir.path(), &sources, DataFormat::Tsv).unwrap();
        let text = std::fs::read_to_string(path).unwrap();
        assert_eq!(
            text,
            "Module\tSection\tSample Name\tSource\ntso500\ttso500-bysample\tMetricsOutput\t/runs/r1/MetricsOutput.tsv\n"
        );
    }
}
