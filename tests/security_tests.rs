//! Input and output hardening tests
//!
//! Discovery walks arbitrary result directories and data files are written
//! next to them, so both sides are validated: inputs must be plain text of a
//! sane size, outputs must stay inside the data directory.

use std::fs;
use std::io::Write;

use seglh_qc::core::sample::DEFAULT_CLEAN_EXTENSIONS;
use seglh_qc::core::types::SampleMetrics;
use seglh_qc::parsing::tso500::parse_tso500_text;
use seglh_qc::parsing::ParseError;
use seglh_qc::report::datafile::{write_data_file, DataFormat};
use seglh_qc::report::discovery::{discover_inputs, SearchPattern};
use seglh_qc::report::ReportError;
use seglh_qc::utils::validation::{validate_data_file_name, ValidationError, MAX_SAMPLES};
use tempfile::TempDir;

/// Test data file names cannot escape the data directory
#[test]
fn test_data_file_name_traversal() {
    let dangerous = [
        "../../../etc/passwd",
        "..\\..\\windows\\system32",
        "/etc/passwd",
        "multiqc/../../x",
        ".multiqc_tso500",
    ];
    for name in dangerous {
        assert_eq!(
            validate_data_file_name(name),
            Err(ValidationError::InvalidFilename),
            "{name} should be rejected"
        );
    }

    let dir = TempDir::new().unwrap();
    let result = write_data_file(
        dir.path(),
        "../escape",
        &SampleMetrics::new(),
        DataFormat::Json,
    );
    assert!(matches!(result, Err(ReportError::Validation(_))));
    assert!(!dir.path().parent().unwrap().join("escape.json").exists());
}

/// Test binary files matching a search glob are skipped, not parsed
#[test]
fn test_binary_inputs_skipped() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("MetricsOutput.tsv"), b"\x1f\x8b\x08\x00\x00binary").unwrap();

    let inputs = discover_inputs(
        &[dir.path().to_path_buf()],
        &SearchPattern::new("MetricsOutput.tsv"),
        DEFAULT_CLEAN_EXTENSIONS,
    )
    .unwrap();
    assert!(inputs.is_empty());
}

/// Test a corrupt gzip input is skipped without aborting discovery
#[test]
fn test_corrupt_gzip_skipped() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.stats.csv.gz"), b"not really gzip").unwrap();

    let good = dir.path().join("b.stats.csv.gz");
    let mut encoder = flate2::write::GzEncoder::new(
        fs::File::create(&good).unwrap(),
        flate2::Compression::default(),
    );
    encoder
        .write_all(b",type,sompyversion,sompycmd\n0,SNVs,v1,som.py -o S1\n")
        .unwrap();
    encoder.finish().unwrap();

    let inputs = discover_inputs(
        &[dir.path().to_path_buf()],
        &SearchPattern::new("*.stats.csv.gz"),
        DEFAULT_CLEAN_EXTENSIONS,
    )
    .unwrap();
    assert_eq!(inputs.len(), 1);
    assert_eq!(inputs[0].sample_name, "b");
}

/// Test a header declaring an absurd number of samples is refused
#[test]
fn test_sample_column_limit() {
    let mut header = String::from("[DNA Library QC Metrics]\nMetric (UOM)\tLSL\tUSL");
    for i in 0..=MAX_SAMPLES {
        header.push_str(&format!("\tS{i}"));
    }
    header.push('\n');

    assert!(matches!(
        parse_tso500_text(&header),
        Err(ParseError::TooManySamples(n)) if n == MAX_SAMPLES + 1
    ));
}

/// Test a header at exactly the sample limit is still accepted
#[test]
fn test_sample_column_limit_boundary() {
    let mut header = String::from("[DNA Library QC Metrics]\nMetric (UOM)\tLSL\tUSL");
    for i in 0..MAX_SAMPLES {
        header.push_str(&format!("\tS{i}"));
    }
    header.push('\n');

    let parsed = parse_tso500_text(&header).unwrap();
    assert_eq!(parsed.samples.len(), MAX_SAMPLES);
}
