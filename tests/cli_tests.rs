//! Integration tests for the seglh-qc CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const METRICS_OUTPUT: &str = "[Header]
Output Date\t2024-03-01

[DNA Library QC Metrics]
Metric (UOM)\tLSL Guideline\tUSL Guideline\tSAMPLE_A\tSAMPLE_B
CONTAMINATION_SCORE (NA)\tNA\t3106\t212\t187
MEDIAN_INSERT_SIZE (bp)\t70\tNA\t181\t176
";

const READ_COUNT: &str = "sample\trefsamples\tcorrelations\tphi
NGS401_12_298765_JD_M_ONC1234_Pan4969_S1\t10\t0.987\t1.2e-05
NGS401_12_298766_JD_F_ONC1234_Pan4969_S2\t9\t0.991\t3.4e-05
";

const SOMPY_STATS: &str = ",type,total.truth,total.query,tp,fp,fn,unk,recall,precision,sompyversion,sompycmd
0,SNVs,100,99,98,1,2,0,0.98,0.9899,v0.3.14,som.py truth.vcf query.vcf -o /out/SAMPLE_X
";

fn write_inputs(root: &Path) {
    let run = root.join("run1");
    fs::create_dir_all(run.join("qc")).unwrap();
    fs::write(run.join("MetricsOutput.tsv"), METRICS_OUTPUT).unwrap();
    fs::write(run.join("qc").join("batch1_readCount.csv"), READ_COUNT).unwrap();
    fs::write(run.join("qc").join("SAMPLE_X.stats.csv"), SOMPY_STATS).unwrap();
    fs::write(
        run.join("NGS401_12_298765_JD_M_ONC1234_Pan4969_S1.chanjo_txt"),
        "gene_symbol\tpercent_bases_covered at 100x\nBRCA1\t99.5\n",
    )
    .unwrap();
}

fn seglh_qc() -> Command {
    Command::cargo_bin("seglh-qc").unwrap()
}

/// Test CLI binary exists and responds to --help
#[test]
fn test_cli_help() {
    seglh_qc()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("TSO500"));
}

/// Test invalid subcommand shows error
#[test]
fn test_invalid_subcommand() {
    seglh_qc()
        .arg("invalid-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

/// Test module listing in TSV form
#[test]
fn test_modules_tsv() {
    seglh_qc()
        .args(["modules", "--format", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tso500\tTSO500 metrics\tMetricsOutput.tsv"))
        .stdout(predicate::str::contains(
            "exomedepth\tExomeDepth metrics\t*_readCount.csv\trefsamples",
        ))
        .stdout(predicate::str::contains("sambamba_chanjo"))
        .stdout(predicate::str::contains("sompy"));
}

/// Test a full run writes one data file per module plus the sources file
#[test]
fn test_run_writes_data_files() {
    let temp_dir = TempDir::new().unwrap();
    write_inputs(temp_dir.path());
    let data_dir = temp_dir.path().join("out");

    seglh_qc()
        .arg("run")
        .arg(temp_dir.path().join("run1"))
        .arg("--data-dir")
        .arg(&data_dir)
        .args(["--format", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("module\tstatus\tsamples"))
        .stdout(predicate::str::contains("tso500\treport\t2\t1"))
        .stdout(predicate::str::contains("exomedepth\treport\t2\t1"))
        .stdout(predicate::str::contains("sambamba_chanjo\treport\t1\t1"))
        .stdout(predicate::str::contains("sompy\treport\t1\t1"));

    for name in [
        "multiqc_tso500.tsv",
        "multiqc_exomedepth.tsv",
        "multiqc_sambamba_chanjo.tsv",
        "multiqc_sompy.tsv",
        "multiqc_sources.tsv",
    ] {
        assert!(data_dir.join(name).exists(), "missing {name}");
    }

    let sompy = fs::read_to_string(data_dir.join("multiqc_sompy.tsv")).unwrap();
    assert!(sompy.starts_with("Sample\tSNVs_fn\tSNVs_fp\tSNVs_precision"));
    assert!(sompy.contains("SAMPLE_X\t"));
}

/// Test module selection, ignore patterns and JSON output
#[test]
fn test_run_json_with_filters() {
    let temp_dir = TempDir::new().unwrap();
    write_inputs(temp_dir.path());
    let data_dir = temp_dir.path().join("out");

    let output = seglh_qc()
        .arg("run")
        .arg(temp_dir.path())
        .arg("--data-dir")
        .arg(&data_dir)
        .args(["--module", "tso500", "--module", "exomedepth"])
        .args(["--ignore-samples", "SAMPLE_B"])
        .args(["--data-format", "json", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(summary["generated_at"].is_string());
    let modules = summary["modules"].as_array().unwrap();
    assert_eq!(modules.len(), 4);
    assert_eq!(modules[0]["status"], "report");
    assert_eq!(modules[0]["samples"], serde_json::json!(["SAMPLE_A"]));
    assert_eq!(modules[2]["status"], "disabled");
    assert_eq!(modules[3]["status"], "disabled");

    assert!(data_dir.join("multiqc_tso500.json").exists());
    assert!(!data_dir.join("multiqc_sompy.json").exists());
}

/// Test the disable switch produces no data files
#[test]
fn test_run_disabled() {
    let temp_dir = TempDir::new().unwrap();
    write_inputs(temp_dir.path());
    let data_dir = temp_dir.path().join("out");

    seglh_qc()
        .arg("run")
        .arg(temp_dir.path())
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--disable")
        .assert()
        .success()
        .stdout(predicate::str::contains("tso500: disabled"));

    assert!(!data_dir.exists());
}

/// Test a directory with no matching files is not an error
#[test]
fn test_run_empty_directory() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().join("out");

    seglh_qc()
        .arg("run")
        .arg(temp_dir.path())
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("exomedepth: no reports found"));

    assert!(!data_dir.exists());
}

/// Test unknown modules and missing directories are rejected
#[test]
fn test_run_invalid_arguments() {
    let temp_dir = TempDir::new().unwrap();

    seglh_qc()
        .arg("run")
        .arg(temp_dir.path())
        .args(["--module", "fastqc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown module 'fastqc'"));

    seglh_qc()
        .arg("run")
        .arg(temp_dir.path().join("missing"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input directory not found"));
}

/// Test parsing a single file
#[test]
fn test_parse_single_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("batch1_readCount.csv");
    fs::write(&path, READ_COUNT).unwrap();

    seglh_qc()
        .args(["parse", "exomedepth"])
        .arg(&path)
        .args(["--format", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Sample\tcorrelations\tphi\trefsamples\n"))
        .stdout(predicate::str::contains(
            "NGS401_12_298765_JD_M_ONC1234_Pan4969_S1\t0.987\t1.2e-5\t10",
        ));

    seglh_qc()
        .args(["parse", "exomedepth"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("  refsamples: 9"));
}

/// Test a malformed TSO500 file is reported as an error by `parse`
#[test]
fn test_parse_malformed_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("MetricsOutput.tsv");
    fs::write(
        &path,
        "[DNA Library QC Metrics]\nMetric (UOM)\tLSL\tUSL\tS1\nMEDIAN_INSERT_SIZE (bp)\t70\tNA\thigh\n",
    )
    .unwrap();

    seglh_qc()
        .args(["parse", "tso500"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse"));
}
