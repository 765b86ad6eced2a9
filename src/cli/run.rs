use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Args;

use crate::cli::OutputFormat;
use crate::config::ReportConfig;
use crate::modules::module_keys;
use crate::report::datafile::DataFormat;
use crate::report::runner::run_all;
use crate::report::ModuleOutcome;

#[derive(Args)]
pub struct RunArgs {
    /// Directories to search for pipeline outputs
    #[arg(required = true)]
    pub dirs: Vec<PathBuf>,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Only run these modules (repeatable)
    #[arg(short, long = "module")]
    pub modules: Vec<String>,

    /// Glob of sample names to leave out (repeatable)
    #[arg(long = "ignore-samples")]
    pub ignore_samples: Vec<String>,

    /// Directory for data files
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Data file format
    #[arg(long)]
    pub data_format: Option<DataFormat>,

    /// Disable all modules
    #[arg(long)]
    pub disable: bool,
}

impl RunArgs {
    /// Load the configuration file, if any, and apply command-line overrides
    fn resolve_config(&self) -> anyhow::Result<ReportConfig> {
        let mut config = match &self.config {
            Some(path) => ReportConfig::load_from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => ReportConfig::default(),
        };

        if self.disable {
            config.disabled = true;
        }
        if !self.modules.is_empty() {
            config.modules = Some(self.modules.clone());
        }
        config.ignore_samples.extend(self.ignore_samples.iter().cloned());
        if let Some(dir) = &self.data_dir {
            config.data_dir.clone_from(dir);
        }
        if let Some(format) = self.data_format {
            config.data_format = format;
        }

        let known = module_keys();
        for key in config.modules.iter().flatten() {
            if !known.contains(&key.as_str()) {
                bail!(
                    "Unknown module '{key}'. Available modules: {}",
                    known.join(", ")
                );
            }
        }

        Ok(config)
    }
}

pub fn run(args: RunArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    for dir in &args.dirs {
        if !dir.is_dir() {
            bail!("Input directory not found: {}", dir.display());
        }
    }

    let config = args.resolve_config()?;

    if verbose {
        eprintln!(
            "Searching {} director{} (data files -> {})",
            args.dirs.len(),
            if args.dirs.len() == 1 { "y" } else { "ies" },
            config.data_dir.display()
        );
    }

    let outcomes = run_all(&config, &args.dirs)?;

    match format {
        OutputFormat::Text => print_text_summary(&outcomes),
        OutputFormat::Json => print_json_summary(&config, &outcomes)?,
        OutputFormat::Tsv => print_tsv_summary(&outcomes),
    }

    Ok(())
}

fn status(outcome: &ModuleOutcome) -> &'static str {
    match outcome {
        ModuleOutcome::Disabled => "disabled",
        ModuleOutcome::NoData => "no_data",
        ModuleOutcome::Report(_) => "report",
    }
}

fn print_text_summary(outcomes: &[(&'static str, ModuleOutcome)]) {
    println!("Module Results");
    println!("{}", "=".repeat(60));

    for (key, outcome) in outcomes {
        match outcome {
            ModuleOutcome::Disabled => println!("\n{key}: disabled"),
            ModuleOutcome::NoData => println!("\n{key}: no reports found"),
            ModuleOutcome::Report(report) => {
                println!("\n{} ({key})", report.info.name);
                println!("  Samples: {}", report.samples.len());
                println!("  Input files: {}", report.sources.len());
                for section in &report.sections {
                    println!(
                        "  Section: {} ({} columns)",
                        section.name,
                        section.table.columns.len()
                    );
                }
                if let Some(path) = &report.data_file {
                    println!("  Data file: {}", path.display());
                }
            }
        }
    }
}

fn print_json_summary(
    config: &ReportConfig,
    outcomes: &[(&'static str, ModuleOutcome)],
) -> anyhow::Result<()> {
    let modules: Vec<serde_json::Value> = outcomes
        .iter()
        .map(|(key, outcome)| {
            let report = outcome.report();
            serde_json::json!({
                "key": key,
                "status": status(outcome),
                "name": report.map(|r| r.info.name),
                "samples": report.map(|r| r.samples.keys().collect::<Vec<_>>()).unwrap_or_default(),
                "sections": report
                    .map(|r| r.sections.iter().map(|s| s.name.as_str()).collect::<Vec<_>>())
                    .unwrap_or_default(),
                "sources": report.map(|r| r.sources.as_slice()).unwrap_or_default(),
                "data_file": report
                    .and_then(|r| r.data_file.as_ref())
                    .map(|p| p.display().to_string()),
            })
        })
        .collect();

    let output = serde_json::json!({
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "data_dir": config.data_dir.display().to_string(),
        "data_format": config.data_format,
        "modules": modules,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_summary(outcomes: &[(&'static str, ModuleOutcome)]) {
    println!("module\tstatus\tsamples\tinputs\tdata_file");
    for (key, outcome) in outcomes {
        let report = outcome.report();
        println!(
            "{}\t{}\t{}\t{}\t{}",
            key,
            status(outcome),
            report.map_or(0, |r| r.samples.len()),
            report.map_or(0, |r| r.sources.len()),
            report
                .and_then(|r| r.data_file.as_ref())
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        );
    }
}
