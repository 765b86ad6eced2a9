use std::path::PathBuf;

use anyhow::{anyhow, Context};
use clap::Args;

use crate::cli::OutputFormat;
use crate::core::sample::DEFAULT_CLEAN_EXTENSIONS;
use crate::core::types::{to_records, SampleMetrics};
use crate::modules::{module_by_key, module_keys};
use crate::report::datafile::samples_to_tsv;
use crate::report::discovery::InputFile;

#[derive(Args)]
pub struct ParseArgs {
    /// Module key (see `seglh-qc modules`)
    #[arg(required = true)]
    pub module: String,

    /// Input file (plain text or gzip)
    #[arg(required = true)]
    pub file: PathBuf,
}

pub fn run(args: ParseArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let mut module = module_by_key(&args.module).ok_or_else(|| {
        anyhow!(
            "Unknown module '{}'. Available modules: {}",
            args.module,
            module_keys().join(", ")
        )
    })?;

    let root = args
        .file
        .parent()
        .map(PathBuf::from)
        .unwrap_or_default();
    let input = InputFile::load(&args.file, &root, DEFAULT_CLEAN_EXTENSIONS)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    if verbose && !module.search_pattern().content_matches(&input.content) {
        eprintln!(
            "Warning: {} does not match the {} search pattern ({})",
            args.file.display(),
            args.module,
            module.search_pattern()
        );
    }

    let count = module
        .parse(&input)
        .with_context(|| format!("Failed to parse {}", args.file.display()))?;
    if verbose {
        eprintln!("Parsed {count} sample(s) from {}", args.file.display());
    }

    let samples = module.export();
    match format {
        OutputFormat::Text => print_text_samples(&args, &samples),
        OutputFormat::Json => {
            let output = serde_json::json!({
                "module": args.module,
                "file": args.file.display().to_string(),
                "samples": samples,
                "sections": module.sections(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => print!("{}", samples_to_tsv(&samples)),
    }

    Ok(())
}

fn print_text_samples(args: &ParseArgs, samples: &SampleMetrics) {
    println!("{}: {}", args.module, args.file.display());
    println!("{}", "=".repeat(60));

    if samples.is_empty() {
        println!("\nNo samples found");
        return;
    }

    let records = to_records(samples);
    let mut current: Option<&str> = None;
    for record in &records {
        if current != Some(record.sample_id.as_str()) {
            println!("\n{}", record.sample_id);
            current = Some(&record.sample_id);
        }
        println!("  {}: {}", record.metric_name, record.value);
    }
}
