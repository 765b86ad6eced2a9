use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::config::{ConfigError, ReportConfig};
use crate::modules;
use crate::report::datafile::{write_data_file, write_sources_file};
use crate::report::{DataSource, MetricsModule, ModuleOutcome, ModuleReport, ReportError};

#[derive(thiserror::Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Run one module over `roots`: discover, parse, filter, export.
///
/// A disabled module returns immediately without touching the filesystem.
/// Files that fail to parse are logged and skipped.
///
/// # Errors
///
/// Returns `RunError::Config` for an invalid sample ignore pattern and
/// `RunError::Report` if discovery fails or the data file cannot be written.
pub fn run_module(
    module: &mut dyn MetricsModule,
    config: &ReportConfig,
    roots: &[PathBuf],
) -> Result<ModuleOutcome, RunError> {
    let info = module.info();
    if !config.is_module_enabled(info.key) {
        debug!(module = info.key, "Module disabled");
        return Ok(ModuleOutcome::Disabled);
    }

    let filter = config.sample_filter()?;
    let inputs = module.discover_inputs(roots, config)?;

    let mut sources = Vec::with_capacity(inputs.len());
    for input in &inputs {
        match module.parse(input) {
            Ok(count) => {
                debug!(
                    module = info.key,
                    path = %input.path.display(),
                    samples = count,
                    "Parsed input"
                );
                sources.push(DataSource {
                    module: info.key.to_string(),
                    section: format!("{}-bysample", info.anchor),
                    sample_name: input.sample_name.clone(),
                    source: input.path.clone(),
                });
            }
            Err(e) => {
                warn!(
                    module = info.key,
                    path = %input.path.display(),
                    error = %e,
                    "Failed to parse input, skipping"
                );
            }
        }
    }

    module.filter_samples(&filter);

    if module.sample_count() == 0 {
        debug!(
            module = info.key,
            roots = ?roots,
            "Could not find any reports"
        );
        return Ok(ModuleOutcome::NoData);
    }

    info!(module = info.key, "Found {} reports", module.sample_count());

    let samples = module.export();
    let data_file = write_data_file(
        &config.data_dir,
        info.data_file,
        &samples,
        config.data_format,
    )?;

    Ok(ModuleOutcome::Report(Box::new(ModuleReport {
        info,
        samples,
        sections: module.sections(),
        sources,
        data_file: Some(data_file),
    })))
}

/// Run every enabled module and write the combined sources file.
///
/// Returns one `(module key, outcome)` pair per known module, in registry order.
///
/// # Errors
///
/// Returns the first error from [`run_module`] or from writing the sources file.
pub fn run_all(
    config: &ReportConfig,
    roots: &[PathBuf],
) -> Result<Vec<(&'static str, ModuleOutcome)>, RunError> {
    let mut outcomes = Vec::new();
    for mut module in modules::all_modules() {
        let key = module.key();
        let outcome = run_module(module.as_mut(), config, roots)?;
        outcomes.push((key, outcome));
    }

    let sources: Vec<DataSource> = outcomes
        .iter()
        .filter_map(|(_, outcome)| outcome.report())
        .flat_map(|report| report.sources.iter().cloned())
        .collect();
    if !sources.is_empty() {
        let path = write_sources_file(&config.data_dir, &sources, config.data_format)?;
        debug!(path = %path.display(), "Wrote sources file");
    }

    Ok(outcomes)
}
