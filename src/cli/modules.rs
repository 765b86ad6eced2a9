use crate::cli::OutputFormat;
use crate::modules::all_modules;

pub fn run(format: OutputFormat) -> anyhow::Result<()> {
    let modules = all_modules();

    match format {
        OutputFormat::Text => {
            println!("Available Modules");
            println!("{}", "=".repeat(60));
            for module in &modules {
                let info = module.info();
                println!("\n{} ({})", info.name, info.key);
                println!("  {}", info.description);
                println!("  Search pattern: {}", module.search_pattern());
                println!("  Data file: {}", info.data_file);
            }
        }
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = modules
                .iter()
                .map(|module| {
                    serde_json::json!({
                        "info": module.info(),
                        "search_pattern": module.search_pattern(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("key\tname\tfn\tcontents\tdata_file");
            for module in &modules {
                let info = module.info();
                let pattern = module.search_pattern();
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    info.key,
                    info.name,
                    pattern.fn_glob,
                    pattern.contents.unwrap_or_default(),
                    info.data_file,
                );
            }
        }
    }

    Ok(())
}
