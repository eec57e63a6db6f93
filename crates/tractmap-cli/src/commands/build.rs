//! Build command - run the full pipeline from a map configuration.

use std::path::PathBuf;

use colored::Colorize;
use tractmap::{MapConfig, TractMap};

pub fn run(
    config_path: PathBuf,
    attribute: Option<String>,
    output: Option<PathBuf>,
    legend: Option<PathBuf>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !config_path.exists() {
        return Err(format!("Config file not found: {}", config_path.display()).into());
    }

    let config = MapConfig::load(&config_path)?;
    let attribute = config.selected_attribute(attribute.as_deref())?;
    let features_path = config.paths.require_features()?.to_path_buf();
    let records_path = config.paths.require_records()?.to_path_buf();

    let output_path = output.or_else(|| config.paths.geojson_out.clone()).unwrap_or_else(|| {
        let mut p = features_path.clone();
        let stem = p.file_stem().unwrap_or_default().to_string_lossy().into_owned();
        p.set_file_name(format!("{}.{}.geojson", stem, attribute));
        p
    });
    let legend_path = legend.or_else(|| config.paths.legend_out.clone());

    println!(
        "{} {} {}",
        "Building".cyan().bold(),
        attribute.white().bold(),
        format!("from {}", config_path.display()).cyan()
    );

    let map = TractMap::with_config(config);
    let layer = map.build_files(&features_path, &records_path, &attribute)?;

    super::print_join_report(&layer.join, layer.features.len());
    println!(
        "Breakpoints ({}): {}",
        layer.scheme.method(),
        layer
            .scheme
            .breakpoints()
            .iter()
            .map(|b| format!("{:.2}", b))
            .collect::<Vec<_>>()
            .join(", ")
            .white()
    );

    if verbose {
        for (class, color) in layer.colors.colors().iter().enumerate() {
            let count = layer
                .assignments
                .iter()
                .filter(|a| a.index() == Some(class))
                .count();
            println!("  {} {} features", color, count);
        }
        println!(
            "  {} {} features",
            layer.colors.unavailable(),
            layer.summary.unavailable
        );
    }

    layer.save(&output_path, legend_path.as_deref())?;

    println!(
        "{} {}",
        "Saved".green().bold(),
        output_path.display().to_string().white()
    );
    if let Some(path) = legend_path {
        println!(
            "{} {}",
            "Saved".green().bold(),
            path.display().to_string().white()
        );
    }

    Ok(())
}
