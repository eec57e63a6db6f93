//! Join command - copy record attributes onto GeoJSON features.

use std::path::PathBuf;

use colored::Colorize;
use tractmap::{FeatureCollection, JoinSpec, Joiner, KeyFormat, Parser};

#[allow(clippy::too_many_arguments)]
pub fn run(
    records: PathBuf,
    features: PathBuf,
    feature_key: String,
    record_key: String,
    attributes: Vec<String>,
    zero_pad: Option<usize>,
    output: Option<PathBuf>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    for path in [&records, &features] {
        if !path.exists() {
            return Err(format!("File not found: {}", path.display()).into());
        }
    }

    println!(
        "{} {} {} {}",
        "Joining".cyan().bold(),
        records.display().to_string().white(),
        "onto".cyan(),
        features.display().to_string().white()
    );

    let (record_set, source) = Parser::new().parse_file(&records)?;
    let (mut collection, _) = FeatureCollection::load(&features)?;

    if verbose {
        println!(
            "  {} rows, {} columns ({})",
            record_set.row_count(),
            record_set.column_count(),
            source.format
        );
        println!("  {} features", collection.len());
    }

    let mut key_format = KeyFormat::new();
    if let Some(width) = zero_pad {
        key_format = key_format.with_zero_pad(width);
    }
    let spec = JoinSpec::new(feature_key, record_key)
        .with_attributes(attributes)
        .with_key_format(key_format);

    let report = Joiner::new(spec).join(&mut collection, &record_set)?;
    super::print_join_report(&report, collection.len());

    let output_path = output.unwrap_or_else(|| {
        let mut p = features.clone();
        let stem = p.file_stem().unwrap_or_default().to_string_lossy().into_owned();
        p.set_file_name(format!("{}.joined.geojson", stem));
        p
    });
    collection.save(&output_path)?;

    println!(
        "{} {}",
        "Saved".green().bold(),
        output_path.display().to_string().white()
    );

    Ok(())
}
