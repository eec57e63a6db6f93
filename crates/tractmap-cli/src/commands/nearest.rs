//! Nearest command - distance from each feature to the closest target.

use std::path::PathBuf;

use colored::Colorize;
use tractmap::nearest::{origins_from_features, target_points, write_distances, DistanceColumns};
use tractmap::{CentroidMethod, DistanceUnit, FeatureCollection, KeyFormat, NearestPointFinder};

/// Arguments of the `nearest` subcommand.
pub struct NearestArgs {
    pub origins: PathBuf,
    pub targets: PathBuf,
    pub id_property: String,
    pub unit: DistanceUnit,
    pub centroid: CentroidMethod,
    pub zero_pad: Option<usize>,
    pub key_header: String,
    pub distance_header: String,
    pub output: PathBuf,
}

pub fn run(args: NearestArgs, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    for path in [&args.origins, &args.targets] {
        if !path.exists() {
            return Err(format!("File not found: {}", path.display()).into());
        }
    }

    println!(
        "{} {} {} {}",
        "Measuring".cyan().bold(),
        args.origins.display().to_string().white(),
        "to nearest of".cyan(),
        args.targets.display().to_string().white()
    );

    let (origin_features, _) = FeatureCollection::load(&args.origins)?;
    let (target_features, _) = FeatureCollection::load(&args.targets)?;

    let mut key_format = KeyFormat::new();
    if let Some(width) = args.zero_pad {
        key_format = key_format.with_zero_pad(width);
    }

    let origins =
        origins_from_features(&origin_features, &args.id_property, &key_format, args.centroid)?;
    let targets = target_points(&target_features, args.centroid)?;

    let records = NearestPointFinder::new(args.unit).nearest_distances(&origins, &targets)?;

    if verbose {
        for record in records.iter().take(10) {
            println!("  {:<14} {:.3} {}", record.origin_id, record.distance, args.unit);
        }
        if records.len() > 10 {
            println!("  ... {} more", records.len() - 10);
        }
    }

    if let Some((min, max)) = records.iter().map(|r| r.distance).fold(None, |acc, d| match acc {
        None => Some((d, d)),
        Some((lo, hi)) => Some((f64::min(lo, d), f64::max(hi, d))),
    }) {
        println!(
            "{} origins, {} targets; nearest distance {:.2} to {:.2} {}",
            origins.len().to_string().white().bold(),
            targets.len(),
            min,
            max,
            args.unit
        );
    }

    let columns = DistanceColumns {
        key: args.key_header,
        distance: args.distance_header,
    };
    write_distances(&args.output, &records, &columns)?;

    println!(
        "{} {}",
        "Saved".green().bold(),
        args.output.display().to_string().white()
    );

    Ok(())
}
