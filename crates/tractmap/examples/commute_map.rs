//! Example: build a commuting choropleth layer from tracts and census records.
//!
//! Usage:
//!   cargo run --example commute_map -- <tracts.geojson> <commute.csv> <attribute> [stations.geojson]
//!
//! Example:
//!   cargo run --example commute_map -- data/dc_tracts.geojson data/commute.csv mean_time data/metro.geojson

use std::env;
use std::path::Path;

use tractmap::{FeatureCollection, JoinSpec, Joiner, MapConfig, TractMap};

fn main() -> tractmap::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 4 {
        eprintln!("Usage: cargo run --example commute_map -- <tracts.geojson> <commute.csv> <attribute> [stations.geojson]");
        std::process::exit(1);
    }

    let (features_path, records_path, attribute) = (&args[1], &args[2], &args[3]);
    for path in [features_path, records_path] {
        if !Path::new(path).exists() {
            eprintln!("Error: File not found: {}", path);
            std::process::exit(1);
        }
    }

    // "Distance" comes from the stations file rather than the records
    let mut config = MapConfig::default();
    config.join = JoinSpec::on("GEOID");
    if attribute != "Distance" {
        config.join = config.join.with_attribute(attribute.as_str());
    }
    let map = TractMap::with_config(config);

    let inputs = map.load(features_path, records_path)?;
    let mut features = inputs.features;

    if let Some(stations_path) = args.get(4) {
        let (stations, _) = FeatureCollection::load(stations_path)?;
        let distances = map.nearest_record_set(&features, &stations)?;
        println!("Computed distances for {} tracts", distances.row_count());
        for row in distances.rows.iter().take(3) {
            println!("  {} -> {} mi", row[0], row[1]);
        }
        Joiner::new(JoinSpec::on("GEOID").with_attribute("Distance"))
            .join(&mut features, &distances)?;
    }

    let layer = map.build(features, &inputs.records, attribute)?;

    let separator = "=".repeat(60);
    println!("{}", separator);
    println!("Layer: {} ({})", layer.attribute, layer.scheme.method());
    println!("{}", separator);
    println!(
        "Tracts: {} matched, {} unmatched",
        layer.join.matched,
        layer.join.unmatched.len()
    );
    println!(
        "Values: {} available, {} unavailable",
        layer.summary.available, layer.summary.unavailable
    );

    for class in 0..layer.scheme.class_count() {
        let (lower, upper) = layer.scheme.class_bounds(class).unwrap_or((None, None));
        let lower = lower.map_or_else(|| "-inf".to_string(), |v| format!("{:.2}", v));
        let upper = upper.map_or_else(|| "+inf".to_string(), |v| format!("{:.2}", v));
        let count = layer
            .assignments
            .iter()
            .filter(|a| a.index() == Some(class))
            .count();
        println!(
            "  {}  [{}, {})  {} tracts",
            layer.colors.colors()[class], lower, upper, count
        );
    }

    let top: Vec<usize> = tractmap::classify::ranked(&layer.features, attribute)
        .into_iter()
        .take(5)
        .collect();
    println!("\nHighest {}:", attribute);
    for i in top {
        let feature = &layer.features.features[i];
        println!(
            "  {:<14} {}",
            feature.property("GEOID").map(|v| v.to_string()).unwrap_or_default(),
            feature.number(attribute).map(|n| n.to_string()).unwrap_or_default()
        );
    }

    Ok(())
}
