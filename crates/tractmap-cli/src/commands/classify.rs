//! Classify command - fit classes to a feature property.

use std::path::PathBuf;

use colored::Colorize;
use tractmap::classify::ranked;
use tractmap::{
    AttributeSummary, ClassificationConfig, ClassificationMethod, Classifier, FeatureCollection,
};

pub fn run(
    features: PathBuf,
    attribute: String,
    classes: usize,
    method: ClassificationMethod,
    json_output: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !features.exists() {
        return Err(format!("File not found: {}", features.display()).into());
    }

    let (collection, _) = FeatureCollection::load(&features)?;
    let classifier = Classifier::new(ClassificationConfig {
        class_count: classes,
        method,
    });

    let scheme = classifier.fit(&collection, &attribute)?;
    let assignments = classifier.assign(&collection, &attribute, &scheme);
    let summary = AttributeSummary::from_features(&collection, &attribute);

    let mut counts = vec![0usize; scheme.class_count()];
    for index in assignments.iter().filter_map(|a| a.index()) {
        counts[index] += 1;
    }

    if json_output {
        let output = serde_json::json!({
            "attribute": attribute,
            "method": scheme.method(),
            "breakpoints": scheme.breakpoints(),
            "class_counts": counts,
            "summary": summary,
            "assignments": assignments,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "{} {} {}",
        "Classified".cyan().bold(),
        attribute.white().bold(),
        format!("({}, {} classes)", scheme.method(), scheme.class_count()).cyan()
    );
    println!();

    if let (Some(min), Some(max), Some(mean)) = (summary.min, summary.max, summary.mean) {
        println!("Range: {:.2} to {:.2}, mean {:.2}", min, max, mean);
    }
    println!(
        "Values: {} available, {} unavailable",
        summary.available.to_string().white(),
        summary.unavailable.to_string().yellow()
    );
    println!();

    println!("{}", "Classes:".yellow().bold());
    for (class, count) in counts.iter().enumerate() {
        let (lower, upper) = scheme.class_bounds(class).unwrap_or((None, None));
        let lower = lower.map_or_else(|| "min".to_string(), |v| format!("{:.2}", v));
        let upper = upper.map_or_else(|| "max".to_string(), |v| format!("{:.2}", v));
        println!("  {}  {:>10} - {:<10} {}", class, lower, upper, count);
    }

    if verbose {
        println!();
        println!("{}", "Highest values:".yellow().bold());
        for i in ranked(&collection, &attribute).into_iter().take(10) {
            let feature = &collection.features[i];
            let Some(value) = feature.number(&attribute) else {
                break;
            };
            let label = feature
                .id
                .as_ref()
                .map(|id| format!("{:?}", id))
                .unwrap_or_else(|| format!("#{}", i));
            println!("  {:<16} {}", label, value);
        }
    }

    Ok(())
}
