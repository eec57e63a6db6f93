//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use tractmap::{CentroidMethod, ClassificationMethod, DistanceUnit};

/// TractMap: join, measure and classify census tracts for choropleth maps
#[derive(Parser)]
#[command(name = "tractmap")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output (raises logging to debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Set the logging level
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: tracing::Level,
}

impl Cli {
    /// The log level after applying `--verbose`.
    pub fn effective_log_level(&self) -> tracing::Level {
        if self.verbose {
            self.log_level.max(tracing::Level::DEBUG)
        } else {
            self.log_level
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Join record attributes onto GeoJSON features by key
    Join {
        /// Delimited records file (CSV/TSV)
        #[arg(value_name = "RECORDS")]
        records: PathBuf,

        /// GeoJSON or TopoJSON (.topojson) features
        #[arg(value_name = "FEATURES")]
        features: PathBuf,

        /// Feature property holding the join key
        #[arg(long, default_value = "GEOID")]
        feature_key: String,

        /// Record column holding the join key
        #[arg(long, default_value = "GEOID")]
        record_key: String,

        /// Record columns to copy onto features, comma-separated
        #[arg(short, long, value_delimiter = ',', required = true)]
        attributes: Vec<String>,

        /// Left-pad numeric keys with zeros to this width
        #[arg(long)]
        zero_pad: Option<usize>,

        /// Output path (default: <features>.joined.geojson)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Distance from each feature to the nearest target feature
    Nearest {
        /// GeoJSON or TopoJSON features to measure from
        #[arg(value_name = "ORIGINS")]
        origins: PathBuf,

        /// GeoJSON or TopoJSON features to measure to (e.g. transit stations)
        #[arg(value_name = "TARGETS")]
        targets: PathBuf,

        /// Origin property used as the output key
        #[arg(long, default_value = "GEOID")]
        id_property: String,

        /// Distance unit (miles, km, m)
        #[arg(long, default_value = "miles")]
        unit: DistanceUnit,

        /// How polygons are reduced to points (vertex-mean, area)
        #[arg(long, default_value = "vertex-mean")]
        centroid: CentroidMethod,

        /// Left-pad numeric ids with zeros to this width
        #[arg(long)]
        zero_pad: Option<usize>,

        /// Header of the key column
        #[arg(long, default_value = "GEOID")]
        key_header: String,

        /// Header of the distance column
        #[arg(long, default_value = "Distance")]
        distance_header: String,

        /// Output CSV path
        #[arg(short, long, default_value = "distances.csv")]
        output: PathBuf,
    },

    /// Classify a numeric feature property into classes
    Classify {
        /// GeoJSON or TopoJSON features (typically a join output)
        #[arg(value_name = "FEATURES")]
        features: PathBuf,

        /// Property to classify
        #[arg(short, long)]
        attribute: String,

        /// Number of classes
        #[arg(short, long, default_value = "5")]
        classes: usize,

        /// Classification method (quantile, natural-breaks)
        #[arg(short, long, default_value = "quantile")]
        method: ClassificationMethod,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build a map layer from a configuration file
    Build {
        /// Map configuration (JSON)
        #[arg(short, long, value_name = "CONFIG")]
        config: PathBuf,

        /// Attribute to classify (default: from the configuration)
        #[arg(short, long)]
        attribute: Option<String>,

        /// Enriched GeoJSON output (default: from the configuration)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Legend JSON output (default: from the configuration)
        #[arg(long)]
        legend: Option<PathBuf>,
    },
}
