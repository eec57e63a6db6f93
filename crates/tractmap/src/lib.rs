//! TractMap: data pipeline behind a census-tract commuting choropleth.
//!
//! TractMap joins tabular attributes onto GeoJSON tract features, measures
//! the distance from each tract to its nearest transit station, and
//! classifies a selected attribute into color classes for display.
//!
//! # Core Principles
//!
//! - **Keyed joins**: Records merge onto features by a normalized key, first match wins
//! - **Explicit gaps**: Missing and unparsable values stay unavailable, never zero
//! - **Stateless selection**: The displayed attribute is an argument, not global state
//!
//! # Example
//!
//! ```no_run
//! use tractmap::{JoinSpec, MapConfig, TractMap};
//!
//! let mut config = MapConfig::default();
//! config.join = JoinSpec::on("GEOID").with_attributes(["mean_time", "pct_transit"]);
//!
//! let map = TractMap::with_config(config);
//! let layer = map.build_files("tracts.geojson", "commute.csv", "mean_time").unwrap();
//!
//! println!("Breakpoints: {:?}", layer.scheme.breakpoints());
//! println!("Unmatched tracts: {}", layer.join.unmatched.len());
//! ```

pub mod classify;
pub mod config;
pub mod error;
pub mod input;
pub mod join;
pub mod nearest;
pub mod record;
pub mod spatial;

mod tractmap;

pub use crate::tractmap::{Legend, MapInputs, MapLayer, TractMap};
pub use classify::{
    AttributeSummary, ClassAssignment, ClassificationConfig, ClassificationMethod,
    ClassificationScheme, Classifier, ColorRamp,
};
pub use config::{MapConfig, MapPaths, NearestConfig};
pub use error::{Result, TractMapError};
pub use input::{Parser, ParserConfig, RecordSet, SourceMetadata};
pub use join::{JoinReport, JoinSpec, Joiner};
pub use nearest::{DistanceRecord, DistanceUnit, NearestPointFinder, Origin};
pub use record::{JoinKey, KeyFormat, Value};
pub use spatial::{CentroidMethod, Feature, FeatureCollection};
