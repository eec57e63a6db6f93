//! Main TractMap struct and public API.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::classify::{
    AttributeSummary, ClassAssignment, ClassificationMethod, ClassificationScheme, Classifier,
    ColorRamp,
};
use crate::config::MapConfig;
use crate::error::{Result, TractMapError};
use crate::input::{Parser, RecordSet, SourceMetadata};
use crate::join::{JoinReport, Joiner};
use crate::nearest::{
    distances_to_record_set, origins_from_features, target_points, DistanceRecord,
    NearestPointFinder,
};
use crate::record::JoinKey;
use crate::spatial::FeatureCollection;

/// Parsed inputs of a map build.
#[derive(Debug, Clone)]
pub struct MapInputs {
    pub features: FeatureCollection,
    pub records: RecordSet,
    pub features_source: SourceMetadata,
    pub records_source: SourceMetadata,
}

/// A classified, color-encoded attribute over an enriched feature collection.
#[derive(Debug, Clone)]
pub struct MapLayer {
    /// The classified attribute.
    pub attribute: String,
    /// Features with joined attributes.
    pub features: FeatureCollection,
    /// Outcome of the attribute join.
    pub join: JoinReport,
    pub scheme: ClassificationScheme,
    /// One per feature, in collection order.
    pub assignments: Vec<ClassAssignment>,
    pub summary: AttributeSummary,
    pub colors: ColorRamp,
    /// Feature property used as the join key.
    pub key_property: String,
}

/// Everything a renderer needs to draw and label a layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub attribute: String,
    pub method: ClassificationMethod,
    pub breakpoints: Vec<f64>,
    /// One color per class.
    pub colors: Vec<String>,
    /// Color of features with no value.
    pub unavailable: String,
    pub summary: AttributeSummary,
    /// Class of each keyed feature; `null` when unavailable.
    pub classes: IndexMap<String, ClassAssignment>,
}

impl MapLayer {
    /// Color of the feature at `index`.
    pub fn color_of(&self, index: usize) -> Option<&str> {
        self.assignments
            .get(index)
            .map(|&assignment| self.colors.color_for(assignment))
    }

    /// Build the legend for this layer.
    ///
    /// Features without a key are left out of `classes`.
    pub fn legend(&self) -> Legend {
        let classes = self
            .features
            .iter()
            .zip(&self.assignments)
            .filter_map(|(feature, &assignment)| {
                let key = feature.property(&self.key_property)?;
                JoinKey::from_value(key).map(|k| (k.to_string(), assignment))
            })
            .collect();

        Legend {
            attribute: self.attribute.clone(),
            method: self.scheme.method(),
            breakpoints: self.scheme.breakpoints().to_vec(),
            colors: self.colors.colors().to_vec(),
            unavailable: self.colors.unavailable().to_string(),
            summary: self.summary.clone(),
            classes,
        }
    }

    /// Write the enriched features as GeoJSON and, if given, the legend as JSON.
    pub fn save(&self, geojson_path: impl AsRef<Path>, legend_path: Option<&Path>) -> Result<()> {
        self.features.save(geojson_path)?;
        if let Some(path) = legend_path {
            self.legend().save(path)?;
        }
        Ok(())
    }
}

impl Legend {
    /// Save the legend as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    TractMapError::Persistence(format!(
                        "Failed to create directory '{}': {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let file = File::create(path).map_err(|e| {
            TractMapError::Persistence(format!(
                "Failed to create file '{}': {}",
                path.display(),
                e
            ))
        })?;

        serde_json::to_writer_pretty(BufWriter::new(file), self).map_err(|e| {
            TractMapError::Persistence(format!("Failed to serialize legend: {}", e))
        })?;

        Ok(())
    }
}

/// The map building pipeline.
///
/// Holds only configuration; the selected attribute is passed to each
/// build, so switching attributes is another call to [`TractMap::build`].
pub struct TractMap {
    config: MapConfig,
    parser: Parser,
    joiner: Joiner,
    classifier: Classifier,
}

impl TractMap {
    /// Create a pipeline with default configuration.
    pub fn new() -> Self {
        Self::with_config(MapConfig::default())
    }

    /// Create a pipeline with custom configuration.
    pub fn with_config(config: MapConfig) -> Self {
        let parser = Parser::with_config(config.parser.clone());
        let joiner = Joiner::new(config.join.clone());
        let classifier = Classifier::new(config.classification);

        Self {
            config,
            parser,
            joiner,
            classifier,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Parse a GeoJSON or TopoJSON feature file and a delimited record file.
    pub fn load(
        &self,
        features_path: impl AsRef<Path>,
        records_path: impl AsRef<Path>,
    ) -> Result<MapInputs> {
        let (features, features_source) = FeatureCollection::load(features_path)?;
        let (records, records_source) = self.parser.parse_file(records_path)?;

        Ok(MapInputs {
            features,
            records,
            features_source,
            records_source,
        })
    }

    /// Join `records` onto `features` and classify `attribute`.
    pub fn build(
        &self,
        mut features: FeatureCollection,
        records: &RecordSet,
        attribute: &str,
    ) -> Result<MapLayer> {
        let colors = &self.config.colors;
        colors.validate()?;
        colors.check_class_count(self.config.classification.class_count)?;

        let join = self.joiner.join(&mut features, records)?;
        let scheme = self.classifier.fit(&features, attribute)?;
        let assignments = self.classifier.assign(&features, attribute, &scheme);
        let summary = AttributeSummary::from_features(&features, attribute);

        info!(
            attribute,
            matched = join.matched,
            unmatched = join.unmatched.len(),
            available = summary.available,
            "built map layer"
        );

        Ok(MapLayer {
            attribute: attribute.to_string(),
            features,
            join,
            scheme,
            assignments,
            summary,
            colors: self.config.colors.clone(),
            key_property: self.config.join.feature_key.clone(),
        })
    }

    /// Load both inputs and build a layer for `attribute`.
    pub fn build_files(
        &self,
        features_path: impl AsRef<Path>,
        records_path: impl AsRef<Path>,
        attribute: &str,
    ) -> Result<MapLayer> {
        let inputs = self.load(features_path, records_path)?;
        debug!(
            features = %inputs.features_source.file,
            records = %inputs.records_source.file,
            rows = inputs.records.row_count(),
            "loaded map inputs"
        );
        self.build(inputs.features, &inputs.records, attribute)
    }

    /// Distance from each origin feature's centroid to the nearest target centroid.
    pub fn nearest_distances(
        &self,
        origins: &FeatureCollection,
        targets: &FeatureCollection,
    ) -> Result<Vec<DistanceRecord>> {
        let nearest = &self.config.nearest;
        let origins =
            origins_from_features(origins, &nearest.id_property, &nearest.key_format, nearest.centroid)?;
        let targets = target_points(targets, nearest.centroid)?;
        NearestPointFinder::new(nearest.unit).nearest_distances(&origins, &targets)
    }

    /// Nearest distances as a record set ready to be joined.
    pub fn nearest_record_set(
        &self,
        origins: &FeatureCollection,
        targets: &FeatureCollection,
    ) -> Result<RecordSet> {
        let records = self.nearest_distances(origins, targets)?;
        Ok(distances_to_record_set(&records, &self.config.nearest.columns))
    }
}

impl Default for TractMap {
    fn default() -> Self {
        Self::new()
    }
}
