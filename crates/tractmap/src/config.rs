//! Map configuration and its JSON persistence.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::classify::{ClassificationConfig, ColorRamp};
use crate::error::{Result, TractMapError};
use crate::input::ParserConfig;
use crate::join::JoinSpec;
use crate::nearest::{DistanceColumns, DistanceUnit};
use crate::record::KeyFormat;
use crate::spatial::CentroidMethod;

/// Settings for nearest-distance runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NearestConfig {
    /// Feature property identifying each origin.
    pub id_property: String,
    /// Formatting applied to origin ids.
    pub key_format: KeyFormat,
    pub unit: DistanceUnit,
    pub centroid: CentroidMethod,
    /// Header names of the distance table.
    pub columns: DistanceColumns,
}

impl Default for NearestConfig {
    fn default() -> Self {
        Self {
            id_property: "GEOID".to_string(),
            key_format: KeyFormat::default(),
            unit: DistanceUnit::default(),
            centroid: CentroidMethod::default(),
            columns: DistanceColumns::default(),
        }
    }
}

/// Where a map build reads from and writes to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapPaths {
    /// GeoJSON or TopoJSON (`.topojson`) features.
    pub features: Option<PathBuf>,
    /// Delimited attribute records.
    pub records: Option<PathBuf>,
    /// Enriched GeoJSON output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geojson_out: Option<PathBuf>,
    /// Legend JSON output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend_out: Option<PathBuf>,
}

/// Complete configuration for building a map layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub paths: MapPaths,
    pub parser: ParserConfig,
    pub join: JoinSpec,
    /// Attribute shown when none is selected explicitly.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    pub classification: ClassificationConfig,
    pub colors: ColorRamp,
    pub nearest: NearestConfig,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            paths: MapPaths::default(),
            parser: ParserConfig::default(),
            join: JoinSpec::on("GEOID"),
            attribute: None,
            classification: ClassificationConfig::default(),
            colors: ColorRamp::default(),
            nearest: NearestConfig::default(),
        }
    }
}

impl MapConfig {
    /// Check the parts of the configuration that serde cannot.
    pub fn validate(&self) -> Result<()> {
        if self.join.feature_key.is_empty() || self.join.record_key.is_empty() {
            return Err(TractMapError::Config(
                "join needs both a feature_key and a record_key".to_string(),
            ));
        }
        if self.classification.class_count == 0 {
            return Err(TractMapError::Config(
                "classification.class_count must be at least 1".to_string(),
            ));
        }
        self.colors.validate()?;
        self.colors.check_class_count(self.classification.class_count)
    }

    /// The attribute to classify: `selected`, else the configured one,
    /// else the first joined attribute.
    pub fn selected_attribute(&self, selected: Option<&str>) -> Result<String> {
        selected
            .or(self.attribute.as_deref())
            .or(self.join.attributes.first().map(String::as_str))
            .map(str::to_string)
            .ok_or_else(|| {
                TractMapError::Config("no attribute selected and none configured".to_string())
            })
    }

    /// Save the configuration as pretty-printed JSON.
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
            TractMapError::Persistence(format!("Failed to serialize map config: {}", e))
        })?;

        Ok(())
    }

    /// Load and validate a configuration from a JSON file.
    ///
    /// Relative input and output paths are resolved against the
    /// directory holding the configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| {
            TractMapError::Persistence(format!(
                "Failed to open file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let mut config: MapConfig = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            TractMapError::Persistence(format!(
                "Failed to parse map config '{}': {}",
                path.display(),
                e
            ))
        })?;

        if let Some(base) = path.parent() {
            config.paths.resolve_against(base);
        }
        config.validate()?;

        Ok(config)
    }
}

impl MapPaths {
    fn resolve_against(&mut self, base: &Path) {
        for slot in [
            &mut self.features,
            &mut self.records,
            &mut self.geojson_out,
            &mut self.legend_out,
        ] {
            if let Some(p) = slot.as_mut() {
                if p.is_relative() {
                    *p = base.join(&*p);
                }
            }
        }
    }

    /// The features path, or a `Config` error naming it.
    pub fn require_features(&self) -> Result<&Path> {
        self.features
            .as_deref()
            .ok_or_else(|| TractMapError::Config("paths.features is not set".to_string()))
    }

    /// The records path, or a `Config` error naming it.
    pub fn require_records(&self) -> Result<&Path> {
        self.records
            .as_deref()
            .ok_or_else(|| TractMapError::Config("paths.records is not set".to_string()))
    }
}
