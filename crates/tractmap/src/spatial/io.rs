//! GeoJSON and TopoJSON loading, GeoJSON saving.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use topojson::{TopoJson, Topology};
use tracing::debug;

use super::feature::FeatureCollection;
use crate::error::{Result, TractMapError};
use crate::input::{read_source, SourceMetadata};

impl FeatureCollection {
    /// Load features from a file.
    ///
    /// Files ending in `.topojson` are decoded as a topology holding a
    /// single object; anything else is read as a GeoJSON FeatureCollection.
    pub fn load(path: impl AsRef<Path>) -> Result<(Self, SourceMetadata)> {
        let path = path.as_ref();
        let (contents, hash, size_bytes) = read_source(path)?;

        let is_topology = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("topojson"));
        let (collection, format) = if is_topology {
            (Self::from_topojson_bytes(&contents, None)?, "topojson")
        } else {
            (Self::from_geojson_bytes(&contents)?, "geojson")
        };

        debug!(
            path = %path.display(),
            format,
            features = collection.len(),
            "loaded feature collection"
        );

        let metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            size_bytes,
            format.to_string(),
            collection.len(),
        );

        Ok((collection, metadata))
    }

    /// Parse a GeoJSON FeatureCollection from bytes.
    pub fn from_geojson_bytes(bytes: &[u8]) -> Result<Self> {
        let gj = geojson::GeoJson::from_reader(bytes)?;
        let collection = geojson::FeatureCollection::try_from(gj)?;
        Self::try_from(collection)
    }

    /// Decode one object of a TopoJSON topology into features.
    ///
    /// With no `object` name the topology must hold exactly one object.
    pub fn from_topojson_bytes(bytes: &[u8], object: Option<&str>) -> Result<Self> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| TractMapError::InvalidInput(format!("TopoJSON is not UTF-8: {}", e)))?;
        let topology = match text.parse::<TopoJson>()? {
            TopoJson::Topology(topology) => topology,
            TopoJson::Geometry(_) => {
                return Err(TractMapError::InvalidInput(
                    "expected a TopoJSON Topology, found a bare geometry".to_string(),
                ));
            }
        };

        let name = object_name(&topology, object)?;
        let collection = topojson::to_geojson(&topology, &name)?;
        Self::try_from(collection)
    }

    /// Serialize as a GeoJSON FeatureCollection string.
    pub fn to_geojson_string(&self) -> String {
        geojson::GeoJson::from(geojson::FeatureCollection::from(self)).to_string()
    }

    /// Save as a GeoJSON file, creating parent directories as needed.
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

        let gj = geojson::GeoJson::from(geojson::FeatureCollection::from(self));
        serde_json::to_writer(BufWriter::new(file), &gj).map_err(|e| {
            TractMapError::Persistence(format!("Failed to write GeoJSON: {}", e))
        })?;

        Ok(())
    }
}

fn object_name(topology: &Topology, requested: Option<&str>) -> Result<String> {
    let names: Vec<&str> = topology.objects.iter().map(|o| o.name.as_str()).collect();
    match (requested, names.as_slice()) {
        (Some(name), _) if names.contains(&name) => Ok(name.to_string()),
        (None, [only]) => Ok(only.to_string()),
        (requested, _) => Err(TractMapError::InvalidInput(format!(
            "{} in topology (objects: {})",
            requested.map_or_else(
                || "no single object".to_string(),
                |name| format!("no object '{}'", name)
            ),
            names.join(", ")
        ))),
    }
}
