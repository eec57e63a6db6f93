//! Geographic features and collections.

use geo::Geometry;
use geojson::feature::Id;

use crate::error::{Result, TractMapError};
use crate::record::{Record, Value};

/// A geometry plus a record of properties.
///
/// Geometry is fixed once the feature is built; properties may gain or
/// overwrite values during a join but are never removed.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Optional GeoJSON feature id.
    pub id: Option<Id>,
    geometry: Option<Geometry<f64>>,
    /// Feature properties in document order.
    pub properties: Record,
}

impl Feature {
    /// Create a feature.
    pub fn new(geometry: Option<Geometry<f64>>, properties: Record) -> Self {
        Self {
            id: None,
            geometry,
            properties,
        }
    }

    /// The feature geometry, if any.
    pub fn geometry(&self) -> Option<&Geometry<f64>> {
        self.geometry.as_ref()
    }

    /// Get a property by name.
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Get a property as a number; absent, missing and text values are `None`.
    pub fn number(&self, name: &str) -> Option<f64> {
        self.property(name).and_then(Value::as_number)
    }

    /// Set or overwrite a property.
    pub fn set_property(&mut self, name: impl Into<String>, value: Value) {
        self.properties.insert(name.into(), value);
    }

    /// Builder-style property setter.
    pub fn with_property(mut self, name: impl Into<String>, value: Value) -> Self {
        self.set_property(name, value);
        self
    }
}

impl TryFrom<geojson::Feature> for Feature {
    type Error = TractMapError;

    fn try_from(feature: geojson::Feature) -> Result<Self> {
        let geometry = match feature.geometry {
            Some(g) => Some(Geometry::<f64>::try_from(g)?),
            None => None,
        };

        let properties = feature
            .properties
            .unwrap_or_default()
            .iter()
            .map(|(k, v)| (k.clone(), Value::from_json(v)))
            .collect();

        Ok(Self {
            id: feature.id,
            geometry,
            properties,
        })
    }
}

impl From<&Feature> for geojson::Feature {
    fn from(feature: &Feature) -> Self {
        let properties: geojson::JsonObject = feature
            .properties
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect();

        geojson::Feature {
            bbox: None,
            geometry: feature
                .geometry
                .as_ref()
                .map(|g| geojson::Geometry::new(geojson::Value::from(g))),
            id: feature.id.clone(),
            properties: Some(properties),
            foreign_members: None,
        }
    }
}

/// An ordered sequence of features.
///
/// Order is stable across iteration and carries no ranking.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Create a collection from features.
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Append a feature.
    pub fn push(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    /// Iterate over features in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }
}

impl FromIterator<Feature> for FeatureCollection {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a FeatureCollection {
    type Item = &'a Feature;
    type IntoIter = std::slice::Iter<'a, Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}

impl TryFrom<geojson::FeatureCollection> for FeatureCollection {
    type Error = TractMapError;

    fn try_from(collection: geojson::FeatureCollection) -> Result<Self> {
        collection
            .features
            .into_iter()
            .map(Feature::try_from)
            .collect()
    }
}

impl From<&FeatureCollection> for geojson::FeatureCollection {
    fn from(collection: &FeatureCollection) -> Self {
        geojson::FeatureCollection {
            bbox: None,
            features: collection.features.iter().map(geojson::Feature::from).collect(),
            foreign_members: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::point;

    #[test]
    fn test_feature_properties() {
        let feature = Feature::new(Some(Geometry::Point(point!(x: -77.0, y: 38.9))), Record::new())
            .with_property("GEOID", Value::Text("11001000100".into()))
            .with_property("time", Value::Number(31.5));

        assert_eq!(feature.number("time"), Some(31.5));
        assert_eq!(feature.number("GEOID"), None);
        assert_eq!(feature.property("absent"), None);
    }

    #[test]
    fn test_geojson_round_trip() {
        let text = r#"{
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [-77.03, 38.89]},
            "properties": {"GEOID": "11001000100", "pop": 1200, "note": null}
        }"#;
        let gj: geojson::Feature = text.parse().unwrap();
        let feature = Feature::try_from(gj).unwrap();

        assert_eq!(feature.number("pop"), Some(1200.0));
        assert_eq!(feature.property("note"), Some(&Value::Missing));
        assert!(matches!(feature.geometry(), Some(Geometry::Point(_))));

        let back = geojson::Feature::from(&feature);
        let props = back.properties.unwrap();
        assert_eq!(props["GEOID"], serde_json::json!("11001000100"));
        assert_eq!(props["note"], serde_json::Value::Null);
    }
}
