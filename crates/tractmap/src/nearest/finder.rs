//! Minimum distance from each origin to a set of target points.

use geo::Point;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::haversine::{haversine, DistanceUnit};
use crate::error::{Result, TractMapError};
use crate::record::{JoinKey, KeyFormat};
use crate::spatial::{centroid, CentroidMethod, FeatureCollection};

/// An identified origin point, usually a feature centroid.
#[derive(Debug, Clone, PartialEq)]
pub struct Origin {
    pub id: JoinKey,
    pub point: Point<f64>,
}

impl Origin {
    pub fn new(id: JoinKey, point: Point<f64>) -> Self {
        Self { id, point }
    }
}

/// Distance from one origin to its nearest target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceRecord {
    pub origin_id: JoinKey,
    pub distance: f64,
}

/// Computes, per origin, the great-circle distance to the closest target.
///
/// Which target was closest is not reported; ties resolve to the shared
/// minimum value.
#[derive(Debug, Clone, Default)]
pub struct NearestPointFinder {
    unit: DistanceUnit,
}

impl NearestPointFinder {
    /// Create a finder reporting distances in `unit`.
    pub fn new(unit: DistanceUnit) -> Self {
        Self { unit }
    }

    /// The reporting unit.
    pub fn unit(&self) -> DistanceUnit {
        self.unit
    }

    /// One record per origin, in origin order.
    ///
    /// Fails with `InvalidInput` when `targets` is empty or any coordinate
    /// is not a finite longitude/latitude in degrees.
    pub fn nearest_distances(
        &self,
        origins: &[Origin],
        targets: &[Point<f64>],
    ) -> Result<Vec<DistanceRecord>> {
        if targets.is_empty() {
            return Err(TractMapError::InvalidInput(
                "no target points to measure distance to".to_string(),
            ));
        }
        if let Some((i, p)) = targets.iter().enumerate().find(|(_, p)| !is_lon_lat(p)) {
            return Err(TractMapError::InvalidInput(format!(
                "target {} has coordinate ({}, {}) outside longitude/latitude range",
                i,
                p.x(),
                p.y()
            )));
        }
        if let Some(origin) = origins.iter().find(|o| !is_lon_lat(&o.point)) {
            return Err(TractMapError::InvalidInput(format!(
                "origin '{}' has coordinate ({}, {}) outside longitude/latitude range",
                origin.id,
                origin.point.x(),
                origin.point.y()
            )));
        }

        let records: Vec<DistanceRecord> = origins
            .iter()
            .map(|origin| DistanceRecord {
                origin_id: origin.id.clone(),
                distance: self.nearest_distance(origin.point, targets),
            })
            .collect();

        debug!(
            origins = origins.len(),
            targets = targets.len(),
            unit = %self.unit,
            "computed nearest distances"
        );

        Ok(records)
    }

    fn nearest_distance(&self, origin: Point<f64>, targets: &[Point<f64>]) -> f64 {
        targets
            .iter()
            .map(|&t| haversine(origin, t, self.unit))
            .fold(f64::INFINITY, f64::min)
    }
}

/// Finite, with longitude in [-180, 180] and latitude in [-90, 90].
fn is_lon_lat(p: &Point<f64>) -> bool {
    (-180.0..=180.0).contains(&p.x()) && (-90.0..=90.0).contains(&p.y())
}

/// Build origins from feature centroids, keyed by `id_property`.
pub fn origins_from_features(
    features: &FeatureCollection,
    id_property: &str,
    key_format: &KeyFormat,
    method: CentroidMethod,
) -> Result<Vec<Origin>> {
    features
        .iter()
        .enumerate()
        .map(|(i, feature)| {
            let id = feature
                .property(id_property)
                .and_then(|v| key_format.key_for(v))
                .ok_or_else(|| {
                    TractMapError::InvalidInput(format!(
                        "feature {} has no '{}' property",
                        i, id_property
                    ))
                })?;
            let point = feature
                .geometry()
                .and_then(|g| centroid(g, method))
                .ok_or_else(|| {
                    TractMapError::InvalidInput(format!(
                        "feature {} ('{}') has no geometry to take a centroid of",
                        i, id
                    ))
                })?;
            Ok(Origin::new(id, point))
        })
        .collect()
}

/// Reduce every feature of a collection to a point.
pub fn target_points(features: &FeatureCollection, method: CentroidMethod) -> Result<Vec<Point<f64>>> {
    features
        .iter()
        .enumerate()
        .map(|(i, feature)| {
            feature
                .geometry()
                .and_then(|g| centroid(g, method))
                .ok_or_else(|| {
                    TractMapError::InvalidInput(format!("target feature {} has no geometry", i))
                })
        })
        .collect()
}
