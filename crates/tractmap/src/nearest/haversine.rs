//! Great-circle distance on a spherical Earth.

use geo::{HaversineDistance, Point};
use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters, as used by `geo`'s haversine.
/// (`geo::MEAN_EARTH_RADIUS` is private in geo 0.28, so its value is mirrored here.)
pub const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

const METERS_PER_MILE: f64 = 1_609.344;

/// Unit for reported distances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    Miles,
    Kilometers,
    Meters,
}

impl DistanceUnit {
    /// Length of one of this unit in meters.
    pub fn meters_per_unit(&self) -> f64 {
        match self {
            DistanceUnit::Miles => METERS_PER_MILE,
            DistanceUnit::Kilometers => 1_000.0,
            DistanceUnit::Meters => 1.0,
        }
    }
}

impl std::str::FromStr for DistanceUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "miles" | "mile" | "mi" => Ok(DistanceUnit::Miles),
            "kilometers" | "kilometres" | "km" => Ok(DistanceUnit::Kilometers),
            "meters" | "metres" | "m" => Ok(DistanceUnit::Meters),
            _ => Err(format!("Unknown distance unit: {}. Use miles, km, or m.", s)),
        }
    }
}

impl std::fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DistanceUnit::Miles => write!(f, "miles"),
            DistanceUnit::Kilometers => write!(f, "km"),
            DistanceUnit::Meters => write!(f, "m"),
        }
    }
}

/// Haversine distance between two lon/lat points.
pub fn haversine(from: Point<f64>, to: Point<f64>, unit: DistanceUnit) -> f64 {
    from.haversine_distance(&to) / unit.meters_per_unit()
}
