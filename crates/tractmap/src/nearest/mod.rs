//! Nearest-point distance search.

mod finder;
mod haversine;
mod output;

pub use finder::{origins_from_features, target_points, DistanceRecord, NearestPointFinder, Origin};
pub use haversine::{haversine, DistanceUnit, EARTH_RADIUS_METERS};
pub use output::{distances_to_record_set, write_distances, DistanceColumns};
