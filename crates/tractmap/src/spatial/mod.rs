//! Geographic feature collections and their geometry helpers.

mod centroid;
mod feature;
mod io;

pub use centroid::{centroid, CentroidMethod};
pub use feature::{Feature, FeatureCollection};
