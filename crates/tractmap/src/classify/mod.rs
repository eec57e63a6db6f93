//! Classification of numeric attributes into discrete classes.

mod ckmeans;
mod classifier;
mod encoding;
mod quantile;
mod scheme;
mod summary;

pub use classifier::{extract_values, ranked, ClassificationConfig, Classifier};
pub use encoding::ColorRamp;
pub use scheme::{ClassAssignment, ClassificationMethod, ClassificationScheme};
pub use summary::AttributeSummary;
