//! Attribute join between record sets and feature collections.

mod joiner;

pub use joiner::{JoinReport, JoinSpec, Joiner};
