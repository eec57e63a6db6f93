//! Error types for the tractmap library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for tractmap operations.
#[derive(Debug, Error)]
pub enum TractMapError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed GeoJSON or a geometry that cannot be converted.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// Malformed TopoJSON or a topology that cannot be decoded.
    #[error("TopoJSON error: {0}")]
    TopoJson(#[from] topojson::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regex compilation error.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// Empty file or no data rows.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// A named column is not present in the record header.
    #[error("Column '{column}' not found (available: {available})")]
    MissingColumn { column: String, available: String },

    /// Input that makes the requested computation meaningless.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Not enough distinct values to fit the requested classes.
    #[error("Insufficient data: need {required} distinct values, found {found}")]
    InsufficientData { required: usize, found: usize },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error saving or loading persisted files.
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl TractMapError {
    pub(crate) fn missing_column(column: &str, headers: &[String]) -> Self {
        TractMapError::MissingColumn {
            column: column.to_string(),
            available: headers.join(", "),
        }
    }
}

/// Result type alias for tractmap operations.
pub type Result<T> = std::result::Result<T, TractMapError>;
