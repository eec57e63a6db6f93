//! Classification schemes and value-to-class lookup.

use serde::{Deserialize, Serialize};

use super::ckmeans::natural_breaks;
use super::quantile::quantile_breaks;
use crate::error::{Result, TractMapError};
use crate::record::Value;

/// How breakpoints are fitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassificationMethod {
    /// Equal-count classes from order statistics.
    #[default]
    Quantile,
    /// Optimal 1-D k-means clusters (minimum within-class variance).
    NaturalBreaks,
}

impl std::str::FromStr for ClassificationMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "quantile" | "quantiles" => Ok(ClassificationMethod::Quantile),
            "natural-breaks" | "natural" | "jenks" | "ckmeans" | "cluster" => {
                Ok(ClassificationMethod::NaturalBreaks)
            }
            _ => Err(format!(
                "Unknown classification method: {}. Use quantile or natural-breaks.",
                s
            )),
        }
    }
}

impl std::fmt::Display for ClassificationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClassificationMethod::Quantile => write!(f, "quantile"),
            ClassificationMethod::NaturalBreaks => write!(f, "natural-breaks"),
        }
    }
}

/// Class of a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassAssignment {
    /// Zero-based class index.
    Class(usize),
    /// No numeric value to classify.
    Unavailable,
}

impl ClassAssignment {
    /// The class index, if any.
    pub fn index(&self) -> Option<usize> {
        match self {
            ClassAssignment::Class(i) => Some(*i),
            ClassAssignment::Unavailable => None,
        }
    }
}

/// Ascending breakpoints dividing values into `class_count` classes.
///
/// A value belongs to class `i` when `breakpoints[i-1] <= value < breakpoints[i]`;
/// values below the first breakpoint are class 0 and values at or above
/// the last are class `class_count - 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationScheme {
    method: ClassificationMethod,
    class_count: usize,
    breakpoints: Vec<f64>,
}

impl ClassificationScheme {
    /// Fit a scheme to `values`.
    ///
    /// Non-finite values are ignored. Quantile schemes always succeed on
    /// non-empty input, repeating breakpoints when there are fewer
    /// distinct values than classes. Natural breaks need at least
    /// `class_count` distinct values and fail with `InsufficientData`
    /// otherwise.
    pub fn build(values: &[f64], class_count: usize, method: ClassificationMethod) -> Result<Self> {
        if class_count == 0 {
            return Err(TractMapError::InvalidInput(
                "class count must be at least 1".to_string(),
            ));
        }

        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return Err(TractMapError::InsufficientData {
                required: 1,
                found: 0,
            });
        }
        sorted.sort_by(f64::total_cmp);

        let breakpoints = match method {
            ClassificationMethod::Quantile => quantile_breaks(&sorted, class_count),
            ClassificationMethod::NaturalBreaks => natural_breaks(&sorted, class_count)?,
        };

        Ok(Self {
            method,
            class_count,
            breakpoints,
        })
    }

    /// The fitting method.
    pub fn method(&self) -> ClassificationMethod {
        self.method
    }

    /// Number of classes.
    pub fn class_count(&self) -> usize {
        self.class_count
    }

    /// The `class_count - 1` ascending breakpoints.
    pub fn breakpoints(&self) -> &[f64] {
        &self.breakpoints
    }

    /// Class of a number. NaN and infinities are unavailable.
    pub fn classify(&self, value: f64) -> ClassAssignment {
        if !value.is_finite() {
            return ClassAssignment::Unavailable;
        }
        ClassAssignment::Class(self.breakpoints.partition_point(|&b| b <= value))
    }

    /// Class of an attribute value. Only numbers are classified.
    pub fn classify_value(&self, value: &Value) -> ClassAssignment {
        match value.as_number() {
            Some(n) => self.classify(n),
            None => ClassAssignment::Unavailable,
        }
    }

    /// Lower (inclusive) and upper (exclusive) bounds of a class.
    ///
    /// The first class has no lower bound and the last no upper bound.
    pub fn class_bounds(&self, class: usize) -> Option<(Option<f64>, Option<f64>)> {
        if class >= self.class_count {
            return None;
        }
        let lower = class.checked_sub(1).and_then(|i| self.breakpoints.get(i).copied());
        let upper = self.breakpoints.get(class).copied();
        Some((lower, upper))
    }
}
