//! Classifying a feature attribute.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::scheme::{ClassAssignment, ClassificationMethod, ClassificationScheme};
use crate::error::Result;
use crate::record::Value;
use crate::spatial::FeatureCollection;

/// How many classes to fit, and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    pub class_count: usize,
    pub method: ClassificationMethod,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            class_count: 5,
            method: ClassificationMethod::Quantile,
        }
    }
}

/// Fits schemes to, and classifies, one attribute of a feature collection.
///
/// The attribute is passed on every call; nothing about the current
/// selection is remembered between calls.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    config: ClassificationConfig,
}

impl Classifier {
    pub fn new(config: ClassificationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassificationConfig {
        &self.config
    }

    /// Fit a scheme to the numeric values of `attribute`.
    ///
    /// Features without a number for the attribute do not influence the fit.
    pub fn fit(&self, features: &FeatureCollection, attribute: &str) -> Result<ClassificationScheme> {
        let values = extract_values(features, attribute);
        let scheme =
            ClassificationScheme::build(&values, self.config.class_count, self.config.method)?;
        debug!(
            attribute,
            values = values.len(),
            method = %scheme.method(),
            breakpoints = ?scheme.breakpoints(),
            "fitted classification"
        );
        Ok(scheme)
    }

    /// One assignment per feature, in collection order.
    pub fn assign(
        &self,
        features: &FeatureCollection,
        attribute: &str,
        scheme: &ClassificationScheme,
    ) -> Vec<ClassAssignment> {
        features
            .iter()
            .map(|f| match f.property(attribute) {
                Some(value) => scheme.classify_value(value),
                None => ClassAssignment::Unavailable,
            })
            .collect()
    }
}

/// Numeric values of `attribute`, skipping features without one.
pub fn extract_values(features: &FeatureCollection, attribute: &str) -> Vec<f64> {
    features
        .iter()
        .filter_map(|f| f.property(attribute).and_then(Value::as_number))
        .collect()
}

/// Feature indices ordered by `attribute`, largest first.
///
/// Features without a number come last; ties keep collection order.
pub fn ranked(features: &FeatureCollection, attribute: &str) -> Vec<usize> {
    let values: Vec<Option<f64>> = features.iter().map(|f| f.number(attribute)).collect();
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| match (values[a], values[b]) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    order
}
