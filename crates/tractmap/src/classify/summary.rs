//! Attribute summaries for chart scaling.

use serde::{Deserialize, Serialize};

use crate::spatial::FeatureCollection;

/// Counts and range of one attribute across a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeSummary {
    pub attribute: String,
    /// Features with a numeric value.
    pub available: usize,
    /// Features without one.
    pub unavailable: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
}

impl AttributeSummary {
    /// Summarize `attribute` over `features`.
    pub fn from_features(features: &FeatureCollection, attribute: &str) -> Self {
        let mut available = 0;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for value in features.iter().filter_map(|f| f.number(attribute)) {
            available += 1;
            sum += value;
            min = min.min(value);
            max = max.max(value);
        }

        let has_values = available > 0;
        Self {
            attribute: attribute.to_string(),
            available,
            unavailable: features.len() - available,
            min: has_values.then_some(min),
            max: has_values.then_some(max),
            mean: has_values.then(|| sum / available as f64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Record, Value};
    use crate::spatial::Feature;

    #[test]
    fn test_summary() {
        let features: FeatureCollection = [Value::Number(10.0), Value::Missing, Value::Number(20.0)]
            .into_iter()
            .map(|v| Feature::new(None, Record::new()).with_property("time", v))
            .collect();

        let summary = AttributeSummary::from_features(&features, "time");
        assert_eq!(summary.available, 2);
        assert_eq!(summary.unavailable, 1);
        assert_eq!(summary.min, Some(10.0));
        assert_eq!(summary.max, Some(20.0));
        assert_eq!(summary.mean, Some(15.0));
    }

    #[test]
    fn test_summary_without_values() {
        let features = FeatureCollection::new(vec![Feature::new(None, Record::new())]);
        let summary = AttributeSummary::from_features(&features, "time");
        assert_eq!(summary.available, 0);
        assert_eq!(summary.unavailable, 1);
        assert_eq!(summary.min, None);
        assert_eq!(summary.mean, None);
    }
}
