//! Hash-indexed attribute join.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::input::RecordSet;
use crate::record::{JoinKey, KeyFormat};
use crate::spatial::{Feature, FeatureCollection};

/// Which keys and attributes a join uses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JoinSpec {
    /// Property holding the join key on each feature.
    pub feature_key: String,
    /// Column holding the join key in the record set.
    pub record_key: String,
    /// Record columns copied onto matching features, as numbers.
    #[serde(default)]
    pub attributes: Vec<String>,
    /// Formatting applied to keys on both sides.
    #[serde(default)]
    pub key_format: KeyFormat,
}

impl JoinSpec {
    /// Join on `feature_key` (feature property) = `record_key` (record column).
    pub fn new(feature_key: impl Into<String>, record_key: impl Into<String>) -> Self {
        Self {
            feature_key: feature_key.into(),
            record_key: record_key.into(),
            attributes: Vec::new(),
            key_format: KeyFormat::default(),
        }
    }

    /// Join on the same name on both sides.
    pub fn on(key: impl Into<String>) -> Self {
        let key = key.into();
        Self::new(key.clone(), key)
    }

    /// Add an attribute to copy.
    pub fn with_attribute(mut self, name: impl Into<String>) -> Self {
        self.attributes.push(name.into());
        self
    }

    /// Add several attributes to copy.
    pub fn with_attributes<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.attributes.extend(names.into_iter().map(Into::into));
        self
    }

    /// Set the key format.
    pub fn with_key_format(mut self, key_format: KeyFormat) -> Self {
        self.key_format = key_format;
        self
    }
}

/// Outcome counts for one join.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JoinReport {
    /// Features that found a record.
    pub matched: usize,
    /// Indices of features with no key or no matching record.
    pub unmatched: Vec<usize>,
    /// Record rows ignored because an earlier row had the same key.
    pub duplicate_keys: usize,
    /// Copied cells that were empty or not numbers.
    pub unavailable_values: usize,
}

/// Merges record attributes into feature properties by join key.
///
/// Preconditions: record keys should be unique. When they are not, the
/// first row with a given key wins and later rows are ignored.
#[derive(Debug, Clone)]
pub struct Joiner {
    spec: JoinSpec,
}

impl Joiner {
    /// Create a joiner for a spec.
    pub fn new(spec: JoinSpec) -> Self {
        Self { spec }
    }

    /// The join spec.
    pub fn spec(&self) -> &JoinSpec {
        &self.spec
    }

    /// Join records onto features by the `feature_key` property.
    ///
    /// Matched features get every requested attribute set to its parsed
    /// number, or `Missing` when the cell is not a number. Unmatched
    /// features are left untouched.
    pub fn join(&self, features: &mut FeatureCollection, records: &RecordSet) -> Result<JoinReport> {
        let feature_key = self.spec.feature_key.as_str();
        self.join_by(features, records, |feature| {
            feature.property(feature_key).and_then(JoinKey::from_value)
        })
    }

    /// Join using a caller-supplied feature key accessor.
    ///
    /// The `JoinSpec` key format is applied to both sides, so accessor keys
    /// need no padding of their own. Records are keyed by the `JoinSpec`
    /// record key column.
    pub fn join_by<F>(
        &self,
        features: &mut FeatureCollection,
        records: &RecordSet,
        feature_key: F,
    ) -> Result<JoinReport>
    where
        F: Fn(&Feature) -> Option<JoinKey>,
    {
        let key_col = records.require_column(&self.spec.record_key)?;
        let columns = self
            .spec
            .attributes
            .iter()
            .map(|name| records.require_column(name).map(|col| (name.as_str(), col)))
            .collect::<Result<Vec<_>>>()?;

        let (index, duplicate_keys) = index_records(records, key_col, &self.spec.key_format);

        let mut report = JoinReport {
            duplicate_keys,
            ..JoinReport::default()
        };

        for (i, feature) in features.features.iter_mut().enumerate() {
            let key = feature_key(&*feature).map(|key| self.spec.key_format.apply(key));
            let row = match key.and_then(|key| index.get(&key).copied()) {
                Some(row) => row,
                None => {
                    report.unmatched.push(i);
                    continue;
                }
            };

            report.matched += 1;
            for &(name, col) in &columns {
                let value = records.number(row, col);
                if value.is_missing() {
                    report.unavailable_values += 1;
                }
                feature.set_property(name, value);
            }
        }

        if report.duplicate_keys > 0 {
            warn!(
                column = %self.spec.record_key,
                duplicates = report.duplicate_keys,
                "duplicate join keys in records; first occurrence kept"
            );
        }
        if !report.unmatched.is_empty() {
            warn!(
                unmatched = report.unmatched.len(),
                total = features.len(),
                "features without a matching record"
            );
        }
        debug!(
            matched = report.matched,
            attributes = columns.len(),
            unavailable = report.unavailable_values,
            "join complete"
        );

        Ok(report)
    }
}

/// Map each key to the first row holding it. Rows with blank keys are skipped.
fn index_records(
    records: &RecordSet,
    key_col: usize,
    key_format: &KeyFormat,
) -> (HashMap<JoinKey, usize>, usize) {
    let mut index = HashMap::with_capacity(records.row_count());
    let mut duplicates = 0;

    for (row, raw) in records.column_values(key_col).enumerate() {
        let Some(key) = JoinKey::new(raw).map(|k| key_format.apply(k)) else {
            continue;
        };
        match index.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(row);
            }
            Entry::Occupied(_) => duplicates += 1,
        }
    }

    (index, duplicates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TractMapError;
    use crate::record::{Record, Value};

    fn tract(geoid: Value) -> Feature {
        Feature::new(None, Record::new()).with_property("GEOID", geoid)
    }

    fn records(rows: &[&[&str]]) -> RecordSet {
        RecordSet::new(
            vec!["GEOID".into(), "time".into(), "transit".into()],
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
            b',',
        )
    }

    #[test]
    fn test_join_copies_parsed_numbers() {
        let mut features = FeatureCollection::new(vec![
            tract(Value::Text("1".into())),
            tract(Value::Text("2".into())),
        ]);
        let rs = records(&[&["2", "30.5", "0.1"], &["1", "25", "0.4"]]);

        let joiner = Joiner::new(JoinSpec::on("GEOID").with_attributes(["time", "transit"]));
        let report = joiner.join(&mut features, &rs).unwrap();

        assert_eq!(report.matched, 2);
        assert!(report.unmatched.is_empty());
        assert_eq!(features.features[0].number("time"), Some(25.0));
        assert_eq!(features.features[1].number("transit"), Some(0.1));
    }

    #[test]
    fn test_unmatched_feature_is_left_unset() {
        let mut features = FeatureCollection::new(vec![tract(Value::Text("9".into()))]);
        let rs = records(&[&["1", "25", "0.4"]]);

        let joiner = Joiner::new(JoinSpec::on("GEOID").with_attribute("time"));
        let report = joiner.join(&mut features, &rs).unwrap();

        assert_eq!(report.unmatched, vec![0]);
        assert_eq!(features.features[0].property("time"), None);
    }

    #[test]
    fn test_unparsable_value_is_missing_not_zero() {
        let mut features = FeatureCollection::new(vec![tract(Value::Text("1".into()))]);
        let rs = records(&[&["1", "", "n/a"]]);

        let joiner = Joiner::new(JoinSpec::on("GEOID").with_attributes(["time", "transit"]));
        let report = joiner.join(&mut features, &rs).unwrap();

        assert_eq!(report.unavailable_values, 2);
        assert_eq!(features.features[0].property("time"), Some(&Value::Missing));
        assert_ne!(features.features[0].property("time"), Some(&Value::Number(0.0)));
    }

    #[test]
    fn test_first_duplicate_wins() {
        let mut features = FeatureCollection::new(vec![tract(Value::Text("1".into()))]);
        let rs = records(&[&["1", "10", "0"], &["1", "99", "0"]]);

        let joiner = Joiner::new(JoinSpec::on("GEOID").with_attribute("time"));
        let report = joiner.join(&mut features, &rs).unwrap();

        assert_eq!(report.duplicate_keys, 1);
        assert_eq!(features.features[0].number("time"), Some(10.0));
    }

    #[test]
    fn test_numeric_feature_key_matches_text_record_key() {
        let mut features = FeatureCollection::new(vec![tract(Value::Number(11001000100.0))]);
        let rs = records(&[&["11001000100", "42", "0"]]);

        let joiner = Joiner::new(JoinSpec::on("GEOID").with_attribute("time"));
        joiner.join(&mut features, &rs).unwrap();

        assert_eq!(features.features[0].number("time"), Some(42.0));
    }

    #[test]
    fn test_zero_padded_keys_need_key_format() {
        let rs = records(&[&["01001", "42", "0"]]);

        let mut plain = FeatureCollection::new(vec![tract(Value::Number(1001.0))]);
        let joiner = Joiner::new(JoinSpec::on("GEOID").with_attribute("time"));
        assert_eq!(joiner.join(&mut plain, &rs).unwrap().matched, 0);

        let mut padded = FeatureCollection::new(vec![tract(Value::Number(1001.0))]);
        let joiner = Joiner::new(
            JoinSpec::on("GEOID")
                .with_attribute("time")
                .with_key_format(KeyFormat::new().with_zero_pad(5)),
        );
        assert_eq!(joiner.join(&mut padded, &rs).unwrap().matched, 1);
    }

    #[test]
    fn test_existing_properties_are_kept() {
        let mut features = FeatureCollection::new(vec![
            tract(Value::Text("1".into())).with_property("NAME", Value::Text("Tract 1".into())),
        ]);
        let rs = records(&[&["1", "25", "0.4"]]);

        Joiner::new(JoinSpec::on("GEOID").with_attribute("time"))
            .join(&mut features, &rs)
            .unwrap();

        let feature = &features.features[0];
        assert_eq!(feature.property("NAME"), Some(&Value::Text("Tract 1".into())));
        assert_eq!(feature.properties.len(), 3);
    }

    #[test]
    fn test_missing_attribute_column_fails() {
        let mut features = FeatureCollection::new(vec![tract(Value::Text("1".into()))]);
        let rs = records(&[&["1", "25", "0.4"]]);

        let joiner = Joiner::new(JoinSpec::on("GEOID").with_attribute("walk"));
        let err = joiner.join(&mut features, &rs).unwrap_err();
        assert!(matches!(err, TractMapError::MissingColumn { ref column, .. } if column == "walk"));
    }

    #[test]
    fn test_join_by_accessor() {
        let mut features = FeatureCollection::new(vec![
            Feature::new(None, Record::new())
                .with_property("STATE", Value::Text("11".into()))
                .with_property("TRACT", Value::Text("000100".into())),
        ]);
        let rs = records(&[&["11000100", "33", "0"]]);

        let joiner = Joiner::new(JoinSpec::new("", "GEOID").with_attribute("time"));
        joiner
            .join_by(&mut features, &rs, |f| {
                let state = f.property("STATE")?.to_string();
                let tract = f.property("TRACT")?.to_string();
                JoinKey::new(&format!("{}{}", state, tract))
            })
            .unwrap();

        assert_eq!(features.features[0].number("time"), Some(33.0));
    }

    #[test]
    fn test_join_by_pads_accessor_keys() {
        let mut features = FeatureCollection::new(vec![
            Feature::new(None, Record::new()).with_property("TRACT", Value::Number(100.0)),
        ]);
        let rs = records(&[&["000100", "41", "0"]]);

        let joiner = Joiner::new(
            JoinSpec::new("", "GEOID")
                .with_attribute("time")
                .with_key_format(KeyFormat::new().with_zero_pad(6)),
        );
        let report = joiner
            .join_by(&mut features, &rs, |f| f.property("TRACT").and_then(JoinKey::from_value))
            .unwrap();

        assert_eq!(report.matched, 1);
        assert_eq!(features.features[0].number("time"), Some(41.0));
    }
}
