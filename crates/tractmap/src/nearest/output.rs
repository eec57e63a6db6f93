//! Distance records as tabular output.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::finder::DistanceRecord;
use crate::error::Result;
use crate::input::RecordSet;

/// Header names for the two-column distance table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceColumns {
    pub key: String,
    pub distance: String,
}

impl Default for DistanceColumns {
    fn default() -> Self {
        Self {
            key: "GEOID".to_string(),
            distance: "Distance".to_string(),
        }
    }
}

/// Convert distance records into a record set for a later join.
///
/// Distances are written in shortest round-trip form, so parsing them
/// back yields the same numbers.
pub fn distances_to_record_set(records: &[DistanceRecord], columns: &DistanceColumns) -> RecordSet {
    let mut set = RecordSet::with_headers([columns.key.as_str(), columns.distance.as_str()]);
    for record in records {
        set.push_row(vec![
            record.origin_id.to_string(),
            record.distance.to_string(),
        ]);
    }
    set
}

/// Write distance records as a comma-separated file with a two-column header.
pub fn write_distances(
    path: impl AsRef<Path>,
    records: &[DistanceRecord],
    columns: &DistanceColumns,
) -> Result<()> {
    distances_to_record_set(records, columns).write_file(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::JoinKey;

    #[test]
    fn test_record_set_shape() {
        let records = vec![
            DistanceRecord { origin_id: JoinKey::from("11001000100"), distance: 0.25 },
            DistanceRecord { origin_id: JoinKey::from("11001000201"), distance: 1.0 / 3.0 },
        ];
        let set = distances_to_record_set(&records, &DistanceColumns::default());

        assert_eq!(set.headers, vec!["GEOID", "Distance"]);
        assert_eq!(set.row_count(), 2);
        assert_eq!(set.number(1, 1).as_number(), Some(1.0 / 3.0));
    }
}
