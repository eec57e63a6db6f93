//! Integration tests for TractMap.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use tempfile::{tempdir, NamedTempFile, TempDir};

use tractmap::nearest::{distances_to_record_set, write_distances, DistanceColumns};
use tractmap::{
    CentroidMethod, ClassAssignment, ClassificationMethod, ColorRamp, DistanceUnit,
    FeatureCollection, JoinSpec, Joiner, KeyFormat, Legend, MapConfig, Parser, TractMap,
    TractMapError, Value,
};

/// Helper to create a temporary file with given content.
fn create_test_file(content: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

/// A unit square tract with its lower-left corner at (x, y).
fn tract(geoid: &str, x: f64, y: f64) -> String {
    format!(
        r#"{{"type":"Feature","properties":{{"GEOID":"{geoid}","NAME":"Tract {geoid}"}},"geometry":{{"type":"Polygon","coordinates":[[[{x0},{y0}],[{x1},{y0}],[{x1},{y1}],[{x0},{y1}],[{x0},{y0}]]]}}}}"#,
        geoid = geoid,
        x0 = x,
        y0 = y,
        x1 = x + 0.01,
        y1 = y + 0.01,
    )
}

fn station(x: f64, y: f64) -> String {
    format!(
        r#"{{"type":"Feature","properties":{{"NAME":"Station"}},"geometry":{{"type":"Point","coordinates":[{},{}]}}}}"#,
        x, y
    )
}

fn collection(features: &[String]) -> String {
    format!(
        r#"{{"type":"FeatureCollection","features":[{}]}}"#,
        features.join(",")
    )
}

fn tracts_geojson() -> String {
    collection(&[
        tract("11001000100", -77.05, 38.90),
        tract("11001000201", -77.04, 38.90),
        tract("11001000202", -77.03, 38.90),
        tract("11001000300", -77.02, 38.90),
        tract("11001000400", -77.01, 38.90),
        tract("11001009999", -77.00, 38.90),
    ])
}

const COMMUTE_CSV: &str = "GEOID,mean_time,pct_transit\n\
                           11001000100,22.5,41.0\n\
                           11001000201,27.0,35.5\n\
                           11001000202,31.2,N/A\n\
                           11001000300,35.9,20.1\n\
                           11001000400,44.0,12.0\n";

struct Workspace {
    dir: TempDir,
    features: PathBuf,
    records: PathBuf,
}

fn workspace() -> Workspace {
    let dir = tempdir().expect("Failed to create temp dir");
    let features = dir.path().join("tracts.geojson");
    let records = dir.path().join("commute.csv");
    fs::write(&features, tracts_geojson()).unwrap();
    fs::write(&records, COMMUTE_CSV).unwrap();
    Workspace {
        dir,
        features,
        records,
    }
}

fn commute_config() -> MapConfig {
    let mut config = MapConfig::default();
    config.join = JoinSpec::on("GEOID").with_attributes(["mean_time", "pct_transit"]);
    config
}

// =============================================================================
// Pipeline Tests
// =============================================================================

#[test]
fn test_build_files_end_to_end() {
    let ws = workspace();
    let map = TractMap::with_config(commute_config());

    let layer = map
        .build_files(&ws.features, &ws.records, "mean_time")
        .expect("Build failed");

    assert_eq!(layer.features.len(), 6);
    assert_eq!(layer.join.matched, 5);
    assert_eq!(layer.join.unmatched, vec![5]);
    assert_eq!(layer.join.unavailable_values, 1);

    // Five values, five classes: one per class
    assert_eq!(layer.scheme.breakpoints(), &[27.0, 31.2, 35.9, 44.0]);
    let classes: Vec<Option<usize>> = layer.assignments.iter().map(|a| a.index()).collect();
    assert_eq!(classes, vec![Some(0), Some(1), Some(2), Some(3), Some(4), None]);

    // Unmatched tract keeps its own properties and gains nothing
    let unmatched = &layer.features.features[5];
    assert!(unmatched.property("mean_time").is_none());
    assert_eq!(
        unmatched.property("NAME"),
        Some(&Value::Text("Tract 11001009999".into()))
    );

    // Unparsable cell is an explicit null, not zero
    assert_eq!(
        layer.features.features[2].property("pct_transit"),
        Some(&Value::Missing)
    );
}

#[test]
fn test_saved_outputs_reload() {
    let ws = workspace();
    let map = TractMap::with_config(commute_config());
    let layer = map
        .build_files(&ws.features, &ws.records, "pct_transit")
        .unwrap();

    let out = ws.dir.path().join("out").join("tracts.enriched.geojson");
    let legend_path = ws.dir.path().join("out").join("legend.json");
    layer.save(&out, Some(legend_path.as_path())).unwrap();

    let (reloaded, source) = FeatureCollection::load(&out).unwrap();
    assert_eq!(source.format, "geojson");
    assert_eq!(reloaded.len(), 6);
    assert_eq!(reloaded.features[0].number("pct_transit"), Some(41.0));
    assert_eq!(reloaded.features[2].property("pct_transit"), Some(&Value::Missing));
    assert!(reloaded.features[5].property("pct_transit").is_none());

    let legend: Legend = serde_json::from_str(&fs::read_to_string(&legend_path).unwrap()).unwrap();
    assert_eq!(legend.attribute, "pct_transit");
    assert_eq!(legend.colors.len(), 5);
    assert_eq!(legend.summary.available, 4);
    assert_eq!(legend.classes["11001000202"], ClassAssignment::Unavailable);
    assert_eq!(legend.classes["11001009999"], ClassAssignment::Unavailable);
}

#[test]
fn test_build_from_config_file() {
    let ws = workspace();

    let mut config = commute_config();
    config.paths.features = Some(PathBuf::from("tracts.geojson"));
    config.paths.records = Some(PathBuf::from("commute.csv"));
    config.classification.class_count = 2;
    config.classification.method = ClassificationMethod::NaturalBreaks;
    config.colors = ColorRamp::new(["#fee8c8", "#e34a33"], "#cccccc").unwrap();
    let config_path = ws.dir.path().join("map.json");
    config.save(&config_path).unwrap();

    let loaded = MapConfig::load(&config_path).unwrap();
    let attribute = loaded.selected_attribute(None).unwrap();
    assert_eq!(attribute, "mean_time");

    let map = TractMap::with_config(loaded.clone());
    let layer = map
        .build_files(
            loaded.paths.require_features().unwrap(),
            loaded.paths.require_records().unwrap(),
            &attribute,
        )
        .unwrap();

    assert_eq!(layer.scheme.breakpoints(), &[35.9]);
    assert_eq!(layer.color_of(4), Some("#e34a33"));
    assert_eq!(layer.color_of(5), Some("#cccccc"));
}

#[test]
fn test_missing_attribute_column() {
    let ws = workspace();
    let mut config = commute_config();
    config.join = config.join.with_attribute("median_income");

    let err = TractMap::with_config(config)
        .build_files(&ws.features, &ws.records, "mean_time")
        .unwrap_err();

    match err {
        TractMapError::MissingColumn { column, available } => {
            assert_eq!(column, "median_income");
            assert!(available.contains("pct_transit"));
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_zero_padded_keys_join() {
    // Numeric GEOIDs that lost their leading zero in a spreadsheet
    let features = create_test_file(
        &collection(&[tract("01001020100", -86.5, 32.4), tract("01001020200", -86.4, 32.4)]),
        ".geojson",
    );
    let records = create_test_file("tract;commuters\n1001020100;812\n1001020200;640\n", ".csv");

    let mut config = MapConfig::default();
    config.join = JoinSpec::new("GEOID", "tract")
        .with_attribute("commuters")
        .with_key_format(KeyFormat::new().with_zero_pad(11));
    config.classification.class_count = 1;
    config.colors = ColorRamp::new(["#2b8cbe"], "#cccccc").unwrap();

    let layer = TractMap::with_config(config)
        .build_files(features.path(), records.path(), "commuters")
        .unwrap();

    assert_eq!(layer.join.matched, 2);
    assert_eq!(layer.features.features[1].number("commuters"), Some(640.0));
}

#[test]
fn test_build_from_topojson_tracts() {
    // Two adjacent tracts sharing the arc along x = -77.04
    let topology = r#"{
        "type": "Topology",
        "objects": {"tracts": {"type": "GeometryCollection", "geometries": [
            {"type": "Polygon", "arcs": [[1, 0]], "properties": {"GEOID": "11001000100"}},
            {"type": "Polygon", "arcs": [[2, -1]], "properties": {"GEOID": "11001000201"}}
        ]}},
        "arcs": [
            [[-77.04, 38.90], [-77.04, 38.91]],
            [[-77.04, 38.91], [-77.05, 38.91], [-77.05, 38.90], [-77.04, 38.90]],
            [[-77.04, 38.90], [-77.03, 38.90], [-77.03, 38.91], [-77.04, 38.91]]
        ]
    }"#;
    let features = create_test_file(topology, ".topojson");
    let records = create_test_file(COMMUTE_CSV, ".csv");

    let map = TractMap::with_config(commute_config());
    let inputs = map.load(features.path(), records.path()).unwrap();
    assert_eq!(inputs.features_source.format, "topojson");

    let layer = map
        .build(inputs.features, &inputs.records, "mean_time")
        .expect("Build failed");
    assert_eq!(layer.join.matched, 2);
    assert_eq!(layer.features.features[0].number("mean_time"), Some(22.5));
    assert_eq!(layer.features.features[1].number("mean_time"), Some(27.0));
}

#[test]
fn test_duplicate_keys_first_wins() {
    let ws = workspace();
    let records = create_test_file(
        "GEOID\tmean_time\tpct_transit\n\
         11001000100\t10\t1\n\
         11001000100\t99\t2\n",
        ".tsv",
    );

    let mut features = FeatureCollection::load(&ws.features).unwrap().0;
    let (records, source) = Parser::new().parse_file(records.path()).unwrap();
    assert_eq!(source.format, "tsv");

    let report = Joiner::new(commute_config().join)
        .join(&mut features, &records)
        .unwrap();
    assert_eq!(report.duplicate_keys, 1);
    assert_eq!(report.matched, 1);
    assert_eq!(features.features[0].number("mean_time"), Some(10.0));
}

// =============================================================================
// Nearest Distance Tests
// =============================================================================

#[test]
fn test_distances_through_csv_join_like_in_memory() {
    let ws = workspace();
    let stations = create_test_file(
        &collection(&[station(-77.045, 38.905), station(-77.0, 38.91), station(-76.9, 38.8)]),
        ".geojson",
    );

    let (tracts, _) = FeatureCollection::load(&ws.features).unwrap();
    let (targets, _) = FeatureCollection::load(stations.path()).unwrap();

    let map = TractMap::with_config(commute_config());
    let distances = map.nearest_distances(&tracts, &targets).unwrap();
    assert_eq!(distances.len(), 6);
    assert!(distances.iter().all(|d| d.distance.is_finite() && d.distance >= 0.0));

    let columns = DistanceColumns::default();
    let csv_path = ws.dir.path().join("min_distance.csv");
    write_distances(&csv_path, &distances, &columns).unwrap();

    let text = fs::read_to_string(&csv_path).unwrap();
    assert!(text.starts_with("GEOID,Distance\n"));

    let (from_file, _) = Parser::new().parse_file(&csv_path).unwrap();
    let in_memory = distances_to_record_set(&distances, &columns);

    let joiner = Joiner::new(JoinSpec::on("GEOID").with_attribute("Distance"));
    let mut via_file = tracts.clone();
    let mut via_memory = tracts.clone();
    joiner.join(&mut via_file, &from_file).unwrap();
    joiner.join(&mut via_memory, &in_memory).unwrap();

    for (a, b) in via_file.iter().zip(via_memory.iter()) {
        assert_eq!(a.property("Distance"), b.property("Distance"));
    }
    assert_eq!(via_file.features[0].number("Distance"), Some(distances[0].distance));
}

#[test]
fn test_distance_units_and_centroids() {
    let ws = workspace();
    let stations = create_test_file(&collection(&[station(-77.1, 38.9)]), ".geojson");
    let (tracts, _) = FeatureCollection::load(&ws.features).unwrap();
    let (targets, _) = FeatureCollection::load(stations.path()).unwrap();

    let mut config = commute_config();
    config.nearest.unit = DistanceUnit::Kilometers;
    let km = TractMap::with_config(config.clone())
        .nearest_distances(&tracts, &targets)
        .unwrap();

    config.nearest.unit = DistanceUnit::Miles;
    config.nearest.centroid = CentroidMethod::Area;
    let miles = TractMap::with_config(config)
        .nearest_distances(&tracts, &targets)
        .unwrap();

    // Squares: vertex mean and area centroid coincide
    for (k, m) in km.iter().zip(&miles) {
        assert_eq!(k.origin_id, m.origin_id);
        assert!((k.distance / 1.609344 - m.distance).abs() < 1e-9);
    }
}

#[test]
fn test_empty_targets_rejected() {
    let ws = workspace();
    let empty = create_test_file(&collection(&[]), ".geojson");
    let (tracts, _) = FeatureCollection::load(&ws.features).unwrap();
    let (targets, _) = FeatureCollection::load(empty.path()).unwrap();

    let err = TractMap::new().nearest_distances(&tracts, &targets).unwrap_err();
    assert!(matches!(err, TractMapError::InvalidInput(_)));
}
