//! Unit coverage for the input loaders.
#![forbid(unsafe_code)]

use std::io::Write;

use camino::Utf8PathBuf;
use rstest::rstest;
use serde_json::json;
use tempfile::TempDir;

use crate::{LoadError, load_distance_table, load_grid, parse_distance_table};

fn write_file(dir: &TempDir, name: &str, contents: &str) -> Utf8PathBuf {
    let path = Utf8PathBuf::from_path_buf(dir.path().join(name)).expect("utf8 path");
    let mut file = std::fs::File::create(path.as_std_path()).expect("create file");
    file.write_all(contents.as_bytes()).expect("write file");
    path
}

#[rstest]
fn loads_grid_with_named_demand_column() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_file(
        &dir,
        "grid.csv",
        "id,x,y,val\n1,100.0,200.0,10.5\n2,300.0,400.0,0\n",
    );

    let cells = load_grid(&path, "val").expect("grid loads");

    assert_eq!(cells.len(), 2);
    assert_eq!(cells[0].id, 1);
    assert_eq!(cells[0].centroid.x, 100.0);
    assert_eq!(cells[0].demand, 10.5);
    assert_eq!(cells[1].demand, 0.0);
}

#[rstest]
fn missing_demand_column_is_reported() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_file(&dir, "grid.csv", "id,x,y\n1,0,0\n");

    let err = load_grid(&path, "val").expect_err("column missing");

    assert!(matches!(err, LoadError::MissingColumn { column, .. } if column == "val"));
}

#[rstest]
fn duplicate_ids_are_rejected() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_file(&dir, "grid.csv", "id,x,y,val\n1,0,0,1\n1,5,5,2\n");

    let err = load_grid(&path, "val").expect_err("duplicate id");

    assert!(matches!(err, LoadError::DuplicateCell { id: 1, .. }));
}

#[rstest]
fn unparsable_records_are_rejected() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_file(&dir, "grid.csv", "id,x,y,val\n1,0,0,1\nnope,5,5,2\n");

    let err = load_grid(&path, "val").expect_err("bad record");

    assert!(matches!(err, LoadError::ParseRecord { record: 2, .. }));
}

#[rstest]
fn negative_demand_fails_validation() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_file(&dir, "grid.csv", "id,x,y,val\n1,0,0,-4\n");

    let err = load_grid(&path, "val").expect_err("negative demand");

    assert!(matches!(err, LoadError::InvalidCell { .. }));
}

#[rstest]
fn missing_grid_file_is_a_read_error() {
    let err = load_grid(Utf8PathBuf::from("/nonexistent/grid.csv").as_path(), "val")
        .expect_err("missing file");
    assert!(matches!(err, LoadError::ReadFile { .. }));
}

#[rstest]
fn normalizes_both_distance_encodings() {
    let raw = json!({
        "park": {
            "1": [100.0, null, 2000.0],
            "2": { "distances": [50.0, "75.5"] },
        },
        "cafe": {
            "1": { "distances": [300] },
        },
    });
    let Some(map) = raw.as_object() else {
        panic!("fixture is an object");
    };

    let table = parse_distance_table(map);

    assert_eq!(
        table.observations("park", 1),
        &[Some(100.0), None, Some(2000.0)]
    );
    assert_eq!(table.observations("park", 2), &[Some(50.0), Some(75.5)]);
    assert_eq!(table.observations("cafe", 1), &[Some(300.0)]);
}

#[rstest]
fn malformed_entries_degrade_to_empty() {
    let raw = json!({
        "park": {
            "1": "not-a-list",
            "2": { "unexpected": true },
            "3": 17,
            "not-a-cell": [1.0],
        },
        "bus": ["entirely", "wrong"],
    });
    let Some(map) = raw.as_object() else {
        panic!("fixture is an object");
    };

    let table = parse_distance_table(map);

    assert!(table.observations("park", 1).is_empty());
    assert!(table.observations("park", 2).is_empty());
    assert!(table.observations("park", 3).is_empty());
    assert!(table.observations("bus", 1).is_empty());
}

#[rstest]
fn non_numeric_distance_values_become_unknown() {
    let raw = json!({ "park": { "1": [true, "abc", 12.0] } });
    let Some(map) = raw.as_object() else {
        panic!("fixture is an object");
    };

    let table = parse_distance_table(map);

    assert_eq!(table.observations("park", 1), &[None, None, Some(12.0)]);
}

#[rstest]
fn distance_table_top_level_must_be_an_object() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_file(&dir, "distances.json", "[1, 2, 3]");

    let err = load_distance_table(&path).expect_err("not an object");

    assert!(matches!(err, LoadError::MalformedTable { .. }));
}

#[rstest]
fn distance_table_loads_from_disk() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_file(&dir, "distances.json", r#"{"subway": {"7": [640.0]}}"#);

    let table = load_distance_table(&path).expect("table loads");

    assert_eq!(table.observations("subway", 7), &[Some(640.0)]);
}
