//! Load and normalize the facility distance table.
//!
//! The raw JSON is loosely typed: each facility type maps cell ids
//! (as JSON strings) to either a bare list of nullable distances or an
//! object carrying that list under a `"distances"` key. Everything is
//! normalized into the canonical [`DistanceTable`] here, so scoring
//! never sees the dual encoding. Amenity exports are routinely
//! incomplete; malformed entries degrade to "no observations" with a
//! log warning instead of failing the load.

use camino::Utf8Path;
use serde_json::Value;
use sitecover_core::DistanceTable;

use crate::LoadError;

/// Load a distance table from a JSON file.
///
/// # Errors
/// Returns [`LoadError`] when the file cannot be read, is not valid
/// JSON, or its top level is not an object. Anything below the top
/// level is recovered defensively rather than surfaced.
pub fn load_distance_table(path: &Utf8Path) -> Result<DistanceTable, LoadError> {
    let raw = std::fs::read_to_string(path.as_std_path()).map_err(|source| LoadError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&raw).map_err(|source| LoadError::ParseJson {
        path: path.to_path_buf(),
        source,
    })?;
    let Value::Object(map) = value else {
        return Err(LoadError::MalformedTable {
            path: path.to_path_buf(),
        });
    };
    let table = parse_distance_table(&map);
    let mut types: Vec<&str> = table.facility_types().collect();
    types.sort_unstable();
    log::debug!(
        "loaded {} facility types from {path}: {}",
        table.type_count(),
        types.join(", ")
    );
    Ok(table)
}

/// Normalize a parsed JSON object into a [`DistanceTable`].
///
/// Cell keys that do not parse as unsigned integers are dropped with a
/// warning; they can never match a grid identifier. Per-cell entries
/// that are neither a list nor an object with a `"distances"` list
/// normalize to an empty observation list.
#[must_use]
pub fn parse_distance_table(raw: &serde_json::Map<String, Value>) -> DistanceTable {
    let mut table = DistanceTable::new();
    for (facility_type, cells) in raw {
        let Value::Object(cells) = cells else {
            log::warn!(
                "facility type {facility_type}: expected an object of cells, found {cells:?}"
            );
            continue;
        };
        for (key, entry) in cells {
            let Ok(cell_id) = key.parse::<u64>() else {
                log::warn!("facility type {facility_type}: dropping non-numeric cell key {key:?}");
                continue;
            };
            table.insert(facility_type.clone(), cell_id, normalize_entry(entry));
        }
    }
    table
}

/// Flatten one raw per-cell entry into a list of optional distances.
fn normalize_entry(entry: &Value) -> Vec<Option<f64>> {
    let list = match entry {
        Value::Array(list) => list,
        Value::Object(record) => match record.get("distances") {
            Some(Value::Array(list)) => list,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };
    list.iter().map(normalize_distance).collect()
}

/// Interpret one raw distance value.
///
/// Numbers pass through, numeric strings parse (mirroring the lenient
/// ingestion the table was exported for), everything else is an
/// unknown observation.
fn normalize_distance(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}
