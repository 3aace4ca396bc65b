//! Load the analysis grid from CSV.

use std::collections::HashSet;

use camino::Utf8Path;
use geo::Coord;
use sitecover_core::GridCell;

use crate::LoadError;

const ID_COLUMN: &str = "id";
const X_COLUMN: &str = "x";
const Y_COLUMN: &str = "y";

/// Load grid cells from a CSV file.
///
/// The file must carry an `id`, `x`, and `y` column plus the named
/// demand column; `x` and `y` are cell centroids in planar projected
/// coordinates. Records keep their file order. Identifiers must be
/// unique across the file.
///
/// # Errors
/// Returns [`LoadError`] when the file cannot be read, a required
/// column is missing, a record fails to parse or validate, or an
/// identifier repeats.
pub fn load_grid(path: &Utf8Path, demand_column: &str) -> Result<Vec<GridCell>, LoadError> {
    let file = std::fs::File::open(path.as_std_path()).map_err(|source| LoadError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::Reader::from_reader(file);

    let headers = reader.headers().map_err(|source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    })?;
    let id_index = column_index(headers, ID_COLUMN, path)?;
    let x_index = column_index(headers, X_COLUMN, path)?;
    let y_index = column_index(headers, Y_COLUMN, path)?;
    let demand_index = column_index(headers, demand_column, path)?;

    let mut cells = Vec::new();
    let mut seen = HashSet::new();
    for (record_number, record) in reader.records().enumerate() {
        let record = record.map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let cell = parse_record(
            &record,
            record_number + 1,
            (id_index, x_index, y_index, demand_index),
            path,
        )?;
        if !seen.insert(cell.id) {
            return Err(LoadError::DuplicateCell {
                path: path.to_path_buf(),
                id: cell.id,
            });
        }
        cells.push(cell);
    }

    log::debug!("loaded {} grid cells from {path}", cells.len());
    Ok(cells)
}

fn parse_record(
    record: &csv::StringRecord,
    record_number: usize,
    (id_index, x_index, y_index, demand_index): (usize, usize, usize, usize),
    path: &Utf8Path,
) -> Result<GridCell, LoadError> {
    let parse_failure = || LoadError::ParseRecord {
        path: path.to_path_buf(),
        record: record_number,
    };

    let id: u64 = field(record, id_index, parse_failure)?;
    let x: f64 = field(record, x_index, parse_failure)?;
    let y: f64 = field(record, y_index, parse_failure)?;
    let demand: f64 = field(record, demand_index, parse_failure)?;

    GridCell::new(id, Coord { x, y }, demand).map_err(|source| LoadError::InvalidCell {
        path: path.to_path_buf(),
        source,
    })
}

fn field<T: std::str::FromStr>(
    record: &csv::StringRecord,
    index: usize,
    failure: impl Fn() -> LoadError,
) -> Result<T, LoadError> {
    record
        .get(index)
        .and_then(|raw| raw.trim().parse().ok())
        .ok_or_else(failure)
}

fn column_index(
    headers: &csv::StringRecord,
    column: &str,
    path: &Utf8Path,
) -> Result<usize, LoadError> {
    headers
        .iter()
        .position(|header| header == column)
        .ok_or_else(|| LoadError::MissingColumn {
            path: path.to_path_buf(),
            column: column.to_owned(),
        })
}
