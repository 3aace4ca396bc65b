//! Error types raised while loading input artefacts.
#![forbid(unsafe_code)]

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while loading the grid or the distance table.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Reading an input file failed.
    #[error("failed to read {path}")]
    ReadFile {
        /// Path of the unreadable file.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// The grid CSV is missing a required column.
    #[error("grid file {path} has no '{column}' column")]
    MissingColumn {
        /// Path of the grid file.
        path: Utf8PathBuf,
        /// Name of the absent column.
        column: String,
    },
    /// A grid CSV record could not be parsed.
    #[error("failed to parse grid record {record} in {path}")]
    ParseRecord {
        /// Path of the grid file.
        path: Utf8PathBuf,
        /// One-based record number within the file.
        record: usize,
    },
    /// Reading a CSV record failed at the format level.
    #[error("failed to read grid records from {path}")]
    Csv {
        /// Path of the grid file.
        path: Utf8PathBuf,
        /// Source error from the CSV reader.
        #[source]
        source: csv::Error,
    },
    /// Two grid records share an identifier.
    #[error("duplicate cell id {id} in {path}")]
    DuplicateCell {
        /// Path of the grid file.
        path: Utf8PathBuf,
        /// The repeated identifier.
        id: u64,
    },
    /// A grid record failed domain validation.
    #[error("invalid cell in {path}")]
    InvalidCell {
        /// Path of the grid file.
        path: Utf8PathBuf,
        /// Source error from cell construction.
        #[source]
        source: sitecover_core::GridCellError,
    },
    /// The distance table file is not valid JSON.
    #[error("failed to parse distance table {path}")]
    ParseJson {
        /// Path of the distance table file.
        path: Utf8PathBuf,
        /// Source error from `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// The distance table's top level is not a JSON object.
    #[error("distance table {path} must be a JSON object keyed by facility type")]
    MalformedTable {
        /// Path of the distance table file.
        path: Utf8PathBuf,
    },
}
