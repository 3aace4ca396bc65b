//! Configuration resolution for the `solve` subcommand.
//!
//! Three layers, strongest first: explicit CLI flags, the optional
//! JSON configuration file, and built-in defaults. The defaults mirror
//! the reference deployment: 1200 m access distance, 0.85 candidate
//! quantile, 3 facilities, 750 m coverage distance, demand column
//! `val`.

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;

use crate::{CliError, SolveArgs};

const DEFAULT_DEMAND_COLUMN: &str = "val";
const DEFAULT_MAX_ACCESS_DISTANCE: f64 = 1200.0;
const DEFAULT_QUANTILE: f64 = 0.85;
const DEFAULT_FACILITY_COUNT: usize = 3;
const DEFAULT_MAX_COVER_DISTANCE: f64 = 750.0;

/// The facility types scored when none are configured.
#[must_use]
pub fn default_facility_types() -> Vec<String> {
    ["park", "laundry", "health", "bus", "subway", "cafe"]
        .into_iter()
        .map(ToOwned::to_owned)
        .collect()
}

/// Fully resolved configuration for one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Path to the grid CSV.
    pub grid_path: Utf8PathBuf,
    /// Path to the distance table JSON.
    pub distances_path: Utf8PathBuf,
    /// Demand-weight column in the grid file.
    pub demand_column: String,
    /// Facility types to score.
    pub facility_types: Vec<String>,
    /// Maximum access distance in metres for scoring.
    pub max_access_distance: f64,
    /// Upper quantile for candidate selection.
    pub candidate_quantile: f64,
    /// Number of facilities to place.
    pub facility_count: usize,
    /// Maximum coverage distance in metres for the solver.
    pub max_cover_distance: f64,
    /// Report destination; standard output when absent.
    pub output: Option<Utf8PathBuf>,
}

/// Optional values read from a JSON configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct FileConfig {
    grid: Option<Utf8PathBuf>,
    distances: Option<Utf8PathBuf>,
    demand_column: Option<String>,
    facility_types: Option<Vec<String>>,
    max_access_distance: Option<f64>,
    quantile: Option<f64>,
    facilities: Option<usize>,
    max_cover_distance: Option<f64>,
    output: Option<Utf8PathBuf>,
}

impl FileConfig {
    pub(crate) fn load(path: &Utf8Path) -> Result<Self, CliError> {
        let raw =
            std::fs::read_to_string(path.as_std_path()).map_err(|source| CliError::ReadConfig {
                path: path.to_path_buf(),
                source,
            })?;
        serde_json::from_str(&raw).map_err(|source| CliError::ParseConfig {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Merge flags over file values over defaults.
pub(crate) fn resolve(args: SolveArgs, file: FileConfig) -> Result<PipelineConfig, CliError> {
    let grid_path = args
        .grid
        .or(file.grid)
        .ok_or(CliError::MissingArgument { field: "grid" })?;
    let distances_path = args
        .distances
        .or(file.distances)
        .ok_or(CliError::MissingArgument { field: "distances" })?;

    let max_access_distance = args
        .max_access_distance
        .or(file.max_access_distance)
        .unwrap_or(DEFAULT_MAX_ACCESS_DISTANCE);
    if !max_access_distance.is_finite() || max_access_distance <= 0.0 {
        return Err(CliError::InvalidOption {
            field: "max-access-distance",
            value: max_access_distance.to_string(),
        });
    }

    Ok(PipelineConfig {
        grid_path,
        distances_path,
        demand_column: args
            .demand_column
            .or(file.demand_column)
            .unwrap_or_else(|| DEFAULT_DEMAND_COLUMN.to_owned()),
        facility_types: args
            .facility_types
            .or(file.facility_types)
            .unwrap_or_else(default_facility_types),
        max_access_distance,
        candidate_quantile: args.quantile.or(file.quantile).unwrap_or(DEFAULT_QUANTILE),
        facility_count: args
            .facilities
            .or(file.facilities)
            .unwrap_or(DEFAULT_FACILITY_COUNT),
        max_cover_distance: args
            .max_cover_distance
            .or(file.max_cover_distance)
            .unwrap_or(DEFAULT_MAX_COVER_DISTANCE),
        output: args.output.or(file.output),
    })
}
