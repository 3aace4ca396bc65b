//! Command-line interface for the sitecover siting pipeline.
//!
//! Runs the full decision pipeline in sequence: load the grid and
//! distance table, score every cell, reduce to candidates, solve the
//! maximal covering location problem exactly, and emit a JSON report
//! of the selected sites and their attributed coverage.
#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use sitecover_core::{CoverageProblem, CoverageSolver, GridCell, SiteSelection};
use sitecover_data::{load_distance_table, load_grid};
use sitecover_scorer::{score_grid, select_candidates};
use sitecover_solver_highs::HighsSolver;
use thiserror::Error;

mod config;

pub use config::{PipelineConfig, default_facility_types};

/// Run the sitecover CLI with the current process arguments.
///
/// # Errors
/// Returns [`CliError`] when argument parsing, configuration
/// resolution, loading, selection, or solving fails. Help and version
/// requests print to standard output and succeed.
pub fn run() -> Result<(), CliError> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if is_informational(&err) => {
            err.print()
                .map_err(|source| CliError::WriteHelp { source })?;
            return Ok(());
        }
        Err(err) => return Err(CliError::ArgumentParsing(err)),
    };
    match cli.command {
        Command::Solve(args) => {
            let config = args.into_config()?;
            let report = run_pipeline(&config)?;
            write_report(&report, config.output.as_deref())
        }
    }
}

/// Help and version requests short-circuit Clap parsing as errors but
/// are successful outcomes of the program.
fn is_informational(err: &clap::Error) -> bool {
    matches!(
        err.kind(),
        clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
    )
}

#[derive(Debug, Parser)]
#[command(
    name = "sitecover",
    about = "Optimal facility siting over a scored demand grid",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score the grid, select candidates, and solve the siting problem.
    Solve(SolveArgs),
}

/// CLI arguments for the `solve` subcommand.
///
/// Every tunable can come from a JSON configuration file via
/// `--config`; explicit flags win over file values, which win over the
/// built-in defaults.
#[derive(Debug, Clone, Parser)]
struct SolveArgs {
    /// Path to the grid CSV (columns: id, x, y, demand).
    #[arg(long, value_name = "path")]
    grid: Option<Utf8PathBuf>,
    /// Path to the facility distance table JSON.
    #[arg(long, value_name = "path")]
    distances: Option<Utf8PathBuf>,
    /// Optional JSON configuration file.
    #[arg(long, value_name = "path")]
    config: Option<Utf8PathBuf>,
    /// Name of the demand-weight column in the grid file.
    #[arg(long, value_name = "name")]
    demand_column: Option<String>,
    /// Facility types to score, comma separated.
    #[arg(long, value_name = "tags", value_delimiter = ',')]
    facility_types: Option<Vec<String>>,
    /// Maximum access distance in metres for scoring.
    #[arg(long, value_name = "metres")]
    max_access_distance: Option<f64>,
    /// Upper quantile for candidate selection (0.0..=1.0).
    #[arg(long, value_name = "q")]
    quantile: Option<f64>,
    /// Number of facilities to place.
    #[arg(long, value_name = "count")]
    facilities: Option<usize>,
    /// Maximum coverage distance in metres for the solver.
    #[arg(long, value_name = "metres")]
    max_cover_distance: Option<f64>,
    /// Write the JSON report here instead of standard output.
    #[arg(long, value_name = "path")]
    output: Option<Utf8PathBuf>,
}

impl SolveArgs {
    fn into_config(self) -> Result<PipelineConfig, CliError> {
        let file = match &self.config {
            Some(path) => config::FileConfig::load(path)?,
            None => config::FileConfig::default(),
        };
        config::resolve(self, file)
    }
}

/// Pipeline result serialized as the run's artefact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveReport {
    /// Number of grid cells scored.
    pub cells: usize,
    /// Candidate cell identifiers after quantile selection.
    pub candidates: Vec<u64>,
    /// Selected site identifiers, ascending.
    pub selected: Vec<u64>,
    /// Demand weight attributed to each selected site.
    pub coverage: BTreeMap<u64, f64>,
    /// Total covered demand weight.
    pub objective: f64,
}

/// Execute the scoring, selection, and solving stages in sequence.
///
/// # Errors
/// Propagates loading, selection, and solver errors with their
/// original context.
pub fn run_pipeline(config: &PipelineConfig) -> Result<SolveReport, CliError> {
    let grid = load_grid(&config.grid_path, &config.demand_column)?;
    let table = load_distance_table(&config.distances_path)?;

    let scored = score_grid(
        &grid,
        &config.facility_types,
        &table,
        config.max_access_distance,
    );
    let selection = select_candidates(&scored, config.candidate_quantile)?;
    log::info!(
        "{} candidates from {} cells",
        selection.candidates.len(),
        scored.len()
    );

    let candidates: Vec<GridCell> = selection
        .candidates
        .iter()
        .filter_map(|&id| scored.get(id).map(|entry| entry.cell.clone()))
        .collect();
    let problem = CoverageProblem {
        candidates,
        demand_points: grid,
        facility_count: config.facility_count,
        max_distance: config.max_cover_distance,
    };
    let selection = HighsSolver::new().solve(&problem)?;

    Ok(report(&scored, &problem, selection))
}

fn report(
    scored: &sitecover_core::ScoredGrid,
    problem: &CoverageProblem,
    selection: SiteSelection,
) -> SolveReport {
    SolveReport {
        cells: scored.len(),
        candidates: problem.candidates.iter().map(|cell| cell.id).collect(),
        selected: selection.selected,
        coverage: selection.coverage,
        objective: selection.objective,
    }
}

fn write_report(report: &SolveReport, output: Option<&Utf8Path>) -> Result<(), CliError> {
    let rendered =
        serde_json::to_string_pretty(report).map_err(|source| CliError::RenderReport { source })?;
    match output {
        Some(path) => {
            std::fs::write(path.as_std_path(), rendered).map_err(|source| {
                CliError::WriteReport {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
            log::info!("report written to {path}");
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

/// Errors emitted by the sitecover CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Printing the help or version text failed.
    #[error("failed to write help output")]
    WriteHelp {
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or provide it in --config)")]
    MissingArgument {
        /// The unresolved option's flag name.
        field: &'static str,
    },
    /// An option value fails validation before the pipeline starts.
    #[error("invalid value {value} for --{field}")]
    InvalidOption {
        /// The offending option's flag name.
        field: &'static str,
        /// The rejected value.
        value: String,
    },
    /// Reading the configuration file failed.
    #[error("failed to read configuration file {path}")]
    ReadConfig {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// Parsing the configuration file failed.
    #[error("failed to parse configuration file {path}")]
    ParseConfig {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// Source error from `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// Loading an input artefact failed.
    #[error(transparent)]
    Load(#[from] sitecover_data::LoadError),
    /// Candidate selection rejected its inputs.
    #[error(transparent)]
    Select(#[from] sitecover_scorer::SelectError),
    /// The solver rejected the problem or failed to certify optimality.
    #[error(transparent)]
    Solve(#[from] sitecover_core::SolveError),
    /// Serializing the report failed.
    #[error("failed to render the solve report")]
    RenderReport {
        /// Source error from `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// Writing the report artefact failed.
    #[error("failed to write report to {path}")]
    WriteReport {
        /// Target report path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
}
