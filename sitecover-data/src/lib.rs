//! Loaders for sitecover input artefacts.
//!
//! Two inputs feed the pipeline: a grid of cells with centroids and a
//! demand column (CSV), and a per-facility-type distance table (JSON).
//! Both are normalized into `sitecover-core` types at ingestion so the
//! rest of the pipeline sees exactly one canonical shape. Geometry
//! parsing and coordinate reprojection happen upstream of these files;
//! centroids arrive as planar projected coordinates.

#![forbid(unsafe_code)]

mod distances;
mod error;
mod grid;

pub use distances::{load_distance_table, parse_distance_table};
pub use error::LoadError;
pub use grid::load_grid;

#[cfg(test)]
mod tests;
