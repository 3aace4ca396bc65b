//! Canonical facility distance observations.
//!
//! The on-disk distance table is loosely typed; loaders normalize it
//! into this single canonical shape at ingestion so scoring only ever
//! sees one encoding: facility type tag, then cell identifier, then an
//! ordered sequence of optional distances. A `None` entry records a
//! facility whose distance is unknown or unreachable.

use std::collections::HashMap;

/// Distance observations keyed by facility type and grid cell.
///
/// Lookups are total: a missing facility type or cell identifier means
/// "no facilities observed" and yields an empty slice, never an error.
///
/// # Examples
///
/// ```
/// use sitecover_core::DistanceTable;
///
/// let mut table = DistanceTable::new();
/// table.insert("cafe", 1, vec![Some(120.0), None, Some(900.0)]);
/// assert_eq!(table.observations("cafe", 1).len(), 3);
/// assert!(table.observations("park", 1).is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DistanceTable {
    by_type: HashMap<String, HashMap<u64, Vec<Option<f64>>>>,
}

impl DistanceTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the distance observations for one facility type and cell.
    ///
    /// Later inserts for the same key replace earlier ones.
    pub fn insert(
        &mut self,
        facility_type: impl Into<String>,
        cell_id: u64,
        distances: Vec<Option<f64>>,
    ) {
        self.by_type
            .entry(facility_type.into())
            .or_default()
            .insert(cell_id, distances);
    }

    /// Distance observations for a facility type at a cell.
    ///
    /// Returns an empty slice when either key is absent.
    #[must_use]
    pub fn observations(&self, facility_type: &str, cell_id: u64) -> &[Option<f64>] {
        self.by_type
            .get(facility_type)
            .and_then(|cells| cells.get(&cell_id))
            .map_or(&[], Vec::as_slice)
    }

    /// Facility types present in the table, in arbitrary order.
    pub fn facility_types(&self) -> impl Iterator<Item = &str> {
        self.by_type.keys().map(String::as_str)
    }

    /// Number of facility types with at least one recorded cell.
    #[must_use]
    pub fn type_count(&self) -> usize {
        self.by_type.len()
    }

    /// Report whether no observations have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}
