//! Fixed-capacity hash tables
//!
//! Two collision strategies behind one trait:
//! - ChainedTable: one growable chain per slot, never rejects
//! - ProbeTable: one record per slot, open addressing with a selectable
//!   probe sequence and a 75% admission limit
//!
//! Capacity is fixed at construction. There is no removal and no resize.

mod chained;
mod probing;

pub use chained::ChainedTable;
pub use probing::{ProbeTable, MAX_LOAD_FACTOR, MAX_PROBE_ATTEMPTS};

use crate::metrics::MetricsSnapshot;
use crate::record::Record;

/// Outcome of an insertion
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InsertStatus {
    Inserted,
    /// The table reached its admission limit; nothing was probed
    Saturated,
    /// A record with the same code is already stored
    Duplicate,
    /// Every allowed probe attempt hit an occupied slot
    Exhausted,
}

impl InsertStatus {
    pub fn is_inserted(self) -> bool {
        self == InsertStatus::Inserted
    }
}

/// Common surface of both table kinds
pub trait HashTable {
    /// Store a record. Chaining always accepts; probing may reject.
    fn insert(&mut self, record: Record) -> InsertStatus;

    /// Find a stored record by code. Malformed codes are simply not found.
    fn search(&self, code: &str) -> Option<&Record>;

    /// Collisions charged so far
    fn collisions(&self) -> u64;

    fn capacity(&self) -> usize;

    fn elements_inserted(&self) -> usize;

    /// Summarise current state; timings are left at zero
    fn metrics(&self) -> MetricsSnapshot;
}
