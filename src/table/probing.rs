//! ProbeTable: open addressing over a flat slot array.
//!
//! # Admission
//! Once `floor(0.75 × capacity)` records are stored, further inserts are
//! refused as [`InsertStatus::Saturated`] before any probing.
//!
//! # Probing
//! The home slot is hashed once; attempt `i` visits
//! `ProbeStrategy::slot(home, i, key, capacity)`. Each occupied slot holding
//! a different code charges one collision. At most
//! `min(MAX_PROBE_ATTEMPTS, capacity)` slots are visited.
//!
//! Nothing is ever removed, so there are no tombstones and the first empty
//! slot on a search path proves the key is absent.

use super::{HashTable, InsertStatus};
use crate::error::{HashLabError, Result};
use crate::hash::HashFunction;
use crate::metrics::{GapStats, LongestChains, MetricsSnapshot, PROBING_KIND_PREFIX};
use crate::probe::ProbeStrategy;
use crate::record::Record;

/// Upper bound on probe attempts per operation
pub const MAX_PROBE_ATTEMPTS: usize = 1000;

/// Admission limit as a fraction of capacity
pub const MAX_LOAD_FACTOR: f64 = 0.75;

pub struct ProbeTable {
    slots: Vec<Option<Record>>,
    hash: HashFunction,
    probe: ProbeStrategy,
    collisions: u64,
    inserted: usize,
    /// `floor(0.75 * capacity)`, computed in integers
    admission_limit: usize,
}

impl ProbeTable {
    pub fn new(capacity: usize, hash: HashFunction, probe: ProbeStrategy) -> Result<Self> {
        if capacity == 0 {
            return Err(HashLabError::InvalidCapacity { capacity });
        }
        Ok(Self {
            slots: vec![None; capacity],
            hash,
            probe,
            collisions: 0,
            inserted: 0,
            admission_limit: capacity * 3 / 4,
        })
    }

    pub fn hash_function(&self) -> HashFunction {
        self.hash
    }

    pub fn probe_strategy(&self) -> ProbeStrategy {
        self.probe
    }

    /// Most records this table will accept.
    pub fn admission_limit(&self) -> usize {
        self.admission_limit
    }

    pub fn slot(&self, idx: usize) -> Option<&Record> {
        self.slots.get(idx).and_then(Option::as_ref)
    }

    #[inline]
    fn max_attempts(&self) -> usize {
        MAX_PROBE_ATTEMPTS.min(self.slots.len())
    }
}

impl HashTable for ProbeTable {
    fn insert(&mut self, record: Record) -> InsertStatus {
        if self.inserted >= self.admission_limit {
            return InsertStatus::Saturated;
        }

        let capacity = self.slots.len();
        let key = record.value();
        let home = self.hash.index(key, capacity);

        for attempt in 0..self.max_attempts() {
            let pos = self.probe.slot(home, attempt, key, capacity);
            match &self.slots[pos] {
                None => {
                    self.slots[pos] = Some(record);
                    self.inserted += 1;
                    return InsertStatus::Inserted;
                }
                Some(existing) if existing == &record => return InsertStatus::Duplicate,
                Some(_) => self.collisions += 1,
            }
        }
        InsertStatus::Exhausted
    }

    fn search(&self, code: &str) -> Option<&Record> {
        let key = Record::parse_value(code)?;
        let capacity = self.slots.len();
        let home = self.hash.index(key, capacity);

        for attempt in 0..self.max_attempts() {
            let pos = self.probe.slot(home, attempt, key, capacity);
            match &self.slots[pos] {
                None => return None,
                Some(r) if r.code() == code => return Some(r),
                Some(_) => {}
            }
        }
        None
    }

    fn collisions(&self) -> u64 {
        self.collisions
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn elements_inserted(&self) -> usize {
        self.inserted
    }

    fn metrics(&self) -> MetricsSnapshot {
        MetricsSnapshot::new(
            format!("{}{}", PROBING_KIND_PREFIX, self.probe.label()),
            self.hash.label(),
            self.slots.len(),
            self.inserted,
            self.collisions,
            LongestChains::unit(self.inserted > 0),
            GapStats::from_occupancy(self.slots.iter().map(Option::is_some)),
        )
    }
}
