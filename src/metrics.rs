//! MetricsSnapshot: read-only summary of a table after an experiment.
//!
//! Snapshots are computed on demand from table state. The engine never reads
//! the clock; the caller measures the insertion and search batches and
//! attaches them with [`MetricsSnapshot::with_timings`].

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Column header of the tabular export, in column order
pub const CSV_HEADER: &str = "TableKind,HashFunction,TableSize,Elements,LoadFactor,Collisions,\
InsertNs,SearchNs,Longest,SecondLongest,ThirdLongest,MinGap,MaxGap,MeanGap";

/// Number of columns in [`CSV_HEADER`]
pub const CSV_COLUMNS: usize = 14;

/// Table kind label of a [`ChainedTable`](crate::table::ChainedTable)
pub const CHAINED_KIND: &str = "Chained";

/// Prefix of the table kind label of a [`ProbeTable`](crate::table::ProbeTable),
/// followed by the probe strategy
pub const PROBING_KIND_PREFIX: &str = "Probing-";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// [`CHAINED_KIND`] or [`PROBING_KIND_PREFIX`] + strategy
    pub table_kind: String,
    pub hash_function: String,
    pub capacity: usize,
    pub elements_inserted: usize,
    pub collisions: u64,
    pub insertion_ns: u64,
    pub search_ns: u64,
    pub longest: usize,
    pub second_longest: usize,
    pub third_longest: usize,
    pub min_gap: usize,
    pub max_gap: usize,
    pub mean_gap: f64,
}

impl MetricsSnapshot {
    pub(crate) fn new(
        table_kind: String,
        hash_function: &str,
        capacity: usize,
        elements_inserted: usize,
        collisions: u64,
        chains: LongestChains,
        gaps: GapStats,
    ) -> Self {
        Self {
            table_kind,
            hash_function: hash_function.to_string(),
            capacity,
            elements_inserted,
            collisions,
            insertion_ns: 0,
            search_ns: 0,
            longest: chains.first,
            second_longest: chains.second,
            third_longest: chains.third,
            min_gap: gaps.min,
            max_gap: gaps.max,
            mean_gap: gaps.mean,
        }
    }

    /// Attach externally measured batch durations.
    #[must_use]
    pub fn with_timings(mut self, insertion: Duration, search: Duration) -> Self {
        self.insertion_ns = saturating_nanos(insertion);
        self.search_ns = saturating_nanos(search);
        self
    }

    /// `elements_inserted / capacity`
    pub fn load_factor(&self) -> f64 {
        if self.capacity == 0 {
            return 0.0;
        }
        self.elements_inserted as f64 / self.capacity as f64
    }

    pub fn insertion_ms(&self) -> f64 {
        self.insertion_ns as f64 / 1_000_000.0
    }

    /// One CSV row matching [`CSV_HEADER`]. `elements` fills the Elements
    /// column, which reports what the harness fed in rather than what stuck.
    pub fn csv_row(&self, elements: usize) -> String {
        format!(
            "{},{},{},{},{:.4},{},{},{},{},{},{},{},{},{:.2}",
            self.table_kind,
            self.hash_function,
            self.capacity,
            elements,
            self.load_factor(),
            self.collisions,
            self.insertion_ns,
            self.search_ns,
            self.longest,
            self.second_longest,
            self.third_longest,
            self.min_gap,
            self.max_gap,
            self.mean_gap,
        )
    }
}

fn saturating_nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

/// Running top-3 of bucket lengths.
///
/// Cascading comparison, not a sort: a new maximum shifts first and second
/// down, a value above only the second shifts second down, otherwise it can
/// only raise third. Equal values never displace, so the first seen wins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LongestChains {
    pub first: usize,
    pub second: usize,
    pub third: usize,
}

impl LongestChains {
    pub fn observe(&mut self, len: usize) {
        if len > self.first {
            self.third = self.second;
            self.second = self.first;
            self.first = len;
        } else if len > self.second {
            self.third = self.second;
            self.second = len;
        } else if len > self.third {
            self.third = len;
        }
    }

    pub fn from_lengths<I: IntoIterator<Item = usize>>(lengths: I) -> Self {
        let mut top = Self::default();
        for len in lengths {
            top.observe(len);
        }
        top
    }

    /// Placeholder for tables without chains: 1/1/1 once anything is stored.
    pub(crate) fn unit(occupied: bool) -> Self {
        if occupied {
            Self { first: 1, second: 1, third: 1 }
        } else {
            Self::default()
        }
    }
}

/// Spacing between occupied positions.
///
/// Empty runs before the first and after the last occupied position are
/// ignored. With fewer than two occupied positions all fields are zero.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GapStats {
    pub min: usize,
    pub max: usize,
    pub mean: f64,
}

impl GapStats {
    pub fn from_occupancy<I: IntoIterator<Item = bool>>(occupancy: I) -> Self {
        let mut seen_first = false;
        let mut current = 0usize;
        let mut count = 0usize;
        let mut sum = 0u64;
        let mut min = usize::MAX;
        let mut max = 0usize;

        for occupied in occupancy {
            if occupied {
                if seen_first {
                    count += 1;
                    sum += current as u64;
                    min = min.min(current);
                    max = max.max(current);
                }
                seen_first = true;
                current = 0;
            } else if seen_first {
                current += 1;
            }
        }

        if count == 0 {
            return Self::default();
        }
        Self { min, max, mean: sum as f64 / count as f64 }
    }
}
