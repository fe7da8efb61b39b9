//! ChainedTable: separate chaining with append-at-tail buckets.
//!
//! Each bucket owns a `Vec<Record>` in insertion order. Appending to a
//! bucket of length `L` charges `L` collisions, so a bucket that ends with
//! `n` records has contributed `n(n-1)/2` in total.

use super::{HashTable, InsertStatus};
use crate::error::{HashLabError, Result};
use crate::hash::HashFunction;
use crate::metrics::{GapStats, LongestChains, MetricsSnapshot, CHAINED_KIND};
use crate::record::Record;

pub struct ChainedTable {
    buckets: Vec<Vec<Record>>,
    hash: HashFunction,
    collisions: u64,
    inserted: usize,
}

impl ChainedTable {
    pub fn new(capacity: usize, hash: HashFunction) -> Result<Self> {
        if capacity == 0 {
            return Err(HashLabError::InvalidCapacity { capacity });
        }
        Ok(Self {
            buckets: vec![Vec::new(); capacity],
            hash,
            collisions: 0,
            inserted: 0,
        })
    }

    pub fn hash_function(&self) -> HashFunction {
        self.hash
    }

    /// Records stored in bucket `idx`, oldest first.
    pub fn bucket(&self, idx: usize) -> Option<&[Record]> {
        self.buckets.get(idx).map(Vec::as_slice)
    }

    pub fn bucket_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.buckets.iter().map(Vec::len)
    }

    #[inline]
    fn index_of(&self, value: u32) -> usize {
        self.hash.index(value, self.buckets.len())
    }
}

impl HashTable for ChainedTable {
    fn insert(&mut self, record: Record) -> InsertStatus {
        let idx = self.index_of(record.value());
        let bucket = &mut self.buckets[idx];
        self.collisions += bucket.len() as u64;
        bucket.push(record);
        self.inserted += 1;
        InsertStatus::Inserted
    }

    fn search(&self, code: &str) -> Option<&Record> {
        let value = Record::parse_value(code)?;
        self.buckets[self.index_of(value)]
            .iter()
            .find(|r| r.code() == code)
    }

    fn collisions(&self) -> u64 {
        self.collisions
    }

    fn capacity(&self) -> usize {
        self.buckets.len()
    }

    fn elements_inserted(&self) -> usize {
        self.inserted
    }

    fn metrics(&self) -> MetricsSnapshot {
        MetricsSnapshot::new(
            CHAINED_KIND.to_string(),
            self.hash.label(),
            self.buckets.len(),
            self.inserted,
            self.collisions,
            LongestChains::from_lengths(self.bucket_lengths()),
            GapStats::from_occupancy(self.buckets.iter().map(|b| !b.is_empty())),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(code: &str) -> Record {
        Record::new(code).unwrap()
    }

    #[test]
    fn test_rejects_zero_capacity() {
        assert!(matches!(
            ChainedTable::new(0, HashFunction::Folding),
            Err(HashLabError::InvalidCapacity { capacity: 0 })
        ));
    }

    #[test]
    fn test_collision_charge_grows_with_chain() {
        // Folding into 5 slots: 2, 7 and 12 all land on bucket 2.
        let mut t = ChainedTable::new(5, HashFunction::Folding).unwrap();
        assert_eq!(t.insert(rec("000000002")), InsertStatus::Inserted);
        assert_eq!(t.collisions(), 0);
        t.insert(rec("000000007"));
        assert_eq!(t.collisions(), 1);
        t.insert(rec("000000012"));
        assert_eq!(t.collisions(), 3);

        let codes: Vec<&str> = t.bucket(2).unwrap().iter().map(Record::code).collect();
        assert_eq!(codes, vec!["000000002", "000000007", "000000012"]);
    }

    #[test]
    fn test_duplicates_are_chained() {
        let mut t = ChainedTable::new(10, HashFunction::XorShift).unwrap();
        t.insert(rec("123123123"));
        t.insert(rec("123123123"));
        assert_eq!(t.elements_inserted(), 2);
        assert_eq!(t.collisions(), 1);
        assert!(t.search("123123123").is_some());
    }

    #[test]
    fn test_search() {
        let mut t = ChainedTable::new(7, HashFunction::Multiplicative).unwrap();
        for code in ["000000001", "000000002", "555555555"] {
            t.insert(rec(code));
        }
        assert_eq!(t.search("555555555").map(Record::code), Some("555555555"));
        assert!(t.search("000000003").is_none());
        assert!(t.search("5555").is_none());
        assert!(t.search("55555555x").is_none());
    }

    #[test]
    fn test_metrics() {
        let mut t = ChainedTable::new(10, HashFunction::Folding).unwrap();
        // bucket 2 x2, bucket 6 x1
        t.insert(rec("000000002"));
        t.insert(rec("000000012"));
        t.insert(rec("000000006"));

        let m = t.metrics();
        assert_eq!(m.table_kind, "Chained");
        assert_eq!(m.hash_function, "folding");
        assert_eq!(m.capacity, 10);
        assert_eq!(m.elements_inserted, 3);
        assert_eq!(m.collisions, 1);
        assert_eq!((m.longest, m.second_longest, m.third_longest), (2, 1, 0));
        assert_eq!((m.min_gap, m.max_gap), (3, 3));
        assert_eq!(m.mean_gap, 3.0);
        assert_eq!((m.insertion_ns, m.search_ns), (0, 0));
    }
}
