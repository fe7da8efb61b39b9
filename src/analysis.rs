//! Aggregations over experiment results.
//!
//! All functions borrow the result slice; rankings return references in
//! ranked order and are stable, so ties keep their input order.

use crate::bench::ExperimentResult;
use crate::metrics::PROBING_KIND_PREFIX;
use std::cmp::Reverse;
use std::collections::BTreeMap;

/// Averages over one group of results
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub label: String,
    pub runs: usize,
    pub avg_insert_ms: f64,
    pub avg_collisions: f64,
    pub avg_load_factor: f64,
}

#[derive(Default)]
struct Accumulator {
    runs: usize,
    insert_ms: f64,
    collisions: f64,
    load_factor: f64,
}

impl Accumulator {
    fn add(&mut self, r: &ExperimentResult) {
        self.runs += 1;
        self.insert_ms += r.metrics.insertion_ms();
        self.collisions += r.metrics.collisions as f64;
        self.load_factor += r.metrics.load_factor();
    }

    fn finish(self, label: String) -> GroupSummary {
        let n = self.runs.max(1) as f64;
        GroupSummary {
            label,
            runs: self.runs,
            avg_insert_ms: self.insert_ms / n,
            avg_collisions: self.collisions / n,
            avg_load_factor: self.load_factor / n,
        }
    }
}

fn group_by<'a, I, F>(results: I, key: F) -> Vec<GroupSummary>
where
    I: IntoIterator<Item = &'a ExperimentResult>,
    F: Fn(&ExperimentResult) -> Option<String>,
{
    let mut groups: BTreeMap<String, Accumulator> = BTreeMap::new();
    for r in results {
        if let Some(label) = key(r) {
            groups.entry(label).or_default().add(r);
        }
    }
    groups.into_iter().map(|(label, acc)| acc.finish(label)).collect()
}

/// One summary per table kind (`Chained`, `Probing-linear`, ...).
pub fn by_table_kind(results: &[ExperimentResult]) -> Vec<GroupSummary> {
    group_by(results, |r| Some(r.metrics.table_kind.clone()))
}

pub fn by_hash_function(results: &[ExperimentResult]) -> Vec<GroupSummary> {
    group_by(results, |r| Some(r.metrics.hash_function.clone()))
}

/// Probing results only, grouped by the strategy suffix of the table kind.
pub fn by_probe_strategy(results: &[ExperimentResult]) -> Vec<GroupSummary> {
    group_by(results, |r| r.metrics.table_kind.strip_prefix(PROBING_KIND_PREFIX).map(str::to_string))
}

/// Gap statistics across chained results
#[derive(Debug, Clone, PartialEq)]
pub struct GapOverview<'a> {
    pub runs: usize,
    pub avg_min_gap: f64,
    pub avg_max_gap: f64,
    pub avg_mean_gap: f64,
    /// Result with the largest max gap; the first one wins a tie
    pub worst: Option<&'a ExperimentResult>,
}

/// `None` when there are no chained results.
pub fn gap_overview(results: &[ExperimentResult]) -> Option<GapOverview<'_>> {
    let chained: Vec<&ExperimentResult> = results.iter().filter(|r| r.is_chained()).collect();
    if chained.is_empty() {
        return None;
    }

    let n = chained.len() as f64;
    let mut worst: Option<&ExperimentResult> = None;
    let (mut min, mut max, mut mean) = (0.0, 0.0, 0.0);
    for &r in &chained {
        min += r.metrics.min_gap as f64;
        max += r.metrics.max_gap as f64;
        mean += r.metrics.mean_gap;
        if worst.map_or(true, |w| r.metrics.max_gap > w.metrics.max_gap) {
            worst = Some(r);
        }
    }

    Some(GapOverview {
        runs: chained.len(),
        avg_min_gap: min / n,
        avg_max_gap: max / n,
        avg_mean_gap: mean / n,
        worst,
    })
}

/// Chained results by longest chain, descending.
pub fn longest_chains(results: &[ExperimentResult], k: usize) -> Vec<&ExperimentResult> {
    let mut chained: Vec<&ExperimentResult> = results.iter().filter(|r| r.is_chained()).collect();
    chained.sort_by_key(|r| Reverse(r.metrics.longest));
    chained.truncate(k);
    chained
}

/// Lowest insertion time first.
pub fn fastest(results: &[ExperimentResult], k: usize) -> Vec<&ExperimentResult> {
    ranked(results, k, |r| r.metrics.insertion_ns)
}

pub fn fewest_collisions(results: &[ExperimentResult], k: usize) -> Vec<&ExperimentResult> {
    ranked(results, k, |r| r.metrics.collisions)
}

pub fn most_collisions(results: &[ExperimentResult], k: usize) -> Vec<&ExperimentResult> {
    ranked(results, k, |r| Reverse(r.metrics.collisions))
}

fn ranked<K: Ord>(
    results: &[ExperimentResult],
    k: usize,
    key: impl Fn(&ExperimentResult) -> K,
) -> Vec<&ExperimentResult> {
    let mut all: Vec<&ExperimentResult> = results.iter().collect();
    all.sort_by_key(|r| key(*r));
    all.truncate(k);
    all
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricsSnapshot;

    fn result(kind: &str, hash: &str, collisions: u64, ns: u64, longest: usize, max_gap: usize) -> ExperimentResult {
        ExperimentResult {
            metrics: MetricsSnapshot {
                table_kind: kind.to_string(),
                hash_function: hash.to_string(),
                capacity: 100,
                elements_inserted: 50,
                collisions,
                insertion_ns: ns,
                search_ns: 0,
                longest,
                second_longest: 0,
                third_longest: 0,
                min_gap: 1,
                max_gap,
                mean_gap: 2.0,
            },
            elements_supplied: 50,
        }
    }

    fn sample() -> Vec<ExperimentResult> {
        vec![
            result("Chained", "xorshift", 10, 2_000_000, 4, 5),
            result("Probing-linear", "folding", 30, 1_000_000, 1, 2),
            result("Chained", "folding", 20, 4_000_000, 6, 9),
            result("Probing-double", "xorshift", 10, 3_000_000, 1, 3),
            result("Chained", "multiplicative", 5, 2_000_000, 6, 9),
        ]
    }

    #[test]
    fn test_groups_sorted_by_label() {
        let kinds = by_table_kind(&sample());
        let labels: Vec<&str> = kinds.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["Chained", "Probing-double", "Probing-linear"]);
        assert_eq!(kinds[0].runs, 3);
        assert!((kinds[0].avg_collisions - 35.0 / 3.0).abs() < 1e-9);
        assert!((kinds[0].avg_insert_ms - 8.0 / 3.0).abs() < 1e-9);
        assert!((kinds[0].avg_load_factor - 0.5).abs() < 1e-9);

        let hashes = by_hash_function(&sample());
        assert_eq!(hashes.len(), 3);
        assert_eq!(hashes[2].label, "xorshift");
        assert_eq!(hashes[2].runs, 2);

        let probes = by_probe_strategy(&sample());
        let labels: Vec<&str> = probes.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["double", "linear"]);
    }

    #[test]
    fn test_gap_overview() {
        let data = sample();
        let g = gap_overview(&data).unwrap();
        assert_eq!(g.runs, 3);
        assert!((g.avg_max_gap - 23.0 / 3.0).abs() < 1e-9);
        assert_eq!(g.avg_min_gap, 1.0);
        // folding and multiplicative tie at 9; folding came first
        assert_eq!(g.worst.unwrap().metrics.hash_function, "folding");

        assert!(gap_overview(&data[1..2]).is_none());
    }

    #[test]
    fn test_rankings() {
        let data = sample();

        let top: Vec<&str> = longest_chains(&data, 2).iter().map(|r| r.metrics.hash_function.as_str()).collect();
        assert_eq!(top, vec!["folding", "multiplicative"]);

        let fast = fastest(&data, 2);
        assert_eq!(fast[0].metrics.table_kind, "Probing-linear");
        // 2ms tie keeps input order
        assert_eq!(fast[1].metrics.hash_function, "xorshift");

        let few = fewest_collisions(&data, 10);
        assert_eq!(few.len(), 5);
        assert_eq!(few[0].metrics.collisions, 5);
        assert_eq!(few[1].metrics.table_kind, "Chained");

        let most = most_collisions(&data, 1);
        assert_eq!(most[0].metrics.collisions, 30);
    }

    #[test]
    fn test_empty_input() {
        assert!(by_table_kind(&[]).is_empty());
        assert!(fastest(&[], 5).is_empty());
        assert!(longest_chains(&[], 3).is_empty());
    }
}
