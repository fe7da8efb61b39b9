//! Experiment harness.
//!
//! An experiment builds one table, inserts a whole dataset, searches every
//! code of the same dataset, and snapshots the metrics with both batch
//! durations attached. A sweep runs every configured experiment over every
//! admissible `(table size, dataset size)` pair.

use crate::config::BenchConfig;
use crate::dataset;
use crate::error::Result;
use crate::hash::HashFunction;
use crate::metrics::{MetricsSnapshot, CHAINED_KIND};
use crate::probe::ProbeStrategy;
use crate::record::Record;
use crate::table::{ChainedTable, HashTable, ProbeTable};
use serde::{Deserialize, Serialize};
use std::hint::black_box;
use std::time::Instant;

/// Which table to build for an experiment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExperimentSpec {
    Chained { hash: HashFunction },
    Probing { hash: HashFunction, probe: ProbeStrategy },
}

impl ExperimentSpec {
    /// Create a table of `capacity` slots for this experiment
    pub fn build(self, capacity: usize) -> Result<Box<dyn HashTable>> {
        Ok(match self {
            ExperimentSpec::Chained { hash } => Box::new(ChainedTable::new(capacity, hash)?),
            ExperimentSpec::Probing { hash, probe } => {
                Box::new(ProbeTable::new(capacity, hash, probe)?)
            }
        })
    }

    pub fn label(self) -> String {
        match self {
            ExperimentSpec::Chained { hash } => format!("chained/{}", hash),
            ExperimentSpec::Probing { hash, probe } => format!("probing-{}/{}", probe, hash),
        }
    }

    pub fn is_probing(self) -> bool {
        matches!(self, ExperimentSpec::Probing { .. })
    }
}

/// Metrics of one experiment plus the Elements column of the export
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExperimentResult {
    pub metrics: MetricsSnapshot,
    /// Dataset length for chaining, accepted inserts for probing
    pub elements_supplied: usize,
}

impl ExperimentResult {
    pub fn csv_row(&self) -> String {
        self.metrics.csv_row(self.elements_supplied)
    }

    pub fn is_chained(&self) -> bool {
        self.metrics.table_kind == CHAINED_KIND
    }
}

/// One `(table size, dataset size)` pair of a sweep
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub table_size: usize,
    pub dataset_size: usize,
    /// Empty when the dataset is too large for chaining as well
    pub experiments: Vec<ExperimentSpec>,
    /// Chaining runs but the load is too high for open addressing
    pub probing_skipped: bool,
}

impl Scenario {
    pub fn is_skipped(&self) -> bool {
        self.experiments.is_empty()
    }

    /// Dataset size as a percentage of table size
    pub fn load_percent(&self) -> f64 {
        self.dataset_size as f64 * 100.0 / self.table_size as f64
    }
}

/// Expand a config into scenarios, table sizes outermost.
pub fn plan(config: &BenchConfig) -> Vec<Scenario> {
    let mut scenarios = Vec::new();
    for &table_size in &config.table_sizes {
        for &dataset_size in &config.dataset_sizes {
            let n = dataset_size as f64;
            let m = table_size as f64;
            let mut experiments = Vec::new();
            let mut probing_skipped = false;

            if n <= config.chained_max_ratio * m {
                experiments.extend(config.hash_functions.iter().map(|&hash| ExperimentSpec::Chained { hash }));
                if n <= config.probing_max_load * m {
                    for &hash in &config.hash_functions {
                        for &probe in &config.probe_strategies {
                            experiments.push(ExperimentSpec::Probing { hash, probe });
                        }
                    }
                } else {
                    probing_skipped = true;
                }
            }

            scenarios.push(Scenario { table_size, dataset_size, experiments, probing_skipped });
        }
    }
    scenarios
}

/// Run one experiment.
///
/// Returns `Ok(None)` for a probing run that accepted nothing.
pub fn run_experiment(
    spec: ExperimentSpec,
    capacity: usize,
    data: &[Record],
) -> Result<Option<ExperimentResult>> {
    let mut table = spec.build(capacity)?;

    let start = Instant::now();
    let mut accepted = 0usize;
    for record in data {
        if table.insert(*record).is_inserted() {
            accepted += 1;
        }
    }
    let insertion = start.elapsed();

    let start = Instant::now();
    for record in data {
        black_box(table.search(record.code()));
    }
    let search = start.elapsed();

    if spec.is_probing() && accepted == 0 {
        log::warn!("{} on {} slots accepted no records", spec.label(), capacity);
        return Ok(None);
    }

    let metrics = table.metrics().with_timings(insertion, search);
    log::debug!(
        "{} m={} n={}: accepted={} collisions={} insert={:.2}ms",
        spec.label(),
        capacity,
        data.len(),
        accepted,
        metrics.collisions,
        metrics.insertion_ms()
    );

    let elements_supplied = if spec.is_probing() { accepted } else { data.len() };
    Ok(Some(ExperimentResult { metrics, elements_supplied }))
}

/// Run every experiment of a scenario against its dataset.
pub fn run_scenario(scenario: &Scenario, data: &[Record]) -> Result<Vec<ExperimentResult>> {
    let capacity = scenario.table_size;

    #[cfg(feature = "parallel")]
    let outcomes: Vec<Option<ExperimentResult>> = {
        use rayon::prelude::*;
        scenario
            .experiments
            .par_iter()
            .map(|&spec| run_experiment(spec, capacity, data))
            .collect::<Result<_>>()?
    };

    #[cfg(not(feature = "parallel"))]
    let outcomes: Vec<Option<ExperimentResult>> = scenario
        .experiments
        .iter()
        .map(|&spec| run_experiment(spec, capacity, data))
        .collect::<Result<_>>()?;

    Ok(outcomes.into_iter().flatten().collect())
}

/// Run a full sweep. `load` supplies the dataset for a given size.
pub fn sweep<F>(config: &BenchConfig, mut load: F) -> Result<Vec<ExperimentResult>>
where
    F: FnMut(usize) -> Result<Vec<Record>>,
{
    config.validate()?;
    let mut results = Vec::new();

    for scenario in plan(config) {
        if scenario.is_skipped() {
            log::warn!(
                "skipping table={} data={}: load {:.1}% too high",
                scenario.table_size,
                scenario.dataset_size,
                scenario.load_percent()
            );
            continue;
        }

        log::info!(
            "scenario table={} data={} load={:.1}%",
            scenario.table_size,
            scenario.dataset_size,
            scenario.load_percent()
        );
        if scenario.probing_skipped {
            log::info!("probing not applicable above {:.0}% load", config.probing_max_load * 100.0);
        }

        let data = load(scenario.dataset_size)?;
        if data.is_empty() {
            log::warn!("dataset of size {} is empty, skipping", scenario.dataset_size);
            continue;
        }
        results.extend(run_scenario(&scenario, &data)?);
    }

    log::info!("sweep finished with {} results", results.len());
    Ok(results)
}

/// Loader reading `dataset_<size>.txt` files from the configured data dir
pub fn dataset_loader(config: &BenchConfig) -> impl FnMut(usize) -> Result<Vec<Record>> + '_ {
    move |size| dataset::load(&dataset::dataset_path(&config.data_dir, size))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> BenchConfig {
        BenchConfig::default()
            .table_sizes(vec![100, 1000])
            .dataset_sizes(vec![50, 500, 5000])
    }

    #[test]
    fn test_plan_admission() {
        let scenarios = plan(&small_config());
        assert_eq!(scenarios.len(), 6);

        let find = |m: usize, n: usize| {
            scenarios.iter().find(|s| s.table_size == m && s.dataset_size == n).unwrap()
        };
        // 50 into 100: everything
        assert_eq!(find(100, 50).experiments.len(), 3 + 9);
        // 500 into 100: chaining only
        let s = find(100, 500);
        assert_eq!(s.experiments.len(), 3);
        assert!(s.probing_skipped);
        // 5000 into 100: nothing
        assert!(find(100, 5000).is_skipped());
        // 5000 into 1000: ratio exactly 5, chaining only
        assert_eq!(find(1000, 5000).experiments.len(), 3);
    }

    #[test]
    fn test_plan_order() {
        let order: Vec<(usize, usize)> =
            plan(&small_config()).iter().map(|s| (s.table_size, s.dataset_size)).collect();
        assert_eq!(order, vec![(100, 50), (100, 500), (100, 5000), (1000, 50), (1000, 500), (1000, 5000)]);
    }

    #[test]
    fn test_run_chained() {
        let data = dataset::generate(300, 3);
        let spec = ExperimentSpec::Chained { hash: HashFunction::Multiplicative };
        let r = run_experiment(spec, 100, &data).unwrap().unwrap();
        assert_eq!(r.elements_supplied, 300);
        assert_eq!(r.metrics.elements_inserted, 300);
        assert_eq!(r.metrics.table_kind, "Chained");
        assert!(r.metrics.collisions >= 200);
    }

    #[test]
    fn test_run_probing_counts_accepted() {
        let data = dataset::generate(300, 3);
        let spec = ExperimentSpec::Probing { hash: HashFunction::XorShift, probe: ProbeStrategy::Linear };
        let r = run_experiment(spec, 100, &data).unwrap().unwrap();
        // Saturates at 75 of 100 slots.
        assert_eq!(r.elements_supplied, 75);
        assert_eq!(r.metrics.elements_inserted, 75);
        assert_eq!(r.metrics.table_kind, "Probing-linear");
    }

    #[test]
    fn test_kind_labels_classify_results() {
        use crate::metrics::PROBING_KIND_PREFIX;

        let data = dataset::generate(20, 9);
        let chained = run_experiment(ExperimentSpec::Chained { hash: HashFunction::Folding }, 50, &data)
            .unwrap()
            .unwrap();
        assert_eq!(chained.metrics.table_kind, CHAINED_KIND);
        assert!(chained.is_chained());

        for probe in ProbeStrategy::ALL {
            let spec = ExperimentSpec::Probing { hash: HashFunction::Folding, probe };
            let r = run_experiment(spec, 50, &data).unwrap().unwrap();
            assert_eq!(r.metrics.table_kind.strip_prefix(PROBING_KIND_PREFIX), Some(probe.label()));
            assert!(!r.is_chained());
        }
    }

    #[test]
    fn test_run_probing_nothing_accepted() {
        let data = dataset::generate(10, 3);
        let spec = ExperimentSpec::Probing { hash: HashFunction::Folding, probe: ProbeStrategy::Double };
        // One slot admits nothing.
        assert!(run_experiment(spec, 1, &data).unwrap().is_none());
    }

    #[test]
    fn test_sweep_uses_loader() {
        let config = BenchConfig::default()
            .table_sizes(vec![64])
            .dataset_sizes(vec![40, 10_000])
            .hash_functions(vec![HashFunction::Folding]);
        let mut requested = Vec::new();
        let results = sweep(&config, |size| {
            requested.push(size);
            Ok(dataset::generate(size, 1))
        })
        .unwrap();
        // 10_000 > 10 * 64 is skipped without loading.
        assert_eq!(requested, vec![40]);
        // 40 <= 0.8 * 64: one chained + three probing
        assert_eq!(results.len(), 4);
        assert!(results[0].is_chained());
    }
}
