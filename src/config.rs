//! Benchmark configuration.
//!
//! Layering, later wins: `Default` → JSON file → environment
//! (`HASHLAB_` prefix) → explicit setters (the CLI flags).
//!
//! # Example
//! ```ignore
//! use hashlab::config::BenchConfig;
//!
//! let config = BenchConfig::load("bench.json")?
//!     .apply_env("HASHLAB_")?
//!     .seed(7)
//!     .table_sizes(vec![1000]);
//! config.validate()?;
//! ```

use crate::dataset::DEFAULT_SEED;
use crate::error::{HashLabError, Result};
use crate::hash::HashFunction;
use crate::probe::ProbeStrategy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "HASHLAB_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    pub table_sizes: Vec<usize>,
    pub dataset_sizes: Vec<usize>,
    pub hash_functions: Vec<HashFunction>,
    pub probe_strategies: Vec<ProbeStrategy>,
    pub seed: u64,
    pub data_dir: PathBuf,
    pub results_dir: PathBuf,
    /// Chaining runs when `dataset <= chained_max_ratio * table`
    pub chained_max_ratio: f64,
    /// Probing runs when `dataset <= probing_max_load * table`
    pub probing_max_load: f64,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            table_sizes: vec![1_000, 10_000, 100_000],
            dataset_sizes: vec![100_000, 1_000_000, 10_000_000],
            hash_functions: HashFunction::ALL.to_vec(),
            probe_strategies: ProbeStrategy::ALL.to_vec(),
            seed: DEFAULT_SEED,
            data_dir: PathBuf::from("data"),
            results_dir: PathBuf::from("results"),
            chained_max_ratio: 10.0,
            probing_max_load: 0.8,
        }
    }
}

impl BenchConfig {
    /// Read a JSON config file. Missing fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Defaults overridden by `HASHLAB_*` variables
    pub fn from_env() -> Result<Self> {
        Self::default().apply_env(ENV_PREFIX)
    }

    /// Override fields from process environment variables named
    /// `{prefix}SEED`, `{prefix}DATA_DIR`, `{prefix}RESULTS_DIR`,
    /// `{prefix}TABLE_SIZES`, `{prefix}DATASET_SIZES` (comma lists).
    pub fn apply_env(self, prefix: &str) -> Result<Self> {
        self.apply_vars(prefix, |name| std::env::var(name).ok())
    }

    fn apply_vars<F>(mut self, prefix: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |field: &str| lookup(&format!("{}{}", prefix, field));

        if let Some(v) = var("SEED") {
            self.seed = v.trim().parse().map_err(|_| {
                HashLabError::configuration(format!("{}SEED is not an integer: {:?}", prefix, v))
            })?;
        }
        if let Some(v) = var("DATA_DIR") {
            self.data_dir = PathBuf::from(v);
        }
        if let Some(v) = var("RESULTS_DIR") {
            self.results_dir = PathBuf::from(v);
        }
        if let Some(v) = var("TABLE_SIZES") {
            self.table_sizes = parse_size_list(&v)?;
        }
        if let Some(v) = var("DATASET_SIZES") {
            self.dataset_sizes = parse_size_list(&v)?;
        }
        Ok(self)
    }

    pub fn table_sizes(mut self, sizes: Vec<usize>) -> Self {
        self.table_sizes = sizes;
        self
    }

    pub fn dataset_sizes(mut self, sizes: Vec<usize>) -> Self {
        self.dataset_sizes = sizes;
        self
    }

    pub fn hash_functions(mut self, functions: Vec<HashFunction>) -> Self {
        self.hash_functions = functions;
        self
    }

    pub fn probe_strategies(mut self, strategies: Vec<ProbeStrategy>) -> Self {
        self.probe_strategies = strategies;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn data_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.data_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn results_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.results_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.table_sizes.is_empty() || self.table_sizes.contains(&0) {
            return Err(HashLabError::configuration("table sizes must be non-empty and positive"));
        }
        if self.dataset_sizes.is_empty() || self.dataset_sizes.contains(&0) {
            return Err(HashLabError::configuration("dataset sizes must be non-empty and positive"));
        }
        if self.hash_functions.is_empty() {
            return Err(HashLabError::configuration("at least one hash function is required"));
        }
        if self.chained_max_ratio.is_nan() || self.chained_max_ratio <= 0.0 {
            return Err(HashLabError::configuration("chained_max_ratio must be positive"));
        }
        if self.probing_max_load.is_nan() || self.probing_max_load <= 0.0 {
            return Err(HashLabError::configuration("probing_max_load must be positive"));
        }
        Ok(())
    }
}

/// Parse `"1000, 10000,100000"`; `_` digit separators are allowed.
pub fn parse_size_list(s: &str) -> Result<Vec<usize>> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.replace('_', "")
                .parse::<usize>()
                .map_err(|_| HashLabError::configuration(format!("not a size: {:?}", part)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let c = BenchConfig::default();
        assert_eq!(c.table_sizes, vec![1_000, 10_000, 100_000]);
        assert_eq!(c.dataset_sizes, vec![100_000, 1_000_000, 10_000_000]);
        assert_eq!(c.seed, 12345);
        assert_eq!(c.hash_functions.len(), 3);
        assert_eq!(c.probe_strategies.len(), 3);
        c.validate().unwrap();
    }

    #[test]
    fn test_partial_json() {
        let c: BenchConfig =
            serde_json::from_str(r#"{"seed": 9, "hash_functions": ["xorshift", "folding"]}"#).unwrap();
        assert_eq!(c.seed, 9);
        assert_eq!(c.hash_functions, vec![HashFunction::XorShift, HashFunction::Folding]);
        assert_eq!(c.table_sizes, BenchConfig::default().table_sizes);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("T_SEED", "42"),
            ("T_TABLE_SIZES", "10, 20"),
            ("T_DATASET_SIZES", "1_000"),
            ("T_DATA_DIR", "/tmp/d"),
        ]
        .into_iter()
        .collect();
        let c = BenchConfig::default()
            .apply_vars("T_", |k| vars.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(c.seed, 42);
        assert_eq!(c.table_sizes, vec![10, 20]);
        assert_eq!(c.dataset_sizes, vec![1000]);
        assert_eq!(c.data_dir, PathBuf::from("/tmp/d"));
        assert_eq!(c.results_dir, PathBuf::from("results"));
    }

    #[test]
    fn test_env_bad_seed() {
        let r = BenchConfig::default().apply_vars("T_", |k| (k == "T_SEED").then(|| "x".to_string()));
        assert!(matches!(r, Err(HashLabError::Configuration { .. })));
    }

    #[test]
    fn test_validate_rejects() {
        assert!(BenchConfig::default().table_sizes(vec![]).validate().is_err());
        assert!(BenchConfig::default().dataset_sizes(vec![10, 0]).validate().is_err());
        assert!(BenchConfig::default().hash_functions(vec![]).validate().is_err());
    }

    #[test]
    fn test_parse_size_list() {
        assert_eq!(parse_size_list("1,2 , 3,").unwrap(), vec![1, 2, 3]);
        assert!(parse_size_list("1,two").is_err());
    }
}
