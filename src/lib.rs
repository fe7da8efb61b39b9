// HashLab v0.1.0 - Fixed-capacity hash table laboratory
// Chaining vs open addressing over nine-digit codes

pub mod error;
pub mod record;
pub mod hash;
pub mod probe;
pub mod metrics;
pub mod table;
pub mod dataset;
pub mod config;
pub mod bench;
pub mod analysis;
pub mod report;

// Re-export main types
pub use error::{HashLabError, Result};
pub use record::Record;
pub use hash::HashFunction;
pub use probe::ProbeStrategy;
pub use metrics::{MetricsSnapshot, LongestChains, GapStats};
pub use table::{HashTable, InsertStatus, ChainedTable, ProbeTable};
pub use config::BenchConfig;
pub use bench::{ExperimentSpec, ExperimentResult, Scenario};
