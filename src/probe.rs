//! Probe sequences for open addressing.

use crate::error::HashLabError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Probe strategy selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStrategy {
    /// `base + i`
    Linear,
    /// `base + i²`
    Quadratic,
    /// `base + i·h2` with `h2 = 1 + key mod (capacity − 1)`
    Double,
}

impl ProbeStrategy {
    pub const ALL: [ProbeStrategy; 3] =
        [ProbeStrategy::Linear, ProbeStrategy::Quadratic, ProbeStrategy::Double];

    /// Slot visited on `attempt` (0-based) for a key whose home slot is `base`.
    #[inline]
    pub fn slot(self, base: usize, attempt: usize, key: u32, capacity: usize) -> usize {
        let (base, i, m) = (base as u64, attempt as u64, capacity as u64);
        let slot = match self {
            ProbeStrategy::Linear => (base + i) % m,
            ProbeStrategy::Quadratic => (base + i * i) % m,
            ProbeStrategy::Double => (base + i * Self::step(key, capacity)) % m,
        };
        slot as usize
    }

    /// Secondary step for double hashing. A single-slot table steps by 1.
    #[inline]
    fn step(key: u32, capacity: usize) -> u64 {
        if capacity <= 1 {
            return 1;
        }
        1 + u64::from(key) % (capacity as u64 - 1)
    }

    pub fn label(self) -> &'static str {
        match self {
            ProbeStrategy::Linear => "linear",
            ProbeStrategy::Quadratic => "quadratic",
            ProbeStrategy::Double => "double",
        }
    }
}

impl FromStr for ProbeStrategy {
    type Err = HashLabError;

    /// Parse from string (case-insensitive). Legacy names are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "linear" | "linear-probing" => Ok(ProbeStrategy::Linear),
            "quadratic" | "quadratico" => Ok(ProbeStrategy::Quadratic),
            "double" | "double-hashing" | "duplo" => Ok(ProbeStrategy::Double),
            _ => Err(HashLabError::UnknownProbeStrategy(s.to_string())),
        }
    }
}

impl fmt::Display for ProbeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
