//! Hash functions mapping a nine-digit key onto `[0, capacity)`.
//!
//! All three are pure. Their exact arithmetic is part of the benchmark:
//! the same `(key, capacity)` must land on the same index in every
//! implementation, so floating point, digit grouping and 32-bit wraparound
//! are reproduced as written below rather than "improved".

use crate::error::HashLabError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hash function selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashFunction {
    /// Knuth multiplicative hashing with the golden ratio
    Multiplicative,
    /// Sum of the three 3-digit groups of the zero-padded key
    Folding,
    /// Marsaglia-style xor/shift mix in 32-bit two's complement
    XorShift,
}

impl HashFunction {
    pub const ALL: [HashFunction; 3] =
        [HashFunction::Multiplicative, HashFunction::Folding, HashFunction::XorShift];

    /// Map `key` onto a slot index below `capacity`.
    ///
    /// `capacity` must be non-zero; tables check this on construction.
    #[inline]
    pub fn index(self, key: u32, capacity: usize) -> usize {
        match self {
            HashFunction::Multiplicative => multiplicative(key, capacity),
            HashFunction::Folding => folding(key, capacity),
            HashFunction::XorShift => xor_shift(key, capacity),
        }
    }

    /// Name used in reports and CSV output
    pub fn label(self) -> &'static str {
        match self {
            HashFunction::Multiplicative => "multiplicative",
            HashFunction::Folding => "folding",
            HashFunction::XorShift => "xorshift",
        }
    }
}

impl FromStr for HashFunction {
    type Err = HashLabError;

    /// Parse from string (case-insensitive). Legacy names are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "multiplicative" | "multiplication" | "multiplicacao" => Ok(HashFunction::Multiplicative),
            "folding" | "fold" | "dobramento" => Ok(HashFunction::Folding),
            "xorshift" | "xor-shift" | "xor_shift" => Ok(HashFunction::XorShift),
            _ => Err(HashLabError::UnknownHashFunction(s.to_string())),
        }
    }
}

impl fmt::Display for HashFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn multiplicative(key: u32, capacity: usize) -> usize {
    let a = (5f64.sqrt() - 1.0) / 2.0;
    let product = f64::from(key) * a;
    let frac = product - product.floor();
    (capacity as f64 * frac) as usize
}

fn folding(key: u32, capacity: usize) -> usize {
    // Zero-padded to nine digits: three groups of three.
    let high = key / 1_000_000;
    let mid = (key / 1_000) % 1_000;
    let low = key % 1_000;
    let sum = (high + mid + low) as usize;
    sum % capacity
}

fn xor_shift(key: u32, capacity: usize) -> usize {
    let mut k = key as i32;
    k ^= ((k as u32) >> 16) as i32;
    k ^= k.wrapping_shl(8);
    k ^= ((k as u32) >> 4) as i32;
    // Signed remainder then magnitude, as in 32-bit integer arithmetic.
    (i64::from(k) % capacity as i64).unsigned_abs() as usize
}
