//! Record: a fixed-format nine-digit key.
//!
//! The code is the stored form; leading zeros are significant, so
//! `"000000042"` and `"42"` are different inputs and only the first is valid.
//! The integer view is derived on demand.

use crate::error::{HashLabError, Result};
use std::fmt;
use std::str::FromStr;

/// Number of decimal digits in every code
pub const CODE_LEN: usize = 9;

/// Exclusive upper bound of [`Record::value`]
pub const VALUE_LIMIT: u32 = 1_000_000_000;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Record {
    /// ASCII digits, validated on construction
    code: [u8; CODE_LEN],
}

impl Record {
    /// Build a record from its textual code.
    ///
    /// Fails unless `code` is exactly nine ASCII digits.
    pub fn new(code: &str) -> Result<Self> {
        if code.len() != CODE_LEN {
            return Err(HashLabError::invalid_code(code, "expected exactly 9 characters"));
        }
        let bytes = code.as_bytes();
        if !bytes.iter().all(u8::is_ascii_digit) {
            return Err(HashLabError::invalid_code(code, "expected decimal digits only"));
        }
        let mut buf = [0u8; CODE_LEN];
        buf.copy_from_slice(bytes);
        Ok(Self { code: buf })
    }

    /// Build a record from its integer view, zero-padding to nine digits.
    pub fn from_value(value: u32) -> Result<Self> {
        if value >= VALUE_LIMIT {
            return Err(HashLabError::invalid_code(value.to_string(), "value must be below 10^9"));
        }
        Ok(Self::from_value_in_range(value))
    }

    /// Caller guarantees `value < VALUE_LIMIT`.
    pub(crate) fn from_value_in_range(value: u32) -> Self {
        debug_assert!(value < VALUE_LIMIT);
        let mut code = [b'0'; CODE_LEN];
        let mut rest = value;
        for slot in code.iter_mut().rev() {
            *slot = b'0' + (rest % 10) as u8;
            rest /= 10;
        }
        Self { code }
    }

    pub fn code(&self) -> &str {
        // Only ASCII digits are ever stored.
        std::str::from_utf8(&self.code).unwrap_or_default()
    }

    /// The code read as a non-negative integer below 10^9.
    pub fn value(&self) -> u32 {
        self.code.iter().fold(0u32, |acc, d| acc * 10 + u32::from(d - b'0'))
    }

    /// Integer view of a search code, or `None` when the code could not
    /// belong to any record.
    pub(crate) fn parse_value(code: &str) -> Option<u32> {
        let bytes = code.as_bytes();
        if bytes.len() != CODE_LEN || !bytes.iter().all(u8::is_ascii_digit) {
            return None;
        }
        Some(bytes.iter().fold(0u32, |acc, d| acc * 10 + u32::from(d - b'0')))
    }
}

impl FromStr for Record {
    type Err = HashLabError;

    fn from_str(s: &str) -> Result<Self> {
        Record::new(s)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Record({})", self.code())
    }
}
