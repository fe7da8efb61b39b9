//! Synthetic datasets of nine-digit codes.
//!
//! Generation is seeded, so the same `(count, seed)` always yields the same
//! sequence. Values are uniform over `[0, 10^9)` and duplicates are expected.
//!
//! # Disk layout
//! ```text
//! {data_dir}/dataset_{size}.txt   ← one code per line
//! ```

use crate::error::{HashLabError, Result};
use crate::record::{Record, CODE_LEN, VALUE_LIMIT};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Seed used when none is configured
pub const DEFAULT_SEED: u64 = 12345;

pub fn generate(count: usize, seed: u64) -> Vec<Record> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| Record::from_value_in_range(rng.gen_range(0..VALUE_LIMIT)))
        .collect()
}

/// Write one code per line, creating parent directories as needed.
pub fn save(path: &Path, records: &[Record]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut out = BufWriter::with_capacity(64 * 1024, File::create(path)?);
    for r in records {
        out.write_all(r.code().as_bytes())?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

/// Read a dataset file.
///
/// Lines whose trimmed length is not nine are skipped. A nine-character
/// line that is not all digits is an error.
pub fn load(path: &Path) -> Result<Vec<Record>> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        let code = line.trim();
        if code.len() != CODE_LEN {
            skipped += 1;
            continue;
        }
        let record = Record::new(code)
            .map_err(|e| HashLabError::invalid_data(n + 1, e.to_string()))?;
        records.push(record);
    }

    if skipped > 0 {
        log::warn!("{}: skipped {} lines without a 9-digit code", path.display(), skipped);
    }
    Ok(records)
}

pub fn dataset_path(dir: &Path, size: usize) -> PathBuf {
    dir.join(format!("dataset_{}.txt", size))
}

/// Generate and save every dataset in `sizes` that is not on disk yet.
/// Returns the paths in the order of `sizes`.
pub fn ensure(dir: &Path, sizes: &[usize], seed: u64) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::with_capacity(sizes.len());
    for &size in sizes {
        let path = dataset_path(dir, size);
        if path.exists() {
            log::debug!("dataset {} already present", path.display());
        } else {
            let records = generate(size, seed);
            save(&path, &records)?;
            log::info!(
                "generated {} records into {} (fingerprint {:016x})",
                size,
                path.display(),
                fingerprint(&records)
            );
        }
        paths.push(path);
    }
    Ok(paths)
}

/// Order-sensitive digest of a dataset, for checking reproducibility.
pub fn fingerprint(records: &[Record]) -> u64 {
    let mut buf = Vec::with_capacity(records.len() * CODE_LEN);
    for r in records {
        buf.extend_from_slice(r.code().as_bytes());
    }
    seahash::hash(&buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_generate_is_deterministic() {
        let a = generate(500, 7);
        let b = generate(500, 7);
        assert_eq!(a, b);
        assert_eq!(fingerprint(&a), fingerprint(&b));

        let c = generate(500, 8);
        assert_ne!(a, c);
    }

    #[test]
    fn test_generate_prefix_stable() {
        let short = generate(10, 99);
        let long = generate(100, 99);
        assert_eq!(&long[..10], &short[..]);
    }

    #[test]
    fn test_save_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("d.txt");
        let records = generate(1000, DEFAULT_SEED);
        save(&path, &records).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded, records);
    }

    #[test]
    fn test_load_skips_short_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("d.txt");
        fs::write(&path, "000000001\n\n12345\n  000000002  \n1234567890\n").unwrap();
        let loaded = load(&path).unwrap();
        let codes: Vec<&str> = loaded.iter().map(Record::code).collect();
        assert_eq!(codes, vec!["000000001", "000000002"]);
    }

    #[test]
    fn test_load_rejects_non_digits() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("d.txt");
        fs::write(&path, "000000001\n00000000x\n").unwrap();
        match load(&path) {
            Err(HashLabError::InvalidData { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected InvalidData, got {:?}", other),
        }
    }

    #[test]
    fn test_ensure_creates_missing_only() {
        let dir = tempdir().unwrap();
        let first = ensure(dir.path(), &[10, 20], 1).unwrap();
        assert_eq!(first, vec![dataset_path(dir.path(), 10), dataset_path(dir.path(), 20)]);
        assert_eq!(load(&first[1]).unwrap().len(), 20);

        // An existing file is left untouched even if the seed changes.
        fs::write(&first[0], "000000005\n").unwrap();
        ensure(dir.path(), &[10], 2).unwrap();
        assert_eq!(load(&first[0]).unwrap().len(), 1);
    }
}
