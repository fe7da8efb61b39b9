//! Result export and the text report.
//!
//! # Files written by a sweep
//! ```text
//! {results_dir}/results.csv    ← header + one row per experiment
//! {results_dir}/results.json   ← the same results, pretty JSON
//! {results_dir}/report.txt     ← render_text output
//! ```

use crate::analysis::{self, GroupSummary};
use crate::bench::ExperimentResult;
use crate::error::Result;
use crate::metrics::{MetricsSnapshot, CSV_COLUMNS, CSV_HEADER};
use std::fmt::{self, Write as _};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

pub const CSV_FILE: &str = "results.csv";
pub const JSON_FILE: &str = "results.json";
pub const TEXT_FILE: &str = "report.txt";

fn create(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(BufWriter::new(File::create(path)?))
}

pub fn write_csv(path: &Path, results: &[ExperimentResult]) -> Result<()> {
    let mut out = create(path)?;
    writeln!(out, "{}", CSV_HEADER)?;
    for r in results {
        writeln!(out, "{}", r.csv_row())?;
    }
    out.flush()?;
    log::info!("wrote {} rows to {}", results.len(), path.display());
    Ok(())
}

/// Read a results CSV.
///
/// The first line is taken as the header. Rows with too few columns are
/// skipped; numeric fields that fail to parse read as zero.
///
/// `elements_inserted` is taken from the Elements column, which the harness
/// fills with the stored count for both table kinds. Only when that column
/// does not parse is it estimated from the four-decimal load factor.
pub fn read_csv(path: &Path) -> Result<Vec<ExperimentResult>> {
    let reader = BufReader::new(File::open(path)?);
    let mut results = Vec::new();
    let mut skipped = 0usize;

    for line in reader.lines().skip(1) {
        let line = line?;
        let cols: Vec<&str> = line.split(',').map(str::trim).collect();
        if cols.len() < CSV_COLUMNS {
            skipped += 1;
            continue;
        }
        results.push(parse_row(&cols));
    }

    if skipped > 0 {
        log::warn!("{}: skipped {} short rows", path.display(), skipped);
    }
    Ok(results)
}

fn parse_row(cols: &[&str]) -> ExperimentResult {
    fn num<T: std::str::FromStr + Default>(s: &str) -> T {
        s.parse().unwrap_or_default()
    }

    let capacity: usize = num(cols[2]);
    let elements: Option<usize> = cols[3].parse().ok();
    let elements_inserted = elements.unwrap_or_else(|| {
        let load_factor: f64 = num(cols[4]);
        (load_factor * capacity as f64).round() as usize
    });
    ExperimentResult {
        metrics: MetricsSnapshot {
            table_kind: cols[0].to_string(),
            hash_function: cols[1].to_string(),
            capacity,
            elements_inserted,
            collisions: num(cols[5]),
            insertion_ns: num(cols[6]),
            search_ns: num(cols[7]),
            longest: num(cols[8]),
            second_longest: num(cols[9]),
            third_longest: num(cols[10]),
            min_gap: num(cols[11]),
            max_gap: num(cols[12]),
            mean_gap: num(cols[13]),
        },
        elements_supplied: elements.unwrap_or_default(),
    }
}

pub fn write_json(path: &Path, results: &[ExperimentResult]) -> Result<()> {
    let mut out = create(path)?;
    serde_json::to_writer_pretty(&mut out, results)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

/// Write all three result files into `dir`.
pub fn write_all(dir: &Path, results: &[ExperimentResult]) -> Result<()> {
    write_csv(&dir.join(CSV_FILE), results)?;
    write_json(&dir.join(JSON_FILE), results)?;
    write_text(&dir.join(TEXT_FILE), results)
}

pub fn write_text(path: &Path, results: &[ExperimentResult]) -> Result<()> {
    let mut out = create(path)?;
    out.write_all(render_text(results)?.as_bytes())?;
    out.flush()?;
    Ok(())
}

pub fn render_text(results: &[ExperimentResult]) -> Result<String> {
    let mut s = String::new();
    render_into(&mut s, results)?;
    Ok(s)
}

fn section(out: &mut String, title: &str) -> fmt::Result {
    writeln!(out, "{}", title)?;
    writeln!(out, "{}", "-".repeat(title.len()))
}

fn groups(out: &mut String, title: &str, summaries: &[GroupSummary]) -> fmt::Result {
    section(out, title)?;
    for g in summaries {
        writeln!(
            out,
            "{:<20} {:>4} runs  {:>10.2} ms  {:>12.1} collisions  load {:.2}",
            g.label, g.runs, g.avg_insert_ms, g.avg_collisions, g.avg_load_factor
        )?;
    }
    writeln!(out)
}

fn ranking(out: &mut String, title: &str, rows: &[&ExperimentResult]) -> fmt::Result {
    writeln!(out, "{}:", title)?;
    for (i, r) in rows.iter().enumerate() {
        let m = &r.metrics;
        writeln!(
            out,
            "{}. {} + {} (m={}): {:.2} ms, {} collisions",
            i + 1,
            m.table_kind,
            m.hash_function,
            m.capacity,
            m.insertion_ms(),
            m.collisions
        )?;
    }
    writeln!(out)
}

fn render_into(out: &mut String, results: &[ExperimentResult]) -> fmt::Result {
    writeln!(out, "HASH TABLE EXPERIMENT REPORT")?;
    writeln!(out, "============================")?;
    writeln!(out)?;

    section(out, "Summary")?;
    let chained = results.iter().filter(|r| r.is_chained()).count();
    writeln!(out, "Experiments: {}", results.len())?;
    writeln!(out, "  chained: {}", chained)?;
    writeln!(out, "  probing: {}", results.len() - chained)?;
    if !results.is_empty() {
        let n = results.len() as f64;
        let ms: f64 = results.iter().map(|r| r.metrics.insertion_ms()).sum();
        let collisions: f64 = results.iter().map(|r| r.metrics.collisions as f64).sum();
        writeln!(out, "Average insertion time: {:.2} ms", ms / n)?;
        writeln!(out, "Average collisions: {:.1}", collisions / n)?;
    }
    writeln!(out)?;

    groups(out, "By table kind", &analysis::by_table_kind(results))?;
    groups(out, "By hash function", &analysis::by_hash_function(results))?;
    groups(out, "By probe strategy", &analysis::by_probe_strategy(results))?;

    section(out, "Gaps (chained)")?;
    match analysis::gap_overview(results) {
        Some(g) => {
            writeln!(
                out,
                "Average gaps: min {:.1}, max {:.1}, mean {:.1}",
                g.avg_min_gap, g.avg_max_gap, g.avg_mean_gap
            )?;
            if let Some(w) = g.worst {
                writeln!(
                    out,
                    "Worst distribution: {} (m={}) with max gap {}",
                    w.metrics.hash_function, w.metrics.capacity, w.metrics.max_gap
                )?;
            }
        }
        None => writeln!(out, "no chained results")?,
    }
    writeln!(out)?;

    section(out, "Longest chains")?;
    for (i, r) in analysis::longest_chains(results, 3).iter().enumerate() {
        let m = &r.metrics;
        writeln!(
            out,
            "{}. {} (m={}, load {:.0}%): {}, {}, {}",
            i + 1,
            m.hash_function,
            m.capacity,
            r.elements_supplied as f64 * 100.0 / m.capacity.max(1) as f64,
            m.longest,
            m.second_longest,
            m.third_longest
        )?;
    }
    writeln!(out)?;

    section(out, "Rankings")?;
    ranking(out, "Fastest (top 5)", &analysis::fastest(results, 5))?;
    ranking(out, "Fewest collisions (top 5)", &analysis::fewest_collisions(results, 5))?;
    ranking(out, "Most collisions (top 3)", &analysis::most_collisions(results, 3))?;
    Ok(())
}
