mod logger;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};
use hashlab::analysis::{self, GroupSummary};
use hashlab::bench::{self, ExperimentResult, ExperimentSpec};
use hashlab::config::{BenchConfig, ENV_PREFIX};
use hashlab::{dataset, report, HashFunction, ProbeStrategy};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "hlcli", about = "Hash table collision benchmark", version)]
struct Cli {
    /// More log output (-v debug, -vv trace; default info)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Warnings and errors only
    #[arg(short, long, global = true)]
    quiet: bool,

    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create any missing dataset files
    Generate {
        #[arg(long, value_delimiter = ',')]
        sizes: Option<Vec<usize>>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long = "data-dir")]
        data_dir: Option<PathBuf>,
    },
    /// Full sweep, then write results.csv, results.json and report.txt
    Run {
        #[arg(long = "table-sizes", value_delimiter = ',')]
        table_sizes: Option<Vec<usize>>,
        #[arg(long = "dataset-sizes", value_delimiter = ',')]
        dataset_sizes: Option<Vec<usize>>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long = "data-dir")]
        data_dir: Option<PathBuf>,
        #[arg(long = "results-dir")]
        results_dir: Option<PathBuf>,
    },
    /// One experiment on a freshly generated dataset
    Single {
        #[arg(long)]
        capacity: usize,
        #[arg(long)]
        hash: HashFunction,
        /// Open addressing with this strategy; chaining when omitted
        #[arg(long)]
        probe: Option<ProbeStrategy>,
        #[arg(long, default_value_t = 1000)]
        count: usize,
        #[arg(long)]
        seed: Option<u64>,
        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Summarize an existing results CSV
    Analyze {
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::Logger::init(logger::level_from_flags(cli.verbose, cli.quiet))
        .context("installing logger")?;

    let config = match &cli.config {
        Some(path) => BenchConfig::load(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => BenchConfig::default(),
    };
    let mut config = config.apply_env(ENV_PREFIX)?;

    match cli.command {
        Command::Generate { sizes, seed, data_dir } => {
            if let Some(sizes) = sizes {
                config = config.dataset_sizes(sizes);
            }
            if let Some(seed) = seed {
                config = config.seed(seed);
            }
            if let Some(dir) = data_dir {
                config = config.data_dir(dir);
            }
            generate(&config)
        }
        Command::Run { table_sizes, dataset_sizes, seed, data_dir, results_dir } => {
            if let Some(sizes) = table_sizes {
                config = config.table_sizes(sizes);
            }
            if let Some(sizes) = dataset_sizes {
                config = config.dataset_sizes(sizes);
            }
            if let Some(seed) = seed {
                config = config.seed(seed);
            }
            if let Some(dir) = data_dir {
                config = config.data_dir(dir);
            }
            if let Some(dir) = results_dir {
                config = config.results_dir(dir);
            }
            run(&config)
        }
        Command::Single { capacity, hash, probe, count, seed, json } => {
            let spec = match probe {
                Some(probe) => ExperimentSpec::Probing { hash, probe },
                None => ExperimentSpec::Chained { hash },
            };
            single(spec, capacity, count, seed.unwrap_or(config.seed), json)
        }
        Command::Analyze { input } => {
            let path = input.unwrap_or_else(|| config.results_dir.join(report::CSV_FILE));
            analyze(&path)
        }
    }
}

fn generate(config: &BenchConfig) -> Result<()> {
    config.validate()?;
    let paths = dataset::ensure(&config.data_dir, &config.dataset_sizes, config.seed)?;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Size", "File", "Fingerprint"]);
    for (size, path) in config.dataset_sizes.iter().zip(&paths) {
        let records = dataset::load(path)?;
        table.add_row(vec![
            size.to_string(),
            path.display().to_string(),
            format!("{:016x}", dataset::fingerprint(&records)),
        ]);
    }
    println!("{table}");
    println!("{} {} datasets ready", "✓".green().bold(), paths.len());
    Ok(())
}

fn run(config: &BenchConfig) -> Result<()> {
    config.validate()?;
    let started = Instant::now();

    dataset::ensure(&config.data_dir, &config.dataset_sizes, config.seed)?;
    let results = bench::sweep(config, bench::dataset_loader(config))?;
    report::write_all(&config.results_dir, &results)
        .with_context(|| format!("writing results to {}", config.results_dir.display()))?;

    print_groups("Table kind", &analysis::by_table_kind(&results));
    println!(
        "{} {} experiments in {:.1}s, results in {}",
        "✓".green().bold(),
        results.len(),
        started.elapsed().as_secs_f64(),
        config.results_dir.display()
    );
    Ok(())
}

fn single(spec: ExperimentSpec, capacity: usize, count: usize, seed: u64, json: bool) -> Result<()> {
    let data = dataset::generate(count, seed);
    let Some(result) = bench::run_experiment(spec, capacity, &data)? else {
        println!("{} {} accepted no records", "!".yellow().bold(), spec.label());
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let m = &result.metrics;
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Metric", "Value"]);
    let rows = [
        ("Table", m.table_kind.clone()),
        ("Hash", m.hash_function.clone()),
        ("Capacity", m.capacity.to_string()),
        ("Supplied", result.elements_supplied.to_string()),
        ("Inserted", m.elements_inserted.to_string()),
        ("Load factor", format!("{:.4}", m.load_factor())),
        ("Collisions", m.collisions.to_string()),
        ("Insert", format!("{:.3} ms", m.insertion_ms())),
        ("Search", format!("{:.3} ms", m.search_ns as f64 / 1_000_000.0)),
        ("Top chains", format!("{}, {}, {}", m.longest, m.second_longest, m.third_longest)),
        ("Gaps min/max/mean", format!("{}, {}, {:.2}", m.min_gap, m.max_gap, m.mean_gap)),
    ];
    for (name, value) in rows {
        table.add_row(vec![name.to_string(), value]);
    }
    println!("{table}");
    Ok(())
}

fn analyze(path: &Path) -> Result<()> {
    let results = report::read_csv(path).with_context(|| format!("reading {}", path.display()))?;
    if results.is_empty() {
        println!("{} no results in {}", "!".yellow().bold(), path.display());
        return Ok(());
    }
    println!("Loaded {} results from {}", results.len(), path.display());

    print_groups("Table kind", &analysis::by_table_kind(&results));
    print_groups("Hash function", &analysis::by_hash_function(&results));
    print_groups("Probe strategy", &analysis::by_probe_strategy(&results));

    if let Some(g) = analysis::gap_overview(&results) {
        println!(
            "Gaps (chained): min {:.1}, max {:.1}, mean {:.1}",
            g.avg_min_gap, g.avg_max_gap, g.avg_mean_gap
        );
        if let Some(w) = g.worst {
            println!(
                "Worst distribution: {} (m={}) max gap {}",
                w.metrics.hash_function.red(),
                w.metrics.capacity,
                w.metrics.max_gap
            );
        }
    }

    print_ranking("Fastest", &analysis::fastest(&results, 5));
    print_ranking("Fewest collisions", &analysis::fewest_collisions(&results, 5));
    print_ranking("Most collisions", &analysis::most_collisions(&results, 3));
    Ok(())
}

fn print_groups(title: &str, groups: &[GroupSummary]) {
    if groups.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![title, "Runs", "Avg insert (ms)", "Avg collisions", "Avg load"]);
    for g in groups {
        table.add_row(vec![
            g.label.clone(),
            g.runs.to_string(),
            format!("{:.2}", g.avg_insert_ms),
            format!("{:.1}", g.avg_collisions),
            format!("{:.2}", g.avg_load_factor),
        ]);
    }
    println!("{table}");
}

fn print_ranking(title: &str, rows: &[&ExperimentResult]) {
    println!("{}", title.bold());
    for (i, r) in rows.iter().enumerate() {
        let m = &r.metrics;
        println!(
            "  {}. {} + {} (m={}): {:.2} ms, {} collisions",
            i + 1,
            m.table_kind,
            m.hash_function,
            m.capacity,
            m.insertion_ms(),
            m.collisions
        );
    }
}
