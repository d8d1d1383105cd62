//! post-office — headless driver for the post-office queue simulator.
//!
//! ```text
//! post-office [CONFIG.json] [--stdin]
//! ```
//!
//! Without `--stdin` a seeded arrival script is played on a synthetic
//! 50 ms clock, the run is recorded to `output/post-office/`, and the same
//! script is then replayed under every dispatch policy in parallel.
//!
//! With `--stdin` arrivals are read as `SERVICE_REQUEST,<category>[,<ts>]`
//! lines and the simulator runs in real time until input ends and the
//! office is empty.
//!
//! `busy-saturday.json` next to this crate is a sample configuration.

mod script;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use log::info;
use rayon::prelude::*;

use pq_core::{DispatchPolicy, SimConfig};
use pq_input::ArrivalFeed;
use pq_output::{OutputWriter, RunRecorder, RunRow, unix_secs_now};
use pq_sim::{NoopObserver, QueueSim, Statistics};

use script::ArrivalScript;

// ── Constants ─────────────────────────────────────────────────────────────────

const OUTPUT_DIR:         &str = "output/post-office";
const SCRIPT_TICKS:       usize = 6_000; // 5 wall minutes at 20 Hz
const ARRIVAL_PROB:       f64   = 0.03;  // per tick; slightly above stock capacity
const SCRIPT_SEED:        u64   = 7;
const SNAPSHOT_EVERY:     u64   = 20;    // one queue sample per wall second

// ── Arguments ─────────────────────────────────────────────────────────────────

struct Args {
    config: Option<PathBuf>,
    stdin:  bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args { config: None, stdin: false };
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--stdin" => args.stdin = true,
            "-h" | "--help" => {
                println!("usage: post-office [CONFIG.json] [--stdin]");
                std::process::exit(0);
            }
            flag if flag.starts_with('-') => bail!("unknown flag `{flag}`"),
            path if args.config.is_none() => args.config = Some(PathBuf::from(path)),
            extra => bail!("unexpected argument `{extra}`"),
        }
    }
    Ok(args)
}

fn load_config(path: Option<&Path>) -> Result<SimConfig> {
    let Some(path) = path else {
        return Ok(SimConfig::default());
    };
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    SimConfig::from_json_reader(BufReader::new(file))
        .with_context(|| format!("loading config {}", path.display()))
}

// ── Output ────────────────────────────────────────────────────────────────────

#[cfg(not(feature = "sqlite"))]
type HistoryWriter = pq_output::CsvWriter;

#[cfg(feature = "sqlite")]
type HistoryWriter = pq_output::SqliteWriter;

#[cfg(not(feature = "sqlite"))]
fn open_writer(dir: &Path) -> Result<(HistoryWriter, u64)> {
    Ok((pq_output::CsvWriter::new(dir)?, 1))
}

#[cfg(feature = "sqlite")]
fn open_writer(dir: &Path) -> Result<(HistoryWriter, u64)> {
    let writer = pq_output::SqliteWriter::new(dir)?;
    let run_id = writer.next_run_id()?;
    Ok((writer, run_id))
}

#[cfg(not(feature = "sqlite"))]
fn print_stored(_writer: HistoryWriter, _run_id: u64) -> Result<()> {
    Ok(())
}

/// Per-category totals read back from the history database.
#[cfg(feature = "sqlite")]
fn print_stored(writer: HistoryWriter, run_id: u64) -> Result<()> {
    for row in writer.category_summary(run_id)? {
        println!(
            "stored {:<15} {} customers, {} completed, {} abandoned, mean wait {}",
            row.category,
            row.customers,
            row.completed,
            row.abandoned,
            minutes(row.mean_wait),
        );
    }
    Ok(())
}

/// Run the main simulation through `recorder`, from stdin or the script.
fn run_recorded<W: OutputWriter>(
    sim:      &mut QueueSim,
    recorder: &mut RunRecorder<W>,
    script:   Option<&ArrivalScript>,
) -> Result<()> {
    match script {
        Some(script) => {
            let ticks = script::run_script(sim, script, recorder)?;
            info!("script finished after {ticks} ticks");
        }
        None => {
            let mut feed = ArrivalFeed::spawn(BufReader::new(std::io::stdin()));
            let report = script::run_feed(sim, &mut feed, recorder);
            info!(
                "input closed: {} accepted, {} rejected, {} malformed, {} read errors",
                report.accepted, report.rejected, report.malformed, report.read_errors
            );
        }
    }
    Ok(())
}

// ── Reporting ─────────────────────────────────────────────────────────────────

fn minutes(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_owned(), |m| format!("{m:.2}"))
}

fn print_statistics(stats: &Statistics) {
    println!("Simulated time   : {}", stats.simulated_time);
    println!(
        "Customers        : {} total, {} served, {} abandoned, {} waiting, {} in service",
        stats.total_customers, stats.served, stats.abandoned, stats.waiting, stats.in_service
    );
    println!("Mean wait        : {} min", minutes(stats.mean_wait));
    println!("Mean service     : {} min", minutes(stats.mean_service));
    println!("Throughput       : {:.1} / simulated hour", stats.throughput_per_hour);
    println!("Abandonment rate : {:.1} %", stats.abandonment_rate * 100.0);
    println!();

    println!("{:<15} {:>8} {:>9} {:>8} {:>10}", "Category", "Served", "Abandoned", "Waiting", "Mean wait");
    println!("{}", "-".repeat(54));
    for c in &stats.by_category {
        println!(
            "{:<15} {:>8} {:>9} {:>8} {:>10}",
            c.name,
            c.served,
            c.abandoned,
            c.waiting,
            minutes(c.mean_wait),
        );
    }
    println!();
}

fn compare_policies(config: &SimConfig, script: &ArrivalScript) -> Result<()> {
    let t0 = Instant::now();
    let results: Vec<(DispatchPolicy, Statistics)> = DispatchPolicy::ALL
        .as_slice()
        .par_iter()
        .map(|&policy| -> Result<(DispatchPolicy, Statistics)> {
            let mut sim = QueueSim::new(SimConfig { policy, ..config.clone() })?;
            script::run_script(&mut sim, script, &mut NoopObserver)?;
            Ok((policy, sim.statistics()))
        })
        .collect::<Result<_>>()?;
    info!("policy comparison took {:.3} s", t0.elapsed().as_secs_f64());

    println!("{:<20} {:>8} {:>9} {:>10} {:>12}", "Policy", "Served", "Abandoned", "Mean wait", "Throughput/h");
    println!("{}", "-".repeat(63));
    for (policy, stats) in &results {
        println!(
            "{:<20} {:>8} {:>9} {:>10} {:>12.1}",
            policy.as_str(),
            stats.served,
            stats.abandoned,
            minutes(stats.mean_wait),
            stats.throughput_per_hour,
        );
    }
    Ok(())
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let args = parse_args()?;
    let config = load_config(args.config.as_deref())?;

    println!("=== post-office queue simulator ===");
    println!(
        "Servers: {}  |  Booths: {}  |  Policy: {}  |  ×{}  |  Abandonment: {}",
        config.servers,
        config.booths,
        config.policy,
        config.acceleration,
        if config.abandonment_enabled { "on" } else { "off" },
    );
    println!();

    let mut sim = QueueSim::new(config.clone())?;
    let names: Vec<String> = config.categories.iter().map(|c| c.name.clone()).collect();
    let script = (!args.stdin)
        .then(|| ArrivalScript::generate(&names, SCRIPT_TICKS, ARRIVAL_PROB, SCRIPT_SEED));
    if let Some(script) = &script {
        println!("Arrival script: {} arrivals over {} ticks", script.total_arrivals(), script.ticks());
    }

    // Record the main run.
    let dir = Path::new(OUTPUT_DIR);
    std::fs::create_dir_all(dir)?;
    let (writer, run_id) = open_writer(dir)?;
    let run = RunRow::from_config(run_id, &config, unix_secs_now());
    let mut recorder =
        RunRecorder::start(writer, &run, sim.categories()).snapshot_every(SNAPSHOT_EVERY);

    let t0 = Instant::now();
    run_recorded(&mut sim, &mut recorder, script.as_ref())?;
    if let Err(e) = recorder.close(unix_secs_now()) {
        eprintln!("output error: {e}");
    }
    println!("Run {run_id} complete in {:.3} s ({})", t0.elapsed().as_secs_f64(), sim.clock());
    println!();

    let stats = sim.statistics();
    print_statistics(&stats);
    serde_json::to_writer_pretty(File::create(dir.join("statistics.json"))?, &stats)?;

    print_stored(recorder.into_writer(), run_id)?;

    if let Some(script) = &script {
        println!();
        compare_policies(&config, script)?;
    }

    Ok(())
}
