//! Latency Report - per-operation latency histograms for the map.
//!
//! Run with `cargo run --release --bin latency-report -- --help`.
//! Log output is controlled by `RUST_LOG` (default `warn`).

use std::error::Error;
use std::hint::black_box;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use event_map::{EventKind, OrderedEventMap};
use hdrhistogram::Histogram;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Operation mix to measure
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Workload {
    /// Overwrite existing keys
    Set,
    /// Delete a key, then set it again at the end
    Delete,
    /// Positional read with a negative index
    At,
    /// Replace one entry in the middle
    Splice,
    /// Rotate through all of the above
    Mixed,
}

/// Measure OrderedEventMap operation latency
#[derive(Parser, Debug)]
#[command(name = "latency-report")]
#[command(version)]
struct Args {
    /// Number of measured operations
    #[arg(short, long, default_value_t = 1_000_000)]
    iterations: u64,

    /// Number of entries in the map before measuring
    #[arg(short, long, default_value_t = 10_000)]
    size: u64,

    /// Listeners registered for each event kind
    #[arg(short, long, default_value_t = 1)]
    listeners: usize,

    /// Operation mix
    #[arg(short, long, value_enum, default_value_t = Workload::Mixed)]
    workload: Workload,

    /// Pin the measuring thread to the last CPU core
    #[arg(long)]
    pin: bool,
}

/// Pin the current thread to the last available CPU core.
fn pin_to_last_core() -> bool {
    core_affinity::get_core_ids()
        .and_then(|ids| ids.last().copied())
        .map(core_affinity::set_for_current)
        .unwrap_or(false)
}

fn build_map(args: &Args) -> OrderedEventMap<u64, u64> {
    let mut map = OrderedEventMap::from_pairs((0..args.size).map(|i| (i, i)));
    for _ in 0..args.listeners {
        for kind in EventKind::ALL {
            map.on(kind, |event| {
                black_box(event.key());
                Ok(())
            });
        }
    }
    map
}

fn run_op(map: &mut OrderedEventMap<u64, u64>, workload: Workload, i: u64, size: u64) -> Result<(), Box<dyn Error>> {
    let key = i % size.max(1);
    match workload {
        Workload::Set => {
            map.set(key, i)?;
        }
        Workload::Delete => {
            map.delete(&key)?;
            map.set(key, i)?;
        }
        Workload::At => {
            black_box(map.at(-((key as isize) + 1)));
        }
        Workload::Splice => {
            let middle = (map.len() / 2) as isize;
            black_box(map.splice(middle, Some(1), [(size + i, i)]));
        }
        Workload::Mixed => {
            let next = match i % 4 {
                0 => Workload::Set,
                1 => Workload::Delete,
                2 => Workload::At,
                _ => Workload::Splice,
            };
            run_op(map, next, i, size)?;
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();

    if args.pin && !pin_to_last_core() {
        tracing::warn!("Could not pin to a CPU core, continuing unpinned");
    }

    let mut map = build_map(&args);
    let mut histogram = Histogram::<u64>::new_with_bounds(1, 10_000_000, 3)?;
    let mut total_duration = Duration::ZERO;

    info!(
        iterations = args.iterations,
        size = args.size,
        listeners = args.listeners,
        workload = ?args.workload,
        "Running latency report"
    );

    for i in 0..args.iterations {
        let start = Instant::now();
        run_op(&mut map, args.workload, i, args.size)?;
        let elapsed = start.elapsed();

        histogram.saturating_record(elapsed.as_nanos() as u64);
        total_duration += elapsed;
    }

    println!("\n=== Latency Report (ns) ===");
    println!("Workload:   {:?}", args.workload);
    println!("Map size:   {}", map.len());
    println!("Listeners:  {} per kind", args.listeners);
    println!("Total Ops:  {}", args.iterations);
    println!("Throughput: {:.2} ops/sec", args.iterations as f64 / total_duration.as_secs_f64());
    println!("---------------------------");
    println!("Min:    {:8} ns", histogram.min());
    println!("P50:    {:8} ns", histogram.value_at_quantile(0.50));
    println!("P90:    {:8} ns", histogram.value_at_quantile(0.90));
    println!("P99:    {:8} ns", histogram.value_at_quantile(0.99));
    println!("P99.9:  {:8} ns", histogram.value_at_quantile(0.999));
    println!("P99.99: {:8} ns", histogram.value_at_quantile(0.9999));
    println!("Max:    {:8} ns", histogram.max());
    println!("---------------------------");

    println!("\nDistribution:");
    for v in histogram.iter_log(100, 2.0) {
        let count = v.count_since_last_iteration();
        if count > 0 {
            println!("<= {:8} ns: {:10} count", v.value_iterated_to(), count);
        }
    }

    Ok(())
}
