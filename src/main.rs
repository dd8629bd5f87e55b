//! Demonstration of the two-flag `SpinLock`.
//!
//! Starts a handful of worker threads that take turns on one shared lock.
//! Each worker greets, holds the lock for a while, then announces that it is
//! releasing it. The output never interleaves two workers' lines.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use twoflag_spinlock::{harness::run_workers, HarnessConfig, SpinConfig, SpinLock};

#[derive(Debug, Parser)]
#[command(version, about = "Serialize worker threads on a two-flag spinlock")]
struct Args {
    /// Number of worker threads.
    #[arg(long, env = "SPIN_WORKERS", default_value_t = 3)]
    workers: usize,

    /// Pause between spawning two workers (ms).
    #[arg(long, env = "SPIN_SPAWN_GAP_MS", default_value_t = 10)]
    spawn_gap_ms: u64,

    /// Time each worker spends inside the critical section (ms).
    #[arg(long, env = "SPIN_HOLD_MS", default_value_t = 1000)]
    hold_ms: u64,

    /// Backoff while another thread owns the guard flag (µs).
    #[arg(long, env = "SPIN_GUARD_DELAY_US", default_value_t = 10)]
    guard_delay_us: u64,

    /// Backoff after finding the lock held (µs).
    #[arg(long, env = "SPIN_HELD_DELAY_US", default_value_t = 100)]
    held_delay_us: u64,

    /// Stack size of each worker thread (KiB); platform default when unset.
    #[arg(long, env = "SPIN_STACK_KIB")]
    stack_kib: Option<usize>,
}

fn setup_logger() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "twoflag_spinlock=info");
    }
    env_logger::init();
}

fn main() -> Result<()> {
    setup_logger();
    let args = Args::parse();

    let spin = SpinConfig::new()
        .with_guard_delay(Duration::from_micros(args.guard_delay_us))
        .with_held_delay(Duration::from_micros(args.held_delay_us));
    let mut harness =
        HarnessConfig::new(args.workers).with_spawn_gap(Duration::from_millis(args.spawn_gap_ms));
    if let Some(kib) = args.stack_kib {
        harness = harness.with_stack_size(kib.saturating_mul(1024));
    }
    let hold = Duration::from_millis(args.hold_ms);

    let lock = Arc::new(SpinLock::with_config(spin));
    info!("lock ready: {:?}", spin);

    println!("Starting threads...");

    run_workers(&lock, &harness, move |id| {
        println!("Hello from thread #{id}");
        thread::sleep(hold);
        println!("Thread #{id} releasing the lock");
    })
    .context("worker harness failed")?;

    println!("All threads have completed");
    Ok(())
}
