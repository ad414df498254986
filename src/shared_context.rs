//! Shared-Context Demo
//!
//! A cooperative server task and a batch of blocking calls share one
//! fixed-size worker pool. While the blocking calls hold every slot, the
//! server makes zero progress; the moment they drain, it resumes. The
//! absence of "handled request" lines during the blocked window is the
//! observable property under demonstration.

use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context as _;
use tokio::runtime;

use crate::wait::{blocking_wait, suspending_wait};

/// Slots in the shared pool, and blocking calls submitted to it.
pub const POOL_SLOTS: usize = 5;

/// What one run observed, offsets measured from demo start.
pub struct Report {
    /// When each "handled request" happened.
    pub handled: Vec<Duration>,
    /// When the blocking calls were submitted.
    pub blocked_from: Duration,
    /// When the last blocking call drained.
    pub blocked_until: Duration,
}

pub fn run() -> anyhow::Result<()> {
    let tick = Duration::from_secs(1);
    let block_for = Duration::from_secs(5);

    println!(
        "Server handles one request per {:?} on a {}-slot pool",
        tick, POOL_SLOTS
    );
    println!(
        "Then {} blocking calls of {:?} each land on the same pool",
        POOL_SLOTS, block_for
    );
    println!();

    run_with(POOL_SLOTS, 5, tick, POOL_SLOTS, block_for)?;
    Ok(())
}

/// Demo body with injectable timings so the starvation window is assertable.
pub fn run_with(
    slots: usize,
    warmup_ticks: u32,
    tick: Duration,
    blocking_calls: usize,
    block_for: Duration,
) -> anyhow::Result<Report> {
    let pool = runtime::Builder::new_multi_thread()
        .worker_threads(slots)
        .enable_time()
        .thread_name("shared-pool")
        .build()
        .context("worker pool setup failed")?;

    let start = Instant::now();
    let (tx, rx) = mpsc::channel();

    // The server is cooperative: each wait parks the task and frees its slot.
    let server = pool.spawn(async move {
        loop {
            suspending_wait(tick).await;
            let at = start.elapsed();
            println!("[{:>7.3}s] handled request", at.as_secs_f64());
            let _ = tx.send(at);
        }
    });

    // serving: the pool has idle slots, so the server ticks along.
    thread::sleep(tick * warmup_ticks);

    let blocked_from = start.elapsed();
    println!(
        "[{:>7.3}s] submitting {} blocking calls to the same pool",
        blocked_from.as_secs_f64(),
        blocking_calls
    );

    let blockers: Vec<_> = (0..blocking_calls)
        .map(|i| {
            pool.spawn(async move {
                println!(
                    "[{:>7.3}s] blocking call {} started",
                    start.elapsed().as_secs_f64(),
                    i
                );
                blocking_wait(block_for);
                println!(
                    "[{:>7.3}s] blocking call {} finished",
                    start.elapsed().as_secs_f64(),
                    i
                );
            })
        })
        .collect();

    // Every slot is occupied now. The server cannot be polled, and with no
    // worker left to park, not even its timer advances. Join from outside
    // the pool.
    pool.block_on(async {
        for blocker in blockers {
            blocker.await?;
        }
        Ok::<_, tokio::task::JoinError>(())
    })?;

    let blocked_until = start.elapsed();
    println!(
        "[{:>7.3}s] blocking calls drained, server can run again",
        blocked_until.as_secs_f64()
    );

    // resumed: the server's overdue tick fires as soon as a worker parks.
    thread::sleep(tick * warmup_ticks);

    println!(
        "[{:>7.3}s] stopping the server",
        start.elapsed().as_secs_f64()
    );
    // A best-effort signal: it lands at the server's next suspension point.
    server.abort();
    pool.shutdown_timeout(Duration::from_secs(1));

    Ok(Report {
        handled: rx.try_iter().collect(),
        blocked_from,
        blocked_until,
    })
}
