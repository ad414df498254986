//! Wait primitives with different scheduling contracts.
//!
//! All three take a duration and do nothing but wait, which is exactly what
//! makes their differences visible: `blocking_wait` occupies its worker
//! thread outright, `suspending_wait` parks only the logical task, and
//! `blocking_call_with_timeout` wraps blocking work so the *caller* can stop
//! waiting even though the work itself cannot be stopped.

use std::thread;
use std::time::Duration;

use thiserror::Error;
use tokio::runtime;
use tokio::time;

/// Outcome of one blocking-with-timeout call.
#[derive(Debug, Error)]
pub enum CallError {
    /// The timeout elapsed before the work finished. This is an expected
    /// outcome of the race, not a failure.
    #[error("timed out after {0:?}")]
    TimedOut(Duration),
    /// The disposable worker pool could not be built.
    #[error("worker pool setup failed: {0}")]
    Pool(#[from] std::io::Error),
    /// The worker vanished before reporting back (panic in the work).
    #[error("worker vanished: {0}")]
    Lost(#[from] tokio::task::JoinError),
}

/// How a guarded call ended, as observed by the demo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The wait unwound before its guarded side effect could run.
    CancelledCorrectly,
    /// The guarded side effect ran anyway; cancellation never landed.
    NotCancelled,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::CancelledCorrectly => write!(f, "call was cancelled correctly"),
            Verdict::NotCancelled => write!(f, "call wasn't cancelled correctly"),
        }
    }
}

/// Occupies the calling worker thread for the whole duration.
///
/// There is no suspension point in here, so a cooperative cancellation
/// signal (abort, dropped future) can never land while it runs. The slot is
/// simply gone until the sleep returns. That non-interruptibility is the
/// behavior under demonstration, not something to fix.
pub fn blocking_wait(duration: Duration) {
    thread::sleep(duration);
}

/// Parks the logical task, not the worker thread.
///
/// The slot stays free for other tasks during the wait, and because the wait
/// is a suspension point, dropping the future (e.g. from a wrapping timeout)
/// unwinds it immediately.
pub async fn suspending_wait(duration: Duration) {
    time::sleep(duration).await;
}

/// Runs `blocking_wait(work)` on a worker the caller can walk away from.
///
/// Builds a disposable one-worker pool per call, starts the blocking work on
/// it, and waits up to `limit` for completion. On timeout the caller gets
/// `Err(CallError::TimedOut)` and stops waiting, but the work is NOT stopped:
/// the pool is abandoned with `shutdown_background()` and its worker keeps
/// sleeping until the work runs out on its own. Known leak; the whole point
/// is that abandoning the pool is the only lever a caller has against work
/// that never yields. You'd never actually create a pool per call.
pub async fn blocking_call_with_timeout(work: Duration, limit: Duration) -> Result<(), CallError> {
    let pool = runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .max_blocking_threads(1)
        .thread_name("disposable-worker")
        .build()?;

    let job = pool.spawn_blocking(move || blocking_wait(work));
    let raced = time::timeout(limit, job).await;

    // Dropping a runtime from async context would panic, and waiting for it
    // to drain would defeat the timeout. Walk away instead.
    pool.shutdown_background();

    match raced {
        Ok(joined) => {
            joined?;
            Ok(())
        }
        Err(_) => Err(CallError::TimedOut(limit)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_lines_match_the_narration() {
        assert_eq!(
            Verdict::CancelledCorrectly.to_string(),
            "call was cancelled correctly"
        );
        assert_eq!(
            Verdict::NotCancelled.to_string(),
            "call wasn't cancelled correctly"
        );
    }
}
