//! Timeout Demo
//!
//! Three variants of a slow call under a timeout, run back to back:
//!
//! 1. bad: a blocking call under a cooperative timeout. The caller's timeout
//!    fires on schedule, but the call has no suspension point, so nothing
//!    actually stops: the worker stays occupied and the guarded side effect
//!    runs anyway.
//! 2. good (blocking): the same call through
//!    [`wait::blocking_call_with_timeout`], which lets the caller abandon the
//!    worker instead of waiting it out.
//! 3. good (suspending): a suspension-aware call under the same cooperative
//!    timeout. The timeout drops the future at its suspension point and the
//!    side effect never happens.

use std::time::{Duration, Instant};

use anyhow::Context as _;
use tokio::runtime;
use tokio::sync::oneshot;
use tokio::time;

use crate::wait::{
    blocking_call_with_timeout, blocking_wait, suspending_wait, CallError, Verdict,
};

const WORK: Duration = Duration::from_millis(1000);
const LIMIT: Duration = Duration::from_millis(100);
const PAUSE: Duration = Duration::from_millis(500);

pub fn run() -> anyhow::Result<()> {
    // Two workers: the second keeps the timer driven while the first is
    // occupied by the bad case's blocking call.
    let pool = runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_time()
        .thread_name("timeout-demo")
        .build()
        .context("worker pool setup failed")?;

    pool.block_on(async {
        println!("Each call waits {:?} under a {:?} timeout", WORK, LIMIT);
        println!();

        println!("--- bad case: blocking call under a cooperative timeout ---");
        let step = Instant::now();
        let verdict = bad_blocking_case(WORK, LIMIT).await;
        println!("{}, step took {:?}", verdict, step.elapsed());
        suspending_wait(PAUSE).await;
        println!();

        println!("--- good case: blocking call with its own timeout ---");
        let step = Instant::now();
        let verdict = good_blocking_case(WORK, LIMIT).await?;
        println!("{}, step took {:?}", verdict, step.elapsed());
        suspending_wait(PAUSE).await;
        println!();

        println!("--- good case: suspending call under a cooperative timeout ---");
        let step = Instant::now();
        let verdict = good_suspending_case(WORK, LIMIT).await;
        println!("{}, step took {:?}", verdict, step.elapsed());

        Ok(())
    })
}

/// A blocking call under a cooperative timeout.
///
/// The timeout only stops the *caller* from waiting. The spawned call holds
/// its worker for the full duration, the abort sent after the timeout has no
/// suspension point to land on, and the guarded side effect runs anyway.
pub async fn bad_blocking_case(work: Duration, limit: Duration) -> Verdict {
    let started = Instant::now();
    let (guard, observed) = oneshot::channel();

    let call = tokio::spawn(async move {
        println!(
            "[{:>7.3}s] blocking call started",
            started.elapsed().as_secs_f64()
        );
        blocking_wait(work);
        // The side effect the timeout was supposed to prevent.
        let _ = guard.send(());
        println!(
            "[{:>7.3}s] blocking call finished",
            started.elapsed().as_secs_f64()
        );
    });
    let cancel = call.abort_handle();

    match time::timeout(limit, call).await {
        Ok(_) => println!(
            "[{:>7.3}s] completed before the timeout",
            started.elapsed().as_secs_f64()
        ),
        Err(_) => {
            println!(
                "[{:>7.3}s] caller timed out, sending cancel",
                started.elapsed().as_secs_f64()
            );
            cancel.abort();
        }
    }

    verdict(observed).await
}

/// The same blocking call, through the primitive that gives the caller its
/// own way out. The work still is not stopped (the pool under it is
/// abandoned), but the caller unblocks on time.
pub async fn good_blocking_case(work: Duration, limit: Duration) -> Result<Verdict, CallError> {
    let started = Instant::now();
    println!(
        "[{:>7.3}s] blocking call started on a disposable worker",
        started.elapsed().as_secs_f64()
    );

    match blocking_call_with_timeout(work, limit).await {
        Ok(()) => {
            println!(
                "[{:>7.3}s] completed before the timeout",
                started.elapsed().as_secs_f64()
            );
            Ok(Verdict::NotCancelled)
        }
        Err(CallError::TimedOut(_)) => {
            println!(
                "[{:>7.3}s] caller timed out, worker abandoned",
                started.elapsed().as_secs_f64()
            );
            Ok(Verdict::CancelledCorrectly)
        }
        Err(err) => Err(err),
    }
}

/// A suspension-aware call under a cooperative timeout. The wait is a
/// suspension point, so the timeout drops the future right there and the
/// guarded side effect never runs.
pub async fn good_suspending_case(work: Duration, limit: Duration) -> Verdict {
    let started = Instant::now();
    let (guard, observed) = oneshot::channel();

    let call = async move {
        println!(
            "[{:>7.3}s] suspending call started",
            started.elapsed().as_secs_f64()
        );
        suspending_wait(work).await;
        let _ = guard.send(());
        println!(
            "[{:>7.3}s] suspending call finished",
            started.elapsed().as_secs_f64()
        );
    };

    match time::timeout(limit, call).await {
        Ok(()) => println!(
            "[{:>7.3}s] completed before the timeout",
            started.elapsed().as_secs_f64()
        ),
        Err(_) => println!(
            "[{:>7.3}s] caller timed out, call unwound",
            started.elapsed().as_secs_f64()
        ),
    }

    verdict(observed).await
}

/// Classifies a guarded call by the fate of its side-effect signal: a value
/// means the side effect ran; a dropped sender means the call unwound first.
async fn verdict(observed: oneshot::Receiver<()>) -> Verdict {
    match observed.await {
        Ok(()) => Verdict::NotCancelled,
        Err(_) => Verdict::CancelledCorrectly,
    }
}
