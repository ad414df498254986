//! Timing and classification properties of the timeout scenarios, with
//! scaled-down durations. Tolerances are deliberately loose: a correctly
//! cancelled caller still comes back long before the work duration.

use std::time::{Duration, Instant};

use blocking_pitfalls::timeout::{bad_blocking_case, good_blocking_case, good_suspending_case};
use blocking_pitfalls::wait::{blocking_call_with_timeout, CallError, Verdict};

const WORK: Duration = Duration::from_millis(600);
const LIMIT: Duration = Duration::from_millis(60);
const SLACK: Duration = Duration::from_millis(250);

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn bad_case_side_effect_survives_the_timeout() {
    let started = Instant::now();
    let verdict = bad_blocking_case(WORK, LIMIT).await;

    assert_eq!(verdict, Verdict::NotCancelled);
    // The classification only resolves once the blocking call runs its
    // course, long after the caller's timeout fired.
    assert!(started.elapsed() >= WORK);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn good_blocking_case_unblocks_the_caller_on_time() {
    let started = Instant::now();
    let verdict = good_blocking_case(WORK, LIMIT).await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(verdict, Verdict::CancelledCorrectly);
    assert!(elapsed >= LIMIT);
    assert!(
        elapsed < LIMIT + SLACK,
        "caller kept waiting past the timeout: {:?}",
        elapsed
    );
    assert!(elapsed < WORK);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn blocking_call_with_timeout_signals_timed_out() {
    match blocking_call_with_timeout(WORK, LIMIT).await {
        Err(CallError::TimedOut(limit)) => assert_eq!(limit, LIMIT),
        other => panic!("expected TimedOut, got {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn blocking_call_with_timeout_completes_under_a_generous_limit() {
    blocking_call_with_timeout(Duration::from_millis(20), Duration::from_secs(5))
        .await
        .unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn good_suspending_case_unwinds_before_the_side_effect() {
    let started = Instant::now();
    let verdict = good_suspending_case(WORK, LIMIT).await;
    let elapsed = started.elapsed();

    assert_eq!(verdict, Verdict::CancelledCorrectly);
    assert!(elapsed >= LIMIT);
    assert!(
        elapsed < LIMIT + SLACK,
        "caller kept waiting past the timeout: {:?}",
        elapsed
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn verdicts_do_not_depend_on_execution_history() {
    for _ in 0..3 {
        assert_eq!(bad_blocking_case(WORK, LIMIT).await, Verdict::NotCancelled);
        assert_eq!(
            good_blocking_case(WORK, LIMIT).await.unwrap(),
            Verdict::CancelledCorrectly
        );
        assert_eq!(
            good_suspending_case(WORK, LIMIT).await,
            Verdict::CancelledCorrectly
        );
    }
}
