//! Starvation property of the shared-context demo, with scaled-down timings:
//! while blocking calls hold every slot, the server handles nothing; once
//! they drain, its overdue tick fires almost immediately.

use std::time::Duration;

use blocking_pitfalls::shared_context::run_with;

#[test]
fn server_starves_while_blocking_calls_hold_every_slot() {
    let tick = Duration::from_millis(50);
    let block_for = Duration::from_millis(400);

    let report = run_with(3, 4, tick, 3, block_for).unwrap();

    assert!(
        report.handled.iter().any(|&at| at < report.blocked_from),
        "no requests handled during warm-up"
    );

    // Trim a tick off each end of the window to stay clear of the in-flight
    // tick at submission time and the resume racing the join at drain time.
    let window = (report.blocked_from + tick)..(report.blocked_until - tick);
    let starved_hits: Vec<_> = report
        .handled
        .iter()
        .copied()
        .filter(|at| window.contains(at))
        .collect();
    assert!(
        starved_hits.is_empty(),
        "requests handled during the blocked window: {:?}",
        starved_hits
    );

    assert!(
        report
            .handled
            .iter()
            .any(|&at| at >= window.end && at < report.blocked_until + tick * 2),
        "server did not resume after the blocking calls drained"
    );
}
