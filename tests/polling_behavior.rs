//! Behavior tests for the polling scheduler.
//!
//! All tests run under paused tokio time, so a 30-second cadence is verified
//! in microseconds and tick counts are exact.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use snapview_core::PollingScheduler;

const INTERVAL: Duration = Duration::from_millis(30_000);

/// Let spawned tasks run without letting paused time auto-advance.
async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

fn counting_scheduler() -> (PollingScheduler, Arc<AtomicU32>) {
    let count = Arc::new(AtomicU32::new(0));
    let seen = Arc::clone(&count);
    let scheduler = PollingScheduler::start(INTERVAL, move || {
        seen.fetch_add(1, Ordering::SeqCst);
    });
    (scheduler, count)
}

// =============================================================================
// Cadence
// =============================================================================

#[tokio::test(start_paused = true)]
async fn fires_once_immediately_and_then_once_per_interval() {
    // Given: a scheduler on a 30s cadence
    let (_scheduler, count) = counting_scheduler();

    // Then: exactly one immediate invocation
    settle().await;
    assert_eq!(count.load(Ordering::SeqCst), 1);

    // And: one more per elapsed interval, no bursts
    for expected in 2..=4 {
        tokio::time::advance(INTERVAL).await;
        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), expected);
    }
}

#[tokio::test(start_paused = true)]
async fn no_invocation_before_the_interval_elapses() {
    let (_scheduler, count) = counting_scheduler();
    settle().await;
    assert_eq!(count.load(Ordering::SeqCst), 1);

    tokio::time::advance(INTERVAL - Duration::from_millis(1)).await;
    settle().await;
    assert_eq!(count.load(Ordering::SeqCst), 1, "tick fired early");

    tokio::time::advance(Duration::from_millis(1)).await;
    settle().await;
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

// =============================================================================
// Stop
// =============================================================================

#[tokio::test(start_paused = true)]
async fn zero_invocations_after_stop() {
    let (mut scheduler, count) = counting_scheduler();
    settle().await;
    tokio::time::advance(INTERVAL).await;
    settle().await;
    assert_eq!(count.load(Ordering::SeqCst), 2);

    // When: the scheduler is stopped
    scheduler.stop();
    assert!(!scheduler.is_active());

    // Then: even long stretches of elapsed time fire nothing
    tokio::time::advance(INTERVAL * 10).await;
    settle().await;
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn ticks_scheduled_before_stop_never_fire_after_it() {
    let (mut scheduler, count) = counting_scheduler();
    settle().await;
    assert_eq!(count.load(Ordering::SeqCst), 1);

    // Given: the timer already has every future deadline registered.
    // When: stop lands between deadlines
    scheduler.stop();

    // Then: none of those pre-scheduled deadlines produce an invocation
    for _ in 0..5 {
        tokio::time::advance(INTERVAL).await;
        settle().await;
    }
    assert_eq!(count.load(Ordering::SeqCst), 1);
}
