//! Fixed-cadence polling.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Repeats a callback at a fixed interval while active.
///
/// The callback fires once immediately on `start` and then once per interval.
/// Ticks never stack: if the work a tick triggered is still in flight when
/// the next tick fires, the tick fires anyway and supersession downstream
/// sorts out which result wins. A delayed tick pushes the following one back
/// rather than bursting to catch up.
///
/// `stop` is idempotent and guarantees no invocation after it returns; the
/// scheduler also stops on drop, so teardown cannot leave a timer writing
/// into destroyed state.
#[derive(Debug)]
pub struct PollingScheduler {
    active: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl PollingScheduler {
    /// Start polling. Must be called within a tokio runtime; `interval`
    /// must be non-zero.
    pub fn start<F>(interval: Duration, mut tick: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let active = Arc::new(AtomicBool::new(true));
        let armed = Arc::clone(&active);
        let handle = tokio::spawn(async move {
            let mut timer = tokio::time::interval(interval);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                timer.tick().await;
                // A tick that raced with stop() must not fire.
                if !armed.load(Ordering::SeqCst) {
                    break;
                }
                tick();
            }
        });

        Self {
            active,
            handle: Some(handle),
        }
    }

    pub fn stop(&mut self) {
        self.active.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for PollingScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn stop_is_idempotent() {
        let count = Arc::new(AtomicU32::new(0));
        let seen = Arc::clone(&count);
        let mut scheduler = PollingScheduler::start(Duration::from_secs(30), move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        settle().await;
        assert!(scheduler.is_active());

        scheduler.stop();
        scheduler.stop();
        assert!(!scheduler.is_active());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_scheduler_stops_ticking() {
        let count = Arc::new(AtomicU32::new(0));
        let seen = Arc::clone(&count);
        let scheduler = PollingScheduler::start(Duration::from_secs(30), move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        settle().await;
        drop(scheduler);

        tokio::time::advance(Duration::from_secs(120)).await;
        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
