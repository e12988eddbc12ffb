use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::task::AbortHandle;

use crate::clock::Clock;
use crate::error::EngineError;

/// Schedules one-shot callbacks at absolute wall-clock times.
///
/// Each scheduled callback runs on its own tokio task, so callbacks for
/// different handles may run concurrently with each other and with signal
/// or query calls; the owning instance serializes its own state. Must be
/// used from within a tokio runtime.
pub struct TimerScheduler {
    clock: Arc<dyn Clock>,
}

impl TimerScheduler {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Schedule `callback` to run once, on or after `at`.
    ///
    /// A target that is not strictly in the future fails with
    /// [`EngineError::InvalidSchedule`] instead of silently never firing;
    /// the caller decides whether to fall back to the reconciliation scan.
    pub fn schedule<F>(&self, at: DateTime<Utc>, callback: F) -> Result<TimerHandle, EngineError>
    where
        F: FnOnce() + Send + 'static,
    {
        let now = self.clock.now();
        if at <= now {
            return Err(EngineError::InvalidSchedule { at, now });
        }

        let delay = (at - now).to_std().unwrap_or_default();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            callback();
        });

        Ok(TimerHandle {
            task: task.abort_handle(),
        })
    }
}

/// Handle to a scheduled callback.
///
/// Cancelling is idempotent: cancelling an already-fired or
/// already-cancelled timer is a no-op. Dropping the handle cancels the
/// timer, which gives the owning instance automatic cleanup on disposal.
#[derive(Debug)]
pub struct TimerHandle {
    task: AbortHandle,
}

impl TimerHandle {
    pub fn cancel(&self) {
        self.task.abort();
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn scheduler() -> TimerScheduler {
        TimerScheduler::new(Arc::new(crate::clock::SystemClock))
    }

    #[tokio::test]
    async fn fires_once_after_target_time() {
        let sched = scheduler();
        let fired = Arc::new(AtomicUsize::new(0));

        let f = fired.clone();
        let at = Utc::now() + chrono::Duration::milliseconds(30);
        let _handle = sched
            .schedule(at, move || {
                f.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn rejects_past_target() {
        let sched = scheduler();
        let at = Utc::now() - chrono::Duration::seconds(1);
        let result = sched.schedule(at, || {});
        assert!(matches!(
            result,
            Err(EngineError::InvalidSchedule { .. })
        ));
    }

    #[tokio::test]
    async fn cancel_prevents_firing() {
        let sched = scheduler();
        let fired = Arc::new(AtomicUsize::new(0));

        let f = fired.clone();
        let at = Utc::now() + chrono::Duration::milliseconds(80);
        let handle = sched
            .schedule(at, move || {
                f.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        handle.cancel();
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn cancel_is_idempotent() {
        let sched = scheduler();
        let fired = Arc::new(AtomicUsize::new(0));

        let f = fired.clone();
        let at = Utc::now() + chrono::Duration::milliseconds(20);
        let handle = sched
            .schedule(at, move || {
                f.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        // Cancelling after the callback has run changes nothing.
        handle.cancel();
        handle.cancel();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn dropping_the_handle_cancels() {
        let sched = scheduler();
        let fired = Arc::new(AtomicUsize::new(0));

        let f = fired.clone();
        let at = Utc::now() + chrono::Duration::milliseconds(80);
        drop(
            sched
                .schedule(at, move || {
                    f.fetch_add(1, Ordering::SeqCst);
                })
                .unwrap(),
        );

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn independent_timers_fire_independently() {
        let sched = scheduler();
        let fired = Arc::new(AtomicUsize::new(0));

        let f1 = fired.clone();
        let f2 = fired.clone();
        let now = Utc::now();
        let h1 = sched
            .schedule(now + chrono::Duration::milliseconds(20), move || {
                f1.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        let h2 = sched
            .schedule(now + chrono::Duration::milliseconds(40), move || {
                f2.fetch_add(10, Ordering::SeqCst);
            })
            .unwrap();

        h1.cancel();
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 10);
        drop(h2);
    }
}
