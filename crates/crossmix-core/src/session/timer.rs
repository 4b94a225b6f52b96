//! Cancellable delayed actions owned by a session
//!
//! UI feedback that reverts after a pause in activity (fader labels that
//! fade out, a search box that restores its last valid link) is modelled
//! as a [`RevertTimer`]: scheduling a new action cancels the pending one,
//! and dropping the timer cancels it too. Nothing is global.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

/// A single pending delayed action
///
/// Must be used from inside a tokio runtime; outside one, scheduling
/// logs a warning and drops the action.
#[derive(Debug, Default)]
pub struct RevertTimer {
    pending: Option<JoinHandle<()>>,
}

impl RevertTimer {
    /// Create an idle timer
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `action` after `delay`, replacing any pending action
    pub fn schedule<F>(&mut self, delay: Duration, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                self.pending = Some(runtime.spawn(async move {
                    tokio::time::sleep(delay).await;
                    action();
                }));
            }
            Err(e) => log::warn!("RevertTimer: no runtime available, dropping action: {}", e),
        }
    }

    /// Drop the pending action, if any
    pub fn cancel(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }

    /// Whether an action is scheduled and has not run yet
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for RevertTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Visibility of the fader percentage labels
///
/// Labels appear while the user touches a fader and disappear a short
/// while after they let go.
#[derive(Debug)]
pub struct LabelVisibility {
    visible: Arc<AtomicBool>,
    timer: RevertTimer,
    hide_delay: Duration,
}

impl LabelVisibility {
    /// Hidden labels that auto-hide after `hide_delay`
    pub fn new(hide_delay: Duration) -> Self {
        Self {
            visible: Arc::new(AtomicBool::new(false)),
            timer: RevertTimer::new(),
            hide_delay,
        }
    }

    /// Show labels now, cancelling a pending hide
    pub fn show(&mut self) {
        self.timer.cancel();
        self.visible.store(true, Ordering::Relaxed);
    }

    /// Hide labels once the delay elapses
    pub fn hide(&mut self) {
        let visible = Arc::clone(&self.visible);
        self.timer.schedule(self.hide_delay, move || {
            visible.store(false, Ordering::Relaxed);
        });
    }

    /// Whether labels are currently shown
    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[tokio::test(start_paused = true)]
    async fn test_action_runs_after_delay() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut timer = RevertTimer::new();

        let counter = Arc::clone(&hits);
        timer.schedule(Duration::from_millis(1000), move || {
            counter.fetch_add(1, Ordering::Relaxed);
        });
        assert!(timer.is_pending());

        tokio::time::sleep(Duration::from_millis(999)).await;
        assert_eq!(hits.load(Ordering::Relaxed), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(hits.load(Ordering::Relaxed), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reschedule_replaces_pending() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut timer = RevertTimer::new();

        for _ in 0..3 {
            let counter = Arc::clone(&hits);
            timer.schedule(Duration::from_millis(500), move || {
                counter.fetch_add(1, Ordering::Relaxed);
            });
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(hits.load(Ordering::Relaxed), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_action() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut timer = RevertTimer::new();

        let counter = Arc::clone(&hits);
        timer.schedule(Duration::from_millis(200), move || {
            counter.fetch_add(1, Ordering::Relaxed);
        });
        timer.cancel();

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(hits.load(Ordering::Relaxed), 0);
        assert!(!timer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_labels_hide_after_delay() {
        let mut labels = LabelVisibility::new(Duration::from_millis(1000));
        labels.show();
        assert!(labels.is_visible());

        labels.hide();
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(labels.is_visible());

        // Touching the fader again keeps the labels up
        labels.show();
        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert!(labels.is_visible());

        labels.hide();
        tokio::time::sleep(Duration::from_millis(1001)).await;
        assert!(!labels.is_visible());
    }
}
