//! Global loading coordination.
//!
//! One process-wide question: "is at least one request in flight right now?"
//! The answer is a pending-request counter behind a [`watch`] channel, so any
//! number of observers (a spinner, a status bar, a log line) can follow the
//! single boolean without polling. `watch` replays the current value to late
//! subscribers, which is exactly the semantics a loading indicator wants.
//!
//! Emissions are edge-triggered: starting three requests and stopping three
//! requests produces one `true` and one `false`, not three of each.

use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tracing::debug;

/// Shared pending-request counter with an edge-triggered boolean stream.
///
/// Handles are cheap to clone; all clones share one counter. Every call site
/// must pair each `start()` with exactly one `stop()` — [`begin`] returns a
/// guard that makes the pairing automatic on every exit path, including
/// cancellation.
///
/// [`begin`]: LoadingTracker::begin
#[derive(Clone)]
pub struct LoadingTracker {
    inner: Arc<Inner>,
}

struct Inner {
    pending: Mutex<usize>,
    tx: watch::Sender<bool>,
}

impl LoadingTracker {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { inner: Arc::new(Inner { pending: Mutex::new(0), tx }) }
    }

    /// A receiver over the loading stream. Yields the current value
    /// immediately, then every edge transition.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.inner.tx.subscribe()
    }

    pub fn pending(&self) -> usize {
        *self.inner.pending.lock().expect("loading counter poisoned")
    }

    pub fn is_loading(&self) -> bool {
        *self.inner.tx.borrow()
    }

    /// Marks one request as started. Emits `true` on the 0→1 transition.
    pub fn start(&self) {
        let mut pending = self.inner.pending.lock().expect("loading counter poisoned");
        *pending += 1;
        if *pending == 1 {
            debug!("loading on");
            let _ = self.inner.tx.send(true);
        }
    }

    /// Marks one request as settled. Emits `false` on the 1→0 transition.
    /// Calling with the counter already at zero is a no-op.
    pub fn stop(&self) {
        let mut pending = self.inner.pending.lock().expect("loading counter poisoned");
        if *pending == 0 {
            return;
        }
        *pending -= 1;
        if *pending == 0 {
            debug!("loading off");
            let _ = self.inner.tx.send(false);
        }
    }

    /// Forces the counter to zero and emits `false` unconditionally.
    ///
    /// Escape hatch for stuck state, e.g. navigation teardown aborting
    /// requests whose settlement never ran.
    pub fn reset(&self) {
        let mut pending = self.inner.pending.lock().expect("loading counter poisoned");
        *pending = 0;
        let _ = self.inner.tx.send(false);
    }

    /// `start()` now, `stop()` when the returned guard drops.
    ///
    /// The guard releases on success, on error, and when the in-flight future
    /// is dropped by cancellation — one `stop()` per `start()`, always.
    pub fn begin(&self) -> LoadingGuard {
        self.start();
        LoadingGuard { tracker: self.clone() }
    }
}

impl Default for LoadingTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII handle pairing one `start()` with exactly one `stop()`.
pub struct LoadingGuard {
    tracker: LoadingTracker,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.tracker.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_never_goes_negative() {
        let tracker = LoadingTracker::new();
        tracker.stop();
        tracker.stop();
        assert_eq!(tracker.pending(), 0);
        assert!(!tracker.is_loading());

        tracker.start();
        tracker.stop();
        tracker.stop(); // extra stop is a no-op
        assert_eq!(tracker.pending(), 0);
    }

    #[test]
    fn emissions_are_edge_triggered() {
        let tracker = LoadingTracker::new();
        let mut rx = tracker.subscribe();
        assert!(!*rx.borrow_and_update());

        tracker.start();
        assert!(rx.has_changed().unwrap());
        assert!(*rx.borrow_and_update());

        // two more starts: no new emission
        tracker.start();
        tracker.start();
        assert!(!rx.has_changed().unwrap());

        // stopping down to one: still no emission
        tracker.stop();
        tracker.stop();
        assert!(!rx.has_changed().unwrap());

        // last stop: exactly one `false`
        tracker.stop();
        assert!(rx.has_changed().unwrap());
        assert!(!*rx.borrow_and_update());
    }

    #[test]
    fn reset_clears_pending_and_emits_unconditionally() {
        let tracker = LoadingTracker::new();
        tracker.start();
        tracker.start();

        let mut rx = tracker.subscribe();
        rx.borrow_and_update();

        tracker.reset();
        assert_eq!(tracker.pending(), 0);
        assert!(rx.has_changed().unwrap());
        assert!(!*rx.borrow_and_update());

        // resetting an already-idle tracker still emits
        tracker.reset();
        assert!(rx.has_changed().unwrap());
    }

    #[test]
    fn guard_releases_on_drop() {
        let tracker = LoadingTracker::new();
        {
            let _a = tracker.begin();
            let _b = tracker.begin();
            assert_eq!(tracker.pending(), 2);
            assert!(tracker.is_loading());
        }
        assert_eq!(tracker.pending(), 0);
        assert!(!tracker.is_loading());
    }

    #[test]
    fn clones_share_one_counter() {
        let tracker = LoadingTracker::new();
        let other = tracker.clone();
        tracker.start();
        assert_eq!(other.pending(), 1);
        other.stop();
        assert_eq!(tracker.pending(), 0);
    }
}
