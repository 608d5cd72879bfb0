//! Transient user-facing notifications.
//!
//! The store owns an insertion-ordered list of currently visible
//! notifications and broadcasts snapshots over a [`watch`] channel. UI code
//! only observes; all mutation goes through [`show`], [`remove`] and
//! [`clear`].
//!
//! Auto-expiry is a spawned timer per notification: `show` with a non-zero
//! duration schedules its own removal, `Duration::ZERO` means the
//! notification stays until dismissed.
//!
//! [`show`]: Notifications::show
//! [`remove`]: Notifications::remove
//! [`clear`]: Notifications::clear

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::sync::watch;
use uuid::Uuid;

/// Notification severity. Decides styling and the default display duration.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Kind {
    Info,
    Success,
    Error,
}

impl Kind {
    /// Default display duration: errors linger longer so the user can note
    /// the correlation id.
    pub fn default_duration(self) -> Duration {
        match self {
            Self::Info | Self::Success => Duration::from_millis(4000),
            Self::Error => Duration::from_millis(7000),
        }
    }
}

/// One visible notification. Observers receive clones; the store keeps the
/// only mutable copy.
#[derive(Clone, Debug)]
pub struct Notification {
    pub id: String,
    pub kind: Kind,
    pub message: String,
    pub correlation_id: Option<String>,
    /// Unix epoch milliseconds at creation.
    pub created_at: u64,
}

/// The notification store. Handles are cheap to clone and share one list.
#[derive(Clone)]
pub struct Notifications {
    inner: Arc<Inner>,
}

struct Inner {
    tx: watch::Sender<Vec<Notification>>,
}

impl Notifications {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Vec::new());
        Self { inner: Arc::new(Inner { tx }) }
    }

    /// A receiver over list snapshots. Yields the current list immediately,
    /// then on every change.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Notification>> {
        self.inner.tx.subscribe()
    }

    /// The currently visible notifications, in insertion order.
    pub fn current(&self) -> Vec<Notification> {
        self.inner.tx.borrow().clone()
    }

    /// Appends a notification and schedules its removal after `duration`.
    ///
    /// `Duration::ZERO` disables auto-expiry — the notification stays until
    /// [`remove`](Notifications::remove) or [`clear`](Notifications::clear).
    /// Returns the generated id.
    ///
    /// Requires a tokio runtime when `duration` is non-zero (the expiry timer
    /// is a spawned task).
    pub fn show(
        &self,
        message: impl Into<String>,
        kind: Kind,
        correlation_id: Option<String>,
        duration: Duration,
    ) -> String {
        let id = Uuid::new_v4().to_string();
        let notification = Notification {
            id: id.clone(),
            kind,
            message: message.into(),
            correlation_id,
            created_at: now_millis(),
        };
        self.inner.tx.send_modify(|list| list.push(notification));

        if !duration.is_zero() {
            let store = self.clone();
            let expired = id.clone();
            tokio::spawn(async move {
                tokio::time::sleep(duration).await;
                store.remove(&expired);
            });
        }
        id
    }

    /// An info notification with the default duration.
    pub fn info(&self, message: impl Into<String>) -> String {
        self.show(message, Kind::Info, None, Kind::Info.default_duration())
    }

    /// A success notification with the default duration.
    pub fn success(&self, message: impl Into<String>) -> String {
        self.show(message, Kind::Success, None, Kind::Success.default_duration())
    }

    /// An error notification, with the correlation id for supportability.
    pub fn error(&self, message: impl Into<String>, correlation_id: Option<String>) -> String {
        self.show(message, Kind::Error, correlation_id, Kind::Error.default_duration())
    }

    /// Removes a notification. Removing an unknown id is a no-op, so expiry
    /// timers and manual dismissal cannot race into an error.
    pub fn remove(&self, id: &str) {
        self.inner.tx.send_if_modified(|list| {
            let before = list.len();
            list.retain(|n| n.id != id);
            list.len() != before
        });
    }

    /// Drops every visible notification (e.g. on logout).
    pub fn clear(&self) {
        self.inner.tx.send_if_modified(|list| {
            let had_any = !list.is_empty();
            list.clear();
            had_any
        });
    }
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new()
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn auto_expiry_removes_after_duration() {
        let store = Notifications::new();
        store.show("saved", Kind::Success, None, Duration::from_millis(50));
        assert_eq!(store.current().len(), 1);

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(store.current().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn zero_duration_is_manual_dismiss_only() {
        let store = Notifications::new();
        let id = store.show("read me", Kind::Info, None, Duration::ZERO);

        tokio::time::sleep(Duration::from_secs(3600)).await;
        assert_eq!(store.current().len(), 1);

        store.remove(&id);
        assert!(store.current().is_empty());
    }

    #[tokio::test]
    async fn list_is_insertion_ordered() {
        let store = Notifications::new();
        store.show("first", Kind::Info, None, Duration::ZERO);
        store.show("second", Kind::Error, Some("cid-2".to_owned()), Duration::ZERO);
        store.show("third", Kind::Success, None, Duration::ZERO);

        let current = store.current();
        let messages: Vec<&str> = current.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, ["first", "second", "third"]);
        assert_eq!(current[1].correlation_id.as_deref(), Some("cid-2"));
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let store = Notifications::new();
        let id = store.show("once", Kind::Info, None, Duration::ZERO);
        store.remove(&id);
        store.remove(&id);
        store.remove("no-such-id");
        assert!(store.current().is_empty());
    }

    #[tokio::test]
    async fn clear_drops_everything() {
        let store = Notifications::new();
        store.info("a");
        store.success("b");
        store.error("c", None);
        assert_eq!(store.current().len(), 3);

        store.clear();
        assert!(store.current().is_empty());
    }

    #[tokio::test]
    async fn subscribers_see_changes() {
        let store = Notifications::new();
        let mut rx = store.subscribe();
        assert!(rx.borrow_and_update().is_empty());

        store.error("boom", Some("cid-1".to_owned()));
        assert!(rx.has_changed().unwrap());
        let list = rx.borrow_and_update().clone();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].kind, Kind::Error);
        assert_eq!(list[0].correlation_id.as_deref(), Some("cid-1"));
    }
}
