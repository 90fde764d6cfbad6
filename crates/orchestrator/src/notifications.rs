//! Self-expiring toast queue.
//!
//! Every notification owns the abort handle of its expiry task. Dismissing a
//! notification aborts the task, and the task only holds a weak reference to
//! the queue, so it can never touch a queue that has been dropped.

use chrono::Utc;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;
use tokio::task::AbortHandle;
use tracing::{debug, warn};
use unchained_types::Notification;
use uuid::Uuid;

struct Entry {
    notification: Notification,
    expiry: Option<AbortHandle>,
}

#[derive(Default)]
struct Queue {
    entries: Mutex<Vec<Entry>>,
}

impl Queue {
    fn lock(&self) -> MutexGuard<'_, Vec<Entry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn take(&self, id: Uuid) -> Option<Entry> {
        let mut entries = self.lock();
        let pos = entries.iter().position(|e| e.notification.id == id)?;
        Some(entries.remove(pos))
    }
}

impl Drop for Queue {
    fn drop(&mut self) {
        let entries = self.entries.get_mut().unwrap_or_else(|poisoned| poisoned.into_inner());
        for entry in entries.drain(..) {
            if let Some(expiry) = entry.expiry {
                expiry.abort();
            }
        }
    }
}

/// Toast queue with per-entry expiry.
pub struct NotificationCenter {
    queue: Arc<Queue>,
    ttl: Duration,
}

impl NotificationCenter {
    pub fn new(ttl: Duration) -> Self {
        Self {
            queue: Arc::new(Queue::default()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Enqueue a toast and schedule its removal. Outside a Tokio runtime the
    /// toast stays until dismissed.
    pub fn show(&self, message: impl Into<String>, is_error: bool) -> Uuid {
        let notification = Notification {
            id: Uuid::new_v4(),
            message: message.into(),
            is_error,
            timestamp: Utc::now(),
        };
        let id = notification.id;

        let mut entries = self.queue.lock();
        let expiry = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let queue: Weak<Queue> = Arc::downgrade(&self.queue);
                let ttl = self.ttl;
                let task = runtime.spawn(async move {
                    tokio::time::sleep(ttl).await;
                    if let Some(queue) = queue.upgrade() {
                        if queue.take(id).is_some() {
                            debug!("Notification {} expired", id);
                        }
                    }
                });
                Some(task.abort_handle())
            }
            Err(_) => {
                warn!("No async runtime; notification {} will not expire", id);
                None
            }
        };
        entries.push(Entry { notification, expiry });
        id
    }

    /// Remove a toast. Unknown ids are ignored.
    pub fn remove(&self, id: Uuid) {
        if let Some(entry) = self.queue.take(id) {
            if let Some(expiry) = entry.expiry {
                expiry.abort();
            }
        }
    }

    /// Current toasts, oldest first.
    pub fn list(&self) -> Vec<Notification> {
        self.queue.lock().iter().map(|e| e.notification.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
