use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationLevel {
    Warning,
    Error,
}

/// User-visible message produced when an engine call fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub at: DateTime<Utc>,
}

/// Bounded FIFO of notifications waiting for the UI to display them.
///
/// When full, the oldest entry is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationQueue {
    items: VecDeque<Notification>,
    capacity: usize,
}

impl NotificationQueue {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, level: NotificationLevel, message: impl Into<String>) {
        if self.items.len() == self.capacity {
            self.items.pop_front();
        }
        self.items.push_back(Notification {
            level,
            message: message.into(),
            at: Utc::now(),
        });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn latest(&self) -> Option<&Notification> {
        self.items.back()
    }

    pub fn drain(&mut self) -> Vec<Notification> {
        self.items.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{NotificationLevel, NotificationQueue};

    #[test]
    fn full_queue_drops_oldest() {
        let mut queue = NotificationQueue::new(2);
        queue.push(NotificationLevel::Warning, "one");
        queue.push(NotificationLevel::Warning, "two");
        queue.push(NotificationLevel::Error, "three");

        let drained = queue.drain();
        let messages: Vec<&str> = drained.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec!["two", "three"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn zero_capacity_still_holds_latest() {
        let mut queue = NotificationQueue::new(0);
        queue.push(NotificationLevel::Error, "a");
        queue.push(NotificationLevel::Error, "b");
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.latest().map(|n| n.message.as_str()), Some("b"));
    }
}
