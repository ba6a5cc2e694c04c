//! Bounded, id-deduplicated notification log, newest first.

use std::collections::VecDeque;

use crate::types::Notification;

pub const NOTIFICATION_CAPACITY: usize = 50;

/// Prepend-only log. Order is arrival order, not `timestamp_ms`.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationLog {
    entries: VecDeque<Notification>,
    cap: usize,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::with_capacity(NOTIFICATION_CAPACITY)
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(cap),
            cap: cap.max(1),
        }
    }

    /// Insert at the front unless the id is already present. Returns whether it was inserted.
    pub fn append(&mut self, n: Notification) -> bool {
        if self.entries.iter().any(|e| e.id == n.id) {
            return false;
        }
        self.entries.push_front(n);
        self.entries.truncate(self.cap);
        true
    }

    pub fn get(&self, id: u64) -> Option<&Notification> {
        self.entries.iter().find(|e| e.id == id)
    }

    // Most recently appended first
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Notification> + '_ {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }
}

impl Default for NotificationLog {
    fn default() -> Self {
        Self::new()
    }
}
