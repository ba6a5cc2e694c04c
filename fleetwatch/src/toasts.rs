//! Tracks which notifications a display surface has already shown, so a
//! re-render never pops the same toast twice. Kept apart from the log's own
//! dedup: the log may evict an id that the surface still remembers.

use std::collections::{HashSet, VecDeque};

use crate::notifications::NotificationLog;
use crate::types::Notification;

const REMEMBERED_IDS: usize = 512;

#[derive(Debug, Default)]
pub struct PresentedIds {
    seen: HashSet<u64>,
    order: VecDeque<u64>,
}

impl PresentedIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_presented(&self, id: u64) -> bool {
        self.seen.contains(&id)
    }

    /// Entries of `log` not shown before, oldest first. They are marked as shown.
    pub fn take_unpresented(&mut self, log: &NotificationLog) -> Vec<Notification> {
        let fresh: Vec<Notification> = log
            .iter()
            .rev()
            .filter(|n| !self.seen.contains(&n.id))
            .cloned()
            .collect();
        for n in &fresh {
            self.mark(n.id);
        }
        fresh
    }

    fn mark(&mut self, id: u64) {
        if !self.seen.insert(id) {
            return;
        }
        self.order.push_back(id);
        if self.order.len() > REMEMBERED_IDS {
            if let Some(old) = self.order.pop_front() {
                self.seen.remove(&old);
            }
        }
    }
}
