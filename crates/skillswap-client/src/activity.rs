// crates/skillswap-client/src/activity.rs
//
// Bounded, most-recent-first trace of user-initiated operations.
// Lives for one session only; nothing here is persisted.

use std::collections::VecDeque;

use chrono::Local;
use serde::Serialize;

/// One line of the activity log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityEntry {
    /// Local wall-clock time, `HH:MM:SS`.
    pub timestamp: String,
    pub text: String,
}

/// Activity log retaining at most `capacity` entries.
#[derive(Debug, Clone)]
pub struct ActivityLog {
    entries: VecDeque<ActivityEntry>,
    capacity: usize,
}

impl ActivityLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Prepend a timestamped entry, evicting the oldest beyond capacity.
    pub fn record(&mut self, text: impl Into<String>) -> ActivityEntry {
        let entry = ActivityEntry {
            timestamp: Local::now().format("%H:%M:%S").to_string(),
            text: text.into(),
        };
        self.entries.push_front(entry.clone());
        self.entries.truncate(self.capacity);
        entry
    }

    /// Entries, most recent first.
    pub fn entries(&self) -> Vec<ActivityEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new(10)
    }
}
