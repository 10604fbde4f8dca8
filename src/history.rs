// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Matrix Workbench - Change Log

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::types::{ChangeAction, ChangeEvent};

/// Default number of retained events.
pub const HISTORY_CAPACITY: usize = 50;

/// Bounded, append-only audit trail.
///
/// Ids start at 1 and keep increasing across evictions; an evicted id is
/// never handed out again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeLog {
    entries: VecDeque<ChangeEvent>,
    capacity: usize,
    next_id: u64,
}

impl Default for ChangeLog {
    fn default() -> Self {
        Self::new(HISTORY_CAPACITY)
    }
}

impl ChangeLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
            next_id: 1,
        }
    }

    /// Record an event stamped `timestamp` and return a reference to it.
    pub fn append(
        &mut self,
        action: ChangeAction,
        details: serde_json::Value,
        timestamp: u64,
    ) -> &ChangeEvent {
        let event = ChangeEvent {
            id: self.next_id,
            timestamp,
            action,
            details,
        };
        self.next_id += 1;
        self.entries.push_back(event);
        if self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        // Just pushed, never empty here.
        &self.entries[self.entries.len() - 1]
    }

    /// Newest-first view of the last `n` events.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &ChangeEvent> {
        self.entries.iter().rev().take(n)
    }

    /// Oldest-first view of every retained event.
    pub fn iter(&self) -> impl Iterator<Item = &ChangeEvent> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
