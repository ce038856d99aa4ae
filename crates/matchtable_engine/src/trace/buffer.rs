//! Bounded storage for trace records.

use std::collections::VecDeque;

use super::record::{TraceEvent, TraceRecord};

// =============================================================================
// Trace Buffer
// =============================================================================

/// Keeps the newest `capacity` trace records, dropping from the front.
#[derive(Clone, Debug)]
pub struct TraceBuffer {
    records: VecDeque<TraceRecord>,
    capacity: usize,
    /// Id handed to the next pushed record; never reused.
    next: u64,
}

impl TraceBuffer {
    /// Creates an empty buffer holding at most `capacity` records.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
            next: 0,
        }
    }

    /// Appends an event and returns the id given to its record.
    pub fn push(&mut self, query: u64, depth: usize, event: TraceEvent) -> u64 {
        let id = self.next;
        self.next += 1;

        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        if self.capacity > 0 {
            self.records.push_back(TraceRecord::new(id, query, depth, event));
        }
        id
    }

    /// Number of records held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no record is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drops every record. Ids keep counting up.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Records from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &TraceRecord> {
        self.records.iter()
    }

    /// Records belonging to one query.
    #[must_use]
    pub fn records_for_query(&self, query: u64) -> Vec<&TraceRecord> {
        self.select(|r| r.query == query)
    }

    /// Records that mention rule `rule`.
    #[must_use]
    pub fn records_for_rule(&self, rule: usize) -> Vec<&TraceRecord> {
        self.select(|r| r.event.rule() == Some(rule))
    }

    /// The last `count` records, oldest first.
    #[must_use]
    pub fn recent(&self, count: usize) -> Vec<&TraceRecord> {
        let skip = self.records.len().saturating_sub(count);
        self.records.iter().skip(skip).collect()
    }

    /// Records whose event has the given type name (e.g. `"rule-matched"`).
    #[must_use]
    pub fn by_event_type(&self, event_type: &str) -> Vec<&TraceRecord> {
        self.select(|r| r.event_type() == event_type)
    }

    fn select(&self, keep: impl Fn(&TraceRecord) -> bool) -> Vec<&TraceRecord> {
        self.records.iter().filter(|r| keep(r)).collect()
    }
}

impl Default for TraceBuffer {
    fn default() -> Self {
        Self::new(10_000)
    }
}
