//! Tracing of table builds and queries.
//!
//! A [`MatchTracer`] belongs to one table. While enabled it keeps a
//! [`TraceRecord`] for every rule appended, every query started, every rule
//! tested and the final verdict. When disabled the table skips building
//! events altogether. Each record carries the query it happened in and how
//! deeply that query was nested, so a recursive table reads as a call tree.

pub mod buffer;
pub mod record;

pub use buffer::TraceBuffer;
pub use record::{TraceEvent, TraceRecord};

use matchtable_foundation::Value;

// =============================================================================
// Tracer Configuration
// =============================================================================

/// What a tracer keeps.
#[derive(Clone, Debug)]
pub struct TracerConfig {
    /// Off by default.
    pub enabled: bool,
    /// Records kept before the oldest are dropped.
    pub buffer_size: usize,
    /// Event type names to keep; empty keeps everything.
    pub event_filter: Vec<String>,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            buffer_size: 10_000,
            event_filter: Vec::new(),
        }
    }
}

impl TracerConfig {
    /// Disabled, with the default buffer size and no filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Turns tracing on.
    #[must_use]
    pub fn enabled(mut self) -> Self {
        self.enabled = true;
        self
    }

    /// Sets how many records are kept.
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    /// Keeps only events whose type name is listed.
    #[must_use]
    pub fn filter_events(mut self, types: Vec<String>) -> Self {
        self.event_filter = types;
        self
    }

    /// Returns true if `event` passes the filter.
    #[must_use]
    pub fn keeps(&self, event: &TraceEvent) -> bool {
        let name = event.event_type();
        self.event_filter.is_empty() || self.event_filter.iter().any(|t| t == name)
    }
}

// =============================================================================
// Tracer
// =============================================================================

/// Records build and query events for one table.
#[derive(Clone, Debug)]
pub struct MatchTracer {
    config: TracerConfig,
    buffer: TraceBuffer,
    /// Number given to the next query; numbering starts at 1.
    next_query: u64,
    /// Queries currently running, innermost last.
    active: Vec<u64>,
}

impl MatchTracer {
    /// Creates a tracer from its configuration.
    #[must_use]
    pub fn new(config: TracerConfig) -> Self {
        Self {
            buffer: TraceBuffer::new(config.buffer_size),
            config,
            next_query: 1,
            active: Vec::new(),
        }
    }

    /// A tracer that records nothing until enabled.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(TracerConfig::default())
    }

    /// Returns true while events are being recorded.
    #[must_use]
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Starts recording.
    pub fn enable(&mut self) {
        self.config.enabled = true;
    }

    /// Stops recording. Records already kept stay in the buffer.
    pub fn disable(&mut self) {
        self.config.enabled = false;
    }

    /// Records `event` against the innermost running query (query 0 between
    /// queries).
    #[inline]
    pub fn record(&mut self, event: TraceEvent) {
        if self.config.enabled && self.config.keeps(&event) {
            let query = self.active.last().copied().unwrap_or(0);
            self.buffer.push(query, self.active.len(), event);
        }
    }

    /// Opens a new query, nested inside any query already running.
    pub fn begin_query(&mut self, inputs: &[Value]) {
        if !self.config.enabled {
            return;
        }
        self.active.push(self.next_query);
        self.next_query += 1;
        self.record(TraceEvent::QueryStarted {
            inputs: inputs.to_vec(),
        });
    }

    /// Closes the innermost query.
    pub fn end_query(&mut self) {
        self.active.pop();
    }

    /// The kept records.
    #[must_use]
    pub fn buffer(&self) -> &TraceBuffer {
        &self.buffer
    }

    /// Drops all kept records.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Renders the last `count` records, one per line.
    #[must_use]
    pub fn format_recent(&self, count: usize) -> String {
        let lines: Vec<String> = self
            .buffer
            .recent(count)
            .into_iter()
            .map(ToString::to_string)
            .collect();
        lines.join("\n")
    }
}

impl Default for MatchTracer {
    fn default() -> Self {
        Self::disabled()
    }
}
