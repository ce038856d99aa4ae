//! Trace event and record types.

use std::fmt;

use matchtable_foundation::Value;

// =============================================================================
// Trace Event
// =============================================================================

/// Events recorded while building and querying a table.
#[derive(Clone, Debug)]
pub enum TraceEvent {
    /// A rule was appended.
    RuleAdded {
        /// Index of the new rule.
        rule: usize,
    },

    /// A query started.
    QueryStarted {
        /// The query inputs.
        inputs: Vec<Value>,
    },

    /// A rule's pattern was evaluated.
    RuleTested {
        /// Index of the rule.
        rule: usize,
        /// Whether the outcome was truthy.
        matched: bool,
    },

    /// A rule matched and its result is being produced.
    RuleMatched {
        /// Index of the rule.
        rule: usize,
        /// The match outcome.
        outcome: Value,
    },

    /// No rule matched the query.
    NoMatch,
}

impl TraceEvent {
    /// Returns a short name for the event type.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::RuleAdded { .. } => "rule-added",
            Self::QueryStarted { .. } => "query-started",
            Self::RuleTested { .. } => "rule-tested",
            Self::RuleMatched { .. } => "rule-matched",
            Self::NoMatch => "no-match",
        }
    }

    /// The rule this event concerns, if any.
    #[must_use]
    pub fn rule(&self) -> Option<usize> {
        match self {
            Self::RuleAdded { rule }
            | Self::RuleTested { rule, .. }
            | Self::RuleMatched { rule, .. } => Some(*rule),
            Self::QueryStarted { .. } | Self::NoMatch => None,
        }
    }

    /// Returns true if this event concerns a single rule.
    #[must_use]
    pub fn is_rule_event(&self) -> bool {
        self.rule().is_some()
    }
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RuleAdded { rule } => write!(f, "rule-added #{rule}"),
            Self::QueryStarted { inputs } => {
                write!(f, "query-started (")?;
                for (i, input) in inputs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{input:?}")?;
                }
                write!(f, ")")
            }
            Self::RuleTested { rule, matched } => {
                let verdict = if *matched { "match" } else { "miss" };
                write!(f, "rule-tested #{rule} {verdict}")
            }
            Self::RuleMatched { rule, outcome } => {
                write!(f, "rule-matched #{rule} outcome={outcome:?}")
            }
            Self::NoMatch => write!(f, "no-match"),
        }
    }
}

// =============================================================================
// Trace Record
// =============================================================================

/// A numbered trace record.
#[derive(Clone, Debug)]
pub struct TraceRecord {
    /// Unique record ID within the tracer.
    pub id: u64,
    /// The query this event belongs to (0 outside any query).
    pub query: u64,
    /// Query nesting depth; greater than one for re-entrant queries.
    pub depth: usize,
    /// The trace event.
    pub event: TraceEvent,
}

impl TraceRecord {
    /// Creates a new trace record.
    #[must_use]
    pub fn new(id: u64, query: u64, depth: usize, event: TraceEvent) -> Self {
        Self {
            id,
            query,
            depth,
            event,
        }
    }

    /// Returns the event type name.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        self.event.event_type()
    }
}

impl fmt::Display for TraceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indent = "  ".repeat(self.depth.saturating_sub(1));
        write!(
            f,
            "Q{:04} [{:06}] {indent}{}",
            self.query, self.id, self.event
        )
    }
}

// =============================================================================
// Tests
// =============================================================================
