//! Error types for match tables.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

use crate::types::Type;

/// The main error type for match table operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Records the rule index in this error's context, keeping any position
    /// already recorded.
    #[must_use]
    pub fn in_rule(mut self, rule: usize) -> Self {
        self.context = Some(self.context.take().unwrap_or_default().with_rule(rule));
        self
    }

    /// Creates an invalid table arity error.
    #[must_use]
    pub fn invalid_arity(arity: usize) -> Self {
        Self::new(ErrorKind::InvalidArity(arity))
    }

    /// Creates a builder state error.
    #[must_use]
    pub fn builder_state(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BuilderState(message.into()))
    }

    /// Creates a pattern size error.
    #[must_use]
    pub fn pattern_size(expected: usize, actual: usize) -> Self {
        Self::new(ErrorKind::PatternSize { expected, actual })
    }

    /// Creates an invalid result shape error.
    #[must_use]
    pub fn invalid_result_shape(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidResultShape(message.into()))
    }

    /// Creates an unsupported range error for a range carrying `step`.
    #[must_use]
    pub fn unsupported_range(step: impl fmt::Display) -> Self {
        Self::new(ErrorKind::UnsupportedRange(step.to_string()))
    }

    /// Creates an arity mismatch error for a query.
    #[must_use]
    pub fn arity_mismatch(expected: usize, actual: usize) -> Self {
        Self::new(ErrorKind::ArityMismatch { expected, actual })
    }

    /// Creates a no-match error.
    #[must_use]
    pub fn no_match(inputs: impl Into<String>) -> Self {
        Self::new(ErrorKind::NoMatch(inputs.into()))
    }

    /// Creates an incomparable-values error.
    #[must_use]
    pub fn incomparable(left: Type, right: Type) -> Self {
        Self::new(ErrorKind::Incomparable { left, right })
    }

    /// Creates an error carrying a caller-defined message.
    ///
    /// This is what predicates, computed results and transforms return when
    /// they fail; the engine passes it through untouched.
    #[must_use]
    pub fn custom(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Custom(message.into()))
    }
}

/// Categorized error kinds.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Table constructed with an arity below one.
    #[error("invalid arity {0}: must be a positive integer")]
    InvalidArity(usize),

    /// Builder operation invalid in the current state.
    #[error("builder state: {0}")]
    BuilderState(String),

    /// Pattern shape does not match the table arity.
    #[error("pattern has incorrect size: expected {expected}, got {actual}")]
    PatternSize {
        /// The table arity.
        expected: usize,
        /// Number of positions in the supplied pattern.
        actual: usize,
    },

    /// Rule closed without any result value.
    #[error("no result given")]
    EmptyResult,

    /// Result values that are neither a single value nor a valid
    /// match-outcome pairing.
    #[error("invalid result shape: {0}")]
    InvalidResultShape(String),

    /// Range pattern carrying a step.
    #[error("a range pattern with a step ({0}) has no meaning")]
    UnsupportedRange(String),

    /// Query called with the wrong number of values.
    #[error("arity mismatch: expected {expected} values, got {actual}")]
    ArityMismatch {
        /// The table arity.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },

    /// No rule matched the inputs.
    #[error("no matching pattern found for {0}")]
    NoMatch(String),

    /// Attempt to turn the match-outcome marker into a value.
    #[error("the match-outcome marker cannot be instantiated as a value")]
    Uninstantiable,

    /// Range bound and input value cannot be ordered against each other.
    #[error("cannot compare {left} with {right}")]
    Incomparable {
        /// Type of the left-hand operand.
        left: Type,
        /// Type of the right-hand operand.
        right: Type,
    },

    /// Error raised by a caller-supplied callable.
    #[error("{0}")]
    Custom(String),
}

/// Context about where an evaluation error occurred.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Index of the rule being evaluated.
    pub rule: Option<usize>,
    /// Input position being tested.
    pub position: Option<usize>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the rule index.
    #[must_use]
    pub fn with_rule(mut self, rule: usize) -> Self {
        self.rule = Some(rule);
        self
    }

    /// Sets the input position.
    #[must_use]
    pub fn with_position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.rule, self.position) {
            (Some(rule), Some(position)) => write!(f, "in rule {rule}, position {position}"),
            (Some(rule), None) => write!(f, "in rule {rule}"),
            (None, Some(position)) => write!(f, "at position {position}"),
            (None, None) => Ok(()),
        }
    }
}
