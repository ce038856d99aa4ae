//! Configuration for match tables.

use matchtable_foundation::{Error, Result};

use crate::trace::TracerConfig;

/// Configuration fixed when a table is constructed.
#[derive(Clone, Debug)]
pub struct TableConfig {
    /// Number of values every query supplies. Must be at least one.
    pub arity: usize,
    /// Whether callable patterns are predicates (otherwise identity literals).
    pub predicate_patterns: bool,
    /// Whether callable results are invoked with the inputs (otherwise
    /// returned as values).
    pub callable_results: bool,
    /// Tracing of builds and queries.
    pub trace: TracerConfig,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            arity: 1,
            predicate_patterns: true,
            callable_results: true,
            trace: TracerConfig::default(),
        }
    }
}

impl TableConfig {
    /// Creates a default configuration with the given arity.
    #[must_use]
    pub fn new(arity: usize) -> Self {
        Self {
            arity,
            ..Self::default()
        }
    }

    /// Builder method to set the arity.
    #[must_use]
    pub fn with_arity(mut self, arity: usize) -> Self {
        self.arity = arity;
        self
    }

    /// Builder method to enable or disable predicate patterns.
    #[must_use]
    pub fn with_predicate_patterns(mut self, enabled: bool) -> Self {
        self.predicate_patterns = enabled;
        self
    }

    /// Builder method to enable or disable callable results.
    #[must_use]
    pub fn with_callable_results(mut self, enabled: bool) -> Self {
        self.callable_results = enabled;
        self
    }

    /// Builder method to set the tracer configuration.
    #[must_use]
    pub fn with_trace(mut self, trace: TracerConfig) -> Self {
        self.trace = trace;
        self
    }

    /// Checks that the configuration can back a table.
    ///
    /// # Errors
    /// Returns `InvalidArity` if the arity is zero.
    pub fn validate(&self) -> Result<()> {
        if self.arity == 0 {
            return Err(Error::invalid_arity(self.arity));
        }
        Ok(())
    }
}
