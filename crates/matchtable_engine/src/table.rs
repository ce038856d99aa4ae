//! The match table: rule accumulation and first-match dispatch.
//!
//! Rules are added with a two-step builder protocol. [`MatchTable::when`]
//! opens a rule with its pattern and [`MatchTable::then`] (or one of its
//! variants) closes it with a result:
//!
//! ```
//! use matchtable_engine::MatchTable;
//! use matchtable_foundation::Value;
//!
//! # fn main() -> matchtable_foundation::Result<()> {
//! let mut size = MatchTable::new(1)?;
//! size.when(12..=52)?
//!     .then("really big, but not too big")?
//!     .when(..)?
//!     .then("i dunno")?;
//!
//! assert_eq!(size.call1(52)?, Value::from("really big, but not too big"));
//! assert_eq!(size.call1(6)?, Value::from("i dunno"));
//! # Ok(())
//! # }
//! ```
//!
//! Queries take `&self`, so a rule's callables may query the same table
//! again while it is being queried.

use std::cell::RefCell;

use matchtable_foundation::{Callable, Error, Result, Value};

use crate::config::TableConfig;
use crate::pattern::{Pattern, PatternCompiler, PatternMatcher, PatternSpec};
use crate::rule::{ResultArg, ResultCompiler, Rule};
use crate::trace::{MatchTracer, TraceEvent};

/// Builder state of a table.
#[derive(Clone, Debug)]
enum BuilderState {
    /// No rule is open.
    Idle,
    /// A pattern was supplied and the rule awaits its result.
    AwaitingResult(Pattern),
}

/// An ordered list of (pattern, result) rules queried first-match-wins.
#[derive(Debug)]
pub struct MatchTable {
    config: TableConfig,
    rules: Vec<Rule>,
    state: BuilderState,
    tracer: RefCell<MatchTracer>,
}

impl MatchTable {
    /// Creates an empty table with default options and the given arity.
    ///
    /// # Errors
    /// Returns `InvalidArity` if `arity` is zero.
    pub fn new(arity: usize) -> Result<Self> {
        Self::with_config(TableConfig::new(arity))
    }

    /// Creates an empty table from a full configuration.
    ///
    /// # Errors
    /// Returns `InvalidArity` if the configured arity is zero.
    pub fn with_config(config: TableConfig) -> Result<Self> {
        config.validate()?;
        let tracer = MatchTracer::new(config.trace.clone());
        Ok(Self {
            config,
            rules: Vec::new(),
            state: BuilderState::Idle,
            tracer: RefCell::new(tracer),
        })
    }

    /// Number of values each query takes.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.config.arity
    }

    /// The table configuration.
    #[must_use]
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// The closed rules, in insertion order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Number of closed rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if no rule has been closed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns true while a rule is open.
    #[must_use]
    pub fn is_building(&self) -> bool {
        matches!(self.state, BuilderState::AwaitingResult(_))
    }

    /// The pattern of the open rule, if any.
    #[must_use]
    pub fn pending_pattern(&self) -> Option<&Pattern> {
        match &self.state {
            BuilderState::AwaitingResult(pattern) => Some(pattern),
            BuilderState::Idle => None,
        }
    }

    // -------------------------------------------------------------------------
    // Builder protocol
    // -------------------------------------------------------------------------

    /// Opens a rule with the given pattern.
    ///
    /// Bounds written as `a..=b`, `a..` or `..=b` are inclusive. The half-open
    /// forms `a..b` and `..b` exclude `b`; write `..=b` for "at most `b`".
    ///
    /// # Errors
    /// Returns `BuilderState` if a rule is already open, `PatternSize` if the
    /// pattern does not fit the arity and `UnsupportedRange` for a stepped
    /// slice. The table is unchanged on error.
    pub fn when(&mut self, pattern: impl Into<PatternSpec>) -> Result<&mut Self> {
        if self.is_building() {
            return Err(Error::builder_state(
                "a pattern is already being defined; close it before opening another",
            ));
        }
        let pattern = PatternCompiler::compile(pattern.into(), &self.config)?;
        self.state = BuilderState::AwaitingResult(pattern);
        Ok(self)
    }

    /// Closes the open rule with a single result value.
    ///
    /// # Errors
    /// Returns `BuilderState` if no rule is open.
    pub fn then(&mut self, result: impl Into<ResultArg>) -> Result<&mut Self> {
        self.then_all(vec![result.into()])
    }

    /// Closes the open rule so that it yields its match outcome.
    ///
    /// # Errors
    /// Returns `BuilderState` if no rule is open.
    pub fn then_outcome(&mut self) -> Result<&mut Self> {
        self.then_all(vec![ResultArg::OutcomeRef])
    }

    /// Closes the open rule so that it yields `transform(outcome)`.
    ///
    /// # Errors
    /// Returns `BuilderState` if no rule is open.
    pub fn then_outcome_with(&mut self, transform: Callable) -> Result<&mut Self> {
        self.then_all(vec![ResultArg::OutcomeRef, transform.into()])
    }

    /// Closes the open rule with raw result arguments.
    ///
    /// One argument is the result itself. The match-outcome marker may be
    /// followed by a single callable transform.
    ///
    /// # Errors
    /// Returns `BuilderState` if no rule is open, `EmptyResult` for no
    /// arguments and `InvalidResultShape` for any other multi-value shape.
    /// The rule stays open on a shape error.
    pub fn then_all(&mut self, args: Vec<ResultArg>) -> Result<&mut Self> {
        let pattern = match std::mem::replace(&mut self.state, BuilderState::Idle) {
            BuilderState::Idle => {
                return Err(Error::builder_state("no pattern is being defined"));
            }
            BuilderState::AwaitingResult(pattern) => pattern,
        };
        let result = match ResultCompiler::compile(args, self.config.callable_results) {
            Ok(result) => result,
            Err(e) => {
                self.state = BuilderState::AwaitingResult(pattern);
                return Err(e);
            }
        };

        let index = self.rules.len();
        self.rules.push(Rule::new(pattern, result));
        tracing::debug!(rule = index, "rule added");
        self.tracer
            .get_mut()
            .record(TraceEvent::RuleAdded { rule: index });
        Ok(self)
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Queries the table: the result of the first rule matching `inputs`.
    ///
    /// An open rule takes no part in queries.
    ///
    /// # Errors
    /// Returns `ArityMismatch` for the wrong number of inputs, `NoMatch` if
    /// no rule matches and `Incomparable` if a range cannot order an input.
    /// Errors from predicates, computed results and transforms are returned
    /// unchanged.
    pub fn call(&self, inputs: &[Value]) -> Result<Value> {
        if inputs.len() != self.config.arity {
            return Err(Error::arity_mismatch(self.config.arity, inputs.len()));
        }

        self.tracer.borrow_mut().begin_query(inputs);
        let result = self.dispatch(inputs);
        self.tracer.borrow_mut().end_query();
        result
    }

    /// Queries an arity-1 table with a single value.
    ///
    /// # Errors
    /// Same as [`MatchTable::call`].
    pub fn call1(&self, input: impl Into<Value>) -> Result<Value> {
        self.call(&[input.into()])
    }

    fn dispatch(&self, inputs: &[Value]) -> Result<Value> {
        for (index, rule) in self.rules.iter().enumerate() {
            let outcome = PatternMatcher::outcome(&rule.pattern, inputs).map_err(|e| {
                if rule.pattern.is_predicate() {
                    e
                } else {
                    e.in_rule(index)
                }
            })?;

            let matched = outcome.is_truthy();
            tracing::trace!(rule = index, matched, "rule tested");
            self.trace(|| TraceEvent::RuleTested {
                rule: index,
                matched,
            });
            if !matched {
                continue;
            }

            tracing::debug!(rule = index, "rule matched");
            self.trace(|| TraceEvent::RuleMatched {
                rule: index,
                outcome: outcome.clone(),
            });
            return rule
                .result
                .resolve(inputs, outcome, self.config.callable_results);
        }

        self.trace(|| TraceEvent::NoMatch);
        Err(Error::no_match(render_inputs(inputs)))
    }

    fn trace(&self, event: impl FnOnce() -> TraceEvent) {
        let mut tracer = self.tracer.borrow_mut();
        if tracer.is_enabled() {
            tracer.record(event());
        }
    }

    // -------------------------------------------------------------------------
    // Tracing
    // -------------------------------------------------------------------------

    /// A copy of the table's tracer as of now.
    ///
    /// The copy does not see later queries. No borrow of the table's tracer
    /// outlives this call, so the table can keep being queried while the
    /// copy is held.
    #[must_use]
    pub fn traces(&self) -> MatchTracer {
        self.tracer.borrow().clone()
    }

    /// Mutable access to the tracer, e.g. to enable it after construction.
    pub fn tracer_mut(&mut self) -> &mut MatchTracer {
        self.tracer.get_mut()
    }

    /// Wraps the table as a callable, so it can serve as a predicate or
    /// computed result of another table.
    #[must_use]
    pub fn into_callable(self) -> Callable {
        Callable::named("match-table", move |args| self.call(args))
    }
}

fn render_inputs(inputs: &[Value]) -> String {
    let rendered: Vec<String> = inputs.iter().map(|v| format!("{v:?}")).collect();
    format!("({})", rendered.join(", "))
}
