//! Rule results and their resolution.
//!
//! A rule is closed with one or more [`ResultArg`]s. [`ResultCompiler`]
//! checks their shape and produces a [`RuleResult`], which is resolved into
//! the final value when the rule matches.

use matchtable_foundation::{Callable, Error, ErrorKind, Result, Value};

use crate::pattern::Pattern;

// =============================================================================
// Result Arguments
// =============================================================================

/// A value supplied when closing a rule.
#[derive(Clone, Debug)]
pub enum ResultArg {
    /// An ordinary value (possibly a callable).
    Value(Value),
    /// Marker meaning "use the match outcome as the result".
    OutcomeRef,
}

/// The match-outcome marker.
pub const MATCH_OUTCOME: ResultArg = ResultArg::OutcomeRef;

macro_rules! value_conversions {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for ResultArg {
                fn from(v: $ty) -> Self {
                    Self::Value(Value::from(v))
                }
            }
        )*
    };
}

value_conversions!(Value, bool, i64, i32, f64, &str, String, Callable);

impl<T: Into<Value>> From<Vec<T>> for ResultArg {
    fn from(v: Vec<T>) -> Self {
        Self::Value(Value::from(v))
    }
}

impl TryFrom<ResultArg> for Value {
    type Error = Error;

    fn try_from(arg: ResultArg) -> Result<Self> {
        match arg {
            ResultArg::Value(v) => Ok(v),
            ResultArg::OutcomeRef => Err(Error::new(ErrorKind::Uninstantiable)),
        }
    }
}

// =============================================================================
// Rule Results
// =============================================================================

/// What a matching rule produces.
#[derive(Clone, Debug)]
pub enum RuleResult {
    /// Returned as-is.
    Literal(Value),
    /// Invoked with the query inputs.
    Computed(Callable),
    /// The match outcome itself.
    Outcome,
    /// A transform applied to the match outcome.
    TransformedOutcome(Callable),
}

impl RuleResult {
    /// Produces the final value for a matching rule.
    ///
    /// Outcome results that resolve to a callable are invoked with `inputs`
    /// when `callable_results` is set.
    ///
    /// # Errors
    /// Errors from computed results and transforms are returned unchanged.
    pub fn resolve(&self, inputs: &[Value], outcome: Value, callable_results: bool) -> Result<Value> {
        let resolved = match self {
            Self::Literal(v) => return Ok(v.clone()),
            Self::Computed(f) => return f.call(inputs),
            Self::Outcome => outcome,
            Self::TransformedOutcome(transform) => transform.call(std::slice::from_ref(&outcome))?,
        };
        match resolved {
            Value::Fn(f) if callable_results => f.call(inputs),
            v => Ok(v),
        }
    }
}

/// Checks result arguments and builds a [`RuleResult`].
pub struct ResultCompiler;

impl ResultCompiler {
    /// Compile the arguments a rule was closed with.
    ///
    /// Accepted shapes are a single value, the marker alone, or the marker
    /// followed by one callable transform.
    ///
    /// # Errors
    /// Returns `EmptyResult` for no arguments and `InvalidResultShape` for
    /// any other multi-value shape.
    pub fn compile(args: Vec<ResultArg>, callable_results: bool) -> Result<RuleResult> {
        let count = args.len();
        let mut args = args.into_iter();
        match (args.next(), args.next()) {
            (None, _) => Err(Error::new(ErrorKind::EmptyResult)),
            (Some(ResultArg::OutcomeRef), None) => Ok(RuleResult::Outcome),
            (Some(ResultArg::Value(Value::Fn(f))), None) if callable_results => {
                Ok(RuleResult::Computed(f))
            }
            (Some(ResultArg::Value(v)), None) => Ok(RuleResult::Literal(v)),
            (Some(ResultArg::OutcomeRef), Some(_)) if count != 2 => {
                Err(Error::invalid_result_shape(format!(
                    "the match-outcome marker takes at most one transform, got {}",
                    count - 1
                )))
            }
            (Some(ResultArg::OutcomeRef), Some(ResultArg::Value(Value::Fn(t)))) => {
                Ok(RuleResult::TransformedOutcome(t))
            }
            (Some(ResultArg::OutcomeRef), Some(_)) => Err(Error::invalid_result_shape(
                "the match-outcome transform must be callable",
            )),
            (Some(ResultArg::Value(_)), Some(_)) => Err(Error::invalid_result_shape(format!(
                "{count} result values given; multiple values must start with the match-outcome marker"
            ))),
        }
    }
}

// =============================================================================
// Rule
// =============================================================================

/// A compiled (pattern, result) pair.
#[derive(Clone, Debug)]
pub struct Rule {
    /// What the inputs are tested against.
    pub pattern: Pattern,
    /// What a match produces.
    pub result: RuleResult,
}

impl Rule {
    /// Creates a new rule.
    #[must_use]
    pub fn new(pattern: Pattern, result: RuleResult) -> Self {
        Self { pattern, result }
    }
}
