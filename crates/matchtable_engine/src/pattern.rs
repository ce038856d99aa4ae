//! Pattern specification, compilation, and structural matching.
//!
//! Callers describe a rule's pattern with a [`PatternSpec`]: a single
//! [`Term`] (arity-1 sugar), a tuple of terms, or a predicate [`Callable`].
//! [`PatternCompiler`] resolves that description once, when the rule is
//! opened, into a tagged [`Pattern`] with exactly one sub-pattern per input
//! position. [`PatternMatcher`] evaluates compiled patterns on every query.

use std::ops::{
    Range as StdRange, RangeFrom, RangeFull, RangeInclusive, RangeTo, RangeToInclusive,
};

use matchtable_foundation::{Callable, Error, ErrorContext, Result, Value};

use crate::config::TableConfig;

// =============================================================================
// Pattern Specifications
// =============================================================================

/// An interval written slice-style, `start:stop:step`.
///
/// Both bounds are inclusive unless [`Slice::exclusive_upper`] is set. A slice
/// with neither bound is the wildcard. A step is accepted here so that it can
/// be rejected when the pattern is compiled.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Slice {
    /// Lower bound, if any.
    pub start: Option<Value>,
    /// Upper bound, if any.
    pub stop: Option<Value>,
    /// Step. Always rejected by the compiler.
    pub step: Option<Value>,
    /// Whether the upper bound is excluded from the interval.
    pub exclusive_upper: bool,
}

impl Slice {
    /// The wildcard slice, `:`.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// `start:stop`, inclusive on both ends.
    #[must_use]
    pub fn between(start: impl Into<Value>, stop: impl Into<Value>) -> Self {
        Self {
            start: Some(start.into()),
            stop: Some(stop.into()),
            ..Self::default()
        }
    }

    /// `start:`, everything at or above `start`.
    #[must_use]
    pub fn at_least(start: impl Into<Value>) -> Self {
        Self {
            start: Some(start.into()),
            ..Self::default()
        }
    }

    /// `:stop`, everything at or below `stop`.
    #[must_use]
    pub fn at_most(stop: impl Into<Value>) -> Self {
        Self {
            stop: Some(stop.into()),
            ..Self::default()
        }
    }

    /// Sets a step.
    #[must_use]
    pub fn with_step(mut self, step: impl Into<Value>) -> Self {
        self.step = Some(step.into());
        self
    }

    /// Excludes the upper bound.
    #[must_use]
    pub fn exclusive_upper(mut self) -> Self {
        self.exclusive_upper = true;
        self
    }

    /// Returns true for the bare `:` slice.
    #[must_use]
    pub fn is_any(&self) -> bool {
        self.start.is_none() && self.stop.is_none() && self.step.is_none()
    }
}

/// One input position of a pattern, as written by the caller.
#[derive(Clone, Debug)]
pub enum Term {
    /// An interval (or the wildcard).
    Slice(Slice),
    /// Exact value.
    Literal(Value),
}

impl Term {
    /// The wildcard term.
    #[must_use]
    pub fn any() -> Self {
        Self::Slice(Slice::any())
    }
}

/// A whole pattern, as written by the caller.
///
/// Std ranges convert as written: `a..=b`, `a..` and `..=b` keep both
/// bounds, while `a..b` and `..b` exclude `b`. Use `..=b` (or
/// [`Slice::at_most`]) for an interval that includes its upper bound.
#[derive(Clone, Debug)]
pub enum PatternSpec {
    /// A bare term; only valid for arity-1 tables.
    Single(Term),
    /// One term per input position.
    Tuple(Vec<Term>),
    /// A predicate over all inputs.
    Callable(Callable),
}

impl PatternSpec {
    /// Number of input positions this spec describes, or `None` for a
    /// callable.
    #[must_use]
    pub fn size(&self) -> Option<usize> {
        match self {
            Self::Single(_) => Some(1),
            Self::Tuple(terms) => Some(terms.len()),
            Self::Callable(_) => None,
        }
    }
}

macro_rules! literal_conversions {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Term {
                fn from(v: $ty) -> Self {
                    Self::Literal(Value::from(v))
                }
            }

            impl From<$ty> for PatternSpec {
                fn from(v: $ty) -> Self {
                    Self::Single(Term::from(v))
                }
            }
        )*
    };
}

literal_conversions!(Value, bool, i64, i32, f64, &str, String);

impl From<Slice> for Term {
    fn from(slice: Slice) -> Self {
        Self::Slice(slice)
    }
}

impl<T: Into<Value>> From<RangeInclusive<T>> for Term {
    fn from(range: RangeInclusive<T>) -> Self {
        let (start, stop) = range.into_inner();
        Self::Slice(Slice::between(start, stop))
    }
}

impl<T: Into<Value>> From<StdRange<T>> for Term {
    fn from(range: StdRange<T>) -> Self {
        Self::Slice(Slice::between(range.start, range.end).exclusive_upper())
    }
}

impl<T: Into<Value>> From<RangeFrom<T>> for Term {
    fn from(range: RangeFrom<T>) -> Self {
        Self::Slice(Slice::at_least(range.start))
    }
}

impl<T: Into<Value>> From<RangeToInclusive<T>> for Term {
    fn from(range: RangeToInclusive<T>) -> Self {
        Self::Slice(Slice::at_most(range.end))
    }
}

/// `..b` excludes `b`; `..=b` includes it.
impl<T: Into<Value>> From<RangeTo<T>> for Term {
    fn from(range: RangeTo<T>) -> Self {
        Self::Slice(Slice::at_most(range.end).exclusive_upper())
    }
}

impl From<RangeFull> for Term {
    fn from(_: RangeFull) -> Self {
        Self::any()
    }
}

impl From<Term> for PatternSpec {
    fn from(term: Term) -> Self {
        Self::Single(term)
    }
}

impl From<Slice> for PatternSpec {
    fn from(slice: Slice) -> Self {
        Self::Single(Term::Slice(slice))
    }
}

impl<T: Into<Value>> From<RangeInclusive<T>> for PatternSpec {
    fn from(range: RangeInclusive<T>) -> Self {
        Self::Single(range.into())
    }
}

impl<T: Into<Value>> From<StdRange<T>> for PatternSpec {
    fn from(range: StdRange<T>) -> Self {
        Self::Single(range.into())
    }
}

impl<T: Into<Value>> From<RangeFrom<T>> for PatternSpec {
    fn from(range: RangeFrom<T>) -> Self {
        Self::Single(range.into())
    }
}

impl<T: Into<Value>> From<RangeToInclusive<T>> for PatternSpec {
    fn from(range: RangeToInclusive<T>) -> Self {
        Self::Single(range.into())
    }
}

impl<T: Into<Value>> From<RangeTo<T>> for PatternSpec {
    fn from(range: RangeTo<T>) -> Self {
        Self::Single(range.into())
    }
}

impl From<RangeFull> for PatternSpec {
    fn from(range: RangeFull) -> Self {
        Self::Single(range.into())
    }
}

impl From<Callable> for PatternSpec {
    fn from(f: Callable) -> Self {
        Self::Callable(f)
    }
}

impl From<Vec<Term>> for PatternSpec {
    fn from(terms: Vec<Term>) -> Self {
        Self::Tuple(terms)
    }
}

impl<A: Into<Term>, B: Into<Term>> From<(A, B)> for PatternSpec {
    fn from((a, b): (A, B)) -> Self {
        Self::Tuple(vec![a.into(), b.into()])
    }
}

impl<A: Into<Term>, B: Into<Term>, C: Into<Term>> From<(A, B, C)> for PatternSpec {
    fn from((a, b, c): (A, B, C)) -> Self {
        Self::Tuple(vec![a.into(), b.into(), c.into()])
    }
}

impl<A: Into<Term>, B: Into<Term>, C: Into<Term>, D: Into<Term>> From<(A, B, C, D)>
    for PatternSpec
{
    fn from((a, b, c, d): (A, B, C, D)) -> Self {
        Self::Tuple(vec![a.into(), b.into(), c.into(), d.into()])
    }
}

// =============================================================================
// Compiled Pattern Types
// =============================================================================

/// An interval over ordered values.
#[derive(Clone, Debug, PartialEq)]
pub struct Range {
    /// Inclusive lower bound.
    pub low: Option<Value>,
    /// Upper bound, inclusive unless `include_upper` is false.
    pub high: Option<Value>,
    /// Whether `high` itself is inside the interval.
    pub include_upper: bool,
}

impl Range {
    /// Creates an interval inclusive on both ends.
    #[must_use]
    pub fn inclusive(low: Option<Value>, high: Option<Value>) -> Self {
        Self {
            low,
            high,
            include_upper: true,
        }
    }

    /// Tests interval membership.
    ///
    /// A missing bound does not constrain that side. NaN is never inside an
    /// interval with a bound.
    ///
    /// # Errors
    /// Returns an `Incomparable` error if a bound and `value` cannot be
    /// ordered against each other.
    pub fn contains(&self, value: &Value) -> Result<bool> {
        if let Some(low) = &self.low {
            if !low.compare(value)?.is_some_and(std::cmp::Ordering::is_le) {
                return Ok(false);
            }
        }
        if let Some(high) = &self.high {
            let within = match value.compare(high)? {
                Some(std::cmp::Ordering::Less) => true,
                Some(std::cmp::Ordering::Equal) => self.include_upper,
                _ => false,
            };
            if !within {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// What a single input position is tested against.
#[derive(Clone, Debug)]
pub enum SubPattern {
    /// Matches anything.
    Wildcard,
    /// Matches by interval membership.
    Range(Range),
    /// Matches by loose equality.
    Literal(Value),
}

/// A compiled pattern.
#[derive(Clone, Debug)]
pub enum Pattern {
    /// Invoked with all inputs; its return value is the match outcome.
    Predicate(Callable),
    /// One sub-pattern per input position.
    Positional(Vec<SubPattern>),
}

impl Pattern {
    /// Returns true for predicate patterns.
    #[must_use]
    pub const fn is_predicate(&self) -> bool {
        matches!(self, Self::Predicate(_))
    }
}

// =============================================================================
// Pattern Compiler
// =============================================================================

/// Compiles caller pattern specs into runtime patterns.
pub struct PatternCompiler;

impl PatternCompiler {
    /// Compile a pattern spec for a table with the given configuration.
    ///
    /// A bare callable, or a bare literal holding a callable, becomes a
    /// predicate when predicate patterns are enabled and an identity literal
    /// otherwise.
    ///
    /// # Errors
    /// Returns `PatternSize` if the spec's shape does not fit the arity, and
    /// `UnsupportedRange` if a slice carries a step.
    pub fn compile(spec: PatternSpec, config: &TableConfig) -> Result<Pattern> {
        let arity = config.arity;
        match spec {
            PatternSpec::Callable(f) | PatternSpec::Single(Term::Literal(Value::Fn(f)))
                if config.predicate_patterns =>
            {
                Ok(Pattern::Predicate(f))
            }
            PatternSpec::Callable(f) => Self::compile(
                PatternSpec::Single(Term::Literal(Value::Fn(f))),
                config,
            ),
            PatternSpec::Single(term) => {
                if arity != 1 {
                    return Err(Error::pattern_size(arity, 1));
                }
                Ok(Pattern::Positional(vec![Self::compile_term(term)?]))
            }
            PatternSpec::Tuple(terms) => {
                if terms.len() != arity {
                    return Err(Error::pattern_size(arity, terms.len()));
                }
                let subs = terms
                    .into_iter()
                    .map(Self::compile_term)
                    .collect::<Result<Vec<_>>>()?;
                Ok(Pattern::Positional(subs))
            }
        }
    }

    fn compile_term(term: Term) -> Result<SubPattern> {
        match term {
            Term::Literal(value) => Ok(SubPattern::Literal(value)),
            Term::Slice(slice) => {
                if let Some(step) = slice.step {
                    return Err(Error::unsupported_range(step));
                }
                Ok(match (slice.start, slice.stop) {
                    (None, None) => SubPattern::Wildcard,
                    (low, high) => SubPattern::Range(Range {
                        low,
                        high,
                        include_upper: !slice.exclusive_upper,
                    }),
                })
            }
        }
    }
}

// =============================================================================
// Pattern Matching
// =============================================================================

/// Evaluates compiled patterns against inputs.
pub struct PatternMatcher;

impl PatternMatcher {
    /// Computes the match outcome of `pattern` for `inputs`.
    ///
    /// Predicates return whatever the callable returns. Positional patterns
    /// return `Bool`, stopping at the first position that fails.
    ///
    /// # Errors
    /// Errors from a predicate are returned unchanged. Range comparison
    /// errors carry the failing input position in their context.
    pub fn outcome(pattern: &Pattern, inputs: &[Value]) -> Result<Value> {
        match pattern {
            Pattern::Predicate(f) => f.call(inputs),
            Pattern::Positional(subs) => Self::matches_positions(subs, inputs).map(Value::Bool),
        }
    }

    /// Tests each input against the sub-pattern at the same position.
    ///
    /// # Errors
    /// Returns an `Incomparable` error from a range test, with the position
    /// recorded.
    pub fn matches_positions(subs: &[SubPattern], inputs: &[Value]) -> Result<bool> {
        for (position, (sub, value)) in subs.iter().zip(inputs).enumerate() {
            let passed = match sub {
                SubPattern::Wildcard => true,
                SubPattern::Range(range) => range
                    .contains(value)
                    .map_err(|e| e.with_context(ErrorContext::new().with_position(position)))?,
                SubPattern::Literal(expected) => expected.loose_eq(value),
            };
            if !passed {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
