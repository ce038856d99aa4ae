//! Core value type flowing through match tables.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::sync::Arc;

use crate::Result;
use crate::error::Error;
use crate::types::Type;

/// Dynamic value used for table inputs, literals, outcomes and results.
///
/// Values are cheaply cloneable. Vectors use structural sharing.
#[derive(Clone)]
pub enum Value {
    /// Absence of a value.
    Nil,
    /// `true` or `false`.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Float; orders and loosely equals ints numerically.
    Float(f64),
    /// Immutable shared string.
    String(Arc<str>),
    /// Vector with structural sharing.
    Vec(im::Vector<Value>),
    /// A predicate, computed result or transform.
    Fn(Callable),
}

type NativeFn = dyn Fn(&[Value]) -> Result<Value>;

/// A function object callable with positional [`Value`] arguments.
///
/// Callables are reference counted and compare by identity, so two clones of
/// the same callable are equal while two separately built closures are not.
#[derive(Clone)]
pub struct Callable {
    name: Option<Arc<str>>,
    func: Rc<NativeFn>,
}

impl Callable {
    /// Wraps a function taking all positional arguments.
    pub fn new(func: impl Fn(&[Value]) -> Result<Value> + 'static) -> Self {
        Self {
            name: None,
            func: Rc::new(func),
        }
    }

    /// Wraps a function and gives it a name for debugging.
    pub fn named(
        name: impl Into<Arc<str>>,
        func: impl Fn(&[Value]) -> Result<Value> + 'static,
    ) -> Self {
        Self {
            name: Some(name.into()),
            func: Rc::new(func),
        }
    }

    /// Wraps a single-argument function.
    ///
    /// Calling the result with any other number of arguments fails with a
    /// custom error, so it is not mistaken for a table's own arity check.
    pub fn unary(func: impl Fn(&Value) -> Result<Value> + 'static) -> Self {
        Self::new(move |args| match args {
            [arg] => func(arg),
            _ => Err(Error::custom(format!(
                "unary callable expects 1 argument, got {}",
                args.len()
            ))),
        })
    }

    /// Returns the debug name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Invokes the function.
    ///
    /// # Errors
    /// Returns whatever error the wrapped function returns.
    pub fn call(&self, args: &[Value]) -> Result<Value> {
        (self.func)(args)
    }
}

impl Value {
    /// The runtime type tag.
    #[must_use]
    pub fn value_type(&self) -> Type {
        match self {
            Self::Nil => Type::Nil,
            Self::Bool(_) => Type::Bool,
            Self::Int(_) => Type::Int,
            Self::Float(_) => Type::Float,
            Self::String(_) => Type::String,
            Self::Vec(_) => Type::Vec,
            Self::Fn(_) => Type::Fn,
        }
    }

    /// Returns true for `Nil`.
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Truthiness, as used to decide whether a rule matched.
    ///
    /// `nil`, `false`, zero, the empty string and the empty vector are falsy.
    /// NaN is truthy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Nil => false,
            Self::Bool(b) => *b,
            Self::Int(n) => *n != 0,
            Self::Float(n) => *n != 0.0,
            Self::String(s) => !s.is_empty(),
            Self::Vec(v) => !v.is_empty(),
            Self::Fn(_) => true,
        }
    }

    /// The inner integer, if this is an `Int`.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// The inner float, if this is a `Float`.
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Either numeric variant widened to `f64`. Ints beyond 2^53 round.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// The string contents, if this is a `String`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The elements, if this is a `Vec`.
    #[must_use]
    pub const fn as_vec(&self) -> Option<&im::Vector<Value>> {
        match self {
            Self::Vec(v) => Some(v),
            _ => None,
        }
    }

    /// The callable, if this is a `Fn`.
    #[must_use]
    pub const fn as_callable(&self) -> Option<&Callable> {
        match self {
            Self::Fn(f) => Some(f),
            _ => None,
        }
    }

    /// Equality used for literal patterns.
    ///
    /// Unlike `==`, ints and floats compare numerically (`1 == 1.0`) and NaN
    /// is never equal to anything. Vectors compare element-wise with the same
    /// rule.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn loose_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Int(a), Self::Float(b)) | (Self::Float(b), Self::Int(a)) => {
                cmp_int_float(*a, *b) == Some(Ordering::Equal)
            }
            (Self::Vec(a), Self::Vec(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.loose_eq(y))
            }
            _ => self == other,
        }
    }

    /// Orders `self` against `other` for range tests.
    ///
    /// Returns `Ok(None)` when both sides are numbers but one is NaN.
    ///
    /// # Errors
    /// Returns [`ErrorKind::Incomparable`](crate::ErrorKind::Incomparable) if
    /// the two types cannot be ordered against each other.
    pub fn compare(&self, other: &Self) -> Result<Option<Ordering>> {
        let (left, right) = (self.value_type(), other.value_type());
        if !left.orders_with(right) {
            return Err(Error::incomparable(left, right));
        }
        Ok(self.partial_cmp(other))
    }
}

// Strict equality: floats by bit pattern, callables by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Nil, Self::Nil) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Vec(a), Self::Vec(b)) => a == b,
            (Self::Fn(a), Self::Fn(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Nil => {}
            Self::Bool(b) => b.hash(state),
            Self::Int(n) => n.hash(state),
            Self::Float(n) => n.to_bits().hash(state),
            Self::String(s) => s.hash(state),
            Self::Vec(v) => v.hash(state),
            Self::Fn(f) => f.hash(state),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Nil, Self::Nil) => Some(Ordering::Equal),
            (Self::Bool(a), Self::Bool(b)) => a.partial_cmp(b),
            (Self::Int(a), Self::Int(b)) => a.partial_cmp(b),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::Int(a), Self::Float(b)) => cmp_int_float(*a, *b),
            (Self::Float(a), Self::Int(b)) => cmp_int_float(*b, *a).map(Ordering::reverse),
            (Self::String(a), Self::String(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

/// Orders an int against a float without rounding the int.
///
/// `None` only for NaN.
fn cmp_int_float(int: i64, float: f64) -> Option<Ordering> {
    // 2^63: every float in [-2^63, 2^63) truncates to an in-range i64.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;

    if float.is_nan() {
        return None;
    }
    if float >= LIMIT {
        return Some(Ordering::Less);
    }
    if float < -LIMIT {
        return Some(Ordering::Greater);
    }
    let whole = float.trunc();
    #[allow(clippy::cast_possible_truncation)]
    let truncated = whole as i64;
    match int.cmp(&truncated) {
        Ordering::Equal => whole.partial_cmp(&float),
        unequal => Some(unequal),
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => write!(f, "nil"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n:?}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Vec(v) => f.debug_list().entries(v.iter()).finish(),
            Self::Fn(func) => write!(f, "{func:?}"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => write!(f, "nil"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Vec(v) => {
                write!(f, "[")?;
                for (i, item) in v.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Fn(func) => write!(f, "{func}"),
        }
    }
}

// Callable implementations

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.func, &other.func)
    }
}

impl Eq for Callable {}

impl Hash for Callable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Rc::as_ptr(&self.func).cast::<()>() as usize).hash(state);
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "<fn {name}>"),
            None => write!(f, "<fn>"),
        }
    }
}

impl fmt::Display for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// Convenience From implementations

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s.into())
    }
}

impl From<Arc<str>> for Value {
    fn from(s: Arc<str>) -> Self {
        Self::String(s)
    }
}

impl From<Callable> for Value {
    fn from(f: Callable) -> Self {
        Self::Fn(f)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Nil, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::Vec(v.into_iter().map(Into::into).collect())
    }
}
