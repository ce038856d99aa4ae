//! Runtime type descriptors, used to describe values in error messages.

use std::fmt;

/// Runtime type of a [`Value`](crate::Value).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    /// The nil type (only value: nil).
    Nil,
    /// Boolean type.
    Bool,
    /// 64-bit signed integer.
    Int,
    /// 64-bit floating point.
    Float,
    /// String type.
    String,
    /// Vector of arbitrary values.
    Vec,
    /// Callable type.
    Fn,
}

impl Type {
    /// Returns true for `Int` and `Float`.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Float)
    }

    /// Returns true if values of `self` and `other` can be ordered against
    /// each other in a range test.
    ///
    /// Ints and floats order against each other; bools and strings only
    /// against their own kind.
    #[must_use]
    pub const fn orders_with(self, other: Type) -> bool {
        matches!(
            (self, other),
            (Self::Int | Self::Float, Self::Int | Self::Float)
                | (Self::Bool, Self::Bool)
                | (Self::String, Self::String)
        )
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => write!(f, "nil"),
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::String => write!(f, "string"),
            Self::Vec => write!(f, "vec"),
            Self::Fn => write!(f, "fn"),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
