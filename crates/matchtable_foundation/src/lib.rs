//! Core types for match tables.
//!
//! This crate provides:
//! - [`Value`] - The dynamic value type for table inputs and results
//! - [`Callable`] - Function objects used as predicates and computed results
//! - [`Type`] - Runtime type descriptors
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod types;
pub mod value;

pub use error::{Error, ErrorContext, ErrorKind};
pub use types::Type;
pub use value::{Callable, Value};

/// Result type alias using the match table error type.
pub type Result<T> = std::result::Result<T, Error>;
