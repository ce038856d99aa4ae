//! Matchtable - runtime dispatch tables
//!
//! This crate re-exports all layers of the matchtable system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 1: matchtable_engine      — Patterns, results, rules, dispatch, tracing
//! Layer 0: matchtable_foundation  — Core types (Value, Callable, Error)
//! ```

pub use matchtable_engine as engine;
pub use matchtable_foundation as foundation;

pub use matchtable_engine::{MATCH_OUTCOME, MatchTable, Slice, TableConfig, Term};
pub use matchtable_foundation::{Callable, Error, ErrorKind, Result, Value};
