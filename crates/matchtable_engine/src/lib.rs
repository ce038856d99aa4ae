//! Rule tables with first-match dispatch.
//!
//! This crate provides:
//! - [`MatchTable`] - Rule accumulation and first-match queries
//! - [`PatternCompiler`] / [`PatternMatcher`] - Pattern compilation and matching
//! - [`ResultCompiler`] / [`RuleResult`] - Result shapes and resolution
//! - [`MatchTracer`] - Build and query tracing

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod pattern;
pub mod rule;
pub mod table;
pub mod trace;

pub use config::TableConfig;
pub use pattern::{
    Pattern, PatternCompiler, PatternMatcher, PatternSpec, Range, Slice, SubPattern, Term,
};
pub use rule::{MATCH_OUTCOME, ResultArg, ResultCompiler, Rule, RuleResult};
pub use table::MatchTable;
pub use trace::{MatchTracer, TraceBuffer, TraceEvent, TraceRecord, TracerConfig};
