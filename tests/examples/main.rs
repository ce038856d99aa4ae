//! Scenario tests: small, complete tables built the way callers use them.

mod predicates;
