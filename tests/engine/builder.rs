//! Integration tests for the rule builder
//!
//! Tests opening and closing rules, result shapes, and builder state errors.

use matchtable_engine::{MATCH_OUTCOME, MatchTable, ResultArg, RuleResult, Slice, TableConfig};
use matchtable_foundation::{Callable, ErrorKind, Value};

fn double() -> Callable {
    Callable::unary(|v| Ok(Value::Int(v.as_int().unwrap_or(0) * 2)))
}

// =============================================================================
// Construction
// =============================================================================

#[test]
fn new_table_is_empty() {
    let table = MatchTable::new(3).unwrap();
    assert_eq!(table.arity(), 3);
    assert!(table.is_empty());
    assert!(!table.is_building());
    assert!(table.pending_pattern().is_none());
}

#[test]
fn zero_arity_rejected() {
    let err = MatchTable::new(0).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidArity(0)));

    let err = MatchTable::with_config(TableConfig::new(4).with_arity(0)).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidArity(0)));
}

#[test]
fn config_is_kept() {
    let config = TableConfig::new(2)
        .with_predicate_patterns(false)
        .with_callable_results(false);
    let table = MatchTable::with_config(config).unwrap();
    assert_eq!(table.arity(), 2);
    assert!(!table.config().predicate_patterns);
    assert!(!table.config().callable_results);
}

// =============================================================================
// Builder Protocol
// =============================================================================

#[test]
fn chained_rules_are_appended_in_order() {
    let mut table = MatchTable::new(1).unwrap();
    table
        .when(1)
        .unwrap()
        .then("one")
        .unwrap()
        .when(2)
        .unwrap()
        .then("two")
        .unwrap()
        .when(..)
        .unwrap()
        .then("many")
        .unwrap();

    assert_eq!(table.len(), 3);
    assert!(!table.is_building());
    assert!(matches!(table.rules()[0].result, RuleResult::Literal(ref v) if *v == Value::from("one")));
    assert!(matches!(table.rules()[2].result, RuleResult::Literal(ref v) if *v == Value::from("many")));
}

#[test]
fn open_rule_is_visible_until_closed() {
    let mut table = MatchTable::new(1).unwrap();
    table.when(5..=9).unwrap();
    assert!(table.is_building());
    assert!(table.pending_pattern().is_some());
    assert_eq!(table.len(), 0);

    table.then("mid").unwrap();
    assert!(!table.is_building());
    assert_eq!(table.len(), 1);
}

#[test]
fn opening_twice_keeps_first_pattern() {
    let mut table = MatchTable::new(1).unwrap();
    table.when(1).unwrap();
    let err = table.when(2).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::BuilderState(_)));

    table.then("first").unwrap();
    assert_eq!(table.call1(1).unwrap(), Value::from("first"));
    assert!(table.call1(2).is_err());
}

#[test]
fn closing_without_open_rule() {
    let mut table = MatchTable::new(1).unwrap();
    for err in [
        table.then(1).unwrap_err(),
        table.then_outcome().unwrap_err(),
        table.then_outcome_with(double()).unwrap_err(),
        table.then_all(vec![]).unwrap_err(),
    ] {
        assert!(matches!(err.kind, ErrorKind::BuilderState(_)));
    }
    assert!(table.is_empty());
}

#[test]
fn failed_open_leaves_table_idle() {
    let mut table = MatchTable::new(2).unwrap();
    assert!(table.when((1, 2, 3)).is_err());
    assert!(!table.is_building());
    assert!(table.when(Slice::between(1, 9).with_step(2)).is_err());
    assert!(!table.is_building());
}

#[test]
fn rules_can_be_added_between_queries() {
    let mut table = MatchTable::new(1).unwrap();
    table.when(1).unwrap().then("one").unwrap();
    assert!(matches!(
        table.call1(2).unwrap_err().kind,
        ErrorKind::NoMatch(_)
    ));

    table.when(..).unwrap().then("other").unwrap();
    assert_eq!(table.call1(2).unwrap(), Value::from("other"));
}

#[test]
fn open_rule_is_ignored_by_queries() {
    let mut table = MatchTable::new(1).unwrap();
    table.when(1).unwrap().then("one").unwrap();
    table.when(..).unwrap();

    assert_eq!(table.call1(1).unwrap(), Value::from("one"));
    assert!(table.call1(7).is_err());
}

// =============================================================================
// Result Shapes
// =============================================================================

#[test]
fn empty_result_rejected() {
    let mut table = MatchTable::new(1).unwrap();
    table.when(..).unwrap();
    let err = table.then_all(vec![]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::EmptyResult));
    assert!(table.is_building());
}

#[test]
fn multiple_plain_values_rejected() {
    let mut table = MatchTable::new(1).unwrap();
    table.when(..).unwrap();
    let err = table
        .then_all(vec![ResultArg::from(1), ResultArg::from(2)])
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidResultShape(_)));
    assert!(table.is_building());
}

#[test]
fn marker_with_too_many_transforms_rejected() {
    let mut table = MatchTable::new(1).unwrap();
    table.when(..).unwrap();
    let err = table
        .then_all(vec![MATCH_OUTCOME, double().into(), double().into()])
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidResultShape(_)));
}

#[test]
fn marker_with_non_callable_transform_rejected() {
    let mut table = MatchTable::new(1).unwrap();
    table.when(..).unwrap();
    let err = table
        .then_all(vec![MATCH_OUTCOME, ResultArg::from("nope")])
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidResultShape(_)));
}

#[test]
fn marker_after_value_rejected() {
    let mut table = MatchTable::new(1).unwrap();
    table.when(..).unwrap();
    let err = table
        .then_all(vec![ResultArg::from(double()), MATCH_OUTCOME])
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidResultShape(_)));
}

#[test]
fn result_shapes_compile_to_variants() {
    let mut table = MatchTable::new(1).unwrap();
    table.when(1).unwrap().then("lit").unwrap();
    table.when(2).unwrap().then(double()).unwrap();
    table.when(3).unwrap().then_outcome().unwrap();
    table.when(4).unwrap().then_outcome_with(double()).unwrap();

    let rules = table.rules();
    assert!(matches!(rules[0].result, RuleResult::Literal(_)));
    assert!(matches!(rules[1].result, RuleResult::Computed(_)));
    assert!(matches!(rules[2].result, RuleResult::Outcome));
    assert!(matches!(rules[3].result, RuleResult::TransformedOutcome(_)));
}

#[test]
fn callable_result_is_literal_when_disabled() {
    let config = TableConfig::new(1).with_callable_results(false);
    let mut table = MatchTable::with_config(config).unwrap();
    table.when(..).unwrap().then(double()).unwrap();
    assert!(matches!(table.rules()[0].result, RuleResult::Literal(Value::Fn(_))));
}

// =============================================================================
// Match-Outcome Marker
// =============================================================================

#[test]
fn marker_cannot_become_a_value() {
    let err = Value::try_from(MATCH_OUTCOME).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Uninstantiable));
}

#[test]
fn ordinary_argument_becomes_a_value() {
    assert_eq!(Value::try_from(ResultArg::from(7)).unwrap(), Value::Int(7));
}
