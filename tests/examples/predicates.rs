//! Callable patterns: predicates over the inputs, or identity literals.

use matchtable_engine::{MatchTable, TableConfig};
use matchtable_foundation::{Callable, ErrorKind, Value};

use crate::builtins::{any, sum};

fn is_string() -> Callable {
    Callable::unary(|v| Ok(Value::Bool(v.as_str().is_some())))
}

fn helper_table(predicate_patterns: bool, sum: &Callable, any: &Callable) -> MatchTable {
    let config = TableConfig::new(1).with_predicate_patterns(predicate_patterns);
    let mut table = MatchTable::with_config(config).unwrap();
    table
        .when(sum.clone())
        .unwrap()
        .then("sum")
        .unwrap()
        .when(any.clone())
        .unwrap()
        .then("any")
        .unwrap()
        .when(..)
        .unwrap()
        .then("other")
        .unwrap();
    table
}

#[test]
fn friendly_type_check() {
    let mut table = MatchTable::new(1).unwrap();
    table
        .when(is_string())
        .unwrap()
        .then("a string")
        .unwrap()
        .when(..)
        .unwrap()
        .then("not a string")
        .unwrap();

    assert_eq!(table.call1("hello").unwrap(), Value::from("a string"));
    assert_eq!(table.call1("").unwrap(), Value::from("a string"));
    assert_eq!(table.call1(Value::Nil).unwrap(), Value::from("not a string"));
    assert_eq!(table.call1(25).unwrap(), Value::from("not a string"));
}

#[test]
fn callables_as_identity_literals() {
    let (sum, any) = (sum(), any());
    let table = helper_table(false, &sum, &any);

    assert_eq!(table.call1(Value::Fn(sum)).unwrap(), Value::from("sum"));
    assert_eq!(table.call1(Value::Fn(any)).unwrap(), Value::from("any"));
    assert_eq!(table.call1(123).unwrap(), Value::from("other"));
    assert_eq!(table.call1(Value::Fn(crate::builtins::sum())).unwrap(), Value::from("other"));
}

#[test]
fn callables_as_predicates() {
    let (sum, any) = (sum(), any());
    let table = helper_table(true, &sum, &any);

    assert_eq!(table.call1(vec![1_i64, 2]).unwrap(), Value::from("sum"));
    // Sums to zero, so falls to the next rule.
    assert_eq!(table.call1(vec![-1_i64, 1]).unwrap(), Value::from("any"));
    assert_eq!(table.call1(vec![0_i64, 0]).unwrap(), Value::from("other"));
}

#[test]
fn predicate_errors_reach_the_caller() {
    let (sum, any) = (sum(), any());
    let table = helper_table(true, &sum, &any);

    for input in [Value::Fn(sum.clone()), Value::Fn(any.clone()), Value::Int(123)] {
        let err = table.call1(input).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Custom(_)));
        assert!(err.context.is_none());
    }
}
