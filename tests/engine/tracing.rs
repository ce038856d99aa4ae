//! Integration tests for the match tracer
//!
//! Tests recorded events, filtering, buffer limits, and nested queries.

use std::cell::RefCell;
use std::rc::Rc;

use matchtable_engine::{MatchTable, TableConfig, TraceEvent, TracerConfig};
use matchtable_foundation::{Callable, Error, Value};

fn traced(trace: TracerConfig) -> MatchTable {
    let mut table = MatchTable::with_config(TableConfig::new(1).with_trace(trace)).unwrap();
    table.when(0).unwrap().then("zero").unwrap();
    table.when(1..).unwrap().then("positive").unwrap();
    table
}

#[test]
fn tracing_disabled_by_default() {
    let mut table = MatchTable::new(1).unwrap();
    table.when(..).unwrap().then(1).unwrap();
    table.call1(0).unwrap();
    assert!(table.traces().buffer().is_empty());
}

#[test]
fn records_tested_and_matched_rules() {
    let table = traced(TracerConfig::new().enabled());
    table.call1(3).unwrap();

    let tracer = table.traces();
    let tested: Vec<_> = tracer
        .buffer()
        .iter()
        .filter_map(|r| match r.event {
            TraceEvent::RuleTested { rule, matched } => Some((rule, matched)),
            _ => None,
        })
        .collect();
    assert_eq!(tested, vec![(0, false), (1, true)]);

    let matched = tracer.buffer().by_event_type("rule-matched");
    assert_eq!(matched.len(), 1);
    assert!(matches!(
        matched[0].event,
        TraceEvent::RuleMatched { rule: 1, outcome: Value::Bool(true) }
    ));
}

#[test]
fn records_no_match() {
    let table = traced(TracerConfig::new().enabled());
    assert!(table.call1(-1).is_err());
    assert_eq!(table.traces().buffer().by_event_type("no-match").len(), 1);
}

#[test]
fn queries_are_numbered() {
    let table = traced(TracerConfig::new().enabled());
    table.call1(0).unwrap();
    table.call1(5).unwrap();

    let tracer = table.traces();
    let starts = tracer.buffer().by_event_type("query-started");
    assert_eq!(starts.len(), 2);
    assert_ne!(starts[0].query, starts[1].query);
    assert_eq!(tracer.buffer().records_for_query(starts[1].query).len(), 4);
}

#[test]
fn event_filter_limits_records() {
    let table = traced(TracerConfig::new().enabled().filter_events(vec!["rule-matched".into()]));
    table.call1(0).unwrap();
    table.call1(9).unwrap();

    let tracer = table.traces();
    assert_eq!(tracer.buffer().len(), 2);
    assert!(tracer.buffer().iter().all(|r| r.event_type() == "rule-matched"));
}

#[test]
fn buffer_size_is_bounded() {
    let table = traced(TracerConfig::new().enabled().with_buffer_size(5));
    for n in 0..10 {
        table.call1(n).unwrap();
    }
    assert_eq!(table.traces().buffer().len(), 5);
}

#[test]
fn tracer_can_be_enabled_later() {
    let mut table = traced(TracerConfig::new());
    table.call1(1).unwrap();
    assert!(table.traces().buffer().is_empty());

    table.tracer_mut().enable();
    table.call1(1).unwrap();
    assert!(!table.traces().buffer().is_empty());

    table.tracer_mut().clear();
    assert!(table.traces().buffer().is_empty());
}

#[test]
fn nested_queries_record_depth() {
    let config = TableConfig::new(1).with_trace(TracerConfig::new().enabled());
    let table = Rc::new(RefCell::new(MatchTable::with_config(config).unwrap()));
    let weak = Rc::downgrade(&table);
    let recurse = Callable::unary(move |v| {
        let table = weak.upgrade().ok_or_else(|| Error::custom("dropped"))?;
        let n = v.as_int().unwrap_or(0);
        table.borrow().call1(n - 1)
    });
    table
        .borrow_mut()
        .when(..=0)
        .unwrap()
        .then("done")
        .unwrap()
        .when(..)
        .unwrap()
        .then(recurse)
        .unwrap();

    let table = table.borrow();
    assert_eq!(table.call1(2).unwrap(), Value::from("done"));

    let tracer = table.traces();
    let depths: Vec<usize> = tracer
        .buffer()
        .by_event_type("query-started")
        .iter()
        .map(|r| r.depth)
        .collect();
    assert_eq!(depths, vec![1, 2, 3]);
    assert!(tracer.format_recent(3).lines().count() == 3);
}

#[test]
fn held_traces_do_not_block_queries() {
    let table = traced(TracerConfig::new().enabled());
    table.call1(0).unwrap();

    let before = table.traces();
    table.call1(5).unwrap();
    assert_eq!(before.buffer().by_event_type("query-started").len(), 1);
    assert_eq!(table.traces().buffer().by_event_type("query-started").len(), 2);
}

#[test]
fn callables_may_read_traces_mid_query() {
    let config = TableConfig::new(1).with_trace(TracerConfig::new().enabled());
    let table = Rc::new(RefCell::new(MatchTable::with_config(config).unwrap()));
    let weak = Rc::downgrade(&table);
    let seen = Callable::unary(move |_| {
        let table = weak.upgrade().ok_or_else(|| Error::custom("dropped"))?;
        let count = table.borrow().traces().buffer().len();
        Ok(Value::Int(i64::try_from(count).unwrap_or(-1)))
    });
    table.borrow_mut().when(..).unwrap().then(seen).unwrap();

    // rule-added, query-started, rule-tested, rule-matched
    assert_eq!(table.borrow().call1(0).unwrap(), Value::Int(4));
}
