// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test code readability over pedantic
#![allow(clippy::missing_panics_doc)] // Tests panic on failure
#![allow(clippy::too_many_lines)] // Test code

//! Null-path validation integration tests
//!
//! Exercises the validator through the public API on hand-built graphs.

use nullguard::path::render;
use nullguard::validate::{assert_no_nulls, find_null_paths, has_no_nulls};
use nullguard::value::{Level, Object, Record, SharedNode, Value};

fn rendered(value: &Value) -> Vec<String> {
    render(&find_null_paths(value))
}

#[test]
fn test_root_null() {
    assert_eq!(rendered(&Value::Null), vec!["root"]);
    assert!(!has_no_nulls(&Value::Null));
}

#[test]
fn test_sequence_reports_index() {
    let list = Value::List(vec![Value::from("a"), Value::Null, Value::from("b")]);
    assert_eq!(rendered(&list), vec!["root[1]"]);
}

#[test]
fn test_mapping_key_then_value_in_insertion_order() {
    let map = Value::Map(vec![
        (Value::Null, Value::from("x")),
        (Value::from("k"), Value::Null),
    ]);
    assert_eq!(rendered(&map), vec!["root.key[null]", "root[k]"]);
}

#[test]
fn test_all_violations_reported() {
    let record = Record::new("Order")
        .with("id", Value::Null)
        .with("lines", Value::List(vec![Value::Null, Value::from(1)]))
        .with(
            "meta",
            Record::new("Meta").with("author", Value::Null).with("rev", 2),
        );
    assert_eq!(
        rendered(&Value::Record(record)),
        vec!["root.id", "root.lines[0]", "root.meta.author"]
    );
}

#[test]
fn test_self_reference_terminates() {
    let node = SharedNode::new(Record::new("Node").with("name", "n").with("next", Value::Null));
    if let Value::Record(record) = &mut *node.write() {
        record.set("next", Value::Shared(node.clone()));
    }
    assert!(rendered(&Value::Shared(node.clone())).is_empty());

    // break the cycle so the test does not leak
    node.set(Value::Null);
}

#[test]
fn test_cycle_through_two_nodes_reports_null_once() {
    let a = SharedNode::new(Record::new("A").with("b", Value::Null).with("gap", Value::Null));
    let b = SharedNode::new(Record::new("B").with("a", Value::Shared(a.clone())));
    if let Value::Record(record) = &mut *a.write() {
        record.set("b", Value::Shared(b.clone()));
    }
    assert_eq!(rendered(&Value::Shared(a.clone())), vec!["root.gap"]);
    a.set(Value::Null);
}

#[test]
fn test_static_fields_never_inspected() {
    let object = Object::new("Settings")
        .field("name", "main")
        .static_field("INSTANCE", Value::Null)
        .extends(Level::new("Base").field("inherited", Value::Null));
    assert_eq!(rendered(&Value::Object(object)), vec!["root.inherited"]);
}

#[test]
fn test_opaque_leaves_checked_only_for_null() {
    let date = chrono::NaiveDate::from_ymd_opt(2024, 2, 29).expect("valid date");
    let record = Record::new("Event")
        .with("id", uuid::Uuid::from_u128(0x67e5_5044_10b1_426f_9247_bb68_0e5f_e0c8))
        .with("day", date)
        .with("link", Value::Null);
    assert_eq!(rendered(&Value::Record(record)), vec!["root.link"]);
}

#[test]
fn test_optional_is_transparent() {
    let record = Record::new("Profile")
        .with("nick", Value::none())
        .with("bio", Value::some(Value::Null))
        .with("tags", Value::some(Value::List(vec![Value::Null])));
    assert_eq!(
        rendered(&Value::Record(record)),
        vec!["root.bio", "root.tags[0]"]
    );
}

#[test]
fn test_assert_no_nulls_message() {
    let list = Value::List(vec![Value::Null, Value::from(1), Value::Null]);
    let err = assert_no_nulls(list).expect_err("nulls present");
    assert_eq!(err.to_string(), "Null value(s) found at: root[0], root[2]");

    let clean = Value::from(vec!["a", "b"]);
    assert_eq!(assert_no_nulls(clean.clone()).expect("clean"), clean);
}
