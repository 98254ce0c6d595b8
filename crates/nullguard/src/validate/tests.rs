// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::*;
use crate::path::render;
use crate::types::OpaqueTypes;
use crate::value::{CustomValue, Level, MemberKind, Object, Record, SharedNode, Traversal};
use std::any::Any;

fn validator() -> NullPathValidator {
    NullPathValidator::with_registry(TypeHandlerRegistry::new())
}

fn paths(value: &Value) -> Vec<String> {
    render(&validator().find_null_paths(value))
}

/// Persistent-vector stand-in.
#[derive(Debug)]
struct PVec(Vec<Value>);

impl CustomValue for PVec {
    fn type_name(&self) -> &str {
        "persistent::Vector"
    }

    fn traversal(&self) -> Option<Traversal<'_>> {
        Some(Traversal::Sequence(self.0.iter().collect()))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Persistent-map stand-in.
#[derive(Debug)]
struct PMap(Vec<(Value, Value)>);

impl CustomValue for PMap {
    fn type_name(&self) -> &str {
        "persistent::HashMap"
    }

    fn traversal(&self) -> Option<Traversal<'_>> {
        Some(Traversal::Mapping(self.0.iter().map(|(k, v)| (k, v)).collect()))
    }

    fn fields(&self) -> Vec<(&str, &Value)> {
        vec![]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Lazy-value stand-in with a reflected field and no traversal view.
#[derive(Debug)]
struct Lazy {
    computed: Value,
}

impl CustomValue for Lazy {
    fn type_name(&self) -> &str {
        "persistent::Lazy"
    }

    fn fields(&self) -> Vec<(&str, &Value)> {
        vec![("computed", &self.computed)]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[test]
fn test_root_null() {
    assert_eq!(paths(&Value::Null), vec!["root"]);
}

#[test]
fn test_clean_values() {
    assert!(paths(&Value::from("x")).is_empty());
    assert!(paths(&Value::List(vec![])).is_empty());
    assert!(validator().has_no_nulls(&Value::from(vec!["a", "b"])));
}

#[test]
fn test_sequence_index_counts_all_elements() {
    let list = Value::List(vec![Value::from("a"), Value::Null, Value::from("b"), Value::Null]);
    assert_eq!(paths(&list), vec!["root[1]", "root[3]"]);

    let set = Value::Set(vec![Value::Null]);
    assert_eq!(paths(&set), vec!["root[0]"]);

    let array = Value::Array(vec![Value::from(1i32), Value::Null]);
    assert_eq!(paths(&array), vec!["root[1]"]);
}

#[test]
fn test_mapping_key_then_value() {
    let map = Value::Map(vec![
        (Value::Null, Value::from("x")),
        (Value::from("k"), Value::Null),
    ]);
    assert_eq!(paths(&map), vec!["root.key[null]", "root[k]"]);
}

#[test]
fn test_record_fields_in_declaration_order() {
    let record = Value::Record(
        Record::new("Data")
            .with("b", Value::Null)
            .with("a", Value::Null)
            .with("c", "ok"),
    );
    assert_eq!(paths(&record), vec!["root.b", "root.a"]);
}

#[test]
fn test_optional_is_path_transparent() {
    let inner = Record::new("Inner").with("inner_field", Value::Null);
    let outer = Value::Record(Record::new("Outer").with("field", Value::some(inner)));
    assert_eq!(paths(&outer), vec!["root.field.inner_field"]);

    let empty = Value::Record(Record::new("Outer").with("field", Value::none()));
    assert!(paths(&empty).is_empty());
}

#[test]
fn test_nested_paths() {
    let value = Value::Record(Record::new("Data").with(
        "rows",
        Value::List(vec![Value::Map(vec![(Value::from("k"), Value::List(vec![Value::Null]))])]),
    ));
    assert_eq!(paths(&value), vec!["root.rows[0][k][0]"]);
}

#[test]
fn test_self_reference_terminates() {
    let node = SharedNode::new(Value::Null);
    node.set(Record::new("Node").with("me", Value::Shared(node.clone())).with("s", "v"));

    assert!(paths(&Value::Shared(node.clone())).is_empty());

    node.set(Value::Null);
}

#[test]
fn test_cycle_with_null_reports_once() {
    let a = SharedNode::new(Value::Null);
    let b = SharedNode::new(
        Record::new("B")
            .with("back", Value::Shared(a.clone()))
            .with("missing", Value::Null),
    );
    a.set(Record::new("A").with("next", Value::Shared(b.clone())));

    assert_eq!(paths(&Value::Shared(a.clone())), vec!["root.next.missing"]);

    a.set(Value::Null);
}

#[test]
fn test_shared_substructure_validated_once() {
    let shared = SharedNode::new(Record::new("Leaf").with("x", Value::Null));
    let value = Value::List(vec![Value::Shared(shared.clone()), Value::Shared(shared)]);
    assert_eq!(paths(&value), vec!["root[0].x"]);
}

#[test]
fn test_static_and_synthetic_members_ignored() {
    let obj = Object::new("app::Pojo")
        .field("name", "n")
        .static_field("INSTANCE", Value::Null)
        .member("outer", MemberKind::Synthetic, Value::Null);
    assert!(paths(&Value::Object(obj)).is_empty());
}

#[test]
fn test_inherited_fields_most_derived_first() {
    let obj = Object::new("app::Child")
        .field("child", Value::Null)
        .extends(Level::new("app::Parent").field("parent", Value::Null))
        .extends(Level::new("app::Base").field("base", "ok"));
    assert_eq!(paths(&Value::Object(obj)), vec!["root.child", "root.parent"]);
}

#[test]
fn test_opaque_leaves_not_traversed() {
    let odd_uuid = Value::Object(Object::new("uuid::Uuid").field("high", Value::Null));
    let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 31).expect("date");
    let record = Value::Record(
        Record::new("Data")
            .with("id", odd_uuid)
            .with("when", date)
            .with("link", url::Url::parse("https://example.org").expect("url"))
            .with("missing_id", Value::Null),
    );
    assert_eq!(paths(&record), vec!["root.missing_id"]);
}

#[test]
fn test_non_allow_listed_library_object_is_walked() {
    let obj = Value::Object(Object::new("thirdparty::Money").field("currency", Value::Null));
    assert_eq!(paths(&obj), vec!["root.currency"]);

    let widened = NullPathValidator::new(
        Arc::new(TypeHandlerRegistry::new()),
        TypeClassifier::new(OpaqueTypes::default().with_prefix("thirdparty::")),
    );
    assert!(widened.find_null_paths(&obj).is_empty());
}

#[test]
fn test_enum_is_leaf() {
    let e = Value::Enum(crate::value::EnumValue::new("Color", "Red"));
    assert!(paths(&e).is_empty());
}

#[test]
fn test_custom_without_handler_uses_fields() {
    let seq = Value::Custom(Arc::new(PVec(vec![Value::Null])));
    // no traversal handler: reflected fields only, and PVec exposes none
    assert!(paths(&seq).is_empty());

    let lazy = Value::Custom(Arc::new(Lazy {
        computed: Value::Null,
    }));
    assert_eq!(paths(&lazy), vec!["root.computed"]);
}

#[test]
fn test_traversable_handler() {
    let registry =
        TypeHandlerRegistry::new().with(TraversableHandler::new(["persistent::"]));
    let v = NullPathValidator::with_registry(registry);

    let seq = Value::Custom(Arc::new(PVec(vec![Value::from("a"), Value::Null])));
    assert_eq!(render(&v.find_null_paths(&seq)), vec!["root[1]"]);

    let map = Value::Custom(Arc::new(PMap(vec![
        (Value::from("a"), Value::from("x")),
        (Value::Null, Value::from("y")),
        (Value::from("c"), Value::Null),
    ])));
    assert_eq!(
        render(&v.find_null_paths(&map)),
        vec!["root.key[1]", "root[c]"]
    );

    let lazy = Value::Custom(Arc::new(Lazy {
        computed: Value::List(vec![Value::Null]),
    }));
    assert_eq!(render(&v.find_null_paths(&lazy)), vec!["root.computed[0]"]);
}

#[test]
fn test_handler_runs_before_builtin_categories() {
    struct Silence;

    impl TypeHandler for Silence {
        fn name(&self) -> &str {
            "silence"
        }

        fn can_handle(&self, type_name: &str) -> bool {
            type_name == "Ignored"
        }

        fn validate(
            &self,
            _value: &Value,
            _path: &Path,
            _visited: &mut VisitedSet,
            _sink: &mut Vec<Path>,
            _recurse: &Recurse<'_>,
        ) {
        }
    }

    let v = NullPathValidator::with_registry(TypeHandlerRegistry::new().with(Silence));
    let value = Value::Record(
        Record::new("Outer")
            .with("ignored", Record::new("Ignored").with("x", Value::Null))
            .with("kept", Record::new("Kept").with("x", Value::Null)),
    );
    assert_eq!(render(&v.find_null_paths(&value)), vec!["root.kept.x"]);
}

#[test]
fn test_handler_claims_opaque_leaf_types() {
    /// Treats the nil UUID as a missing identifier.
    struct NilUuid;

    impl TypeHandler for NilUuid {
        fn name(&self) -> &str {
            "nil-uuid"
        }

        fn can_handle(&self, type_name: &str) -> bool {
            type_name.starts_with("uuid::")
        }

        fn validate(
            &self,
            value: &Value,
            path: &Path,
            _visited: &mut VisitedSet,
            sink: &mut Vec<Path>,
            _recurse: &Recurse<'_>,
        ) {
            let zero = Value::from(0u64);
            if value.get("high") == Some(&zero) && value.get("low") == Some(&zero) {
                sink.push(path.clone());
            }
        }
    }

    let record = Value::Record(
        Record::new("Order")
            .with("id", uuid::Uuid::nil())
            .with("owner", uuid::Uuid::from_u128(0x1234_5678))
            .with("note", Value::Null),
    );
    assert_eq!(paths(&record), vec!["root.note"]);

    let v = NullPathValidator::with_registry(TypeHandlerRegistry::new().with(NilUuid));
    assert_eq!(render(&v.find_null_paths(&record)), vec!["root.id", "root.note"]);
}

#[test]
fn test_assert_no_nulls() {
    let v = validator();
    let clean = Value::from(vec!["a"]);
    assert_eq!(v.assert_no_nulls(clean.clone()), Ok(clean.clone()));
    assert_eq!(v.when_no_nulls(clean.clone()), Some(clean));

    let dirty = Value::Record(Record::new("D").with("a", Value::Null).with("b", Value::Null));
    let err = v.assert_no_nulls(dirty.clone()).expect_err("nulls");
    assert_eq!(err.paths().len(), 2);
    assert_eq!(err.to_string(), "Null value(s) found at: root.a, root.b");
    assert_eq!(v.when_no_nulls(dirty), None);
}

#[test]
fn test_visited_set_is_per_call() {
    let shared = SharedNode::new(Record::new("Leaf").with("x", Value::Null));
    let value = Value::Shared(shared);
    let v = validator();
    assert_eq!(v.find_null_paths(&value).len(), 1);
    assert_eq!(v.find_null_paths(&value).len(), 1);
}

#[test]
#[should_panic(expected = "exclusively locked")]
fn test_locked_node_is_fatal() {
    let node = SharedNode::new("x");
    let _guard = node.write();
    let _ = validator().find_null_paths(&Value::Shared(node.clone()));
}
