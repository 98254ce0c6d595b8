// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test code readability over pedantic
#![allow(clippy::missing_panics_doc)] // Tests panic on failure
#![allow(clippy::too_many_lines)] // Test code

//! Decode pipeline integration tests
//!
//! Runs JSON through the engine with the no-nulls module under the
//! different configuration toggles, then checks the outcome layer.

use nullguard::config::{EmptyCollectionInOptional, PipelineConfig};
use nullguard::engine::Engine;
use nullguard::filter::NoNullsModule;
use nullguard::outcome::{Outcome, OutcomeResolver};
use nullguard::types::{TypeDescriptor, TypeDescriptorBuilder};
use nullguard::validate::find_null_paths;
use nullguard::value::Value;
use std::io::Write;
use std::sync::Arc;

fn string() -> Arc<TypeDescriptor> {
    Arc::new(TypeDescriptor::string())
}

fn basket() -> Arc<TypeDescriptor> {
    Arc::new(
        TypeDescriptorBuilder::new("Basket")
            .string_field("owner")
            .list_field("items", string())
            .map_field("labels", string(), string())
            .optional_field("note", string())
            .build(),
    )
}

fn engine(config: PipelineConfig) -> Engine {
    Engine::new().with_module(NoNullsModule::new(config))
}

/// Decode `{}` and `{"items":[null,"a"]}`, returning the two `items` values.
fn items_under(config: PipelineConfig) -> (Value, Value) {
    let e = engine(config);
    let missing = e.decode(r#"{"owner":"o"}"#, &basket()).expect("decode missing");
    let present = e
        .decode(r#"{"owner":"o","items":[null,"a"]}"#, &basket())
        .expect("decode present");
    (
        missing.get("items").cloned().unwrap_or(Value::Null),
        present.get("items").cloned().unwrap_or(Value::Null),
    )
}

#[test]
fn test_absent_policy_and_filter_both_on() {
    let (missing, present) = items_under(PipelineConfig::default());
    assert_eq!(missing, Value::List(vec![]));
    assert_eq!(present, Value::from(vec!["a"]));
}

#[test]
fn test_absent_policy_and_filter_both_off() {
    let (missing, present) = items_under(PipelineConfig::default().disable_all());
    assert_eq!(missing, Value::Null);
    assert_eq!(present, Value::List(vec![Value::Null, Value::from("a")]));
}

#[test]
fn test_absent_policy_only() {
    let config = PipelineConfig::default()
        .disable_all()
        .treat_absent_collections_as_empty(true);
    let (missing, present) = items_under(config);
    assert_eq!(missing, Value::List(vec![]));
    assert_eq!(present, Value::List(vec![Value::Null, Value::from("a")]));
}

#[test]
fn test_filter_only() {
    let config = PipelineConfig::default()
        .disable_all()
        .filter_nulls_in_collections(true);
    let (missing, present) = items_under(config);
    assert_eq!(missing, Value::Null);
    assert_eq!(present, Value::from(vec!["a"]));
}

#[test]
fn test_explicit_null_collection_follows_absent_policy() {
    let input = r#"{"owner":"o","items":null,"labels":null}"#;

    let value = engine(PipelineConfig::default())
        .decode(input, &basket())
        .expect("decode");
    assert_eq!(value.get("items"), Some(&Value::List(vec![])));
    assert_eq!(value.get("labels"), Some(&Value::Map(vec![])));

    let value = engine(PipelineConfig::default().treat_absent_collections_as_empty(false))
        .decode(input, &basket())
        .expect("decode");
    assert_eq!(value.get("items"), Some(&Value::Null));
    assert_eq!(value.get("labels"), Some(&Value::Null));
}

#[test]
fn test_sanitized_output_has_no_nulls() {
    let value = engine(PipelineConfig::default())
        .decode(
            r#"{"owner":"o","items":[null,"",null],"labels":{"a":null," ":"b"},"note":" "}"#,
            &basket(),
        )
        .expect("decode");
    assert!(find_null_paths(&value).is_empty());
    assert_eq!(
        value.get("labels"),
        Some(&Value::Map(vec![(Value::from(" "), Value::from("b"))]))
    );
    assert_eq!(value.get("note"), Some(&Value::none()));
}

#[test]
fn test_null_inside_map_of_optionals_is_kept_as_empty() {
    let opt = Arc::new(TypeDescriptor::optional(string()));
    let map = Arc::new(TypeDescriptor::map(string(), opt));
    let value = engine(PipelineConfig::default())
        .decode(r#"{"k":null,"v":"x"}"#, &map)
        .expect("decode");
    assert_eq!(
        value,
        Value::Map(vec![
            (Value::from("k"), Value::none()),
            (Value::from("v"), Value::some("x")),
        ])
    );
    assert!(find_null_paths(&value).is_empty());
}

#[test]
fn test_optional_list_policy_from_toml() {
    let desc = Arc::new(
        TypeDescriptorBuilder::new("Tagged")
            .optional_field("tags", Arc::new(TypeDescriptor::list(string())))
            .build(),
    );

    let config = PipelineConfig::from_toml_str(r#"empty_collection_in_optional = "treat_as_absent""#)
        .expect("valid config");
    assert_eq!(
        config.empty_collection_in_optional,
        EmptyCollectionInOptional::TreatAsAbsent
    );
    let value = engine(config)
        .decode(r#"{"tags":[null]}"#, &desc)
        .expect("decode");
    assert_eq!(value.get("tags"), Some(&Value::none()));
}

#[test]
fn test_outcome_scenarios() {
    let desc = Arc::new(TypeDescriptorBuilder::new("Data").string_field("s").build());
    let resolver = OutcomeResolver::from_config(PipelineConfig::default());

    match resolver.resolve(r#"{"s":"value"}"#, &desc) {
        Outcome::Success(value) => {
            assert_eq!(value.get("s").and_then(|v| v.as_str()), Some("value"));
        }
        other => panic!("expected success, got {:?}", other),
    }

    assert!(matches!(
        resolver.resolve(r#"{s:"value"}"#, &desc),
        Outcome::MalformedInput(_)
    ));

    match resolver.resolve(r#"{"s":null}"#, &desc) {
        Outcome::NullViolation(nulls) => {
            let paths: Vec<String> = nulls.paths().iter().map(ToString::to_string).collect();
            assert_eq!(paths, vec!["root.s"]);
        }
        other => panic!("expected null violation, got {:?}", other),
    }
}

#[test]
fn test_strict_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "fail_on_any_null_in_graph = true").expect("write config");

    let config = PipelineConfig::from_file(file.path()).expect("load config");
    assert!(config.fail_on_any_null_in_graph);
    assert!(config.filter_nulls_in_collections);

    let err = engine(config)
        .decode(r#"{"items":["a"]}"#, &basket())
        .expect_err("owner missing");
    assert!(err.is_null_violation());
    assert_eq!(err.to_string(), "Null value(s) found at: root.owner");
}

#[test]
fn test_engine_shared_across_threads() {
    let e = Arc::new(engine(PipelineConfig::default()));
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let e = Arc::clone(&e);
            std::thread::spawn(move || {
                let input = format!(r#"{{"owner":"o{}","items":[null,"x"]}}"#, i);
                e.decode(&input, &basket()).expect("decode")
            })
        })
        .collect();

    for handle in handles {
        let value = handle.join().expect("thread");
        assert_eq!(value.get("items"), Some(&Value::from(vec!["x"])));
    }
}
