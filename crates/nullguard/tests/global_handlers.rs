// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::missing_panics_doc)] // Tests panic on failure

//! Process-wide handler registry integration test
//!
//! Kept in its own test binary: the registry can be installed only once
//! per process.

use nullguard::path::render;
use nullguard::validate::{
    find_null_paths, global_registry, install_handlers, InstallError, TraversableHandler,
    TypeHandlerRegistry,
};
use nullguard::value::{CustomValue, Record, Traversal, Value};
use std::any::Any;
use std::sync::Arc;

#[derive(Debug)]
struct Queue(Vec<Value>);

impl CustomValue for Queue {
    fn type_name(&self) -> &str {
        "immutable::Queue"
    }

    fn traversal(&self) -> Option<Traversal<'_>> {
        Some(Traversal::Sequence(self.0.iter().collect()))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[test]
fn test_installed_handlers_drive_module_level_functions() {
    install_handlers(TypeHandlerRegistry::new().with(TraversableHandler::new(["immutable::"])))
        .expect("first install");
    assert_eq!(global_registry().len(), 1);

    let queue: Arc<dyn CustomValue> = Arc::new(Queue(vec![Value::from(1), Value::Null]));
    let record = Record::new("Job").with("pending", Value::Custom(queue));
    assert_eq!(
        render(&find_null_paths(&Value::Record(record))),
        vec!["root.pending[1]"]
    );

    let again = install_handlers(TypeHandlerRegistry::new());
    assert!(matches!(again, Err(InstallError::AlreadyInstalled)));
    assert_eq!(global_registry().len(), 1);
}
