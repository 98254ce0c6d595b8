// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Null-path validation over value graphs.
//!
//! [`NullPathValidator`] walks a [`Value`] depth-first and reports the path
//! of every null it meets. Shared and custom nodes are visited at most once
//! per call, so cyclic graphs terminate; a node reached a second time is
//! skipped without reporting anything.
//!
//! # Example
//!
//! ```rust
//! use nullguard::validate::find_null_paths;
//! use nullguard::value::Value;
//!
//! let list = Value::List(vec![Value::from("a"), Value::Null, Value::from("b")]);
//! let paths = find_null_paths(&list);
//! assert_eq!(paths, vec!["root[1]"]);
//! ```

mod registry;
mod traversable;

#[cfg(test)]
mod tests;

pub use registry::{
    global_registry, install_handlers, InstallError, Recurse, TypeHandler, TypeHandlerRegistry,
    VisitedSet,
};
pub use traversable::TraversableHandler;

use crate::error::NullsFound;
use crate::path::Path;
use crate::types::{Category, TypeClassifier};
use crate::value::Value;
use std::sync::Arc;

/// Recursive, cycle-safe null finder.
#[derive(Debug, Clone)]
pub struct NullPathValidator {
    registry: Arc<TypeHandlerRegistry>,
    classifier: TypeClassifier,
}

impl Default for NullPathValidator {
    fn default() -> Self {
        Self::new(global_registry(), TypeClassifier::default())
    }
}

impl NullPathValidator {
    /// Create a validator with an explicit registry and classifier.
    pub fn new(registry: Arc<TypeHandlerRegistry>, classifier: TypeClassifier) -> Self {
        Self {
            registry,
            classifier,
        }
    }

    /// Create a validator with an explicit registry and the default classifier.
    pub fn with_registry(registry: TypeHandlerRegistry) -> Self {
        Self::new(Arc::new(registry), TypeClassifier::default())
    }

    /// Classifier in use.
    pub fn classifier(&self) -> &TypeClassifier {
        &self.classifier
    }

    /// Every path holding a null, in traversal order.
    pub fn find_null_paths(&self, value: &Value) -> Vec<Path> {
        let mut visited = VisitedSet::new();
        let mut sink = Vec::new();
        self.walk(value, &Path::root(), &mut visited, &mut sink);
        tracing::trace!(
            violations = sink.len(),
            visited = visited.len(),
            "null path validation finished"
        );
        sink
    }

    /// Check a value without taking ownership.
    pub fn check(&self, value: &Value) -> Result<(), NullsFound> {
        let paths = self.find_null_paths(value);
        if paths.is_empty() {
            Ok(())
        } else {
            Err(NullsFound::new(paths))
        }
    }

    /// Return the value if it holds no nulls.
    pub fn assert_no_nulls(&self, value: Value) -> Result<Value, NullsFound> {
        self.check(&value)?;
        Ok(value)
    }

    /// Check if a value holds no nulls.
    pub fn has_no_nulls(&self, value: &Value) -> bool {
        self.find_null_paths(value).is_empty()
    }

    /// `Some(value)` if it holds no nulls.
    pub fn when_no_nulls(&self, value: Value) -> Option<Value> {
        self.has_no_nulls(&value).then_some(value)
    }

    fn walk(&self, value: &Value, path: &Path, visited: &mut VisitedSet, sink: &mut Vec<Path>) {
        if value.is_null() {
            sink.push(path.clone());
            return;
        }

        if let Some(id) = value.node_id() {
            if !visited.insert(id) {
                return;
            }
        }

        if let Value::Shared(node) = value {
            let Some(inner) = node.try_read() else {
                panic!("shared node at {} is exclusively locked during validation", path);
            };
            self.walk(&inner, path, visited, sink);
            return;
        }

        if let Some(handler) = self.registry.first_matching(&value.type_name()) {
            tracing::trace!(handler = handler.name(), %path, "delegating to type handler");
            let recurse = |v: &Value, p: &Path, vis: &mut VisitedSet, s: &mut Vec<Path>| {
                self.walk(v, p, vis, s)
            };
            handler.validate(value, path, visited, sink, &recurse);
            return;
        }

        let category = self.classifier.classify(value, None);
        if category.is_leaf() {
            return;
        }

        match category {
            Category::Terminal | Category::Enumeration | Category::OpaqueLeaf => {}
            Category::OptionalBox => {
                if let Some(Some(inner)) = value.as_optional() {
                    self.walk(inner, path, visited, sink);
                }
            }
            Category::OrderedSequence | Category::UnorderedSequence | Category::Array => {
                for (i, item) in value.as_elements().unwrap_or_default().iter().enumerate() {
                    self.walk(item, &path.index(i), visited, sink);
                }
            }
            Category::Mapping => {
                for (key, item) in value.as_entries().unwrap_or_default() {
                    self.walk(key, &path.key_marker(key), visited, sink);
                    self.walk(item, &path.key(key), visited, sink);
                }
            }
            Category::Record | Category::Object | Category::Custom => {
                for (name, member) in members(value) {
                    self.walk(member, &path.field(name), visited, sink);
                }
            }
        }
    }
}

/// Named members of records, objects (instance fields only) and custom values.
pub(crate) fn members(value: &Value) -> Vec<(&str, &Value)> {
    match value {
        Value::Record(record) => record
            .fields
            .iter()
            .map(|(name, v)| (name.as_str(), v))
            .collect(),
        Value::Object(object) => object.instance_members().collect(),
        Value::Custom(custom) => custom.fields(),
        _ => Vec::new(),
    }
}

/// [`NullPathValidator::find_null_paths`] with the global registry.
pub fn find_null_paths(value: &Value) -> Vec<Path> {
    NullPathValidator::default().find_null_paths(value)
}

/// [`NullPathValidator::assert_no_nulls`] with the global registry.
pub fn assert_no_nulls(value: Value) -> Result<Value, NullsFound> {
    NullPathValidator::default().assert_no_nulls(value)
}

/// [`NullPathValidator::has_no_nulls`] with the global registry.
pub fn has_no_nulls(value: &Value) -> bool {
    NullPathValidator::default().has_no_nulls(value)
}

/// [`NullPathValidator::when_no_nulls`] with the global registry.
pub fn when_no_nulls(value: Value) -> Option<Value> {
    NullPathValidator::default().when_no_nulls(value)
}
