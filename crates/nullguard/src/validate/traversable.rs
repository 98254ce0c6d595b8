// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Handler for plugged-in container types that expose a [`Traversal`] view.

use super::registry::{Recurse, TypeHandler, VisitedSet};
use crate::path::Path;
use crate::value::{Traversal, Value};

/// Walks custom sequences, mappings and boxes by their traversal view.
///
/// Mapping keys are reported by position (`.key[0]`), since keys of
/// persistent maps need not have a meaningful string form; values by key.
#[derive(Debug, Clone)]
pub struct TraversableHandler {
    prefixes: Vec<String>,
}

impl TraversableHandler {
    /// Claim custom types whose name starts with any of `prefixes`.
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }
}

impl TypeHandler for TraversableHandler {
    fn name(&self) -> &str {
        "traversable"
    }

    fn can_handle(&self, type_name: &str) -> bool {
        self.prefixes.iter().any(|p| type_name.starts_with(p.as_str()))
    }

    fn validate(
        &self,
        value: &Value,
        path: &Path,
        visited: &mut VisitedSet,
        sink: &mut Vec<Path>,
        recurse: &Recurse<'_>,
    ) {
        let Value::Custom(custom) = value else {
            for (name, member) in super::members(value) {
                recurse(member, &path.field(name), visited, sink);
            }
            return;
        };

        match custom.traversal() {
            Some(Traversal::Sequence(items)) => {
                for (i, item) in items.into_iter().enumerate() {
                    recurse(item, &path.index(i), visited, sink);
                }
            }
            Some(Traversal::Mapping(entries)) => {
                for (i, (key, item)) in entries.into_iter().enumerate() {
                    recurse(key, &path.key_marker(i), visited, sink);
                    recurse(item, &path.key(key), visited, sink);
                }
            }
            Some(Traversal::Boxed(Some(inner))) => recurse(inner, path, visited, sink),
            Some(Traversal::Boxed(None)) => {}
            None => {
                for (name, member) in custom.fields() {
                    recurse(member, &path.field(name), visited, sink);
                }
            }
        }
    }
}
