// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Pluggable type handlers and the process-wide handler registry.

use crate::path::Path;
use crate::value::{NodeId, Value};
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, OnceLock};
use thiserror::Error;

static GLOBAL_REGISTRY: OnceLock<Arc<TypeHandlerRegistry>> = OnceLock::new();

/// Identities of shared nodes already visited during one validation call.
#[derive(Debug, Default)]
pub struct VisitedSet {
    ids: HashSet<NodeId>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a node. Returns `false` if it was already visited.
    pub fn insert(&mut self, id: NodeId) -> bool {
        self.ids.insert(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Callback re-entering the validator for a nested value.
pub type Recurse<'r> = dyn Fn(&Value, &Path, &mut VisitedSet, &mut Vec<Path>) + 'r;

/// Handler for types the built-in categories do not cover.
///
/// Handlers are consulted before built-in category handling, in
/// registration order. This includes leaves: a handler claiming an opaque
/// or terminal type name sees those values too. A handler that claims a
/// value owns its traversal and must pass nested values to `recurse` so they
/// share cycle detection.
pub trait TypeHandler: Send + Sync {
    /// Handler name, for logging.
    fn name(&self) -> &str;

    /// Check whether this handler claims values of `type_name`.
    fn can_handle(&self, type_name: &str) -> bool;

    /// Validate a claimed value, pushing violating paths into `sink`.
    fn validate(
        &self,
        value: &Value,
        path: &Path,
        visited: &mut VisitedSet,
        sink: &mut Vec<Path>,
        recurse: &Recurse<'_>,
    );
}

/// Errors installing the process-wide registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InstallError {
    #[error("Type handler registry is already installed")]
    AlreadyInstalled,
}

/// Ordered set of type handlers.
#[derive(Default, Clone)]
pub struct TypeHandlerRegistry {
    handlers: Vec<Arc<dyn TypeHandler>>,
}

impl TypeHandlerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler.
    pub fn register(&mut self, handler: Arc<dyn TypeHandler>) {
        tracing::debug!(handler = handler.name(), "registering type handler");
        self.handlers.push(handler);
    }

    /// Append a handler (builder style).
    pub fn with(mut self, handler: impl TypeHandler + 'static) -> Self {
        self.register(Arc::new(handler));
        self
    }

    /// First handler claiming `type_name`.
    pub fn first_matching(&self, type_name: &str) -> Option<&Arc<dyn TypeHandler>> {
        self.handlers.iter().find(|h| h.can_handle(type_name))
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` if no handlers are registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for TypeHandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.handlers.iter().map(|h| h.name()))
            .finish()
    }
}

/// Install the process-wide registry. Must run before the first validation
/// that uses it; afterwards the registry is read-only.
pub fn install_handlers(registry: TypeHandlerRegistry) -> Result<(), InstallError> {
    let count = registry.len();
    GLOBAL_REGISTRY
        .set(Arc::new(registry))
        .map_err(|_| InstallError::AlreadyInstalled)?;
    tracing::debug!(handlers = count, "installed global type handler registry");
    Ok(())
}

/// Process-wide registry (empty unless [`install_handlers`] ran first).
pub fn global_registry() -> Arc<TypeHandlerRegistry> {
    GLOBAL_REGISTRY
        .get_or_init(|| Arc::new(TypeHandlerRegistry::new()))
        .clone()
}
