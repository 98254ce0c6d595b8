// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Descriptor-driven JSON decode engine.
//!
//! The [`Engine`] resolves a [`DecodeStep`] per declared type, caches it,
//! and lets registered [`Module`]s wrap or replace steps through
//! [`StepModifier`]s and per-category [`ConfigOverrides`].
//!
//! # Example
//!
//! ```rust
//! use nullguard::engine::Engine;
//! use nullguard::types::TypeDescriptorBuilder;
//! use std::sync::Arc;
//!
//! let desc = Arc::new(TypeDescriptorBuilder::new("Data").string_field("s").build());
//! let engine = Engine::new();
//! let value = engine.decode(r#"{"s":"value"}"#, &desc).unwrap();
//! assert_eq!(value.get("s").and_then(|v| v.as_str()), Some("value"));
//! ```

mod overrides;
mod steps;


pub use overrides::{ConfigOverrides, NullHandling, Nulls};
pub use steps::{
    from_json, AnyStep, ArrayStep, CustomStep, EnumStep, MapStep, ObjectStep, OpaqueStep,
    OptionalStep, PrimitiveStep, RecordStep, SequenceStep,
};

use crate::error::{DecodeError, NullsFound};
use crate::path::{Path, Segment};
use crate::types::{Category, TypeClassifier, TypeDescriptor, TypeKind};
use crate::value::Value;
use dashmap::DashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Raw decode input.
pub type Json = serde_json::Value;

/// One unit of decoding logic for a declared type.
pub trait DecodeStep: Send + Sync + fmt::Debug {
    /// Decode a non-null input.
    fn decode(&self, input: &Json, ctx: &DecodeContext<'_>) -> Result<Value, DecodeError>;

    /// Decode a non-null input into an existing value (merge).
    fn decode_into(
        &self,
        input: &Json,
        existing: Value,
        ctx: &DecodeContext<'_>,
    ) -> Result<Value, DecodeError> {
        let _ = existing;
        self.decode(input, ctx)
    }

    /// Decode an object key.
    fn decode_key(&self, key: &str, ctx: &DecodeContext<'_>) -> Result<Value, DecodeError> {
        self.decode(&Json::String(key.to_string()), ctx)
    }

    /// Value for an explicit JSON `null`.
    fn null_value(&self, ctx: &DecodeContext<'_>) -> Value {
        let _ = ctx;
        Value::Null
    }

    /// Value for a missing property.
    fn absent_value(&self, ctx: &DecodeContext<'_>) -> Value {
        self.null_value(ctx)
    }

    /// Empty instance of this type, if it has one.
    fn empty_value(&self, ctx: &DecodeContext<'_>) -> Option<Value> {
        let _ = ctx;
        None
    }
}

/// Wraps or replaces steps at resolution time.
pub trait StepModifier: Send + Sync {
    /// Return the step to use for `declared`, given the step resolved so far.
    fn modify(
        &self,
        declared: &Arc<TypeDescriptor>,
        category: Category,
        step: Arc<dyn DecodeStep>,
    ) -> Arc<dyn DecodeStep>;
}

/// Extension bundle applied to an [`Engine`].
pub trait Module: Send + Sync {
    /// Module name, for logging.
    fn name(&self) -> &str;

    /// Register modifiers and overrides.
    fn setup(&self, ctx: &mut SetupContext<'_>);
}

/// Registration surface handed to [`Module::setup`].
pub struct SetupContext<'a> {
    modifiers: &'a mut Vec<Arc<dyn StepModifier>>,
    overrides: &'a mut ConfigOverrides,
    classifier: &'a mut TypeClassifier,
}

impl SetupContext<'_> {
    /// Append a step modifier. Modifiers apply in registration order.
    pub fn add_step_modifier(&mut self, modifier: impl StepModifier + 'static) {
        self.modifiers.push(Arc::new(modifier));
    }

    /// Merge null handling for a category.
    pub fn set_null_handling(&mut self, category: Category, handling: NullHandling) {
        self.overrides.set_null_handling(category, handling);
    }

    /// Replace the type classifier.
    pub fn set_classifier(&mut self, classifier: TypeClassifier) {
        *self.classifier = classifier;
    }

    pub fn classifier(&self) -> &TypeClassifier {
        self.classifier
    }
}

/// Resolution and path state for one decode call.
pub struct DecodeContext<'a> {
    engine: &'a Engine,
    path: Path,
}

impl<'a> DecodeContext<'a> {
    fn new(engine: &'a Engine) -> Self {
        Self {
            engine,
            path: Path::root(),
        }
    }

    pub fn engine(&self) -> &'a Engine {
        self.engine
    }

    /// Location of the input being decoded.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Context for a nested input.
    pub fn child(&self, segment: Segment) -> DecodeContext<'a> {
        DecodeContext {
            engine: self.engine,
            path: self.path.push(segment),
        }
    }

    /// Resolve the step for a declared type.
    pub fn resolve(&self, declared: &Arc<TypeDescriptor>) -> Arc<dyn DecodeStep> {
        self.engine.resolve(declared)
    }

    /// Resolve once into `slot`, reusing the step afterwards.
    pub fn resolve_lazy<'s>(
        &self,
        slot: &'s OnceLock<Arc<dyn DecodeStep>>,
        declared: &Arc<TypeDescriptor>,
    ) -> &'s Arc<dyn DecodeStep> {
        slot.get_or_init(|| self.resolve(declared))
    }

    /// Decode a named slot (record component, object field).
    ///
    /// `None` means the property is missing from the input.
    pub fn decode_slot(
        &self,
        step: &dyn DecodeStep,
        category: Category,
        input: Option<&Json>,
    ) -> Result<Value, DecodeError> {
        match input {
            None => Ok(self.engine.substitute_empty(step, category, step.absent_value(self), self)),
            Some(Json::Null) => {
                if self.engine.overrides.value_nulls(category) == Some(Nulls::Fail) {
                    return Err(self.null_violation());
                }
                Ok(self.engine.substitute_empty(step, category, step.null_value(self), self))
            }
            Some(json) => step.decode(json, self),
        }
    }

    /// Decode a container element; `Ok(None)` when the null is skipped.
    pub fn decode_element(
        &self,
        step: &dyn DecodeStep,
        container: Category,
        input: &Json,
    ) -> Result<Option<Value>, DecodeError> {
        if !input.is_null() {
            return step.decode(input, self).map(Some);
        }
        match self.engine.overrides.content_nulls(container) {
            Some(Nulls::Skip) => Ok(None),
            Some(Nulls::Fail) => Err(self.null_violation()),
            Some(Nulls::AsEmpty) => Ok(Some(
                step.empty_value(self).unwrap_or_else(|| step.null_value(self)),
            )),
            Some(Nulls::Set) | None => Ok(Some(step.null_value(self))),
        }
    }

    /// Type mismatch error at the current path.
    pub fn mismatch(&self, expected: impl Into<String>, found: &Json) -> DecodeError {
        DecodeError::TypeMismatch {
            path: self.path.to_string(),
            expected: expected.into(),
            found: json_kind(found).to_string(),
        }
    }

    fn null_violation(&self) -> DecodeError {
        DecodeError::NullsFound(NullsFound::new(vec![self.path.clone()]))
    }
}

/// Short name of a JSON value's kind.
pub fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

/// Decode engine with a step cache and registered modules.
///
/// Steps are cached per descriptor allocation, not per type name, and an
/// entry lives until the next module registration or [`clear_cache`]. Build
/// each descriptor once and share its `Arc`: rebuilding an equal descriptor
/// for every call adds a new entry each time.
///
/// [`clear_cache`]: Engine::clear_cache
pub struct Engine {
    classifier: TypeClassifier,
    modifiers: Vec<Arc<dyn StepModifier>>,
    overrides: ConfigOverrides,
    modules: Vec<String>,
    // keyed by descriptor address; the Arc is kept so the address stays valid
    cache: DashMap<usize, (Arc<TypeDescriptor>, Arc<dyn DecodeStep>)>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("modules", &self.modules)
            .field("modifiers", &self.modifiers.len())
            .field("overrides", &self.overrides)
            .field("cached_steps", &self.cache.len())
            .finish()
    }
}

impl Engine {
    /// Engine with base steps only.
    pub fn new() -> Self {
        Self {
            classifier: TypeClassifier::default(),
            modifiers: Vec::new(),
            overrides: ConfigOverrides::new(),
            modules: Vec::new(),
            cache: DashMap::new(),
        }
    }

    /// Register a module (builder style).
    pub fn with_module(mut self, module: impl Module) -> Self {
        self.register_module(&module);
        self
    }

    /// Register a module. Invalidates cached steps.
    pub fn register_module(&mut self, module: &dyn Module) {
        let mut ctx = SetupContext {
            modifiers: &mut self.modifiers,
            overrides: &mut self.overrides,
            classifier: &mut self.classifier,
        };
        module.setup(&mut ctx);
        self.modules.push(module.name().to_string());
        self.cache.clear();
        tracing::debug!(
            module = module.name(),
            modifiers = self.modifiers.len(),
            "registered decode module"
        );
    }

    /// Names of registered modules.
    pub fn modules(&self) -> &[String] {
        &self.modules
    }

    pub fn classifier(&self) -> &TypeClassifier {
        &self.classifier
    }

    pub fn overrides(&self) -> &ConfigOverrides {
        &self.overrides
    }

    /// Number of cached steps.
    pub fn cached_steps(&self) -> usize {
        self.cache.len()
    }

    /// Drop every cached step, releasing the descriptors they hold.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Resolve (and cache) the step for a declared type.
    ///
    /// The cache key is the address of `declared`, so only clones of the
    /// same `Arc` hit an existing entry.
    pub fn resolve(&self, declared: &Arc<TypeDescriptor>) -> Arc<dyn DecodeStep> {
        if let TypeKind::Nested(inner) = &declared.kind {
            return self.resolve(inner);
        }

        let key = Arc::as_ptr(declared) as usize;
        if let Some(entry) = self.cache.get(&key) {
            return entry.1.clone();
        }

        let category = self.classifier.classify_declared(declared);
        let mut step = steps::base_step(declared);
        for modifier in &self.modifiers {
            step = modifier.modify(declared, category, step);
        }
        tracing::debug!(type_name = %declared.name, ?category, "resolved decode step");

        self.cache
            .entry(key)
            .or_insert_with(|| (declared.clone(), step))
            .1
            .clone()
    }

    /// Parse and decode a JSON document.
    pub fn decode(&self, input: &str, declared: &Arc<TypeDescriptor>) -> Result<Value, DecodeError> {
        let json: Json = serde_json::from_str(input)?;
        self.decode_json(&json, declared)
    }

    /// Decode an already parsed JSON value.
    pub fn decode_json(
        &self,
        input: &Json,
        declared: &Arc<TypeDescriptor>,
    ) -> Result<Value, DecodeError> {
        let step = self.resolve(declared);
        let ctx = DecodeContext::new(self);
        if input.is_null() {
            return Ok(step.null_value(&ctx));
        }
        step.decode(input, &ctx)
    }

    /// Parse a JSON document and merge it into `existing`.
    pub fn decode_into(
        &self,
        input: &str,
        existing: Value,
        declared: &Arc<TypeDescriptor>,
    ) -> Result<Value, DecodeError> {
        let json: Json = serde_json::from_str(input)?;
        let step = self.resolve(declared);
        let ctx = DecodeContext::new(self);
        if json.is_null() {
            return Ok(step.null_value(&ctx));
        }
        step.decode_into(&json, existing, &ctx)
    }

    /// What a missing property of type `declared` decodes to.
    pub fn absent_value_for(&self, declared: &Arc<TypeDescriptor>) -> Value {
        let step = self.resolve(declared);
        let ctx = DecodeContext::new(self);
        let category = self.classifier.classify_declared(declared);
        self.substitute_empty(step.as_ref(), category, step.absent_value(&ctx), &ctx)
    }

    fn substitute_empty(
        &self,
        step: &dyn DecodeStep,
        category: Category,
        value: Value,
        ctx: &DecodeContext<'_>,
    ) -> Value {
        if value.is_null() && self.overrides.value_nulls(category) == Some(Nulls::AsEmpty) {
            if let Some(empty) = step.empty_value(ctx) {
                return empty;
            }
        }
        value
    }
}
