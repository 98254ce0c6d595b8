// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Three-way decode results.
//!
//! [`OutcomeResolver`] decodes input with an [`Engine`] and then runs the
//! null-path validator over the result, so a [`Outcome::Success`] never
//! holds a null anywhere in its graph.
//!
//! # Example
//!
//! ```rust
//! use nullguard::outcome::{Outcome, OutcomeResolver};
//! use nullguard::types::TypeDescriptorBuilder;
//! use std::sync::Arc;
//!
//! let desc = Arc::new(TypeDescriptorBuilder::new("Data").string_field("s").build());
//! let resolver = OutcomeResolver::default();
//!
//! assert!(resolver.resolve(r#"{"s":"value"}"#, &desc).is_success());
//! assert!(matches!(resolver.resolve(r#"{s:"value"}"#, &desc), Outcome::MalformedInput(_)));
//! assert!(matches!(resolver.resolve(r#"{"s":null}"#, &desc), Outcome::NullViolation(_)));
//! ```

use crate::config::PipelineConfig;
use crate::engine::Engine;
use crate::error::{DecodeError, NullsFound};
use crate::filter::NoNullsModule;
use crate::types::TypeDescriptor;
use crate::validate::{global_registry, NullPathValidator};
use crate::value::Value;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Result of a strict decode.
#[derive(Debug)]
pub enum Outcome<T> {
    /// Decoded and free of nulls.
    Success(T),
    /// Input could not be decoded into the declared shape.
    MalformedInput(DecodeError),
    /// Input decoded but the graph holds nulls.
    NullViolation(NullsFound),
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// The success value, if any.
    pub fn to_optional_success(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            Self::MalformedInput(_) | Self::NullViolation(_) => None,
        }
    }

    /// Borrow the success value, if any.
    pub fn success(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            Self::MalformedInput(_) | Self::NullViolation(_) => None,
        }
    }

    /// Map the success value; failures pass through.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Success(value) => Outcome::Success(f(value)),
            Self::MalformedInput(err) => Outcome::MalformedInput(err),
            Self::NullViolation(nulls) => Outcome::NullViolation(nulls),
        }
    }

    /// Collapse into a `Result`, folding both failures into [`DecodeError`].
    pub fn into_result(self) -> Result<T, DecodeError> {
        match self {
            Self::Success(value) => Ok(value),
            Self::MalformedInput(err) => Err(err),
            Self::NullViolation(nulls) => Err(DecodeError::NullsFound(nulls)),
        }
    }
}

impl<T> From<Result<T, DecodeError>> for Outcome<T> {
    fn from(result: Result<T, DecodeError>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(DecodeError::NullsFound(nulls)) => Self::NullViolation(nulls),
            Err(err) => Self::MalformedInput(err),
        }
    }
}

/// Decodes with an engine, then validates the produced graph.
#[derive(Debug)]
pub struct OutcomeResolver {
    engine: Engine,
    validator: NullPathValidator,
}

impl Default for OutcomeResolver {
    fn default() -> Self {
        Self::new(Engine::new())
    }
}

impl OutcomeResolver {
    /// Resolver over `engine`, validating with the global handler registry.
    pub fn new(engine: Engine) -> Self {
        let validator = NullPathValidator::new(global_registry(), engine.classifier().clone());
        Self { engine, validator }
    }

    /// Resolver over an engine configured with [`NoNullsModule`].
    pub fn from_config(config: PipelineConfig) -> Self {
        Self::new(Engine::new().with_module(NoNullsModule::new(config)))
    }

    /// Replace the validator.
    pub fn with_validator(mut self, validator: NullPathValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn validator(&self) -> &NullPathValidator {
        &self.validator
    }

    /// Decode `input` as `declared` and validate the result.
    pub fn resolve(&self, input: &str, declared: &Arc<TypeDescriptor>) -> Outcome<Value> {
        let value = match self.engine.decode(input, declared) {
            Ok(value) => value,
            Err(err) => {
                tracing::trace!(type_name = %declared.name, error = %err, "decode failed");
                return Outcome::from(Err::<Value, _>(err));
            }
        };

        match self.validator.check(&value) {
            Ok(()) => Outcome::Success(value),
            Err(nulls) => {
                tracing::trace!(type_name = %declared.name, %nulls, "null violation");
                Outcome::NullViolation(nulls)
            }
        }
    }

    /// [`resolve`](Self::resolve), then materialize the graph as `T`.
    pub fn resolve_as<T: DeserializeOwned>(
        &self,
        input: &str,
        declared: &Arc<TypeDescriptor>,
    ) -> Outcome<T> {
        match self.resolve(input, declared) {
            Outcome::Success(value) => materialize(&value).into(),
            Outcome::MalformedInput(err) => Outcome::MalformedInput(err),
            Outcome::NullViolation(nulls) => Outcome::NullViolation(nulls),
        }
    }
}

fn materialize<T: DeserializeOwned>(value: &Value) -> Result<T, DecodeError> {
    let json = serde_json::to_value(value)?;
    Ok(serde_json::from_value(json)?)
}
