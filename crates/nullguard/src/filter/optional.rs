// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Empty-aware optional decoding.

use crate::config::EmptyCollectionInOptional;
use crate::engine::{DecodeContext, DecodeStep, Json};
use crate::error::DecodeError;
use crate::types::TypeDescriptor;
use crate::value::Value;
use std::sync::{Arc, OnceLock};

/// Optional step where null, missing, and (for strings) blank input all
/// decode to an empty optional.
#[derive(Debug)]
pub struct EmptyAwareOptional {
    inner_type: Arc<TypeDescriptor>,
    inner_step: OnceLock<Arc<dyn DecodeStep>>,
    empty_collections: EmptyCollectionInOptional,
}

impl EmptyAwareOptional {
    pub fn new(inner_type: Arc<TypeDescriptor>, empty_collections: EmptyCollectionInOptional) -> Self {
        Self {
            inner_type,
            inner_step: OnceLock::new(),
            empty_collections,
        }
    }

    fn decode_string(input: &Json, ctx: &DecodeContext<'_>) -> Result<Value, DecodeError> {
        let text = match input {
            Json::Null => return Ok(Value::none()),
            Json::String(s) => s.clone(),
            Json::Number(n) => n.to_string(),
            Json::Bool(b) => b.to_string(),
            Json::Array(_) | Json::Object(_) => return Err(ctx.mismatch("string", input)),
        };
        if text.trim().is_empty() {
            Ok(Value::none())
        } else {
            Ok(Value::some(text))
        }
    }
}

impl DecodeStep for EmptyAwareOptional {
    fn decode(&self, input: &Json, ctx: &DecodeContext<'_>) -> Result<Value, DecodeError> {
        if input.is_null() {
            return Ok(Value::none());
        }
        if self.inner_type.is_string() {
            return Self::decode_string(input, ctx);
        }

        let step = ctx.resolve_lazy(&self.inner_step, &self.inner_type);
        let value = step.decode(input, ctx)?;
        if value.is_null() {
            return Ok(Value::none());
        }
        if self.empty_collections == EmptyCollectionInOptional::TreatAsAbsent
            && value.is_empty_container()
        {
            return Ok(Value::none());
        }
        Ok(Value::some(value))
    }

    fn null_value(&self, _ctx: &DecodeContext<'_>) -> Value {
        Value::none()
    }

    fn absent_value(&self, _ctx: &DecodeContext<'_>) -> Value {
        Value::none()
    }

    fn empty_value(&self, _ctx: &DecodeContext<'_>) -> Option<Value> {
        Some(Value::none())
    }
}
