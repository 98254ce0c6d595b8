// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Strict decoding: fail when a decoded record still holds nulls.

use crate::engine::{DecodeContext, DecodeStep, Json};
use crate::error::{DecodeError, NullsFound};
use crate::validate::NullPathValidator;
use crate::value::Value;
use std::sync::Arc;

/// Runs the null-path validator over the value decoded at the document root.
///
/// Nested occurrences pass through unchecked: the single root walk sees the
/// whole tree and reports every null path in one error. Steps resolved for
/// a non-root position therefore never fail on their own.
#[derive(Debug)]
pub struct NullValidatingStep {
    inner: Arc<dyn DecodeStep>,
    validator: NullPathValidator,
}

impl NullValidatingStep {
    pub fn new(inner: Arc<dyn DecodeStep>, validator: NullPathValidator) -> Self {
        Self { inner, validator }
    }

    fn verify(&self, value: Value, ctx: &DecodeContext<'_>) -> Result<Value, DecodeError> {
        if !ctx.path().is_root() {
            return Ok(value);
        }
        let paths = self.validator.find_null_paths(&value);
        if paths.is_empty() {
            return Ok(value);
        }
        tracing::debug!(count = paths.len(), "strict decode found nulls");
        Err(NullsFound::new(paths).into())
    }
}

impl DecodeStep for NullValidatingStep {
    fn decode(&self, input: &Json, ctx: &DecodeContext<'_>) -> Result<Value, DecodeError> {
        let value = self.inner.decode(input, ctx)?;
        self.verify(value, ctx)
    }

    fn decode_into(
        &self,
        input: &Json,
        existing: Value,
        ctx: &DecodeContext<'_>,
    ) -> Result<Value, DecodeError> {
        let value = self.inner.decode_into(input, existing, ctx)?;
        self.verify(value, ctx)
    }

    fn decode_key(&self, key: &str, ctx: &DecodeContext<'_>) -> Result<Value, DecodeError> {
        self.inner.decode_key(key, ctx)
    }

    fn null_value(&self, ctx: &DecodeContext<'_>) -> Value {
        self.inner.null_value(ctx)
    }

    fn absent_value(&self, ctx: &DecodeContext<'_>) -> Value {
        self.inner.absent_value(ctx)
    }

    fn empty_value(&self, ctx: &DecodeContext<'_>) -> Option<Value> {
        self.inner.empty_value(ctx)
    }
}
