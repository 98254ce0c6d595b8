// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Null-value filtering for mappings.

use crate::engine::{DecodeContext, DecodeStep, Json};
use crate::error::DecodeError;
use crate::value::Value;
use std::sync::Arc;

/// Drops entries whose value is null. Keys are never inspected, so blank
/// or empty keys survive.
#[derive(Debug)]
pub struct MapFilter {
    inner: Arc<dyn DecodeStep>,
}

impl MapFilter {
    pub fn new(inner: Arc<dyn DecodeStep>) -> Self {
        Self { inner }
    }

    fn filter(value: Value) -> Value {
        match value {
            Value::Map(mut entries) => {
                entries.retain(|(_, v)| !v.is_null());
                Value::Map(entries)
            }
            other => other,
        }
    }
}

impl DecodeStep for MapFilter {
    fn decode(&self, input: &Json, ctx: &DecodeContext<'_>) -> Result<Value, DecodeError> {
        self.inner.decode(input, ctx).map(Self::filter)
    }

    fn decode_into(
        &self,
        input: &Json,
        existing: Value,
        ctx: &DecodeContext<'_>,
    ) -> Result<Value, DecodeError> {
        self.inner
            .decode_into(input, existing, ctx)
            .map(Self::filter)
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
