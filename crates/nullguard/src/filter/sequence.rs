// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Null and blank-string filtering for lists, sets and arrays.

use crate::engine::{DecodeContext, DecodeStep, Json};
use crate::error::DecodeError;
use crate::value::Value;
use std::sync::Arc;

/// Remove nulls, and blank strings when `skip_blank_strings` is set.
pub(crate) fn retain_present(items: &mut Vec<Value>, skip_blank_strings: bool) {
    items.retain(|item| !(item.is_null() || (skip_blank_strings && item.is_blank_string())));
}

/// Drops null (and blank string) elements after the inner step decodes a
/// list or set, both on replace and on merge.
#[derive(Debug)]
pub struct SequenceFilter {
    inner: Arc<dyn DecodeStep>,
    skip_blank_strings: bool,
}

impl SequenceFilter {
    pub fn new(inner: Arc<dyn DecodeStep>, skip_blank_strings: bool) -> Self {
        Self {
            inner,
            skip_blank_strings,
        }
    }

    fn filter(&self, value: Value) -> Value {
        match value {
            Value::List(mut items) => {
                retain_present(&mut items, self.skip_blank_strings);
                Value::List(items)
            }
            Value::Set(mut items) => {
                retain_present(&mut items, self.skip_blank_strings);
                Value::Set(items)
            }
            other => other,
        }
    }
}

impl DecodeStep for SequenceFilter {
    fn decode(&self, input: &Json, ctx: &DecodeContext<'_>) -> Result<Value, DecodeError> {
        self.inner.decode(input, ctx).map(|v| self.filter(v))
    }

    fn decode_into(
        &self,
        input: &Json,
        existing: Value,
        ctx: &DecodeContext<'_>,
    ) -> Result<Value, DecodeError> {
        self.inner
            .decode_into(input, existing, ctx)
            .map(|v| self.filter(v))
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

/// Same filtering as [`SequenceFilter`] for arrays; a null or missing array
/// decodes to a zero-length array.
#[derive(Debug)]
pub struct ArrayFilter {
    inner: Arc<dyn DecodeStep>,
    skip_blank_strings: bool,
}

impl ArrayFilter {
    pub fn new(inner: Arc<dyn DecodeStep>, skip_blank_strings: bool) -> Self {
        Self {
            inner,
            skip_blank_strings,
        }
    }

    fn filter(&self, value: Value) -> Value {
        match value {
            Value::Array(mut items) => {
                retain_present(&mut items, self.skip_blank_strings);
                Value::Array(items)
            }
            other => other,
        }
    }
}

impl DecodeStep for ArrayFilter {
    fn decode(&self, input: &Json, ctx: &DecodeContext<'_>) -> Result<Value, DecodeError> {
        self.inner.decode(input, ctx).map(|v| self.filter(v))
    }

    fn decode_into(
        &self,
        input: &Json,
        existing: Value,
        ctx: &DecodeContext<'_>,
    ) -> Result<Value, DecodeError> {
        self.inner
            .decode_into(input, existing, ctx)
            .map(|v| self.filter(v))
    }

    fn null_value(&self, _ctx: &DecodeContext<'_>) -> Value {
        Value::Array(Vec::new())
    }

    fn absent_value(&self, _ctx: &DecodeContext<'_>) -> Value {
        Value::Array(Vec::new())
    }

    fn empty_value(&self, _ctx: &DecodeContext<'_>) -> Option<Value> {
        Some(Value::Array(Vec::new()))
    }
}
