// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Base decode steps, one per [`TypeKind`].

use super::{DecodeContext, DecodeStep, Json};
use crate::error::DecodeError;
use crate::path::Segment;
use crate::types::{
    Category, EnumDescriptor, FieldDescriptor, OpaqueKind, PrimitiveKind, TypeDescriptor,
    TypeKind,
};
use crate::value::{EnumValue, Level, Member, MemberKind, Object, Record, Value};
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::{Arc, OnceLock};

type StepSlot = OnceLock<Arc<dyn DecodeStep>>;

/// Base step for a declared type, before modifiers.
pub(crate) fn base_step(declared: &Arc<TypeDescriptor>) -> Arc<dyn DecodeStep> {
    match &declared.kind {
        TypeKind::Primitive(kind) => Arc::new(PrimitiveStep::new(*kind)),
        TypeKind::Optional(inner) => Arc::new(OptionalStep::new(inner.clone())),
        TypeKind::List(seq) => Arc::new(SequenceStep::list(seq.element_type.clone())),
        TypeKind::Set(seq) => Arc::new(SequenceStep::set(seq.element_type.clone())),
        TypeKind::Map(map) => Arc::new(MapStep::new(map.key_type.clone(), map.value_type.clone())),
        TypeKind::Array(arr) => Arc::new(ArrayStep::new(arr.element_type.clone(), arr.length)),
        TypeKind::Record(_) => Arc::new(RecordStep::new(declared.clone())),
        TypeKind::Object(_) => Arc::new(ObjectStep::new(declared.clone())),
        TypeKind::Enum(desc) => Arc::new(EnumStep::new(declared.name.clone(), desc.clone())),
        TypeKind::Opaque(kind) => Arc::new(OpaqueStep::new(*kind)),
        TypeKind::Custom(name) => Arc::new(CustomStep::new(name.clone())),
        TypeKind::Any => Arc::new(AnyStep),
        TypeKind::Nested(inner) => base_step(inner),
    }
}

/// Convert untyped JSON into a value.
pub fn from_json(json: &Json) -> Value {
    match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => {
            if let Some(v) = n.as_i64() {
                Value::Int(v)
            } else if let Some(v) = n.as_u64() {
                Value::UInt(v)
            } else {
                Value::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Json::String(s) => Value::String(s.clone()),
        Json::Array(items) => Value::List(items.iter().map(from_json).collect()),
        Json::Object(map) => Value::Map(
            map.iter()
                .map(|(k, v)| (Value::String(k.clone()), from_json(v)))
                .collect(),
        ),
    }
}

fn log_unknown_properties(
    map: &serde_json::Map<String, Json>,
    known: impl Fn(&str) -> bool,
    ctx: &DecodeContext<'_>,
) {
    for name in map.keys().filter(|name| !known(name)) {
        tracing::trace!(path = %ctx.path(), property = %name, "ignoring unknown property");
    }
}

// ============================================================================
// Terminals
// ============================================================================

/// Scalars and strings.
#[derive(Debug, Clone, Copy)]
pub struct PrimitiveStep {
    kind: PrimitiveKind,
}

impl PrimitiveStep {
    pub fn new(kind: PrimitiveKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    fn decode_integer(&self, input: &Json, ctx: &DecodeContext<'_>) -> Result<Value, DecodeError> {
        let name = self.kind.name();
        let raw: i128 = match input {
            Json::Number(n) => match (n.as_i64(), n.as_u64()) {
                (Some(v), _) => i128::from(v),
                (None, Some(v)) => i128::from(v),
                _ => return Err(ctx.mismatch(name, input)),
            },
            Json::String(s) => s.trim().parse().map_err(|_| ctx.mismatch(name, input))?,
            other => return Err(ctx.mismatch(name, other)),
        };

        let (min, max) = self
            .kind
            .int_range()
            .ok_or_else(|| ctx.mismatch(name, input))?;
        if raw < min || raw > max {
            return Err(DecodeError::OutOfRange {
                path: ctx.path().to_string(),
                value: raw.to_string(),
                expected: name,
            });
        }

        let out_of_range = |_| DecodeError::OutOfRange {
            path: ctx.path().to_string(),
            value: raw.to_string(),
            expected: name,
        };
        if min < 0 {
            i64::try_from(raw).map(Value::Int).map_err(out_of_range)
        } else {
            u64::try_from(raw).map(Value::UInt).map_err(out_of_range)
        }
    }
}

impl DecodeStep for PrimitiveStep {
    fn decode(&self, input: &Json, ctx: &DecodeContext<'_>) -> Result<Value, DecodeError> {
        match self.kind {
            // scalars coerce to their textual form
            PrimitiveKind::String => match input {
                Json::String(s) => Ok(Value::String(s.clone())),
                Json::Number(n) => Ok(Value::String(n.to_string())),
                Json::Bool(b) => Ok(Value::String(b.to_string())),
                other => Err(ctx.mismatch("string", other)),
            },
            PrimitiveKind::Bool => match input {
                Json::Bool(b) => Ok(Value::Bool(*b)),
                other => Err(ctx.mismatch("boolean", other)),
            },
            PrimitiveKind::Char => {
                let Json::String(s) = input else {
                    return Err(ctx.mismatch("char", input));
                };
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Value::Char(c)),
                    _ => Err(ctx.mismatch("char", input)),
                }
            }
            PrimitiveKind::F32 | PrimitiveKind::F64 => match input {
                Json::Number(n) => n
                    .as_f64()
                    .map(Value::Float)
                    .ok_or_else(|| ctx.mismatch(self.kind.name(), input)),
                Json::String(s) => s
                    .trim()
                    .parse::<f64>()
                    .map(Value::Float)
                    .map_err(|_| ctx.mismatch(self.kind.name(), input)),
                other => Err(ctx.mismatch(self.kind.name(), other)),
            },
            _ => self.decode_integer(input, ctx),
        }
    }

    fn decode_key(&self, key: &str, ctx: &DecodeContext<'_>) -> Result<Value, DecodeError> {
        let input = Json::String(key.to_string());
        match self.kind {
            PrimitiveKind::Bool => key
                .parse::<bool>()
                .map(Value::Bool)
                .map_err(|_| ctx.mismatch("boolean", &input)),
            _ => self.decode(&input, ctx),
        }
    }
}

/// Enumeration constants, matched by variant name.
#[derive(Debug, Clone)]
pub struct EnumStep {
    type_name: String,
    desc: EnumDescriptor,
}

impl EnumStep {
    pub fn new(type_name: String, desc: EnumDescriptor) -> Self {
        Self { type_name, desc }
    }
}

impl DecodeStep for EnumStep {
    fn decode(&self, input: &Json, ctx: &DecodeContext<'_>) -> Result<Value, DecodeError> {
        let Json::String(variant) = input else {
            return Err(ctx.mismatch(format!("enum {}", self.type_name), input));
        };
        if !self.desc.has_variant(variant) {
            return Err(DecodeError::UnknownVariant {
                path: ctx.path().to_string(),
                type_name: self.type_name.clone(),
                variant: variant.clone(),
            });
        }
        Ok(Value::Enum(EnumValue::new(&self.type_name, variant)))
    }
}

/// Library value types parsed from their string form.
#[derive(Debug, Clone, Copy)]
pub struct OpaqueStep {
    kind: OpaqueKind,
}

impl OpaqueStep {
    pub fn new(kind: OpaqueKind) -> Self {
        Self { kind }
    }
}

impl DecodeStep for OpaqueStep {
    fn decode(&self, input: &Json, ctx: &DecodeContext<'_>) -> Result<Value, DecodeError> {
        let Json::String(s) = input else {
            return Err(ctx.mismatch(self.kind.type_name(), input));
        };
        let parsed = match self.kind {
            OpaqueKind::Uuid => uuid::Uuid::parse_str(s)
                .map(Value::from)
                .map_err(|e| e.to_string()),
            OpaqueKind::Date => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(Value::from)
                .map_err(|e| e.to_string()),
            OpaqueKind::DateTime => DateTime::parse_from_rfc3339(s)
                .map(|dt| Value::from(dt.with_timezone(&Utc)))
                .map_err(|e| e.to_string()),
            OpaqueKind::Url => url::Url::parse(s)
                .map(Value::from)
                .map_err(|e| e.to_string()),
        };
        parsed.map_err(|reason| DecodeError::InvalidOpaque {
            path: ctx.path().to_string(),
            type_name: self.kind.type_name(),
            reason,
        })
    }
}

/// Untyped JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyStep;

impl DecodeStep for AnyStep {
    fn decode(&self, input: &Json, _ctx: &DecodeContext<'_>) -> Result<Value, DecodeError> {
        Ok(from_json(input))
    }
}

/// Placeholder for custom types no module supplies a step for.
#[derive(Debug, Clone)]
pub struct CustomStep {
    type_name: String,
}

impl CustomStep {
    pub fn new(type_name: String) -> Self {
        Self { type_name }
    }
}

impl DecodeStep for CustomStep {
    fn decode(&self, _input: &Json, ctx: &DecodeContext<'_>) -> Result<Value, DecodeError> {
        Err(DecodeError::Unsupported {
            path: ctx.path().to_string(),
            type_name: self.type_name.clone(),
        })
    }
}

// ============================================================================
// Containers
// ============================================================================

/// Zero-or-one box. Null decodes to empty, a missing property stays null.
#[derive(Debug)]
pub struct OptionalStep {
    inner: Arc<TypeDescriptor>,
    inner_step: StepSlot,
}

impl OptionalStep {
    pub fn new(inner: Arc<TypeDescriptor>) -> Self {
        Self {
            inner,
            inner_step: OnceLock::new(),
        }
    }
}

impl DecodeStep for OptionalStep {
    fn decode(&self, input: &Json, ctx: &DecodeContext<'_>) -> Result<Value, DecodeError> {
        if input.is_null() {
            return Ok(Value::none());
        }
        let step = ctx.resolve_lazy(&self.inner_step, &self.inner);
        let value = step.decode(input, ctx)?;
        if value.is_null() {
            Ok(Value::none())
        } else {
            Ok(Value::Optional(Some(Box::new(value))))
        }
    }

    fn null_value(&self, _ctx: &DecodeContext<'_>) -> Value {
        Value::none()
    }

    fn absent_value(&self, _ctx: &DecodeContext<'_>) -> Value {
        Value::Null
    }

    fn empty_value(&self, _ctx: &DecodeContext<'_>) -> Option<Value> {
        Some(Value::none())
    }
}

/// Lists and sets. Sets keep the first occurrence of equal elements.
#[derive(Debug)]
pub struct SequenceStep {
    element: Arc<TypeDescriptor>,
    unordered: bool,
    element_step: StepSlot,
}

impl SequenceStep {
    pub fn list(element: Arc<TypeDescriptor>) -> Self {
        Self {
            element,
            unordered: false,
            element_step: OnceLock::new(),
        }
    }

    pub fn set(element: Arc<TypeDescriptor>) -> Self {
        Self {
            unordered: true,
            ..Self::list(element)
        }
    }

    fn category(&self) -> Category {
        if self.unordered {
            Category::UnorderedSequence
        } else {
            Category::OrderedSequence
        }
    }

    fn wrap(&self, items: Vec<Value>) -> Value {
        if self.unordered {
            Value::Set(items)
        } else {
            Value::List(items)
        }
    }

    fn decode_items(
        &self,
        input: &Json,
        ctx: &DecodeContext<'_>,
        out: &mut Vec<Value>,
    ) -> Result<(), DecodeError> {
        let Json::Array(items) = input else {
            let expected = if self.unordered { "set" } else { "list" };
            return Err(ctx.mismatch(expected, input));
        };
        let step = ctx.resolve_lazy(&self.element_step, &self.element);
        for (i, item) in items.iter().enumerate() {
            let child = ctx.child(Segment::Index(i));
            if let Some(value) = child.decode_element(step.as_ref(), self.category(), item)? {
                if self.unordered && out.contains(&value) {
                    continue;
                }
                out.push(value);
            }
        }
        Ok(())
    }
}

impl DecodeStep for SequenceStep {
    fn decode(&self, input: &Json, ctx: &DecodeContext<'_>) -> Result<Value, DecodeError> {
        let mut items = Vec::new();
        self.decode_items(input, ctx, &mut items)?;
        Ok(self.wrap(items))
    }

    fn decode_into(
        &self,
        input: &Json,
        existing: Value,
        ctx: &DecodeContext<'_>,
    ) -> Result<Value, DecodeError> {
        match existing {
            Value::List(mut items) | Value::Set(mut items) => {
                self.decode_items(input, ctx, &mut items)?;
                Ok(self.wrap(items))
            }
            _ => self.decode(input, ctx),
        }
    }

    fn empty_value(&self, _ctx: &DecodeContext<'_>) -> Option<Value> {
        Some(self.wrap(Vec::new()))
    }
}

/// Fixed or unbounded arrays.
#[derive(Debug)]
pub struct ArrayStep {
    element: Arc<TypeDescriptor>,
    length: Option<usize>,
    element_step: StepSlot,
}

impl ArrayStep {
    pub fn new(element: Arc<TypeDescriptor>, length: Option<usize>) -> Self {
        Self {
            element,
            length,
            element_step: OnceLock::new(),
        }
    }
}

impl DecodeStep for ArrayStep {
    fn decode(&self, input: &Json, ctx: &DecodeContext<'_>) -> Result<Value, DecodeError> {
        let Json::Array(items) = input else {
            return Err(ctx.mismatch("array", input));
        };
        if let Some(expected) = self.length {
            if items.len() != expected {
                return Err(DecodeError::LengthMismatch {
                    path: ctx.path().to_string(),
                    expected,
                    found: items.len(),
                });
            }
        }

        let step = ctx.resolve_lazy(&self.element_step, &self.element);
        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let child = ctx.child(Segment::Index(i));
            if let Some(value) = child.decode_element(step.as_ref(), Category::Array, item)? {
                out.push(value);
            }
        }
        Ok(Value::Array(out))
    }

    fn empty_value(&self, _ctx: &DecodeContext<'_>) -> Option<Value> {
        Some(Value::Array(Vec::new()))
    }
}

/// Key/value mappings from JSON objects, in document order.
#[derive(Debug)]
pub struct MapStep {
    key: Arc<TypeDescriptor>,
    value: Arc<TypeDescriptor>,
    key_step: StepSlot,
    value_step: StepSlot,
}

impl MapStep {
    pub fn new(key: Arc<TypeDescriptor>, value: Arc<TypeDescriptor>) -> Self {
        Self {
            key,
            value,
            key_step: OnceLock::new(),
            value_step: OnceLock::new(),
        }
    }

    fn decode_entries(
        &self,
        input: &Json,
        ctx: &DecodeContext<'_>,
        entries: &mut Vec<(Value, Value)>,
    ) -> Result<(), DecodeError> {
        let Json::Object(map) = input else {
            return Err(ctx.mismatch("map", input));
        };
        let key_step = ctx.resolve_lazy(&self.key_step, &self.key);
        let value_step = ctx.resolve_lazy(&self.value_step, &self.value);

        for (raw_key, raw_value) in map {
            let key = key_step.decode_key(raw_key, &ctx.child(Segment::KeyMarker(raw_key.clone())))?;
            let child = ctx.child(Segment::Key(raw_key.clone()));
            let Some(value) = child.decode_element(value_step.as_ref(), Category::Mapping, raw_value)?
            else {
                continue;
            };
            match entries.iter_mut().find(|(existing, _)| *existing == key) {
                Some(entry) => entry.1 = value,
                None => entries.push((key, value)),
            }
        }
        Ok(())
    }
}

impl DecodeStep for MapStep {
    fn decode(&self, input: &Json, ctx: &DecodeContext<'_>) -> Result<Value, DecodeError> {
        let mut entries = Vec::new();
        self.decode_entries(input, ctx, &mut entries)?;
        Ok(Value::Map(entries))
    }

    fn decode_into(
        &self,
        input: &Json,
        existing: Value,
        ctx: &DecodeContext<'_>,
    ) -> Result<Value, DecodeError> {
        match existing {
            Value::Map(mut entries) => {
                self.decode_entries(input, ctx, &mut entries)?;
                Ok(Value::Map(entries))
            }
            _ => self.decode(input, ctx),
        }
    }

    fn empty_value(&self, _ctx: &DecodeContext<'_>) -> Option<Value> {
        Some(Value::Map(Vec::new()))
    }
}

// ============================================================================
// Named shapes
// ============================================================================

/// Decode one declared field; merges into `existing` when both sides are structured.
fn decode_field(
    field: &FieldDescriptor,
    slot: &StepSlot,
    input: Option<&Json>,
    existing: Option<Value>,
    ctx: &DecodeContext<'_>,
) -> Result<Value, DecodeError> {
    let step = ctx.resolve_lazy(slot, &field.type_desc);
    let category = ctx.engine().classifier().classify_declared(&field.type_desc);
    let child = ctx.child(Segment::Field(field.name.clone()));
    match (input, existing) {
        (Some(json @ (Json::Object(_) | Json::Array(_))), Some(current)) if !current.is_null() => {
            step.decode_into(json, current, &child)
        }
        _ => child.decode_slot(step.as_ref(), category, input),
    }
}

/// Records: declared components in order; unknown properties are ignored.
#[derive(Debug)]
pub struct RecordStep {
    declared: Arc<TypeDescriptor>,
    field_steps: Vec<StepSlot>,
}

impl RecordStep {
    pub fn new(declared: Arc<TypeDescriptor>) -> Self {
        let count = declared.fields().map_or(0, <[FieldDescriptor]>::len);
        Self {
            declared,
            field_steps: (0..count).map(|_| OnceLock::new()).collect(),
        }
    }

    fn fields(&self) -> &[FieldDescriptor] {
        self.declared.fields().unwrap_or_default()
    }
}

impl DecodeStep for RecordStep {
    fn decode(&self, input: &Json, ctx: &DecodeContext<'_>) -> Result<Value, DecodeError> {
        let Json::Object(map) = input else {
            return Err(ctx.mismatch(format!("record {}", self.declared.name), input));
        };

        let mut record = Record::new(&self.declared.name);
        for (field, slot) in self.fields().iter().zip(&self.field_steps) {
            let value = decode_field(field, slot, map.get(&field.name), None, ctx)?;
            record.fields.push((field.name.clone(), value));
        }
        log_unknown_properties(map, |name| self.declared.field(name).is_some(), ctx);
        Ok(Value::Record(record))
    }

    fn decode_into(
        &self,
        input: &Json,
        existing: Value,
        ctx: &DecodeContext<'_>,
    ) -> Result<Value, DecodeError> {
        let Value::Record(mut record) = existing else {
            return self.decode(input, ctx);
        };
        let Json::Object(map) = input else {
            return Err(ctx.mismatch(format!("record {}", self.declared.name), input));
        };

        for (field, slot) in self.fields().iter().zip(&self.field_steps) {
            let Some(json) = map.get(&field.name) else {
                continue;
            };
            let current = record.get_mut(&field.name).map(std::mem::take);
            let value = decode_field(field, slot, Some(json), current, ctx)?;
            record.set(field.name.clone(), value);
        }
        log_unknown_properties(map, |name| self.declared.field(name).is_some(), ctx);
        Ok(Value::Record(record))
    }
}

#[derive(Debug)]
struct ClassLevel {
    type_name: String,
    fields: Vec<FieldDescriptor>,
    static_fields: Vec<String>,
}

/// Class-like objects: own fields first, then each ancestor's.
///
/// Static fields are never read from input; they appear in the decoded
/// object as static members so reflective walkers can see and skip them.
#[derive(Debug)]
pub struct ObjectStep {
    type_name: String,
    chain: Vec<ClassLevel>,
    field_steps: Vec<StepSlot>,
}

impl ObjectStep {
    pub fn new(declared: Arc<TypeDescriptor>) -> Self {
        let mut chain = Vec::new();
        let mut current = Some(declared.clone());
        while let Some(desc) = current.take() {
            let resolved = desc.resolved();
            let TypeKind::Object(class) = &resolved.kind else {
                break;
            };
            chain.push(ClassLevel {
                type_name: resolved.name.clone(),
                fields: class.fields.clone(),
                static_fields: class.static_fields.clone(),
            });
            current = class.base.clone();
        }

        let count = chain.iter().map(|level| level.fields.len()).sum();
        Self {
            type_name: declared.name.clone(),
            chain,
            field_steps: (0..count).map(|_| OnceLock::new()).collect(),
        }
    }

    fn declared_fields(&self) -> impl Iterator<Item = (usize, &FieldDescriptor)> {
        self.chain
            .iter()
            .enumerate()
            .flat_map(|(level, class)| class.fields.iter().map(move |f| (level, f)))
    }

    fn is_instance_field(&self, name: &str) -> bool {
        self.declared_fields().any(|(_, f)| f.name == name)
    }
}

impl DecodeStep for ObjectStep {
    fn decode(&self, input: &Json, ctx: &DecodeContext<'_>) -> Result<Value, DecodeError> {
        let Json::Object(map) = input else {
            return Err(ctx.mismatch(format!("object {}", self.type_name), input));
        };

        let mut levels: Vec<Level> = self
            .chain
            .iter()
            .map(|class| Level::new(class.type_name.clone()))
            .collect();
        for ((level, field), slot) in self.declared_fields().zip(&self.field_steps) {
            let value = decode_field(field, slot, map.get(&field.name), None, ctx)?;
            levels[level].members.push(Member {
                name: field.name.clone(),
                kind: MemberKind::Instance,
                value,
            });
        }
        for (level, class) in levels.iter_mut().zip(&self.chain) {
            for name in &class.static_fields {
                level.members.push(Member {
                    name: name.clone(),
                    kind: MemberKind::Static,
                    value: Value::Null,
                });
            }
        }
        log_unknown_properties(map, |name| self.is_instance_field(name), ctx);

        Ok(Value::Object(Object {
            type_name: self.type_name.clone(),
            levels,
        }))
    }

    fn decode_into(
        &self,
        input: &Json,
        existing: Value,
        ctx: &DecodeContext<'_>,
    ) -> Result<Value, DecodeError> {
        let Value::Object(mut object) = existing else {
            return self.decode(input, ctx);
        };
        let Json::Object(map) = input else {
            return Err(ctx.mismatch(format!("object {}", self.type_name), input));
        };

        for ((_, field), slot) in self.declared_fields().zip(&self.field_steps) {
            let Some(json) = map.get(&field.name) else {
                continue;
            };
            let Some(target) = object.get_mut(&field.name) else {
                continue;
            };
            let current = std::mem::take(target);
            let value = decode_field(field, slot, Some(json), Some(current), ctx)?;
            if let Some(target) = object.get_mut(&field.name) {
                *target = value;
            }
        }
        log_unknown_properties(map, |name| self.is_instance_field(name), ctx);
        Ok(Value::Object(object))
    }
}
