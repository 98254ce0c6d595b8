// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! serde bridge: any `Serialize` type into a [`Value`], and `Value` back out.
//!
//! Structs become records in declaration order, `None` becomes `Null`, unit
//! variants become enum constants. Data-carrying variants use the externally
//! tagged map shape, the same as serde_json.

use super::{EnumValue, NodeId, Record, Traversal, Value};
use serde::ser::{
    self, Serialize, SerializeMap, SerializeSeq, SerializeStruct, SerializeStructVariant,
    SerializeTuple, SerializeTupleStruct, SerializeTupleVariant,
};
use std::cell::RefCell;
use std::fmt;
use thiserror::Error;

/// Errors converting to or from the value graph through serde.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("{0}")]
    Custom(String),

    #[error("integer {0} does not fit in 64 bits")]
    IntegerOverflow(String),

    #[error("map key must be a string, number, bool or char, found {0}")]
    InvalidKey(String),
}

impl ser::Error for SerializeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self::Custom(msg.to_string())
    }
}

/// Convert any `Serialize` value into a [`Value`] graph.
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value, SerializeError> {
    value.serialize(ValueSerializer)
}

struct ValueSerializer;

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = SerializeError;

    type SerializeSeq = SeqBuilder;
    type SerializeTuple = SeqBuilder;
    type SerializeTupleStruct = SeqBuilder;
    type SerializeTupleVariant = TupleVariantBuilder;
    type SerializeMap = MapBuilder;
    type SerializeStruct = RecordBuilder;
    type SerializeStructVariant = StructVariantBuilder;

    fn serialize_bool(self, v: bool) -> Result<Value, SerializeError> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value, SerializeError> {
        Ok(Value::Int(i64::from(v)))
    }

    fn serialize_i16(self, v: i16) -> Result<Value, SerializeError> {
        Ok(Value::Int(i64::from(v)))
    }

    fn serialize_i32(self, v: i32) -> Result<Value, SerializeError> {
        Ok(Value::Int(i64::from(v)))
    }

    fn serialize_i64(self, v: i64) -> Result<Value, SerializeError> {
        Ok(Value::Int(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Value, SerializeError> {
        i64::try_from(v)
            .map(Value::Int)
            .map_err(|_| SerializeError::IntegerOverflow(v.to_string()))
    }

    fn serialize_u8(self, v: u8) -> Result<Value, SerializeError> {
        Ok(Value::UInt(u64::from(v)))
    }

    fn serialize_u16(self, v: u16) -> Result<Value, SerializeError> {
        Ok(Value::UInt(u64::from(v)))
    }

    fn serialize_u32(self, v: u32) -> Result<Value, SerializeError> {
        Ok(Value::UInt(u64::from(v)))
    }

    fn serialize_u64(self, v: u64) -> Result<Value, SerializeError> {
        Ok(Value::UInt(v))
    }

    fn serialize_u128(self, v: u128) -> Result<Value, SerializeError> {
        u64::try_from(v)
            .map(Value::UInt)
            .map_err(|_| SerializeError::IntegerOverflow(v.to_string()))
    }

    fn serialize_f32(self, v: f32) -> Result<Value, SerializeError> {
        Ok(Value::Float(f64::from(v)))
    }

    fn serialize_f64(self, v: f64) -> Result<Value, SerializeError> {
        Ok(Value::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<Value, SerializeError> {
        Ok(Value::Char(v))
    }

    fn serialize_str(self, v: &str) -> Result<Value, SerializeError> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value, SerializeError> {
        Ok(Value::List(v.iter().map(|b| Value::UInt(u64::from(*b))).collect()))
    }

    fn serialize_none(self) -> Result<Value, SerializeError> {
        Ok(Value::Null)
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<Value, SerializeError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value, SerializeError> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Value, SerializeError> {
        Ok(Value::Record(Record::new(name)))
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value, SerializeError> {
        Ok(Value::Enum(EnumValue::new(name, variant)))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Value, SerializeError> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value, SerializeError> {
        Ok(tagged(variant, to_value(value)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqBuilder, SerializeError> {
        Ok(SeqBuilder::list(len.unwrap_or(0)))
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqBuilder, SerializeError> {
        Ok(SeqBuilder::array(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SeqBuilder, SerializeError> {
        Ok(SeqBuilder::array(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<TupleVariantBuilder, SerializeError> {
        Ok(TupleVariantBuilder {
            variant,
            items: SeqBuilder::array(len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<MapBuilder, SerializeError> {
        Ok(MapBuilder {
            entries: Vec::with_capacity(len.unwrap_or(0)),
            next_key: None,
        })
    }

    fn serialize_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<RecordBuilder, SerializeError> {
        Ok(RecordBuilder {
            record: Record::new(name),
        })
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<StructVariantBuilder, SerializeError> {
        Ok(StructVariantBuilder {
            variant,
            record: Record::new(format!("{}::{}", name, variant)),
        })
    }
}

fn tagged(variant: &str, value: Value) -> Value {
    Value::Map(vec![(Value::String(variant.to_string()), value)])
}

struct SeqBuilder {
    items: Vec<Value>,
    array: bool,
}

impl SeqBuilder {
    fn list(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            array: false,
        }
    }

    fn array(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            array: true,
        }
    }

    fn push<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), SerializeError> {
        self.items.push(to_value(value)?);
        Ok(())
    }

    fn finish(self) -> Value {
        if self.array {
            Value::Array(self.items)
        } else {
            Value::List(self.items)
        }
    }
}

impl SerializeSeq for SeqBuilder {
    type Ok = Value;
    type Error = SerializeError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Self::Error> {
        self.push(value)
    }

    fn end(self) -> Result<Value, SerializeError> {
        Ok(self.finish())
    }
}

impl SerializeTuple for SeqBuilder {
    type Ok = Value;
    type Error = SerializeError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Self::Error> {
        self.push(value)
    }

    fn end(self) -> Result<Value, SerializeError> {
        Ok(self.finish())
    }
}

impl SerializeTupleStruct for SeqBuilder {
    type Ok = Value;
    type Error = SerializeError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Self::Error> {
        self.push(value)
    }

    fn end(self) -> Result<Value, SerializeError> {
        Ok(self.finish())
    }
}

struct TupleVariantBuilder {
    variant: &'static str,
    items: SeqBuilder,
}

impl SerializeTupleVariant for TupleVariantBuilder {
    type Ok = Value;
    type Error = SerializeError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Self::Error> {
        self.items.push(value)
    }

    fn end(self) -> Result<Value, SerializeError> {
        Ok(tagged(self.variant, self.items.finish()))
    }
}

struct MapBuilder {
    entries: Vec<(Value, Value)>,
    next_key: Option<Value>,
}

impl SerializeMap for MapBuilder {
    type Ok = Value;
    type Error = SerializeError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), Self::Error> {
        self.next_key = Some(to_value(key)?);
        Ok(())
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Self::Error> {
        let key = self
            .next_key
            .take()
            .ok_or_else(|| SerializeError::Custom("map value without key".into()))?;
        self.entries.push((key, to_value(value)?));
        Ok(())
    }

    fn end(self) -> Result<Value, SerializeError> {
        Ok(Value::Map(self.entries))
    }
}

struct RecordBuilder {
    record: Record,
}

impl SerializeStruct for RecordBuilder {
    type Ok = Value;
    type Error = SerializeError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), Self::Error> {
        self.record.fields.push((key.to_string(), to_value(value)?));
        Ok(())
    }

    fn end(self) -> Result<Value, SerializeError> {
        Ok(Value::Record(self.record))
    }
}

struct StructVariantBuilder {
    variant: &'static str,
    record: Record,
}

impl SerializeStructVariant for StructVariantBuilder {
    type Ok = Value;
    type Error = SerializeError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), Self::Error> {
        self.record.fields.push((key.to_string(), to_value(value)?));
        Ok(())
    }

    fn end(self) -> Result<Value, SerializeError> {
        Ok(tagged(self.variant, Value::Record(self.record)))
    }
}

impl Serialize for Value {
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let ancestors = RefCell::new(Vec::new());
        Guarded {
            value: self,
            ancestors: &ancestors,
        }
        .serialize(serializer)
    }
}

/// Serializes a value while tracking the shared nodes on the current branch.
struct Guarded<'a> {
    value: &'a Value,
    ancestors: &'a RefCell<Vec<NodeId>>,
}

impl Guarded<'_> {
    fn child<'b>(&'b self, value: &'b Value) -> Guarded<'b> {
        Guarded {
            value,
            ancestors: self.ancestors,
        }
    }

    fn seq<S: ser::Serializer>(&self, items: &[&Value], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(items.len()))?;
        for item in items {
            seq.serialize_element(&self.child(item))?;
        }
        seq.end()
    }

    fn map<S: ser::Serializer>(
        &self,
        entries: &[(&Value, &Value)],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (k, v) in entries {
            map.serialize_entry(&self.child(k), &self.child(v))?;
        }
        map.end()
    }

    fn fields<S: ser::Serializer>(
        &self,
        fields: &[(&str, &Value)],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(fields.len()))?;
        for (name, v) in fields {
            map.serialize_entry(name, &self.child(v))?;
        }
        map.end()
    }
}

impl Serialize for Guarded<'_> {
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.value {
            Value::Null | Value::Optional(None) => serializer.serialize_none(),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Int(v) => serializer.serialize_i64(*v),
            Value::UInt(v) => serializer.serialize_u64(*v),
            Value::Float(v) => serializer.serialize_f64(*v),
            Value::Char(v) => serializer.serialize_char(*v),
            Value::String(v) => serializer.serialize_str(v),
            Value::Optional(Some(inner)) => serializer.serialize_some(&self.child(inner)),
            Value::List(items) | Value::Set(items) | Value::Array(items) => {
                let refs: Vec<&Value> = items.iter().collect();
                self.seq(&refs, serializer)
            }
            Value::Map(entries) => {
                let refs: Vec<(&Value, &Value)> = entries.iter().map(|(k, v)| (k, v)).collect();
                self.map(&refs, serializer)
            }
            Value::Record(record) => {
                let refs: Vec<(&str, &Value)> =
                    record.fields.iter().map(|(n, v)| (n.as_str(), v)).collect();
                self.fields(&refs, serializer)
            }
            Value::Enum(e) => serializer.serialize_str(&e.variant),
            Value::Object(obj) => {
                let refs: Vec<(&str, &Value)> = obj.instance_members().collect();
                self.fields(&refs, serializer)
            }
            Value::Shared(node) => {
                let id = node.id();
                if self.ancestors.borrow().contains(&id) {
                    return Err(ser::Error::custom(format!(
                        "cycle through shared node {:?}",
                        node
                    )));
                }
                let inner = node
                    .try_read()
                    .ok_or_else(|| <S::Error as ser::Error>::custom("shared node is locked by a writer"))?;
                self.ancestors.borrow_mut().push(id);
                let result = self.child(&inner).serialize(serializer);
                self.ancestors.borrow_mut().pop();
                result
            }
            Value::Custom(custom) => match custom.traversal() {
                Some(Traversal::Sequence(items)) => self.seq(&items, serializer),
                Some(Traversal::Mapping(entries)) => self.map(&entries, serializer),
                Some(Traversal::Boxed(Some(inner))) => {
                    serializer.serialize_some(&self.child(inner))
                }
                Some(Traversal::Boxed(None)) => serializer.serialize_none(),
                None => self.fields(&custom.fields(), serializer),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::SharedNode;
    use serde::{Deserialize, Serialize};
    use std::collections::BTreeMap;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    enum Color {
        Red,
        Green,
    }

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Data {
        s: Option<String>,
        tags: Vec<String>,
        color: Color,
        counts: BTreeMap<String, u32>,
        pair: (i32, bool),
    }

    #[test]
    fn test_struct_to_record() {
        let data = Data {
            s: None,
            tags: vec!["a".into()],
            color: Color::Green,
            counts: BTreeMap::from([("k".to_string(), 2)]),
            pair: (1, true),
        };

        let value = to_value(&data).expect("to_value");
        let record = match &value {
            Value::Record(r) => r,
            other => panic!("expected record, got {:?}", other),
        };
        assert_eq!(record.type_name, "Data");
        let names: Vec<&str> = record.fields.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["s", "tags", "color", "counts", "pair"]);
        assert_eq!(record.get("s"), Some(&Value::Null));
        assert_eq!(
            record.get("color"),
            Some(&Value::Enum(EnumValue::new("Color", "Green")))
        );
        assert!(matches!(record.get("pair"), Some(Value::Array(items)) if items.len() == 2));
    }

    #[test]
    fn test_value_serializes_back() {
        let data = Data {
            s: Some("x".into()),
            tags: vec![],
            color: Color::Red,
            counts: BTreeMap::new(),
            pair: (5, false),
        };
        let value = to_value(&data).expect("to_value");
        let json = serde_json::to_value(&value).expect("serialize");
        let back: Data = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, data);
    }

    #[test]
    fn test_cyclic_graph_fails_to_serialize() {
        let node = SharedNode::new(Value::Null);
        node.set(Value::Record(
            Record::new("Node").with("next", Value::Shared(node.clone())),
        ));

        let err = serde_json::to_string(&Value::Shared(node.clone()));
        assert!(err.is_err());

        // break the cycle so the Arc can be dropped
        node.set(Value::Null);
    }

    #[test]
    fn test_shared_substructure_serializes_twice() {
        let shared = SharedNode::new("leaf");
        let value = Value::List(vec![
            Value::Shared(shared.clone()),
            Value::Shared(shared),
        ]);
        let json = serde_json::to_string(&value).expect("serialize");
        assert_eq!(json, r#"["leaf","leaf"]"#);
    }
}
