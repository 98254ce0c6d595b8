// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Value graph produced by decoding and inspected by the validator.
//!
//! Owned variants form a tree. Shared or cyclic structure only exists through
//! [`SharedNode`] (and [`CustomValue`] handles), which carry a pointer
//! identity used for cycle detection.

mod convert;
mod ser;

pub use ser::{to_value, SerializeError};

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// A decoded runtime value.
#[derive(Debug, Clone)]
pub enum Value {
    /// Explicit null / absent value.
    Null,

    // Terminals
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Char(char),
    String(String),

    // Containers
    Optional(Option<Box<Value>>),
    List(Vec<Value>),
    Set(Vec<Value>),
    /// Insertion-ordered key/value entries.
    Map(Vec<(Value, Value)>),
    Array(Vec<Value>),

    // Named shapes
    Record(Record),
    Enum(EnumValue),
    Object(Object),

    // Identity-carrying nodes
    Shared(SharedNode),
    Custom(Arc<dyn CustomValue>),
}

impl Value {
    /// Present optional.
    pub fn some(value: impl Into<Value>) -> Self {
        Self::Optional(Some(Box::new(value.into())))
    }

    /// Empty optional.
    pub fn none() -> Self {
        Self::Optional(None)
    }

    /// `Null` for `None`, the value otherwise.
    pub fn nullable<T: Into<Value>>(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }

    /// Check if value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Check for an empty or whitespace-only string.
    pub fn is_blank_string(&self) -> bool {
        matches!(self, Self::String(s) if s.trim().is_empty())
    }

    /// Try to get as string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::UInt(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Elements of a list, set or array.
    pub fn as_elements(&self) -> Option<&[Value]> {
        match self {
            Self::List(v) | Self::Set(v) | Self::Array(v) => Some(v),
            _ => None,
        }
    }

    /// Entries of a map.
    pub fn as_entries(&self) -> Option<&[(Value, Value)]> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Contents of an optional box: `Some(None)` when empty.
    pub fn as_optional(&self) -> Option<Option<&Value>> {
        match self {
            Self::Optional(inner) => Some(inner.as_deref()),
            _ => None,
        }
    }

    /// Look up a record field or instance member by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self {
            Self::Record(record) => record.get(name),
            Self::Object(object) => object.get(name),
            _ => None,
        }
    }

    /// Look up a map value by its string key.
    pub fn map_get(&self, key: &str) -> Option<&Value> {
        self.as_entries()?
            .iter()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v)
    }

    /// Check if this is an empty list, set, array or map.
    pub fn is_empty_container(&self) -> bool {
        match self {
            Self::List(v) | Self::Set(v) | Self::Array(v) => v.is_empty(),
            Self::Map(entries) => entries.is_empty(),
            _ => false,
        }
    }

    /// Runtime type name, used by type handlers to claim values.
    pub fn type_name(&self) -> Cow<'_, str> {
        match self {
            Self::Null => Cow::Borrowed("null"),
            Self::Bool(_) => Cow::Borrowed("bool"),
            Self::Int(_) => Cow::Borrowed("i64"),
            Self::UInt(_) => Cow::Borrowed("u64"),
            Self::Float(_) => Cow::Borrowed("f64"),
            Self::Char(_) => Cow::Borrowed("char"),
            Self::String(_) => Cow::Borrowed("string"),
            Self::Optional(_) => Cow::Borrowed("option"),
            Self::List(_) => Cow::Borrowed("list"),
            Self::Set(_) => Cow::Borrowed("set"),
            Self::Map(_) => Cow::Borrowed("map"),
            Self::Array(_) => Cow::Borrowed("array"),
            Self::Record(r) => Cow::Borrowed(&r.type_name),
            Self::Enum(e) => Cow::Borrowed(&e.type_name),
            Self::Object(o) => Cow::Borrowed(&o.type_name),
            Self::Shared(node) => match node.try_read() {
                Some(inner) => Cow::Owned(inner.type_name().into_owned()),
                None => Cow::Borrowed("shared"),
            },
            Self::Custom(c) => Cow::Borrowed(c.type_name()),
        }
    }

    /// Identity of identity-carrying nodes.
    pub fn node_id(&self) -> Option<NodeId> {
        match self {
            Self::Shared(node) => Some(node.id()),
            Self::Custom(c) => Some(NodeId(Arc::as_ptr(c) as *const () as usize)),
            _ => None,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::Null
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::UInt(a), Self::UInt(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Optional(a), Self::Optional(b)) => a == b,
            (Self::List(a), Self::List(b))
            | (Self::Set(a), Self::Set(b))
            | (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Record(a), Self::Record(b)) => a == b,
            (Self::Enum(a), Self::Enum(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            // identity, not structure: shared graphs may be cyclic
            (Self::Shared(a), Self::Shared(b)) => a.id() == b.id(),
            (Self::Custom(_), Self::Custom(_)) => self.node_id() == other.node_id(),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::UInt(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Char(v) => write!(f, "{}", v),
            Self::String(v) => f.write_str(v),
            Self::Optional(None) => f.write_str("None"),
            Self::Optional(Some(v)) => write!(f, "Some({})", v),
            Self::List(items) | Self::Set(items) | Self::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Self::Map(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}={}", k, v)?;
                }
                f.write_str("}")
            }
            Self::Record(r) => {
                write!(f, "{}[", r.type_name)?;
                for (i, (name, v)) in r.fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}={}", name, v)?;
                }
                f.write_str("]")
            }
            Self::Enum(e) => f.write_str(&e.variant),
            Self::Object(o) => write!(f, "{}@{}", o.type_name, o.instance_members().count()),
            // shallow: shared nodes may close a cycle
            Self::Shared(node) => write!(f, "&{}", Value::Shared(node.clone()).type_name()),
            Self::Custom(c) => f.write_str(c.type_name()),
        }
    }
}

/// Record with fixed, named components in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub type_name: String,
    pub fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a component.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Get component by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Get mutable component by name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.fields
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Replace or append a component.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        match self.get_mut(&name) {
            Some(slot) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }
}

/// Enumeration constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub type_name: String,
    pub variant: String,
}

impl EnumValue {
    pub fn new(type_name: impl Into<String>, variant: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            variant: variant.into(),
        }
    }
}

/// How a member is attached to its type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// Per-instance field.
    Instance,
    /// Type-level field shared by all instances.
    Static,
    /// Compiler/host generated field (e.g. an enclosing-instance pointer).
    Synthetic,
}

/// A reflected field.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub name: String,
    pub kind: MemberKind,
    pub value: Value,
}

/// Fields declared on one level of a type hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub type_name: String,
    pub members: Vec<Member>,
}

impl Level {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            members: Vec::new(),
        }
    }

    /// Append an instance field.
    pub fn field(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.member(name, MemberKind::Instance, value)
    }

    /// Append a member of any kind.
    pub fn member(
        mut self,
        name: impl Into<String>,
        kind: MemberKind,
        value: impl Into<Value>,
    ) -> Self {
        self.members.push(Member {
            name: name.into(),
            kind,
            value: value.into(),
        });
        self
    }
}

/// Reflective view of a class-like object.
///
/// `levels[0]` is the most-derived type; ancestors follow in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub type_name: String,
    pub levels: Vec<Level>,
}

impl Object {
    pub fn new(type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        Self {
            levels: vec![Level::new(type_name.clone())],
            type_name,
        }
    }

    /// Append an instance field to the most-derived level.
    pub fn field(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.member(name, MemberKind::Instance, value)
    }

    /// Append a static field to the most-derived level.
    pub fn static_field(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.member(name, MemberKind::Static, value)
    }

    /// Append a member of any kind to the most-derived level.
    pub fn member(
        mut self,
        name: impl Into<String>,
        kind: MemberKind,
        value: impl Into<Value>,
    ) -> Self {
        if let Some(level) = self.levels.first_mut() {
            level.members.push(Member {
                name: name.into(),
                kind,
                value: value.into(),
            });
        }
        self
    }

    /// Append an ancestor level.
    pub fn extends(mut self, level: Level) -> Self {
        self.levels.push(level);
        self
    }

    /// Instance members, most-derived level first, declaration order within a level.
    pub fn instance_members(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.levels
            .iter()
            .flat_map(|level| level.members.iter())
            .filter(|m| m.kind == MemberKind::Instance)
            .map(|m| (m.name.as_str(), &m.value))
    }

    /// Get instance member by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.instance_members()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    /// Get mutable instance member by name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.levels
            .iter_mut()
            .flat_map(|level| level.members.iter_mut())
            .find(|m| m.kind == MemberKind::Instance && m.name == name)
            .map(|m| &mut m.value)
    }
}

/// Pointer identity of a shared node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Reference-counted, lockable graph node.
#[derive(Clone)]
pub struct SharedNode(Arc<RwLock<Value>>);

impl SharedNode {
    pub fn new(value: impl Into<Value>) -> Self {
        Self(Arc::new(RwLock::new(value.into())))
    }

    /// Pointer identity.
    pub fn id(&self) -> NodeId {
        NodeId(Arc::as_ptr(&self.0) as *const () as usize)
    }

    /// Shared read access.
    pub fn read(&self) -> RwLockReadGuard<'_, Value> {
        self.0.read()
    }

    /// Read access unless a writer currently holds the node.
    pub fn try_read(&self) -> Option<RwLockReadGuard<'_, Value>> {
        self.0.try_read_recursive()
    }

    /// Exclusive write access.
    pub fn write(&self) -> RwLockWriteGuard<'_, Value> {
        self.0.write()
    }

    /// Replace the node contents.
    pub fn set(&self, value: impl Into<Value>) {
        *self.0.write() = value.into();
    }
}

impl fmt::Debug for SharedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedNode({:#x})", self.id().0)
    }
}

/// Shape exposed by custom container values.
#[derive(Debug)]
pub enum Traversal<'a> {
    /// Ordered or unordered elements.
    Sequence(Vec<&'a Value>),
    /// Key/value entries.
    Mapping(Vec<(&'a Value, &'a Value)>),
    /// Zero or one contained value (option, lazy, try-like boxes).
    Boxed(Option<&'a Value>),
}

/// Values of plugged-in types.
pub trait CustomValue: Send + Sync + fmt::Debug {
    /// Type identity used by handlers to claim the value.
    fn type_name(&self) -> &str;

    /// Container view, if this type holds other values.
    fn traversal(&self) -> Option<Traversal<'_>> {
        None
    }

    /// Reflected fields, used when no handler claims the value.
    fn fields(&self) -> Vec<(&str, &Value)> {
        Vec::new()
    }

    /// Downcast support.
    fn as_any(&self) -> &dyn Any;
}
