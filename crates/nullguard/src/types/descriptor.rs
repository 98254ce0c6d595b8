// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors for declared (static) type information.

use std::sync::Arc;

/// Primitive type kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    Char,
    String,
}

impl PrimitiveKind {
    /// Check if this is the character-string kind.
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String)
    }

    /// Inclusive integer range, `None` for non-integer kinds.
    pub fn int_range(&self) -> Option<(i128, i128)> {
        match self {
            Self::U8 => Some((0, u8::MAX as i128)),
            Self::U16 => Some((0, u16::MAX as i128)),
            Self::U32 => Some((0, u32::MAX as i128)),
            Self::U64 => Some((0, u64::MAX as i128)),
            Self::I8 => Some((i8::MIN as i128, i8::MAX as i128)),
            Self::I16 => Some((i16::MIN as i128, i16::MAX as i128)),
            Self::I32 => Some((i32::MIN as i128, i32::MAX as i128)),
            Self::I64 => Some((i64::MIN as i128, i64::MAX as i128)),
            _ => None,
        }
    }

    /// Short lowercase name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Char => "char",
            Self::String => "string",
        }
    }
}

/// Library-owned value types decoded from their string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpaqueKind {
    /// `uuid::Uuid`, hyphenated form.
    Uuid,
    /// `chrono::NaiveDate`, ISO-8601 `YYYY-MM-DD`.
    Date,
    /// `chrono::DateTime<Utc>`, RFC 3339.
    DateTime,
    /// `url::Url`.
    Url,
}

impl OpaqueKind {
    /// Fully qualified name of the owning library type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Uuid => "uuid::Uuid",
            Self::Date => "chrono::NaiveDate",
            Self::DateTime => "chrono::DateTime<Utc>",
            Self::Url => "url::Url",
        }
    }
}

/// Type kind enumeration.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    /// Primitive type.
    Primitive(PrimitiveKind),
    /// Optional box around one inner type.
    Optional(Arc<TypeDescriptor>),
    /// Ordered sequence.
    List(SequenceDescriptor),
    /// Unordered sequence (duplicates collapse).
    Set(SequenceDescriptor),
    /// Key-value mapping.
    Map(MapDescriptor),
    /// Array (fixed or unbounded length).
    Array(ArrayDescriptor),
    /// Record with fixed named components.
    Record(Vec<FieldDescriptor>),
    /// Class-like object with inherited and static fields.
    Object(ClassDescriptor),
    /// Enumeration.
    Enum(EnumDescriptor),
    /// Library-owned leaf type.
    Opaque(OpaqueKind),
    /// Plugged-in type, decoded and validated by extensions only.
    Custom(String),
    /// Untyped value, decoded as-is.
    Any,
    /// Nested type reference.
    Nested(Arc<TypeDescriptor>),
}

/// A complete type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    /// Type name.
    pub name: String,
    /// Type kind.
    pub kind: TypeKind,
}

impl TypeDescriptor {
    /// Create a new type descriptor.
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Create a primitive type descriptor.
    pub fn primitive(kind: PrimitiveKind) -> Self {
        Self::new(kind.name(), TypeKind::Primitive(kind))
    }

    /// Shorthand for the string primitive.
    pub fn string() -> Self {
        Self::primitive(PrimitiveKind::String)
    }

    /// Create an optional-box descriptor.
    pub fn optional(inner: Arc<TypeDescriptor>) -> Self {
        Self::new(
            format!("Option<{}>", inner.name),
            TypeKind::Optional(inner),
        )
    }

    /// Create a list descriptor.
    pub fn list(element_type: Arc<TypeDescriptor>) -> Self {
        Self::new(
            format!("List<{}>", element_type.name),
            TypeKind::List(SequenceDescriptor::new(element_type)),
        )
    }

    /// Create a set descriptor.
    pub fn set(element_type: Arc<TypeDescriptor>) -> Self {
        Self::new(
            format!("Set<{}>", element_type.name),
            TypeKind::Set(SequenceDescriptor::new(element_type)),
        )
    }

    /// Create a map descriptor.
    pub fn map(key_type: Arc<TypeDescriptor>, value_type: Arc<TypeDescriptor>) -> Self {
        Self::new(
            format!("Map<{}, {}>", key_type.name, value_type.name),
            TypeKind::Map(MapDescriptor::new(key_type, value_type)),
        )
    }

    /// Create an unbounded array descriptor.
    pub fn array(element_type: Arc<TypeDescriptor>) -> Self {
        Self::new(
            format!("{}[]", element_type.name),
            TypeKind::Array(ArrayDescriptor::unbounded(element_type)),
        )
    }

    /// Create a record descriptor.
    pub fn record(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self::new(name, TypeKind::Record(fields))
    }

    /// Create an opaque library type descriptor.
    pub fn opaque(kind: OpaqueKind) -> Self {
        Self::new(kind.type_name(), TypeKind::Opaque(kind))
    }

    /// Follow `Nested` references to the concrete descriptor.
    pub fn resolved(&self) -> &TypeDescriptor {
        match &self.kind {
            TypeKind::Nested(inner) => inner.resolved(),
            _ => self,
        }
    }

    /// Check if this is the string primitive (after nesting).
    pub fn is_string(&self) -> bool {
        matches!(
            self.resolved().kind,
            TypeKind::Primitive(PrimitiveKind::String)
        )
    }

    /// Check if this is a primitive type.
    pub fn is_primitive(&self) -> bool {
        matches!(self.resolved().kind, TypeKind::Primitive(_))
    }

    /// Get record fields if this is a record.
    pub fn fields(&self) -> Option<&[FieldDescriptor]> {
        match &self.resolved().kind {
            TypeKind::Record(fields) => Some(fields),
            _ => None,
        }
    }

    /// Get field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields()?.iter().find(|f| f.name == name)
    }

    /// First generic parameter (element, inner or key type).
    pub fn contained_type(&self, index: usize) -> Option<&Arc<TypeDescriptor>> {
        match (&self.resolved().kind, index) {
            (TypeKind::Optional(inner), 0) => Some(inner),
            (TypeKind::List(seq) | TypeKind::Set(seq), 0) => Some(&seq.element_type),
            (TypeKind::Array(arr), 0) => Some(&arr.element_type),
            (TypeKind::Map(map), 0) => Some(&map.key_type),
            (TypeKind::Map(map), 1) => Some(&map.value_type),
            _ => None,
        }
    }
}

/// Field descriptor for record components and object fields.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Field name.
    pub name: String,
    /// Field type.
    pub type_desc: Arc<TypeDescriptor>,
}

impl FieldDescriptor {
    /// Create a new field descriptor.
    pub fn new(name: impl Into<String>, type_desc: Arc<TypeDescriptor>) -> Self {
        Self {
            name: name.into(),
            type_desc,
        }
    }
}

/// Sequence (list or set) descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceDescriptor {
    /// Element type.
    pub element_type: Arc<TypeDescriptor>,
}

impl SequenceDescriptor {
    pub fn new(element_type: Arc<TypeDescriptor>) -> Self {
        Self { element_type }
    }
}

/// Mapping descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct MapDescriptor {
    /// Key type.
    pub key_type: Arc<TypeDescriptor>,
    /// Value type.
    pub value_type: Arc<TypeDescriptor>,
}

impl MapDescriptor {
    pub fn new(key_type: Arc<TypeDescriptor>, value_type: Arc<TypeDescriptor>) -> Self {
        Self {
            key_type,
            value_type,
        }
    }
}

/// Array type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayDescriptor {
    /// Element type.
    pub element_type: Arc<TypeDescriptor>,
    /// Fixed length (None = any length).
    pub length: Option<usize>,
}

impl ArrayDescriptor {
    /// Create an array of any length.
    pub fn unbounded(element_type: Arc<TypeDescriptor>) -> Self {
        Self {
            element_type,
            length: None,
        }
    }

    /// Create a fixed-length array.
    pub fn fixed(element_type: Arc<TypeDescriptor>, length: usize) -> Self {
        Self {
            element_type,
            length: Some(length),
        }
    }
}

/// Class-like object descriptor.
///
/// Instance fields are decoded; static fields only exist on the type and are
/// never part of a decoded instance.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDescriptor {
    /// Fields declared on this type level.
    pub fields: Vec<FieldDescriptor>,
    /// Static (type-level) field names.
    pub static_fields: Vec<String>,
    /// Parent class, if any.
    pub base: Option<Arc<TypeDescriptor>>,
}

impl ClassDescriptor {
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self {
            fields,
            static_fields: Vec::new(),
            base: None,
        }
    }

    /// Set the parent class.
    pub fn with_base(mut self, base: Arc<TypeDescriptor>) -> Self {
        self.base = Some(base);
        self
    }

    /// Declare a static field.
    pub fn with_static(mut self, name: impl Into<String>) -> Self {
        self.static_fields.push(name.into());
        self
    }
}

/// Enumeration type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDescriptor {
    /// Variant names in declaration order.
    pub variants: Vec<String>,
}

impl EnumDescriptor {
    /// Create enum descriptor.
    pub fn new<I, S>(variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            variants: variants.into_iter().map(Into::into).collect(),
        }
    }

    /// Check whether `name` is a declared variant.
    pub fn has_variant(&self, name: &str) -> bool {
        self.variants.iter().any(|v| v == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_range() {
        assert_eq!(PrimitiveKind::U8.int_range(), Some((0, 255)));
        assert_eq!(PrimitiveKind::I8.int_range(), Some((-128, 127)));
        assert_eq!(PrimitiveKind::F64.int_range(), None);
        assert_eq!(PrimitiveKind::String.int_range(), None);
    }

    #[test]
    fn test_record_descriptor() {
        let string = Arc::new(TypeDescriptor::string());
        let desc = TypeDescriptor::record(
            "Data",
            vec![
                FieldDescriptor::new("s", string.clone()),
                FieldDescriptor::new("list", Arc::new(TypeDescriptor::list(string))),
            ],
        );

        assert_eq!(desc.fields().map(|f| f.len()), Some(2));
        assert!(desc.field("s").is_some());
        assert!(desc.field("z").is_none());
    }

    #[test]
    fn test_contained_types() {
        let string = Arc::new(TypeDescriptor::string());
        let int = Arc::new(TypeDescriptor::primitive(PrimitiveKind::I32));
        let map = TypeDescriptor::map(string.clone(), int.clone());

        assert_eq!(map.name, "Map<string, i32>");
        assert!(map.contained_type(0).is_some_and(|t| t.is_string()));
        assert!(map.contained_type(1).is_some_and(|t| !t.is_string()));
        assert!(map.contained_type(2).is_none());

        let opt = TypeDescriptor::optional(string);
        assert!(opt.contained_type(0).is_some_and(|t| t.is_string()));
    }

    #[test]
    fn test_nested_resolution() {
        let inner = Arc::new(TypeDescriptor::string());
        let nested = TypeDescriptor::new("alias", TypeKind::Nested(inner));
        assert!(nested.is_string());
        assert!(nested.is_primitive());
    }

    #[test]
    fn test_enum_descriptor() {
        let e = EnumDescriptor::new(["A", "B"]);
        assert!(e.has_variant("A"));
        assert!(!e.has_variant("C"));
    }
}
