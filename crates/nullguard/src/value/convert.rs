// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Conversions from Rust types into [`Value`].

use super::{EnumValue, Object, Record, SharedNode, Value};
use chrono::{DateTime, Datelike, NaiveDate, Utc};

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Int(i64::from(v))
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::UInt(u64::from(v))
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64);
impl_from_unsigned!(u8, u16, u32, u64);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Value::Char(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

/// `Option<T>` converts to an optional box, not to `Null`.
///
/// Use [`Value::nullable`] for a nullable slot.
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        Value::Optional(v.map(|inner| Box::new(inner.into())))
    }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self {
        Value::Record(v)
    }
}

impl From<EnumValue> for Value {
    fn from(v: EnumValue) -> Self {
        Value::Enum(v)
    }
}

impl From<Object> for Value {
    fn from(v: Object) -> Self {
        Value::Object(v)
    }
}

impl From<SharedNode> for Value {
    fn from(v: SharedNode) -> Self {
        Value::Shared(v)
    }
}

// Library-owned types keep their internal structure visible as objects, so
// only the opaque allow-list stops the validator from walking into them.

impl From<uuid::Uuid> for Value {
    fn from(v: uuid::Uuid) -> Self {
        let (high, low) = v.as_u64_pair();
        Value::Object(
            Object::new("uuid::Uuid")
                .field("high", high)
                .field("low", low),
        )
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Object(
            Object::new("chrono::NaiveDate")
                .field("year", v.year())
                .field("ordinal", v.ordinal()),
        )
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Object(
            Object::new("chrono::DateTime<Utc>")
                .field("secs", v.timestamp())
                .field("nanos", v.timestamp_subsec_nanos()),
        )
    }
}

impl From<url::Url> for Value {
    fn from(v: url::Url) -> Self {
        Value::Object(Object::new("url::Url").field("serialization", String::from(v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(Value::from(-3i8), Value::Int(-3));
        assert_eq!(Value::from(7u16), Value::UInt(7));
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from("a"), Value::String("a".into()));
    }

    #[test]
    fn test_option_is_boxed() {
        assert_eq!(Value::from(None::<String>), Value::none());
        assert_eq!(Value::from(Some("x")), Value::some("x"));
        assert_eq!(Value::nullable(None::<String>), Value::Null);
    }

    #[test]
    fn test_library_types_become_objects() {
        let url = url::Url::parse("https://example.org/a").expect("url");
        match Value::from(url) {
            Value::Object(obj) => {
                assert_eq!(obj.type_name, "url::Url");
                assert_eq!(
                    obj.get("serialization").and_then(Value::as_str),
                    Some("https://example.org/a")
                );
            }
            other => panic!("expected object, got {:?}", other),
        }
    }
}
