// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Declared types and value classification.
//!
//! # Features
//!
//! - **TypeDescriptor**: Runtime description of a declared type (primitives,
//!   optionals, collections, records, class-like objects, enums, library types)
//! - **Builder API**: Fluent interface for record and object descriptors
//! - **TypeClassifier**: Maps a value (and its declared type) to a [`Category`]
//!
//! # Example
//!
//! ```rust
//! use nullguard::types::{Category, TypeClassifier, TypeDescriptor, TypeDescriptorBuilder};
//! use std::sync::Arc;
//!
//! let string = Arc::new(TypeDescriptor::string());
//! let desc = TypeDescriptorBuilder::new("Data")
//!     .string_field("s")
//!     .list_field("tags", string)
//!     .build();
//!
//! let classifier = TypeClassifier::default();
//! assert_eq!(classifier.classify_declared(&desc), Category::Record);
//! ```

mod builder;
mod classify;
mod descriptor;

pub use builder::TypeDescriptorBuilder;
pub use classify::{Category, OpaqueTypes, TypeClassifier, DEFAULT_OPAQUE_PREFIXES};
pub use descriptor::{
    ArrayDescriptor, ClassDescriptor, EnumDescriptor, FieldDescriptor, MapDescriptor,
    OpaqueKind, PrimitiveKind, SequenceDescriptor, TypeDescriptor, TypeKind,
};
