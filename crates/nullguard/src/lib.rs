// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Null-safety layer for structured data decoding.
//!
//! Finds, filters and rejects nulls in decoded value graphs.
//!
//! # Features
//!
//! - **Null-path validation**: report every null in a graph as a root-anchored path
//! - **Cycle safety**: shared nodes are visited once per call
//! - **Decode filters**: drop nulls from collections and maps while decoding
//! - **Declared-absent collections**: missing containers decode as empty ones
//! - **Strict outcomes**: three-way success / malformed input / null violation
//!
//! # Quick Start
//!
//! ```rust
//! use nullguard::config::PipelineConfig;
//! use nullguard::outcome::{Outcome, OutcomeResolver};
//! use nullguard::types::{TypeDescriptor, TypeDescriptorBuilder};
//! use std::sync::Arc;
//!
//! let desc = Arc::new(
//!     TypeDescriptorBuilder::new("Order")
//!         .string_field("id")
//!         .list_field("tags", Arc::new(TypeDescriptor::string()))
//!         .build(),
//! );
//!
//! let resolver = OutcomeResolver::from_config(PipelineConfig::default());
//! let order = resolver
//!     .resolve(r#"{"id":"o-1","tags":["a",null]}"#, &desc)
//!     .to_optional_success()
//!     .unwrap();
//! assert_eq!(order.get("tags").unwrap().to_string(), "[a]");
//!
//! let missing_id = resolver.resolve(r#"{"tags":[]}"#, &desc);
//! assert!(matches!(missing_id, Outcome::NullViolation(_)));
//! ```
//!
//! # Configuration File
//!
//! ```toml
//! filter_nulls_in_collections = true
//! filter_null_values_in_maps = true
//! treat_absent_collections_as_empty = true
//! empty_aware_optional_strings = true
//! fail_on_any_null_in_graph = true
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod outcome;
pub mod path;
pub mod types;
pub mod validate;
pub mod value;

pub use config::{ConfigError, EmptyCollectionInOptional, PipelineConfig};
pub use engine::{DecodeStep, Engine, Module};
pub use error::{DecodeError, NullsFound};
pub use filter::NoNullsModule;
pub use outcome::{Outcome, OutcomeResolver};
pub use path::{Path, Segment};
pub use types::{Category, TypeClassifier, TypeDescriptor, TypeDescriptorBuilder};
pub use validate::{assert_no_nulls, find_null_paths, has_no_nulls, NullPathValidator};
pub use value::{to_value, Value};
