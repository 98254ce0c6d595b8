// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Pipeline configuration.
//!
//! Supports both programmatic and file-based configuration.
//!
//! ```toml
//! filter_nulls_in_collections = true
//! filter_null_values_in_maps = true
//! treat_absent_collections_as_empty = true
//! empty_aware_optional_strings = true
//! fail_on_any_null_in_graph = false
//! empty_collection_in_optional = "keep_present"
//! opaque_prefixes = ["money::"]
//! ```

use crate::types::{OpaqueTypes, TypeClassifier};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// What an optional holding an emptied collection decodes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyCollectionInOptional {
    /// `[null]` inside an optional list decodes to a present, empty list.
    #[default]
    KeepPresent,
    /// An optional whose collection ends up empty decodes to absent.
    TreatAsAbsent,
}

/// Feature toggles for the null-filtering pipeline.
///
/// Immutable once handed to a module; share it by reference or clone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Drop null (and blank string) elements from lists, sets and arrays.
    #[serde(default = "default_true")]
    pub filter_nulls_in_collections: bool,

    /// Drop map entries whose value is null.
    #[serde(default = "default_true")]
    pub filter_null_values_in_maps: bool,

    /// Decode a missing or null container field as an empty container.
    #[serde(default = "default_true")]
    pub treat_absent_collections_as_empty: bool,

    /// Decode null, missing and blank strings in optionals as absent.
    #[serde(default = "default_true")]
    pub empty_aware_optional_strings: bool,

    /// Fail record decoding when any null remains in the decoded graph.
    #[serde(default)]
    pub fail_on_any_null_in_graph: bool,

    /// Treat empty and whitespace-only strings as nulls in collections.
    #[serde(default = "default_true")]
    pub skip_blank_strings: bool,

    /// Result for optionals holding a collection that filtering emptied.
    #[serde(default)]
    pub empty_collection_in_optional: EmptyCollectionInOptional,

    /// Extra type-name prefixes treated as opaque leaves.
    #[serde(default)]
    pub opaque_prefixes: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            filter_nulls_in_collections: true,
            filter_null_values_in_maps: true,
            treat_absent_collections_as_empty: true,
            empty_aware_optional_strings: true,
            fail_on_any_null_in_graph: false,
            skip_blank_strings: true,
            empty_collection_in_optional: EmptyCollectionInOptional::KeepPresent,
            opaque_prefixes: Vec::new(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for prefix in &self.opaque_prefixes {
            if prefix.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "opaque_prefixes entries must not be empty".into(),
                ));
            }
            if prefix.chars().any(char::is_whitespace) {
                return Err(ConfigError::Invalid(format!(
                    "opaque prefix '{}' contains whitespace",
                    prefix
                )));
            }
        }
        Ok(())
    }

    /// Turn every filter off. Strict null checking is left unchanged.
    pub fn disable_all(mut self) -> Self {
        self.filter_nulls_in_collections = false;
        self.filter_null_values_in_maps = false;
        self.treat_absent_collections_as_empty = false;
        self.empty_aware_optional_strings = false;
        self
    }

    pub fn filter_nulls_in_collections(mut self, enabled: bool) -> Self {
        self.filter_nulls_in_collections = enabled;
        self
    }

    pub fn filter_null_values_in_maps(mut self, enabled: bool) -> Self {
        self.filter_null_values_in_maps = enabled;
        self
    }

    pub fn treat_absent_collections_as_empty(mut self, enabled: bool) -> Self {
        self.treat_absent_collections_as_empty = enabled;
        self
    }

    pub fn empty_aware_optional_strings(mut self, enabled: bool) -> Self {
        self.empty_aware_optional_strings = enabled;
        self
    }

    pub fn fail_on_any_null_in_graph(mut self, enabled: bool) -> Self {
        self.fail_on_any_null_in_graph = enabled;
        self
    }

    pub fn skip_blank_strings(mut self, enabled: bool) -> Self {
        self.skip_blank_strings = enabled;
        self
    }

    pub fn empty_collection_in_optional(mut self, policy: EmptyCollectionInOptional) -> Self {
        self.empty_collection_in_optional = policy;
        self
    }

    /// Add an opaque type-name prefix.
    pub fn opaque_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.opaque_prefixes.push(prefix.into());
        self
    }

    /// Classifier with the default allow-list plus configured prefixes.
    pub fn classifier(&self) -> TypeClassifier {
        let opaque = self
            .opaque_prefixes
            .iter()
            .fold(OpaqueTypes::default(), |acc, p| acc.with_prefix(p.clone()));
        TypeClassifier::new(opaque)
    }
}
