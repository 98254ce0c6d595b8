// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Decode and validation errors.

use crate::path::Path;
use thiserror::Error;

/// Null values found in a value graph.
///
/// Carries every violating path, in traversal order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Null value(s) found at: {}", join(.paths))]
pub struct NullsFound {
    paths: Vec<Path>,
}

fn join(paths: &[Path]) -> String {
    crate::path::render(paths).join(", ")
}

impl NullsFound {
    /// Create from a non-empty violation list.
    pub fn new(paths: Vec<Path>) -> Self {
        Self { paths }
    }

    /// Violating paths.
    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    /// Take the violating paths.
    pub fn into_paths(self) -> Vec<Path> {
        self.paths
    }
}

/// Input could not be decoded into the declared shape.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Malformed input: {0}")]
    Syntax(#[from] serde_json::Error),

    #[error("Type mismatch at {path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: String,
        found: String,
    },

    #[error("Value out of range at {path}: {value} does not fit in {expected}")]
    OutOfRange {
        path: String,
        value: String,
        expected: &'static str,
    },

    #[error("Unknown variant '{variant}' of {type_name} at {path}")]
    UnknownVariant {
        path: String,
        type_name: String,
        variant: String,
    },

    #[error("Length mismatch at {path}: expected {expected} elements, found {found}")]
    LengthMismatch {
        path: String,
        expected: usize,
        found: usize,
    },

    #[error("Invalid {type_name} at {path}: {reason}")]
    InvalidOpaque {
        path: String,
        type_name: &'static str,
        reason: String,
    },

    #[error("No decoder for {type_name} at {path}")]
    Unsupported { path: String, type_name: String },

    #[error(transparent)]
    NullsFound(#[from] NullsFound),
}

impl DecodeError {
    /// Check if this error reports null values rather than malformed input.
    pub fn is_null_violation(&self) -> bool {
        matches!(self, Self::NullsFound(_))
    }
}
