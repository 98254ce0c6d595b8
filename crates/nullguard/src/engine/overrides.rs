// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-category null handling overrides.

use crate::types::Category;
use std::collections::HashMap;

/// What to do with a JSON `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nulls {
    /// Keep the step's null value.
    Set,
    /// Drop the element (content nulls only).
    Skip,
    /// Substitute the step's empty value.
    AsEmpty,
    /// Fail the decode with a null violation.
    Fail,
}

/// Null handling for one category: the slot itself and its contents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullHandling {
    /// Applies to a null or missing slot of this category.
    pub value_nulls: Option<Nulls>,
    /// Applies to null elements or entry values inside a container.
    pub content_nulls: Option<Nulls>,
}

impl NullHandling {
    pub fn for_value_nulls(nulls: Nulls) -> Self {
        Self {
            value_nulls: Some(nulls),
            content_nulls: None,
        }
    }

    pub fn for_content_nulls(nulls: Nulls) -> Self {
        Self {
            value_nulls: None,
            content_nulls: Some(nulls),
        }
    }

    /// Overlay `other` on top of `self`; settings present in `other` win.
    pub fn merge(self, other: NullHandling) -> Self {
        Self {
            value_nulls: other.value_nulls.or(self.value_nulls),
            content_nulls: other.content_nulls.or(self.content_nulls),
        }
    }
}

/// Null handling registered per [`Category`].
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    by_category: HashMap<Category, NullHandling>,
}

impl ConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `handling` into the override for `category`.
    pub fn set_null_handling(&mut self, category: Category, handling: NullHandling) {
        let entry = self.by_category.entry(category).or_default();
        *entry = entry.merge(handling);
    }

    /// Override for `category`.
    pub fn null_handling(&self, category: Category) -> NullHandling {
        self.by_category.get(&category).copied().unwrap_or_default()
    }

    pub fn value_nulls(&self, category: Category) -> Option<Nulls> {
        self.null_handling(category).value_nulls
    }

    pub fn content_nulls(&self, category: Category) -> Option<Nulls> {
        self.null_handling(category).content_nulls
    }

    pub fn is_empty(&self) -> bool {
        self.by_category.is_empty()
    }
}
