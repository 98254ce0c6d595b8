// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Null-filtering decode steps and the module that installs them.
//!
//! # Features
//!
//! - **SequenceFilter / ArrayFilter**: drop null and blank-string elements
//! - **MapFilter**: drop entries with a null value
//! - **EmptyAwareOptional**: null, missing and blank strings become empty optionals
//! - **NullValidatingStep**: fail records that still hold nulls
//!
//! # Example
//!
//! ```rust
//! use nullguard::config::PipelineConfig;
//! use nullguard::engine::Engine;
//! use nullguard::filter::NoNullsModule;
//! use nullguard::types::TypeDescriptor;
//! use nullguard::value::Value;
//! use std::sync::Arc;
//!
//! let engine = Engine::new().with_module(NoNullsModule::new(PipelineConfig::default()));
//! let list = Arc::new(TypeDescriptor::list(Arc::new(TypeDescriptor::string())));
//! let value = engine.decode(r#"["a", null, " ", "b"]"#, &list).unwrap();
//! assert_eq!(value, Value::from(vec!["a", "b"]));
//! ```

mod map;
mod optional;
mod sequence;
mod validating;


pub use map::MapFilter;
pub use optional::EmptyAwareOptional;
pub use sequence::{ArrayFilter, SequenceFilter};
pub use validating::NullValidatingStep;

use crate::config::{EmptyCollectionInOptional, PipelineConfig};
use crate::engine::{DecodeStep, Module, NullHandling, Nulls, SetupContext, StepModifier};
use crate::types::{Category, TypeDescriptor};
use crate::validate::{global_registry, NullPathValidator};
use std::sync::Arc;

const COLLECTIONS: [Category; 3] = [
    Category::OrderedSequence,
    Category::UnorderedSequence,
    Category::Array,
];

/// Installs the filters selected by a [`PipelineConfig`].
#[derive(Debug, Clone, Default)]
pub struct NoNullsModule {
    config: PipelineConfig,
}

impl NoNullsModule {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}

impl Module for NoNullsModule {
    fn name(&self) -> &str {
        "no-nulls"
    }

    fn setup(&self, ctx: &mut SetupContext<'_>) {
        let config = &self.config;
        ctx.set_classifier(config.classifier());

        if config.empty_aware_optional_strings {
            ctx.add_step_modifier(OptionalModifier {
                empty_collections: config.empty_collection_in_optional,
            });
        }

        if config.treat_absent_collections_as_empty {
            for category in COLLECTIONS
                .into_iter()
                .chain([Category::Mapping, Category::OptionalBox])
            {
                ctx.set_null_handling(category, NullHandling::for_value_nulls(Nulls::AsEmpty));
            }
        }

        if config.filter_nulls_in_collections {
            for category in COLLECTIONS {
                ctx.set_null_handling(category, NullHandling::for_content_nulls(Nulls::Skip));
            }
            ctx.add_step_modifier(CollectionFilterModifier {
                skip_blank_strings: config.skip_blank_strings,
            });
        }

        if config.filter_null_values_in_maps {
            ctx.add_step_modifier(MapFilterModifier);
        }

        if config.fail_on_any_null_in_graph {
            let validator = NullPathValidator::new(global_registry(), ctx.classifier().clone());
            ctx.add_step_modifier(NullValidatingModifier { validator });
        }

        tracing::debug!(?config, "no-nulls module configured");
    }
}

struct OptionalModifier {
    empty_collections: EmptyCollectionInOptional,
}

impl StepModifier for OptionalModifier {
    fn modify(
        &self,
        declared: &Arc<TypeDescriptor>,
        category: Category,
        step: Arc<dyn DecodeStep>,
    ) -> Arc<dyn DecodeStep> {
        match (category, declared.contained_type(0)) {
            (Category::OptionalBox, Some(inner)) => Arc::new(EmptyAwareOptional::new(
                inner.clone(),
                self.empty_collections,
            )),
            _ => step,
        }
    }
}

struct CollectionFilterModifier {
    skip_blank_strings: bool,
}

impl StepModifier for CollectionFilterModifier {
    fn modify(
        &self,
        _declared: &Arc<TypeDescriptor>,
        category: Category,
        step: Arc<dyn DecodeStep>,
    ) -> Arc<dyn DecodeStep> {
        match category {
            Category::OrderedSequence | Category::UnorderedSequence => {
                Arc::new(SequenceFilter::new(step, self.skip_blank_strings))
            }
            Category::Array => Arc::new(ArrayFilter::new(step, self.skip_blank_strings)),
            _ => step,
        }
    }
}

struct MapFilterModifier;

impl StepModifier for MapFilterModifier {
    fn modify(
        &self,
        _declared: &Arc<TypeDescriptor>,
        category: Category,
        step: Arc<dyn DecodeStep>,
    ) -> Arc<dyn DecodeStep> {
        if category == Category::Mapping {
            Arc::new(MapFilter::new(step))
        } else {
            step
        }
    }
}

struct NullValidatingModifier {
    validator: NullPathValidator,
}

impl StepModifier for NullValidatingModifier {
    fn modify(
        &self,
        _declared: &Arc<TypeDescriptor>,
        category: Category,
        step: Arc<dyn DecodeStep>,
    ) -> Arc<dyn DecodeStep> {
        if category.is_leaf() {
            return step;
        }
        Arc::new(NullValidatingStep::new(step, self.validator.clone()))
    }
}
