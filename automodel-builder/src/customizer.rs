use automodel_model::{
    ConventionSet, DbContext, HostModelBuilder, ModelCustomizer, discover_entity_sets,
};
use std::sync::Arc;
use tracing::debug;

use crate::builder::{ApplyReport, AutoModelBuilder};
use crate::error::{AutoModelError, AutoModelResult};
use crate::scope::AutoModelBuilderScope;

/// Host adapter running a set of auto model builders around the host's
/// own entity-set discovery.
///
/// Builders run in registration order within each scope: first every
/// builder for [`BeforeEntitySets`](AutoModelBuilderScope::BeforeEntitySets),
/// then the host's discovery, then every builder for
/// [`AfterEntitySets`](AutoModelBuilderScope::AfterEntitySets).
#[derive(Debug, Default, Clone)]
pub struct AutoModelCustomizer {
    builders: Vec<Arc<AutoModelBuilder>>,
}

impl AutoModelCustomizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builder(mut self, builder: AutoModelBuilder) -> Self {
        self.builders.push(Arc::new(builder));
        self
    }

    pub fn add_builder(&mut self, builder: Arc<AutoModelBuilder>) -> &mut Self {
        self.builders.push(builder);
        self
    }

    pub fn builders(&self) -> &[Arc<AutoModelBuilder>] {
        &self.builders
    }

    /// Applies every builder for one scope.
    pub fn apply_scope(
        &self,
        context: &dyn DbContext,
        scope: AutoModelBuilderScope,
        host: &mut dyn HostModelBuilder,
    ) -> AutoModelResult<Vec<ApplyReport>> {
        self.builders
            .iter()
            .map(|builder| builder.apply(context, scope, host))
            .collect()
    }
}

impl ModelCustomizer for AutoModelCustomizer {
    type Error = AutoModelError;

    fn modify_conventions(&self, conventions: &mut ConventionSet) -> AutoModelResult<()> {
        for builder in &self.builders {
            builder.apply_conventions(conventions)?;
        }
        Ok(())
    }

    fn customize(
        &self,
        context: &dyn DbContext,
        builder: &mut dyn HostModelBuilder,
    ) -> AutoModelResult<()> {
        self.apply_scope(context, AutoModelBuilderScope::BeforeEntitySets, builder)?;
        let sets = discover_entity_sets(context, builder)?;
        debug!(context = %context.context_type(), sets, "Host entity sets registered");
        self.apply_scope(context, AutoModelBuilderScope::AfterEntitySets, builder)?;
        Ok(())
    }
}
