use automodel_types::TypeKey;
use tracing::{debug, info};

use crate::builder::{HostModelBuilder, Model, ModelBuilder};
use crate::conventions::ConventionSet;
use crate::error::HostError;

/// A database context instance as seen during model building.
pub trait DbContext {
    /// Runtime type of the context, used by context selectors.
    fn context_type(&self) -> TypeKey;

    /// Entity sets the context declares itself. The host registers these
    /// during its own discovery pass.
    fn entity_sets(&self) -> Vec<TypeKey> {
        Vec::new()
    }
}

/// Plain-data context for hosts that describe contexts up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextInfo {
    pub context_type: TypeKey,
    pub entity_sets: Vec<TypeKey>,
}

impl ContextInfo {
    pub fn new(context_type: impl Into<TypeKey>) -> Self {
        Self {
            context_type: context_type.into(),
            entity_sets: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_entity_set(mut self, entity_type: impl Into<TypeKey>) -> Self {
        self.entity_sets.push(entity_type.into());
        self
    }
}

impl DbContext for ContextInfo {
    fn context_type(&self) -> TypeKey {
        self.context_type.clone()
    }

    fn entity_sets(&self) -> Vec<TypeKey> {
        self.entity_sets.clone()
    }
}

/// Extension point the host calls while building a model.
///
/// Implementations that only add to the default behaviour should call
/// [`discover_entity_sets`] from `customize` so declared sets still get
/// mapped.
pub trait ModelCustomizer {
    type Error: From<HostError>;

    /// Called once before the model builder is created.
    fn modify_conventions(&self, conventions: &mut ConventionSet) -> Result<(), Self::Error> {
        let _ = conventions;
        Ok(())
    }

    /// Called with a fresh model builder for `context`.
    fn customize(
        &self,
        context: &dyn DbContext,
        builder: &mut dyn HostModelBuilder,
    ) -> Result<(), Self::Error>;
}

/// Customizer that only runs the host's own entity-set discovery.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultModelCustomizer;

impl ModelCustomizer for DefaultModelCustomizer {
    type Error = HostError;

    fn customize(
        &self,
        context: &dyn DbContext,
        builder: &mut dyn HostModelBuilder,
    ) -> Result<(), HostError> {
        discover_entity_sets(context, builder).map(|_| ())
    }
}

/// The host's default discovery: registers every entity set the context
/// declares. Returns the number of sets visited.
pub fn discover_entity_sets(
    context: &dyn DbContext,
    builder: &mut dyn HostModelBuilder,
) -> Result<usize, HostError> {
    let sets = context.entity_sets();
    for entity_type in &sets {
        builder.register_entity(entity_type)?;
    }
    debug!(context = %context.context_type(), sets = sets.len(), "Entity sets discovered");
    Ok(sets.len())
}

/// Runs the host model-building lifecycle for one context: convention
/// hook, builder creation, customization, finish.
pub fn build_model<C>(
    context: &dyn DbContext,
    customizer: &C,
    mut conventions: ConventionSet,
) -> Result<Model, C::Error>
where
    C: ModelCustomizer + ?Sized,
{
    customizer.modify_conventions(&mut conventions)?;
    let mut builder = ModelBuilder::new(conventions);
    customizer.customize(context, &mut builder)?;
    let model = builder.finish();
    info!(
        context = %context.context_type(),
        entities = model.len(),
        "Model built"
    );
    Ok(model)
}
