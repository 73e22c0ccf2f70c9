use automodel_discovery::TypeSource;
use automodel_model::{ConventionSet, DbContext, HostModelBuilder};
use automodel_types::{Assembly, TypeCatalog, TypeKey};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::alteration::{
    AlterationCollection, BuilderAlteration, ConventionSetAlteration,
};
use crate::error::{AutoModelError, AutoModelResult};
use crate::factory::FactoryTable;
use crate::mapping::AutoMapping;
use crate::overrides::OverrideAlteration;
use crate::scope::AutoModelBuilderScope;
use crate::settings::{AutoConfiguration, AutoModelSettings};

type ContextFilter = dyn Fn(&TypeKey) -> bool + Send + Sync;

/// Why an `apply` call did nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "kebab-case")]
pub enum SkipReason {
    /// A `where_context` predicate rejected the context type.
    ContextFilter,
    /// The auto-configuration ignores the context type.
    ContextIgnored,
    /// The builder is pinned to another scope.
    ScopeMismatch {
        pinned: AutoModelBuilderScope,
        requested: AutoModelBuilderScope,
    },
    /// An unpinned builder was asked to run outside the default scopes.
    NotDefaultScope { requested: AutoModelBuilderScope },
    /// The auto-configuration disables the scope.
    ScopeDisabled { requested: AutoModelBuilderScope },
}

/// What one `apply` call did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    pub skipped: Option<SkipReason>,
    /// Types handed to the host, in registration order.
    pub registered: Vec<TypeKey>,
    pub overrides_applied: usize,
    /// Overrides whose handle had an unexpected shape.
    pub overrides_skipped: usize,
}

impl ApplyReport {
    fn skipped(reason: SkipReason) -> Self {
        Self {
            skipped: Some(reason),
            ..Self::default()
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.skipped.is_some()
    }
}

/// Discovers entity types, collects alterations and overrides, and applies
/// them to a host model builder.
///
/// Configuration goes through `&mut self`. [`apply`](Self::apply) takes
/// `&self` and works on a fresh copy of the mapping each time, so a
/// configured builder can be shared across threads and applied to any
/// number of contexts.
pub struct AutoModelBuilder {
    mapping: AutoMapping,
    alterations: AlterationCollection<dyn BuilderAlteration>,
    convention_alterations: AlterationCollection<dyn ConventionSetAlteration>,
    context_filters: Vec<Arc<ContextFilter>>,
    scope: Option<AutoModelBuilderScope>,
    auto_config: Arc<dyn AutoConfiguration>,
}

impl AutoModelBuilder {
    /// A builder with no sources, no factories and default settings.
    pub fn new(catalog: Arc<TypeCatalog>) -> Self {
        Self {
            mapping: AutoMapping::new(catalog, Arc::new(FactoryTable::default())),
            alterations: AlterationCollection::new(),
            convention_alterations: AlterationCollection::new(),
            context_filters: Vec::new(),
            scope: None,
            auto_config: Arc::new(AutoModelSettings::default()),
        }
    }

    /// Constructor table consulted by assembly scans.
    pub fn with_factories(mut self, factories: Arc<FactoryTable>) -> Self {
        self.mapping.set_factories(factories);
        self
    }

    pub fn with_auto_configuration(mut self, auto_config: Arc<dyn AutoConfiguration>) -> Self {
        self.auto_config = auto_config;
        self
    }

    pub fn add_type_source<S: TypeSource + 'static>(&mut self, source: S) -> &mut Self {
        self.mapping.add_type_source(source);
        self
    }

    pub fn add_assembly(&mut self, assembly: Arc<Assembly>) -> &mut Self {
        self.mapping.add_assembly(assembly);
        self
    }

    pub fn add_assembly_of(&mut self, ty: &TypeKey) -> AutoModelResult<&mut Self> {
        self.mapping.add_assembly_of(ty)?;
        Ok(self)
    }

    pub fn include(&mut self, ty: impl Into<TypeKey>) -> AutoModelResult<&mut Self> {
        self.mapping.include(ty)?;
        Ok(self)
    }

    pub fn exclude(&mut self, ty: impl Into<TypeKey>) -> AutoModelResult<&mut Self> {
        self.mapping.exclude(ty)?;
        Ok(self)
    }

    pub fn override_entity<H, F>(&mut self, ty: impl Into<TypeKey>, configure: F) -> AutoModelResult<&mut Self>
    where
        H: 'static,
        F: Fn(&mut H) + Send + Sync + 'static,
    {
        self.mapping.override_entity(ty, configure)?;
        Ok(self)
    }

    /// Registers the override types declared in `assembly`. Each call adds
    /// its own [`OverrideAlteration`], even for an assembly already added.
    pub fn use_overrides_from(&mut self, assembly: Arc<Assembly>) -> &mut Self {
        self.alterations.add(OverrideAlteration::new(assembly));
        self
    }

    pub fn use_overrides_from_assembly_of(&mut self, ty: &TypeKey) -> AutoModelResult<&mut Self> {
        let assembly = self.mapping.catalog().assembly_containing(ty)?;
        Ok(self.use_overrides_from(assembly))
    }

    pub fn add_alteration<T: BuilderAlteration + 'static>(&mut self, alteration: T) -> &mut Self {
        self.alterations.add(alteration);
        self
    }

    /// Instantiates every builder alteration type declared in `assembly`.
    pub fn add_alterations_from(&mut self, assembly: &Assembly) -> AutoModelResult<&mut Self> {
        self.alterations.add_from_assembly(
            assembly,
            self.mapping.catalog(),
            &self.mapping.factories().builder_alterations,
        )?;
        Ok(self)
    }

    pub fn add_convention_alteration<T: ConventionSetAlteration + 'static>(
        &mut self,
        alteration: T,
    ) -> &mut Self {
        self.convention_alterations.add(alteration);
        self
    }

    /// Instantiates every convention-set alteration type declared in
    /// `assembly`.
    pub fn add_convention_alterations_from(&mut self, assembly: &Assembly) -> AutoModelResult<&mut Self> {
        self.convention_alterations.add_from_assembly(
            assembly,
            self.mapping.catalog(),
            &self.mapping.factories().convention_alterations,
        )?;
        Ok(self)
    }

    /// Pins the builder to one scope. Overrides the default scopes.
    pub fn in_scope(&mut self, scope: AutoModelBuilderScope) -> &mut Self {
        self.scope = Some(scope);
        self
    }

    /// Restricts the builder to contexts matching `predicate`. All
    /// predicates must hold.
    pub fn where_context<F>(&mut self, predicate: F) -> &mut Self
    where
        F: Fn(&TypeKey) -> bool + Send + Sync + 'static,
    {
        self.context_filters.push(Arc::new(predicate));
        self
    }

    /// Restricts the builder to exactly one context type.
    pub fn for_context(&mut self, context_type: impl Into<TypeKey>) -> AutoModelResult<&mut Self> {
        let context_type = context_type.into();
        context_type.validate().map_err(|e| {
            AutoModelError::configuration(format!("cannot restrict to context '{context_type}': {e}"))
        })?;
        Ok(self.where_context(move |ty| *ty == context_type))
    }

    pub fn scope(&self) -> Option<AutoModelBuilderScope> {
        self.scope
    }

    pub fn mapping(&self) -> &AutoMapping {
        &self.mapping
    }

    pub fn alterations(&self) -> &AlterationCollection<dyn BuilderAlteration> {
        &self.alterations
    }

    pub fn convention_alterations(&self) -> &AlterationCollection<dyn ConventionSetAlteration> {
        &self.convention_alterations
    }

    /// A copy of the mapping with every builder alteration applied, in
    /// collection order. The builder itself is left untouched.
    pub fn resolve(&self) -> AutoModelResult<AutoMapping> {
        let mut mapping = self.mapping.clone();
        self.alterations.apply(&mut mapping)?;
        Ok(mapping)
    }

    /// Runs the context and scope gates; `None` means the builder applies.
    pub fn gate(&self, context_type: &TypeKey, scope: AutoModelBuilderScope) -> Option<SkipReason> {
        if !self.context_filters.iter().all(|filter| filter(context_type)) {
            return Some(SkipReason::ContextFilter);
        }
        if !self.auto_config.should_apply_to_context(context_type) {
            return Some(SkipReason::ContextIgnored);
        }
        match self.scope {
            Some(pinned) if pinned != scope => {
                return Some(SkipReason::ScopeMismatch {
                    pinned,
                    requested: scope,
                });
            }
            None if !self.auto_config.default_scopes().contains(&scope) => {
                return Some(SkipReason::NotDefaultScope { requested: scope });
            }
            _ => {}
        }
        if !self.auto_config.should_apply_in_scope(scope) {
            return Some(SkipReason::ScopeDisabled { requested: scope });
        }
        None
    }

    /// Registers every discovered entity type with `host`, then runs the
    /// overrides against the host's handles.
    ///
    /// Host errors propagate unchanged and leave earlier registrations in
    /// place. An override whose handle has an unexpected shape is skipped
    /// and counted in the report.
    pub fn apply(
        &self,
        context: &dyn DbContext,
        scope: AutoModelBuilderScope,
        host: &mut dyn HostModelBuilder,
    ) -> AutoModelResult<ApplyReport> {
        let context_type = context.context_type();
        if let Some(reason) = self.gate(&context_type, scope) {
            debug!(context = %context_type, %scope, ?reason, "Auto model builder skipped");
            return Ok(ApplyReport::skipped(reason));
        }

        let mapping = self.resolve()?;
        let registered = mapping.entity_types(self.auto_config.as_ref());
        for entity_type in &registered {
            host.register_entity(entity_type)?;
        }

        let mut report = ApplyReport {
            registered,
            ..ApplyReport::default()
        };
        for entry in mapping.overrides() {
            let handle = host.entity(entry.target())?;
            let actual = handle.handle_name();
            if entry.invoke(handle) {
                report.overrides_applied += 1;
            } else {
                warn!(
                    entity_type = %entry.target(),
                    expected = entry.expected_handle(),
                    actual,
                    "Override skipped: handle shape mismatch"
                );
                report.overrides_skipped += 1;
            }
        }

        info!(
            context = %context_type,
            %scope,
            entities = report.registered.len(),
            overrides = report.overrides_applied,
            "Auto model applied"
        );
        Ok(report)
    }

    /// Runs every convention-set alteration against `conventions`.
    pub fn apply_conventions(&self, conventions: &mut ConventionSet) -> AutoModelResult<()> {
        self.convention_alterations.apply(conventions)
    }
}

impl fmt::Debug for AutoModelBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutoModelBuilder")
            .field("mapping", &self.mapping)
            .field("alterations", &self.alterations)
            .field("convention_alterations", &self.convention_alterations)
            .field("context_filters", &self.context_filters.len())
            .field("scope", &self.scope)
            .finish()
    }
}
