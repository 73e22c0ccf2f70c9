use automodel_types::{Assembly, TypeCatalog, TypeDescriptor, TypeKey};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::criteria::{
    self, BaseTypeCriterion, ConcreteTypeCriterion, Criterion, ExpressionCriterion,
    NamespaceCriterion,
};

/// Anything that yields candidate entity types.
///
/// Sources are evaluated fresh on every call; nothing is cached.
pub trait TypeSource: Send + Sync {
    fn types<'a>(
        &'a self,
        catalog: &'a TypeCatalog,
    ) -> Box<dyn Iterator<Item = &'a TypeDescriptor> + 'a>;

    /// Short label used in logs.
    fn identifier(&self) -> String;
}

/// Assemblies plus the criteria a type must meet to become a candidate.
#[derive(Default)]
pub struct DiscoveryContributor {
    assemblies: Vec<Arc<Assembly>>,
    criteria: Vec<Box<dyn Criterion>>,
}

impl DiscoveryContributor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an assembly to scan. An assembly already present (by name) is
    /// not added again.
    pub fn add_assembly(&mut self, assembly: Arc<Assembly>) -> &mut Self {
        if self.assemblies.iter().any(|a| a.name == assembly.name) {
            debug!(assembly = %assembly.name, "Assembly already part of contributor");
        } else {
            self.assemblies.push(assembly);
        }
        self
    }

    /// Adds the assembly that declares `ty`.
    pub fn add_assembly_of(
        &mut self,
        catalog: &TypeCatalog,
        ty: &TypeKey,
    ) -> automodel_types::Result<&mut Self> {
        let assembly = catalog.assembly_containing(ty)?;
        Ok(self.add_assembly(assembly))
    }

    pub fn add_criterion<C: Criterion>(&mut self, criterion: C) -> &mut Self {
        self.criteria.push(Box::new(criterion));
        self
    }

    /// Removes every criterion of kind `C`.
    pub fn remove_criteria<C: Criterion>(&mut self) -> &mut Self {
        self.criteria.retain(|c| !criteria::is_kind::<C>(c.as_ref()));
        self
    }

    pub fn has_criterion<C: Criterion>(&self) -> bool {
        self.criteria.iter().any(|c| criteria::is_kind::<C>(c.as_ref()))
    }

    /// Requires candidates to derive from `base`. Repeated calls widen the
    /// same base-type criterion (any listed base matches) and imply a
    /// single [`ConcreteTypeCriterion`]. A malformed key is rejected
    /// before any criterion changes.
    pub fn base_type(&mut self, base: impl Into<TypeKey>) -> automodel_types::Result<&mut Self> {
        let base = base.into();
        base.validate()?;
        let existing = self
            .criteria
            .iter_mut()
            .find_map(|c| criteria::downcast_mut::<BaseTypeCriterion>(c.as_mut()));
        match existing {
            Some(criterion) => {
                criterion.add_target(base);
            }
            None => {
                self.criteria.push(Box::new(BaseTypeCriterion::new(base)));
            }
        }
        if !self.has_criterion::<ConcreteTypeCriterion>() {
            self.criteria.push(Box::new(ConcreteTypeCriterion));
        }
        Ok(self)
    }

    /// Requires candidates to live in exactly `namespace`.
    pub fn in_namespace(&mut self, namespace: impl Into<String>) -> &mut Self {
        self.add_criterion(NamespaceCriterion::equals(namespace))
    }

    /// Requires candidates to live in `namespace` or below it.
    pub fn within_namespace(&mut self, namespace: impl Into<String>) -> &mut Self {
        self.add_criterion(NamespaceCriterion::within(namespace))
    }

    pub fn where_type<F>(&mut self, predicate: F) -> &mut Self
    where
        F: Fn(&TypeDescriptor) -> bool + Send + Sync + 'static,
    {
        self.add_criterion(ExpressionCriterion::new(predicate))
    }

    pub fn assemblies(&self) -> &[Arc<Assembly>] {
        &self.assemblies
    }

    pub fn criteria_len(&self) -> usize {
        self.criteria.len()
    }

    /// Exported types of every assembly, in assembly then declaration
    /// order, that satisfy all criteria.
    pub fn get_types<'a>(
        &'a self,
        catalog: &'a TypeCatalog,
    ) -> impl Iterator<Item = &'a TypeDescriptor> + 'a {
        self.assemblies
            .iter()
            .flat_map(|assembly| assembly.exported_types())
            .filter(move |ty| criteria::satisfies_all(&self.criteria, ty, catalog))
    }
}

impl TypeSource for DiscoveryContributor {
    fn types<'a>(
        &'a self,
        catalog: &'a TypeCatalog,
    ) -> Box<dyn Iterator<Item = &'a TypeDescriptor> + 'a> {
        Box::new(self.get_types(catalog))
    }

    fn identifier(&self) -> String {
        let names: Vec<&str> = self.assemblies.iter().map(|a| a.name.as_str()).collect();
        format!("assemblies[{}]", names.join(", "))
    }
}

impl fmt::Debug for DiscoveryContributor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscoveryContributor")
            .field("assemblies", &self.assemblies.iter().map(|a| &a.name).collect::<Vec<_>>())
            .field("criteria", &self.criteria.len())
            .finish()
    }
}

/// A fixed list of catalog types, yielded in the given order.
#[derive(Debug, Clone, Default)]
pub struct ExplicitTypeSource {
    types: Vec<TypeKey>,
}

impl ExplicitTypeSource {
    pub fn new<I, K>(types: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<TypeKey>,
    {
        Self {
            types: types.into_iter().map(Into::into).collect(),
        }
    }
}

impl TypeSource for ExplicitTypeSource {
    fn types<'a>(
        &'a self,
        catalog: &'a TypeCatalog,
    ) -> Box<dyn Iterator<Item = &'a TypeDescriptor> + 'a> {
        Box::new(self.types.iter().filter_map(move |key| {
            let found = catalog.get(key);
            if found.is_none() {
                warn!(entity_type = %key, "Explicit type source names a type missing from the catalog");
            }
            found
        }))
    }

    fn identifier(&self) -> String {
        format!("explicit[{}]", self.types.len())
    }
}
