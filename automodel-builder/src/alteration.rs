//! Deferred configuration units and the ordered collection that holds them.

use automodel_model::ConventionSet;
use automodel_types::{Assembly, TypeCatalog};
use std::any::{TypeId, type_name};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::error::{AutoModelError, AutoModelResult};
use crate::factory::AlterationFactories;
use crate::mapping::AutoMapping;
use crate::overrides::OverrideAlteration;

/// Mutates a builder's mapping configuration before discovery runs.
pub trait BuilderAlteration: Send + Sync {
    fn alter(&self, mapping: &mut AutoMapping) -> AutoModelResult<()>;
}

/// Mutates the host's model-wide conventions.
pub trait ConventionSetAlteration: Send + Sync {
    fn alter(&self, conventions: &mut ConventionSet) -> AutoModelResult<()>;
}

/// Erases a concrete alteration into the trait object a collection holds.
pub trait IntoAlteration<A: ?Sized>: Sized + 'static {
    fn into_shared(self) -> Arc<A>;
}

impl<T: BuilderAlteration + 'static> IntoAlteration<dyn BuilderAlteration> for T {
    fn into_shared(self) -> Arc<dyn BuilderAlteration> {
        Arc::new(self)
    }
}

impl<T: ConventionSetAlteration + 'static> IntoAlteration<dyn ConventionSetAlteration> for T {
    fn into_shared(self) -> Arc<dyn ConventionSetAlteration> {
        Arc::new(self)
    }
}

/// One held alteration together with its concrete kind.
pub struct AlterationEntry<A: ?Sized> {
    kind: TypeId,
    kind_name: &'static str,
    alteration: Arc<A>,
}

impl<A: ?Sized> AlterationEntry<A> {
    pub fn new<T: IntoAlteration<A>>(alteration: T) -> Self {
        Self {
            kind: TypeId::of::<T>(),
            kind_name: type_name::<T>(),
            alteration: alteration.into_shared(),
        }
    }

    pub fn kind(&self) -> TypeId {
        self.kind
    }

    pub fn kind_name(&self) -> &'static str {
        self.kind_name
    }

    pub fn alteration(&self) -> &Arc<A> {
        &self.alteration
    }

    /// `OverrideAlteration` may appear once per override-bearing assembly.
    /// Every other kind is held at most once.
    fn allows_duplicates(&self) -> bool {
        self.kind == TypeId::of::<OverrideAlteration>()
    }
}

impl<A: ?Sized> Clone for AlterationEntry<A> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            kind_name: self.kind_name,
            alteration: Arc::clone(&self.alteration),
        }
    }
}

impl<A: ?Sized> fmt::Debug for AlterationEntry<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AlterationEntry").field(&self.kind_name).finish()
    }
}

/// Ordered alterations, de-duplicated by concrete kind.
///
/// The first registration of a kind wins; later ones are dropped silently.
/// [`OverrideAlteration`] is exempt: each instance carries a different
/// assembly, so all of them are kept. That exemption is keyed on the
/// concrete type, so renaming or splitting the override alteration must
/// keep it in step.
pub struct AlterationCollection<A: ?Sized> {
    entries: Vec<AlterationEntry<A>>,
}

impl<A: ?Sized> Default for AlterationCollection<A> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<A: ?Sized> Clone for AlterationCollection<A> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<A: ?Sized> fmt::Debug for AlterationCollection<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|e| e.kind_name))
            .finish()
    }
}

impl<A: ?Sized> AlterationCollection<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<T: IntoAlteration<A>>(&mut self, alteration: T) -> &mut Self {
        self.add_entry(AlterationEntry::new(alteration))
    }

    pub fn add_entry(&mut self, entry: AlterationEntry<A>) -> &mut Self {
        if !entry.allows_duplicates() && self.entries.iter().any(|e| e.kind == entry.kind) {
            debug!(kind = entry.kind_name, "Alteration kind already registered, keeping the first");
            return self;
        }
        self.entries.push(entry);
        self
    }

    /// Instantiates and adds every exported, concrete type in `assembly`
    /// that implements the factories' capability. A matching type without
    /// a registered factory is an instantiation error; entries added before
    /// the failure stay in the collection.
    pub fn add_from_assembly(
        &mut self,
        assembly: &Assembly,
        catalog: &TypeCatalog,
        factories: &AlterationFactories<A>,
    ) -> AutoModelResult<&mut Self> {
        for ty in assembly.exported_types() {
            if ty.is_abstract() || !catalog.is_assignable_to(&ty.key, factories.capability()) {
                continue;
            }
            let entry = factories
                .create(&ty.key)
                .ok_or_else(|| AutoModelError::Instantiation {
                    type_key: ty.key.clone(),
                    reason: format!("no factory registered for {}", factories.capability()),
                })?;
            self.add_entry(entry);
        }
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_kind<T: 'static>(&self) -> bool {
        let kind = TypeId::of::<T>();
        self.entries.iter().any(|e| e.kind == kind)
    }

    /// Kind names in collection order.
    pub fn kinds(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.kind_name).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<A>> {
        self.entries.iter().map(|e| &e.alteration)
    }
}

impl AlterationCollection<dyn BuilderAlteration> {
    /// Runs every alteration against `mapping`, in collection order.
    pub fn apply(&self, mapping: &mut AutoMapping) -> AutoModelResult<()> {
        for entry in &self.entries {
            debug!(kind = entry.kind_name, "Applying builder alteration");
            entry.alteration.alter(mapping)?;
        }
        Ok(())
    }
}

impl AlterationCollection<dyn ConventionSetAlteration> {
    /// Runs every alteration against `conventions`, in collection order.
    pub fn apply(&self, conventions: &mut ConventionSet) -> AutoModelResult<()> {
        for entry in &self.entries {
            debug!(kind = entry.kind_name, "Applying convention-set alteration");
            entry.alteration.alter(conventions)?;
        }
        Ok(())
    }
}
