//! Constructor tables for types discovered by assembly scans.
//!
//! A scan only yields [`TypeKey`]s. Whatever should be instantiated for a
//! key is registered here at startup; a discovered key with no entry is an
//! instantiation error.

use automodel_types::TypeKey;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::alteration::{
    AlterationEntry, BuilderAlteration, ConventionSetAlteration, IntoAlteration,
};
use crate::overrides::{EntityOverride, EntityTypeOverride};

/// Interface implemented by catalog types describing builder alterations.
pub const BUILDER_ALTERATION_CAPABILITY: &str = "automodel.BuilderAlteration";

/// Interface implemented by catalog types describing convention alterations.
pub const CONVENTION_SET_ALTERATION_CAPABILITY: &str = "automodel.ConventionSetAlteration";

/// Open generic interface implemented by catalog types describing entity
/// overrides; the argument names the overridden entity.
pub const ENTITY_TYPE_OVERRIDE_CAPABILITY: &str = "automodel.EntityTypeOverride`1";

type AlterationFactory<A> = Arc<dyn Fn() -> AlterationEntry<A> + Send + Sync>;

/// Factories for one alteration capability.
pub struct AlterationFactories<A: ?Sized> {
    capability: TypeKey,
    factories: HashMap<TypeKey, AlterationFactory<A>>,
}

impl<A: ?Sized> AlterationFactories<A> {
    pub fn new(capability: impl Into<TypeKey>) -> Self {
        Self {
            capability: capability.into(),
            factories: HashMap::new(),
        }
    }

    /// The interface a catalog type must implement to be picked up.
    pub fn capability(&self) -> &TypeKey {
        &self.capability
    }

    pub fn create(&self, ty: &TypeKey) -> Option<AlterationEntry<A>> {
        self.factories.get(ty).map(|factory| factory())
    }

    pub fn contains(&self, ty: &TypeKey) -> bool {
        self.factories.contains_key(ty)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl<A: ?Sized + 'static> AlterationFactories<A> {
    /// Registers `T::default()` as the instance for catalog type `ty`.
    pub fn register<T>(&mut self, ty: impl Into<TypeKey>) -> &mut Self
    where
        T: IntoAlteration<A> + Default,
    {
        self.register_with(ty, T::default)
    }

    /// Registers a custom constructor for catalog type `ty`.
    pub fn register_with<T, F>(&mut self, ty: impl Into<TypeKey>, make: F) -> &mut Self
    where
        T: IntoAlteration<A>,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let factory: AlterationFactory<A> = Arc::new(move || AlterationEntry::<A>::new(make()));
        self.factories.insert(ty.into(), factory);
        self
    }
}

impl<A: ?Sized> fmt::Debug for AlterationFactories<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlterationFactories")
            .field("capability", &self.capability)
            .field("types", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

type OverrideFactory = Arc<dyn Fn(&TypeKey) -> EntityOverride + Send + Sync>;

/// Factories for override types, keyed by the override's catalog type.
#[derive(Default)]
pub struct OverrideFactories {
    factories: HashMap<TypeKey, OverrideFactory>,
}

impl OverrideFactories {
    pub fn register<O>(&mut self, ty: impl Into<TypeKey>) -> &mut Self
    where
        O: EntityTypeOverride + Default,
    {
        self.register_with(ty, O::default)
    }

    pub fn register_with<O, F>(&mut self, ty: impl Into<TypeKey>, make: F) -> &mut Self
    where
        O: EntityTypeOverride,
        F: Fn() -> O + Send + Sync + 'static,
    {
        let override_type = ty.into();
        let key = override_type.clone();
        let factory: OverrideFactory = Arc::new(move |target: &TypeKey| {
            EntityOverride::reflected(target.clone(), override_type.clone(), make())
        });
        self.factories.insert(key, factory);
        self
    }

    /// Builds the override declared by catalog type `ty` for `target`.
    pub fn create(&self, ty: &TypeKey, target: &TypeKey) -> Option<EntityOverride> {
        self.factories.get(ty).map(|factory| factory(target))
    }

    pub fn contains(&self, ty: &TypeKey) -> bool {
        self.factories.contains_key(ty)
    }
}

impl fmt::Debug for OverrideFactories {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverrideFactories")
            .field("types", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Every constructor table a builder consults during assembly scans.
#[derive(Debug)]
pub struct FactoryTable {
    pub builder_alterations: AlterationFactories<dyn BuilderAlteration>,
    pub convention_alterations: AlterationFactories<dyn ConventionSetAlteration>,
    pub overrides: OverrideFactories,
}

impl Default for FactoryTable {
    fn default() -> Self {
        Self {
            builder_alterations: AlterationFactories::new(BUILDER_ALTERATION_CAPABILITY),
            convention_alterations: AlterationFactories::new(CONVENTION_SET_ALTERATION_CAPABILITY),
            overrides: OverrideFactories::default(),
        }
    }
}

impl FactoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_builder_alteration<T>(&mut self, ty: impl Into<TypeKey>) -> &mut Self
    where
        T: BuilderAlteration + Default + 'static,
    {
        self.builder_alterations.register::<T>(ty);
        self
    }

    pub fn register_convention_alteration<T>(&mut self, ty: impl Into<TypeKey>) -> &mut Self
    where
        T: ConventionSetAlteration + Default + 'static,
    {
        self.convention_alterations.register::<T>(ty);
        self
    }

    pub fn register_override<O>(&mut self, ty: impl Into<TypeKey>) -> &mut Self
    where
        O: EntityTypeOverride + Default,
    {
        self.overrides.register::<O>(ty);
        self
    }
}
