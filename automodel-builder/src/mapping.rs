//! The mutable mapping configuration behind an auto model builder.

use automodel_discovery::{DiscoveryContributor, TypeSource};
use automodel_types::{Assembly, TypeCatalog, TypeDescriptor, TypeKey};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::error::{AutoModelError, AutoModelResult};
use crate::factory::FactoryTable;
use crate::overrides::EntityOverride;
use crate::settings::AutoConfiguration;

/// Type sources, explicit include/exclude lists and overrides.
///
/// Builder alterations receive a `&mut AutoMapping`; `apply` works on a
/// clone, so nothing an alteration does leaks into the next apply.
#[derive(Clone)]
pub struct AutoMapping {
    catalog: Arc<TypeCatalog>,
    factories: Arc<FactoryTable>,
    sources: Vec<Arc<dyn TypeSource>>,
    includes: Vec<TypeKey>,
    excludes: HashSet<TypeKey>,
    inline_overrides: Vec<EntityOverride>,
    reflected_overrides: Vec<EntityOverride>,
}

impl AutoMapping {
    pub fn new(catalog: Arc<TypeCatalog>, factories: Arc<FactoryTable>) -> Self {
        Self {
            catalog,
            factories,
            sources: Vec::new(),
            includes: Vec::new(),
            excludes: HashSet::new(),
            inline_overrides: Vec::new(),
            reflected_overrides: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    pub fn factories(&self) -> &FactoryTable {
        &self.factories
    }

    pub(crate) fn set_factories(&mut self, factories: Arc<FactoryTable>) {
        self.factories = factories;
    }

    pub fn add_type_source<S: TypeSource + 'static>(&mut self, source: S) -> &mut Self {
        self.add_shared_source(Arc::new(source))
    }

    pub fn add_shared_source(&mut self, source: Arc<dyn TypeSource>) -> &mut Self {
        debug!(source = %source.identifier(), "Adding type source");
        self.sources.push(source);
        self
    }

    /// Adds every exported type of `assembly` as a candidate source.
    pub fn add_assembly(&mut self, assembly: Arc<Assembly>) -> &mut Self {
        let mut contributor = DiscoveryContributor::new();
        contributor.add_assembly(assembly);
        self.add_type_source(contributor)
    }

    /// Adds the assembly that declares `ty` as a candidate source.
    pub fn add_assembly_of(&mut self, ty: &TypeKey) -> AutoModelResult<&mut Self> {
        let assembly = self.catalog.assembly_containing(ty)?;
        Ok(self.add_assembly(assembly))
    }

    /// Maps `ty` even if no source yields it or it would be rejected.
    /// `ty` must be registered in the catalog.
    pub fn include(&mut self, ty: impl Into<TypeKey>) -> AutoModelResult<&mut Self> {
        let ty = self.catalog_key(ty.into(), "include")?;
        if !self.includes.contains(&ty) {
            self.includes.push(ty);
        }
        Ok(self)
    }

    /// Never maps `ty` unless it is also included. An open generic
    /// definition excludes every closed form of it. Unknown types are
    /// accepted.
    pub fn exclude(&mut self, ty: impl Into<TypeKey>) -> AutoModelResult<&mut Self> {
        let ty = checked_key(ty.into(), "exclude")?;
        self.excludes.insert(ty);
        Ok(self)
    }

    /// Registers a callback for `ty`, run against the host's handle when
    /// the handle has type `H`. `ty` must be registered in the catalog.
    pub fn override_entity<H, F>(&mut self, ty: impl Into<TypeKey>, configure: F) -> AutoModelResult<&mut Self>
    where
        H: 'static,
        F: Fn(&mut H) + Send + Sync + 'static,
    {
        let ty = self.catalog_key(ty.into(), "override")?;
        self.inline_overrides.push(EntityOverride::inline(ty, configure));
        Ok(self)
    }

    fn catalog_key(&self, ty: TypeKey, operation: &str) -> AutoModelResult<TypeKey> {
        let ty = checked_key(ty, operation)?;
        self.catalog.require(&ty).map_err(|e| {
            AutoModelError::configuration(format!("cannot {operation} '{ty}': {e}"))
        })?;
        Ok(ty)
    }

    pub fn add_reflected_override(&mut self, entry: EntityOverride) -> &mut Self {
        self.reflected_overrides.push(entry);
        self
    }

    pub fn sources_len(&self) -> usize {
        self.sources.len()
    }

    pub fn includes(&self) -> &[TypeKey] {
        &self.includes
    }

    pub fn is_included(&self, ty: &TypeKey) -> bool {
        self.includes.contains(ty)
    }

    pub fn is_excluded(&self, ty: &TypeKey) -> bool {
        self.excludes.contains(ty)
            || ty
                .generic_definition()
                .is_some_and(|definition| self.excludes.contains(&definition))
    }

    pub fn inline_overrides(&self) -> &[EntityOverride] {
        &self.inline_overrides
    }

    pub fn reflected_overrides(&self) -> &[EntityOverride] {
        &self.reflected_overrides
    }

    /// Inline overrides first, then reflected ones, each in registration
    /// order.
    pub fn overrides(&self) -> impl Iterator<Item = &EntityOverride> {
        self.inline_overrides.iter().chain(&self.reflected_overrides)
    }

    /// Decides whether a discovered candidate is mapped. The checks run in
    /// order and the first decisive one wins: explicit include, explicit
    /// exclude, the auto-configuration filter, abstractness, and finally
    /// the root object type.
    pub fn should_map(&self, ty: &TypeDescriptor, auto_config: &dyn AutoConfiguration) -> bool {
        if self.is_included(&ty.key) {
            return true;
        }
        if self.is_excluded(&ty.key) {
            return false;
        }
        if !auto_config.should_map(ty) {
            return false;
        }
        if ty.is_abstract() {
            return false;
        }
        !ty.key.is_object()
    }

    /// Candidates from every source in source order, filtered by
    /// [`should_map`](Self::should_map), followed by included types no
    /// source yielded. A type yielded by several sources appears once per
    /// source.
    pub fn entity_types(&self, auto_config: &dyn AutoConfiguration) -> Vec<TypeKey> {
        let mut out = Vec::new();
        for source in &self.sources {
            let before = out.len();
            for ty in source.types(&self.catalog) {
                if self.should_map(ty, auto_config) {
                    out.push(ty.key.clone());
                } else {
                    trace!(entity_type = %ty.key, "Candidate rejected");
                }
            }
            debug!(source = %source.identifier(), mapped = out.len() - before, "Type source evaluated");
        }
        for ty in &self.includes {
            if !out.contains(ty) {
                out.push(ty.clone());
            }
        }
        out
    }
}

impl fmt::Debug for AutoMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutoMapping")
            .field("sources", &self.sources.iter().map(|s| s.identifier()).collect::<Vec<_>>())
            .field("includes", &self.includes)
            .field("excludes", &self.excludes)
            .field("inline_overrides", &self.inline_overrides.len())
            .field("reflected_overrides", &self.reflected_overrides.len())
            .finish()
    }
}

fn checked_key(ty: TypeKey, operation: &str) -> AutoModelResult<TypeKey> {
    ty.validate().map_err(|e| {
        AutoModelError::configuration(format!("cannot {operation} '{ty}': {e}"))
    })?;
    Ok(ty)
}
