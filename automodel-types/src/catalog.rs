//! The static type catalog.
//!
//! Types are registered up front, grouped into named assemblies. The
//! catalog answers the questions discovery needs (lookup, which assembly
//! holds a type, assignability) without any runtime introspection.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::{Error, Result, TypeDescriptor, TypeKey};

/// A named unit of type registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assembly {
    pub name: String,
    #[serde(default)]
    pub types: Vec<TypeDescriptor>,
}

impl Assembly {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_type(mut self, descriptor: TypeDescriptor) -> Self {
        self.types.push(descriptor);
        self
    }

    /// Exported types in registration order.
    pub fn exported_types(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.types.iter().filter(|t| t.exported)
    }

    pub fn contains(&self, key: &TypeKey) -> bool {
        self.types.iter().any(|t| &t.key == key)
    }
}

#[derive(Deserialize)]
struct CatalogManifest {
    #[serde(default)]
    assemblies: Vec<Assembly>,
}

/// Registry of every assembly and type known to the application.
#[derive(Debug, Default)]
pub struct TypeCatalog {
    assemblies: Vec<Arc<Assembly>>,
    /// type key -> (assembly index, type index)
    index: HashMap<TypeKey, (usize, usize)>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from a JSON manifest of the form
    /// `{"assemblies": [{"name": "...", "types": [...]}]}`.
    pub fn from_json(manifest: &str) -> Result<Self> {
        let manifest: CatalogManifest = serde_json::from_str(manifest)?;
        let mut catalog = Self::new();
        for assembly in manifest.assemblies {
            catalog.register(assembly)?;
        }
        Ok(catalog)
    }

    /// Adds an assembly. Fails if the assembly name or any of its type keys
    /// is already registered, or if a key is malformed.
    pub fn register(&mut self, assembly: Assembly) -> Result<Arc<Assembly>> {
        if self.assembly(&assembly.name).is_some() {
            return Err(Error::DuplicateAssembly(assembly.name));
        }

        let mut seen = HashSet::new();
        for descriptor in &assembly.types {
            descriptor.key.validate()?;
            if self.index.contains_key(&descriptor.key) || !seen.insert(&descriptor.key) {
                return Err(Error::DuplicateType {
                    key: descriptor.key.clone(),
                    assembly: assembly.name.clone(),
                });
            }
        }

        let assembly_idx = self.assemblies.len();
        for (type_idx, descriptor) in assembly.types.iter().enumerate() {
            self.index
                .insert(descriptor.key.clone(), (assembly_idx, type_idx));
        }
        let assembly = Arc::new(assembly);
        self.assemblies.push(Arc::clone(&assembly));
        Ok(assembly)
    }

    pub fn get(&self, key: &TypeKey) -> Option<&TypeDescriptor> {
        self.index
            .get(key)
            .map(|&(a, t)| &self.assemblies[a].types[t])
    }

    /// Like [`TypeCatalog::get`] but reports a missing key as an error.
    pub fn require(&self, key: &TypeKey) -> Result<&TypeDescriptor> {
        self.get(key).ok_or_else(|| Error::UnknownType(key.clone()))
    }

    pub fn assembly(&self, name: &str) -> Option<Arc<Assembly>> {
        self.assemblies.iter().find(|a| a.name == name).cloned()
    }

    /// The assembly that registered `key`.
    pub fn assembly_containing(&self, key: &TypeKey) -> Result<Arc<Assembly>> {
        self.index
            .get(key)
            .map(|&(a, _)| Arc::clone(&self.assemblies[a]))
            .ok_or_else(|| Error::UnknownType(key.clone()))
    }

    pub fn assemblies(&self) -> impl Iterator<Item = &Arc<Assembly>> {
        self.assemblies.iter()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Whether a value of type `ty` can be used where `target` is expected.
    ///
    /// Holds for identity, any type in the base chain, any interface
    /// implemented directly or through a base or another interface, and
    /// for closed constructions when `target` is their open definition.
    /// Types missing from the catalog only match by key.
    pub fn is_assignable_to(&self, ty: &TypeKey, target: &TypeKey) -> bool {
        let mut visited = HashSet::new();
        self.assignable_inner(ty, target, &mut visited)
    }

    fn assignable_inner<'a>(
        &'a self,
        ty: &'a TypeKey,
        target: &TypeKey,
        visited: &mut HashSet<&'a TypeKey>,
    ) -> bool {
        if ty == target {
            return true;
        }
        if target.is_generic_definition() && ty.generic_definition().as_ref() == Some(target) {
            return true;
        }
        if !visited.insert(ty) {
            return false;
        }
        let Some(descriptor) = self.get(ty) else {
            return false;
        };
        descriptor
            .base
            .iter()
            .chain(descriptor.interfaces.iter())
            .any(|parent| self.assignable_inner(parent, target, visited))
    }

    /// Every interface `ty` implements, directly or inherited, in
    /// first-seen order.
    pub fn interfaces_of(&self, ty: &TypeKey) -> Vec<TypeKey> {
        let mut out = Vec::new();
        let mut visited = HashSet::new();
        self.collect_interfaces(ty, &mut out, &mut visited);
        out
    }

    fn collect_interfaces(
        &self,
        ty: &TypeKey,
        out: &mut Vec<TypeKey>,
        visited: &mut HashSet<TypeKey>,
    ) {
        if !visited.insert(ty.clone()) {
            return;
        }
        let Some(descriptor) = self.get(ty) else {
            return;
        };
        for interface in &descriptor.interfaces {
            if !out.contains(interface) {
                out.push(interface.clone());
            }
            self.collect_interfaces(interface, out, visited);
        }
        if let Some(base) = &descriptor.base {
            self.collect_interfaces(base, out, visited);
        }
    }
}
