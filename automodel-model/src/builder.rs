//! The host-side model builder contract and the in-memory reference host.

use automodel_types::TypeKey;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::conventions::ConventionSet;
use crate::entity::{EntityTypeBuilder, EntityTypeHandle};
use crate::error::HostError;

/// What the discovery layer needs from a host's model builder.
pub trait HostModelBuilder {
    /// Registers an entity type. Registering the same type twice is a no-op.
    fn register_entity(&mut self, entity_type: &TypeKey) -> Result<(), HostError>;

    /// Returns the configuration handle for an entity type, registering the
    /// type first if needed.
    fn entity(&mut self, entity_type: &TypeKey) -> Result<&mut dyn EntityTypeHandle, HostError>;

    fn is_registered(&self, entity_type: &TypeKey) -> bool;

    fn entity_count(&self) -> usize;
}

/// In-memory model builder. Entities keep their registration order.
#[derive(Debug, Default)]
pub struct ModelBuilder {
    conventions: ConventionSet,
    entities: Vec<EntityTypeBuilder>,
    index: HashMap<TypeKey, usize>,
    ignored: HashSet<TypeKey>,
}

impl ModelBuilder {
    pub fn new(conventions: ConventionSet) -> Self {
        Self {
            conventions,
            ..Default::default()
        }
    }

    pub fn conventions(&self) -> &ConventionSet {
        &self.conventions
    }

    /// Excludes a type from the model. Drops it if already registered;
    /// later registrations of the type are rejected.
    pub fn ignore(&mut self, entity_type: &TypeKey) -> &mut Self {
        if let Some(idx) = self.index.remove(entity_type) {
            self.entities.remove(idx);
            self.reindex();
        }
        self.ignored.insert(entity_type.clone());
        self
    }

    /// Typed access to an already registered entity.
    pub fn entity_builder(&self, entity_type: &TypeKey) -> Option<&EntityTypeBuilder> {
        self.index.get(entity_type).map(|&idx| &self.entities[idx])
    }

    pub fn entity_types(&self) -> impl Iterator<Item = &TypeKey> {
        self.entities.iter().map(|e| &e.entity_type)
    }

    /// Consumes the builder and returns the finished model.
    pub fn finish(self) -> Model {
        Model {
            entities: self.entities,
        }
    }

    fn reindex(&mut self) {
        self.index = self
            .entities
            .iter()
            .enumerate()
            .map(|(idx, e)| (e.entity_type.clone(), idx))
            .collect();
    }

    fn get_or_register(&mut self, entity_type: &TypeKey) -> Result<usize, HostError> {
        if let Some(&idx) = self.index.get(entity_type) {
            return Ok(idx);
        }
        if self.ignored.contains(entity_type) {
            return Err(HostError::Ignored(entity_type.clone()));
        }
        if entity_type.is_generic_definition() {
            return Err(HostError::Rejected {
                entity_type: entity_type.clone(),
                reason: "open generic definitions cannot be mapped".to_string(),
            });
        }

        let mut entity = EntityTypeBuilder::new(entity_type.clone());
        entity.table = Some(self.conventions.table_name_for(entity_type));
        entity.schema = self.conventions.default_schema.clone();
        if let Some(key) = &self.conventions.key_property {
            entity.keys = vec![key.clone()];
        }

        debug!(entity_type = %entity_type, table = ?entity.table, "Entity type registered");
        self.entities.push(entity);
        let idx = self.entities.len() - 1;
        self.index.insert(entity_type.clone(), idx);
        Ok(idx)
    }
}

impl HostModelBuilder for ModelBuilder {
    fn register_entity(&mut self, entity_type: &TypeKey) -> Result<(), HostError> {
        self.get_or_register(entity_type).map(|_| ())
    }

    fn entity(&mut self, entity_type: &TypeKey) -> Result<&mut dyn EntityTypeHandle, HostError> {
        let idx = self.get_or_register(entity_type)?;
        let entity: &mut dyn EntityTypeHandle = &mut self.entities[idx];
        Ok(entity)
    }

    fn is_registered(&self, entity_type: &TypeKey) -> bool {
        self.index.contains_key(entity_type)
    }

    fn entity_count(&self) -> usize {
        self.entities.len()
    }
}

/// A finished model: every mapped entity with its configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub entities: Vec<EntityTypeBuilder>,
}

impl Model {
    pub fn find(&self, entity_type: &TypeKey) -> Option<&EntityTypeBuilder> {
        self.entities.iter().find(|e| &e.entity_type == entity_type)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn entity_types(&self) -> Vec<&TypeKey> {
        self.entities.iter().map(|e| &e.entity_type).collect()
    }
}
