//! Host model-builder contract for automodel.
//!
//! Defines what the discovery layer consumes from an object-relational
//! mapper during model building:
//! - [`HostModelBuilder`]: register entity types, hand out per-type handles
//! - [`EntityTypeHandle`]: a type-specific configuration handle
//! - [`DbContext`]: the context being modelled and its declared entity sets
//! - [`ModelCustomizer`]: the lifecycle hook the host invokes
//!
//! [`ModelBuilder`], [`EntityTypeBuilder`] and [`ConventionSet`] form an
//! in-memory reference host. [`build_model`] drives its lifecycle.

mod builder;
mod conventions;
mod entity;
mod error;
mod host;

pub use builder::{HostModelBuilder, Model, ModelBuilder};
pub use conventions::ConventionSet;
pub use entity::{EntityTypeBuilder, EntityTypeHandle, PropertyBuilder};
pub use error::HostError;
pub use host::{
    ContextInfo, DbContext, DefaultModelCustomizer, ModelCustomizer, build_model,
    discover_entity_sets,
};
