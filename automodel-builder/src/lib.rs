//! Convention-driven auto model builder.
//!
//! An [`AutoModelBuilder`] collects type sources, explicit includes and
//! excludes, per-entity overrides and alterations, and applies them to a
//! host's model builder for a given context and scope.
//! [`AutoModelCustomizer`] plugs a set of builders into the host
//! lifecycle.
//!
//! Assembly scans only produce type keys. The instances they stand for
//! come from a [`FactoryTable`] populated at startup.

mod alteration;
mod builder;
mod customizer;
mod error;
mod factory;
mod mapping;
mod overrides;
mod scope;
mod settings;

pub use alteration::{
    AlterationCollection, AlterationEntry, BuilderAlteration, ConventionSetAlteration,
    IntoAlteration,
};
pub use builder::{ApplyReport, AutoModelBuilder, SkipReason};
pub use customizer::AutoModelCustomizer;
pub use error::{AutoModelError, AutoModelResult};
pub use factory::{
    AlterationFactories, BUILDER_ALTERATION_CAPABILITY, CONVENTION_SET_ALTERATION_CAPABILITY,
    ENTITY_TYPE_OVERRIDE_CAPABILITY, FactoryTable, OverrideFactories,
};
pub use mapping::AutoMapping;
pub use overrides::{EntityOverride, EntityTypeOverride, OverrideAlteration, OverrideOrigin};
pub use scope::AutoModelBuilderScope;
pub use settings::{AutoConfiguration, AutoModelSettings, SETTINGS_ENV_VAR};
