//! Per-entity configuration callbacks, declared inline or discovered from
//! override types in an assembly.

use automodel_model::EntityTypeHandle;
use automodel_types::{Assembly, TypeKey};
use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::alteration::BuilderAlteration;
use crate::error::{AutoModelError, AutoModelResult};
use crate::factory::ENTITY_TYPE_OVERRIDE_CAPABILITY;
use crate::mapping::AutoMapping;

/// A reusable override for one entity type.
///
/// `Handle` is the host's entity-configuration handle. When the host hands
/// out a different shape the override is skipped.
pub trait EntityTypeOverride: Send + Sync + 'static {
    type Handle: 'static;

    fn configure(&self, entity: &mut Self::Handle);
}

/// Where an override came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverrideOrigin {
    /// Registered through `override_entity` on the mapping.
    Inline,
    /// Built from the named override type during an assembly scan.
    Reflected(TypeKey),
}

type OverrideAction = dyn Fn(&mut dyn Any) -> bool + Send + Sync;

/// A configuration callback bound to one entity type.
#[derive(Clone)]
pub struct EntityOverride {
    target: TypeKey,
    expected_handle: &'static str,
    origin: OverrideOrigin,
    action: Arc<OverrideAction>,
}

impl EntityOverride {
    pub fn inline<H, F>(target: TypeKey, configure: F) -> Self
    where
        H: 'static,
        F: Fn(&mut H) + Send + Sync + 'static,
    {
        Self {
            target,
            expected_handle: type_name::<H>(),
            origin: OverrideOrigin::Inline,
            action: Arc::new(move |handle: &mut dyn Any| match handle.downcast_mut::<H>() {
                Some(handle) => {
                    configure(handle);
                    true
                }
                None => false,
            }),
        }
    }

    pub fn reflected<O: EntityTypeOverride>(target: TypeKey, override_type: TypeKey, instance: O) -> Self {
        Self {
            target,
            expected_handle: type_name::<O::Handle>(),
            origin: OverrideOrigin::Reflected(override_type),
            action: Arc::new(move |handle: &mut dyn Any| {
                match handle.downcast_mut::<O::Handle>() {
                    Some(handle) => {
                        instance.configure(handle);
                        true
                    }
                    None => false,
                }
            }),
        }
    }

    pub fn target(&self) -> &TypeKey {
        &self.target
    }

    pub fn origin(&self) -> &OverrideOrigin {
        &self.origin
    }

    /// Type name of the handle the callback accepts.
    pub fn expected_handle(&self) -> &'static str {
        self.expected_handle
    }

    /// Runs the callback. Returns `false` without touching the handle when
    /// it belongs to another entity type or has an unexpected shape.
    pub fn invoke(&self, handle: &mut dyn EntityTypeHandle) -> bool {
        if handle.entity_type() != &self.target {
            return false;
        }
        (self.action)(handle.as_any_mut())
    }
}

impl fmt::Debug for EntityOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityOverride")
            .field("target", &self.target)
            .field("expected_handle", &self.expected_handle)
            .field("origin", &self.origin)
            .finish()
    }
}

/// Registers every override type declared in one assembly.
///
/// An override type is an exported concrete type implementing
/// `automodel.EntityTypeOverride`1[Entity]`; one type may implement it for
/// several entities.
#[derive(Debug, Clone)]
pub struct OverrideAlteration {
    assembly: Arc<Assembly>,
}

impl OverrideAlteration {
    pub fn new(assembly: Arc<Assembly>) -> Self {
        Self { assembly }
    }

    pub fn assembly(&self) -> &Arc<Assembly> {
        &self.assembly
    }
}

impl BuilderAlteration for OverrideAlteration {
    fn alter(&self, mapping: &mut AutoMapping) -> AutoModelResult<()> {
        let capability = TypeKey::new(ENTITY_TYPE_OVERRIDE_CAPABILITY);
        let mut found = Vec::new();
        for ty in self.assembly.exported_types() {
            if ty.is_abstract() || ty.is_generic_definition() {
                continue;
            }
            for interface in mapping.catalog().interfaces_of(&ty.key) {
                if interface.generic_definition().as_ref() != Some(&capability) {
                    continue;
                }
                let Some(entity) = interface.generic_arguments().into_iter().next() else {
                    continue;
                };
                let entry = mapping
                    .factories()
                    .overrides
                    .create(&ty.key, &entity)
                    .ok_or_else(|| AutoModelError::Instantiation {
                        type_key: ty.key.clone(),
                        reason: format!("no override factory registered for {entity}"),
                    })?;
                found.push(entry);
            }
        }

        debug!(
            assembly = %self.assembly.name,
            overrides = found.len(),
            "Registering overrides from assembly"
        );
        for entry in found {
            mapping.add_reflected_override(entry);
        }
        Ok(())
    }
}
