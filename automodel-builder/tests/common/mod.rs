//! Shared fixtures for auto model builder tests.

#![allow(dead_code)]

use automodel_builder::{
    AutoMapping, AutoModelResult, BUILDER_ALTERATION_CAPABILITY, BuilderAlteration,
    CONVENTION_SET_ALTERATION_CAPABILITY, ConventionSetAlteration, ENTITY_TYPE_OVERRIDE_CAPABILITY,
    EntityTypeOverride, FactoryTable,
};
use automodel_model::{ConventionSet, EntityTypeBuilder};
use automodel_types::{Assembly, TypeCatalog, TypeDescriptor, TypeKey};
use std::sync::Arc;

pub fn key(s: &str) -> TypeKey {
    TypeKey::new(s)
}

pub fn override_of(entity: &str) -> TypeKey {
    TypeKey::closed(&key(ENTITY_TYPE_OVERRIDE_CAPABILITY), &[key(entity)])
}

/// The shop fixture:
///
/// - `Shop.Core`: `Shop.Entity` (abstract), `Shop.IAuditable`
/// - `Shop.Domain`: `Order`, `Customer`, `Draft` (abstract), `Product`
///   (no base), `Views.OrderView`
/// - `Shop.Billing`: `Invoice : Entity`
/// - `Shop.Overrides`: `OrderOverride`, `CustomerOverride`,
///   `BaseOverride` (abstract)
/// - `Shop.Billing.Overrides`: `InvoiceOverride`, `OrderAuditOverride`
/// - `Shop.Foreign`: `OrderOverride`, expecting a handle the reference
///   host never hands out
/// - `Shop.Alterations`: `UseDomainAssembly`, `PrefixTables`
/// - `Shop.Broken`: `Unregistered`, a builder alteration with no factory
pub struct Shop {
    pub catalog: Arc<TypeCatalog>,
    pub core: Arc<Assembly>,
    pub domain: Arc<Assembly>,
    pub billing: Arc<Assembly>,
    pub overrides: Arc<Assembly>,
    pub billing_overrides: Arc<Assembly>,
    pub foreign_overrides: Arc<Assembly>,
    pub alterations: Arc<Assembly>,
    pub broken: Arc<Assembly>,
}

pub fn shop() -> Shop {
    let mut catalog = TypeCatalog::new();
    let core = catalog
        .register(
            Assembly::new("Shop.Core")
                .with_type(TypeDescriptor::class("Shop.Entity").as_abstract())
                .with_type(TypeDescriptor::interface("Shop.IAuditable")),
        )
        .unwrap();
    let domain = catalog
        .register(
            Assembly::new("Shop.Domain")
                .with_type(
                    TypeDescriptor::class("Shop.Domain.Order")
                        .with_base("Shop.Entity")
                        .implementing("Shop.IAuditable"),
                )
                .with_type(TypeDescriptor::class("Shop.Domain.Customer").with_base("Shop.Entity"))
                .with_type(
                    TypeDescriptor::class("Shop.Domain.Draft")
                        .with_base("Shop.Entity")
                        .as_abstract(),
                )
                .with_type(TypeDescriptor::class("Shop.Domain.Product"))
                .with_type(TypeDescriptor::class("Shop.Domain.Views.OrderView")),
        )
        .unwrap();
    let billing = catalog
        .register(
            Assembly::new("Shop.Billing")
                .with_type(TypeDescriptor::class("Shop.Billing.Invoice").with_base("Shop.Entity")),
        )
        .unwrap();
    let overrides = catalog
        .register(
            Assembly::new("Shop.Overrides")
                .with_type(
                    TypeDescriptor::class("Shop.Overrides.OrderOverride")
                        .implementing(override_of("Shop.Domain.Order")),
                )
                .with_type(
                    TypeDescriptor::class("Shop.Overrides.CustomerOverride")
                        .implementing(override_of("Shop.Domain.Customer")),
                )
                .with_type(
                    TypeDescriptor::class("Shop.Overrides.BaseOverride")
                        .implementing(override_of("Shop.Domain.Product"))
                        .as_abstract(),
                ),
        )
        .unwrap();
    let billing_overrides = catalog
        .register(
            Assembly::new("Shop.Billing.Overrides")
                .with_type(
                    TypeDescriptor::class("Shop.Billing.Overrides.InvoiceOverride")
                        .implementing(override_of("Shop.Billing.Invoice")),
                )
                .with_type(
                    TypeDescriptor::class("Shop.Billing.Overrides.OrderAuditOverride")
                        .implementing(override_of("Shop.Domain.Order")),
                ),
        )
        .unwrap();
    let foreign_overrides = catalog
        .register(
            Assembly::new("Shop.Foreign").with_type(
                TypeDescriptor::class("Shop.Foreign.OrderOverride")
                    .implementing(override_of("Shop.Domain.Order")),
            ),
        )
        .unwrap();
    let alterations = catalog
        .register(
            Assembly::new("Shop.Alterations")
                .with_type(
                    TypeDescriptor::class("Shop.Alterations.UseDomainAssembly")
                        .implementing(BUILDER_ALTERATION_CAPABILITY),
                )
                .with_type(
                    TypeDescriptor::class("Shop.Alterations.PrefixTables")
                        .implementing(CONVENTION_SET_ALTERATION_CAPABILITY),
                ),
        )
        .unwrap();
    let broken = catalog
        .register(
            Assembly::new("Shop.Broken").with_type(
                TypeDescriptor::class("Shop.Broken.Unregistered")
                    .implementing(BUILDER_ALTERATION_CAPABILITY),
            ),
        )
        .unwrap();

    Shop {
        catalog: Arc::new(catalog),
        core,
        domain,
        billing,
        overrides,
        billing_overrides,
        foreign_overrides,
        alterations,
        broken,
    }
}

/// Factories for every override and alteration type in [`shop`].
pub fn factories() -> Arc<FactoryTable> {
    let mut table = FactoryTable::new();
    table
        .register_override::<OrderOverride>("Shop.Overrides.OrderOverride")
        .register_override::<CustomerOverride>("Shop.Overrides.CustomerOverride")
        .register_override::<InvoiceOverride>("Shop.Billing.Overrides.InvoiceOverride")
        .register_override::<OrderAuditOverride>("Shop.Billing.Overrides.OrderAuditOverride")
        .register_override::<ForeignHandleOverride>("Shop.Foreign.OrderOverride")
        .register_builder_alteration::<UseDomainAssembly>("Shop.Alterations.UseDomainAssembly")
        .register_convention_alteration::<PrefixTables>("Shop.Alterations.PrefixTables");
    Arc::new(table)
}

// ── Overrides ────────────────────────────────────────────────────

#[derive(Default)]
pub struct OrderOverride;

impl EntityTypeOverride for OrderOverride {
    type Handle = EntityTypeBuilder;

    fn configure(&self, entity: &mut EntityTypeBuilder) {
        entity
            .to_table("orders")
            .has_key(&["OrderId"])
            .has_annotation("last_override", "order");
    }
}

#[derive(Default)]
pub struct CustomerOverride;

impl EntityTypeOverride for CustomerOverride {
    type Handle = EntityTypeBuilder;

    fn configure(&self, entity: &mut EntityTypeBuilder) {
        entity.property("Email").is_required().has_max_length(256);
    }
}

#[derive(Default)]
pub struct InvoiceOverride;

impl EntityTypeOverride for InvoiceOverride {
    type Handle = EntityTypeBuilder;

    fn configure(&self, entity: &mut EntityTypeBuilder) {
        entity.in_schema("billing");
    }
}

#[derive(Default)]
pub struct OrderAuditOverride;

impl EntityTypeOverride for OrderAuditOverride {
    type Handle = EntityTypeBuilder;

    fn configure(&self, entity: &mut EntityTypeBuilder) {
        entity
            .has_annotation("audited", true)
            .has_annotation("last_override", "audit");
    }
}

/// An override expecting a handle the reference host never hands out.
#[derive(Default)]
pub struct ForeignHandleOverride;

pub struct ForeignHandle;

impl EntityTypeOverride for ForeignHandleOverride {
    type Handle = ForeignHandle;

    fn configure(&self, _entity: &mut ForeignHandle) {}
}

// ── Alterations ──────────────────────────────────────────────────

/// Adds `Shop.Domain` as a type source.
#[derive(Default)]
pub struct UseDomainAssembly;

impl BuilderAlteration for UseDomainAssembly {
    fn alter(&self, mapping: &mut AutoMapping) -> AutoModelResult<()> {
        mapping.add_assembly_of(&key("Shop.Domain.Order"))?;
        Ok(())
    }
}

/// Includes one type; two instances differ only in the type.
pub struct IncludeType(pub &'static str);

impl BuilderAlteration for IncludeType {
    fn alter(&self, mapping: &mut AutoMapping) -> AutoModelResult<()> {
        mapping.include(self.0)?;
        Ok(())
    }
}

#[derive(Default)]
pub struct PrefixTables;

impl ConventionSetAlteration for PrefixTables {
    fn alter(&self, conventions: &mut ConventionSet) -> AutoModelResult<()> {
        conventions.table_prefix = Some("tbl_".to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct PluralizeTables;

impl ConventionSetAlteration for PluralizeTables {
    fn alter(&self, conventions: &mut ConventionSet) -> AutoModelResult<()> {
        conventions.pluralize_table_names = true;
        Ok(())
    }
}
