//! Shared catalog fixtures for discovery tests.

#![allow(dead_code)]

use automodel_types::{Assembly, TypeCatalog, TypeDescriptor, TypeKey};
use std::sync::Arc;

pub fn key(s: &str) -> TypeKey {
    TypeKey::new(s)
}

/// A catalog with a core assembly (base types) and a domain assembly:
///
/// - `Shop.Entity` (abstract), `Shop.IAuditable`, `Shop.IVersioned`
/// - `Shop.Domain.Order : Entity, IAuditable`
/// - `Shop.Domain.Draft : Entity` (abstract)
/// - `Shop.Domain.Customer : Entity`
/// - `Shop.Domain.Sales.Invoice : IVersioned`
/// - `Shop.Domain.Money` (value type, unrelated)
pub fn shop() -> (TypeCatalog, Arc<Assembly>, Arc<Assembly>) {
    let mut catalog = TypeCatalog::new();
    let core = catalog
        .register(
            Assembly::new("Shop.Core")
                .with_type(TypeDescriptor::class("Shop.Entity").as_abstract())
                .with_type(TypeDescriptor::interface("Shop.IAuditable"))
                .with_type(TypeDescriptor::interface("Shop.IVersioned")),
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
                .with_type(
                    TypeDescriptor::class("Shop.Domain.Draft")
                        .with_base("Shop.Entity")
                        .as_abstract(),
                )
                .with_type(TypeDescriptor::class("Shop.Domain.Customer").with_base("Shop.Entity"))
                .with_type(
                    TypeDescriptor::class("Shop.Domain.Sales.Invoice").implementing("Shop.IVersioned"),
                )
                .with_type(TypeDescriptor::value("Shop.Domain.Money"))
                .with_type(TypeDescriptor::class("Shop.Domain.Internal").internal()),
        )
        .unwrap();
    (catalog, core, domain)
}
