//! Core type definitions for automodel.
//!
//! This crate replaces runtime reflection with an explicit catalog:
//! - [`TypeKey`] names a type, including open and closed generics
//! - [`TypeDescriptor`] carries the metadata discovery filters on
//!   (kind, abstractness, base type, interfaces)
//! - [`Assembly`] groups descriptors in a stable enumeration order
//! - [`TypeCatalog`] indexes assemblies and answers assignability queries
//!
//! Catalogs are built once at startup, in code or from a generated JSON
//! manifest, and are read-only afterwards.

mod catalog;
mod descriptor;
mod key;

pub use catalog::{Assembly, TypeCatalog};
pub use descriptor::{TypeDescriptor, TypeKind};
pub use key::TypeKey;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or querying a catalog.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid type key '{key}': {reason}")]
    InvalidTypeKey { key: String, reason: String },

    #[error("type '{key}' registered twice (assembly '{assembly}')")]
    DuplicateType { key: TypeKey, assembly: String },

    #[error("assembly already registered: {0}")]
    DuplicateAssembly(String),

    #[error("unknown type: {0}")]
    UnknownType(TypeKey),

    #[error("manifest error: {0}")]
    Manifest(#[from] serde_json::Error),
}
