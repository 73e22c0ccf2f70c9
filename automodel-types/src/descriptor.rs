use serde::{Deserialize, Serialize};

use crate::TypeKey;

/// What sort of type a descriptor describes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    #[default]
    Class,
    Interface,
    Value,
}

/// Static metadata for one type in the catalog.
///
/// Descriptors are plain data so that a catalog can be assembled in code
/// or loaded from a generated manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub key: TypeKey,
    #[serde(default)]
    pub kind: TypeKind,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default = "default_exported")]
    pub exported: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<TypeKey>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<TypeKey>,
}

fn default_exported() -> bool {
    true
}

impl TypeDescriptor {
    fn with_kind(key: impl Into<TypeKey>, kind: TypeKind) -> Self {
        Self {
            key: key.into(),
            kind,
            is_abstract: false,
            exported: true,
            base: None,
            interfaces: Vec::new(),
        }
    }

    /// A concrete, exported class with no base type.
    pub fn class(key: impl Into<TypeKey>) -> Self {
        Self::with_kind(key, TypeKind::Class)
    }

    /// An exported interface.
    pub fn interface(key: impl Into<TypeKey>) -> Self {
        Self::with_kind(key, TypeKind::Interface)
    }

    /// An exported value type.
    pub fn value(key: impl Into<TypeKey>) -> Self {
        Self::with_kind(key, TypeKind::Value)
    }

    #[must_use]
    pub fn with_base(mut self, base: impl Into<TypeKey>) -> Self {
        self.base = Some(base.into());
        self
    }

    #[must_use]
    pub fn implementing(mut self, interface: impl Into<TypeKey>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    #[must_use]
    pub fn as_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    #[must_use]
    pub fn internal(mut self) -> Self {
        self.exported = false;
        self
    }

    /// Interfaces count as abstract regardless of the stored flag.
    pub fn is_abstract(&self) -> bool {
        self.is_abstract || self.kind == TypeKind::Interface
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    pub fn namespace(&self) -> Option<&str> {
        self.key.namespace()
    }

    pub fn name(&self) -> &str {
        self.key.name()
    }

    pub fn is_generic_definition(&self) -> bool {
        self.key.is_generic_definition()
    }
}
