use automodel_types::TypeKey;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::BTreeMap;

/// Configuration handle for one entity type in the reference host.
///
/// Overrides receive a `&mut EntityTypeBuilder` and write straight onto it,
/// so later overrides win on conflicting settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityTypeBuilder {
    pub entity_type: TypeKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub properties: Vec<PropertyBuilder>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignored: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, serde_json::Value>,
}

impl EntityTypeBuilder {
    pub fn new(entity_type: TypeKey) -> Self {
        Self {
            entity_type,
            table: None,
            schema: None,
            keys: Vec::new(),
            properties: Vec::new(),
            ignored: Vec::new(),
            annotations: BTreeMap::new(),
        }
    }

    pub fn to_table(&mut self, table: impl Into<String>) -> &mut Self {
        self.table = Some(table.into());
        self
    }

    pub fn in_schema(&mut self, schema: impl Into<String>) -> &mut Self {
        self.schema = Some(schema.into());
        self
    }

    /// Replaces the key with the given properties.
    pub fn has_key(&mut self, properties: &[&str]) -> &mut Self {
        self.keys = properties.iter().map(|p| (*p).to_string()).collect();
        self
    }

    /// Returns the property builder for `name`, creating it on first use.
    /// Un-ignores the property if it was previously ignored.
    pub fn property(&mut self, name: &str) -> &mut PropertyBuilder {
        self.ignored.retain(|i| i != name);
        let idx = match self.properties.iter().position(|p| p.name == name) {
            Some(idx) => idx,
            None => {
                self.properties.push(PropertyBuilder::new(name));
                self.properties.len() - 1
            }
        };
        &mut self.properties[idx]
    }

    /// Excludes a member from the mapping.
    pub fn ignore(&mut self, name: &str) -> &mut Self {
        self.properties.retain(|p| p.name != name);
        if !self.ignored.iter().any(|i| i == name) {
            self.ignored.push(name.to_string());
        }
        self
    }

    pub fn has_annotation(&mut self, name: &str, value: impl Into<serde_json::Value>) -> &mut Self {
        self.annotations.insert(name.to_string(), value.into());
        self
    }

    pub fn annotation(&self, name: &str) -> Option<&serde_json::Value> {
        self.annotations.get(name)
    }

    pub fn find_property(&self, name: &str) -> Option<&PropertyBuilder> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// Column-level configuration for a single entity member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyBuilder {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
}

impl PropertyBuilder {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            column: None,
            required: false,
            max_length: None,
        }
    }

    pub fn has_column_name(&mut self, column: impl Into<String>) -> &mut Self {
        self.column = Some(column.into());
        self
    }

    pub fn is_required(&mut self) -> &mut Self {
        self.required = true;
        self
    }

    pub fn has_max_length(&mut self, max_length: u32) -> &mut Self {
        self.max_length = Some(max_length);
        self
    }
}

/// A type-specific configuration handle handed out by a host.
///
/// Callers that expect a particular handle shape downcast through
/// [`EntityTypeHandle::as_any_mut`].
pub trait EntityTypeHandle: Any {
    /// The entity type this handle configures.
    fn entity_type(&self) -> &TypeKey;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Rust type name of the handle, for diagnostics.
    fn handle_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl EntityTypeHandle for EntityTypeBuilder {
    fn entity_type(&self) -> &TypeKey {
        &self.entity_type
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
