use automodel_types::TypeKey;
use serde::{Deserialize, Serialize};

/// Model-wide conventions the host applies when an entity type is first
/// registered. Convention-set alterations mutate this before model
/// building starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConventionSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_prefix: Option<String>,
    #[serde(default)]
    pub pluralize_table_names: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_schema: Option<String>,
    /// Property configured as the key of every newly registered entity.
    #[serde(default = "default_key_property")]
    pub key_property: Option<String>,
}

fn default_key_property() -> Option<String> {
    Some("Id".to_string())
}

impl Default for ConventionSet {
    fn default() -> Self {
        Self {
            table_prefix: None,
            pluralize_table_names: false,
            default_schema: None,
            key_property: default_key_property(),
        }
    }
}

impl ConventionSet {
    /// Table name for an entity type: optional prefix, then the short type
    /// name (generic arity stripped), pluralized if enabled.
    pub fn table_name_for(&self, entity_type: &TypeKey) -> String {
        let name = entity_type.name();
        let name = name.split_once('`').map_or(name, |(n, _)| n);
        let name = if self.pluralize_table_names {
            pluralize(name)
        } else {
            name.to_string()
        };
        match &self.table_prefix {
            Some(prefix) => format!("{prefix}{name}"),
            None => name,
        }
    }
}

fn pluralize(name: &str) -> String {
    let lower = name.to_ascii_lowercase();
    if lower.ends_with('s')
        || lower.ends_with('x')
        || lower.ends_with("ch")
        || lower.ends_with("sh")
    {
        return format!("{name}es");
    }
    if let Some(stem) = name.strip_suffix('y') {
        let before = stem.chars().last().map(|c| c.to_ascii_lowercase());
        if before.is_some_and(|c| !"aeiou".contains(c)) {
            return format!("{stem}ies");
        }
    }
    format!("{name}s")
}
