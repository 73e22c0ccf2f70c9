use serde::{Deserialize, Serialize};
use std::fmt;

/// When, relative to the host's own entity-set discovery, a builder runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AutoModelBuilderScope {
    /// Before the host registers the context's declared entity sets.
    BeforeEntitySets,
    /// After the host registers the context's declared entity sets.
    AfterEntitySets,
}

impl AutoModelBuilderScope {
    pub const ALL: [AutoModelBuilderScope; 2] = [Self::BeforeEntitySets, Self::AfterEntitySets];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BeforeEntitySets => "before-entity-sets",
            Self::AfterEntitySets => "after-entity-sets",
        }
    }
}

impl fmt::Display for AutoModelBuilderScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
