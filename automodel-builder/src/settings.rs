//! Process-wide auto-configuration: reads `automodel.toml` and answers the
//! gate questions every builder asks during `apply`.

use automodel_types::{TypeDescriptor, TypeKey};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{AutoModelError, AutoModelResult};
use crate::scope::AutoModelBuilderScope;

/// Environment variable naming an explicit settings file.
pub const SETTINGS_ENV_VAR: &str = "AUTOMODEL_CONFIG";

const DEFAULT_SETTINGS_FILE: &str = "automodel.toml";

/// External hook consulted by every builder during `apply`.
pub trait AutoConfiguration: Send + Sync {
    /// Whether builders should run at all for this context type.
    fn should_apply_to_context(&self, context_type: &TypeKey) -> bool {
        let _ = context_type;
        true
    }

    /// Scopes a builder without a pinned scope runs in.
    fn default_scopes(&self) -> &[AutoModelBuilderScope] {
        &[AutoModelBuilderScope::AfterEntitySets]
    }

    /// Global scope switch, consulted for pinned and unpinned builders.
    fn should_apply_in_scope(&self, scope: AutoModelBuilderScope) -> bool {
        let _ = scope;
        true
    }

    /// Whether a discovered candidate should be mapped. Not consulted for
    /// explicitly included types.
    fn should_map(&self, ty: &TypeDescriptor) -> bool {
        let _ = ty;
        true
    }
}

/// Settings parsed from `automodel.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoModelSettings {
    #[serde(default = "default_scopes")]
    pub default_scopes: Vec<AutoModelBuilderScope>,
    #[serde(default)]
    pub disabled_scopes: Vec<AutoModelBuilderScope>,
    #[serde(default)]
    pub ignored_contexts: Vec<TypeKey>,
    /// Namespaces (and everything nested below them) never auto-mapped.
    #[serde(default)]
    pub ignored_namespaces: Vec<String>,
    #[serde(default)]
    pub ignored_types: Vec<TypeKey>,
}

fn default_scopes() -> Vec<AutoModelBuilderScope> {
    vec![AutoModelBuilderScope::AfterEntitySets]
}

impl Default for AutoModelSettings {
    fn default() -> Self {
        Self {
            default_scopes: default_scopes(),
            disabled_scopes: Vec::new(),
            ignored_contexts: Vec::new(),
            ignored_namespaces: Vec::new(),
            ignored_types: Vec::new(),
        }
    }
}

impl AutoModelSettings {
    /// Loads from the file named by `AUTOMODEL_CONFIG`, or `automodel.toml`
    /// in the working directory.
    pub fn load() -> Self {
        Self::load_from(settings_path())
    }

    /// Loads settings from an explicit path. A missing file means defaults;
    /// an unreadable or malformed file logs a warning and falls back to
    /// defaults.
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!("No automodel settings at {:?}, using defaults", path);
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(settings) => {
                    info!("Loaded automodel settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!("{} in {:?}. Falling back to default settings.", e, path);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read automodel settings {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Parses settings, reporting malformed input.
    pub fn from_toml_str(contents: &str) -> AutoModelResult<Self> {
        let file: SettingsFile =
            toml::from_str(contents).map_err(|e| AutoModelError::Settings(e.to_string()))?;
        let settings = file.automodel;
        for key in settings.ignored_contexts.iter().chain(&settings.ignored_types) {
            key.validate()?;
        }
        Ok(settings)
    }

    fn namespace_ignored(&self, namespace: Option<&str>) -> bool {
        let Some(namespace) = namespace else {
            return false;
        };
        self.ignored_namespaces.iter().any(|ignored| {
            namespace == ignored
                || namespace
                    .strip_prefix(ignored.as_str())
                    .is_some_and(|rest| rest.starts_with('.'))
        })
    }
}

impl AutoConfiguration for AutoModelSettings {
    fn should_apply_to_context(&self, context_type: &TypeKey) -> bool {
        !self.ignored_contexts.contains(context_type)
    }

    fn default_scopes(&self) -> &[AutoModelBuilderScope] {
        &self.default_scopes
    }

    fn should_apply_in_scope(&self, scope: AutoModelBuilderScope) -> bool {
        !self.disabled_scopes.contains(&scope)
    }

    fn should_map(&self, ty: &TypeDescriptor) -> bool {
        !self.ignored_types.contains(&ty.key) && !self.namespace_ignored(ty.namespace())
    }
}

/// Raw TOML structure matching the `automodel.toml` format.
#[derive(Deserialize)]
struct SettingsFile {
    #[serde(default)]
    automodel: AutoModelSettings,
}

fn settings_path() -> PathBuf {
    std::env::var_os(SETTINGS_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE))
}
