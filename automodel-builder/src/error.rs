//! Error types for the auto model builder.

use automodel_model::HostError;
use automodel_types::TypeKey;
use thiserror::Error;

/// Result type for auto model builder operations.
pub type AutoModelResult<T> = Result<T, AutoModelError>;

/// Errors surfaced by configuration, discovery scans and `apply`.
#[derive(Debug, Error)]
pub enum AutoModelError {
    /// Malformed fluent setup, reported at the call that introduced it.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A type discovered by an assembly scan has no registered factory.
    #[error("cannot instantiate '{type_key}': {reason}")]
    Instantiation { type_key: TypeKey, reason: String },

    /// The host refused to register or configure a type.
    #[error("host rejected model configuration: {0}")]
    Host(#[from] HostError),

    /// Catalog lookup or type key failure.
    #[error("type catalog error: {0}")]
    Types(#[from] automodel_types::Error),

    /// Settings file could not be parsed.
    #[error("settings error: {0}")]
    Settings(String),
}

impl AutoModelError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}
