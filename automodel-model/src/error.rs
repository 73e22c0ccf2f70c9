//! Error types for the host model builder.

use automodel_types::TypeKey;
use thiserror::Error;

/// Raised when the host refuses to register or configure an entity type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("entity type '{0}' is ignored by the model")]
    Ignored(TypeKey),

    #[error("host rejected entity type '{entity_type}': {reason}")]
    Rejected { entity_type: TypeKey, reason: String },
}
