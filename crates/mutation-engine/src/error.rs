use model_definition::{Key, StoreError};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MutationError {
    /// A reference value could not be normalized into a primary key.
    #[error("could not resolve {value} into a primary key")]
    MalformedReference { value: Value },
    /// A reference resolved to a key, but no such row exists.
    #[error("{entity} with key {key} does not exist")]
    RelatedEntityNotFound { entity: String, key: Key },
    /// The payload names a field the input schema does not expose.
    #[error("{entity} has no input field named {field}")]
    FieldNotFound { entity: String, field: String },
    /// The mutation definition itself is broken. Surfaces at registration
    /// time where possible, otherwise on first use.
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type MutationResult<T> = Result<T, MutationError>;
