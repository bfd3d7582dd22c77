use thiserror::Error;

use crate::{EntityId, EntityRecord, JsonMap, Key, RelationId};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("{entity} with key {key} does not exist")]
    NotFound { entity: String, key: Key },
    #[error("missing value for column {column} of {entity}")]
    MissingColumn { entity: String, column: String },
    #[error("store error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// The narrow interface the mutation engine writes through. Implemented
/// by the in-memory reference store; a relational backend plugs in here.
///
/// Row values are keyed by column name. A value keyed by a relation's
/// plain name instead stores under the relation's reference column, the
/// way an ORM resolves an instance assigned to a relation attribute.
///
/// Association changes are batched: the engine issues one call per
/// relation field, never one per element.
pub trait EntityStore {
    /// Creates a row and returns it with its assigned key.
    fn insert(&self, entity: EntityId, values: JsonMap) -> StoreResult<EntityRecord>;

    /// Fetches a row by primary key.
    fn get(&self, entity: EntityId, key: &Key) -> StoreResult<EntityRecord>;

    /// Persists a mutated row.
    fn save(&self, record: &EntityRecord) -> StoreResult<()>;

    /// Deletes a row by primary key. Returns whether it existed.
    fn delete(&self, entity: EntityId, key: &Key) -> StoreResult<bool>;

    /// Deletes every row matching the filter and returns the deleted
    /// keys. Scalar values match by equality against the stored column,
    /// an absent column comparing as null. A value keyed by a collection
    /// relation's name matches rows whose association set contains every
    /// listed key.
    fn delete_matching(&self, entity: EntityId, filter: &JsonMap) -> StoreResult<Vec<Key>>;

    /// Replaces the association set of `owner` for the relation. Fails
    /// with [`StoreError::NotFound`] when a referenced row is missing.
    fn set_related(&self, relation: RelationId, owner: &Key, keys: &[Key]) -> StoreResult<()>;

    /// Adds the given rows to the association set of `owner`.
    fn add_related(&self, relation: RelationId, owner: &Key, keys: &[Key]) -> StoreResult<()>;

    /// Removes the given rows from the association set of `owner`.
    /// Absent members are ignored.
    fn remove_related(&self, relation: RelationId, owner: &Key, keys: &[Key]) -> StoreResult<()>;
}
