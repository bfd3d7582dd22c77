//! A description of a relational data model, built once during schema
//! assembly and walked read-only at mutation time.
//!
//! The definition stores entities, their scalar fields and their relations
//! in flat vectors indexed by id, with all strings interned. Lookups from
//! client-facing names happen through index maps built during construction
//! and sorted in [`ModelDefinition::finalize`].

mod model_definition;
mod record;
mod store;

pub use model_definition::{
    Entity, EntityId, EntityMember, EntityWalker, Field, FieldId, FieldType, FieldWalker, ModelDefinition, Relation,
    RelationId, RelationKind, RelationWalker, Walker,
};
pub use record::{EntityRecord, Key};
pub use store::{EntityStore, StoreError, StoreResult};

/// JSON object payloads exchanged with the store and the mutation layer.
pub type JsonMap = serde_json::Map<String, serde_json::Value>;
