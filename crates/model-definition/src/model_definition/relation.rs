use inflector::Inflector;
use serde::{Deserialize, Serialize};

use super::{names::StringId, EntityId};

/// The structural kind of a relation, as seen from the entity declaring
/// the client field. Both directions of a relation are declared
/// explicitly, each on its owning side.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    /// A reference to a single row, stored in a column on this side.
    ForeignKey,
    /// Like a foreign key, with a uniqueness guarantee on the column.
    OneToOne,
    /// A set of references kept in an association table.
    ManyToMany,
    /// The reverse side of a foreign key on the other entity.
    ReverseMany,
}

impl RelationKind {
    /// True when the relation stores a reference column on this side.
    pub fn is_reference(self) -> bool {
        matches!(self, RelationKind::ForeignKey | RelationKind::OneToOne)
    }

    /// True when the relation holds a set of rows rather than a single one.
    pub fn is_collection(self) -> bool {
        matches!(self, RelationKind::ManyToMany | RelationKind::ReverseMany)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Relation<T> {
    pub(super) entity_id: EntityId,
    pub(super) database_name: T,
    pub(super) client_name: T,
    pub(super) kind: RelationKind,
    pub(super) referenced_entity_id: EntityId,
    /// Overrides the derived `{name}_id` storage column of a reference.
    pub(super) column_override: Option<T>,
    pub(super) nullable: bool,
}

impl<T> Relation<T> {
    pub(crate) fn entity_id(&self) -> EntityId {
        self.entity_id
    }

    pub(crate) fn kind(&self) -> RelationKind {
        self.kind
    }

    pub(crate) fn referenced_entity_id(&self) -> EntityId {
        self.referenced_entity_id
    }

    pub(crate) fn nullable(&self) -> bool {
        self.nullable
    }
}

impl Relation<String> {
    pub fn new(entity_id: EntityId, name: String, kind: RelationKind, referenced_entity_id: EntityId) -> Self {
        let client_name = name.to_camel_case();

        Self {
            entity_id,
            database_name: name,
            client_name,
            kind,
            referenced_entity_id,
            column_override: None,
            nullable: false,
        }
    }

    pub fn with_column_override(mut self, column: String) -> Self {
        self.column_override = Some(column);
        self
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub(crate) fn database_name(&self) -> &str {
        &self.database_name
    }

    pub(crate) fn client_name(&self) -> &str {
        &self.client_name
    }

    pub(crate) fn column_override(&self) -> Option<&str> {
        self.column_override.as_deref()
    }
}

impl Relation<StringId> {
    pub(crate) fn database_name(&self) -> StringId {
        self.database_name
    }

    pub(crate) fn client_name(&self) -> StringId {
        self.client_name
    }

    pub(crate) fn column_override(&self) -> Option<StringId> {
        self.column_override
    }
}
