use super::{EntityWalker, Walker};
use crate::model_definition::{names::StringId, Relation, RelationId, RelationKind};

/// Definition of a relation between two entities, seen from its
/// declaring side.
pub type RelationWalker<'a> = Walker<'a, RelationId>;

impl<'a> RelationWalker<'a> {
    /// The relation's field name in the store.
    pub fn database_name(self) -> &'a str {
        self.get_name(self.get().database_name())
    }

    /// The relation's field name in the GraphQL APIs.
    pub fn client_name(self) -> &'a str {
        self.get_name(self.get().client_name())
    }

    /// The entity declaring the relation.
    pub fn entity(self) -> EntityWalker<'a> {
        self.walk(self.get().entity_id())
    }

    /// The entity the relation points to.
    pub fn referenced_entity(self) -> EntityWalker<'a> {
        self.walk(self.get().referenced_entity_id())
    }

    pub fn kind(self) -> RelationKind {
        self.get().kind()
    }

    pub fn nullable(self) -> bool {
        self.get().nullable()
    }

    /// True for foreign keys and one-to-ones, which store a reference
    /// column on this side.
    pub fn is_reference(self) -> bool {
        self.kind().is_reference()
    }

    /// True for many-to-manys and reverse relations, which hold a set of
    /// rows rather than a single reference.
    pub fn is_collection(self) -> bool {
        self.kind().is_collection()
    }

    /// The column a reference is stored under: an explicit override, or
    /// the relation name suffixed with `_id`.
    pub fn storage_column(self) -> String {
        match self.get().column_override() {
            Some(id) => self.get_name(id).to_string(),
            None => format!("{}_id", self.database_name()),
        }
    }

    fn get(self) -> &'a Relation<StringId> {
        &self.model_definition.relations[self.id.0 as usize]
    }
}
