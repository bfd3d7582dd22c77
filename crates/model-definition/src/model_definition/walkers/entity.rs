use super::{FieldWalker, RelationWalker, Walker};
use crate::model_definition::{names::StringId, Entity, EntityId};

/// Definition of an entity.
pub type EntityWalker<'a> = Walker<'a, EntityId>;

/// A client-visible member of an entity, either a stored scalar column
/// or a relation to another entity.
#[derive(Clone, Copy)]
pub enum EntityMember<'a> {
    Scalar(FieldWalker<'a>),
    Relation(RelationWalker<'a>),
}

impl<'a> EntityMember<'a> {
    pub fn client_name(self) -> &'a str {
        match self {
            EntityMember::Scalar(field) => field.client_name(),
            EntityMember::Relation(relation) => relation.client_name(),
        }
    }

    pub fn database_name(self) -> &'a str {
        match self {
            EntityMember::Scalar(field) => field.database_name(),
            EntityMember::Relation(relation) => relation.database_name(),
        }
    }

    pub fn as_relation(self) -> Option<RelationWalker<'a>> {
        match self {
            EntityMember::Relation(relation) => Some(relation),
            EntityMember::Scalar(_) => None,
        }
    }
}

impl<'a> EntityWalker<'a> {
    /// The name of the entity in the store.
    pub fn database_name(self) -> &'a str {
        self.get_name(self.get().database_name())
    }

    /// The name of the entity in the GraphQL APIs.
    pub fn client_name(self) -> &'a str {
        self.get_name(self.get().client_name())
    }

    /// An iterator over all the scalar fields of the entity.
    pub fn fields(self) -> impl Iterator<Item = FieldWalker<'a>> + 'a {
        let range = super::range_for_key(&self.model_definition.members.fields, self.id, |(entity_id, _)| {
            *entity_id
        });

        range.map(move |index| self.walk(self.model_definition.members.fields[index].1))
    }

    /// An iterator over all the relations declared on the entity.
    pub fn relations(self) -> impl Iterator<Item = RelationWalker<'a>> + 'a {
        let range = super::range_for_key(&self.model_definition.members.relations, self.id, |(entity_id, _)| {
            *entity_id
        });

        range.map(move |index| self.walk(self.model_definition.members.relations[index].1))
    }

    /// Find a scalar field by client name.
    pub fn find_field(self, client_name: &str) -> Option<FieldWalker<'a>> {
        self.model_definition
            .names
            .get_field_id_for_client_name(client_name, self.id)
            .map(|id| self.walk(id))
    }

    /// Find a relation by client name.
    pub fn find_relation(self, client_name: &str) -> Option<RelationWalker<'a>> {
        self.model_definition
            .names
            .get_relation_id_for_client_name(client_name, self.id)
            .map(|id| self.walk(id))
    }

    /// Find a member of any kind by client name.
    pub fn find_member(self, client_name: &str) -> Option<EntityMember<'a>> {
        self.find_field(client_name)
            .map(EntityMember::Scalar)
            .or_else(|| self.find_relation(client_name).map(EntityMember::Relation))
    }

    /// Find a scalar field by its name in the store.
    pub fn find_field_by_database_name(self, name: &str) -> Option<FieldWalker<'a>> {
        self.model_definition
            .names
            .get_field_id(name, self.id)
            .map(|id| self.walk(id))
    }

    /// Find a relation by its name in the store.
    pub fn find_relation_by_database_name(self, name: &str) -> Option<RelationWalker<'a>> {
        self.model_definition
            .names
            .get_relation_id(name, self.id)
            .map(|id| self.walk(id))
    }

    fn get(self) -> &'a Entity<StringId> {
        &self.model_definition.entities[self.id.0 as usize]
    }
}
