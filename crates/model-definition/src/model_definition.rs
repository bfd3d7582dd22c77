mod entity;
mod field;
mod ids;
mod members;
mod names;
mod relation;
mod vectorize;
mod walkers;

use members::Members;
use names::{Names, StringId};
use serde::{Deserialize, Serialize};

pub use entity::Entity;
pub use field::{Field, FieldType};
pub use ids::{EntityId, FieldId, RelationId};
pub use relation::{Relation, RelationKind};
pub use walkers::{EntityMember, EntityWalker, FieldWalker, RelationWalker, Walker};

/// Definition of a relational data model. Contains all the entities,
/// scalar fields and relations needed to derive a GraphQL input schema
/// and to map input payloads onto stored rows.
///
/// The definition is constructed with the `push_` methods, then frozen
/// with [`finalize`](Self::finalize). After that point the important
/// call points are the entity iterator and the find methods taking
/// string slices.
///
/// The structure serializes, so an assembled definition can be cached
/// between runs. Any changes here must be backwards-compatible.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ModelDefinition {
    /// Ordered by id.
    entities: Vec<Entity<StringId>>,
    /// Ordered by id.
    fields: Vec<Field<StringId>>,
    /// Ordered by id.
    relations: Vec<Relation<StringId>>,
    names: Names,
    members: Members,
}

impl ModelDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterates over all entities of the model.
    pub fn entities(&self) -> impl ExactSizeIterator<Item = EntityWalker<'_>> + '_ {
        (0..self.entities.len()).map(move |id| self.walk(EntityId(id as u32)))
    }

    /// Find an entity with the given database name.
    pub fn find_entity(&self, entity_name: &str) -> Option<EntityWalker<'_>> {
        self.names.get_entity_id(entity_name).map(|id| self.walk(id))
    }

    /// Find an entity that represents the given client type.
    pub fn find_entity_for_client_type(&self, client_type: &str) -> Option<EntityWalker<'_>> {
        self.names
            .get_entity_id_for_client_type(client_type)
            .map(|id| self.walk(id))
    }

    /// Find a scalar field that represents the given client field.
    pub fn find_field_for_client_name(&self, client_name: &str, entity_id: EntityId) -> Option<FieldWalker<'_>> {
        self.names
            .get_field_id_for_client_name(client_name, entity_id)
            .map(|id| self.walk(id))
    }

    /// Find a relation that represents the given client field.
    pub fn find_relation_for_client_name(&self, client_name: &str, entity_id: EntityId) -> Option<RelationWalker<'_>> {
        self.names
            .get_relation_id_for_client_name(client_name, entity_id)
            .map(|id| self.walk(id))
    }

    /// Adds an entity to the definition.
    pub fn push_entity(&mut self, entity: Entity<String>) -> EntityId {
        let id = self.next_entity_id();
        self.names.intern_entity(&entity, id);

        self.entities.push(Entity {
            database_name: self.names.intern_string(entity.database_name()),
            client_name: self.names.intern_string(entity.client_name()),
        });

        id
    }

    /// Adds a scalar field to the definition.
    pub fn push_field(&mut self, field: Field<String>) -> FieldId {
        let id = self.next_field_id();

        self.names.intern_field(&field, id);
        self.members.push_field(field.entity_id(), id);

        self.fields.push(Field {
            entity_id: field.entity_id(),
            database_name: self.names.intern_string(field.database_name()),
            client_name: self.names.intern_string(field.client_name()),
            r#type: field.r#type(),
            nullable: field.nullable(),
            has_default: field.has_default(),
        });

        id
    }

    /// Adds a relation to the definition.
    pub fn push_relation(&mut self, relation: Relation<String>) -> RelationId {
        let id = self.next_relation_id();

        self.names.intern_relation(&relation, id);
        self.members.push_relation(relation.entity_id(), id);

        self.relations.push(Relation {
            entity_id: relation.entity_id(),
            database_name: self.names.intern_string(relation.database_name()),
            client_name: self.names.intern_string(relation.client_name()),
            kind: relation.kind(),
            referenced_entity_id: relation.referenced_entity_id(),
            column_override: relation.column_override().map(|name| self.names.intern_string(name)),
            nullable: relation.nullable(),
        });

        id
    }

    /// Finalizes the definition. Sorts the member indices so the walkers
    /// can iterate an entity's fields and relations with a binary search.
    pub fn finalize(&mut self) {
        self.members.fields.sort_by_key(|(entity_id, field_id)| (*entity_id, *field_id));

        self.members
            .relations
            .sort_by_key(|(entity_id, relation_id)| (*entity_id, *relation_id));
    }

    /// Walk an item in the definition by its id.
    pub fn walk<Id>(&self, id: Id) -> Walker<'_, Id> {
        Walker {
            id,
            model_definition: self,
        }
    }

    fn next_entity_id(&self) -> EntityId {
        EntityId(self.entities.len() as u32)
    }

    fn next_field_id(&self) -> FieldId {
        FieldId(self.fields.len() as u32)
    }

    fn next_relation_id(&self) -> RelationId {
        RelationId(self.relations.len() as u32)
    }
}
