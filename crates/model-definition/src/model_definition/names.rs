mod interner;

pub(super) use self::interner::{StringId, StringInterner};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{Entity, EntityId, Field, FieldId, Relation, RelationId};

#[derive(Default, Serialize, Deserialize, Debug, Clone)]
pub(super) struct Names {
    interner: StringInterner,
    #[serde(with = "super::vectorize")]
    entities: HashMap<StringId, EntityId>,
    #[serde(with = "super::vectorize")]
    fields: HashMap<(EntityId, StringId), FieldId>,
    #[serde(with = "super::vectorize")]
    relations: HashMap<(EntityId, StringId), RelationId>,
    #[serde(with = "super::vectorize")]
    client_types: HashMap<StringId, EntityId>,
    #[serde(with = "super::vectorize")]
    client_fields: HashMap<(EntityId, StringId), FieldId>,
    #[serde(with = "super::vectorize")]
    client_relations: HashMap<(EntityId, StringId), RelationId>,
}

impl Names {
    pub(super) fn intern_entity(&mut self, entity: &Entity<String>, entity_id: EntityId) {
        let string_id = self.interner.intern(entity.database_name());
        self.entities.insert(string_id, entity_id);

        let string_id = self.interner.intern(entity.client_name());
        self.client_types.insert(string_id, entity_id);
    }

    pub(super) fn intern_field(&mut self, field: &Field<String>, field_id: FieldId) {
        let string_id = self.interner.intern(field.database_name());
        self.fields.insert((field.entity_id(), string_id), field_id);

        let string_id = self.interner.intern(field.client_name());
        self.client_fields.insert((field.entity_id(), string_id), field_id);
    }

    pub(super) fn intern_relation(&mut self, relation: &Relation<String>, relation_id: RelationId) {
        let string_id = self.interner.intern(relation.database_name());
        self.relations.insert((relation.entity_id(), string_id), relation_id);

        let string_id = self.interner.intern(relation.client_name());
        self.client_relations.insert((relation.entity_id(), string_id), relation_id);
    }

    pub(super) fn intern_string(&mut self, string_value: &str) -> StringId {
        self.interner.intern(string_value)
    }

    pub(super) fn get_entity_id(&self, entity_name: &str) -> Option<EntityId> {
        self.interner
            .lookup(entity_name)
            .and_then(|string_id| self.entities.get(&string_id))
            .copied()
    }

    pub(super) fn get_entity_id_for_client_type(&self, type_name: &str) -> Option<EntityId> {
        self.interner
            .lookup(type_name)
            .and_then(|string_id| self.client_types.get(&string_id))
            .copied()
    }

    pub(super) fn get_field_id(&self, field_name: &str, entity_id: EntityId) -> Option<FieldId> {
        self.interner
            .lookup(field_name)
            .and_then(|string_id| self.fields.get(&(entity_id, string_id)))
            .copied()
    }

    pub(super) fn get_field_id_for_client_name(&self, field_name: &str, entity_id: EntityId) -> Option<FieldId> {
        self.interner
            .lookup(field_name)
            .and_then(|string_id| self.client_fields.get(&(entity_id, string_id)))
            .copied()
    }

    pub(super) fn get_relation_id(&self, field_name: &str, entity_id: EntityId) -> Option<RelationId> {
        self.interner
            .lookup(field_name)
            .and_then(|string_id| self.relations.get(&(entity_id, string_id)))
            .copied()
    }

    pub(super) fn get_relation_id_for_client_name(&self, field_name: &str, entity_id: EntityId) -> Option<RelationId> {
        self.interner
            .lookup(field_name)
            .and_then(|string_id| self.client_relations.get(&(entity_id, string_id)))
            .copied()
    }

    pub(super) fn get_name(&self, string_id: StringId) -> &str {
        self.interner.get(string_id)
    }
}
