use indexmap::IndexMap;
use model_definition::{EntityId, EntityMember, EntityRecord, EntityStore, JsonMap, Key, RelationId};
use serde_json::Value;

use super::{field_not_found, MutationEngine};
use crate::{
    context::RequestContext,
    error::MutationResult,
    reference::{disambiguate_id, disambiguate_ids},
    registry::TypeMeta,
};

impl<S> MutationEngine<'_, S>
where
    S: EntityStore,
{
    /// Applies a client payload to a loaded record in place.
    ///
    /// Scalar and reference changes only touch the record's attribute
    /// map and are persisted by the caller. Association changes go to
    /// the store immediately, the row already exists.
    pub fn update(
        &self,
        record: &mut EntityRecord,
        input_type_name: &str,
        payload: &JsonMap,
        context: &RequestContext,
    ) -> MutationResult<()> {
        let meta = self.meta_for(input_type_name)?;

        self.update_obj(record, payload, context, meta)
    }

    /// Disambiguates the id, loads the row, applies the payload and
    /// saves the result. Patch mutations flow through here as well;
    /// their input type is simply fully optional.
    pub fn update_by_id(
        &self,
        entity: EntityId,
        input_type_name: &str,
        id: &Value,
        payload: &JsonMap,
        context: &RequestContext,
    ) -> MutationResult<EntityRecord> {
        let key = disambiguate_id(id)?;
        let mut record = self.store.get(entity, &key)?;

        self.update(&mut record, input_type_name, payload, context)?;
        self.store.save(&record)?;

        Ok(record)
    }

    fn update_obj(
        &self,
        record: &mut EntityRecord,
        payload: &JsonMap,
        context: &RequestContext,
        meta: &TypeMeta,
    ) -> MutationResult<()> {
        let entity = self.model.walk(record.entity_id);

        tracing::debug!(entity = entity.client_name(), key = %record.key, "updating entity");

        let extras_fields = meta.extras_payload_field_names();
        let mut deferred_sets: IndexMap<RelationId, Value> = IndexMap::new();

        for (field_name, context_name) in &meta.auto_context_fields {
            if let Some(value) = context.attribute(context_name) {
                record.set_attribute(field_name, value.clone());
            }
        }

        for (name, value) in payload {
            if extras_fields.contains(name) {
                continue;
            }

            let member = entity.find_member(name).ok_or_else(|| field_not_found(entity, name))?;
            let (effective, transformed) = self.effective_value(name, value, context)?;

            match member {
                EntityMember::Relation(relation) if relation.is_collection() => {
                    let deferred = if !transformed && !effective.is_null() {
                        let keys = disambiguate_ids(&effective)?;

                        Value::Array(keys.iter().map(Key::to_value).collect())
                    } else {
                        effective
                    };

                    deferred_sets.insert(relation.id(), deferred);
                }
                EntityMember::Relation(relation) if !transformed && !effective.is_null() => {
                    // An auto context seed under the plain name would
                    // shadow the reference column on save; clear it.
                    if meta.auto_context_fields.contains_key(relation.database_name()) {
                        record.attributes.shift_remove(relation.database_name());
                    }

                    let key = disambiguate_id(&effective)?;
                    record.set_attribute(&relation.storage_column(), key.to_value());
                }
                _ => {
                    record.set_attribute(member.database_name(), effective);
                }
            }
        }

        for (name, extra) in &meta.foreign_key_extras {
            let relation = self.extras_relation(entity, name)?;

            let Some(value) = payload.get(relation.client_name()) else {
                continue;
            };

            match &extra.nested_type {
                None => record.set_attribute(name, value.clone()),
                Some(nested_type) => {
                    // The nested row is created for its side effects
                    // only; the field keeps the raw payload value.
                    self.create_for_type(nested_type, relation.referenced_entity(), value, context)?;
                    record.set_attribute(name, value.clone());
                }
            }
        }

        self.apply_deferred_sets(&record.key, &deferred_sets)?;
        self.apply_many_to_many_extras(entity, &record.key, payload, context, meta)
    }
}
