use indexmap::IndexMap;
use model_definition::{EntityId, EntityMember, EntityRecord, EntityStore, EntityWalker, JsonMap, Key, RelationId};
use serde_json::Value;

use super::{field_not_found, MutationEngine};
use crate::{
    context::RequestContext,
    error::{MutationError, MutationResult},
    reference::{disambiguate_id, disambiguate_ids},
    registry::TypeMeta,
};

impl<S> MutationEngine<'_, S>
where
    S: EntityStore,
{
    /// Creates one entity from a client payload.
    ///
    /// Scalar and reference values accumulate into a column value map,
    /// nested reference extras create their related row first, and the
    /// entity is persisted in a single insert. Collection values and
    /// collection extras apply afterwards, once the row has a key.
    pub fn create(
        &self,
        entity: EntityId,
        input_type_name: &str,
        payload: &JsonMap,
        context: &RequestContext,
    ) -> MutationResult<EntityRecord> {
        let meta = self.meta_for(input_type_name)?;

        self.create_obj(self.model.walk(entity), payload, context, meta)
    }

    pub(super) fn create_for_type(
        &self,
        input_type_name: &str,
        entity: EntityWalker<'_>,
        value: &Value,
        context: &RequestContext,
    ) -> MutationResult<EntityRecord> {
        let Value::Object(payload) = value else {
            return Err(MutationError::MalformedReference { value: value.clone() });
        };

        let meta = self.meta_for(input_type_name)?;

        self.create_obj(entity, payload, context, meta)
    }

    pub(super) fn create_obj(
        &self,
        entity: EntityWalker<'_>,
        payload: &JsonMap,
        context: &RequestContext,
        meta: &TypeMeta,
    ) -> MutationResult<EntityRecord> {
        tracing::debug!(entity = entity.client_name(), "creating entity");

        let extras_fields = meta.extras_payload_field_names();
        let mut values = JsonMap::new();
        let mut deferred_sets: IndexMap<RelationId, Value> = IndexMap::new();

        for (field_name, context_name) in &meta.auto_context_fields {
            if let Some(value) = context.attribute(context_name) {
                values.insert(field_name.clone(), value.clone());
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
                    // A client supplied reference wins over an auto
                    // context seed stored under the plain field name.
                    if meta.auto_context_fields.contains_key(relation.database_name()) {
                        values.shift_remove(relation.database_name());
                    }

                    let key = disambiguate_id(&effective)?;
                    values.insert(relation.storage_column(), key.to_value());
                }
                _ => {
                    values.insert(member.database_name().to_string(), effective);
                }
            }
        }

        for (name, extra) in &meta.foreign_key_extras {
            let relation = self.extras_relation(entity, name)?;

            let Some(value) = payload.get(relation.client_name()) else {
                continue;
            };

            match &extra.nested_type {
                // Plain reference extras store the value raw under the
                // literal `_id` column; column overrides do not apply.
                None => {
                    values.insert(format!("{name}_id"), value.clone());
                }
                Some(nested_type) => {
                    let related = self.create_for_type(nested_type, relation.referenced_entity(), value, context)?;

                    values.insert(name.clone(), related.key.to_value());
                }
            }
        }

        let record = self.store.insert(entity.id(), values)?;

        self.apply_deferred_sets(&record.key, &deferred_sets)?;
        self.apply_many_to_many_extras(entity, &record.key, payload, context, meta)?;

        Ok(record)
    }
}
