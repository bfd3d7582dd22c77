use model_definition::{EntityId, EntityMember, EntityStore, JsonMap, Key};
use serde_json::Value;

use super::MutationEngine;
use crate::{
    context::RequestContext,
    error::MutationResult,
    fields::{classify, FieldKind},
    reference::{disambiguate_id, disambiguate_ids, encode_global_id},
};

/// Outcome of a single deletion. `deleted_id` carries the key the
/// client reference disambiguated to, `None` when no row matched.
#[derive(Debug, Clone, PartialEq)]
pub struct DeletePayload {
    pub found: bool,
    pub deleted_id: Option<Key>,
}

/// Outcome of a filter based batch deletion. The ids come back in the
/// opaque global form and were collected before the rows went away.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchDeletePayload {
    pub deletion_count: usize,
    pub deleted_ids: Vec<String>,
}

impl<S> MutationEngine<'_, S>
where
    S: EntityStore,
{
    /// Deletes one row by reference. A reference to a missing row is
    /// not an error; the payload reports it as not found.
    pub fn delete(&self, entity: EntityId, id: &Value) -> MutationResult<DeletePayload> {
        let key = disambiguate_id(id)?;
        let walker = self.model.walk(entity);

        tracing::debug!(entity = walker.client_name(), key = %key, "deleting entity");

        if self.store.delete(entity, &key)? {
            Ok(DeletePayload {
                found: true,
                deleted_id: Some(key),
            })
        } else {
            Ok(DeletePayload {
                found: false,
                deleted_id: None,
            })
        }
    }

    /// Deletes every row matching the filter.
    ///
    /// Filter fields convert like payload fields: references and
    /// reference lists disambiguate, and handlers run first and
    /// suppress conversion when they transform the value. A field the
    /// entity does not know passes through raw instead of failing;
    /// filters produced from nested lookup paths rely on this.
    pub fn batch_delete(
        &self,
        entity: EntityId,
        filter: &JsonMap,
        context: &RequestContext,
    ) -> MutationResult<BatchDeletePayload> {
        let walker = self.model.walk(entity);

        tracing::debug!(entity = walker.client_name(), "batch deleting entities");

        let mut converted = JsonMap::new();

        for (name, value) in filter {
            let member = walker.find_member(name);

            if member.is_none() {
                tracing::warn!(
                    entity = walker.client_name(),
                    field = name.as_str(),
                    "unknown filter field passes through unconverted"
                );
            }

            let (effective, transformed) = self.effective_value(name, value, context)?;

            let Some(member) = member else {
                converted.insert(name.clone(), effective);
                continue;
            };

            if transformed || value.is_null() {
                converted.insert(member.database_name().to_string(), effective);
                continue;
            }

            match (classify(member), member) {
                (FieldKind::ForeignKey, EntityMember::Relation(relation)) => {
                    let key = disambiguate_id(&effective)?;

                    converted.insert(relation.storage_column(), key.to_value());
                }
                (FieldKind::ManyToMany | FieldKind::ReverseRelation, EntityMember::Relation(relation)) => {
                    let keys = disambiguate_ids(&effective)?;

                    converted.insert(
                        relation.database_name().to_string(),
                        Value::Array(keys.iter().map(Key::to_value).collect()),
                    );
                }
                _ => {
                    converted.insert(member.database_name().to_string(), effective);
                }
            }
        }

        let keys = self.store.delete_matching(entity, &converted)?;

        let deleted_ids = keys
            .iter()
            .map(|key| encode_global_id(walker.client_name(), key))
            .collect::<Vec<_>>();

        Ok(BatchDeletePayload {
            deletion_count: keys.len(),
            deleted_ids,
        })
    }
}
