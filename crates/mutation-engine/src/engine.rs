use indexmap::IndexMap;
use model_definition::{
    EntityStore, EntityWalker, JsonMap, Key, ModelDefinition, RelationId, RelationWalker, StoreError,
};
use serde_json::Value;

use crate::{
    context::RequestContext,
    error::{MutationError, MutationResult},
    extras::{payload_field_name, ManyToManySubField},
    handlers::FieldHandlers,
    operation::Operation,
    reference::{disambiguate_id, disambiguate_ids},
    registry::{TypeMeta, TypeMetaRegistry},
};

mod create;
mod delete;
mod update;

pub use delete::{BatchDeletePayload, DeletePayload};

/// Executes generated mutations against one model and store.
///
/// Construction wires in the registered input type metadata and the
/// field handlers of the mutation definition. The engine keeps no per
/// request state; one instance serves concurrently handled requests.
pub struct MutationEngine<'a, S> {
    model: &'a ModelDefinition,
    store: &'a S,
    registry: &'a TypeMetaRegistry,
    handlers: FieldHandlers,
}

impl<'a, S> MutationEngine<'a, S>
where
    S: EntityStore,
{
    pub fn new(model: &'a ModelDefinition, store: &'a S, registry: &'a TypeMetaRegistry) -> Self {
        Self {
            model,
            store,
            registry,
            handlers: FieldHandlers::new(),
        }
    }

    pub fn with_handlers(mut self, handlers: FieldHandlers) -> Self {
        self.handlers = handlers;
        self
    }

    fn meta_for(&self, input_type_name: &str) -> MutationResult<&'a TypeMeta> {
        self.registry
            .get(input_type_name)
            .ok_or_else(|| MutationError::Configuration(format!("no metadata registered for {input_type_name}")))
    }

    /// Runs the registered handler of a payload field, if any, and
    /// returns the effective value together with whether it differs
    /// from the client value. Default reference conversion only runs
    /// when it does not.
    fn effective_value(&self, name: &str, value: &Value, context: &RequestContext) -> MutationResult<(Value, bool)> {
        match self.handlers.get(name) {
            Some(handler) => {
                let effective = handler(value, name, context)?;
                let transformed = effective != *value;

                Ok((effective, transformed))
            }
            None => Ok((value.clone(), false)),
        }
    }

    fn extras_relation<'m>(&self, entity: EntityWalker<'m>, name: &str) -> MutationResult<RelationWalker<'m>> {
        entity.find_relation_by_database_name(name).ok_or_else(|| {
            MutationError::Configuration(format!("{name} does not name a relation of {}", entity.client_name()))
        })
    }

    /// Resolves one element of an extras sub field to an existing row,
    /// or creates the row when the sub field declares a nested type.
    fn resolve_association_member(
        &self,
        relation: RelationWalker<'_>,
        sub_field: &ManyToManySubField,
        value: &Value,
        context: &RequestContext,
    ) -> MutationResult<Key> {
        let referenced = relation.referenced_entity();

        match &sub_field.nested_type {
            None => {
                let key = disambiguate_id(value)?;

                match self.store.get(referenced.id(), &key) {
                    Ok(record) => Ok(record.key),
                    Err(StoreError::NotFound { .. }) => Err(MutationError::RelatedEntityNotFound {
                        entity: referenced.client_name().to_string(),
                        key,
                    }),
                    Err(error) => Err(error.into()),
                }
            }
            Some(nested_type) => {
                let record = self.create_for_type(nested_type, referenced, value, context)?;

                Ok(record.key)
            }
        }
    }

    /// Resolves and applies the declared many to many extras of a
    /// payload: whole set replacements first, then additions, then
    /// removals, batched into one association call per relation.
    fn apply_many_to_many_extras(
        &self,
        entity: EntityWalker<'_>,
        owner: &Key,
        payload: &JsonMap,
        context: &RequestContext,
        meta: &TypeMeta,
    ) -> MutationResult<()> {
        let mut to_set: IndexMap<RelationId, Vec<Key>> = IndexMap::new();
        let mut to_add: IndexMap<RelationId, Vec<Key>> = IndexMap::new();
        let mut to_remove: IndexMap<RelationId, Vec<Key>> = IndexMap::new();

        for (name, extra) in &meta.many_to_many_extras {
            let relation = self.extras_relation(entity, name)?;

            for (sub_field_name, sub_field) in &extra.sub_fields {
                let field_name = payload_field_name(name, sub_field_name);
                let Some(value) = payload.get(&field_name) else { continue };

                if value.is_null() {
                    continue;
                }

                let Value::Array(elements) = value else {
                    return Err(MutationError::MalformedReference { value: value.clone() });
                };

                let mut keys = Vec::with_capacity(elements.len());

                for element in elements {
                    keys.push(self.resolve_association_member(relation, sub_field, element, context)?);
                }

                if sub_field_name == "exact" {
                    to_set.entry(relation.id()).or_default().extend(keys);
                } else {
                    match sub_field.operation_for(sub_field_name) {
                        Operation::Add => to_add.entry(relation.id()).or_default().extend(keys),
                        Operation::Remove => to_remove.entry(relation.id()).or_default().extend(keys),
                    }
                }
            }
        }

        for (relation, keys) in &to_set {
            self.store.set_related(*relation, owner, keys)?;
        }

        for (relation, keys) in &to_add {
            self.store.add_related(*relation, owner, keys)?;
        }

        for (relation, keys) in &to_remove {
            self.store.remove_related(*relation, owner, keys)?;
        }

        Ok(())
    }

    /// Applies the deferred plain collection values through whole set
    /// replacement. A null value skips the call entirely.
    fn apply_deferred_sets(&self, owner: &Key, deferred: &IndexMap<RelationId, Value>) -> MutationResult<()> {
        for (relation, value) in deferred {
            if value.is_null() {
                continue;
            }

            let keys = disambiguate_ids(value)?;
            self.store.set_related(*relation, owner, &keys)?;
        }

        Ok(())
    }
}

fn field_not_found(entity: EntityWalker<'_>, field: &str) -> MutationError {
    MutationError::FieldNotFound {
        entity: entity.client_name().to_string(),
        field: field.to_string(),
    }
}
