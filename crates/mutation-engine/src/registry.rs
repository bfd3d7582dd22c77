use std::collections::HashSet;

use indexmap::IndexMap;
use inflector::Inflector;
use model_definition::EntityWalker;
use serde::Deserialize;

use crate::{
    error::{MutationError, MutationResult},
    extras::{payload_field_name, ForeignKeyExtra, ManyToManyExtra},
};

/// Mutation time metadata of one generated input type: which fields are
/// populated from request context and which relation extras the type
/// declares. Field and relation names are database names; the request
/// context attribute names are whatever the serving layer exposes.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TypeMeta {
    #[serde(default)]
    pub auto_context_fields: IndexMap<String, String>,
    #[serde(default)]
    pub many_to_many_extras: IndexMap<String, ManyToManyExtra>,
    #[serde(default)]
    pub foreign_key_extras: IndexMap<String, ForeignKeyExtra>,
}

impl TypeMeta {
    /// The client payload field names claimed by the declared extras.
    /// The main payload pass of create and update skips these.
    pub(crate) fn extras_payload_field_names(&self) -> HashSet<String> {
        let mut names = HashSet::new();

        for (name, extra) in &self.many_to_many_extras {
            for sub_field_name in extra.sub_fields.keys() {
                names.insert(payload_field_name(name, sub_field_name));
            }
        }

        for name in self.foreign_key_extras.keys() {
            names.insert(name.to_camel_case());
        }

        names
    }
}

/// Lookup from generated input type name to its metadata.
///
/// Populated once during schema assembly and injected into the engine;
/// mutation execution only reads it, so sharing it across concurrently
/// handled requests is sound as long as registration finishes before
/// serving starts.
#[derive(Debug, Default)]
pub struct TypeMetaRegistry {
    metas: IndexMap<String, TypeMeta>,
}

impl TypeMetaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the metadata of an input type after checking the
    /// declared names against the entity the type writes to.
    pub fn register(&mut self, input_type_name: &str, entity: EntityWalker<'_>, meta: TypeMeta) -> MutationResult<()> {
        for name in meta.foreign_key_extras.keys() {
            let relation = entity.find_relation_by_database_name(name);

            if !relation.is_some_and(|relation| relation.is_reference()) {
                return Err(MutationError::Configuration(format!(
                    "foreign key extra {name} on {input_type_name} does not name a reference relation of {}",
                    entity.client_name(),
                )));
            }
        }

        for name in meta.many_to_many_extras.keys() {
            let relation = entity.find_relation_by_database_name(name);

            if !relation.is_some_and(|relation| relation.is_collection()) {
                return Err(MutationError::Configuration(format!(
                    "many to many extra {name} on {input_type_name} does not name a collection relation of {}",
                    entity.client_name(),
                )));
            }
        }

        for name in meta.auto_context_fields.keys() {
            if entity.find_field_by_database_name(name).is_none()
                && entity.find_relation_by_database_name(name).is_none()
            {
                return Err(MutationError::Configuration(format!(
                    "auto context field {name} on {input_type_name} does not name a member of {}",
                    entity.client_name(),
                )));
            }
        }

        self.metas.insert(input_type_name.to_string(), meta);

        Ok(())
    }

    pub fn get(&self, input_type_name: &str) -> Option<&TypeMeta> {
        self.metas.get(input_type_name)
    }
}

/// The conventional input type name of the create mutation of an entity.
pub fn create_input_name(entity: EntityWalker<'_>) -> String {
    format!("Create{}Input", entity.client_name())
}

/// The conventional input type name of the update mutation of an entity.
pub fn update_input_name(entity: EntityWalker<'_>) -> String {
    format!("Update{}Input", entity.client_name())
}

/// The conventional input type name of the patch mutation of an entity.
pub fn patch_input_name(entity: EntityWalker<'_>) -> String {
    format!("Patch{}Input", entity.client_name())
}

/// The conventional input type name of the batch delete mutation of an
/// entity.
pub fn batch_delete_input_name(entity: EntityWalker<'_>) -> String {
    format!("BatchDelete{}Input", entity.client_name())
}
