#![allow(unused_crate_dependencies, clippy::panic)]

//! End to end coverage of the generated mutation flows, executed
//! against the in memory store.
//!
//! The harness builds a small project tracker model: users, projects,
//! tags and tasks, with reference, collection and reverse relations
//! between them. Every entity gets plain create, update and patch
//! input types registered; tests declaring extras register their own
//! input types on top.

use std::sync::Arc;

use memory_store::MemoryStore;
use model_definition::{
    Entity, EntityId, Field, FieldType, JsonMap, ModelDefinition, Relation, RelationId, RelationKind,
};
use mutation_engine::{
    create_input_name, patch_input_name, update_input_name, MutationEngine, TypeMeta, TypeMetaRegistry,
};

pub struct Harness {
    model: Arc<ModelDefinition>,
    pub store: MemoryStore,
    pub registry: TypeMetaRegistry,
}

impl Harness {
    pub fn new() -> Self {
        let mut model = ModelDefinition::new();

        let user = model.push_entity(Entity::new("user".to_string()));
        let project = model.push_entity(Entity::new("project".to_string()));
        let tag = model.push_entity(Entity::new("tag".to_string()));
        let task = model.push_entity(Entity::new("task".to_string()));

        model.push_field(Field::new(user, "name".to_string(), FieldType::String));
        model.push_field(Field::new(user, "email".to_string(), FieldType::String).with_nullable(true));

        model.push_field(Field::new(project, "name".to_string(), FieldType::String));

        model.push_field(Field::new(tag, "label".to_string(), FieldType::String));

        model.push_field(Field::new(task, "title".to_string(), FieldType::String));
        model.push_field(Field::new(task, "description".to_string(), FieldType::String).with_nullable(true));
        model.push_field(Field::new(task, "created_at".to_string(), FieldType::DateTime).with_default(true));

        model.push_relation(Relation::new(
            task,
            "project".to_string(),
            RelationKind::ForeignKey,
            project,
        ));

        // The owner reference stores its key under a column that does
        // not follow the `_id` naming convention.
        model.push_relation(
            Relation::new(task, "owner".to_string(), RelationKind::ForeignKey, user)
                .with_column_override("assignee_id".to_string())
                .with_nullable(true),
        );

        model.push_relation(
            Relation::new(task, "created_by".to_string(), RelationKind::ForeignKey, user).with_nullable(true),
        );

        model.push_relation(Relation::new(task, "tags".to_string(), RelationKind::ManyToMany, tag));
        model.push_relation(Relation::new(task, "watchers".to_string(), RelationKind::ManyToMany, user));

        model.push_relation(Relation::new(
            project,
            "tasks".to_string(),
            RelationKind::ReverseMany,
            task,
        ));

        model.finalize();

        let model = Arc::new(model);
        let store = MemoryStore::new(model.clone());
        let mut registry = TypeMetaRegistry::new();

        for entity in model.entities() {
            registry
                .register(&create_input_name(entity), entity, TypeMeta::default())
                .unwrap();
            registry
                .register(&update_input_name(entity), entity, TypeMeta::default())
                .unwrap();
            registry
                .register(&patch_input_name(entity), entity, TypeMeta::default())
                .unwrap();
        }

        Harness {
            model,
            store,
            registry,
        }
    }

    pub fn engine(&self) -> MutationEngine<'_, MemoryStore> {
        MutationEngine::new(&self.model, &self.store, &self.registry)
    }

    /// Registers an input type for the given client type, replacing the
    /// plain one if the name collides.
    pub fn register(&mut self, input_type_name: &str, client_type: &str, meta: TypeMeta) {
        let entity = self
            .model
            .find_entity_for_client_type(client_type)
            .unwrap_or_else(|| panic!("unknown client type {client_type}"));

        self.registry.register(input_type_name, entity, meta).unwrap();
    }

    pub fn entity(&self, client_type: &str) -> EntityId {
        self.model
            .find_entity_for_client_type(client_type)
            .unwrap_or_else(|| panic!("unknown client type {client_type}"))
            .id()
    }

    pub fn relation(&self, client_type: &str, client_field: &str) -> RelationId {
        self.model
            .find_entity_for_client_type(client_type)
            .and_then(|entity| entity.find_relation(client_field))
            .unwrap_or_else(|| panic!("unknown relation {client_type}.{client_field}"))
            .id()
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a payload map from a `json!` object literal.
pub fn payload(value: serde_json::Value) -> JsonMap {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("payload must be an object, got {other}"),
    }
}

/// Parses input type metadata from its JSON declaration form.
pub fn meta(document: &str) -> TypeMeta {
    serde_json::from_str(document).unwrap()
}
