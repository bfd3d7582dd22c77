//! An in-memory [`EntityStore`] keeping rows and association sets in
//! mutex-guarded tables.
//!
//! Next to the row data the store keeps an ordered log of every write
//! it performs, so tests can assert not only the final state but the
//! order the engine issued its calls in.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use model_definition::{
    EntityId, EntityRecord, EntityStore, EntityWalker, JsonMap, Key, ModelDefinition, RelationId, StoreError,
    StoreResult,
};
use serde_json::Value;

#[derive(Debug, Default)]
struct Inner {
    rows: HashMap<EntityId, Vec<EntityRecord>>,
    associations: HashMap<(RelationId, Key), Vec<Key>>,
    next_keys: HashMap<EntityId, i64>,
    operations: Vec<String>,
}

impl Inner {
    fn row(&self, entity: EntityId, key: &Key) -> Option<&EntityRecord> {
        self.rows
            .get(&entity)
            .and_then(|rows| rows.iter().find(|row| row.key == *key))
    }

    fn row_mut(&mut self, entity: EntityId, key: &Key) -> Option<&mut EntityRecord> {
        self.rows
            .get_mut(&entity)
            .and_then(|rows| rows.iter_mut().find(|row| row.key == *key))
    }

    fn next_key(&mut self, entity: EntityId) -> Key {
        let next = self.next_keys.entry(entity).or_insert(1);
        let key = Key::Int(*next);
        *next += 1;

        key
    }

    fn log(&mut self, operation: String) {
        self.operations.push(operation);
    }
}

/// State shared by every handle of the store. Rows of an entity keep
/// their insertion order; association sets keep the order the keys were
/// supplied in.
pub struct MemoryStore {
    model: Arc<ModelDefinition>,
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new(model: Arc<ModelDefinition>) -> Self {
        Self {
            model,
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn model(&self) -> &ModelDefinition {
        &self.model
    }

    /// All rows of an entity, in insertion order.
    pub fn rows(&self, entity: EntityId) -> Vec<EntityRecord> {
        self.lock().rows.get(&entity).cloned().unwrap_or_default()
    }

    /// The association set of a single row, in the order it was built.
    pub fn association(&self, relation: RelationId, owner: &Key) -> Vec<Key> {
        self.lock()
            .associations
            .get(&(relation, owner.clone()))
            .cloned()
            .unwrap_or_default()
    }

    /// Every write the store has performed, in order.
    pub fn operations(&self) -> Vec<String> {
        self.lock().operations.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn entity(&self, id: EntityId) -> EntityWalker<'_> {
        self.model.walk(id)
    }

    /// Resolves values keyed by a relation's plain name to the relation's
    /// reference column, the way an ORM resolves an instance assigned to
    /// a relation attribute. Later keys win over earlier ones.
    fn normalize_values(&self, entity: EntityWalker<'_>, values: JsonMap) -> JsonMap {
        let mut normalized = JsonMap::new();

        for (name, value) in values {
            match entity.find_relation_by_database_name(&name) {
                Some(relation) if relation.is_reference() => {
                    normalized.insert(relation.storage_column(), value);
                }
                _ => {
                    normalized.insert(name, value);
                }
            }
        }

        normalized
    }

    fn delete_row(&self, inner: &mut Inner, entity: EntityId, key: &Key) -> bool {
        let Some(rows) = inner.rows.get_mut(&entity) else {
            return false;
        };

        let Some(position) = rows.iter().position(|row| row.key == *key) else {
            return false;
        };

        rows.remove(position);

        // Owner-side association sets go with the row; sets pointing at
        // the row from the other side lose the member.
        inner.associations.retain(|(relation, owner), _| {
            let relation = self.model.walk(*relation);
            !(relation.entity().id() == entity && owner == key)
        });

        for ((relation, _), keys) in inner.associations.iter_mut() {
            let relation = self.model.walk(*relation);

            if relation.referenced_entity().id() == entity {
                keys.retain(|member| member != key);
            }
        }

        let name = self.entity(entity).client_name().to_string();
        inner.log(format!("delete {name}#{key}"));

        true
    }

    fn verify_keys_exist(&self, inner: &Inner, relation: RelationId, keys: &[Key]) -> StoreResult<()> {
        let referenced = self.model.walk(relation).referenced_entity();

        for key in keys {
            if inner.row(referenced.id(), key).is_none() {
                return Err(StoreError::NotFound {
                    entity: referenced.client_name().to_string(),
                    key: key.clone(),
                });
            }
        }

        Ok(())
    }

    fn row_matches(&self, inner: &Inner, row: &EntityRecord, filter: &JsonMap) -> bool {
        let entity = self.entity(row.entity_id);

        filter.iter().all(|(name, value)| {
            match entity.find_relation_by_database_name(name) {
                Some(relation) if relation.is_collection() => {
                    let Some(wanted) = keys_from_value(value) else {
                        return false;
                    };

                    let members = inner
                        .associations
                        .get(&(relation.id(), row.key.clone()))
                        .map(Vec::as_slice)
                        .unwrap_or_default();

                    wanted.iter().all(|key| members.contains(key))
                }
                Some(relation) => row
                    .attributes
                    .get(&relation.storage_column())
                    .unwrap_or(&Value::Null)
                    == value,
                None => row.attributes.get(name.as_str()).unwrap_or(&Value::Null) == value,
            }
        })
    }
}

impl EntityStore for MemoryStore {
    fn insert(&self, entity: EntityId, values: JsonMap) -> StoreResult<EntityRecord> {
        let walker = self.entity(entity);
        let mut values = self.normalize_values(walker, values);

        for field in walker.fields() {
            let missing = match values.get(field.database_name()) {
                None => field.required_on_create(),
                Some(value) => value.is_null() && !field.nullable(),
            };

            if missing {
                return Err(StoreError::MissingColumn {
                    entity: walker.client_name().to_string(),
                    column: field.database_name().to_string(),
                });
            }
        }

        let mut inner = self.lock();

        let key = match values.shift_remove("id").as_ref().and_then(key_from_value) {
            Some(key) => key,
            None => inner.next_key(entity),
        };

        if inner.row(entity, &key).is_some() {
            return Err(StoreError::Backend(format!(
                "duplicate key {key} for {}",
                walker.client_name()
            )));
        }

        let record = EntityRecord::new(entity, key, values);
        tracing::debug!(entity = walker.client_name(), key = %record.key, "inserting row");

        inner.log(format!("insert {}#{}", walker.client_name(), record.key));
        inner.rows.entry(entity).or_default().push(record.clone());

        Ok(record)
    }

    fn get(&self, entity: EntityId, key: &Key) -> StoreResult<EntityRecord> {
        self.lock()
            .row(entity, key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                entity: self.entity(entity).client_name().to_string(),
                key: key.clone(),
            })
    }

    fn save(&self, record: &EntityRecord) -> StoreResult<()> {
        let walker = self.entity(record.entity_id);
        let attributes = self.normalize_values(walker, record.attributes.clone());
        let name = walker.client_name().to_string();

        let mut inner = self.lock();

        let Some(row) = inner.row_mut(record.entity_id, &record.key) else {
            return Err(StoreError::NotFound {
                entity: name,
                key: record.key.clone(),
            });
        };

        row.attributes = attributes;

        tracing::debug!(entity = name.as_str(), key = %record.key, "saving row");
        inner.log(format!("save {name}#{}", record.key));

        Ok(())
    }

    fn delete(&self, entity: EntityId, key: &Key) -> StoreResult<bool> {
        let mut inner = self.lock();
        Ok(self.delete_row(&mut inner, entity, key))
    }

    fn delete_matching(&self, entity: EntityId, filter: &JsonMap) -> StoreResult<Vec<Key>> {
        let mut inner = self.lock();

        let matching: Vec<Key> = inner
            .rows
            .get(&entity)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .filter(|row| self.row_matches(&inner, row, filter))
            .map(|row| row.key.clone())
            .collect();

        for key in &matching {
            self.delete_row(&mut inner, entity, key);
        }

        Ok(matching)
    }

    fn set_related(&self, relation: RelationId, owner: &Key, keys: &[Key]) -> StoreResult<()> {
        let mut inner = self.lock();
        self.verify_keys_exist(&inner, relation, keys)?;

        let walker = self.model.walk(relation);
        inner.log(format!(
            "set {} of {}#{owner} [{}]",
            walker.database_name(),
            walker.entity().client_name(),
            render_keys(keys),
        ));

        inner.associations.insert((relation, owner.clone()), keys.to_vec());

        Ok(())
    }

    fn add_related(&self, relation: RelationId, owner: &Key, keys: &[Key]) -> StoreResult<()> {
        let mut inner = self.lock();
        self.verify_keys_exist(&inner, relation, keys)?;

        let walker = self.model.walk(relation);
        inner.log(format!(
            "add {} of {}#{owner} [{}]",
            walker.database_name(),
            walker.entity().client_name(),
            render_keys(keys),
        ));

        let members = inner.associations.entry((relation, owner.clone())).or_default();

        for key in keys {
            if !members.contains(key) {
                members.push(key.clone());
            }
        }

        Ok(())
    }

    fn remove_related(&self, relation: RelationId, owner: &Key, keys: &[Key]) -> StoreResult<()> {
        let mut inner = self.lock();

        let walker = self.model.walk(relation);
        inner.log(format!(
            "remove {} of {}#{owner} [{}]",
            walker.database_name(),
            walker.entity().client_name(),
            render_keys(keys),
        ));

        if let Some(members) = inner.associations.get_mut(&(relation, owner.clone())) {
            members.retain(|member| !keys.contains(member));
        }

        Ok(())
    }
}

fn render_keys(keys: &[Key]) -> String {
    keys.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

fn key_from_value(value: &Value) -> Option<Key> {
    match value {
        Value::Number(number) => number.as_i64().map(Key::Int),
        Value::String(string) => Some(Key::Str(string.clone())),
        _ => None,
    }
}

fn keys_from_value(value: &Value) -> Option<Vec<Key>> {
    value.as_array()?.iter().map(key_from_value).collect()
}
