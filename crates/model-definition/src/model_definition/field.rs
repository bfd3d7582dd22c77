use inflector::Inflector;
use serde::{Deserialize, Serialize};

use super::{names::StringId, EntityId};

/// The scalar type of a stored column, named after the GraphQL scalar
/// it maps to.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Int,
    Float,
    String,
    Boolean,
    DateTime,
    Json,
}

impl FieldType {
    pub fn client_type(self) -> &'static str {
        match self {
            FieldType::Int => "Int",
            FieldType::Float => "Float",
            FieldType::String => "String",
            FieldType::Boolean => "Boolean",
            FieldType::DateTime => "DateTime",
            FieldType::Json => "JSON",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Field<T> {
    pub(super) entity_id: EntityId,
    pub(super) database_name: T,
    pub(super) client_name: T,
    pub(super) r#type: FieldType,
    pub(super) nullable: bool,
    pub(super) has_default: bool,
}

impl<T> Copy for Field<T> where T: Copy {}

impl<T> Field<T> {
    pub(crate) fn entity_id(&self) -> EntityId {
        self.entity_id
    }

    pub(crate) fn r#type(&self) -> FieldType {
        self.r#type
    }

    pub(crate) fn nullable(&self) -> bool {
        self.nullable
    }

    pub(crate) fn has_default(&self) -> bool {
        self.has_default
    }
}

impl Field<String> {
    pub fn new(entity_id: EntityId, name: String, r#type: FieldType) -> Self {
        let client_name = name.to_camel_case();

        Self {
            entity_id,
            database_name: name,
            client_name,
            r#type,
            nullable: false,
            has_default: false,
        }
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn with_default(mut self, has_default: bool) -> Self {
        self.has_default = has_default;
        self
    }

    pub(crate) fn database_name(&self) -> &str {
        &self.database_name
    }

    pub(crate) fn client_name(&self) -> &str {
        &self.client_name
    }
}

impl Field<StringId> {
    pub(crate) fn database_name(&self) -> StringId {
        self.database_name
    }

    pub(crate) fn client_name(&self) -> StringId {
        self.client_name
    }
}
