use super::{EntityWalker, Walker};
use crate::model_definition::{names::StringId, Field, FieldId, FieldType};

/// Definition of a stored scalar column.
pub type FieldWalker<'a> = Walker<'a, FieldId>;

impl<'a> FieldWalker<'a> {
    /// The column name in the store.
    pub fn database_name(self) -> &'a str {
        self.get_name(self.get().database_name())
    }

    /// The field name in the GraphQL APIs.
    pub fn client_name(self) -> &'a str {
        self.get_name(self.get().client_name())
    }

    /// The entity the field belongs to.
    pub fn entity(self) -> EntityWalker<'a> {
        self.walk(self.get().entity_id())
    }

    pub fn field_type(self) -> FieldType {
        self.get().r#type()
    }

    pub fn nullable(self) -> bool {
        self.get().nullable()
    }

    pub fn has_default(self) -> bool {
        self.get().has_default()
    }

    /// A value must be supplied on creation when the column neither
    /// accepts null nor carries a default.
    pub fn required_on_create(self) -> bool {
        !self.nullable() && !self.has_default()
    }

    fn get(self) -> &'a Field<StringId> {
        &self.model_definition.fields[self.id.0 as usize]
    }
}
