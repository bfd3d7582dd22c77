use indexmap::IndexMap;
use inflector::Inflector;
use serde::Deserialize;

use crate::operation::Operation;

/// Declares that a reference field also accepts a nested creation
/// payload of the named input type instead of a plain reference. The
/// plain `ID` form normalizes to no nested type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ForeignKeyExtra {
    pub nested_type: Option<String>,
}

impl<'de> Deserialize<'de> for ForeignKeyExtra {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Shape {
            #[serde(rename = "type", default)]
            nested_type: Option<String>,
        }

        let shape = Shape::deserialize(deserializer)?;

        Ok(ForeignKeyExtra {
            nested_type: shape.nested_type.filter(|name| name != "ID"),
        })
    }
}

/// The declared sub fields of a collection relation, keyed by sub field
/// name. The `exact` sub field replaces the whole association set and
/// reads the relation's own payload field; every other sub field reads
/// a suffixed payload field of its own.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ManyToManyExtra {
    pub sub_fields: IndexMap<String, ManyToManySubField>,
}

impl<'de> Deserialize<'de> for ManyToManyExtra {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(ManyToManyExtra {
            sub_fields: IndexMap::deserialize(deserializer)?,
        })
    }
}

/// One declared sub field of a many to many extra. A nested type turns
/// the sub field's elements from references into creation payloads.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ManyToManySubField {
    pub operation: Option<Operation>,
    pub nested_type: Option<String>,
}

impl ManyToManySubField {
    /// The effective operation of the sub field named `name`.
    pub fn operation_for(&self, name: &str) -> Operation {
        self.operation.unwrap_or_else(|| Operation::infer_from_name(name))
    }
}

impl<'de> Deserialize<'de> for ManyToManySubField {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Shape {
            Shorthand(bool),
            Descriptor {
                #[serde(rename = "type", default)]
                nested_type: Option<String>,
                #[serde(default)]
                operation: Option<Operation>,
            },
        }

        match Shape::deserialize(deserializer)? {
            Shape::Shorthand(_) => Ok(ManyToManySubField::default()),
            Shape::Descriptor { nested_type, operation } => Ok(ManyToManySubField {
                operation,
                nested_type: nested_type.filter(|name| name != "ID"),
            }),
        }
    }
}

/// The client payload field name carrying a sub field of a relation's
/// extras.
pub fn payload_field_name(relation_database_name: &str, sub_field_name: &str) -> String {
    if sub_field_name == "exact" {
        relation_database_name.to_camel_case()
    } else {
        format!("{relation_database_name}_{sub_field_name}").to_camel_case()
    }
}
