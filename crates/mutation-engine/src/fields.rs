use model_definition::{EntityMember, EntityWalker, RelationKind, RelationWalker};

use crate::{
    extras::{payload_field_name, ManyToManyExtra},
    registry::TypeMeta,
};

/// The structural kind of an entity member. Each kind drives different
/// write semantics in the create and update paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Assigned directly to the stored column.
    Scalar,
    /// A reference, disambiguated and stored under the relation's
    /// reference column.
    ForeignKey,
    /// A set of references, adjusted through association calls after
    /// the row exists.
    ManyToMany,
    /// Reachable only through extras and batch deletion filters.
    ReverseRelation,
}

pub fn classify(member: EntityMember<'_>) -> FieldKind {
    match member {
        EntityMember::Scalar(_) => FieldKind::Scalar,
        EntityMember::Relation(relation) => match relation.kind() {
            RelationKind::ForeignKey | RelationKind::OneToOne => FieldKind::ForeignKey,
            RelationKind::ManyToMany => FieldKind::ManyToMany,
            RelationKind::ReverseMany => FieldKind::ReverseRelation,
        },
    }
}

/// Selection and override lists applied when deriving the input fields
/// of a generated input type. Names are client field names.
#[derive(Debug, Default, Clone)]
pub struct InputFieldsOptions {
    pub only_fields: Vec<String>,
    pub exclude_fields: Vec<String>,
    pub optional_fields: Vec<String>,
    pub required_fields: Vec<String>,
    /// Strips every requiredness mark, the shape of patch input types.
    pub all_optional: bool,
}

/// One derived field of a generated input type.
#[derive(Debug, Clone, PartialEq)]
pub struct InputField {
    pub name: String,
    pub ty: String,
    pub required: bool,
}

/// Derives the input fields of a generated input type for an entity.
///
/// Scalars map to their client type, references to `ID` or to the
/// nested input type a foreign key extra declares, collections to
/// reference lists. Extra sub fields are appended after the relation
/// they belong to and are always optional, as are fields populated from
/// request context.
pub fn input_fields_for_entity(entity: EntityWalker<'_>, options: &InputFieldsOptions, meta: &TypeMeta) -> Vec<InputField> {
    let mut fields = Vec::new();

    for field in entity.fields() {
        if !included(options, field.client_name()) {
            continue;
        }

        fields.push(InputField {
            name: field.client_name().to_string(),
            ty: field.field_type().client_type().to_string(),
            required: effective_required(
                field.required_on_create(),
                field.client_name(),
                field.database_name(),
                options,
                meta,
            ),
        });
    }

    for relation in entity.relations() {
        if !included(options, relation.client_name()) {
            continue;
        }

        let extra = meta.many_to_many_extras.get(relation.database_name());

        match relation.kind() {
            RelationKind::ForeignKey | RelationKind::OneToOne => {
                let ty = meta
                    .foreign_key_extras
                    .get(relation.database_name())
                    .and_then(|extra| extra.nested_type.clone())
                    .unwrap_or_else(|| "ID".to_string());

                fields.push(InputField {
                    name: relation.client_name().to_string(),
                    ty,
                    required: effective_required(
                        !relation.nullable(),
                        relation.client_name(),
                        relation.database_name(),
                        options,
                        meta,
                    ),
                });
            }
            RelationKind::ManyToMany => {
                let element_type = extra
                    .and_then(|extra| extra.sub_fields.get("exact"))
                    .and_then(|sub| sub.nested_type.as_deref())
                    .unwrap_or("ID");

                fields.push(InputField {
                    name: relation.client_name().to_string(),
                    ty: format!("[{element_type}]"),
                    required: false,
                });
                push_extra_sub_fields(&mut fields, relation, extra);
            }
            RelationKind::ReverseMany => {
                if let Some(sub) = extra.and_then(|extra| extra.sub_fields.get("exact")) {
                    let element_type = sub.nested_type.as_deref().unwrap_or("ID");

                    fields.push(InputField {
                        name: relation.client_name().to_string(),
                        ty: format!("[{element_type}]"),
                        required: false,
                    });
                }
                push_extra_sub_fields(&mut fields, relation, extra);
            }
        }
    }

    fields
}

fn push_extra_sub_fields(fields: &mut Vec<InputField>, relation: RelationWalker<'_>, extra: Option<&ManyToManyExtra>) {
    let Some(extra) = extra else { return };

    for (sub_field_name, sub_field) in &extra.sub_fields {
        if sub_field_name == "exact" {
            continue;
        }

        let element_type = sub_field.nested_type.as_deref().unwrap_or("ID");

        fields.push(InputField {
            name: payload_field_name(relation.database_name(), sub_field_name),
            ty: format!("[{element_type}]"),
            required: false,
        });
    }
}

fn included(options: &InputFieldsOptions, client_name: &str) -> bool {
    if !options.only_fields.is_empty() && !options.only_fields.iter().any(|name| name == client_name) {
        return false;
    }

    !options.exclude_fields.iter().any(|name| name == client_name)
}

fn effective_required(
    default: bool,
    client_name: &str,
    database_name: &str,
    options: &InputFieldsOptions,
    meta: &TypeMeta,
) -> bool {
    let mut required = default;

    if options.optional_fields.iter().any(|name| name == client_name) {
        required = false;
    }

    if options.required_fields.iter().any(|name| name == client_name) {
        required = true;
    }

    // Auto context fields are populated server-side, the client may
    // always omit them.
    if meta.auto_context_fields.contains_key(database_name) {
        required = false;
    }

    if options.all_optional {
        required = false;
    }

    required
}
