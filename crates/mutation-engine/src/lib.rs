//! Execution of generated create, update, patch and delete mutations
//! against a relational model.
//!
//! The engine maps a nested client payload onto scalar columns, reference
//! columns and association sets, creating related entities recursively
//! where the registered input type metadata declares a nested form. It
//! writes through the narrow [`EntityStore`](model_definition::EntityStore)
//! interface and keeps no state of its own between calls.

mod context;
mod engine;
mod error;
mod extras;
mod fields;
mod handlers;
mod operation;
mod reference;
mod registry;

pub use context::RequestContext;
pub use engine::{BatchDeletePayload, DeletePayload, MutationEngine};
pub use error::{MutationError, MutationResult};
pub use extras::{payload_field_name, ForeignKeyExtra, ManyToManyExtra, ManyToManySubField};
pub use fields::{classify, input_fields_for_entity, FieldKind, InputField, InputFieldsOptions};
pub use handlers::{FieldHandler, FieldHandlers};
pub use operation::Operation;
pub use reference::{decode_global_id, disambiguate_id, disambiguate_ids, encode_global_id};
pub use registry::{
    batch_delete_input_name, create_input_name, patch_input_name, update_input_name, TypeMeta, TypeMetaRegistry,
};
