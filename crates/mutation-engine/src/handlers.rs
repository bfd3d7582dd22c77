use std::collections::HashMap;

use serde_json::Value;

use crate::{context::RequestContext, error::MutationResult};

/// A per field transformation hook, called with the raw payload value,
/// the client field name and the request context.
///
/// When the returned value differs from the input, it is stored as is
/// and the default reference handling for the field is skipped.
pub type FieldHandler = Box<dyn Fn(&Value, &str, &RequestContext) -> MutationResult<Value> + Send + Sync>;

/// The field handlers of one mutation definition, keyed by client field
/// name. Registered at definition time and consulted for every payload
/// field at every nesting level, including batch deletion filters.
#[derive(Default)]
pub struct FieldHandlers {
    handlers: HashMap<String, FieldHandler>,
}

impl FieldHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(
        mut self,
        field_name: &str,
        handler: impl Fn(&Value, &str, &RequestContext) -> MutationResult<Value> + Send + Sync + 'static,
    ) -> Self {
        self.handlers.insert(field_name.to_string(), Box::new(handler));
        self
    }

    pub fn get(&self, field_name: &str) -> Option<&FieldHandler> {
        self.handlers.get(field_name)
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
