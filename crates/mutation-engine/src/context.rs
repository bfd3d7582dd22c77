use model_definition::JsonMap;
use serde_json::Value;

/// Server-side request state exposed to a mutation. Auto context fields
/// and field handlers read from it; the client payload never writes it.
#[derive(Debug, Default, Clone)]
pub struct RequestContext {
    attributes: JsonMap,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attribute(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.to_string(), value.into());
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }
}
