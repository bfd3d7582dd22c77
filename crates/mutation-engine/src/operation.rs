use serde::Deserialize;

/// The direction of a collection relation adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Remove,
}

impl Operation {
    /// Infers the intent of an extra sub field from its name: names
    /// carrying a removal verb imply removal, everything else addition.
    /// An explicit operation on the sub field always takes precedence
    /// over the inferred one.
    pub fn infer_from_name(name: &str) -> Operation {
        let name = name.to_lowercase();

        if name.contains("remove") || name.contains("delete") {
            Operation::Remove
        } else {
            Operation::Add
        }
    }
}
