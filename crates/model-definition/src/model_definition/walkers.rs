mod entity;
mod field;
mod relation;

pub use entity::{EntityMember, EntityWalker};
pub use field::FieldWalker;
pub use relation::RelationWalker;

use std::ops::Range;

use super::{names::StringId, ModelDefinition};

/// An abstraction to iterate over a finalized model definition.
///
/// The `Id` must be something that points to an object in the definition.
#[derive(Clone, Copy)]
pub struct Walker<'a, Id> {
    pub(super) id: Id,
    pub(super) model_definition: &'a ModelDefinition,
}

impl<'a, Id> PartialEq for Walker<'a, Id>
where
    Id: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<'a, Id> Walker<'a, Id>
where
    Id: Copy,
{
    pub fn new(id: Id, model_definition: &'a ModelDefinition) -> Self {
        Self { id, model_definition }
    }

    pub fn id(self) -> Id {
        self.id
    }

    fn walk<OtherId>(self, id: OtherId) -> Walker<'a, OtherId> {
        self.model_definition.walk(id)
    }

    fn get_name(self, id: StringId) -> &'a str {
        self.model_definition.names.get_name(id)
    }
}

/// For a slice sorted by a key, the contiguous range of items matching the key.
fn range_for_key<I, K>(slice: &[I], key: K, extract: fn(&I) -> K) -> Range<usize>
where
    K: Copy + Ord,
{
    let start = slice.partition_point(|item| extract(item) < key);
    let end = start + slice[start..].partition_point(|item| extract(item) <= key);

    start..end
}
