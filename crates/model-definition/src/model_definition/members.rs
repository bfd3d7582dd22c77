use serde::{Deserialize, Serialize};

use super::{EntityId, FieldId, RelationId};

/// Index from an entity to its members, kept sorted by entity id after
/// [`finalize`](super::ModelDefinition::finalize) so a member span can be
/// found with a binary search.
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub(super) struct Members {
    /// Ordered by entity id.
    pub(super) fields: Vec<(EntityId, FieldId)>,
    /// Ordered by entity id.
    pub(super) relations: Vec<(EntityId, RelationId)>,
}

impl Members {
    pub(super) fn push_field(&mut self, entity_id: EntityId, id: FieldId) {
        self.fields.push((entity_id, id));
    }

    pub(super) fn push_relation(&mut self, entity_id: EntityId, id: RelationId) {
        self.relations.push((entity_id, id));
    }
}
