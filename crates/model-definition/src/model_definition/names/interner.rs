use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub(crate) struct StringId(u32);

/// Deduplicated storage for every name in the definition.
#[derive(Default, Serialize, Deserialize, Debug, Clone)]
pub(crate) struct StringInterner {
    strings: Vec<String>,
    #[serde(with = "super::super::vectorize")]
    lookup: HashMap<String, StringId>,
}

impl StringInterner {
    pub(crate) fn intern(&mut self, value: &str) -> StringId {
        if let Some(id) = self.lookup.get(value) {
            return *id;
        }

        let id = StringId(self.strings.len() as u32);
        self.strings.push(value.to_string());
        self.lookup.insert(value.to_string(), id);

        id
    }

    pub(crate) fn lookup(&self, value: &str) -> Option<StringId> {
        self.lookup.get(value).copied()
    }

    pub(crate) fn get(&self, id: StringId) -> &str {
        &self.strings[id.0 as usize]
    }
}
