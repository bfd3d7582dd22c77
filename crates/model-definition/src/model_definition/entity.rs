use inflector::Inflector;
use serde::{Deserialize, Serialize};

use super::names::StringId;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Entity<T> {
    pub(super) database_name: T,
    pub(super) client_name: T,
}

impl<T> Copy for Entity<T> where T: Copy {}

impl Entity<String> {
    pub fn new(name: String) -> Self {
        let client_name = name.to_pascal_case();

        Self {
            database_name: name,
            client_name,
        }
    }

    /// Overrides the derived client type name.
    pub fn with_client_name(mut self, client_name: String) -> Self {
        self.client_name = client_name;
        self
    }

    pub(crate) fn database_name(&self) -> &str {
        &self.database_name
    }

    pub(crate) fn client_name(&self) -> &str {
        &self.client_name
    }
}

impl Entity<StringId> {
    pub(crate) fn database_name(&self) -> StringId {
        self.database_name
    }

    pub(crate) fn client_name(&self) -> StringId {
        self.client_name
    }
}
