//! Retail store reference.

use serde::{Deserialize, Serialize};

/// A store as returned by the store search endpoint.
///
/// Extra fields in the search payload are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoreRef {
    pub store_id: String,
    pub store_name: String,
}

impl StoreRef {
    pub fn new(store_id: impl Into<String>, store_name: impl Into<String>) -> Self {
        Self {
            store_id: store_id.into(),
            store_name: store_name.into(),
        }
    }

    /// Label written into the search input and the summary panel.
    pub fn label(&self) -> String {
        format!("{} ({})", self.store_name, self.store_id)
    }
}
