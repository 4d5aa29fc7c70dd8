//! POSM catalog entries and the per-session catalog cache.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One point-of-sale item that can be deployed for a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PosmItem {
    pub posm_code: String,
    pub posm_name: String,
}

impl PosmItem {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            posm_code: code.into(),
            posm_name: name.into(),
        }
    }
}

/// Store-scoped catalog as served by `/api/models/{store_id}`.
pub type StoreCatalog = HashMap<String, Vec<PosmItem>>;

/// Model name → ordered POSM items, filled lazily and kept for the session.
#[derive(Debug, Clone, Default)]
pub struct CatalogCache {
    entries: HashMap<String, Vec<PosmItem>>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, model: &str) -> Option<&[PosmItem]> {
        self.entries.get(model).map(Vec::as_slice)
    }

    pub fn contains(&self, model: &str) -> bool {
        self.entries.contains_key(model)
    }

    /// Caches a non-empty item list. Empty lists are not cached so a later
    /// lookup can try again.
    pub fn insert(&mut self, model: impl Into<String>, items: Vec<PosmItem>) -> bool {
        if items.is_empty() {
            return false;
        }
        self.entries.insert(model.into(), items);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_lists_are_not_cached() {
        let mut cache = CatalogCache::new();
        assert!(!cache.insert("X100", Vec::new()));
        assert!(!cache.contains("X100"));

        assert!(cache.insert("X100", vec![PosmItem::new("P1", "Wobbler")]));
        assert_eq!(cache.get("X100").map(|items| items.len()), Some(1));
    }

    #[test]
    fn test_posm_item_wire_format() {
        let item: PosmItem =
            serde_json::from_str(r#"{"posmCode": "P1", "posmName": "Shelf talker"}"#).unwrap();
        assert_eq!(item, PosmItem::new("P1", "Shelf talker"));
    }
}
