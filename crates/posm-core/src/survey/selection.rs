//! Ordered model selection.

use serde::Serialize;

/// Selected model names, newest first, never duplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectedModels(Vec<String>);

impl SelectedModels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `model` at the front. Returns `false` if it was already selected.
    pub fn insert_front(&mut self, model: impl Into<String>) -> bool {
        let model = model.into();
        if self.contains(&model) {
            return false;
        }
        self.0.insert(0, model);
        true
    }

    /// Removes `model`. Returns `false` if it was not selected.
    pub fn remove(&mut self, model: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|m| m != model);
        self.0.len() != before
    }

    pub fn contains(&self, model: &str) -> bool {
        self.0.iter().any(|m| m == model)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}
