//! Model search input.

use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use posm_core::suggest::{Key, KeyOutcome, SuggestionList};
use posm_core::survey::SelectedModels;

use super::search::{Autocomplete, Fetcher, InputEffect, Settled};
use crate::api::SurveyApi;

/// Model picker. Suggestions never include models that are already
/// selected, and committing one arms the "add" action instead of adding it.
pub struct ModelSearch {
    search: Autocomplete<String>,
    armed: Option<String>,
}

impl ModelSearch {
    pub fn new(api: SurveyApi, delay: Duration, min_len: usize) -> Self {
        let fetch: Fetcher<String> = Arc::new(move |query: String| {
            let api = api.clone();
            async move { api.model_autocomplete(&query).await }.boxed()
        });
        Self::with_fetcher(fetch, delay, min_len)
    }

    pub fn with_fetcher(fetch: Fetcher<String>, delay: Duration, min_len: usize) -> Self {
        Self {
            search: Autocomplete::new(fetch, delay, min_len),
            armed: None,
        }
    }

    pub fn input(&self) -> &str {
        self.search.input()
    }

    pub fn suggestions(&self) -> &SuggestionList<String> {
        self.search.suggestions()
    }

    /// Model the "add" action would add.
    pub fn armed(&self) -> Option<&str> {
        self.armed.as_deref()
    }

    pub fn on_input(&mut self, raw: &str) -> InputEffect {
        self.armed = None;
        self.search.on_input(raw)
    }

    pub async fn settle(&mut self, selected: &SelectedModels) -> Option<Settled> {
        self.search.settle_with(|model| !selected.contains(model)).await
    }

    pub fn handle_key(&mut self, key: Key) -> Option<String> {
        match self.search.handle_key(key) {
            KeyOutcome::Commit(model) => {
                self.arm(model.clone());
                Some(model)
            }
            _ => None,
        }
    }

    pub fn pick(&mut self, index: usize) -> Option<String> {
        let model = self.search.suggestions().get(index).cloned()?;
        self.arm(model.clone());
        Some(model)
    }

    pub fn arm(&mut self, model: String) {
        self.search.set_input(model.clone());
        self.armed = Some(model);
    }

    /// Disarms and empties the input, returning the armed model.
    pub fn take_armed(&mut self) -> Option<String> {
        let model = self.armed.take()?;
        self.search.clear();
        Some(model)
    }

    pub fn dismiss(&mut self) {
        self.search.dismiss();
    }

    pub fn clear(&mut self) {
        self.search.clear();
        self.armed = None;
    }
}
