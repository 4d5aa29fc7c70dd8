//! Store search input.

use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use posm_core::store::StoreRef;
use posm_core::suggest::{Key, KeyOutcome, SuggestionList};

use super::search::{Autocomplete, Fetcher, InputEffect, Settled};
use crate::api::SurveyApi;

/// Store picker: debounced search plus the locked-in store.
///
/// Committing a suggestion locks the store and writes its label into the
/// input. Any later edit releases the lock.
pub struct ShopSearch {
    search: Autocomplete<StoreRef>,
    selected: Option<StoreRef>,
}

impl ShopSearch {
    pub fn new(api: SurveyApi, delay: Duration, min_len: usize) -> Self {
        let fetch: Fetcher<StoreRef> = Arc::new(move |query: String| {
            let api = api.clone();
            async move { api.search_stores(&query).await }.boxed()
        });
        Self::with_fetcher(fetch, delay, min_len)
    }

    pub fn with_fetcher(fetch: Fetcher<StoreRef>, delay: Duration, min_len: usize) -> Self {
        Self {
            search: Autocomplete::new(fetch, delay, min_len),
            selected: None,
        }
    }

    pub fn input(&self) -> &str {
        self.search.input()
    }

    pub fn suggestions(&self) -> &SuggestionList<StoreRef> {
        self.search.suggestions()
    }

    pub fn selected(&self) -> Option<&StoreRef> {
        self.selected.as_ref()
    }

    pub fn on_input(&mut self, raw: &str) -> InputEffect {
        if let Some(store) = self.selected.take() {
            tracing::debug!(store_id = %store.store_id, "store input edited, lock released");
        }
        self.search.on_input(raw)
    }

    pub async fn settle(&mut self) -> Option<Settled> {
        self.search.settle().await
    }

    /// Returns the store when the key committed one.
    pub fn handle_key(&mut self, key: Key) -> Option<StoreRef> {
        match self.search.handle_key(key) {
            KeyOutcome::Commit(store) => {
                self.select(store.clone());
                Some(store)
            }
            _ => None,
        }
    }

    /// Commits the suggestion at `index` (mouse click).
    pub fn pick(&mut self, index: usize) -> Option<StoreRef> {
        let store = self.search.suggestions().get(index).cloned()?;
        self.select(store.clone());
        Some(store)
    }

    pub fn select(&mut self, store: StoreRef) {
        self.search.set_input(store.label());
        tracing::info!(store_id = %store.store_id, "store selected");
        self.selected = Some(store);
    }

    pub fn dismiss(&mut self) {
        self.search.dismiss();
    }

    /// Empties the input and releases the lock.
    pub fn clear(&mut self) {
        self.search.clear();
        self.selected = None;
    }
}
