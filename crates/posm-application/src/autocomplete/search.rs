//! Debounced search input backed by a remote query.

use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use posm_core::suggest::{Key, KeyOutcome, SuggestionList};
use posm_core::{Result, SurveyError};
use tokio::sync::mpsc;

use super::debounce::Debouncer;
use super::sequencer::QuerySequencer;

/// Remote lookup for one query string.
pub type Fetcher<T> = Arc<dyn Fn(String) -> BoxFuture<'static, Result<Vec<T>>> + Send + Sync>;

/// A completed query waiting to be applied.
#[derive(Debug)]
pub struct SearchOutcome<T> {
    pub ticket: u64,
    pub query: String,
    pub result: Result<Vec<T>>,
}

/// What an edit of the input did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEffect {
    /// Too short to search; suggestions hidden
    Cleared,
    /// A query for the trimmed text will be sent after the quiet period
    Scheduled { query: String },
}

/// What applying a completed query did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settled {
    /// Suggestions replaced; the count may be zero
    Shown(usize),
    /// A newer query was issued since; the response was dropped
    Stale,
    /// The lookup failed; suggestions are unchanged
    Failed(SurveyError),
}

/// Input text, dropdown and in-flight bookkeeping of one search box.
///
/// Responses come back through a channel and are applied by the owner via
/// [`Autocomplete::settle`], so all state stays on one task. Every edit
/// supersedes responses to earlier queries.
pub struct Autocomplete<T> {
    fetch: Fetcher<T>,
    debouncer: Debouncer,
    sequencer: QuerySequencer,
    min_len: usize,
    input: String,
    suggestions: SuggestionList<T>,
    awaiting: bool,
    results_tx: mpsc::UnboundedSender<SearchOutcome<T>>,
    results_rx: mpsc::UnboundedReceiver<SearchOutcome<T>>,
}

impl<T> Autocomplete<T>
where
    T: Clone + Send + 'static,
{
    pub fn new(fetch: Fetcher<T>, delay: Duration, min_len: usize) -> Self {
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        Self {
            fetch,
            debouncer: Debouncer::new(delay),
            sequencer: QuerySequencer::new(),
            min_len,
            input: String::new(),
            suggestions: SuggestionList::new(),
            awaiting: false,
            results_tx,
            results_rx,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn suggestions(&self) -> &SuggestionList<T> {
        &self.suggestions
    }

    /// Records an edit and schedules a query for the trimmed text.
    pub fn on_input(&mut self, raw: &str) -> InputEffect {
        self.input = raw.to_string();
        let query = raw.trim().to_string();

        if query.chars().count() < self.min_len {
            self.sequencer.invalidate();
            self.debouncer.cancel();
            self.awaiting = false;
            self.suggestions.hide();
            return InputEffect::Cleared;
        }

        // Issued before scheduling so a timer that already fired for an
        // earlier edit can only produce a stale response
        let ticket = self.sequencer.issue();
        self.awaiting = true;
        let fetch = self.fetch.clone();
        let tx = self.results_tx.clone();
        let sent = query.clone();
        self.debouncer.schedule(async move {
            tracing::debug!(query = %sent, ticket, "dispatching search");
            let result = fetch(sent.clone()).await;
            // The receiver only goes away together with the owner
            let _ = tx.send(SearchOutcome {
                ticket,
                query: sent,
                result,
            });
        });
        InputEffect::Scheduled { query }
    }

    /// Replaces the input text without searching, e.g. after a commit.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.debouncer.cancel();
        self.sequencer.invalidate();
        self.awaiting = false;
        self.input = text.into();
        self.suggestions.hide();
    }

    /// Clears the input and any pending or in-flight query.
    pub fn clear(&mut self) {
        self.set_input(String::new());
    }

    /// Whether a scheduled query has not been applied yet.
    pub fn is_awaiting(&self) -> bool {
        self.awaiting
    }

    /// Waits for the response to the latest query and applies it, keeping
    /// only the rows `keep` accepts. Stale responses arriving first are
    /// dropped. Returns `None` when nothing is scheduled.
    pub async fn settle_with(&mut self, keep: impl Fn(&T) -> bool) -> Option<Settled> {
        while self.awaiting {
            let outcome = self.results_rx.recv().await?;
            match self.apply(outcome, &keep) {
                Settled::Stale => continue,
                settled => return Some(settled),
            }
        }
        None
    }

    pub async fn settle(&mut self) -> Option<Settled> {
        self.settle_with(|_| true).await
    }

    /// Applies every query that has already completed, without waiting.
    pub fn drain_with(&mut self, keep: impl Fn(&T) -> bool) -> Vec<Settled> {
        let mut settled = Vec::new();
        while let Ok(outcome) = self.results_rx.try_recv() {
            settled.push(self.apply(outcome, &keep));
        }
        settled
    }

    fn apply(&mut self, outcome: SearchOutcome<T>, keep: impl Fn(&T) -> bool) -> Settled {
        if !self.sequencer.is_latest(outcome.ticket) {
            tracing::debug!(query = %outcome.query, "dropping stale search response");
            return Settled::Stale;
        }
        self.awaiting = false;
        match outcome.result {
            Ok(items) => {
                let items: Vec<T> = items.into_iter().filter(|item| keep(item)).collect();
                let count = items.len();
                self.suggestions.show(items);
                Settled::Shown(count)
            }
            Err(err) => {
                tracing::warn!(query = %outcome.query, "search failed: {err}");
                Settled::Failed(err)
            }
        }
    }

    pub fn handle_key(&mut self, key: Key) -> KeyOutcome<T> {
        self.suggestions.handle_key(key)
    }

    /// Outside click.
    pub fn dismiss(&mut self) {
        self.suggestions.dismiss();
    }
}
