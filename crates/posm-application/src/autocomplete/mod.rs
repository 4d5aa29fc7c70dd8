//! Debounced autocomplete for the store and model inputs.

mod debounce;
mod model;
mod search;
mod sequencer;
mod shop;

pub use debounce::Debouncer;
pub use model::ModelSearch;
pub use search::{Autocomplete, Fetcher, InputEffect, SearchOutcome, Settled};
pub use sequencer::QuerySequencer;
pub use shop::ShopSearch;
