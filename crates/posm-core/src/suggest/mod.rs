//! Autocomplete suggestion lists.
//!
//! - `list`: active-row tracking and keyboard handling
//! - `placement`: dropdown geometry relative to the anchor input

mod list;
mod placement;

pub use list::{Key, KeyOutcome, SuggestionList};
pub use placement::{place_dropdown, scroll_adjustment, Placement, Rect, Viewport, DROPDOWN_MAX_HEIGHT};
