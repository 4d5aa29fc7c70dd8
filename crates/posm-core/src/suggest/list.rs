//! Suggestion list with keyboard navigation.

use serde::Serialize;

/// Keys the autocomplete inputs react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
    Other,
}

/// Result of a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome<T> {
    /// Nothing to do (empty list or unhandled key)
    Ignored,
    /// Only the highlighted row changed
    Moved { active: usize },
    /// The highlighted suggestion was committed
    Commit(T),
    /// The list was hidden without committing
    Dismissed,
}

/// Rendered suggestions plus the highlighted row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionList<T> {
    items: Vec<T>,
    active: Option<usize>,
    visible: bool,
}

impl<T> Default for SuggestionList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            active: None,
            visible: false,
        }
    }
}

impl<T: Clone> SuggestionList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the rows. The first row becomes active; an empty list hides
    /// the dropdown.
    pub fn show(&mut self, items: Vec<T>) {
        self.active = if items.is_empty() { None } else { Some(0) };
        self.visible = !items.is_empty();
        self.items = items;
    }

    /// Hides and empties the dropdown.
    pub fn hide(&mut self) {
        self.items.clear();
        self.active = None;
        self.visible = false;
    }

    /// Outside click.
    pub fn dismiss(&mut self) {
        self.hide();
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_item(&self) -> Option<&T> {
        self.active.and_then(|i| self.items.get(i))
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Arrow keys move the highlight by one within bounds; Enter commits the
    /// highlighted row; Escape hides the list.
    pub fn handle_key(&mut self, key: Key) -> KeyOutcome<T> {
        if self.items.is_empty() {
            return KeyOutcome::Ignored;
        }
        let last = self.items.len() - 1;

        match key {
            Key::ArrowDown => {
                let next = match self.active {
                    Some(i) => (i + 1).min(last),
                    None => 0,
                };
                self.active = Some(next);
                KeyOutcome::Moved { active: next }
            }
            Key::ArrowUp => {
                let next = self.active.map_or(0, |i| i.saturating_sub(1));
                self.active = Some(next);
                KeyOutcome::Moved { active: next }
            }
            Key::Enter => match self.active_item().cloned() {
                Some(item) => {
                    self.hide();
                    KeyOutcome::Commit(item)
                }
                None => KeyOutcome::Ignored,
            },
            Key::Escape => {
                self.hide();
                KeyOutcome::Dismissed
            }
            Key::Other => KeyOutcome::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list() -> SuggestionList<&'static str> {
        let mut list = SuggestionList::new();
        list.show(vec!["a", "b", "c"]);
        list
    }

    #[test]
    fn test_first_row_active_by_default() {
        let list = list();
        assert!(list.is_visible());
        assert_eq!(list.active_item(), Some(&"a"));
    }

    #[test]
    fn test_arrows_clamp_to_bounds() {
        let mut list = list();
        assert_eq!(list.handle_key(Key::ArrowUp), KeyOutcome::Moved { active: 0 });
        list.handle_key(Key::ArrowDown);
        list.handle_key(Key::ArrowDown);
        assert_eq!(list.handle_key(Key::ArrowDown), KeyOutcome::Moved { active: 2 });
        assert_eq!(list.handle_key(Key::ArrowUp), KeyOutcome::Moved { active: 1 });
        assert!(list.is_visible());
    }

    #[test]
    fn test_enter_commits_active_row() {
        let mut list = list();
        list.handle_key(Key::ArrowDown);
        assert_eq!(list.handle_key(Key::Enter), KeyOutcome::Commit("b"));
        assert!(!list.is_visible());
    }

    #[test]
    fn test_escape_hides_without_commit() {
        let mut list = list();
        assert_eq!(list.handle_key(Key::Escape), KeyOutcome::Dismissed);
        assert!(list.items().is_empty());
    }

    #[test]
    fn test_empty_list_ignores_keys() {
        let mut list: SuggestionList<&str> = SuggestionList::new();
        list.show(Vec::new());
        assert!(!list.is_visible());
        assert_eq!(list.handle_key(Key::Enter), KeyOutcome::Ignored);
        assert_eq!(list.handle_key(Key::ArrowDown), KeyOutcome::Ignored);
    }
}
