//! Per-model POSM checkbox tree.
//!
//! Each model renders one "all" checkbox and one checkbox per catalog item.
//! State is keyed by the derived element id so any front end that re-creates
//! its widgets can look values up again by id.
//!
//! Invariant per model: while "all" is checked, every individual checkbox is
//! unchecked (and hidden by the view).

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::error::{Result, SurveyError};

/// Maps every character outside `[A-Za-z0-9]` to `_`.
pub fn sanitize_id(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Which checkbox of a model's tree is addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckboxTarget {
    All,
    /// Index into the model's catalog
    Item(usize),
}

impl CheckboxTarget {
    pub fn element_id(&self, model: &str) -> String {
        match self {
            Self::All => format!("all-{}", sanitize_id(model)),
            Self::Item(index) => format!("posm-{}-{}", sanitize_id(model), index),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TreeState {
    AllSelected,
    PartialOrNone,
}

/// `(model, element id) → checked`.
#[derive(Debug, Clone, Default)]
pub struct CheckboxStates {
    states: HashMap<String, BTreeMap<String, bool>>,
}

impl CheckboxStates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_checked(&self, model: &str, target: CheckboxTarget) -> bool {
        self.states
            .get(model)
            .and_then(|ids| ids.get(&target.element_id(model)))
            .copied()
            .unwrap_or(false)
    }

    pub fn tree_state(&self, model: &str) -> TreeState {
        if self.is_checked(model, CheckboxTarget::All) {
            TreeState::AllSelected
        } else {
            TreeState::PartialOrNone
        }
    }

    /// Applies one checkbox mutation for a model with `item_count` catalog items.
    ///
    /// - checking "all" force-unchecks every item
    /// - unchecking "all" leaves the items as they were
    /// - checking an item while "all" is checked unchecks "all"
    pub fn set(
        &mut self,
        model: &str,
        item_count: usize,
        target: CheckboxTarget,
        checked: bool,
    ) -> Result<TreeState> {
        if let CheckboxTarget::Item(index) = target
            && index >= item_count
        {
            return Err(SurveyError::not_found(
                "posm checkbox",
                target.element_id(model),
            ));
        }

        self.record(model, target, checked);

        match target {
            CheckboxTarget::All if checked => {
                for index in 0..item_count {
                    self.record(model, CheckboxTarget::Item(index), false);
                }
            }
            CheckboxTarget::All => {}
            CheckboxTarget::Item(_) => {
                if checked && self.is_checked(model, CheckboxTarget::All) {
                    self.record(model, CheckboxTarget::All, false);
                }
            }
        }

        tracing::debug!(
            model = %model,
            element_id = %target.element_id(model),
            checked,
            "checkbox updated"
        );

        Ok(self.tree_state(model))
    }

    /// Indices of checked items, in catalog order.
    pub fn checked_items(&self, model: &str, item_count: usize) -> Vec<usize> {
        (0..item_count)
            .filter(|index| self.is_checked(model, CheckboxTarget::Item(*index)))
            .collect()
    }

    /// True if "all" or at least one item is checked.
    pub fn has_selection(&self, model: &str, item_count: usize) -> bool {
        self.tree_state(model) == TreeState::AllSelected
            || !self.checked_items(model, item_count).is_empty()
    }

    /// Raw stored states of one model, keyed by element id.
    pub fn snapshot(&self, model: &str) -> BTreeMap<String, bool> {
        self.states.get(model).cloned().unwrap_or_default()
    }

    pub fn remove_model(&mut self, model: &str) {
        self.states.remove(model);
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }

    fn record(&mut self, model: &str, target: CheckboxTarget, checked: bool) {
        self.states
            .entry(model.to_string())
            .or_default()
            .insert(target.element_id(model), checked);
    }
}
