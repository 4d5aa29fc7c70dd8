//! The survey aggregate.
//!
//! All per-attempt state lives in one `SurveyState`. Front ends never keep
//! their own copy; they mutate through these methods and re-derive the view
//! with [`SurveyState::view`], so re-rendering cannot lose anything.

use serde::Serialize;

use super::checkbox::{CheckboxStates, CheckboxTarget, TreeState};
use super::image::{ImageAttachment, ModelImages};
use super::payload::{PosmSelection, SurveyResponse, SurveySubmission};
use super::quantity::{Quantities, Quantity};
use super::selection::SelectedModels;
use crate::catalog::{CatalogCache, PosmItem};
use crate::error::{Result, SurveyError, ValidationError};
use crate::store::StoreRef;

/// Wizard steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    #[default]
    SelectStore,
    SelectModels,
    Done,
}

#[derive(Debug, Clone, Default)]
pub struct SurveyState {
    pub(super) step: Step,
    pub(super) store: Option<StoreRef>,
    pub(super) models: SelectedModels,
    pub(super) checkboxes: CheckboxStates,
    pub(super) quantities: Quantities,
    pub(super) images: ModelImages,
    pub(super) catalog: CatalogCache,
}

impl SurveyState {
    pub fn new() -> Self {
        Self::default()
    }

    // ============================================================================
    // Step and store
    // ============================================================================

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn set_step(&mut self, step: Step) {
        self.step = step;
    }

    pub fn store(&self) -> Option<&StoreRef> {
        self.store.as_ref()
    }

    pub fn lock_store(&mut self, store: StoreRef) {
        self.store = Some(store);
    }

    pub fn unlock_store(&mut self) {
        self.store = None;
    }

    // ============================================================================
    // Models and catalog
    // ============================================================================

    pub fn models(&self) -> &SelectedModels {
        &self.models
    }

    pub fn is_selected(&self, model: &str) -> bool {
        self.models.contains(model)
    }

    pub fn catalog(&self) -> &CatalogCache {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut CatalogCache {
        &mut self.catalog
    }

    /// Catalog items of `model`, empty until its catalog has been resolved.
    pub fn items(&self, model: &str) -> &[PosmItem] {
        self.catalog.get(model).unwrap_or(&[])
    }

    /// Puts `model` at the top of the selection. Returns `false` for duplicates.
    pub fn add_model(&mut self, model: impl Into<String>) -> bool {
        self.models.insert_front(model)
    }

    /// Drops `model` together with its checkbox, quantity and image state.
    /// The catalog entry stays cached.
    pub fn remove_model(&mut self, model: &str) -> bool {
        let removed = self.models.remove(model);
        self.checkboxes.remove_model(model);
        self.quantities.remove(model);
        self.images.remove(model);
        if removed {
            tracing::debug!(model = %model, "removed model and cleaned up state");
        }
        removed
    }

    // ============================================================================
    // Per-model state
    // ============================================================================

    pub fn checkboxes(&self) -> &CheckboxStates {
        &self.checkboxes
    }

    pub fn set_checkbox(
        &mut self,
        model: &str,
        target: CheckboxTarget,
        checked: bool,
    ) -> Result<TreeState> {
        self.ensure_selected(model)?;
        let item_count = self.items(model).len();
        self.checkboxes.set(model, item_count, target, checked)
    }

    pub fn quantity(&self, model: &str) -> Quantity {
        self.quantities.get(model)
    }

    pub fn set_quantity(&mut self, model: &str, quantity: Quantity) -> Result<()> {
        self.ensure_selected(model)?;
        self.quantities.set(model, quantity);
        Ok(())
    }

    /// Applies raw text from a quantity field.
    pub fn set_quantity_input(&mut self, model: &str, input: &str) -> Result<Quantity> {
        let quantity = Quantity::parse_lenient(input);
        self.set_quantity(model, quantity)?;
        Ok(quantity)
    }

    pub fn images(&self) -> &ModelImages {
        &self.images
    }

    /// Attaches a photo, fully replacing any earlier one for the model.
    pub fn attach_image(&mut self, model: &str, image: ImageAttachment) -> Result<()> {
        self.ensure_selected(model)?;
        tracing::debug!(
            model = %model,
            file_name = %image.file_name,
            source = ?image.source,
            "image attached"
        );
        self.images.attach(model, image);
        Ok(())
    }

    pub fn delete_image(&mut self, model: &str) -> bool {
        self.images.remove(model).is_some()
    }

    pub fn clear_images(&mut self) {
        self.images.clear();
    }

    // ============================================================================
    // Submission
    // ============================================================================

    /// Builds one response per model that has a selection, in display order.
    /// Image URLs are left empty until the uploads have run.
    pub fn collect_responses(&self) -> Vec<SurveyResponse> {
        self.models
            .iter()
            .filter_map(|model| self.response_for(model))
            .collect()
    }

    fn response_for(&self, model: &str) -> Option<SurveyResponse> {
        let items = self.items(model);
        let all_selected = self.checkboxes.tree_state(model) == TreeState::AllSelected;

        let posm_selections: Vec<PosmSelection> = if all_selected {
            items.iter().map(PosmSelection::from).collect()
        } else {
            self.checkboxes
                .checked_items(model, items.len())
                .into_iter()
                .map(|index| PosmSelection::from(&items[index]))
                .collect()
        };

        if !all_selected && posm_selections.is_empty() {
            return None;
        }

        Some(SurveyResponse {
            model: model.to_string(),
            quantity: self.quantities.get(model).get(),
            posm_selections,
            all_selected,
            images: Vec::new(),
        })
    }

    /// Checks submission preconditions in order: store, at least one model,
    /// a POSM selection per model, an image per model.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if self.store.is_none() {
            return Err(ValidationError::NoStoreSelected);
        }
        if self.models.is_empty() {
            return Err(ValidationError::NoModels);
        }

        let responses = self.collect_responses();
        if responses.len() < self.models.len() {
            let answered: Vec<&str> = responses.iter().map(|r| r.model.as_str()).collect();
            let models = self
                .models
                .iter()
                .filter(|model| !answered.contains(model))
                .map(str::to_string)
                .collect();
            return Err(ValidationError::MissingPosm { models });
        }

        let missing_images: Vec<String> = self
            .models
            .iter()
            .filter(|model| !self.images.has(model))
            .map(str::to_string)
            .collect();
        if !missing_images.is_empty() {
            return Err(ValidationError::MissingImages {
                models: missing_images,
            });
        }

        Ok(())
    }

    /// Assembles the submission body from already stamped responses.
    pub fn submission(
        &self,
        leader: Option<&str>,
        responses: Vec<SurveyResponse>,
    ) -> Result<SurveySubmission> {
        let store = self
            .store
            .as_ref()
            .ok_or(ValidationError::NoStoreSelected)?;
        Ok(SurveySubmission {
            leader: leader
                .filter(|l| !l.is_empty())
                .unwrap_or(super::payload::DEFAULT_LEADER)
                .to_string(),
            shop_name: store.store_name.clone(),
            store_id: store.store_id.clone(),
            responses,
        })
    }

    // ============================================================================
    // Lifecycle
    // ============================================================================

    /// Clears model-scoped state while keeping the store and catalog.
    pub fn reset_models(&mut self) {
        self.models.clear();
        self.checkboxes.clear();
        self.quantities.clear();
        self.images.clear();
    }

    /// Returns to an empty survey at the first step.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn ensure_selected(&self, model: &str) -> Result<()> {
        if self.models.contains(model) {
            Ok(())
        } else {
            Err(SurveyError::not_found("selected model", model))
        }
    }
}
