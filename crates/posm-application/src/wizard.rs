//! The two-step survey wizard.
//!
//! [`SurveyWizard`] owns the survey state and both search inputs. Front ends
//! call its operations in response to user input and render
//! [`SurveyWizard::view`] afterwards. Progress and alerts are additionally
//! pushed through an optional event channel.

use std::time::Duration;

use posm_core::session::User;
use posm_core::store::StoreRef;
use posm_core::suggest::Key;
use posm_core::survey::{
    CheckboxTarget, ImageAttachment, Quantity, Step, SurveyState, SurveyView, TreeState,
};
use posm_core::{Result, SurveyError, ValidationError};
use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;

use crate::api::{SubmitReceipt, SurveyApi};
use crate::autocomplete::{InputEffect, ModelSearch, Settled, ShopSearch};
use crate::catalog::resolve_catalog;
use crate::submission::{SubmissionProgress, submit_survey};

/// Search tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WizardSettings {
    pub debounce: Duration,
    pub min_store_query_len: usize,
    pub min_model_query_len: usize,
}

impl Default for WizardSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            min_store_query_len: 2,
            min_model_query_len: 1,
        }
    }
}

/// Notifications for the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardEvent {
    StepChanged(Step),
    Progress(SubmissionProgress),
    /// A message the surveyor must acknowledge
    Alert(String),
    Submitted { message: Option<String> },
}

/// Search dropdown state for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchView {
    pub input: String,
    pub suggestions: Vec<String>,
    pub active: Option<usize>,
    pub visible: bool,
}

/// Everything a front end renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardView {
    pub survey: SurveyView,
    pub shop_search: SearchView,
    pub model_search: SearchView,
    /// Whether the "add model" action is enabled
    pub can_add_model: bool,
}

pub struct SurveyWizard {
    api: SurveyApi,
    user: User,
    state: SurveyState,
    shop: ShopSearch,
    models: ModelSearch,
    events: Option<UnboundedSender<WizardEvent>>,
}

impl SurveyWizard {
    /// Starts a wizard for a user who already passed the session guard.
    pub fn new(api: SurveyApi, user: User, settings: WizardSettings) -> Self {
        let shop = ShopSearch::new(api.clone(), settings.debounce, settings.min_store_query_len);
        let models = ModelSearch::new(api.clone(), settings.debounce, settings.min_model_query_len);
        Self {
            api,
            user,
            state: SurveyState::new(),
            shop,
            models,
            events: None,
        }
    }

    pub fn with_events(mut self, events: UnboundedSender<WizardEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn state(&self) -> &SurveyState {
        &self.state
    }

    pub fn step(&self) -> Step {
        self.state.step()
    }

    pub fn view(&self) -> WizardView {
        let shop = self.shop.suggestions();
        let models = self.models.suggestions();
        WizardView {
            survey: self.state.view(),
            shop_search: SearchView {
                input: self.shop.input().to_string(),
                suggestions: shop.items().iter().map(StoreRef::label).collect(),
                active: shop.active_index(),
                visible: shop.is_visible(),
            },
            model_search: SearchView {
                input: self.models.input().to_string(),
                suggestions: models.items().to_vec(),
                active: models.active_index(),
                visible: models.is_visible(),
            },
            can_add_model: self.models.armed().is_some(),
        }
    }

    // ============================================================================
    // Step 1: store
    // ============================================================================

    /// An edit of the store input; releases any locked store.
    pub fn on_store_input(&mut self, raw: &str) -> InputEffect {
        self.state.unlock_store();
        self.shop.on_input(raw)
    }

    /// Waits for the pending store search, if any.
    pub async fn settle_store_search(&mut self) -> Result<Option<Settled>> {
        let settled = self.shop.settle().await;
        Self::escalate(settled)
    }

    pub fn store_suggestions(&self) -> &[StoreRef] {
        self.shop.suggestions().items()
    }

    pub fn store_key(&mut self, key: Key) -> Option<StoreRef> {
        let store = self.shop.handle_key(key)?;
        self.state.lock_store(store.clone());
        Some(store)
    }

    pub fn pick_store(&mut self, index: usize) -> Option<StoreRef> {
        let store = self.shop.pick(index)?;
        self.state.lock_store(store.clone());
        Some(store)
    }

    pub fn select_store(&mut self, store: StoreRef) {
        self.shop.select(store.clone());
        self.state.lock_store(store);
    }

    pub fn dismiss_store_suggestions(&mut self) {
        self.shop.dismiss();
    }

    /// Moves to model selection. Model state is reset only on first entry,
    /// so coming back from step 1 keeps earlier work.
    pub fn go_to_models(&mut self) -> Result<()> {
        if self.state.store().is_none() {
            return Err(ValidationError::NoStoreSelected.into());
        }
        if self.state.models().is_empty() {
            self.state.reset_models();
        }
        self.set_step(Step::SelectModels);
        Ok(())
    }

    pub fn back_to_store(&mut self) {
        self.set_step(Step::SelectStore);
    }

    // ============================================================================
    // Step 2: models
    // ============================================================================

    pub fn on_model_input(&mut self, raw: &str) -> InputEffect {
        self.models.on_input(raw)
    }

    /// Waits for the pending model search, if any. Selected models are
    /// filtered out of the suggestions.
    pub async fn settle_model_search(&mut self) -> Result<Option<Settled>> {
        let settled = self.models.settle(self.state.models()).await;
        Self::escalate(settled)
    }

    pub fn model_key(&mut self, key: Key) -> Option<String> {
        self.models.handle_key(key)
    }

    pub fn pick_model(&mut self, index: usize) -> Option<String> {
        self.models.pick(index)
    }

    pub fn dismiss_model_suggestions(&mut self) {
        self.models.dismiss();
    }

    /// Adds the armed model. Does nothing when no model is armed.
    pub async fn add_armed_model(&mut self) -> Result<Option<String>> {
        let Some(model) = self.models.take_armed() else {
            return Ok(None);
        };
        self.add_model(&model).await?;
        Ok(Some(model))
    }

    /// Adds `model` at the top of the list and resolves its catalog.
    ///
    /// Returns `false` for a model that is already selected. If no POSM can
    /// be found, or the lookup fails, the model is removed again.
    pub async fn add_model(&mut self, model: &str) -> Result<bool> {
        let model = model.trim();
        if model.is_empty() {
            return Ok(false);
        }
        let Some(store_id) = self.state.store().map(|s| s.store_id.clone()) else {
            return Err(self.alert(ValidationError::NoStoreSelected.into()));
        };
        if !self.state.add_model(model) {
            tracing::debug!(model = %model, "model already selected");
            return Ok(false);
        }

        match resolve_catalog(&self.api, self.state.catalog_mut(), &store_id, model).await {
            Ok(items) => {
                tracing::info!(model = %model, items = items.len(), "model added");
                Ok(true)
            }
            Err(err) => {
                self.state.remove_model(model);
                tracing::warn!(model = %model, "model rolled back: {err}");
                Err(self.alert(err))
            }
        }
    }

    pub fn remove_model(&mut self, model: &str) -> bool {
        self.state.remove_model(model)
    }

    pub fn set_checkbox(
        &mut self,
        model: &str,
        target: CheckboxTarget,
        checked: bool,
    ) -> Result<TreeState> {
        self.state.set_checkbox(model, target, checked)
    }

    pub fn set_quantity_input(&mut self, model: &str, input: &str) -> Result<Quantity> {
        self.state.set_quantity_input(model, input)
    }

    pub fn attach_image(&mut self, model: &str, image: ImageAttachment) -> Result<()> {
        self.state.attach_image(model, image)
    }

    pub fn delete_image(&mut self, model: &str) -> bool {
        self.state.delete_image(model)
    }

    // ============================================================================
    // Submission and lifecycle
    // ============================================================================

    /// Validates, uploads every photo and submits the survey.
    pub async fn submit(&mut self) -> Result<SubmitReceipt> {
        let leader = self.user.leader.clone();
        let events = self.events.clone();
        let result = submit_survey(&self.api, &mut self.state, leader.as_deref(), |progress| {
            if let Some(events) = &events {
                let _ = events.send(WizardEvent::Progress(progress));
            }
        })
        .await;

        match result {
            Ok(receipt) => {
                self.emit(WizardEvent::Submitted {
                    message: receipt.message.clone(),
                });
                self.emit(WizardEvent::StepChanged(Step::Done));
                Ok(receipt)
            }
            Err(err) => Err(self.alert(err)),
        }
    }

    /// Discards everything and returns to store selection.
    pub fn start_new_survey(&mut self) {
        self.state.reset();
        self.shop.clear();
        self.models.clear();
        self.emit(WizardEvent::StepChanged(Step::SelectStore));
    }

    fn set_step(&mut self, step: Step) {
        if self.state.step() != step {
            self.state.set_step(step);
            self.emit(WizardEvent::StepChanged(step));
        }
    }

    fn emit(&self, event: WizardEvent) {
        if let Some(events) = &self.events {
            let _ = events.send(event);
        }
    }

    fn alert(&self, err: SurveyError) -> SurveyError {
        if !err.is_unauthenticated() {
            self.emit(WizardEvent::Alert(err.to_string()));
        }
        err
    }

    /// Search failures stay local except a lost session.
    fn escalate(settled: Option<Settled>) -> Result<Option<Settled>> {
        match settled {
            Some(Settled::Failed(err)) if err.is_unauthenticated() => Err(err),
            other => Ok(other),
        }
    }
}
