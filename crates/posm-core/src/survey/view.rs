//! Declarative view of the survey.
//!
//! The view is a pure function of [`SurveyState`]. A front end renders it
//! wholesale after every mutation instead of patching widgets in place.

use serde::Serialize;

use super::checkbox::{sanitize_id, CheckboxTarget, TreeState};
use super::image::CaptureSource;
use super::state::{Step, SurveyState};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyView {
    pub step: Step,
    /// `"{store_name} ({store_id})"` once a store is locked
    pub store_label: Option<String>,
    /// Whether the "next" action out of store selection is enabled
    pub can_proceed: bool,
    /// Newest first
    pub models: Vec<ModelCard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelCard {
    pub model: String,
    pub quantity_input_id: String,
    pub quantity: u16,
    pub tree_state: TreeState,
    pub all: CheckboxView,
    pub items: Vec<PosmRow>,
    pub image: ImageWidget,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckboxView {
    pub element_id: String,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PosmRow {
    pub checkbox: CheckboxView,
    pub posm_code: String,
    pub posm_name: String,
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageWidget {
    pub camera_input_id: String,
    pub gallery_input_id: String,
    /// Both inputs are disabled while a photo is attached
    pub inputs_enabled: bool,
    pub preview: Option<ImagePreview>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePreview {
    pub file_name: String,
    pub size_bytes: usize,
    pub source: CaptureSource,
}

impl SurveyState {
    pub fn view(&self) -> SurveyView {
        SurveyView {
            step: self.step,
            store_label: self.store.as_ref().map(|s| s.label()),
            can_proceed: self.store.is_some(),
            models: self.models.iter().map(|m| self.model_card(m)).collect(),
        }
    }

    fn model_card(&self, model: &str) -> ModelCard {
        let tree_state = self.checkboxes.tree_state(model);
        let hidden = tree_state == TreeState::AllSelected;
        let sanitized = sanitize_id(model);

        let items = self
            .items(model)
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let target = CheckboxTarget::Item(index);
                PosmRow {
                    checkbox: CheckboxView {
                        element_id: target.element_id(model),
                        checked: self.checkboxes.is_checked(model, target),
                    },
                    posm_code: item.posm_code.clone(),
                    posm_name: item.posm_name.clone(),
                    hidden,
                }
            })
            .collect();

        let preview = self.images.get(model).map(|image| ImagePreview {
            file_name: image.file_name.clone(),
            size_bytes: image.size(),
            source: image.source,
        });

        ModelCard {
            model: model.to_string(),
            quantity_input_id: format!("quantity-{sanitized}"),
            quantity: self.quantities.get(model).get(),
            tree_state,
            all: CheckboxView {
                element_id: CheckboxTarget::All.element_id(model),
                checked: hidden,
            },
            items,
            image: ImageWidget {
                camera_input_id: format!("file-input-camera-{sanitized}"),
                gallery_input_id: format!("file-input-gallery-{sanitized}"),
                inputs_enabled: preview.is_none(),
                preview,
            },
        }
    }
}
