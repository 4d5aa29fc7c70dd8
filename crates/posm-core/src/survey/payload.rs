//! Submission payload.
//!
//! Built only when submitting; never persisted on the client.

use serde::{Deserialize, Serialize};

use crate::catalog::PosmItem;

/// Leader recorded when the signed-in user has none.
pub const DEFAULT_LEADER: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PosmSelection {
    pub posm_code: String,
    pub posm_name: String,
    pub selected: bool,
}

impl From<&PosmItem> for PosmSelection {
    fn from(item: &PosmItem) -> Self {
        Self {
            posm_code: item.posm_code.clone(),
            posm_name: item.posm_name.clone(),
            selected: true,
        }
    }
}

/// One model's result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResponse {
    pub model: String,
    pub quantity: u16,
    pub posm_selections: Vec<PosmSelection>,
    pub all_selected: bool,
    /// Uploaded image URLs, stamped after the uploads succeed
    pub images: Vec<String>,
}

/// Body of the survey submission call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveySubmission {
    pub leader: String,
    pub shop_name: String,
    pub store_id: String,
    pub responses: Vec<SurveyResponse>,
}
