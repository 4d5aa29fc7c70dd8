//! Survey submission: validate, upload photos one by one, then submit.

use std::collections::HashMap;
use std::fmt;

use posm_core::survey::{Step, SurveyState};
use posm_core::{Result, SurveyError};

use crate::api::{SubmitReceipt, SurveyApi};

/// Emitted before each upload starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionProgress {
    pub model: String,
    /// 1-based
    pub index: usize,
    pub total: usize,
}

impl fmt::Display for SubmissionProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Uploading image for model {} ({}/{})...",
            self.model, self.index, self.total
        )
    }
}

/// Runs one submission attempt against `state`.
///
/// Nothing is sent unless validation passes. Uploads run sequentially in
/// display order and the first failure aborts the attempt before the
/// survey is submitted. State is left untouched on any failure; on success
/// the photos are released and the wizard moves to [`Step::Done`].
pub async fn submit_survey(
    api: &SurveyApi,
    state: &mut SurveyState,
    leader: Option<&str>,
    mut on_progress: impl FnMut(SubmissionProgress),
) -> Result<SubmitReceipt> {
    state.validate()?;

    let models: Vec<String> = state.models().iter().map(str::to_string).collect();
    let total = models.len();
    let mut urls: HashMap<String, String> = HashMap::with_capacity(total);

    for (position, model) in models.iter().enumerate() {
        let file = state
            .images()
            .get(model)
            .map(|image| image.to_upload_file())
            .ok_or_else(|| SurveyError::internal(format!("image for {model} vanished after validation")))?;

        on_progress(SubmissionProgress {
            model: model.clone(),
            index: position + 1,
            total,
        });

        match api.upload_image(file).await {
            Ok(url) => {
                tracing::debug!(model = %model, url = %url, "image uploaded");
                urls.insert(model.clone(), url);
            }
            Err(err) if err.is_unauthenticated() => return Err(err),
            Err(err) => {
                tracing::warn!(model = %model, "image upload failed: {err}");
                return Err(SurveyError::upload(model.clone(), failure_message(err)));
            }
        }
    }

    let mut responses = state.collect_responses();
    for response in &mut responses {
        response.images = urls.remove(&response.model).into_iter().collect();
    }
    let submission = state.submission(leader, responses)?;

    let receipt = api.submit_survey(&submission).await?;
    tracing::info!(
        store_id = %submission.store_id,
        responses = submission.responses.len(),
        "survey submitted"
    );

    state.clear_images();
    state.set_step(Step::Done);
    Ok(receipt)
}

fn failure_message(err: SurveyError) -> String {
    match err {
        SurveyError::Server(message) | SurveyError::Transport(message) => message,
        SurveyError::Http { message, .. } => message,
        other => other.to_string(),
    }
}
