//! Typed facade over the survey backend.

use posm_core::catalog::{PosmItem, StoreCatalog};
use posm_core::store::StoreRef;
use posm_core::survey::SurveySubmission;
use posm_core::transport::{ApiRequest, UploadFile};
use posm_core::{Result, SurveyError};
use serde::Deserialize;

use crate::auth::AuthenticatedClient;

#[derive(Deserialize)]
struct StoreSearchEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Vec<StoreRef>,
    message: Option<String>,
}

#[derive(Deserialize)]
struct UploadEnvelope {
    #[serde(default)]
    success: bool,
    url: Option<String>,
    message: Option<String>,
}

#[derive(Deserialize)]
struct SubmitEnvelope {
    #[serde(default)]
    success: bool,
    message: Option<String>,
}

/// Server acknowledgement of a stored survey.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub message: Option<String>,
}

/// One method per backend endpoint. Every call goes through the
/// authenticated client, so 401 handling is uniform.
#[derive(Clone)]
pub struct SurveyApi {
    client: AuthenticatedClient,
}

impl SurveyApi {
    pub fn new(client: AuthenticatedClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &AuthenticatedClient {
        &self.client
    }

    /// `GET /api/stores/search?q=`
    pub async fn search_stores(&self, query: &str) -> Result<Vec<StoreRef>> {
        let request = ApiRequest::get("/api/stores/search").with_query("q", query);
        let response = self.client.send(request).await?.error_for_status()?;
        let envelope: StoreSearchEnvelope = response.json()?;
        if !envelope.success {
            return Err(SurveyError::Server(
                envelope
                    .message
                    .unwrap_or_else(|| "Store search failed".to_string()),
            ));
        }
        Ok(envelope.data)
    }

    /// `GET /api/models/{store_id}`: every model the store carries, with its
    /// POSM items. The body is the model map itself.
    pub async fn store_catalog(&self, store_id: &str) -> Result<StoreCatalog> {
        let path = format!("/api/models/{}", urlencoding::encode(store_id));
        let response = self.client.send(ApiRequest::get(path)).await?.error_for_status()?;
        response.json()
    }

    /// `GET /api/model-autocomplete?q=`
    pub async fn model_autocomplete(&self, query: &str) -> Result<Vec<String>> {
        let request = ApiRequest::get("/api/model-autocomplete").with_query("q", query);
        let response = self.client.send(request).await?.error_for_status()?;
        response.json()
    }

    /// `GET /api/model-posm/{model}`: store-independent POSM list.
    pub async fn model_posm(&self, model: &str) -> Result<Vec<PosmItem>> {
        let path = format!("/api/model-posm/{}", urlencoding::encode(model));
        let response = self.client.send(ApiRequest::get(path)).await?.error_for_status()?;
        response.json()
    }

    /// `POST /api/upload` as multipart field `file`. Returns the hosted URL.
    pub async fn upload_image(&self, file: UploadFile) -> Result<String> {
        let request = ApiRequest::post("/api/upload").with_file(file);
        let response = self.client.send(request).await?;
        let status = response.status;
        let ok = response.is_success();

        let envelope = response.json::<UploadEnvelope>().ok();
        match envelope {
            Some(UploadEnvelope {
                success: true,
                url: Some(url),
                ..
            }) if ok => Ok(url),
            Some(envelope) => Err(SurveyError::Server(
                envelope
                    .message
                    .unwrap_or_else(|| "Upload failed".to_string()),
            )),
            None if ok => Err(SurveyError::Server("Upload failed".to_string())),
            None => Err(SurveyError::http(
                status,
                format!("HTTP error! status: {status}"),
            )),
        }
    }

    /// `POST /api/submit`
    pub async fn submit_survey(&self, submission: &SurveySubmission) -> Result<SubmitReceipt> {
        let request = ApiRequest::post("/api/submit").with_json(serde_json::to_value(submission)?);
        let response = self.client.send(request).await?.error_for_status()?;
        let envelope: SubmitEnvelope = response.json()?;
        if !envelope.success {
            return Err(SurveyError::Server(
                envelope
                    .message
                    .unwrap_or_else(|| "Unknown error".to_string()),
            ));
        }
        Ok(SubmitReceipt {
            message: envelope.message,
        })
    }
}
