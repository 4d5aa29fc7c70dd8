//! HTTP transport port.
//!
//! The wizard never talks to a concrete HTTP stack. Requests are described as
//! plain values and handed to a [`Transport`]; the infrastructure layer maps
//! them onto a real client and tests substitute scripted fakes.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{Result, SurveyError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// A locally held file to be sent as the `file` field of a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    /// Sent with `Content-Type: application/json`
    Json(serde_json::Value),
    /// Sent as multipart; the transport must not set a content type itself so
    /// the boundary parameter stays correct
    File(UploadFile),
}

/// A transport-agnostic request.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Path relative to the configured base URL, already percent-encoded
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
    pub bearer: Option<String>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            bearer: None,
        }
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Post,
            ..Self::get(path)
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_json(mut self, value: serde_json::Value) -> Self {
        self.body = RequestBody::Json(value);
        self
    }

    pub fn with_file(mut self, file: UploadFile) -> Self {
        self.body = RequestBody::File(file);
        self
    }

    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }
}

/// Status and raw body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

#[derive(Deserialize)]
struct MessageOnly {
    message: Option<String>,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Convenience for building JSON responses.
    pub fn json_body(status: u16, value: &serde_json::Value) -> Self {
        Self::new(status, value.to_string().into_bytes())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Server-provided `message` field, if the body carries one.
    pub fn message(&self) -> Option<String> {
        serde_json::from_slice::<MessageOnly>(&self.body)
            .ok()
            .and_then(|m| m.message)
    }

    /// Fails with an `Http` error unless the status is 2xx.
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }
        let message = self
            .message()
            .unwrap_or_else(|| format!("HTTP error! status: {}", self.status));
        Err(SurveyError::http(self.status, message))
    }
}

/// Executes requests against the backend.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Sends one request. Non-2xx statuses are returned as responses, only
    /// failures to obtain a response are errors.
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse>;
}
