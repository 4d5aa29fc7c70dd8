//! reqwest-backed [`Transport`].

use async_trait::async_trait;
use posm_core::transport::{ApiRequest, ApiResponse, HttpMethod, RequestBody, Transport};
use posm_core::{Result, SurveyError};
use reqwest::multipart::{Form, Part};
use reqwest::Client;

/// Sends requests to one backend origin.
///
/// No timeout is configured by default: a hung request stalls only the
/// operation that issued it.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = self.url(&request.path);
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
        };

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::File(file) => {
                // reqwest writes the multipart content type including its boundary
                let part = Part::bytes(file.bytes)
                    .file_name(file.file_name)
                    .mime_str(&file.content_type)
                    .map_err(|e| SurveyError::transport(format!("Invalid content type: {e}")))?;
                builder.multipart(Form::new().part("file", part))
            }
        };

        let response = builder.send().await.map_err(|err| {
            tracing::warn!(url = %url, "request failed: {err}");
            SurveyError::transport(format!("Request to {} failed: {}", request.path, err))
        })?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|err| SurveyError::transport(format!("Failed to read response body: {err}")))?;

        tracing::debug!(url = %url, status, bytes = body.len(), "response received");
        Ok(ApiResponse::new(status, body.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let transport = ReqwestTransport::new("http://localhost:3000/");
        assert_eq!(transport.base_url(), "http://localhost:3000");
        assert_eq!(transport.url("/api/upload"), "http://localhost:3000/api/upload");
        assert_eq!(transport.url("api/upload"), "http://localhost:3000/api/upload");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let transport = ReqwestTransport::new("http://127.0.0.1:9");
        let err = transport
            .execute(ApiRequest::get("/api/auth/verify"))
            .await
            .unwrap_err();
        assert!(matches!(err, SurveyError::Transport(_)));
    }
}
