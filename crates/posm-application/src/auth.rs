//! Authenticated request execution.
//!
//! [`AuthenticatedClient`] attaches the cached access token to every request.
//! A 401 triggers exactly one refresh and one retry; if either fails the
//! cached credentials are wiped and the caller receives
//! [`SurveyError::Unauthenticated`].

use std::sync::Arc;

use posm_core::session::{CredentialStore, Session, TokenPair, User};
use posm_core::transport::{ApiRequest, ApiResponse, Transport};
use posm_core::{Result, SurveyError};
use serde::Deserialize;
use serde_json::json;

const REFRESH_PATH: &str = "/api/auth/refresh";
const LOGOUT_PATH: &str = "/api/auth/logout";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshEnvelope {
    #[serde(default)]
    success: bool,
    data: Option<RefreshData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshData {
    access_token: String,
    refresh_token: String,
    user: User,
}

/// Sends requests on behalf of the signed-in user.
#[derive(Clone)]
pub struct AuthenticatedClient {
    transport: Arc<dyn Transport>,
    credentials: Arc<dyn CredentialStore>,
}

impl AuthenticatedClient {
    pub fn new(transport: Arc<dyn Transport>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            transport,
            credentials,
        }
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    /// Currently cached session, if any.
    pub async fn session(&self) -> Result<Option<Session>> {
        self.credentials.load().await
    }

    /// Sends `request` with the cached bearer token.
    ///
    /// Any response other than 401 is returned as-is, including other error
    /// statuses. A 401 is retried once after a successful refresh; a second
    /// 401 is final.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let Some(session) = self.credentials.load().await? else {
            return Err(SurveyError::unauthenticated("No access token"));
        };

        let response = self
            .transport
            .execute(request.clone().with_bearer(&session.access_token))
            .await?;
        if !response.is_unauthorized() {
            return Ok(response);
        }

        tracing::info!(path = %request.path, "access token rejected, attempting refresh");
        let Some(refreshed) = self.refresh(&session).await? else {
            self.wipe().await;
            return Err(SurveyError::unauthenticated(
                "Session expired, please login again",
            ));
        };

        let retried = self
            .transport
            .execute(request.with_bearer(&refreshed.access_token))
            .await?;
        if retried.is_unauthorized() {
            tracing::warn!("request rejected again after refresh");
            self.wipe().await;
            return Err(SurveyError::unauthenticated("Authentication failed"));
        }
        Ok(retried)
    }

    /// Exchanges the refresh token for a new pair and persists it.
    ///
    /// Returns `Ok(None)` when the refresh was refused or could not be
    /// performed; only credential storage failures are errors.
    pub async fn refresh(&self, session: &Session) -> Result<Option<Session>> {
        if session.refresh_token.is_empty() {
            return Ok(None);
        }

        let request = ApiRequest::post(REFRESH_PATH)
            .with_json(json!({ "refreshToken": session.refresh_token }));
        let response = match self.transport.execute(request).await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!("token refresh failed: {err}");
                return Ok(None);
            }
        };
        if !response.is_success() {
            tracing::info!(status = response.status, "token refresh refused");
            return Ok(None);
        }

        let data = match response.json::<RefreshEnvelope>() {
            Ok(RefreshEnvelope {
                success: true,
                data: Some(data),
            }) => data,
            Ok(_) => return Ok(None),
            Err(err) => {
                tracing::warn!("unreadable refresh response: {err}");
                return Ok(None);
            }
        };

        let refreshed = Session::refreshed(
            TokenPair {
                access_token: data.access_token,
                refresh_token: data.refresh_token,
            },
            data.user,
        );
        self.credentials.save(&refreshed).await?;
        tracing::info!(user = %refreshed.user.username, "access token refreshed");
        Ok(Some(refreshed))
    }

    /// Notifies the server and wipes local credentials.
    ///
    /// The server call is best-effort; local state is cleared regardless.
    pub async fn logout(&self) -> Result<()> {
        if let Some(session) = self.credentials.load().await.ok().flatten() {
            let request = ApiRequest::post(LOGOUT_PATH).with_bearer(&session.access_token);
            match self.transport.execute(request).await {
                Ok(response) if !response.is_success() => {
                    tracing::debug!(status = response.status, "logout rejected by server");
                }
                Ok(_) => {}
                Err(err) => tracing::warn!("logout request failed: {err}"),
            }
        }
        self.credentials.clear().await
    }

    async fn wipe(&self) {
        if let Err(err) = self.credentials.clear().await {
            tracing::error!("failed to clear credentials: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use posm_core::session::InMemoryCredentialStore;
    use posm_core::transport::HttpMethod;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Scripted {
        responses: Mutex<VecDeque<Result<ApiResponse>>>,
        requests: Mutex<Vec<ApiRequest>>,
    }

    impl Scripted {
        fn new(responses: Vec<Result<ApiResponse>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<ApiRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl Transport for Scripted {
        async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
            self.requests.lock().unwrap().push(request);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(ApiResponse::new(500, "")))
        }
    }

    fn session() -> Session {
        Session::new(
            TokenPair {
                access_token: "old-access".to_string(),
                refresh_token: "old-refresh".to_string(),
            },
            User {
                username: "lan".to_string(),
                role: "user".to_string(),
                leader: Some("Minh".to_string()),
                assigned_stores: Vec::new(),
            },
        )
    }

    fn refresh_ok() -> Result<ApiResponse> {
        Ok(ApiResponse::json_body(
            200,
            &json!({
                "success": true,
                "data": {
                    "accessToken": "new-access",
                    "refreshToken": "new-refresh",
                    "user": {"username": "lan", "role": "user"}
                }
            }),
        ))
    }

    #[tokio::test]
    async fn test_refreshes_once_and_retries_with_new_token() {
        let transport = Scripted::new(vec![
            Ok(ApiResponse::new(401, "")),
            refresh_ok(),
            Ok(ApiResponse::json_body(200, &json!([]))),
        ]);
        let store = Arc::new(InMemoryCredentialStore::with_session(session()));
        let client = AuthenticatedClient::new(transport.clone(), store.clone());

        let response = client.send(ApiRequest::get("/api/stores/search")).await.unwrap();

        assert_eq!(response.status, 200);
        let requests = transport.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].bearer.as_deref(), Some("old-access"));
        assert_eq!(requests[1].path, REFRESH_PATH);
        assert_eq!(requests[1].method, HttpMethod::Post);
        assert_eq!(requests[1].bearer, None);
        assert_eq!(requests[2].bearer.as_deref(), Some("new-access"));

        let stored = store.load().await.unwrap().unwrap();
        assert_eq!(stored.refresh_token, "new-refresh");
    }

    #[tokio::test]
    async fn test_second_unauthorized_wipes_credentials() {
        let transport = Scripted::new(vec![
            Ok(ApiResponse::new(401, "")),
            refresh_ok(),
            Ok(ApiResponse::new(401, "")),
        ]);
        let store = Arc::new(InMemoryCredentialStore::with_session(session()));
        let client = AuthenticatedClient::new(transport.clone(), store.clone());

        let err = client.send(ApiRequest::get("/api/models/S001")).await.unwrap_err();

        assert!(err.is_unauthenticated());
        assert_eq!(transport.requests().len(), 3);
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failed_refresh_wipes_credentials() {
        let transport = Scripted::new(vec![
            Ok(ApiResponse::new(401, "")),
            Ok(ApiResponse::json_body(401, &json!({"success": false}))),
        ]);
        let store = Arc::new(InMemoryCredentialStore::with_session(session()));
        let client = AuthenticatedClient::new(transport.clone(), store.clone());

        let err = client.send(ApiRequest::get("/api/models/S001")).await.unwrap_err();

        assert_eq!(
            err,
            SurveyError::unauthenticated("Session expired, please login again")
        );
        assert_eq!(transport.requests().len(), 2);
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_session_sends_nothing() {
        let transport = Scripted::new(Vec::new());
        let client =
            AuthenticatedClient::new(transport.clone(), Arc::new(InMemoryCredentialStore::new()));

        let err = client.send(ApiRequest::get("/api/stores/search")).await.unwrap_err();

        assert!(err.is_unauthenticated());
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_other_error_statuses_pass_through() {
        let transport = Scripted::new(vec![Ok(ApiResponse::new(500, ""))]);
        let store = Arc::new(InMemoryCredentialStore::with_session(session()));
        let client = AuthenticatedClient::new(transport, store.clone());

        let response = client.send(ApiRequest::get("/api/upload")).await.unwrap();

        assert_eq!(response.status, 500);
        assert!(store.load().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_logout_wipes_even_when_server_fails() {
        let transport = Scripted::new(vec![Err(SurveyError::transport("offline"))]);
        let store = Arc::new(InMemoryCredentialStore::with_session(session()));
        let client = AuthenticatedClient::new(transport.clone(), store.clone());

        client.logout().await.unwrap();

        assert_eq!(transport.requests()[0].path, LOGOUT_PATH);
        assert!(store.load().await.unwrap().is_none());
    }
}
