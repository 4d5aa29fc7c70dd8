//! Page-entry session check.

use std::sync::Arc;

use posm_core::session::{CredentialStore, Session, User};
use posm_core::transport::{ApiRequest, Transport};
use posm_core::{Result, SurveyError};
use serde::Deserialize;

const VERIFY_PATH: &str = "/api/auth/verify";

#[derive(Deserialize)]
struct VerifyEnvelope {
    user: Option<User>,
}

/// Where the surveyor ends up after the entry check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Credentials are valid; start the wizard
    Proceed(User),
    /// Credentials are missing or rejected and have been cleared
    RedirectToLogin { reason: String },
    /// Admins use the results view
    RedirectToResults,
}

impl GuardOutcome {
    pub fn into_result(self) -> Result<User> {
        match self {
            Self::Proceed(user) => Ok(user),
            Self::RedirectToLogin { reason } => Err(SurveyError::unauthenticated(reason)),
            Self::RedirectToResults => Err(SurveyError::AdminRedirect),
        }
    }
}

/// Decides whether the wizard may start.
///
/// The verify call bypasses the refresh logic: an expired token at entry
/// sends the surveyor back to the login screen.
pub struct SessionGuard {
    transport: Arc<dyn Transport>,
    credentials: Arc<dyn CredentialStore>,
}

impl SessionGuard {
    pub fn new(transport: Arc<dyn Transport>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            transport,
            credentials,
        }
    }

    pub async fn check(&self) -> Result<GuardOutcome> {
        let session = match self.credentials.load().await {
            Ok(Some(session)) if !session.access_token.is_empty() => session,
            Ok(_) => return self.reject("No access token").await,
            Err(err) => {
                tracing::warn!("could not read cached session: {err}");
                return self.reject("Unreadable session").await;
            }
        };

        // The cached role decides before any network traffic
        if session.user.is_admin() {
            tracing::info!(user = %session.user.username, "admin session, redirecting to results");
            return Ok(GuardOutcome::RedirectToResults);
        }

        let request = ApiRequest::get(VERIFY_PATH).with_bearer(&session.access_token);
        let response = match self.transport.execute(request).await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!("token verification failed: {err}");
                return self.reject("Token verification failed").await;
            }
        };
        if !response.is_success() {
            tracing::info!(status = response.status, "token rejected at entry");
            return self.reject("Token verification failed").await;
        }

        // A verify body with a fresher user replaces the cached one
        let user = match response.json::<VerifyEnvelope>() {
            Ok(VerifyEnvelope { user: Some(user) }) if user != session.user => {
                let updated = Session {
                    user: user.clone(),
                    ..session
                };
                self.credentials.save(&updated).await?;
                user
            }
            _ => session.user,
        };
        Ok(GuardOutcome::Proceed(user))
    }

    async fn reject(&self, reason: &str) -> Result<GuardOutcome> {
        self.credentials.clear().await?;
        Ok(GuardOutcome::RedirectToLogin {
            reason: reason.to_string(),
        })
    }
}
