//! Credential storage port.

use std::sync::Mutex;

use super::model::Session;
use crate::error::{Result, SurveyError};

/// Durable key-value storage for the cached session.
///
/// Implementations must treat `clear` as a wholesale wipe: after it returns,
/// neither token nor the user survives.
#[async_trait::async_trait]
pub trait CredentialStore: Send + Sync {
    /// Loads the cached session, `Ok(None)` when nobody is signed in.
    async fn load(&self) -> Result<Option<Session>>;

    /// Replaces the cached session.
    async fn save(&self, session: &Session) -> Result<()>;

    /// Removes every cached credential.
    async fn clear(&self) -> Result<()>;
}

/// Process-local credential store.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    session: Mutex<Option<Session>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }
}

#[async_trait::async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn load(&self) -> Result<Option<Session>> {
        let guard = self
            .session
            .lock()
            .map_err(|e| SurveyError::internal(format!("credential lock poisoned: {e}")))?;
        Ok(guard.clone())
    }

    async fn save(&self, session: &Session) -> Result<()> {
        let mut guard = self
            .session
            .lock()
            .map_err(|e| SurveyError::internal(format!("credential lock poisoned: {e}")))?;
        *guard = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut guard = self
            .session
            .lock()
            .map_err(|e| SurveyError::internal(format!("credential lock poisoned: {e}")))?;
        *guard = None;
        Ok(())
    }
}
