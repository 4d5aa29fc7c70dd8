//! File-backed credential store.
//!
//! Keeps the cached session in `session.json`. Writes go to a temporary file
//! that is fsynced and renamed over the target, so a crash never leaves a
//! half-written session behind.

use std::path::{Path, PathBuf};

use posm_core::session::{CredentialStore, Session};
use posm_core::{Result, SurveyError};
use tokio::io::AsyncWriteExt;

use crate::paths::PosmPaths;

/// Stores the session as JSON with user-only permissions on Unix.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Uses the default location resolved by [`PosmPaths`].
    pub fn new(paths: &PosmPaths) -> Result<Self> {
        Ok(Self {
            path: paths.session_file()?,
        })
    }

    /// Creates a store at a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait::async_trait]
impl CredentialStore for FileCredentialStore {
    async fn load(&self) -> Result<Option<Session>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        match serde_json::from_str(&content) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                // An unreadable session is treated as signed out
                tracing::warn!(path = %self.path.display(), "discarding unreadable session file: {e}");
                Ok(None)
            }
        }
    }

    async fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_vec_pretty(session)?;
        let tmp_path = self.temp_path();

        let mut tmp_file = tokio::fs::File::create(&tmp_path).await?;
        tmp_file.write_all(&json).await?;
        tmp_file.sync_all().await?;
        drop(tmp_file);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            tokio::fs::set_permissions(&tmp_path, permissions).await?;
        }

        tokio::fs::rename(&tmp_path, &self.path).await?;
        tracing::debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SurveyError::from(e)),
        }
    }
}
