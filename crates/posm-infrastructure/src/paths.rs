//! Unified path management for the survey client's local files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/posm-survey/       # Config directory (platform specific)
//! ├── config.toml              # Client configuration
//! └── session.json             # Cached tokens and user (0600 on Unix)
//! ```

use std::path::{Path, PathBuf};

const APP_DIR: &str = "posm-survey";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for posm_core::SurveyError {
    fn from(err: PathError) -> Self {
        posm_core::SurveyError::config(err.to_string())
    }
}

/// Resolves config and session file locations.
///
/// With a base path every file lives directly under it, which is what tests
/// and the `--config-dir` flag use.
#[derive(Debug, Clone)]
pub struct PosmPaths {
    base: Option<PathBuf>,
}

impl PosmPaths {
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    /// Returns the configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: e.g. `~/.config/posm-survey/`
    /// - `Err(PathError::ConfigDirNotFound)`: no base path and no platform config dir
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::ConfigDirNotFound),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    pub fn session_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("session.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_path_overrides_platform_dir() {
        let paths = PosmPaths::new(Some(Path::new("/tmp/posm")));
        assert_eq!(paths.config_file().unwrap(), PathBuf::from("/tmp/posm/config.toml"));
        assert_eq!(paths.session_file().unwrap(), PathBuf::from("/tmp/posm/session.json"));
    }
}
