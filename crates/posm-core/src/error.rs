//! Error types for the POSM survey client.

use thiserror::Error;

/// Reasons a survey cannot be submitted yet.
///
/// The `Display` output is the alert text shown to the surveyor, so every
/// variant names the models it refers to.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// No store has been locked in yet
    #[error("Please select a store first.")]
    NoStoreSelected,

    /// The selection list is empty
    #[error("Please add at least one model before submitting the survey.")]
    NoModels,

    /// Some models have neither "all" nor any individual POSM checked
    #[error("Please select at least one POSM for each added model (missing: {}).", .models.join(", "))]
    MissingPosm { models: Vec<String> },

    /// Some models have no photo attached
    #[error("{}", missing_images_message(.models))]
    MissingImages { models: Vec<String> },
}

fn missing_images_message(models: &[String]) -> String {
    match models {
        [single] => format!("Please upload an image for model: {}", single),
        many => format!("Please upload images for models: {}", many.join(", ")),
    }
}

/// A shared error type for the survey client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurveyError {
    /// Credentials are missing, invalid or expired; the caller must log in again
    #[error("Authentication required: {reason}")]
    Unauthenticated { reason: String },

    /// Admin accounts use the results view, not the survey wizard
    #[error("Admin accounts must use the survey results view")]
    AdminRedirect,

    /// The survey is incomplete; nothing was sent
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Neither the store catalog nor the model lookup knows this model's POSM
    #[error("No POSM found for model {model}")]
    NoPosmFound { model: String },

    /// An image upload failed; the whole submission was aborted
    #[error("Could not upload image for model {model}: {message}")]
    Upload { model: String, message: String },

    /// Non-OK HTTP status
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    /// The server answered with `success: false`
    #[error("Server rejected the request: {0}")]
    Server(String),

    /// The request never produced a response
    #[error("Transport error: {0}")]
    Transport(String),

    /// Entity not found
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SurveyError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an Unauthenticated error
    pub fn unauthenticated(reason: impl Into<String>) -> Self {
        Self::Unauthenticated {
            reason: reason.into(),
        }
    }

    /// Creates an Upload error
    pub fn upload(model: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Upload {
            model: model.into(),
            message: message.into(),
        }
    }

    /// Creates an Http error
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Creates a Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if the caller has to go back to the login screen
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated { .. })
    }

    /// Check if this is a validation failure (no network call was made)
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is an upload failure
    pub fn is_upload(&self) -> bool {
        matches!(self, Self::Upload { .. })
    }

    /// Check if this is a transport or server-side failure
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Http { .. } | Self::Server(_) | Self::Transport(_)
        )
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for SurveyError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for SurveyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for SurveyError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for SurveyError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, SurveyError>`.
pub type Result<T> = std::result::Result<T, SurveyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_images_names_single_model() {
        let err = ValidationError::MissingImages {
            models: vec!["X100".to_string()],
        };
        assert_eq!(err.to_string(), "Please upload an image for model: X100");
    }

    #[test]
    fn test_missing_images_names_all_models() {
        let err = ValidationError::MissingImages {
            models: vec!["X100".to_string(), "Y200".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Please upload images for models: X100, Y200"
        );
    }

    #[test]
    fn test_validation_converts_transparently() {
        let err: SurveyError = ValidationError::NoModels.into();
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "Please add at least one model before submitting the survey."
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: SurveyError = io.into();
        assert!(matches!(err, SurveyError::Io { .. }));
    }
}
