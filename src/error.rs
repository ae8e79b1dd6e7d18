//! Error types for the partner portal client.

use std::path::PathBuf;
use std::time::Duration;

use crate::validation::upload::UploadRejection;
use crate::wizard::steps::WizardStep;

/// Top-level error type for the portal client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Wizard error: {0}")]
    Wizard(#[from] WizardError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Cannot read {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Failures from the REST backend, already classified for display.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The backend rejected the request with a message meant for the user.
    #[error("Rejected by server: {0}")]
    Validation(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Network failure: {0}")]
    Network(String),

    #[error("Unexpected failure: {0}")]
    Unknown(String),
}

impl ApiError {
    /// Plain message for the view layer. Server validation text is passed
    /// through verbatim; everything else gets a fixed wording.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::Timeout(_) => "The request timed out. Please try again.".to_string(),
            Self::Network(_) => {
                "Unable to reach the server. Check your connection and try again.".to_string()
            }
            Self::Unknown(_) => "Something went wrong. Please try again later.".to_string(),
        }
    }
}

/// Wizard navigation, mutation and submission errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("Step {step} has {count} invalid field(s)")]
    StepInvalid { step: WizardStep, count: usize },

    #[error("Submit is only available on the preview step (current: {current})")]
    NotOnPreview { current: WizardStep },

    #[error("This belongs to {owner}; the current step is {current}")]
    WrongStep {
        owner: WizardStep,
        current: WizardStep,
    },

    #[error("Another request is still in flight")]
    Busy,

    #[error("Registration already submitted")]
    AlreadySubmitted,

    #[error("Email is locked after verification")]
    EmailLocked,

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Upload rejected: {0}")]
    Upload(#[from] UploadRejection),

    #[error("No other document at index {0}")]
    NoSuchDocument(usize),

    #[error("OTP error: {0}")]
    Otp(String),

    #[error("Request failed: {0}")]
    Remote(#[from] ApiError),
}

/// Application-state container errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Not signed in")]
    NotAuthenticated,

    #[error("Role {role} may not {action}")]
    Forbidden { role: String, action: String },

    #[error("Request failed: {0}")]
    Request(#[from] ApiError),
}

/// Result type alias for the portal client.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_is_verbatim() {
        let err = ApiError::Validation("Mobile number already registered".into());
        assert_eq!(err.user_message(), "Mobile number already registered");
    }

    #[test]
    fn non_validation_messages_hide_details() {
        let err = ApiError::Network("dns error: no such host api.internal".into());
        assert!(!err.user_message().contains("api.internal"));

        let err = ApiError::Unknown("500 Internal Server Error".into());
        assert_eq!(err.user_message(), "Something went wrong. Please try again later.");

        let err = ApiError::Timeout(Duration::from_secs(30));
        assert!(err.user_message().contains("timed out"));
    }

    #[test]
    fn top_level_error_wraps_each_concern() {
        let err: Error = WizardError::EmailLocked.into();
        assert_eq!(err.to_string(), "Wizard error: Email is locked after verification");

        let err: Error = StoreError::NotAuthenticated.into();
        assert!(matches!(err, Error::Store(StoreError::NotAuthenticated)));

        let err = Error::File {
            path: PathBuf::from("/tmp/pan.png"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.to_string().starts_with("Cannot read /tmp/pan.png"));
    }

    #[test]
    fn wizard_error_wraps_api_error() {
        let err: WizardError = ApiError::Validation("bad".into()).into();
        assert_eq!(err, WizardError::Remote(ApiError::Validation("bad".into())));
    }
}
