use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, McServerError>;

#[derive(Error, Debug)]
pub enum McServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown server software '{name}'")]
    UnknownSoftware { name: String },

    #[error("Server software '{name}' is disabled: {reason}")]
    SoftwareDisabled { name: String, reason: String },

    #[error("Version '{version}' not found")]
    UnknownVersion { version: String },

    #[error("No builds published for version '{version}'")]
    NoBuilds { version: String },

    #[error("Request failed: {url} ({reason})")]
    FetchFailed {
        url: String,
        status: Option<u16>,
        reason: String,
    },

    #[error("Response from {url} is not valid JSON: {reason}")]
    InvalidJson { url: String, reason: String },

    #[error("Unexpected response shape from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },

    #[error("Resolved download URL is not valid: '{url}'")]
    InvalidUrl { url: String },

    #[error("No metadata registered for software '{family}'")]
    MetadataNotFound { family: String },

    #[error("Metadata for '{family}' has no '{endpoint}' endpoint")]
    MissingEndpoint { family: String, endpoint: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Home directory not found")]
    HomeDirectoryNotFound,

    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },
}

impl McServerError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        McServerError::ConfigError {
            message: message.into(),
        }
    }

    pub fn malformed<U: Into<String>, R: ToString>(url: U, reason: R) -> Self {
        McServerError::MalformedResponse {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// HTTP status of a failed fetch, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            McServerError::FetchFailed { status, .. } => *status,
            _ => None,
        }
    }

    /// Whether a repeated request could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            McServerError::FetchFailed { status: None, .. } => true,
            McServerError::FetchFailed {
                status: Some(code), ..
            } => *code == 429 || *code >= 500,
            _ => false,
        }
    }
}
