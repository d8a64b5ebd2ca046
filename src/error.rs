//! Error taxonomy
//!
//! Three fatal categories, matching the three places a run can fail:
//! resolving configuration, validating the resolved parameters, and the
//! remote creation call itself. Nothing is retried; each category maps to
//! its own process exit code so the tool can sit in a scripted chain.

use thiserror::Error;

/// Bad or unreadable configuration source, or an unknown source type.
/// Raised before any validation runs; no remote call is attempted.
#[derive(Debug, Error)]
#[error("configuration error: {message}")]
pub struct ConfigurationError {
    pub message: String,
}

impl ConfigurationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The resolved parameters violate the rules for the declared source type.
///
/// Carries every violation found, not just the first; no remote call is
/// attempted.
#[derive(Debug, Error)]
#[error("invalid parameters: {}", .violations.join("; "))]
pub struct ValidationError {
    pub violations: Vec<String>,
}

/// The remote service rejected or failed the creation call.
///
/// The remote error code and message are passed through unmodified;
/// MediaLive's error taxonomy is large and the operator needs to see it
/// verbatim.
#[derive(Debug, Clone, Error)]
#[error("remote request failed ({code}): {message}")]
pub struct RemoteRequestError {
    pub code: String,
    pub message: String,
}

impl RemoteRequestError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Top-level error for a single invocation.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Remote(#[from] RemoteRequestError),
}

impl Error {
    /// Process exit code for this error category (0 is reserved for success).
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Configuration(_) => 2,
            Error::Validation(_) => 3,
            Error::Remote(_) => 4,
        }
    }
}
