//! Error types for the management API client
//!
//! Every failure constructing a request or fetching a page ends up here.

use thiserror::Error;

/// Errors that can occur when talking to the Azure Resource Manager API
#[derive(Debug, Error)]
pub enum ArmError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// API returned an error response
    #[error("API error ({status}) {code}: {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// ARM error code (e.g. `ResourceGroupNotFound`)
        code: String,
        /// Error message from the API
        message: String,
    },

    /// Failed to parse the API response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Token missing, expired or rejected
    #[error("Not authenticated - set AZURE_ACCESS_TOKEN (az account get-access-token)")]
    Unauthorized,

    /// Requested scope was not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller lacks RBAC permissions on the scope
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Throttled and retries exhausted
    #[error("Rate limit exceeded after {attempts} attempts")]
    Throttled {
        /// Number of requests sent before giving up
        attempts: u32,
    },

    /// Server error
    #[error("Server error ({status}): {message}")]
    ServerError {
        /// HTTP status code (5xx)
        status: u16,
        /// Error message
        message: String,
    },

    /// Endpoint or continuation link is not a usable URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The scan was cancelled while a request was in flight
    #[error("Operation cancelled")]
    Cancelled,
}

impl ArmError {
    /// Whether the error came from the cancellation token rather than the API.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Result type alias for management API operations
pub type Result<T> = std::result::Result<T, ArmError>;
