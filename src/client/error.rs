//! Error types for provisioning API calls.

use thiserror::Error;

/// Errors surfaced by the provisioning/catalog collaborator.
///
/// These are passed through to the caller verbatim and never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Network connectivity error (DNS, connection refused, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded deadline.
    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    /// API returned an error response (4xx, 5xx).
    #[error("API error {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Token exchange failed.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// API response doesn't match expected format.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Client configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Remote reported a terminal failure while provisioning.
    #[error("Provisioning of {uid} failed with status {status}")]
    ProvisioningFailed { uid: String, status: String },

    /// Polling deadline elapsed before the expected state was observed.
    #[error("Timed out after {waited_secs}s waiting for {uid}")]
    PollTimeout { uid: String, waited_secs: u64 },

    /// Polling was cancelled.
    #[error("Wait for {uid} was cancelled")]
    Cancelled { uid: String },
}
