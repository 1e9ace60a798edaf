//! Error types for provisioning and reconciliation.

use crate::catalog::ConnectType;
use crate::client::ClientError;
use crate::error::ErrorKind;
use crate::resolve::ResolveError;
use thiserror::Error;

/// Conflicts detectable from declared configuration alone.
///
/// Always raised before any remote call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConflictError {
    #[error("only one CSP settings block may be declared, found: {}", .declared.join(", "))]
    MultipleCspSettings { declared: Vec<&'static str> },

    #[error("CSP settings for {declared} do not match partner port connect type {port}")]
    CspSettingsMismatch {
        declared: ConnectType,
        port: ConnectType,
    },

    #[error("partner port with connect type {connect_type} requires a CSP settings block")]
    MissingCspSettings { connect_type: ConnectType },

    #[error("CSP settings declared but B-end {product_uid} is not a cloud partner port")]
    UnexpectedCspSettings { product_uid: String },

    #[error("invalid CSP settings: {reason}")]
    InvalidCspSettings { reason: String },

    #[error("rate limit of {connect_type} connection {uid} is pre-allocated and cannot change from {from} to {to} Mbps")]
    RateLimitImmutable {
        uid: String,
        connect_type: ConnectType,
        from: u32,
        to: u32,
    },

    #[error("field '{field}' cannot be changed after creation (from '{from}' to '{to}')")]
    ImmutableField {
        field: &'static str,
        from: String,
        to: String,
    },

    #[error("changing '{field}' of a virtual appliance after creation is not supported")]
    UnsupportedApplianceChange { field: &'static str },
}

/// Errors from a reconciliation operation.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// Resolution of a selection criterion failed
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Declared configuration conflicts with itself or with created state
    #[error(transparent)]
    Conflict(#[from] ConflictError),

    /// Remote call failed; message is the remote's own
    #[error(transparent)]
    Remote(#[from] ClientError),

    /// The remote-reported B-end product is missing from the partner catalog
    #[error("invalid partner B-end: product {product_uid} not found in partner port catalog")]
    InvalidPartnerBEnd { product_uid: String },

    /// Operation not valid in the resource's current provisioning state
    #[error("cannot {operation} resource {uid} in state {state}")]
    InvalidState {
        uid: String,
        operation: &'static str,
        state: String,
    },
}

impl ProvisionError {
    /// Classify into the shared taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProvisionError::Resolve(e) => e.kind(),
            ProvisionError::Conflict(_) => ErrorKind::ConfigurationConflict,
            ProvisionError::Remote(_) => ErrorKind::RemoteOperation,
            ProvisionError::InvalidPartnerBEnd { .. } | ProvisionError::InvalidState { .. } => {
                ErrorKind::Integrity
            }
        }
    }
}
