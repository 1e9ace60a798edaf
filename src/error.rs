//! Error taxonomy shared by resolvers and reconcilers.

use serde::Serialize;
use std::fmt;

/// Fixed set of error kinds surfaced to the declarative layer.
///
/// None of these are retried by this crate; all are terminal to the
/// invoking operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// More than one candidate survived filtering
    Ambiguity,
    /// No candidate survived filtering
    NotFound,
    /// Locally detectable conflict, raised before any remote call
    ConfigurationConflict,
    /// Failure reported by the provisioning or catalog API
    RemoteOperation,
    /// Internal consistency violation
    Integrity,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Ambiguity => "ambiguity",
            ErrorKind::NotFound => "not_found",
            ErrorKind::ConfigurationConflict => "configuration_conflict",
            ErrorKind::RemoteOperation => "remote_operation",
            ErrorKind::Integrity => "integrity",
        };
        f.write_str(s)
    }
}
