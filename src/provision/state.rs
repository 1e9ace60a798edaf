//! Provisioning lifecycle of an ordered resource.
//!
//! ```text
//! Unsubmitted ─submit─▶ Submitted ─live─▶ Live
//!                        Provisioning ─live─▶ Live
//! Live ─update─▶ Updating ─applied─▶ Live
//! any submitted state ─delete─▶ Deleted (terminal)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Local view of where an order is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvisioningState {
    Unsubmitted,
    Submitted,
    Provisioning,
    Live,
    Updating,
    Deleted,
}

/// Lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Order accepted and identity assigned
    Submit,
    /// Remote reports the resource live
    BecameLive,
    /// Update order accepted
    BeginUpdate,
    /// Remote reports the update applied
    UpdateApplied,
    /// Delete order accepted
    Delete,
}

/// Rejected lifecycle transition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid transition from {from} on {event:?}")]
pub struct InvalidTransition {
    pub from: ProvisioningState,
    pub event: LifecycleEvent,
}

/// Classification of a remote provisioning status string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteStatus {
    State(ProvisioningState),
    Failed,
    Unknown,
}

impl ProvisioningState {
    /// Apply `event`, returning the next state.
    pub fn transition(self, event: LifecycleEvent) -> Result<Self, InvalidTransition> {
        use LifecycleEvent::*;
        use ProvisioningState::*;

        let next = match (self, event) {
            (Unsubmitted, Submit) => Submitted,
            (Submitted, BecameLive) | (Provisioning, BecameLive) | (Live, BecameLive) => Live,
            (Live, BeginUpdate) => Updating,
            (Updating, UpdateApplied) => Live,
            (Submitted | Provisioning | Live | Updating, Delete) => Deleted,
            (from, event) => return Err(InvalidTransition { from, event }),
        };
        Ok(next)
    }

    /// Map a remote provisioning status onto the local lifecycle.
    pub fn from_remote(status: &str) -> RemoteStatus {
        match status.trim().to_uppercase().as_str() {
            "NEW" | "DESIGN" => RemoteStatus::State(ProvisioningState::Submitted),
            "DEPLOYABLE" => RemoteStatus::State(ProvisioningState::Provisioning),
            "CONFIGURED" | "LIVE" => RemoteStatus::State(ProvisioningState::Live),
            "DECOMMISSIONING" | "DECOMMISSIONED" | "CANCELLED" | "CANCELLED_PARENT" => {
                RemoteStatus::State(ProvisioningState::Deleted)
            }
            "FAILED" => RemoteStatus::Failed,
            _ => RemoteStatus::Unknown,
        }
    }

    /// Lifecycle state for a remote status, `None` when it has none.
    pub fn observed(status: &str) -> Option<Self> {
        match Self::from_remote(status) {
            RemoteStatus::State(state) => Some(state),
            RemoteStatus::Failed | RemoteStatus::Unknown => None,
        }
    }
}

impl fmt::Display for ProvisioningState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProvisioningState::Unsubmitted => "unsubmitted",
            ProvisioningState::Submitted => "submitted",
            ProvisioningState::Provisioning => "provisioning",
            ProvisioningState::Live => "live",
            ProvisioningState::Updating => "updating",
            ProvisioningState::Deleted => "deleted",
        };
        f.write_str(s)
    }
}
