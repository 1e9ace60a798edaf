//! Reconciliation of declared resources against the provisioning API.
//!
//! Every operation runs to completion before returning and issues its
//! remote calls in sequence. The first error ends the operation; orders
//! already accepted by the remote are never compensated.
//!
//! Create is not idempotent here: after a crash between order submission
//! and persisting the returned uid, callers must read before creating again.

pub mod appliance;
pub mod context;
pub mod csp;
pub mod error;
pub mod port;
pub mod rederive;
pub mod router;
pub mod state;
pub mod vxc;

pub use appliance::{
    create_appliance, delete_appliance, read_appliance, update_appliance, ApplianceConfig,
    ApplianceState, NetworkInterface, VendorConfig,
};
pub use context::ProvisionContext;
pub use csp::{check_settings_for_port, CspSettings};
pub use error::{ConflictError, ProvisionError};
pub use port::{create_port, delete_port, read_port, update_port, PortConfig, PortState};
pub use rederive::rederive_b_end;
pub use router::{create_router, delete_router, read_router, update_router, RouterConfig, RouterState};
pub use state::{LifecycleEvent, ProvisioningState};
pub use vxc::{
    create_vxc, delete_vxc, read_vxc, update_vxc, AEndConfig, BEndConfig, BEndTarget, VxcConfig,
    VxcEndState, VxcState,
};

use crate::client::{OrderRequest, ProductKind};
use state::RemoteStatus;
use std::fmt::Display;
use std::time::Instant;

/// Submit `order` and wait until the remote reports it live.
pub(crate) async fn submit_and_wait(
    ctx: &ProvisionContext,
    order: &OrderRequest,
) -> Result<String, ProvisionError> {
    let uid = ctx.client().submit_order(order).await?;
    let state = advance(&uid, Some(ProvisioningState::Unsubmitted), LifecycleEvent::Submit)?;
    tracing::info!(uid = %uid, kind = ?order.kind(), state = %state, "Order accepted, waiting for live");

    ctx.client()
        .wait_for_live(&uid, order.kind(), &ctx.live_poll())
        .await?;
    let state = advance(&uid, Some(state), LifecycleEvent::BecameLive)?;
    tracing::debug!(uid = %uid, state = %state, "Order live");
    Ok(uid)
}

/// Submit a delete order for `uid` once its remote state allows one.
///
/// Failed orders can always be deleted. An order already decommissioned, or
/// in a status with no lifecycle mapping, is rejected without a delete call.
pub(crate) async fn submit_delete(
    ctx: &ProvisionContext,
    uid: &str,
    kind: ProductKind,
    destructive: bool,
) -> Result<(), ProvisionError> {
    let status = ctx.client().provisioning_status(uid, kind).await?;
    match ProvisioningState::from_remote(&status) {
        RemoteStatus::Failed => {}
        RemoteStatus::State(state) => {
            advance(uid, Some(state), LifecycleEvent::Delete)?;
        }
        RemoteStatus::Unknown => {
            advance(uid, None, LifecycleEvent::Delete)?;
        }
    }

    tracing::info!(uid, kind = ?kind, status = %status, destructive, "Submitting delete");
    ctx.client().submit_delete(uid, destructive).await?;
    Ok(())
}

/// Apply `event` to the last observed state of `uid`.
pub(crate) fn advance(
    uid: &str,
    observed: Option<ProvisioningState>,
    event: LifecycleEvent,
) -> Result<ProvisioningState, ProvisionError> {
    let operation = match event {
        LifecycleEvent::BeginUpdate | LifecycleEvent::UpdateApplied => "update",
        LifecycleEvent::Delete => "delete",
        LifecycleEvent::Submit | LifecycleEvent::BecameLive => "create",
    };
    let invalid = |state: String| ProvisionError::InvalidState {
        uid: uid.to_string(),
        operation,
        state,
    };

    match observed {
        Some(from) => from.transition(event).map_err(|e| invalid(e.from.to_string())),
        None => Err(invalid("unknown".to_string())),
    }
}

/// Reject a change to a field fixed at creation.
pub(crate) fn immutable<T: PartialEq + Display>(
    field: &'static str,
    created: &T,
    declared: &T,
) -> Result<(), ConflictError> {
    if created == declared {
        return Ok(());
    }
    Err(ConflictError::ImmutableField {
        field,
        from: created.to_string(),
        to: declared.to_string(),
    })
}

pub(crate) fn record_duration(operation: &'static str, started: Instant) {
    metrics::histogram!("fabric_reconcile_duration_seconds", "operation" => operation)
        .record(started.elapsed().as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_requires_live() {
        assert_eq!(
            advance("p1", Some(ProvisioningState::Live), LifecycleEvent::BeginUpdate).unwrap(),
            ProvisioningState::Updating
        );
        let err = advance("p1", Some(ProvisioningState::Provisioning), LifecycleEvent::BeginUpdate)
            .unwrap_err();
        assert!(matches!(
            err,
            ProvisionError::InvalidState {
                operation: "update",
                ..
            }
        ));
        assert!(err.to_string().contains("provisioning"));
    }

    #[test]
    fn live_wait_and_update_close_their_transitions() {
        let submitted = advance("p1", Some(ProvisioningState::Unsubmitted), LifecycleEvent::Submit).unwrap();
        assert_eq!(
            advance("p1", Some(submitted), LifecycleEvent::BecameLive).unwrap(),
            ProvisioningState::Live
        );
        assert_eq!(
            advance("p1", Some(ProvisioningState::Updating), LifecycleEvent::UpdateApplied).unwrap(),
            ProvisioningState::Live
        );
    }

    #[test]
    fn deleted_order_cannot_be_deleted_again() {
        let err = advance("p1", Some(ProvisioningState::Deleted), LifecycleEvent::Delete).unwrap_err();
        assert!(matches!(
            err,
            ProvisionError::InvalidState {
                operation: "delete",
                ..
            }
        ));
        assert!(err.to_string().contains("deleted"));
    }

    #[test]
    fn unknown_state_cannot_advance() {
        let err = advance("p1", None, LifecycleEvent::BeginUpdate).unwrap_err();
        assert!(err.to_string().contains("unknown"));
    }

    #[test]
    fn immutable_field_reports_both_values() {
        assert!(immutable("speed", &1000u32, &1000u32).is_ok());
        assert_eq!(
            immutable("speed", &1000u32, &10000u32),
            Err(ConflictError::ImmutableField {
                field: "speed",
                from: "1000".to_string(),
                to: "10000".to_string(),
            })
        );
    }
}
