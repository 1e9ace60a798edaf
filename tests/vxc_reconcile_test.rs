//! Cross-connect reconciliation against an in-memory provisioning API.

mod common;

use common::{make_context, Call, MockFabric};
use fabric::client::{OrderRequest, VxcUpdate};
use fabric::error::ErrorKind;
use fabric::provision::csp::{AwsSettings, GoogleSettings};
use fabric::provision::{
    create_vxc, delete_vxc, read_vxc, update_vxc, AEndConfig, BEndConfig, BEndTarget,
    ConflictError, CspSettings, ProvisionError, ProvisioningState, VxcConfig,
};
use fabric::resolve::PartnerPortQuery;
use std::sync::Arc;

fn hosted_aws_config() -> VxcConfig {
    VxcConfig {
        name: "syd-to-aws".to_string(),
        rate_limit: 500,
        a_end: AEndConfig {
            product_uid: "port-a".to_string(),
            requested_vlan: Some(100),
        },
        b_end: BEndConfig {
            target: BEndTarget::Partner(PartnerPortQuery {
                connect_type: Some("AWSHC".to_string()),
                location_id: Some(3),
                diversity_zone: Some("red".to_string()),
                ..PartnerPortQuery::default()
            }),
            requested_vlan: Some(200),
        },
        csp: Some(CspSettings::AwsHostedConnection(AwsSettings {
            owner_account: "123456789012".to_string(),
            ..AwsSettings::default()
        })),
        cost_centre: None,
    }
}

fn plain_config() -> VxcConfig {
    VxcConfig {
        name: "port-to-port".to_string(),
        rate_limit: 100,
        a_end: AEndConfig {
            product_uid: "port-a".to_string(),
            requested_vlan: None,
        },
        b_end: BEndConfig {
            target: BEndTarget::Product {
                product_uid: "port-b".to_string(),
            },
            requested_vlan: None,
        },
        csp: None,
        cost_centre: Some("NET-01".to_string()),
    }
}

#[tokio::test]
async fn create_resolves_partner_and_orders_declared_vlans() {
    let fabric = Arc::new(MockFabric::sydney());
    let ctx = make_context(fabric.clone());

    let state = create_vxc(&ctx, &hosted_aws_config()).await.unwrap();

    assert_eq!(state.state, Some(ProvisioningState::Live));
    assert_eq!(state.b_end.product_uid, "aws-hc-red");
    assert_eq!(state.b_end_requested_product_uid, "aws-hc-red");
    assert_eq!(state.a_end.requested_vlan, Some(100));
    assert_eq!(state.b_end.requested_vlan, Some(200));
    assert!(state.csp.is_some());

    let orders: Vec<_> = fabric
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            Call::SubmitOrder(OrderRequest::Vxc(order)) => Some(order),
            _ => None,
        })
        .collect();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].b_end.product_uid.as_deref(), Some("aws-hc-red"));
    assert_eq!(orders[0].a_end.vlan, Some(100));
    assert_eq!(orders[0].b_end.vlan, Some(200));
}

#[tokio::test]
async fn create_without_zone_picks_first_interchangeable_port() {
    let fabric = Arc::new(MockFabric::sydney());
    let ctx = make_context(fabric.clone());

    let mut config = hosted_aws_config();
    if let BEndTarget::Partner(query) = &mut config.b_end.target {
        query.diversity_zone = None;
    }

    let state = create_vxc(&ctx, &config).await.unwrap();
    assert_eq!(state.b_end.product_uid, "aws-hc-red");
}

#[tokio::test]
async fn create_with_mismatched_csp_settings_submits_nothing() {
    let fabric = Arc::new(MockFabric::sydney());
    let ctx = make_context(fabric.clone());

    let mut config = hosted_aws_config();
    config.csp = Some(CspSettings::Google(GoogleSettings {
        pairing_key: "abc/australia-southeast1/1".to_string(),
    }));

    let err = create_vxc(&ctx, &config).await.unwrap_err();
    assert!(matches!(
        err,
        ProvisionError::Conflict(ConflictError::CspSettingsMismatch { .. })
    ));
    assert_eq!(err.kind(), ErrorKind::ConfigurationConflict);
    assert!(fabric.mutations().is_empty());
}

#[tokio::test]
async fn create_to_cloud_port_requires_csp_settings() {
    let fabric = Arc::new(MockFabric::sydney());
    let ctx = make_context(fabric.clone());

    let mut config = hosted_aws_config();
    config.csp = None;

    let err = create_vxc(&ctx, &config).await.unwrap_err();
    assert!(matches!(
        err,
        ProvisionError::Conflict(ConflictError::MissingCspSettings { .. })
    ));
    assert!(fabric.mutations().is_empty());
}

#[tokio::test]
async fn create_failure_after_submit_is_not_compensated() {
    let fabric = Arc::new(MockFabric::sydney());
    *fabric.initial_status.lock().unwrap() = "FAILED".to_string();
    let ctx = make_context(fabric.clone());

    let err = create_vxc(&ctx, &plain_config()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RemoteOperation);
    assert!(err.to_string().contains("FAILED"));

    let mutations = fabric.mutations();
    assert_eq!(mutations.len(), 1);
    assert!(matches!(mutations[0], Call::SubmitOrder(_)));
}

#[tokio::test]
async fn read_keeps_declared_vlans_and_import_adopts_remote() {
    let fabric = Arc::new(MockFabric::sydney());
    let ctx = make_context(fabric.clone());
    let config = hosted_aws_config();

    let created = create_vxc(&ctx, &config).await.unwrap();

    let declared = read_vxc(&ctx, &created.uid, Some(&config)).await.unwrap();
    assert_eq!(declared.a_end.requested_vlan, Some(100));
    assert_eq!(declared.b_end.requested_vlan, Some(200));

    let imported = read_vxc(&ctx, &created.uid, None).await.unwrap();
    assert_eq!(imported.a_end.requested_vlan, imported.a_end.assigned_vlan);
    assert!(imported.csp.is_none());
}

#[tokio::test]
async fn plain_connection_gets_remote_assigned_vlans() {
    let fabric = Arc::new(MockFabric::sydney());
    let ctx = make_context(fabric.clone());

    let state = create_vxc(&ctx, &plain_config()).await.unwrap();
    assert_eq!(state.a_end.assigned_vlan, Some(1000));
    assert_eq!(state.a_end.requested_vlan, Some(1000));
    assert!(state.connect_type.is_none());
    assert_eq!(state.b_end_requested_product_uid, "port-b");
}

#[tokio::test]
async fn hosted_connection_rate_limit_change_conflicts_before_any_call() {
    let fabric = Arc::new(MockFabric::sydney());
    let ctx = make_context(fabric.clone());
    let config = hosted_aws_config();
    let prior = create_vxc(&ctx, &config).await.unwrap();
    fabric.clear_calls();

    let mut declared = config.clone();
    declared.rate_limit = 1000;
    let err = update_vxc(&ctx, &prior, &declared).await.unwrap_err();

    assert!(matches!(
        err,
        ProvisionError::Conflict(ConflictError::RateLimitImmutable {
            from: 500,
            to: 1000,
            ..
        })
    ));
    assert_eq!(err.kind(), ErrorKind::ConfigurationConflict);
    assert!(fabric.calls().is_empty());
}

#[tokio::test]
async fn hosted_rate_limit_guard_holds_without_remote_connect_type() {
    let fabric = Arc::new(MockFabric::sydney());
    let ctx = make_context(fabric.clone());
    let config = hosted_aws_config();
    let created = create_vxc(&ctx, &config).await.unwrap();
    fabric.clear_resources(&created.uid);
    let prior = read_vxc(&ctx, &created.uid, Some(&config)).await.unwrap();
    assert!(prior.connect_type.is_none());
    fabric.clear_calls();

    let mut declared = config.clone();
    declared.rate_limit = 1000;
    let err = update_vxc(&ctx, &prior, &declared).await.unwrap_err();

    assert!(matches!(
        err,
        ProvisionError::Conflict(ConflictError::RateLimitImmutable {
            from: 500,
            to: 1000,
            ..
        })
    ));
    assert!(fabric.calls().is_empty());
}

#[tokio::test]
async fn rename_resends_full_update() {
    let fabric = Arc::new(MockFabric::sydney());
    let ctx = make_context(fabric.clone());
    let config = hosted_aws_config();
    let prior = create_vxc(&ctx, &config).await.unwrap();
    fabric.clear_calls();

    let mut declared = config.clone();
    declared.name = "syd-to-aws-primary".to_string();
    let state = update_vxc(&ctx, &prior, &declared).await.unwrap();

    assert_eq!(state.name, "syd-to-aws-primary");
    assert_eq!(state.a_end.requested_vlan, Some(100));
    assert_eq!(
        fabric.mutations(),
        vec![Call::SubmitUpdate(
            prior.uid.clone(),
            VxcUpdate {
                name: "syd-to-aws-primary".to_string(),
                rate_limit: 500,
                a_end_vlan: Some(100),
                b_end_vlan: Some(200),
            }
        )]
    );
}

#[tokio::test]
async fn vlan_change_is_applied() {
    let fabric = Arc::new(MockFabric::sydney());
    let ctx = make_context(fabric.clone());
    let config = plain_config();
    let prior = create_vxc(&ctx, &config).await.unwrap();

    let mut declared = config.clone();
    declared.a_end.requested_vlan = Some(300);
    let state = update_vxc(&ctx, &prior, &declared).await.unwrap();

    assert_eq!(state.a_end.assigned_vlan, Some(300));
    assert_eq!(state.b_end.assigned_vlan, Some(1001));
}

#[tokio::test]
async fn unchanged_declaration_makes_no_calls() {
    let fabric = Arc::new(MockFabric::sydney());
    let ctx = make_context(fabric.clone());
    let config = plain_config();
    let prior = create_vxc(&ctx, &config).await.unwrap();
    fabric.clear_calls();

    let state = update_vxc(&ctx, &prior, &config).await.unwrap();
    assert_eq!(state, prior);
    assert!(fabric.calls().is_empty());
}

#[tokio::test]
async fn b_end_product_change_is_immutable() {
    let fabric = Arc::new(MockFabric::sydney());
    let ctx = make_context(fabric.clone());
    let config = plain_config();
    let prior = create_vxc(&ctx, &config).await.unwrap();
    fabric.clear_calls();

    let mut declared = config.clone();
    declared.b_end.target = BEndTarget::Product {
        product_uid: "port-c".to_string(),
    };
    let err = update_vxc(&ctx, &prior, &declared).await.unwrap_err();
    assert!(matches!(
        err,
        ProvisionError::Conflict(ConflictError::ImmutableField {
            field: "b_end.product_uid",
            ..
        })
    ));
    assert!(fabric.calls().is_empty());
}

#[tokio::test]
async fn reapplying_product_b_end_tolerates_rederivation() {
    let fabric = Arc::new(MockFabric::sydney());
    let ctx = make_context(fabric.clone());
    let mut config = hosted_aws_config();
    config.b_end.target = BEndTarget::Product {
        product_uid: "aws-hc-blue".to_string(),
    };
    let prior = create_vxc(&ctx, &config).await.unwrap();
    assert_eq!(prior.b_end.product_uid, "aws-hc-blue");
    assert_eq!(prior.b_end_requested_product_uid, "aws-hc-red");
    fabric.clear_calls();

    let state = update_vxc(&ctx, &prior, &config).await.unwrap();
    assert_eq!(state, prior);
    assert!(fabric.mutations().is_empty());
}

#[tokio::test]
async fn update_outside_live_is_rejected() {
    let fabric = Arc::new(MockFabric::sydney());
    let ctx = make_context(fabric.clone());
    let config = plain_config();
    let mut prior = create_vxc(&ctx, &config).await.unwrap();
    prior.state = Some(ProvisioningState::Provisioning);

    let mut declared = config.clone();
    declared.name = "renamed".to_string();
    let err = update_vxc(&ctx, &prior, &declared).await.unwrap_err();
    assert!(matches!(err, ProvisionError::InvalidState { operation: "update", .. }));
    assert_eq!(err.kind(), ErrorKind::Integrity);
}

#[tokio::test]
async fn delete_submits_and_returns() {
    let fabric = Arc::new(MockFabric::sydney());
    let ctx = make_context(fabric.clone());
    let prior = create_vxc(&ctx, &plain_config()).await.unwrap();
    fabric.clear_calls();

    delete_vxc(&ctx, &prior.uid).await.unwrap();

    assert_eq!(
        fabric.calls(),
        vec![
            Call::GetVxc(prior.uid.clone()),
            Call::SubmitDelete(prior.uid.clone(), true)
        ]
    );
    let after = read_vxc(&ctx, &prior.uid, None).await.unwrap();
    assert!(after.is_deleted());
}

#[tokio::test]
async fn second_delete_is_rejected_without_an_order() {
    let fabric = Arc::new(MockFabric::sydney());
    let ctx = make_context(fabric.clone());
    let prior = create_vxc(&ctx, &plain_config()).await.unwrap();
    delete_vxc(&ctx, &prior.uid).await.unwrap();
    fabric.clear_calls();

    let err = delete_vxc(&ctx, &prior.uid).await.unwrap_err();
    assert!(matches!(err, ProvisionError::InvalidState { operation: "delete", .. }));
    assert!(err.to_string().contains("deleted"));
    assert!(fabric.mutations().is_empty());
}
