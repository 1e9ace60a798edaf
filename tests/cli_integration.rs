//! CLI Integration Tests
//!
//! End-to-end tests for CLI commands using assert_cmd, with the provisioning
//! API served by wiremock.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Get the fabric binary for testing
fn fabric_cmd() -> Command {
    let mut cmd = Command::cargo_bin("fabric").unwrap();
    for var in [
        "FABRIC_ENVIRONMENT",
        "FABRIC_BASE_URL",
        "FABRIC_AUTH_URL",
        "FABRIC_ACCESS_KEY",
        "FABRIC_SECRET_KEY",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// Command pointed at `server`, run from an empty directory.
fn remote_cmd(server: &MockServer, dir: &TempDir) -> Command {
    let mut cmd = fabric_cmd();
    cmd.current_dir(dir.path())
        .env("FABRIC_BASE_URL", server.uri())
        .env("FABRIC_AUTH_URL", format!("{}/oauth2/token", server.uri()))
        .env("FABRIC_ACCESS_KEY", "ak")
        .env("FABRIC_SECRET_KEY", "sk");
    cmd
}

async fn mock_api() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "cli-token",
            "expires_in": 3600
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/locations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Locations",
            "data": [
                { "id": 3, "name": "Equinix SY1", "metro": "Sydney", "marketCode": "AU", "hasMcr": true },
                { "id": 4, "name": "Equinix SY3", "metro": "Sydney", "marketCode": "AU", "hasMcr": true },
                { "id": 60, "name": "Equinix SV1", "metro": "San Jose", "marketCode": "US", "hasMcr": false }
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/dropdowns/partner/megaports"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Partner ports",
            "data": [
                {
                    "productUid": "aws-hc-red",
                    "productName": "Asia Pacific (Sydney)",
                    "companyName": "AWS",
                    "connectType": "AWSHC",
                    "locationId": 3,
                    "diversityZone": "red",
                    "vxcPermitted": true
                },
                {
                    "productUid": "transit-sy3",
                    "productName": "Internet Transit SY3",
                    "companyName": "Megaport",
                    "connectType": "TRANSIT",
                    "locationId": 4,
                    "diversityZone": "blue",
                    "vxcPermitted": true
                }
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/product/vxc-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "VXC",
            "data": {
                "productUid": "vxc-1",
                "productName": "syd-to-aws",
                "rateLimit": 500,
                "provisioningStatus": "LIVE",
                "aEnd": { "productUid": "port-a", "productName": "syd-core", "vlan": 100 },
                "bEnd": { "productUid": "aws-hc-red", "productName": "Asia Pacific (Sydney)", "vlan": 200 },
                "resources": { "csp_connection": { "connectType": "AWSHC" } }
            }
        })))
        .mount(&server)
        .await;

    server
}

/// Run a blocking assert_cmd invocation off the runtime threads.
async fn run(mut cmd: Command) -> assert_cmd::assert::Assert {
    tokio::task::spawn_blocking(move || cmd.assert())
        .await
        .unwrap()
}

#[test]
fn test_version_output() {
    fabric_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("fabric"));
}

#[test]
fn test_help_shows_all_commands() {
    fabric_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("locations"))
        .stdout(predicate::str::contains("partner-ports"))
        .stdout(predicate::str::contains("vxc"))
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_config_init_creates_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("fabric.toml");

    fabric_cmd()
        .args(["config", "init", "-o", config_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file created"));

    let content = std::fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("[provisioning]"));
}

#[test]
fn test_config_init_no_overwrite() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("fabric.toml");
    std::fs::write(&config_path, "existing content").unwrap();

    fabric_cmd()
        .args(["config", "init", "-o", config_path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    let content = std::fs::read_to_string(&config_path).unwrap();
    assert_eq!(content, "existing content");
}

#[test]
fn test_invalid_command() {
    fabric_cmd().arg("provision-everything").assert().failure();
}

#[test]
fn test_completions_bash() {
    fabric_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fabric"));
}

#[test]
fn test_missing_credentials_fail_before_any_call() {
    let temp_dir = TempDir::new().unwrap();
    fabric_cmd()
        .current_dir(temp_dir.path())
        .env("FABRIC_BASE_URL", "http://127.0.0.1:9")
        .args(["locations", "resolve", "--name", "Sydney"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("FABRIC_ACCESS_KEY"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_locations_resolve_exact_json() {
    let server = mock_api().await;
    let dir = TempDir::new().unwrap();

    let mut cmd = remote_cmd(&server, &dir);
    cmd.args(["locations", "resolve", "--name", "Equinix SY3", "--exact", "--json"]);
    let assert = run(cmd).await.success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["location"]["id"], 4);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_locations_resolve_ambiguous_fails() {
    let server = mock_api().await;
    let dir = TempDir::new().unwrap();

    let mut cmd = remote_cmd(&server, &dir);
    cmd.args(["locations", "resolve", "--name", "Equinix SY"]);
    run(cmd)
        .await
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_partner_ports_resolve_table() {
    let server = mock_api().await;
    let dir = TempDir::new().unwrap();

    let mut cmd = remote_cmd(&server, &dir);
    cmd.args(["partner-ports", "resolve", "--connect-type", "AWSHC", "--location-id", "3"]);
    run(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("aws-hc-red"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_internet_port_by_metro() {
    let server = mock_api().await;
    let dir = TempDir::new().unwrap();

    let mut cmd = remote_cmd(&server, &dir);
    cmd.args(["partner-ports", "internet", "--metro", "Sydney", "--json"]);
    run(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("transit-sy3"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_vxc_show_json() {
    let server = mock_api().await;
    let dir = TempDir::new().unwrap();

    let mut cmd = remote_cmd(&server, &dir);
    cmd.args(["vxc", "show", "vxc-1", "--json"]);
    let assert = run(cmd).await.success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["vxc"]["rate_limit"], 500);
    assert_eq!(parsed["vxc"]["b_end_requested_product_uid"], "aws-hc-red");
    assert_eq!(parsed["vxc"]["a_end"]["requested_vlan"], 100);
}
