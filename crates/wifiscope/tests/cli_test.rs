//! Integration tests for the `wifiscope` binary.
//!
//! Argument parsing, help output, completions, config handling, and a
//! one-shot `clients` run against a wiremock RouterOS.
#![allow(clippy::unwrap_used)]

use std::io::Write;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use wiremock::matchers::{basic_auth, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `wifiscope` binary with env isolation.
///
/// Clears all `WIFISCOPE_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn wifiscope_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("wifiscope");
    cmd.env("HOME", "/tmp/wifiscope-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/wifiscope-test-nonexistent")
        .env_remove("RUST_LOG");
    for (key, _) in std::env::vars() {
        if key.starts_with("WIFISCOPE_") {
            cmd.env_remove(key);
        }
    }
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

async fn mock_router() -> MockServer {
    let server = MockServer::start().await;

    let tables = [
        (
            "/rest/ip/dhcp-server/lease",
            serde_json::json!([{
                ".id": "*1",
                "mac-address": "AA:BB:CC:00:00:01",
                "active-address": "192.168.88.20",
                "host-name": "laptop",
                "status": "bound"
            }]),
        ),
        (
            "/rest/interface/wifi/registration-table",
            serde_json::json!([{
                ".id": "*2",
                "mac-address": "AA:BB:CC:00:00:01",
                "interface": "wifi1-virtual1",
                "signal": "-58",
                "ssid": "Home",
                "band": "5ghz-ax"
            }]),
        ),
        (
            "/rest/interface/wifi/radio",
            serde_json::json!([{ ".id": "*3", "radio-mac": "48:A9:8A:00:00:01", "cap": "hAP-ax3@5ghz" }]),
        ),
        (
            "/rest/interface/wifi",
            serde_json::json!([{ ".id": "*4", "name": "wifi1", "mac-address": "48:A9:8A:00:00:01" }]),
        ),
    ];

    for (route, body) in tables {
        Mock::given(method("GET"))
            .and(path(route))
            .and(basic_auth("admin", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;
    }

    server
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = wifiscope_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    wifiscope_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("RouterOS")
            .and(predicate::str::contains("serve"))
            .and(predicate::str::contains("clients")),
    );
}

#[test]
fn test_version_flag() {
    wifiscope_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("wifiscope"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_zsh() {
    wifiscope_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_bash() {
    wifiscope_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_show_masks_password() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[router]\nhost = \"192.168.88.1\"\npassword = \"hunter2\"\n\n[polling]\nradios_secs = 900"
    )
    .unwrap();

    wifiscope_cmd()
        .args(["--config", file.path().to_str().unwrap(), "config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("192.168.88.1")
                .and(predicate::str::contains("radios_secs = 900"))
                .and(predicate::str::contains("********"))
                .and(predicate::str::contains("hunter2").not()),
        );
}

#[test]
fn test_config_show_applies_flag_overrides() {
    wifiscope_cmd()
        .args(["--host", "10.1.1.1", "--user", "monitor", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("10.1.1.1").and(predicate::str::contains("monitor")));
}

#[test]
fn test_config_path_honours_flag() {
    wifiscope_cmd()
        .args(["--config", "/etc/wifiscope.toml", "config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/etc/wifiscope.toml"));
}

#[test]
fn test_missing_config_file_is_usage_error() {
    wifiscope_cmd()
        .args(["--config", "/tmp/wifiscope-test-nonexistent/nope.toml", "config", "show"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not found"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = wifiscope_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_clients_without_host_is_usage_error() {
    wifiscope_cmd()
        .arg("clients")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("router.host"));
}

#[test]
fn test_invalid_output_format() {
    wifiscope_cmd()
        .args(["--host", "10.0.0.1", "clients", "--output", "xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("xml"));
}

#[test]
fn test_unreachable_router_is_connection_error() {
    // Port 1 on loopback refuses connections.
    wifiscope_cmd()
        .env("WIFISCOPE_PASSWORD", "secret")
        .args(["--host", "http://127.0.0.1:1", "clients", "--wait", "2"])
        .assert()
        .code(7)
        .stderr(predicate::str::contains("Could not reach the router"));
}

// ── Against a mock router ───────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_clients_json_against_mock_router() {
    let server = mock_router().await;

    let output = wifiscope_cmd()
        .env("WIFISCOPE_PASSWORD", "secret")
        .args(["--host", &server.uri(), "clients", "-o", "json-compact", "--wait", "10"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    let clients: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        clients,
        serde_json::json!([{
            "activeAddress": "192.168.88.20",
            "hostName": "laptop",
            "macAddress": "AA:BB:CC:00:00:01",
            "rssi": "-58",
            "ssid": "Home",
            "cap": "hAP-ax3",
            "band": "5ghz-ax",
            "comment": ""
        }])
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_clients_plain_lists_macs() {
    let server = mock_router().await;

    wifiscope_cmd()
        .env("WIFISCOPE_PASSWORD", "secret")
        .args(["--host", &server.uri(), "clients", "-o", "plain"])
        .assert()
        .success()
        .stdout("AA:BB:CC:00:00:01\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_wrong_password_is_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": 401,
            "message": "Unauthorized"
        })))
        .mount(&server)
        .await;

    wifiscope_cmd()
        .env("WIFISCOPE_PASSWORD", "wrong")
        .args(["--host", &server.uri(), "clients", "--wait", "3"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Authentication failed"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_lease_query_filters_bound_leases() {
    let server = mock_router().await;

    wifiscope_cmd()
        .env("WIFISCOPE_PASSWORD", "secret")
        .args(["--host", &server.uri(), "clients", "-o", "json"])
        .assert()
        .success();

    let requests = server.received_requests().await.unwrap();
    let lease = requests
        .iter()
        .find(|r| r.url.path() == "/rest/ip/dhcp-server/lease")
        .unwrap();
    let pairs: Vec<(String, String)> = lease
        .url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    assert!(pairs.contains(&("disabled".into(), "false".into())));
    assert!(pairs.contains(&("status".into(), "bound".into())));
}
