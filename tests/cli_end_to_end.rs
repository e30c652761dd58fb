//! Drives the compiled `vkc` binary against a mock control plane.

use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::str::contains;
use serde_json::json;

/// Keystone double: accepts any password auth and hands back a catalog whose
/// block-storage endpoint points at the same mock server.
fn keystone(server: &MockServer) -> httpmock::Mock<'_> {
    server.mock(|when, then| {
        when.method(POST).path("/auth/tokens");
        then.status(201)
            .header("x-subject-token", "e2e-token")
            .json_body(json!({
                "token": {
                    "catalog": [
                        {
                            "type": "volumev3",
                            "endpoints": [
                                {"interface": "public", "region": "RegionOne", "url": server.base_url()}
                            ]
                        }
                    ]
                }
            }));
    })
}

fn vkc(server: &MockServer) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("vkc"));
    cmd.env("OS_AUTH_URL", server.base_url())
        .env("OS_USERNAME", "admin")
        .env("OS_PASSWORD", "secret")
        .env_remove("OS_REGION_NAME")
        .env_remove("OS_INTERFACE")
        .env_remove("OS_PROJECT_ID")
        .env_remove("OS_PROJECT_NAME");
    cmd
}

#[test]
fn accepted_retype_prints_accepted_and_exits_zero() {
    let server = MockServer::start();
    let auth = keystone(&server);
    server.mock(|when, then| {
        when.method(GET).path("/volumes/vol-1");
        then.status(200).json_body(json!({"volume": {"id": "vol-1"}}));
    });
    let action = server.mock(|when, then| {
        when.method(POST)
            .path("/volumes/vol-1/action")
            .header("x-auth-token", "e2e-token")
            .json_body(json!({
                "os-retype": {"migration_policy": "on-demand", "new_type": "fast"}
            }));
        then.status(202);
    });

    vkc(&server)
        .args(["volume", "retype", "vol-1", "--type", "fast"])
        .assert()
        .success()
        .stdout(contains("Accepted"));
    auth.assert();
    action.assert();
}

#[test]
fn rejected_retype_prints_server_detail_and_exits_one() {
    let server = MockServer::start();
    keystone(&server);
    server.mock(|when, then| {
        when.method(GET).path("/volumes/vol-1");
        then.status(200);
    });
    server.mock(|when, then| {
        when.method(POST).path("/volumes/vol-1/action");
        then.status(400)
            .json_body(json!({"error": {"code": 400, "message": "bad type"}}));
    });

    vkc(&server)
        .args(["volume", "retype", "vol-1", "--type", "bogus"])
        .assert()
        .code(1)
        .stdout(contains("Error: 400 / Bad Request"))
        .stdout(contains("bad type"));
}

#[test]
fn unknown_command_prints_usage_and_exits_one() {
    let server = MockServer::start();
    keystone(&server);

    vkc(&server)
        .args(["volume", "delete", "vol-1"])
        .assert()
        .code(1)
        .stdout(contains("Error: Unknown command"))
        .stdout(contains("Usage:"));
}

#[test]
fn parse_error_prints_message_and_usage() {
    let server = MockServer::start();
    keystone(&server);

    vkc(&server)
        .args(["volume"])
        .assert()
        .code(1)
        .stdout(contains("Error: Missing positional argument action"))
        .stdout(contains("Usage:"));
}
