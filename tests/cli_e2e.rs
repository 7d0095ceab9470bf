//! End-to-end CLI tests for the titanmxf binary.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENV_VARS: [&str; 4] = [
    "TITANTV_USERNAME",
    "TITANTV_PASSWORD",
    "TITANTV_USER_ID",
    "TITANTV_LINEUP_ID",
];

fn base_command(work_dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("titanmxf").expect("binary builds");
    // Isolate from the developer's real credentials and any .env file
    cmd.current_dir(work_dir);
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd
}

/// Test that --help displays usage information and exits with code 0.
#[test]
fn test_binary_help_displays_usage() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    base_command(tmp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Fetch TitanTV guide listings"));
}

/// Test that --version displays version and exits with code 0.
#[test]
fn test_binary_version_displays_version() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    base_command(tmp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("titanmxf"));
}

/// Test that invalid flags cause non-zero exit.
#[test]
fn test_binary_invalid_flag_returns_error() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    base_command(tmp.path())
        .arg("--invalid-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

/// Missing credentials abort before any network access.
#[test]
fn test_binary_missing_credentials_exits_nonzero() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    base_command(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "missing required environment variables",
        ));
}

/// Full pipeline against a mock provider: login, fetches, extraction,
/// and an MXF file on disk.
#[tokio::test(flavor = "multi_thread")]
async fn test_binary_full_run_writes_mxf() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(
            ResponseTemplate::new(200).insert_header("Set-Cookie", "TitanSession=abc; Path=/"),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/user/u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "userId": "12345", "loginName": "guideuser",
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/lineup/u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "lineups": [{"lineupId": "L1", "lineupName": "Local Broadcast"}]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/channel/u1/L1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "channels": [{"channelIndex": 5, "callSign": "WXYZ", "network": "ABC",
                          "majorChannel": 7, "minorChannel": 1}]
        })))
        .mount(&server)
        .await;

    // The schedule start segment is the current wall-clock minute
    Mock::given(method("GET"))
        .and(path_regex(r"^/api/schedule/u1/L1/\d{12}/2880$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "channels": [{"channelIndex": 5, "days": [{"events": [
                {"programId": "P1", "title": "News at Five",
                 "startTime": "20250101170000", "duration": 30,
                 "displayGenre": "News"},
            ]}]}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tmp = tempfile::TempDir::new().expect("temp dir");
    let output = tmp.path().join("out/listings.mxf");
    let data_dir = tmp.path().join("data");

    let base_url = server.uri();
    let output_arg = output.clone();
    let data_dir_arg = data_dir.clone();
    let work_dir = tmp.path().to_path_buf();
    let assert = tokio::task::spawn_blocking(move || {
        let mut cmd = base_command(&work_dir);
        cmd.env("TITANTV_USERNAME", "viewer")
            .env("TITANTV_PASSWORD", "pw")
            .env("TITANTV_USER_ID", "u1")
            .env("TITANTV_LINEUP_ID", "L1")
            .arg("--base-url")
            .arg(base_url)
            .arg("--days")
            .arg("2")
            .arg("--save-json")
            .arg("--data-dir")
            .arg(data_dir_arg)
            .arg("-o")
            .arg(output_arg)
            .assert()
    })
    .await
    .expect("command task");
    assert.success();

    let xml = std::fs::read_to_string(&output).expect("MXF file written");
    assert!(xml.starts_with("<?xml version=\"1.0\""));
    assert!(xml.contains("<Program id=\"P1\""));
    assert!(xml.contains("<ScheduleEntries service=\"s5\">"));
    assert!(xml.contains("<Service id=\"s5\""));

    // --save-json dumped each fetched document
    for dump in ["user.json", "lineup.json", "channels.json", "schedule.json"] {
        assert!(data_dir.join(dump).exists(), "missing dump {dump}");
    }
}
