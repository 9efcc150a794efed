use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("glucotv").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("glucotv"))
        .stdout(predicate::str::contains("render"))
        .stdout(predicate::str::contains("refresh"));
}

#[test]
fn render_mock_writes_jpeg() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("frame.jpg");
    let mut cmd = Command::cargo_bin("glucotv").unwrap();
    cmd.args(["render", "--mock", "--fonts", concat!(env!("CARGO_MANIFEST_DIR"), "/assets")])
        .arg("--out")
        .arg(&out);
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Wrote"));
    let img = image::open(&out).unwrap();
    assert_eq!((img.width(), img.height()), (240, 240));
}

#[test]
fn render_applies_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = dir.path().join("cfg.json");
    std::fs::write(&cfg, r#"{"size": {"width": 300, "height": 180}}"#).unwrap();
    let out = dir.path().join("frame.jpg");
    let mut cmd = Command::cargo_bin("glucotv").unwrap();
    cmd.arg("render").arg("--config").arg(&cfg).arg("--out").arg(&out);
    cmd.assert().success();
    let img = image::open(&out).unwrap();
    assert_eq!((img.width(), img.height()), (300, 180));
}

#[test]
fn render_rejects_malformed_config() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = dir.path().join("cfg.json");
    std::fs::write(&cfg, "{ not json").unwrap();
    let mut cmd = Command::cargo_bin("glucotv").unwrap();
    cmd.arg("render")
        .arg("--config")
        .arg(&cfg)
        .arg("--out")
        .arg(dir.path().join("x.jpg"));
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("parse config"));
}

#[test]
fn refresh_without_environment_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("glucotv").unwrap();
    cmd.arg("refresh")
        .arg("--env-file")
        .arg(dir.path().join("missing.env"))
        .env_remove("API_URL")
        .env_remove("SESSION_COOKIE")
        .env_remove("USERID_COOKIE")
        .env_remove("SMALLTV_URL")
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path());
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("missing environment variable"));
}

// Live test (opt-in): cargo test --features online
#[cfg(feature = "online")]
#[test]
fn refresh_online_once() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("glucotv").unwrap();
    cmd.arg("refresh")
        .arg("--save")
        .arg(dir.path().join("readings.csv"));
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("doUpload"));
}
