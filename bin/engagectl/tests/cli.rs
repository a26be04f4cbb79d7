//! ---
//! engage_section: "06-operator-tooling"
//! engage_subsection: "integration-tests"
//! engage_type: "source"
//! engage_scope: "code"
//! engage_description: "Command-line behaviour of engagectl."
//! engage_version: "v0.0.0-prealpha"
//! engage_owner: "tbd"
//! ---
use std::fs;
use std::path::Path;

use assert_cmd::Command;
use serde_json::Value;

fn engagectl(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("engagectl").unwrap();
    cmd.current_dir(workdir)
        .env_remove("ENGAGECTL_CONFIG")
        .env("ENGAGE_LOG", "off");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

#[test]
fn version_flag_prints_package_version() {
    let dir = tempfile::tempdir().unwrap();
    let out = stdout_of(engagectl(dir.path()).arg("--version"));
    assert_eq!(out.trim(), format!("engagectl {}", env!("CARGO_PKG_VERSION")));
}

#[test]
fn schema_list_prints_every_type_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let out = stdout_of(engagectl(dir.path()).args(["schema", "list"]));
    let names: Vec<&str> = out.lines().collect();
    assert_eq!(names.len(), 47, "unexpected catalog listing: {out}");
    assert_eq!(names.first(), Some(&"RtpHeader"));
    assert_eq!(names.last(), Some(&"TimelineQueryParameters"));
    assert!(names.contains(&"EnginePolicy"));
}

#[test]
fn schema_dump_writes_selected_files() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("schema");
    let out = stdout_of(engagectl(dir.path()).args([
        "schema",
        "dump",
        "--out",
        out_dir.to_str().unwrap(),
        "--only",
        "Group",
        "--only",
        "Location",
    ]));

    assert!(
        out.find("Location").unwrap() < out.find("Group").unwrap(),
        "console output should follow catalog order"
    );
    for name in ["Location", "Group"] {
        let text = fs::read_to_string(out_dir.join(format!("{name}.json"))).unwrap();
        let tree: Value = serde_json::from_str(&text).unwrap();
        assert!(tree.is_object(), "{name}.json should hold an object");
    }
    assert!(!out_dir.join("RtpHeader.json").exists());

    let location = fs::read_to_string(out_dir.join("Location.json")).unwrap();
    assert!(
        location.starts_with("{\n   \""),
        "documentation should use three-space indentation"
    );
}

#[test]
fn schema_dump_rejects_unknown_types() {
    let dir = tempfile::tempdir().unwrap();
    engagectl(dir.path())
        .args(["schema", "dump", "--only", "Spaceship"])
        .assert()
        .failure();
}

#[test]
fn check_normalises_a_group_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("group.json");
    fs::write(&file, r#"{"type": 1, "id": "{g-1}", "name": "Ops", "txAudio": {}, "unknownKey": 5}"#).unwrap();

    let out = stdout_of(engagectl(dir.path()).args([
        "check",
        "--type",
        "Group",
        file.to_str().unwrap(),
    ]));
    let tree: Value = serde_json::from_str(out.trim()).unwrap();
    assert_eq!(tree["type"], 1);
    assert_eq!(tree["id"], "{g-1}");
    assert!(tree.get("unknownKey").is_none());
    assert_eq!(tree["txAudio"]["encoder"], 21, "decode fallbacks apply inside nested objects");
    assert_eq!(tree["txAudio"]["framingMs"], 60);
}

#[test]
fn check_fails_on_missing_required_field() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("group.json");
    fs::write(&file, r#"{"type": 1, "name": "Ops"}"#).unwrap();

    engagectl(dir.path())
        .args(["check", "--type", "Group", file.to_str().unwrap()])
        .assert()
        .failure();
}

#[test]
fn check_resolves_secret_references_unless_disabled() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("cert.pem"), "-----BEGIN CERTIFICATE-----").unwrap();
    let file = dir.path().join("rallypoint.json");
    fs::write(
        &file,
        r#"{"host": {"address": "rp.example.com", "port": 7443},
            "certificate": "@cert.pem", "certificateKey": "@missing.key"}"#,
    )
    .unwrap();

    let resolved: Value = serde_json::from_str(
        stdout_of(engagectl(dir.path()).args([
            "check",
            "--type",
            "Rallypoint",
            file.to_str().unwrap(),
        ]))
        .trim(),
    )
    .unwrap();
    assert_eq!(resolved["certificate"], "-----BEGIN CERTIFICATE-----");
    assert_eq!(resolved["certificateKey"], "");

    let raw: Value = serde_json::from_str(
        stdout_of(engagectl(dir.path()).args([
            "check",
            "--no-indirection",
            "--type",
            "Rallypoint",
            file.to_str().unwrap(),
        ]))
        .trim(),
    )
    .unwrap();
    assert_eq!(raw["certificate"], "@cert.pem");
}
