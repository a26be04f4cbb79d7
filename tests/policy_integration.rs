//! ---
//! engage_section: "07-testing-qa"
//! engage_subsection: "integration-tests"
//! engage_type: "source"
//! engage_scope: "code"
//! engage_description: "Engine policy documents loaded from disk with secret indirection."
//! engage_version: "v0.0.0-prealpha"
//! engage_owner: "tbd"
//! ---
use std::fs;

use engage_model::{Descriptor, EnginePolicy, FsFileSource, LogLevel, MemoryFileSource};
use serde_json::json;

fn policy_document(cert: &str, key: &str) -> serde_json::Value {
    json!({
        "dataDirectory": "/var/lib/engage",
        "licensing": {"entitlement": "ent-1", "key": "lic-1"},
        "security": {"certificate": {"certificate": cert, "key": key}},
        "networking": {"defaultNic": "eth0", "rtpJitterMaxMs": "slow"},
        "audio": {"outputChannels": 1},
        "discovery": {"ssdp": {"enabled": true, "searchTerms": ["engage", 7]}},
        "logging": {"maxLevel": 9, "enableSyslog": true},
        "internals": {"maxTxSecs": 120},
        "timelines": {"storageRoot": "/var/lib/engage/timeline", "security": {"certificate": cert}}
    })
}

#[test]
fn policy_from_disk_resolves_every_secret_reference() {
    let dir = tempfile::tempdir().unwrap();
    let cert = dir.path().join("engine.pem");
    let key = dir.path().join("engine.key");
    fs::write(&cert, "CERT-BODY").unwrap();
    fs::write(&key, "KEY-BODY").unwrap();

    let tree = policy_document(
        &format!("@{}", cert.display()),
        &format!("@{}", key.display()),
    );
    let policy = EnginePolicy::decode_with(&tree, &FsFileSource).unwrap();

    assert_eq!(policy.security.certificate.certificate, "CERT-BODY");
    assert_eq!(policy.security.certificate.key, "KEY-BODY");
    assert_eq!(policy.timelines.security.certificate, "CERT-BODY");
    assert_eq!(policy.timelines.security.key, "");
}

#[test]
fn malformed_values_fall_back_without_disturbing_siblings() {
    let files = MemoryFileSource::new();
    let policy = EnginePolicy::decode_with(&policy_document("inline", "inline"), &files).unwrap();

    assert_eq!(policy.networking.default_nic, "eth0");
    assert_eq!(policy.networking.rtp_jitter_max_ms, 1000, "string falls back");
    assert_eq!(policy.networking.rtp_jitter_min_ms, 100);
    assert_eq!(policy.audio.output_channels, 1);
    assert!(policy.discovery.ssdp.enabled);
    assert!(
        policy.discovery.ssdp.search_terms.is_empty(),
        "strict string list falls back as a whole"
    );
    assert_eq!(policy.logging.max_level, LogLevel::Debug, "unknown ordinal falls back");
    assert!(policy.logging.enable_syslog);
    assert_eq!(policy.internals.max_tx_secs, 120);
    assert_eq!(policy.security.certificate.certificate, "inline");
}

#[test]
fn encoded_policy_carries_nine_sections_and_round_trips() {
    let files = MemoryFileSource::new();
    let policy = EnginePolicy::decode_with(&policy_document("c", "k"), &files).unwrap();
    let encoded = policy.encode();

    let keys: Vec<&str> = encoded
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys.len(), EnginePolicy::SECTIONS.len());
    for section in EnginePolicy::SECTIONS {
        assert!(keys.contains(&section), "missing section {section}");
    }

    let reparsed = EnginePolicy::decode_str(&policy.encode_to_string(Some(2))).unwrap();
    assert_eq!(reparsed, policy);
}

#[test]
fn empty_policy_text_is_rejected_but_null_is_default() {
    assert!(EnginePolicy::decode_str("   ").is_err());
    let from_null = EnginePolicy::decode_str("null").unwrap();
    assert_eq!(from_null, EnginePolicy::decode_str("{}").unwrap());
}
