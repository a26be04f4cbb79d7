//! ---
//! engage_section: "07-testing-qa"
//! engage_subsection: "integration-tests"
//! engage_type: "source"
//! engage_scope: "code"
//! engage_description: "Rallypoint server configuration and peering files."
//! engage_version: "v0.0.0-prealpha"
//! engage_owner: "tbd"
//! ---
use std::fs;

use engage_model::{
    Descriptor, FsFileSource, MemoryFileSource, PeeringLoadError, RallypointServer,
};
use serde_json::json;

fn server_document(peering_file: &str) -> serde_json::Value {
    json!({
        "id": "rp-east",
        "certificate": {"certificate": "@/etc/rp/server.pem", "key": "@/etc/rp/server.key"},
        "peeringConfigurationFileName": peering_file,
        "clientTls": {"verifyPeers": true, "caCertificates": ["@/etc/rp/ca.pem"]},
        "tls": {"verifyPeers": false}
    })
}

fn staged_files() -> MemoryFileSource {
    MemoryFileSource::new()
        .with_file("/etc/rp/server.pem", "SERVER-CERT")
        .with_file("/etc/rp/server.key", "SERVER-KEY")
        .with_file("/etc/rp/peer.pem", "PEER-CERT")
        .with_file(
            "/etc/rp/peering.json",
            json!({
                "id": "mesh-1",
                "version": 3,
                "peers": [
                    {"id": "rp-west", "host": {"address": "10.0.0.2", "port": 7443},
                     "certificate": {"certificate": "@/etc/rp/peer.pem", "key": "@/etc/rp/absent.key"}},
                    {"id": "rp-north", "enabled": false}
                ]
            })
            .to_string(),
        )
}

#[test]
fn server_reads_client_tls_and_resolves_its_certificate() {
    let files = staged_files();
    let server = RallypointServer::decode_with(&server_document(""), &files).unwrap();

    assert_eq!(server.certificate.certificate, "SERVER-CERT");
    assert_eq!(server.certificate.key, "SERVER-KEY");
    assert!(server.tls.verify_peers, "tls is read from clientTls");
    assert_eq!(server.tls.ca_certificates, vec!["@/etc/rp/ca.pem".to_string()]);
    assert_eq!(server.listen_port, 7443);

    let encoded = server.encode();
    assert_eq!(encoded["tls"]["verifyPeers"], true);
    assert!(encoded.get("clientTls").is_none());
    assert!(encoded.get("peeringConfiguration").is_none());
}

#[test]
fn peering_configuration_loads_with_nested_secrets() {
    let files = staged_files();
    let mut server =
        RallypointServer::decode_with(&server_document("/etc/rp/peering.json"), &files).unwrap();

    let peering = server.load_peering_configuration(&files).unwrap();
    assert_eq!(peering.id, "mesh-1");
    assert_eq!(peering.version, 3);
    assert!(peering.duplicate_peer_ids().is_empty());

    let west = peering.peer("rp-west").unwrap();
    assert_eq!(west.certificate.certificate, "PEER-CERT");
    assert_eq!(west.certificate.key, "");
    assert_eq!(west.host.port, 7443);

    let enabled: Vec<&str> = peering.enabled_peers().map(|peer| peer.id.as_str()).collect();
    assert_eq!(enabled, vec!["rp-west"]);

    assert_eq!(server.peering_configuration.peers.len(), 2);
    assert!(server.encode().get("peeringConfiguration").is_none());
}

#[test]
fn peering_load_failures_are_typed() {
    let files = staged_files();
    let mut unconfigured = RallypointServer::decode_with(&server_document(""), &files).unwrap();
    assert!(matches!(
        unconfigured.load_peering_configuration(&files),
        Err(PeeringLoadError::NotConfigured)
    ));

    let mut missing =
        RallypointServer::decode_with(&server_document("/etc/rp/nowhere.json"), &files).unwrap();
    assert!(matches!(
        missing.load_peering_configuration(&files),
        Err(PeeringLoadError::Io { .. })
    ));

    let files = staged_files().with_file("/etc/rp/broken.json", "[1, 2, 3]");
    let mut broken =
        RallypointServer::decode_with(&server_document("/etc/rp/broken.json"), &files).unwrap();
    assert!(matches!(
        broken.load_peering_configuration(&files),
        Err(PeeringLoadError::Decode { .. })
    ));
}

#[test]
fn peering_file_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let peering = dir.path().join("peering.json");
    fs::write(&peering, r#"{"id": "disk-mesh", "peers": [{"id": "a"}, {"id": "a"}]}"#).unwrap();

    let mut server = RallypointServer::default();
    server.id = "rp-disk".into();
    server.peering_configuration_file_name = peering.display().to_string();

    let loaded = server.load_peering_configuration(&FsFileSource).unwrap();
    assert_eq!(loaded.id, "disk-mesh");
    assert_eq!(loaded.duplicate_peer_ids(), vec!["a"]);
}
