//! ---
//! engage_section: "01-descriptor-model"
//! engage_subsection: "catalog"
//! engage_type: "source"
//! engage_scope: "code"
//! engage_description: "Group configuration, relays, missions, and discovered groups."
//! engage_version: "v0.0.0-prealpha"
//! engage_owner: "tbd"
//! ---

use std::collections::HashSet;

use crate::catalog::media::{Audio, TxAudio};
use crate::enums::{GroupType, PresenceFormat, TxPriority};
use crate::wire_descriptor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkTxOptions {
    pub priority: TxPriority,
    pub ttl: i32,
}

impl Default for NetworkTxOptions {
    fn default() -> Self {
        Self {
            priority: TxPriority::Voice,
            ttl: 128,
        }
    }
}

wire_descriptor! {
    NetworkTxOptions => "NetworkTxOptions" {
        priority: "priority" [optional(TxPriority::Voice)],
        ttl: "ttl" [optional(128)],
    }
}

/// Host and port pair. Both keys must be present when decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NetworkAddress {
    pub address: String,
    pub port: i32,
}

impl NetworkAddress {
    pub fn new(address: impl Into<String>, port: i32) -> Self {
        Self {
            address: address.into(),
            port,
        }
    }
}

wire_descriptor! {
    NetworkAddress => "NetworkAddress" {
        address: "address" [required],
        port: "port" [required],
    }
}

/// Relay a group may tunnel through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rallypoint {
    pub host: NetworkAddress,
    /// PEM text, or `@path` naming a file that holds it.
    pub certificate: String,
    /// PEM text, or `@path` naming a file that holds it.
    pub certificate_key: String,
    pub verify_peer: bool,
    pub allow_self_signed_certificate: bool,
    pub ca_certificates: Vec<String>,
}

impl Default for Rallypoint {
    fn default() -> Self {
        Self {
            host: NetworkAddress::default(),
            certificate: String::new(),
            certificate_key: String::new(),
            verify_peer: false,
            allow_self_signed_certificate: true,
            ca_certificates: Vec::new(),
        }
    }
}

wire_descriptor! {
    Rallypoint => "Rallypoint" {
        host: "host" [required],
        certificate: "certificate" [required, secret],
        certificate_key: "certificateKey" [required, secret],
        verify_peer: "verifyPeer" [optional(false)],
        allow_self_signed_certificate: "allowSelfSignedCertificate" [optional(true)],
        ca_certificates: "caCertificates" [optional],
    }
}

/// Presence beaconing settings of a presence group.
///
/// Reset leaves `format` at `Unknown` with a 30 second interval; decoding an
/// empty object yields `Engage` and 60 seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presence {
    pub format: PresenceFormat,
    pub interval_secs: i32,
    pub force_on_audio_transmit: bool,
    pub listen_only: bool,
}

impl Default for Presence {
    fn default() -> Self {
        Self {
            format: PresenceFormat::Unknown,
            interval_secs: 30,
            force_on_audio_transmit: false,
            listen_only: false,
        }
    }
}

wire_descriptor! {
    Presence => "Presence" {
        format: "format" [optional(PresenceFormat::Engage)],
        interval_secs: "intervalSecs" [optional(60)],
        force_on_audio_transmit: "forceOnAudioTransmit" [optional(false)],
        listen_only: "listenOnly" [optional(false)],
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advertising {
    pub enabled: bool,
    pub interval_ms: i32,
    pub always_advertise: bool,
}

impl Default for Advertising {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_ms: 20000,
            always_advertise: false,
        }
    }
}

wire_descriptor! {
    Advertising => "Advertising" {
        enabled: "enabled" [optional(false)],
        interval_ms: "intervalMs" [optional(20000)],
        always_advertise: "alwaysAdvertise" [optional(false)],
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupTimeline {
    pub enabled: bool,
    pub max_audio_time_ms: i32,
}

impl Default for GroupTimeline {
    fn default() -> Self {
        Self {
            enabled: true,
            max_audio_time_ms: 30000,
        }
    }
}

wire_descriptor! {
    GroupTimeline => "GroupTimeline" {
        enabled: "enabled" [optional(true)],
        max_audio_time_ms: "maxAudioTimeMs" [optional(30000)],
    }
}

/// A communication channel. `id` is the natural key within a mission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Group {
    pub kind: GroupType,
    pub id: String,
    pub name: String,
    pub interface_name: String,
    pub rx: NetworkAddress,
    pub tx: NetworkAddress,
    pub tx_options: NetworkTxOptions,
    pub tx_audio: TxAudio,
    pub presence: Presence,
    pub crypto_password: String,
    pub debug_audio: bool,
    pub rallypoints: Vec<Rallypoint>,
    pub audio: Audio,
    pub timeline: GroupTimeline,
    pub alias: String,
    pub block_advertising: bool,
}

impl Group {
    pub fn new(kind: GroupType, id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn is_encrypted(&self) -> bool {
        !self.crypto_password.is_empty()
    }
}

wire_descriptor! {
    Group => "Group" {
        kind: "type" [required],
        id: "id" [required],
        name: "name" [optional],
        interface_name: "interfaceName" [optional],
        rx: "rx" [optional],
        tx: "tx" [optional],
        tx_options: "txOptions" [optional],
        tx_audio: "txAudio" [optional],
        presence: "presence" [optional],
        crypto_password: "cryptoPassword" [optional],
        debug_audio: "debugAudio" [optional(false)],
        rallypoints: "rallypoints" [optional],
        audio: "audio" [optional],
        timeline: "timeline" [optional],
        alias: "alias" [optional],
        block_advertising: "blockAdvertising" [optional(false)],
    }
}

/// Named collection of groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mission {
    pub id: String,
    pub name: String,
    pub groups: Vec<Group>,
}

impl Mission {
    pub fn group(&self, id: &str) -> Option<&Group> {
        self.groups.iter().find(|group| group.id == id)
    }

    /// Group ids that occur more than once, in first-repeat order.
    pub fn duplicate_group_ids(&self) -> Vec<&str> {
        duplicates(self.groups.iter().map(|group| group.id.as_str()))
    }
}

wire_descriptor! {
    Mission => "Mission" {
        id: "id" [required],
        name: "name" [required],
        groups: "groups" [optional],
    }
}

pub(crate) fn duplicates<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    let mut repeated = Vec::new();
    for key in keys {
        if !seen.insert(key) && !repeated.contains(&key) {
            repeated.push(key);
        }
    }
    repeated
}

/// A group hosted by a node, as reported by asset discovery.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TalkgroupAsset {
    pub node_id: String,
    pub group: Group,
}

wire_descriptor! {
    TalkgroupAsset => "TalkgroupAsset" {
        node_id: "nodeId" [optional],
        group: "group" [optional],
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngageDiscoveredGroup {
    pub id: String,
    pub rx: NetworkAddress,
    pub tx: NetworkAddress,
}

wire_descriptor! {
    EngageDiscoveredGroup => "EngageDiscoveredGroup" {
        id: "id" [optional],
        rx: "rx" [optional],
        tx: "tx" [optional],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{DecodeError, Descriptor};
    use crate::indirection::MemoryFileSource;
    use serde_json::json;

    fn rallypoint_tree(certificate: &str) -> serde_json::Value {
        json!({
            "host": { "address": "rp.example.net", "port": 7443 },
            "certificate": certificate,
            "certificateKey": "KEY"
        })
    }

    #[test]
    fn group_without_id_is_rejected() {
        let err = Group::decode(&json!({ "type": 1, "name": "Alpha" })).unwrap_err();
        assert!(matches!(err, DecodeError::MissingField { field: "id", .. }));
    }

    #[test]
    fn whole_valued_floats_decode_as_integers() {
        let options = NetworkTxOptions::decode(&json!({ "ttl": 64.0 })).unwrap();
        assert_eq!(options.ttl, 64);

        let address =
            NetworkAddress::decode(&json!({ "address": "1.2.3.4", "port": 5000.0 })).unwrap();
        assert_eq!(address.port, 5000);

        let group = Group::decode(&json!({
            "type": 1.0,
            "id": "G1",
            "txAudio": { "framingMs": 40.0 }
        }))
        .unwrap();
        assert_eq!(group.kind, GroupType::Audio);
        assert_eq!(group.tx_audio.framing_ms, 40);

        let fractional = NetworkTxOptions::decode(&json!({ "ttl": 64.5 })).unwrap();
        assert_eq!(fractional.ttl, 128);
    }

    #[test]
    fn group_with_unknown_type_ordinal_uses_default_variant() {
        let group = Group::decode(&json!({ "type": 42, "id": "G1" })).unwrap();
        assert_eq!(group.kind, GroupType::Unknown);
        assert_eq!(group.id, "G1");
    }

    #[test]
    fn group_round_trips_with_nested_settings() {
        let mut group = Group::new(GroupType::Audio, "{g-1}", "Alpha");
        group.rx = NetworkAddress::new("239.42.43.1", 49000);
        group.tx = NetworkAddress::new("239.42.43.1", 49000);
        group.tx_options.priority = TxPriority::Signaling;
        group.crypto_password = "secret".into();
        group.debug_audio = true;
        group.rallypoints.push(Rallypoint {
            host: NetworkAddress::new("rp", 7443),
            certificate: "CERT".into(),
            certificate_key: "KEY".into(),
            ca_certificates: vec!["CA1".into()],
            ..Rallypoint::default()
        });
        assert!(group.is_encrypted());
        assert_eq!(Group::decode(&group.encode()).unwrap(), group);
    }

    #[test]
    fn transmit_priority_out_of_table_falls_back_to_voice() {
        let options = NetworkTxOptions::decode(&json!({ "priority": 999, "ttl": 4 })).unwrap();
        assert_eq!(options.priority, TxPriority::Voice);
        assert_eq!(options.ttl, 4);
    }

    #[test]
    fn one_bad_rallypoint_clears_the_list() {
        let tree = json!({
            "type": 1,
            "id": "G1",
            "rallypoints": [ rallypoint_tree("A"), { "host": { "address": "x", "port": 1 } } ]
        });
        let group = Group::decode(&tree).unwrap();
        assert!(group.rallypoints.is_empty());
    }

    #[test]
    fn rallypoint_certificate_indirection() {
        let files = MemoryFileSource::new().with_file("/tmp/cert.pem", "HELLO");
        let resolved = Rallypoint::decode_with(&rallypoint_tree("@/tmp/cert.pem"), &files).unwrap();
        assert_eq!(resolved.certificate, "HELLO");
        assert!(resolved.allow_self_signed_certificate);

        let missing = Rallypoint::decode_with(&rallypoint_tree("@/tmp/nope.pem"), &files).unwrap();
        assert_eq!(missing.certificate, "");
        assert_eq!(missing.certificate_key, "KEY");
    }

    #[test]
    fn nested_rallypoints_resolve_through_group() {
        let files = MemoryFileSource::new().with_file("/k.pem", "PRIVATE");
        let mut rp = rallypoint_tree("CERT");
        rp["certificateKey"] = json!("@/k.pem");
        let tree = json!({ "type": 1, "id": "G1", "rallypoints": [rp] });
        let group = Group::decode_with(&tree, &files).unwrap();
        assert_eq!(group.rallypoints[0].certificate_key, "PRIVATE");
    }

    #[test]
    fn presence_decode_defaults_differ_from_reset() {
        let decoded = Presence::decode(&json!({})).unwrap();
        assert_eq!(decoded.format, PresenceFormat::Engage);
        assert_eq!(decoded.interval_secs, 60);
        assert_eq!(Presence::default().interval_secs, 30);
    }

    #[test]
    fn mission_lookup_and_duplicates() {
        let tree = json!({
            "id": "M1",
            "name": "Exercise",
            "groups": [
                { "type": 1, "id": "A" },
                { "type": 2, "id": "B" },
                { "type": 1, "id": "A" }
            ]
        });
        let mission = Mission::decode(&tree).unwrap();
        assert_eq!(mission.group("B").map(|g| g.kind), Some(GroupType::Presence));
        assert!(mission.group("C").is_none());
        assert_eq!(mission.duplicate_group_ids(), vec!["A"]);
    }

    #[test]
    fn mission_with_malformed_group_keeps_identity() {
        let tree = json!({ "id": "M1", "name": "N", "groups": [{ "name": "no id" }] });
        let mission = Mission::decode(&tree).unwrap();
        assert!(mission.groups.is_empty());
        assert!(Mission::decode(&json!({ "id": "M1" })).is_err());
    }
}
