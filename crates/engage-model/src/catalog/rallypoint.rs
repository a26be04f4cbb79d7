//! ---
//! engage_section: "01-descriptor-model"
//! engage_subsection: "catalog"
//! engage_type: "source"
//! engage_scope: "code"
//! engage_description: "Rallypoint server, TLS, and peering descriptors."
//! engage_version: "v0.0.0-prealpha"
//! engage_owner: "tbd"
//! ---

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::catalog::group::{duplicates, NetworkAddress};
use crate::catalog::policy::{DiscoveryConfiguration, SecurityCertificate};
use crate::codec::{DecodeError, Descriptor};
use crate::indirection::FileSource;
use crate::wire_descriptor;

/// Another Rallypoint this server links to. `id` is unique within a
/// peering configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RallypointPeer {
    pub id: String,
    pub enabled: bool,
    pub host: NetworkAddress,
    pub certificate: SecurityCertificate,
}

impl Default for RallypointPeer {
    fn default() -> Self {
        Self {
            id: String::new(),
            enabled: true,
            host: NetworkAddress::default(),
            certificate: SecurityCertificate::default(),
        }
    }
}

wire_descriptor! {
    RallypointPeer => "RallypointPeer" {
        id: "id" [required],
        enabled: "enabled" [optional(true)],
        host: "host" [optional],
        certificate: "certificate" [optional],
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RallypointServerStatusReport {
    pub file_name: String,
    pub interval_secs: i32,
}

impl Default for RallypointServerStatusReport {
    fn default() -> Self {
        Self {
            file_name: String::new(),
            interval_secs: 30,
        }
    }
}

wire_descriptor! {
    RallypointServerStatusReport => "RallypointServerStatusReport" {
        file_name: "fileName" [optional],
        interval_secs: "intervalSecs" [optional(30)],
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RallypointExternalHealthCheckResponder {
    pub listen_port: i32,
    pub immediate_close: bool,
}

impl Default for RallypointExternalHealthCheckResponder {
    fn default() -> Self {
        Self {
            listen_port: 0,
            immediate_close: true,
        }
    }
}

wire_descriptor! {
    RallypointExternalHealthCheckResponder => "RallypointExternalHealthCheckResponder" {
        listen_port: "listenPort" [optional(0)],
        immediate_close: "immediateClose" [optional(true)],
    }
}

/// Peer certificate acceptance rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tls {
    pub verify_peers: bool,
    pub allow_self_signed_certificates: bool,
    pub ca_certificates: Vec<String>,
    pub whitelisted_subjects: Vec<String>,
    pub whitelisted_issuers: Vec<String>,
    pub blacklisted_subjects: Vec<String>,
    pub blacklisted_issuers: Vec<String>,
}

impl Default for Tls {
    fn default() -> Self {
        Self {
            verify_peers: false,
            allow_self_signed_certificates: true,
            ca_certificates: Vec::new(),
            whitelisted_subjects: Vec::new(),
            whitelisted_issuers: Vec::new(),
            blacklisted_subjects: Vec::new(),
            blacklisted_issuers: Vec::new(),
        }
    }
}

wire_descriptor! {
    Tls => "Tls" {
        verify_peers: "verifyPeers" [optional(false)],
        allow_self_signed_certificates: "allowSelfSignedCertificates" [optional(true)],
        ca_certificates: "caCertificates" [optional],
        whitelisted_subjects: "whitelistedSubjects" [optional],
        whitelisted_issuers: "whitelistedIssuers" [optional],
        blacklisted_subjects: "blacklistedSubjects" [optional],
        blacklisted_issuers: "blacklistedIssuers" [optional],
    }
}

/// Peer list a server loads from its peering configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeeringConfiguration {
    pub id: String,
    pub version: i32,
    pub comments: String,
    pub certificate: SecurityCertificate,
    pub peers: Vec<RallypointPeer>,
    pub tls: Tls,
}

impl PeeringConfiguration {
    pub fn peer(&self, id: &str) -> Option<&RallypointPeer> {
        self.peers.iter().find(|peer| peer.id == id)
    }

    pub fn enabled_peers(&self) -> impl Iterator<Item = &RallypointPeer> {
        self.peers.iter().filter(|peer| peer.enabled)
    }

    /// Peer ids that occur more than once, in first-repeat order.
    pub fn duplicate_peer_ids(&self) -> Vec<&str> {
        duplicates(self.peers.iter().map(|peer| peer.id.as_str()))
    }
}

wire_descriptor! {
    PeeringConfiguration => "PeeringConfiguration" {
        id: "id" [optional],
        version: "version" [optional(0)],
        comments: "comments" [optional],
        certificate: "certificate" [optional],
        peers: "peers" [optional],
        tls: "tls" [optional],
    }
}

/// Errors loading a server's peering configuration file.
#[derive(Debug, Error)]
pub enum PeeringLoadError {
    #[error("no peering configuration file is configured")]
    NotConfigured,

    #[error("cannot read peering configuration {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid peering configuration {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },
}

/// Rallypoint relay server configuration.
///
/// `tls` is written under `"tls"` but read back from `"clientTls"`.
/// `peering_configuration` is runtime state filled by
/// [`RallypointServer::load_peering_configuration`] and never serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RallypointServer {
    pub id: String,
    pub listen_port: i32,
    pub interface_name: String,
    pub require_fips: bool,
    pub certificate: SecurityCertificate,
    pub allow_multicast_forwarding: bool,
    pub peering_configuration_file_name: String,
    pub peering_configuration_file_check_secs: i32,
    pub io_pools: i32,
    pub msd_token: u64,
    pub status_report: RallypointServerStatusReport,
    pub external_health_check_responder: RallypointExternalHealthCheckResponder,
    pub allow_peer_forwarding: bool,
    pub multicast_interface_name: String,
    pub tls: Tls,
    pub discovery: DiscoveryConfiguration,
    pub forward_discovered_groups: bool,
    pub peering_configuration: PeeringConfiguration,
}

impl Default for RallypointServer {
    fn default() -> Self {
        Self {
            id: String::new(),
            listen_port: 7443,
            interface_name: String::new(),
            require_fips: false,
            certificate: SecurityCertificate::default(),
            allow_multicast_forwarding: false,
            peering_configuration_file_name: String::new(),
            peering_configuration_file_check_secs: 60,
            io_pools: -1,
            msd_token: 0,
            status_report: RallypointServerStatusReport::default(),
            external_health_check_responder: RallypointExternalHealthCheckResponder::default(),
            allow_peer_forwarding: false,
            multicast_interface_name: String::new(),
            tls: Tls::default(),
            discovery: DiscoveryConfiguration::default(),
            forward_discovered_groups: false,
            peering_configuration: PeeringConfiguration::default(),
        }
    }
}

impl RallypointServer {
    /// Read and decode the file named by `peering_configuration_file_name`
    /// into the runtime peering configuration.
    pub fn load_peering_configuration(
        &mut self,
        files: &dyn FileSource,
    ) -> Result<&PeeringConfiguration, PeeringLoadError> {
        if self.peering_configuration_file_name.is_empty() {
            return Err(PeeringLoadError::NotConfigured);
        }
        let path = Path::new(&self.peering_configuration_file_name).to_path_buf();
        let text = files.read_text(&path).map_err(|source| PeeringLoadError::Io {
            path: path.clone(),
            source,
        })?;
        let peering = PeeringConfiguration::decode_str_with(&text, files)
            .map_err(|source| PeeringLoadError::Decode {
                path: path.clone(),
                source,
            })?;
        info!(
            server = %self.id,
            path = %path.display(),
            peers = peering.peers.len(),
            version = peering.version,
            "peering configuration loaded"
        );
        self.peering_configuration = peering;
        Ok(&self.peering_configuration)
    }
}

wire_descriptor! {
    RallypointServer => "RallypointServer" {
        id: "id" [required],
        listen_port: "listenPort" [optional(7443)],
        interface_name: "interfaceName" [optional],
        require_fips: "requireFips" [optional(false)],
        certificate: "certificate" [required],
        allow_multicast_forwarding: "allowMulticastForwarding" [optional(false)],
        peering_configuration_file_name: "peeringConfigurationFileName" [optional],
        peering_configuration_file_check_secs: "peeringConfigurationFileCheckSecs" [optional(60)],
        io_pools: "ioPools" [optional(-1)],
        msd_token: "msdToken" [optional(0)],
        status_report: "statusReport" [optional],
        external_health_check_responder: "externalHealthCheckResponder" [optional],
        allow_peer_forwarding: "allowPeerForwarding" [optional(false)],
        multicast_interface_name: "multicastInterfaceName" [optional],
        tls: "tls" [optional, read_as("clientTls")],
        discovery: "discovery" [optional],
        forward_discovered_groups: "forwardDiscoveredGroups" [optional(false)],
        peering_configuration: "peeringConfiguration" [transient],
    }
}
