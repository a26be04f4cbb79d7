//! ---
//! engage_section: "01-descriptor-model"
//! engage_subsection: "catalog"
//! engage_type: "source"
//! engage_scope: "code"
//! engage_description: "Engine policy and its nine sections."
//! engage_version: "v0.0.0-prealpha"
//! engage_owner: "tbd"
//! ---
//! The engine policy is handed to the engine once at initialisation. Each
//! section decodes independently, so a malformed section falls back to its
//! own defaults without disturbing its siblings.

use crate::catalog::group::{Advertising, NetworkAddress};
use crate::enums::LogLevel;
use crate::wire_descriptor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnginePolicyNetworking {
    pub default_nic: String,
    pub max_output_queue_packets: i32,
    pub rtp_jitter_min_ms: i32,
    pub rtp_jitter_max_ms: i32,
    pub rtp_late_packet_sequence_range: i32,
    pub rtp_late_packet_timestamp_range_ms: i32,
    pub rtp_inbound_processor_inactivity_ms: i32,
    pub multicast_rejoin_secs: i32,
    pub rp_leaf_connect_timeout_secs: i32,
    pub max_reconnect_pause_ms: i32,
    pub reconnect_failure_pause_increment_ms: i32,
    pub send_failure_pause_ms: i32,
    pub rallypoint_rt_test_interval_ms: i32,
}

impl Default for EnginePolicyNetworking {
    fn default() -> Self {
        Self {
            default_nic: String::new(),
            max_output_queue_packets: 100,
            rtp_jitter_min_ms: 100,
            rtp_jitter_max_ms: 1000,
            rtp_late_packet_sequence_range: 5,
            rtp_late_packet_timestamp_range_ms: 2000,
            rtp_inbound_processor_inactivity_ms: 500,
            multicast_rejoin_secs: 8,
            rp_leaf_connect_timeout_secs: 10,
            max_reconnect_pause_ms: 5000,
            reconnect_failure_pause_increment_ms: 500,
            send_failure_pause_ms: 1000,
            rallypoint_rt_test_interval_ms: 60000,
        }
    }
}

wire_descriptor! {
    EnginePolicyNetworking => "EnginePolicyNetworking" {
        default_nic: "defaultNic" [optional],
        max_output_queue_packets: "maxOutputQueuePackets" [optional(100)],
        rtp_jitter_min_ms: "rtpJitterMinMs" [optional(100)],
        rtp_jitter_max_ms: "rtpJitterMaxMs" [optional(1000)],
        rtp_late_packet_sequence_range: "rtpLatePacketSequenceRange" [optional(5)],
        rtp_late_packet_timestamp_range_ms: "rtpLatePacketTimestampRangeMs" [optional(2000)],
        rtp_inbound_processor_inactivity_ms: "rtpInboundProcessorInactivityMs" [optional(500)],
        multicast_rejoin_secs: "multicastRejoinSecs" [optional(8)],
        rp_leaf_connect_timeout_secs: "rpLeafConnectTimeoutSecs" [optional(10)],
        max_reconnect_pause_ms: "maxReconnectPauseMs" [optional(5000)],
        reconnect_failure_pause_increment_ms: "reconnectFailurePauseIncrementMs" [optional(500)],
        send_failure_pause_ms: "sendFailurePauseMs" [optional(1000)],
        rallypoint_rt_test_interval_ms: "rallypointRtTestIntervalMs" [optional(60000)],
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnginePolicyAudio {
    pub speaker_queue_ms: i32,
    pub microphone_queue_ms: i32,
    pub pcm_sampling_rate: i32,
    pub pcm_min_platform_sample_count: i32,
    pub pcm_max_samples_in_queue: i32,
    pub pcm_speaker_buffers: i32,
    pub output_channels: i32,
    pub output_gain_percentage: i32,
    pub allow_output_on_transmit: bool,
}

impl Default for EnginePolicyAudio {
    fn default() -> Self {
        Self {
            speaker_queue_ms: 250,
            microphone_queue_ms: 60,
            pcm_sampling_rate: 16000,
            pcm_min_platform_sample_count: 250,
            pcm_max_samples_in_queue: 1000,
            pcm_speaker_buffers: 5,
            output_channels: 2,
            output_gain_percentage: 0,
            allow_output_on_transmit: false,
        }
    }
}

wire_descriptor! {
    EnginePolicyAudio => "EnginePolicyAudio" {
        speaker_queue_ms: "speakerQueueMs" [optional(250)],
        microphone_queue_ms: "microphoneQueueMs" [optional(60)],
        pcm_sampling_rate: "pcmSamplingRate" [optional(16000)],
        pcm_min_platform_sample_count: "pcmMinPlatformSampleCount" [optional(250)],
        pcm_max_samples_in_queue: "pcmMaxSamplesInQueue" [optional(1000)],
        pcm_speaker_buffers: "pcmSpeakerBuffers" [optional(5)],
        output_channels: "outputChannels" [optional(2)],
        output_gain_percentage: "outputGainPercentage" [optional(0)],
        allow_output_on_transmit: "allowOutputOnTransmit" [optional(false)],
    }
}

/// Certificate and private key, each inline PEM or an `@path` reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityCertificate {
    pub certificate: String,
    pub key: String,
}

impl SecurityCertificate {
    pub fn is_empty(&self) -> bool {
        self.certificate.is_empty() && self.key.is_empty()
    }
}

wire_descriptor! {
    SecurityCertificate => "SecurityCertificate" {
        certificate: "certificate" [optional, secret],
        key: "key" [optional, secret],
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnginePolicySecurity {
    pub certificate: SecurityCertificate,
}

wire_descriptor! {
    EnginePolicySecurity => "EnginePolicySecurity" {
        certificate: "certificate" [optional],
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnginePolicyLogging {
    pub max_level: LogLevel,
    pub enable_syslog: bool,
}

wire_descriptor! {
    EnginePolicyLogging => "EnginePolicyLogging" {
        max_level: "maxLevel" [optional(LogLevel::Debug)],
        enable_syslog: "enableSyslog" [optional],
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnginePolicyLicensing {
    pub entitlement: String,
    pub key: String,
    pub activation_code: String,
    pub device_id: String,
}

wire_descriptor! {
    EnginePolicyLicensing => "EnginePolicyLicensing" {
        entitlement: "entitlement" [optional],
        key: "key" [optional],
        activation_code: "activationCode" [optional],
        device_id: "deviceId" [optional],
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoverySsdp {
    pub enabled: bool,
    pub interface_name: String,
    pub address: NetworkAddress,
    pub search_terms: Vec<String>,
    pub age_timeout_ms: i32,
    pub advertising: Advertising,
}

impl Default for DiscoverySsdp {
    fn default() -> Self {
        Self {
            enabled: false,
            interface_name: String::new(),
            address: NetworkAddress::default(),
            search_terms: Vec::new(),
            age_timeout_ms: 30000,
            advertising: Advertising::default(),
        }
    }
}

wire_descriptor! {
    DiscoverySsdp => "DiscoverySsdp" {
        enabled: "enabled" [optional(false)],
        interface_name: "interfaceName" [optional],
        address: "address" [optional],
        search_terms: "searchTerms" [optional],
        age_timeout_ms: "ageTimeoutMs" [optional(30000)],
        advertising: "advertising" [optional],
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoverySap {
    pub enabled: bool,
    pub interface_name: String,
    pub address: NetworkAddress,
    pub age_timeout_ms: i32,
    pub advertising: Advertising,
}

impl Default for DiscoverySap {
    fn default() -> Self {
        Self {
            enabled: false,
            interface_name: String::new(),
            address: NetworkAddress::default(),
            age_timeout_ms: 30000,
            advertising: Advertising::default(),
        }
    }
}

wire_descriptor! {
    DiscoverySap => "DiscoverySap" {
        enabled: "enabled" [optional(false)],
        interface_name: "interfaceName" [optional],
        address: "address" [optional],
        age_timeout_ms: "ageTimeoutMs" [optional(30000)],
        advertising: "advertising" [optional],
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryCistech {
    pub enabled: bool,
    pub interface_name: String,
    pub address: NetworkAddress,
    pub age_timeout_ms: i32,
}

impl Default for DiscoveryCistech {
    fn default() -> Self {
        Self {
            enabled: false,
            interface_name: String::new(),
            address: NetworkAddress::default(),
            age_timeout_ms: 30000,
        }
    }
}

wire_descriptor! {
    DiscoveryCistech => "DiscoveryCistech" {
        enabled: "enabled" [optional(false)],
        interface_name: "interfaceName" [optional],
        address: "address" [optional],
        age_timeout_ms: "ageTimeoutMs" [optional(30000)],
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryTrellisware {
    pub enabled: bool,
}

wire_descriptor! {
    DiscoveryTrellisware => "DiscoveryTrellisware" {
        enabled: "enabled" [optional(false)],
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryConfiguration {
    pub ssdp: DiscoverySsdp,
    pub sap: DiscoverySap,
    pub cistech: DiscoveryCistech,
    pub trellisware: DiscoveryTrellisware,
}

impl DiscoveryConfiguration {
    /// True when at least one discovery mechanism is switched on.
    pub fn any_enabled(&self) -> bool {
        self.ssdp.enabled || self.sap.enabled || self.cistech.enabled || self.trellisware.enabled
    }
}

wire_descriptor! {
    DiscoveryConfiguration => "DiscoveryConfiguration" {
        ssdp: "ssdp" [optional],
        sap: "sap" [optional],
        cistech: "cistech" [optional],
        trellisware: "trellisware" [optional],
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnginePolicyInternals {
    pub disable_watchdog: bool,
    pub watchdog_interval_ms: i32,
    pub watchdog_hang_detection_ms: i32,
    pub housekeeper_interval_ms: i32,
    pub max_tx_secs: i32,
}

impl Default for EnginePolicyInternals {
    fn default() -> Self {
        Self {
            disable_watchdog: false,
            watchdog_interval_ms: 5000,
            watchdog_hang_detection_ms: 2000,
            housekeeper_interval_ms: 1000,
            max_tx_secs: 30,
        }
    }
}

wire_descriptor! {
    EnginePolicyInternals => "EnginePolicyInternals" {
        disable_watchdog: "disableWatchdog" [optional(false)],
        watchdog_interval_ms: "watchdogIntervalMs" [optional(5000)],
        watchdog_hang_detection_ms: "watchdogHangDetectionMs" [optional(2000)],
        housekeeper_interval_ms: "housekeeperIntervalMs" [optional(1000)],
        max_tx_secs: "maxTxSecs" [optional(30)],
    }
}

/// Timeline recording and grooming. Ages are in seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnginePolicyTimelines {
    pub enabled: bool,
    pub storage_root: String,
    pub max_storage_mb: i32,
    pub max_event_age_secs: i64,
    pub max_events: i32,
    pub grooming_interval_secs: i64,
    pub security: SecurityCertificate,
}

impl Default for EnginePolicyTimelines {
    fn default() -> Self {
        Self {
            enabled: true,
            storage_root: String::new(),
            max_storage_mb: 128,
            max_event_age_secs: 86400 * 30,
            max_events: 1000,
            grooming_interval_secs: 60 * 30,
            security: SecurityCertificate::default(),
        }
    }
}

wire_descriptor! {
    EnginePolicyTimelines => "EnginePolicyTimelines" {
        enabled: "enabled" [optional(true)],
        storage_root: "storageRoot" [optional],
        max_storage_mb: "maxStorageMb" [optional(128)],
        max_event_age_secs: "maxEventAgeSecs" [optional(86400 * 30)],
        max_events: "maxEvents" [optional(1000)],
        grooming_interval_secs: "groomingIntervalSecs" [optional(60 * 30)],
        security: "security" [optional],
    }
}

/// Engine-wide policy handed over at initialisation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnginePolicy {
    pub data_directory: String,
    pub licensing: EnginePolicyLicensing,
    pub security: EnginePolicySecurity,
    pub networking: EnginePolicyNetworking,
    pub audio: EnginePolicyAudio,
    pub discovery: DiscoveryConfiguration,
    pub logging: EnginePolicyLogging,
    pub internals: EnginePolicyInternals,
    pub timelines: EnginePolicyTimelines,
}

impl EnginePolicy {
    /// Wire keys of the nine policy sections.
    pub const SECTIONS: [&'static str; 9] = [
        "dataDirectory",
        "licensing",
        "security",
        "networking",
        "audio",
        "discovery",
        "logging",
        "internals",
        "timelines",
    ];
}

wire_descriptor! {
    EnginePolicy => "EnginePolicy" {
        data_directory: "dataDirectory" [optional],
        licensing: "licensing" [optional],
        security: "security" [optional],
        networking: "networking" [optional],
        audio: "audio" [optional],
        discovery: "discovery" [optional],
        logging: "logging" [optional],
        internals: "internals" [optional],
        timelines: "timelines" [optional],
    }
}
