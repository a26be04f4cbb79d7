//! ---
//! engage_section: "01-descriptor-model"
//! engage_subsection: "catalog"
//! engage_type: "source"
//! engage_scope: "code"
//! engage_description: "Descriptor catalog and its type registry."
//! engage_version: "v0.0.0-prealpha"
//! engage_owner: "tbd"
//! ---

pub mod group;
pub mod identity;
pub mod license;
pub mod media;
pub mod platform;
pub mod policy;
pub mod rallypoint;

pub use group::{
    Advertising, EngageDiscoveredGroup, Group, GroupTimeline, Mission, NetworkAddress,
    NetworkTxOptions, Presence, Rallypoint, TalkgroupAsset,
};
pub use identity::{
    Connectivity, GroupAlias, GroupTalkers, Identity, Location, Power, PresenceDescriptor,
    TalkerInformation,
};
pub use license::LicenseDescriptor;
pub use media::{
    AdvancedTxParams, Audio, AudioDeviceDescriptor, BlobInfo, RtpHeader, TimelineQueryParameters,
    TxAudio,
};
pub use platform::PlatformDiscoveredService;
pub use policy::{
    DiscoveryCistech, DiscoveryConfiguration, DiscoverySap, DiscoverySsdp, DiscoveryTrellisware,
    EnginePolicy, EnginePolicyAudio, EnginePolicyInternals, EnginePolicyLicensing,
    EnginePolicyLogging, EnginePolicyNetworking, EnginePolicySecurity, EnginePolicyTimelines,
    SecurityCertificate,
};
pub use rallypoint::{
    PeeringConfiguration, PeeringLoadError, RallypointExternalHealthCheckResponder,
    RallypointPeer, RallypointServer, RallypointServerStatusReport, Tls,
};

use std::fmt;

use crate::codec::{self, Descriptor, Value};
use crate::indirection::FileSource;

/// Type-erased handle on one catalogued descriptor type.
#[derive(Clone, Copy)]
pub struct CatalogEntry {
    pub name: &'static str,
    example: fn() -> Value,
    normalize: fn(&Value, Option<&dyn FileSource>) -> codec::Result<Value>,
}

impl CatalogEntry {
    pub fn of<D: Descriptor>() -> Self {
        Self {
            name: D::NAME,
            example: default_example::<D>,
            normalize: normalize_tree::<D>,
        }
    }

    /// Encoded default instance.
    pub fn example(&self) -> Value {
        (self.example)()
    }

    /// Decode `tree` as this type and encode the result again. Secrets are
    /// resolved only when `files` is given.
    pub fn normalize(&self, tree: &Value, files: Option<&dyn FileSource>) -> codec::Result<Value> {
        (self.normalize)(tree, files)
    }
}

impl fmt::Debug for CatalogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogEntry").field("name", &self.name).finish()
    }
}

fn default_example<D: Descriptor>() -> Value {
    D::default().encode()
}

fn normalize_tree<D: Descriptor>(tree: &Value, files: Option<&dyn FileSource>) -> codec::Result<Value> {
    let decoded = match files {
        Some(files) => D::decode_with(tree, files)?,
        None => D::decode_raw(tree)?,
    };
    Ok(decoded.encode())
}

/// Every catalogued type, in documentation order.
pub fn entries() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry::of::<RtpHeader>(),
        CatalogEntry::of::<BlobInfo>(),
        CatalogEntry::of::<AdvancedTxParams>(),
        CatalogEntry::of::<Identity>(),
        CatalogEntry::of::<Location>(),
        CatalogEntry::of::<Power>(),
        CatalogEntry::of::<Connectivity>(),
        CatalogEntry::of::<GroupAlias>(),
        CatalogEntry::of::<PresenceDescriptor>(),
        CatalogEntry::of::<NetworkTxOptions>(),
        CatalogEntry::of::<NetworkAddress>(),
        CatalogEntry::of::<Rallypoint>(),
        CatalogEntry::of::<TxAudio>(),
        CatalogEntry::of::<AudioDeviceDescriptor>(),
        CatalogEntry::of::<Audio>(),
        CatalogEntry::of::<TalkerInformation>(),
        CatalogEntry::of::<GroupTalkers>(),
        CatalogEntry::of::<Presence>(),
        CatalogEntry::of::<Advertising>(),
        CatalogEntry::of::<GroupTimeline>(),
        CatalogEntry::of::<Group>(),
        CatalogEntry::of::<Mission>(),
        CatalogEntry::of::<LicenseDescriptor>(),
        CatalogEntry::of::<EnginePolicyNetworking>(),
        CatalogEntry::of::<EnginePolicyAudio>(),
        CatalogEntry::of::<SecurityCertificate>(),
        CatalogEntry::of::<EnginePolicySecurity>(),
        CatalogEntry::of::<EnginePolicyLogging>(),
        CatalogEntry::of::<EnginePolicyLicensing>(),
        CatalogEntry::of::<DiscoverySsdp>(),
        CatalogEntry::of::<DiscoverySap>(),
        CatalogEntry::of::<DiscoveryCistech>(),
        CatalogEntry::of::<DiscoveryTrellisware>(),
        CatalogEntry::of::<DiscoveryConfiguration>(),
        CatalogEntry::of::<EnginePolicyInternals>(),
        CatalogEntry::of::<EnginePolicyTimelines>(),
        CatalogEntry::of::<EnginePolicy>(),
        CatalogEntry::of::<TalkgroupAsset>(),
        CatalogEntry::of::<EngageDiscoveredGroup>(),
        CatalogEntry::of::<PeeringConfiguration>(),
        CatalogEntry::of::<RallypointPeer>(),
        CatalogEntry::of::<RallypointServerStatusReport>(),
        CatalogEntry::of::<RallypointExternalHealthCheckResponder>(),
        CatalogEntry::of::<Tls>(),
        CatalogEntry::of::<RallypointServer>(),
        CatalogEntry::of::<PlatformDiscoveredService>(),
        CatalogEntry::of::<TimelineQueryParameters>(),
    ]
}

/// Look up a catalogued type by its wire name.
pub fn find(name: &str) -> Option<CatalogEntry> {
    entries().into_iter().find(|entry| entry.name == name)
}
