//! ---
//! engage_section: "03-engine-facade"
//! engage_subsection: "module"
//! engage_type: "source"
//! engage_scope: "code"
//! engage_description: "Engine notifications and their typed decoding."
//! engage_version: "v0.0.0-prealpha"
//! engage_owner: "tbd"
//! ---
use std::fmt;

use bytes::Bytes;
use serde_json::Value;
use tracing::debug;

use engage_model::codec::parse_text;
use engage_model::{BlobInfo, Descriptor, GroupTalkers, PresenceDescriptor, RtpHeader, TalkgroupAsset};

use crate::{FacadeError, Result};

macro_rules! notification_kinds {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// Every event the engine can raise.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum NotificationKind {
            $($variant),+
        }

        impl NotificationKind {
            pub const ALL: &'static [NotificationKind] = &[$(NotificationKind::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(NotificationKind::$variant => $name),+
                }
            }

            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(NotificationKind::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

notification_kinds! {
    EngineStarted => "engineStarted",
    EngineStopped => "engineStopped",
    RallypointPausingConnectionAttempt => "rallypointPausingConnectionAttempt",
    RallypointConnecting => "rallypointConnecting",
    RallypointConnected => "rallypointConnected",
    RallypointDisconnected => "rallypointDisconnected",
    RallypointRoundtripReport => "rallypointRoundtripReport",
    GroupCreated => "groupCreated",
    GroupCreateFailed => "groupCreateFailed",
    GroupDeleted => "groupDeleted",
    GroupConnected => "groupConnected",
    GroupConnectFailed => "groupConnectFailed",
    GroupDisconnected => "groupDisconnected",
    GroupJoined => "groupJoined",
    GroupJoinFailed => "groupJoinFailed",
    GroupLeft => "groupLeft",
    GroupMemberCountChanged => "groupMemberCountChanged",
    GroupNodeDiscovered => "groupNodeDiscovered",
    GroupNodeRediscovered => "groupNodeRediscovered",
    GroupNodeUndiscovered => "groupNodeUndiscovered",
    GroupRxStarted => "groupRxStarted",
    GroupRxEnded => "groupRxEnded",
    GroupRxSpeakersChanged => "groupRxSpeakersChanged",
    GroupRxMuted => "groupRxMuted",
    GroupRxUnmuted => "groupRxUnmuted",
    GroupTxStarted => "groupTxStarted",
    GroupTxEnded => "groupTxEnded",
    GroupTxFailed => "groupTxFailed",
    GroupTxUsurpedByPriority => "groupTxUsurpedByPriority",
    GroupMaxTxTimeExceeded => "groupMaxTxTimeExceeded",
    GroupAssetDiscovered => "groupAssetDiscovered",
    GroupAssetRediscovered => "groupAssetRediscovered",
    GroupAssetUndiscovered => "groupAssetUndiscovered",
    LicenseChanged => "licenseChanged",
    LicenseExpired => "licenseExpired",
    LicenseExpiring => "licenseExpiring",
    GroupBlobSent => "groupBlobSent",
    GroupBlobSendFailed => "groupBlobSendFailed",
    GroupBlobReceived => "groupBlobReceived",
    GroupRtpSent => "groupRtpSent",
    GroupRtpSendFailed => "groupRtpSendFailed",
    GroupRtpReceived => "groupRtpReceived",
    GroupRawSent => "groupRawSent",
    GroupRawSendFailed => "groupRawSendFailed",
    GroupRawReceived => "groupRawReceived",
    GroupTimelineEventStarted => "groupTimelineEventStarted",
    GroupTimelineEventUpdated => "groupTimelineEventUpdated",
    GroupTimelineEventEnded => "groupTimelineEventEnded",
    GroupTimelineReport => "groupTimelineReport",
    GroupTimelineReportFailed => "groupTimelineReportFailed",
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event as the engine raises it, before any payload is decoded.
///
/// `subject` is the group or rallypoint id, empty for engine and license
/// events. `payload` carries the JSON argument, `data` the binary one, and
/// `values` any numeric arguments in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct RawNotification {
    pub kind: NotificationKind,
    pub subject: String,
    pub payload: Option<String>,
    pub data: Option<Bytes>,
    pub values: Vec<u64>,
}

impl RawNotification {
    pub fn new(kind: NotificationKind, subject: impl Into<String>) -> Self {
        Self {
            kind,
            subject: subject.into(),
            payload: None,
            data: None,
            values: Vec::new(),
        }
    }

    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    pub fn with_data(mut self, data: impl Into<Bytes>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn with_values(mut self, values: impl IntoIterator<Item = u64>) -> Self {
        self.values = values.into_iter().collect();
        self
    }

    fn payload(&self) -> Result<&str> {
        self.payload.as_deref().ok_or(FacadeError::MissingPart {
            kind: self.kind,
            part: "payload",
        })
    }

    fn data(&self) -> Bytes {
        self.data.clone().unwrap_or_default()
    }

    fn value(&self, index: usize) -> Result<u64> {
        self.values.get(index).copied().ok_or(FacadeError::MissingPart {
            kind: self.kind,
            part: "value",
        })
    }

    fn descriptor<D: Descriptor>(&self, what: &'static str) -> Result<D> {
        D::decode_str(self.payload()?).map_err(|source| FacadeError::Decode { what, source })
    }

    fn json(&self, what: &'static str) -> Result<Value> {
        parse_text(self.payload()?).map_err(|source| FacadeError::Decode { what, source })
    }
}

/// Notification with its payload decoded through the descriptor catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    EngineStarted,
    EngineStopped,
    /// Connection state change of a rallypoint link.
    Rallypoint { kind: NotificationKind, id: String },
    RallypointRoundtrip {
        id: String,
        rt_ms: u32,
        quality_rating: u32,
    },
    /// Group lifecycle, rx, and tx transitions carrying only the group id.
    Group { kind: NotificationKind, id: String },
    MemberCountChanged { id: String, count: usize },
    Node {
        kind: NotificationKind,
        id: String,
        node: PresenceDescriptor,
    },
    RxSpeakersChanged { id: String, talkers: GroupTalkers },
    Asset {
        kind: NotificationKind,
        id: String,
        asset: TalkgroupAsset,
    },
    LicenseChanged,
    LicenseExpired,
    LicenseExpiring { secs_left: u64 },
    BlobReceived { id: String, info: BlobInfo, blob: Bytes },
    RtpReceived {
        id: String,
        header: RtpHeader,
        payload: Bytes,
    },
    RawReceived { id: String, raw: Bytes },
    /// Timeline records are engine-defined JSON and are passed through.
    Timeline {
        kind: NotificationKind,
        id: String,
        event: Value,
    },
}

impl EngineEvent {
    pub fn decode(raw: RawNotification) -> Result<Self> {
        use NotificationKind as K;

        let event = match raw.kind {
            K::EngineStarted => EngineEvent::EngineStarted,
            K::EngineStopped => EngineEvent::EngineStopped,
            K::RallypointPausingConnectionAttempt
            | K::RallypointConnecting
            | K::RallypointConnected
            | K::RallypointDisconnected => EngineEvent::Rallypoint {
                kind: raw.kind,
                id: raw.subject.clone(),
            },
            K::RallypointRoundtripReport => EngineEvent::RallypointRoundtrip {
                id: raw.subject.clone(),
                rt_ms: narrow(&raw, 0)?,
                quality_rating: narrow(&raw, 1)?,
            },
            K::GroupMemberCountChanged => EngineEvent::MemberCountChanged {
                id: raw.subject.clone(),
                count: narrow(&raw, 0)?,
            },
            K::GroupNodeDiscovered | K::GroupNodeRediscovered | K::GroupNodeUndiscovered => {
                EngineEvent::Node {
                    kind: raw.kind,
                    id: raw.subject.clone(),
                    node: raw.descriptor("PresenceDescriptor")?,
                }
            }
            K::GroupRxSpeakersChanged => EngineEvent::RxSpeakersChanged {
                id: raw.subject.clone(),
                talkers: raw.descriptor("GroupTalkers")?,
            },
            K::GroupAssetDiscovered | K::GroupAssetRediscovered | K::GroupAssetUndiscovered => {
                EngineEvent::Asset {
                    kind: raw.kind,
                    id: raw.subject.clone(),
                    asset: raw.descriptor("TalkgroupAsset")?,
                }
            }
            K::LicenseChanged => EngineEvent::LicenseChanged,
            K::LicenseExpired => EngineEvent::LicenseExpired,
            K::LicenseExpiring => {
                let text = raw.payload()?.trim();
                let secs_left = text.parse().map_err(|_| FacadeError::InvalidValue {
                    kind: raw.kind,
                    value: text.to_string(),
                })?;
                EngineEvent::LicenseExpiring { secs_left }
            }
            K::GroupBlobReceived => EngineEvent::BlobReceived {
                id: raw.subject.clone(),
                info: raw.descriptor("BlobInfo")?,
                blob: raw.data(),
            },
            K::GroupRtpReceived => EngineEvent::RtpReceived {
                id: raw.subject.clone(),
                header: raw.descriptor("RtpHeader")?,
                payload: raw.data(),
            },
            K::GroupRawReceived => EngineEvent::RawReceived {
                id: raw.subject.clone(),
                raw: raw.data(),
            },
            K::GroupTimelineEventStarted
            | K::GroupTimelineEventUpdated
            | K::GroupTimelineEventEnded
            | K::GroupTimelineReport => EngineEvent::Timeline {
                kind: raw.kind,
                id: raw.subject.clone(),
                event: raw.json("timeline record")?,
            },
            _ => EngineEvent::Group {
                kind: raw.kind,
                id: raw.subject.clone(),
            },
        };
        debug!(kind = %raw.kind, subject = %raw.subject, "notification decoded");
        Ok(event)
    }

    /// Group or rallypoint the event concerns, if any.
    pub fn subject(&self) -> Option<&str> {
        match self {
            EngineEvent::Rallypoint { id, .. }
            | EngineEvent::RallypointRoundtrip { id, .. }
            | EngineEvent::Group { id, .. }
            | EngineEvent::MemberCountChanged { id, .. }
            | EngineEvent::Node { id, .. }
            | EngineEvent::RxSpeakersChanged { id, .. }
            | EngineEvent::Asset { id, .. }
            | EngineEvent::BlobReceived { id, .. }
            | EngineEvent::RtpReceived { id, .. }
            | EngineEvent::RawReceived { id, .. }
            | EngineEvent::Timeline { id, .. } => Some(id.as_str()),
            EngineEvent::EngineStarted
            | EngineEvent::EngineStopped
            | EngineEvent::LicenseChanged
            | EngineEvent::LicenseExpired
            | EngineEvent::LicenseExpiring { .. } => None,
        }
    }
}

fn narrow<T: TryFrom<u64>>(raw: &RawNotification, index: usize) -> Result<T> {
    let value = raw.value(index)?;
    T::try_from(value).map_err(|_| FacadeError::InvalidValue {
        kind: raw.kind,
        value: value.to_string(),
    })
}
