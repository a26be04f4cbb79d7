//! ---
//! engage_section: "01-descriptor-model"
//! engage_subsection: "catalog"
//! engage_type: "source"
//! engage_scope: "code"
//! engage_description: "Identity, location, and presence descriptors."
//! engage_version: "v0.0.0-prealpha"
//! engage_owner: "tbd"
//! ---

use crate::enums::{
    DISPOSITION_AVAILABLE, DISPOSITION_BUSY, DISPOSITION_EMERGENCY, INVALID_LOCATION_VALUE,
};
use crate::wire_descriptor;

/// Who a node is, as advertised in presence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub node_id: String,
    pub user_id: String,
    pub display_name: String,
    pub avatar: String,
}

wire_descriptor! {
    Identity => "Identity" {
        node_id: "nodeId" [optional],
        user_id: "userId" [optional],
        display_name: "displayName" [optional],
        avatar: "avatar" [optional],
    }
}

/// Geographic fix. Altitude, direction, and speed hold
/// [`INVALID_LOCATION_VALUE`] until measured and are left off the wire while
/// they do.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub ts: u32,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub direction: f64,
    pub speed: f64,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            ts: 0,
            latitude: INVALID_LOCATION_VALUE,
            longitude: INVALID_LOCATION_VALUE,
            altitude: INVALID_LOCATION_VALUE,
            direction: INVALID_LOCATION_VALUE,
            speed: INVALID_LOCATION_VALUE,
        }
    }
}

impl Location {
    pub fn has_altitude(&self) -> bool {
        self.altitude != INVALID_LOCATION_VALUE
    }

    pub fn has_direction(&self) -> bool {
        self.direction != INVALID_LOCATION_VALUE
    }

    pub fn has_speed(&self) -> bool {
        self.speed != INVALID_LOCATION_VALUE
    }
}

wire_descriptor! {
    Location => "Location" {
        ts: "ts" [optional(0), omit_when(0)],
        latitude: "latitude" [required],
        longitude: "longitude" [required],
        altitude: "altitude" [optional(INVALID_LOCATION_VALUE), omit_when(INVALID_LOCATION_VALUE)],
        direction: "direction" [optional(INVALID_LOCATION_VALUE), omit_when(INVALID_LOCATION_VALUE)],
        speed: "speed" [optional(INVALID_LOCATION_VALUE), omit_when(INVALID_LOCATION_VALUE)],
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Power {
    pub source: i32,
    pub state: i32,
    pub level: i32,
}

wire_descriptor! {
    Power => "Power" {
        source: "source" [optional(0)],
        state: "state" [optional(0)],
        level: "level" [optional(0)],
    }
}

/// Link quality. A zero `kind` means nothing is known and the whole object
/// encodes as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Connectivity {
    pub kind: i32,
    pub strength: i32,
    pub rating: i32,
}

wire_descriptor! {
    Connectivity => "Connectivity" unset_when(|c: &Connectivity| c.kind == 0) {
        kind: "type" [optional(0)],
        strength: "strength" [optional(0)],
        rating: "rating" [optional(0)],
    }
}

/// Per-group alias a node presents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupAlias {
    pub group_id: String,
    pub alias: String,
}

wire_descriptor! {
    GroupAlias => "GroupAlias" {
        group_id: "groupId" [required],
        alias: "alias" [required],
    }
}

/// Presence beacon content exchanged between nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresenceDescriptor {
    /// Set on the local node's own descriptor; only emitted when true.
    pub is_self: bool,
    pub ts: u32,
    pub next_update: u32,
    pub identity: Identity,
    pub comment: String,
    /// Bit set of `DISPOSITION_*` values.
    pub disposition: u32,
    pub group_aliases: Vec<GroupAlias>,
    pub location: Location,
    pub custom: String,
    pub announce_on_receive: bool,
    pub connectivity: Connectivity,
    pub power: Power,
}

impl PresenceDescriptor {
    pub fn is_emergency(&self) -> bool {
        self.disposition & DISPOSITION_EMERGENCY != 0
    }

    pub fn is_available(&self) -> bool {
        self.disposition & DISPOSITION_AVAILABLE != 0
    }

    pub fn is_busy(&self) -> bool {
        self.disposition & DISPOSITION_BUSY != 0
    }

    /// Alias advertised for `group_id`, if any.
    pub fn alias_for(&self, group_id: &str) -> Option<&str> {
        self.group_aliases
            .iter()
            .find(|entry| entry.group_id == group_id)
            .map(|entry| entry.alias.as_str())
    }
}

wire_descriptor! {
    PresenceDescriptor => "PresenceDescriptor" {
        is_self: "self" [optional, omit_when(false)],
        ts: "ts" [optional],
        next_update: "nextUpdate" [optional],
        identity: "identity" [optional],
        comment: "comment" [optional],
        disposition: "disposition" [optional],
        group_aliases: "groupAliases" [optional],
        location: "location" [optional],
        custom: "custom" [optional],
        announce_on_receive: "announceOnReceive" [optional],
        connectivity: "connectivity" [optional],
        power: "power" [optional],
    }
}

/// One node currently transmitting on a group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TalkerInformation {
    pub alias: String,
    pub node_id: String,
}

wire_descriptor! {
    TalkerInformation => "TalkerInformation" {
        alias: "alias" [optional],
        node_id: "nodeId" [optional],
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupTalkers {
    pub list: Vec<TalkerInformation>,
}

wire_descriptor! {
    GroupTalkers => "GroupTalkers" {
        list: "list" [optional],
    }
}
