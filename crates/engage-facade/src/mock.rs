//! ---
//! engage_section: "03-engine-facade"
//! engage_subsection: "module"
//! engage_type: "source"
//! engage_scope: "code"
//! engage_description: "In-process engine double for tests and tooling."
//! engage_version: "v0.0.0-prealpha"
//! engage_owner: "tbd"
//! ---
use std::collections::{HashSet, VecDeque};

use indexmap::IndexMap;
use parking_lot::Mutex;
use serde_json::json;
use tracing::{debug, warn};

use engage_model::codec::to_text;
use engage_model::{
    AdvancedTxParams, BlobInfo, Descriptor, EnginePolicy, Group, GroupType, Identity,
    LicenseDescriptor, LicenseStatus, LogLevel, PlatformDiscoveredService, PresenceDescriptor,
    RtpHeader, TimelineQueryParameters, TxPriority,
};

use crate::{EngineFacade, NotificationKind, RawNotification, ResultCode};

#[derive(Debug, Clone)]
struct GroupState {
    group: Group,
    joined: bool,
    muted: bool,
    transmitting: bool,
    rx_tag: u16,
    volume: (i32, i32),
    presence: Option<PresenceDescriptor>,
    last_blob: Option<BlobInfo>,
    rtp_handlers: HashSet<u16>,
}

impl GroupState {
    fn new(group: Group) -> Self {
        Self {
            group,
            joined: false,
            muted: false,
            transmitting: false,
            rx_tag: 0,
            volume: (100, 100),
            presence: None,
            last_blob: None,
            rtp_handlers: HashSet::new(),
        }
    }
}

#[derive(Debug, Default)]
struct State {
    initialized: bool,
    started: bool,
    policy: EnginePolicy,
    identity: Identity,
    license: LicenseDescriptor,
    log_level: LogLevel,
    syslog: bool,
    groups: IndexMap<String, GroupState>,
    services: IndexMap<String, PlatformDiscoveredService>,
    notifications: VecDeque<RawNotification>,
}

impl State {
    fn notify(&mut self, kind: NotificationKind, subject: &str) {
        self.notifications.push_back(RawNotification::new(kind, subject));
    }

    fn ready(&self) -> Result<(), ResultCode> {
        if !self.initialized {
            Err(ResultCode::NotInitialized)
        } else if !self.started {
            Err(ResultCode::NotStarted)
        } else {
            Ok(())
        }
    }

    fn group_mut(&mut self, id: &str) -> Result<&mut GroupState, ResultCode> {
        self.ready()?;
        self.groups.get_mut(id).ok_or(ResultCode::InvalidParameters)
    }
}

fn decoded<D: Descriptor>(text: &str) -> Result<D, ResultCode> {
    D::decode_str(text).map_err(|err| {
        debug!(descriptor = D::NAME, error = %err, "rejecting malformed descriptor");
        ResultCode::InvalidParameters
    })
}

fn settle(outcome: Result<(), ResultCode>) -> ResultCode {
    outcome.err().unwrap_or(ResultCode::Ok)
}

fn attempt(op: impl FnOnce() -> Result<(), ResultCode>) -> ResultCode {
    settle(op())
}

/// In-process engine double.
///
/// Honours the initialize/start lifecycle, keeps created groups decoded,
/// allows one outstanding transmission per group, and queues the
/// notifications a real engine would raise, in the order it would raise
/// them. Nothing leaves the process.
#[derive(Debug, Default)]
pub struct MockEngine {
    state: Mutex<State>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a notification as though it arrived from the network.
    pub fn inject(&self, notification: RawNotification) {
        self.state.lock().notifications.push_back(notification);
    }

    pub fn pending_notifications(&self) -> usize {
        self.state.lock().notifications.len()
    }

    pub fn is_initialized(&self) -> bool {
        self.state.lock().initialized
    }

    pub fn is_started(&self) -> bool {
        self.state.lock().started
    }

    pub fn policy(&self) -> EnginePolicy {
        self.state.lock().policy.clone()
    }

    pub fn identity(&self) -> Identity {
        self.state.lock().identity.clone()
    }

    pub fn log_level(&self) -> LogLevel {
        self.state.lock().log_level
    }

    pub fn syslog_enabled(&self) -> bool {
        self.state.lock().syslog
    }

    /// Created group ids in creation order.
    pub fn group_ids(&self) -> Vec<String> {
        self.state.lock().groups.keys().cloned().collect()
    }

    pub fn group(&self, id: &str) -> Option<Group> {
        self.state.lock().groups.get(id).map(|state| state.group.clone())
    }

    pub fn is_joined(&self, id: &str) -> bool {
        self.state.lock().groups.get(id).is_some_and(|state| state.joined)
    }

    pub fn is_muted(&self, id: &str) -> bool {
        self.state.lock().groups.get(id).is_some_and(|state| state.muted)
    }

    pub fn is_transmitting(&self, id: &str) -> bool {
        self.state
            .lock()
            .groups
            .get(id)
            .is_some_and(|state| state.transmitting)
    }

    pub fn rx_tag(&self, id: &str) -> Option<u16> {
        self.state.lock().groups.get(id).map(|state| state.rx_tag)
    }

    pub fn rx_volume(&self, id: &str) -> Option<(i32, i32)> {
        self.state.lock().groups.get(id).map(|state| state.volume)
    }

    pub fn presence(&self, id: &str) -> Option<PresenceDescriptor> {
        self.state
            .lock()
            .groups
            .get(id)
            .and_then(|state| state.presence.clone())
    }

    pub fn last_blob_info(&self, id: &str) -> Option<BlobInfo> {
        self.state
            .lock()
            .groups
            .get(id)
            .and_then(|state| state.last_blob.clone())
    }

    pub fn has_rtp_handler(&self, id: &str, payload_id: u16) -> bool {
        self.state
            .lock()
            .groups
            .get(id)
            .is_some_and(|state| state.rtp_handlers.contains(&payload_id))
    }

    pub fn service(&self, id: &str) -> Option<PlatformDiscoveredService> {
        self.state.lock().services.get(id).cloned()
    }

    fn begin_tx(&self, id: &str, priority: i64) -> ResultCode {
        let mut state = self.state.lock();
        attempt(|| {
            if TxPriority::from_ordinal(priority).is_none() {
                return Err(ResultCode::InvalidParameters);
            }
            let group = state.group_mut(id)?;
            if group.group.kind != GroupType::Audio {
                return Err(ResultCode::InvalidParameters);
            }
            if group.transmitting {
                return Err(ResultCode::GeneralFailure);
            }
            let kind = if group.joined {
                group.transmitting = true;
                NotificationKind::GroupTxStarted
            } else {
                NotificationKind::GroupTxFailed
            };
            state.notify(kind, id);
            Ok(())
        })
    }

    fn send(
        &self,
        id: &str,
        sent: NotificationKind,
        failed: NotificationKind,
        accept: impl FnOnce(&mut GroupState) -> Result<(), ResultCode>,
    ) -> ResultCode {
        let mut state = self.state.lock();
        attempt(|| {
            let group = state.group_mut(id)?;
            accept(group)?;
            let kind = if group.joined { sent } else { failed };
            state.notify(kind, id);
            Ok(())
        })
    }
}

impl EngineFacade for MockEngine {
    fn initialize(
        &self,
        policy: Option<&str>,
        identity: Option<&str>,
        _temp_storage_path: Option<&str>,
    ) -> ResultCode {
        let mut state = self.state.lock();
        if state.initialized {
            return ResultCode::AlreadyInitialized;
        }
        attempt(|| {
            let policy = policy.map(decoded::<EnginePolicy>).transpose()?;
            let identity = identity.map(decoded::<Identity>).transpose()?;
            state.policy = policy.unwrap_or_default();
            state.identity = identity.unwrap_or_default();
            state.log_level = state.policy.logging.max_level;
            state.syslog = state.policy.logging.enable_syslog;
            state.initialized = true;
            debug!(node = %state.identity.node_id, "mock engine initialized");
            Ok(())
        })
    }

    fn shutdown(&self) -> ResultCode {
        let mut state = self.state.lock();
        if !state.initialized {
            return ResultCode::NotInitialized;
        }
        *state = State::default();
        ResultCode::Ok
    }

    fn start(&self) -> ResultCode {
        let mut state = self.state.lock();
        if !state.initialized {
            return ResultCode::NotInitialized;
        }
        if !state.started {
            state.started = true;
            state.notify(NotificationKind::EngineStarted, "");
        }
        ResultCode::Ok
    }

    fn stop(&self) -> ResultCode {
        let mut state = self.state.lock();
        if let Err(code) = state.ready() {
            return code;
        }
        let joined: Vec<String> = state
            .groups
            .iter()
            .filter(|(_, group)| group.joined)
            .map(|(id, _)| id.clone())
            .collect();
        for id in joined {
            if let Some(group) = state.groups.get_mut(&id) {
                group.joined = false;
                group.transmitting = false;
            }
            state.notify(NotificationKind::GroupDisconnected, &id);
        }
        state.started = false;
        state.notify(NotificationKind::EngineStopped, "");
        ResultCode::Ok
    }

    fn create_group(&self, configuration: &str) -> ResultCode {
        let mut state = self.state.lock();
        attempt(|| {
            state.ready()?;
            let group: Group = decoded(configuration)?;
            if state.groups.contains_key(&group.id) {
                warn!(group = %group.id, "group already exists");
                state.notify(NotificationKind::GroupCreateFailed, &group.id);
                return Ok(());
            }
            let id = group.id.clone();
            state.groups.insert(id.clone(), GroupState::new(group));
            state.notify(NotificationKind::GroupCreated, &id);
            Ok(())
        })
    }

    fn delete_group(&self, id: &str) -> ResultCode {
        let mut state = self.state.lock();
        attempt(|| {
            let group = state.group_mut(id)?;
            let was_joined = group.joined;
            state.groups.shift_remove(id);
            if was_joined {
                state.notify(NotificationKind::GroupDisconnected, id);
            }
            state.notify(NotificationKind::GroupDeleted, id);
            Ok(())
        })
    }

    fn join_group(&self, id: &str) -> ResultCode {
        let mut state = self.state.lock();
        attempt(|| {
            let group = state.group_mut(id)?;
            if group.joined {
                return Ok(());
            }
            group.joined = true;
            state.notify(NotificationKind::GroupConnected, id);
            state.notify(NotificationKind::GroupJoined, id);
            Ok(())
        })
    }

    fn leave_group(&self, id: &str) -> ResultCode {
        let mut state = self.state.lock();
        attempt(|| {
            let group = state.group_mut(id)?;
            if !group.joined {
                return Ok(());
            }
            let was_transmitting = group.transmitting;
            group.joined = false;
            group.transmitting = false;
            if was_transmitting {
                state.notify(NotificationKind::GroupTxEnded, id);
            }
            state.notify(NotificationKind::GroupDisconnected, id);
            state.notify(NotificationKind::GroupLeft, id);
            Ok(())
        })
    }

    fn begin_group_tx(&self, id: &str, priority: i32, _flags: u32) -> ResultCode {
        self.begin_tx(id, i64::from(priority))
    }

    fn begin_group_tx_advanced(&self, id: &str, params: &str) -> ResultCode {
        match decoded::<AdvancedTxParams>(params) {
            Ok(params) => self.begin_tx(id, i64::from(params.priority)),
            Err(code) => code,
        }
    }

    fn end_group_tx(&self, id: &str) -> ResultCode {
        let mut state = self.state.lock();
        attempt(|| {
            let group = state.group_mut(id)?;
            if group.transmitting {
                group.transmitting = false;
                state.notify(NotificationKind::GroupTxEnded, id);
            }
            Ok(())
        })
    }

    fn set_group_rx_tag(&self, id: &str, tag: u16) -> ResultCode {
        let mut state = self.state.lock();
        settle(state.group_mut(id).map(|group| group.rx_tag = tag))
    }

    fn mute_group_rx(&self, id: &str) -> ResultCode {
        let mut state = self.state.lock();
        attempt(|| {
            state.group_mut(id)?.muted = true;
            state.notify(NotificationKind::GroupRxMuted, id);
            Ok(())
        })
    }

    fn unmute_group_rx(&self, id: &str) -> ResultCode {
        let mut state = self.state.lock();
        attempt(|| {
            state.group_mut(id)?.muted = false;
            state.notify(NotificationKind::GroupRxUnmuted, id);
            Ok(())
        })
    }

    fn set_group_rx_volume(&self, id: &str, left: i32, right: i32) -> ResultCode {
        if left < 0 || right < 0 {
            return ResultCode::InvalidParameters;
        }
        let mut state = self.state.lock();
        settle(state.group_mut(id).map(|group| group.volume = (left, right)))
    }

    fn update_presence_descriptor(
        &self,
        id: &str,
        descriptor: &str,
        _force_beacon: bool,
    ) -> ResultCode {
        let mut state = self.state.lock();
        attempt(|| {
            let descriptor: PresenceDescriptor = decoded(descriptor)?;
            let group = state.group_mut(id)?;
            if group.group.kind != GroupType::Presence {
                return Err(ResultCode::InvalidParameters);
            }
            group.presence = Some(descriptor);
            Ok(())
        })
    }

    fn version(&self) -> String {
        format!("mock-{}", env!("CARGO_PKG_VERSION"))
    }

    fn active_license_descriptor(&self) -> String {
        self.state.lock().license.encode_to_string(None)
    }

    fn license_descriptor(
        &self,
        entitlement: &str,
        key: &str,
        activation_code: Option<&str>,
    ) -> String {
        let status = if entitlement.is_empty() {
            LicenseStatus::NullEntitlementKey
        } else if key.is_empty() {
            LicenseStatus::NullLicenseKey
        } else {
            LicenseStatus::Ok
        };
        let license = LicenseDescriptor {
            entitlement: entitlement.to_string(),
            key: key.to_string(),
            activation_code: activation_code.unwrap_or_default().to_string(),
            status,
            ..LicenseDescriptor::default()
        };
        license.encode_to_string(None)
    }

    fn update_license(
        &self,
        entitlement: &str,
        key: &str,
        activation_code: Option<&str>,
    ) -> ResultCode {
        if entitlement.is_empty() || key.is_empty() {
            return ResultCode::InvalidParameters;
        }
        let evaluated = self.license_descriptor(entitlement, key, activation_code);
        let mut state = self.state.lock();
        if !state.initialized {
            return ResultCode::NotInitialized;
        }
        match decoded::<LicenseDescriptor>(&evaluated) {
            Ok(license) => {
                state.license = license;
                state.notify(NotificationKind::LicenseChanged, "");
                ResultCode::Ok
            }
            Err(code) => code,
        }
    }

    fn send_group_blob(&self, id: &str, _blob: &[u8], params: &str) -> ResultCode {
        let info = match decoded::<BlobInfo>(params) {
            Ok(info) => info,
            Err(code) => return code,
        };
        self.send(
            id,
            NotificationKind::GroupBlobSent,
            NotificationKind::GroupBlobSendFailed,
            |group| {
                group.last_blob = Some(info);
                Ok(())
            },
        )
    }

    fn send_group_rtp(&self, id: &str, _payload: &[u8], params: &str) -> ResultCode {
        let header = match decoded::<RtpHeader>(params) {
            Ok(header) if !header.is_unset() => header,
            Ok(_) => return ResultCode::InvalidParameters,
            Err(code) => return code,
        };
        debug!(group = id, pt = header.pt, "mock rtp send");
        self.send(
            id,
            NotificationKind::GroupRtpSent,
            NotificationKind::GroupRtpSendFailed,
            |group| match group.group.kind {
                GroupType::Audio => Ok(()),
                _ => Err(ResultCode::InvalidParameters),
            },
        )
    }

    fn send_group_raw(&self, id: &str, _raw: &[u8], _params: &str) -> ResultCode {
        self.send(
            id,
            NotificationKind::GroupRawSent,
            NotificationKind::GroupRawSendFailed,
            |group| match group.group.kind {
                GroupType::Raw => Ok(()),
                _ => Err(ResultCode::InvalidParameters),
            },
        )
    }

    fn register_group_rtp_handler(&self, id: &str, payload_id: u16) -> ResultCode {
        let mut state = self.state.lock();
        settle(state.group_mut(id).map(|group| {
            group.rtp_handlers.insert(payload_id);
        }))
    }

    fn unregister_group_rtp_handler(&self, id: &str, payload_id: u16) -> ResultCode {
        let mut state = self.state.lock();
        let outcome = state.group_mut(id).and_then(|group| {
            if group.rtp_handlers.remove(&payload_id) {
                Ok(())
            } else {
                Err(ResultCode::InvalidParameters)
            }
        });
        settle(outcome)
    }

    fn platform_service_discovered(&self, id: &str, params: &str) -> ResultCode {
        let mut state = self.state.lock();
        attempt(|| {
            state.ready()?;
            let service: PlatformDiscoveredService = decoded(params)?;
            state.services.insert(id.to_string(), service);
            Ok(())
        })
    }

    fn platform_service_rediscovered(&self, id: &str, params: &str) -> ResultCode {
        let mut state = self.state.lock();
        attempt(|| {
            state.ready()?;
            let service: PlatformDiscoveredService = decoded(params)?;
            match state.services.get_mut(id) {
                Some(known) => *known = service,
                None => return Err(ResultCode::InvalidParameters),
            }
            Ok(())
        })
    }

    fn platform_service_undiscovered(&self, id: &str) -> ResultCode {
        let mut state = self.state.lock();
        attempt(|| {
            state.ready()?;
            state
                .services
                .shift_remove(id)
                .map(|_| ())
                .ok_or(ResultCode::InvalidParameters)
        })
    }

    fn query_group_timeline(&self, id: &str, params: &str) -> ResultCode {
        let mut state = self.state.lock();
        attempt(|| {
            let query: TimelineQueryParameters = decoded(params)?;
            state.group_mut(id)?;
            let report = json!({
                "success": true,
                "count": 0,
                "mostRecentFirst": query.most_recent_first,
                "events": []
            });
            state.notifications.push_back(
                RawNotification::new(NotificationKind::GroupTimelineReport, id)
                    .with_payload(to_text(&report, None)),
            );
            Ok(())
        })
    }

    fn set_log_level(&self, level: i32) -> ResultCode {
        match LogLevel::from_ordinal(i64::from(level)) {
            Some(level) => {
                self.state.lock().log_level = level;
                ResultCode::Ok
            }
            None => ResultCode::InvalidParameters,
        }
    }

    fn enable_syslog(&self, enable: bool) -> ResultCode {
        self.state.lock().syslog = enable;
        ResultCode::Ok
    }

    fn poll_notification(&self) -> Option<RawNotification> {
        self.state.lock().notifications.pop_front()
    }
}
