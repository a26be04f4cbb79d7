//! ---
//! engage_section: "03-engine-facade"
//! engage_subsection: "module"
//! engage_type: "source"
//! engage_scope: "code"
//! engage_description: "Typed client that speaks catalog descriptors to any engine facade."
//! engage_version: "v0.0.0-prealpha"
//! engage_owner: "tbd"
//! ---
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use engage_logging::{log_operation_event, LogContext, OperationOutcome};
use engage_model::codec::to_text;
use engage_model::{
    AdvancedTxParams, BlobInfo, Descriptor, EnginePolicy, Group, Identity, LicenseDescriptor,
    LogLevel, PlatformDiscoveredService, PresenceDescriptor, RtpHeader, TimelineQueryParameters,
    TxPriority, MAX_GROUP_ID_LEN, MAX_GROUP_NAME_LEN,
};

use crate::{EngineEvent, EngineFacade, FacadeError, ResultCode, Result};

/// Descriptor-level wrapper around an [`EngineFacade`].
///
/// Arguments are validated and encoded before they reach the engine; any
/// result other than [`ResultCode::Ok`] becomes [`FacadeError::Rejected`].
pub struct EngineClient<F> {
    engine: F,
}

impl<F: EngineFacade> EngineClient<F> {
    pub fn new(engine: F) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &F {
        &self.engine
    }

    pub fn into_inner(self) -> F {
        self.engine
    }

    pub fn initialize(
        &self,
        policy: Option<&EnginePolicy>,
        identity: Option<&Identity>,
        temp_storage_path: Option<&Path>,
    ) -> Result<()> {
        let policy = policy.map(|policy| policy.encode_to_string(None));
        let identity = identity.map(|identity| identity.encode_to_string(None));
        let temp = temp_storage_path.map(|path| path.to_string_lossy().into_owned());
        let code = self.engine.initialize(
            policy.as_deref(),
            identity.as_deref(),
            temp.as_deref(),
        );
        settle("initialize", None, code)
    }

    pub fn shutdown(&self) -> Result<()> {
        settle("shutdown", None, self.engine.shutdown())
    }

    pub fn start(&self) -> Result<()> {
        settle("start", None, self.engine.start())
    }

    pub fn stop(&self) -> Result<()> {
        settle("stop", None, self.engine.stop())
    }

    pub fn create_group(&self, group: &Group) -> Result<()> {
        check_group_id("createGroup", &group.id)?;
        if group.name.len() >= MAX_GROUP_NAME_LEN {
            return Err(FacadeError::InvalidArgument {
                op: "createGroup",
                reason: format!("group name exceeds {} bytes", MAX_GROUP_NAME_LEN - 1),
            });
        }
        let code = self.engine.create_group(&group.encode_to_string(None));
        settle("createGroup", Some(&group.id), code)
    }

    pub fn delete_group(&self, id: &str) -> Result<()> {
        check_group_id("deleteGroup", id)?;
        settle("deleteGroup", Some(id), self.engine.delete_group(id))
    }

    pub fn join_group(&self, id: &str) -> Result<()> {
        check_group_id("joinGroup", id)?;
        settle("joinGroup", Some(id), self.engine.join_group(id))
    }

    pub fn leave_group(&self, id: &str) -> Result<()> {
        check_group_id("leaveGroup", id)?;
        settle("leaveGroup", Some(id), self.engine.leave_group(id))
    }

    /// Begin transmitting; `flags` is a set of `TX_FLAG_*` bits.
    pub fn begin_tx(&self, id: &str, priority: TxPriority, flags: u16) -> Result<()> {
        check_group_id("beginGroupTx", id)?;
        let code = self
            .engine
            .begin_group_tx(id, priority.ordinal() as i32, u32::from(flags));
        settle("beginGroupTx", Some(id), code)
    }

    pub fn begin_tx_advanced(&self, id: &str, params: &AdvancedTxParams) -> Result<()> {
        check_group_id("beginGroupTxAdvanced", id)?;
        let code = self
            .engine
            .begin_group_tx_advanced(id, &params.encode_to_string(None));
        settle("beginGroupTxAdvanced", Some(id), code)
    }

    pub fn end_tx(&self, id: &str) -> Result<()> {
        check_group_id("endGroupTx", id)?;
        settle("endGroupTx", Some(id), self.engine.end_group_tx(id))
    }

    pub fn set_rx_tag(&self, id: &str, tag: u16) -> Result<()> {
        check_group_id("setGroupRxTag", id)?;
        settle("setGroupRxTag", Some(id), self.engine.set_group_rx_tag(id, tag))
    }

    pub fn mute_rx(&self, id: &str) -> Result<()> {
        check_group_id("muteGroupRx", id)?;
        settle("muteGroupRx", Some(id), self.engine.mute_group_rx(id))
    }

    pub fn unmute_rx(&self, id: &str) -> Result<()> {
        check_group_id("unmuteGroupRx", id)?;
        settle("unmuteGroupRx", Some(id), self.engine.unmute_group_rx(id))
    }

    pub fn set_rx_volume(&self, id: &str, left: i32, right: i32) -> Result<()> {
        check_group_id("setGroupRxVolume", id)?;
        let code = self.engine.set_group_rx_volume(id, left, right);
        settle("setGroupRxVolume", Some(id), code)
    }

    pub fn update_presence(
        &self,
        id: &str,
        descriptor: &PresenceDescriptor,
        force_beacon: bool,
    ) -> Result<()> {
        check_group_id("updatePresenceDescriptor", id)?;
        let code = self.engine.update_presence_descriptor(
            id,
            &descriptor.encode_to_string(None),
            force_beacon,
        );
        settle("updatePresenceDescriptor", Some(id), code)
    }

    pub fn version(&self) -> String {
        self.engine.version()
    }

    pub fn active_license(&self) -> Result<LicenseDescriptor> {
        decode_reply("active license", &self.engine.active_license_descriptor())
    }

    /// Ask the engine to evaluate a license without applying it.
    pub fn license_descriptor(
        &self,
        entitlement: &str,
        key: &str,
        activation_code: Option<&str>,
    ) -> Result<LicenseDescriptor> {
        let reply = self
            .engine
            .license_descriptor(entitlement, key, activation_code);
        decode_reply("license descriptor", &reply)
    }

    pub fn update_license(
        &self,
        entitlement: &str,
        key: &str,
        activation_code: Option<&str>,
    ) -> Result<()> {
        let code = self.engine.update_license(entitlement, key, activation_code);
        settle("updateLicense", None, code)
    }

    /// Send a blob; the size in `info` is taken from `blob`.
    pub fn send_blob(&self, id: &str, blob: &[u8], info: &BlobInfo) -> Result<()> {
        check_group_id("sendGroupBlob", id)?;
        let mut info = info.clone();
        info.size = blob.len();
        let code = self
            .engine
            .send_group_blob(id, blob, &info.encode_to_string(None));
        settle("sendGroupBlob", Some(id), code)
    }

    pub fn send_rtp(&self, id: &str, payload: &[u8], header: &RtpHeader) -> Result<()> {
        check_group_id("sendGroupRtp", id)?;
        if header.is_unset() {
            return Err(FacadeError::InvalidArgument {
                op: "sendGroupRtp",
                reason: "RTP header carries no payload type".to_string(),
            });
        }
        let code = self
            .engine
            .send_group_rtp(id, payload, &header.encode_to_string(None));
        settle("sendGroupRtp", Some(id), code)
    }

    pub fn send_raw(&self, id: &str, raw: &[u8], params: Option<&Value>) -> Result<()> {
        check_group_id("sendGroupRaw", id)?;
        let params = params.map(|params| to_text(params, None)).unwrap_or_default();
        settle("sendGroupRaw", Some(id), self.engine.send_group_raw(id, raw, &params))
    }

    pub fn register_rtp_handler(&self, id: &str, payload_id: u16) -> Result<()> {
        check_group_id("registerGroupRtpHandler", id)?;
        let code = self.engine.register_group_rtp_handler(id, payload_id);
        settle("registerGroupRtpHandler", Some(id), code)
    }

    pub fn unregister_rtp_handler(&self, id: &str, payload_id: u16) -> Result<()> {
        check_group_id("unregisterGroupRtpHandler", id)?;
        let code = self.engine.unregister_group_rtp_handler(id, payload_id);
        settle("unregisterGroupRtpHandler", Some(id), code)
    }

    pub fn platform_service_discovered(&self, service: &PlatformDiscoveredService) -> Result<()> {
        let code = self
            .engine
            .platform_service_discovered(&service.id, &service.encode_to_string(None));
        settle("platformServiceDiscovered", None, code)
    }

    pub fn platform_service_rediscovered(&self, service: &PlatformDiscoveredService) -> Result<()> {
        let code = self
            .engine
            .platform_service_rediscovered(&service.id, &service.encode_to_string(None));
        settle("platformServiceRediscovered", None, code)
    }

    pub fn platform_service_undiscovered(&self, id: &str) -> Result<()> {
        let code = self.engine.platform_service_undiscovered(id);
        settle("platformServiceUndiscovered", None, code)
    }

    pub fn query_timeline(&self, id: &str, params: &TimelineQueryParameters) -> Result<()> {
        check_group_id("queryGroupTimeline", id)?;
        let code = self
            .engine
            .query_group_timeline(id, &params.encode_to_string(None));
        settle("queryGroupTimeline", Some(id), code)
    }

    pub fn set_log_level(&self, level: LogLevel) -> Result<()> {
        let code = self.engine.set_log_level(level.ordinal() as i32);
        settle("setLogLevel", None, code)
    }

    pub fn enable_syslog(&self, enable: bool) -> Result<()> {
        settle("enableSyslog", None, self.engine.enable_syslog(enable))
    }

    /// Next pending event, decoded. `Ok(None)` when the queue is empty.
    pub fn next_event(&self) -> Result<Option<EngineEvent>> {
        self.engine.poll_notification().map(EngineEvent::decode).transpose()
    }

    /// Drain and decode every pending event.
    pub fn drain_events(&self) -> Result<Vec<EngineEvent>> {
        let mut events = Vec::new();
        while let Some(event) = self.next_event()? {
            events.push(event);
        }
        Ok(events)
    }
}

// Group ids travel in fixed buffers that include the terminator.
fn check_group_id(op: &'static str, id: &str) -> Result<()> {
    let reason = if id.is_empty() {
        "group id is empty".to_string()
    } else if id.len() >= MAX_GROUP_ID_LEN {
        format!("group id exceeds {} bytes", MAX_GROUP_ID_LEN - 1)
    } else {
        return Ok(());
    };
    Err(FacadeError::InvalidArgument { op, reason })
}

fn settle(op: &'static str, group: Option<&str>, code: ResultCode) -> Result<()> {
    let mut context = LogContext::new();
    if let Some(group) = group {
        context = context.with_group(group);
    }
    let event = format!("engine.{op}");
    if code.is_ok() {
        log_operation_event(Some(&context), &event, "accepted", OperationOutcome::Success);
        Ok(())
    } else {
        log_operation_event(
            Some(&context),
            &event,
            &code.to_string(),
            OperationOutcome::Fault,
        );
        Err(FacadeError::Rejected { op, code })
    }
}

fn decode_reply<D: Descriptor>(what: &'static str, reply: &str) -> Result<D> {
    debug!(what, bytes = reply.len(), "decoding engine reply");
    D::decode_str(reply).map_err(|source| FacadeError::Decode { what, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockEngine;
    use engage_model::GroupType;

    fn started() -> EngineClient<MockEngine> {
        let client = EngineClient::new(MockEngine::new());
        client.initialize(None, None, None).unwrap();
        client.start().unwrap();
        client.drain_events().unwrap();
        client
    }

    #[test]
    fn group_id_limits_are_enforced_before_the_engine_is_called() {
        let client = started();
        let long_id = "g".repeat(MAX_GROUP_ID_LEN);
        let group = Group::new(GroupType::Audio, long_id, "Ops");
        assert!(matches!(
            client.create_group(&group),
            Err(FacadeError::InvalidArgument { op: "createGroup", .. })
        ));

        let group = Group::new(GroupType::Audio, "{g}", "n".repeat(MAX_GROUP_NAME_LEN));
        assert!(client.create_group(&group).is_err());

        assert!(matches!(
            client.join_group(""),
            Err(FacadeError::InvalidArgument { .. })
        ));
        assert!(client.engine().group("{g}").is_none());
    }

    #[test]
    fn rejected_calls_carry_the_result_code() {
        let client = EngineClient::new(MockEngine::new());
        let err = client.start().unwrap_err();
        assert!(matches!(
            err,
            FacadeError::Rejected {
                op: "start",
                code: ResultCode::NotInitialized
            }
        ));
    }

    #[test]
    fn blob_size_follows_the_payload() {
        let client = started();
        client
            .create_group(&Group::new(GroupType::Presence, "{p}", "Presence"))
            .unwrap();
        client.join_group("{p}").unwrap();
        client
            .send_blob("{p}", b"hello", &BlobInfo::default())
            .unwrap();
        let sent = client.engine().last_blob_info("{p}").unwrap();
        assert_eq!(sent.size, 5);
    }

    #[test]
    fn rtp_requires_a_payload_type() {
        let client = started();
        assert!(matches!(
            client.send_rtp("{g}", &[0u8; 4], &RtpHeader::default()),
            Err(FacadeError::InvalidArgument { op: "sendGroupRtp", .. })
        ));
    }

    #[test]
    fn license_replies_are_decoded() {
        let client = started();
        let evaluated = client.license_descriptor("ent", "key", None).unwrap();
        assert_eq!(evaluated.entitlement, "ent");
        assert!(evaluated.status_is_ok());

        let active = client.active_license().unwrap();
        assert_eq!(active, LicenseDescriptor::default());
    }
}
