//! ---
//! engage_section: "03-engine-facade"
//! engage_subsection: "module"
//! engage_type: "source"
//! engage_scope: "code"
//! engage_description: "Engine call surface, result codes, and facade errors."
//! engage_version: "v0.0.0-prealpha"
//! engage_owner: "tbd"
//! ---
//! The engine itself lives outside this workspace. [`EngineFacade`] is the
//! text-level contract it honours: descriptors cross the boundary as JSON,
//! calls answer with a [`ResultCode`], and asynchronous outcomes surface as
//! [`RawNotification`]s. [`EngineClient`] layers the descriptor catalog on
//! top of any facade; [`MockEngine`] is an in-process double.

use std::fmt;

use thiserror::Error;

use engage_model::DecodeError;

pub mod client;
pub mod events;
pub mod mock;

pub use client::EngineClient;
pub use events::{EngineEvent, NotificationKind, RawNotification};
pub use mock::MockEngine;

/// Synchronous answer to every engine call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultCode {
    Ok,
    InvalidParameters,
    NotInitialized,
    AlreadyInitialized,
    GeneralFailure,
    NotStarted,
}

impl ResultCode {
    pub const ALL: [ResultCode; 6] = [
        ResultCode::Ok,
        ResultCode::InvalidParameters,
        ResultCode::NotInitialized,
        ResultCode::AlreadyInitialized,
        ResultCode::GeneralFailure,
        ResultCode::NotStarted,
    ];

    pub fn code(self) -> i32 {
        match self {
            ResultCode::Ok => 0,
            ResultCode::InvalidParameters => -1,
            ResultCode::NotInitialized => -2,
            ResultCode::AlreadyInitialized => -3,
            ResultCode::GeneralFailure => -4,
            ResultCode::NotStarted => -5,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|candidate| candidate.code() == code)
    }

    pub fn is_ok(self) -> bool {
        self == ResultCode::Ok
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResultCode::Ok => "ok",
            ResultCode::InvalidParameters => "invalid parameters",
            ResultCode::NotInitialized => "not initialized",
            ResultCode::AlreadyInitialized => "already initialized",
            ResultCode::GeneralFailure => "general failure",
            ResultCode::NotStarted => "not started",
        }
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.as_str(), self.code())
    }
}

#[derive(Debug, Error)]
pub enum FacadeError {
    #[error("{op} rejected by engine: {code}")]
    Rejected { op: &'static str, code: ResultCode },

    #[error("invalid argument to {op}: {reason}")]
    InvalidArgument { op: &'static str, reason: String },

    #[error("cannot decode {what}")]
    Decode {
        what: &'static str,
        #[source]
        source: DecodeError,
    },

    #[error("{kind} notification is missing its {part}")]
    MissingPart {
        kind: NotificationKind,
        part: &'static str,
    },

    #[error("{kind} notification carries an invalid value: {value}")]
    InvalidValue { kind: NotificationKind, value: String },
}

pub type Result<T> = std::result::Result<T, FacadeError>;

/// Call surface of the engine.
///
/// Every call is synchronous and returns once the request has been accepted
/// or refused; work accepted with [`ResultCode::Ok`] reports its outcome later
/// through [`EngineFacade::poll_notification`]. Text arguments and results are
/// JSON descriptors from the catalog.
pub trait EngineFacade: Send + Sync {
    fn initialize(
        &self,
        policy: Option<&str>,
        identity: Option<&str>,
        temp_storage_path: Option<&str>,
    ) -> ResultCode;
    fn shutdown(&self) -> ResultCode;
    fn start(&self) -> ResultCode;
    fn stop(&self) -> ResultCode;

    fn create_group(&self, configuration: &str) -> ResultCode;
    fn delete_group(&self, id: &str) -> ResultCode;
    fn join_group(&self, id: &str) -> ResultCode;
    fn leave_group(&self, id: &str) -> ResultCode;

    fn begin_group_tx(&self, id: &str, priority: i32, flags: u32) -> ResultCode;
    fn begin_group_tx_advanced(&self, id: &str, params: &str) -> ResultCode;
    fn end_group_tx(&self, id: &str) -> ResultCode;

    fn set_group_rx_tag(&self, id: &str, tag: u16) -> ResultCode;
    fn mute_group_rx(&self, id: &str) -> ResultCode;
    fn unmute_group_rx(&self, id: &str) -> ResultCode;
    fn set_group_rx_volume(&self, id: &str, left: i32, right: i32) -> ResultCode;

    fn update_presence_descriptor(&self, id: &str, descriptor: &str, force_beacon: bool)
        -> ResultCode;

    fn version(&self) -> String;
    fn active_license_descriptor(&self) -> String;
    fn license_descriptor(&self, entitlement: &str, key: &str, activation_code: Option<&str>)
        -> String;
    fn update_license(&self, entitlement: &str, key: &str, activation_code: Option<&str>)
        -> ResultCode;

    fn send_group_blob(&self, id: &str, blob: &[u8], params: &str) -> ResultCode;
    fn send_group_rtp(&self, id: &str, payload: &[u8], params: &str) -> ResultCode;
    fn send_group_raw(&self, id: &str, raw: &[u8], params: &str) -> ResultCode;
    fn register_group_rtp_handler(&self, id: &str, payload_id: u16) -> ResultCode;
    fn unregister_group_rtp_handler(&self, id: &str, payload_id: u16) -> ResultCode;

    fn platform_service_discovered(&self, id: &str, params: &str) -> ResultCode;
    fn platform_service_rediscovered(&self, id: &str, params: &str) -> ResultCode;
    fn platform_service_undiscovered(&self, id: &str) -> ResultCode;

    fn query_group_timeline(&self, id: &str, params: &str) -> ResultCode;

    fn set_log_level(&self, level: i32) -> ResultCode;
    fn enable_syslog(&self, enable: bool) -> ResultCode;

    /// Next pending notification, oldest first.
    fn poll_notification(&self) -> Option<RawNotification>;
}
