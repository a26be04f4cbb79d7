//! ---
//! engage_section: "01-descriptor-model"
//! engage_subsection: "catalog"
//! engage_type: "source"
//! engage_scope: "code"
//! engage_description: "License descriptor reported by the engine."
//! engage_version: "v0.0.0-prealpha"
//! engage_owner: "tbd"
//! ---

use chrono::{DateTime, SecondsFormat, Utc};

use crate::enums::LicenseStatus;
use crate::wire_descriptor;

/// Licensing state as evaluated by the engine.
///
/// `expires` is a Unix timestamp in seconds (UTC); zero means no expiry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LicenseDescriptor {
    pub entitlement: String,
    pub key: String,
    pub activation_code: String,
    pub device_id: String,
    pub kind: i32,
    pub expires: i64,
    pub expires_formatted: String,
    pub flags: i32,
    pub refresh_uri: String,
    pub cargo: String,
    pub refresh_interval_days: i32,
    pub status: LicenseStatus,
}

impl LicenseDescriptor {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        if self.expires == 0 {
            return None;
        }
        DateTime::from_timestamp(self.expires, 0)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|expiry| now >= expiry)
    }

    pub fn status_is_ok(&self) -> bool {
        self.status == LicenseStatus::Ok
    }

    /// ISO 8601 rendering of `expires`, as the engine fills `expiresFormatted`.
    pub fn format_expiry(&self) -> Option<String> {
        self.expires_at()
            .map(|expiry| expiry.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

wire_descriptor! {
    LicenseDescriptor => "LicenseDescriptor" {
        entitlement: "entitlement" [optional],
        key: "key" [optional],
        activation_code: "activationCode" [optional],
        kind: "type" [optional(0)],
        expires: "expires" [optional(0)],
        expires_formatted: "expiresFormatted" [optional],
        flags: "flags" [optional(0)],
        refresh_uri: "refreshUri" [optional],
        cargo: "cargo" [optional],
        device_id: "deviceId" [optional],
        refresh_interval_days: "refreshIntervalDays" [optional(0)],
        status: "status" [optional(LicenseStatus::NotInitialized)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Descriptor;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn status_travels_as_negative_ordinal() {
        let license = LicenseDescriptor::decode(&json!({ "status": -9, "entitlement": "E" })).unwrap();
        assert_eq!(license.status, LicenseStatus::RequiresActivation);
        assert!(!license.status_is_ok());
        assert_eq!(LicenseDescriptor::default().encode()["status"], json!(-8));
    }

    #[test]
    fn expiry_helpers() {
        let license = LicenseDescriptor {
            expires: 1_700_000_000,
            status: LicenseStatus::Ok,
            ..LicenseDescriptor::default()
        };
        let before = Utc.timestamp_opt(1_600_000_000, 0).unwrap();
        let after = Utc.timestamp_opt(1_800_000_000, 0).unwrap();
        assert!(!license.is_expired(before));
        assert!(license.is_expired(after));
        assert_eq!(license.format_expiry().as_deref(), Some("2023-11-14T22:13:20Z"));
        assert!(license.status_is_ok());
    }

    #[test]
    fn zero_expiry_never_expires() {
        let license = LicenseDescriptor::default();
        assert!(license.expires_at().is_none());
        assert!(!license.is_expired(Utc::now()));
    }
}
