//! ---
//! engage_section: "01-descriptor-model"
//! engage_subsection: "module"
//! engage_type: "source"
//! engage_scope: "code"
//! engage_description: "Enumerations and constants shared across the catalog."
//! engage_version: "v0.0.0-prealpha"
//! engage_owner: "tbd"
//! ---

use crate::wire_enum;

/// Sentinel for location components that were never measured.
pub const INVALID_LOCATION_VALUE: f64 = -999.999;

/// Transmission flag bits carried in `AdvancedTxParams.flags`.
pub const TX_FLAG_EMERGENCY: u16 = 0x0001;
pub const TX_FLAG_AUTOMATED_SYSTEM: u16 = 0x0004;

/// Longest group id the engine accepts.
pub const MAX_GROUP_ID_LEN: usize = 64;
/// Longest group name the engine accepts.
pub const MAX_GROUP_NAME_LEN: usize = 128;

/// Presence disposition bits carried in `PresenceDescriptor.disposition`.
pub const DISPOSITION_EMERGENCY: u32 = 0x0001;
pub const DISPOSITION_AVAILABLE: u32 = 0x0002;
pub const DISPOSITION_BUSY: u32 = 0x0004;

wire_enum! {
    /// Network priority class for outbound traffic.
    pub enum TxPriority default Voice {
        BestEffort = 0,
        Signaling = 2,
        Video = 3,
        Voice = 4,
    }
}

wire_enum! {
    /// Audio codec used when transmitting.
    pub enum TxCodec default Unknown {
        Unknown = 0,
        G711Ulaw = 1,
        G711Alaw = 2,
        Gsm610 = 3,
        AmrNb4750 = 10,
        AmrNb5150 = 11,
        AmrNb5900 = 12,
        AmrNb6700 = 13,
        AmrNb7400 = 14,
        AmrNb7950 = 15,
        AmrNb10200 = 16,
        AmrNb12200 = 17,
        Opus6000 = 20,
        Opus8000 = 21,
        Opus10000 = 22,
        Opus12000 = 23,
        Opus14000 = 24,
        Opus16000 = 25,
        Opus18000 = 26,
        Opus20000 = 27,
        Opus22000 = 28,
        Opus24000 = 29,
    }
}

wire_enum! {
    pub enum AudioDirection default Unknown {
        Unknown = 0,
        Input = 1,
        Output = 2,
        Both = 3,
    }
}

wire_enum! {
    /// Kind of traffic a group carries.
    pub enum GroupType default Unknown {
        Unknown = 0,
        Audio = 1,
        Presence = 2,
        Raw = 3,
    }
}

wire_enum! {
    pub enum PresenceFormat default Unknown {
        Unknown = 0,
        Engage = 1,
        Cot = 2,
    }
}

wire_enum! {
    /// Interpretation of a blob payload.
    pub enum BlobPayloadType default Undefined {
        Undefined = 0,
        AppTextUtf8 = 1,
        JsonTextUtf8 = 2,
        AppBinary = 3,
        EngageBinaryHumanBiometrics = 4,
    }
}

wire_enum! {
    pub enum TimelineEventType default Unknown {
        Unknown = 0,
        AudioRx = 1,
        AudioTx = 2,
    }
}

wire_enum! {
    /// Outcome of the engine's license evaluation. Every failure is negative.
    pub enum LicenseStatus default NotInitialized {
        Ok = 0,
        NullEntitlementKey = -1,
        NullLicenseKey = -2,
        InvalidLicenseKeyLen = -3,
        LicenseKeyVerificationFailure = -4,
        ActivationCodeVerificationFailure = -5,
        InvalidExpirationDate = -6,
        GeneralFailure = -7,
        NotInitialized = -8,
        RequiresActivation = -9,
    }
}

wire_enum! {
    /// Engine log verbosity, most severe first.
    pub enum LogLevel default Debug {
        Fatal = 0,
        Error = 1,
        Warning = 2,
        Informational = 3,
        Debug = 4,
    }
}

wire_enum! {
    /// Element width of a binary data series.
    pub enum DataSeriesValueType default Invalid {
        Invalid = 0,
        Uint8 = 1,
        Uint16 = 2,
        Uint32 = 3,
        Uint64 = 4,
    }
}

wire_enum! {
    pub enum HumanBiometricsType default Unknown {
        Unknown = 0,
        HeartRate = 1,
        SkinTemp = 2,
        CoreTemp = 3,
        Hydration = 4,
        BloodOxygenation = 5,
        FatigueLevel = 6,
        TaskEffectiveness = 7,
    }
}

impl DataSeriesValueType {
    /// Encoded width of one value, `None` for [`DataSeriesValueType::Invalid`].
    #[must_use]
    pub fn width(self) -> Option<usize> {
        match self {
            DataSeriesValueType::Invalid => None,
            DataSeriesValueType::Uint8 => Some(1),
            DataSeriesValueType::Uint16 => Some(2),
            DataSeriesValueType::Uint32 => Some(4),
            DataSeriesValueType::Uint64 => Some(8),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{FieldError, WireValue};
    use serde_json::json;

    #[test]
    fn ordinals_round_trip_for_every_variant() {
        for codec in TxCodec::ALL {
            assert_eq!(TxCodec::from_ordinal(codec.ordinal()), Some(*codec));
        }
        for status in LicenseStatus::ALL {
            assert!(status.ordinal() <= 0);
        }
    }

    #[test]
    fn gaps_in_ordinals_are_unknown() {
        assert_eq!(TxPriority::from_ordinal(1), None);
        assert_eq!(TxCodec::from_ordinal(18), None);
        assert!(matches!(
            TxCodec::from_wire(&json!(999)),
            Err(FieldError::UnknownVariant { ordinal: 999 })
        ));
    }

    #[test]
    fn enums_travel_as_integers() {
        assert_eq!(LicenseStatus::RequiresActivation.to_wire(), json!(-9));
        assert_eq!(GroupType::from_wire(&json!(2)).unwrap(), GroupType::Presence);
        assert!(GroupType::from_wire(&json!("2")).is_err());
        assert_eq!(GroupType::from_wire(&json!(1.0)).unwrap(), GroupType::Audio);
        assert!(GroupType::from_wire(&json!(1.5)).is_err());
    }

    #[test]
    fn defaults_match_reset_values() {
        assert_eq!(TxPriority::default(), TxPriority::Voice);
        assert_eq!(LogLevel::default(), LogLevel::Debug);
        assert_eq!(LicenseStatus::default(), LicenseStatus::NotInitialized);
    }
}
