//! ---
//! engage_section: "01-descriptor-model"
//! engage_subsection: "catalog"
//! engage_type: "source"
//! engage_scope: "code"
//! engage_description: "Media path descriptors: RTP, blobs, transmit and audio settings, timeline queries."
//! engage_version: "v0.0.0-prealpha"
//! engage_owner: "tbd"
//! ---

use crate::enums::{
    AudioDirection, BlobPayloadType, TxCodec, TX_FLAG_AUTOMATED_SYSTEM, TX_FLAG_EMERGENCY,
};
use crate::wire_descriptor;

/// RTP header accompanying raw payloads. A payload type of `-1` means no
/// header, and the descriptor encodes as `null`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RtpHeader {
    pub pt: i32,
    pub marker: bool,
    pub seq: u16,
    pub ssrc: u32,
    pub ts: u32,
}

impl Default for RtpHeader {
    fn default() -> Self {
        Self {
            pt: -1,
            marker: false,
            seq: 0,
            ssrc: 0,
            ts: 0,
        }
    }
}

wire_descriptor! {
    RtpHeader => "RtpHeader" unset_when(|h: &RtpHeader| h.pt == -1) {
        pt: "pt" [optional(-1)],
        marker: "marker" [optional(false)],
        seq: "seq" [optional(0)],
        ssrc: "ssrc" [optional(0)],
        ts: "ts" [optional(0)],
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlobInfo {
    pub size: usize,
    pub source: String,
    pub target: String,
    pub rtp_header: RtpHeader,
    pub payload_type: BlobPayloadType,
}

wire_descriptor! {
    BlobInfo => "BlobInfo" {
        size: "size" [optional(0)],
        source: "source" [optional],
        target: "target" [optional],
        rtp_header: "rtpHeader" [optional],
        payload_type: "payloadType" [optional(BlobPayloadType::Undefined)],
    }
}

/// Extended transmit request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdvancedTxParams {
    /// Bit set of `TX_FLAG_*` values.
    pub flags: u16,
    pub priority: u8,
    pub subchannel_tag: u16,
    pub include_node_id: bool,
    pub alias: String,
}

impl AdvancedTxParams {
    pub fn is_emergency(&self) -> bool {
        self.flags & TX_FLAG_EMERGENCY != 0
    }

    pub fn is_automated(&self) -> bool {
        self.flags & TX_FLAG_AUTOMATED_SYSTEM != 0
    }
}

wire_descriptor! {
    AdvancedTxParams => "AdvancedTxParams" {
        flags: "flags" [optional(0)],
        priority: "priority" [optional(0)],
        subchannel_tag: "subchannelTag" [optional(0)],
        include_node_id: "includeNodeId" [optional(false)],
        alias: "alias" [optional],
    }
}

/// Transmit audio settings of a group.
///
/// The reset state and the decode fallbacks intentionally differ for
/// `encoder` (`Unknown` vs `Opus8000`) and `framing_ms` (20 vs 60): a
/// default-built value is not the same as one decoded from `{}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxAudio {
    pub encoder: TxCodec,
    pub framing_ms: i32,
    pub fdx: bool,
    pub no_hdr_ext: bool,
    pub max_tx_secs: i32,
    pub extension_send_interval: i32,
    pub debug: bool,
    pub user_tx_priority: i32,
    pub user_tx_flags: i32,
    pub initial_header_burst: i32,
    pub trailing_header_burst: i32,
}

impl Default for TxAudio {
    fn default() -> Self {
        Self {
            encoder: TxCodec::Unknown,
            framing_ms: 20,
            fdx: false,
            no_hdr_ext: false,
            max_tx_secs: 0,
            extension_send_interval: 10,
            debug: false,
            user_tx_priority: 0,
            user_tx_flags: 0,
            initial_header_burst: 5,
            trailing_header_burst: 5,
        }
    }
}

wire_descriptor! {
    TxAudio => "TxAudio" {
        encoder: "encoder" [optional(TxCodec::Opus8000)],
        framing_ms: "framingMs" [optional(60)],
        fdx: "fdx" [optional(false)],
        no_hdr_ext: "noHdrExt" [optional(false)],
        max_tx_secs: "maxTxSecs" [optional(0)],
        extension_send_interval: "extensionSendInterval" [optional(10)],
        debug: "debug" [optional(false)],
        user_tx_priority: "userTxPriority" [optional(0)],
        user_tx_flags: "userTxFlags" [optional(0)],
        initial_header_burst: "initialHeaderBurst" [optional(5)],
        trailing_header_burst: "trailingHeaderBurst" [optional(5)],
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioDeviceDescriptor {
    pub device_id: i32,
    pub sampling_rate: i32,
    pub channels: i32,
    pub direction: AudioDirection,
    pub boost_percentage: i32,
}

wire_descriptor! {
    AudioDeviceDescriptor => "AudioDeviceDescriptor" {
        device_id: "deviceId" [optional(0)],
        sampling_rate: "samplingRate" [optional(0)],
        channels: "channels" [optional(0)],
        direction: "direction" [optional(AudioDirection::Unknown)],
        boost_percentage: "boostPercentage" [optional(0)],
    }
}

/// Device routing and levels of a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Audio {
    pub input_id: i32,
    pub input_gain: i32,
    pub output_id: i32,
    pub output_gain: i32,
    pub output_level_left: i32,
    pub output_level_right: i32,
}

impl Default for Audio {
    fn default() -> Self {
        Self {
            input_id: 0,
            input_gain: 0,
            output_id: 0,
            output_gain: 0,
            output_level_left: 100,
            output_level_right: 100,
        }
    }
}

wire_descriptor! {
    Audio => "Audio" {
        input_id: "inputId" [optional(0)],
        input_gain: "inputGain" [optional(0)],
        output_id: "outputId" [optional(0)],
        output_gain: "outputGain" [optional(0)],
        output_level_left: "outputLevelLeft" [optional(100)],
        output_level_right: "outputLevelRight" [optional(100)],
    }
}

/// Filter for a group timeline query.
///
/// `most_recent_first` resets to `true` but decodes to `false` when absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineQueryParameters {
    pub max_count: i64,
    pub most_recent_first: bool,
    pub started_on_or_after: u64,
    pub ended_on_or_before: u64,
    pub only_direction: i32,
    pub only_type: i32,
    pub only_committed: bool,
    pub only_alias: String,
    pub only_node_id: String,
}

impl Default for TimelineQueryParameters {
    fn default() -> Self {
        Self {
            max_count: 50,
            most_recent_first: true,
            started_on_or_after: 0,
            ended_on_or_before: 0,
            only_direction: 0,
            only_type: 0,
            only_committed: true,
            only_alias: String::new(),
            only_node_id: String::new(),
        }
    }
}

wire_descriptor! {
    TimelineQueryParameters => "TimelineQueryParameters" {
        max_count: "maxCount" [optional(50)],
        most_recent_first: "mostRecentFirst" [optional(false)],
        started_on_or_after: "startedOnOrAfter" [optional(0)],
        ended_on_or_before: "endedOnOrBefore" [optional(0)],
        only_direction: "onlyDirection" [optional(0)],
        only_type: "onlyType" [optional(0)],
        only_committed: "onlyCommitted" [optional(true)],
        only_alias: "onlyAlias" [optional],
        only_node_id: "onlyNodeId" [optional],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Descriptor;
    use serde_json::json;

    #[test]
    fn blob_without_rtp_header_carries_null() {
        let blob = BlobInfo {
            size: 12,
            source: "{node}".into(),
            payload_type: BlobPayloadType::JsonTextUtf8,
            ..BlobInfo::default()
        };
        let encoded = blob.encode();
        assert!(encoded["rtpHeader"].is_null());
        assert_eq!(encoded["payloadType"], json!(2));
        assert_eq!(BlobInfo::decode(&encoded).unwrap(), blob);
    }

    #[test]
    fn rtp_header_with_payload_type_is_emitted() {
        let header = RtpHeader { pt: 96, marker: true, seq: 7, ssrc: 99, ts: 1234 };
        let encoded = header.encode();
        assert_eq!(encoded["pt"], json!(96));
        assert_eq!(RtpHeader::decode(&encoded).unwrap(), header);
    }

    #[test]
    fn oversized_rtp_sequence_keeps_default() {
        let header = RtpHeader::decode(&json!({ "pt": 0, "seq": 70000 })).unwrap();
        assert_eq!(header.seq, 0);
        assert_eq!(header.pt, 0);
    }

    #[test]
    fn tx_audio_decode_fallbacks_differ_from_reset() {
        let decoded = TxAudio::decode(&json!({})).unwrap();
        assert_eq!(decoded.encoder, TxCodec::Opus8000);
        assert_eq!(decoded.framing_ms, 60);

        let reset = TxAudio::default();
        assert_eq!(reset.encoder, TxCodec::Unknown);
        assert_eq!(reset.framing_ms, 20);
    }

    #[test]
    fn unknown_codec_ordinal_uses_decode_default() {
        let decoded = TxAudio::decode(&json!({ "encoder": 999, "fdx": true })).unwrap();
        assert_eq!(decoded.encoder, TxCodec::Opus8000);
        assert!(decoded.fdx);
    }

    #[test]
    fn audio_output_gain_survives_round_trip() {
        let audio = Audio { output_gain: 35, ..Audio::default() };
        assert_eq!(Audio::decode(&audio.encode()).unwrap(), audio);
    }

    #[test]
    fn tx_flag_helpers() {
        let params = AdvancedTxParams {
            flags: TX_FLAG_EMERGENCY | TX_FLAG_AUTOMATED_SYSTEM,
            ..AdvancedTxParams::default()
        };
        assert!(params.is_emergency());
        assert!(params.is_automated());
        assert!(!AdvancedTxParams::default().is_emergency());
    }

    #[test]
    fn timeline_query_most_recent_first_defaults() {
        assert!(TimelineQueryParameters::default().most_recent_first);
        assert!(!TimelineQueryParameters::decode(&json!({})).unwrap().most_recent_first);
    }
}
