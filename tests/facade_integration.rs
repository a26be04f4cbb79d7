//! ---
//! engage_section: "07-testing-qa"
//! engage_subsection: "integration-tests"
//! engage_type: "source"
//! engage_scope: "code"
//! engage_description: "Mission workflow driven through the typed client and the mock engine."
//! engage_version: "v0.0.0-prealpha"
//! engage_owner: "tbd"
//! ---
use bytes::BytesMut;
use engage_facade::{
    EngineClient, EngineEvent, FacadeError, MockEngine, NotificationKind, RawNotification,
    ResultCode,
};
use engage_model::{
    AdvancedTxParams, BlobInfo, BlobPayloadType, DataElement, DataSeries, DataSeriesValueType,
    Descriptor, EnginePolicy, GroupTalkers, GroupType, HumanBiometricsType, Identity, LogLevel,
    Mission, PresenceDescriptor, TalkerInformation, TxPriority, DISPOSITION_AVAILABLE,
    TX_FLAG_EMERGENCY,
};
use serde_json::json;

fn mission() -> Mission {
    Mission::decode(&json!({
        "id": "{mission-1}",
        "name": "Harbour",
        "groups": [
            {"type": 1, "id": "{voice}", "name": "Command"},
            {"type": 2, "id": "{presence}", "name": "Presence"}
        ]
    }))
    .unwrap()
}

fn running_client() -> EngineClient<MockEngine> {
    engage_logging::init();
    let client = EngineClient::new(MockEngine::new());
    let mut policy = EnginePolicy::default();
    policy.logging.max_level = LogLevel::Informational;
    let identity = Identity {
        node_id: "{node-1}".into(),
        display_name: "Dispatcher".into(),
        ..Identity::default()
    };
    client.initialize(Some(&policy), Some(&identity), None).unwrap();
    client.start().unwrap();
    client
}

fn kinds(events: &[EngineEvent]) -> Vec<NotificationKind> {
    events
        .iter()
        .map(|event| match event {
            EngineEvent::Group { kind, .. } => *kind,
            other => panic!("unexpected event {other:?}"),
        })
        .collect()
}

#[test]
fn mission_groups_are_created_joined_and_transmitted_on() {
    let client = running_client();
    assert_eq!(client.drain_events().unwrap(), vec![EngineEvent::EngineStarted]);
    assert_eq!(client.engine().identity().display_name, "Dispatcher");
    assert_eq!(client.engine().log_level(), LogLevel::Informational);

    let mission = mission();
    assert!(mission.duplicate_group_ids().is_empty());
    for group in &mission.groups {
        client.create_group(group).unwrap();
        client.join_group(&group.id).unwrap();
    }
    assert_eq!(client.engine().group_ids(), vec!["{voice}", "{presence}"]);
    assert_eq!(
        kinds(&client.drain_events().unwrap()),
        vec![
            NotificationKind::GroupCreated,
            NotificationKind::GroupConnected,
            NotificationKind::GroupJoined,
            NotificationKind::GroupCreated,
            NotificationKind::GroupConnected,
            NotificationKind::GroupJoined,
        ]
    );

    let params = AdvancedTxParams {
        flags: TX_FLAG_EMERGENCY,
        priority: TxPriority::Voice.ordinal() as u8,
        alias: "DISPATCH".into(),
        ..AdvancedTxParams::default()
    };
    client.begin_tx_advanced("{voice}", &params).unwrap();
    let second = client.begin_tx("{voice}", TxPriority::Voice, 0).unwrap_err();
    assert!(matches!(
        second,
        FacadeError::Rejected { code: ResultCode::GeneralFailure, .. }
    ));
    client.end_tx("{voice}").unwrap();
    assert_eq!(
        kinds(&client.drain_events().unwrap()),
        vec![NotificationKind::GroupTxStarted, NotificationKind::GroupTxEnded]
    );

    // Presence descriptors only go to presence groups.
    let mut me = PresenceDescriptor::default();
    me.is_self = true;
    me.disposition = DISPOSITION_AVAILABLE;
    client.update_presence("{presence}", &me, true).unwrap();
    assert!(client.update_presence("{voice}", &me, false).is_err());
    assert!(client.engine().presence("{presence}").unwrap().is_available());

    client.stop().unwrap();
    let events = client.drain_events().unwrap();
    assert_eq!(events.last(), Some(&EngineEvent::EngineStopped));
    client.shutdown().unwrap();
}

#[test]
fn biometrics_blob_travels_as_packed_series() {
    let client = running_client();
    let presence = mission().group("{presence}").cloned().unwrap();
    assert_eq!(presence.kind, GroupType::Presence);
    client.create_group(&presence).unwrap();
    client.join_group(&presence.id).unwrap();
    client.drain_events().unwrap();

    let series = DataSeries {
        kind: HumanBiometricsType::HeartRate.ordinal() as u8,
        ts: 1_700_000_000,
        increment_type: 1,
        increment_multiplier: 1,
        value_type: DataSeriesValueType::Uint8,
        elements: vec![
            DataElement { offset: 0, value: 64 },
            DataElement { offset: 1, value: 66 },
        ],
    };
    let mut payload = BytesMut::new();
    series.encode(&mut payload).unwrap();

    let info = BlobInfo {
        payload_type: BlobPayloadType::EngageBinaryHumanBiometrics,
        ..BlobInfo::default()
    };
    client.send_blob(&presence.id, &payload, &info).unwrap();
    assert_eq!(
        client.engine().last_blob_info(&presence.id).unwrap().size,
        payload.len()
    );

    // Loop the blob back as a receive from another node.
    let mut received = info.clone();
    received.size = payload.len();
    received.source = "{node-2}".into();
    client.engine().inject(
        RawNotification::new(NotificationKind::GroupBlobReceived, presence.id.clone())
            .with_payload(received.encode_to_string(None))
            .with_data(payload.freeze()),
    );

    let events = client.drain_events().unwrap();
    assert_eq!(events.len(), 2);
    match &events[1] {
        EngineEvent::BlobReceived { info, blob, .. } => {
            assert_eq!(info.source, "{node-2}");
            assert_eq!(info.payload_type, BlobPayloadType::EngageBinaryHumanBiometrics);
            assert_eq!(DataSeries::parse_all(blob).unwrap(), vec![series]);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn inbound_talker_updates_fall_back_to_empty_on_malformed_entries() {
    let client = running_client();
    client.drain_events().unwrap();

    let talkers = json!({"list": [
        {"alias": "ALPHA", "nodeId": "{n-1}"},
        {"alias": "BRAVO", "nodeId": "{n-2}"}
    ]});
    let damaged = json!({"list": [
        {"alias": "ALPHA", "nodeId": "{n-1}"},
        17,
        "garbage"
    ]});
    for payload in [&talkers, &damaged] {
        client.engine().inject(
            RawNotification::new(NotificationKind::GroupRxSpeakersChanged, "{voice}")
                .with_payload(payload.to_string()),
        );
    }

    let expected = GroupTalkers {
        list: vec![
            TalkerInformation { alias: "ALPHA".into(), node_id: "{n-1}".into() },
            TalkerInformation { alias: "BRAVO".into(), node_id: "{n-2}".into() },
        ],
    };
    assert_eq!(
        client.next_event().unwrap(),
        Some(EngineEvent::RxSpeakersChanged { id: "{voice}".into(), talkers: expected })
    );
    assert_eq!(
        client.next_event().unwrap(),
        Some(EngineEvent::RxSpeakersChanged {
            id: "{voice}".into(),
            talkers: GroupTalkers::default(),
        })
    );
    assert_eq!(client.next_event().unwrap(), None);
}

#[test]
fn license_update_is_reflected_in_active_descriptor() {
    let client = running_client();
    client.drain_events().unwrap();

    assert!(client.update_license("", "key", None).is_err());
    client.update_license("ent-9", "key-9", Some("act-9")).unwrap();
    assert_eq!(client.drain_events().unwrap(), vec![EngineEvent::LicenseChanged]);

    let active = client.active_license().unwrap();
    assert_eq!(active.entitlement, "ent-9");
    assert_eq!(active.activation_code, "act-9");
    assert!(active.status_is_ok());
}
