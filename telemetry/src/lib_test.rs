use super::*;

fn entity(name: &str, category: EntityCategory) -> EntitySnapshot {
    EntitySnapshot {
        name: name.to_owned(),
        category,
        is_active: true,
        is_alive: true,
        position: Vec3::new(10.0, 2.5, -40.0),
        rotation: Vec2::new(135.0, 4.0),
    }
}

fn sample_snapshot() -> WorldSnapshot {
    WorldSnapshot {
        version: 42,
        in_game: true,
        map_id: "bigmap".to_owned(),
        players: vec![
            entity("observer", EntityCategory::Local),
            entity("buddy", EntityCategory::Teammate),
            entity("raider", EntityCategory::Hostile),
            entity("scav", EntityCategory::HostileScav),
            entity("bot", EntityCategory::Bot),
        ],
    }
}

// =============================================================
// EntityCategory
// =============================================================

#[test]
fn category_numeric_mapping_matches_wire_enum() {
    assert_eq!(EntityCategory::Local.as_i32(), 0);
    assert_eq!(EntityCategory::Teammate.as_i32(), 1);
    assert_eq!(EntityCategory::Hostile.as_i32(), 2);
    assert_eq!(EntityCategory::HostileScav.as_i32(), 3);
    assert_eq!(EntityCategory::Bot.as_i32(), 4);
}

#[test]
fn category_parses_from_wire_values() {
    assert_eq!(EntityCategory::from_i32(0).expect("category"), EntityCategory::Local);
    assert_eq!(EntityCategory::from_i32(3).expect("category"), EntityCategory::HostileScav);
    assert_eq!(EntityCategory::from_i32(4).expect("category"), EntityCategory::Bot);
}

#[test]
fn category_from_wire_rejects_out_of_range_value() {
    let err = EntityCategory::from_i32(99).expect_err("category should be invalid");
    assert!(matches!(err, CodecError::InvalidCategory(99)));
}

// =============================================================
// EntitySnapshot
// =============================================================

#[test]
fn exfiltrated_requires_inactive_and_alive() {
    let mut e = entity("a", EntityCategory::Hostile);
    assert!(!e.is_exfiltrated());

    e.is_active = false;
    assert!(e.is_exfiltrated());

    e.is_alive = false;
    assert!(!e.is_exfiltrated(), "dead entities are never exfiltrated");
}

#[test]
fn bearing_reads_rotation_x() {
    let e = entity("a", EntityCategory::Bot);
    assert!((e.bearing_deg() - 135.0).abs() < f32::EPSILON);
}

#[test]
fn vec3_distance_is_euclidean() {
    let a = Vec3::new(0.0, 0.0, 0.0);
    let b = Vec3::new(3.0, 4.0, 12.0);
    assert!((a.distance(b) - 13.0).abs() < 1e-5);
    assert!((b.distance(a) - 13.0).abs() < 1e-5);
}

// =============================================================
// Protobuf framing
// =============================================================

#[test]
fn protobuf_round_trip_preserves_snapshot() {
    let push = Push::RadarUpdate(sample_snapshot());
    let bytes = encode_push(&push);
    assert!(!bytes.is_empty());
    let decoded = decode_push(&bytes).expect("decode should succeed");
    assert_eq!(decoded, push);
}

#[test]
fn decode_push_rejects_malformed_bytes() {
    let err = decode_push(&[0xff, 0x00, 0x01]).expect_err("bytes should fail");
    assert!(matches!(err, CodecError::Decode(_)));
}

#[test]
fn decode_push_rejects_unknown_target() {
    let wire = WirePush { target: "ChatMessage".to_owned(), snapshot: None };
    let mut bytes = Vec::new();
    wire.encode(&mut bytes).expect("encode");

    let err = decode_push(&bytes).expect_err("target should be rejected");
    assert!(matches!(err, CodecError::UnknownTarget(ref t) if t == "ChatMessage"));
}

#[test]
fn decode_push_rejects_missing_snapshot() {
    let wire = WirePush { target: RADAR_UPDATE.to_owned(), snapshot: None };
    let mut bytes = Vec::new();
    wire.encode(&mut bytes).expect("encode");

    let err = decode_push(&bytes).expect_err("payload should be required");
    assert!(matches!(err, CodecError::MissingPayload));
}

#[test]
fn decode_push_rejects_invalid_category() {
    let wire = WirePush {
        target: RADAR_UPDATE.to_owned(),
        snapshot: Some(WireSnapshot {
            version: 1,
            in_game: true,
            map_id: "woods".to_owned(),
            players: vec![WireEntity {
                name: "x".to_owned(),
                category: 17,
                is_active: true,
                is_alive: true,
                position: None,
                rotation: None,
            }],
        }),
    };
    let mut bytes = Vec::new();
    wire.encode(&mut bytes).expect("encode");

    let err = decode_push(&bytes).expect_err("category should be rejected");
    assert!(matches!(err, CodecError::InvalidCategory(17)));
}

#[test]
fn decode_push_defaults_missing_vectors_to_origin() {
    let wire = WirePush {
        target: RADAR_UPDATE.to_owned(),
        snapshot: Some(WireSnapshot {
            version: 3,
            in_game: false,
            map_id: String::new(),
            players: vec![WireEntity {
                name: "ghost".to_owned(),
                category: 4,
                is_active: true,
                is_alive: false,
                position: None,
                rotation: None,
            }],
        }),
    };
    let mut bytes = Vec::new();
    wire.encode(&mut bytes).expect("encode");

    let Push::RadarUpdate(snapshot) = decode_push(&bytes).expect("decode");
    assert_eq!(snapshot.version, 3);
    assert_eq!(snapshot.players[0].position, Vec3::default());
    assert_eq!(snapshot.players[0].rotation, Vec2::default());
    assert_eq!(snapshot.players[0].category, EntityCategory::Bot);
}

// =============================================================
// JSON framing
// =============================================================

#[test]
fn json_uses_target_and_camel_case_fields() {
    let push = Push::RadarUpdate(sample_snapshot());
    let text = encode_push_json(&push).expect("encode");
    let value: serde_json::Value = serde_json::from_str(&text).expect("valid json");

    assert_eq!(value["target"], "RadarUpdate");
    assert_eq!(value["payload"]["version"], 42);
    assert_eq!(value["payload"]["inGame"], true);
    assert_eq!(value["payload"]["mapId"], "bigmap");
    assert_eq!(value["payload"]["players"][0]["isActive"], true);
    assert_eq!(value["payload"]["players"][3]["category"], "HostileScav");
}

#[test]
fn json_decodes_hand_written_frame() {
    let text = r#"{
        "target": "RadarUpdate",
        "payload": {
            "version": 7,
            "inGame": true,
            "mapId": "Woods",
            "players": [{
                "name": "observer",
                "category": "Local",
                "isActive": true,
                "isAlive": true,
                "position": {"x": 1.0, "y": 2.0, "z": 3.0},
                "rotation": {"x": 90.0, "y": 0.0}
            }]
        }
    }"#;
    let Push::RadarUpdate(snapshot) = decode_push_json(text).expect("decode");
    assert_eq!(snapshot.version, 7);
    assert_eq!(snapshot.map_id, "Woods");
    assert_eq!(snapshot.players.len(), 1);
    assert_eq!(snapshot.players[0].position, Vec3::new(1.0, 2.0, 3.0));
}

#[test]
fn json_rejects_unknown_target() {
    let err = decode_push_json(r#"{"target":"Nope","payload":{}}"#).expect_err("should fail");
    assert!(matches!(err, CodecError::Json(_)));
}

#[test]
fn push_target_names_radar_update() {
    assert_eq!(Push::RadarUpdate(WorldSnapshot::default()).target(), RADAR_UPDATE);
}
