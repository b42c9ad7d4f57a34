//! Telemetry wire contract shared by the radar core and its hosts.
//!
//! The server pushes one named message, `RadarUpdate`, carrying a complete
//! [`WorldSnapshot`]. Snapshots may arrive out of order; `version` is the only
//! ordering signal and reconciliation is the receiver's job.
//!
//! Two framings are supported: compact protobuf for binary websocket frames
//! ([`encode_push`] / [`decode_push`]) and JSON for text frames and fixtures
//! ([`encode_push_json`] / [`decode_push_json`]).

use prost::Message;
use serde::{Deserialize, Serialize};

/// Name of the push message that carries world snapshots.
pub const RADAR_UPDATE: &str = "RadarUpdate";

/// Error returned by the push decoders.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The raw bytes could not be decoded as a protobuf `WirePush`.
    #[error("failed to decode protobuf push: {0}")]
    Decode(#[from] prost::DecodeError),
    /// The text could not be decoded as a JSON push.
    #[error("failed to decode json push: {0}")]
    Json(#[from] serde_json::Error),
    /// The push names a message this client does not handle.
    #[error("unknown push target: {0}")]
    UnknownTarget(String),
    /// A `RadarUpdate` push arrived without its snapshot.
    #[error("push is missing its snapshot payload")]
    MissingPayload,
    /// The `category` integer on the wire does not map to a known [`EntityCategory`].
    #[error("invalid entity category: {0}")]
    InvalidCategory(i32),
}

/// Classification of a tracked entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityCategory {
    /// The observer the session belongs to.
    Local,
    /// Same squad as the observer.
    Teammate,
    /// Hostile human player.
    Hostile,
    /// Hostile human player on the scavenger side.
    HostileScav,
    /// AI-controlled entity.
    Bot,
}

impl EntityCategory {
    /// Convert category into wire enum integer value.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        match self {
            Self::Local => WireCategory::Local as i32,
            Self::Teammate => WireCategory::Teammate as i32,
            Self::Hostile => WireCategory::Hostile as i32,
            Self::HostileScav => WireCategory::HostileScav as i32,
            Self::Bot => WireCategory::Bot as i32,
        }
    }

    /// Parse a category from wire enum integer value.
    fn from_i32(value: i32) -> Result<Self, CodecError> {
        match WireCategory::try_from(value) {
            Ok(WireCategory::Local) => Ok(Self::Local),
            Ok(WireCategory::Teammate) => Ok(Self::Teammate),
            Ok(WireCategory::Hostile) => Ok(Self::Hostile),
            Ok(WireCategory::HostileScav) => Ok(Self::HostileScav),
            Ok(WireCategory::Bot) => Ok(Self::Bot),
            Err(_) => Err(CodecError::InvalidCategory(value)),
        }
    }
}

/// Two-component float vector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Three-component float vector in world space. `y` is the vertical axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    #[must_use]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance between two world positions.
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// One tracked entity inside a snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySnapshot {
    /// Display name; also used to pick the reference entity.
    pub name: String,
    pub category: EntityCategory,
    /// False once the entity has left the session.
    pub is_active: bool,
    pub is_alive: bool,
    /// World-space position.
    pub position: Vec3,
    /// `x` is the bearing in degrees; `y` is carried but unused.
    pub rotation: Vec2,
}

impl EntitySnapshot {
    /// Inactive but still alive: the entity left the session and is not drawn.
    #[must_use]
    pub fn is_exfiltrated(&self) -> bool {
        !self.is_active && self.is_alive
    }

    /// Raw bearing in degrees as reported by the server.
    #[must_use]
    pub fn bearing_deg(&self) -> f32 {
        self.rotation.x
    }
}

/// One complete, versioned world state. Never patched; always replaced wholesale.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldSnapshot {
    /// Monotonic across the session; larger wins.
    pub version: u32,
    pub in_game: bool,
    pub map_id: String,
    pub players: Vec<EntitySnapshot>,
}

/// A named message pushed by the telemetry server.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "target", content = "payload")]
pub enum Push {
    RadarUpdate(WorldSnapshot),
}

impl Push {
    /// Wire name of this push.
    #[must_use]
    pub fn target(&self) -> &'static str {
        match self {
            Self::RadarUpdate(_) => RADAR_UPDATE,
        }
    }
}

/// Encode a push into protobuf bytes.
#[must_use]
pub fn encode_push(push: &Push) -> Vec<u8> {
    let wire = push_to_wire(push);

    let mut out = Vec::with_capacity(wire.encoded_len());
    // Writing into a growable Vec cannot hit `BufferTooSmall`, the only
    // error prost reports here.
    wire.encode(&mut out).unwrap_or_default();
    out
}

/// Decode protobuf bytes into a push.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] for malformed bytes,
/// [`CodecError::UnknownTarget`] for unhandled message names,
/// [`CodecError::MissingPayload`] when the snapshot is absent and
/// [`CodecError::InvalidCategory`] for out-of-range entity categories.
pub fn decode_push(bytes: &[u8]) -> Result<Push, CodecError> {
    let wire = WirePush::decode(bytes)?;
    wire_to_push(wire)
}

/// Encode a push as a JSON text frame.
///
/// # Errors
///
/// Returns [`CodecError::Json`] if serialization fails (non-string map keys
/// cannot occur here, so this is effectively infallible).
pub fn encode_push_json(push: &Push) -> Result<String, CodecError> {
    Ok(serde_json::to_string(push)?)
}

/// Decode a JSON text frame into a push.
///
/// # Errors
///
/// Returns [`CodecError::Json`] for malformed text or unknown targets.
pub fn decode_push_json(text: &str) -> Result<Push, CodecError> {
    Ok(serde_json::from_str(text)?)
}

fn push_to_wire(push: &Push) -> WirePush {
    match push {
        Push::RadarUpdate(snapshot) => WirePush {
            target: RADAR_UPDATE.to_owned(),
            snapshot: Some(snapshot_to_wire(snapshot)),
        },
    }
}

fn wire_to_push(wire: WirePush) -> Result<Push, CodecError> {
    if wire.target != RADAR_UPDATE {
        return Err(CodecError::UnknownTarget(wire.target));
    }
    let snapshot = wire.snapshot.ok_or(CodecError::MissingPayload)?;
    Ok(Push::RadarUpdate(wire_to_snapshot(snapshot)?))
}

fn snapshot_to_wire(snapshot: &WorldSnapshot) -> WireSnapshot {
    WireSnapshot {
        version: snapshot.version,
        in_game: snapshot.in_game,
        map_id: snapshot.map_id.clone(),
        players: snapshot.players.iter().map(entity_to_wire).collect(),
    }
}

fn wire_to_snapshot(wire: WireSnapshot) -> Result<WorldSnapshot, CodecError> {
    Ok(WorldSnapshot {
        version: wire.version,
        in_game: wire.in_game,
        map_id: wire.map_id,
        players: wire
            .players
            .into_iter()
            .map(wire_to_entity)
            .collect::<Result<_, _>>()?,
    })
}

fn entity_to_wire(entity: &EntitySnapshot) -> WireEntity {
    WireEntity {
        name: entity.name.clone(),
        category: entity.category.as_i32(),
        is_active: entity.is_active,
        is_alive: entity.is_alive,
        position: Some(WireVec3 {
            x: entity.position.x,
            y: entity.position.y,
            z: entity.position.z,
        }),
        rotation: Some(WireVec2 {
            x: entity.rotation.x,
            y: entity.rotation.y,
        }),
    }
}

fn wire_to_entity(wire: WireEntity) -> Result<EntitySnapshot, CodecError> {
    let position = wire.position.unwrap_or_default();
    let rotation = wire.rotation.unwrap_or_default();
    Ok(EntitySnapshot {
        name: wire.name,
        category: EntityCategory::from_i32(wire.category)?,
        is_active: wire.is_active,
        is_alive: wire.is_alive,
        position: Vec3::new(position.x, position.y, position.z),
        rotation: Vec2::new(rotation.x, rotation.y),
    })
}

#[derive(Clone, PartialEq, Message)]
struct WirePush {
    #[prost(string, tag = "1")]
    target: String,
    #[prost(message, optional, tag = "2")]
    snapshot: Option<WireSnapshot>,
}

#[derive(Clone, PartialEq, Message)]
struct WireSnapshot {
    #[prost(uint32, tag = "1")]
    version: u32,
    #[prost(bool, tag = "2")]
    in_game: bool,
    #[prost(string, tag = "3")]
    map_id: String,
    #[prost(message, repeated, tag = "4")]
    players: Vec<WireEntity>,
}

#[derive(Clone, PartialEq, Message)]
struct WireEntity {
    #[prost(string, tag = "1")]
    name: String,
    #[prost(enumeration = "WireCategory", tag = "2")]
    category: i32,
    #[prost(bool, tag = "3")]
    is_active: bool,
    #[prost(bool, tag = "4")]
    is_alive: bool,
    #[prost(message, optional, tag = "5")]
    position: Option<WireVec3>,
    #[prost(message, optional, tag = "6")]
    rotation: Option<WireVec2>,
}

#[derive(Clone, PartialEq, Message)]
struct WireVec3 {
    #[prost(float, tag = "1")]
    x: f32,
    #[prost(float, tag = "2")]
    y: f32,
    #[prost(float, tag = "3")]
    z: f32,
}

#[derive(Clone, PartialEq, Message)]
struct WireVec2 {
    #[prost(float, tag = "1")]
    x: f32,
    #[prost(float, tag = "2")]
    y: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, prost::Enumeration)]
#[repr(i32)]
enum WireCategory {
    Local = 0,
    Teammate = 1,
    Hostile = 2,
    HostileScav = 3,
    Bot = 4,
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
