use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::PlayerName;

/// Stable vessel identifier that survives merges and splits. Two vessels that
/// dock produce a composite carrying the dominant vessel's persistent id.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct PersistentId(pub u32);

impl fmt::Display for PersistentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of one physical vessel instance. Unlike [`PersistentId`] this
/// changes across dock/undock, so it is only valid while the instance exists.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct VesselId(Uuid);

impl VesselId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl fmt::Display for VesselId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a single part within a vessel.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct PartId(pub u32);

/// Serialized canonical state of a vessel, as broadcast to the relay server.
///
/// The payload is opaque to the sync layer; only the identifiers, the part
/// count and the crew list are inspected when arbitrating ownership.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct VesselProto {
    pub vessel_id: VesselId,
    pub persistent_id: PersistentId,
    pub part_count: usize,
    pub crew: Vec<PlayerName>,
    pub payload: Vec<u8>,
}
