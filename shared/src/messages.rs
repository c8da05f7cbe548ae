use serde::{Deserialize, Serialize};

use crate::{SubspaceId, VesselId, VesselProto};

/// Messages the sync layer hands to the relay server.
///
/// Transport and queueing are a black box behind the client's `MessageSender`
/// capability; this enum is the complete outbound schema.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum OutboundMessage {
    /// Two vessels merged: the weak vessel's identity is gone and the sender's
    /// vessel now carries the composite. `full_proto` is attached when the
    /// sender has fully caught up to the dominant vessel.
    DockInfo {
        weak_vessel_id: VesselId,
        owner_vessel: VesselProto,
        subspace: SubspaceId,
        full_proto: Option<VesselProto>,
    },
    /// Instructs all clients to delete the vessel from their local state.
    /// Non-destructive removal keeps crew/science already transferred.
    VesselRemove {
        vessel_id: VesselId,
        destructive: bool,
    },
    /// Full authoritative snapshot of one vessel.
    VesselSnapshot { proto: VesselProto },
    /// A science subject that must accompany a vessel re-announce.
    ScienceSubject { subject_id: String },
}

impl OutboundMessage {
    /// Short name used in operational logging.
    pub fn kind_name(&self) -> &'static str {
        match self {
            OutboundMessage::DockInfo { .. } => "DockInfo",
            OutboundMessage::VesselRemove { .. } => "VesselRemove",
            OutboundMessage::VesselSnapshot { .. } => "VesselSnapshot",
            OutboundMessage::ScienceSubject { .. } => "ScienceSubject",
        }
    }
}
