use stellarlink_shared::{SubspaceId, UtcInstant, VesselId};

/// Read-only state snapshot consumed by the debug overlay.
///
/// Pure diagnostics: rendering it must never mutate the layer, and nothing
/// in the layer depends on it being read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncDiagnostics {
    pub current_subspace: SubspaceId,
    pub current_subspace_time: UtcInstant,
    pub network_offset_millis: i64,
    pub computer_offset_millis: i64,
    pub active_dock_episodes: usize,
    pub undocking_vessel: Option<VesselId>,
    pub queued_vessels: usize,
    pub pending_removals: usize,
    pub scheduled_tasks: usize,
}
