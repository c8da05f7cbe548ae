pub mod fakes;

use stellarlink_shared::{PartId, PersistentId, PlayerName, VesselId, VesselProto};

/// Snapshot of what the game currently knows about one vessel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VesselInfo {
    pub id: VesselId,
    pub persistent_id: PersistentId,
    pub is_eva: bool,
    /// Parts currently rendered by the simulation.
    pub part_count: usize,
    /// Parts recorded in the stored proto snapshot. Divergence from
    /// `part_count` while spectating means the local render is stale.
    pub stored_part_count: usize,
    /// Still being materialized by the game; transient signals from such a
    /// vessel are duplicates of the eventual real ones.
    pub spawning: bool,
}

/// Read/query capability over the running simulation, injected into the sync
/// layer at construction. Everything the docking protocol and the debounce
/// engine need from the game lives behind this seam, so the layer is
/// unit-testable without a live simulation environment.
pub trait GameWorld {
    fn vessel(&self, id: VesselId) -> Option<VesselInfo>;

    fn vessel_by_persistent_id(&self, id: PersistentId) -> Option<VesselInfo>;

    /// The vessel the local client is flying or observing, if any.
    fn active_vessel(&self) -> Option<VesselInfo>;

    /// Whether the local client is passively observing a vessel it does not
    /// control.
    fn is_spectating(&self) -> bool;

    fn in_flight_scene(&self) -> bool;

    /// The vessel a loader operation is currently materializing, if any.
    fn currently_loading_vessel(&self) -> Option<VesselId>;

    /// Capture the canonical proto snapshot of a vessel, backing up its
    /// current state first. `None` when the vessel is unknown locally.
    fn proto_snapshot(&self, id: VesselId) -> Option<VesselProto>;

    fn crew_names(&self, id: VesselId) -> Vec<PlayerName>;

    /// The vessel currently containing `part`, if resolvable.
    fn containing_vessel_of_part(&self, part: PartId) -> Option<VesselId>;

    /// Ask the game to reload the vessel from its stored proto. Used when the
    /// spectated vessel's local render went stale.
    fn request_reload(&mut self, id: VesselId);

    /// Resolve a science subject id; `None` when the subject is outside this
    /// client's knowledge.
    fn science_subject(&self, subject_id: &str) -> Option<String>;

    /// The dominance rule: a deterministic total order over two merging
    /// vessels, decided by the simulation core (mass/type heuristics).
    /// Callers must query it exactly once per dock episode and cache the
    /// result; after the merge the inputs may no longer exist as distinct
    /// objects.
    fn dominant_vessel(&self, a: VesselId, b: VesselId) -> VesselId;
}
