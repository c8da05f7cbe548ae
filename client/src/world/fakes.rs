//! Hand-rolled fakes for exercising the sync layer without a simulation.
//!
//! Exported so downstream crates can drive the layer in their own tests.

use std::cell::Cell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::time::Duration;

use stellarlink_shared::{
    OutboundMessage, PartId, PersistentId, PlayerName, UtcInstant, VesselId, VesselProto,
};

use crate::sender::MessageSender;
use crate::time::TimeSource;
use crate::world::{GameWorld, VesselInfo};

/// Test double for [`GameWorld`]: vessels, crew and science subjects are
/// plain maps, dominance is decided by a per-vessel mass table, and every
/// dominance query is counted so tests can assert the rule is consulted
/// exactly once per dock episode.
pub struct FakeGameWorld {
    vessels: HashMap<VesselId, VesselInfo>,
    by_persistent: HashMap<PersistentId, VesselId>,
    crew: HashMap<VesselId, Vec<PlayerName>>,
    parts: HashMap<PartId, VesselId>,
    masses: HashMap<VesselId, u32>,
    subjects: HashSet<String>,
    pub active: Option<VesselId>,
    pub spectating: bool,
    pub in_flight: bool,
    pub loading: Option<VesselId>,
    pub reload_requests: Vec<VesselId>,
    dominance_queries: Cell<usize>,
}

impl FakeGameWorld {
    pub fn new() -> Self {
        Self {
            vessels: HashMap::new(),
            by_persistent: HashMap::new(),
            crew: HashMap::new(),
            parts: HashMap::new(),
            masses: HashMap::new(),
            subjects: HashSet::new(),
            active: None,
            spectating: false,
            in_flight: true,
            loading: None,
            reload_requests: Vec::new(),
            dominance_queries: Cell::new(0),
        }
    }

    pub fn insert_vessel(&mut self, info: VesselInfo) {
        self.by_persistent.insert(info.persistent_id, info.id);
        self.vessels.insert(info.id, info);
    }

    pub fn remove_vessel(&mut self, id: VesselId) {
        if let Some(info) = self.vessels.remove(&id) {
            self.by_persistent.remove(&info.persistent_id);
        }
    }

    pub fn vessel_mut(&mut self, id: VesselId) -> Option<&mut VesselInfo> {
        self.vessels.get_mut(&id)
    }

    pub fn set_mass(&mut self, id: VesselId, mass: u32) {
        self.masses.insert(id, mass);
    }

    pub fn set_crew(&mut self, id: VesselId, crew: Vec<PlayerName>) {
        self.crew.insert(id, crew);
    }

    pub fn set_part(&mut self, part: PartId, vessel: VesselId) {
        self.parts.insert(part, vessel);
    }

    pub fn add_subject(&mut self, subject: impl Into<String>) {
        self.subjects.insert(subject.into());
    }

    /// Reassign the active vessel's identity, as the game does when the
    /// client switches into the merged (dominant) vessel.
    pub fn switch_active(&mut self, id: VesselId) {
        self.active = Some(id);
    }

    pub fn dominance_queries(&self) -> usize {
        self.dominance_queries.get()
    }
}

impl Default for FakeGameWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl GameWorld for FakeGameWorld {
    fn vessel(&self, id: VesselId) -> Option<VesselInfo> {
        self.vessels.get(&id).cloned()
    }

    fn vessel_by_persistent_id(&self, id: PersistentId) -> Option<VesselInfo> {
        self.by_persistent
            .get(&id)
            .and_then(|vessel| self.vessels.get(vessel))
            .cloned()
    }

    fn active_vessel(&self) -> Option<VesselInfo> {
        self.active.and_then(|id| self.vessels.get(&id)).cloned()
    }

    fn is_spectating(&self) -> bool {
        self.spectating
    }

    fn in_flight_scene(&self) -> bool {
        self.in_flight
    }

    fn currently_loading_vessel(&self) -> Option<VesselId> {
        self.loading
    }

    fn proto_snapshot(&self, id: VesselId) -> Option<VesselProto> {
        let info = self.vessels.get(&id)?;
        Some(VesselProto {
            vessel_id: info.id,
            persistent_id: info.persistent_id,
            part_count: info.part_count,
            crew: self.crew.get(&id).cloned().unwrap_or_default(),
            payload: Vec::new(),
        })
    }

    fn crew_names(&self, id: VesselId) -> Vec<PlayerName> {
        self.crew.get(&id).cloned().unwrap_or_default()
    }

    fn containing_vessel_of_part(&self, part: PartId) -> Option<VesselId> {
        self.parts.get(&part).copied()
    }

    fn request_reload(&mut self, id: VesselId) {
        self.reload_requests.push(id);
    }

    fn science_subject(&self, subject_id: &str) -> Option<String> {
        self.subjects.get(subject_id).cloned()
    }

    fn dominant_vessel(&self, a: VesselId, b: VesselId) -> VesselId {
        self.dominance_queries.set(self.dominance_queries.get() + 1);
        let mass_a = self.masses.get(&a).copied().unwrap_or(0);
        let mass_b = self.masses.get(&b).copied().unwrap_or(0);
        if mass_a >= mass_b {
            a
        } else {
            b
        }
    }
}

/// Sender that records everything instead of delivering it.
pub struct RecordingSender {
    pub sent: Vec<OutboundMessage>,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self { sent: Vec::new() }
    }

    pub fn kinds(&self) -> Vec<&'static str> {
        self.sent.iter().map(OutboundMessage::kind_name).collect()
    }

    pub fn clear(&mut self) {
        self.sent.clear();
    }
}

impl Default for RecordingSender {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageSender for RecordingSender {
    fn send(&mut self, message: OutboundMessage) {
        self.sent.push(message);
    }
}

/// Cloneable manual clock: the test keeps one handle to advance time while
/// the layer's `SyncClock` owns the other.
#[derive(Clone)]
pub struct ManualTimeSource {
    now: Rc<Cell<i64>>,
}

impl ManualTimeSource {
    pub fn starting_at(millis: i64) -> Self {
        Self {
            now: Rc::new(Cell::new(millis)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by.as_millis() as i64);
    }

    pub fn set_millis(&self, millis: i64) {
        self.now.set(millis);
    }
}

impl TimeSource for ManualTimeSource {
    fn raw_utc_now(&self) -> UtcInstant {
        UtcInstant::from_millis(self.now.get())
    }
}
