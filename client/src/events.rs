//! Game-event surface of the sync layer.
//!
//! The host binds its engine callbacks to [`crate::SyncLayer::handle_event`]
//! after taking out a subscription; dropping the subscription (via
//! `unsubscribe`) detaches the layer from the event stream without the host
//! having to unhook each callback individually.

use std::collections::HashSet;

use stellarlink_shared::{PartId, PersistentId, VesselId};

/// The scene the game is in or transitioning to.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum GameScene {
    Flight,
    SpaceCenter,
    Editor,
    TrackingStation,
    MainMenu,
}

/// Game-level notifications consumed by the sync layer. All handlers are
/// fire-and-forget: they return nothing and never escalate missing entities.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    /// Two vessels began merging. Fired before part lists mutate.
    DockStart {
        vessel1: PersistentId,
        vessel2: PersistentId,
    },
    /// The game-level merge is physically finished; `merged` is the
    /// surviving (dominant) vessel instance.
    DockComplete { merged: VesselId },
    /// A part began undocking.
    UndockStart { part: PartId },
    /// The split produced two final vessels.
    UndockComplete {
        vessel1: VesselId,
        vessel2: VesselId,
    },
    /// The vessel's physical part count changed (docking, undocking,
    /// staging and decoupling all produce this at the game layer).
    PartCountChanged { vessel: VesselId },
    /// The flight scene finished loading with the active vessel ready.
    FlightReady,
    /// A vessel object was initiated.
    VesselInitialized {
        vessel: VesselId,
        from_ship_assembly: bool,
    },
    /// A scene transition was requested but not yet performed.
    SceneRequested { scene: GameScene },
    ScienceTransmitted { subject_id: String },
    ScienceStored { subject_id: String },
    ScienceReset,
}

/// Handle returned by [`EventRouter::subscribe`]. Pass it back to
/// `unsubscribe` to detach.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct SubscriptionHandle(u64);

/// Tracks active event subscriptions. Events dispatched while no
/// subscription is active are dropped.
pub(crate) struct EventRouter {
    active: HashSet<u64>,
    next_id: u64,
}

impl EventRouter {
    pub(crate) fn new() -> Self {
        Self {
            active: HashSet::new(),
            next_id: 0,
        }
    }

    pub(crate) fn subscribe(&mut self) -> SubscriptionHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.active.insert(id);
        SubscriptionHandle(id)
    }

    pub(crate) fn unsubscribe(&mut self, handle: SubscriptionHandle) -> bool {
        self.active.remove(&handle.0)
    }

    pub(crate) fn has_subscribers(&self) -> bool {
        !self.active.is_empty()
    }
}
