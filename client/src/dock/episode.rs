use std::collections::HashMap;

use stellarlink_shared::{PersistentId, UtcInstant, VesselId};

/// Context of one docking episode, created at dock-start and kept until an
/// undock involving one of its vessels completes.
///
/// `own_dominant` is captured at dock-start, before part lists mutate: after
/// the merge both former vessel objects may no longer independently exist, so
/// the flag cannot be recomputed later. The dominance result is likewise
/// cached here for the episode's lifetime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DockEpisode {
    pub started_at: UtcInstant,
    pub dominant: VesselId,
    pub dominant_persistent: PersistentId,
    pub weak: VesselId,
    pub own_dominant: bool,
    /// Set when dock-complete has been processed, so a duplicate completion
    /// notification cannot re-broadcast.
    pub completed: bool,
}

/// Context of one undocking episode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UndockEpisode {
    pub vessel: VesselId,
}

/// Dock episodes keyed by the normalized vessel pair, so unrelated pairs
/// docking at the same time cannot collide.
pub(crate) struct EpisodeRegistry {
    docks: HashMap<(VesselId, VesselId), DockEpisode>,
    undock: Option<UndockEpisode>,
}

fn pair_key(a: VesselId, b: VesselId) -> (VesselId, VesselId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl EpisodeRegistry {
    pub(crate) fn new() -> Self {
        Self {
            docks: HashMap::new(),
            undock: None,
        }
    }

    /// Insert a new episode, superseding any earlier one for the same pair.
    pub(crate) fn insert(&mut self, episode: DockEpisode) {
        let key = pair_key(episode.dominant, episode.weak);
        self.docks.insert(key, episode);
    }

    pub(crate) fn find_by_dominant(&self, dominant: VesselId) -> Option<&DockEpisode> {
        self.docks.values().find(|ep| ep.dominant == dominant)
    }

    pub(crate) fn find_by_dominant_mut(&mut self, dominant: VesselId) -> Option<&mut DockEpisode> {
        self.docks.values_mut().find(|ep| ep.dominant == dominant)
    }

    pub(crate) fn find_by_weak(&self, weak: VesselId) -> Option<&DockEpisode> {
        self.docks.values().find(|ep| ep.weak == weak)
    }

    /// Part-count changes of a vessel involved in an active dock or undock
    /// are handled by the docking protocol exclusively; relaying them through
    /// the debounce path would double-broadcast.
    pub(crate) fn suppresses_part_changes(&self, vessel: VesselId) -> bool {
        if self.find_by_dominant(vessel).is_some() {
            return true;
        }
        self.undock.as_ref().map(|ep| ep.vessel) == Some(vessel)
    }

    pub(crate) fn set_undock(&mut self, episode: UndockEpisode) {
        self.undock = Some(episode);
    }

    pub(crate) fn undocking_vessel(&self) -> Option<VesselId> {
        self.undock.as_ref().map(|ep| ep.vessel)
    }

    /// Resolve an undock of the two final vessels: drops the undock record
    /// and only the dock episode(s) a participant of the split was part of.
    /// Unrelated pairs' episodes stay pending.
    pub(crate) fn resolve_undock(&mut self, vessel1: VesselId, vessel2: VesselId) {
        self.docks.retain(|_, ep| {
            ep.dominant != vessel1
                && ep.dominant != vessel2
                && ep.weak != vessel1
                && ep.weak != vessel2
        });
        self.undock = None;
    }

    /// Drop episodes whose dominant vessel the game no longer knows; none of
    /// their continuations can produce a broadcast anymore.
    pub(crate) fn prune_stale(&mut self, vessel_exists: impl Fn(VesselId) -> bool) {
        self.docks.retain(|_, ep| vessel_exists(ep.dominant));
    }

    pub(crate) fn dock_count(&self) -> usize {
        self.docks.len()
    }
}
