use log::info;

use stellarlink_shared::{OutboundMessage, PartId, PersistentId, SubspaceId, UtcInstant, VesselId};

use crate::dock::episode::{DockEpisode, EpisodeRegistry, UndockEpisode};
use crate::engine::{send_vessel_snapshot, Services};
use crate::events::GameScene;
use crate::scheduler::{ScheduledAction, TaskKind};
use crate::world::GameWorld;

/// The docking/undocking ownership-transfer state machine.
///
/// Reacts to game-level dock events, computes vessel dominance, migrates
/// locks, reconciles subspaces and decides whether the local client
/// broadcasts immediately, after a grace period, or not at all.
pub(crate) struct DockEngine {
    episodes: EpisodeRegistry,
}

impl DockEngine {
    pub(crate) fn new() -> Self {
        Self {
            episodes: EpisodeRegistry::new(),
        }
    }

    pub(crate) fn episodes(&self) -> &EpisodeRegistry {
        &self.episodes
    }

    /// Called just before the docking sequence starts, while both vessels
    /// still exist as distinct objects.
    pub(crate) fn on_dock_start(
        &mut self,
        vessel1: PersistentId,
        vessel2: PersistentId,
        services: &mut Services,
    ) {
        let Some(v1) = services.world.vessel_by_persistent_id(vessel1) else {
            return;
        };
        let Some(v2) = services.world.vessel_by_persistent_id(vessel2) else {
            return;
        };

        // EVA vessels never merge identities.
        if v1.is_eva || v2.is_eva {
            return;
        }

        // The dominance rule is queried exactly once per episode and cached:
        // after the merge the inputs may no longer exist as distinct objects.
        let dominant_id = services.world.dominant_vessel(v1.id, v2.id);
        let (dominant, weak) = if dominant_id == v1.id {
            (v1, v2)
        } else {
            (v2, v1)
        };

        let own_dominant = services
            .world
            .active_vessel()
            .map(|active| active.id == dominant.id)
            .unwrap_or(false);

        info!(
            "docking started: dominant {} absorbs weak {}",
            dominant.id, weak.id
        );

        self.episodes.insert(DockEpisode {
            started_at: services.clock.network_utc_now(),
            dominant: dominant.id,
            dominant_persistent: dominant.persistent_id,
            weak: weak.id,
            own_dominant,
            completed: false,
        });
    }

    /// Fires once the game-level merge is physically finished. `merged` is
    /// the surviving vessel instance, which carries the dominant identity.
    pub(crate) fn on_dock_complete(&mut self, merged: VesselId, services: &mut Services) {
        let Some(episode) = self.episodes.find_by_dominant_mut(merged) else {
            return;
        };
        if episode.completed {
            return;
        }
        episode.completed = true;
        let episode = episode.clone();

        info!(
            "docking finished: we {} the dominant vessel {}",
            if episode.own_dominant {
                "own"
            } else {
                "do not own"
            },
            episode.dominant
        );

        // A client behind in time must catch up before exchanging state:
        // broadcasting from a less advanced subspace would hand every other
        // client a merged vessel older than what they already know.
        self.jump_if_dominant_owner_is_in_future(episode.dominant, services);

        if episode.own_dominant {
            if let Some(active) = services.world.active_vessel() {
                if let Some(proto) = services.world.proto_snapshot(active.id) {
                    services.sender.send(OutboundMessage::DockInfo {
                        weak_vessel_id: episode.weak,
                        owner_vessel: proto.clone(),
                        subspace: services.warp.current_subspace(),
                        full_proto: None,
                    });
                    services
                        .sender
                        .send(OutboundMessage::VesselSnapshot { proto });
                }
            }
            services.removals.soft_remove(episode.weak, services.sender);
        } else {
            // The dominant owner must detect the merge first; a premature
            // broadcast from here would make it misclassify itself as the
            // weak party and corrupt the undock path later.
            let now = services.clock.computer_utc_now();
            let subspace = services.warp.current_subspace();
            services.scheduler.schedule(
                now + services.config.weak_side_dock_grace,
                ScheduledAction::SendWeakSideDockInfo {
                    weak: episode.weak,
                    subspace,
                },
            );
            services.scheduler.schedule(
                now + services.config.catch_up_poll_interval,
                ScheduledAction::PollForDominantSwitch {
                    weak: episode.weak,
                    subspace,
                    deadline: now + services.config.catch_up_timeout,
                },
            );
        }
    }

    /// Event called just when the undocking starts.
    pub(crate) fn on_undock_start(&mut self, part: PartId, services: &mut Services) {
        let Some(vessel) = services.world.containing_vessel_of_part(part) else {
            return;
        };
        self.episodes.set_undock(UndockEpisode { vessel });
    }

    /// Event called after the undocking completed and the two final vessels
    /// exist.
    pub(crate) fn on_undock_complete(
        &mut self,
        vessel1: VesselId,
        vessel2: VesselId,
        services: &mut Services,
    ) {
        if services.world.is_spectating() {
            return;
        }

        info!("undock detected");

        send_vessel_snapshot(services, vessel1);
        send_vessel_snapshot(services, vessel2);

        // Release the locks of the vessel we are not in, so the rightful
        // owner can re-acquire them.
        let occupies_first = services
            .world
            .active_vessel()
            .map(|active| active.id == vessel1)
            .unwrap_or(false);
        let to_release = if occupies_first { vessel2 } else { vessel1 };
        let crew = services.world.crew_names(to_release);
        services.locks.release_all_locks(&crew, to_release);

        info!(
            "undocking finished: vessels {} and {}",
            vessel1, vessel2
        );
        self.episodes.resolve_undock(vessel1, vessel2);
    }

    /// Drop episodes for dominant vessels the game no longer knows.
    pub(crate) fn prune_stale(&mut self, world: &dyn GameWorld) {
        self.episodes
            .prune_stale(|vessel| world.vessel(vessel).is_some());
    }

    /// Leaving the flight scene cancels any in-flight catch-up explicitly.
    pub(crate) fn on_scene_requested(&mut self, scene: GameScene, services: &mut Services) {
        if scene != GameScene::Flight {
            services.scheduler.cancel_kind(TaskKind::CatchUpPoll);
            services.scheduler.cancel_kind(TaskKind::CatchUpGrace);
        }
    }

    /// Weak-side grace continuation: broadcast the dock now that the
    /// dominant owner has had time to detect the merge.
    pub(crate) fn fire_weak_side_grace(
        &mut self,
        weak: VesselId,
        subspace: SubspaceId,
        services: &mut Services,
    ) {
        // Voided when the episode was reset before the task fired.
        let Some(episode) = self.episodes.find_by_weak(weak) else {
            return;
        };
        if !episode.completed {
            return;
        }

        if let Some(active) = services.world.active_vessel() {
            if let Some(proto) = services.world.proto_snapshot(active.id) {
                services.sender.send(OutboundMessage::DockInfo {
                    weak_vessel_id: weak,
                    owner_vessel: proto,
                    subspace,
                    full_proto: None,
                });
            }
        }
        services.removals.soft_remove(weak, services.sender);
    }

    /// Catch-up poll continuation: wait until we fully switched to the
    /// dominant vessel, then arm the post-switch grace.
    pub(crate) fn fire_catch_up_poll(
        &mut self,
        weak: VesselId,
        subspace: SubspaceId,
        deadline: UtcInstant,
        services: &mut Services,
    ) {
        let Some(episode) = self.episodes.find_by_weak(weak) else {
            return;
        };
        if !episode.completed {
            return;
        }

        let now = services.clock.computer_utc_now();
        let switched = services
            .world
            .active_vessel()
            .map(|active| active.persistent_id == episode.dominant_persistent)
            .unwrap_or(false);

        if switched {
            // Wait a further grace so the dominant owner's client detects
            // the dock before our full snapshot arrives.
            services.scheduler.schedule(
                now + services.config.post_catch_up_grace,
                ScheduledAction::SendCaughtUpDockInfo { weak, subspace },
            );
            return;
        }

        if now >= deadline {
            // Degraded delivery, not an error: the dominant owner
            // re-announces the vessel through its own part-count path.
            info!(
                "gave up waiting for the switch to dominant vessel {} (weak {})",
                episode.dominant, weak
            );
            return;
        }

        services.scheduler.supersede(
            now + services.config.catch_up_poll_interval,
            ScheduledAction::PollForDominantSwitch {
                weak,
                subspace,
                deadline,
            },
        );
    }

    /// Post-switch grace continuation: broadcast the dock with the full
    /// merged proto.
    pub(crate) fn fire_catch_up_grace(
        &mut self,
        weak: VesselId,
        subspace: SubspaceId,
        services: &mut Services,
    ) {
        let Some(episode) = self.episodes.find_by_weak(weak) else {
            return;
        };
        if !episode.completed {
            return;
        }

        let Some(active) = services.world.active_vessel() else {
            return;
        };
        if active.persistent_id != episode.dominant_persistent {
            return;
        }
        let Some(proto) = services.world.proto_snapshot(active.id) else {
            return;
        };

        info!(
            "sending dock info: final dominant vessel has {} parts",
            proto.part_count
        );
        services.sender.send(OutboundMessage::DockInfo {
            weak_vessel_id: weak,
            owner_vessel: proto.clone(),
            subspace,
            full_proto: Some(proto),
        });
    }

    /// Jumps to the subspace of the dominant vessel's controller in case that
    /// player is more advanced in time.
    fn jump_if_dominant_owner_is_in_future(&self, dominant: VesselId, services: &mut Services) {
        let Some(owner) = services.locks.control_lock_owner(dominant) else {
            return;
        };
        let Some(owner_subspace) = services.warp.player_subspace(owner) else {
            return;
        };
        services
            .warp
            .warp_into_subspace_if_more_advanced(owner_subspace);
    }
}
