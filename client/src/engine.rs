use stellarlink_shared::{OutboundMessage, PlayerName, VesselId};

use crate::config::SyncConfig;
use crate::diagnostics::SyncDiagnostics;
use crate::dock::DockEngine;
use crate::events::{EventRouter, GameEvent, SubscriptionHandle};
use crate::locks::LockRegistry;
use crate::proto::ProtoEngine;
use crate::remove::RemovalTracker;
use crate::scheduler::{ScheduledAction, TaskScheduler};
use crate::sender::MessageSender;
use crate::time::SyncClock;
use crate::warp::SubspaceCoordinator;
use crate::world::GameWorld;

/// Collaborators handed into every handler invocation. Built fresh from the
/// layer's fields plus the per-call world and sender references, so the
/// engines never hold collaborators across events.
pub(crate) struct Services<'a> {
    pub clock: &'a SyncClock,
    pub config: &'a SyncConfig,
    pub locks: &'a mut LockRegistry,
    pub warp: &'a mut SubspaceCoordinator,
    pub scheduler: &'a mut TaskScheduler,
    pub removals: &'a mut RemovalTracker,
    pub world: &'a mut dyn GameWorld,
    pub sender: &'a mut dyn MessageSender,
    pub local_player: &'a str,
}

/// Capture and broadcast a vessel's proto snapshot. Returns whether the send
/// happened; an unknown vessel is a silent miss (the triggering event may
/// legitimately concern an entity outside this client's knowledge).
pub(crate) fn send_vessel_snapshot(services: &mut Services, vessel: VesselId) -> bool {
    let Some(proto) = services.world.proto_snapshot(vessel) else {
        return false;
    };
    services
        .sender
        .send(OutboundMessage::VesselSnapshot { proto });
    true
}

/// The vessel synchronization layer.
///
/// Owns the clock, scheduler, lock registry, subspace coordinator and the
/// docking/proto engines. The host feeds it [`GameEvent`]s through
/// [`handle_event`](Self::handle_event) and pumps [`tick`](Self::tick) from
/// the simulation thread; the game world and the message sender are passed
/// into each call so the layer never outlives or captures them.
pub struct SyncLayer {
    local_player: PlayerName,
    config: SyncConfig,
    clock: SyncClock,
    scheduler: TaskScheduler,
    locks: LockRegistry,
    warp: SubspaceCoordinator,
    removals: RemovalTracker,
    dock: DockEngine,
    proto: ProtoEngine,
    router: EventRouter,
}

impl SyncLayer {
    pub fn new(local_player: impl Into<PlayerName>, config: SyncConfig, clock: SyncClock) -> Self {
        Self {
            local_player: local_player.into(),
            config,
            clock,
            scheduler: TaskScheduler::new(),
            locks: LockRegistry::new(),
            warp: SubspaceCoordinator::new(0),
            removals: RemovalTracker::new(),
            dock: DockEngine::new(),
            proto: ProtoEngine::new(),
            router: EventRouter::new(),
        }
    }

    /// Attach to the host's event stream. Events dispatched while no
    /// subscription is active are dropped.
    pub fn subscribe(&mut self) -> SubscriptionHandle {
        self.router.subscribe()
    }

    /// Detach a subscription taken out with [`subscribe`](Self::subscribe).
    pub fn unsubscribe(&mut self, handle: SubscriptionHandle) -> bool {
        self.router.unsubscribe(handle)
    }

    pub fn clock(&self) -> &SyncClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut SyncClock {
        &mut self.clock
    }

    pub fn locks(&self) -> &LockRegistry {
        &self.locks
    }

    pub fn locks_mut(&mut self) -> &mut LockRegistry {
        &mut self.locks
    }

    pub fn warp(&self) -> &SubspaceCoordinator {
        &self.warp
    }

    pub fn warp_mut(&mut self) -> &mut SubspaceCoordinator {
        &mut self.warp
    }

    /// Dispatch one game-level event. Fire-and-forget: handlers never fail,
    /// they degrade to "state is momentarily stale, corrected by the next
    /// event".
    pub fn handle_event(
        &mut self,
        event: GameEvent,
        world: &mut dyn GameWorld,
        sender: &mut dyn MessageSender,
    ) {
        if !self.router.has_subscribers() {
            return;
        }

        let mut services = Services {
            clock: &self.clock,
            config: &self.config,
            locks: &mut self.locks,
            warp: &mut self.warp,
            scheduler: &mut self.scheduler,
            removals: &mut self.removals,
            world,
            sender,
            local_player: &self.local_player,
        };

        match event {
            GameEvent::DockStart { vessel1, vessel2 } => {
                self.dock.on_dock_start(vessel1, vessel2, &mut services);
            }
            GameEvent::DockComplete { merged } => {
                self.dock.on_dock_complete(merged, &mut services);
            }
            GameEvent::UndockStart { part } => {
                self.dock.on_undock_start(part, &mut services);
            }
            GameEvent::UndockComplete { vessel1, vessel2 } => {
                self.dock.on_undock_complete(vessel1, vessel2, &mut services);
            }
            GameEvent::PartCountChanged { vessel } => {
                self.proto
                    .on_part_count_changed(vessel, self.dock.episodes(), &mut services);
            }
            GameEvent::FlightReady => {
                self.proto.on_flight_ready(&mut services);
            }
            GameEvent::VesselInitialized {
                vessel,
                from_ship_assembly,
            } => {
                self.proto
                    .on_vessel_initialized(vessel, from_ship_assembly, &mut services);
            }
            GameEvent::SceneRequested { scene } => {
                self.proto.on_scene_requested(scene, &mut services);
                self.dock.on_scene_requested(scene, &mut services);
            }
            GameEvent::ScienceTransmitted { subject_id } => {
                self.proto.on_science_transmitted(&subject_id, &mut services);
            }
            GameEvent::ScienceStored { subject_id } => {
                self.proto.on_science_stored(&subject_id, &mut services);
            }
            GameEvent::ScienceReset => {
                self.proto.on_science_reset(&mut services);
            }
        }
    }

    /// Resume every scheduled continuation that is due. Called from the
    /// simulation thread's tick; each task re-checks its own relevance
    /// before acting.
    pub fn tick(&mut self, world: &mut dyn GameWorld, sender: &mut dyn MessageSender) {
        self.dock.prune_stale(world);
        self.removals
            .prune_confirmed(|vessel| world.vessel(vessel).is_some());

        let now = self.clock.computer_utc_now();
        let due = self.scheduler.take_due(now);

        for task in due {
            let mut services = Services {
                clock: &self.clock,
                config: &self.config,
                locks: &mut self.locks,
                warp: &mut self.warp,
                scheduler: &mut self.scheduler,
                removals: &mut self.removals,
                world,
                sender,
                local_player: &self.local_player,
            };

            match task.action {
                ScheduledAction::SendWeakSideDockInfo { weak, subspace } => {
                    self.dock.fire_weak_side_grace(weak, subspace, &mut services);
                }
                ScheduledAction::PollForDominantSwitch {
                    weak,
                    subspace,
                    deadline,
                } => {
                    self.dock
                        .fire_catch_up_poll(weak, subspace, deadline, &mut services);
                }
                ScheduledAction::SendCaughtUpDockInfo { weak, subspace } => {
                    self.dock.fire_catch_up_grace(weak, subspace, &mut services);
                }
                ScheduledAction::FlushPartChange { vessel } => {
                    self.proto.fire_part_change_flush(vessel, &mut services);
                }
                ScheduledAction::AnnounceNewVessel { vessel } => {
                    self.proto.fire_new_vessel_announce(vessel, &mut services);
                }
            }
        }
    }

    /// Read-only snapshot for a diagnostics overlay.
    pub fn diagnostics(&self) -> SyncDiagnostics {
        let now = self.clock.network_utc_now();
        SyncDiagnostics {
            current_subspace: self.warp.current_subspace(),
            current_subspace_time: self.warp.current_subspace_time(now),
            network_offset_millis: self.clock.network_offset_millis(),
            computer_offset_millis: self.clock.computer_offset_millis(),
            active_dock_episodes: self.dock.episodes().dock_count(),
            undocking_vessel: self.dock.episodes().undocking_vessel(),
            queued_vessels: self.proto.queued_count(),
            pending_removals: self.removals.pending_count(),
            scheduled_tasks: self.scheduler.len(),
        }
    }
}
