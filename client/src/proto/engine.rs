use std::collections::HashSet;

use log::info;

use stellarlink_shared::{OutboundMessage, VesselId};

use crate::dock::EpisodeRegistry;
use crate::engine::{send_vessel_snapshot, Services};
use crate::events::GameScene;
use crate::scheduler::ScheduledAction;

/// Vessel-change debounce and ownership arbitration.
///
/// Every physical part-count change lands here (staging and decoupling can
/// fire it once per separating part). The engine discards transient signals,
/// bootstraps ownership of freshly appeared vessels, and coalesces bursts
/// into one immediate plus one trailing snapshot. It also carries the
/// non-docking announce triggers: flight-ready, new vessels, scene exits and
/// science events.
pub(crate) struct ProtoEngine {
    /// Debounce markers: vessels with a coalesced send pending.
    queued: HashSet<VesselId>,
}

impl ProtoEngine {
    pub(crate) fn new() -> Self {
        Self {
            queued: HashSet::new(),
        }
    }

    pub(crate) fn queued_count(&self) -> usize {
        self.queued.len()
    }

    /// Sends our vessel just when we start the flight.
    pub(crate) fn on_flight_ready(&mut self, services: &mut Services) {
        if services.world.is_spectating() {
            return;
        }
        let Some(active) = services.world.active_vessel() else {
            return;
        };
        if active.id.is_nil() {
            return;
        }
        send_vessel_snapshot(services, active.id);
    }

    /// Called when a vessel object is initiated.
    pub(crate) fn on_vessel_initialized(
        &mut self,
        vessel: VesselId,
        from_ship_assembly: bool,
        services: &mut Services,
    ) {
        if services.world.vessel(vessel).is_none() {
            return;
        }
        // The vessel is being created by the loader.
        if services.world.currently_loading_vessel() == Some(vessel) || from_ship_assembly {
            return;
        }
        // This happens when the vessel we are spectating crashes.
        if services.world.is_spectating() {
            services.removals.flag_for_kill(
                vessel,
                "tried to create a new vessel while spectating",
                services.sender,
            );
            return;
        }
        // It's a debris vessel that we made.
        if !services.locks.unloaded_update_lock_exists(vessel) {
            // Delay the announce until the vessel has been named and
            // finalized by the game.
            let now = services.clock.computer_utc_now();
            services.scheduler.schedule(
                now + services.config.new_vessel_announce_delay,
                ScheduledAction::AnnounceNewVessel { vessel },
            );
            services
                .locks
                .acquire_update_lock(vessel, false, services.local_player);
        }
    }

    /// Event called when a scene switch is requested, before reaching it.
    pub(crate) fn on_scene_requested(&mut self, scene: GameScene, services: &mut Services) {
        if services.world.in_flight_scene()
            && scene != GameScene::Flight
            && !services.world.is_spectating()
        {
            // When quitting flight, send the vessel one last time.
            if let Some(active) = services.world.active_vessel() {
                send_vessel_snapshot(services, active.id);
            }
        }
    }

    /// Triggered when the vessel parts change. Staging can fire this once
    /// per decoupling part; docking and reloading fire it too.
    pub(crate) fn on_part_count_changed(
        &mut self,
        vessel: VesselId,
        episodes: &EpisodeRegistry,
        services: &mut Services,
    ) {
        let Some(info) = services.world.vessel(vessel) else {
            return;
        };
        // The vessel is being created by the loader.
        if services.world.currently_loading_vessel() == Some(vessel) {
            return;
        }
        // A docking vessel's part count changes, but the dock system relays
        // that; forwarding it here as well would double-broadcast.
        if episodes.suppresses_part_changes(vessel) {
            return;
        }
        // Still being created; we don't own it yet.
        if info.spawning {
            return;
        }
        // Scheduled to be killed, so ignore this.
        if services.removals.will_be_killed(vessel) {
            return;
        }
        // Spectating and the vessel has been modified: the local render is
        // stale relative to the authoritative snapshot, so reload it.
        if services.world.is_spectating() {
            if let Some(active) = services.world.active_vessel() {
                if active.id == vessel && info.stored_part_count != info.part_count {
                    info!("spectated vessel {} diverged, reloading", vessel);
                    services.world.request_reload(vessel);
                    return;
                }
            }
        }

        // Ownership bootstrap: a vessel nobody updates yet is new debris we
        // created.
        let mut sent_immediate = false;
        if !services.locks.update_lock_exists(vessel) {
            services
                .locks
                .acquire_update_lock(vessel, false, services.local_player);
            sent_immediate = send_vessel_snapshot(services, vessel);
        }

        if services
            .locks
            .update_lock_belongs_to(vessel, services.local_player)
        {
            // Coalesce the burst: one send now, one settled send when the
            // window closes.
            if self.queued.contains(&vessel) {
                return;
            }
            self.queued.insert(vessel);
            let now = services.clock.computer_utc_now();
            services.scheduler.schedule(
                now + services.config.part_change_debounce,
                ScheduledAction::FlushPartChange { vessel },
            );
            if !sent_immediate {
                send_vessel_snapshot(services, vessel);
            }
        }
    }

    /// Debounce window closed: send one snapshot reflecting the settled
    /// state.
    pub(crate) fn fire_part_change_flush(&mut self, vessel: VesselId, services: &mut Services) {
        if !self.queued.remove(&vessel) {
            return;
        }
        send_vessel_snapshot(services, vessel);
    }

    /// Naming delay elapsed: announce the freshly created vessel.
    pub(crate) fn fire_new_vessel_announce(&mut self, vessel: VesselId, services: &mut Services) {
        send_vessel_snapshot(services, vessel);
    }

    /// Triggered when transmitting science. The experiment is stored in the
    /// vessel, so the definition must be re-announced with the subject.
    pub(crate) fn on_science_transmitted(&mut self, subject_id: &str, services: &mut Services) {
        self.announce_with_subject(subject_id, "transmission", services);
    }

    /// Triggered when storing science aboard.
    pub(crate) fn on_science_stored(&mut self, subject_id: &str, services: &mut Services) {
        self.announce_with_subject(subject_id, "storage", services);
    }

    /// Triggered when resetting an experiment.
    pub(crate) fn on_science_reset(&mut self, services: &mut Services) {
        if services.world.is_spectating() {
            return;
        }
        let Some(active) = services.world.active_vessel() else {
            return;
        };
        info!("detected an experiment reset, re-announcing the vessel");
        send_vessel_snapshot(services, active.id);
    }

    fn announce_with_subject(&mut self, subject_id: &str, trigger: &str, services: &mut Services) {
        if services.world.is_spectating() {
            return;
        }
        let Some(active) = services.world.active_vessel() else {
            return;
        };
        let Some(subject) = services.world.science_subject(subject_id) else {
            return;
        };
        info!(
            "detected an experiment {}, re-announcing the vessel",
            trigger
        );
        send_vessel_snapshot(services, active.id);
        services
            .sender
            .send(OutboundMessage::ScienceSubject { subject_id: subject });
    }
}
