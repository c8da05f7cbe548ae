//! Undocking: lock release for the vessel we are not occupying, episode
//! teardown, and part-change suppression while the split is in progress.

use std::time::Duration;

use stellarlink_client::{
    FakeGameWorld, GameEvent, ManualTimeSource, RecordingSender, SyncClock, SyncConfig, SyncLayer,
    VesselInfo,
};
use stellarlink_shared::{PartId, PersistentId, VesselId};

fn vessel(pid: u32, parts: usize) -> VesselInfo {
    VesselInfo {
        id: VesselId::random(),
        persistent_id: PersistentId(pid),
        is_eva: false,
        part_count: parts,
        stored_part_count: parts,
        spawning: false,
    }
}

fn harness() -> (SyncLayer, FakeGameWorld, RecordingSender, ManualTimeSource) {
    let time = ManualTimeSource::starting_at(1_000_000);
    let clock = SyncClock::new(Box::new(time.clone()));
    let mut layer = SyncLayer::new("dagger", SyncConfig::default(), clock);
    layer.subscribe();
    (layer, FakeGameWorld::new(), RecordingSender::new(), time)
}

#[test]
fn undock_releases_locks_of_the_vessel_we_left_behind() {
    let (mut layer, mut world, mut sender, _time) = harness();
    let ours = vessel(1, 6);
    let theirs = vessel(2, 4);
    world.insert_vessel(ours.clone());
    world.insert_vessel(theirs.clone());
    world.active = Some(ours.id);
    world.set_crew(theirs.id, vec!["scythe".to_owned()]);

    // Crew members of the departing vessel still hold locks from before the
    // original dock merged the pair.
    layer.locks_mut().acquire_update_lock(ours.id, true, "dagger");
    layer.locks_mut().acquire_update_lock(theirs.id, true, "scythe");
    layer.locks_mut().acquire_control_lock(theirs.id, "scythe");

    layer.handle_event(
        GameEvent::UndockComplete {
            vessel1: ours.id,
            vessel2: theirs.id,
        },
        &mut world,
        &mut sender,
    );

    // Both final vessels were announced.
    assert_eq!(sender.kinds(), vec!["VesselSnapshot", "VesselSnapshot"]);
    // The departing vessel's locks are free for the rightful owner.
    assert!(!layer.locks().update_lock_exists(theirs.id));
    assert!(layer.locks().control_lock_owner(theirs.id).is_none());
    // Our own lock survives.
    assert!(layer.locks().update_lock_belongs_to(ours.id, "dagger"));
}

#[test]
fn undock_only_releases_locks_held_by_the_departing_crew() {
    let (mut layer, mut world, mut sender, _time) = harness();
    let ours = vessel(1, 6);
    let theirs = vessel(2, 4);
    world.insert_vessel(ours.clone());
    world.insert_vessel(theirs.clone());
    world.active = Some(ours.id);
    world.set_crew(theirs.id, vec!["scythe".to_owned()]);

    // A third player's lock on the departing vessel is not ours to revoke.
    layer.locks_mut().acquire_control_lock(theirs.id, "lancer");

    layer.handle_event(
        GameEvent::UndockComplete {
            vessel1: ours.id,
            vessel2: theirs.id,
        },
        &mut world,
        &mut sender,
    );

    assert_eq!(
        layer.locks().control_lock_owner(theirs.id).map(String::as_str),
        Some("lancer")
    );
}

#[test]
fn spectators_stay_silent_through_an_undock() {
    let (mut layer, mut world, mut sender, _time) = harness();
    let ours = vessel(1, 6);
    let theirs = vessel(2, 4);
    world.insert_vessel(ours.clone());
    world.insert_vessel(theirs.clone());
    world.active = Some(ours.id);
    world.spectating = true;

    layer.locks_mut().acquire_control_lock(theirs.id, "scythe");

    layer.handle_event(
        GameEvent::UndockComplete {
            vessel1: ours.id,
            vessel2: theirs.id,
        },
        &mut world,
        &mut sender,
    );

    assert!(sender.sent.is_empty());
    assert!(layer.locks().control_lock_owner(theirs.id).is_some());
}

#[test]
fn undock_voids_a_pending_weak_side_grace() {
    let (mut layer, mut world, mut sender, time) = harness();
    let heavy = vessel(1, 10);
    let light = vessel(2, 5);
    world.insert_vessel(heavy.clone());
    world.insert_vessel(light.clone());
    world.set_mass(heavy.id, 10);
    world.set_mass(light.id, 5);
    world.active = Some(light.id);

    layer.handle_event(
        GameEvent::DockStart {
            vessel1: heavy.persistent_id,
            vessel2: light.persistent_id,
        },
        &mut world,
        &mut sender,
    );
    layer.handle_event(
        GameEvent::DockComplete { merged: heavy.id },
        &mut world,
        &mut sender,
    );

    // The pair splits again one second into the weak-side grace.
    time.advance(Duration::from_secs(1));
    layer.handle_event(
        GameEvent::UndockComplete {
            vessel1: heavy.id,
            vessel2: light.id,
        },
        &mut world,
        &mut sender,
    );
    sender.clear();

    // The grace task still fires, but finds no episode and does nothing.
    time.advance(Duration::from_secs(5));
    layer.tick(&mut world, &mut sender);

    assert!(sender.sent.is_empty());
    assert_eq!(layer.diagnostics().active_dock_episodes, 0);
}

#[test]
fn part_changes_of_an_undocking_vessel_are_suppressed_until_the_split_ends() {
    let (mut layer, mut world, mut sender, time) = harness();
    let craft = vessel(1, 8);
    let split_off = vessel(2, 3);
    world.insert_vessel(craft.clone());
    world.insert_vessel(split_off.clone());
    world.active = Some(craft.id);
    world.set_part(PartId(42), craft.id);
    layer.locks_mut().acquire_update_lock(craft.id, true, "dagger");

    layer.handle_event(
        GameEvent::UndockStart { part: PartId(42) },
        &mut world,
        &mut sender,
    );
    assert_eq!(layer.diagnostics().undocking_vessel, Some(craft.id));

    // The separation mutates the part count; the undock path owns this
    // announcement.
    layer.handle_event(
        GameEvent::PartCountChanged { vessel: craft.id },
        &mut world,
        &mut sender,
    );
    assert!(sender.sent.is_empty());

    layer.handle_event(
        GameEvent::UndockComplete {
            vessel1: craft.id,
            vessel2: split_off.id,
        },
        &mut world,
        &mut sender,
    );
    assert_eq!(sender.kinds(), vec!["VesselSnapshot", "VesselSnapshot"]);
    assert_eq!(layer.diagnostics().undocking_vessel, None);

    // Normal debounce flow resumes once the episode is cleared.
    sender.clear();
    layer.handle_event(
        GameEvent::PartCountChanged { vessel: craft.id },
        &mut world,
        &mut sender,
    );
    time.advance(Duration::from_millis(500));
    layer.tick(&mut world, &mut sender);
    assert_eq!(sender.sent.len(), 2);
}

#[test]
fn an_unrelated_undock_does_not_void_another_pairs_pending_grace() {
    let (mut layer, mut world, mut sender, time) = harness();
    let heavy = vessel(1, 10);
    let light = vessel(2, 5);
    world.insert_vessel(heavy.clone());
    world.insert_vessel(light.clone());
    world.set_mass(heavy.id, 10);
    world.set_mass(light.id, 5);
    world.active = Some(light.id);

    // Weak-side dock: the grace broadcast is armed for t+3s.
    layer.handle_event(
        GameEvent::DockStart {
            vessel1: heavy.persistent_id,
            vessel2: light.persistent_id,
        },
        &mut world,
        &mut sender,
    );
    layer.handle_event(
        GameEvent::DockComplete { merged: heavy.id },
        &mut world,
        &mut sender,
    );

    // A completely different pair separates in the meantime.
    let station = vessel(3, 7);
    let pod = vessel(4, 2);
    world.insert_vessel(station.clone());
    world.insert_vessel(pod.clone());
    layer.handle_event(
        GameEvent::UndockComplete {
            vessel1: station.id,
            vessel2: pod.id,
        },
        &mut world,
        &mut sender,
    );
    assert_eq!(layer.diagnostics().active_dock_episodes, 1);
    sender.clear();

    // Our own pair's grace still fires on schedule.
    time.advance(Duration::from_secs(3));
    layer.tick(&mut world, &mut sender);
    assert_eq!(sender.kinds(), vec!["DockInfo", "VesselRemove"]);
}

#[test]
fn undock_start_for_an_unknown_part_is_ignored() {
    let (mut layer, mut world, mut sender, _time) = harness();

    layer.handle_event(
        GameEvent::UndockStart { part: PartId(9) },
        &mut world,
        &mut sender,
    );

    assert_eq!(layer.diagnostics().undocking_vessel, None);
    assert!(sender.sent.is_empty());
}
