//! Non-docking announce triggers: flight start, freshly created vessels,
//! scene exits and science events.

use std::time::Duration;

use stellarlink_client::{
    FakeGameWorld, GameEvent, GameScene, ManualTimeSource, RecordingSender, SyncClock, SyncConfig,
    SyncLayer, VesselInfo,
};
use stellarlink_shared::{OutboundMessage, PersistentId, VesselId};

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
fn flight_ready_announces_the_active_vessel() {
    let (mut layer, mut world, mut sender, _time) = harness();
    let craft = vessel(1, 12);
    world.insert_vessel(craft.clone());
    world.active = Some(craft.id);

    layer.handle_event(GameEvent::FlightReady, &mut world, &mut sender);

    assert_eq!(sender.kinds(), vec!["VesselSnapshot"]);
    match &sender.sent[0] {
        OutboundMessage::VesselSnapshot { proto } => assert_eq!(proto.vessel_id, craft.id),
        other => panic!("expected VesselSnapshot, got {:?}", other),
    }
}

#[test]
fn flight_ready_while_spectating_is_silent() {
    let (mut layer, mut world, mut sender, _time) = harness();
    let craft = vessel(1, 12);
    world.insert_vessel(craft.clone());
    world.active = Some(craft.id);
    world.spectating = true;

    layer.handle_event(GameEvent::FlightReady, &mut world, &mut sender);

    assert!(sender.sent.is_empty());
}

#[test]
fn a_new_vessel_is_claimed_and_announced_after_the_naming_delay() {
    let (mut layer, mut world, mut sender, time) = harness();
    let debris = vessel(3, 2);
    world.insert_vessel(debris.clone());

    layer.handle_event(
        GameEvent::VesselInitialized {
            vessel: debris.id,
            from_ship_assembly: false,
        },
        &mut world,
        &mut sender,
    );

    // Claimed at once, announced only after the game finished naming it.
    assert!(layer.locks().update_lock_belongs_to(debris.id, "dagger"));
    assert!(sender.sent.is_empty());

    time.advance(Duration::from_millis(500));
    layer.tick(&mut world, &mut sender);
    assert_eq!(sender.kinds(), vec!["VesselSnapshot"]);
}

#[test]
fn vessels_from_the_ship_assembly_are_not_claimed() {
    let (mut layer, mut world, mut sender, time) = harness();
    let craft = vessel(4, 30);
    world.insert_vessel(craft.clone());

    layer.handle_event(
        GameEvent::VesselInitialized {
            vessel: craft.id,
            from_ship_assembly: true,
        },
        &mut world,
        &mut sender,
    );
    time.advance(Duration::from_secs(1));
    layer.tick(&mut world, &mut sender);

    assert!(!layer.locks().update_lock_exists(craft.id));
    assert!(sender.sent.is_empty());
}

#[test]
fn a_vessel_already_claimed_by_another_player_is_not_reclaimed() {
    let (mut layer, mut world, mut sender, time) = harness();
    let debris = vessel(3, 2);
    world.insert_vessel(debris.clone());
    layer.locks_mut().acquire_update_lock(debris.id, false, "scythe");

    layer.handle_event(
        GameEvent::VesselInitialized {
            vessel: debris.id,
            from_ship_assembly: false,
        },
        &mut world,
        &mut sender,
    );
    time.advance(Duration::from_secs(1));
    layer.tick(&mut world, &mut sender);

    assert!(layer.locks().update_lock_belongs_to(debris.id, "scythe"));
    assert!(sender.sent.is_empty());
}

#[test]
fn leaving_flight_sends_the_vessel_one_last_time() {
    let (mut layer, mut world, mut sender, _time) = harness();
    let craft = vessel(1, 12);
    world.insert_vessel(craft.clone());
    world.active = Some(craft.id);

    layer.handle_event(
        GameEvent::SceneRequested {
            scene: GameScene::SpaceCenter,
        },
        &mut world,
        &mut sender,
    );

    assert_eq!(sender.kinds(), vec!["VesselSnapshot"]);
}

#[test]
fn switching_within_flight_does_not_announce() {
    let (mut layer, mut world, mut sender, _time) = harness();
    let craft = vessel(1, 12);
    world.insert_vessel(craft.clone());
    world.active = Some(craft.id);

    layer.handle_event(
        GameEvent::SceneRequested {
            scene: GameScene::Flight,
        },
        &mut world,
        &mut sender,
    );

    assert!(sender.sent.is_empty());
}

#[test]
fn transmitting_science_reannounces_with_the_subject() {
    let (mut layer, mut world, mut sender, _time) = harness();
    let craft = vessel(1, 12);
    world.insert_vessel(craft.clone());
    world.active = Some(craft.id);
    world.add_subject("orbitSurvey@Mun");

    layer.handle_event(
        GameEvent::ScienceTransmitted {
            subject_id: "orbitSurvey@Mun".to_owned(),
        },
        &mut world,
        &mut sender,
    );

    assert_eq!(sender.kinds(), vec!["VesselSnapshot", "ScienceSubject"]);
    match &sender.sent[1] {
        OutboundMessage::ScienceSubject { subject_id } => {
            assert_eq!(subject_id, "orbitSurvey@Mun")
        }
        other => panic!("expected ScienceSubject, got {:?}", other),
    }
}

#[test]
fn science_with_an_unknown_subject_is_silent() {
    let (mut layer, mut world, mut sender, _time) = harness();
    let craft = vessel(1, 12);
    world.insert_vessel(craft.clone());
    world.active = Some(craft.id);

    layer.handle_event(
        GameEvent::ScienceStored {
            subject_id: "missing".to_owned(),
        },
        &mut world,
        &mut sender,
    );

    assert!(sender.sent.is_empty());
}

#[test]
fn resetting_an_experiment_reannounces_without_a_subject() {
    let (mut layer, mut world, mut sender, _time) = harness();
    let craft = vessel(1, 12);
    world.insert_vessel(craft.clone());
    world.active = Some(craft.id);

    layer.handle_event(GameEvent::ScienceReset, &mut world, &mut sender);

    assert_eq!(sender.kinds(), vec!["VesselSnapshot"]);
}
