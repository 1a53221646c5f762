use std::time::Duration;

use lanewar_core::{
    CombatantKind, Command, CreepStats, DamageSource, Event, Faction, LaneId,
};
use lanewar_system_momentum::{MomentumTracker, MAX_MOMENTUM, MIN_MOMENTUM, NEUTRAL_MOMENTUM};
use lanewar_world::{self as world, query, World};

fn creep_death(faction: Faction) -> Event {
    Event::CombatantDied {
        combatant: lanewar_core::CombatantId::new(7),
        kind: CombatantKind::Creep,
        faction,
        is_boss: false,
        killer: None,
    }
}

fn tick(ms: u64) -> Event {
    Event::TimeAdvanced {
        dt: Duration::from_millis(ms),
    }
}

#[test]
fn momentum_stays_within_bounds_under_lopsided_pressure() {
    let mut tracker = MomentumTracker::default();
    let mut out = Vec::new();

    for _ in 0..200 {
        tracker.handle(&[tick(100), creep_death(Faction::Horde)], &mut out);
        assert!((MIN_MOMENTUM..=MAX_MOMENTUM).contains(&tracker.value()));
    }
    assert!((tracker.value() - MAX_MOMENTUM).abs() < f32::EPSILON);

    for _ in 0..200 {
        tracker.handle(&[tick(100), creep_death(Faction::Explorer)], &mut out);
        assert!((MIN_MOMENTUM..=MAX_MOMENTUM).contains(&tracker.value()));
    }
    assert!((tracker.value() - MIN_MOMENTUM).abs() < f32::EPSILON);
    assert!(out.iter().all(|event| match event {
        Event::MomentumChanged { value } => (MIN_MOMENTUM..=MAX_MOMENTUM).contains(value),
        _ => false,
    }));
}

#[test]
fn quiet_ticks_move_monotonically_toward_neutral() {
    for faction in Faction::ALL {
        let mut tracker = MomentumTracker::default();
        let mut out = Vec::new();
        for _ in 0..5 {
            tracker.handle(&[creep_death(faction)], &mut out);
        }

        let mut previous = (tracker.value() - NEUTRAL_MOMENTUM).abs();
        assert!(previous > 9.0);
        for _ in 0..120 {
            tracker.handle(&[tick(100)], &mut out);
            let gap = (tracker.value() - NEUTRAL_MOMENTUM).abs();
            assert!(gap <= previous, "momentum moved away from neutral");
            previous = gap;
        }
        assert!(previous < f32::EPSILON);
    }
}

#[test]
fn world_kills_and_siege_hits_shift_momentum_toward_the_attacker() {
    let mut world = World::default();
    let player = query::player(&world);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SpawnCreep {
            lane: LaneId::new(1),
            faction: Faction::Horde,
            stats: CreepStats {
                max_hp: 10.0,
                armor: 0.0,
                speed: 3.0,
                damage: 8.0,
                attack_range: 1.5,
                attack_interval: Duration::from_millis(1_000),
            },
            boss: None,
        },
        &mut events,
    );
    let creep = events
        .iter()
        .find_map(|event| match event {
            Event::CombatantSpawned { combatant, .. } => Some(*combatant),
            _ => None,
        })
        .expect("creep spawned");
    world::apply(
        &mut world,
        Command::DealDamage {
            target: creep,
            amount: 15.0,
            source: DamageSource::Strike(player),
        },
        &mut events,
    );
    let throne = query::throne(&world, Faction::Horde).expect("horde throne");
    world::apply(
        &mut world,
        Command::DealDamage {
            target: throne,
            amount: 50.0,
            source: DamageSource::Strike(player),
        },
        &mut events,
    );

    let mut tracker = MomentumTracker::default();
    let mut out = Vec::new();
    tracker.handle(&events, &mut out);

    // a creep kill is worth 2 and a siege hit 0.5, both in the explorers' favour
    assert!((tracker.value() - 52.5).abs() < 1e-4);
    assert_eq!(out, vec![Event::MomentumChanged { value: tracker.value() }]);
}
