use std::time::Duration;

use lanewar_core::{
    CombatModifiers, Command, CombatantId, CreepStats, DamageSource, Element, Event, Faction,
    LaneId,
};
use lanewar_system_status_effects::StatusEffectRegistry;
use lanewar_world::{self as world, query, World};

fn spawn_creep(world: &mut World, hp: f32) -> CombatantId {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::SpawnCreep {
            lane: LaneId::new(1),
            faction: Faction::Horde,
            stats: CreepStats {
                max_hp: hp,
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
    events
        .iter()
        .find_map(|event| match event {
            Event::CombatantSpawned { combatant, .. } => Some(*combatant),
            _ => None,
        })
        .expect("creep spawned")
}

/// Advances world time and settles statuses, returning the tick's events.
fn advance(world: &mut World, registry: &mut StatusEffectRegistry, dt: Duration) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Tick { dt }, &mut events);
    let mut commands = Vec::new();
    registry.tick(
        query::now(world),
        &query::combat_view(world),
        &mut commands,
        &mut events,
    );
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

fn hp(world: &World, id: CombatantId) -> Option<f32> {
    query::combat_view(world).get(id).map(|snapshot| snapshot.hp)
}

#[test]
fn fire_deals_four_ticks_after_two_seconds() {
    let mut world = World::default();
    let creep = spawn_creep(&mut world, 60.0);
    let mut registry = StatusEffectRegistry::new();
    registry.apply(creep, Element::Fire, query::now(&world), &mut Vec::new());

    for _ in 0..20 {
        let _ = advance(&mut world, &mut registry, Duration::from_millis(100));
    }

    assert_eq!(hp(&world, creep), Some(52.0));
}

#[test]
fn coarse_frames_catch_up_on_missed_ticks() {
    let mut world = World::default();
    let creep = spawn_creep(&mut world, 60.0);
    let mut registry = StatusEffectRegistry::new();
    registry.apply(creep, Element::Fire, query::now(&world), &mut Vec::new());

    let events = advance(&mut world, &mut registry, Duration::from_millis(2_000));
    let damage: Vec<f32> = events
        .iter()
        .filter_map(|event| match event {
            Event::CombatantDamaged {
                amount,
                source: DamageSource::Status(Element::Fire),
                ..
            } => Some(*amount),
            _ => None,
        })
        .collect();
    assert_eq!(damage, vec![8.0]);
}

#[test]
fn statuses_expire_and_release_the_combatant() {
    let mut world = World::default();
    let creep = spawn_creep(&mut world, 60.0);
    let mut registry = StatusEffectRegistry::new();
    registry.apply(creep, Element::Ice, query::now(&world), &mut Vec::new());
    assert!((registry.speed_multiplier(creep) - 0.5).abs() < f32::EPSILON);

    let events = advance(&mut world, &mut registry, Duration::from_millis(2_999));
    assert!(registry.has(creep, Element::Ice));
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::StatusExpired { .. })));

    let events = advance(&mut world, &mut registry, Duration::from_millis(1));
    assert!(events.contains(&Event::StatusExpired {
        combatant: creep,
        element: Element::Ice,
    }));
    assert_eq!(registry.tracked_len(), 0);
    assert!((registry.speed_multiplier(creep) - 1.0).abs() < f32::EPSILON);
}

#[test]
fn refreshing_restarts_the_duration() {
    let mut world = World::default();
    let creep = spawn_creep(&mut world, 60.0);
    let mut registry = StatusEffectRegistry::new();
    registry.apply(creep, Element::Ice, query::now(&world), &mut Vec::new());

    let _ = advance(&mut world, &mut registry, Duration::from_millis(2_000));
    registry.apply(creep, Element::Ice, query::now(&world), &mut Vec::new());
    let _ = advance(&mut world, &mut registry, Duration::from_millis(2_000));

    assert!(registry.has(creep, Element::Ice));
    assert_eq!(registry.instance_count(creep), 1);
}

#[test]
fn lethal_periodic_damage_kills_through_the_world() {
    let mut world = World::default();
    let creep = spawn_creep(&mut world, 5.0);
    let mut registry = StatusEffectRegistry::new();
    registry.apply(creep, Element::Cosmic, query::now(&world), &mut Vec::new());

    let events = advance(&mut world, &mut registry, Duration::from_millis(2_000));
    assert!(events.iter().any(|event| matches!(
        event,
        Event::CombatantDied { combatant, killer: None, .. } if *combatant == creep
    )));

    let events = advance(&mut world, &mut registry, Duration::from_millis(100));
    assert!(events.contains(&Event::StatusExpired {
        combatant: creep,
        element: Element::Cosmic,
    }));
    assert_eq!(registry.tracked_len(), 0);
}

fn burn_total(events: &[Event], creep: CombatantId) -> f32 {
    events
        .iter()
        .filter_map(|event| match event {
            Event::CombatantDamaged {
                combatant,
                amount,
                source: DamageSource::Status(Element::Fire),
            } if *combatant == creep => Some(*amount),
            _ => None,
        })
        .sum()
}

#[test]
fn a_hitch_across_expiry_deals_the_same_burn_as_smooth_frames() {
    let mut smooth_world = World::default();
    let smooth_creep = spawn_creep(&mut smooth_world, 60.0);
    let mut smooth = StatusEffectRegistry::new();
    smooth.apply(smooth_creep, Element::Fire, query::now(&smooth_world), &mut Vec::new());
    let mut smooth_total = 0.0;
    for _ in 0..45 {
        let events = advance(&mut smooth_world, &mut smooth, Duration::from_millis(100));
        smooth_total += burn_total(&events, smooth_creep);
    }

    let mut hitched_world = World::default();
    let hitched_creep = spawn_creep(&mut hitched_world, 60.0);
    let mut hitched = StatusEffectRegistry::new();
    hitched.apply(hitched_creep, Element::Fire, query::now(&hitched_world), &mut Vec::new());
    let events = advance(&mut hitched_world, &mut hitched, Duration::from_millis(4_500));
    let hitched_total = burn_total(&events, hitched_creep);

    // eight 500 ms intervals fit in the 4 000 ms burn
    assert_eq!(smooth_total, 16.0);
    assert_eq!(hitched_total, smooth_total);
    assert!(events.contains(&Event::StatusExpired {
        combatant: hitched_creep,
        element: Element::Fire,
    }));
    assert_eq!(hitched.tracked_len(), 0);
    assert_eq!(smooth.tracked_len(), 0);
}
