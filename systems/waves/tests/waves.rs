use std::time::Duration;

use lanewar_core::{BossKind, Command, CombatantKind, DamageSource, Element, Event, Faction};
use lanewar_system_waves::{WaveConfig, WaveDirector};
use lanewar_world::{self as world, query, LaneDefinition, World, WorldConfig};

/// Ticks the world and director once, applying every spawn command.
fn step(world: &mut World, director: &mut WaveDirector, carried: &mut Vec<Event>, dt: Duration) {
    let mut events = std::mem::take(carried);
    world::apply(world, Command::Tick { dt }, &mut events);

    let mut commands = Vec::new();
    let mut director_events = Vec::new();
    director.handle(&events, query::lanes(world), &mut commands, &mut director_events);

    let mut applied = director_events;
    for command in commands {
        world::apply(world, command, &mut applied);
    }
    *carried = applied;
}

fn spawned_creeps(events: &[Event]) -> usize {
    events
        .iter()
        .filter(|event| {
            matches!(
                event,
                Event::CombatantSpawned {
                    kind: CombatantKind::Creep,
                    ..
                }
            )
        })
        .count()
}

#[test]
fn wave_fires_exactly_when_the_interval_elapses() {
    let mut world = World::default();
    let mut director = WaveDirector::default();
    let mut carried = Vec::new();

    step(&mut world, &mut director, &mut carried, Duration::from_millis(24_999));
    assert_eq!(director.wave_number(), 0);
    assert!(carried.is_empty());

    step(&mut world, &mut director, &mut carried, Duration::from_millis(1));
    assert_eq!(director.wave_number(), 1);
    assert!(carried.contains(&Event::WaveStarted { wave: 1 }));
    // three lanes, two factions, three creeps each
    assert_eq!(spawned_creeps(&carried), 18);
}

#[test]
fn large_delta_starts_a_single_wave() {
    let mut world = World::default();
    let mut director = WaveDirector::default();
    let mut carried = Vec::new();

    step(&mut world, &mut director, &mut carried, Duration::from_secs(80));
    assert_eq!(director.wave_number(), 1);
}

#[test]
fn inert_lanes_are_skipped_without_aborting_the_wave() {
    let mut config = WorldConfig::default();
    config.lanes.push(LaneDefinition {
        key: "broken".to_owned(),
        waypoints: vec![[0.5, 0.5]],
        chokepoint: 0,
    });
    let mut world = World::new(&config);
    let mut director = WaveDirector::default();
    let mut carried = Vec::new();

    step(&mut world, &mut director, &mut carried, Duration::from_millis(25_000));
    assert_eq!(spawned_creeps(&carried), 18);
}

#[test]
fn boss_wave_brings_one_boss_and_a_living_boss_blocks_the_next() {
    let mut world = World::default();
    let mut director = WaveDirector::new(WaveConfig {
        boss_every: 1,
        ..WaveConfig::default()
    });
    let mut carried = Vec::new();

    step(&mut world, &mut director, &mut carried, Duration::from_millis(25_000));
    let bosses: Vec<_> = carried
        .iter()
        .filter_map(|event| match event {
            Event::BossSpawned { combatant, boss } => Some((*combatant, *boss)),
            _ => None,
        })
        .collect();
    assert_eq!(bosses.len(), 1);
    let (boss_id, kind) = bosses[0];
    assert_eq!(kind, BossKind::VoidColossus);
    let boss = query::combat_view(&world)
        .get(boss_id)
        .cloned()
        .expect("boss alive");
    assert_eq!(boss.faction, Faction::Horde);
    assert!(boss.is_boss);

    step(&mut world, &mut director, &mut carried, Duration::from_millis(25_000));
    assert!(director.boss_active());
    assert!(!carried
        .iter()
        .any(|event| matches!(event, Event::BossSpawned { .. })));

    world::apply(
        &mut world,
        Command::DealDamage {
            target: boss_id,
            amount: 100_000.0,
            source: DamageSource::Status(Element::Fire),
        },
        &mut carried,
    );
    step(&mut world, &mut director, &mut carried, Duration::from_millis(25_000));
    assert!(carried.iter().any(|event| matches!(
        event,
        Event::BossSpawned {
            boss: BossKind::VoidColossus,
            ..
        }
    )));
}

#[test]
fn default_cadence_alternates_boss_profiles() {
    let mut world = World::default();
    let mut director = WaveDirector::default();
    let mut carried = Vec::new();
    let mut bosses = Vec::new();

    for _ in 0..10 {
        step(&mut world, &mut director, &mut carried, Duration::from_millis(25_000));
        let spawned: Vec<_> = carried
            .iter()
            .filter_map(|event| match event {
                Event::BossSpawned { combatant, boss } => Some((*combatant, *boss)),
                _ => None,
            })
            .collect();
        for (combatant, boss) in spawned {
            bosses.push(boss);
            world::apply(
                &mut world,
                Command::DealDamage {
                    target: combatant,
                    amount: 100_000.0,
                    source: DamageSource::Status(Element::Void),
                },
                &mut carried,
            );
        }
    }

    assert_eq!(bosses, vec![BossKind::VoidColossus, BossKind::StarDevourer]);
}
