use std::time::Duration;

use glam::Vec2;
use lanewar_core::{Command, DamageSource, Element, Event, Faction, HeroAiState, Unmodified};
use lanewar_system_hero_ai::{EnemyHeroAi, HeroAiConfig};
use lanewar_world::{self as world, query, World};

const DT: Duration = Duration::from_millis(100);

fn step(world: &mut World, ai: &mut EnemyHeroAi) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Tick { dt: DT }, &mut events);
    let view = query::combat_view(world);
    let mut commands = Vec::new();
    let mut ai_events = Vec::new();
    ai.handle(
        &events,
        &view,
        &Unmodified,
        |faction| query::throne(world, faction),
        &mut commands,
        &mut ai_events,
    );
    events.append(&mut ai_events);
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

fn quiet_ai(world: &World) -> EnemyHeroAi {
    EnemyHeroAi::new(
        HeroAiConfig {
            farm_chance: 0.0,
            ..HeroAiConfig::default()
        },
        query::enemy_hero(world),
        query::player(world),
        7,
    )
}

#[test]
fn wounded_hero_retreats_instead_of_fighting_an_adjacent_player() {
    let mut world = World::default();
    let hero = query::enemy_hero(&world);
    let player = query::player(&world);
    let mut events = Vec::new();

    // 520 hp at 4 armor: 432.64 raw leaves 104 hp, a ratio of 0.2
    world::apply(
        &mut world,
        Command::DealDamage {
            target: hero,
            amount: 432.64,
            source: DamageSource::Status(Element::Fire),
        },
        &mut events,
    );
    let hero_position = query::combat_view(&world)
        .get(hero)
        .map(|snapshot| snapshot.position)
        .expect("hero alive");
    world::apply(
        &mut world,
        Command::Teleport {
            combatant: player,
            destination: hero_position + Vec2::new(1.0, 0.0),
        },
        &mut events,
    );

    let mut ai = quiet_ai(&world);
    for _ in 0..20 {
        let events = step(&mut world, &mut ai);
        assert_eq!(ai.state(), HeroAiState::Retreating);
        assert!(!events.iter().any(|event| matches!(
            event,
            Event::HeroStateChanged {
                to: HeroAiState::Fighting,
                ..
            }
        )));
        assert!(!events.iter().any(|event| matches!(
            event,
            Event::CombatantDamaged { combatant, .. } if *combatant == player
        )));
    }
}

#[test]
fn idle_hero_pushes_down_its_lane() {
    let mut world = World::default();
    let hero = query::enemy_hero(&world);
    let start = query::combat_view(&world)
        .get(hero)
        .map(|snapshot| snapshot.position)
        .expect("hero alive");
    let explorer_throne = query::throne(&world, Faction::Explorer)
        .and_then(|throne| query::combat_view(&world).get(throne).map(|t| t.position))
        .expect("explorer throne");

    let mut ai = quiet_ai(&world);
    for _ in 0..20 {
        let _ = step(&mut world, &mut ai);
    }

    assert_eq!(ai.state(), HeroAiState::Pushing);
    let now = query::combat_view(&world)
        .get(hero)
        .map(|snapshot| snapshot.position)
        .expect("hero alive");
    assert!(now.distance(start) > 5.0);
    assert!(now.distance(explorer_throne) < start.distance(explorer_throne));
}
