use std::{cell::RefCell, rc::Rc, time::Duration};

use glam::Vec2;
use lanewar_core::{
    BossKind, Command, CombatantId, CombatantKind, CreepStats, Element, Event, Faction, LaneId,
    LootDrop, LootRarity,
};
use lanewar_session::{
    AudioCues, Capabilities, Cue, Equipment, Frame, PlayerInput, Session, SessionConfig,
};
use lanewar_world::{query, WorldConfig};

const DT: Duration = Duration::from_millis(100);

fn weak_creep_beside_player(session: &mut Session, hp: f32) -> CombatantId {
    let player = query::player(session.world());
    let position = query::combat_view(session.world())
        .get(player)
        .map(|snapshot| snapshot.position)
        .expect("player alive");
    let creep = session
        .inject(Command::SpawnCreep {
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
        })
        .iter()
        .find_map(|event| match event {
            Event::CombatantSpawned { combatant, .. } => Some(*combatant),
            _ => None,
        })
        .expect("creep spawned");
    let _ = session.inject(Command::Teleport {
        combatant: creep,
        destination: position + Vec2::new(2.0, 0.0),
    });
    creep
}

fn attack() -> PlayerInput {
    PlayerInput {
        attacked: true,
        ..PlayerInput::default()
    }
}

#[test]
fn player_kill_removes_the_creep_and_shifts_momentum() {
    let mut session = Session::default();
    let creep = weak_creep_beside_player(&mut session, 10.0);

    let frame = session.tick(DT, &attack());
    assert!(frame.events.iter().any(|event| matches!(
        event,
        Event::CombatantDied { combatant, kind: CombatantKind::Creep, .. } if *combatant == creep
    )));
    assert!(frame.combatants.iter().all(|combatant| combatant.id != creep));
    assert!(!query::contains(session.world(), creep), "cleanup ran this tick");

    let frame = session.tick(DT, &PlayerInput::default());
    assert!((frame.momentum - 52.0).abs() < 1e-4);
    assert!(frame
        .events
        .contains(&Event::MomentumChanged { value: frame.momentum }));
}

#[test]
fn first_wave_arrives_after_the_interval() {
    let mut session = Session::default();
    let mut waves = Vec::new();
    for _ in 0..250 {
        let frame = session.tick(DT, &PlayerInput::default());
        waves.extend(frame.events.iter().filter_map(|event| match event {
            Event::WaveStarted { wave } => Some(*wave),
            _ => None,
        }));
    }
    assert_eq!(waves, vec![1]);
    assert_eq!(session.wave_number(), 1);
}

#[test]
fn equipment_overrides_affinity_and_collects_loot() {
    #[derive(Debug)]
    struct Flamebrand(Rc<RefCell<Vec<LootDrop>>>);

    impl Equipment for Flamebrand {
        fn affinity(&self) -> Option<Element> {
            Some(Element::Fire)
        }

        fn grant_loot(&mut self, drop: LootDrop) {
            self.0.borrow_mut().push(drop);
        }
    }

    #[derive(Debug)]
    struct Recorder(Rc<RefCell<Vec<Cue>>>);

    impl AudioCues for Recorder {
        fn cue(&mut self, cue: Cue) {
            self.0.borrow_mut().push(cue);
        }
    }

    let loot = Rc::new(RefCell::new(Vec::new()));
    let cues = Rc::new(RefCell::new(Vec::new()));
    let mut session = Session::new(
        SessionConfig::default(),
        Capabilities {
            audio: Box::new(Recorder(Rc::clone(&cues))),
            equipment: Box::new(Flamebrand(Rc::clone(&loot))),
        },
    );
    let creep = weak_creep_beside_player(&mut session, 200.0);

    let frame = session.tick(
        DT,
        &PlayerInput {
            affinity: Some(Element::Ice),
            abilities: vec![7],
            ..attack()
        },
    );

    assert!(frame.events.contains(&Event::StatusApplied {
        combatant: creep,
        element: Element::Fire,
        refreshed: false,
    }));
    let icons = frame
        .combatants
        .iter()
        .find(|combatant| combatant.id == creep)
        .map(|combatant| combatant.status_icons.clone());
    assert_eq!(icons, Some(vec!["fire"]));
    assert_eq!(cues.borrow().as_slice(), &[Cue::AbilityRejected]);

    // boss kills always drop loot, and the drop reaches the equipment
    let player = query::player(session.world());
    let player_position = query::combat_view(session.world())
        .get(player)
        .map(|snapshot| snapshot.position)
        .expect("player alive");
    let boss = session
        .inject(Command::SpawnCreep {
            lane: LaneId::new(1),
            faction: Faction::Horde,
            stats: CreepStats {
                max_hp: 1.0,
                armor: 0.0,
                speed: 0.0,
                damage: 1.0,
                attack_range: 1.0,
                attack_interval: Duration::from_millis(1_000),
            },
            boss: Some(BossKind::StarDevourer),
        })
        .iter()
        .find_map(|event| match event {
            Event::CombatantSpawned { combatant, .. } => Some(*combatant),
            _ => None,
        })
        .expect("boss spawned");
    let _ = session.inject(Command::Teleport {
        combatant: boss,
        destination: player_position + Vec2::new(0.5, 0.0),
    });

    let frame = session.tick(DT, &attack());
    let drops = loot.borrow();
    assert_eq!(drops.len(), 1);
    assert_eq!(drops[0].source, boss);
    assert!(drops[0].rarity >= LootRarity::Rare);
    assert!(frame
        .events
        .iter()
        .any(|event| matches!(event, Event::LootDropped { .. })));
    assert!(cues.borrow().contains(&Cue::LootFound));
}

fn scripted_input(tick: u32) -> PlayerInput {
    PlayerInput {
        position: None,
        facing: Vec2::new(1.0, 1.0),
        attacked: tick % 5 == 0,
        abilities: if tick % 40 == 0 {
            vec![(tick / 40) as usize % 5]
        } else {
            Vec::new()
        },
        affinity: Some(Element::ALL[(tick / 100) as usize % Element::ALL.len()]),
    }
}

fn replay(seed: u64) -> Vec<Frame> {
    let mut session = Session::new(
        SessionConfig::with_world(WorldConfig::default().with_seed(seed)),
        Capabilities::default(),
    );
    (0..1_200)
        .map(|tick| session.tick(DT, &scripted_input(tick)))
        .collect()
}

#[test]
fn identical_seeds_replay_identically() {
    let first = replay(42);
    let second = replay(42);
    assert_eq!(first.len(), second.len());
    assert!(first == second, "replay diverged between runs");

    for frame in &first {
        assert!((0.0..=100.0).contains(&frame.momentum));
        assert!(frame.combatants.iter().all(|combatant| combatant.hp > 0.0));
    }
    assert_eq!(first.last().map(|frame| frame.wave), Some(4));
}
