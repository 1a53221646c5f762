#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Simulation session that owns the world and every combat service.
//!
//! [`Session::tick`] is the only entry point that advances simulated time. It
//! runs the systems in a fixed order, feeding each one the events produced so
//! far, and hands the presentation a [`Frame`] describing the outcome.

mod capabilities;

use std::time::Duration;

use glam::Vec2;
use lanewar_core::{
    CombatantId, CombatantKind, Command, Element, Event, Faction, HeroAiState,
    ProjectileSnapshot, StatusTag, TowerTarget,
};
use lanewar_system_abilities::{AbilityController, CastContext, PlayerCombat, PlayerCombatConfig};
use lanewar_system_hero_ai::{EnemyHeroAi, HeroAiConfig};
use lanewar_system_lane_combat::LaneCombat;
use lanewar_system_momentum::{MomentumConfig, MomentumTracker};
use lanewar_system_status_effects::StatusEffectRegistry;
use lanewar_system_tower_combat::{TowerCombat, TowerCombatConfig};
use lanewar_system_tower_targeting::TowerTargeting;
use lanewar_system_waves::{WaveConfig, WaveDirector};
use lanewar_world::{self as world, query, World, WorldConfig};

pub use capabilities::{AudioCues, Capabilities, Cue, Equipment, Silent, Unequipped};

/// Offsets separating the random streams derived from the world seed.
const LOOT_STREAM: u64 = 0x6c6f_6f74;
const HERO_STREAM: u64 = 0x6865_726f;

/// Every tunable a session is assembled from.
#[derive(Clone, Debug, Default)]
pub struct SessionConfig {
    /// Arena, lanes and seed.
    pub world: WorldConfig,
    /// Wave cadence and creep scaling.
    pub waves: WaveConfig,
    /// Tower projectile parameters.
    pub tower_combat: TowerCombatConfig,
    /// Momentum shifts and decay.
    pub momentum: MomentumConfig,
    /// Player basic attack and loot table.
    pub player: PlayerCombatConfig,
    /// Enemy hero decision thresholds.
    pub hero_ai: HeroAiConfig,
}

impl SessionConfig {
    /// Default tunables around the provided world configuration.
    #[must_use]
    pub fn with_world(world: WorldConfig) -> Self {
        Self {
            world,
            ..Self::default()
        }
    }
}

/// Player intent gathered by the presentation for a single tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlayerInput {
    /// Where the presentation moved the player; `None` leaves it in place.
    pub position: Option<Vec2>,
    /// Aim direction used by directional abilities.
    pub facing: Vec2,
    /// Whether the basic attack was triggered.
    pub attacked: bool,
    /// Ability slots requested this tick, in order.
    pub abilities: Vec<usize>,
    /// Elemental affinity of the player's weapon.
    pub affinity: Option<Element>,
}

/// Presentation-facing description of a living combatant.
#[derive(Clone, Debug, PartialEq)]
pub struct CombatantFrame {
    /// Identifier of the combatant.
    pub id: CombatantId,
    /// Kind of combatant.
    pub kind: CombatantKind,
    /// Faction of the combatant.
    pub faction: Faction,
    /// Current position.
    pub position: Vec2,
    /// Current health.
    pub hp: f32,
    /// Health capacity.
    pub max_hp: f32,
    /// Icon keys of active elemental statuses.
    pub status_icons: Vec<&'static str>,
    /// Indicates whether the combatant is a wave boss.
    pub is_boss: bool,
}

/// Outcome of a single tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Number of ticks processed, including this one.
    pub tick: u64,
    /// Simulated time since the session started.
    pub now: Duration,
    /// Most recent wave number.
    pub wave: u32,
    /// Momentum after this tick.
    pub momentum: f32,
    /// Decision state of the enemy hero.
    pub hero_state: HeroAiState,
    /// Every living combatant in identifier order.
    pub combatants: Vec<CombatantFrame>,
    /// Every projectile in flight.
    pub projectiles: Vec<ProjectileSnapshot>,
    /// Events produced during the tick, in order.
    pub events: Vec<Event>,
}

/// A running match: the world plus the services that drive it.
#[derive(Debug)]
pub struct Session {
    world: World,
    waves: WaveDirector,
    lane_combat: LaneCombat,
    targeting: TowerTargeting,
    tower_combat: TowerCombat,
    statuses: StatusEffectRegistry,
    momentum: MomentumTracker,
    abilities: AbilityController,
    player_combat: PlayerCombat,
    hero_ai: EnemyHeroAi,
    capabilities: Capabilities,
    wave_backlog: Vec<Event>,
    momentum_backlog: Vec<Event>,
    tower_targets: Vec<TowerTarget>,
    commands: Vec<Command>,
    tags: Vec<StatusTag>,
}

impl Session {
    /// Builds the world and every service from `config`.
    #[must_use]
    pub fn new(config: SessionConfig, capabilities: Capabilities) -> Self {
        let world = World::new(&config.world);
        let seed = config.world.seed;
        let hero_ai = EnemyHeroAi::new(
            config.hero_ai,
            query::enemy_hero(&world),
            query::player(&world),
            seed ^ HERO_STREAM,
        );
        log::debug!("session started with seed {seed}");
        Self {
            world,
            waves: WaveDirector::new(config.waves),
            lane_combat: LaneCombat::new(),
            targeting: TowerTargeting::new(),
            tower_combat: TowerCombat::new(config.tower_combat),
            statuses: StatusEffectRegistry::new(),
            momentum: MomentumTracker::new(config.momentum),
            abilities: AbilityController::new(),
            player_combat: PlayerCombat::new(config.player, seed ^ LOOT_STREAM),
            hero_ai,
            capabilities,
            wave_backlog: Vec::new(),
            momentum_backlog: Vec::new(),
            tower_targets: Vec::new(),
            commands: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// Read-only access to the world for queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Current momentum.
    #[must_use]
    pub fn momentum(&self) -> f32 {
        self.momentum.value()
    }

    /// Most recent wave number.
    #[must_use]
    pub fn wave_number(&self) -> u32 {
        self.waves.wave_number()
    }

    /// Decision state of the enemy hero.
    #[must_use]
    pub fn hero_state(&self) -> HeroAiState {
        self.hero_ai.state()
    }

    /// Active elemental statuses.
    #[must_use]
    pub fn statuses(&self) -> &StatusEffectRegistry {
        &self.statuses
    }

    /// The player's ability bar.
    #[must_use]
    pub fn abilities(&self) -> &AbilityController {
        &self.abilities
    }

    /// Applies a command outside the tick order, as scripted scenarios do.
    ///
    /// The resulting events are returned and also queued so the wave
    /// director and momentum tracker observe them on the next tick.
    pub fn inject(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        self.wave_backlog.extend(events.iter().cloned());
        self.momentum_backlog.extend(events.iter().cloned());
        events
    }

    /// Advances the simulation by `dt` and reports the resulting frame.
    pub fn tick(&mut self, dt: Duration, input: &PlayerInput) -> Frame {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::Tick { dt }, &mut events);

        let wave_mark = events.len();
        self.run_waves(&mut events);

        self.run_lane_combat(&mut events);
        self.run_towers(&mut events);
        world::apply(
            &mut self.world,
            Command::ResolveProjectiles { dt },
            &mut events,
        );
        self.run_statuses(&mut events);

        let momentum_mark = events.len();
        self.run_momentum(&mut events);

        self.run_player(dt, input, &mut events);
        self.run_hero_ai(&mut events);
        world::apply(&mut self.world, Command::RemoveDead, &mut events);

        // later steps of this tick reach these two services on the next one
        self.wave_backlog = events[wave_mark..].to_vec();
        self.momentum_backlog = events[momentum_mark..].to_vec();

        for cue in events.iter().filter_map(Cue::for_event) {
            self.capabilities.audio.cue(cue);
        }
        self.frame(events)
    }

    fn apply_commands(&mut self, events: &mut Vec<Event>) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, events);
        }
    }

    fn run_waves(&mut self, events: &mut Vec<Event>) {
        let mut observed = std::mem::take(&mut self.wave_backlog);
        observed.extend(events.iter().cloned());
        self.waves.handle(
            &observed,
            query::lanes(&self.world),
            &mut self.commands,
            events,
        );
        self.apply_commands(events);
    }

    fn run_lane_combat(&mut self, events: &mut Vec<Event>) {
        let view = query::combat_view(&self.world);
        let world = &self.world;
        self.lane_combat.handle(
            events,
            &view,
            &self.statuses,
            |faction| query::throne(world, faction),
            &mut self.commands,
        );
        self.apply_commands(events);
    }

    fn run_towers(&mut self, events: &mut Vec<Event>) {
        let view = query::combat_view(&self.world);
        self.targeting.handle(&view, &mut self.tower_targets);
        self.tower_combat.handle(
            &view,
            &self.tower_targets,
            &self.statuses,
            &mut self.commands,
        );
        self.apply_commands(events);
    }

    fn run_statuses(&mut self, events: &mut Vec<Event>) {
        let view = query::combat_view(&self.world);
        self.statuses.tick(
            query::now(&self.world),
            &view,
            &mut self.commands,
            events,
        );
        self.apply_commands(events);
    }

    fn run_momentum(&mut self, events: &mut Vec<Event>) {
        let mut observed = std::mem::take(&mut self.momentum_backlog);
        observed.extend(events.iter().cloned());
        self.momentum.handle(&observed, events);
    }

    fn run_player(&mut self, dt: Duration, input: &PlayerInput, events: &mut Vec<Event>) {
        let player = query::player(&self.world);
        if let Some(position) = input.position {
            world::apply(
                &mut self.world,
                Command::Teleport {
                    combatant: player,
                    destination: position,
                },
                events,
            );
        }

        let affinity = self
            .capabilities
            .equipment
            .affinity()
            .or(input.affinity);
        let now = query::now(&self.world);
        self.abilities.tick(dt);
        self.tags.clear();

        if input.attacked {
            let view = query::combat_view(&self.world);
            let _ = self.player_combat.attack(
                now,
                player,
                &view,
                affinity,
                &mut self.commands,
                &mut self.tags,
            );
            self.apply_commands(events);
        }

        for &slot in &input.abilities {
            let view = query::combat_view(&self.world);
            let context = CastContext {
                caster: player,
                view: &view,
                bounds: query::bounds(&self.world),
                facing: input.facing,
                affinity,
            };
            let outcome = self.abilities.use_ability(
                slot,
                &context,
                &mut self.commands,
                &mut self.tags,
                events,
            );
            if outcome.is_err() {
                self.capabilities.audio.cue(Cue::AbilityRejected);
            }
            self.apply_commands(events);
        }

        self.statuses.apply_tags(&self.tags, now, events);

        let mut loot = Vec::new();
        self.player_combat.collect_loot(events, player, &mut loot);
        for event in &loot {
            if let Event::LootDropped { drop } = event {
                self.capabilities.equipment.grant_loot(*drop);
            }
        }
        events.append(&mut loot);
    }

    fn run_hero_ai(&mut self, events: &mut Vec<Event>) {
        let view = query::combat_view(&self.world);
        let world = &self.world;
        let mut decisions = Vec::new();
        self.hero_ai.handle(
            events,
            &view,
            &self.statuses,
            |faction| query::throne(world, faction),
            &mut self.commands,
            &mut decisions,
        );
        events.append(&mut decisions);
        self.apply_commands(events);
    }

    fn frame(&self, events: Vec<Event>) -> Frame {
        let combatants = query::combat_view(&self.world)
            .into_vec()
            .into_iter()
            .map(|snapshot| CombatantFrame {
                id: snapshot.id,
                kind: snapshot.kind,
                faction: snapshot.faction,
                position: snapshot.position,
                hp: snapshot.hp,
                max_hp: snapshot.max_hp,
                status_icons: self.statuses.icons(snapshot.id),
                is_boss: snapshot.is_boss,
            })
            .collect();
        Frame {
            tick: query::tick_index(&self.world),
            now: query::now(&self.world),
            wave: self.waves.wave_number(),
            momentum: self.momentum.value(),
            hero_state: self.hero_ai.state(),
            combatants,
            projectiles: query::projectiles(&self.world),
            events,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default(), Capabilities::default())
    }
}
