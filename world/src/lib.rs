#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Lane War.
//!
//! The world owns every combatant, projectile and lane. It is mutated only
//! through [`apply`], which executes a single [`Command`] and reports what
//! happened as [`Event`] values. Systems observe the world through the
//! [`query`] module and never hold references into it between ticks.

mod config;
mod heroes;
mod lanes;
mod projectiles;
mod towers;

use std::{collections::BTreeMap, time::Duration};

use glam::Vec2;
use lanewar_core::{
    ArenaBounds, BossKind, Command, CombatantId, CombatantKind, CombatantSnapshot, CreepStats,
    DamageSource, Event, Faction, LaneDirection, LaneId, LaneProgress, ProjectileId,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub use config::{ArenaConfig, ConfigError, LaneDefinition, WorldConfig, MAX_LANES};
pub use heroes::{level_for_xp, respawn_delay, xp_reward, LEVEL_THRESHOLDS};
pub use lanes::{Lane, LaneTopology};

use heroes::{
    HeroState, HERO_ATTACK_INTERVAL, HERO_ATTACK_RANGE, HERO_BASE_ARMOR, HERO_BASE_DAMAGE,
    HERO_BASE_HP, HERO_SPEED,
};
use projectiles::{Flight, Projectile};
use towers::{profile_for, structure_seeds};

/// Armor constant of the mitigation curve `100 / (100 + armor)`.
const ARMOR_SCALE: f32 = 100.0;
/// Half-extent of the random offset applied to creep spawn positions.
const SPAWN_JITTER: f32 = 0.75;
/// Relative spawn points used when a faction has no usable lane.
const EXPLORER_FALLBACK_SPAWN: Vec2 = Vec2::new(0.1, 0.1);
const HORDE_FALLBACK_SPAWN: Vec2 = Vec2::new(0.9, 0.9);

#[derive(Clone, Debug)]
struct Combatant {
    id: CombatantId,
    kind: CombatantKind,
    faction: Faction,
    position: Vec2,
    facing: Vec2,
    hp: f32,
    max_hp: f32,
    armor: f32,
    speed: f32,
    attack_damage: f32,
    attack_range: f32,
    attack_interval: Duration,
    attack_cooldown: Duration,
    alive: bool,
    is_boss: bool,
    lane: Option<LaneProgress>,
    hero: Option<HeroState>,
}

impl Combatant {
    fn snapshot(&self) -> CombatantSnapshot {
        CombatantSnapshot {
            id: self.id,
            kind: self.kind,
            faction: self.faction,
            position: self.position,
            facing: self.facing,
            hp: self.hp,
            max_hp: self.max_hp,
            armor: self.armor,
            speed: self.speed,
            attack_damage: self.attack_damage,
            attack_range: self.attack_range,
            attack_ready: self.attack_cooldown.is_zero(),
            is_boss: self.is_boss,
            lane: self.lane,
            hero: self.hero.as_ref().map(HeroState::snapshot),
        }
    }

    fn face_toward(&mut self, point: Vec2) {
        let heading = (point - self.position).normalize_or_zero();
        if heading != Vec2::ZERO {
            self.facing = heading;
        }
    }
}

/// Represents the authoritative Lane War world state.
#[derive(Debug)]
pub struct World {
    bounds: ArenaBounds,
    topology: LaneTopology,
    hero_lane: Option<LaneId>,
    combatants: BTreeMap<CombatantId, Combatant>,
    projectiles: Vec<Projectile>,
    thrones: BTreeMap<Faction, CombatantId>,
    player: CombatantId,
    enemy_hero: CombatantId,
    next_combatant_id: u32,
    next_projectile_id: u32,
    rng: ChaCha8Rng,
    now: Duration,
    tick_index: u64,
}

impl World {
    /// Builds a world from a validated configuration.
    ///
    /// Thrones and towers are placed from the lane topology, then the player
    /// hero spawns at the explorer throne and the enemy hero at the horde
    /// throne.
    #[must_use]
    pub fn new(config: &WorldConfig) -> Self {
        let bounds = ArenaBounds::centered(config.arena.width, config.arena.height);
        let topology = LaneTopology::from_definitions(&config.lanes, &bounds);
        let hero_lane = topology
            .lane_by_key(&config.hero_lane)
            .filter(|lane| topology.is_usable(*lane))
            .or_else(|| topology.first_usable());

        let mut world = Self {
            bounds,
            topology,
            hero_lane,
            combatants: BTreeMap::new(),
            projectiles: Vec::new(),
            thrones: BTreeMap::new(),
            player: CombatantId::new(0),
            enemy_hero: CombatantId::new(0),
            next_combatant_id: 0,
            next_projectile_id: 0,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            now: Duration::ZERO,
            tick_index: 0,
        };

        for seed in structure_seeds(&world.topology) {
            let profile = profile_for(seed.kind);
            let id = world.allocate_combatant_id();
            world.insert(Combatant {
                id,
                kind: seed.kind,
                faction: seed.faction,
                position: seed.position,
                facing: Vec2::X,
                hp: profile.max_hp,
                max_hp: profile.max_hp,
                armor: profile.armor,
                speed: 0.0,
                attack_damage: profile.attack_damage,
                attack_range: profile.attack_range,
                attack_interval: Duration::ZERO,
                attack_cooldown: Duration::ZERO,
                alive: true,
                is_boss: false,
                lane: None,
                hero: None,
            });
            if seed.kind == CombatantKind::Throne {
                let _ = world.thrones.insert(seed.faction, id);
            }
        }

        world.player = world.spawn_hero(Faction::Explorer, None);
        let enemy_lane = world.hero_lane.and_then(|lane| world.lane_start(lane, Faction::Horde));
        world.enemy_hero = world.spawn_hero(Faction::Horde, enemy_lane);
        log::debug!(
            "world initialized with {} combatants across {} lanes",
            world.combatants.len(),
            world.topology.lane_ids().count()
        );
        world
    }

    fn allocate_combatant_id(&mut self) -> CombatantId {
        let id = CombatantId::new(self.next_combatant_id);
        self.next_combatant_id = self.next_combatant_id.saturating_add(1);
        id
    }

    fn allocate_projectile_id(&mut self) -> ProjectileId {
        let id = ProjectileId::new(self.next_projectile_id);
        self.next_projectile_id = self.next_projectile_id.saturating_add(1);
        id
    }

    fn insert(&mut self, combatant: Combatant) {
        let _ = self.combatants.insert(combatant.id, combatant);
    }

    fn lane_start(&self, lane: LaneId, faction: Faction) -> Option<LaneProgress> {
        let walkable = self.topology.lane(lane).filter(|lane| lane.is_usable())?;
        let direction = LaneDirection::for_faction(faction);
        let start = walkable.start_index(direction);
        Some(LaneProgress {
            lane,
            waypoint_index: walkable.next_index(start, direction),
            direction,
            sieging: false,
        })
    }

    fn spawn_hero(&mut self, faction: Faction, home_lane: Option<LaneProgress>) -> CombatantId {
        let fallback = match faction {
            Faction::Explorer => EXPLORER_FALLBACK_SPAWN,
            Faction::Horde => HORDE_FALLBACK_SPAWN,
        };
        let spawn_point = self
            .topology
            .throne_site(faction)
            .unwrap_or_else(|| self.bounds.scale(fallback));
        let id = self.allocate_combatant_id();
        self.insert(Combatant {
            id,
            kind: CombatantKind::Hero,
            faction,
            position: spawn_point,
            facing: (-spawn_point).normalize_or_zero(),
            hp: HERO_BASE_HP,
            max_hp: HERO_BASE_HP,
            armor: HERO_BASE_ARMOR,
            speed: HERO_SPEED,
            attack_damage: HERO_BASE_DAMAGE,
            attack_range: HERO_ATTACK_RANGE,
            attack_interval: HERO_ATTACK_INTERVAL,
            attack_cooldown: Duration::ZERO,
            alive: true,
            is_boss: false,
            lane: home_lane,
            hero: Some(HeroState::new(spawn_point, home_lane)),
        });
        id
    }

    fn spawn_creep(
        &mut self,
        lane: LaneId,
        faction: Faction,
        stats: CreepStats,
        boss: Option<BossKind>,
        out_events: &mut Vec<Event>,
    ) {
        let Some(walkable) = self.topology.lane(lane).filter(|lane| lane.is_usable()) else {
            log::debug!("skipping spawn on inert lane {}", lane.get());
            return;
        };
        let direction = LaneDirection::for_faction(faction);
        let start = walkable.start_index(direction);
        let next = walkable.next_index(start, direction);
        let origin = walkable.waypoints()[start];
        let heading = (walkable.waypoints()[next] - origin).normalize_or_zero();

        let jitter = Vec2::new(
            self.rng.gen_range(-SPAWN_JITTER..=SPAWN_JITTER),
            self.rng.gen_range(-SPAWN_JITTER..=SPAWN_JITTER),
        );
        let id = self.allocate_combatant_id();
        self.insert(Combatant {
            id,
            kind: CombatantKind::Creep,
            faction,
            position: self.bounds.clamp(origin + jitter),
            facing: heading,
            hp: stats.max_hp,
            max_hp: stats.max_hp,
            armor: stats.armor,
            speed: stats.speed,
            attack_damage: stats.damage,
            attack_range: stats.attack_range,
            attack_interval: stats.attack_interval,
            attack_cooldown: Duration::ZERO,
            alive: true,
            is_boss: boss.is_some(),
            lane: Some(LaneProgress {
                lane,
                waypoint_index: next,
                direction,
                sieging: false,
            }),
            hero: None,
        });
        out_events.push(Event::CombatantSpawned {
            combatant: id,
            kind: CombatantKind::Creep,
            faction,
        });
        if let Some(boss) = boss {
            log::info!("{} entered lane {}", boss.name(), lane.get());
            out_events.push(Event::BossSpawned {
                combatant: id,
                boss,
            });
        }
    }

    fn advance_along_lane(&mut self, id: CombatantId, distance: f32) {
        let Some(walker) = self.combatants.get_mut(&id) else {
            return;
        };
        if !walker.alive {
            return;
        }
        let Some(mut progress) = walker.lane else {
            return;
        };
        if progress.sieging {
            return;
        }
        let Some(lane) = self.topology.lane(progress.lane).filter(|lane| lane.is_usable()) else {
            return;
        };

        let waypoints = lane.waypoints();
        let terminal = lane.terminal_index(progress.direction);
        let mut remaining = distance.max(0.0);
        loop {
            let index = progress.waypoint_index.min(waypoints.len() - 1);
            let target = waypoints[index];
            let offset = target - walker.position;
            let gap = offset.length();
            if gap > remaining {
                if remaining > 0.0 {
                    walker.facing = offset / gap;
                    walker.position += walker.facing * remaining;
                }
                break;
            }
            if gap > f32::EPSILON {
                walker.facing = offset / gap;
            }
            walker.position = target;
            remaining -= gap;
            if index == terminal {
                progress.sieging = true;
                break;
            }
            progress.waypoint_index = lane.next_index(index, progress.direction);
        }
        walker.position = self.bounds.clamp(walker.position);
        walker.lane = Some(progress);
    }

    fn move_toward(&mut self, id: CombatantId, destination: Vec2, distance: f32) {
        let bounds = self.bounds;
        let Some(mover) = self.combatants.get_mut(&id).filter(|mover| mover.alive) else {
            return;
        };
        let offset = destination - mover.position;
        let gap = offset.length();
        if gap <= f32::EPSILON {
            return;
        }
        mover.facing = offset / gap;
        let step = distance.max(0.0).min(gap);
        mover.position = bounds.clamp(mover.position + mover.facing * step);
    }

    fn teleport(&mut self, id: CombatantId, destination: Vec2) {
        let bounds = self.bounds;
        if let Some(mover) = self.combatants.get_mut(&id).filter(|mover| mover.alive) {
            mover.position = bounds.clamp(destination);
        }
    }

    fn strike(
        &mut self,
        attacker: CombatantId,
        target: CombatantId,
        damage: f32,
        out_events: &mut Vec<Event>,
    ) {
        let Some(target_position) = self.living_position(target) else {
            return;
        };
        let Some(striker) = self
            .combatants
            .get_mut(&attacker)
            .filter(|striker| striker.alive && striker.attack_cooldown.is_zero())
        else {
            return;
        };
        striker.attack_cooldown = striker.attack_interval;
        striker.face_toward(target_position);
        self.inflict(target, damage, DamageSource::Strike(attacker), out_events);
    }

    fn fire_projectile(
        &mut self,
        shooter: CombatantId,
        target: CombatantId,
        damage: f32,
        speed: f32,
        reload: Option<Duration>,
        out_events: &mut Vec<Event>,
    ) {
        let Some(target_position) = self.living_position(target) else {
            return;
        };
        let Some(owner) = self.combatants.get_mut(&shooter).filter(|owner| owner.alive) else {
            return;
        };
        if let Some(reload) = reload {
            if !owner.attack_cooldown.is_zero() {
                return;
            }
            owner.attack_cooldown = reload;
        }
        owner.face_toward(target_position);
        let origin = owner.position;
        let id = self.allocate_projectile_id();
        self.projectiles.push(Projectile {
            id,
            owner: shooter,
            target,
            position: origin,
            speed,
            damage,
        });
        out_events.push(Event::ProjectileFired {
            projectile: id,
            owner: shooter,
            target,
        });
    }

    fn resolve_projectiles(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let in_flight = std::mem::take(&mut self.projectiles);
        let mut remaining = Vec::with_capacity(in_flight.len());
        for mut projectile in in_flight {
            let Some(target_position) = self.living_position(projectile.target) else {
                continue;
            };
            match projectile.advance(target_position, dt) {
                Flight::InFlight => remaining.push(projectile),
                Flight::Arrived => {
                    out_events.push(Event::ProjectileImpacted {
                        projectile: projectile.id,
                        target: projectile.target,
                    });
                    self.inflict(
                        projectile.target,
                        projectile.damage,
                        DamageSource::Projectile(projectile.owner),
                        out_events,
                    );
                }
            }
        }
        self.projectiles = remaining;
    }

    fn living_position(&self, id: CombatantId) -> Option<Vec2> {
        self.combatants
            .get(&id)
            .filter(|combatant| combatant.alive)
            .map(|combatant| combatant.position)
    }

    /// Runs raw damage through buffs and armor, then applies it.
    fn inflict(
        &mut self,
        target: CombatantId,
        raw: f32,
        source: DamageSource,
        out_events: &mut Vec<Event>,
    ) {
        if raw.is_nan() || raw <= 0.0 {
            return;
        }
        let attacker = source.attacker();
        let offense = attacker
            .and_then(|id| self.combatants.get(&id))
            .and_then(|combatant| combatant.hero.as_ref())
            .map_or(1.0, HeroState::offense_multiplier);

        let Some(victim) = self.combatants.get_mut(&target).filter(|victim| victim.alive) else {
            return;
        };
        let intake = victim
            .hero
            .as_ref()
            .map_or(1.0, HeroState::intake_multiplier);
        let mitigated =
            (raw * offense * intake * ARMOR_SCALE / (ARMOR_SCALE + victim.armor.max(0.0))).max(0.0);
        let dealt = mitigated.min(victim.hp);
        victim.hp = (victim.hp - mitigated).max(0.0);
        out_events.push(Event::CombatantDamaged {
            combatant: target,
            amount: dealt,
            source,
        });
        if victim.kind == CombatantKind::Throne {
            out_events.push(Event::ThroneHpChanged {
                faction: victim.faction,
                hp: victim.hp,
            });
        }
        let died = victim.hp <= 0.0;

        if let Some(healer) = attacker
            .and_then(|id| self.combatants.get_mut(&id))
            .filter(|healer| healer.alive)
        {
            let steal = healer.hero.as_ref().map_or(0.0, HeroState::lifesteal);
            if steal > 0.0 {
                healer.hp = (healer.hp + dealt * steal).min(healer.max_hp);
            }
        }

        if died {
            self.kill(target, attacker, out_events);
        }
    }

    fn kill(&mut self, id: CombatantId, killer: Option<CombatantId>, out_events: &mut Vec<Event>) {
        let Some(victim) = self.combatants.get_mut(&id) else {
            return;
        };
        victim.alive = false;
        victim.hp = 0.0;
        if let Some(hero) = victim.hero.as_mut() {
            hero.deaths = hero.deaths.saturating_add(1);
            hero.respawn_in = Some(respawn_delay(hero.level));
            hero.clear_buffs();
        }
        let (kind, faction, is_boss) = (victim.kind, victim.faction, victim.is_boss);
        log::debug!("{kind:?} {} of {faction:?} died", id.get());
        out_events.push(Event::CombatantDied {
            combatant: id,
            kind,
            faction,
            is_boss,
            killer,
        });
        self.projectiles.retain(|projectile| projectile.target != id);

        if let Some(killer) = killer {
            self.credit_kill(killer, kind, is_boss, out_events);
        }
    }

    fn credit_kill(
        &mut self,
        killer: CombatantId,
        kind: CombatantKind,
        is_boss: bool,
        out_events: &mut Vec<Event>,
    ) {
        let Some(credited) = self.combatants.get_mut(&killer) else {
            return;
        };
        let Some(hero) = credited.hero.as_mut() else {
            return;
        };
        hero.kills = hero.kills.saturating_add(1);
        let gains = hero.gain_xp(xp_reward(kind, is_boss));
        let level = hero.level;
        let reached = level.saturating_sub(gains.len() as u32);
        for (offset, gain) in gains.into_iter().enumerate() {
            credited.max_hp += gain.hp;
            if credited.alive {
                credited.hp += gain.hp;
            }
            credited.attack_damage += gain.damage;
            credited.armor += gain.armor;
            out_events.push(Event::HeroLeveled {
                hero: killer,
                level: reached + offset as u32 + 1,
            });
        }
        if reached < level {
            log::info!("hero {} reached level {level}", killer.get());
        }
    }

    fn advance_clock(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.now = self.now.saturating_add(dt);
        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced { dt });

        let mut respawning = Vec::new();
        for combatant in self.combatants.values_mut() {
            combatant.attack_cooldown = combatant.attack_cooldown.saturating_sub(dt);
            let id = combatant.id;
            let alive = combatant.alive;
            let Some(hero) = combatant.hero.as_mut() else {
                continue;
            };
            if alive {
                hero.regenerate(dt);
                hero.tick_buffs(dt, id, out_events);
                let heal = hero.spawn_heal(combatant.position, combatant.max_hp, dt);
                combatant.hp = (combatant.hp + heal).min(combatant.max_hp);
            } else if let Some(remaining) = hero.respawn_in {
                let remaining = remaining.saturating_sub(dt);
                if remaining.is_zero() {
                    respawning.push(id);
                } else {
                    hero.respawn_in = Some(remaining);
                }
            }
        }
        for id in respawning {
            self.respawn(id, out_events);
        }
    }

    fn respawn(&mut self, id: CombatantId, out_events: &mut Vec<Event>) {
        let Some(combatant) = self.combatants.get_mut(&id) else {
            return;
        };
        let Some(hero) = combatant.hero.as_mut() else {
            return;
        };
        hero.respawn_in = None;
        hero.refill();
        hero.clear_buffs();
        combatant.position = hero.spawn_point;
        combatant.lane = hero.home_lane;
        combatant.hp = combatant.max_hp;
        combatant.attack_cooldown = Duration::ZERO;
        combatant.alive = true;
        log::debug!("hero {} respawned", id.get());
        out_events.push(Event::HeroRespawned { hero: id });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(&WorldConfig::default())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => world.advance_clock(dt, out_events),
        Command::SpawnCreep {
            lane,
            faction,
            stats,
            boss,
        } => world.spawn_creep(lane, faction, stats, boss, out_events),
        Command::AdvanceAlongLane {
            combatant,
            distance,
        } => world.advance_along_lane(combatant, distance),
        Command::MoveToward {
            combatant,
            destination,
            distance,
        } => world.move_toward(combatant, destination, distance),
        Command::Teleport {
            combatant,
            destination,
        } => world.teleport(combatant, destination),
        Command::Strike {
            attacker,
            target,
            damage,
        } => world.strike(attacker, target, damage, out_events),
        Command::DealDamage {
            target,
            amount,
            source,
        } => world.inflict(target, amount, source, out_events),
        Command::FireProjectile {
            shooter,
            target,
            damage,
            speed,
            reload,
        } => world.fire_projectile(shooter, target, damage, speed, reload, out_events),
        Command::ResolveProjectiles { dt } => world.resolve_projectiles(dt, out_events),
        Command::ApplyBuff {
            target,
            buff,
            duration,
        } => {
            let Some(hero) = world
                .combatants
                .get_mut(&target)
                .filter(|combatant| combatant.alive)
                .and_then(|combatant| combatant.hero.as_mut())
            else {
                return;
            };
            hero.apply_buff(buff, duration);
            out_events.push(Event::BuffApplied {
                combatant: target,
                kind: buff.kind,
            });
        }
        Command::SpendResource { hero, pool, amount } => {
            if let Some(state) = world
                .combatants
                .get_mut(&hero)
                .and_then(|combatant| combatant.hero.as_mut())
            {
                state.spend(pool, amount);
            }
        }
        Command::RemoveDead => {
            world
                .combatants
                .retain(|_, combatant| combatant.alive || combatant.kind != CombatantKind::Creep);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::{LaneTopology, World};
    use lanewar_core::{
        ArenaBounds, CombatView, CombatantId, Faction, LaneId, ProjectileSnapshot,
    };

    /// Captures a read-only view of every living combatant.
    #[must_use]
    pub fn combat_view(world: &World) -> CombatView {
        CombatView::from_snapshots(
            world
                .combatants
                .values()
                .filter(|combatant| combatant.alive)
                .map(|combatant| combatant.snapshot())
                .collect(),
        )
    }

    /// Provides read-only access to the lane topology.
    #[must_use]
    pub fn lanes(world: &World) -> &LaneTopology {
        &world.topology
    }

    /// Arena rectangle positions are clamped to.
    #[must_use]
    pub fn bounds(world: &World) -> ArenaBounds {
        world.bounds
    }

    /// Simulated time elapsed since the world was created.
    #[must_use]
    pub fn now(world: &World) -> Duration {
        world.now
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Identifier of the player-controlled hero.
    #[must_use]
    pub fn player(world: &World) -> CombatantId {
        world.player
    }

    /// Identifier of the AI-controlled enemy hero.
    #[must_use]
    pub fn enemy_hero(world: &World) -> CombatantId {
        world.enemy_hero
    }

    /// Lane the enemy hero pushes along, if any lane is usable.
    #[must_use]
    pub fn hero_lane(world: &World) -> Option<LaneId> {
        world.hero_lane
    }

    /// Identifier of the faction's throne, if the topology supports one.
    #[must_use]
    pub fn throne(world: &World, faction: Faction) -> Option<CombatantId> {
        world.thrones.get(&faction).copied()
    }

    /// Reports whether the combatant is still tracked, alive or not.
    #[must_use]
    pub fn contains(world: &World, id: CombatantId) -> bool {
        world.combatants.contains_key(&id)
    }

    /// Time until a fallen hero returns; `None` while the hero is alive.
    #[must_use]
    pub fn respawn_remaining(world: &World, hero: CombatantId) -> Option<Duration> {
        world
            .combatants
            .get(&hero)
            .and_then(|combatant| combatant.hero.as_ref())
            .and_then(|state| state.respawn_in)
    }

    /// Snapshots of every projectile in flight, in launch order.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<ProjectileSnapshot> {
        world
            .projectiles
            .iter()
            .map(|projectile| projectile.snapshot())
            .collect()
    }
}
