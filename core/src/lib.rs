#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Lane War combat simulation.
//!
//! This crate defines the message surface that connects the session, the
//! authoritative world, and the pure systems. Systems submit [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values for systems
//! and the presentation layer to react to. Systems read immutable
//! [`CombatView`] snapshots and respond exclusively with new command batches.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that a creep be spawned at its faction's end of a lane.
    SpawnCreep {
        /// Lane the creep walks along.
        lane: LaneId,
        /// Faction the creep fights for.
        faction: Faction,
        /// Combat statistics assigned to the creep.
        stats: CreepStats,
        /// Boss profile when the creep is a wave boss.
        boss: Option<BossKind>,
    },
    /// Moves a lane walker along its lane by the provided distance.
    AdvanceAlongLane {
        /// Creep or hero following a lane.
        combatant: CombatantId,
        /// Distance in world units to travel this tick.
        distance: f32,
    },
    /// Moves a combatant toward a destination by at most the provided distance.
    MoveToward {
        /// Combatant being moved.
        combatant: CombatantId,
        /// Point the combatant walks toward.
        destination: Vec2,
        /// Maximum distance in world units to travel this tick.
        distance: f32,
    },
    /// Instantly relocates a combatant, clamped to the arena bounds.
    Teleport {
        /// Combatant being relocated.
        combatant: CombatantId,
        /// Requested destination.
        destination: Vec2,
    },
    /// Melee attack gated by the attacker's attack cooldown.
    Strike {
        /// Combatant performing the attack.
        attacker: CombatantId,
        /// Combatant receiving the attack.
        target: CombatantId,
        /// Raw damage before buffs and armor.
        damage: f32,
    },
    /// Ungated damage from abilities, projectiles, or periodic effects.
    DealDamage {
        /// Combatant receiving the damage.
        target: CombatantId,
        /// Raw damage before buffs and armor.
        amount: f32,
        /// Origin of the damage.
        source: DamageSource,
    },
    /// Launches a homing projectile.
    FireProjectile {
        /// Combatant that fired the projectile.
        shooter: CombatantId,
        /// Combatant the projectile homes on.
        target: CombatantId,
        /// Damage applied on arrival.
        damage: f32,
        /// Travel speed in world units per second.
        speed: f32,
        /// Reload applied to the shooter; `Some` gates the shot on the attack cooldown.
        reload: Option<Duration>,
    },
    /// Advances every projectile in flight and resolves arrivals.
    ResolveProjectiles {
        /// Duration of simulated flight time.
        dt: Duration,
    },
    /// Grants or refreshes a timed buff on a hero.
    ApplyBuff {
        /// Hero receiving the buff.
        target: CombatantId,
        /// Buff parameters.
        buff: Buff,
        /// Time until the buff expires.
        duration: Duration,
    },
    /// Deducts a resource from a hero's pool.
    SpendResource {
        /// Hero paying the cost.
        hero: CombatantId,
        /// Pool being drained.
        pool: ResourcePool,
        /// Amount deducted.
        amount: f32,
    },
    /// Removes dead creeps from the pool.
    RemoveDead,
}

/// Events broadcast by the world and systems after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that a new creep wave started.
    WaveStarted {
        /// One-based wave counter.
        wave: u32,
    },
    /// Announces that a boss entered the field.
    BossSpawned {
        /// Identifier of the boss combatant.
        combatant: CombatantId,
        /// Profile the boss was built from.
        boss: BossKind,
    },
    /// Confirms that a combatant entered the pool.
    CombatantSpawned {
        /// Identifier assigned to the combatant.
        combatant: CombatantId,
        /// Kind of combatant.
        kind: CombatantKind,
        /// Faction the combatant belongs to.
        faction: Faction,
    },
    /// Reports damage taken after mitigation.
    CombatantDamaged {
        /// Combatant that lost health.
        combatant: CombatantId,
        /// Health removed after mitigation.
        amount: f32,
        /// Origin of the damage.
        source: DamageSource,
    },
    /// Reports that a combatant's health reached zero.
    CombatantDied {
        /// Identifier of the fallen combatant.
        combatant: CombatantId,
        /// Kind of the fallen combatant.
        kind: CombatantKind,
        /// Faction of the fallen combatant.
        faction: Faction,
        /// Indicates whether the fallen combatant was a wave boss.
        is_boss: bool,
        /// Combatant credited with the kill, if any.
        killer: Option<CombatantId>,
    },
    /// Reports a throne's health after it changed.
    ThroneHpChanged {
        /// Faction owning the throne.
        faction: Faction,
        /// Remaining throne health.
        hp: f32,
    },
    /// Reports the momentum scalar after it changed.
    MomentumChanged {
        /// Momentum in `[0, 100]`; values above 50 favour the explorers.
        value: f32,
    },
    /// Confirms that a projectile was launched.
    ProjectileFired {
        /// Identifier of the projectile.
        projectile: ProjectileId,
        /// Combatant that fired it.
        owner: CombatantId,
        /// Combatant it homes on.
        target: CombatantId,
    },
    /// Confirms that a projectile reached its target.
    ProjectileImpacted {
        /// Identifier of the projectile.
        projectile: ProjectileId,
        /// Combatant that was hit.
        target: CombatantId,
    },
    /// Reports that an elemental status was applied or refreshed.
    StatusApplied {
        /// Afflicted combatant.
        combatant: CombatantId,
        /// Element applied.
        element: Element,
        /// True when an existing instance had its timing refreshed.
        refreshed: bool,
    },
    /// Reports that an elemental status ran out.
    StatusExpired {
        /// Previously afflicted combatant.
        combatant: CombatantId,
        /// Element that expired.
        element: Element,
    },
    /// Reports a successful ability activation.
    AbilityUsed {
        /// Hero that used the ability.
        caster: CombatantId,
        /// Display name of the ability.
        ability: &'static str,
    },
    /// Reports that a buff was granted or refreshed.
    BuffApplied {
        /// Buffed hero.
        combatant: CombatantId,
        /// Kind of buff.
        kind: BuffKind,
    },
    /// Reports that a buff ran out.
    BuffExpired {
        /// Previously buffed hero.
        combatant: CombatantId,
        /// Kind of buff.
        kind: BuffKind,
    },
    /// Reports that a hero crossed a level threshold.
    HeroLeveled {
        /// Hero that gained the level.
        hero: CombatantId,
        /// New level.
        level: u32,
    },
    /// Reports that a hero returned to its spawn point.
    HeroRespawned {
        /// Hero that respawned.
        hero: CombatantId,
    },
    /// Reports a transition of the enemy hero's decision state.
    HeroStateChanged {
        /// Hero whose state changed.
        hero: CombatantId,
        /// State before the transition.
        from: HeroAiState,
        /// State after the transition.
        to: HeroAiState,
    },
    /// Reports a loot drop rolled from a player kill.
    LootDropped {
        /// Drop description.
        drop: LootDrop,
    },
}

/// Side a combatant fights for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Faction {
    /// The player's side.
    Explorer,
    /// The opposing side, including the enemy hero.
    Horde,
}

impl Faction {
    /// Both factions in a stable order.
    pub const ALL: [Faction; 2] = [Faction::Explorer, Faction::Horde];

    /// Returns the opposing faction.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Explorer => Self::Horde,
            Self::Horde => Self::Explorer,
        }
    }

    /// Direction in which an advantage for this faction moves momentum.
    #[must_use]
    pub const fn momentum_sign(self) -> f32 {
        match self {
            Self::Explorer => 1.0,
            Self::Horde => -1.0,
        }
    }
}

/// Broad category of a combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatantKind {
    /// Lane-walking minion.
    Creep,
    /// Stationary ranged defence.
    Tower,
    /// Passive faction objective.
    Throne,
    /// Player or enemy hero.
    Hero,
}

/// Unique identifier assigned to a combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CombatantId(u32);

impl CombatantId {
    /// Creates a new combatant identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Index of a lane in configuration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LaneId(u8);

impl LaneId {
    /// Creates a new lane identifier.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Retrieves the lane index.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Lane index as a slice index.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Elemental affinity used by status effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    /// Slows the afflicted combatant.
    Ice,
    /// Burns for frequent small ticks.
    Fire,
    /// Weakens outgoing damage and burns slowly.
    Void,
    /// Long-lived mixed debuff.
    Cosmic,
}

impl Element {
    /// Every element in a stable order.
    pub const ALL: [Element; 4] = [Element::Ice, Element::Fire, Element::Void, Element::Cosmic];

    /// Returns the fixed timing and multiplier profile of the element.
    #[must_use]
    pub const fn profile(self) -> ElementProfile {
        match self {
            Self::Ice => ElementProfile {
                duration: Duration::from_millis(3_000),
                tick_rate: Duration::ZERO,
                tick_damage: 0.0,
                speed_multiplier: 0.5,
                damage_multiplier: 1.0,
            },
            Self::Fire => ElementProfile {
                duration: Duration::from_millis(4_000),
                tick_rate: Duration::from_millis(500),
                tick_damage: 2.0,
                speed_multiplier: 1.0,
                damage_multiplier: 1.0,
            },
            Self::Void => ElementProfile {
                duration: Duration::from_millis(5_000),
                tick_rate: Duration::from_millis(1_000),
                tick_damage: 3.0,
                speed_multiplier: 0.8,
                damage_multiplier: 0.75,
            },
            Self::Cosmic => ElementProfile {
                duration: Duration::from_millis(6_000),
                tick_rate: Duration::from_millis(1_000),
                tick_damage: 4.0,
                speed_multiplier: 0.9,
                damage_multiplier: 0.85,
            },
        }
    }

    /// Icon key the presentation layer uses for the element.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Ice => "ice",
            Self::Fire => "fire",
            Self::Void => "void",
            Self::Cosmic => "cosmic",
        }
    }
}

/// Timing and multiplier parameters of an element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementProfile {
    /// Lifetime of a single application.
    pub duration: Duration,
    /// Interval between damage ticks; zero disables periodic damage.
    pub tick_rate: Duration,
    /// Damage applied per tick.
    pub tick_damage: f32,
    /// Factor applied to the afflicted combatant's movement speed.
    pub speed_multiplier: f32,
    /// Factor applied to damage dealt by the afflicted combatant.
    pub damage_multiplier: f32,
}

/// Fixed boss profiles that alternate every fifth wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BossKind {
    /// Slow, heavily armoured brute.
    VoidColossus,
    /// Fast, hard-hitting raider.
    StarDevourer,
}

impl BossKind {
    /// Display name announced when the boss spawns.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::VoidColossus => "Void Colossus",
            Self::StarDevourer => "Star Devourer",
        }
    }
}

/// Combat statistics used to spawn a creep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CreepStats {
    /// Starting and maximum health.
    pub max_hp: f32,
    /// Flat armor rating.
    pub armor: f32,
    /// Base movement speed in world units per second.
    pub speed: f32,
    /// Raw damage per strike.
    pub damage: f32,
    /// Reach of melee strikes.
    pub attack_range: f32,
    /// Delay between strikes.
    pub attack_interval: Duration,
}

impl CreepStats {
    /// Returns a copy with health and damage multiplied by `factor`.
    #[must_use]
    pub fn scaled(self, factor: f32) -> Self {
        Self {
            max_hp: self.max_hp * factor,
            damage: self.damage * factor,
            ..self
        }
    }
}

/// Hero resource pools.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourcePool {
    /// Spell resource.
    Mana,
    /// Mobility resource.
    Energy,
}

/// Kinds of timed hero buffs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BuffKind {
    /// Player damage shield.
    Shield,
    /// Enemy hero defensive stance.
    Bulwark,
    /// Enemy hero offensive stance with lifesteal.
    Frenzy,
}

/// Parameters of a timed buff consumed on the damage path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Buff {
    /// Kind of buff; one instance per kind is kept.
    pub kind: BuffKind,
    /// Fraction of incoming damage prevented.
    pub damage_reduction: f32,
    /// Factor applied to outgoing damage.
    pub offense_multiplier: f32,
    /// Fraction of dealt damage returned as health.
    pub lifesteal: f32,
}

impl Buff {
    /// Damage shield preventing `reduction` of incoming damage.
    #[must_use]
    pub const fn shield(reduction: f32) -> Self {
        Self {
            kind: BuffKind::Shield,
            damage_reduction: reduction,
            offense_multiplier: 1.0,
            lifesteal: 0.0,
        }
    }

    /// Defensive stance preventing `reduction` of incoming damage.
    #[must_use]
    pub const fn bulwark(reduction: f32) -> Self {
        Self {
            kind: BuffKind::Bulwark,
            damage_reduction: reduction,
            offense_multiplier: 1.0,
            lifesteal: 0.0,
        }
    }

    /// Offensive stance multiplying damage and healing from dealt damage.
    #[must_use]
    pub const fn frenzy(offense_multiplier: f32, lifesteal: f32) -> Self {
        Self {
            kind: BuffKind::Frenzy,
            damage_reduction: 0.0,
            offense_multiplier,
            lifesteal,
        }
    }
}

/// Origin of a damage instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DamageSource {
    /// Melee strike from a combatant.
    Strike(CombatantId),
    /// Projectile fired by a combatant.
    Projectile(CombatantId),
    /// Ability used by a hero.
    Ability(CombatantId),
    /// Periodic damage from an elemental status.
    Status(Element),
}

impl DamageSource {
    /// Combatant credited with the damage, if any.
    #[must_use]
    pub const fn attacker(&self) -> Option<CombatantId> {
        match self {
            Self::Strike(id) | Self::Projectile(id) | Self::Ability(id) => Some(*id),
            Self::Status(_) => None,
        }
    }
}

/// Decision states of the enemy hero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeroAiState {
    /// Walking the lane like a creep.
    Pushing,
    /// Hunting nearby opposing creeps.
    Farming,
    /// Engaging the player.
    Fighting,
    /// Falling back to its spawn point.
    Retreating,
}

/// Rarity tier of a loot drop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LootRarity {
    /// Most frequent tier.
    Common,
    /// Uncommon tier.
    Rare,
    /// Scarcest tier.
    Mythic,
}

impl LootRarity {
    /// Returns the next tier, saturating at [`LootRarity::Mythic`].
    #[must_use]
    pub const fn upgraded(self) -> Self {
        match self {
            Self::Common => Self::Rare,
            Self::Rare | Self::Mythic => Self::Mythic,
        }
    }
}

/// Loot rolled from a player kill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LootDrop {
    /// Combatant whose death produced the drop.
    pub source: CombatantId,
    /// Rolled rarity tier.
    pub rarity: LootRarity,
}

/// Direction a lane walker travels along the waypoint list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LaneDirection {
    /// From the first waypoint toward the last.
    Forward,
    /// From the last waypoint toward the first.
    Backward,
}

impl LaneDirection {
    /// Explorers walk forward, the horde walks backward.
    #[must_use]
    pub const fn for_faction(faction: Faction) -> Self {
        match faction {
            Faction::Explorer => Self::Forward,
            Faction::Horde => Self::Backward,
        }
    }
}

/// Progress of a combatant along a lane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LaneProgress {
    /// Lane being followed.
    pub lane: LaneId,
    /// Index of the waypoint currently walked toward.
    pub waypoint_index: usize,
    /// Travel direction along the waypoint list.
    pub direction: LaneDirection,
    /// Set once the terminal waypoint has been reached.
    pub sieging: bool,
}

/// Axis-aligned arena rectangle in world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArenaBounds {
    min: Vec2,
    max: Vec2,
}

impl ArenaBounds {
    /// Creates bounds centred on the origin with the provided extent.
    #[must_use]
    pub fn centered(width: f32, height: f32) -> Self {
        let half = Vec2::new(width, height) * 0.5;
        Self {
            min: -half,
            max: half,
        }
    }

    /// Lower-left corner.
    #[must_use]
    pub const fn min(&self) -> Vec2 {
        self.min
    }

    /// Upper-right corner.
    #[must_use]
    pub const fn max(&self) -> Vec2 {
        self.max
    }

    /// Extent of the arena.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Maps a point in `[0, 1]²` onto the arena.
    #[must_use]
    pub fn scale(&self, relative: Vec2) -> Vec2 {
        self.min + relative * self.size()
    }

    /// Clamps a point into the arena.
    #[must_use]
    pub fn clamp(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max)
    }
}

/// Hero-specific fields of a combatant snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct HeroSnapshot {
    /// Current level.
    pub level: u32,
    /// Accumulated experience.
    pub xp: u32,
    /// Current mana.
    pub mana: f32,
    /// Mana capacity.
    pub max_mana: f32,
    /// Current energy.
    pub energy: f32,
    /// Energy capacity.
    pub max_energy: f32,
    /// Kills credited to the hero.
    pub kills: u32,
    /// Times the hero died.
    pub deaths: u32,
    /// Point the hero respawns at.
    pub spawn_point: Vec2,
    /// Buffs currently active.
    pub buffs: Vec<BuffKind>,
}

impl HeroSnapshot {
    /// Amount available in the provided pool.
    #[must_use]
    pub fn available(&self, pool: ResourcePool) -> f32 {
        match pool {
            ResourcePool::Mana => self.mana,
            ResourcePool::Energy => self.energy,
        }
    }
}

/// Immutable representation of a single living combatant used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct CombatantSnapshot {
    /// Unique identifier assigned to the combatant.
    pub id: CombatantId,
    /// Kind of combatant.
    pub kind: CombatantKind,
    /// Faction of the combatant.
    pub faction: Faction,
    /// Current position.
    pub position: Vec2,
    /// Unit vector the combatant faces.
    pub facing: Vec2,
    /// Current health.
    pub hp: f32,
    /// Health capacity.
    pub max_hp: f32,
    /// Flat armor rating.
    pub armor: f32,
    /// Base movement speed.
    pub speed: f32,
    /// Raw damage per strike.
    pub attack_damage: f32,
    /// Reach of attacks.
    pub attack_range: f32,
    /// Indicates whether the attack cooldown has elapsed.
    pub attack_ready: bool,
    /// Indicates whether the combatant is a wave boss.
    pub is_boss: bool,
    /// Lane progress for lane walkers.
    pub lane: Option<LaneProgress>,
    /// Hero details for heroes.
    pub hero: Option<HeroSnapshot>,
}

impl CombatantSnapshot {
    /// Health as a fraction of capacity.
    #[must_use]
    pub fn hp_ratio(&self) -> f32 {
        if self.max_hp > 0.0 {
            self.hp / self.max_hp
        } else {
            0.0
        }
    }

    /// Reports whether `other` fights for the opposing faction.
    #[must_use]
    pub fn is_hostile_to(&self, other: &CombatantSnapshot) -> bool {
        self.faction != other.faction
    }
}

/// Read-only snapshot describing every living combatant.
#[derive(Clone, Debug, Default)]
pub struct CombatView {
    snapshots: Vec<CombatantSnapshot>,
}

impl CombatView {
    /// Creates a new view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<CombatantSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &CombatantSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up a living combatant by identifier.
    #[must_use]
    pub fn get(&self, id: CombatantId) -> Option<&CombatantSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of living combatants captured.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no combatants.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Returns the nearest combatant within `radius` of `origin` that
    /// satisfies `predicate`.
    ///
    /// Distances are compared squared; equidistant candidates resolve to the
    /// smaller identifier so that every system breaks ties the same way.
    pub fn nearest<P>(&self, origin: Vec2, radius: f32, mut predicate: P) -> Option<&CombatantSnapshot>
    where
        P: FnMut(&CombatantSnapshot) -> bool,
    {
        let max_distance = radius * radius;
        let mut best: Option<(f32, &CombatantSnapshot)> = None;

        for snapshot in &self.snapshots {
            let distance_sq = snapshot.position.distance_squared(origin);
            if distance_sq > max_distance || !predicate(snapshot) {
                continue;
            }

            match best {
                Some((best_distance, _)) if best_distance <= distance_sq => {}
                _ => best = Some((distance_sq, snapshot)),
            }
        }

        best.map(|(_, snapshot)| snapshot)
    }

    /// Iterates combatants within `radius` of `origin` that satisfy `predicate`.
    pub fn within<'a, P>(
        &'a self,
        origin: Vec2,
        radius: f32,
        mut predicate: P,
    ) -> impl Iterator<Item = &'a CombatantSnapshot> + 'a
    where
        P: FnMut(&CombatantSnapshot) -> bool + 'a,
    {
        let max_distance = radius * radius;
        self.snapshots.iter().filter(move |snapshot| {
            snapshot.position.distance_squared(origin) <= max_distance && predicate(snapshot)
        })
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<CombatantSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier of the projectile.
    pub id: ProjectileId,
    /// Combatant that fired it.
    pub owner: CombatantId,
    /// Combatant it homes on.
    pub target: CombatantId,
    /// Current position.
    pub position: Vec2,
}

/// Tower paired with the combatant it should shoot this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TowerTarget {
    /// Tower that acquired the target.
    pub tower: CombatantId,
    /// Combatant selected as the target.
    pub target: CombatantId,
}

/// Request to afflict a combatant with an elemental status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StatusTag {
    /// Combatant being tagged.
    pub combatant: CombatantId,
    /// Element applied.
    pub element: Element,
}

/// Movement and damage modifiers contributed by timed effects.
///
/// Systems that move combatants or compute outgoing damage consult this seam
/// instead of depending on the effect registry directly.
pub trait CombatModifiers {
    /// Factor applied to the combatant's movement speed.
    fn speed_multiplier(&self, combatant: CombatantId) -> f32;

    /// Factor applied to damage dealt by the combatant.
    fn damage_multiplier(&self, combatant: CombatantId) -> f32;
}

/// Modifier source that leaves every combatant unaffected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Unmodified;

impl CombatModifiers for Unmodified {
    fn speed_multiplier(&self, _combatant: CombatantId) -> f32 {
        1.0
    }

    fn damage_multiplier(&self, _combatant: CombatantId) -> f32 {
        1.0
    }
}

/// Sums the simulated time reported by `TimeAdvanced` events.
#[must_use]
pub fn elapsed(events: &[Event]) -> Duration {
    events.iter().fold(Duration::ZERO, |total, event| match event {
        Event::TimeAdvanced { dt } => total.saturating_add(*dt),
        _ => total,
    })
}
