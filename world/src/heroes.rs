//! Hero progression, resources, buffs and respawn bookkeeping.

use std::{collections::BTreeMap, time::Duration};

use glam::Vec2;
use lanewar_core::{Buff, BuffKind, CombatantKind, Event, HeroSnapshot, LaneProgress, ResourcePool};

/// Cumulative XP required to reach each level; index 0 is level 1.
pub const LEVEL_THRESHOLDS: [u32; 10] = [0, 100, 250, 450, 700, 1_000, 1_400, 1_900, 2_500, 3_200];

/// Base statistics shared by the player and the enemy hero at level 1.
pub(crate) const HERO_BASE_HP: f32 = 520.0;
pub(crate) const HERO_BASE_MANA: f32 = 150.0;
pub(crate) const HERO_BASE_ENERGY: f32 = 100.0;
pub(crate) const HERO_BASE_DAMAGE: f32 = 28.0;
pub(crate) const HERO_BASE_ARMOR: f32 = 4.0;
pub(crate) const HERO_SPEED: f32 = 5.0;
pub(crate) const HERO_ATTACK_RANGE: f32 = 2.5;
pub(crate) const HERO_ATTACK_INTERVAL: Duration = Duration::from_millis(800);

const HP_PER_LEVEL: f32 = 60.0;
const MANA_PER_LEVEL: f32 = 20.0;
const ENERGY_PER_LEVEL: f32 = 10.0;
const DAMAGE_PER_LEVEL: f32 = 4.0;
const ARMOR_PER_LEVEL: f32 = 1.0;

const MANA_REGEN_PER_SECOND: f32 = 4.0;
const ENERGY_REGEN_PER_SECOND: f32 = 12.0;

/// Distance from the spawn point within which a living hero heals.
const SPAWN_HEAL_RADIUS: f32 = 4.0;
/// Fraction of maximum health restored per second near the spawn point.
const SPAWN_HEAL_PER_SECOND: f32 = 0.08;

const RESPAWN_BASE: Duration = Duration::from_millis(5_000);
const RESPAWN_PER_LEVEL: Duration = Duration::from_millis(2_000);

/// Level reached with `xp` accumulated experience.
#[must_use]
pub fn level_for_xp(xp: u32) -> u32 {
    LEVEL_THRESHOLDS
        .iter()
        .take_while(|threshold| **threshold <= xp)
        .count() as u32
}

/// Delay before a hero of the given level returns after dying.
#[must_use]
pub fn respawn_delay(level: u32) -> Duration {
    RESPAWN_BASE.saturating_add(RESPAWN_PER_LEVEL.saturating_mul(level))
}

/// Experience a hero earns for killing a combatant.
#[must_use]
pub fn xp_reward(kind: CombatantKind, is_boss: bool) -> u32 {
    match kind {
        CombatantKind::Creep if is_boss => 150,
        CombatantKind::Creep => 12,
        CombatantKind::Tower => 60,
        CombatantKind::Hero => 90,
        CombatantKind::Throne => 0,
    }
}

/// Stat increase applied when crossing a level threshold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct LevelGain {
    pub(crate) hp: f32,
    pub(crate) damage: f32,
    pub(crate) armor: f32,
}

#[derive(Clone, Copy, Debug)]
struct ActiveBuff {
    buff: Buff,
    remaining: Duration,
}

/// Hero-only state attached to a combatant.
#[derive(Clone, Debug)]
pub(crate) struct HeroState {
    pub(crate) level: u32,
    pub(crate) xp: u32,
    pub(crate) mana: f32,
    pub(crate) max_mana: f32,
    pub(crate) energy: f32,
    pub(crate) max_energy: f32,
    pub(crate) kills: u32,
    pub(crate) deaths: u32,
    pub(crate) spawn_point: Vec2,
    pub(crate) home_lane: Option<LaneProgress>,
    pub(crate) respawn_in: Option<Duration>,
    buffs: BTreeMap<BuffKind, ActiveBuff>,
}

impl HeroState {
    pub(crate) fn new(spawn_point: Vec2, home_lane: Option<LaneProgress>) -> Self {
        Self {
            level: 1,
            xp: 0,
            mana: HERO_BASE_MANA,
            max_mana: HERO_BASE_MANA,
            energy: HERO_BASE_ENERGY,
            max_energy: HERO_BASE_ENERGY,
            kills: 0,
            deaths: 0,
            spawn_point,
            home_lane,
            respawn_in: None,
            buffs: BTreeMap::new(),
        }
    }

    /// Adds experience and returns the stat gains of every level crossed.
    pub(crate) fn gain_xp(&mut self, amount: u32) -> Vec<LevelGain> {
        self.xp = self.xp.saturating_add(amount);
        let target = level_for_xp(self.xp);
        let mut gains = Vec::new();
        while self.level < target {
            self.level += 1;
            self.max_mana += MANA_PER_LEVEL;
            self.max_energy += ENERGY_PER_LEVEL;
            gains.push(LevelGain {
                hp: HP_PER_LEVEL,
                damage: DAMAGE_PER_LEVEL,
                armor: ARMOR_PER_LEVEL,
            });
        }
        gains
    }

    pub(crate) fn regenerate(&mut self, dt: Duration) {
        let seconds = dt.as_secs_f32();
        self.mana = (self.mana + MANA_REGEN_PER_SECOND * seconds).min(self.max_mana);
        self.energy = (self.energy + ENERGY_REGEN_PER_SECOND * seconds).min(self.max_energy);
    }

    /// Health restored over `dt` to a hero standing at `position`.
    pub(crate) fn spawn_heal(&self, position: Vec2, max_hp: f32, dt: Duration) -> f32 {
        if position.distance(self.spawn_point) > SPAWN_HEAL_RADIUS {
            return 0.0;
        }
        max_hp * SPAWN_HEAL_PER_SECOND * dt.as_secs_f32()
    }

    pub(crate) fn spend(&mut self, pool: ResourcePool, amount: f32) {
        let slot = match pool {
            ResourcePool::Mana => &mut self.mana,
            ResourcePool::Energy => &mut self.energy,
        };
        *slot = (*slot - amount.max(0.0)).max(0.0);
    }

    pub(crate) fn refill(&mut self) {
        self.mana = self.max_mana;
        self.energy = self.max_energy;
    }

    pub(crate) fn apply_buff(&mut self, buff: Buff, duration: Duration) {
        let _ = self.buffs.insert(
            buff.kind,
            ActiveBuff {
                buff,
                remaining: duration,
            },
        );
    }

    pub(crate) fn clear_buffs(&mut self) {
        self.buffs.clear();
    }

    /// Counts buff timers down, reporting every buff that ran out.
    pub(crate) fn tick_buffs(
        &mut self,
        dt: Duration,
        combatant: lanewar_core::CombatantId,
        out_events: &mut Vec<Event>,
    ) {
        let mut expired = Vec::new();
        for (kind, active) in &mut self.buffs {
            active.remaining = active.remaining.saturating_sub(dt);
            if active.remaining.is_zero() {
                expired.push(*kind);
            }
        }
        for kind in expired {
            let _ = self.buffs.remove(&kind);
            out_events.push(Event::BuffExpired { combatant, kind });
        }
    }

    /// Product of `(1 - reduction)` across active buffs.
    pub(crate) fn intake_multiplier(&self) -> f32 {
        self.buffs
            .values()
            .map(|active| (1.0 - active.buff.damage_reduction).clamp(0.0, 1.0))
            .product()
    }

    /// Product of offense multipliers across active buffs.
    pub(crate) fn offense_multiplier(&self) -> f32 {
        self.buffs
            .values()
            .map(|active| active.buff.offense_multiplier)
            .product()
    }

    /// Sum of lifesteal fractions across active buffs.
    pub(crate) fn lifesteal(&self) -> f32 {
        self.buffs.values().map(|active| active.buff.lifesteal).sum()
    }

    pub(crate) fn snapshot(&self) -> HeroSnapshot {
        HeroSnapshot {
            level: self.level,
            xp: self.xp,
            mana: self.mana,
            max_mana: self.max_mana,
            energy: self.energy,
            max_energy: self.max_energy,
            kills: self.kills,
            deaths: self.deaths,
            spawn_point: self.spawn_point,
            buffs: self.buffs.keys().copied().collect(),
        }
    }
}
