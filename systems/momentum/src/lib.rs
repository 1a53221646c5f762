#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Momentum tracker summarising which faction holds the advantage.
//!
//! The score is purely informational. Kills and siege hits push it toward
//! the side that benefited; otherwise it drifts back to the neutral midpoint.

use lanewar_core::{elapsed, CombatantKind, Event, Faction};

/// Lower bound of the momentum scale.
pub const MIN_MOMENTUM: f32 = 0.0;
/// Upper bound of the momentum scale.
pub const MAX_MOMENTUM: f32 = 100.0;
/// Neutral value the score starts at and decays toward.
pub const NEUTRAL_MOMENTUM: f32 = 50.0;

/// Smallest change since the last emission that is announced.
const EMIT_THRESHOLD: f32 = 0.01;

/// Shift sizes and decay rate of the tracker.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MomentumConfig {
    /// Shift for a creep death.
    pub creep_kill: f32,
    /// Shift for a boss death.
    pub boss_kill: f32,
    /// Shift for a hero death.
    pub hero_kill: f32,
    /// Shift for a destroyed tower.
    pub tower_destroyed: f32,
    /// Shift against the owner of a throne that took a hit.
    pub siege_hit: f32,
    /// Points per second the score returns toward neutral.
    pub decay_per_second: f32,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            creep_kill: 2.0,
            boss_kill: 12.0,
            hero_kill: 6.0,
            tower_destroyed: 5.0,
            siege_hit: 0.5,
            decay_per_second: 1.5,
        }
    }
}

/// Tracks the momentum scalar and announces meaningful changes.
#[derive(Debug)]
pub struct MomentumTracker {
    config: MomentumConfig,
    value: f32,
    last_emitted: f32,
}

impl MomentumTracker {
    /// Creates a tracker resting at the neutral value.
    #[must_use]
    pub fn new(config: MomentumConfig) -> Self {
        Self {
            config,
            value: NEUTRAL_MOMENTUM,
            last_emitted: NEUTRAL_MOMENTUM,
        }
    }

    /// Current momentum in `[0, 100]`; above 50 favours the explorers.
    #[must_use]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Decays by the tick's elapsed time, then applies every kill and siege
    /// hit reported in `events`.
    ///
    /// Emits `Event::MomentumChanged` once the score has moved at least
    /// 0.01 away from the previously announced value.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Event>) {
        self.decay(elapsed(events).as_secs_f32());

        for event in events {
            match event {
                Event::CombatantDied {
                    kind,
                    faction,
                    is_boss,
                    ..
                } => {
                    let magnitude = match (kind, is_boss) {
                        (CombatantKind::Creep, true) => self.config.boss_kill,
                        (CombatantKind::Creep, false) => self.config.creep_kill,
                        (CombatantKind::Hero, _) => self.config.hero_kill,
                        (CombatantKind::Tower, _) => self.config.tower_destroyed,
                        (CombatantKind::Throne, _) => 0.0,
                    };
                    self.shift(faction.opponent(), magnitude);
                }
                Event::ThroneHpChanged { faction, .. } => {
                    self.shift(faction.opponent(), self.config.siege_hit);
                }
                _ => {}
            }
        }

        if (self.value - self.last_emitted).abs() >= EMIT_THRESHOLD {
            self.last_emitted = self.value;
            log::debug!("momentum now {:.2}", self.value);
            out.push(Event::MomentumChanged { value: self.value });
        }
    }

    fn shift(&mut self, beneficiary: Faction, magnitude: f32) {
        let moved = self.value + beneficiary.momentum_sign() * magnitude;
        self.value = moved.clamp(MIN_MOMENTUM, MAX_MOMENTUM);
    }

    fn decay(&mut self, seconds: f32) {
        let step = self.config.decay_per_second * seconds;
        if step <= 0.0 {
            return;
        }
        let gap = NEUTRAL_MOMENTUM - self.value;
        self.value += gap.clamp(-step, step);
    }
}

impl Default for MomentumTracker {
    fn default() -> Self {
        Self::new(MomentumConfig::default())
    }
}
