#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave director that emits creep and boss spawn commands on a fixed cadence.

use std::time::Duration;

use lanewar_core::{elapsed, BossKind, Command, CombatantId, CreepStats, Event, Faction};
use lanewar_world::LaneTopology;

const DEFAULT_WAVE_INTERVAL: Duration = Duration::from_millis(25_000);
const DEFAULT_CREEPS_PER_FACTION: u32 = 3;
const DEFAULT_STEP_PCT: f32 = 0.08;
const DEFAULT_BOSS_EVERY: u32 = 5;
const BOSS_ARMOR: f32 = 10.0;

/// Tunables of the wave director.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveConfig {
    /// Time between consecutive waves.
    pub wave_interval: Duration,
    /// Creeps spawned per faction on every usable lane.
    pub creeps_per_faction: u32,
    /// Fractional hp and damage increase per wave number.
    pub step_pct: f32,
    /// A boss accompanies every wave whose number is a multiple of this.
    pub boss_every: u32,
    /// Statistics of a wave-zero creep before scaling.
    pub creep: CreepStats,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            wave_interval: DEFAULT_WAVE_INTERVAL,
            creeps_per_faction: DEFAULT_CREEPS_PER_FACTION,
            step_pct: DEFAULT_STEP_PCT,
            boss_every: DEFAULT_BOSS_EVERY,
            creep: CreepStats {
                max_hp: 60.0,
                armor: 0.0,
                speed: 3.0,
                damage: 8.0,
                attack_range: 1.5,
                attack_interval: Duration::from_millis(1_000),
            },
        }
    }
}

impl WaveConfig {
    /// Statistics of a creep spawned in the provided wave.
    #[must_use]
    pub fn creep_for_wave(&self, wave: u32) -> CreepStats {
        self.creep.scaled(1.0 + wave as f32 * self.step_pct)
    }

    /// Boss profile scheduled for the wave, if any.
    ///
    /// Bosses alternate on the parity of `wave / boss_every`: odd quotients
    /// bring the Void Colossus, even ones the Star Devourer.
    #[must_use]
    pub fn boss_for_wave(&self, wave: u32) -> Option<BossKind> {
        if self.boss_every == 0 || wave == 0 || wave % self.boss_every != 0 {
            return None;
        }
        if (wave / self.boss_every) % 2 == 1 {
            Some(BossKind::VoidColossus)
        } else {
            Some(BossKind::StarDevourer)
        }
    }
}

/// Fixed statistics of a boss profile.
#[must_use]
pub fn boss_stats(boss: BossKind) -> CreepStats {
    let (max_hp, speed, damage) = match boss {
        BossKind::VoidColossus => (900.0, 2.2, 40.0),
        BossKind::StarDevourer => (650.0, 3.4, 55.0),
    };
    CreepStats {
        max_hp,
        armor: BOSS_ARMOR,
        speed,
        damage,
        attack_range: 2.0,
        attack_interval: Duration::from_millis(1_500),
    }
}

/// Boss bookkeeping; at most one boss is alive at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BossSlot {
    Vacant,
    Requested,
    Active(CombatantId),
}

/// Pure system that paces waves and requests spawns.
#[derive(Debug)]
pub struct WaveDirector {
    config: WaveConfig,
    now: Duration,
    last_wave_at: Duration,
    wave_number: u32,
    boss: BossSlot,
}

impl WaveDirector {
    /// Creates a director whose first wave fires once the first interval elapses.
    #[must_use]
    pub fn new(config: WaveConfig) -> Self {
        Self {
            config,
            now: Duration::ZERO,
            last_wave_at: Duration::ZERO,
            wave_number: 0,
            boss: BossSlot::Vacant,
        }
    }

    /// Number of the most recently started wave; zero before the first.
    #[must_use]
    pub fn wave_number(&self) -> u32 {
        self.wave_number
    }

    /// Reports whether a boss is alive or awaiting its spawn.
    #[must_use]
    pub fn boss_active(&self) -> bool {
        self.boss != BossSlot::Vacant
    }

    /// Consumes world events and emits spawn commands when a wave is due.
    ///
    /// `WaveStarted` is reported through `out_events` because no world
    /// command corresponds to it.
    pub fn handle(
        &mut self,
        events: &[Event],
        lanes: &LaneTopology,
        out: &mut Vec<Command>,
        out_events: &mut Vec<Event>,
    ) {
        self.observe(events);

        let dt = elapsed(events);
        if dt.is_zero() {
            return;
        }
        self.now = self.now.saturating_add(dt);
        if self.now.saturating_sub(self.last_wave_at) < self.config.wave_interval {
            return;
        }

        self.wave_number = self.wave_number.saturating_add(1);
        self.last_wave_at = self.now;
        let wave = self.wave_number;
        log::info!("wave {wave} started");
        out_events.push(Event::WaveStarted { wave });

        let stats = self.config.creep_for_wave(wave);
        for lane in lanes.lane_ids() {
            if !lanes.is_usable(lane) {
                log::debug!("lane {} has too few waypoints; no creeps this wave", lane.get());
                continue;
            }
            for faction in Faction::ALL {
                for _ in 0..self.config.creeps_per_faction {
                    out.push(Command::SpawnCreep {
                        lane,
                        faction,
                        stats,
                        boss: None,
                    });
                }
            }
        }

        if let Some(boss) = self.config.boss_for_wave(wave) {
            self.request_boss(boss, lanes, out);
        }
    }

    fn request_boss(&mut self, boss: BossKind, lanes: &LaneTopology, out: &mut Vec<Command>) {
        if self.boss_active() {
            log::debug!("{} withheld while another boss is alive", boss.name());
            return;
        }
        let Some(lane) = lanes.first_usable() else {
            return;
        };
        self.boss = BossSlot::Requested;
        out.push(Command::SpawnCreep {
            lane,
            faction: Faction::Horde,
            stats: boss_stats(boss),
            boss: Some(boss),
        });
    }

    fn observe(&mut self, events: &[Event]) {
        for event in events {
            match *event {
                Event::BossSpawned { combatant, .. } => self.boss = BossSlot::Active(combatant),
                Event::CombatantDied {
                    combatant,
                    is_boss: true,
                    ..
                } => {
                    if self.boss == BossSlot::Active(combatant) {
                        self.boss = BossSlot::Vacant;
                    }
                }
                _ => {}
            }
        }
    }
}

impl Default for WaveDirector {
    fn default() -> Self {
        Self::new(WaveConfig::default())
    }
}
