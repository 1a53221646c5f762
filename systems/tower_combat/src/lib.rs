#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that emits projectile firing commands from targeting data.

use std::time::Duration;

use lanewar_core::{CombatModifiers, CombatView, Command, TowerTarget};

/// Tunables shared by every tower.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerCombatConfig {
    /// Travel speed of tower projectiles in world units per second.
    pub projectile_speed: f32,
    /// Delay between consecutive shots of a single tower.
    pub reload: Duration,
}

impl Default for TowerCombatConfig {
    fn default() -> Self {
        Self {
            projectile_speed: 24.0,
            reload: Duration::from_millis(1_200),
        }
    }
}

/// Tower combat system that queues firing commands for ready towers.
#[derive(Debug, Default)]
pub struct TowerCombat {
    config: TowerCombatConfig,
    scratch: Vec<Command>,
}

impl TowerCombat {
    /// Creates a new tower combat system with empty scratch buffers.
    #[must_use]
    pub fn new(config: TowerCombatConfig) -> Self {
        Self {
            config,
            scratch: Vec::new(),
        }
    }

    /// Emits `Command::FireProjectile` entries for towers ready to fire.
    ///
    /// Targets whose tower or victim vanished from `view` are skipped.
    pub fn handle<M>(
        &mut self,
        view: &CombatView,
        tower_targets: &[TowerTarget],
        modifiers: &M,
        out: &mut Vec<Command>,
    ) where
        M: CombatModifiers + ?Sized,
    {
        if tower_targets.is_empty() {
            return;
        }

        self.scratch.clear();

        for assignment in tower_targets {
            let Some(tower) = view.get(assignment.tower) else {
                continue;
            };
            if !tower.attack_ready || view.get(assignment.target).is_none() {
                continue;
            }
            self.scratch.push(Command::FireProjectile {
                shooter: tower.id,
                target: assignment.target,
                damage: tower.attack_damage * modifiers.damage_multiplier(tower.id),
                speed: self.config.projectile_speed,
                reload: Some(self.config.reload),
            });
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}
