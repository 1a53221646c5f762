//! Homing projectiles fired by towers and abilities.

use std::time::Duration;

use glam::Vec2;
use lanewar_core::{CombatantId, ProjectileId, ProjectileSnapshot};

/// Outcome of advancing a projectile for one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Flight {
    InFlight,
    Arrived,
}

#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    pub(crate) id: ProjectileId,
    pub(crate) owner: CombatantId,
    pub(crate) target: CombatantId,
    pub(crate) position: Vec2,
    pub(crate) speed: f32,
    pub(crate) damage: f32,
}

impl Projectile {
    /// Moves toward the target's current position, arriving once the
    /// remaining gap fits within this tick's step.
    pub(crate) fn advance(&mut self, target_position: Vec2, dt: Duration) -> Flight {
        let step = self.speed.max(0.0) * dt.as_secs_f32();
        let offset = target_position - self.position;
        let gap = offset.length();
        if gap <= step {
            self.position = target_position;
            return Flight::Arrived;
        }
        self.position += offset / gap * step;
        Flight::InFlight
    }

    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            owner: self.owner,
            target: self.target,
            position: self.position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projectile(position: Vec2) -> Projectile {
        Projectile {
            id: ProjectileId::new(0),
            owner: CombatantId::new(1),
            target: CombatantId::new(2),
            position,
            speed: 10.0,
            damage: 5.0,
        }
    }

    #[test]
    fn travels_toward_moving_target() {
        let mut shot = projectile(Vec2::ZERO);
        let flight = shot.advance(Vec2::new(20.0, 0.0), Duration::from_millis(500));
        assert_eq!(flight, Flight::InFlight);
        assert!(shot.position.abs_diff_eq(Vec2::new(5.0, 0.0), 1e-4));

        let flight = shot.advance(Vec2::new(5.0, 10.0), Duration::from_millis(500));
        assert_eq!(flight, Flight::InFlight);
        assert!(shot.position.abs_diff_eq(Vec2::new(5.0, 5.0), 1e-4));
    }

    #[test]
    fn arrives_only_when_step_covers_the_gap() {
        let mut shot = projectile(Vec2::ZERO);
        let flight = shot.advance(Vec2::new(5.4, 0.0), Duration::from_millis(500));
        assert_eq!(flight, Flight::InFlight);
        assert!(shot.position.abs_diff_eq(Vec2::new(5.0, 0.0), 1e-4));

        let mut shot = projectile(Vec2::ZERO);
        let flight = shot.advance(Vec2::new(5.0, 0.0), Duration::from_millis(500));
        assert_eq!(flight, Flight::Arrived);
        assert_eq!(shot.position, Vec2::new(5.0, 0.0));
    }
}
