#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes deterministic tower targets from combat snapshots.

use glam::Vec2;
use lanewar_core::{CombatView, CombatantId, CombatantKind, Faction, TowerTarget};

/// Tower targeting system that reuses scratch buffers to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    tower_workspace: Vec<TowerWorkspace>,
    candidate_workspace: Vec<Candidate>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes tower targets for the provided combat snapshot.
    ///
    /// The output buffer is cleared before populating it with the latest
    /// assignments. Towers prefer the nearest opposing creep in range and
    /// fall back to the nearest opposing hero; equidistant candidates resolve
    /// to the smaller identifier.
    pub fn handle(&mut self, view: &CombatView, out: &mut Vec<TowerTarget>) {
        out.clear();

        self.prepare_tower_workspace(view);
        if self.tower_workspace.is_empty() {
            return;
        }

        self.prepare_candidate_workspace(view);
        if self.candidate_workspace.is_empty() {
            return;
        }

        for tower in &self.tower_workspace {
            let max_distance = tower.range * tower.range;
            let mut best: Option<BestCandidate> = None;

            for candidate in &self.candidate_workspace {
                if candidate.faction == tower.faction {
                    continue;
                }

                let distance_sq = candidate.position.distance_squared(tower.position);
                if distance_sq > max_distance {
                    continue;
                }

                let current = BestCandidate {
                    priority: candidate.priority,
                    distance_sq,
                    id: candidate.id,
                };

                match &mut best {
                    Some(existing) => {
                        if current.precedes(existing) {
                            *existing = current;
                        }
                    }
                    None => best = Some(current),
                }
            }

            if let Some(best_candidate) = best {
                out.push(TowerTarget {
                    tower: tower.id,
                    target: best_candidate.id,
                });
            }
        }
    }

    fn prepare_tower_workspace(&mut self, view: &CombatView) {
        self.tower_workspace.clear();
        for snapshot in view.iter() {
            if snapshot.kind != CombatantKind::Tower || snapshot.attack_range <= 0.0 {
                continue;
            }
            self.tower_workspace.push(TowerWorkspace {
                id: snapshot.id,
                faction: snapshot.faction,
                position: snapshot.position,
                range: snapshot.attack_range,
            });
        }
    }

    fn prepare_candidate_workspace(&mut self, view: &CombatView) {
        self.candidate_workspace.clear();
        for snapshot in view.iter() {
            let priority = match snapshot.kind {
                CombatantKind::Creep => 0,
                CombatantKind::Hero => 1,
                CombatantKind::Tower | CombatantKind::Throne => continue,
            };
            self.candidate_workspace.push(Candidate {
                id: snapshot.id,
                faction: snapshot.faction,
                position: snapshot.position,
                priority,
            });
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct TowerWorkspace {
    id: CombatantId,
    faction: Faction,
    position: Vec2,
    range: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Candidate {
    id: CombatantId,
    faction: Faction,
    position: Vec2,
    priority: u8,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct BestCandidate {
    priority: u8,
    distance_sq: f32,
    id: CombatantId,
}

impl BestCandidate {
    fn precedes(&self, other: &Self) -> bool {
        if self.priority != other.priority {
            return self.priority < other.priority;
        }

        if self.distance_sq != other.distance_sq {
            return self.distance_sq < other.distance_sq;
        }

        self.id < other.id
    }
}
