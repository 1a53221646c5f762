//! Tower and throne placement performed once at world initialization.

use glam::Vec2;
use lanewar_core::{CombatantKind, Faction};

use crate::lanes::LaneTopology;

const TOWER_PROJECTILE_DAMAGE: f32 = 18.0;

/// Fixed statistics of a structure kind. Reload is not among them: the tower
/// fire system supplies it with every shot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct StructureProfile {
    pub(crate) max_hp: f32,
    pub(crate) armor: f32,
    pub(crate) attack_range: f32,
    pub(crate) attack_damage: f32,
}

/// Reports the statistics associated with a structure kind.
pub(crate) fn profile_for(kind: CombatantKind) -> StructureProfile {
    match kind {
        CombatantKind::Throne => StructureProfile {
            max_hp: 2_000.0,
            armor: 8.0,
            attack_range: 0.0,
            attack_damage: 0.0,
        },
        _ => StructureProfile {
            max_hp: 400.0,
            armor: 5.0,
            attack_range: 7.0,
            attack_damage: TOWER_PROJECTILE_DAMAGE,
        },
    }
}

/// Structure requested by the topology before identifiers are allocated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct StructureSeed {
    pub(crate) kind: CombatantKind,
    pub(crate) faction: Faction,
    pub(crate) position: Vec2,
}

/// Lists every tower and throne the topology supports, in a stable order:
/// thrones first, then towers lane by lane.
pub(crate) fn structure_seeds(topology: &LaneTopology) -> Vec<StructureSeed> {
    let mut seeds = Vec::new();
    for faction in Faction::ALL {
        if let Some(position) = topology.throne_site(faction) {
            seeds.push(StructureSeed {
                kind: CombatantKind::Throne,
                faction,
                position,
            });
        }
    }
    for faction in Faction::ALL {
        seeds.extend(
            topology
                .tower_sites(faction)
                .into_iter()
                .map(|(_, position)| StructureSeed {
                    kind: CombatantKind::Tower,
                    faction,
                    position,
                }),
        );
    }
    seeds
}
