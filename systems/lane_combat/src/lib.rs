#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that resolves creep clashes, lane advancement and sieges.

use lanewar_core::{
    elapsed, CombatModifiers, CombatView, CombatantId, CombatantKind, CombatantSnapshot, Command,
    Event, Faction,
};

/// What a creep decided to do this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Intent {
    Strike(CombatantId),
    Advance(f32),
    Hold,
}

/// Lane combat system that emits strike and advance commands for creeps.
#[derive(Debug, Default)]
pub struct LaneCombat {
    scratch: Vec<Command>,
}

impl LaneCombat {
    /// Creates a new lane combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves every living creep in identifier order.
    ///
    /// A creep fights the nearest opposing creep within its clash range, then
    /// the nearest opposing tower. Failing both it walks its lane, scaled by
    /// `modifiers`, until it reaches the terminal waypoint and begins striking
    /// the enemy throne reported by `throne_of`.
    pub fn handle<M, F>(
        &mut self,
        events: &[Event],
        view: &CombatView,
        modifiers: &M,
        throne_of: F,
        out: &mut Vec<Command>,
    ) where
        M: CombatModifiers + ?Sized,
        F: Fn(Faction) -> Option<CombatantId>,
    {
        let dt = elapsed(events);
        if dt.is_zero() {
            return;
        }
        let seconds = dt.as_secs_f32();

        self.scratch.clear();
        for creep in view.iter().filter(|c| c.kind == CombatantKind::Creep) {
            match resolve_intent(creep, view, modifiers, &throne_of, seconds) {
                Intent::Strike(target) => {
                    if creep.attack_ready {
                        self.scratch.push(Command::Strike {
                            attacker: creep.id,
                            target,
                            damage: creep.attack_damage * modifiers.damage_multiplier(creep.id),
                        });
                    }
                }
                Intent::Advance(distance) => self.scratch.push(Command::AdvanceAlongLane {
                    combatant: creep.id,
                    distance,
                }),
                Intent::Hold => {}
            }
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

fn resolve_intent<M, F>(
    creep: &CombatantSnapshot,
    view: &CombatView,
    modifiers: &M,
    throne_of: &F,
    seconds: f32,
) -> Intent
where
    M: CombatModifiers + ?Sized,
    F: Fn(Faction) -> Option<CombatantId>,
{
    let reach = creep.attack_range;
    if let Some(foe) = view.nearest(creep.position, reach, opposing(creep, CombatantKind::Creep)) {
        return Intent::Strike(foe.id);
    }
    if let Some(tower) = view.nearest(creep.position, reach, opposing(creep, CombatantKind::Tower)) {
        return Intent::Strike(tower.id);
    }

    let sieging = creep.lane.is_some_and(|progress| progress.sieging);
    if sieging {
        return throne_of(creep.faction.opponent())
            .filter(|throne| view.get(*throne).is_some())
            .map_or(Intent::Hold, Intent::Strike);
    }

    let distance = creep.speed * modifiers.speed_multiplier(creep.id) * seconds;
    if distance > 0.0 {
        Intent::Advance(distance)
    } else {
        Intent::Hold
    }
}

fn opposing(
    creep: &CombatantSnapshot,
    kind: CombatantKind,
) -> impl Fn(&CombatantSnapshot) -> bool + '_ {
    move |other: &CombatantSnapshot| other.kind == kind && other.faction != creep.faction
}
