#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Player ability slots and basic attacks.
//!
//! [`AbilityController`] owns the five fixed ability slots and their
//! cooldowns. Every activation is validated before anything is emitted, so a
//! rejected request leaves both the controller and the world untouched.
//! [`PlayerCombat`] resolves the player's basic attack, its combo chain and
//! the loot rolled from player kills.

mod player;

use std::time::Duration;

use glam::Vec2;
use lanewar_core::{
    ArenaBounds, Buff, CombatView, Command, CombatantId, CombatantSnapshot, DamageSource, Element,
    Event, ResourcePool, StatusTag,
};
use thiserror::Error;

pub use player::{PlayerCombat, PlayerCombatConfig};

/// Number of ability slots on the player's bar.
pub const SLOT_COUNT: usize = 5;

/// Travel speed of the seeker bolt in world units per second.
const BOLT_SPEED: f32 = 30.0;

/// Reasons an ability activation was refused.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum AbilityError {
    /// The requested slot does not exist.
    #[error("no ability in slot {0}")]
    UnknownSlot(usize),
    /// The caster is dead or missing.
    #[error("caster {0:?} cannot act")]
    CasterDown(CombatantId),
    /// The slot is still recharging.
    #[error("{ability} is on cooldown for another {remaining:?}")]
    OnCooldown {
        /// Name of the ability.
        ability: &'static str,
        /// Time left before the slot is ready.
        remaining: Duration,
    },
    /// The caster cannot pay the cost.
    #[error("{ability} needs {required} {pool:?}, only {available} available")]
    InsufficientResource {
        /// Name of the ability.
        ability: &'static str,
        /// Pool the cost is drawn from.
        pool: ResourcePool,
        /// Cost of the ability.
        required: f32,
        /// Amount currently in the pool.
        available: f32,
    },
    /// A targeted ability found nothing to aim at.
    #[error("{ability} has no target in range")]
    NoTarget {
        /// Name of the ability.
        ability: &'static str,
    },
}

/// Resource cost of an ability.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AbilityCost {
    /// Free to use.
    Free,
    /// Drawn from a hero resource pool.
    Pool(ResourcePool, f32),
}

/// Behaviour executed when an ability fires.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Archetype {
    /// Damage to every enemy around the caster.
    MeleeArea {
        /// Radius around the caster.
        radius: f32,
        /// Raw damage per enemy.
        damage: f32,
    },
    /// Homing projectile at the nearest enemy.
    GuidedProjectile {
        /// Search radius for the target.
        range: f32,
        /// Damage applied on arrival.
        damage: f32,
    },
    /// Timed damage reduction on the caster.
    Shield {
        /// Fraction of incoming damage prevented.
        reduction: f32,
        /// Lifetime of the shield.
        duration: Duration,
    },
    /// Instant relocation along the caster's facing.
    Dash {
        /// Distance travelled.
        distance: f32,
    },
    /// Damage to every enemy in a wide radius.
    Burst {
        /// Radius around the caster.
        radius: f32,
        /// Raw damage per enemy.
        damage: f32,
    },
}

/// Static description of an ability slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AbilityDefinition {
    /// Display name announced on use.
    pub name: &'static str,
    /// Recharge time after a successful use.
    pub cooldown: Duration,
    /// Resource cost.
    pub cost: AbilityCost,
    /// Behaviour on activation.
    pub archetype: Archetype,
}

/// The player's fixed ability bar.
pub const ABILITIES: [AbilityDefinition; SLOT_COUNT] = [
    AbilityDefinition {
        name: "Cleave",
        cooldown: Duration::from_millis(3_000),
        cost: AbilityCost::Free,
        archetype: Archetype::MeleeArea {
            radius: 3.0,
            damage: 25.0,
        },
    },
    AbilityDefinition {
        name: "Seeker Bolt",
        cooldown: Duration::from_millis(5_000),
        cost: AbilityCost::Pool(ResourcePool::Mana, 20.0),
        archetype: Archetype::GuidedProjectile {
            range: 18.0,
            damage: 40.0,
        },
    },
    AbilityDefinition {
        name: "Aegis",
        cooldown: Duration::from_millis(12_000),
        cost: AbilityCost::Pool(ResourcePool::Mana, 30.0),
        archetype: Archetype::Shield {
            reduction: 0.5,
            duration: Duration::from_millis(4_000),
        },
    },
    AbilityDefinition {
        name: "Blink",
        cooldown: Duration::from_millis(8_000),
        cost: AbilityCost::Pool(ResourcePool::Energy, 25.0),
        archetype: Archetype::Dash { distance: 8.0 },
    },
    AbilityDefinition {
        name: "Nova",
        cooldown: Duration::from_millis(15_000),
        cost: AbilityCost::Pool(ResourcePool::Mana, 50.0),
        archetype: Archetype::Burst {
            radius: 7.0,
            damage: 35.0,
        },
    },
];

/// Everything an activation needs to know about the caster's surroundings.
#[derive(Clone, Copy, Debug)]
pub struct CastContext<'a> {
    /// Hero using the ability.
    pub caster: CombatantId,
    /// Living combatants this tick.
    pub view: &'a CombatView,
    /// Arena rectangle dashes are clamped to.
    pub bounds: ArenaBounds,
    /// Direction the caster aims; zero falls back to the caster's facing.
    pub facing: Vec2,
    /// Element tagged onto enemies hit by area abilities.
    pub affinity: Option<Element>,
}

/// Cooldown-gated, resource-gated ability bar of the player hero.
#[derive(Debug, Default)]
pub struct AbilityController {
    cooldowns: [Duration; SLOT_COUNT],
}

impl AbilityController {
    /// Creates a controller with every slot ready.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts every cooldown down by the frame delta.
    pub fn tick(&mut self, dt: Duration) {
        for remaining in &mut self.cooldowns {
            *remaining = remaining.saturating_sub(dt);
        }
    }

    /// Time left before `slot` can be used again.
    #[must_use]
    pub fn cooldown_remaining(&self, slot: usize) -> Option<Duration> {
        self.cooldowns.get(slot).copied()
    }

    /// Validates and executes the ability in `slot`.
    ///
    /// On success the cost is queued as `Command::SpendResource`, the
    /// cooldown restarts, and the archetype's commands and status tags are
    /// appended to `out` and `tags`. On failure nothing is emitted.
    pub fn use_ability(
        &mut self,
        slot: usize,
        context: &CastContext<'_>,
        out: &mut Vec<Command>,
        tags: &mut Vec<StatusTag>,
        out_events: &mut Vec<Event>,
    ) -> Result<(), AbilityError> {
        let result = self.activate(slot, context, out, tags, out_events);
        if let Err(error) = &result {
            log::debug!("ability rejected: {error}");
        }
        result
    }

    fn activate(
        &mut self,
        slot: usize,
        context: &CastContext<'_>,
        out: &mut Vec<Command>,
        tags: &mut Vec<StatusTag>,
        out_events: &mut Vec<Event>,
    ) -> Result<(), AbilityError> {
        let definition = ABILITIES
            .get(slot)
            .ok_or(AbilityError::UnknownSlot(slot))?;
        let caster = context
            .view
            .get(context.caster)
            .filter(|caster| caster.hero.is_some())
            .ok_or(AbilityError::CasterDown(context.caster))?;

        let remaining = self.cooldowns[slot];
        if !remaining.is_zero() {
            return Err(AbilityError::OnCooldown {
                ability: definition.name,
                remaining,
            });
        }
        if let AbilityCost::Pool(pool, required) = definition.cost {
            let available = caster
                .hero
                .as_ref()
                .map_or(0.0, |hero| hero.available(pool));
            if available < required {
                return Err(AbilityError::InsufficientResource {
                    ability: definition.name,
                    pool,
                    required,
                    available,
                });
            }
        }

        let mut effects = Vec::new();
        match definition.archetype {
            Archetype::MeleeArea { radius, damage } | Archetype::Burst { radius, damage } => {
                for enemy in context
                    .view
                    .within(caster.position, radius, |other| other.faction != caster.faction)
                {
                    effects.push(Command::DealDamage {
                        target: enemy.id,
                        amount: damage,
                        source: DamageSource::Ability(caster.id),
                    });
                    if let Some(element) = context.affinity {
                        tags.push(StatusTag {
                            combatant: enemy.id,
                            element,
                        });
                    }
                }
            }
            Archetype::GuidedProjectile { range, damage } => {
                let target = context
                    .view
                    .nearest(caster.position, range, |other| other.faction != caster.faction)
                    .ok_or(AbilityError::NoTarget {
                        ability: definition.name,
                    })?;
                effects.push(Command::FireProjectile {
                    shooter: caster.id,
                    target: target.id,
                    damage,
                    speed: BOLT_SPEED,
                    reload: None,
                });
            }
            Archetype::Shield {
                reduction,
                duration,
            } => effects.push(Command::ApplyBuff {
                target: caster.id,
                buff: Buff::shield(reduction),
                duration,
            }),
            Archetype::Dash { distance } => effects.push(Command::Teleport {
                combatant: caster.id,
                destination: dash_destination(caster, context, distance),
            }),
        }

        if let AbilityCost::Pool(pool, amount) = definition.cost {
            out.push(Command::SpendResource {
                hero: caster.id,
                pool,
                amount,
            });
        }
        out.append(&mut effects);
        self.cooldowns[slot] = definition.cooldown;
        log::debug!("{} used {}", caster.id.get(), definition.name);
        out_events.push(Event::AbilityUsed {
            caster: caster.id,
            ability: definition.name,
        });
        Ok(())
    }
}

fn dash_destination(caster: &CombatantSnapshot, context: &CastContext<'_>, distance: f32) -> Vec2 {
    let heading = context
        .facing
        .try_normalize()
        .unwrap_or(caster.facing);
    context.bounds.clamp(caster.position + heading * distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lanewar_core::{CombatantKind, Faction, HeroSnapshot};

    fn hero(mana: f32, energy: f32) -> CombatantSnapshot {
        CombatantSnapshot {
            id: CombatantId::new(1),
            kind: CombatantKind::Hero,
            faction: Faction::Explorer,
            position: Vec2::ZERO,
            facing: Vec2::Y,
            hp: 520.0,
            max_hp: 520.0,
            armor: 4.0,
            speed: 5.0,
            attack_damage: 28.0,
            attack_range: 2.5,
            attack_ready: true,
            is_boss: false,
            lane: None,
            hero: Some(HeroSnapshot {
                level: 1,
                xp: 0,
                mana,
                max_mana: 150.0,
                energy,
                max_energy: 100.0,
                kills: 0,
                deaths: 0,
                spawn_point: Vec2::ZERO,
                buffs: Vec::new(),
            }),
        }
    }

    fn enemy(id: u32, x: f32) -> CombatantSnapshot {
        CombatantSnapshot {
            id: CombatantId::new(id),
            kind: CombatantKind::Creep,
            faction: Faction::Horde,
            position: Vec2::new(x, 0.0),
            hero: None,
            ..hero(0.0, 0.0)
        }
    }

    fn context(view: &CombatView) -> CastContext<'_> {
        CastContext {
            caster: CombatantId::new(1),
            view,
            bounds: ArenaBounds::centered(100.0, 100.0),
            facing: Vec2::X,
            affinity: Some(Element::Fire),
        }
    }

    #[test]
    fn cleave_hits_and_tags_enemies_in_reach() {
        let view = CombatView::from_snapshots(vec![hero(0.0, 0.0), enemy(2, 2.0), enemy(3, 4.0)]);
        let mut controller = AbilityController::new();
        let (mut out, mut tags, mut events) = (Vec::new(), Vec::new(), Vec::new());

        controller
            .use_ability(0, &context(&view), &mut out, &mut tags, &mut events)
            .expect("cleave is free");

        assert_eq!(
            out,
            vec![Command::DealDamage {
                target: CombatantId::new(2),
                amount: 25.0,
                source: DamageSource::Ability(CombatantId::new(1)),
            }]
        );
        assert_eq!(
            tags,
            vec![StatusTag {
                combatant: CombatantId::new(2),
                element: Element::Fire,
            }]
        );
        assert_eq!(controller.cooldown_remaining(0), Some(Duration::from_millis(3_000)));
    }

    #[test]
    fn unaffordable_ability_is_rejected_without_side_effects() {
        let view = CombatView::from_snapshots(vec![hero(10.0, 100.0), enemy(2, 5.0)]);
        let mut controller = AbilityController::new();
        let (mut out, mut tags, mut events) = (Vec::new(), Vec::new(), Vec::new());

        let error = controller
            .use_ability(4, &context(&view), &mut out, &mut tags, &mut events)
            .expect_err("nova costs 50 mana");

        assert_eq!(
            error,
            AbilityError::InsufficientResource {
                ability: "Nova",
                pool: ResourcePool::Mana,
                required: 50.0,
                available: 10.0,
            }
        );
        assert!(out.is_empty() && tags.is_empty() && events.is_empty());
        assert_eq!(controller.cooldown_remaining(4), Some(Duration::ZERO));
    }

    #[test]
    fn bolt_without_target_is_refused() {
        let view = CombatView::from_snapshots(vec![hero(150.0, 100.0), enemy(2, 40.0)]);
        let mut controller = AbilityController::new();
        let (mut out, mut tags, mut events) = (Vec::new(), Vec::new(), Vec::new());

        let result = controller.use_ability(1, &context(&view), &mut out, &mut tags, &mut events);

        assert_eq!(
            result,
            Err(AbilityError::NoTarget {
                ability: "Seeker Bolt"
            })
        );
        assert!(out.is_empty());
    }

    #[test]
    fn blink_follows_facing_and_stays_in_the_arena() {
        let mut caster = hero(0.0, 100.0);
        caster.position = Vec2::new(46.0, 0.0);
        let view = CombatView::from_snapshots(vec![caster]);
        let mut controller = AbilityController::new();
        let (mut out, mut tags, mut events) = (Vec::new(), Vec::new(), Vec::new());

        controller
            .use_ability(3, &context(&view), &mut out, &mut tags, &mut events)
            .expect("energy available");

        assert_eq!(
            out,
            vec![
                Command::SpendResource {
                    hero: CombatantId::new(1),
                    pool: ResourcePool::Energy,
                    amount: 25.0,
                },
                Command::Teleport {
                    combatant: CombatantId::new(1),
                    destination: Vec2::new(50.0, 0.0),
                },
            ]
        );
        assert_eq!(
            events,
            vec![Event::AbilityUsed {
                caster: CombatantId::new(1),
                ability: "Blink",
            }]
        );
    }

    #[test]
    fn unknown_slots_and_fallen_casters_are_rejected() {
        let view = CombatView::from_snapshots(vec![enemy(2, 1.0)]);
        let mut controller = AbilityController::new();
        let (mut out, mut tags, mut events) = (Vec::new(), Vec::new(), Vec::new());

        assert_eq!(
            controller.use_ability(9, &context(&view), &mut out, &mut tags, &mut events),
            Err(AbilityError::UnknownSlot(9))
        );
        assert_eq!(
            controller.use_ability(0, &context(&view), &mut out, &mut tags, &mut events),
            Err(AbilityError::CasterDown(CombatantId::new(1)))
        );
    }
}
