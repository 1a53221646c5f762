#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Finite-state decision making for the horde's hero.
//!
//! The hero re-evaluates its state every tick in strict priority order:
//! retreating, fighting the player, farming creeps, pushing its lane. The
//! chosen state drives movement and basic attacks, while four signature
//! abilities fire independently whenever their own preconditions hold.

use std::time::Duration;

use glam::Vec2;
use lanewar_core::{
    elapsed, Buff, CombatModifiers, CombatView, CombatantId, CombatantKind, CombatantSnapshot,
    Command, DamageSource, Event, Faction, HeroAiState, ResourcePool,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Thresholds steering the hero's decisions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeroAiConfig {
    /// Health ratio below which the hero falls back to its spawn.
    pub retreat_threshold: f32,
    /// Health ratio a retreating hero waits for before re-engaging.
    pub recover_threshold: f32,
    /// Health ratio above which the hero is willing to engage the player.
    pub min_fight_ratio: f32,
    /// Distance at which the player draws the hero's attention.
    pub aggro_radius: f32,
    /// Distance within which creeps are worth farming.
    pub farm_range: f32,
    /// Per-tick chance of starting to farm.
    pub farm_chance: f64,
    /// Health ratio under which targets take bonus damage.
    pub execute_threshold: f32,
    /// Damage factor against targets under the execute threshold.
    pub execute_multiplier: f32,
}

impl Default for HeroAiConfig {
    fn default() -> Self {
        Self {
            retreat_threshold: 0.25,
            recover_threshold: 0.9,
            min_fight_ratio: 0.4,
            aggro_radius: 12.0,
            farm_range: 15.0,
            farm_chance: 0.02,
            execute_threshold: 0.3,
            execute_multiplier: 1.5,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Signature {
    Leap,
    Roar,
    Bulwark,
    Frenzy,
}

impl Signature {
    const ALL: [Signature; 4] = [
        Signature::Leap,
        Signature::Roar,
        Signature::Bulwark,
        Signature::Frenzy,
    ];

    const fn name(self) -> &'static str {
        match self {
            Self::Leap => "Leap",
            Self::Roar => "Roar",
            Self::Bulwark => "Bulwark",
            Self::Frenzy => "Frenzy",
        }
    }

    const fn cooldown(self) -> Duration {
        match self {
            Self::Leap => Duration::from_millis(10_000),
            Self::Roar => Duration::from_millis(12_000),
            Self::Bulwark => Duration::from_millis(20_000),
            Self::Frenzy => Duration::from_millis(25_000),
        }
    }

    const fn mana(self) -> f32 {
        match self {
            Self::Leap => 30.0,
            Self::Roar => 40.0,
            Self::Bulwark => 25.0,
            Self::Frenzy => 35.0,
        }
    }

    const fn slot(self) -> usize {
        self as usize
    }
}

const LEAP_MIN_DISTANCE: f32 = 5.0;
const LEAP_MAX_DISTANCE: f32 = 12.0;
const LEAP_LANDING_GAP: f32 = 1.0;
const LEAP_DAMAGE: f32 = 20.0;
const ROAR_TRIGGER_DISTANCE: f32 = 3.0;
const ROAR_RADIUS: f32 = 4.0;
const ROAR_DAMAGE: f32 = 30.0;
const BULWARK_BELOW: f32 = 0.35;
const BULWARK_REDUCTION: f32 = 0.4;
const BULWARK_DURATION: Duration = Duration::from_millis(5_000);
const FRENZY_FROM: f32 = 0.35;
const FRENZY_BELOW: f32 = 0.6;
const FRENZY_OFFENSE: f32 = 1.4;
const FRENZY_LIFESTEAL: f32 = 0.25;
const FRENZY_DURATION: Duration = Duration::from_millis(6_000);

fn leap_distance(distance: f32) -> bool {
    distance > LEAP_MIN_DISTANCE && distance <= LEAP_MAX_DISTANCE
}

/// Autonomous controller of the enemy hero.
#[derive(Debug)]
pub struct EnemyHeroAi {
    config: HeroAiConfig,
    hero: CombatantId,
    player: CombatantId,
    state: HeroAiState,
    farm_target: Option<CombatantId>,
    cooldowns: [Duration; 4],
    rng: ChaCha8Rng,
    scratch: Vec<Command>,
}

impl EnemyHeroAi {
    /// Creates a controller for `hero` that treats `player` as its rival.
    #[must_use]
    pub fn new(config: HeroAiConfig, hero: CombatantId, player: CombatantId, seed: u64) -> Self {
        Self {
            config,
            hero,
            player,
            state: HeroAiState::Pushing,
            farm_target: None,
            cooldowns: [Duration::ZERO; 4],
            rng: ChaCha8Rng::seed_from_u64(seed),
            scratch: Vec::new(),
        }
    }

    /// Current decision state.
    #[must_use]
    pub fn state(&self) -> HeroAiState {
        self.state
    }

    /// Creep currently being farmed, if any.
    #[must_use]
    pub fn farm_target(&self) -> Option<CombatantId> {
        self.farm_target
    }

    /// Re-evaluates the state machine and queues the hero's actions.
    ///
    /// A fallen hero keeps its last state and only counts cooldowns down.
    pub fn handle<M, F>(
        &mut self,
        events: &[Event],
        view: &CombatView,
        modifiers: &M,
        throne_of: F,
        out: &mut Vec<Command>,
        out_events: &mut Vec<Event>,
    ) where
        M: CombatModifiers + ?Sized,
        F: Fn(Faction) -> Option<CombatantId>,
    {
        let dt = elapsed(events);
        for remaining in &mut self.cooldowns {
            *remaining = remaining.saturating_sub(dt);
        }
        let Some(hero) = view.get(self.hero) else {
            self.farm_target = None;
            return;
        };

        let next = self.decide(hero, view);
        if next != self.state {
            log::info!("enemy hero {:?} -> {:?}", self.state, next);
            out_events.push(Event::HeroStateChanged {
                hero: hero.id,
                from: self.state,
                to: next,
            });
            self.state = next;
        }

        self.scratch.clear();
        let target = match self.state {
            HeroAiState::Fighting => view.get(self.player),
            HeroAiState::Farming => self.farm_target.and_then(|id| view.get(id)),
            HeroAiState::Pushing | HeroAiState::Retreating => None,
        };
        let leapt = self.cast_signatures(hero, target, view, out_events);

        let step = hero.speed * modifiers.speed_multiplier(hero.id) * dt.as_secs_f32();
        let damage_factor = modifiers.damage_multiplier(hero.id);
        match (self.state, target) {
            (HeroAiState::Retreating, _) => {
                if let Some(spawn) = hero.hero.as_ref().map(|details| details.spawn_point) {
                    self.push_move(hero, spawn, step);
                }
            }
            (HeroAiState::Fighting | HeroAiState::Farming, Some(target)) => {
                if leapt || hero.position.distance(target.position) <= hero.attack_range {
                    self.push_strike(hero, target, damage_factor);
                } else {
                    self.push_move(hero, target.position, step);
                }
            }
            _ => self.push_lane(hero, view, &throne_of, step, damage_factor),
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }

    fn decide(&mut self, hero: &CombatantSnapshot, view: &CombatView) -> HeroAiState {
        let ratio = hero.hp_ratio();
        let recovering =
            self.state == HeroAiState::Retreating && ratio < self.config.recover_threshold;
        if recovering || ratio < self.config.retreat_threshold {
            self.farm_target = None;
            return HeroAiState::Retreating;
        }

        let player_near = view.get(self.player).is_some_and(|player| {
            player.position.distance(hero.position) <= self.config.aggro_radius
        });
        if player_near && ratio > self.config.min_fight_ratio {
            self.farm_target = None;
            return HeroAiState::Fighting;
        }

        let farm_range_sq = self.config.farm_range * self.config.farm_range;
        let keeps_target = self
            .farm_target
            .and_then(|id| view.get(id))
            .is_some_and(|target| target.position.distance_squared(hero.position) <= farm_range_sq);
        if keeps_target {
            return HeroAiState::Farming;
        }

        self.farm_target = None;
        let chance = self.config.farm_chance.clamp(0.0, 1.0);
        if self.rng.gen_bool(chance) {
            self.farm_target = view
                .nearest(hero.position, self.config.farm_range, |other| {
                    other.kind == CombatantKind::Creep && other.faction != hero.faction
                })
                .map(|creep| creep.id);
        }
        if self.farm_target.is_some() {
            HeroAiState::Farming
        } else {
            HeroAiState::Pushing
        }
    }

    /// Fires every signature whose precondition, cooldown and mana allow it.
    /// Returns whether the hero leapt onto its target.
    fn cast_signatures(
        &mut self,
        hero: &CombatantSnapshot,
        target: Option<&CombatantSnapshot>,
        view: &CombatView,
        out_events: &mut Vec<Event>,
    ) -> bool {
        let Some(details) = hero.hero.as_ref() else {
            return false;
        };
        let mut mana = details.mana;
        let ratio = hero.hp_ratio();
        let mut leapt = false;

        for signature in Signature::ALL {
            if !self.cooldowns[signature.slot()].is_zero() || mana < signature.mana() {
                continue;
            }
            let fired = match signature {
                Signature::Leap => match target {
                    Some(target) if leap_distance(hero.position.distance(target.position)) => {
                        let approach = (hero.position - target.position).normalize_or_zero();
                        self.scratch.push(Command::Teleport {
                            combatant: hero.id,
                            destination: target.position + approach * LEAP_LANDING_GAP,
                        });
                        self.scratch.push(Command::DealDamage {
                            target: target.id,
                            amount: LEAP_DAMAGE,
                            source: DamageSource::Ability(hero.id),
                        });
                        leapt = true;
                        true
                    }
                    _ => false,
                },
                Signature::Roar => {
                    let engaged = self.state == HeroAiState::Fighting
                        && target.is_some_and(|target| {
                            hero.position.distance(target.position) <= ROAR_TRIGGER_DISTANCE
                        });
                    if engaged {
                        for enemy in view.within(hero.position, ROAR_RADIUS, |other| {
                            other.faction != hero.faction
                        }) {
                            self.scratch.push(Command::DealDamage {
                                target: enemy.id,
                                amount: ROAR_DAMAGE,
                                source: DamageSource::Ability(hero.id),
                            });
                        }
                    }
                    engaged
                }
                Signature::Bulwark => {
                    let threatened = ratio < BULWARK_BELOW;
                    if threatened {
                        self.scratch.push(Command::ApplyBuff {
                            target: hero.id,
                            buff: Buff::bulwark(BULWARK_REDUCTION),
                            duration: BULWARK_DURATION,
                        });
                    }
                    threatened
                }
                Signature::Frenzy => {
                    let wounded = (FRENZY_FROM..FRENZY_BELOW).contains(&ratio);
                    if wounded {
                        self.scratch.push(Command::ApplyBuff {
                            target: hero.id,
                            buff: Buff::frenzy(FRENZY_OFFENSE, FRENZY_LIFESTEAL),
                            duration: FRENZY_DURATION,
                        });
                    }
                    wounded
                }
            };
            if !fired {
                continue;
            }
            mana -= signature.mana();
            self.cooldowns[signature.slot()] = signature.cooldown();
            self.scratch.push(Command::SpendResource {
                hero: hero.id,
                pool: ResourcePool::Mana,
                amount: signature.mana(),
            });
            log::debug!("enemy hero used {}", signature.name());
            out_events.push(Event::AbilityUsed {
                caster: hero.id,
                ability: signature.name(),
            });
        }
        leapt
    }

    fn push_move(&mut self, hero: &CombatantSnapshot, destination: Vec2, step: f32) {
        if step > 0.0 {
            self.scratch.push(Command::MoveToward {
                combatant: hero.id,
                destination,
                distance: step,
            });
        }
    }

    fn push_strike(
        &mut self,
        hero: &CombatantSnapshot,
        target: &CombatantSnapshot,
        damage_factor: f32,
    ) {
        if !hero.attack_ready {
            return;
        }
        let execute = if target.hp_ratio() < self.config.execute_threshold {
            self.config.execute_multiplier
        } else {
            1.0
        };
        self.scratch.push(Command::Strike {
            attacker: hero.id,
            target: target.id,
            damage: hero.attack_damage * damage_factor * execute,
        });
    }

    /// Walks the home lane exactly like a creep, sieging at its end.
    fn push_lane<F>(
        &mut self,
        hero: &CombatantSnapshot,
        view: &CombatView,
        throne_of: &F,
        step: f32,
        damage_factor: f32,
    ) where
        F: Fn(Faction) -> Option<CombatantId>,
    {
        let Some(progress) = hero.lane else {
            return;
        };
        let in_reach = |kind: CombatantKind| {
            view.nearest(hero.position, hero.attack_range, |other| {
                other.kind == kind && other.faction != hero.faction
            })
        };
        let target = in_reach(CombatantKind::Creep)
            .or_else(|| in_reach(CombatantKind::Tower))
            .or_else(|| {
                progress
                    .sieging
                    .then(|| throne_of(hero.faction.opponent()))
                    .flatten()
                    .and_then(|throne| view.get(throne))
            });
        match target {
            Some(target) => self.push_strike(hero, target, damage_factor),
            None if !progress.sieging && step > 0.0 => {
                self.scratch.push(Command::AdvanceAlongLane {
                    combatant: hero.id,
                    distance: step,
                });
            }
            None => {}
        }
    }
}
