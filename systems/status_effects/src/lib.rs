#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Registry of timed elemental status effects.
//!
//! Each combatant holds at most one instance per element. Re-applying an
//! element refreshes the existing instance's timing instead of stacking a
//! second one. Periodic damage catches up on every whole tick interval that
//! elapsed since the previous settlement, so coarse frame deltas deal the
//! same total damage as fine ones. An instance that runs out mid-frame is
//! settled up to its end before it is dropped.

use std::{collections::BTreeMap, time::Duration};

use lanewar_core::{
    CombatModifiers, CombatView, Command, CombatantId, DamageSource, Element, Event, StatusTag,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct StatusInstance {
    started_at: Duration,
    last_tick_at: Duration,
}

impl StatusInstance {
    /// Counts whole tick intervals elapsed up to `until` and consumes them.
    fn settle(&mut self, tick_rate: Duration, until: Duration) -> u32 {
        if tick_rate.is_zero() {
            return 0;
        }
        let pending = until.saturating_sub(self.last_tick_at);
        let ticks = (pending.as_nanos() / tick_rate.as_nanos()) as u32;
        self.last_tick_at = self
            .last_tick_at
            .saturating_add(tick_rate.saturating_mul(ticks));
        ticks
    }
}

/// Tracks active elemental statuses keyed by combatant.
#[derive(Debug, Default)]
pub struct StatusEffectRegistry {
    tracked: BTreeMap<CombatantId, BTreeMap<Element, StatusInstance>>,
    expired: Vec<(CombatantId, Element)>,
}

impl StatusEffectRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies or refreshes `element` on `combatant` at simulated time `now`.
    pub fn apply(
        &mut self,
        combatant: CombatantId,
        element: Element,
        now: Duration,
        out_events: &mut Vec<Event>,
    ) {
        let instance = StatusInstance {
            started_at: now,
            last_tick_at: now,
        };
        let refreshed = self
            .tracked
            .entry(combatant)
            .or_default()
            .insert(element, instance)
            .is_some();
        out_events.push(Event::StatusApplied {
            combatant,
            element,
            refreshed,
        });
    }

    /// Applies every tag in order.
    pub fn apply_tags(&mut self, tags: &[StatusTag], now: Duration, out_events: &mut Vec<Event>) {
        for tag in tags {
            self.apply(tag.combatant, tag.element, now, out_events);
        }
    }

    /// Expires finished instances and emits periodic damage that came due.
    ///
    /// Instances on combatants missing from `view` are dropped. Combatants
    /// are released once they hold no instances.
    pub fn tick(
        &mut self,
        now: Duration,
        view: &CombatView,
        out: &mut Vec<Command>,
        out_events: &mut Vec<Event>,
    ) {
        self.expired.clear();

        for (&combatant, instances) in &mut self.tracked {
            let alive = view.get(combatant).is_some();
            for (&element, instance) in instances.iter_mut() {
                let profile = element.profile();
                let ends_at = instance.started_at.saturating_add(profile.duration);
                if alive {
                    let ticks = instance.settle(profile.tick_rate, now.min(ends_at));
                    if ticks > 0 {
                        out.push(Command::DealDamage {
                            target: combatant,
                            amount: profile.tick_damage * ticks as f32,
                            source: DamageSource::Status(element),
                        });
                    }
                }
                if !alive || now >= ends_at {
                    self.expired.push((combatant, element));
                }
            }
        }

        for &(combatant, element) in &self.expired {
            if let Some(instances) = self.tracked.get_mut(&combatant) {
                let _ = instances.remove(&element);
                if instances.is_empty() {
                    let _ = self.tracked.remove(&combatant);
                }
            }
            log::debug!("{} expired on combatant {}", element.icon(), combatant.get());
            out_events.push(Event::StatusExpired { combatant, element });
        }
    }

    /// Reports whether the element is active on the combatant.
    #[must_use]
    pub fn has(&self, combatant: CombatantId, element: Element) -> bool {
        self.tracked
            .get(&combatant)
            .is_some_and(|instances| instances.contains_key(&element))
    }

    /// Number of active instances on the combatant.
    #[must_use]
    pub fn instance_count(&self, combatant: CombatantId) -> usize {
        self.tracked.get(&combatant).map_or(0, BTreeMap::len)
    }

    /// Number of combatants holding at least one instance.
    #[must_use]
    pub fn tracked_len(&self) -> usize {
        self.tracked.len()
    }

    /// Icon keys of the combatant's active elements, in element order.
    #[must_use]
    pub fn icons(&self, combatant: CombatantId) -> Vec<&'static str> {
        self.tracked.get(&combatant).map_or_else(Vec::new, |instances| {
            instances.keys().map(|element| element.icon()).collect()
        })
    }

    fn product<F>(&self, combatant: CombatantId, factor: F) -> f32
    where
        F: Fn(Element) -> f32,
    {
        self.tracked.get(&combatant).map_or(1.0, |instances| {
            instances.keys().map(|element| factor(*element)).product()
        })
    }
}

impl CombatModifiers for StatusEffectRegistry {
    fn speed_multiplier(&self, combatant: CombatantId) -> f32 {
        self.product(combatant, |element| element.profile().speed_multiplier)
    }

    fn damage_multiplier(&self, combatant: CombatantId) -> f32 {
        self.product(combatant, |element| element.profile().damage_multiplier)
    }
}
