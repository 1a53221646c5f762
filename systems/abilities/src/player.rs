//! Basic attacks of the player hero, combo chaining and kill loot.

use std::time::Duration;

use lanewar_core::{
    CombatView, Command, CombatantId, CombatantKind, DamageSource, Element, Event, LootDrop,
    LootRarity, StatusTag,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Tunables of the player's basic attack and loot table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerCombatConfig {
    /// Reach of the basic attack.
    pub range: f32,
    /// Raw damage of an unchained hit.
    pub base_damage: f32,
    /// Hits closer together than this extend the combo.
    pub combo_window: Duration,
    /// Highest combo step.
    pub max_combo: u32,
    /// Damage bonus per combo step.
    pub combo_bonus: f32,
    /// Probability that an ordinary creep kill drops loot.
    pub creep_loot_chance: f64,
}

impl Default for PlayerCombatConfig {
    fn default() -> Self {
        Self {
            range: 6.0,
            base_damage: 15.0,
            combo_window: Duration::from_millis(1_500),
            max_combo: 5,
            combo_bonus: 0.1,
            creep_loot_chance: 0.3,
        }
    }
}

/// Resolves the player's basic attack and rolls loot for player kills.
#[derive(Debug)]
pub struct PlayerCombat {
    config: PlayerCombatConfig,
    combo: u32,
    last_hit_at: Option<Duration>,
    rng: ChaCha8Rng,
}

impl PlayerCombat {
    /// Creates the attack resolver with a seeded loot stream.
    #[must_use]
    pub fn new(config: PlayerCombatConfig, seed: u64) -> Self {
        Self {
            config,
            combo: 0,
            last_hit_at: None,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Current combo step; zero for an unchained hit.
    #[must_use]
    pub fn combo(&self) -> u32 {
        self.combo
    }

    /// Damage factor of the current combo step.
    #[must_use]
    pub fn combo_multiplier(&self) -> f32 {
        1.0 + self.config.combo_bonus * self.combo as f32
    }

    /// Strikes the nearest enemy within reach of `player`.
    ///
    /// Returns the struck combatant, or `None` when the player is down or
    /// nothing hostile is in range. A miss leaves the combo untouched.
    pub fn attack(
        &mut self,
        now: Duration,
        player: CombatantId,
        view: &CombatView,
        affinity: Option<Element>,
        out: &mut Vec<Command>,
        tags: &mut Vec<StatusTag>,
    ) -> Option<CombatantId> {
        let attacker = view.get(player)?;
        let target = view.nearest(attacker.position, self.config.range, |other| {
            other.faction != attacker.faction
        })?;

        let chained = self
            .last_hit_at
            .is_some_and(|last| now.saturating_sub(last) <= self.config.combo_window);
        self.combo = if chained {
            (self.combo + 1).min(self.config.max_combo)
        } else {
            0
        };
        self.last_hit_at = Some(now);

        out.push(Command::DealDamage {
            target: target.id,
            amount: self.config.base_damage * self.combo_multiplier(),
            source: DamageSource::Strike(player),
        });
        if let Some(element) = affinity {
            tags.push(StatusTag {
                combatant: target.id,
                element,
            });
        }
        Some(target.id)
    }

    /// Rolls loot for every death in `events` credited to `player`.
    pub fn collect_loot(
        &mut self,
        events: &[Event],
        player: CombatantId,
        out_events: &mut Vec<Event>,
    ) {
        for event in events {
            let Event::CombatantDied {
                combatant,
                kind,
                is_boss,
                killer: Some(killer),
                ..
            } = event
            else {
                continue;
            };
            if *killer != player {
                continue;
            }
            if let Some(drop) = self.roll(*combatant, *kind, *is_boss) {
                log::debug!("{:?} loot from {}", drop.rarity, combatant.get());
                out_events.push(Event::LootDropped { drop });
            }
        }
    }

    fn roll(&mut self, source: CombatantId, kind: CombatantKind, is_boss: bool) -> Option<LootDrop> {
        let guaranteed = is_boss || kind != CombatantKind::Creep;
        let chance = self.config.creep_loot_chance.clamp(0.0, 1.0);
        if !guaranteed && !self.rng.gen_bool(chance) {
            return None;
        }
        let rarity = match self.rng.gen_range(0..100_u32) {
            0..=69 => LootRarity::Common,
            70..=94 => LootRarity::Rare,
            _ => LootRarity::Mythic,
        };
        Some(LootDrop {
            source,
            rarity: if is_boss { rarity.upgraded() } else { rarity },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use lanewar_core::{CombatantSnapshot, Faction};

    fn snapshot(id: u32, faction: Faction, x: f32) -> CombatantSnapshot {
        CombatantSnapshot {
            id: CombatantId::new(id),
            kind: CombatantKind::Creep,
            faction,
            position: Vec2::new(x, 0.0),
            facing: Vec2::X,
            hp: 60.0,
            max_hp: 60.0,
            armor: 0.0,
            speed: 3.0,
            attack_damage: 8.0,
            attack_range: 1.5,
            attack_ready: true,
            is_boss: false,
            lane: None,
            hero: None,
        }
    }

    fn died(combatant: u32, is_boss: bool, killer: u32) -> Event {
        Event::CombatantDied {
            combatant: CombatantId::new(combatant),
            kind: CombatantKind::Creep,
            faction: Faction::Horde,
            is_boss,
            killer: Some(CombatantId::new(killer)),
        }
    }

    #[test]
    fn hits_inside_the_window_chain_up_to_the_cap() {
        let view = CombatView::from_snapshots(vec![
            snapshot(1, Faction::Explorer, 0.0),
            snapshot(2, Faction::Horde, 3.0),
        ]);
        let mut combat = PlayerCombat::new(PlayerCombatConfig::default(), 1);
        let mut out = Vec::new();
        let mut tags = Vec::new();

        let mut amounts = Vec::new();
        for step in 0..8_u64 {
            out.clear();
            let now = Duration::from_millis(step * 1_000);
            let hit = combat.attack(now, CombatantId::new(1), &view, None, &mut out, &mut tags);
            assert_eq!(hit, Some(CombatantId::new(2)));
            if let [Command::DealDamage { amount, .. }] = out.as_slice() {
                amounts.push(*amount);
            }
        }

        let expected = [15.0, 16.5, 18.0, 19.5, 21.0, 22.5, 22.5, 22.5];
        assert_eq!(amounts.len(), expected.len());
        for (amount, expected) in amounts.iter().zip(expected) {
            assert!((amount - expected).abs() < 1e-4, "{amount} vs {expected}");
        }
        assert!(tags.is_empty());

        out.clear();
        let _ = combat.attack(
            Duration::from_millis(20_000),
            CombatantId::new(1),
            &view,
            Some(Element::Ice),
            &mut out,
            &mut tags,
        );
        assert_eq!(combat.combo(), 0, "a late hit restarts the chain");
        assert_eq!(
            tags,
            vec![StatusTag {
                combatant: CombatantId::new(2),
                element: Element::Ice,
            }]
        );
    }

    #[test]
    fn attacks_without_a_target_do_nothing() {
        let view = CombatView::from_snapshots(vec![
            snapshot(1, Faction::Explorer, 0.0),
            snapshot(2, Faction::Explorer, 1.0),
            snapshot(3, Faction::Horde, 20.0),
        ]);
        let mut combat = PlayerCombat::new(PlayerCombatConfig::default(), 1);
        let mut out = Vec::new();
        let mut tags = Vec::new();

        let hit = combat.attack(
            Duration::ZERO,
            CombatantId::new(1),
            &view,
            Some(Element::Fire),
            &mut out,
            &mut tags,
        );

        assert_eq!(hit, None);
        assert!(out.is_empty() && tags.is_empty());
    }

    #[test]
    fn bosses_always_drop_at_least_rare_loot() {
        let mut combat = PlayerCombat::new(PlayerCombatConfig::default(), 9);
        let mut events = Vec::new();
        for id in 0..50 {
            combat.collect_loot(&[died(id, true, 1)], CombatantId::new(1), &mut events);
        }

        assert_eq!(events.len(), 50);
        assert!(events.iter().all(|event| matches!(
            event,
            Event::LootDropped { drop } if drop.rarity >= LootRarity::Rare
        )));
    }

    #[test]
    fn only_player_kills_roll_loot() {
        let mut combat = PlayerCombat::new(
            PlayerCombatConfig {
                creep_loot_chance: 1.0,
                ..PlayerCombatConfig::default()
            },
            4,
        );
        let mut events = Vec::new();
        combat.collect_loot(
            &[died(5, false, 1), died(6, false, 2)],
            CombatantId::new(1),
            &mut events,
        );

        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            Event::LootDropped { drop } if drop.source == CombatantId::new(5)
        ));
    }
}
