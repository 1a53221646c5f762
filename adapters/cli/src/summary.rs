//! Tallies of a headless run.

use std::fmt::Write;

use lanewar_core::{Event, Faction};
use lanewar_session::{Frame, Session};
use lanewar_world::query;

/// Counters accumulated from every frame of a run.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct Summary {
    ticks: u64,
    bosses: u32,
    explorer_losses: u32,
    horde_losses: u32,
    abilities_used: u32,
    loot: u32,
}

impl Summary {
    /// Folds a frame's events into the counters.
    pub(crate) fn record(&mut self, frame: &Frame) {
        self.ticks = frame.tick;
        for event in &frame.events {
            match event {
                Event::BossSpawned { .. } => self.bosses += 1,
                Event::CombatantDied { faction, .. } => match faction {
                    Faction::Explorer => self.explorer_losses += 1,
                    Faction::Horde => self.horde_losses += 1,
                },
                Event::AbilityUsed { .. } => self.abilities_used += 1,
                Event::LootDropped { .. } => self.loot += 1,
                _ => {}
            }
        }
    }

    /// Renders the end-of-run report.
    pub(crate) fn report(&self, session: &Session) -> String {
        let world = session.world();
        let view = query::combat_view(world);
        let throne_hp = |faction| {
            query::throne(world, faction)
                .and_then(|throne| view.get(throne))
                .map_or(0.0, |throne| throne.hp)
        };

        let mut report = String::new();
        let _ = writeln!(report, "ticks simulated: {}", self.ticks);
        let _ = writeln!(report, "waves: {} ({} bosses)", session.wave_number(), self.bosses);
        let _ = writeln!(report, "momentum: {:.1}", session.momentum());
        let _ = writeln!(
            report,
            "losses: explorer {} / horde {}",
            self.explorer_losses, self.horde_losses
        );
        let _ = writeln!(
            report,
            "thrones: explorer {:.0} / horde {:.0}",
            throne_hp(Faction::Explorer),
            throne_hp(Faction::Horde)
        );
        let _ = writeln!(report, "enemy hero: {:?}", session.hero_state());
        let _ = write!(
            report,
            "abilities used: {}, loot drops: {}",
            self.abilities_used, self.loot
        );
        report
    }
}
