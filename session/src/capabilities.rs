//! Optional collaborators injected into a session.

use std::fmt;

use lanewar_core::{CombatantKind, Element, Event, LootDrop};

/// Sound cues the simulation asks the presentation to play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cue {
    /// A new wave began.
    WaveHorn,
    /// A boss entered the field.
    BossRoar,
    /// A hero fell.
    HeroDown,
    /// A tower or throne was destroyed.
    StructureCollapsed,
    /// A throne took a hit.
    ThroneStruck,
    /// An ability was used.
    AbilityCast,
    /// An ability request was refused.
    AbilityRejected,
    /// Loot dropped from a player kill.
    LootFound,
}

impl Cue {
    /// Cue announcing `event`, if it deserves one.
    #[must_use]
    pub fn for_event(event: &Event) -> Option<Self> {
        match event {
            Event::WaveStarted { .. } => Some(Self::WaveHorn),
            Event::BossSpawned { .. } => Some(Self::BossRoar),
            Event::CombatantDied { kind, .. } => match kind {
                CombatantKind::Hero => Some(Self::HeroDown),
                CombatantKind::Tower | CombatantKind::Throne => Some(Self::StructureCollapsed),
                CombatantKind::Creep => None,
            },
            Event::ThroneHpChanged { .. } => Some(Self::ThroneStruck),
            Event::AbilityUsed { .. } => Some(Self::AbilityCast),
            Event::LootDropped { .. } => Some(Self::LootFound),
            _ => None,
        }
    }
}

/// Receives sound cues.
pub trait AudioCues {
    /// Plays or queues the cue.
    fn cue(&mut self, cue: Cue);
}

/// Supplies the player's equipment and receives loot.
pub trait Equipment {
    /// Element granted by equipped gear; overrides the per-tick input.
    fn affinity(&self) -> Option<Element> {
        None
    }

    /// Stores a drop rolled from a player kill.
    fn grant_loot(&mut self, _drop: LootDrop) {}
}

/// Audio sink that discards every cue.
#[derive(Clone, Copy, Debug, Default)]
pub struct Silent;

impl AudioCues for Silent {
    fn cue(&mut self, _cue: Cue) {}
}

/// Equipment slot with nothing equipped and nowhere to store loot.
#[derive(Clone, Copy, Debug, Default)]
pub struct Unequipped;

impl Equipment for Unequipped {}

/// Collaborators a session talks to beyond the presentation frame.
pub struct Capabilities {
    /// Sound cue sink.
    pub audio: Box<dyn AudioCues>,
    /// Equipment and loot storage.
    pub equipment: Box<dyn Equipment>,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            audio: Box::new(Silent),
            equipment: Box::new(Unequipped),
        }
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capabilities").finish_non_exhaustive()
    }
}
