//! Scripted player behaviour for headless runs.

use std::time::Duration;

use clap::ValueEnum;
use glam::Vec2;
use lanewar_core::Element;
use lanewar_session::PlayerInput;
use lanewar_world::{query, World};

/// Ticks between basic attacks in a skirmish.
const ATTACK_EVERY: u32 = 4;
/// Ticks between ability requests in a skirmish.
const ABILITY_EVERY: u32 = 50;
/// Ticks an affinity stays equipped before the next element.
const AFFINITY_EVERY: u32 = 300;
/// Slots of the player's ability bar.
const SLOTS: usize = 5;

/// Player behaviour driven by the runner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum Script {
    /// The player stands at the throne and never acts.
    Idle,
    /// The player walks to the hero lane's chokepoint and fights there.
    Skirmish,
}

impl Script {
    /// Input for the given tick.
    pub(crate) fn input(self, tick: u32, dt: Duration, world: &World) -> PlayerInput {
        match self {
            Self::Idle => PlayerInput::default(),
            Self::Skirmish => skirmish(tick, dt, world),
        }
    }
}

fn skirmish(tick: u32, dt: Duration, world: &World) -> PlayerInput {
    let player = query::combat_view(world).get(query::player(world)).cloned();
    let chokepoint = query::hero_lane(world).and_then(|lane| query::lanes(world).chokepoint(lane));

    let (position, facing) = match (player, chokepoint) {
        (Some(player), Some(chokepoint)) => {
            let offset = chokepoint - player.position;
            let step = player.speed * dt.as_secs_f32();
            let position = if offset.length() <= step {
                chokepoint
            } else {
                player.position + offset.normalize_or_zero() * step
            };
            (Some(position), offset.normalize_or_zero())
        }
        _ => (None, Vec2::ZERO),
    };

    PlayerInput {
        position,
        facing,
        attacked: tick % ATTACK_EVERY == 0,
        abilities: if tick % ABILITY_EVERY == 0 {
            vec![(tick / ABILITY_EVERY) as usize % SLOTS]
        } else {
            Vec::new()
        },
        affinity: Some(Element::ALL[(tick / AFFINITY_EVERY) as usize % Element::ALL.len()]),
    }
}
