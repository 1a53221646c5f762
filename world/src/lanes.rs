//! Static lane topology scaled to the arena bounds.

use glam::Vec2;
use lanewar_core::{ArenaBounds, Faction, LaneDirection, LaneId};

use crate::config::LaneDefinition;

/// Fractional waypoint indices, relative to the lane length, of explorer towers.
pub(crate) const EXPLORER_TOWER_FRACTIONS: [f32; 3] = [0.2, 0.35, 0.45];
/// Fractional waypoint indices, relative to the lane length, of horde towers.
pub(crate) const HORDE_TOWER_FRACTIONS: [f32; 3] = [0.8, 0.65, 0.55];

/// A single lane scaled into world units.
#[derive(Clone, Debug, PartialEq)]
pub struct Lane {
    key: String,
    waypoints: Vec<Vec2>,
    chokepoint: usize,
}

impl Lane {
    /// Name of the lane.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Ordered waypoints from the explorer end to the horde end.
    #[must_use]
    pub fn waypoints(&self) -> &[Vec2] {
        &self.waypoints
    }

    /// Lanes need at least two waypoints to be walked.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.waypoints.len() >= 2
    }

    /// Index a walker of the given direction starts from.
    #[must_use]
    pub(crate) fn start_index(&self, direction: LaneDirection) -> usize {
        match direction {
            LaneDirection::Forward => 0,
            LaneDirection::Backward => self.waypoints.len().saturating_sub(1),
        }
    }

    /// Index that ends a walk in the given direction.
    #[must_use]
    pub(crate) fn terminal_index(&self, direction: LaneDirection) -> usize {
        self.start_index(match direction {
            LaneDirection::Forward => LaneDirection::Backward,
            LaneDirection::Backward => LaneDirection::Forward,
        })
    }

    /// Waypoint following `index` in the given direction, clamped to the lane.
    #[must_use]
    pub(crate) fn next_index(&self, index: usize, direction: LaneDirection) -> usize {
        let last = self.waypoints.len().saturating_sub(1);
        match direction {
            LaneDirection::Forward => (index + 1).min(last),
            LaneDirection::Backward => index.saturating_sub(1),
        }
    }

    /// Endpoint owned by the faction.
    #[must_use]
    pub fn endpoint(&self, faction: Faction) -> Option<Vec2> {
        if !self.is_usable() {
            return None;
        }
        let index = self.start_index(LaneDirection::for_faction(faction));
        self.waypoints.get(index).copied()
    }

    fn fractional_waypoint(&self, fraction: f32) -> Option<Vec2> {
        if !self.is_usable() {
            return None;
        }
        let last = self.waypoints.len() - 1;
        let position = fraction.clamp(0.0, 1.0) * last as f32;
        let lower = (position.floor() as usize).min(last);
        let upper = (lower + 1).min(last);
        let start = self.waypoints[lower];
        let end = self.waypoints[upper];
        Some(start.lerp(end, position - lower as f32))
    }

    fn distance_to(&self, point: Vec2) -> Option<f32> {
        match self.waypoints.as_slice() {
            [] => None,
            [only] => Some(only.distance(point)),
            waypoints => waypoints
                .windows(2)
                .map(|segment| distance_to_segment(point, segment[0], segment[1]))
                .reduce(f32::min),
        }
    }
}

/// Every lane of the arena. Immutable after world initialization.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LaneTopology {
    lanes: Vec<Lane>,
}

impl LaneTopology {
    /// Scales the relative lane definitions onto the arena.
    #[must_use]
    pub fn from_definitions(definitions: &[LaneDefinition], bounds: &ArenaBounds) -> Self {
        let lanes = definitions
            .iter()
            .map(|definition| Lane {
                key: definition.key.clone(),
                waypoints: definition
                    .waypoints
                    .iter()
                    .map(|&[x, y]| bounds.scale(Vec2::new(x, y)))
                    .collect(),
                chokepoint: definition.chokepoint,
            })
            .collect();
        Self { lanes }
    }

    /// Identifiers of every configured lane, usable or not.
    pub fn lane_ids(&self) -> impl Iterator<Item = LaneId> + '_ {
        (0..self.lanes.len()).map(|index| LaneId::new(index as u8))
    }

    /// Looks up a lane.
    #[must_use]
    pub fn lane(&self, lane: LaneId) -> Option<&Lane> {
        self.lanes.get(lane.index())
    }

    /// Finds a lane by key.
    #[must_use]
    pub fn lane_by_key(&self, key: &str) -> Option<LaneId> {
        self.lanes
            .iter()
            .position(|lane| lane.key == key)
            .map(|index| LaneId::new(index as u8))
    }

    /// Waypoints of the lane; empty for unknown lanes.
    #[must_use]
    pub fn waypoints(&self, lane: LaneId) -> &[Vec2] {
        self.lane(lane).map_or(&[], Lane::waypoints)
    }

    /// Reports whether the lane can be walked.
    #[must_use]
    pub fn is_usable(&self, lane: LaneId) -> bool {
        self.lane(lane).is_some_and(Lane::is_usable)
    }

    /// First lane with at least two waypoints.
    #[must_use]
    pub fn first_usable(&self) -> Option<LaneId> {
        self.lane_ids().find(|lane| self.is_usable(*lane))
    }

    /// Reports whether `point` lies within `radius` of any lane polyline.
    #[must_use]
    pub fn is_near(&self, point: Vec2, radius: f32) -> bool {
        self.lanes
            .iter()
            .filter_map(|lane| lane.distance_to(point))
            .any(|distance| distance <= radius)
    }

    /// Waypoint at the lane's configured chokepoint, clamped to the lane.
    #[must_use]
    pub fn chokepoint(&self, lane: LaneId) -> Option<Vec2> {
        let lane = self.lane(lane)?;
        let last = lane.waypoints.len().checked_sub(1)?;
        lane.waypoints.get(lane.chokepoint.min(last)).copied()
    }

    /// Tower sites of the faction across every usable lane, in lane order.
    #[must_use]
    pub fn tower_sites(&self, faction: Faction) -> Vec<(LaneId, Vec2)> {
        let fractions = match faction {
            Faction::Explorer => EXPLORER_TOWER_FRACTIONS,
            Faction::Horde => HORDE_TOWER_FRACTIONS,
        };
        self.lane_ids()
            .filter_map(|id| self.lane(id).map(|lane| (id, lane)))
            .flat_map(move |(id, lane)| {
                fractions
                    .into_iter()
                    .filter_map(move |fraction| lane.fractional_waypoint(fraction))
                    .map(move |site| (id, site))
            })
            .collect()
    }

    /// Throne site of the faction: the mean of its usable lane endpoints.
    #[must_use]
    pub fn throne_site(&self, faction: Faction) -> Option<Vec2> {
        let endpoints: Vec<Vec2> = self
            .lanes
            .iter()
            .filter_map(|lane| lane.endpoint(faction))
            .collect();
        if endpoints.is_empty() {
            return None;
        }
        let sum: Vec2 = endpoints.iter().copied().sum();
        Some(sum / endpoints.len() as f32)
    }
}

fn distance_to_segment(point: Vec2, start: Vec2, end: Vec2) -> f32 {
    let segment = end - start;
    let length_sq = segment.length_squared();
    if length_sq <= f32::EPSILON {
        return point.distance(start);
    }
    let t = ((point - start).dot(segment) / length_sq).clamp(0.0, 1.0);
    point.distance(start + segment * t)
}
