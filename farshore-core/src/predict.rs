//! Outcome projection: condition decay and experience growth for a voyage.
//!
//! Everything here is pure and total. Malformed per-component state never
//! propagates an error: negative or NaN conditions read as "needs repair
//! now", and a zero decay rate reads as "never wears out".
use serde::{Deserialize, Serialize};

use crate::numbers::{clamp_percent, floor_f32_to_u32, u32_to_f32};
use crate::route::Route;
use crate::vehicle::{Part, VehicleState};

/// Sentinel for a component that never decays.
pub const UNBOUNDED_VOYAGES: u32 = u32::MAX;

/// Experience thresholds per rank, supplied as game data.
///
/// Entry `r - 1` is the experience required to advance from rank `r`; the
/// maximum rank is one past the last entry. The table is never hard-coded in
/// the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct RankTable {
    thresholds: Vec<u32>,
}

impl RankTable {
    /// Build a table from per-rank thresholds. Zero entries are lifted to 1
    /// so the carry loop always terminates.
    #[must_use]
    pub fn from_thresholds(thresholds: Vec<u32>) -> Self {
        Self {
            thresholds: thresholds
                .into_iter()
                .map(|threshold| threshold.max(1))
                .collect(),
        }
    }

    /// Load a threshold table from a JSON array.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed as an array of numbers.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let thresholds: Vec<u32> = serde_json::from_str(json)?;
        Ok(Self::from_thresholds(thresholds))
    }

    /// Highest attainable rank.
    #[must_use]
    pub fn max_rank(&self) -> u8 {
        u8::try_from(self.thresholds.len().saturating_add(1)).unwrap_or(u8::MAX)
    }

    /// Experience needed to advance from `rank`; `None` at or past the cap.
    #[must_use]
    pub fn threshold(&self, rank: u8) -> Option<u32> {
        if rank == 0 {
            return self.thresholds.first().copied();
        }
        self.thresholds.get(usize::from(rank) - 1).copied()
    }
}

/// Projected vehicle state after a route is (or would be) executed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoyageOutcome {
    /// Projected condition per component (percentage 0-100).
    pub hull: f32,
    pub stern: f32,
    pub bow: f32,
    pub bridge: f32,
    /// Rank after the route's yield is applied.
    pub projected_rank: u8,
    /// Progress toward the next rank, as a percentage of its threshold.
    pub projected_exp_percent: f32,
    /// Voyages of this shape the vehicle can still run before repair.
    pub voyages_until_repair: u32,
}

impl VoyageOutcome {
    /// Projected condition for a component.
    #[must_use]
    pub const fn condition(&self, part: Part) -> f32 {
        match part {
            Part::Hull => self.hull,
            Part::Stern => self.stern,
            Part::Bow => self.bow,
            Part::Bridge => self.bridge,
        }
    }
}

/// Voyages a single component can sustain given a per-voyage decay.
fn component_voyages(condition: f32, decay_per_voyage: f32) -> u32 {
    if condition <= 0.0 {
        return 0;
    }
    if !decay_per_voyage.is_finite() || decay_per_voyage <= 0.0 {
        return UNBOUNDED_VOYAGES;
    }
    floor_f32_to_u32(condition / decay_per_voyage)
}

fn min_across_parts(state: &VehicleState, cost_per_voyage: f32) -> u32 {
    Part::ALL
        .iter()
        .map(|&part| {
            let entry = state.part(part);
            let decay = entry.decay_per_cost * cost_per_voyage.max(0.0);
            component_voyages(entry.normalized_condition(), decay)
        })
        .min()
        .unwrap_or(UNBOUNDED_VOYAGES)
}

/// Remaining voyages before repair, based on the vehicle's historical
/// average voyage cost.
#[must_use]
pub fn predict_durability(state: &VehicleState) -> u32 {
    min_across_parts(state, state.avg_voyage_cost)
}

/// Remaining voyages before repair if the vehicle keeps running a specific
/// planned route.
#[must_use]
pub fn calculate_until_repair(state: &VehicleState, planned_route_cost: f32) -> u32 {
    min_across_parts(state, planned_route_cost)
}

/// Apply experience yield, carrying rank-ups against the threshold table.
///
/// Caps at the table's maximum rank; surplus experience past the cap is
/// discarded rather than accumulated. Returns the resulting rank and the
/// remaining progress as a percentage of the next threshold (0 at the cap).
#[must_use]
pub fn predict_exp_growth(rank: u8, exp: u32, gained: u32, table: &RankTable) -> (u8, f32) {
    let max_rank = table.max_rank();
    let mut rank = rank.clamp(1, max_rank);
    let mut exp = exp.saturating_add(gained);

    while rank < max_rank {
        let Some(threshold) = table.threshold(rank) else {
            break;
        };
        if exp < threshold {
            break;
        }
        exp -= threshold;
        rank += 1;
    }

    if rank >= max_rank {
        return (max_rank, 0.0);
    }
    let percent = table.threshold(rank).map_or(0.0, |threshold| {
        clamp_percent(u32_to_f32(exp) / u32_to_f32(threshold) * 100.0)
    });
    (rank, percent)
}

/// Full projection for executing `route` once from `state`.
#[must_use]
pub fn project_outcome(state: &VehicleState, route: &Route, table: &RankTable) -> VoyageOutcome {
    let project_part = |part: Part| {
        let entry = state.part(part);
        let decay = entry.decay_per_cost * route.total_cost.max(0.0);
        (entry.normalized_condition() - decay.max(0.0)).max(0.0)
    };
    let (projected_rank, projected_exp_percent) =
        predict_exp_growth(state.rank, state.exp, route.total_yield, table);
    VoyageOutcome {
        hull: project_part(Part::Hull),
        stern: project_part(Part::Stern),
        bow: project_part(Part::Bow),
        bridge: project_part(Part::Bridge),
        projected_rank,
        projected_exp_percent,
        voyages_until_repair: calculate_until_repair(state, route.total_cost),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::PartCondition;

    fn state_with(conditions: [(f32, f32); 4], avg_cost: f32) -> VehicleState {
        let part = |(condition, decay_per_cost): (f32, f32)| PartCondition {
            condition,
            decay_per_cost,
        };
        VehicleState {
            rank: 1,
            exp: 0,
            avg_voyage_cost: avg_cost,
            hull: part(conditions[0]),
            stern: part(conditions[1]),
            bow: part(conditions[2]),
            bridge: part(conditions[3]),
        }
    }

    #[test]
    fn durability_is_the_weakest_component() {
        // Decay per voyage: hull 10, stern 5, bow 2, bridge 1.
        let state = state_with(
            [(100.0, 1.0), (100.0, 0.5), (100.0, 0.2), (100.0, 0.1)],
            10.0,
        );
        assert_eq!(predict_durability(&state), 10);
    }

    #[test]
    fn exhausted_component_needs_repair_now() {
        let state = state_with([(0.0, 0.1), (100.0, 0.1), (100.0, 0.1), (100.0, 0.1)], 5.0);
        assert_eq!(predict_durability(&state), 0);
        let negative = state_with([(-7.0, 0.1), (100.0, 0.1), (100.0, 0.1), (100.0, 0.1)], 5.0);
        assert_eq!(predict_durability(&negative), 0);
    }

    #[test]
    fn zero_decay_is_unbounded_not_a_division_fault() {
        let state = state_with([(50.0, 0.0), (50.0, 0.0), (50.0, 0.0), (50.0, 0.0)], 10.0);
        assert_eq!(predict_durability(&state), UNBOUNDED_VOYAGES);
        assert_eq!(calculate_until_repair(&state, 0.0), UNBOUNDED_VOYAGES);
    }

    #[test]
    fn tiny_decay_saturates_instead_of_reading_as_worn_out() {
        // A nearly indestructible part: the voyage count overflows u32 and
        // must clamp to the sentinel, not collapse to "repair now".
        let state = state_with(
            [(100.0, 1e-9), (100.0, 1e-9), (100.0, 1e-9), (100.0, 1e-9)],
            1.0,
        );
        assert_eq!(predict_durability(&state), UNBOUNDED_VOYAGES);
        assert_eq!(calculate_until_repair(&state, 1.0), UNBOUNDED_VOYAGES);

        // A ratio that still fits the range stays a real count, not the
        // sentinel (float rounding keeps it near, not exactly at, 1e9).
        let sturdy = state_with(
            [(100.0, 1e-7), (100.0, 1e-7), (100.0, 1e-7), (100.0, 1e-7)],
            1.0,
        );
        let voyages = predict_durability(&sturdy);
        assert!(voyages < UNBOUNDED_VOYAGES);
        assert!((900_000_000..1_100_000_000).contains(&voyages));
    }

    #[test]
    fn until_repair_uses_the_planned_route_cost() {
        let state = state_with([(60.0, 0.5), (100.0, 0.5), (100.0, 0.5), (100.0, 0.5)], 1.0);
        // Planned cost 20 -> hull decays 10 per voyage -> 6 voyages.
        assert_eq!(calculate_until_repair(&state, 20.0), 6);
    }

    #[test]
    fn exp_growth_carries_multiple_rank_ups() {
        let table = RankTable::from_thresholds(vec![100, 200, 400]);
        let (rank, percent) = predict_exp_growth(1, 50, 300, &table);
        assert_eq!(rank, 3);
        // 350 - 100 - 200 = 50 of 400 -> 12.5%.
        assert!((percent - 12.5).abs() < 0.01);
    }

    #[test]
    fn max_rank_caps_and_discards_surplus() {
        let table = RankTable::from_thresholds(vec![100, 200]);
        let (rank, percent) = predict_exp_growth(3, 199, 1_000_000, &table);
        assert_eq!(rank, 3);
        assert!((percent - 0.0).abs() < f32::EPSILON);

        let (from_below, below_percent) = predict_exp_growth(2, 199, u32::MAX, &table);
        assert_eq!(from_below, 3);
        assert!((below_percent - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn outcome_projection_combines_decay_and_growth() {
        let table = RankTable::from_thresholds(vec![100]);
        let state = state_with([(80.0, 1.0), (90.0, 0.5), (70.0, 0.0), (60.0, 0.25)], 0.0);
        let route = Route {
            stops: crate::route::RouteSeq::new(),
            total_cost: 20.0,
            total_yield: 40,
        };
        let outcome = project_outcome(&state, &route, &table);
        assert!((outcome.condition(Part::Hull) - 60.0).abs() < f32::EPSILON);
        assert!((outcome.condition(Part::Stern) - 80.0).abs() < f32::EPSILON);
        assert!((outcome.condition(Part::Bow) - 70.0).abs() < f32::EPSILON);
        assert!((outcome.condition(Part::Bridge) - 55.0).abs() < f32::EPSILON);
        assert_eq!(outcome.projected_rank, 1);
        assert!((outcome.projected_exp_percent - 40.0).abs() < 0.01);
        // Hull: 80 condition, 20 decay per voyage -> 4 voyages.
        assert_eq!(outcome.voyages_until_repair, 4);
    }
}
