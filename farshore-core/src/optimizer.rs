//! Route search: maximize yield over eligible sectors within a travel budget.
//!
//! Region sector counts are small (low tens), so the search enumerates
//! ascending-id stop sequences exhaustively with prefix budget pruning instead
//! of reaching for a general solver. Determinism is part of the contract:
//! identical inputs always produce the identical route.
use thiserror::Error;

use crate::budget::BudgetPolicy;
use crate::dispatch::CancelToken;
use crate::route::{CostMatrix, MAX_MUST_INCLUDE, MustInclude, Route, RouteResult, UnlockedSet};
use crate::sector::{RegionId, SectorId, SectorNetwork};
use crate::vehicle::VehicleCapability;

/// Cost comparisons tolerate accumulated float error up to this much.
const COST_EPSILON: f32 = 1e-3;

/// Constraint violations detected before search starts.
#[derive(Debug, Error, PartialEq)]
pub enum ConstraintError {
    #[error("must-include set has {count} members, limit is {MAX_MUST_INCLUDE}")]
    OverCapacity { count: usize },
    #[error("must-include sector {sector} is outside the target region")]
    OutsideRegion { sector: SectorId },
    #[error("must-include sector {sector} requires rank {required}, vehicle has rank {rank}")]
    RankIneligible {
        sector: SectorId,
        required: u8,
        rank: u8,
    },
    #[error("must-include sector {sector} is not unlocked")]
    NotUnlocked { sector: SectorId },
}

/// Errors raised by route search.
#[derive(Debug, Error, PartialEq)]
pub enum OptimizerError {
    #[error("sector {sector} is not present in the network")]
    UnknownSector { sector: SectorId },
    #[error("invalid constraint: {0}")]
    InvalidConstraint(#[from] ConstraintError),
    #[error("search cancelled before completion")]
    Cancelled,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    id: SectorId,
    cost: f32,
    yield_exp: u32,
    must: bool,
}

struct Search<'a> {
    candidates: Vec<Candidate>,
    budget: f32,
    max_stops: usize,
    must_total: usize,
    prefer_full: bool,
    cancel: &'a CancelToken,
}

impl Search<'_> {
    /// True when `next` beats the current best under the tie-break chain:
    /// highest yield, then lowest cost (highest under the maximize policy).
    /// Equal-on-both candidates never replace the incumbent, so the
    /// ascending-id enumeration order settles remaining ties.
    fn improves(&self, best: &Route, next: &Route) -> bool {
        if next.total_yield != best.total_yield {
            return next.total_yield > best.total_yield;
        }
        if (next.total_cost - best.total_cost).abs() > COST_EPSILON {
            if self.prefer_full {
                return next.total_cost > best.total_cost;
            }
            return next.total_cost < best.total_cost;
        }
        false
    }

    fn expand(
        &self,
        start: usize,
        route: &mut Route,
        must_hit: usize,
        best: &mut Option<Route>,
    ) -> Result<(), OptimizerError> {
        if self.cancel.is_cancelled() {
            return Err(OptimizerError::Cancelled);
        }

        // A candidate must earn something: visiting only zero-yield sectors is
        // not a voyage worth dispatching unless the operator pinned them.
        let worthwhile = route.total_yield > 0 || self.must_total > 0;
        if !route.stops.is_empty() && worthwhile && must_hit == self.must_total {
            let replace = match best {
                Some(incumbent) => self.improves(incumbent, route),
                None => true,
            };
            if replace {
                *best = Some(route.clone());
            }
        }

        if route.stops.len() >= self.max_stops {
            return Ok(());
        }
        // Pinned sectors still missing must fit in the remaining stops.
        if self.must_total - must_hit > self.max_stops - route.stops.len() {
            return Ok(());
        }

        for index in start..self.candidates.len() {
            let candidate = self.candidates[index];
            let next_cost = route.total_cost + candidate.cost;
            if next_cost > self.budget + COST_EPSILON {
                continue;
            }
            route.stops.push(candidate.id);
            route.total_cost = next_cost;
            route.total_yield += candidate.yield_exp;
            let next_hit = must_hit + usize::from(candidate.must);
            self.expand(index + 1, route, next_hit, best)?;
            route.stops.pop();
            route.total_cost -= candidate.cost;
            route.total_yield -= candidate.yield_exp;
        }
        Ok(())
    }
}

fn validate_must_include(
    network: &SectorNetwork,
    capability: &VehicleCapability,
    unlocked: &UnlockedSet,
    must_include: &MustInclude,
    region: RegionId,
) -> Result<(), OptimizerError> {
    if must_include.len() > MAX_MUST_INCLUDE {
        return Err(ConstraintError::OverCapacity {
            count: must_include.len(),
        }
        .into());
    }
    for &id in must_include.members() {
        let sector = network
            .sector(id)
            .ok_or(OptimizerError::UnknownSector { sector: id })?;
        if sector.region != region {
            return Err(ConstraintError::OutsideRegion { sector: id }.into());
        }
        if sector.min_rank > capability.rank {
            return Err(ConstraintError::RankIneligible {
                sector: id,
                required: sector.min_rank,
                rank: capability.rank,
            }
            .into());
        }
        if !unlocked.contains(&id) {
            return Err(ConstraintError::NotUnlocked { sector: id }.into());
        }
    }
    Ok(())
}

/// Find the highest-yield route through a region's eligible sectors.
///
/// Eligible sectors are those in `region`, present in `unlocked`, and whose
/// rank requirement the capability meets. The returned route contains every
/// member of `must_include`, never repeats a sector, and keeps its cumulative
/// cost within the effective budget. An infeasible search is a normal
/// negative outcome (`feasible: false`), not an error.
///
/// # Errors
///
/// `UnknownSector` / `InvalidConstraint` when the must-include set references
/// ids outside the network or outside the eligible set; `Cancelled` when the
/// token fires mid-search.
pub fn find_best_route(
    network: &SectorNetwork,
    capability: &VehicleCapability,
    unlocked: &UnlockedSet,
    must_include: &MustInclude,
    policy: BudgetPolicy,
    region: RegionId,
    cancel: &CancelToken,
) -> Result<RouteResult, OptimizerError> {
    validate_must_include(network, capability, unlocked, must_include, region)?;

    // Zero-yield sectors only ever add cost, so they join the candidate set
    // solely when the operator pinned them.
    let eligible = network
        .sectors_in_region(region)
        .into_iter()
        .filter(|sector| unlocked.contains(&sector.id) && sector.min_rank <= capability.rank)
        .filter(|sector| sector.yield_exp > 0 || must_include.contains(sector.id))
        .collect::<Vec<_>>();
    let matrix = CostMatrix::build(capability, &eligible);
    let candidates = eligible
        .iter()
        .map(|sector| Candidate {
            id: sector.id,
            cost: matrix.visit_cost(sector.id).unwrap_or(sector.travel_cost),
            yield_exp: sector.yield_exp,
            must: must_include.contains(sector.id),
        })
        .collect::<Vec<_>>();

    let search = Search {
        candidates,
        budget: policy.effective_budget(capability),
        max_stops: capability.max_stops,
        must_total: must_include.len(),
        prefer_full: policy.prefers_full_consumption(),
        cancel,
    };

    let mut best = None;
    let mut scratch = Route::empty();
    search.expand(0, &mut scratch, 0, &mut best)?;

    Ok(best.map_or_else(RouteResult::infeasible, |route| RouteResult {
        route,
        feasible: true,
    }))
}
