//! Route primitives shared by the optimizer and display code.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::sector::{Sector, SectorId, SectorNetwork};
use crate::vehicle::VehicleCapability;

/// Set of sector ids currently reachable for an owner; read-only input.
pub type UnlockedSet = HashSet<SectorId>;

/// Maximum stop capacity stored inline without additional allocations.
pub type RouteSeq = SmallVec<[SectorId; 5]>;

/// Maximum number of operator-pinned sectors per search.
pub const MAX_MUST_INCLUDE: usize = 5;

/// Errors raised when building a must-include set.
#[derive(Debug, Error, PartialEq)]
pub enum MustIncludeError {
    #[error("must-include set is limited to {MAX_MUST_INCLUDE} sectors")]
    CapacityExceeded,
}

/// Ordered-insertion set of sectors every returned route must visit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MustInclude {
    members: SmallVec<[SectorId; 5]>,
}

impl MustInclude {
    /// Empty set: no pinned sectors.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Add a sector, preserving insertion order. Duplicates are no-ops.
    ///
    /// # Errors
    ///
    /// Returns `CapacityExceeded` when a sixth distinct sector is added.
    pub fn insert(&mut self, id: SectorId) -> Result<(), MustIncludeError> {
        if self.members.contains(&id) {
            return Ok(());
        }
        if self.members.len() >= MAX_MUST_INCLUDE {
            return Err(MustIncludeError::CapacityExceeded);
        }
        self.members.push(id);
        Ok(())
    }

    /// Members in insertion order.
    #[must_use]
    pub fn members(&self) -> &[SectorId] {
        &self.members
    }

    #[must_use]
    pub fn contains(&self, id: SectorId) -> bool {
        self.members.contains(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl FromIterator<SectorId> for MustInclude {
    /// Collects at most [`MAX_MUST_INCLUDE`] distinct ids; the overflow is the
    /// caller layer's to reject, so surplus entries are dropped here.
    fn from_iter<T: IntoIterator<Item = SectorId>>(iter: T) -> Self {
        let mut set = Self::none();
        for id in iter {
            if set.insert(id).is_err() {
                break;
            }
        }
        set
    }
}

/// Ordered, duplicate-free sequence of sectors satisfying all constraints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Stops in visit order.
    pub stops: RouteSeq,
    /// Cumulative adjusted travel cost.
    pub total_cost: f32,
    /// Total experience yield across stops.
    pub total_yield: u32,
}

impl Route {
    /// The empty route returned for infeasible searches.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}

/// Optimizer outcome: the best route found plus the feasibility flag the
/// caller surfaces to the operator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    pub route: Route,
    /// False when no candidate satisfied the constraints.
    pub feasible: bool,
}

impl RouteResult {
    /// Negative result: empty route, not optimized.
    #[must_use]
    pub fn infeasible() -> Self {
        Self::default()
    }
}

/// Errors raised by distance calculation over a sector sequence.
#[derive(Debug, Error, PartialEq)]
pub enum DistanceError {
    #[error("sector {sector} is not present in the network")]
    UnknownSector { sector: SectorId },
}

/// Per-capability visit costs for a set of eligible sectors.
///
/// The visit cost depends only on the destination sector and the vehicle's
/// modifiers, so the dense pair matrix collapses to one column per sector.
#[derive(Debug, Clone)]
pub struct CostMatrix {
    costs: HashMap<SectorId, f32>,
}

impl CostMatrix {
    /// Precompute adjusted visit costs for the given sectors.
    #[must_use]
    pub fn build(capability: &VehicleCapability, sectors: &[&Sector]) -> Self {
        let costs = sectors
            .iter()
            .map(|sector| (sector.id, capability.adjusted_cost(sector.travel_cost)))
            .collect();
        Self { costs }
    }

    /// Adjusted cost of visiting a sector, if it was precomputed.
    #[must_use]
    pub fn visit_cost(&self, id: SectorId) -> Option<f32> {
        self.costs.get(&id).copied()
    }
}

/// Deterministic cumulative travel cost of a sector sequence.
///
/// Shared by route search and by display code so both always agree on what a
/// route costs.
///
/// # Errors
///
/// Returns `UnknownSector` when the sequence references an id outside the
/// network.
pub fn calculate_distance(
    network: &SectorNetwork,
    capability: &VehicleCapability,
    sequence: &[SectorId],
) -> Result<f32, DistanceError> {
    let mut total = 0.0_f32;
    for &id in sequence {
        let sector = network
            .sector(id)
            .ok_or(DistanceError::UnknownSector { sector: id })?;
        total += capability.adjusted_cost(sector.travel_cost);
    }
    Ok(total)
}
