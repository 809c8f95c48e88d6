//! Farshore Voyage Planning Engine
//!
//! Platform-agnostic core logic for planning exploratory voyages over a
//! rank-gated sector network: route optimization, unlock-prerequisite
//! resolution, and predictive condition/experience modelling. This crate
//! performs no rendering and no persistence; the host supplies read-only
//! snapshots (network, unlocked sets, vehicle state) and receives plain data.

pub mod budget;
pub mod dispatch;
pub mod numbers;
pub mod optimizer;
pub mod predict;
pub mod route;
pub mod sector;
pub mod unlock;
pub mod vehicle;

// Re-export commonly used types
pub use budget::{BudgetPolicy, MAX_BUDGET_HOURS};
pub use dispatch::{CancelToken, RequestSlot, SearchTicket};
pub use optimizer::{ConstraintError, OptimizerError, find_best_route};
pub use predict::{
    RankTable, UNBOUNDED_VOYAGES, VoyageOutcome, calculate_until_repair, predict_durability,
    predict_exp_growth, project_outcome,
};
pub use route::{
    DistanceError, MAX_MUST_INCLUDE, MustInclude, MustIncludeError, Route, RouteResult, RouteSeq,
    UnlockedSet, calculate_distance,
};
pub use sector::{
    NetworkError, NetworkLoadError, RegionId, Sector, SectorId, SectorNetwork, UnlockEdge,
    UnlockKind,
};
pub use unlock::{ResolverError, find_unlock_path, unlock_depth};
pub use vehicle::{Part, PartCondition, VehicleCapability, VehicleState};

#[cfg(feature = "async")]
pub use dispatch::spawn_search;
