//! Static sector network: the map the voyage planner operates on.
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Stable identifier of a sector, unique within a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectorId(pub u32);

impl std::fmt::Display for SectorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of the region a sector belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(pub u16);

/// What kind of progress unlocking a sector grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnlockKind {
    /// Opens a single route point.
    RoutePoint,
    /// Opens an entire region.
    Region,
    /// Gated behind a vehicle-part unlock.
    VehiclePart,
}

/// Single-parent prerequisite link gating access to a sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockEdge {
    /// Sector that must be unlocked first.
    pub prerequisite: SectorId,
    /// Classification of the progress unlocking grants.
    pub kind: UnlockKind,
}

/// A discrete node in the exploration network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sector {
    pub id: SectorId,
    pub region: RegionId,
    /// Human-readable destination name.
    pub name: String,
    /// Minimum vehicle rank required to enter.
    pub min_rank: u8,
    /// Cost consumed when a route visits this sector.
    pub travel_cost: f32,
    /// Experience granted on a successful visit.
    #[serde(default)]
    pub yield_exp: u32,
    /// Prerequisite edge; absent for root sectors.
    #[serde(default)]
    pub unlock: Option<UnlockEdge>,
}

/// Errors raised when a sector network fails load-time validation.
#[derive(Debug, Error, PartialEq)]
pub enum NetworkError {
    #[error("duplicate sector id {id}")]
    DuplicateSector { id: SectorId },
    #[error("sector {id} has negative travel cost {cost:.2}")]
    NegativeCost { id: SectorId, cost: f32 },
}

/// Immutable arena of sectors indexed by id.
///
/// Loaded once at startup from game-data tables and shared read-only by every
/// owner and thread; nothing here is mutated after construction.
#[derive(Debug, Clone, Default)]
pub struct SectorNetwork {
    sectors: Vec<Sector>,
    index: HashMap<SectorId, usize>,
}

impl SectorNetwork {
    /// Create an empty network (useful for tests).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a network from pre-parsed sectors, validating integrity.
    ///
    /// # Errors
    ///
    /// Returns an error on duplicate ids or negative travel costs.
    pub fn from_sectors(sectors: Vec<Sector>) -> Result<Self, NetworkError> {
        let mut index = HashMap::with_capacity(sectors.len());
        for (position, sector) in sectors.iter().enumerate() {
            if sector.travel_cost < 0.0 || sector.travel_cost.is_nan() {
                return Err(NetworkError::NegativeCost {
                    id: sector.id,
                    cost: sector.travel_cost,
                });
            }
            if index.insert(sector.id, position).is_some() {
                return Err(NetworkError::DuplicateSector { id: sector.id });
            }
        }
        Ok(Self { sectors, index })
    }

    /// Load a network from a JSON string supplied by the host environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or fails validation.
    pub fn from_json(json: &str) -> Result<Self, NetworkLoadError> {
        let sectors: Vec<Sector> = serde_json::from_str(json)?;
        Ok(Self::from_sectors(sectors)?)
    }

    /// Look up a sector by id.
    #[must_use]
    pub fn sector(&self, id: SectorId) -> Option<&Sector> {
        self.index.get(&id).map(|&position| &self.sectors[position])
    }

    /// Returns true when the id is present in the network.
    #[must_use]
    pub fn contains(&self, id: SectorId) -> bool {
        self.index.contains_key(&id)
    }

    /// Prerequisite edge for a sector, if it has one.
    #[must_use]
    pub fn unlock_edge(&self, id: SectorId) -> Option<UnlockEdge> {
        self.sector(id).and_then(|sector| sector.unlock)
    }

    /// All sectors, in load order.
    #[must_use]
    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    /// Sectors belonging to a region, in ascending id order.
    #[must_use]
    pub fn sectors_in_region(&self, region: RegionId) -> Vec<&Sector> {
        let mut members: Vec<&Sector> = self
            .sectors
            .iter()
            .filter(|sector| sector.region == region)
            .collect();
        members.sort_by_key(|sector| sector.id);
        members
    }

    /// Highest rank requirement anywhere in the network.
    #[must_use]
    pub fn max_rank(&self) -> u8 {
        self.sectors
            .iter()
            .map(|sector| sector.min_rank)
            .max()
            .unwrap_or(0)
    }

    /// Number of sectors in the network.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sectors.len()
    }

    /// Returns true when the network holds no sectors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }
}

/// Errors raised while loading a network from JSON.
#[derive(Debug, Error)]
pub enum NetworkLoadError {
    #[error("network JSON malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] NetworkError),
}
