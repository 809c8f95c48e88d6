//! Shared networks and capability generators for scenario sweeps.
use farshore_core::{
    RankTable, RegionId, Sector, SectorId, SectorNetwork, UnlockEdge, UnlockKind, UnlockedSet,
    VehicleCapability,
};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Region used by all built-in scenario networks.
pub const SURVEY_REGION: RegionId = RegionId(1);

fn sector(id: u32, min_rank: u8, cost: f32, yield_exp: u32, unlock: Option<u32>) -> Sector {
    Sector {
        id: SectorId(id),
        region: SURVEY_REGION,
        name: format!("Survey point {id}"),
        min_rank,
        travel_cost: cost,
        yield_exp,
        unlock: unlock.map(|prerequisite| UnlockEdge {
            prerequisite: SectorId(prerequisite),
            kind: UnlockKind::RoutePoint,
        }),
    }
}

/// A realistic survey region: a dozen sectors with an unlock chain down the
/// high-rank end.
pub fn survey_network() -> SectorNetwork {
    SectorNetwork::from_sectors(vec![
        sector(1, 1, 1.5, 8, None),
        sector(2, 1, 2.0, 12, None),
        sector(3, 1, 3.5, 20, Some(1)),
        sector(4, 2, 4.0, 26, Some(2)),
        sector(5, 3, 5.5, 38, Some(3)),
        sector(6, 3, 6.0, 42, Some(4)),
        sector(7, 4, 7.5, 55, Some(5)),
        sector(8, 5, 8.0, 60, Some(6)),
        sector(9, 6, 10.0, 78, Some(7)),
        sector(10, 7, 12.0, 95, Some(8)),
        sector(11, 8, 14.0, 115, Some(9)),
        sector(12, 9, 16.5, 140, Some(10)),
    ])
    .expect("built-in survey network is valid")
}

/// The two-sector network from the acceptance scenario: root A and
/// rank-gated B unlocked from it.
pub fn gatepost_network() -> SectorNetwork {
    SectorNetwork::from_sectors(vec![
        sector(1, 1, 0.0, 0, None),
        sector(2, 5, 10.0, 100, Some(1)),
    ])
    .expect("gatepost network is valid")
}

/// Every sector id in the network.
pub fn all_unlocked(network: &SectorNetwork) -> UnlockedSet {
    network.sectors().iter().map(|sector| sector.id).collect()
}

/// Rank threshold table sized for the survey network.
pub fn survey_rank_table() -> RankTable {
    RankTable::from_thresholds(vec![60, 120, 240, 480, 900, 1500, 2400, 3600, 5200])
}

/// Draw a random but plausible capability for sweep testing.
pub fn random_capability(rng: &mut ChaCha8Rng) -> VehicleCapability {
    VehicleCapability {
        rank: rng.gen_range(1..=10),
        range: rng.gen_range(4.0..60.0),
        speed_factor: rng.gen_range(0.5..2.0),
        favor_discount: rng.gen_range(0.0..0.5),
        max_stops: rng.gen_range(1..=5),
    }
}
