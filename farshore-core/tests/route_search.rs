use farshore_core::{
    BudgetPolicy, CancelToken, MustInclude, RegionId, Sector, SectorId, SectorNetwork, UnlockEdge,
    UnlockKind, UnlockedSet, VehicleCapability, calculate_distance, find_best_route,
};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

const REGION: RegionId = RegionId(1);
const SWEEP_SEED: u64 = 0xFA25;
const SWEEP_ITERATIONS: usize = 200;

fn sector(id: u32, min_rank: u8, cost: f32, yield_exp: u32) -> Sector {
    Sector {
        id: SectorId(id),
        region: REGION,
        name: format!("Sector {id}"),
        min_rank,
        travel_cost: cost,
        yield_exp,
        unlock: None,
    }
}

fn capability(rank: u8, range: f32) -> VehicleCapability {
    VehicleCapability {
        rank,
        range,
        ..VehicleCapability::default()
    }
}

fn all_unlocked(network: &SectorNetwork) -> UnlockedSet {
    network.sectors().iter().map(|sector| sector.id).collect()
}

/// A denser survey region: mixed ranks, costs, and yields.
fn survey_region() -> SectorNetwork {
    SectorNetwork::from_sectors(vec![
        sector(1, 1, 2.0, 12),
        sector(2, 1, 3.5, 20),
        sector(3, 2, 5.0, 34),
        sector(4, 3, 4.0, 28),
        sector(5, 3, 7.5, 55),
        sector(6, 5, 6.0, 48),
        sector(7, 5, 9.0, 72),
        sector(8, 7, 11.0, 90),
    ])
    .expect("valid survey region")
}

#[test]
fn rank_gated_scenario_from_locked_to_unlocked() {
    // Root A (rank 1, cost 0, yield 0); B unlocked-from A (rank 5, cost 10, yield 100).
    let network = SectorNetwork::from_sectors(vec![
        Sector {
            id: SectorId(1),
            region: REGION,
            name: "A".into(),
            min_rank: 1,
            travel_cost: 0.0,
            yield_exp: 0,
            unlock: None,
        },
        Sector {
            id: SectorId(2),
            region: REGION,
            name: "B".into(),
            min_rank: 5,
            travel_cost: 10.0,
            yield_exp: 100,
            unlock: Some(UnlockEdge {
                prerequisite: SectorId(1),
                kind: UnlockKind::RoutePoint,
            }),
        },
    ])
    .expect("valid network");

    let locked: UnlockedSet = [SectorId(1)].into_iter().collect();
    let before = find_best_route(
        &network,
        &capability(1, 5.0),
        &locked,
        &MustInclude::none(),
        BudgetPolicy::Unrestricted,
        REGION,
        &CancelToken::new(),
    )
    .expect("search runs");
    assert!(!before.feasible);
    assert!(before.route.is_empty());

    let unlocked: UnlockedSet = [SectorId(1), SectorId(2)].into_iter().collect();
    let after = find_best_route(
        &network,
        &capability(5, 10.0),
        &unlocked,
        &MustInclude::none(),
        BudgetPolicy::Unrestricted,
        REGION,
        &CancelToken::new(),
    )
    .expect("search runs");
    assert!(after.feasible);
    assert_eq!(after.route.stops.as_slice(), &[SectorId(2)]);
}

#[test]
fn feasible_routes_respect_the_budget_and_the_pinned_set() {
    let network = survey_region();
    let unlocked = all_unlocked(&network);
    let mut rng = SmallRng::seed_from_u64(SWEEP_SEED);

    for _ in 0..SWEEP_ITERATIONS {
        let cap = capability(rng.gen_range(1..=8), rng.gen_range(5.0..40.0));
        let must: MustInclude = if rng.r#gen::<bool>() {
            [SectorId(rng.gen_range(1..=2))].into_iter().collect()
        } else {
            MustInclude::none()
        };
        let policy = match rng.gen_range(0..3) {
            0 => BudgetPolicy::Unrestricted,
            1 => BudgetPolicy::Fixed {
                hours: 0,
                minutes: rng.gen_range(5..45),
            },
            _ => BudgetPolicy::Maximize {
                hours: 0,
                minutes: rng.gen_range(5..45),
            },
        };

        let result = find_best_route(
            &network,
            &cap,
            &unlocked,
            &must,
            policy,
            REGION,
            &CancelToken::new(),
        )
        .expect("pinned sectors are always eligible at these ranks");
        if !result.feasible {
            continue;
        }

        let total = calculate_distance(&network, &cap, &result.route.stops).expect("known stops");
        assert!(
            total <= policy.effective_budget(&cap) + 1e-3,
            "route cost {total} exceeded budget"
        );
        for &pinned in must.members() {
            let hits = result
                .route
                .stops
                .iter()
                .filter(|&&id| id == pinned)
                .count();
            assert_eq!(hits, 1, "pinned sector {pinned} should appear exactly once");
        }
        let mut deduped = result.route.stops.to_vec();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(deduped.len(), result.route.stops.len(), "no repeats");
    }
}

#[test]
fn identical_inputs_produce_identical_routes() {
    let network = survey_region();
    let unlocked = all_unlocked(&network);
    let cap = capability(5, 18.0);
    let must: MustInclude = [SectorId(2)].into_iter().collect();
    let policy = BudgetPolicy::Fixed {
        hours: 0,
        minutes: 18,
    };

    let first = find_best_route(
        &network,
        &cap,
        &unlocked,
        &must,
        policy,
        REGION,
        &CancelToken::new(),
    )
    .expect("search runs");
    let second = find_best_route(
        &network,
        &cap,
        &unlocked,
        &must,
        policy,
        REGION,
        &CancelToken::new(),
    )
    .expect("search runs");
    assert_eq!(first, second);
}

#[test]
fn raising_rank_never_lowers_achievable_yield() {
    let network = survey_region();
    let unlocked = all_unlocked(&network);
    let mut previous_yield = 0;

    for rank in 1..=8 {
        let result = find_best_route(
            &network,
            &capability(rank, 20.0),
            &unlocked,
            &MustInclude::none(),
            BudgetPolicy::Unrestricted,
            REGION,
            &CancelToken::new(),
        )
        .expect("search runs");
        assert!(
            result.route.total_yield >= previous_yield,
            "yield regressed at rank {rank}"
        );
        previous_yield = result.route.total_yield;
    }
}

#[test]
fn route_length_respects_port_call_capacity() {
    let network = survey_region();
    let unlocked = all_unlocked(&network);
    let mut cap = capability(8, 1000.0);
    cap.max_stops = 3;

    let result = find_best_route(
        &network,
        &cap,
        &unlocked,
        &MustInclude::none(),
        BudgetPolicy::Unrestricted,
        REGION,
        &CancelToken::new(),
    )
    .expect("search runs");
    assert!(result.feasible);
    assert_eq!(result.route.stops.len(), 3);
    // Best three by yield: sectors 5, 7, 8.
    assert_eq!(
        result.route.stops.as_slice(),
        &[SectorId(5), SectorId(7), SectorId(8)]
    );
}
