//! Prerequisite-chain resolution over the unlock forest.
use std::collections::HashSet;
use thiserror::Error;

use crate::sector::{SectorId, SectorNetwork, UnlockEdge};

/// Errors raised while resolving an unlock chain.
#[derive(Debug, Error, PartialEq)]
pub enum ResolverError {
    #[error("sector {sector} is not present in the network")]
    NotFound { sector: SectorId },
    #[error("sector {sector} requires {missing}, which is not in the network")]
    BrokenEdge { sector: SectorId, missing: SectorId },
    #[error("unlock chain revisits sector {sector}")]
    CycleDetected { sector: SectorId },
}

/// Walk prerequisite edges from `target` back to a root.
///
/// Returns the chain in leaf-to-root order; callers reverse it to present the
/// forward unlock order. A root sector yields an empty chain. Well-formed data
/// has no cycles, but a revisited id fails rather than loops.
///
/// # Errors
///
/// `NotFound` when `target` is unknown, `BrokenEdge` when a prerequisite
/// points outside the network, `CycleDetected` on a repeated sector id.
pub fn find_unlock_path(
    network: &SectorNetwork,
    target: SectorId,
) -> Result<Vec<(SectorId, UnlockEdge)>, ResolverError> {
    if !network.contains(target) {
        return Err(ResolverError::NotFound { sector: target });
    }

    let mut chain = Vec::new();
    let mut visited = HashSet::new();
    let mut current = target;
    visited.insert(current);

    while let Some(edge) = network.unlock_edge(current) {
        chain.push((current, edge));
        if !network.contains(edge.prerequisite) {
            return Err(ResolverError::BrokenEdge {
                sector: current,
                missing: edge.prerequisite,
            });
        }
        current = edge.prerequisite;
        if !visited.insert(current) {
            return Err(ResolverError::CycleDetected { sector: current });
        }
    }

    Ok(chain)
}

/// Number of prerequisite hops between `target` and its root.
///
/// # Errors
///
/// Propagates the same failures as [`find_unlock_path`].
pub fn unlock_depth(network: &SectorNetwork, target: SectorId) -> Result<usize, ResolverError> {
    find_unlock_path(network, target).map(|chain| chain.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sector::{RegionId, Sector, UnlockKind};

    fn sector(id: u32, unlock: Option<(u32, UnlockKind)>) -> Sector {
        Sector {
            id: SectorId(id),
            region: RegionId(1),
            name: format!("Sector {id}"),
            min_rank: 1,
            travel_cost: 1.0,
            yield_exp: 0,
            unlock: unlock.map(|(prerequisite, kind)| UnlockEdge {
                prerequisite: SectorId(prerequisite),
                kind,
            }),
        }
    }

    fn chain_network() -> SectorNetwork {
        SectorNetwork::from_sectors(vec![
            sector(1, None),
            sector(2, Some((1, UnlockKind::RoutePoint))),
            sector(3, Some((2, UnlockKind::Region))),
        ])
        .expect("valid network")
    }

    #[test]
    fn root_sector_has_empty_chain() {
        let network = chain_network();
        let chain = find_unlock_path(&network, SectorId(1)).expect("root resolves");
        assert!(chain.is_empty());
    }

    #[test]
    fn chain_is_leaf_to_root_with_matching_depth() {
        let network = chain_network();
        let chain = find_unlock_path(&network, SectorId(3)).expect("chain resolves");
        let ids: Vec<u32> = chain.iter().map(|(id, _)| id.0).collect();
        assert_eq!(ids, vec![3, 2]);
        assert_eq!(unlock_depth(&network, SectorId(3)), Ok(2));
        assert_eq!(chain[0].1.kind, UnlockKind::Region);
    }

    #[test]
    fn unknown_target_is_not_found() {
        let network = chain_network();
        assert_eq!(
            find_unlock_path(&network, SectorId(42)),
            Err(ResolverError::NotFound {
                sector: SectorId(42)
            })
        );
    }

    #[test]
    fn dangling_prerequisite_is_a_broken_edge() {
        let network = SectorNetwork::from_sectors(vec![sector(
            7,
            Some((99, UnlockKind::RoutePoint)),
        )])
        .expect("valid network");
        assert_eq!(
            find_unlock_path(&network, SectorId(7)),
            Err(ResolverError::BrokenEdge {
                sector: SectorId(7),
                missing: SectorId(99),
            })
        );
    }

    #[test]
    fn cycle_fails_instead_of_looping() {
        let network = SectorNetwork::from_sectors(vec![
            sector(1, Some((2, UnlockKind::RoutePoint))),
            sector(2, Some((1, UnlockKind::RoutePoint))),
        ])
        .expect("valid network");
        assert_eq!(
            find_unlock_path(&network, SectorId(1)),
            Err(ResolverError::CycleDetected {
                sector: SectorId(1)
            })
        );
    }
}
