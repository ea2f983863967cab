//! Catalog pair and neighbor table generation
//!
//! Converts a magnitude-filtered catalog into the sorted list of
//! star pairs that could plausibly appear together in one frame (a
//! [PairTable]), and the per-star adjacency derived from it (a
//! [NeighborTable]). Both are computed once, offline, and persisted
//! (see [crate::persist]) for reuse across many identification runs.

//a Imports
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::{Catalog, TrackerConfig};

//a CatalogPair
//tp CatalogPair
/// A single catalog star pair with its precomputed cosine-separation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CatalogPair {
    /// The lower of the two catalog star ids
    pub first_id: usize,
    /// The higher of the two catalog star ids
    pub second_id: usize,
    /// Cosine of the angle between the two stars
    pub cosine_separation: f64,
}

//a PairTable
//tp PairTable
/// A catalog's viable star pairs, sorted ascending by cosine-separation
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PairTable {
    pairs: Vec<CatalogPair>,
}

//ip PairTable
impl PairTable {
    //ap len
    /// Number of pairs in the table
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    //ap is_empty
    /// True if the table has no pairs
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    //ap pairs
    /// Iterate over all pairs, in ascending cosine-separation order
    pub fn pairs(&self) -> &[CatalogPair] {
        &self.pairs
    }

    //mp candidates_in_window
    /// Binary-search the table for every pair whose cosine lies in
    /// `[cos_lo, cos_hi]` (inclusive both ends); the table is sorted
    /// ascending by cosine so this is a single contiguous slice
    pub fn candidates_in_window(&self, cos_lo: f64, cos_hi: f64) -> &[CatalogPair] {
        let start = self
            .pairs
            .partition_point(|p| p.cosine_separation < cos_lo);
        let end = self
            .pairs
            .partition_point(|p| p.cosine_separation <= cos_hi);
        if start >= end {
            &[]
        } else {
            &self.pairs[start..end]
        }
    }

    //cp build
    /// Build a [PairTable] from a catalog, retaining only pairs
    /// whose angular separation lies in the config's
    /// `pair_angle_bounds_deg`, closed on both ends
    pub fn build(catalog: &Catalog, config: &TrackerConfig) -> Self {
        let min_angle = config.min_angle_rad();
        let max_angle = config.max_angle_rad();
        // cos is monotone decreasing on [0, pi]: the larger angle gives the smaller cosine
        let cos_hi = min_angle.cos();
        let cos_lo = max_angle.cos();

        // `Star::brighter_than` is a strict `<`; the pair generator's magnitude
        // cutoff is inclusive (a star at exactly `magnitude_limit` is kept)
        let stars: Vec<_> = catalog
            .iter_stars()
            .filter(|s| s.mag() <= config.magnitude_limit)
            .collect();

        let mut pairs = vec![];
        for (i, a) in stars.iter().enumerate() {
            for b in stars[i + 1..].iter() {
                let c = a.cos_angle_between(*b);
                if c >= cos_lo && c <= cos_hi {
                    let (first_id, second_id) = if a.id() < b.id() {
                        (a.id(), b.id())
                    } else {
                        (b.id(), a.id())
                    };
                    pairs.push(CatalogPair {
                        first_id,
                        second_id,
                        cosine_separation: c,
                    });
                }
            }
        }
        pairs.sort_by(|a, b| a.cosine_separation.partial_cmp(&b.cosine_separation).unwrap());
        debug!(
            "built pair table: {} stars brighter than {}, {} pairs in [{:.4}, {:.4}] rad",
            stars.len(),
            config.magnitude_limit,
            pairs.len(),
            min_angle,
            max_angle
        );
        Self { pairs }
    }
}

//a NeighborTable
//tp NeighborTable
/// Per-star adjacency derived from a [PairTable]: for each catalog
/// star id appearing in any retained pair, the set of other star ids
/// it pairs with
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct NeighborTable {
    neighbors: std::collections::HashMap<usize, HashSet<usize>>,
}

//ip NeighborTable
impl NeighborTable {
    //cp build
    /// Derive a [NeighborTable] from a [PairTable]
    pub fn build(pair_table: &PairTable) -> Self {
        let mut neighbors: std::collections::HashMap<usize, HashSet<usize>> = Default::default();
        for pair in pair_table.pairs() {
            neighbors
                .entry(pair.first_id)
                .or_default()
                .insert(pair.second_id);
            neighbors
                .entry(pair.second_id)
                .or_default()
                .insert(pair.first_id);
        }
        debug!("built neighbor table: {} stars with neighbors", neighbors.len());
        Self { neighbors }
    }

    //mp of
    /// The neighbor set of a given star id, empty if it has none
    pub fn of(&self, id: usize) -> &HashSet<usize> {
        static EMPTY: std::sync::OnceLock<HashSet<usize>> = std::sync::OnceLock::new();
        self.neighbors
            .get(&id)
            .unwrap_or_else(|| EMPTY.get_or_init(HashSet::new))
    }

    //mp is_symmetric
    /// Verify the symmetry invariant: `b` is a neighbor of `a` iff
    /// `a` is a neighbor of `b`; used by tests, not on any hot path
    pub fn is_symmetric(&self) -> bool {
        self.neighbors.iter().all(|(&a, bs)| {
            bs.iter().all(|&b| self.of(b).contains(&a))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Star;

    fn triangle_catalog() -> Catalog {
        let mut catalog = Catalog::default();
        catalog.add_star(Star::new(0, 0.0, 0.0, 0.0, 1.0, 0.0));
        catalog.add_star(Star::new(1, 0.1, 0.0, 0.0, 1.0, 0.0));
        catalog.add_star(Star::new(2, 0.0, 0.1, 0.0, 1.0, 0.0));
        catalog.add_star(Star::new(3, 3.0, 0.0, 0.0, 12.0, 0.0));
        catalog.sort();
        catalog
    }

    #[test]
    fn pairs_are_sorted_and_bounded() {
        let catalog = triangle_catalog();
        let mut config = TrackerConfig {
            magnitude_limit: 6.0,
            ..Default::default()
        };
        config.pair_angle_bounds_deg = (0.01, 20.0);
        let table = PairTable::build(&catalog, &config);
        assert!(table.len() >= 2);
        let mut last = -2.0;
        for p in table.pairs() {
            assert!(p.cosine_separation >= last);
            last = p.cosine_separation;
            assert!(p.first_id < p.second_id);
        }
    }

    #[test]
    fn neighbor_table_is_symmetric() {
        let catalog = triangle_catalog();
        let mut config = TrackerConfig::default();
        config.pair_angle_bounds_deg = (0.01, 20.0);
        let pairs = PairTable::build(&catalog, &config);
        let neighbors = NeighborTable::build(&pairs);
        assert!(neighbors.is_symmetric());
    }

    #[test]
    fn faint_star_excluded() {
        let catalog = triangle_catalog();
        let mut config = TrackerConfig {
            magnitude_limit: 6.0,
            ..Default::default()
        };
        config.pair_angle_bounds_deg = (0.01, 20.0);
        let table = PairTable::build(&catalog, &config);
        for p in table.pairs() {
            assert_ne!(p.first_id, 3);
            assert_ne!(p.second_id, 3);
        }
    }

    #[test]
    fn star_at_magnitude_limit_is_kept() {
        let mut catalog = Catalog::default();
        catalog.add_star(Star::new(0, 0.0, 0.0, 0.0, 1.0, 0.0));
        // a star exactly at the cutoff must be retained, not dropped
        catalog.add_star(Star::new(1, 0.1, 0.0, 0.0, 6.0, 0.0));
        catalog.sort();

        let mut config = TrackerConfig {
            magnitude_limit: 6.0,
            ..Default::default()
        };
        config.pair_angle_bounds_deg = (0.01, 20.0);
        let table = PairTable::build(&catalog, &config);
        assert_eq!(table.len(), 1);
        assert_eq!(table.pairs()[0].first_id, 0);
        assert_eq!(table.pairs()[0].second_id, 1);
    }
}
