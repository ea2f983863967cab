//! Pairwise-constraint star matching
//!
//! Identifies the four stars of an [ObservedQuadruple] among catalog
//! stars by combining per-pair candidate lookups into a compatibility
//! matrix, seeding per-slot match sets, and iterating a neighborhood
//! pruning pass to a fixed point.

//a Imports
use log::{debug, trace};
use std::collections::HashSet;

use crate::quadruple::INCIDENT_PAIRS;
use crate::{Catalog, Error, NeighborTable, ObservedQuadruple, PairTable, TrackerConfig};

//a CompatibilityMatrix
//tp CompatibilityMatrix
/// For each of the six observed pairs, the set of catalog star ids
/// that appear in some catalog pair compatible with it
pub struct CompatibilityMatrix {
    /// `per_pair[p]` is the set of catalog ids compatible with observed pair `p`
    per_pair: [HashSet<usize>; 6],
}

//ip CompatibilityMatrix
impl CompatibilityMatrix {
    //cp build
    /// Build the matrix for one observed quadruple against a pair table
    pub fn build(quadruple: &ObservedQuadruple, pair_table: &PairTable, tolerance_rad: f64) -> Self {
        let mut per_pair: [HashSet<usize>; 6] = std::array::from_fn(|_| HashSet::new());
        for (p, &cos_p) in quadruple.pair_cosines.iter().enumerate() {
            let alpha = cos_p.clamp(-1.0, 1.0).acos();
            let lo = (alpha - tolerance_rad).max(0.0);
            let hi = (alpha + tolerance_rad).min(std::f64::consts::FRAC_PI_2);
            // cosine is monotone decreasing: larger angle -> smaller cosine
            let cos_lo = hi.cos();
            let cos_hi = lo.cos();
            for pair in pair_table.candidates_in_window(cos_lo, cos_hi) {
                per_pair[p].insert(pair.first_id);
                per_pair[p].insert(pair.second_id);
            }
        }
        Self { per_pair }
    }

    //mp for_pair
    /// The compatible catalog id set for a given observed pair index
    pub fn for_pair(&self, p: usize) -> &HashSet<usize> {
        &self.per_pair[p]
    }
}

//a MatchSets
//tp MatchSets
/// Per observed-slot candidate sets, before and during pruning
pub struct MatchSets {
    sets: [HashSet<usize>; 4],
}

//ip MatchSets
impl MatchSets {
    //mp total_len
    /// Sum of the sizes of all four sets
    pub fn total_len(&self) -> usize {
        self.sets.iter().map(HashSet::len).sum()
    }

    //mp get
    pub fn get(&self, slot: usize) -> &HashSet<usize> {
        &self.sets[slot]
    }
}

//a Matcher
//tp Matcher
/// Stateless driver from an [ObservedQuadruple] to a resolved
/// 4-tuple of catalog ids, or a tagged failure
pub struct Matcher;

//ip Matcher
impl Matcher {
    //cp seed_match_sets
    /// Step 3: seed each slot's match set from the compatibility matrix
    fn seed_match_sets(matrix: &CompatibilityMatrix) -> MatchSets {
        let mut sets: [HashSet<usize>; 4] = std::array::from_fn(|_| HashSet::new());
        for (slot, incident) in INCIDENT_PAIRS.iter().enumerate() {
            let mut candidates: Option<HashSet<usize>> = None;
            for &p in incident {
                let set = matrix.for_pair(p);
                candidates = Some(match candidates {
                    None => set.clone(),
                    Some(prev) => prev.intersection(set).copied().collect(),
                });
            }
            sets[slot] = candidates.unwrap_or_default();
        }
        MatchSets { sets }
    }

    //cp prune
    /// Step 4: iterate neighborhood pruning to a fixed point
    fn prune(
        mut match_sets: MatchSets,
        quadruple: &ObservedQuadruple,
        catalog: &Catalog,
        neighbors: &NeighborTable,
        tolerance_rad: f64,
    ) -> MatchSets {
        loop {
            let before = match_sets.total_len();
            for k in 0..4 {
                let mut survivors = HashSet::new();
                for &s in match_sets.sets[k].iter() {
                    let mut ok = true;
                    for kp in 0..4 {
                        if kp == k {
                            continue;
                        }
                        let observed_cos = quadruple.cosine_for(k, kp);
                        let observed_angle = observed_cos.clamp(-1.0, 1.0).acos();
                        let candidate_neighbors = neighbors.of(s);
                        let found = match_sets.sets[kp].iter().any(|t| {
                            if !candidate_neighbors.contains(t) {
                                return false;
                            }
                            let Some(cs) = catalog.find_sorted(s) else {
                                return false;
                            };
                            let Some(ct) = catalog.find_sorted(*t) else {
                                return false;
                            };
                            let c = catalog[cs].cos_angle_between(&catalog[ct]);
                            let angle = c.clamp(-1.0, 1.0).acos();
                            (angle - observed_angle).abs() <= tolerance_rad
                        });
                        if !found {
                            ok = false;
                            break;
                        }
                    }
                    if ok {
                        survivors.insert(s);
                    }
                }
                match_sets.sets[k] = survivors;
            }
            let after = match_sets.total_len();
            trace!("pruning pass: {before} -> {after} total candidates");
            if after == before || after == 0 {
                break;
            }
        }
        match_sets
    }

    //cp identify
    /// Run the full matching algorithm (§4.5) on one observed
    /// quadruple, returning the resolved catalog ids in slot order
    pub fn identify(
        quadruple: &ObservedQuadruple,
        catalog: &Catalog,
        pair_table: &PairTable,
        neighbors: &NeighborTable,
        config: &TrackerConfig,
    ) -> Result<[usize; 4], Error> {
        let tolerance_rad = config.match_tolerance_rad();
        let matrix = CompatibilityMatrix::build(quadruple, pair_table, tolerance_rad);
        let seeded = Self::seed_match_sets(&matrix);
        let pruned = Self::prune(seeded, quadruple, catalog, neighbors, tolerance_rad);

        for slot in 0..4 {
            if pruned.get(slot).is_empty() {
                debug!("matcher: slot {slot} empty after pruning");
                return Err(Error::NoMatch);
            }
        }
        for slot in 0..4 {
            let candidates = pruned.get(slot).len();
            if candidates > 1 {
                debug!("matcher: slot {slot} ambiguous with {candidates} candidates");
                return Err(Error::Ambiguous { slot, candidates });
            }
        }

        let mut result = [0usize; 4];
        for slot in 0..4 {
            result[slot] = *pruned.get(slot).iter().next().unwrap();
        }
        Ok(result)
    }

    //cp identify_any
    /// Try each candidate quadruple in order, returning the first
    /// successful identification; if every quadruple fails, returns
    /// the last failure observed
    pub fn identify_any(
        quadruples: &[ObservedQuadruple],
        catalog: &Catalog,
        pair_table: &PairTable,
        neighbors: &NeighborTable,
        config: &TrackerConfig,
    ) -> Result<(usize, [usize; 4]), Error> {
        let mut last_err = Error::NoMatch;
        for (i, quadruple) in quadruples.iter().enumerate() {
            debug!("matcher: attempting quadruple {i} of {}", quadruples.len());
            match Self::identify(quadruple, catalog, pair_table, neighbors, config) {
                Ok(ids) => return Ok((i, ids)),
                Err(e) => last_err = e,
            }
        }
        Err(last_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ObservedStar, Star};

    /// Six catalog stars arranged so that four of them, viewed
    /// head-on, reproduce a known observed quadruple exactly
    fn setup() -> (Catalog, PairTable, NeighborTable, TrackerConfig) {
        let mut catalog = Catalog::default();
        // place 6 stars within a ~20 degree patch, well separated
        let positions = [
            (0.00, 0.00),
            (0.05, 0.00),
            (0.00, 0.05),
            (0.05, 0.05),
            (0.30, 0.30),
            (-0.30, -0.30),
        ];
        for (i, (ra, de)) in positions.iter().enumerate() {
            catalog.add_star(Star::new(i, *ra, *de, 0.0, 3.0, 0.0));
        }
        catalog.sort();

        let mut config = TrackerConfig {
            magnitude_limit: 6.0,
            ..Default::default()
        };
        config.pair_angle_bounds_deg = (0.001, 30.0);
        config.match_tolerance_deg = 0.5;

        let pair_table = PairTable::build(&catalog, &config);
        let neighbors = NeighborTable::build(&pair_table);
        (catalog, pair_table, neighbors, config)
    }

    #[test]
    fn identifies_exact_quadruple() {
        let (catalog, pair_table, neighbors, config) = setup();
        let ids = [0usize, 1, 2, 3];
        let stars: Vec<_> = ids.iter().map(|&i| catalog[catalog.find_sorted(i).unwrap()].clone()).collect();

        // Build an observed quadruple whose pairwise angles exactly match
        // the catalog stars 0..3, by directly setting cosines from the catalog
        let mut pair_cosines = [0.0; 6];
        for (p, &(a, b)) in crate::quadruple::PAIR_STARS.iter().enumerate() {
            pair_cosines[p] = stars[a].cos_angle_between(&stars[b]);
        }
        let observed = ObservedQuadruple {
            stars: [
                ObservedStar { pixel_count: 10, position: (0.0, 0.0) },
                ObservedStar { pixel_count: 9, position: (1.0, 0.0) },
                ObservedStar { pixel_count: 8, position: (0.0, 1.0) },
                ObservedStar { pixel_count: 7, position: (1.0, 1.0) },
            ],
            pair_cosines,
        };

        let result = Matcher::identify(&observed, &catalog, &pair_table, &neighbors, &config);
        assert!(result.is_ok(), "expected a match, got {result:?}");
        let ids = result.unwrap();
        let mut sorted = ids;
        sorted.sort_unstable();
        assert_eq!(sorted, [0, 1, 2, 3]);
    }

    #[test]
    fn no_match_for_impossible_angles() {
        let (catalog, pair_table, neighbors, config) = setup();
        let observed = ObservedQuadruple {
            stars: [
                ObservedStar { pixel_count: 10, position: (0.0, 0.0) },
                ObservedStar { pixel_count: 9, position: (1.0, 0.0) },
                ObservedStar { pixel_count: 8, position: (0.0, 1.0) },
                ObservedStar { pixel_count: 7, position: (1.0, 1.0) },
            ],
            // angles far outside anything in the tiny catalog's pair table
            pair_cosines: [-0.9, -0.9, -0.9, -0.9, -0.9, -0.9],
        };
        let result = Matcher::identify(&observed, &catalog, &pair_table, &neighbors, &config);
        assert!(matches!(result, Err(Error::NoMatch)));
    }

    #[test]
    fn ambiguous_when_two_catalog_quadruples_share_geometry() {
        // Two identical quadrilaterals of stars, one rotated about the polar
        // axis by ~2 radians relative to the other: a rotation about z
        // preserves every pairwise dot product, so ids 4..7 reproduce ids
        // 0..3's pairwise cosines exactly, while sitting far enough away
        // (~115 degrees) that no cross-cluster pair lands in the pair table.
        let base_positions = [(0.00, 0.00), (0.05, 0.00), (0.00, 0.05), (0.05, 0.05)];
        let shift = 2.0;

        let mut catalog = Catalog::default();
        for (i, (ra, de)) in base_positions.iter().enumerate() {
            catalog.add_star(Star::new(i, *ra, *de, 0.0, 3.0, 0.0));
        }
        for (i, (ra, de)) in base_positions.iter().enumerate() {
            catalog.add_star(Star::new(i + 4, *ra + shift, *de, 0.0, 3.0, 0.0));
        }
        catalog.sort();

        let mut config = TrackerConfig {
            magnitude_limit: 6.0,
            ..Default::default()
        };
        config.pair_angle_bounds_deg = (0.001, 30.0);
        config.match_tolerance_deg = 0.5;

        let pair_table = PairTable::build(&catalog, &config);
        let neighbors = NeighborTable::build(&pair_table);

        let ids = [0usize, 1, 2, 3];
        let stars: Vec<_> = ids
            .iter()
            .map(|&i| catalog[catalog.find_sorted(i).unwrap()].clone())
            .collect();
        let mut pair_cosines = [0.0; 6];
        for (p, &(a, b)) in crate::quadruple::PAIR_STARS.iter().enumerate() {
            pair_cosines[p] = stars[a].cos_angle_between(&stars[b]);
        }
        let observed = ObservedQuadruple {
            stars: [
                ObservedStar { pixel_count: 10, position: (0.0, 0.0) },
                ObservedStar { pixel_count: 9, position: (1.0, 0.0) },
                ObservedStar { pixel_count: 8, position: (0.0, 1.0) },
                ObservedStar { pixel_count: 7, position: (1.0, 1.0) },
            ],
            pair_cosines,
        };

        let result = Matcher::identify(&observed, &catalog, &pair_table, &neighbors, &config);
        match result {
            Err(Error::Ambiguous { candidates, .. }) => assert_eq!(candidates, 2),
            other => panic!("expected Ambiguous with 2 candidates, got {other:?}"),
        }
    }
}
