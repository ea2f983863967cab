//! Observed-quadruple construction
//!
//! Chooses candidate 4-subsets of observed stars and computes their
//! six pairwise cosine-separations under the fixed pair-index
//! convention the matcher (§ [crate::matcher]) relies on.

//a Imports
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::{ObservedStar, TrackerConfig};

//a Pair-index convention
//tp PAIR_STARS
/// `PAIR_STARS[p] = (i, j)`: the two observed-star slots making up pair index `p`
pub const PAIR_STARS: [(usize, usize); 6] = [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)];

//tp INCIDENT_PAIRS
/// `INCIDENT_PAIRS[k]`: the pair indices incident on observed-star slot `k`
pub const INCIDENT_PAIRS: [[usize; 3]; 4] = [[0, 1, 2], [0, 3, 4], [1, 3, 5], [2, 4, 5]];

//fi pair_index
/// The pair index for an (unordered) pair of observed-star slots
pub fn pair_index(i: usize, j: usize) -> usize {
    let (lo, hi) = if i < j { (i, j) } else { (j, i) };
    PAIR_STARS
        .iter()
        .position(|&(a, b)| a == lo && b == hi)
        .expect("invalid observed-star slot pair")
}

//a ObservedQuadruple
//tp ObservedQuadruple
/// Four observed stars and their six pairwise cosine-separations,
/// indexed by the fixed convention in [PAIR_STARS]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservedQuadruple {
    /// The four observed stars, in slot order `0..3`
    pub stars: [ObservedStar; 4],
    /// The six pairwise cosines, indexed by [PAIR_STARS] order
    pub pair_cosines: [f64; 6],
}

//ip ObservedQuadruple
impl ObservedQuadruple {
    //cp from_stars
    /// Build a quadruple from four observed stars, computing its
    /// pairwise cosines from pixel distances and the configured field of view
    pub fn from_stars(stars: [ObservedStar; 4], frame_width: f64, config: &TrackerConfig) -> Self {
        let fov_rad = config.fov_rad();
        let mut pair_cosines = [0.0; 6];
        for (p, &(i, j)) in PAIR_STARS.iter().enumerate() {
            let (x1, y1) = stars[i].position;
            let (x2, y2) = stars[j].position;
            let d = ((x1 - x2).powi(2) + (y1 - y2).powi(2)).sqrt();
            let theta = (d / frame_width) * fov_rad;
            pair_cosines[p] = theta.cos();
        }
        Self {
            stars,
            pair_cosines,
        }
    }

    //mp cosine_for
    /// The cosine of the observed angle between slots `i` and `j`
    pub fn cosine_for(&self, i: usize, j: usize) -> f64 {
        self.pair_cosines[pair_index(i, j)]
    }
}

//a QuadrupleBuilder
//tp QuadrupleBuilder
/// Produces the sequence of candidate quadruples the matcher will try,
/// in order: the four brightest stars first, then up to `max_quadruples - 1`
/// distinct random 4-subsets
pub struct QuadrupleBuilder {
    rng: StdRng,
}

//ip QuadrupleBuilder
impl QuadrupleBuilder {
    //cp new
    /// Create a builder; with `seed` unset, uses a fresh OS-seeded RNG,
    /// matching the determinism hook `rng_seed` gives callers that want it
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(rand::thread_rng()).expect("OS RNG unavailable"),
        };
        Self { rng }
    }

    //mp build
    /// Build the candidate quadruple sequence from a brightness-sorted
    /// observed-star list (as returned by [crate::imager::Imager::extract])
    pub fn build(
        &mut self,
        observed: &[ObservedStar],
        frame_width: f64,
        config: &TrackerConfig,
    ) -> Vec<ObservedQuadruple> {
        let n = observed.len();
        assert!(n >= 4, "QuadrupleBuilder requires at least 4 observed stars");

        let mut chosen: Vec<[usize; 4]> = vec![];
        let mut seen: HashSet<[usize; 4]> = HashSet::new();

        let brightest = [0, 1, 2, 3];
        seen.insert(brightest);
        chosen.push(brightest);

        let max_possible = n_choose_4(n);
        let target = config.max_quadruples.min(max_possible);
        let mut attempts = 0;
        // randomized search for distinct 4-subsets; bounded attempts guards
        // against pathologically small n where draws keep colliding
        while chosen.len() < target && attempts < target * 20 + 100 {
            attempts += 1;
            let mut idx = [0usize; 4];
            for slot in idx.iter_mut() {
                *slot = self.rng.gen_range(0..n);
            }
            idx.sort_unstable();
            if idx[0] == idx[1] || idx[1] == idx[2] || idx[2] == idx[3] {
                continue;
            }
            if seen.insert(idx) {
                chosen.push(idx);
            }
        }

        chosen
            .into_iter()
            .map(|idx| {
                let stars = [
                    observed[idx[0]],
                    observed[idx[1]],
                    observed[idx[2]],
                    observed[idx[3]],
                ];
                ObservedQuadruple::from_stars(stars, frame_width, config)
            })
            .collect()
    }
}

//fi n_choose_4
fn n_choose_4(n: usize) -> usize {
    if n < 4 {
        0
    } else {
        n * (n - 1) * (n - 2) * (n - 3) / 24
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn star(x: f64, y: f64) -> ObservedStar {
        ObservedStar {
            pixel_count: 10,
            position: (x, y),
        }
    }

    #[test]
    fn pair_index_matches_incident_table() {
        for (k, incident) in INCIDENT_PAIRS.iter().enumerate() {
            for &p in incident {
                let (a, b) = PAIR_STARS[p];
                assert!(a == k || b == k);
            }
        }
    }

    #[test]
    fn first_quadruple_is_brightest_four() {
        let observed = vec![star(0.0, 0.0), star(1.0, 0.0), star(2.0, 0.0), star(3.0, 0.0)];
        let config = TrackerConfig::default();
        let mut builder = QuadrupleBuilder::new(Some(42));
        let quads = builder.build(&observed, 1000.0, &config);
        assert_eq!(quads.len(), 1);
        assert_eq!(quads[0].stars[0].position, (0.0, 0.0));
    }

    #[test]
    fn deterministic_with_fixed_seed() {
        let observed: Vec<_> = (0..10).map(|i| star(i as f64 * 10.0, 0.0)).collect();
        let config = TrackerConfig {
            max_quadruples: 5,
            ..Default::default()
        };
        let mut b1 = QuadrupleBuilder::new(Some(7));
        let mut b2 = QuadrupleBuilder::new(Some(7));
        let q1 = b1.build(&observed, 1000.0, &config);
        let q2 = b2.build(&observed, 1000.0, &config);
        assert_eq!(q1.len(), q2.len());
        for (a, b) in q1.iter().zip(q2.iter()) {
            assert_eq!(a.pair_cosines, b.pair_cosines);
        }
    }
}
