//! Persistence for the offline-computed [PairTable] and [NeighborTable]
//!
//! Two on-disk forms are supported: `postcard` (compact binary, the
//! default used by the catalog's own serialization) and `serde_json`
//! (human-inspectable, used by the CLI's `write` command for
//! catalogs). Both round-trip exactly: reloading reproduces the
//! in-memory table byte-for-byte.

//a Imports
use std::io::Write;

use crate::{Error, NeighborTable, PairTable};

//tp PairData
/// The combined artifact written by catalog preprocessing: a pair
/// table and its derived neighbor table, saved together so they can
/// never drift out of sync on reload
#[derive(serde::Serialize, serde::Deserialize)]
pub struct PairData {
    /// Sorted catalog pairs within the configured angular bounds
    pub pair_table: PairTable,
    /// Per-star adjacency derived from `pair_table`
    pub neighbor_table: NeighborTable,
}

//ip PairData
impl PairData {
    //cp build
    /// Derive the neighbor table from a pair table and bundle them
    pub fn build(pair_table: PairTable) -> Self {
        let neighbor_table = NeighborTable::build(&pair_table);
        Self {
            pair_table,
            neighbor_table,
        }
    }

    //mp save_postcard
    /// Write the artifact as postcard binary
    #[cfg(feature = "postcard")]
    pub fn save_postcard<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), Error> {
        let bytes = postcard::to_allocvec(self)?;
        std::fs::File::create(path)?.write_all(&bytes)?;
        Ok(())
    }

    //mp load_postcard
    /// Read the artifact back from postcard binary
    #[cfg(feature = "postcard")]
    pub fn load_postcard<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Error> {
        let bytes = std::fs::read(path)?;
        Ok(postcard::from_bytes(&bytes)?)
    }

    //mp save_json
    /// Write the artifact as (pretty) JSON
    pub fn save_json<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), Error> {
        let s = serde_json::to_string_pretty(self)?;
        std::fs::File::create(path)?.write_all(s.as_bytes())?;
        Ok(())
    }

    //mp load_json
    /// Read the artifact back from JSON
    pub fn load_json<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Error> {
        let s = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Catalog, Star, TrackerConfig};

    fn sample_pair_data() -> PairData {
        let mut catalog = Catalog::default();
        catalog.add_star(Star::new(0, 0.0, 0.0, 0.0, 1.0, 0.0));
        catalog.add_star(Star::new(1, 0.05, 0.0, 0.0, 1.0, 0.0));
        catalog.add_star(Star::new(2, 0.0, 0.05, 0.0, 1.0, 0.0));
        catalog.sort();
        let mut config = TrackerConfig::default();
        config.pair_angle_bounds_deg = (0.001, 20.0);
        let pair_table = PairTable::build(&catalog, &config);
        PairData::build(pair_table)
    }

    #[test]
    fn json_round_trip_is_exact() {
        let data = sample_pair_data();
        let dir = std::env::temp_dir();
        let path = dir.join(format!("star-tracker-test-{}.json", std::process::id()));
        data.save_json(&path).unwrap();
        let reloaded = PairData::load_json(&path).unwrap();
        assert_eq!(data.pair_table.len(), reloaded.pair_table.len());
        for (a, b) in data.pair_table.pairs().iter().zip(reloaded.pair_table.pairs()) {
            assert_eq!(a.first_id, b.first_id);
            assert_eq!(a.second_id, b.second_id);
            assert_eq!(a.cosine_separation.to_bits(), b.cosine_separation.to_bits());
        }
        let _ = std::fs::remove_file(&path);
    }

    #[cfg(feature = "postcard")]
    #[test]
    fn postcard_round_trip_is_exact() {
        let data = sample_pair_data();
        let dir = std::env::temp_dir();
        let path = dir.join(format!("star-tracker-test-{}.postcard", std::process::id()));
        data.save_postcard(&path).unwrap();
        let reloaded = PairData::load_postcard(&path).unwrap();
        assert_eq!(data.pair_table.len(), reloaded.pair_table.len());
        let _ = std::fs::remove_file(&path);
    }
}
