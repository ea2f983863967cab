//! End-to-end per-frame identification
//!
//! Wires [crate::imager::Imager], [crate::quadruple::QuadrupleBuilder],
//! [crate::matcher::Matcher] and [crate::attitude::AttitudeSolver]
//! together into the single entry point callers use per captured frame.

//a Imports
use log::info;

use crate::attitude::AttitudeSolver;
use crate::imager::{Frame, Imager};
use crate::matcher::Matcher;
use crate::quadruple::{ObservedQuadruple, QuadrupleBuilder};
use crate::{Catalog, Error, NeighborTable, PairTable, TrackerConfig, Vec3};

//a FrameOutcome
//tp FrameOutcome
/// The result of attempting to identify a single frame: either a
/// resolved attitude, or the reason identification failed
#[derive(Debug)]
pub enum FrameOutcome {
    /// A quadruple was matched and triangulated successfully
    Identified {
        /// Index of the quadruple (within the candidate sequence) that matched
        quadruple_index: usize,
        /// The matched catalog ids, in observed-slot order
        catalog_ids: [usize; 4],
        /// The triangulated view vector (pointing direction)
        view_vector: Vec3,
        /// The triangulated roll axis
        axis_vector: Vec3,
        /// Right ascension of the view vector, in degrees
        ra_deg: f64,
        /// Declination of the view vector, in degrees
        dec_deg: f64,
    },
    /// No quadruple produced a usable match
    Unidentified {
        /// The failure from the last quadruple attempted
        reason: Error,
    },
}

//fp identify_frame
/// Run the full pipeline on one frame: extract observed stars,
/// build candidate quadruples, match against the catalog, and
/// triangulate the attitude from the first three matched stars
pub fn identify_frame(
    frame: &Frame,
    catalog: &Catalog,
    pair_table: &PairTable,
    neighbors: &NeighborTable,
    config: &TrackerConfig,
) -> FrameOutcome {
    let observed = match Imager::extract(frame, config) {
        Ok(stars) => stars,
        Err(reason) => return FrameOutcome::Unidentified { reason },
    };

    let mut builder = QuadrupleBuilder::new(config.rng_seed);
    let quadruples: Vec<ObservedQuadruple> =
        builder.build(&observed, frame.width() as f64, config);

    let (quadruple_index, catalog_ids) =
        match Matcher::identify_any(&quadruples, catalog, pair_table, neighbors, config) {
            Ok(result) => result,
            Err(reason) => return FrameOutcome::Unidentified { reason },
        };

    let quadruple = &quadruples[quadruple_index];
    let mut triangulation_inputs = [(Vec3::default(), (0.0, 0.0)); 3];
    for i in 0..3 {
        let idx = catalog.find_sorted(catalog_ids[i]);
        let Some(idx) = idx else {
            return FrameOutcome::Unidentified {
                reason: Error::FailedToFindId(catalog_ids[i]),
            };
        };
        triangulation_inputs[i] = (*catalog[idx].vector(), quadruple.stars[i].position);
    }

    let frame_width = frame.width() as f64;
    let frame_height = frame.height() as f64;
    let fov_rad = config.fov_rad();
    let center = (frame_width / 2.0, frame_height / 2.0);

    let view_vector = match AttitudeSolver::triangulate(center, triangulation_inputs, frame_width, fov_rad) {
        Ok(v) => v,
        Err(reason) => return FrameOutcome::Unidentified { reason },
    };
    let axis_vector =
        match AttitudeSolver::rotation_axis(triangulation_inputs, frame_width, frame_height, fov_rad) {
            Ok(v) => v,
            Err(reason) => return FrameOutcome::Unidentified { reason },
        };
    let (ra, dec) = AttitudeSolver::ra_dec_of(&view_vector);

    info!(
        "frame identified: quadruple {quadruple_index}, ids {catalog_ids:?}, ra={:.4} deg dec={:.4} deg",
        ra.to_degrees(),
        dec.to_degrees()
    );

    FrameOutcome::Identified {
        quadruple_index,
        catalog_ids,
        view_vector,
        axis_vector,
        ra_deg: ra.to_degrees(),
        dec_deg: dec.to_degrees(),
    }
}
