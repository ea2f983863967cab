/*!
Lost-in-space star-tracker attitude determination.

This crate identifies a camera's celestial pointing direction from a
single frame of a handful of bright stars, with no prior attitude
estimate. It runs in two phases: an offline catalog preparation step
([pairs]) that turns a star catalog into a sorted table of
observable pairs and their neighbor adjacency, and an online
identification step ([imager], [quadruple], [matcher], [attitude],
tied together in [pipeline]) that extracts star centroids from a
frame, matches them against the catalog, and triangulates an
attitude.

 */

pub type Vec3 = geo_nd::FArray<f64, 3>;
pub type Vec4 = geo_nd::FArray<f64, 4>;
pub type Quat = geo_nd::QArray<f64, Vec3, Vec4>;

mod error;
pub use error::Error;

mod config;
pub use config::TrackerConfig;

mod subcube;
pub use subcube::{Subcube, SubcubeMask};

mod star;
pub use star::Star;

mod catalog;
pub use catalog::{Catalog, CatalogIndex};

pub mod hipparcos;

mod pairs;
pub use pairs::{CatalogPair, NeighborTable, PairTable};

pub mod imager;
pub use imager::{Frame, ObservedStar};

pub mod quadruple;
pub use quadruple::{ObservedQuadruple, QuadrupleBuilder};

pub mod matcher;
pub use matcher::{CompatibilityMatrix, MatchSets, Matcher};

pub mod attitude;
pub use attitude::AttitudeSolver;

mod persist;
pub use persist::PairData;

mod pipeline;
pub use pipeline::{identify_frame, FrameOutcome};
