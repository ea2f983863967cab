//a Imports
use serde::{Deserialize, Serialize};

use crate::Error;

//a TrackerConfig
//tp TrackerConfig
/// Tunable parameters for the whole pipeline, from catalog filtering
/// through quadruple construction and match tolerance
///
/// Defaults match a narrow-field star tracker tuned for a 1000x1000
/// frame; callers with a different optical setup should override
/// `field_of_view_deg` and re-derive `pair_angle_bounds_deg` from it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Diagonal field of view of the camera, in degrees; must lie in (0, 120]
    pub field_of_view_deg: f64,
    /// Catalog stars fainter than this are dropped before pair generation
    pub magnitude_limit: f32,
    /// Luminance threshold (0-255) above which a pixel is considered part of a star
    pub star_threshold: u8,
    /// Inclusive (min, max) connected-component area, in pixels, to accept as a star
    pub component_area_bounds: (u32, u32),
    /// Inclusive (min, max) angular separation, in degrees, for a catalog pair to be retained
    pub pair_angle_bounds_deg: (f64, f64),
    /// Angular tolerance, in degrees, for matching an observed pair to a catalog pair
    pub match_tolerance_deg: f64,
    /// Maximum number of candidate quadruples to try per frame (including the brightest)
    pub max_quadruples: usize,
    /// Seed for the quadruple builder's PRNG; fixing this makes a run reproducible
    pub rng_seed: Option<u64>,
}

//ip Default for TrackerConfig
impl Default for TrackerConfig {
    fn default() -> Self {
        let field_of_view_deg = 17.0;
        Self {
            field_of_view_deg,
            magnitude_limit: 6.0,
            star_threshold: 68,
            component_area_bounds: (1, 20),
            pair_angle_bounds_deg: (field_of_view_deg / 1000.0, field_of_view_deg),
            match_tolerance_deg: 0.1,
            max_quadruples: 20,
            rng_seed: None,
        }
    }
}

//ip TrackerConfig
impl TrackerConfig {
    //cp validate
    /// Check the cross-field constraints the original tooling enforced
    /// by convention; returns the config unchanged on success
    pub fn validate(self) -> Result<Self, Error> {
        if !(self.field_of_view_deg > 0.0 && self.field_of_view_deg <= 120.0) {
            return Err(Error::InvalidConfig(format!(
                "field_of_view_deg must be in (0, 120], got {}",
                self.field_of_view_deg
            )));
        }
        if self.pair_angle_bounds_deg.0 >= self.pair_angle_bounds_deg.1 {
            return Err(Error::InvalidConfig(format!(
                "pair_angle_bounds_deg must have min < max, got {:?}",
                self.pair_angle_bounds_deg
            )));
        }
        if self.component_area_bounds.0 < 1
            || self.component_area_bounds.0 > self.component_area_bounds.1
        {
            return Err(Error::InvalidConfig(format!(
                "component_area_bounds must have 1 <= min <= max, got {:?}",
                self.component_area_bounds
            )));
        }
        Ok(self)
    }

    //ap min_angle_rad
    /// Minimum catalog pair angle, in radians
    pub fn min_angle_rad(&self) -> f64 {
        self.pair_angle_bounds_deg.0.to_radians()
    }

    //ap max_angle_rad
    /// Maximum catalog pair angle, in radians
    pub fn max_angle_rad(&self) -> f64 {
        self.pair_angle_bounds_deg.1.to_radians()
    }

    //ap fov_rad
    /// Field of view, in radians
    pub fn fov_rad(&self) -> f64 {
        self.field_of_view_deg.to_radians()
    }

    //ap match_tolerance_rad
    /// Match tolerance, in radians
    pub fn match_tolerance_rad(&self) -> f64 {
        self.match_tolerance_deg.to_radians()
    }
}
