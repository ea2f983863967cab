//a Imports
use geo_nd::Vector;
use serde::{Deserialize, Serialize};

use crate::{Subcube, Vec3};

//a Star and StarSerialized
//tp StarSerialized
/// This is the representation when a [Star] is serialized.
///
/// To reduce the size of serialized files this is a tuple (and hence
/// field names are not output many times over)
///
/// To enable serde serialization, the trait `From<Star>` is
/// implemented for [StarSerialized]; this preserves the information
/// required to reload the star without capturing its unit vector, or
/// neighbors or subcube data.
///
/// To enable serde deserialization, the trait `From<StarSerialized>`
/// is implemented for [Star]; this will create the star record with
/// derived values for its unit vector, subcube etc, without storing
/// them in the serialization
#[derive(Debug, Serialize, Deserialize)]
pub struct StarSerialized(
    /// Id (e.g. catalog or Hipparcos number)
    usize,
    /// Right-ascension, declination in radians
    f64,
    f64,
    /// Distance in light years
    f32,
    /// Visual magnitude and color (B-V)
    f32,
    f32,
);

//tp Star
/// A catalog star record: an identifier, a sky position, a
/// brightness, and the derived unit vector and spatial bucket used
/// for geometric lookups
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "StarSerialized", into = "StarSerialized")]
pub struct Star {
    pub(crate) id: usize,
    pub(crate) ra: f64,
    pub(crate) de: f64,
    pub(crate) ly: f32,
    pub(crate) vmag: f32,
    pub(crate) bv: f32,
    pub(crate) vector: Vec3,
    pub(crate) subcube: Subcube,
}

//ip From<Star> for StarSerialized
impl From<Star> for StarSerialized {
    fn from(star: Star) -> StarSerialized {
        StarSerialized(star.id, star.ra, star.de, star.ly, star.vmag, star.bv)
    }
}

//ip From<StarSerialized> for Star
impl From<StarSerialized> for Star {
    fn from(star: StarSerialized) -> Star {
        Star::new(star.0, star.1, star.2, star.3, star.4, star.5)
    }
}

//ip Star
impl Star {
    //fi vec_of_ra_de
    /// Calculate a unit vector from a right ascension and declination, both in radians
    pub fn vec_of_ra_de(ra: f64, de: f64) -> Vec3 {
        let vx = ra.cos() * de.cos();
        let vy = ra.sin() * de.cos();
        let vz = de.sin();
        [vx, vy, vz].into()
    }

    //ap subcube
    /// Return the subcube the [Star] is in
    pub fn subcube(&self) -> Subcube {
        self.subcube
    }

    //ap id
    /// Get the id of the [Star]
    pub fn id(&self) -> usize {
        self.id
    }

    //ap ra
    /// Get the right ascension of the [Star], in radians
    pub fn ra(&self) -> f64 {
        self.ra
    }

    //ap de
    /// Get the declination of the [Star], in radians
    pub fn de(&self) -> f64 {
        self.de
    }

    //ap mag
    /// Get the visual magnitude of the [Star]
    pub fn mag(&self) -> f32 {
        self.vmag
    }

    //ap light_years
    /// Get the distance to the [Star] in light years (0.0 if unknown)
    pub fn light_years(&self) -> f32 {
        self.ly
    }

    //ap vector
    /// Get the unit vector of the [Star]
    pub fn vector(&self) -> &Vec3 {
        &self.vector
    }

    //ap brighter_than
    /// True if the star's visual magnitude is less than (brighter than) the given value
    pub fn brighter_than(&self, magnitude: f32) -> bool {
        self.vmag < magnitude
    }

    //cp new
    /// Create a new [Star] given its details
    pub fn new(id: usize, ra: f64, de: f64, ly: f32, vmag: f32, bv: f32) -> Self {
        let vector = Self::vec_of_ra_de(ra, de);
        let subcube = Subcube::of_vector(&vector);
        Self {
            id,
            ra,
            de,
            ly,
            vmag,
            bv,
            vector,
            subcube,
        }
    }

    //mp cos_angle_between
    /// Get the cosine of the angle between this [Star] and another
    pub fn cos_angle_between(&self, other: &Star) -> f64 {
        self.vector.dot(&other.vector)
    }
}
