//a Imports
use geo_nd::Vector;
use serde::{Deserialize, Serialize};

use crate::Vec3;

//a Subcube
//tp Subcube
/// A bucket in a 32x32x32 grid covering the cube `[-1,1]^3`, used to
/// prune nearest-neighbor and angular-range searches over unit
/// vectors on the celestial sphere without a full `O(n^2)` scan
///
/// Every unit vector falls in exactly one subcube; a subcube's
/// neighbors (up to 26 of them, fewer at the edges of the grid) are
/// the only other subcubes that can contain a point within one
/// subcube's diagonal of any point in this one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subcube(usize);

//tp SubcubeMask
/// A bitmask over the 27 possible neighbor deltas of a [Subcube],
/// used to disable the deltas that would step outside the grid
#[derive(Debug, Clone, Copy)]
pub struct SubcubeMask(usize);
impl SubcubeMask {
    const ALL: SubcubeMask = SubcubeMask(0);

    const MASK_XL: SubcubeMask = SubcubeMask(0x1249249);
    const MASK_XR: SubcubeMask = SubcubeMask(0x4924924);

    const MASK_YL: SubcubeMask = SubcubeMask(0x01c0e07);
    const MASK_YR: SubcubeMask = SubcubeMask(0x70381c0);

    const MASK_ZL: SubcubeMask = SubcubeMask(0x00001ff);
    const MASK_ZR: SubcubeMask = SubcubeMask(0x7fc0000);
}
impl std::ops::BitOr for SubcubeMask {
    type Output = SubcubeMask;
    fn bitor(self, other: SubcubeMask) -> Self {
        Self(self.0 | other.0)
    }
}
impl SubcubeMask {
    fn disable(&self, index: usize) -> bool {
        (self.0 >> index) & 1 == 1
    }
}

//ip Subcube
impl Subcube {
    /// An oct-tree enclosing a sphere of radius 1.0 with 32^3 cells
    /// has each cell of side length 1/16; the maximum angle
    /// subtended at the origin by a cell's half-diagonal is
    /// `2.asin(sqrt(3)/32)`, a little over 6 degrees - small enough
    /// that pruning by subcube neighbourhood costs negligible extra
    /// candidates for the magnitude-limited catalogs this crate
    /// targets.
    pub const ELE_PER_SIDE: usize = 32;
    const ELE_PER_SIDE2: usize = Self::ELE_PER_SIDE * Self::ELE_PER_SIDE;
    /// Total number of subcubes in the grid
    pub const NUM_SUBCUBES: usize = Self::ELE_PER_SIDE * Self::ELE_PER_SIDE * Self::ELE_PER_SIDE;
    /// Side length of one subcube, as a fraction of the enclosing cube's side of 2.0
    pub const SUBCUBE_SIZE: f64 = 2.0 / (Self::ELE_PER_SIDE as f64);
    /// Distance from a subcube's center to its corner
    pub const SUBCUBE_RADIUS: f64 = Self::SUBCUBE_SIZE * 0.8660254037844386; // sqrt(3)/2

    //fi delta
    const fn delta(b: usize) -> isize {
        let b = b as isize;
        let x = b % 3;
        let y = (b / 3) % 3;
        let z = (b / 9) % 3;
        (x - 1) + (y - 1) * (Self::ELE_PER_SIDE as isize) + (z - 1) * (Self::ELE_PER_SIDE2 as isize)
    }

    const DELTAS: [isize; 27] = [
        Self::delta(0),
        Self::delta(1),
        Self::delta(2),
        Self::delta(3),
        Self::delta(4),
        Self::delta(5),
        Self::delta(6),
        Self::delta(7),
        Self::delta(8),
        Self::delta(9),
        Self::delta(10),
        Self::delta(11),
        Self::delta(12),
        Self::delta(13),
        Self::delta(14),
        Self::delta(15),
        Self::delta(16),
        Self::delta(17),
        Self::delta(18),
        Self::delta(19),
        Self::delta(20),
        Self::delta(21),
        Self::delta(22),
        Self::delta(23),
        Self::delta(24),
        Self::delta(25),
        Self::delta(26),
    ];

    //fp of_vector
    /// Find the subcube that a (near-)unit vector falls in
    pub fn of_vector(v: &Vec3) -> Self {
        let n = Self::ELE_PER_SIDE as f64;
        let xe = (((v[0] + 1.0) * 0.5 * n * 0.999999) as usize).min(Self::ELE_PER_SIDE - 1);
        let ye = (((v[1] + 1.0) * 0.5 * n * 0.999999) as usize).min(Self::ELE_PER_SIDE - 1);
        let ze = (((v[2] + 1.0) * 0.5 * n * 0.999999) as usize).min(Self::ELE_PER_SIDE - 1);
        Self(xe + ye * Self::ELE_PER_SIDE + ze * Self::ELE_PER_SIDE2)
    }

    //ap as_usize
    /// The subcube's index into a dense `NUM_SUBCUBES`-length table
    pub fn as_usize(&self) -> usize {
        self.0
    }

    //ap xyz
    fn xyz(&self) -> (usize, usize, usize) {
        let x = self.0 % Self::ELE_PER_SIDE;
        let y = (self.0 / Self::ELE_PER_SIDE) % Self::ELE_PER_SIDE;
        let z = self.0 / Self::ELE_PER_SIDE2;
        (x, y, z)
    }

    //mp center
    /// The center point of the subcube, in the enclosing `[-1,1]^3`
    /// cube; not normalized, and not necessarily close to the unit
    /// sphere for subcubes near the cube's corners
    pub fn center(&self) -> Vec3 {
        let (x, y, z) = self.xyz();
        let c = |e: usize| -1.0 + (e as f64 + 0.5) * Self::SUBCUBE_SIZE;
        [c(x), c(y), c(z)].into()
    }

    //mp may_be_on_sphere
    /// True if any point of the unit sphere can fall within this
    /// subcube; used to skip subcubes that are entirely interior or
    /// exterior to the sphere when iterating over the whole grid
    pub fn may_be_on_sphere(&self) -> bool {
        let len = self.center().length();
        (len - Self::SUBCUBE_RADIUS) <= 1.0 && (len + Self::SUBCUBE_RADIUS) >= 1.0
    }

    //mp cos_angle_on_sphere
    /// Cosine of the angle between this subcube's (normalized)
    /// center direction and a given unit vector, or `None` if the
    /// subcube's center is too close to the origin to normalize
    /// (only possible for the eight subcubes straddling the origin)
    pub fn cos_angle_on_sphere(&self, v: &Vec3) -> Option<f64> {
        let c = self.center();
        let len = c.length();
        if len < 1.0e-6 {
            None
        } else {
            Some(c.dot(v) / len)
        }
    }

    //mp neighbors
    /// The mask of which of the 27 neighbor deltas are valid (i.e.
    /// do not step outside the grid) from this subcube
    pub fn neighbors(&self) -> SubcubeMask {
        let mut mask = SubcubeMask::ALL;
        let (x, y, z) = self.xyz();

        if x == 0 {
            mask = mask | SubcubeMask::MASK_XL;
        }
        if x == Self::ELE_PER_SIDE - 1 {
            mask = mask | SubcubeMask::MASK_XR;
        }

        if y == 0 {
            mask = mask | SubcubeMask::MASK_YL;
        }
        if y == Self::ELE_PER_SIDE - 1 {
            mask = mask | SubcubeMask::MASK_YR;
        }

        if z == 0 {
            mask = mask | SubcubeMask::MASK_ZL;
        }
        if z == Self::ELE_PER_SIDE - 1 {
            mask = mask | SubcubeMask::MASK_ZR;
        }
        mask
    }

    //mp iter_neighbors
    /// Iterate over the (up to 26) subcubes immediately adjacent to this one
    pub fn iter_neighbors(&self) -> SubcubeNeighborIter {
        let mask = self.neighbors();
        SubcubeNeighborIter {
            s: *self,
            delta_index: 0,
            mask,
        }
    }

    //mp iter_range
    /// Iterate over all subcubes within `range` cells of this one
    /// along every axis (a `(2*range+1)^3` cube of subcubes,
    /// clipped to the grid boundary)
    pub fn iter_range(&self, range: usize) -> SubcubeRangeIter {
        let (x, y, z) = self.xyz();
        let n = Self::ELE_PER_SIDE;
        let x0 = x.saturating_sub(range);
        let y0 = y.saturating_sub(range);
        let z0 = z.saturating_sub(range);
        let x1 = (x + range).min(n - 1);
        let y1 = (y + range).min(n - 1);
        let z1 = (z + range).min(n - 1);
        SubcubeRangeIter {
            x0,
            y0,
            z0,
            x1,
            y1,
            z1,
            x: x0,
            y: y0,
            z: z0,
            done: false,
        }
    }

    //fp iter_all
    /// Iterate over every subcube in the grid that could contain a
    /// point on the unit sphere
    pub fn iter_all() -> impl Iterator<Item = Subcube> {
        (0..Self::NUM_SUBCUBES)
            .map(Subcube)
            .filter(|s| s.may_be_on_sphere())
    }
}

//ip Add<isize> for Subcube
impl std::ops::Add<isize> for Subcube {
    type Output = Subcube;
    fn add(self, delta: isize) -> Subcube {
        let s = self.0 as isize + delta;
        assert!(
            s >= 0,
            "Delta of Subcube used to take subcube out of bounds"
        );
        Subcube(s as usize)
    }
}

//ip From<Subcube> for (usize, usize, usize)
impl From<Subcube> for (usize, usize, usize) {
    fn from(s: Subcube) -> (usize, usize, usize) {
        s.xyz()
    }
}

//tp SubcubeNeighborIter
/// Iterator over the valid neighbors of a [Subcube]
pub struct SubcubeNeighborIter {
    s: Subcube,
    delta_index: usize,
    mask: SubcubeMask,
}
impl std::iter::Iterator for SubcubeNeighborIter {
    type Item = Subcube;
    fn next(&mut self) -> Option<Subcube> {
        while self.delta_index < 27 {
            let di = self.delta_index;
            self.delta_index += 1;
            if !self.mask.disable(di) {
                return Some(self.s + Subcube::DELTAS[di]);
            }
        }
        None
    }
}

//tp SubcubeRangeIter
/// Iterator over every subcube in an axis-aligned range of a [Subcube]
pub struct SubcubeRangeIter {
    x0: usize,
    y0: usize,
    z0: usize,
    x1: usize,
    y1: usize,
    z1: usize,
    x: usize,
    y: usize,
    z: usize,
    done: bool,
}
impl std::iter::Iterator for SubcubeRangeIter {
    type Item = Subcube;
    fn next(&mut self) -> Option<Subcube> {
        if self.done {
            return None;
        }
        let result = Subcube(
            self.x + self.y * Subcube::ELE_PER_SIDE + self.z * Subcube::ELE_PER_SIDE2,
        );
        if self.x < self.x1 {
            self.x += 1;
        } else {
            self.x = self.x0;
            if self.y < self.y1 {
                self.y += 1;
            } else {
                self.y = self.y0;
                if self.z < self.z1 {
                    self.z += 1;
                } else {
                    self.done = true;
                }
            }
        }
        Some(result)
    }
}
