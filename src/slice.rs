//! Coordinate-path ("slice") type for addressing storage elements
//!
//! A `Slice` names a region of a storage: one coordinate per dimension plus a
//! length per dimension. The list storage core only supports the single-point
//! form (all lengths 1); accessors reject ranged slices with
//! [`Error::NotImplemented`](crate::error::Error::NotImplemented) rather than
//! silently degrading.

use crate::shape::STACK_DIMS;
use smallvec::SmallVec;

/// An ordered coordinate path with per-dimension lengths
///
/// `Slice::point` builds the single-point form accepted by the list storage
/// accessors. `Slice::range` exists so callers can express ranged requests;
/// this core refuses them at operation entry.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Slice {
    coords: SmallVec<[usize; STACK_DIMS]>,
    lens: SmallVec<[usize; STACK_DIMS]>,
}

impl Slice {
    /// Create a single-point slice addressing exactly one coordinate.
    pub fn point(coords: &[usize]) -> Self {
        Self {
            coords: coords.iter().copied().collect(),
            lens: coords.iter().map(|_| 1).collect(),
        }
    }

    /// Create a ranged slice starting at `coords` with `lens` extents.
    ///
    /// # Panics
    ///
    /// Panics if `coords` and `lens` have different lengths.
    pub fn range(coords: &[usize], lens: &[usize]) -> Self {
        assert_eq!(
            coords.len(),
            lens.len(),
            "slice coords and lens must have the same rank"
        );
        Self {
            coords: coords.iter().copied().collect(),
            lens: lens.iter().copied().collect(),
        }
    }

    /// Number of dimensions addressed by this slice.
    #[inline]
    pub fn rank(&self) -> usize {
        self.coords.len()
    }

    /// Returns true if this slice addresses a single coordinate.
    #[inline]
    pub fn is_point(&self) -> bool {
        self.lens.iter().all(|&len| len == 1)
    }

    /// The starting coordinate along each dimension.
    pub fn coords(&self) -> &[usize] {
        &self.coords
    }

    /// The length along each dimension.
    pub fn lens(&self) -> &[usize] {
        &self.lens
    }
}

impl From<&[usize]> for Slice {
    fn from(coords: &[usize]) -> Self {
        Self::point(coords)
    }
}

impl<const N: usize> From<[usize; N]> for Slice {
    fn from(coords: [usize; N]) -> Self {
        Self::point(&coords)
    }
}
