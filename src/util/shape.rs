//! Array shapes.
//!
//! A shape lists the extent of every axis of a stored array, outermost first.

use smallvec::SmallVec;

/// Extents of a multi-dimensional array, in C (row-major) axis order.
///
/// Nion data is at most 3-D in practice, so the inline capacity avoids
/// allocation for every supported layout.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Shape {
    dims: SmallVec<[usize; 4]>,
}

impl Shape {
    /// Create from a slice of extents.
    pub fn from_slice(sizes: &[usize]) -> Self {
        Self { dims: SmallVec::from_slice(sizes) }
    }

    /// All extents as a slice.
    pub fn sizes(&self) -> &[usize] {
        &self.dims
    }

    /// Total number of elements, or None if the product overflows.
    ///
    /// A rank 0 shape holds one element.
    pub fn checked_num_elements(&self) -> Option<usize> {
        self.dims.iter().try_fold(1usize, |acc, &n| acc.checked_mul(n))
    }
}

impl From<&[usize]> for Shape {
    fn from(sizes: &[usize]) -> Self {
        Self::from_slice(sizes)
    }
}

impl From<Vec<usize>> for Shape {
    fn from(v: Vec<usize>) -> Self {
        Self { dims: SmallVec::from_vec(v) }
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (i, s) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", s)?;
        }
        if self.dims.len() == 1 {
            write!(f, ",")?;
        }
        write!(f, ")")
    }
}
