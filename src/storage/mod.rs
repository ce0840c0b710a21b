//! List-of-lists sparse storage: lifecycle, point access, counting
//!
//! `ListStorage<T>` is the root container for a rank-N sparse array stored
//! as a recursive tree of key-ordered linked lists. Only coordinates whose
//! value differs in principle from the default fill value are materialized;
//! every absent coordinate resolves to the default.
//!
//! Point access is the only slicing this format supports: a coordinate path
//! of exactly `rank` indices. Ranged slicing requests fail with
//! [`Error::NotImplemented`].

mod conversion;
mod equality;

use crate::dtype::{DType, Element};
use crate::error::{Error, Result};
use crate::list::{List, Node, Value};
use crate::shape::Shape;
use crate::slice::Slice;

use std::fmt;

/// Sparse rank-N array stored as a tree of key-ordered linked lists
///
/// Each dimension level is a list of (coordinate, value) entries; values are
/// nested lists down to the innermost dimension, whose entries hold leaf
/// elements directly. A full coordinate path has `rank` components.
///
/// # Invariants
///
/// - Keys are strictly increasing within every level.
/// - No nested list is ever retained empty: removal prunes emptied levels
///   all the way up to the first still-populated ancestor. Only the root
///   list may be empty.
///
/// # Example
///
/// ```
/// use sparsell::prelude::*;
///
/// let mut s = ListStorage::new([3, 3], 0.0f64)?;
/// s.insert(&Slice::point(&[0, 2]), 5.0)?;
///
/// assert_eq!(*s.get(&Slice::point(&[0, 2]))?, 5.0);
/// assert_eq!(*s.get(&Slice::point(&[1, 1]))?, 0.0); // implicit default
/// assert_eq!(s.nnz(), 1);
/// # Ok::<(), sparsell::error::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ListStorage<T> {
    shape: Shape,
    default: T,
    rows: List<T>,
}

impl<T> ListStorage<T> {
    /// Create an empty storage, taking ownership of `shape` and `default`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the shape has no dimensions or
    /// any extent is zero.
    pub fn new(shape: impl Into<Shape>, default: T) -> Result<Self> {
        let shape = shape.into();
        if shape.is_empty() {
            return Err(Error::invalid_argument("shape", "rank must be at least 1"));
        }
        if let Some(dim) = shape.iter().position(|&extent| extent == 0) {
            return Err(Error::invalid_argument(
                "shape",
                format!("extent of dimension {dim} must be positive"),
            ));
        }
        Ok(Self {
            shape,
            default,
            rows: List::new(),
        })
    }

    /// Number of dimensions.
    #[inline]
    pub fn rank(&self) -> usize {
        self.shape.ndim()
    }

    /// Dimension extents.
    pub fn shape(&self) -> &[usize] {
        self.shape.as_slice()
    }

    /// The implicit fill value for every non-materialized coordinate.
    pub fn default_value(&self) -> &T {
        &self.default
    }

    /// Total number of addressable coordinates (product of all extents).
    #[inline]
    pub fn numel(&self) -> usize {
        self.shape.numel()
    }

    /// Returns true if no coordinate is materialized.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    // =========================================================================
    // Point access
    // =========================================================================

    /// Read the value at a single coordinate, without copying.
    ///
    /// Returns a reference to the materialized leaf, or to the storage's
    /// default value when the coordinate is absent at any level. Never
    /// allocates, never mutates.
    pub fn get(&self, slice: &Slice) -> Result<&T> {
        let coords = self.point_coords(slice)?;
        let rank = self.rank();
        let mut list = &self.rows;
        for &key in &coords[..rank - 1] {
            match list.find(key) {
                Some(node) => match node.val.as_list() {
                    Some(sub) => list = sub,
                    None => return Err(depth_error()),
                },
                None => return Ok(&self.default),
            }
        }
        match list.find(coords[rank - 1]) {
            Some(node) => node.val.as_scalar().ok_or_else(depth_error),
            None => Ok(&self.default),
        }
    }

    /// Store `value` at a single coordinate, creating intermediate levels on
    /// demand.
    ///
    /// Returns the displaced previous value when the coordinate was already
    /// materialized; disposal of that value is the caller's decision.
    pub fn insert(&mut self, slice: &Slice, value: T) -> Result<Option<T>> {
        let coords = self.point_coords(slice)?;
        let rank = self.rank();
        let mut list = &mut self.rows;
        for &key in &coords[..rank - 1] {
            let val = list.get_or_insert(key, Value::List(List::new()));
            match val.as_list_mut() {
                Some(sub) => list = sub,
                None => return Err(depth_error()),
            }
        }
        let displaced = list.insert(coords[rank - 1], Value::Scalar(value));
        Ok(match displaced {
            Some(Value::Scalar(old)) => Some(old),
            _ => None,
        })
    }

    /// Remove the value at a single coordinate, if materialized.
    ///
    /// Returns `Ok(None)` when the coordinate is not materialized, with no
    /// structural change; this is distinct from removing an entry whose
    /// value happens to equal the default, which returns `Ok(Some(v))`.
    ///
    /// After a successful removal, every intermediate level emptied by it is
    /// pruned, walking upward until the first still-populated ancestor.
    pub fn remove(&mut self, slice: &Slice) -> Result<Option<T>> {
        let coords = self.point_coords(slice)?;
        let removed = remove_at(&mut self.rows, coords);
        debug_assert!(
            removed.is_none() || self.check_invariants(),
            "removal left an empty sublist"
        );
        Ok(removed)
    }

    /// Validate a slice for point access against this storage.
    fn point_coords<'s>(&self, slice: &'s Slice) -> Result<&'s [usize]> {
        if !slice.is_point() {
            return Err(Error::NotImplemented {
                feature: "ranged slicing on list storage",
            });
        }
        if slice.rank() != self.rank() {
            return Err(Error::RankMismatch {
                expected: self.rank(),
                got: slice.rank(),
            });
        }
        for (&index, &size) in slice.coords().iter().zip(self.shape.iter()) {
            if index >= size {
                return Err(Error::IndexOutOfBounds { index, size });
            }
        }
        Ok(slice.coords())
    }

    // =========================================================================
    // Counting & statistics
    // =========================================================================

    /// Number of materialized entries.
    pub fn nnz(&self) -> usize {
        count_at_depth(&self.rows, self.rank() - 1)
    }

    /// Count nodes reachable at the given nesting depth.
    ///
    /// With `recursions == 0` this counts the direct nodes of the root
    /// level; each further recursion descends one dimension. Passing
    /// `rank - 1` counts materialized leaves, which is what [`nnz`] does.
    ///
    /// [`nnz`]: ListStorage::nnz
    pub fn count_at_depth(&self, recursions: usize) -> usize {
        count_at_depth(&self.rows, recursions)
    }

    /// Count materialized entries off the main diagonal.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RankMismatch`] unless the storage has rank exactly 2.
    pub fn count_off_diagonal(&self) -> Result<usize> {
        if self.rank() != 2 {
            return Err(Error::RankMismatch {
                expected: 2,
                got: self.rank(),
            });
        }
        let mut count = 0;
        for row in self.rows.iter() {
            if let Some(cols) = row.val.as_list() {
                for col in cols.iter() {
                    if row.key != col.key {
                        count += 1;
                    }
                }
            }
        }
        Ok(count)
    }

    /// Fraction of coordinates that are not materialized.
    pub fn sparsity(&self) -> f64 {
        1.0 - self.density()
    }

    /// Fraction of coordinates that are materialized.
    pub fn density(&self) -> f64 {
        self.nnz() as f64 / self.numel() as f64
    }

    /// Approximate memory usage of the storage in bytes.
    pub fn memory_usage(&self) -> usize {
        std::mem::size_of::<Self>() + count_nodes(&self.rows) * std::mem::size_of::<Node<T>>()
    }

    // =========================================================================
    // Traversal & validation
    // =========================================================================

    /// Visit the default value and every materialized leaf, in key order.
    ///
    /// This is the hook a host memory manager can use to discover retained
    /// element values (e.g. for GC marking when elements are managed object
    /// handles). Performs no mutation.
    pub fn for_each_value<F: FnMut(&T)>(&self, mut visitor: F) {
        visitor(&self.default);
        walk_leaves(&self.rows, &mut visitor);
    }

    /// Structural self-check: no retained nested list is empty, keys are
    /// strictly increasing and in bounds at every level, and leaves appear
    /// exactly at the innermost dimension.
    ///
    /// Runs as a debug assertion after every removal; exposed for tests.
    pub fn check_invariants(&self) -> bool {
        check_level(&self.rows, self.shape.as_slice(), 0, true)
    }
}

impl<T: Element> ListStorage<T> {
    /// Runtime tag of the element type.
    #[inline]
    pub fn dtype(&self) -> DType {
        T::DTYPE
    }
}

impl<T: Element> fmt::Display for ListStorage<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ListStorage({:?}, nnz={}, dtype={}, sparsity={:.1}%)",
            self.shape(),
            self.nnz(),
            self.dtype(),
            self.sparsity() * 100.0
        )
    }
}

fn depth_error() -> Error {
    Error::Internal("list storage tree depth does not match rank".into())
}

/// Remove the leaf at `coords`, pruning emptied levels bottom-up.
///
/// Each level removes its child entry only when the recursive removal both
/// succeeded and left the child list empty; as soon as one ancestor stays
/// populated the pruning stops, since no further ancestor can have emptied.
fn remove_at<T>(list: &mut List<T>, coords: &[usize]) -> Option<T> {
    let (&key, rest) = coords.split_first()?;
    if rest.is_empty() {
        return match list.remove(key)? {
            Value::Scalar(v) => Some(v),
            Value::List(_) => None,
        };
    }
    let sub = list.find_mut(key)?.val.as_list_mut()?;
    let removed = remove_at(sub, rest)?;
    if sub.is_empty() {
        list.remove(key);
    }
    Some(removed)
}

fn count_at_depth<T>(list: &List<T>, recursions: usize) -> usize {
    if recursions == 0 {
        return list.iter().count();
    }
    list.iter()
        .map(|node| match node.val.as_list() {
            Some(sub) => count_at_depth(sub, recursions - 1),
            None => 0,
        })
        .sum()
}

fn count_nodes<T>(list: &List<T>) -> usize {
    list.iter()
        .map(|node| {
            1 + match node.val.as_list() {
                Some(sub) => count_nodes(sub),
                None => 0,
            }
        })
        .sum()
}

fn walk_leaves<T, F: FnMut(&T)>(list: &List<T>, visitor: &mut F) {
    for node in list.iter() {
        match &node.val {
            Value::List(sub) => walk_leaves(sub, visitor),
            Value::Scalar(v) => visitor(v),
        }
    }
}

fn check_level<T>(list: &List<T>, shape: &[usize], depth: usize, is_root: bool) -> bool {
    if !is_root && list.is_empty() {
        return false;
    }
    let rank = shape.len();
    let mut prev: Option<usize> = None;
    for node in list.iter() {
        if prev.is_some_and(|p| p >= node.key) || node.key >= shape[depth] {
            return false;
        }
        prev = Some(node.key);
        let ok = match &node.val {
            Value::List(sub) => depth + 1 < rank && check_level(sub, shape, depth + 1, false),
            Value::Scalar(_) => depth + 1 == rank,
        };
        if !ok {
            return false;
        }
    }
    true
}
