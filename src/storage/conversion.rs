//! Conversions: dtype casting, dense-to-sparse and sparse-to-dense
//!
//! Deep copying is `Clone` (derived on the storage, chain-iterative at each
//! list level). Casting preserves the tree topology exactly: which
//! coordinates are materialized never changes, only the element type of the
//! leaves and the default value.

use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::list::{List, Value};
use crate::shape::Shape;

use super::ListStorage;

impl<T: Element> ListStorage<T> {
    /// Copy this storage, converting every leaf and the default value to a
    /// different element type.
    ///
    /// The shape and tree topology are preserved exactly; each value is
    /// routed through [`Element::to_f64`]/[`Element::from_f64`]. Lossy for
    /// type pairs that cannot represent each other's values.
    pub fn cast<U: Element>(&self) -> ListStorage<U> {
        ListStorage {
            shape: self.shape.clone(),
            default: U::from_f64(self.default.to_f64()),
            rows: cast_level(&self.rows),
        }
    }

    /// Build a storage from a flat dense buffer in row-major order.
    ///
    /// Only elements that differ from `zero` are materialized; `zero`
    /// becomes the storage's default value. Sublevels are built
    /// speculatively and discarded when they end up empty, so the resulting
    /// tree satisfies the no-empty-sublist invariant by construction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if the buffer length does not equal
    /// the product of the extents, and propagates shape validation errors
    /// from [`ListStorage::new`].
    pub fn from_dense(data: &[T], shape: impl Into<Shape>, zero: T) -> Result<Self> {
        let mut storage = Self::new(shape, zero)?;
        if data.len() != storage.numel() {
            return Err(Error::shape_mismatch(&[storage.numel()], &[data.len()]));
        }
        storage.rows = dense_level(data, &storage.default, storage.shape.as_slice(), 0, 0);
        debug_assert!(storage.check_invariants());
        Ok(storage)
    }
}

impl<T: Clone> ListStorage<T> {
    /// Expand to a flat dense buffer in row-major order, filling every
    /// non-materialized coordinate with the default value.
    pub fn to_dense(&self) -> Vec<T> {
        let mut out = vec![self.default.clone(); self.numel()];
        fill_level(&self.rows, &mut out, self.shape.as_slice(), 0, 0);
        out
    }
}

fn cast_level<T: Element, U: Element>(list: &List<T>) -> List<U> {
    let mut out = List::new();
    let mut app = out.appender();
    for node in list.iter() {
        let val = match &node.val {
            Value::List(sub) => Value::List(cast_level(sub)),
            Value::Scalar(v) => Value::Scalar(U::from_f64(v.to_f64())),
        };
        app = app.push(node.key, val);
    }
    out
}

/// Build one list level from the dense buffer.
///
/// `base` is the flat offset of this level's first coordinate; each key
/// advances by the row-major stride of the level's dimension. Keys are
/// generated in increasing order, so appending is O(1) per node.
fn dense_level<T: Element>(
    data: &[T],
    zero: &T,
    shape: &[usize],
    depth: usize,
    base: usize,
) -> List<T> {
    let extent = shape[depth];
    let stride: usize = shape[depth + 1..].iter().product();
    let innermost = depth + 1 == shape.len();

    let mut out = List::new();
    let mut app = out.appender();
    for key in 0..extent {
        let offset = base + key * stride;
        if innermost {
            let v = data[offset];
            if v != *zero {
                app = app.push(key, Value::Scalar(v));
            }
        } else {
            let sub = dense_level(data, zero, shape, depth + 1, offset);
            if !sub.is_empty() {
                app = app.push(key, Value::List(sub));
            }
        }
    }
    out
}

fn fill_level<T: Clone>(list: &List<T>, out: &mut [T], shape: &[usize], depth: usize, base: usize) {
    let stride: usize = shape[depth + 1..].iter().product();
    for node in list.iter() {
        let offset = base + node.key * stride;
        match &node.val {
            Value::List(sub) => fill_level(sub, out, shape, depth + 1, offset),
            Value::Scalar(v) => out[offset] = v.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::slice::Slice;

    use super::*;

    #[test]
    fn test_from_dense() {
        // [1, 0, 2]
        // [0, 0, 3]
        // [4, 5, 0]
        let data = [1.0f32, 0.0, 2.0, 0.0, 0.0, 3.0, 4.0, 5.0, 0.0];
        let s = ListStorage::from_dense(&data, [3, 3], 0.0).unwrap();

        assert_eq!(s.nnz(), 5);
        assert_eq!(*s.get(&Slice::point(&[0, 2])).unwrap(), 2.0);
        assert_eq!(*s.get(&Slice::point(&[2, 1])).unwrap(), 5.0);
        assert_eq!(*s.get(&Slice::point(&[1, 0])).unwrap(), 0.0);
        // row 1 only holds one entry, row-level count is 3
        assert_eq!(s.count_at_depth(0), 3);
        assert!(s.check_invariants());
    }

    #[test]
    fn test_from_dense_all_zero_row_not_materialized() {
        let data = [0i32, 0, 7, 0];
        let s = ListStorage::from_dense(&data, [2, 2], 0).unwrap();
        assert_eq!(s.count_at_depth(0), 1);
        assert_eq!(s.nnz(), 1);
        assert_eq!(*s.get(&Slice::point(&[1, 0])).unwrap(), 7);
    }

    #[test]
    fn test_from_dense_all_default_is_empty() {
        let data = [4u8; 6];
        let s = ListStorage::from_dense(&data, [2, 3], 4).unwrap();
        assert!(s.is_empty());
        assert_eq!(*s.get(&Slice::point(&[1, 2])).unwrap(), 4);
    }

    #[test]
    fn test_from_dense_length_mismatch() {
        let data = [1.0f64; 5];
        assert!(matches!(
            ListStorage::from_dense(&data, [2, 3], 0.0),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_from_dense_rank_three() {
        let mut data = [0i64; 24];
        data[0] = 1; // (0,0,0)
        data[23] = 2; // (1,2,3)
        data[7] = 3; // (0,1,3)
        let s = ListStorage::from_dense(&data, [2, 3, 4], 0).unwrap();
        assert_eq!(s.nnz(), 3);
        assert_eq!(*s.get(&Slice::point(&[1, 2, 3])).unwrap(), 2);
        assert_eq!(*s.get(&Slice::point(&[0, 1, 3])).unwrap(), 3);
        assert!(s.check_invariants());
    }

    #[test]
    fn test_to_dense_round_trip() {
        let data = [0.0f64, 1.5, 0.0, 0.0, 0.0, -2.5];
        let s = ListStorage::from_dense(&data, [2, 3], 0.0).unwrap();
        assert_eq!(s.to_dense(), data.to_vec());
    }

    #[test]
    fn test_to_dense_fills_default() {
        let mut s = ListStorage::new([2, 2], 9i32).unwrap();
        s.insert(&Slice::point(&[1, 0]), 3).unwrap();
        assert_eq!(s.to_dense(), vec![9, 9, 3, 9]);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut a = ListStorage::new([2, 2], 0i32).unwrap();
        a.insert(&Slice::point(&[0, 0]), 1).unwrap();
        let mut b = a.clone();
        b.insert(&Slice::point(&[0, 0]), 2).unwrap();
        b.insert(&Slice::point(&[1, 1]), 3).unwrap();
        assert_eq!(*a.get(&Slice::point(&[0, 0])).unwrap(), 1);
        assert_eq!(a.nnz(), 1);
        assert_eq!(b.nnz(), 2);
    }

    #[test]
    fn test_cast_preserves_topology() {
        let data = [0.0f64, 1.0, 0.0, 2.0];
        let s = ListStorage::from_dense(&data, [2, 2], 0.0).unwrap();
        let cast: ListStorage<i32> = s.cast();
        assert_eq!(cast.nnz(), s.nnz());
        assert_eq!(cast.shape(), s.shape());
        assert_eq!(*cast.get(&Slice::point(&[0, 1])).unwrap(), 1);
        assert_eq!(*cast.get(&Slice::point(&[1, 1])).unwrap(), 2);
        assert_eq!(*cast.default_value(), 0);
        assert!(cast.check_invariants());
    }

    #[test]
    fn test_cast_converts_default() {
        let s = ListStorage::new([2, 2], 3i32).unwrap();
        let cast: ListStorage<f64> = s.cast();
        assert_eq!(*cast.default_value(), 3.0);
    }

    #[test]
    fn test_cast_keeps_materialized_defaults_materialized() {
        // An explicitly stored value equal to the default stays explicit
        // through a cast: topology is preserved, not re-sparsified.
        let mut s = ListStorage::new([2, 2], 0i64).unwrap();
        s.insert(&Slice::point(&[0, 1]), 0).unwrap();
        let cast: ListStorage<i32> = s.cast();
        assert_eq!(cast.nnz(), 1);
    }

    #[cfg(feature = "f16")]
    #[test]
    fn test_cast_to_half() {
        let data = [0.0f32, 1.5, 0.0, -2.0];
        let s = ListStorage::from_dense(&data, [2, 2], 0.0).unwrap();
        let cast: ListStorage<half::f16> = s.cast();
        assert_eq!(cast.nnz(), 2);
        assert_eq!(
            cast.get(&Slice::point(&[0, 1])).unwrap().to_f64(),
            1.5
        );
    }
}
