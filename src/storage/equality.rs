//! Structural equality between sparse storages
//!
//! Two storages are equal iff they denote the same dense array over the same
//! shape: at every coordinate the effective value (materialized leaf if
//! present, else that storage's own default) must match. The two sides may
//! have different default values and different sets of materialized entries,
//! so the comparison never expands either side to dense form.
//!
//! The algorithm tracks how many coordinates were actually visited. When
//! fewer than the total coordinate count were checked, some coordinates are
//! default on both sides, so the two defaults must additionally be equal.

use crate::list::{List, Node, Value};

use super::ListStorage;

impl<T: PartialEq> PartialEq for ListStorage<T> {
    fn eq(&self, other: &Self) -> bool {
        if self.shape != other.shape {
            return false;
        }
        let max_elements = self.numel();
        let recursions = self.rank() - 1;
        let mut checked = 0usize;

        let entries_match = if self.rows.is_empty() && other.rows.is_empty() {
            // Both fully homogeneous: only the defaults matter.
            return self.default == other.default;
        } else if self.rows.is_empty() {
            list_eq_value(&other.rows, &self.default, recursions, &mut checked)
        } else if other.rows.is_empty() {
            list_eq_value(&self.rows, &other.default, recursions, &mut checked)
        } else {
            list_eq_list(
                &self.rows,
                &other.rows,
                &self.default,
                &other.default,
                recursions,
                &mut checked,
            )
        };

        // If not every coordinate was visited, the rest are default on both
        // sides and the defaults must agree too.
        entries_match && (checked == max_elements || self.default == other.default)
    }
}

/// Compare every leaf reachable from `list` against a single constant.
fn list_eq_value<T: PartialEq>(
    list: &List<T>,
    value: &T,
    recursions: usize,
    checked: &mut usize,
) -> bool {
    for node in list.iter() {
        if !node_eq_value(node, value, recursions, checked) {
            return false;
        }
    }
    true
}

fn node_eq_value<T: PartialEq>(
    node: &Node<T>,
    value: &T,
    recursions: usize,
    checked: &mut usize,
) -> bool {
    match &node.val {
        Value::Scalar(v) if recursions == 0 => {
            *checked += 1;
            v == value
        }
        Value::List(sub) if recursions > 0 => list_eq_value(sub, value, recursions - 1, checked),
        _ => false,
    }
}

/// Merge-walk two levels in key order.
///
/// Entries materialized on both sides are compared pairwise; an entry
/// materialized on only one side must equal the other side's default.
/// Coordinates materialized on neither side are implicitly equal and are
/// not visited (and not counted).
fn list_eq_list<T: PartialEq>(
    left: &List<T>,
    right: &List<T>,
    left_default: &T,
    right_default: &T,
    recursions: usize,
    checked: &mut usize,
) -> bool {
    use std::cmp::Ordering;

    let mut l = left.iter().peekable();
    let mut r = right.iter().peekable();
    loop {
        let order = match (l.peek(), r.peek()) {
            (None, None) => return true,
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some(ln), Some(rn)) => ln.key.cmp(&rn.key),
        };
        match order {
            Ordering::Less => {
                let Some(ln) = l.next() else { return false };
                if !node_eq_value(ln, right_default, recursions, checked) {
                    return false;
                }
            }
            Ordering::Greater => {
                let Some(rn) = r.next() else { return false };
                if !node_eq_value(rn, left_default, recursions, checked) {
                    return false;
                }
            }
            Ordering::Equal => {
                let (Some(ln), Some(rn)) = (l.next(), r.next()) else {
                    return false;
                };
                let ok = match (&ln.val, &rn.val) {
                    (Value::Scalar(a), Value::Scalar(b)) if recursions == 0 => {
                        *checked += 1;
                        a == b
                    }
                    (Value::List(a), Value::List(b)) if recursions > 0 => list_eq_list(
                        a,
                        b,
                        left_default,
                        right_default,
                        recursions - 1,
                        checked,
                    ),
                    _ => false,
                };
                if !ok {
                    return false;
                }
            }
        }
    }
}
