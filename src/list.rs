//! Singly linked, key-ordered list primitives
//!
//! Every dimension level of a storage is one of these lists. A node's value
//! is either a nested list (outer dimensions) or a leaf element (innermost
//! dimension); the `Value` tagged union makes that distinction explicit
//! instead of relying on depth bookkeeping, so a value can never be
//! misinterpreted at the wrong level.
//!
//! Chains are iterated, never recursed over: `find`, `insert`, `remove`,
//! `Clone` and `Drop` all walk the `next` links in a loop. Recursion only
//! happens across nesting levels, which are bounded by the storage rank.

/// Value held by a node: a nested list or a leaf element.
#[derive(Debug)]
pub(crate) enum Value<T> {
    /// A nested list for the next dimension. Never empty while attached.
    List(List<T>),
    /// A leaf element at the innermost dimension.
    Scalar(T),
}

impl<T> Value<T> {
    pub(crate) fn as_list(&self) -> Option<&List<T>> {
        match self {
            Value::List(list) => Some(list),
            Value::Scalar(_) => None,
        }
    }

    pub(crate) fn as_list_mut(&mut self) -> Option<&mut List<T>> {
        match self {
            Value::List(list) => Some(list),
            Value::Scalar(_) => None,
        }
    }

    pub(crate) fn as_scalar(&self) -> Option<&T> {
        match self {
            Value::Scalar(v) => Some(v),
            Value::List(_) => None,
        }
    }
}

impl<T: Clone> Clone for Value<T> {
    fn clone(&self) -> Self {
        match self {
            Value::List(list) => Value::List(list.clone()),
            Value::Scalar(v) => Value::Scalar(v.clone()),
        }
    }
}

/// One (coordinate, value) entry in a list.
#[derive(Debug)]
pub(crate) struct Node<T> {
    pub(crate) key: usize,
    pub(crate) val: Value<T>,
    pub(crate) next: Option<Box<Node<T>>>,
}

/// A key-ordered singly linked list.
///
/// Keys are strictly increasing along the chain; duplicates are impossible.
/// A list may only be empty while detached or at the storage root: the
/// storage layer prunes any nested list that loses its last node.
#[derive(Debug)]
pub(crate) struct List<T> {
    head: Option<Box<Node<T>>>,
}

impl<T> List<T> {
    pub(crate) fn new() -> Self {
        Self { head: None }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Find the node with `key`, stopping early once keys exceed it.
    pub(crate) fn find(&self, key: usize) -> Option<&Node<T>> {
        let mut cur = self.head.as_deref();
        while let Some(node) = cur {
            if node.key == key {
                return Some(node);
            }
            if node.key > key {
                return None;
            }
            cur = node.next.as_deref();
        }
        None
    }

    pub(crate) fn find_mut(&mut self, key: usize) -> Option<&mut Node<T>> {
        let mut cur = self.head.as_deref_mut();
        while let Some(node) = cur {
            if node.key == key {
                return Some(node);
            }
            if node.key > key {
                return None;
            }
            cur = node.next.as_deref_mut();
        }
        None
    }

    /// Sorted insert, replacing any existing entry at `key`.
    ///
    /// Returns the displaced value when `key` was already present. The
    /// displaced value is handed back to the caller, never dropped here.
    pub(crate) fn insert(&mut self, key: usize, value: Value<T>) -> Option<Value<T>> {
        let mut cur = &mut self.head;
        while cur.as_ref().is_some_and(|node| node.key < key) {
            cur = &mut cur.as_mut().unwrap().next;
        }
        match cur {
            Some(node) if node.key == key => {
                Some(std::mem::replace(&mut node.val, value))
            }
            _ => {
                let next = cur.take();
                *cur = Some(Box::new(Node { key, val: value, next }));
                None
            }
        }
    }

    /// Sorted insert that never clobbers: if `key` is already present, the
    /// existing value is returned and `value` is discarded.
    ///
    /// Used for intermediate-level creation, where descending into an
    /// existing sublevel must not replace it.
    pub(crate) fn get_or_insert(&mut self, key: usize, value: Value<T>) -> &mut Value<T> {
        let mut cur = &mut self.head;
        while cur.as_ref().is_some_and(|node| node.key < key) {
            cur = &mut cur.as_mut().unwrap().next;
        }
        if cur.as_ref().is_none_or(|node| node.key != key) {
            let next = cur.take();
            *cur = Some(Box::new(Node { key, val: value, next }));
        }
        &mut cur.as_mut().unwrap().val
    }

    /// Remove and return the value at `key`, re-linking around it.
    ///
    /// Returns `None` when the key is not materialized; this is distinct
    /// from removing an entry whose value equals some default.
    pub(crate) fn remove(&mut self, key: usize) -> Option<Value<T>> {
        let mut cur = &mut self.head;
        while cur.as_ref().is_some_and(|node| node.key < key) {
            cur = &mut cur.as_mut().unwrap().next;
        }
        if cur.as_ref().is_none_or(|node| node.key != key) {
            return None;
        }
        let node = *cur.take()?;
        *cur = node.next;
        Some(node.val)
    }

    /// Key-ordered iteration over the nodes of this level.
    pub(crate) fn iter(&self) -> Iter<'_, T> {
        Iter {
            next: self.head.as_deref(),
        }
    }

    /// Append cursor for building this list front-to-back.
    ///
    /// The list must be empty; keys must then be pushed in strictly
    /// increasing order.
    pub(crate) fn appender(&mut self) -> Appender<'_, T> {
        debug_assert!(self.is_empty(), "appender requires an empty list");
        Appender {
            link: &mut self.head,
            last_key: None,
        }
    }
}

impl<T: Clone> Clone for List<T> {
    fn clone(&self) -> Self {
        let mut out = List::new();
        let mut app = out.appender();
        for node in self.iter() {
            app = app.push(node.key, node.val.clone());
        }
        out
    }
}

impl<T> Drop for List<T> {
    fn drop(&mut self) {
        // Unlink the chain iteratively so dropping a long level cannot
        // overflow the stack; nested lists still recurse, but only one
        // level per dimension.
        let mut cur = self.head.take();
        while let Some(mut node) = cur {
            cur = node.next.take();
        }
    }
}

/// Iterator over the nodes of one list level, in key order.
pub(crate) struct Iter<'a, T> {
    next: Option<&'a Node<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a Node<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.next.as_deref();
        Some(node)
    }
}

/// Ordering-trusted append cursor.
///
/// Splices each pushed node directly behind the previously pushed one in
/// O(1), the fast path used by dense-to-sparse construction where keys are
/// generated in increasing order. Ordering is debug-asserted, not
/// re-validated in release builds.
pub(crate) struct Appender<'a, T> {
    link: &'a mut Option<Box<Node<T>>>,
    last_key: Option<usize>,
}

impl<'a, T> Appender<'a, T> {
    /// Push a node with `key` greater than every key pushed so far.
    pub(crate) fn push(self, key: usize, value: Value<T>) -> Self {
        debug_assert!(
            self.last_key.is_none_or(|last| last < key),
            "appender keys must be strictly increasing"
        );
        let node = self.link.insert(Box::new(Node {
            key,
            val: value,
            next: None,
        }));
        Appender {
            link: &mut node.next,
            last_key: Some(key),
        }
    }
}
