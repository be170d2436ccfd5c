//! Intrusive doubly linked list used by [`crate::lru::LruCache`] to track
//! recency order in O(1).
//!
//! This module is internal infrastructure: it exposes raw-pointer operations
//! that require careful invariant maintenance and should not be used outside
//! of [`crate::lru`].

use std::fmt;
use std::mem;
use std::ptr;

/// A node in the doubly linked list.
pub(crate) struct Node<T> {
    val: mem::MaybeUninit<T>,
    prev: *mut Node<T>,
    next: *mut Node<T>,
}

impl<T> Node<T> {
    fn new(val: T) -> Self {
        Node {
            val: mem::MaybeUninit::new(val),
            prev: ptr::null_mut(),
            next: ptr::null_mut(),
        }
    }

    fn new_sigil() -> Self {
        Node {
            val: mem::MaybeUninit::uninit(),
            prev: ptr::null_mut(),
            next: ptr::null_mut(),
        }
    }

    /// # Safety
    /// Caller must ensure this is not a sigil node.
    pub(crate) unsafe fn value(&self) -> &T {
        unsafe { self.val.assume_init_ref() }
    }

    /// # Safety
    /// Caller must ensure this is not a sigil node.
    pub(crate) unsafe fn value_mut(&mut self) -> &mut T {
        unsafe { self.val.assume_init_mut() }
    }
}

/// An unbounded doubly linked list with O(1) push-front, move-to-front, and
/// removal from either end or from the middle given a node pointer.
///
/// Capacity is not tracked here: [`crate::lru::LruCache`] enforces its own
/// byte-weighted capacity and calls [`List::remove_last`] as needed.
pub(crate) struct List<T> {
    len: usize,
    head: *mut Node<T>,
    tail: *mut Node<T>,
}

impl<T> List<T> {
    pub(crate) fn new() -> Self {
        let head = Box::into_raw(Box::new(Node::new_sigil()));
        let tail = Box::into_raw(Box::new(Node::new_sigil()));

        // SAFETY: head and tail were just allocated and are valid, distinct pointers.
        unsafe {
            (*head).next = tail;
            (*tail).prev = head;
        }

        List { len: 0, head, tail }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Pushes `v` to the front (MRU end) and returns a pointer to its node.
    pub(crate) fn push_front(&mut self, v: T) -> *mut Node<T> {
        let node = Box::into_raw(Box::new(Node::new(v)));
        // SAFETY: node is freshly allocated and not part of any list yet.
        unsafe { self.attach(node) };
        self.len += 1;
        node
    }

    /// Removes and returns the value at the back (LRU end), if any.
    pub(crate) fn remove_last(&mut self) -> Option<T> {
        // SAFETY: head/tail are valid sentinels initialized in `new`.
        let prev = unsafe { (*self.tail).prev };
        if prev == self.head {
            return None;
        }
        // SAFETY: prev is a real (non-sigil) node since it isn't head.
        unsafe {
            self._detach(prev);
            self.len -= 1;
            let boxed = Box::from_raw(prev);
            Some(boxed.val.assume_init())
        }
    }

    /// Removes a node given its pointer and returns its value.
    ///
    /// # Safety
    /// `node` must be a live, non-sentinel node that belongs to this list.
    pub(crate) unsafe fn remove(&mut self, node: *mut Node<T>) -> T {
        unsafe {
            self._detach(node);
            self.len -= 1;
            let boxed = Box::from_raw(node);
            boxed.val.assume_init()
        }
    }

    /// Moves `node` to the front (MRU end) of the list.
    ///
    /// # Safety
    /// `node` must be a live, non-sentinel node that belongs to this list.
    pub(crate) unsafe fn move_to_front(&mut self, node: *mut Node<T>) {
        // SAFETY: head is a valid sentinel.
        if unsafe { (*self.head).next } == node {
            return;
        }
        unsafe {
            self._detach(node);
            self.attach(node);
        }
    }

    /// # Safety
    /// `node` must be a live node in this list (sentinel or not).
    unsafe fn _detach(&mut self, node: *mut Node<T>) {
        unsafe {
            (*(*node).prev).next = (*node).next;
            (*(*node).next).prev = (*node).prev;
        }
    }

    /// # Safety
    /// `node` must not already be attached to this (or any) list.
    unsafe fn attach(&mut self, node: *mut Node<T>) {
        unsafe {
            (*node).next = (*self.head).next;
            (*node).prev = self.head;
            (*(*self.head).next).prev = node;
            (*self.head).next = node;
        }
    }

    /// # Safety
    /// `node` must point at a live, non-sentinel node belonging to this list.
    pub(crate) unsafe fn value(&self, node: *mut Node<T>) -> &T {
        unsafe { (*node).value() }
    }

    /// # Safety
    /// `node` must point at a live, non-sentinel node belonging to this list.
    pub(crate) unsafe fn value_mut(&mut self, node: *mut Node<T>) -> &mut T {
        unsafe { (*node).value_mut() }
    }

    pub(crate) fn clear(&mut self) {
        while self.remove_last().is_some() {}
    }
}

impl<T> Drop for List<T> {
    fn drop(&mut self) {
        self.clear();
        // SAFETY: head and tail are valid pointers allocated in `new` and never
        // freed elsewhere.
        unsafe {
            drop(Box::from_raw(self.head));
            drop(Box::from_raw(self.tail));
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("List").field("len", &self.len).finish()
    }
}

// SAFETY: List owns all its nodes exclusively; no aliasing is possible without
// an explicit unsafe call from outside this module.
unsafe impl<T: Send> Send for List<T> {}
