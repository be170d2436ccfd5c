//! Immutable, cheaply-cloneable byte buffer returned from cache reads.
//!
//! # Defensive Copying
//!
//! [`ByteView`] shares its backing storage internally (inside the cache, and
//! between clones of the same view) but never exposes a reference that would
//! let a caller mutate cached bytes. [`ByteView::bytes`] always materializes
//! a fresh `Vec<u8>`; the only way to get at the shared storage without
//! copying is [`ByteView::as_slice`], which borrows for the view's lifetime
//! and therefore cannot outlive (or mutate through) the cache.
//!
//! # Why `bytes::Bytes`
//!
//! The backing storage is `bytes::Bytes`, a reference-counted immutable
//! buffer. Cloning a `ByteView` bumps a refcount rather than copying the
//! buffer, which is what makes it safe for [`crate::lru::LruCache`] to retain
//! a copy while also handing one back to the caller on every `Get`.

use bytes::Bytes;
use std::fmt;

/// An immutable view over a byte buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct ByteView(Bytes);

impl ByteView {
    /// Creates a view that owns a copy of `data`.
    pub fn from_bytes(data: &[u8]) -> Self {
        ByteView(Bytes::copy_from_slice(data))
    }

    /// Creates a view taking ownership of an existing buffer without copying.
    pub fn from_vec(data: Vec<u8>) -> Self {
        ByteView(Bytes::from(data))
    }

    /// Returns the number of bytes in the view.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the view holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a fresh copy of the underlying bytes.
    ///
    /// Mutating the returned `Vec` never affects this view or any other clone
    /// of it, nor the copy held by the cache.
    pub fn bytes(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    /// Borrows the underlying bytes without copying.
    ///
    /// The borrow is tied to this view's lifetime, so it cannot be used to
    /// mutate cached storage.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Returns the bytes interpreted as UTF-8, copying if necessary.
    ///
    /// Invalid UTF-8 is replaced per [`String::from_utf8_lossy`].
    pub fn as_str(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }
}

impl crate::entry::Weighted for ByteView {
    fn weight(&self) -> usize {
        self.len()
    }
}

impl fmt::Debug for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteView").field("len", &self.len()).finish()
    }
}

impl From<&str> for ByteView {
    fn from(s: &str) -> Self {
        ByteView::from_bytes(s.as_bytes())
    }
}

impl From<String> for ByteView {
    fn from(s: String) -> Self {
        ByteView::from_vec(s.into_bytes())
    }
}

impl From<Vec<u8>> for ByteView {
    fn from(v: Vec<u8>) -> Self {
        ByteView::from_vec(v)
    }
}
