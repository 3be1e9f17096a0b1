//! Growable byte buffer with independent read and write cursors
//!
//! A [`Buffer`] starts out with [`INLINE_CAPACITY`] bytes of storage embedded
//! in the value itself and moves to a heap allocation only once that is
//! exceeded. Appends advance the write cursor; decoding advances the read
//! cursor.
//!
//! Reads never panic. A read that would run past the written bytes copies
//! nothing but still advances the read cursor, which leaves the buffer in a
//! state where [`Buffer::valid`] reports [`Error::UnexpectedEnd`]. A whole
//! message can therefore be decoded and checked once at the end, while the
//! typed getters ([`Buffer::get_u8`], [`Buffer::get_array`]) also report the
//! overrun immediately.
//!
//! The read cursor is a [`Cell`], so reads only need `&self`. Zero-copy views
//! returned by [`Buffer::skip`] borrow the buffer, which keeps it from being
//! written to or reset while they are alive.

use alloc::boxed::Box;
use alloc::vec;
use core::cell::Cell;
use core::fmt;

use crate::error::{Error, Result};
use crate::INLINE_CAPACITY;

#[derive(Clone)]
enum Storage {
    Inline([u8; INLINE_CAPACITY]),
    Heap(Box<[u8]>),
}

impl Storage {
    #[inline]
    fn bytes(&self) -> &[u8] {
        match self {
            Storage::Inline(bytes) => bytes,
            Storage::Heap(bytes) => bytes,
        }
    }

    #[inline]
    fn bytes_mut(&mut self) -> &mut [u8] {
        match self {
            Storage::Inline(bytes) => bytes,
            Storage::Heap(bytes) => bytes,
        }
    }
}

/// Byte buffer holding one encoded value stream
#[derive(Clone)]
pub struct Buffer {
    storage: Storage,
    len: usize,
    read_pos: Cell<usize>,
}

impl Buffer {
    /// Create an empty buffer using inline storage
    #[inline]
    pub fn new() -> Self {
        Self {
            storage: Storage::Inline([0u8; INLINE_CAPACITY]),
            len: 0,
            read_pos: Cell::new(0),
        }
    }

    /// Create an empty buffer able to hold at least `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        let mut buf = Self::new();
        buf.reserve(capacity);
        buf
    }

    /// Number of written bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if nothing has been written
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Size of the allocated storage in bytes
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.bytes().len()
    }

    /// Check if the buffer has moved to heap storage
    #[inline]
    pub fn is_heap(&self) -> bool {
        matches!(self.storage, Storage::Heap(_))
    }

    /// Get the written bytes
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.storage.bytes()[..self.len]
    }

    /// Grow storage to at least `capacity` bytes
    ///
    /// Written bytes and both cursors are preserved. Does nothing if the
    /// buffer is already large enough.
    pub fn reserve(&mut self, capacity: usize) {
        let current = self.capacity();
        if capacity <= current {
            return;
        }

        let mut data = vec![0u8; capacity].into_boxed_slice();
        data[..self.len].copy_from_slice(self.as_slice());

        tracing::trace!(from = current, to = capacity, len = self.len, "buffer storage grown");
        self.storage = Storage::Heap(data);
    }

    #[inline]
    fn ensure_capacity(&mut self, additional: usize) {
        let needed = self.len + additional;
        let capacity = self.capacity();
        if needed > capacity {
            self.reserve(needed.max(capacity * 3 / 2));
        }
    }

    /// Append raw bytes
    #[inline]
    pub fn put_bytes(&mut self, bytes: &[u8]) {
        self.ensure_capacity(bytes.len());
        let end = self.len + bytes.len();
        self.storage.bytes_mut()[self.len..end].copy_from_slice(bytes);
        self.len = end;
    }

    /// Append a single byte
    ///
    /// Doubles the capacity when full instead of going through the generic
    /// growth check.
    #[inline]
    pub fn put_u8(&mut self, value: u8) {
        if self.len == self.capacity() {
            self.reserve(self.capacity() * 2);
        }
        self.storage.bytes_mut()[self.len] = value;
        self.len += 1;
    }

    /// Append a fixed number of bytes known at compile time
    #[inline]
    pub fn put_array<const N: usize>(&mut self, bytes: &[u8; N]) {
        if N == 1 {
            self.put_u8(bytes[0]);
        } else {
            self.put_bytes(bytes);
        }
    }

    /// Append a tag byte followed by a fixed-width payload
    #[inline]
    pub fn put_tagged<const N: usize>(&mut self, tag: u8, payload: &[u8; N]) {
        self.ensure_capacity(1 + N);
        let start = self.len;
        let data = self.storage.bytes_mut();
        data[start] = tag;
        data[start + 1..start + 1 + N].copy_from_slice(payload);
        self.len = start + 1 + N;
    }

    /// Current read position
    #[inline]
    pub fn tell(&self) -> usize {
        self.read_pos.get()
    }

    /// Bytes left between the read cursor and the end of written data
    #[inline]
    pub fn remaining(&self) -> usize {
        self.len.saturating_sub(self.tell())
    }

    /// Check that no read has run past the written bytes
    #[inline]
    pub fn valid(&self) -> Result<()> {
        if self.tell() <= self.len {
            Ok(())
        } else {
            Err(Error::UnexpectedEnd)
        }
    }

    /// Copy `out.len()` bytes from the read cursor into `out`
    ///
    /// The copy only happens if all bytes are available. The read cursor
    /// advances either way; check [`Buffer::valid`] before trusting `out`.
    #[inline]
    pub fn read(&self, out: &mut [u8]) {
        let pos = self.tell();
        let end = pos.saturating_add(out.len());
        if end <= self.len {
            out.copy_from_slice(&self.as_slice()[pos..end]);
        }
        self.read_pos.set(end);
    }

    /// Read a single byte
    #[inline]
    pub fn get_u8(&self) -> Result<u8> {
        let pos = self.tell();
        self.read_pos.set(pos.saturating_add(1));
        self.as_slice().get(pos).copied().ok_or(Error::UnexpectedEnd)
    }

    /// Read a fixed number of bytes known at compile time
    #[inline]
    pub fn get_array<const N: usize>(&self) -> Result<[u8; N]> {
        let pos = self.tell();
        let end = pos.saturating_add(N);
        self.read_pos.set(end);

        let bytes = self.as_slice().get(pos..end).ok_or(Error::UnexpectedEnd)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Look at the next byte without advancing the read cursor
    #[inline]
    pub fn peek_u8(&self) -> Option<u8> {
        self.as_slice().get(self.tell()).copied()
    }

    /// Move the read cursor to `offset`
    ///
    /// Returns the bytes passed over when moving forward within the written
    /// data, `None` otherwise. The cursor is moved regardless.
    #[inline]
    pub fn seek(&self, offset: usize) -> Option<&[u8]> {
        let start = self.tell();
        self.read_pos.set(offset);
        if start <= offset && offset <= self.len {
            Some(&self.as_slice()[start..offset])
        } else {
            None
        }
    }

    /// Advance the read cursor by `n` bytes, returning a view of them
    ///
    /// Returns `None` if the bytes are not all available; the cursor still
    /// advances.
    #[inline]
    pub fn skip(&self, n: usize) -> Option<&[u8]> {
        self.seek(self.tell().saturating_add(n))
    }

    /// Rewind both cursors to the start
    ///
    /// With `free_memory` set, heap storage is released and the buffer goes
    /// back to its inline capacity.
    pub fn reset(&mut self, free_memory: bool) {
        if free_memory && self.is_heap() {
            tracing::trace!(capacity = self.capacity(), "releasing buffer heap storage");
            self.storage = Storage::Inline([0u8; INLINE_CAPACITY]);
        }

        self.len = 0;
        self.read_pos.set(0);
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .field("read_pos", &self.tell())
            .field("heap", &self.is_heap())
            .finish()
    }
}

impl From<&[u8]> for Buffer {
    fn from(bytes: &[u8]) -> Self {
        let mut buf = Self::with_capacity(bytes.len());
        buf.put_bytes(bytes);
        buf
    }
}
