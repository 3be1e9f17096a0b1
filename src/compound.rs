//! Strings, binary blobs, arrays, maps and optional values
//!
//! Every compound value starts with a length header in its own tag space,
//! using the smallest form that fits:
//!
//! | kind   | inline           | 8-bit  | 16-bit | 32-bit |
//! |--------|------------------|--------|--------|--------|
//! | string | fixstr (0..=31)  | `0xd9` | `0xda` | `0xdb` |
//! | binary | -                | `0xc4` | `0xc5` | `0xc6` |
//! | array  | fixarray (0..=15)| -      | `0xdc` | `0xdd` |
//! | map    | fixmap (0..=15)  | -      | `0xde` | `0xdf` |
//!
//! Lengths are big-endian. Lengths above `u32::MAX` cannot be expressed by
//! the format; encoding a longer string, blob, sequence or map panics
//! instead of writing a truncated header.

use alloc::collections::BTreeMap;
use alloc::ffi::CString;
use alloc::string::String;
use alloc::vec::Vec;
use core::ffi::CStr;
use core::ops::Deref;

#[cfg(feature = "std")]
use core::hash::{BuildHasher, Hash};
#[cfg(feature = "std")]
use std::collections::HashMap;

use crate::aggregate::{Decode, Encode, NonNil};
use crate::buffer::Buffer;
use crate::error::{Error, Result};
use crate::marker::{Marker, MAX_FIXARRAY_LEN, MAX_FIXMAP_LEN, MAX_FIXSTR_LEN};

// Panics if `len` does not fit the 32-bit header.
#[inline]
fn put_len(buf: &mut Buffer, tag8: Option<Marker>, tag16: Marker, tag32: Marker, len: usize) {
    assert!(u32::try_from(len).is_ok(), "length {} exceeds u32::MAX", len);

    match tag8 {
        Some(tag) if len <= usize::from(u8::MAX) => buf.put_tagged(tag.to_u8(), &[len as u8]),
        _ if len <= usize::from(u16::MAX) => buf.put_tagged(tag16.to_u8(), &(len as u16).to_be_bytes()),
        _ => buf.put_tagged(tag32.to_u8(), &(len as u32).to_be_bytes()),
    }
}

/// Read a big-endian length of `N` bytes
#[inline]
pub(crate) fn read_be_len<const N: usize>(buf: &Buffer) -> Result<usize> {
    let bytes = buf.get_array::<N>()?;
    Ok(bytes.iter().fold(0usize, |acc, &b| (acc << 8) | usize::from(b)))
}

/// Write a string header for `len` bytes
///
/// # Panics
///
/// Panics if `len` exceeds `u32::MAX`.
#[inline]
pub fn write_str_len(buf: &mut Buffer, len: usize) {
    if len <= MAX_FIXSTR_LEN {
        buf.put_u8(Marker::FixStr(len as u8).to_u8());
    } else {
        put_len(buf, Some(Marker::Str8), Marker::Str16, Marker::Str32, len);
    }
}

/// Write a binary header for `len` bytes
///
/// # Panics
///
/// Panics if `len` exceeds `u32::MAX`.
#[inline]
pub fn write_bin_len(buf: &mut Buffer, len: usize) {
    put_len(buf, Some(Marker::Bin8), Marker::Bin16, Marker::Bin32, len);
}

/// Write an array header for `len` elements
///
/// # Panics
///
/// Panics if `len` exceeds `u32::MAX`.
#[inline]
pub fn write_array_len(buf: &mut Buffer, len: usize) {
    if len <= MAX_FIXARRAY_LEN {
        buf.put_u8(Marker::FixArray(len as u8).to_u8());
    } else {
        put_len(buf, None, Marker::Array16, Marker::Array32, len);
    }
}

/// Write a map header for `len` key/value pairs
///
/// # Panics
///
/// Panics if `len` exceeds `u32::MAX`.
#[inline]
pub fn write_map_len(buf: &mut Buffer, len: usize) {
    if len <= MAX_FIXMAP_LEN {
        buf.put_u8(Marker::FixMap(len as u8).to_u8());
    } else {
        put_len(buf, None, Marker::Map16, Marker::Map32, len);
    }
}

/// Read a string header
#[inline]
pub fn read_str_len(buf: &Buffer) -> Result<usize> {
    match buf.get_marker()? {
        Marker::FixStr(len) => Ok(usize::from(len)),
        Marker::Str8 => read_be_len::<1>(buf),
        Marker::Str16 => read_be_len::<2>(buf),
        Marker::Str32 => read_be_len::<4>(buf),
        _ => Err(Error::CorruptedData),
    }
}

/// Read a binary header
#[inline]
pub fn read_bin_len(buf: &Buffer) -> Result<usize> {
    match buf.get_marker()? {
        Marker::Bin8 => read_be_len::<1>(buf),
        Marker::Bin16 => read_be_len::<2>(buf),
        Marker::Bin32 => read_be_len::<4>(buf),
        _ => Err(Error::CorruptedData),
    }
}

/// Read an array header
#[inline]
pub fn read_array_len(buf: &Buffer) -> Result<usize> {
    match buf.get_marker()? {
        Marker::FixArray(len) => Ok(usize::from(len)),
        Marker::Array16 => read_be_len::<2>(buf),
        Marker::Array32 => read_be_len::<4>(buf),
        _ => Err(Error::CorruptedData),
    }
}

/// Read a map header
#[inline]
pub fn read_map_len(buf: &Buffer) -> Result<usize> {
    match buf.get_marker()? {
        Marker::FixMap(len) => Ok(usize::from(len)),
        Marker::Map16 => read_be_len::<2>(buf),
        Marker::Map32 => read_be_len::<4>(buf),
        _ => Err(Error::CorruptedData),
    }
}

impl NonNil for str {}
impl NonNil for String {}
impl NonNil for CStr {}
impl NonNil for CString {}
impl NonNil for Bytes<'_> {}
impl NonNil for ByteBuf {}
impl<T> NonNil for [T] {}
impl<T, const N: usize> NonNil for [T; N] {}
impl<T> NonNil for Vec<T> {}
impl<K, V> NonNil for BTreeMap<K, V> {}
#[cfg(feature = "std")]
impl<K, V, S> NonNil for HashMap<K, V, S> {}

#[inline]
fn read_payload(buf: &Buffer, len: usize) -> Result<&[u8]> {
    buf.skip(len).ok_or(Error::UnexpectedEnd)
}

#[inline]
fn read_str_bytes(buf: &Buffer) -> Result<&[u8]> {
    let len = read_str_len(buf)?;
    read_payload(buf, len)
}

#[inline]
fn read_utf8(buf: &Buffer) -> Result<&str> {
    core::str::from_utf8(read_str_bytes(buf)?).map_err(|_| Error::CorruptedData)
}

impl Encode for str {
    #[inline]
    fn encode(&self, buf: &mut Buffer) {
        write_str_len(buf, self.len());
        buf.put_bytes(self.as_bytes());
    }
}

impl Encode for String {
    #[inline]
    fn encode(&self, buf: &mut Buffer) {
        self.as_str().encode(buf)
    }
}

impl<'de> Decode<'de> for String {
    fn decode(&mut self, buf: &'de Buffer) -> Result<()> {
        let s = read_utf8(buf)?;
        self.clear();
        self.push_str(s);
        Ok(())
    }
}

impl<'de> Decode<'de> for &'de str {
    #[inline]
    fn decode(&mut self, buf: &'de Buffer) -> Result<()> {
        *self = read_utf8(buf)?;
        Ok(())
    }
}

/// C strings are written as strings whose length counts the trailing NUL
impl Encode for CStr {
    #[inline]
    fn encode(&self, buf: &mut Buffer) {
        let bytes = self.to_bytes_with_nul();
        write_str_len(buf, bytes.len());
        buf.put_bytes(bytes);
    }
}

impl Encode for CString {
    #[inline]
    fn encode(&self, buf: &mut Buffer) {
        self.as_c_str().encode(buf)
    }
}

impl<'de> Decode<'de> for CString {
    fn decode(&mut self, buf: &'de Buffer) -> Result<()> {
        let bytes = read_str_bytes(buf)?;
        *self = CString::from_vec_with_nul(bytes.to_vec()).map_err(|_| Error::CorruptedData)?;
        Ok(())
    }
}

impl<'de> Decode<'de> for &'de CStr {
    #[inline]
    fn decode(&mut self, buf: &'de Buffer) -> Result<()> {
        *self = CStr::from_bytes_with_nul(read_str_bytes(buf)?).map_err(|_| Error::CorruptedData)?;
        Ok(())
    }
}

/// Borrowed binary blob
///
/// Decoding yields a view into the buffer's storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Bytes<'a>(pub &'a [u8]);

/// Owned binary blob
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ByteBuf(pub Vec<u8>);

impl Deref for Bytes<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.0
    }
}

impl Deref for ByteBuf {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for ByteBuf {
    fn from(bytes: Vec<u8>) -> Self {
        ByteBuf(bytes)
    }
}

impl Encode for Bytes<'_> {
    #[inline]
    fn encode(&self, buf: &mut Buffer) {
        write_bin_len(buf, self.0.len());
        buf.put_bytes(self.0);
    }
}

impl<'de> Decode<'de> for Bytes<'de> {
    #[inline]
    fn decode(&mut self, buf: &'de Buffer) -> Result<()> {
        let len = read_bin_len(buf)?;
        self.0 = read_payload(buf, len)?;
        Ok(())
    }
}

impl Encode for ByteBuf {
    #[inline]
    fn encode(&self, buf: &mut Buffer) {
        Bytes(&self.0).encode(buf)
    }
}

impl<'de> Decode<'de> for ByteBuf {
    fn decode(&mut self, buf: &'de Buffer) -> Result<()> {
        let len = read_bin_len(buf)?;
        let bytes = read_payload(buf, len)?;
        self.0.clear();
        self.0.extend_from_slice(bytes);
        Ok(())
    }
}

impl<T: Encode> Encode for [T] {
    fn encode(&self, buf: &mut Buffer) {
        write_array_len(buf, self.len());
        for item in self {
            item.encode(buf);
        }
    }
}

impl<T: Encode, const N: usize> Encode for [T; N] {
    #[inline]
    fn encode(&self, buf: &mut Buffer) {
        self.as_slice().encode(buf)
    }
}

/// Fixed-size arrays only accept a declared count equal to `N`
impl<'de, T: Decode<'de>, const N: usize> Decode<'de> for [T; N] {
    fn decode(&mut self, buf: &'de Buffer) -> Result<()> {
        if read_array_len(buf)? != N {
            return Err(Error::CorruptedData);
        }
        for item in self.iter_mut() {
            item.decode(buf)?;
        }
        Ok(())
    }
}

impl<T: Encode> Encode for Vec<T> {
    #[inline]
    fn encode(&self, buf: &mut Buffer) {
        self.as_slice().encode(buf)
    }
}

/// The declared count is trusted for elements that encode to zero bytes,
/// such as `()` or field-less aggregates: `Vec<()>` decodes that many units
/// without reading anything further. Allocation is bounded by the bytes
/// remaining, so zero-sized elements cost time, not memory.
impl<'de, T: Decode<'de> + Default> Decode<'de> for Vec<T> {
    fn decode(&mut self, buf: &'de Buffer) -> Result<()> {
        let len = read_array_len(buf)?;
        self.clear();
        // A corrupt count must not drive the allocation
        self.reserve(len.min(buf.remaining()));

        for _ in 0..len {
            let mut item = T::default();
            item.decode(buf)?;
            self.push(item);
        }
        Ok(())
    }
}

impl<K: Encode, V: Encode> Encode for BTreeMap<K, V> {
    fn encode(&self, buf: &mut Buffer) {
        write_map_len(buf, self.len());
        for (key, value) in self {
            key.encode(buf);
            value.encode(buf);
        }
    }
}

impl<'de, K, V> Decode<'de> for BTreeMap<K, V>
where
    K: Decode<'de> + Default + Ord,
    V: Decode<'de> + Default,
{
    fn decode(&mut self, buf: &'de Buffer) -> Result<()> {
        let len = read_map_len(buf)?;
        self.clear();

        for _ in 0..len {
            let mut key = K::default();
            key.decode(buf)?;
            let mut value = V::default();
            value.decode(buf)?;
            self.insert(key, value);
        }
        Ok(())
    }
}

#[cfg(feature = "std")]
impl<K: Encode, V: Encode, S> Encode for HashMap<K, V, S> {
    fn encode(&self, buf: &mut Buffer) {
        write_map_len(buf, self.len());
        for (key, value) in self {
            key.encode(buf);
            value.encode(buf);
        }
    }
}

#[cfg(feature = "std")]
impl<'de, K, V, S> Decode<'de> for HashMap<K, V, S>
where
    K: Decode<'de> + Default + Eq + Hash,
    V: Decode<'de> + Default,
    S: BuildHasher,
{
    fn decode(&mut self, buf: &'de Buffer) -> Result<()> {
        let len = read_map_len(buf)?;
        self.clear();
        self.reserve(len.min(buf.remaining()));

        for _ in 0..len {
            let mut key = K::default();
            key.decode(buf)?;
            let mut value = V::default();
            value.decode(buf)?;
            self.insert(key, value);
        }
        Ok(())
    }
}

/// `None` is written as nil, `Some(v)` as `v`
///
/// [`NonNil`] keeps `v` from starting with a nil tag of its own.
impl<T: Encode + NonNil> Encode for Option<T> {
    #[inline]
    fn encode(&self, buf: &mut Buffer) {
        match self {
            Some(value) => value.encode(buf),
            None => buf.put_u8(Marker::Nil.to_u8()),
        }
    }
}

impl<'de, T: Decode<'de> + Default + NonNil> Decode<'de> for Option<T> {
    fn decode(&mut self, buf: &'de Buffer) -> Result<()> {
        if buf.peek_marker() == Some(Marker::Nil) {
            buf.get_u8()?;
            *self = None;
            return Ok(());
        }

        match self {
            Some(value) => value.decode(buf),
            None => {
                let mut value = T::default();
                value.decode(buf)?;
                *self = Some(value);
                Ok(())
            }
        }
    }
}
