//! Extension values
//!
//! An extension is an opaque fixed-size payload tagged with an application
//! type id in `-128..=127`. Payloads of 1, 2, 4, 8 or 16 bytes use the
//! single-byte `fixext` tags; anything else gets an `ext8/16/32` header
//! carrying the length, followed by the type id.
//!
//! Plain-old-data types register with [`extension!`](crate::extension!):
//!
//! ```rust
//! use minipack::{bytemuck, extension, Buffer};
//!
//! #[repr(C)]
//! #[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
//! struct Point {
//!     x: f32,
//!     y: f32,
//! }
//! extension!(Point, 3);
//!
//! let mut buf = Buffer::new();
//! minipack::encode(&mut buf, &Point { x: 1.0, y: 2.0 });
//! assert_eq!(buf.as_slice()[..2], [0xd7, 3]);
//!
//! let mut point = Point::default();
//! minipack::decode(&buf, &mut point)?;
//! assert_eq!(point, Point { x: 1.0, y: 2.0 });
//! # Ok::<(), minipack::Error>(())
//! ```
//!
//! The payload is the value's in-memory representation, so both ends must
//! agree on its layout and byte order.

use crate::aggregate::{Decode, Encode, NonNil};
use crate::buffer::Buffer;
use crate::compound::read_be_len;
use crate::error::{Error, Result};
use crate::marker::Marker;

/// Write an extension header for a payload of `len` bytes
///
/// # Panics
///
/// Panics if `len` exceeds `u32::MAX`.
pub fn write_ext_header(buf: &mut Buffer, type_id: i8, len: usize) {
    let type_byte = type_id as u8;

    match len {
        1 => buf.put_tagged(Marker::FixExt1.to_u8(), &[type_byte]),
        2 => buf.put_tagged(Marker::FixExt2.to_u8(), &[type_byte]),
        4 => buf.put_tagged(Marker::FixExt4.to_u8(), &[type_byte]),
        8 => buf.put_tagged(Marker::FixExt8.to_u8(), &[type_byte]),
        16 => buf.put_tagged(Marker::FixExt16.to_u8(), &[type_byte]),
        _ => {
            if let Ok(n) = u8::try_from(len) {
                buf.put_tagged(Marker::Ext8.to_u8(), &[n]);
            } else if let Ok(n) = u16::try_from(len) {
                buf.put_tagged(Marker::Ext16.to_u8(), &n.to_be_bytes());
            } else if let Ok(n) = u32::try_from(len) {
                buf.put_tagged(Marker::Ext32.to_u8(), &n.to_be_bytes());
            } else {
                panic!("extension length {} exceeds u32::MAX", len);
            }
            buf.put_u8(type_byte);
        }
    }
}

/// Write an extension header and payload
///
/// # Panics
///
/// Panics if the payload is longer than `u32::MAX` bytes.
#[inline]
pub fn write_ext(buf: &mut Buffer, type_id: i8, payload: &[u8]) {
    write_ext_header(buf, type_id, payload.len());
    buf.put_bytes(payload);
}

// Returns the declared payload length and type id.
fn read_ext_header(buf: &Buffer) -> Result<(usize, i8)> {
    let len = match buf.get_marker()? {
        Marker::FixExt1 => 1,
        Marker::FixExt2 => 2,
        Marker::FixExt4 => 4,
        Marker::FixExt8 => 8,
        Marker::FixExt16 => 16,
        Marker::Ext8 => read_be_len::<1>(buf)?,
        Marker::Ext16 => read_be_len::<2>(buf)?,
        Marker::Ext32 => read_be_len::<4>(buf)?,
        _ => return Err(Error::CorruptedData),
    };
    let type_id = buf.get_u8()? as i8;
    Ok((len, type_id))
}

/// Read an extension expected to carry `len` bytes with type id `type_id`
///
/// Both the declared length and the type id are checked before the payload
/// is touched; a mismatch in either is [`Error::CorruptedData`]. Returns a
/// view of the payload inside the buffer.
pub fn read_ext(buf: &Buffer, type_id: i8, len: usize) -> Result<&[u8]> {
    let (declared, found) = read_ext_header(buf)?;
    if declared != len || found != type_id {
        return Err(Error::CorruptedData);
    }
    buf.skip(len).ok_or(Error::UnexpectedEnd)
}

/// Extension of any type id and length, borrowed from the buffer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ExtRef<'a> {
    /// Application type id
    pub type_id: i8,
    /// Raw payload
    pub data: &'a [u8],
}

impl NonNil for ExtRef<'_> {}

impl Encode for ExtRef<'_> {
    #[inline]
    fn encode(&self, buf: &mut Buffer) {
        write_ext(buf, self.type_id, self.data);
    }
}

impl<'de> Decode<'de> for ExtRef<'de> {
    fn decode(&mut self, buf: &'de Buffer) -> Result<()> {
        let (len, type_id) = read_ext_header(buf)?;
        self.data = buf.skip(len).ok_or(Error::UnexpectedEnd)?;
        self.type_id = type_id;
        Ok(())
    }
}

/// Register a [`bytemuck::Pod`] type as an extension with the given type id
///
/// Implements [`Encode`](crate::Encode) and [`Decode`](crate::Decode) for
/// the type. Decoding fails with
/// [`Error::CorruptedData`](crate::Error::CorruptedData) unless both the
/// payload size and the type id match.
#[macro_export]
macro_rules! extension {
    ($ty:ty, $type_id:expr) => {
        impl $crate::Encode for $ty {
            #[inline]
            fn encode(&self, buf: &mut $crate::Buffer) {
                $crate::ext::write_ext(buf, $type_id, $crate::bytemuck::bytes_of(self));
            }
        }

        impl<'de> $crate::Decode<'de> for $ty {
            #[inline]
            fn decode(&mut self, buf: &'de $crate::Buffer) -> $crate::Result<()> {
                let payload =
                    $crate::ext::read_ext(buf, $type_id, ::core::mem::size_of::<$ty>())?;
                *self = $crate::bytemuck::pod_read_unaligned(payload);
                Ok(())
            }
        }

        impl $crate::NonNil for $ty {}
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::to_vec;
    use alloc::vec;
    use alloc::vec::Vec;

    #[repr(C)]
    #[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
    struct Matrix3x3 {
        m: [f32; 9],
    }
    crate::extension!(Matrix3x3, 0);

    #[repr(C)]
    #[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
    struct Transform {
        m: [f32; 9],
    }
    crate::extension!(Transform, 1);

    #[repr(C)]
    #[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
    struct Tiny {
        a: u16,
    }
    crate::extension!(Tiny, -7);

    const IDENTITY: Matrix3x3 = Matrix3x3 {
        m: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
    };

    #[test]
    fn test_fixext_headers() {
        for (len, tag) in [(1usize, 0xd4u8), (2, 0xd5), (4, 0xd6), (8, 0xd7), (16, 0xd8)] {
            let payload: Vec<u8> = (0..len as u8).collect();
            let mut buf = Buffer::new();
            write_ext(&mut buf, 5, &payload);
            assert_eq!(buf.as_slice()[..2], [tag, 5]);
            assert_eq!(&buf.as_slice()[2..], &payload[..]);
        }
    }

    #[test]
    fn test_generic_ext_headers() {
        let mut buf = Buffer::new();
        write_ext(&mut buf, -1, &[0u8; 3]);
        assert_eq!(buf.as_slice()[..3], [0xc7, 3, 0xff]);

        let mut buf = Buffer::new();
        write_ext(&mut buf, 2, &[0u8; 300]);
        assert_eq!(buf.as_slice()[..4], [0xc8, 0x01, 0x2c, 2]);
        assert_eq!(buf.len(), 4 + 300);
    }

    #[test]
    fn test_wide_ext_headers_roundtrip() {
        let medium: Vec<u8> = (0..300u32).map(|i| i as u8).collect();
        let large = vec![0x33u8; 70_000];

        let mut buf = Buffer::new();
        write_ext(&mut buf, 9, &medium);
        write_ext(&mut buf, -9, &large);
        assert_eq!(buf.as_slice()[..4], [0xc8, 0x01, 0x2c, 9]);
        assert_eq!(buf.as_slice()[304..310], [0xc9, 0x00, 0x01, 0x11, 0x70, 0xf7]);

        assert_eq!(read_ext(&buf, 9, 300), Ok(&medium[..]));
        let mut any = ExtRef::default();
        crate::decode(&buf, &mut any).unwrap();
        assert_eq!(any.type_id, -9);
        assert_eq!(any.data, &large[..]);
        assert_eq!(buf.remaining(), 0);

        // Declared length is checked for the wide forms too
        buf.seek(0);
        assert_eq!(read_ext(&buf, 9, 299), Err(Error::CorruptedData));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    #[should_panic(expected = "exceeds u32::MAX")]
    fn test_ext_header_over_u32_panics() {
        let mut buf = Buffer::new();
        write_ext_header(&mut buf, 0, u32::MAX as usize + 1);
    }

    #[test]
    fn test_pod_extension_roundtrip() {
        let buf = Buffer::from(to_vec(&IDENTITY).as_slice());
        assert_eq!(buf.len(), 3 + 36);
        assert_eq!(buf.as_slice()[..3], [0xc7, 36, 0]);

        let mut out: Matrix3x3 = bytemuck::Zeroable::zeroed();
        crate::decode(&buf, &mut out).unwrap();
        assert_eq!(out, IDENTITY);
        assert_eq!(bytemuck::bytes_of(&out), bytemuck::bytes_of(&IDENTITY));
    }

    #[test]
    fn test_type_id_mismatch() {
        let buf = Buffer::from(to_vec(&IDENTITY).as_slice());
        let mut other: Transform = bytemuck::Zeroable::zeroed();
        assert_eq!(crate::decode(&buf, &mut other), Err(Error::CorruptedData));

        buf.seek(0);
        assert_eq!(read_ext(&buf, 1, 36), Err(Error::CorruptedData));
    }

    #[test]
    fn test_size_mismatch() {
        let buf = Buffer::from(to_vec(&Tiny { a: 7 }).as_slice());
        assert_eq!(buf.as_slice()[..2], [0xd5, 0xf9]);
        assert_eq!(read_ext(&buf, -7, 4), Err(Error::CorruptedData));

        buf.seek(0);
        let mut tiny = Tiny { a: 0 };
        crate::decode(&buf, &mut tiny).unwrap();
        assert_eq!(tiny.a, 7);
    }

    #[test]
    fn test_truncated_payload() {
        let encoded = to_vec(&IDENTITY);
        let buf = Buffer::from(&encoded[..20]);
        let mut out: Matrix3x3 = bytemuck::Zeroable::zeroed();
        assert_eq!(crate::decode(&buf, &mut out), Err(Error::UnexpectedEnd));
    }

    #[test]
    fn test_extension_inside_option() {
        let some = Some(Tiny { a: 3 });
        let buf = Buffer::from(to_vec(&some).as_slice());
        assert_eq!(buf.as_slice()[0], 0xd5);

        let mut out: Option<Tiny> = None;
        crate::decode(&buf, &mut out).unwrap();
        assert_eq!(out, some);
    }

    #[test]
    fn test_ext_ref_reads_any() {
        let mut buf = Buffer::new();
        crate::encode(&mut buf, &ExtRef { type_id: 42, data: b"abc" });
        crate::encode(&mut buf, &Tiny { a: 1 });

        let mut first = ExtRef::default();
        let mut second = ExtRef::default();
        crate::decode(&buf, &mut first).unwrap();
        crate::decode(&buf, &mut second).unwrap();

        assert_eq!(first, ExtRef { type_id: 42, data: b"abc" });
        assert_eq!(second.type_id, -7);
        assert_eq!(second.data.len(), 2);
    }
}
