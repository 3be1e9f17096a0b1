//! Booleans, integers and floats
//!
//! Integers always take the smallest form that holds the value exactly.
//! Signed types use positive/negative fixint or `int8..int64`, unsigned
//! types use positive fixint or `uint8..uint64`, so the output only depends
//! on the value and its signedness, not on the width of the source type.
//!
//! On the read side the destination width is an upper bound: a width tag
//! wider than the destination is [`Error::CorruptedData`], never a truncated
//! value. Signedness is strict too; a negative fixint never decodes into an
//! unsigned destination and `uint*` tags never decode into signed ones.
//!
//! Floats are always written at full width, payloads are big-endian.

use core::mem::size_of;

use crate::aggregate::{Decode, Encode, NonNil};
use crate::buffer::Buffer;
use crate::error::{Error, Result};
use crate::marker::{Marker, MAX_POS_FIXINT, MIN_NEG_FIXINT};

/// Write a signed integer using the smallest signed form that holds it
#[inline]
pub fn write_int(buf: &mut Buffer, value: i64) {
    if (i64::from(MIN_NEG_FIXINT)..=i64::from(MAX_POS_FIXINT)).contains(&value) {
        buf.put_u8(value as u8);
    } else if let Ok(v) = i8::try_from(value) {
        buf.put_tagged(Marker::I8.to_u8(), &v.to_be_bytes());
    } else if let Ok(v) = i16::try_from(value) {
        buf.put_tagged(Marker::I16.to_u8(), &v.to_be_bytes());
    } else if let Ok(v) = i32::try_from(value) {
        buf.put_tagged(Marker::I32.to_u8(), &v.to_be_bytes());
    } else {
        buf.put_tagged(Marker::I64.to_u8(), &value.to_be_bytes());
    }
}

/// Write an unsigned integer using the smallest unsigned form that holds it
#[inline]
pub fn write_uint(buf: &mut Buffer, value: u64) {
    if value <= u64::from(MAX_POS_FIXINT) {
        buf.put_u8(value as u8);
    } else if let Ok(v) = u8::try_from(value) {
        buf.put_tagged(Marker::U8.to_u8(), &[v]);
    } else if let Ok(v) = u16::try_from(value) {
        buf.put_tagged(Marker::U16.to_u8(), &v.to_be_bytes());
    } else if let Ok(v) = u32::try_from(value) {
        buf.put_tagged(Marker::U32.to_u8(), &v.to_be_bytes());
    } else {
        buf.put_tagged(Marker::U64.to_u8(), &value.to_be_bytes());
    }
}

// Width is checked before the payload is consumed.
#[inline]
fn payload<const N: usize>(buf: &Buffer, max_width: usize) -> Result<[u8; N]> {
    if N > max_width {
        return Err(Error::CorruptedData);
    }
    buf.get_array::<N>()
}

/// Read a signed integer encoded in at most `max_width` bytes
#[inline]
pub fn read_int(buf: &Buffer, max_width: usize) -> Result<i64> {
    match buf.get_marker()? {
        Marker::FixPos(v) => Ok(i64::from(v)),
        Marker::FixNeg(v) => Ok(i64::from(v)),
        Marker::I8 => Ok(i64::from(i8::from_be_bytes(payload(buf, max_width)?))),
        Marker::I16 => Ok(i64::from(i16::from_be_bytes(payload(buf, max_width)?))),
        Marker::I32 => Ok(i64::from(i32::from_be_bytes(payload(buf, max_width)?))),
        Marker::I64 => Ok(i64::from_be_bytes(payload(buf, max_width)?)),
        _ => Err(Error::CorruptedData),
    }
}

/// Read an unsigned integer encoded in at most `max_width` bytes
#[inline]
pub fn read_uint(buf: &Buffer, max_width: usize) -> Result<u64> {
    match buf.get_marker()? {
        Marker::FixPos(v) => Ok(u64::from(v)),
        Marker::U8 => Ok(u64::from(u8::from_be_bytes(payload(buf, max_width)?))),
        Marker::U16 => Ok(u64::from(u16::from_be_bytes(payload(buf, max_width)?))),
        Marker::U32 => Ok(u64::from(u32::from_be_bytes(payload(buf, max_width)?))),
        Marker::U64 => Ok(u64::from_be_bytes(payload(buf, max_width)?)),
        _ => Err(Error::CorruptedData),
    }
}

macro_rules! impl_int {
    ($write:ident, $read:ident, $wide:ty => $($ty:ty),+) => {$(
        impl Encode for $ty {
            #[inline]
            fn encode(&self, buf: &mut Buffer) {
                $write(buf, *self as $wide);
            }
        }

        impl<'de> Decode<'de> for $ty {
            #[inline]
            fn decode(&mut self, buf: &'de Buffer) -> Result<()> {
                let value = $read(buf, size_of::<$ty>())?;
                *self = <$ty>::try_from(value).map_err(|_| Error::CorruptedData)?;
                Ok(())
            }
        }

        impl NonNil for $ty {}
    )+};
}

impl_int!(write_int, read_int, i64 => i8, i16, i32, i64, isize);
impl_int!(write_uint, read_uint, u64 => u8, u16, u32, u64, usize);

impl NonNil for bool {}
impl NonNil for f32 {}
impl NonNil for f64 {}

impl Encode for bool {
    #[inline]
    fn encode(&self, buf: &mut Buffer) {
        let marker = if *self { Marker::True } else { Marker::False };
        buf.put_u8(marker.to_u8());
    }
}

impl<'de> Decode<'de> for bool {
    #[inline]
    fn decode(&mut self, buf: &'de Buffer) -> Result<()> {
        match buf.get_marker()? {
            Marker::True => *self = true,
            Marker::False => *self = false,
            _ => return Err(Error::CorruptedData),
        }
        Ok(())
    }
}

impl Encode for f32 {
    #[inline]
    fn encode(&self, buf: &mut Buffer) {
        buf.put_tagged(Marker::F32.to_u8(), &self.to_be_bytes());
    }
}

impl<'de> Decode<'de> for f32 {
    #[inline]
    fn decode(&mut self, buf: &'de Buffer) -> Result<()> {
        if buf.get_marker()? != Marker::F32 {
            return Err(Error::CorruptedData);
        }
        *self = f32::from_be_bytes(buf.get_array()?);
        Ok(())
    }
}

impl Encode for f64 {
    #[inline]
    fn encode(&self, buf: &mut Buffer) {
        buf.put_tagged(Marker::F64.to_u8(), &self.to_be_bytes());
    }
}

impl<'de> Decode<'de> for f64 {
    #[inline]
    fn decode(&mut self, buf: &'de Buffer) -> Result<()> {
        if buf.get_marker()? != Marker::F64 {
            return Err(Error::CorruptedData);
        }
        *self = f64::from_be_bytes(buf.get_array()?);
        Ok(())
    }
}
