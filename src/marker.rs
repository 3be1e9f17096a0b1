//! Wire tags
//!
//! Every encoded value starts with a single tag byte. For the compact forms
//! (fixint, fixstr, fixarray, fixmap) the tag also carries the value or
//! length in its low bits.
//!
//! ```text
//! 0xxxxxxx  positive fixint      1000xxxx  fixmap        1001xxxx  fixarray
//! 101xxxxx  fixstr               111xxxxx  negative fixint
//! 0xc0 nil   0xc2/0xc3 false/true   0xc4-0xc6 bin8/16/32   0xc7-0xc9 ext8/16/32
//! 0xca/0xcb float32/64   0xcc-0xcf uint8-64   0xd0-0xd3 int8-64
//! 0xd4-0xd8 fixext1-16   0xd9-0xdb str8/16/32   0xdc/0xdd array16/32   0xde/0xdf map16/32
//! ```

use crate::buffer::Buffer;
use crate::error::Result;

/// Largest value stored inline as a positive fixint
pub const MAX_POS_FIXINT: u8 = 0x7f;

/// Smallest value stored inline as a negative fixint
pub const MIN_NEG_FIXINT: i8 = -32;

/// Longest string stored with a fixstr header
pub const MAX_FIXSTR_LEN: usize = 31;

/// Longest array stored with a fixarray header
pub const MAX_FIXARRAY_LEN: usize = 15;

/// Largest map stored with a fixmap header
pub const MAX_FIXMAP_LEN: usize = 15;

/// Classification of a tag byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// Positive fixint, value in the low 7 bits
    FixPos(u8),
    /// Negative fixint, value in the low 5 bits
    FixNeg(i8),
    /// Map with up to 15 pairs
    FixMap(u8),
    /// Array with up to 15 elements
    FixArray(u8),
    /// String with up to 31 bytes
    FixStr(u8),
    /// Absent value
    Nil,
    /// Never used by the format
    Reserved,
    /// Boolean false
    False,
    /// Boolean true
    True,
    /// Binary, 8-bit length
    Bin8,
    /// Binary, 16-bit length
    Bin16,
    /// Binary, 32-bit length
    Bin32,
    /// Extension, 8-bit length
    Ext8,
    /// Extension, 16-bit length
    Ext16,
    /// Extension, 32-bit length
    Ext32,
    /// IEEE-754 single precision
    F32,
    /// IEEE-754 double precision
    F64,
    /// Unsigned 8-bit
    U8,
    /// Unsigned 16-bit
    U16,
    /// Unsigned 32-bit
    U32,
    /// Unsigned 64-bit
    U64,
    /// Signed 8-bit
    I8,
    /// Signed 16-bit
    I16,
    /// Signed 32-bit
    I32,
    /// Signed 64-bit
    I64,
    /// Extension with a 1-byte payload
    FixExt1,
    /// Extension with a 2-byte payload
    FixExt2,
    /// Extension with a 4-byte payload
    FixExt4,
    /// Extension with an 8-byte payload
    FixExt8,
    /// Extension with a 16-byte payload
    FixExt16,
    /// String, 8-bit length
    Str8,
    /// String, 16-bit length
    Str16,
    /// String, 32-bit length
    Str32,
    /// Array, 16-bit count
    Array16,
    /// Array, 32-bit count
    Array32,
    /// Map, 16-bit count
    Map16,
    /// Map, 32-bit count
    Map32,
}

impl Marker {
    /// Classify a tag byte
    pub const fn from_u8(n: u8) -> Marker {
        match n {
            0x00..=0x7f => Marker::FixPos(n),
            0x80..=0x8f => Marker::FixMap(n & 0x0f),
            0x90..=0x9f => Marker::FixArray(n & 0x0f),
            0xa0..=0xbf => Marker::FixStr(n & 0x1f),
            0xc0 => Marker::Nil,
            0xc1 => Marker::Reserved,
            0xc2 => Marker::False,
            0xc3 => Marker::True,
            0xc4 => Marker::Bin8,
            0xc5 => Marker::Bin16,
            0xc6 => Marker::Bin32,
            0xc7 => Marker::Ext8,
            0xc8 => Marker::Ext16,
            0xc9 => Marker::Ext32,
            0xca => Marker::F32,
            0xcb => Marker::F64,
            0xcc => Marker::U8,
            0xcd => Marker::U16,
            0xce => Marker::U32,
            0xcf => Marker::U64,
            0xd0 => Marker::I8,
            0xd1 => Marker::I16,
            0xd2 => Marker::I32,
            0xd3 => Marker::I64,
            0xd4 => Marker::FixExt1,
            0xd5 => Marker::FixExt2,
            0xd6 => Marker::FixExt4,
            0xd7 => Marker::FixExt8,
            0xd8 => Marker::FixExt16,
            0xd9 => Marker::Str8,
            0xda => Marker::Str16,
            0xdb => Marker::Str32,
            0xdc => Marker::Array16,
            0xdd => Marker::Array32,
            0xde => Marker::Map16,
            0xdf => Marker::Map32,
            0xe0..=0xff => Marker::FixNeg(n as i8),
        }
    }

    /// Tag byte for this marker
    ///
    /// Inline values and lengths are masked to the bits their form allows.
    pub const fn to_u8(self) -> u8 {
        match self {
            Marker::FixPos(n) => n & 0x7f,
            Marker::FixNeg(n) => (n as u8) | 0xe0,
            Marker::FixMap(n) => 0x80 | (n & 0x0f),
            Marker::FixArray(n) => 0x90 | (n & 0x0f),
            Marker::FixStr(n) => 0xa0 | (n & 0x1f),
            Marker::Nil => 0xc0,
            Marker::Reserved => 0xc1,
            Marker::False => 0xc2,
            Marker::True => 0xc3,
            Marker::Bin8 => 0xc4,
            Marker::Bin16 => 0xc5,
            Marker::Bin32 => 0xc6,
            Marker::Ext8 => 0xc7,
            Marker::Ext16 => 0xc8,
            Marker::Ext32 => 0xc9,
            Marker::F32 => 0xca,
            Marker::F64 => 0xcb,
            Marker::U8 => 0xcc,
            Marker::U16 => 0xcd,
            Marker::U32 => 0xce,
            Marker::U64 => 0xcf,
            Marker::I8 => 0xd0,
            Marker::I16 => 0xd1,
            Marker::I32 => 0xd2,
            Marker::I64 => 0xd3,
            Marker::FixExt1 => 0xd4,
            Marker::FixExt2 => 0xd5,
            Marker::FixExt4 => 0xd6,
            Marker::FixExt8 => 0xd7,
            Marker::FixExt16 => 0xd8,
            Marker::Str8 => 0xd9,
            Marker::Str16 => 0xda,
            Marker::Str32 => 0xdb,
            Marker::Array16 => 0xdc,
            Marker::Array32 => 0xdd,
            Marker::Map16 => 0xde,
            Marker::Map32 => 0xdf,
        }
    }
}

impl From<u8> for Marker {
    #[inline]
    fn from(n: u8) -> Self {
        Marker::from_u8(n)
    }
}

impl From<Marker> for u8 {
    #[inline]
    fn from(marker: Marker) -> Self {
        marker.to_u8()
    }
}

impl Buffer {
    /// Classify the next tag byte without consuming it
    #[inline]
    pub fn peek_marker(&self) -> Option<Marker> {
        self.peek_u8().map(Marker::from_u8)
    }

    /// Consume and classify the next tag byte
    #[inline]
    pub fn get_marker(&self) -> Result<Marker> {
        self.get_u8().map(Marker::from_u8)
    }
}
