//! MiniPack: compact MessagePack-compatible binary serialization
//!
//! This crate turns structured values (scalars, strings, sequences, maps,
//! fixed-size extension blobs and aggregates of up to 16 fields) into a
//! dense MessagePack byte stream held in a [`Buffer`], and reads them back
//! with strict type and width validation.
//!
//! # Wire Format
//!
//! ```text
//! +----------+--------------------------------------------+
//! | Tag u8   | Payload (big-endian, width given by tag)   |
//! +----------+--------------------------------------------+
//! ```
//!
//! Small integers and short strings, arrays and maps fit their value or
//! length into the tag byte itself. See [`marker`] for the full table.
//! Aggregates have no header: their fields are written back to back.
//!
//! # Features
//!
//! - Minimal-width integer encoding, byte-exact with the MessagePack format
//! - Inline 256-byte storage, heap allocation only for larger streams
//! - Zero-copy `&str`, `&CStr` and binary views borrowed from the buffer
//! - Field-by-field aggregates without a schema language
//! - Typed extension values for plain-old-data types
//! - `no_std` support with `alloc`
//!
//! # Example
//!
//! ```rust
//! use minipack::{aggregate, Buffer};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Person {
//!     name: String,
//!     age: u32,
//!     height: f32,
//!     lucky: Vec<u32>,
//! }
//! aggregate!(Person { name, age, height, lucky });
//!
//! let person = Person {
//!     name: "Jeff".into(),
//!     age: 32,
//!     height: 1.75,
//!     lucky: vec![69, 420, 1984],
//! };
//!
//! let mut buf = Buffer::new();
//! minipack::encode(&mut buf, &person);
//! assert_eq!(buf.len(), 19);
//!
//! let mut decoded = Person::default();
//! minipack::decode(&buf, &mut decoded)?;
//! assert_eq!(decoded, person);
//! # Ok::<(), minipack::Error>(())
//! ```

#![no_std]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

pub mod aggregate;
pub mod buffer;
pub mod compound;
pub mod error;
pub mod ext;
pub mod marker;
pub mod scalar;

use alloc::vec::Vec;

// Re-export main types
pub use aggregate::{Aggregate, Decode, Encode, NonNil};
pub use buffer::Buffer;
pub use compound::{ByteBuf, Bytes};
pub use error::{Error, Result};
pub use ext::ExtRef;
pub use marker::Marker;

/// Re-exported for [`extension!`] payloads
pub use bytemuck;

/// Bytes of storage embedded in a [`Buffer`] before it moves to the heap
pub const INLINE_CAPACITY: usize = 256;

/// Maximum number of fields in an aggregate
pub const MAX_FIELDS: usize = 16;

/// Append `value` to `buf`
#[inline]
pub fn encode<T: Encode + ?Sized>(buf: &mut Buffer, value: &T) {
    value.encode(buf);
}

/// Decode the next value in `buf` into `value`
///
/// Returns the first error hit while reading. On success the buffer has
/// also been checked for reads past its end.
pub fn decode<'de, T: Decode<'de>>(buf: &'de Buffer, value: &mut T) -> Result<()> {
    let result = value.decode(buf).and_then(|()| buf.valid());

    if let Err(err) = result {
        tracing::debug!(
            error = err.description(),
            read_pos = buf.tell(),
            len = buf.len(),
            "decode failed"
        );
    }

    result
}

/// Encode `value` into a freshly allocated byte vector
pub fn to_vec<T: Encode + ?Sized>(value: &T) -> Vec<u8> {
    let mut buf = Buffer::new();
    value.encode(&mut buf);
    buf.as_slice().to_vec()
}
