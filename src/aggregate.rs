//! Field-sequence encoding for aggregates
//!
//! [`Encode`] and [`Decode`] are the dispatch traits every supported type
//! implements. An aggregate is a value with a fixed, ordered set of fields;
//! it is encoded as its fields written back to back in declaration order,
//! with no header of its own.
//!
//! Tuples of up to [`MAX_FIELDS`] elements are aggregates out of the box.
//! Structs opt in with [`aggregate!`](crate::aggregate!), and field-less
//! enums travel as their integer representation via
//! [`enum_repr!`](crate::enum_repr!).
//!
//! ```rust
//! use minipack::{aggregate, enum_repr, Buffer};
//!
//! #[derive(Debug, Default, PartialEq)]
//! enum Mood {
//!     #[default]
//!     Calm,
//!     Grumpy = 7,
//! }
//! enum_repr!(Mood as u8 { Calm, Grumpy });
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Player {
//!     name: String,
//!     level: u16,
//!     mood: Mood,
//! }
//! aggregate!(Player { name, level, mood });
//!
//! let mut buf = Buffer::new();
//! let player = Player { name: "ann".into(), level: 300, mood: Mood::Grumpy };
//! minipack::encode(&mut buf, &player);
//!
//! let mut decoded = Player::default();
//! minipack::decode(&buf, &mut decoded)?;
//! assert_eq!(decoded, player);
//! # Ok::<(), minipack::Error>(())
//! ```
//!
//! [`MAX_FIELDS`]: crate::MAX_FIELDS

use alloc::boxed::Box;

use crate::buffer::Buffer;
use crate::error::Result;

/// Types that can be written to a [`Buffer`]
///
/// Encoding never fails.
pub trait Encode {
    /// Append the wire form of `self` to `buf`
    fn encode(&self, buf: &mut Buffer);
}

/// Types that can be read back from a [`Buffer`]
///
/// Decoding happens in place. On error `self` may be partially updated; the
/// first failing read's error is returned unchanged. `'de` is the lifetime
/// of the buffer borrow, which lets zero-copy views such as `&'de str` point
/// into its storage.
pub trait Decode<'de> {
    /// Read a value of this type from `buf` into `self`
    fn decode(&mut self, buf: &'de Buffer) -> Result<()>;
}

/// Aggregates with a fixed number of fields
pub trait Aggregate {
    /// Number of fields, at most [`MAX_FIELDS`](crate::MAX_FIELDS)
    const FIELD_COUNT: usize;
}

/// Types whose encoding always starts with a tag byte other than nil
///
/// `Option<T>` writes `None` as nil and `Some(v)` as `v` itself, so it only
/// accepts a `T` that can never be mistaken for `None`. Options of options,
/// `()` and field-less aggregates are ruled out at compile time:
///
/// ```rust,compile_fail
/// let bytes = minipack::to_vec(&Some(None::<u8>));
/// ```
///
/// Tuples qualify when their first element does. `aggregate!` does not
/// implement this trait; a struct whose first field is `NonNil` may
/// implement it by hand to travel inside an `Option`.
pub trait NonNil {}

impl<T: NonNil + ?Sized> NonNil for &T {}
impl<T: NonNil + ?Sized> NonNil for &mut T {}
impl<T: NonNil + ?Sized> NonNil for Box<T> {}

impl<T: Encode + ?Sized> Encode for &T {
    #[inline]
    fn encode(&self, buf: &mut Buffer) {
        (**self).encode(buf)
    }
}

impl<T: Encode + ?Sized> Encode for &mut T {
    #[inline]
    fn encode(&self, buf: &mut Buffer) {
        (**self).encode(buf)
    }
}

impl<T: Encode + ?Sized> Encode for Box<T> {
    #[inline]
    fn encode(&self, buf: &mut Buffer) {
        (**self).encode(buf)
    }
}

impl<'de, T: Decode<'de> + ?Sized> Decode<'de> for Box<T> {
    #[inline]
    fn decode(&mut self, buf: &'de Buffer) -> Result<()> {
        (**self).decode(buf)
    }
}

macro_rules! tuple_impls {
    ($($len:literal => ($($name:ident $idx:tt)*))+) => {$(
        impl<$($name: Encode),*> Encode for ($($name,)*) {
            #[inline]
            #[allow(unused_variables)]
            fn encode(&self, buf: &mut Buffer) {
                $(self.$idx.encode(buf);)*
            }
        }

        impl<'de, $($name: Decode<'de>),*> Decode<'de> for ($($name,)*) {
            #[inline]
            #[allow(unused_variables)]
            fn decode(&mut self, buf: &'de Buffer) -> Result<()> {
                $(self.$idx.decode(buf)?;)*
                Ok(())
            }
        }

        impl<$($name),*> Aggregate for ($($name,)*) {
            const FIELD_COUNT: usize = $len;
        }
    )+};
}

tuple_impls! {
    0 => ()
    1 => (T0 0)
    2 => (T0 0 T1 1)
    3 => (T0 0 T1 1 T2 2)
    4 => (T0 0 T1 1 T2 2 T3 3)
    5 => (T0 0 T1 1 T2 2 T3 3 T4 4)
    6 => (T0 0 T1 1 T2 2 T3 3 T4 4 T5 5)
    7 => (T0 0 T1 1 T2 2 T3 3 T4 4 T5 5 T6 6)
    8 => (T0 0 T1 1 T2 2 T3 3 T4 4 T5 5 T6 6 T7 7)
    9 => (T0 0 T1 1 T2 2 T3 3 T4 4 T5 5 T6 6 T7 7 T8 8)
    10 => (T0 0 T1 1 T2 2 T3 3 T4 4 T5 5 T6 6 T7 7 T8 8 T9 9)
    11 => (T0 0 T1 1 T2 2 T3 3 T4 4 T5 5 T6 6 T7 7 T8 8 T9 9 T10 10)
    12 => (T0 0 T1 1 T2 2 T3 3 T4 4 T5 5 T6 6 T7 7 T8 8 T9 9 T10 10 T11 11)
    13 => (T0 0 T1 1 T2 2 T3 3 T4 4 T5 5 T6 6 T7 7 T8 8 T9 9 T10 10 T11 11 T12 12)
    14 => (T0 0 T1 1 T2 2 T3 3 T4 4 T5 5 T6 6 T7 7 T8 8 T9 9 T10 10 T11 11 T12 12 T13 13)
    15 => (T0 0 T1 1 T2 2 T3 3 T4 4 T5 5 T6 6 T7 7 T8 8 T9 9 T10 10 T11 11 T12 12 T13 13 T14 14)
    16 => (T0 0 T1 1 T2 2 T3 3 T4 4 T5 5 T6 6 T7 7 T8 8 T9 9 T10 10 T11 11 T12 12 T13 13 T14 14 T15 15)
}

macro_rules! non_nil_tuples {
    ($(($head:ident $($tail:ident)*))+) => {$(
        impl<$head: NonNil, $($tail),*> NonNil for ($head, $($tail,)*) {}
    )+};
}

non_nil_tuples! {
    (T0)
    (T0 T1)
    (T0 T1 T2)
    (T0 T1 T2 T3)
    (T0 T1 T2 T3 T4)
    (T0 T1 T2 T3 T4 T5)
    (T0 T1 T2 T3 T4 T5 T6)
    (T0 T1 T2 T3 T4 T5 T6 T7)
    (T0 T1 T2 T3 T4 T5 T6 T7 T8)
    (T0 T1 T2 T3 T4 T5 T6 T7 T8 T9)
    (T0 T1 T2 T3 T4 T5 T6 T7 T8 T9 T10)
    (T0 T1 T2 T3 T4 T5 T6 T7 T8 T9 T10 T11)
    (T0 T1 T2 T3 T4 T5 T6 T7 T8 T9 T10 T11 T12)
    (T0 T1 T2 T3 T4 T5 T6 T7 T8 T9 T10 T11 T12 T13)
    (T0 T1 T2 T3 T4 T5 T6 T7 T8 T9 T10 T11 T12 T13 T14)
    (T0 T1 T2 T3 T4 T5 T6 T7 T8 T9 T10 T11 T12 T13 T14 T15)
}

#[doc(hidden)]
#[macro_export]
macro_rules! __count_fields {
    () => { 0usize };
    ($head:tt $($tail:tt)*) => { 1usize + $crate::__count_fields!($($tail)*) };
}

/// Implement [`Encode`], [`Decode`] and [`Aggregate`] for a struct with
/// named fields
///
/// Fields are listed in declaration order. The struct is destructured
/// without `..`, so leaving a field out is a compile error, as is listing
/// more than [`MAX_FIELDS`](crate::MAX_FIELDS). A struct borrowing from the
/// buffer takes its lifetime: `aggregate!(View<'a> { name })`.
#[macro_export]
macro_rules! aggregate {
    ($ty:ident { $($field:ident),* $(,)? }) => {
        impl $crate::Encode for $ty {
            #[inline]
            #[allow(unused_variables)]
            fn encode(&self, buf: &mut $crate::Buffer) {
                let $ty { $($field),* } = self;
                $($crate::Encode::encode($field, buf);)*
            }
        }

        impl<'de> $crate::Decode<'de> for $ty {
            #[inline]
            #[allow(unused_variables)]
            fn decode(&mut self, buf: &'de $crate::Buffer) -> $crate::Result<()> {
                let $ty { $($field),* } = self;
                $($crate::Decode::decode($field, buf)?;)*
                Ok(())
            }
        }

        impl $crate::Aggregate for $ty {
            const FIELD_COUNT: usize = $crate::__count_fields!($($field)*);
        }

        const _: () = assert!(
            <$ty as $crate::Aggregate>::FIELD_COUNT <= $crate::MAX_FIELDS,
            "too many fields for an aggregate"
        );
    };

    ($ty:ident<$lt:lifetime> { $($field:ident),* $(,)? }) => {
        impl<$lt> $crate::Encode for $ty<$lt> {
            #[inline]
            #[allow(unused_variables)]
            fn encode(&self, buf: &mut $crate::Buffer) {
                let $ty { $($field),* } = self;
                $($crate::Encode::encode($field, buf);)*
            }
        }

        impl<$lt> $crate::Decode<$lt> for $ty<$lt> {
            #[inline]
            #[allow(unused_variables)]
            fn decode(&mut self, buf: &$lt $crate::Buffer) -> $crate::Result<()> {
                let $ty { $($field),* } = self;
                $($crate::Decode::decode($field, buf)?;)*
                Ok(())
            }
        }

        impl<$lt> $crate::Aggregate for $ty<$lt> {
            const FIELD_COUNT: usize = $crate::__count_fields!($($field)*);
        }

        const _: () = assert!(
            <$ty<'static> as $crate::Aggregate>::FIELD_COUNT <= $crate::MAX_FIELDS,
            "too many fields for an aggregate"
        );
    };
}

/// Implement [`Encode`] and [`Decode`] for a field-less enum through its
/// integer representation
///
/// Every variant must be listed. Decoding a value that matches no listed
/// variant's discriminant is [`Error::CorruptedData`](crate::Error::CorruptedData).
#[macro_export]
macro_rules! enum_repr {
    ($ty:ident as $repr:ty { $($variant:ident),+ $(,)? }) => {
        impl $crate::Encode for $ty {
            #[inline]
            fn encode(&self, buf: &mut $crate::Buffer) {
                let raw: $repr = match self {
                    $($ty::$variant => $ty::$variant as $repr,)+
                };
                $crate::Encode::encode(&raw, buf);
            }
        }

        impl<'de> $crate::Decode<'de> for $ty {
            #[inline]
            fn decode(&mut self, buf: &'de $crate::Buffer) -> $crate::Result<()> {
                let mut raw: $repr = 0;
                $crate::Decode::decode(&mut raw, buf)?;
                $(
                    if raw == $ty::$variant as $repr {
                        *self = $ty::$variant;
                        return Ok(());
                    }
                )+
                Err($crate::Error::CorruptedData)
            }
        }

        impl $crate::NonNil for $ty {}
    };
}
