//! Error types for the MiniPack codec

/// Errors that can occur while decoding a value
///
/// Encoding never fails for the types this crate implements [`Encode`] for,
/// so every variant here belongs to the read path.
///
/// [`Encode`]: crate::Encode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Error {
    /// Tag byte not valid for the destination type, extension type id or
    /// size mismatch, or an encoded width wider than the destination
    CorruptedData,
    /// Buffer ran out of bytes before a value was complete
    UnexpectedEnd,
}

impl Error {
    /// Returns a human-readable description of the error
    pub const fn description(&self) -> &'static str {
        match self {
            Error::CorruptedData => "corrupted data",
            Error::UnexpectedEnd => "unexpected end of buffer",
        }
    }
}

#[cfg(feature = "std")]
impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias for MiniPack operations
pub type Result<T> = core::result::Result<T, Error>;
