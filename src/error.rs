//! Error type returned by the encode/decode API.
//!
//! A plain `Copy` enum with a hand-written `Display` and a
//! `core::error::Error` impl, appropriate for a type that crosses a
//! published API boundary.

/// Everything that can go wrong calling into this crate.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// A caller contract was violated (bad buffer size, bad user tag, unbound
    /// dictionary slot, ...).
    BadArg,
    /// The destination buffer did not have room for the operation.
    Overflow,
    /// `feed` was called on a session after `end` already consumed it.
    NotInitialized,
    /// The encoded region contained a structurally invalid byte sequence
    /// (an embedded `0x00`, a code byte of zero, an out-of-range dictionary
    /// index, ...).
    BadEncodedPayload,
    /// The trailer CRC did not match the recomputed CRC.
    CrcError,
    /// The frame selects a dictionary slot the decoder has no binding for.
    NoDictionaryToDecode,
    /// A dictionary token referenced an index with no matching word.
    WordNotFoundOnDictionary,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            Error::BadArg => write!(f, "bad argument"),
            Error::Overflow => write!(f, "destination buffer overflow"),
            Error::NotInitialized => write!(f, "session already ended"),
            Error::BadEncodedPayload => write!(f, "bad encoded payload"),
            Error::CrcError => write!(f, "CRC mismatch"),
            Error::NoDictionaryToDecode => write!(f, "no dictionary bound for this encoding"),
            Error::WordNotFoundOnDictionary => write!(f, "dictionary index out of range"),
        }
    }
}

impl core::error::Error for Error {}
