//! DZRCOBS — a dictionary-assisted reverse-COBS framing codec.
//!
//! A frame is a self-delimited sequence of bytes whose payload is either
//! transmitted as-is with zero-byte elimination ("plain") or compressed
//! against one of two pre-shared dictionaries. Every frame carries a 6-bit
//! user tag, a 2-bit encoding selector, and an 8-bit integrity check, and is
//! terminated (by the transport, not this crate) with a single zero byte so
//! receivers can resynchronise after loss by scanning to the next zero.
//!
//! See [`Encoder`] / [`EncodeSession`] to produce frames and [`Decoder`] to
//! consume them. [`Dictionary`] builds and validates the packed dictionary
//! blobs either side of the link must agree on ahead of time.
//!
//! No internal buffering or allocation: every operation works against
//! caller-supplied slices and runs to completion synchronously.

#![cfg_attr(not(any(feature = "std", test)), no_std)]

#[cfg(not(any(feature = "std", test)))]
extern crate core as std;

#[cfg(feature = "log")]
mod log {
    pub use log::{trace, warn};
}

#[cfg(not(feature = "log"))]
mod log {
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }
    macro_rules! warn {
        ($($arg:tt)*) => {};
    }
    pub(crate) use trace;
    pub(crate) use warn;
}

pub mod crc8;
pub mod dictionary;
mod dict_codec;
mod frame;
mod rcobs;

mod error;

pub use dictionary::{DictError, Dictionary};
pub use error::Error;
pub use frame::{DictSlot, Decoded, Decoder, Encoder, EncodeSession, Encoding};

/// Number of trailer bytes appended by [`EncodeSession::end`] (encoding byte + CRC).
///
/// The transport delimiter (`0x00`) is not counted here; callers append it
/// themselves after `end` returns.
pub const FRAME_HEADER_SIZE: usize = 2;

/// Run length between emitted code bytes, for both plain and dictionary frames.
///
/// Chosen so a code byte's low 7 bits (`code - 1`) always fit, and so the
/// dictionary engine can overlay marker bits (§4.5) in the bits above it
/// without the code itself ever reaching `0x80`.
pub(crate) const JUMP: u8 = 0x7F;

/// Upper bound on the encoded size of `n` plain-frame payload bytes,
/// including the worst-case run-length overhead but excluding the 2-byte
/// frame trailer.
///
/// `ceil(n / (JUMP - 1)) + n`, plus one extra byte when `n == 0` (an empty
/// input still needs its lone code byte).
pub const fn max_encoded(n: usize) -> usize {
    let block = (JUMP - 1) as usize;
    let overhead = (n + block - 1) / block;
    n + overhead + (n == 0) as usize
}
