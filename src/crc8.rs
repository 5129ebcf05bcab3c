//! CRC-8 stepping function used by the frame trailer.
//!
//! Polynomial `0xA6`, initial value `0xFF`, no input/output reflection,
//! `xorout = 0`. Refin/refout were pinned down by trying every combination
//! against the known-good test vector (`00 FF 00 FF 9A` from init `0xFF`
//! yields `4A 5A 7E 9A 00`); only refin=false/refout=false reproduces it.
//!
//! Described as a [`crc::Algorithm`] and built by the `crc` crate rather than
//! a hand-rolled table. There is no built-in catalog algorithm for this
//! polynomial, so a custom `Algorithm<u8>` is supplied and the crate builds
//! the 256-entry table at const-eval time — the table stays a generated
//! collaborator, never a literal this crate maintains by hand.

use crc::{Algorithm, Crc};

const ALGORITHM: Algorithm<u8> = Algorithm {
    width: 8,
    poly: 0xA6,
    init: 0xFF,
    refin: false,
    refout: false,
    xorout: 0x00,
    check: 0x6C,
    residue: 0x00,
};

/// The DZRCOBS CRC-8 algorithm, ready to `.digest()` or step byte-by-byte.
pub const CRC8: Crc<u8> = Crc::<u8>::new(&ALGORITHM);

/// Initial running value, per `spec.md` §4.1.
pub const INIT: u8 = 0xFF;

/// Value substituted for the CRC byte on the wire when the computed CRC is
/// `0x00` (keeps every frame byte non-zero so the trailing `0x00` delimiter
/// stays unambiguous).
pub const ZERO_REMAP: u8 = 0xFF;

/// Feed a single byte through the running CRC, returning the updated value.
///
/// `step(crc, byte) -> crc'`. Resumes a digest from `crc` as its initial
/// value, folds in the one byte, and finalizes — with `refin`/`refout`
/// clear and `xorout` zero, finalisation is the identity, so this is exactly
/// the table lookup a hand-rolled step function would produce, just reached through the
/// `crc` crate's public resumable-digest API rather than a hand-rolled table.
#[inline]
pub fn step(crc: u8, byte: u8) -> u8 {
    let mut digest = CRC8.digest_with_initial(crc);
    digest.update(&[byte]);
    digest.finalize()
}
