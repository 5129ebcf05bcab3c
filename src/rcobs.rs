//! Plain reverse-COBS engine: zero-byte elimination with no dictionary.
//!
//! Encode runs left-to-right tracking a run-length `code` (starting at 1,
//! incremented per literal byte, flushed on a zero byte or at the jump
//! threshold). Decode runs right-to-left, reading the trailing code byte
//! first and reconstructing each block's boundary. Grounded in
//! `dzrcobs_encode_inc_plain`/the plain-path subset of `dzrcobs_decode.c`;
//! re-expressed per the destination-slice-plus-index recast note (no pointer
//! triples), matching `minder::cobs`'s slice-and-index encoder/decoder
//! shape.

use crate::{Error, JUMP};

/// Bounds-checked single-byte write, shared with the dictionary engine.
pub(crate) fn put(dst: &mut [u8], pos: &mut usize, byte: u8) -> Result<(), Error> {
    *dst.get_mut(*pos).ok_or(Error::Overflow)? = byte;
    *pos += 1;
    Ok(())
}

/// Incremental plain-engine encoder state, carried across `feed` calls.
pub(crate) struct PlainEncoder {
    code: u8,
}

impl PlainEncoder {
    pub fn new() -> Self {
        PlainEncoder { code: 1 }
    }

    /// Encode `src`, appending to `dst` at `*pos`.
    pub fn feed(&mut self, src: &[u8], dst: &mut [u8], pos: &mut usize) -> Result<(), Error> {
        for &b in src {
            if b == 0 {
                put(dst, pos, self.code)?;
                self.code = 1;
            } else {
                put(dst, pos, b)?;
                self.code += 1;
                if self.code == JUMP {
                    put(dst, pos, self.code)?;
                    self.code = 1;
                }
            }
        }
        Ok(())
    }

    /// Flush the pending run length. The terminal code is always written,
    /// even when it's a bare `0x01` with nothing pending — decode relies on
    /// this to tell an empty final run from an eliminated zero (see the
    /// first-iteration rule in [`decode`]).
    pub fn finish(&mut self, dst: &mut [u8], pos: &mut usize) -> Result<(), Error> {
        put(dst, pos, self.code)?;
        Ok(())
    }
}

/// Decode a plain reverse-COBS region, writing right-aligned into `dst`.
///
/// Returns the start offset in `dst` of the first decoded byte; the decoded
/// length is `dst.len() - start`.
pub(crate) fn decode(src: &[u8], dst: &mut [u8]) -> Result<usize, Error> {
    let mut src_idx = src.len();
    let mut dst_cursor = dst.len();
    let mut first = true;

    while src_idx > 0 {
        src_idx -= 1;
        let code = src[src_idx];
        if code == 0 {
            return Err(Error::BadEncodedPayload);
        }
        let count = (code - 1) as usize;

        // The terminal code (the very first one consumed, scanning
        // back-to-front) never gets a reinserted zero — `finish` always
        // writes it unconditionally, whether or not a run was pending, so
        // its count alone doesn't signal an eliminated zero. Every other
        // code, except a jump sentinel, does.
        if code != JUMP && !first {
            dst_cursor = dst_cursor.checked_sub(1).ok_or(Error::Overflow)?;
            dst[dst_cursor] = 0;
        }
        first = false;

        if count > src_idx {
            return Err(Error::BadEncodedPayload);
        }
        let start = src_idx - count;
        let payload = &src[start..src_idx];
        if payload.contains(&0) {
            return Err(Error::BadEncodedPayload);
        }
        dst_cursor = dst_cursor.checked_sub(count).ok_or(Error::Overflow)?;
        dst[dst_cursor..dst_cursor + count].copy_from_slice(payload);

        src_idx = start;
    }

    Ok(dst_cursor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_all(input: &[u8]) -> ([u8; 16], usize) {
        let mut dst = [0u8; 16];
        let mut pos = 0usize;
        let mut enc = PlainEncoder::new();
        enc.feed(input, &mut dst, &mut pos).unwrap();
        enc.finish(&mut dst, &mut pos).unwrap();
        (dst, pos)
    }

    #[test]
    fn s1_single_byte() {
        let (dst, len) = encode_all(b"A");
        assert_eq!(&dst[..len], &[0x41, 0x02]);
    }

    #[test]
    fn s2_no_zeros() {
        let (dst, len) = encode_all(b"ABCD");
        assert_eq!(&dst[..len], &[0x41, 0x42, 0x43, 0x44, 0x05]);
    }

    #[test]
    fn s3_single_interior_zero() {
        let (dst, len) = encode_all(&[0x41, 0x42, 0x00, 0x43]);
        assert_eq!(&dst[..len], &[0x41, 0x42, 0x03, 0x43, 0x02]);
    }

    #[test]
    fn s4_run_of_zeros() {
        let (dst, len) = encode_all(&[0x41, 0x00, 0x00, 0x00, 0x42, 0x43, 0x44]);
        assert_eq!(
            &dst[..len],
            &[0x41, 0x02, 0x01, 0x01, 0x42, 0x43, 0x44, 0x04]
        );
    }

    /// The terminal code is now always emitted (see `finish`), so a lone
    /// zero byte costs two code bytes — the zero's own emitted code, then
    /// `finish`'s unconditional terminal code — rather than the single byte
    /// a skip-on-empty `finish` would produce.
    #[test]
    fn s5_lone_zero() {
        let (dst, len) = encode_all(&[0x00]);
        assert_eq!(&dst[..len], &[0x01, 0x01]);
    }

    #[test]
    fn empty_input_still_emits_one_code() {
        let (dst, len) = encode_all(&[]);
        assert_eq!(&dst[..len], &[0x01]);
    }

    fn round_trip(input: &[u8]) {
        let (encoded, len) = encode_all(input);
        let mut dst = [0u8; 16];
        let start = decode(&encoded[..len], &mut dst).unwrap();
        assert_eq!(&dst[start..], input);
    }

    #[test]
    fn round_trips() {
        round_trip(b"A");
        round_trip(b"ABCD");
        round_trip(&[0x41, 0x42, 0x00, 0x43]);
        round_trip(&[0x41, 0x00, 0x00, 0x00, 0x42, 0x43, 0x44]);
        round_trip(&[0x00]);
    }

    /// An empty payload and a lone zero byte now encode to different
    /// lengths (one code byte vs. two) and decode back to their own
    /// distinct inputs, rather than colliding on the same wire bytes.
    #[test]
    fn empty_input_and_lone_zero_are_distinguishable() {
        let (empty_encoded, empty_len) = encode_all(&[]);
        let (zero_encoded, zero_len) = encode_all(&[0x00]);
        assert_ne!(&empty_encoded[..empty_len], &zero_encoded[..zero_len]);

        let mut dst = [0u8; 4];
        let start = decode(&empty_encoded[..empty_len], &mut dst).unwrap();
        assert_eq!(&dst[start..], &[] as &[u8]);

        let mut dst = [0u8; 4];
        let start = decode(&zero_encoded[..zero_len], &mut dst).unwrap();
        assert_eq!(&dst[start..], &[0x00]);
    }

    #[test]
    fn rejects_embedded_zero() {
        let mut dst = [0u8; 8];
        assert_eq!(
            decode(&[0x00, 0x02], &mut dst),
            Err(Error::BadEncodedPayload)
        );
    }

    #[test]
    fn reports_overflow_on_small_destination() {
        let (encoded, len) = encode_all(b"ABCD");
        let mut dst = [0u8; 2];
        assert_eq!(decode(&encoded[..len], &mut dst), Err(Error::Overflow));
    }
}
