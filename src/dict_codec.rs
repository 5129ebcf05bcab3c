//! Dictionary-assisted codec engine: interleaves dictionary tokens with
//! run-length-coded literal blocks.
//!
//! A plain code byte (bit `0x80` clear) carries a run length in its low
//! bits plus a marker bit recording what sits immediately to its *left* in
//! stream order — a dictionary token, an eliminated zero, or (unmarked)
//! nothing special. A dictionary token (`0x80 | idx`) names a word
//! directly. Grounded in `spec.md` §4.5's state machine; the jump/marker
//! split follows the same bounds-checked-slice-plus-index shape as
//! [`crate::rcobs`].

use crate::dictionary::Dictionary;
use crate::rcobs::put;
use crate::{Error, JUMP};

const NEXTCODE_IS_DICTIONARY: u8 = 0x20;
const NEXTCODE_IS_ZERO: u8 = 0x40;
const MARKER_BITS: u8 = NEXTCODE_IS_DICTIONARY | NEXTCODE_IS_ZERO;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Prev {
    Zero,
    Block,
    Dictionary,
}

/// Incremental dictionary-engine encoder state, carried across `feed` calls.
pub(crate) struct DictEncoder {
    code: u8,
    previous: Prev,
    pending_mask: u8,
    is_first_byte: bool,
}

impl DictEncoder {
    pub fn new() -> Self {
        DictEncoder {
            code: 1,
            previous: Prev::Zero,
            pending_mask: 0,
            is_first_byte: true,
        }
    }

    pub fn feed(
        &mut self,
        dict: &Dictionary,
        src: &[u8],
        dst: &mut [u8],
        pos: &mut usize,
    ) -> Result<(), Error> {
        let mut i = 0;
        while i < src.len() {
            let rest = &src[i..];
            if let Some((idx, len)) = dict.search_longest(rest) {
                if self.previous != Prev::Dictionary && !self.is_first_byte {
                    self.emit_code(dst, pos)?;
                }
                put(dst, pos, 0x80 | (idx - 1))?;
                self.previous = Prev::Dictionary;
                self.pending_mask = NEXTCODE_IS_DICTIONARY;
                self.is_first_byte = false;
                i += len as usize;
                continue;
            }

            let b = rest[0];
            if b == 0 {
                if self.previous != Prev::Dictionary && !self.is_first_byte {
                    self.emit_code(dst, pos)?;
                }
                self.pending_mask = NEXTCODE_IS_ZERO;
                self.previous = Prev::Zero;
            } else {
                // `previous` starts at `Zero` as a placeholder, not because
                // an actual zero preceded the very first byte — only fold
                // that state into the pending marker once past the first
                // byte, or the leftmost block would claim a zero precedes
                // it when nothing does.
                self.pending_mask = if self.is_first_byte {
                    0
                } else {
                    match self.previous {
                        Prev::Zero => NEXTCODE_IS_ZERO,
                        Prev::Dictionary => NEXTCODE_IS_DICTIONARY,
                        Prev::Block => self.pending_mask,
                    }
                };
                put(dst, pos, b)?;
                self.code += 1;
                if self.code == JUMP {
                    // Jump sentinels never carry marker bits (open question
                    // O1): they're written bare so the decoder's equality
                    // test against JUMP stays unambiguous.
                    put(dst, pos, JUMP)?;
                    self.code = 1;
                    self.pending_mask = 0;
                }
                self.previous = Prev::Block;
            }
            self.is_first_byte = false;
            i += 1;
        }
        Ok(())
    }

    pub fn finish(&mut self, dst: &mut [u8], pos: &mut usize) -> Result<(), Error> {
        if self.previous != Prev::Dictionary {
            self.emit_code(dst, pos)?;
        }
        Ok(())
    }

    fn emit_code(&mut self, dst: &mut [u8], pos: &mut usize) -> Result<(), Error> {
        let byte = if self.code == 1 {
            1
        } else {
            self.code | self.pending_mask
        };
        put(dst, pos, byte)?;
        self.code = 1;
        Ok(())
    }
}

/// Decode a dictionary-assisted region, writing right-aligned into `dst`.
///
/// Returns the start offset in `dst` of the first decoded byte.
pub(crate) fn decode(dict: &Dictionary, src: &[u8], dst: &mut [u8]) -> Result<usize, Error> {
    let mut src_idx = src.len();
    let mut dst_cursor = dst.len();

    while src_idx > 0 {
        src_idx -= 1;
        let byte = src[src_idx];
        if byte == 0 {
            return Err(Error::BadEncodedPayload);
        }

        if byte & 0x80 != 0 {
            let idx = byte & 0x7F;
            let word = dict.get_word(idx).ok_or_else(|| {
                crate::log::warn!("dzrcobs: dictionary token {idx} has no matching word");
                Error::WordNotFoundOnDictionary
            })?;
            let len = word.len();
            dst_cursor = dst_cursor.checked_sub(len).ok_or(Error::Overflow)?;
            dst[dst_cursor..dst_cursor + len].copy_from_slice(word);
            continue;
        }

        let is_jump = byte == JUMP;
        let magnitude = if is_jump { byte } else { byte & !MARKER_BITS };
        if magnitude == 0 {
            return Err(Error::BadEncodedPayload);
        }
        let count = (magnitude - 1) as usize;

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

        // `magnitude == 1` is written bare by the encoder regardless of why
        // it fired (a real zero, or an empty run abutting a dictionary
        // token) — the only path that reaches an actual emission with
        // `code == 1` still pending is a run that started right after a
        // zero, so it always means "insert a zero here", not just when the
        // marker bit happens to be set.
        let ends_in_zero = !is_jump && (magnitude == 1 || byte & NEXTCODE_IS_ZERO != 0);
        let upstream_is_jump = start > 0 && src[start - 1] == JUMP;
        if ends_in_zero && !upstream_is_jump {
            dst_cursor = dst_cursor.checked_sub(1).ok_or(Error::Overflow)?;
            dst[dst_cursor] = 0;
        }

        src_idx = start;
    }

    Ok(dst_cursor)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DICT_BLOB: &[u8] = &[
        b'2', 0x01, 0x01, //
        b'3', 0x02, 0x00, 0x02, //
        b'4', 0x03, 0x00, 0x00, 0x03, //
        b'5', 0x04, 0x00, 0x00, 0x00, 0x04, //
        0x00,
    ];

    fn dict() -> Dictionary<'static> {
        Dictionary::new(DICT_BLOB).unwrap()
    }

    fn encode_all(dict: &Dictionary, input: &[u8]) -> ([u8; 32], usize) {
        let mut dst = [0u8; 32];
        let mut pos = 0usize;
        let mut enc = DictEncoder::new();
        enc.feed(dict, input, &mut dst, &mut pos).unwrap();
        enc.finish(&mut dst, &mut pos).unwrap();
        (dst, pos)
    }

    #[test]
    fn s6_single_dictionary_hit() {
        let d = dict();
        let (dst, len) = encode_all(&d, &[0x01, 0x01]);
        assert_eq!(&dst[..len], &[0x80]);
    }

    #[test]
    fn s7_back_to_back_hits() {
        let d = dict();
        let (dst, len) = encode_all(&d, &[0x01, 0x01, 0x01, 0x01]);
        assert_eq!(&dst[..len], &[0x80, 0x80]);
    }

    #[test]
    fn s8_lone_zero_carries_bare_code() {
        let d = dict();
        let (dst, len) = encode_all(&d, &[0x00]);
        assert_eq!(&dst[..len], &[0x01]);
    }

    fn round_trip(d: &Dictionary, input: &[u8]) {
        let (encoded, len) = encode_all(d, input);
        let mut dst = [0u8; 32];
        let start = decode(d, &encoded[..len], &mut dst).unwrap();
        assert_eq!(&dst[start..], input);
    }

    #[test]
    fn round_trips_dictionary_hits() {
        let d = dict();
        round_trip(&d, &[0x01, 0x01]);
        round_trip(&d, &[0x01, 0x01, 0x01, 0x01]);
        round_trip(&d, &[0x00]);
    }

    #[test]
    fn round_trips_mixed_literal_and_dictionary() {
        let d = dict();
        round_trip(&d, &[0xAA, 0x01, 0x01, 0xBB]);
        round_trip(&d, &[0x00, 0xAA, 0x01, 0x01]);
        round_trip(&d, &[0x01, 0x01, 0x00, 0xCC]);
        round_trip(&d, &[0xAA, 0xBB, 0xCC, 0x01, 0x01]);
    }

    #[test]
    fn rejects_unknown_dictionary_index() {
        let d = dict();
        let mut dst = [0u8; 8];
        assert_eq!(
            decode(&d, &[0x80 | 100], &mut dst),
            Err(Error::WordNotFoundOnDictionary)
        );
    }
}
