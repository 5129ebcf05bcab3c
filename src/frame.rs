//! Frame assembler: trailer construction, CRC, and dictionary-slot binding.
//!
//! Grounded in `minder::encode::serial`'s `Writer`/CRC-trailer shape (a
//! persistent context that binds configuration once, then hands out
//! per-message sessions that borrow a destination buffer) and in
//! `dzrcobs.c`'s `sDZRCOBS_ctx` (two nullable dictionary slots surviving
//! across `begin`/`end` cycles), re-expressed as `Option<&Dictionary>` slots
//! per the §9 recast note.

use crate::crc8;
use crate::dict_codec::{self, DictEncoder};
use crate::dictionary::Dictionary;
use crate::rcobs::{self, PlainEncoder};
use crate::Error;

/// Which of the two dictionary slots a binding or a dict-mode frame refers to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DictSlot {
    Dict1,
    Dict2,
}

/// Frame encoding selector, the low 2 bits of the trailer's encoding byte.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Encoding {
    Plain,
    Dict1,
    Dict2,
}

impl Encoding {
    fn bits(self) -> u8 {
        match self {
            Encoding::Plain => 0,
            Encoding::Dict1 => 1,
            Encoding::Dict2 => 2,
        }
    }

    fn dict_slot(self) -> Option<DictSlot> {
        match self {
            Encoding::Plain => None,
            Encoding::Dict1 => Some(DictSlot::Dict1),
            Encoding::Dict2 => Some(DictSlot::Dict2),
        }
    }
}

/// Persistent encoder context: holds the two dictionary bindings across
/// however many `begin`/`end` cycles the caller runs.
pub struct Encoder<'d> {
    dicts: [Option<&'d Dictionary<'d>>; 2],
}

impl<'d> Default for Encoder<'d> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'d> Encoder<'d> {
    pub fn new() -> Self {
        Encoder { dicts: [None, None] }
    }

    /// Bind a dictionary to a slot. Infallible: the slot and reference are
    /// both statically non-null, so there is no `BadArg` path left to take.
    pub fn set_dictionary(&mut self, slot: DictSlot, dict: &'d Dictionary<'d>) {
        let idx = match slot {
            DictSlot::Dict1 => 0,
            DictSlot::Dict2 => 1,
        };
        self.dicts[idx] = Some(dict);
    }

    /// Begin a frame, borrowing `dst` for the session's lifetime.
    pub fn begin<'a>(
        &self,
        encoding: Encoding,
        user6: u8,
        dst: &'a mut [u8],
    ) -> Result<EncodeSession<'a, 'd>, Error> {
        if dst.len() < 2 || user6 == 0 || user6 > 63 {
            return Err(Error::BadArg);
        }
        let dict = match encoding.dict_slot() {
            None => None,
            Some(DictSlot::Dict1) => Some(self.dicts[0].ok_or(Error::BadArg)?),
            Some(DictSlot::Dict2) => Some(self.dicts[1].ok_or(Error::BadArg)?),
        };

        let engine = match dict {
            None => Engine::Plain(PlainEncoder::new()),
            Some(d) => Engine::Dict(DictEncoder::new(), d),
        };

        Ok(EncodeSession {
            dst,
            pos: 0,
            crc: crc8::INIT,
            user6,
            encoding,
            engine,
            open: true,
        })
    }
}

enum Engine<'d> {
    Plain(PlainEncoder),
    Dict(DictEncoder, &'d Dictionary<'d>),
}

/// A single frame in progress, borrowing its destination buffer.
pub struct EncodeSession<'a, 'd> {
    dst: &'a mut [u8],
    pos: usize,
    crc: u8,
    user6: u8,
    encoding: Encoding,
    engine: Engine<'d>,
    open: bool,
}

impl<'a, 'd> EncodeSession<'a, 'd> {
    /// Feed more payload bytes, appending to the destination. A no-op on an
    /// empty slice.
    pub fn feed(&mut self, src: &[u8]) -> Result<(), Error> {
        if !self.open {
            return Err(Error::NotInitialized);
        }
        if src.is_empty() {
            return Ok(());
        }
        let needed = crate::max_encoded(src.len()) + crate::FRAME_HEADER_SIZE;
        if self.dst.len() - self.pos < needed {
            return Err(Error::Overflow);
        }
        match &mut self.engine {
            Engine::Plain(enc) => enc.feed(src, self.dst, &mut self.pos)?,
            Engine::Dict(enc, dict) => enc.feed(dict, src, self.dst, &mut self.pos)?,
        }
        Ok(())
    }

    /// Flush the pending run and write the trailer, returning the total
    /// bytes written. Consumes the session: further `feed` calls fail with
    /// `NotInitialized`.
    pub fn end(&mut self) -> Result<usize, Error> {
        if !self.open {
            return Err(Error::NotInitialized);
        }
        self.open = false;

        match &mut self.engine {
            Engine::Plain(enc) => enc.finish(self.dst, &mut self.pos)?,
            Engine::Dict(enc, _) => enc.finish(self.dst, &mut self.pos)?,
        }

        for i in 0..self.pos {
            self.crc = crc8::step(self.crc, self.dst[i]);
        }

        let encoding_byte = (self.user6 << 2) | self.encoding.bits();
        rcobs::put(self.dst, &mut self.pos, encoding_byte)?;
        self.crc = crc8::step(self.crc, encoding_byte);

        let crc_byte = if self.crc == 0 { crc8::ZERO_REMAP } else { self.crc };
        rcobs::put(self.dst, &mut self.pos, crc_byte)?;

        Ok(self.pos)
    }
}

/// Result of a successful decode: decoded bytes live at
/// `dst[start..start + len]`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Decoded {
    pub start: usize,
    pub len: usize,
    pub user6: u8,
}

/// Persistent decoder context: same dictionary-slot binding shape as
/// [`Encoder`], but decode has no incremental state.
pub struct Decoder<'d> {
    dicts: [Option<&'d Dictionary<'d>>; 2],
}

impl<'d> Default for Decoder<'d> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'d> Decoder<'d> {
    pub fn new() -> Self {
        Decoder { dicts: [None, None] }
    }

    pub fn set_dictionary(&mut self, slot: DictSlot, dict: &'d Dictionary<'d>) {
        let idx = match slot {
            DictSlot::Dict1 => 0,
            DictSlot::Dict2 => 1,
        };
        self.dicts[idx] = Some(dict);
    }

    /// Decode one frame (without its trailing transport `0x00`) into `dst`.
    pub fn decode(&self, src: &[u8], dst: &mut [u8]) -> Result<Decoded, Error> {
        if src.len() < 3 {
            return Err(Error::BadArg);
        }

        let received_crc = src[src.len() - 1];
        if received_crc == 0 {
            return Err(Error::BadEncodedPayload);
        }
        let mut crc = crc8::INIT;
        for &b in &src[..src.len() - 1] {
            crc = crc8::step(crc, b);
        }
        let expected = if crc == 0 { crc8::ZERO_REMAP } else { crc };
        if received_crc != expected {
            crate::log::warn!("dzrcobs: CRC mismatch, received {received_crc:#x} expected {expected:#x}");
            return Err(Error::CrcError);
        }

        let encoding_byte = src[src.len() - 2];
        let encoding_bits = encoding_byte & 0x03;
        let user6 = encoding_byte >> 2;

        let body = &src[..src.len() - 2];

        let (start, len) = match encoding_bits {
            0 => {
                let start = rcobs::decode(body, dst)?;
                (start, dst.len() - start)
            }
            1 | 2 => {
                let idx = if encoding_bits == 1 { 0 } else { 1 };
                let dict = self.dicts[idx].ok_or(Error::NoDictionaryToDecode)?;
                let start = dict_codec::decode(dict, body, dst)?;
                (start, dst.len() - start)
            }
            _ => return Err(Error::BadEncodedPayload),
        };

        Ok(Decoded { start, len, user6 })
    }
}
