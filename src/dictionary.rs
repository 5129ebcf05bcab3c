//! Packed dictionary blob parsing, validation, and lookup.
//!
//! A blob is a flat run of entries, each an ASCII digit `'2'..='5'` giving a
//! word length `L` followed by `L` raw bytes, grouped by ascending `L` and
//! sorted ascending within a group, terminated by a single `0x00`. This
//! mirrors `dzrcobs_dictionary_isvalid`/`dzrcobs_dictionary_init` in the
//! format; the binary-search shape inside a stratum is grounded in
//! `prefix_search::main` (`binary_search` over a sorted `&[&str]`, extending
//! on `Ok`, checking `starts_with` on `Err`) and in `bbq_steno::memdict`'s
//! offset-table lookups over a packed blob.

use core::cmp::Ordering;

/// Smallest dictionary word length this format supports.
pub const MIN_WORD_SIZE: u8 = 2;
/// Largest dictionary word length this format supports.
pub const MAX_WORD_SIZE: u8 = 5;
/// Upper bound on the number of entries a dictionary may hold.
pub const MAX_ENTRIES: usize = 126;
/// Number of distinct word-length groups ("strata") a dictionary may hold.
pub const MAX_STRATA: usize = 4;

/// Why a dictionary blob failed validation. One distinct variant per
/// invariant in `spec.md` §3/§4.2.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DictError {
    /// A length marker byte was not an ASCII digit in `'2'..='5'`.
    BadWordSize,
    /// The blob declares zero entries, or more than [`MAX_ENTRIES`].
    WordCountExceeded,
    /// Two words within the same stratum are not in strictly ascending
    /// lexicographic order (this also catches duplicates), or a later
    /// stratum's length is not greater than an earlier one's.
    NotSorted,
    /// More than [`MAX_STRATA`] distinct word lengths appear.
    StratumCountExceeded,
    /// The blob ran out of bytes before reaching its `0x00` terminator.
    OutOfBounds,
    /// Bytes remain in the blob after the `0x00` terminator.
    EarlierEnd,
}

impl core::fmt::Display for DictError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            DictError::BadWordSize => write!(f, "word length outside 2..=5"),
            DictError::WordCountExceeded => write!(f, "entry count outside 1..=126"),
            DictError::NotSorted => write!(f, "entries not strictly ascending"),
            DictError::StratumCountExceeded => write!(f, "more than 4 distinct word sizes"),
            DictError::OutOfBounds => write!(f, "missing terminating zero byte"),
            DictError::EarlierEnd => write!(f, "trailing bytes after terminator"),
        }
    }
}

impl core::error::Error for DictError {}

#[derive(Clone, Copy, Debug)]
struct Stratum {
    /// Offset of the first entry's length byte within the blob.
    base: usize,
    /// `L + 1`: bytes from one entry's length byte to the next's.
    stride: usize,
    /// Number of entries in this stratum; zero means inert.
    count: usize,
    /// 1-based global index of this stratum's first entry.
    global_index: usize,
}

impl Stratum {
    const EMPTY: Stratum = Stratum {
        base: 0,
        stride: 0,
        count: 0,
        global_index: 0,
    };
}

/// A validated, indexed dictionary borrowed from its caller's byte slice.
///
/// Immutable after construction and `Sync`/`Send` since it holds nothing but
/// a shared slice and derived offsets — safe to share read-only across any
/// number of encoder/decoder contexts and threads, per `spec.md` §5.
pub struct Dictionary<'a> {
    blob: &'a [u8],
    strata: [Stratum; MAX_STRATA],
    min_word_size: u8,
    max_word_size: u8,
}

/// Validate a dictionary blob without building an index.
///
/// Exposed separately from [`Dictionary::new`] because the original format
/// draws a line between "does this blob parse" and "build lookup tables",
/// matching a validate/init split.
pub fn validate(blob: &[u8]) -> Result<(), DictError> {
    let mut pos = 0usize;
    let mut word_count = 0usize;
    let mut stratum_count = 0usize;
    let mut current_len: Option<u8> = None;
    let mut prev_word: Option<&[u8]> = None;

    loop {
        let marker = *blob.get(pos).ok_or(DictError::OutOfBounds)?;
        if marker == 0 {
            break;
        }
        if !(b'2'..=b'5').contains(&marker) {
            return Err(DictError::BadWordSize);
        }
        if current_len != Some(marker) {
            if let Some(prev) = current_len {
                if marker < prev {
                    return Err(DictError::NotSorted);
                }
            }
            stratum_count += 1;
            if stratum_count > MAX_STRATA {
                return Err(DictError::StratumCountExceeded);
            }
            current_len = Some(marker);
            prev_word = None;
        }

        let len = (marker - b'0') as usize;
        let end = pos
            .checked_add(1 + len)
            .ok_or(DictError::OutOfBounds)?;
        if end > blob.len() {
            return Err(DictError::OutOfBounds);
        }
        let word = &blob[pos + 1..end];
        if let Some(prev) = prev_word {
            if word.cmp(prev) != Ordering::Greater {
                return Err(DictError::NotSorted);
            }
        }
        prev_word = Some(word);

        word_count += 1;
        if word_count > MAX_ENTRIES {
            return Err(DictError::WordCountExceeded);
        }
        pos = end;
    }

    if pos + 1 != blob.len() {
        return Err(DictError::EarlierEnd);
    }
    if word_count == 0 {
        return Err(DictError::WordCountExceeded);
    }
    Ok(())
}

impl<'a> Dictionary<'a> {
    /// Validate and index a packed dictionary blob.
    pub fn new(blob: &'a [u8]) -> Result<Self, DictError> {
        validate(blob)?;

        let mut strata = [Stratum::EMPTY; MAX_STRATA];
        let mut pos = 0usize;
        let mut next_global_index = 1usize;

        while blob[pos] != 0 {
            let marker = blob[pos];
            let len = (marker - b'0') as usize;
            let stratum_idx = len - MIN_WORD_SIZE as usize;
            let stride = len + 1;

            let s = &mut strata[stratum_idx];
            if s.count == 0 {
                s.base = pos;
                s.stride = stride;
                s.global_index = next_global_index;
            }
            s.count += 1;

            pos += stride;
            next_global_index += 1;
        }

        let mut min_word_size = MAX_WORD_SIZE;
        let mut max_word_size = MIN_WORD_SIZE;
        for (i, s) in strata.iter().enumerate() {
            if s.count > 0 {
                let l = (i + MIN_WORD_SIZE as usize) as u8;
                min_word_size = min_word_size.min(l);
                max_word_size = max_word_size.max(l);
            }
        }

        Ok(Dictionary {
            blob,
            strata,
            min_word_size,
            max_word_size,
        })
    }

    /// Shortest word length present in this dictionary (meaningless if the
    /// dictionary is empty).
    pub fn min_word_size(&self) -> u8 {
        self.min_word_size
    }

    /// Longest word length present in this dictionary (meaningless if the
    /// dictionary is empty).
    pub fn max_word_size(&self) -> u8 {
        self.max_word_size
    }

    /// Look up a word by its 0-based global index (`0..125`).
    ///
    /// Mirrors `dzrcobs_dictionary_get`: converts to the 1-based index the
    /// strata were built with, scans strata ascending by length, and
    /// returns the first stratum whose range covers the target.
    pub fn get_word(&self, idx: u8) -> Option<&'a [u8]> {
        let target = idx as usize + 1;
        for s in &self.strata {
            if s.count == 0 {
                continue;
            }
            let last = s.global_index + s.count - 1;
            if target >= s.global_index && target <= last {
                let offset = target - s.global_index;
                let start = s.base + offset * s.stride + 1;
                let len = s.stride - 1;
                return Some(&self.blob[start..start + len]);
            }
        }
        None
    }

    /// Find a dictionary word that is a prefix of `key`.
    ///
    /// Scans strata ascending by word length (shortest first) and returns
    /// the first hit, resolving the format's own ambiguity by following
    /// `dzrcobs_dictionary_search`'s actual iteration order rather than the
    /// "prefer longer" prose description. Returns `(1-based global index,
    /// matched length)`.
    pub fn search_longest(&self, key: &[u8]) -> Option<(u8, u8)> {
        for s in &self.strata {
            if s.count == 0 {
                continue;
            }
            let l = s.stride - 1;
            if l > key.len() {
                continue;
            }
            if let Some(pos) = self.binary_search_stratum(s, &key[..l]) {
                return Some(((s.global_index + pos) as u8, l as u8));
            }
        }
        None
    }

    fn binary_search_stratum(&self, s: &Stratum, key: &[u8]) -> Option<usize> {
        let mut lo = 0usize;
        let mut hi = s.count;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let start = s.base + mid * s.stride + 1;
            let word = &self.blob[start..start + key.len()];
            match word.cmp(key) {
                Ordering::Equal => return Some(mid),
                Ordering::Less => lo = mid + 1,
                Ordering::Greater => hi = mid,
            }
        }
        None
    }
}

/// The dictionary this crate ships with, taken verbatim from the original
/// format's sample table: four two-byte words, then four three-byte words.
pub const DEFAULT_DICTIONARY: &[u8] = &[
    b'2', 0x00, 0x00, //
    b'2', 0x00, 0x01, //
    b'2', 0x01, 0x00, //
    b'2', 0x0D, 0x0A, //
    b'3', 0x00, 0x00, 0x00, //
    b'3', 0x00, 0x00, 0x01, //
    b'3', 0x00, 0x01, 0x00, //
    b'3', 0x01, 0x00, 0x00, //
    0x00,
];
