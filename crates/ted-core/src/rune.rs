//! Rune codec: UTF-8 encode/decode over raw bytes.
//!
//! Lines are stored as `String`s, but the codec works on `&[u8]` so that the
//! geometry layer can walk text that never passed UTF-8 validation (content
//! pasted from a terminal, a lossy file read, a partially typed sequence).
//!
//! # Lead-byte classification
//!
//! | Pattern     | Sequence length |
//! |-------------|-----------------|
//! | `0xxxxxxx`  | 1               |
//! | `110xxxxx`  | 2               |
//! | `1110xxxx`  | 3               |
//! | `11110xxx`  | 4               |
//! | anything else | invalid       |
//!
//! # Continuation leniency
//!
//! [`decode`] masks continuation bytes with `0x3F` without checking their
//! `10xxxxxx` prefix. A malformed continuation byte therefore produces a
//! wrong rune rather than [`Rune::INVALID`]. Only the lead byte and the
//! sequence length are validated. The tests pin this behavior down.

use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Coordinate newtypes
// ---------------------------------------------------------------------------

/// A byte position inside a line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ByteOffset(pub usize);

/// A rune position inside a line: the number of runes before it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuneIndex(pub usize);

// ---------------------------------------------------------------------------
// Rune
// ---------------------------------------------------------------------------

/// One decoded code point, or the [`INVALID`](Self::INVALID) sentinel.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rune(pub i32);

impl Rune {
    /// Produced when a byte sequence cannot be decoded.
    pub const INVALID: Self = Self(-1);

    /// Horizontal tab, the only rune wider than one visible column.
    pub const TAB: Self = Self(0x09);

    /// Line feed. Never stored inside a line.
    pub const NEWLINE: Self = Self(0x0A);

    /// True for anything but the decode-failure sentinel.
    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 >= 0
    }

    /// The rune as a `char`, if it is a valid scalar value.
    #[must_use]
    pub fn to_char(self) -> Option<char> {
        u32::try_from(self.0).ok().and_then(char::from_u32)
    }
}

impl From<char> for Rune {
    #[inline]
    fn from(ch: char) -> Self {
        Self(ch as i32)
    }
}

impl fmt::Debug for Rune {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "U+{:04X}", self.0)
        } else {
            f.write_str("Rune::INVALID")
        }
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Length of the sequence announced by `lead`, or `None` for a byte that
/// cannot start a sequence (including stray continuation bytes).
#[inline]
const fn sequence_len(lead: u8) -> Option<usize> {
    if lead & 0x80 == 0 {
        Some(1)
    } else if lead & 0xE0 == 0xC0 {
        Some(2)
    } else if lead & 0xF0 == 0xE0 {
        Some(3)
    } else if lead & 0xF8 == 0xF0 {
        Some(4)
    } else {
        None
    }
}

/// Count the runes in `bytes`.
///
/// Returns `None` if a lead byte is invalid or a sequence is cut short by
/// the end of the input.
#[must_use]
pub fn rune_length(bytes: &[u8]) -> Option<usize> {
    let mut i = 0;
    let mut count = 0;
    while i < bytes.len() {
        let len = sequence_len(bytes[i])?;
        if i + len > bytes.len() {
            return None;
        }
        i += len;
        count += 1;
    }
    Some(count)
}

/// Decode the rune at the front of `bytes`.
///
/// Returns the rune and the number of bytes it occupies, or `None` when
/// `bytes` is empty. An invalid or truncated lead byte decodes to
/// `(Rune::INVALID, 1)` so a caller walking the line always advances by at
/// least one byte.
#[must_use]
pub fn decode(bytes: &[u8]) -> Option<(Rune, usize)> {
    let &lead = bytes.first()?;
    let Some(len) = sequence_len(lead) else {
        return Some((Rune::INVALID, 1));
    };
    if bytes.len() < len {
        return Some((Rune::INVALID, 1));
    }

    let mut value = u32::from(match len {
        1 => lead,
        2 => lead & 0x1F,
        3 => lead & 0x0F,
        _ => lead & 0x07,
    });
    for &byte in &bytes[1..len] {
        value = (value << 6) | u32::from(byte & 0x3F);
    }

    // At most 21 significant bits, always fits.
    let rune = i32::try_from(value).map_or(Rune::INVALID, Rune);
    Some((rune, len))
}

/// Iterator over `(rune, byte_len)` pairs of a byte string.
///
/// Yields [`Rune::INVALID`] with length 1 for every undecodable byte.
#[derive(Debug, Clone)]
pub struct Runes<'a> {
    bytes: &'a [u8],
}

impl Iterator for Runes<'_> {
    type Item = (Rune, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (rune, len) = decode(self.bytes)?;
        self.bytes = &self.bytes[len..];
        Some((rune, len))
    }
}

/// Walk the runes of `bytes`.
#[must_use]
pub const fn runes(bytes: &[u8]) -> Runes<'_> {
    Runes { bytes }
}

/// Byte offset of rune `index`, saturating at the end of `bytes`.
#[must_use]
pub fn byte_offset(bytes: &[u8], index: RuneIndex) -> ByteOffset {
    let offset = runes(bytes).take(index.0).map(|(_, len)| len).sum();
    ByteOffset(offset)
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Why [`encode`] refused a rune.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("rune {0:?} is outside the encodable range")]
    OutOfRange(Rune),

    #[error("need {needed} bytes to encode, buffer holds {capacity}")]
    BufferTooSmall { needed: usize, capacity: usize },
}

/// Encode `rune` into the front of `out`, returning the bytes written.
///
/// # Errors
///
/// [`EncodeError::BufferTooSmall`] if `out` is shorter than the encoding,
/// [`EncodeError::OutOfRange`] for negative runes or runes at or above
/// `0x110000`.
#[allow(clippy::cast_possible_truncation)]
pub fn encode(rune: Rune, out: &mut [u8]) -> Result<usize, EncodeError> {
    let value = u32::try_from(rune.0).map_err(|_| EncodeError::OutOfRange(rune))?;
    let needed = match value {
        0..=0x7F => 1,
        0x80..=0x7FF => 2,
        0x800..=0xFFFF => 3,
        0x1_0000..=0x10_FFFF => 4,
        _ => return Err(EncodeError::OutOfRange(rune)),
    };
    if out.len() < needed {
        return Err(EncodeError::BufferTooSmall {
            needed,
            capacity: out.len(),
        });
    }

    match needed {
        1 => out[0] = value as u8,
        2 => {
            out[0] = 0xC0 | (value >> 6) as u8;
            out[1] = 0x80 | (value & 0x3F) as u8;
        }
        3 => {
            out[0] = 0xE0 | (value >> 12) as u8;
            out[1] = 0x80 | ((value >> 6) & 0x3F) as u8;
            out[2] = 0x80 | (value & 0x3F) as u8;
        }
        _ => {
            out[0] = 0xF0 | (value >> 18) as u8;
            out[1] = 0x80 | ((value >> 12) & 0x3F) as u8;
            out[2] = 0x80 | ((value >> 6) & 0x3F) as u8;
            out[3] = 0x80 | (value & 0x3F) as u8;
        }
    }
    Ok(needed)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
