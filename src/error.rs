//! Error types for CFF parsing and charstring evaluation.

use std::fmt;

/// Errors that can occur while parsing a CFF container or evaluating a
/// Type 2 charstring.
///
/// These divide into the structural failures that abort `open` (anything
/// that makes the byte stream itself untrustworthy) and the per-glyph
/// failures that abort a single charstring evaluation. Semantic anomalies
/// (missing CharStrings, unspecified Encoding/Charset/FDSelect, a missing
/// Private DICT) are not represented here — they are reported through
/// [`crate::Diagnostics`] and the affected field becomes empty/unspecified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// A read ran past the end of the available bytes.
    Truncated,
    /// An INDEX violated its framing invariants (bad offSize, non-monotonic
    /// offsets, or a first offset other than 1).
    CorruptIndex,
    /// A DICT contained an operand/operator byte sequence that could not be
    /// decoded.
    CorruptDict,
    /// The Top DICT had no `CharStrings` entry.
    MissingCharstrings,
    /// A charstring requested a glyph index that doesn't exist.
    InvalidGlyphId(u16),
    /// Subroutine calls nested deeper than the configured limit.
    RecursionLimit,
    /// The charstring operand stack overflowed its fixed capacity.
    StackOverflow,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Truncated => write!(f, "unexpected end of data"),
            Error::CorruptIndex => write!(f, "malformed INDEX structure"),
            Error::CorruptDict => write!(f, "malformed DICT data"),
            Error::MissingCharstrings => write!(f, "Top DICT has no CharStrings entry"),
            Error::InvalidGlyphId(gid) => write!(f, "glyph index {gid} is out of range"),
            Error::RecursionLimit => write!(f, "subroutine call nesting limit exceeded"),
            Error::StackOverflow => write!(f, "charstring operand stack overflowed"),
        }
    }
}

impl std::error::Error for Error {}
