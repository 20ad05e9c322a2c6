//! CFF Encoding parsing (Technical Note #5176 §12).
//!
//! An Encoding maps font-specific character codes to glyphs by way of the
//! Charset's string identifiers. The Top DICT's `Encoding` operand is either
//! one of two predefined identifiers (`0` = Standard, `1` = Expert) or an
//! absolute offset to custom Format 0/1 data, optionally followed by a
//! supplement of additional {code, SID} pairs.

use crate::error::Error;
use crate::font_data::FontData;

/// One `{code, glyph_sid}` pair from an Encoding supplement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SupplementEntry {
    pub code: u8,
    pub glyph_sid: u16,
}

/// A decoded CFF Encoding.
#[derive(Clone, Debug, PartialEq)]
pub enum Encoding {
    /// The predefined Adobe StandardEncoding.
    Standard,
    /// The predefined Adobe ExpertEncoding.
    Expert,
    /// An explicit list of codes, one per glyph (glyph 0 excluded).
    Format0 {
        codes: Vec<u8>,
        supplement: Vec<SupplementEntry>,
    },
    /// Ranges of consecutive codes, one per glyph in the order they appear.
    Format1 {
        ranges: Vec<(u8, u8)>,
        supplement: Vec<SupplementEntry>,
    },
    /// No Encoding entry was present in the Top DICT.
    Unspecified,
}

/// Parses an Encoding given the Top DICT's `Encoding` operand value.
pub fn parse_encoding(file_data: &[u8], encoding_operand: i32) -> Result<Encoding, Error> {
    match encoding_operand {
        0 => return Ok(Encoding::Standard),
        1 => return Ok(Encoding::Expert),
        _ => {}
    }
    let offset = encoding_operand as usize;
    let data = FontData::new(file_data)
        .split_off(offset)
        .ok_or(Error::Truncated)?;
    let mut cursor = data.cursor();
    let format_byte = cursor.read_u8()?;
    // The high bit signals the presence of a supplement regardless of format.
    let format = format_byte & 0x7f;
    let has_supplement = format_byte & 0x80 != 0;
    let encoding = match format {
        0 => {
            let n_codes = cursor.read_u8()? as usize;
            let codes = cursor.read_array(n_codes)?.to_vec();
            let supplement = if has_supplement {
                read_supplement(&mut cursor)?
            } else {
                Vec::new()
            };
            Encoding::Format0 { codes, supplement }
        }
        1 => {
            let n_ranges = cursor.read_u8()? as usize;
            let mut ranges = Vec::with_capacity(n_ranges);
            for _ in 0..n_ranges {
                let first = cursor.read_u8()?;
                let n_left = cursor.read_u8()?;
                ranges.push((first, n_left));
            }
            let supplement = if has_supplement {
                read_supplement(&mut cursor)?
            } else {
                Vec::new()
            };
            Encoding::Format1 { ranges, supplement }
        }
        _ => {
            // An unrecognized format byte still carries a supplement list
            // per §8's boundary behavior ("0xFF with no known format falls
            // through to the Supplement branch").
            Encoding::Format0 {
                codes: Vec::new(),
                supplement: read_supplement(&mut cursor)?,
            }
        }
    };
    Ok(encoding)
}

fn read_supplement(cursor: &mut crate::font_data::Cursor) -> Result<Vec<SupplementEntry>, Error> {
    let n_sups = cursor.read_u8()? as usize;
    let mut entries = Vec::with_capacity(n_sups);
    for _ in 0..n_sups {
        let code = cursor.read_u8()?;
        let glyph_sid = cursor.read_u16()?;
        entries.push(SupplementEntry { code, glyph_sid });
    }
    Ok(entries)
}

impl Encoding {
    /// Resolves `code` to a string ID (SID) under Adobe StandardEncoding.
    ///
    /// Returns `None` for codes with no assigned glyph, and for every
    /// variant other than `Standard` — this crate does not ship the larger
    /// ExpertEncoding table, and a custom Format0/Format1 table maps codes
    /// to glyph indexes rather than SIDs directly, so resolving one of
    /// those to a SID is a second hop through the font's own `Charset`.
    pub fn sid_for_code(&self, code: u8) -> Option<u16> {
        match self {
            Encoding::Standard => match STANDARD_ENCODING[code as usize] {
                0 => None,
                sid => Some(sid as u16),
            },
            _ => None,
        }
    }
}

/// The Adobe StandardEncoding, mapping character codes to SIDs in the
/// standard string table. Codes with no assigned glyph map to SID 0.
#[rustfmt::skip]
const STANDARD_ENCODING: [u8; 256] = [
      0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,
      0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,
      1,   2,   3,   4,   5,   6,   7,   8,   9,  10,  11,  12,  13,  14,  15,  16,
     17,  18,  19,  20,  21,  22,  23,  24,  25,  26,  27,  28,  29,  30,  31,  32,
     33,  34,  35,  36,  37,  38,  39,  40,  41,  42,  43,  44,  45,  46,  47,  48,
     49,  50,  51,  52,  53,  54,  55,  56,  57,  58,  59,  60,  61,  62,  63,  64,
     65,  66,  67,  68,  69,  70,  71,  72,  73,  74,  75,  76,  77,  78,  79,  80,
     81,  82,  83,  84,  85,  86,  87,  88,  89,  90,  91,  92,  93,  94,  95,   0,
      0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,
      0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,
      0,  96,  97,  98,  99, 100, 101, 102, 103, 104, 105, 106, 107, 108, 109, 110,
      0, 111, 112, 113, 114,   0, 115, 116, 117, 118, 119, 120, 121, 122,   0, 123,
      0, 124, 125, 126, 127, 128, 129, 130, 131,   0, 132, 133,   0, 134, 135, 136,
    137,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,
      0, 138,   0, 139,   0,   0,   0,   0, 140, 141, 142, 143,   0,   0,   0,   0,
      0, 144,   0,   0,   0, 145,   0,   0, 146, 147, 148, 149,   0,   0,   0,   0,
];
