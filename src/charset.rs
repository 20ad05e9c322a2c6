//! CFF Charset parsing (Technical Note #5176 §13).
//!
//! A Charset maps glyph indexes to string IDs (SIDs), which in turn name
//! the glyph via the String INDEX (or a standard string, for SIDs below
//! 391). Glyph 0 is always `.notdef` and is never listed explicitly.

use crate::error::Error;
use crate::font_data::FontData;

/// A decoded CFF Charset.
#[derive(Clone, Debug, PartialEq)]
pub enum Charset {
    /// The predefined ISOAdobe charset (SIDs 1..228, in order).
    IsoAdobe,
    /// The predefined Expert charset.
    Expert,
    /// The predefined ExpertSubset charset.
    ExpertSubset,
    /// An explicit SID per glyph (glyph 0 excluded).
    Format0 { sids: Vec<u16> },
    /// Ranges of consecutive SIDs, 8-bit `nLeft` counters.
    Format1 { ranges: Vec<SidRange> },
    /// Ranges of consecutive SIDs, 16-bit `nLeft` counters.
    Format2 { ranges: Vec<SidRange> },
}

/// One `{first_sid, n_left}` run: `n_left + 1` glyphs carry SIDs
/// `first_sid, first_sid + 1, ..., first_sid + n_left`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SidRange {
    pub first_sid: u16,
    pub n_left: u16,
}

/// Parses a Charset given the Top DICT's `charset` operand value and the
/// font's glyph count (`CharStrings.count`, needed because custom Charsets
/// are not self-delimiting — they run until every glyph has a SID).
pub fn parse_charset(file_data: &[u8], charset_operand: i32, glyph_count: u32) -> Result<Charset, Error> {
    match charset_operand {
        0 => return Ok(Charset::IsoAdobe),
        1 => return Ok(Charset::Expert),
        2 => return Ok(Charset::ExpertSubset),
        _ => {}
    }
    let offset = charset_operand as usize;
    let data = FontData::new(file_data)
        .split_off(offset)
        .ok_or(Error::Truncated)?;
    let mut cursor = data.cursor();
    let format = cursor.read_u8()?;
    // Glyph 0 (.notdef) never appears in the table; it carries SID 0 implicitly.
    let n_remaining = (glyph_count as usize).saturating_sub(1);
    let charset = match format {
        0 => {
            let mut sids = Vec::with_capacity(n_remaining);
            for _ in 0..n_remaining {
                sids.push(cursor.read_u16()?);
            }
            Charset::Format0 { sids }
        }
        1 => Charset::Format1 {
            ranges: read_ranges(&mut cursor, n_remaining, false)?,
        },
        2 => Charset::Format2 {
            ranges: read_ranges(&mut cursor, n_remaining, true)?,
        },
        _ => return Err(Error::CorruptDict),
    };
    Ok(charset)
}

fn read_ranges(
    cursor: &mut crate::font_data::Cursor,
    mut n_remaining: usize,
    wide: bool,
) -> Result<Vec<SidRange>, Error> {
    let mut ranges = Vec::new();
    while n_remaining > 0 {
        let first_sid = cursor.read_u16()?;
        let n_left = if wide {
            cursor.read_u16()?
        } else {
            cursor.read_u8()? as u16
        };
        ranges.push(SidRange { first_sid, n_left });
        n_remaining = n_remaining.saturating_sub(n_left as usize + 1);
    }
    Ok(ranges)
}

impl Charset {
    /// Returns the SID for `gid`, or `None` if `gid` is out of range.
    ///
    /// Glyph 0 always maps to SID 0 (`.notdef`). Predefined charsets return
    /// `None` for any nonzero glyph since this crate does not ship their
    /// SID tables (see `DESIGN.md`).
    pub fn sid_for_gid(&self, gid: u16) -> Option<u16> {
        if gid == 0 {
            return Some(0);
        }
        let index = gid as usize - 1;
        match self {
            Charset::IsoAdobe | Charset::Expert | Charset::ExpertSubset => None,
            Charset::Format0 { sids } => sids.get(index).copied(),
            Charset::Format1 { ranges } | Charset::Format2 { ranges } => {
                sid_from_ranges(ranges, index)
            }
        }
    }
}

fn sid_from_ranges(ranges: &[SidRange], mut index: usize) -> Option<u16> {
    for range in ranges {
        let run_len = range.n_left as usize + 1;
        if index < run_len {
            return Some(range.first_sid + index as u16);
        }
        index -= run_len;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predefined_charsets() {
        assert_eq!(parse_charset(&[], 0, 10).unwrap(), Charset::IsoAdobe);
        assert_eq!(parse_charset(&[], 1, 10).unwrap(), Charset::Expert);
        assert_eq!(parse_charset(&[], 2, 10).unwrap(), Charset::ExpertSubset);
    }

    #[test]
    fn format0_explicit_sids() {
        // 4 glyphs total -> 3 explicit SIDs after .notdef, table at offset 3
        let data = [0xAA, 0xAA, 0xAA, 0x00, 0x00, 0x01, 0x00, 0x02, 0x00, 0x03];

        assert_eq!(parse_charset(&data, 0, 4).unwrap(), Charset::IsoAdobe);

        let charset = parse_charset(&data, 3, 4).unwrap();
        assert_eq!(
            charset,
            Charset::Format0 {
                sids: vec![1, 2, 3]
            }
        );
        assert_eq!(charset.sid_for_gid(0), Some(0));
        assert_eq!(charset.sid_for_gid(1), Some(1));
        assert_eq!(charset.sid_for_gid(3), Some(3));
        assert_eq!(charset.sid_for_gid(4), None);
    }

    #[test]
    fn format1_cumulative_ranges() {
        // format=1 table at offset 3 (the first 3 bytes are unrelated
        // padding, so the offset itself is exercised rather than only
        // happening to work at offset 0): range(first_sid=10, n_left=2)
        // covers 3 glyphs, then range(first_sid=50, n_left=0) covers the
        // last glyph: total 4 explicit SIDs plus .notdef = 5 glyphs.
        let data = [
            0xAA, 0xAA, 0xAA, 0x01, 0x00, 0x0a, 0x02, 0x00, 0x32, 0x00,
        ];
        let charset = parse_charset(&data, 3, 5).unwrap();
        assert_eq!(charset.sid_for_gid(1), Some(10));
        assert_eq!(charset.sid_for_gid(2), Some(11));
        assert_eq!(charset.sid_for_gid(3), Some(12));
        assert_eq!(charset.sid_for_gid(4), Some(50));
    }

    #[test]
    fn format2_wide_ranges() {
        // format=2 table at offset 3, preceded by padding so that offsets
        // 0/1/2 (which would instead select the predefined IsoAdobe/Expert/
        // ExpertSubset charsets) stay out of the way: one range
        // first_sid=500, n_left=1000 (16-bit), covering all 1001 remaining
        // glyphs of a 1002-glyph font.
        let mut data = vec![0xAA, 0xAA, 0xAA, 0x02];
        data.extend_from_slice(&500u16.to_be_bytes());
        data.extend_from_slice(&1000u16.to_be_bytes());

        assert_eq!(parse_charset(&data, 0, 1002).unwrap(), Charset::IsoAdobe);

        let charset = parse_charset(&data, 3, 1002).unwrap();
        assert_eq!(charset.sid_for_gid(1), Some(500));
        assert_eq!(charset.sid_for_gid(1001), Some(1500));
    }
}
