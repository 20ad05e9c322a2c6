//! FDSelect parsing for CID-keyed CFF fonts (Technical Note #5176 §19).
//!
//! FDSelect maps each glyph index to an entry in the Font DICT array
//! (`FDArray`), which in turn carries that glyph's own Private DICT and
//! local subroutines. Only CID-keyed fonts carry an FDSelect; for plain
//! fonts every glyph implicitly belongs to font DICT 0.

use crate::error::Error;
use crate::font_data::FontData;

/// A decoded FDSelect table.
#[derive(Clone, Debug, PartialEq)]
pub enum FdSelect {
    /// One font DICT index byte per glyph.
    Format0 { fds: Vec<u8> },
    /// Sorted, non-overlapping ranges terminated by a sentinel `first_gid`
    /// equal to the glyph count.
    Format3 { ranges: Vec<FdRange>, sentinel: u16 },
}

/// One `{first_gid, fd_index}` run: glyphs `first_gid..next_range.first_gid`
/// all belong to font DICT `fd_index`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FdRange {
    pub first_gid: u16,
    pub fd_index: u8,
}

/// Parses an FDSelect given the Top DICT's `FDSelect` operand value.
pub fn parse_fd_select(file_data: &[u8], fd_select_offset: i32, glyph_count: u32) -> Result<FdSelect, Error> {
    let offset = fd_select_offset as usize;
    let data = FontData::new(file_data)
        .split_off(offset)
        .ok_or(Error::Truncated)?;
    let mut cursor = data.cursor();
    let format = cursor.read_u8()?;
    match format {
        0 => {
            let fds = cursor.read_array(glyph_count as usize)?.to_vec();
            Ok(FdSelect::Format0 { fds })
        }
        3 => {
            let n_ranges = cursor.read_u16()? as usize;
            let mut ranges = Vec::with_capacity(n_ranges);
            for _ in 0..n_ranges {
                let first_gid = cursor.read_u16()?;
                let fd_index = cursor.read_u8()?;
                ranges.push(FdRange {
                    first_gid,
                    fd_index,
                });
            }
            let sentinel = cursor.read_u16()?;
            Ok(FdSelect::Format3 { ranges, sentinel })
        }
        _ => Err(Error::CorruptDict),
    }
}

impl FdSelect {
    /// Returns the font DICT index for `gid`, or `None` if it's out of range.
    pub fn font_index(&self, gid: u16) -> Option<u8> {
        match self {
            FdSelect::Format0 { fds } => fds.get(gid as usize).copied(),
            FdSelect::Format3 { ranges, sentinel } => {
                if gid >= *sentinel {
                    return None;
                }
                // Binary search for the last range whose first_gid <= gid.
                match ranges.binary_search_by(|range| range.first_gid.cmp(&gid)) {
                    Ok(i) => Some(ranges[i].fd_index),
                    Err(0) => None,
                    Err(i) => Some(ranges[i - 1].fd_index),
                }
            }
        }
    }
}
