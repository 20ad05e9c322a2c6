//! Parsing for CFF INDEX structures.
//!
//! See Technical Note #5176 §5. An INDEX is `count` (u16), an `offSize`
//! byte, a `count+1`-entry offset array of `offSize` bytes each (1-based,
//! `offset[0] == 1`), and a contiguous data blob; object `i` occupies
//! `data[offset[i]-1 .. offset[i+1]-1]`.

use crate::error::Error;
use crate::font_data::FontData;

/// A framed view over one CFF INDEX.
///
/// Owns nothing: `offsets` and `data` both borrow from the file's buffer.
#[derive(Clone, Debug)]
pub struct Index<'a> {
    offsets: Vec<u32>,
    data: &'a [u8],
}

impl<'a> Index<'a> {
    /// An empty INDEX, as used for e.g. a font with no local subroutines.
    pub fn empty() -> Self {
        Index {
            offsets: Vec::new(),
            data: &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.len() <= 1
    }

    pub fn count(&self) -> u32 {
        self.offsets.len().saturating_sub(1) as u32
    }

    /// Returns the object at `index`, or an error if it's out of range.
    pub fn get(&self, index: usize) -> Result<&'a [u8], Error> {
        let start = *self.offsets.get(index).ok_or(Error::CorruptIndex)?;
        let end = *self.offsets.get(index + 1).ok_or(Error::CorruptIndex)?;
        self.data
            .get(start as usize..end as usize)
            .ok_or(Error::CorruptIndex)
    }

    /// The subroutine index bias for this INDEX (Technical Note #5177 §16).
    pub fn subr_bias(&self) -> i32 {
        let count = self.count();
        if count < 1240 {
            107
        } else if count < 33900 {
            1131
        } else {
            32768
        }
    }
}

/// Parses an INDEX starting at `pos` within `buf`.
///
/// Returns the framed view along with the number of bytes consumed, so that
/// callers can advance past it to locate the next top-level structure.
pub fn parse_index<'a>(buf: &'a [u8], pos: usize) -> Result<(Index<'a>, usize), Error> {
    let data = FontData::new(buf);
    let mut cursor = data
        .split_off(pos)
        .ok_or(Error::Truncated)?
        .cursor();
    let count = cursor.read_u16()?;
    if count == 0 {
        return Ok((Index::empty(), 2));
    }
    let off_size = cursor.read_u8()?;
    if !(1..=4).contains(&off_size) {
        return Err(Error::CorruptIndex);
    }
    let mut offsets = Vec::with_capacity(count as usize + 1);
    let mut prev = None;
    for _ in 0..=count {
        let offset = cursor.read_offset(off_size)?;
        if offset == 0 {
            return Err(Error::CorruptIndex);
        }
        if let Some(prev) = prev {
            if offset < prev {
                return Err(Error::CorruptIndex);
            }
        }
        prev = Some(offset);
        offsets.push(offset - 1);
    }
    if offsets[0] != 0 {
        return Err(Error::CorruptIndex);
    }
    let data_len = *offsets.last().unwrap() as usize;
    let data_start = pos + cursor.position();
    let object_data = buf
        .get(data_start..data_start + data_len)
        .ok_or(Error::CorruptIndex)?;
    let consumed = cursor.position() + data_len;
    Ok((
        Index {
            offsets,
            data: object_data,
        },
        consumed,
    ))
}
