//! CFF header (Technical Note #5176 §6).
//!
//! Four fixed bytes at the start of every CFF FontSet: `major`/`minor`
//! version, `hdrSize` (the byte offset of the Name INDEX that immediately
//! follows), and `offSize` (the nominal width used for a handful of
//! absolute offsets elsewhere in the file — distinct from the per-INDEX
//! `offSize` each INDEX carries for its own offset array).

use crate::error::Error;
use crate::font_data::FontData;

/// The four-byte CFF header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub major: u8,
    pub minor: u8,
    pub hdr_size: u8,
    pub off_size: u8,
}

/// Parses the header from the start of a CFF blob.
pub fn parse_header(data: &[u8]) -> Result<Header, Error> {
    let mut cursor = FontData::new(data).cursor();
    let major = cursor.read_u8()?;
    let minor = cursor.read_u8()?;
    let hdr_size = cursor.read_u8()?;
    let off_size = cursor.read_u8()?;
    if !(1..=4).contains(&off_size) {
        return Err(Error::CorruptIndex);
    }
    Ok(Header {
        major,
        minor,
        hdr_size,
        off_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_decode() {
        let header = parse_header(&[0x01, 0x00, 0x04, 0x02]).unwrap();
        assert_eq!(
            header,
            Header {
                major: 1,
                minor: 0,
                hdr_size: 4,
                off_size: 2,
            }
        );
    }

    #[test]
    fn illegal_off_size_is_corrupt() {
        assert_eq!(
            parse_header(&[0x01, 0x00, 0x04, 0x05]).unwrap_err(),
            Error::CorruptIndex
        );
    }
}
