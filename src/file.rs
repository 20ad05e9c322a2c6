//! The whole-file CFF container driver (§4.5 of Technical Note #5176).
//!
//! [`CffFile::open`] stitches the primitive readers together into a single
//! view over a FontSet: header, the five top-level INDEXes in the order
//! they appear, then the dict-driven side tables (Encoding, Charset,
//! FDSelect, FDArray, Private/local-subrs) that are addressed by absolute
//! offset rather than by position. Everything returned borrows from the
//! caller-owned byte slice; there is nothing to explicitly close.

use crate::charset::{parse_charset, Charset};
use crate::diagnostics::Diagnostics;
use crate::dict::{dict_lookup, Operator};
use crate::encoding::{parse_encoding, Encoding};
use crate::error::Error;
use crate::fd_select::{parse_fd_select, FdSelect};
use crate::header::{parse_header, Header};
use crate::index::{parse_index, Index};
use crate::stack::Number;

/// A parsed CFF FontSet.
///
/// Holds framed (non-owning) views over every top-level structure named in
/// Technical Note #5176: the five top-level INDEXes, the Encoding/Charset/
/// FDSelect side tables, and (for non-CID fonts) the top DICT's own Private
/// DICT and local subroutines. CID-keyed fonts resolve their per-glyph
/// Private DICT and local subroutines lazily through [`CffFile::resolve_subrs`]
/// instead, since each FDArray entry carries its own.
pub struct CffFile<'a> {
    data: &'a [u8],
    header: Header,
    name_index: Index<'a>,
    top_dict_index: Index<'a>,
    string_index: Index<'a>,
    global_subr_index: Index<'a>,
    charstrings_index: Index<'a>,
    fd_array_index: Index<'a>,
    fd_select: Option<FdSelect>,
    encoding: Encoding,
    charset: Charset,
    local_subr_index: Index<'a>,
    private_metrics: PrivateDictMetrics,
}

/// The two Private DICT entries every glyph's width resolution depends on.
///
/// Both default to `0` when the font's Private DICT omits them (Technical
/// Note #5176 Table 23).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PrivateDictMetrics {
    pub nominal_width_x: f64,
    pub default_width_x: f64,
}

/// The local subroutines and width metrics that apply to one glyph.
///
/// For non-CID fonts every glyph shares the same `Subfont` (`fd` is always
/// `0`); CID-keyed fonts resolve a different one per glyph via `FDSelect`.
#[derive(Clone)]
pub struct Subfont<'a> {
    pub fd: u8,
    pub local_subrs: Index<'a>,
    pub metrics: PrivateDictMetrics,
}

impl<'a> CffFile<'a> {
    /// Parses a complete CFF FontSet from `data`.
    ///
    /// Structural violations (truncation, a corrupt INDEX or DICT) fail the
    /// whole call. Semantic anomalies — a missing CharStrings entry, a
    /// Name/Top DICT count mismatch, an absent Private DICT — are reported
    /// through `diagnostics` and leave the affected field empty or at its
    /// default, per §7.
    pub fn open(data: &'a [u8], diagnostics: &mut dyn Diagnostics) -> Result<Self, Error> {
        let header = parse_header(data)?;
        let mut pos = header.hdr_size as usize;

        let (name_index, consumed) = parse_index(data, pos)?;
        pos += consumed;
        let (top_dict_index, consumed) = parse_index(data, pos)?;
        pos += consumed;
        if name_index.count() != top_dict_index.count() {
            diagnostics.warn("Name INDEX and Top DICT INDEX counts differ");
        }
        let (string_index, consumed) = parse_index(data, pos)?;
        pos += consumed;
        let (global_subr_index, _consumed) = parse_index(data, pos)?;

        let top_dict_data = if top_dict_index.count() > 0 {
            top_dict_index.get(0)?
        } else {
            diagnostics.warn("FontSet has no Top DICT");
            &[]
        };

        let glyph_count_hint = lookup_offset(top_dict_data, Operator::CharStrings)?;
        let charstrings_index = match glyph_count_hint {
            Some(offset) => parse_index(data, offset)?.0,
            None => {
                diagnostics.warn("Top DICT has no CharStrings entry; treating glyph count as 0");
                Index::empty()
            }
        };
        let glyph_count = charstrings_index.count();

        let encoding_operand =
            dict_lookup(top_dict_data, Operator::Encoding, 0)?.map_or(0, Number::as_i32);
        let encoding = parse_encoding(data, encoding_operand)?;

        let charset_operand =
            dict_lookup(top_dict_data, Operator::Charset, 0)?.map_or(0, Number::as_i32);
        let charset = parse_charset(data, charset_operand, glyph_count)?;

        let fd_select = match lookup_offset(top_dict_data, Operator::FdSelect)? {
            Some(offset) => Some(parse_fd_select(data, offset as i32, glyph_count)?),
            None => None,
        };

        let fd_array_index = match lookup_offset(top_dict_data, Operator::FdArray)? {
            Some(offset) => parse_index(data, offset)?.0,
            None => Index::empty(),
        };

        let (local_subr_index, private_metrics) =
            match private_dict_range(top_dict_data)? {
                Some((length, offset)) => parse_private(data, length, offset, diagnostics)?,
                None => {
                    diagnostics.warn("Top DICT has no Private entry");
                    (Index::empty(), PrivateDictMetrics::default())
                }
            };

        Ok(CffFile {
            data,
            header,
            name_index,
            top_dict_index,
            string_index,
            global_subr_index,
            charstrings_index,
            fd_array_index,
            fd_select,
            encoding,
            charset,
            local_subr_index,
            private_metrics,
        })
    }

    pub fn header(&self) -> Header {
        self.header
    }

    pub fn name_index(&self) -> &Index<'a> {
        &self.name_index
    }

    pub fn top_dict_index(&self) -> &Index<'a> {
        &self.top_dict_index
    }

    pub fn string_index(&self) -> &Index<'a> {
        &self.string_index
    }

    pub fn global_subrs(&self) -> &Index<'a> {
        &self.global_subr_index
    }

    pub fn charstrings(&self) -> &Index<'a> {
        &self.charstrings_index
    }

    pub fn fd_array(&self) -> &Index<'a> {
        &self.fd_array_index
    }

    pub fn fd_select(&self) -> Option<&FdSelect> {
        self.fd_select.as_ref()
    }

    pub fn encoding(&self) -> &Encoding {
        &self.encoding
    }

    pub fn charset(&self) -> &Charset {
        &self.charset
    }

    /// The number of glyphs in the font, i.e. `CharStrings.count`.
    pub fn glyph_count(&self) -> u16 {
        self.charstrings_index.count() as u16
    }

    /// Whether this is a CID-keyed font (i.e. it carries an `FDArray`).
    pub fn is_cid(&self) -> bool {
        !self.fd_array_index.is_empty()
    }

    /// Resolves the font DICT and local subroutine index that apply to
    /// `gid`. Non-CID fonts always resolve to font DICT `0` and the top
    /// DICT's own Private DICT; CID-keyed fonts consult `FDSelect`.
    pub fn resolve_subrs(
        &self,
        gid: u16,
        diagnostics: &mut dyn Diagnostics,
    ) -> Result<Subfont<'a>, Error> {
        if self.fd_array_index.is_empty() {
            return Ok(Subfont {
                fd: 0,
                local_subrs: self.local_subr_index.clone(),
                metrics: self.private_metrics,
            });
        }
        let fd = self
            .fd_select
            .as_ref()
            .and_then(|fds| fds.font_index(gid))
            .unwrap_or(0);
        let fd_dict_data = self.fd_array_index.get(fd as usize)?;
        match private_dict_range(fd_dict_data)? {
            Some((length, offset)) => {
                let (local_subrs, metrics) = parse_private(self.data, length, offset, diagnostics)?;
                Ok(Subfont {
                    fd,
                    local_subrs,
                    metrics,
                })
            }
            None => {
                diagnostics.warn("font DICT has no Private entry; using empty subroutines");
                Ok(Subfont {
                    fd,
                    local_subrs: Index::empty(),
                    metrics: PrivateDictMetrics::default(),
                })
            }
        }
    }

    /// Evaluates glyph `gid`'s charstring, reporting outline events to
    /// `sink`. A convenience that chains [`CffFile::resolve_subrs`] and
    /// [`crate::charstring::Evaluator`] for the common case of drawing one
    /// glyph at a time.
    pub fn outline_glyph<S: crate::charstring::OutlineSink>(
        &self,
        gid: u16,
        sink: &mut S,
        diagnostics: &mut dyn Diagnostics,
    ) -> Result<(), Error> {
        if gid as u32 >= self.charstrings_index.count() {
            return Err(Error::InvalidGlyphId(gid));
        }
        let charstring = self.charstrings_index.get(gid as usize)?;
        let subfont = self.resolve_subrs(gid, diagnostics)?;
        let evaluator = crate::charstring::Evaluator::new(
            &self.global_subr_index,
            &subfont.local_subrs,
            subfont.metrics.nominal_width_x,
            subfont.metrics.default_width_x,
        );
        evaluator.execute(charstring, sink, diagnostics)
    }
}

/// Looks up a DICT operator known to carry a single absolute byte offset.
fn lookup_offset(dict_data: &[u8], op: Operator) -> Result<Option<usize>, Error> {
    Ok(dict_lookup(dict_data, op, 0)?.map(|v| v.as_i32().max(0) as usize))
}

/// Looks up the two-operand `Private` entry, returning `(length, offset)`.
fn private_dict_range(dict_data: &[u8]) -> Result<Option<(usize, usize)>, Error> {
    let length = dict_lookup(dict_data, Operator::Private, 0)?;
    let offset = dict_lookup(dict_data, Operator::Private, 1)?;
    match (length, offset) {
        (Some(length), Some(offset)) => Ok(Some((
            length.as_i32().max(0) as usize,
            offset.as_i32().max(0) as usize,
        ))),
        _ => Ok(None),
    }
}

/// Parses a Private DICT at `data[offset..offset+length]`, returning its
/// local subroutine INDEX (if any — the `Subrs` offset is relative to the
/// Private DICT's own start) and its width metrics.
fn parse_private<'a>(
    data: &'a [u8],
    length: usize,
    offset: usize,
    diagnostics: &mut dyn Diagnostics,
) -> Result<(Index<'a>, PrivateDictMetrics), Error> {
    let end = offset.checked_add(length).ok_or(Error::Truncated)?;
    let private_blob = data.get(offset..end).ok_or(Error::Truncated)?;

    let nominal_width_x = dict_lookup(private_blob, Operator::NominalWidthX, 0)?
        .map_or(0.0, Number::as_f64);
    let default_width_x = dict_lookup(private_blob, Operator::DefaultWidthX, 0)?
        .map_or(0.0, Number::as_f64);
    let metrics = PrivateDictMetrics {
        nominal_width_x,
        default_width_x,
    };

    let local_subrs = match dict_lookup(private_blob, Operator::Subrs, 0)? {
        Some(subrs_offset) => {
            let abs = offset
                .checked_add(subrs_offset.as_i32().max(0) as usize)
                .ok_or(Error::Truncated)?;
            parse_index(data, abs)?.0
        }
        None => {
            diagnostics.warn("Private DICT has no Subrs entry");
            Index::empty()
        }
    };
    Ok((local_subrs, metrics))
}
