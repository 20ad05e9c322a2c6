//! Parsing for CFF DICT structures.
//!
//! A DICT is a flat stream of operand bytes followed by an operator; this
//! module decodes that stream token by token and exposes a single
//! `dict_lookup` query rather than materializing every operator into a
//! typed struct, since the container driver only ever needs a handful of
//! well-known keys (see Technical Note #5176, Tables 9 and 23).

use crate::error::Error;
use crate::font_data::Cursor;
use crate::stack::Number;

/// The Top DICT / Private DICT operators this crate resolves.
///
/// Every other operator is still parsed (so its operands don't desync the
/// token stream) but is otherwise ignored, matching §4.3's "unknown
/// operators are skipped".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    CharStrings,
    Private,
    Encoding,
    Charset,
    FdArray,
    FdSelect,
    Subrs,
    DefaultWidthX,
    NominalWidthX,
    Other(u16),
}

impl Operator {
    fn from_byte(b: u8) -> Self {
        match b {
            15 => Operator::Charset,
            16 => Operator::Encoding,
            17 => Operator::CharStrings,
            18 => Operator::Private,
            19 => Operator::Subrs,
            20 => Operator::DefaultWidthX,
            21 => Operator::NominalWidthX,
            other => Operator::Other(other as u16),
        }
    }

    fn from_escaped_byte(b: u8) -> Self {
        match b {
            36 => Operator::FdArray,
            37 => Operator::FdSelect,
            other => Operator::Other(0x0c00 | other as u16),
        }
    }
}

/// One decoded DICT token: either an operand or an operator.
enum Token {
    Operand(Number),
    Operator(Operator),
}

/// Looks up the operand at position `which` for operator `op` in `blob`.
///
/// Returns `None` if the operator never appears. This walks the whole DICT
/// on every call, which is fine: Top/Private DICTs are small and each is
/// queried only a handful of times while opening a font.
pub fn dict_lookup(blob: &[u8], op: Operator, which: usize) -> Result<Option<Number>, Error> {
    let mut cursor = crate::font_data::FontData::new(blob).cursor();
    let mut operands: Vec<Number> = Vec::new();
    while cursor.remaining_bytes() > 0 {
        match parse_token(&mut cursor)? {
            Token::Operand(n) => operands.push(n),
            Token::Operator(found) => {
                if found == op {
                    return Ok(operands.get(which).copied());
                }
                operands.clear();
            }
        }
    }
    Ok(None)
}

fn parse_token(cursor: &mut Cursor) -> Result<Token, Error> {
    const ESCAPE: u8 = 12;
    let b0 = cursor.read_u8()?;
    if b0 == ESCAPE {
        let b1 = cursor.read_u8()?;
        return Ok(Token::Operator(Operator::from_escaped_byte(b1)));
    }
    match b0 {
        28 => {
            let value = cursor.read_i16()?;
            Ok(Token::Operand(Number::Int(value as i32)))
        }
        29 => {
            let value = cursor.read_i32()?;
            Ok(Token::Operand(Number::Int(value)))
        }
        30 => Ok(Token::Operand(Number::Real(parse_real(cursor)?))),
        32..=246 => Ok(Token::Operand(Number::Int(b0 as i32 - 139))),
        247..=250 => {
            let b1 = cursor.read_u8()? as i32;
            Ok(Token::Operand(Number::Int(
                (b0 as i32 - 247) * 256 + b1 + 108,
            )))
        }
        251..=254 => {
            let b1 = cursor.read_u8()? as i32;
            Ok(Token::Operand(Number::Int(
                -(b0 as i32 - 251) * 256 - b1 - 108,
            )))
        }
        _ => Ok(Token::Operator(Operator::from_byte(b0))),
    }
}

/// Decodes a binary-coded-decimal real number (operand type `30`),
/// terminated by a nibble value of `0xf`.
fn parse_real(cursor: &mut Cursor) -> Result<f64, Error> {
    let mut text = String::new();
    'outer: loop {
        let byte = cursor.read_u8()?;
        for nibble in [byte >> 4, byte & 0xf] {
            match nibble {
                0..=9 => text.push((b'0' + nibble) as char),
                0xa => text.push('.'),
                0xb => text.push('E'),
                0xc => text.push_str("E-"),
                0xe => text.push('-'),
                0xf => break 'outer,
                _ => return Err(Error::CorruptDict),
            }
        }
    }
    text.parse::<f64>().map_err(|_| Error::CorruptDict)
}
