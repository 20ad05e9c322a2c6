//! End-to-end scenarios over hand-built CFF FontSets: a CID-keyed font
//! whose glyphs resolve through `FDSelect` -> `FDArray` -> `Private.Subrs`,
//! and the non-fatal diagnostics emitted for a structurally valid but
//! semantically incomplete Top DICT.

use cff::charstring::OutlineSink;
use cff::diagnostics::{Diagnostics, NullDiagnostics};
use cff::{CffFile, Error};

/// Appends a CFF INDEX (Technical Note #5176 §5) built from `objects` to
/// `buf`, using a 1-byte offset width (every object here is tiny).
fn push_index(buf: &mut Vec<u8>, objects: &[&[u8]]) {
    if objects.is_empty() {
        buf.extend_from_slice(&[0, 0]);
        return;
    }
    buf.extend_from_slice(&(objects.len() as u16).to_be_bytes());
    buf.push(1); // offSize
    let mut offset = 1u32;
    buf.push(offset as u8);
    for obj in objects {
        offset += obj.len() as u32;
        buf.push(offset as u8);
    }
    for obj in objects {
        buf.extend_from_slice(obj);
    }
}

/// Appends a DICT operand in the fixed 5-byte `29 + i32` form, so that a
/// DICT's total length doesn't depend on the operand's value — letting us
/// compute absolute offsets into the file before the bytes they name exist.
fn push_operand_i32(buf: &mut Vec<u8>, value: i32) {
    buf.push(29);
    buf.extend_from_slice(&value.to_be_bytes());
}

/// A Private DICT carrying `defaultWidthX`/`nominalWidthX`/`Subrs`, each
/// encoded with the fixed-width operand form above, so its length is
/// always exactly 18 bytes regardless of the values involved.
fn push_private_dict(buf: &mut Vec<u8>, default_width_x: i32, nominal_width_x: i32, subrs_offset: i32) {
    push_operand_i32(buf, default_width_x);
    buf.push(20); // DefaultWidthX
    push_operand_i32(buf, nominal_width_x);
    buf.push(21); // NominalWidthX
    push_operand_i32(buf, subrs_offset);
    buf.push(19); // Subrs
}

const PRIVATE_DICT_LEN: i32 = 18;

/// One local subroutine: `rmoveto(dx, dy); return`.
fn subr_rmoveto(dx: i32, dy: i32) -> Vec<u8> {
    vec![(dx + 139) as u8, (dy + 139) as u8, 21, 11]
}

/// Pushes `callsubr` with the index that resolves to biased subr 0 in an
/// INDEX of count 1 (bias 107 per Technical Note #5177 §16).
fn call_first_subr() -> Vec<u8> {
    let mut code = vec![28u8];
    code.extend_from_slice(&(-107i16).to_be_bytes());
    code.push(10); // callsubr
    code
}

/// Builds a two-glyph CID-keyed FontSet: glyph 0 is a bare `endchar`
/// belonging to font DICT 0, glyph 1 calls its own font DICT's first local
/// subroutine (which differs between font DICT 0 and font DICT 1) and
/// belongs to font DICT 1.
fn build_cid_font() -> Vec<u8> {
    let mut buf = vec![1u8, 0, 4, 1]; // header
    push_index(&mut buf, &[]); // Name INDEX
    let top_dict_pos = buf.len();
    push_index(&mut buf, &[&[][..]]); // placeholder Top DICT, patched below
    push_index(&mut buf, &[]); // String INDEX
    push_index(&mut buf, &[]); // Global Subr INDEX

    let notdef_cs = [14u8]; // endchar
    let glyph1_cs = call_first_subr();
    let charstrings_pos = buf.len();
    push_index(&mut buf, &[&notdef_cs[..], &glyph1_cs[..]]);

    let fd0_private_pos = buf.len();
    push_private_dict(&mut buf, 100, 0, PRIVATE_DICT_LEN);
    push_index(&mut buf, &[&subr_rmoveto(5, 7)[..]]);

    let fd1_private_pos = buf.len();
    push_private_dict(&mut buf, 200, 0, PRIVATE_DICT_LEN);
    push_index(&mut buf, &[&subr_rmoveto(9, 11)[..]]);

    let fd_array_pos = buf.len();
    let mut fd0_dict = Vec::new();
    push_operand_i32(&mut fd0_dict, PRIVATE_DICT_LEN);
    push_operand_i32(&mut fd0_dict, fd0_private_pos as i32);
    fd0_dict.push(18); // Private
    let mut fd1_dict = Vec::new();
    push_operand_i32(&mut fd1_dict, PRIVATE_DICT_LEN);
    push_operand_i32(&mut fd1_dict, fd1_private_pos as i32);
    fd1_dict.push(18); // Private
    push_index(&mut buf, &[&fd0_dict[..], &fd1_dict[..]]);

    let fd_select_pos = buf.len();
    buf.extend_from_slice(&[0, 0, 1]); // format 0: gid0 -> fd0, gid1 -> fd1

    let mut top_dict = Vec::new();
    push_operand_i32(&mut top_dict, charstrings_pos as i32);
    top_dict.push(17); // CharStrings
    push_operand_i32(&mut top_dict, fd_array_pos as i32);
    top_dict.push(12);
    top_dict.push(36); // FDArray
    push_operand_i32(&mut top_dict, fd_select_pos as i32);
    top_dict.push(12);
    top_dict.push(37); // FDSelect

    let mut patched = vec![0u8, 1, 1, 1, (1 + top_dict.len()) as u8];
    patched.extend_from_slice(&top_dict);
    buf.splice(top_dict_pos..top_dict_pos + 5, patched);
    buf
}

#[derive(Default)]
struct OutlineRecorder {
    width: Option<f64>,
    contour_starts: u32,
    lines: Vec<(f64, f64)>,
}

impl OutlineSink for OutlineRecorder {
    fn set_width(&mut self, width: f64) {
        self.width = Some(width);
    }
    fn new_contour(&mut self) {
        self.contour_starts += 1;
    }
    fn line_to(&mut self, dx: f64, dy: f64) {
        self.lines.push((dx, dy));
    }
}

#[test]
fn cid_font_resolves_subrs_per_font_dict() {
    let data = build_cid_font();
    let mut diag = NullDiagnostics;
    let file = CffFile::open(&data, &mut diag).unwrap();

    assert!(file.is_cid());
    assert_eq!(file.glyph_count(), 2);

    let fd0 = file.resolve_subrs(0, &mut diag).unwrap();
    assert_eq!(fd0.fd, 0);
    assert_eq!(fd0.metrics.default_width_x, 100.0);

    let fd1 = file.resolve_subrs(1, &mut diag).unwrap();
    assert_eq!(fd1.fd, 1);
    assert_eq!(fd1.metrics.default_width_x, 200.0);
}

#[test]
fn cid_glyph_outline_uses_its_own_font_dicts_subroutine() {
    let data = build_cid_font();
    let mut diag = NullDiagnostics;
    let file = CffFile::open(&data, &mut diag).unwrap();

    let mut notdef = OutlineRecorder::default();
    file.outline_glyph(0, &mut notdef, &mut diag).unwrap();
    assert_eq!(notdef.contour_starts, 0);
    assert_eq!(notdef.lines, vec![]);
    assert_eq!(notdef.width, Some(100.0));

    let mut glyph1 = OutlineRecorder::default();
    file.outline_glyph(1, &mut glyph1, &mut diag).unwrap();
    assert_eq!(glyph1.contour_starts, 1);
    assert_eq!(glyph1.lines, vec![(9.0, 11.0)]);
    assert_eq!(glyph1.width, Some(200.0));
}

#[derive(Default)]
struct RecordingDiagnostics {
    warnings: Vec<String>,
}

impl Diagnostics for RecordingDiagnostics {
    fn warn(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }
}

#[test]
fn missing_charstrings_is_a_non_fatal_diagnostic() {
    // A well-formed FontSet whose Top DICT carries no CharStrings entry at
    // all: structurally valid, semantically incomplete.
    let mut buf = vec![1u8, 0, 4, 1];
    push_index(&mut buf, &[]); // Name
    let empty_top_dict: [u8; 0] = [];
    push_index(&mut buf, &[&empty_top_dict[..]]); // Top DICT with no entries
    push_index(&mut buf, &[]); // String
    push_index(&mut buf, &[]); // Global Subr

    let mut diag = RecordingDiagnostics::default();
    let file = CffFile::open(&buf, &mut diag).unwrap();
    assert_eq!(file.glyph_count(), 0);
    assert!(diag
        .warnings
        .iter()
        .any(|w| w.contains("CharStrings")));
}

#[test]
fn truncated_header_is_structural() {
    let err = CffFile::open(&[1, 0, 4], &mut NullDiagnostics).unwrap_err();
    assert_eq!(err, Error::Truncated);
}
