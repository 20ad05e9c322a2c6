//! The Type 2 charstring interpreter (Technical Note #5177).
//!
//! A charstring is a tiny bytecode program that draws one glyph's outline
//! as a sequence of relative moves, lines, and curves. This module exposes
//! that outline through [`OutlineSink`], a seven-method callback interface;
//! every event is a delta from the VM's implicit current point, so the VM
//! itself never needs to track absolute coordinates.

use crate::diagnostics::Diagnostics;
use crate::error::Error;
use crate::font_data::{Cursor, FontData};
use crate::index::Index;
use crate::stack::{Number, Stack, TRANSIENT_ARRAY_SIZE};

/// Subroutine calls may nest at most this deep (Technical Note #5177 §5).
const RECURSION_LIMIT: u32 = 10;

/// Receives the outline events produced by evaluating one charstring.
///
/// Every method is a no-op by default; implementors override only the
/// events they care about. `line_to`/`curve_to` carry deltas relative to
/// the current point — callers that need absolute coordinates accumulate
/// them from these deltas themselves. A moveto operator reports
/// `new_contour` followed by a `line_to` carrying its delta (zero-filling
/// whichever axis `hmoveto`/`vmoveto` left implicit), rather than folding
/// the delta into `new_contour` itself.
pub trait OutlineSink {
    /// The glyph's advance width, resolved from `nominalWidthX`/
    /// `defaultWidthX` and any width operand the charstring carried.
    fn set_width(&mut self, _width: f64) {}
    /// Starts a new contour at the current point.
    fn new_contour(&mut self) {}
    /// Draws a line to `(dx, dy)` relative to the current point.
    fn line_to(&mut self, _dx: f64, _dy: f64) {}
    /// Draws a cubic Bezier through two relative control points to a
    /// relative endpoint.
    fn curve_to(&mut self, _dx1: f64, _dy1: f64, _dx2: f64, _dy2: f64, _dx3: f64, _dy3: f64) {}
    /// Declares one hint stem: `vertical` selects `vstem`/`hstem`,
    /// `position_delta` is relative to the previous stem's edge, and
    /// `width` is the stem's width.
    fn set_hint(&mut self, _vertical: bool, _position_delta: f64, _width: f64) {}
    /// Applies a hint mask (`hintmask`) or counter mask (`cntrmask`); `bytes`
    /// holds one bit per declared stem, MSB first.
    fn set_mask(&mut self, _counter: bool, _bytes: &[u8]) {}
    /// Supplies a pseudo-random number in `(0, 1]` for the `random` operator.
    fn get_rand(&mut self) -> f64 {
        0.5
    }
}

/// Evaluates Type 2 charstrings against a fixed pair of subroutine indexes.
///
/// A CID-keyed font has a different `local_subrs`/`nominal_width_x`/
/// `default_width_x` per FDArray entry, so callers construct one
/// `Evaluator` per glyph (or cache one per font DICT) rather than per font.
pub struct Evaluator<'a> {
    global_subrs: &'a Index<'a>,
    local_subrs: &'a Index<'a>,
    nominal_width_x: f64,
    default_width_x: f64,
}

impl<'a> Evaluator<'a> {
    pub fn new(
        global_subrs: &'a Index<'a>,
        local_subrs: &'a Index<'a>,
        nominal_width_x: f64,
        default_width_x: f64,
    ) -> Self {
        Evaluator {
            global_subrs,
            local_subrs,
            nominal_width_x,
            default_width_x,
        }
    }

    /// Runs `charstring` to completion, reporting outline events to `sink`.
    pub fn execute<S: OutlineSink>(
        &self,
        charstring: &[u8],
        sink: &mut S,
        diagnostics: &mut dyn Diagnostics,
    ) -> Result<(), Error> {
        let mut state = ExecState::new(self.nominal_width_x);
        state.run(
            charstring,
            self.global_subrs,
            self.local_subrs,
            sink,
            diagnostics,
            0,
        )?;
        sink.set_width(state.width.unwrap_or(self.default_width_x));
        Ok(())
    }
}

struct ExecState {
    stack: Stack,
    transient: [f64; TRANSIENT_ARRAY_SIZE],
    stem_count: u32,
    width: Option<f64>,
    width_parsed: bool,
    nominal_width_x: f64,
}

impl ExecState {
    fn new(nominal_width_x: f64) -> Self {
        ExecState {
            stack: Stack::new(),
            transient: [0.0; TRANSIENT_ARRAY_SIZE],
            stem_count: 0,
            width: None,
            width_parsed: false,
            nominal_width_x,
        }
    }

    fn arg(&self, index: usize) -> f64 {
        self.stack.get_f64(index).unwrap_or(0.0)
    }

    fn args_f64(&self) -> Vec<f64> {
        self.stack.as_slice().iter().map(|n| n.as_f64()).collect()
    }

    fn pop_num(&mut self, diagnostics: &mut dyn Diagnostics, op: &str) -> Number {
        self.stack.pop().unwrap_or_else(|| {
            diagnostics.warn(&format!("stack underflow evaluating {op}"));
            Number::Real(0.0)
        })
    }

    fn pop_f64(&mut self, diagnostics: &mut dyn Diagnostics, op: &str) -> f64 {
        self.pop_num(diagnostics, op).as_f64()
    }

    fn pop_i32(&mut self, diagnostics: &mut dyn Diagnostics, op: &str) -> i32 {
        self.pop_num(diagnostics, op).as_i32()
    }

    /// Strips an optional leading width operand off an operator that takes
    /// a fixed even number of paired arguments (the stem and mask family).
    fn take_width_for_stems(&mut self) {
        if self.width_parsed {
            return;
        }
        self.width_parsed = true;
        if self.stack.len_is_odd() {
            if let Some(v) = self.stack.remove_bottom() {
                self.width = Some(self.nominal_width_x + v.as_f64());
            }
        }
    }

    /// Strips an optional leading width operand off an operator that takes
    /// exactly `expected` arguments otherwise.
    fn take_width_if_present(&mut self, expected: usize) {
        if self.width_parsed {
            return;
        }
        self.width_parsed = true;
        if self.stack.len() > expected {
            if let Some(v) = self.stack.remove_bottom() {
                self.width = Some(self.nominal_width_x + v.as_f64());
            }
        }
    }

    fn take_width_for_endchar(&mut self) {
        if self.width_parsed {
            return;
        }
        self.width_parsed = true;
        let len = self.stack.len();
        if len == 1 || len == 5 {
            if let Some(v) = self.stack.remove_bottom() {
                self.width = Some(self.nominal_width_x + v.as_f64());
            }
        }
    }

    fn run<S: OutlineSink>(
        &mut self,
        code: &[u8],
        global_subrs: &Index,
        local_subrs: &Index,
        sink: &mut S,
        diagnostics: &mut dyn Diagnostics,
        depth: u32,
    ) -> Result<bool, Error> {
        let mut cursor = FontData::new(code).cursor();
        while cursor.remaining_bytes() > 0 {
            let b0 = cursor.read_u8()?;
            if b0 == 28 || b0 >= 32 {
                let number = parse_operand(b0, &mut cursor)?;
                self.stack.push(number)?;
                continue;
            }
            match b0 {
                1 | 18 => self.op_stem(sink, false),
                3 | 23 => self.op_stem(sink, true),
                19 => self.op_mask(&mut cursor, sink, false)?,
                20 => self.op_mask(&mut cursor, sink, true)?,
                4 => self.op_vmoveto(sink),
                21 => self.op_rmoveto(sink),
                22 => self.op_hmoveto(sink),
                5 => self.op_rlineto(sink),
                6 => self.op_alt_lineto(sink, true),
                7 => self.op_alt_lineto(sink, false),
                8 => self.op_rrcurveto(sink),
                24 => self.op_rcurveline(sink),
                25 => self.op_rlinecurve(sink),
                26 => self.op_vvcurveto(sink),
                27 => self.op_hhcurveto(sink),
                30 => self.op_alt_curveto(sink, false),
                31 => self.op_alt_curveto(sink, true),
                10 => {
                    if self.call_subr(global_subrs, local_subrs, sink, diagnostics, depth, false)? {
                        return Ok(true);
                    }
                }
                29 => {
                    if self.call_subr(global_subrs, local_subrs, sink, diagnostics, depth, true)? {
                        return Ok(true);
                    }
                }
                11 => return Ok(false),
                14 => return self.op_endchar(sink, diagnostics),
                12 => {
                    let b1 = cursor.read_u8()?;
                    self.op_escape(b1, sink, diagnostics)?;
                }
                _ => {
                    diagnostics.warn(&format!("ignoring reserved charstring operator {b0}"));
                    self.stack.clear();
                }
            }
        }
        Ok(false)
    }

    fn call_subr<S: OutlineSink>(
        &mut self,
        global_subrs: &Index,
        local_subrs: &Index,
        sink: &mut S,
        diagnostics: &mut dyn Diagnostics,
        depth: u32,
        global: bool,
    ) -> Result<bool, Error> {
        if depth >= RECURSION_LIMIT {
            return Err(Error::RecursionLimit);
        }
        let op_name = if global { "callgsubr" } else { "callsubr" };
        let index = self.pop_i32(diagnostics, op_name);
        let subrs = if global { global_subrs } else { local_subrs };
        let biased = index + subrs.subr_bias();
        if biased < 0 {
            diagnostics.warn(&format!("{op_name}: negative subroutine index"));
            return Ok(false);
        }
        match subrs.get(biased as usize) {
            Ok(code) => self.run(code, global_subrs, local_subrs, sink, diagnostics, depth + 1),
            Err(_) => {
                diagnostics.warn(&format!("{op_name}: subroutine index out of range"));
                Ok(false)
            }
        }
    }

    fn op_stem<S: OutlineSink>(&mut self, sink: &mut S, vertical: bool) {
        self.take_width_for_stems();
        let args = self.args_f64();
        for pair in args.chunks_exact(2) {
            sink.set_hint(vertical, pair[0], pair[1]);
        }
        self.stem_count += (args.len() / 2) as u32;
        self.stack.clear();
    }

    fn op_mask<S: OutlineSink>(
        &mut self,
        cursor: &mut Cursor,
        sink: &mut S,
        counter: bool,
    ) -> Result<(), Error> {
        if !self.stack.is_empty() {
            self.take_width_for_stems();
            let args = self.args_f64();
            for pair in args.chunks_exact(2) {
                sink.set_hint(true, pair[0], pair[1]);
            }
            self.stem_count += (args.len() / 2) as u32;
            self.stack.clear();
        }
        self.width_parsed = true;
        let mask_len = (self.stem_count as usize + 7) / 8;
        let bytes = cursor.read_array(mask_len)?;
        sink.set_mask(counter, bytes);
        Ok(())
    }

    fn op_rmoveto<S: OutlineSink>(&mut self, sink: &mut S) {
        self.take_width_if_present(2);
        sink.new_contour();
        sink.line_to(self.arg(0), self.arg(1));
        self.stack.clear();
    }

    fn op_hmoveto<S: OutlineSink>(&mut self, sink: &mut S) {
        self.take_width_if_present(1);
        sink.new_contour();
        sink.line_to(self.arg(0), 0.0);
        self.stack.clear();
    }

    fn op_vmoveto<S: OutlineSink>(&mut self, sink: &mut S) {
        self.take_width_if_present(1);
        sink.new_contour();
        sink.line_to(0.0, self.arg(0));
        self.stack.clear();
    }

    fn op_rlineto<S: OutlineSink>(&mut self, sink: &mut S) {
        let args = self.args_f64();
        for pair in args.chunks_exact(2) {
            sink.line_to(pair[0], pair[1]);
        }
        self.stack.clear();
    }

    fn op_alt_lineto<S: OutlineSink>(&mut self, sink: &mut S, start_horizontal: bool) {
        let args = self.args_f64();
        let mut horizontal = start_horizontal;
        for v in args {
            if horizontal {
                sink.line_to(v, 0.0);
            } else {
                sink.line_to(0.0, v);
            }
            horizontal = !horizontal;
        }
        self.stack.clear();
    }

    fn op_rrcurveto<S: OutlineSink>(&mut self, sink: &mut S) {
        let args = self.args_f64();
        for c in args.chunks_exact(6) {
            sink.curve_to(c[0], c[1], c[2], c[3], c[4], c[5]);
        }
        self.stack.clear();
    }

    fn op_rcurveline<S: OutlineSink>(&mut self, sink: &mut S) {
        let args = self.args_f64();
        let line_start = args.len().saturating_sub(2);
        for c in args[..line_start].chunks_exact(6) {
            sink.curve_to(c[0], c[1], c[2], c[3], c[4], c[5]);
        }
        if line_start + 2 <= args.len() {
            sink.line_to(args[line_start], args[line_start + 1]);
        }
        self.stack.clear();
    }

    fn op_rlinecurve<S: OutlineSink>(&mut self, sink: &mut S) {
        let args = self.args_f64();
        let curve_start = args.len().saturating_sub(6);
        for pair in args[..curve_start].chunks_exact(2) {
            sink.line_to(pair[0], pair[1]);
        }
        if curve_start + 6 <= args.len() {
            let c = &args[curve_start..curve_start + 6];
            sink.curve_to(c[0], c[1], c[2], c[3], c[4], c[5]);
        }
        self.stack.clear();
    }

    fn op_vvcurveto<S: OutlineSink>(&mut self, sink: &mut S) {
        let args = self.args_f64();
        let mut i = 0;
        let mut dx1 = 0.0;
        if args.len() % 4 == 1 {
            dx1 = args[0];
            i = 1;
        }
        let mut first = true;
        while i + 4 <= args.len() {
            let (dya, dxb, dyb, dyc) = (args[i], args[i + 1], args[i + 2], args[i + 3]);
            let leading = if first { dx1 } else { 0.0 };
            sink.curve_to(leading, dya, dxb, dyb, 0.0, dyc);
            first = false;
            i += 4;
        }
        self.stack.clear();
    }

    fn op_hhcurveto<S: OutlineSink>(&mut self, sink: &mut S) {
        let args = self.args_f64();
        let mut i = 0;
        let mut dy1 = 0.0;
        if args.len() % 4 == 1 {
            dy1 = args[0];
            i = 1;
        }
        let mut first = true;
        while i + 4 <= args.len() {
            let (dxa, dxb, dyb, dxc) = (args[i], args[i + 1], args[i + 2], args[i + 3]);
            let leading = if first { dy1 } else { 0.0 };
            sink.curve_to(dxa, leading, dxb, dyb, dxc, 0.0);
            first = false;
            i += 4;
        }
        self.stack.clear();
    }

    /// Shared implementation of `vhcurveto`/`hvcurveto`: curves alternate
    /// which axis starts flat, and the very last curve in the group may
    /// carry a fifth operand that breaks the pattern for its final delta.
    fn op_alt_curveto<S: OutlineSink>(&mut self, sink: &mut S, start_horizontal: bool) {
        let args = self.args_f64();
        let n = args.len();
        let mut i = 0;
        let mut horizontal = start_horizontal;
        while n - i >= 4 {
            let remaining = n - i;
            let has_last = remaining == 5;
            if horizontal {
                let (dx1, dx2, dy2, dy3) = (args[i], args[i + 1], args[i + 2], args[i + 3]);
                let dx3 = if has_last { args[i + 4] } else { 0.0 };
                sink.curve_to(dx1, 0.0, dx2, dy2, dx3, dy3);
            } else {
                let (dy1, dx2, dy2, dx3) = (args[i], args[i + 1], args[i + 2], args[i + 3]);
                let dy3 = if has_last { args[i + 4] } else { 0.0 };
                sink.curve_to(0.0, dy1, dx2, dy2, dx3, dy3);
            }
            i += if has_last { 5 } else { 4 };
            horizontal = !horizontal;
        }
        self.stack.clear();
    }

    fn op_endchar<S: OutlineSink>(
        &mut self,
        _sink: &mut S,
        diagnostics: &mut dyn Diagnostics,
    ) -> Result<bool, Error> {
        self.take_width_for_endchar();
        match self.stack.len() {
            0 => {}
            4 => diagnostics.warn("endchar accent composition (seac) is not supported"),
            _ => diagnostics.warn("endchar: unexpected operands on stack"),
        }
        self.stack.clear();
        Ok(true)
    }

    fn op_escape<S: OutlineSink>(
        &mut self,
        b1: u8,
        sink: &mut S,
        diagnostics: &mut dyn Diagnostics,
    ) -> Result<(), Error> {
        match b1 {
            3 => {
                let b = self.pop_f64(diagnostics, "and");
                let a = self.pop_f64(diagnostics, "and");
                self.stack.push(bool_num(a != 0.0 && b != 0.0))?;
            }
            4 => {
                let b = self.pop_f64(diagnostics, "or");
                let a = self.pop_f64(diagnostics, "or");
                self.stack.push(bool_num(a != 0.0 || b != 0.0))?;
            }
            5 => {
                let a = self.pop_f64(diagnostics, "not");
                self.stack.push(bool_num(a == 0.0))?;
            }
            9 => {
                let a = self.pop_f64(diagnostics, "abs");
                self.stack.push(a.abs())?;
            }
            10 => {
                let b = self.pop_f64(diagnostics, "add");
                let a = self.pop_f64(diagnostics, "add");
                self.stack.push(a + b)?;
            }
            11 => {
                let b = self.pop_f64(diagnostics, "sub");
                let a = self.pop_f64(diagnostics, "sub");
                self.stack.push(a - b)?;
            }
            12 => {
                let b = self.pop_f64(diagnostics, "div");
                let a = self.pop_f64(diagnostics, "div");
                self.stack.push(if b != 0.0 { a / b } else { 0.0 })?;
            }
            14 => {
                let a = self.pop_f64(diagnostics, "neg");
                self.stack.push(-a)?;
            }
            15 => {
                let b = self.pop_f64(diagnostics, "eq");
                let a = self.pop_f64(diagnostics, "eq");
                self.stack.push(bool_num(a == b))?;
            }
            18 => {
                let _ = self.pop_num(diagnostics, "drop");
            }
            21 => {
                let index = self.pop_i32(diagnostics, "put");
                let value = self.pop_f64(diagnostics, "put");
                if let Some(slot) = usize::try_from(index)
                    .ok()
                    .and_then(|i| self.transient.get_mut(i))
                {
                    *slot = value;
                } else {
                    diagnostics.warn("put: transient storage index out of range");
                }
            }
            22 => {
                let index = self.pop_i32(diagnostics, "get");
                let value = usize::try_from(index)
                    .ok()
                    .and_then(|i| self.transient.get(i))
                    .copied()
                    .unwrap_or_else(|| {
                        diagnostics.warn("get: transient storage index out of range");
                        0.0
                    });
                self.stack.push(value)?;
            }
            23 => {
                let v2 = self.pop_f64(diagnostics, "ifelse");
                let v1 = self.pop_f64(diagnostics, "ifelse");
                let s2 = self.pop_num(diagnostics, "ifelse");
                let s1 = self.pop_num(diagnostics, "ifelse");
                self.stack.push(if v1 <= v2 { s1 } else { s2 })?;
            }
            24 => {
                let value = sink.get_rand();
                self.stack.push(value)?;
            }
            26 => {
                let a = self.pop_f64(diagnostics, "sqrt");
                self.stack.push(a.max(0.0).sqrt())?;
            }
            27 => {
                let top = self.stack.get_f64(self.stack.len().saturating_sub(1));
                if let Some(top) = top {
                    self.stack.push(top)?;
                } else {
                    diagnostics.warn("stack underflow evaluating dup");
                }
            }
            28 => self.stack.swap_top_two(),
            29 => {
                let n = self.pop_i32(diagnostics, "index");
                self.stack.index_op(n)?;
            }
            30 => {
                let j = self.pop_i32(diagnostics, "roll");
                let n = self.pop_i32(diagnostics, "roll");
                self.stack.roll_op(n.max(0) as usize, j);
            }
            34 => self.op_hflex(sink),
            35 => self.op_flex(sink),
            36 => self.op_hflex1(sink),
            37 => self.op_flex1(sink),
            _ => {
                diagnostics.warn(&format!("ignoring unknown charstring operator 12 {b1}"));
                self.stack.clear();
            }
        }
        Ok(())
    }

    fn op_hflex<S: OutlineSink>(&mut self, sink: &mut S) {
        let (dx1, dx2, dy2, dx3, dx4, dx5, dx6) = (
            self.arg(0),
            self.arg(1),
            self.arg(2),
            self.arg(3),
            self.arg(4),
            self.arg(5),
            self.arg(6),
        );
        sink.curve_to(dx1, 0.0, dx2, dy2, dx3, 0.0);
        sink.curve_to(dx4, 0.0, dx5, -dy2, dx6, 0.0);
        self.stack.clear();
    }

    fn op_flex<S: OutlineSink>(&mut self, sink: &mut S) {
        let a: Vec<f64> = (0..12).map(|i| self.arg(i)).collect();
        sink.curve_to(a[0], a[1], a[2], a[3], a[4], a[5]);
        sink.curve_to(a[6], a[7], a[8], a[9], a[10], a[11]);
        self.stack.clear();
    }

    fn op_hflex1<S: OutlineSink>(&mut self, sink: &mut S) {
        let (dx1, dy1, dx2, dy2, dx3, dx4, dx5, dy5, dx6) = (
            self.arg(0),
            self.arg(1),
            self.arg(2),
            self.arg(3),
            self.arg(4),
            self.arg(5),
            self.arg(6),
            self.arg(7),
            self.arg(8),
        );
        let dy6 = -(dy1 + dy2 + dy5);
        sink.curve_to(dx1, dy1, dx2, dy2, dx3, 0.0);
        sink.curve_to(dx4, 0.0, dx5, dy5, dx6, dy6);
        self.stack.clear();
    }

    fn op_flex1<S: OutlineSink>(&mut self, sink: &mut S) {
        let (dx1, dy1, dx2, dy2, dx3, dy3, dx4, dy4, dx5, dy5, d6) = (
            self.arg(0),
            self.arg(1),
            self.arg(2),
            self.arg(3),
            self.arg(4),
            self.arg(5),
            self.arg(6),
            self.arg(7),
            self.arg(8),
            self.arg(9),
            self.arg(10),
        );
        let sum_dx = dx1 + dx2 + dx3 + dx4 + dx5;
        let sum_dy = dy1 + dy2 + dy3 + dy4 + dy5;
        let (dx6, dy6) = if sum_dx.abs() > sum_dy.abs() {
            (d6, -sum_dy)
        } else {
            (-sum_dx, d6)
        };
        sink.curve_to(dx1, dy1, dx2, dy2, dx3, dy3);
        sink.curve_to(dx4, dy4, dx5, dy5, dx6, dy6);
        self.stack.clear();
    }
}

fn bool_num(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

/// Parses one operand given its already-consumed first byte.
fn parse_operand(b0: u8, cursor: &mut Cursor) -> Result<Number, Error> {
    match b0 {
        28 => Ok(Number::Int(cursor.read_i16()? as i32)),
        32..=246 => Ok(Number::Int(b0 as i32 - 139)),
        247..=250 => {
            let b1 = cursor.read_u8()? as i32;
            Ok(Number::Int((b0 as i32 - 247) * 256 + b1 + 108))
        }
        251..=254 => {
            let b1 = cursor.read_u8()? as i32;
            Ok(Number::Int(-(b0 as i32 - 251) * 256 - b1 - 108))
        }
        255 => {
            let v = cursor.read_i32()?;
            Ok(Number::Real(v as f64 / 65536.0))
        }
        _ => Err(Error::CorruptDict),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::NullDiagnostics;
    use crate::index::Index;

    #[derive(Default)]
    struct RecordingSink {
        width: Option<f64>,
        contour_starts: u32,
        lines: Vec<(f64, f64)>,
        curves: Vec<(f64, f64, f64, f64, f64, f64)>,
    }

    impl OutlineSink for RecordingSink {
        fn set_width(&mut self, width: f64) {
            self.width = Some(width);
        }
        fn new_contour(&mut self) {
            self.contour_starts += 1;
        }
        fn line_to(&mut self, dx: f64, dy: f64) {
            self.lines.push((dx, dy));
        }
        fn curve_to(&mut self, dx1: f64, dy1: f64, dx2: f64, dy2: f64, dx3: f64, dy3: f64) {
            self.curves.push((dx1, dy1, dx2, dy2, dx3, dy3));
        }
    }

    fn empty_index() -> Index<'static> {
        crate::index::parse_index(&[0x00, 0x00], 0).unwrap().0
    }

    #[test]
    fn width_and_moveto_with_two_byte_operands() {
        // F7 56 -> 108 + (0xF7-247)*256 + 0x56 = wait just trust decode:
        // 0xF7=247 -> two byte positive form: (247-247)*256+0x56+108 = 194
        // 0xF7 0x78 -> (247-247)*256+0x78+108 = 228
        // then rmoveto (21). stack = [194, 228]; width omitted (exactly 2 args)
        let code = [0xF7, 0x56, 0xF7, 0x78, 21];
        let global = empty_index();
        let local = empty_index();
        let evaluator = Evaluator::new(&global, &local, 0.0, 100.0);
        let mut sink = RecordingSink::default();
        let mut diag = NullDiagnostics;
        evaluator.execute(&code, &mut sink, &mut diag).unwrap();
        assert_eq!(sink.contour_starts, 1);
        assert_eq!(sink.lines, vec![(194.0, 228.0)]);
        assert_eq!(sink.width, Some(100.0));
    }

    #[test]
    fn width_operand_is_detected_on_first_stack_clearing_op() {
        // 3 args then rmoveto -> first is width
        let code = [
            139 + 10, // 10
            139 + 1,  // 1
            139 + 2,  // 2
            21,
        ];
        let global = empty_index();
        let local = empty_index();
        let evaluator = Evaluator::new(&global, &local, 50.0, 0.0);
        let mut sink = RecordingSink::default();
        let mut diag = NullDiagnostics;
        evaluator.execute(&code, &mut sink, &mut diag).unwrap();
        assert_eq!(sink.width, Some(60.0));
        assert_eq!(sink.contour_starts, 1);
        assert_eq!(sink.lines, vec![(1.0, 2.0)]);
    }

    #[test]
    fn rlineto_pairs() {
        let code = [139 + 5, 139 + 5, 5, 14]; // rlineto (5,5), endchar
        let global = empty_index();
        let local = empty_index();
        let evaluator = Evaluator::new(&global, &local, 0.0, 0.0);
        let mut sink = RecordingSink::default();
        let mut diag = NullDiagnostics;
        evaluator.execute(&code, &mut sink, &mut diag).unwrap();
        assert_eq!(sink.lines, vec![(5.0, 5.0)]);
    }

    #[test]
    fn vhcurveto_without_trailing_operand() {
        // vhcurveto starting vertical: dy1 dx2 dy2 dx3, single group, op 30
        let code = [139 + 1, 139 + 2, 139 + 3, 139 + 4, 30];
        let global = empty_index();
        let local = empty_index();
        let evaluator = Evaluator::new(&global, &local, 0.0, 0.0);
        let mut sink = RecordingSink::default();
        let mut diag = NullDiagnostics;
        evaluator.execute(&code, &mut sink, &mut diag).unwrap();
        assert_eq!(sink.curves, vec![(0.0, 1.0, 2.0, 3.0, 4.0, 0.0)]);
    }

    #[test]
    fn hflex_emits_two_curves() {
        let args = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let mut code = Vec::new();
        for a in args {
            code.push(139 + a as u8);
        }
        code.extend_from_slice(&[12, 34]);
        let global = empty_index();
        let local = empty_index();
        let evaluator = Evaluator::new(&global, &local, 0.0, 0.0);
        let mut sink = RecordingSink::default();
        let mut diag = NullDiagnostics;
        evaluator.execute(&code, &mut sink, &mut diag).unwrap();
        assert_eq!(sink.curves.len(), 2);
        assert_eq!(sink.curves[0], (1.0, 0.0, 2.0, 3.0, 4.0, 0.0));
        assert_eq!(sink.curves[1], (5.0, 0.0, 6.0, -3.0, 7.0, 0.0));
    }

    #[test]
    fn recursion_limit_is_enforced() {
        // a single-byte subroutine that calls subroutine 0 again (itself),
        // biased so index 0 resolves to itself: bias for count<1240 is 107,
        // so the stack value must be -107 to select subr index 0.
        let call_self = {
            // push -107 then callsubr
            let mut v = Vec::new();
            v.extend_from_slice(&[28]);
            v.extend_from_slice(&(-107i16).to_be_bytes());
            v.push(10);
            v
        };
        let local = crate::index::parse_index(
            &{
                let mut buf = vec![0x00, 0x01, 0x01, 0x01];
                let end = 1 + call_self.len() as u8;
                buf.push(end);
                buf.extend_from_slice(&call_self);
                buf
            },
            0,
        )
        .unwrap()
        .0;
        let global = empty_index();
        let evaluator = Evaluator::new(&global, &local, 0.0, 0.0);
        let mut sink = RecordingSink::default();
        let mut diag = NullDiagnostics;
        let err = evaluator.execute(&call_self, &mut sink, &mut diag).unwrap_err();
        assert_eq!(err, Error::RecursionLimit);
    }
}
