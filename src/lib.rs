//! A parser and interpreter for the Compact Font Format (CFF) and its
//! embedded Type 2 CharString glyph-outline programs.
//!
//! CFF is the PostScript-descended binary container used inside OpenType
//! `CFF ` tables (and, stand-alone, inside some PDF font resources) to hold
//! one or more outline fonts as a packed sequence of INDEX structures,
//! compressed DICTs, and per-glyph bytecode. This crate covers two things:
//!
//! - [`CffFile`], which frames a raw CFF byte blob into its Name, Top DICT,
//!   String, Global Subr, CharStrings, Font DICT Array, Private DICT and
//!   local Subr, Encoding, Charset and FDSelect structures.
//! - [`charstring::Evaluator`], a Type 2 CharString virtual machine that
//!   walks a glyph's bytecode program and reports outline-construction
//!   events (moves, lines, curves, hints, masks, width) to a caller-supplied
//!   [`charstring::OutlineSink`].
//!
//! Font-file I/O, OpenType table framing, glyph-name/registry validation,
//! rendering, and CFF2 variable-font support are all out of scope — this
//! crate starts from an already-excised CFF blob and stops at outline
//! events for one glyph at a time. See `DESIGN.md` for where each piece is
//! grounded and what was deliberately left out.
//!
//! ```no_run
//! use cff::{CffFile, diagnostics::NullDiagnostics, charstring::OutlineSink};
//!
//! # fn example(cff_table_bytes: &[u8]) -> Result<(), cff::Error> {
//! let mut diagnostics = NullDiagnostics;
//! let font = CffFile::open(cff_table_bytes, &mut diagnostics)?;
//!
//! struct PrintingSink;
//! impl OutlineSink for PrintingSink {
//!     fn line_to(&mut self, dx: f64, dy: f64) {
//!         println!("line by ({dx}, {dy})");
//!     }
//! }
//!
//! let mut sink = PrintingSink;
//! font.outline_glyph(0, &mut sink, &mut diagnostics)?;
//! # Ok(())
//! # }
//! ```

pub mod charset;
pub mod charstring;
pub mod diagnostics;
pub mod dict;
pub mod encoding;
mod error;
pub mod fd_select;
mod file;
mod font_data;
mod header;
pub mod index;
mod stack;

pub use diagnostics::Diagnostics;
pub use error::Error;
pub use file::{CffFile, PrivateDictMetrics, Subfont};
pub use header::Header;
pub use stack::Number;
