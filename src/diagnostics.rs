//! Pluggable reporting for non-fatal parsing and evaluation anomalies.
//!
//! Semantic anomalies (a missing `CharStrings` entry, mismatched Name/Top
//! DICT counts, a charstring operator skipped for stack underflow) never
//! abort parsing of sibling structures — they're surfaced through this
//! trait instead. The reference implementation writes straight to stderr;
//! threading an explicit sink here avoids that global mutable state while
//! keeping the same "log and keep going" behavior.

/// Receives diagnostics emitted while parsing a CFF container or evaluating
/// a charstring.
pub trait Diagnostics {
    fn warn(&mut self, message: &str);
}

/// Discards every diagnostic. Useful when a caller has already validated
/// its input or simply doesn't care about non-fatal anomalies.
#[derive(Default, Clone, Copy)]
pub struct NullDiagnostics;

impl Diagnostics for NullDiagnostics {
    fn warn(&mut self, _message: &str) {}
}

/// Forwards diagnostics to the `log` facade at `warn` level.
#[derive(Default, Clone, Copy)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn warn(&mut self, message: &str) {
        log::warn!("{message}");
    }
}
