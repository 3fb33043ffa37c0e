//! Per-record progress reporting for dump transcoding.
//!
//! A [`LumpObserver`] is told about the preamble, each record after it has
//! been rewritten and written, and the end of the stream. Every method has
//! a no-op default, so an observer only implements what it cares about.
//!
//! # Example
//!
//! ```rust
//! use svndump_rewrite::progress::{LumpObserver, observer_fn};
//!
//! let mut seen = 0;
//! let mut observer = observer_fn(|_lump, _rewritten| seen += 1);
//! observer.on_lump(&svndump_rewrite::Lump::default(), 0);
//! drop(observer);
//! assert_eq!(seen, 1);
//! ```

use std::io::{self, Write};

use crate::format::header_name;
use crate::format::preamble::Preamble;
use crate::lump::Lump;
use crate::transcode::TranscodeStats;

/// Observer trait for transcoding progress.
pub trait LumpObserver {
    /// Called once after the preamble has been validated and written.
    fn on_preamble(&mut self, preamble: &Preamble) {
        let _ = preamble;
    }

    /// Called after each record is written.
    ///
    /// `rewritten` is the number of property values the rule set changed
    /// in this record.
    fn on_lump(&mut self, lump: &Lump, rewritten: usize) {
        let _ = (lump, rewritten);
    }

    /// Called once when the stream has been fully written.
    fn on_complete(&mut self, stats: &TranscodeStats) {
        let _ = stats;
    }
}

/// An observer that does nothing (null object pattern).
#[derive(Debug, Default, Clone)]
pub struct NoProgress;

impl LumpObserver for NoProgress {}

/// Writes one line per record with its kind, action and path.
///
/// Revision records print as `revision` with the number in the path column.
/// The first write error stops the trace and is returned by
/// [`DebugTrace::into_inner`]; the transcode itself carries on.
#[derive(Debug)]
pub struct DebugTrace<W> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> DebugTrace<W> {
    /// Creates a trace writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out, error: None }
    }

    /// Returns the inner writer, or the error that stopped the trace.
    pub fn into_inner(self) -> io::Result<W> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.out),
        }
    }
}

impl<W: Write> LumpObserver for DebugTrace<W> {
    fn on_lump(&mut self, lump: &Lump, _rewritten: usize) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = writeln!(self.out, "{}", trace_line(lump)) {
            self.error = Some(e);
        }
    }
}

/// Formats the diagnostic line for `lump`.
///
/// Node kind and action are printed as they appear in the input.
pub fn trace_line(lump: &Lump) -> String {
    if let Some(rev) = lump.revision_number() {
        return format!("   {:<10} {:<10} {}", "revision", "", rev);
    }
    let headers = lump.headers();
    let kind = headers.get(header_name::NODE_KIND).unwrap_or("");
    let action = headers.get(header_name::NODE_ACTION).unwrap_or("");
    let path = headers.get(header_name::NODE_PATH).unwrap_or("");
    format!("   {:<10} {:<10} {}", kind, action, path)
}

/// An observer that calls a closure for every record.
pub struct ClosureObserver<F> {
    callback: F,
}

impl<F> ClosureObserver<F>
where
    F: FnMut(&Lump, usize),
{
    /// Creates an observer from a closure receiving `(lump, rewritten)`.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> LumpObserver for ClosureObserver<F>
where
    F: FnMut(&Lump, usize),
{
    fn on_lump(&mut self, lump: &Lump, rewritten: usize) {
        (self.callback)(lump, rewritten)
    }
}

/// Creates a closure-based observer.
pub fn observer_fn<F>(f: F) -> ClosureObserver<F>
where
    F: FnMut(&Lump, usize),
{
    ClosureObserver::new(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::headers::HeaderSet;

    fn lump(pairs: &[(&str, &str)]) -> Lump {
        Lump::with_headers(pairs.iter().copied().collect::<HeaderSet>())
    }

    #[test]
    fn test_trace_line_node() {
        let l = lump(&[
            ("Node-path", "trunk/a.txt"),
            ("Node-kind", "file"),
            ("Node-action", "add"),
        ]);
        assert_eq!(trace_line(&l), "   file       add        trunk/a.txt");
    }

    #[test]
    fn test_trace_line_missing_kind() {
        let l = lump(&[("Node-path", "old"), ("Node-action", "delete")]);
        assert_eq!(trace_line(&l), "              delete     old");
    }

    #[test]
    fn test_trace_line_revision() {
        let l = lump(&[("Revision-number", "12")]);
        assert_eq!(trace_line(&l), "   revision              12");
    }

    #[test]
    fn test_trace_line_keeps_unknown_values() {
        let l = lump(&[
            ("Node-path", "link"),
            ("Node-kind", "symlink"),
            ("Node-action", "move"),
        ]);
        assert_eq!(trace_line(&l), "   symlink    move       link");
    }

    #[test]
    fn test_debug_trace_writes_lines() {
        let mut trace = DebugTrace::new(Vec::new());
        trace.on_lump(&lump(&[("Revision-number", "1")]), 0);
        trace.on_lump(&lump(&[("Node-path", "d"), ("Node-kind", "dir")]), 0);
        let out = String::from_utf8(trace.into_inner().unwrap()).unwrap();
        assert_eq!(out.lines().count(), 2);
        assert!(out.ends_with("d\n"));
    }

    #[derive(Debug)]
    struct FailingWriter {
        attempts: usize,
    }

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            self.attempts += 1;
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_debug_trace_reports_write_error() {
        let mut trace = DebugTrace::new(FailingWriter { attempts: 0 });
        trace.on_lump(&lump(&[("Revision-number", "1")]), 0);
        trace.on_lump(&lump(&[("Revision-number", "2")]), 0);
        assert_eq!(trace.out.attempts, 1);
        let err = trace.into_inner().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_closure_observer() {
        let mut total = 0;
        {
            let mut observer = observer_fn(|_, rewritten| total += rewritten);
            observer.on_lump(&Lump::default(), 2);
            observer.on_lump(&Lump::default(), 3);
            observer.on_complete(&TranscodeStats::default());
        }
        assert_eq!(total, 5);
    }

    #[test]
    fn test_no_progress() {
        let mut observer = NoProgress;
        observer.on_lump(&Lump::default(), 1);
        observer.on_preamble(&Preamble::new("2", "ab"));
    }
}
