//! Progress display for the CLI.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io;
use std::time::Duration;
use svndump_rewrite::progress::{DebugTrace, LumpObserver};
use svndump_rewrite::{Lump, TranscodeStats};

/// Spinner counting revisions and records on standard error.
///
/// With `debug` set, every record also gets a trace line, printed above the
/// spinner so the two do not interleave.
pub struct CliProgress {
    bar: ProgressBar,
    trace: Option<DebugTrace<io::Stderr>>,
    revisions: u64,
    records: u64,
    rewritten: u64,
}

impl CliProgress {
    /// Creates a new progress display
    pub fn new(quiet: bool, debug: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} [{elapsed_precise}] {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        };

        Self {
            bar,
            trace: debug.then(|| DebugTrace::new(io::stderr())),
            revisions: 0,
            records: 0,
            rewritten: 0,
        }
    }

    /// Stops the spinner, leaving the last message visible
    pub fn finish(&mut self) {
        self.bar.finish();
        self.close_trace();
    }

    /// Stops the spinner with a failure note
    pub fn abandon(&mut self) {
        self.bar.abandon_with_message("Failed");
        self.close_trace();
    }

    fn close_trace(&mut self) {
        if let Some(Err(e)) = self.trace.take().map(DebugTrace::into_inner) {
            log::warn!("debug trace stopped early: {}", e);
        }
    }

    fn refresh(&self) {
        self.bar.set_message(format!(
            "r{} | {} records | {} properties rewritten",
            self.revisions, self.records, self.rewritten
        ));
    }
}

impl LumpObserver for CliProgress {
    fn on_lump(&mut self, lump: &Lump, rewritten: usize) {
        if let Some(trace) = self.trace.as_mut() {
            self.bar.suspend(|| trace.on_lump(lump, rewritten));
        }

        if let Some(rev) = lump.revision_number() {
            self.revisions = rev;
        }
        self.records += 1;
        self.rewritten += rewritten as u64;
        self.bar.tick();
        if self.records % 64 == 0 || lump.is_revision() {
            self.refresh();
        }
    }

    fn on_complete(&mut self, stats: &TranscodeStats) {
        self.records = stats.records();
        self.rewritten = stats.properties_rewritten;
        self.refresh();
    }
}
