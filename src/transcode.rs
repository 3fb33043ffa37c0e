//! The read, rewrite, write loop.
//!
//! [`transcode`] copies a dump stream from a reader to a writer, applying a
//! [`RuleSet`] to every record's properties. Records are processed one at a
//! time: each is fully read and validated before any of it is written, so a
//! truncated record produces no output.
//!
//! # Example
//!
//! ```rust
//! use svndump_rewrite::{RuleSet, TranscodeOptions, transcode};
//!
//! let input = b"SVN-fs-dump-format-version: 2\n\nUUID: 77e2-aa\n\n\
//!               Revision-number: 1\nProp-content-length: 35\nContent-length: 35\n\n\
//!               K 10\nsvn:author\nV 4\njdoe\nPROPS-END\n\n";
//!
//! let mut rules = RuleSet::new();
//! rules.add("svn:author", "^jdoe$", "john")?;
//!
//! let mut output = Vec::new();
//! let stats = transcode(&input[..], &mut output, &TranscodeOptions::new(rules))?;
//!
//! assert_eq!(stats.revisions, 1);
//! assert_eq!(stats.properties_rewritten, 1);
//! assert!(output.ends_with(b"V 4\njohn\nPROPS-END\n\n"));
//! # Ok::<(), svndump_rewrite::Error>(())
//! ```

use std::io::{self, BufReader, Read, Write};

use crate::Result;
use crate::progress::{LumpObserver, NoProgress};
use crate::read::{DumpReader, ReadOptions};
use crate::rewrite::RuleSet;
use crate::write::DumpWriter;

/// Configuration for [`transcode`].
///
/// # Example
///
/// ```rust
/// use svndump_rewrite::read::ReadOptions;
/// use svndump_rewrite::{RuleSet, TranscodeOptions};
///
/// let options = TranscodeOptions::new(RuleSet::new())
///     .read_options(ReadOptions::new().max_record_bytes(Some(1 << 30)));
/// assert!(options.rules().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TranscodeOptions {
    rules: RuleSet,
    read: ReadOptions,
}

impl TranscodeOptions {
    /// Creates options applying `rules` with default read options.
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules,
            read: ReadOptions::default(),
        }
    }

    /// Sets the rule set.
    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Sets the read options.
    pub fn read_options(mut self, read: ReadOptions) -> Self {
        self.read = read;
        self
    }

    /// The rule set applied to every record.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// The read options.
    pub fn read(&self) -> &ReadOptions {
        &self.read
    }
}

/// Statistics for a completed transcode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranscodeStats {
    /// Revision records copied.
    pub revisions: u64,
    /// Node records copied.
    pub nodes: u64,
    /// Property values changed by the rule set.
    pub properties_rewritten: u64,
    /// Bytes consumed from the input.
    pub bytes_read: u64,
    /// Bytes produced on the output.
    pub bytes_written: u64,
}

impl TranscodeStats {
    /// Total records copied.
    pub fn records(&self) -> u64 {
        self.revisions + self.nodes
    }
}

/// Copies a dump stream from `input` to `output`, rewriting properties.
///
/// # Errors
///
/// Returns the first error met. Records written before it remain in
/// `output`; nothing is written for the record that failed. An
/// unsupported format version is reported before anything is written.
pub fn transcode<R: Read, W: Write>(
    input: R,
    output: W,
    options: &TranscodeOptions,
) -> Result<TranscodeStats> {
    transcode_with_observer(input, output, options, &mut NoProgress)
}

/// Like [`transcode`], reporting each record to `observer`.
pub fn transcode_with_observer<R: Read, W: Write>(
    input: R,
    output: W,
    options: &TranscodeOptions,
    observer: &mut dyn LumpObserver,
) -> Result<TranscodeStats> {
    let mut reader = DumpReader::with_options(
        BufReader::new(CountingReader::new(input)),
        options.read,
    )?;
    log::debug!(
        "dump format version {} (uuid {})",
        reader.preamble().version(),
        reader.preamble().uuid()
    );

    let mut writer = DumpWriter::new(output);
    writer.write_preamble(reader.preamble())?;
    observer.on_preamble(reader.preamble());

    let mut stats = TranscodeStats::default();
    while let Some(mut lump) = reader.next_lump()? {
        let rewritten = options.rules.apply(&mut lump);
        writer.write_lump(&mut lump)?;

        if lump.is_revision() {
            stats.revisions += 1;
        } else {
            stats.nodes += 1;
        }
        stats.properties_rewritten += rewritten as u64;
        observer.on_lump(&lump, rewritten);
    }

    let (_, written) = writer.finish()?;
    stats.bytes_written = written.bytes_written;
    stats.bytes_read = reader.into_inner().get_ref().bytes_read();

    log::debug!(
        "transcoded {} revisions, {} nodes, {} properties rewritten",
        stats.revisions,
        stats.nodes,
        stats.properties_rewritten
    );
    observer.on_complete(&stats);
    Ok(stats)
}

/// Reader wrapper counting the bytes pulled from the inner reader.
#[derive(Debug)]
struct CountingReader<R> {
    inner: R,
    bytes_read: u64,
}

impl<R: Read> CountingReader<R> {
    fn new(inner: R) -> Self {
        Self {
            inner,
            bytes_read: 0,
        }
    }

    fn bytes_read(&self) -> u64 {
        self.bytes_read
    }
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.bytes_read += n as u64;
        Ok(n)
    }
}
