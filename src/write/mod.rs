//! Dump stream writing API.
//!
//! [`DumpWriter`] serializes the preamble and then one [`Lump`] at a time.
//! Before a record is written its derived headers are regenerated, so the
//! output is self-consistent however the record was modified.
//!
//! # Example
//!
//! ```rust
//! use svndump_rewrite::format::headers::HeaderSet;
//! use svndump_rewrite::format::preamble::Preamble;
//! use svndump_rewrite::write::DumpWriter;
//! use svndump_rewrite::Lump;
//!
//! let mut writer = DumpWriter::new(Vec::new());
//! writer.write_preamble(&Preamble::new("2", "0a1b2c3d"))?;
//!
//! let mut lump = Lump::with_headers([("Revision-number", "0")].into_iter().collect());
//! lump.properties_mut().set("svn:date", "2011-08-31T00:00:00.000000Z");
//! writer.write_lump(&mut lump)?;
//!
//! let (bytes, stats) = writer.finish()?;
//! assert_eq!(stats.records_written, 1);
//! assert!(bytes.starts_with(b"SVN-fs-dump-format-version: 2\n"));
//! # Ok::<(), svndump_rewrite::Error>(())
//! ```

use std::io::Write;

use crate::Result;
use crate::format::headers::write_header_block;
use crate::format::preamble::Preamble;
use crate::lump::Lump;

/// Counters accumulated by a [`DumpWriter`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteStats {
    /// Records written.
    pub records_written: u64,
    /// Revision records among them.
    pub revisions_written: u64,
    /// Total bytes written, preamble included.
    pub bytes_written: u64,
}

/// Writer serializing a dump stream.
pub struct DumpWriter<W: Write> {
    sink: W,
    stats: WriteStats,
}

impl<W: Write> DumpWriter<W> {
    /// Creates a writer over `sink`.
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            stats: WriteStats::default(),
        }
    }

    /// Writes the stream preamble.
    pub fn write_preamble(&mut self, preamble: &Preamble) -> Result<()> {
        preamble.write(&mut self.sink)?;
        self.stats.bytes_written += preamble.as_bytes().len() as u64;
        Ok(())
    }

    /// Regenerates `lump`'s derived headers and writes it.
    ///
    /// Layout: headers, blank line, property block, text content, then one
    /// newline for a revision record or two for any other record.
    pub fn write_lump(&mut self, lump: &mut Lump) -> Result<()> {
        lump.regenerate_headers();

        let mut written = write_header_block(&mut self.sink, lump.headers())?;
        self.sink.write_all(lump.property_block())?;
        self.sink.write_all(lump.content())?;
        written += (lump.property_block().len() + lump.content().len()) as u64;

        if lump.is_revision() {
            self.sink.write_all(b"\n")?;
            written += 1;
            self.stats.revisions_written += 1;
        } else {
            self.sink.write_all(b"\n\n")?;
            written += 2;
        }

        self.stats.records_written += 1;
        self.stats.bytes_written += written;
        log::trace!(
            "wrote record {} ({} bytes)",
            self.stats.records_written,
            written
        );
        Ok(())
    }

    /// Counters so far.
    pub fn stats(&self) -> WriteStats {
        self.stats
    }

    /// Flushes the sink and returns it with the final counters.
    pub fn finish(mut self) -> Result<(W, WriteStats)> {
        self.sink.flush()?;
        Ok((self.sink, self.stats))
    }
}
