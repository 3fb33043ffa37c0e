//! Dump stream reading API.
//!
//! [`DumpReader`] validates the preamble, then yields one [`Lump`] per
//! record. Records are read lazily; nothing beyond the current record is
//! buffered.
//!
//! # Example
//!
//! ```rust
//! use std::io::Cursor;
//! use svndump_rewrite::read::DumpReader;
//!
//! let dump = b"SVN-fs-dump-format-version: 2\n\nUUID: 0a1b-2c\n\n\
//!              Revision-number: 0\nProp-content-length: 10\nContent-length: 10\n\n\
//!              PROPS-END\n\n";
//! let mut reader = DumpReader::new(Cursor::new(&dump[..]))?;
//! assert_eq!(reader.preamble().version(), "2");
//!
//! let lump = reader.next_lump()?.expect("one record");
//! assert_eq!(lump.revision_number(), Some(0));
//! assert!(reader.next_lump()?.is_none());
//! # Ok::<(), svndump_rewrite::Error>(())
//! ```

mod options;

pub use options::ReadOptions;

use std::io::{BufRead, Read};

use crate::error::Section;
use crate::format::header_name;
use crate::format::headers::{HeaderBlock, read_header_block};
use crate::format::preamble::Preamble;
use crate::format::properties::{PropertySet, decode_properties};
use crate::lump::Lump;
use crate::{Error, Result};

/// Reader producing [`Lump`]s from a dump stream.
pub struct DumpReader<R> {
    source: R,
    preamble: Preamble,
    options: ReadOptions,
    records_read: u64,
    finished: bool,
}

impl<R: BufRead> DumpReader<R> {
    /// Reads the preamble and prepares to read records.
    ///
    /// # Errors
    ///
    /// Fails if the preamble is malformed or declares an unsupported
    /// format version. No record is read in that case.
    pub fn new(source: R) -> Result<Self> {
        Self::with_options(source, ReadOptions::default())
    }

    /// Like [`new`](Self::new), with explicit options.
    pub fn with_options(mut source: R, options: ReadOptions) -> Result<Self> {
        let preamble = Preamble::read(&mut source)?;
        Ok(Self {
            source,
            preamble,
            options,
            records_read: 0,
            finished: false,
        })
    }

    /// The validated stream preamble.
    pub fn preamble(&self) -> &Preamble {
        &self.preamble
    }

    /// Number of records read so far.
    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    /// Reads the next record, or `None` at clean end of stream.
    ///
    /// # Errors
    ///
    /// - [`Error::MalformedHeader`] / [`Error::InvalidHeaderValue`] for bad headers
    /// - [`Error::Truncated`] if a declared section is cut short
    /// - [`Error::CorruptProperties`] if the property block is malformed
    /// - [`Error::ResourceLimitExceeded`] if the record exceeds the configured limit
    pub fn next_lump(&mut self) -> Result<Option<Lump>> {
        if self.finished {
            return Ok(None);
        }

        let headers = match read_header_block(&mut self.source)? {
            HeaderBlock::Headers(headers) => headers,
            HeaderBlock::EndOfStream => {
                self.finished = true;
                log::debug!("end of stream after {} records", self.records_read);
                return Ok(None);
            }
        };

        let prop_len = headers.length(header_name::PROP_CONTENT_LENGTH)?;
        let text_len = headers.length(header_name::TEXT_CONTENT_LENGTH)?;
        if let Some(limit) = self.options.record_limit() {
            let total = prop_len.saturating_add(text_len);
            if total > limit {
                return Err(Error::ResourceLimitExceeded(format!(
                    "record {} declares {} bytes, limit is {}",
                    self.records_read + 1,
                    total,
                    limit
                )));
            }
        }

        let property_block = read_section(&mut self.source, prop_len, Section::Properties)?;
        let properties = if property_block.is_empty() {
            PropertySet::new()
        } else {
            decode_properties(&property_block)?
        };
        let content = read_section(&mut self.source, text_len, Section::Content)?;

        self.records_read += 1;
        log::trace!(
            "record {}: {} headers, {} property bytes, {} content bytes",
            self.records_read,
            headers.len(),
            property_block.len(),
            content.len()
        );

        Ok(Some(Lump::from_parts(
            headers,
            property_block,
            properties,
            content,
        )))
    }

    /// Consumes the reader, returning the underlying source.
    pub fn into_inner(self) -> R {
        self.source
    }
}

impl<R: BufRead> Iterator for DumpReader<R> {
    type Item = Result<Lump>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_lump() {
            Ok(Some(lump)) => Some(Ok(lump)),
            Ok(None) => None,
            Err(e) => {
                // Offsets are lost after an error; stop iterating.
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

/// Reads exactly `len` bytes, growing the buffer as data arrives.
fn read_section<R: Read>(source: &mut R, len: u64, section: Section) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    if len == 0 {
        return Ok(buf);
    }
    let actual = source.take(len).read_to_end(&mut buf)? as u64;
    if actual < len {
        return Err(Error::Truncated {
            section,
            expected: len,
            actual,
        });
    }
    Ok(buf)
}
