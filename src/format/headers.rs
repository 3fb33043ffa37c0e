//! Header block codec.
//!
//! A header block is a run of `Name: value` lines closed by an empty line.
//! Blank lines seen before the first header are padding between records and
//! are skipped.

use std::io::{BufRead, Write};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::Section;
use crate::{Error, Result};

/// Ordered, case-sensitive mapping from header name to value.
///
/// Insertion order is kept for serialization. Setting an existing name
/// replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet {
    entries: Vec<(String, String)>,
}

impl HeaderSet {
    /// Creates an empty header set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of `name`, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` if `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == name)
    }

    /// Sets `name` to `value`, appending it if new.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Removes `name`, returning its value if it was present.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let pos = self.entries.iter().position(|(k, _)| k == name)?;
        Some(self.entries.remove(pos).1)
    }

    /// Parses `name` as a decimal length, defaulting to 0 when absent.
    pub fn length(&self, name: &str) -> Result<u64> {
        match self.get(name) {
            None => Ok(0),
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map_err(|_| Error::InvalidHeaderValue {
                    name: name.to_string(),
                    value: value.to_string(),
                }),
        }
    }

    /// Iterates over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of headers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no headers.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for HeaderSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = HeaderSet::new();
        for (k, v) in iter {
            set.set(k, v);
        }
        set
    }
}

/// Outcome of reading one header block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderBlock {
    /// A complete header block.
    Headers(HeaderSet),
    /// The input was exhausted before any header was read.
    EndOfStream,
}

/// Reads one header block from `r`.
///
/// Returns [`HeaderBlock::EndOfStream`] when the input ends cleanly between
/// records. Ending in the middle of a block is a [`Error::Truncated`] error.
///
/// # Errors
///
/// Returns [`Error::MalformedHeader`] for a line that is not `Name: value`.
pub fn read_header_block<R: BufRead>(r: &mut R) -> Result<HeaderBlock> {
    let mut headers = HeaderSet::new();
    let mut consumed: u64 = 0;
    let mut line = Vec::new();

    loop {
        line.clear();
        let n = r.read_until(b'\n', &mut line)?;
        if n == 0 {
            if headers.is_empty() {
                return Ok(HeaderBlock::EndOfStream);
            }
            return Err(Error::Truncated {
                section: Section::Headers,
                expected: consumed + 1,
                actual: consumed,
            });
        }
        consumed += n as u64;

        if line == b"\n" {
            if headers.is_empty() {
                continue;
            }
            return Ok(HeaderBlock::Headers(headers));
        }

        let text = match line.strip_suffix(b"\n") {
            Some(text) => text,
            None => {
                // A final line with no newline cannot close the block.
                if headers.is_empty() && line.iter().all(u8::is_ascii_whitespace) {
                    return Ok(HeaderBlock::EndOfStream);
                }
                return Err(Error::Truncated {
                    section: Section::Headers,
                    expected: consumed + 1,
                    actual: consumed,
                });
            }
        };
        let (name, value) = parse_header_line(text)?;
        headers.set(name, value);
    }
}

static HEADER_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z0-9-]+): (.*)$").expect("valid regex"));

/// Splits a header line into name and value.
///
/// The name is one or more ASCII alphanumerics or dashes; the value is
/// everything after the first `": "`.
pub fn parse_header_line(line: &[u8]) -> Result<(&str, &str)> {
    let malformed = || Error::MalformedHeader {
        line: String::from_utf8_lossy(line).into_owned(),
    };
    let text = std::str::from_utf8(line).map_err(|_| malformed())?;
    let caps = HEADER_LINE.captures(text).ok_or_else(malformed)?;
    match (caps.get(1), caps.get(2)) {
        (Some(name), Some(value)) => Ok((name.as_str(), value.as_str())),
        _ => Err(malformed()),
    }
}

/// Writes `headers` as `Name: value` lines followed by the closing blank line.
pub fn write_header_block<W: Write>(w: &mut W, headers: &HeaderSet) -> std::io::Result<u64> {
    let mut written = 0u64;
    for (name, value) in headers.iter() {
        w.write_all(name.as_bytes())?;
        w.write_all(b": ")?;
        w.write_all(value.as_bytes())?;
        w.write_all(b"\n")?;
        written += (name.len() + value.len() + 3) as u64;
    }
    w.write_all(b"\n")?;
    Ok(written + 1)
}
