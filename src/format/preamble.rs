//! Dump stream preamble.
//!
//! Every dump starts with:
//!
//! ```text
//! SVN-fs-dump-format-version: <digits>
//!
//! UUID: <hex-with-dashes>
//!
//! ```

use std::io::{BufRead, Write};
use std::sync::LazyLock;

use regex::Regex;

use super::{FORMAT_VERSION_KEY, UUID_KEY, equivalent_format, is_supported_version};
use crate::{Error, Result};

static FORMAT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^{}: (\d+)\s*$", FORMAT_VERSION_KEY)).expect("valid regex")
});

static UUID_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^{}: ([0-9a-f-]+)\s*$", UUID_KEY)).expect("valid regex")
});

/// The parsed preamble of a dump stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preamble {
    version: String,
    uuid: String,
    raw: Vec<u8>,
}

impl Preamble {
    /// Builds a preamble for a version and UUID, in canonical layout.
    pub fn new(version: impl Into<String>, uuid: impl Into<String>) -> Self {
        let version = version.into();
        let uuid = uuid.into();
        let raw = format!("{}: {}\n\n{}: {}\n\n", FORMAT_VERSION_KEY, version, UUID_KEY, uuid)
            .into_bytes();
        Self { version, uuid, raw }
    }

    /// Reads and validates the preamble.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPreamble`] if either line does not match its
    /// grammar or a separator line is not blank, and
    /// [`Error::UnsupportedVersion`] if the declared version is not accepted.
    pub fn read<R: BufRead>(r: &mut R) -> Result<Self> {
        let mut raw = Vec::new();

        let line = next_line(r, &mut raw, "format version")?;
        let version = capture(&FORMAT_LINE, &line).ok_or_else(|| {
            Error::InvalidPreamble(format!("expected format version line, got {:?}", line))
        })?;

        if !is_supported_version(&version) {
            return Err(Error::UnsupportedVersion { version });
        }
        match equivalent_format(&version) {
            Some(layout) if layout.to_string() != version => {
                log::warn!(
                    "dump declares format version {}, handling it as version {}",
                    version,
                    layout
                );
            }
            _ => log::debug!("dump format version {}", version),
        }

        expect_blank(r, &mut raw)?;

        let line = next_line(r, &mut raw, "UUID")?;
        let uuid = capture(&UUID_LINE, &line)
            .ok_or_else(|| Error::InvalidPreamble(format!("expected UUID line, got {:?}", line)))?;
        log::debug!("repository UUID {}", uuid);

        expect_blank(r, &mut raw)?;

        Ok(Self { version, uuid, raw })
    }

    /// The declared format version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The format layout the declared version maps to.
    pub fn effective_version(&self) -> Option<u32> {
        equivalent_format(&self.version)
    }

    /// The repository UUID.
    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    /// The preamble bytes exactly as read.
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// Writes the preamble bytes.
    pub fn write<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        w.write_all(&self.raw)
    }
}

/// Reads one line into `raw`, returning it without its line terminator.
fn next_line<R: BufRead>(r: &mut R, raw: &mut Vec<u8>, what: &str) -> Result<String> {
    let start = raw.len();
    let n = r.read_until(b'\n', raw)?;
    if n == 0 {
        return Err(Error::InvalidPreamble(format!(
            "unexpected end of stream before {} line",
            what
        )));
    }
    let line = String::from_utf8_lossy(&raw[start..]);
    Ok(line.trim_end_matches('\n').to_string())
}

fn expect_blank<R: BufRead>(r: &mut R, raw: &mut Vec<u8>) -> Result<()> {
    let line = next_line(r, raw, "blank separator")?;
    if !line.trim().is_empty() {
        return Err(Error::InvalidPreamble(format!(
            "expected blank separator line, got {:?}",
            line
        )));
    }
    Ok(())
}

/// Returns the first capture group of `re` in `line`.
fn capture(re: &Regex, line: &str) -> Option<String> {
    re.captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
