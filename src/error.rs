//! Error types for dump-stream operations.
//!
//! This module provides the [`Error`] enum which represents every failure
//! mode of reading, rewriting and writing a dump stream, along with a
//! convenient [`Result<T>`] type alias.
//!
//! # Error Handling
//!
//! All fallible operations in this crate return `Result<T, Error>`. Every
//! error is fatal for the stream it came from: a dump is a strictly ordered
//! byte format, so once a length or a grammar is violated the remaining
//! bytes cannot be resynchronized.
//!
//! ```rust,no_run
//! use svndump_rewrite::{Error, RuleSet, TranscodeOptions, transcode};
//!
//! fn run(rules: &str) -> svndump_rewrite::Result<()> {
//!     let rules = RuleSet::from_csv_path(rules)?;
//!     let options = TranscodeOptions::new(rules);
//!     let stdin = std::io::stdin().lock();
//!     let stdout = std::io::stdout().lock();
//!     match transcode(stdin, stdout, &options) {
//!         Ok(_) => Ok(()),
//!         Err(e) if e.is_config_error() => {
//!             eprintln!("bad rule file: {}", e);
//!             Err(e)
//!         }
//!         Err(e @ Error::UnsupportedVersion { .. }) => {
//!             eprintln!("{}", e);
//!             Err(e)
//!         }
//!         Err(e) => Err(e),
//!     }
//! }
//! ```

use std::fmt;
use std::io;

/// The part of a record a truncated read was attempting to fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// The RFC822-style header block.
    Headers,
    /// The property block declared by `Prop-content-length`.
    Properties,
    /// The text content declared by `Text-content-length`.
    Content,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Headers => write!(f, "header block"),
            Self::Properties => write!(f, "property block"),
            Self::Content => write!(f, "text content"),
        }
    }
}

/// The main error type for dump-stream operations.
///
/// # Error Categories
///
/// | Category | Variants | Typical Cause |
/// |----------|----------|---------------|
/// | I/O | [`Io`][Self::Io] | Reading or writing the streams |
/// | Format | [`InvalidPreamble`][Self::InvalidPreamble], [`UnsupportedVersion`][Self::UnsupportedVersion], [`MalformedHeader`][Self::MalformedHeader], [`InvalidHeaderValue`][Self::InvalidHeaderValue], [`CorruptProperties`][Self::CorruptProperties] | Input is not a valid dump |
/// | Truncation | [`Truncated`][Self::Truncated] | Input ends inside a declared section |
/// | Resources | [`ResourceLimitExceeded`][Self::ResourceLimitExceeded] | Configured size limits |
/// | Configuration | [`RuleFile`][Self::RuleFile], [`RuleFileUnreadable`][Self::RuleFileUnreadable], [`InvalidRegex`][Self::InvalidRegex] | Bad rewrite rules |
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error occurred on the input or output stream.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The stream preamble (format version and UUID lines) is malformed.
    #[error("Invalid dump preamble: {0}")]
    InvalidPreamble(String),

    /// The dump declares a format version this tool does not handle.
    #[error("dump file in format '{version}' not supported")]
    UnsupportedVersion {
        /// The version string exactly as declared.
        version: String,
    },

    /// A line inside a record's header block is not `Name: value`.
    #[error("Malformed header line: {line:?}")]
    MalformedHeader {
        /// The offending line, without its trailing newline.
        line: String,
    },

    /// A header that must hold a decimal length holds something else.
    #[error("Invalid value for header {name}: {value:?}")]
    InvalidHeaderValue {
        /// The header name.
        name: String,
        /// The value that failed to parse.
        value: String,
    },

    /// The property block does not follow the `K`/`V`/`D`/`PROPS-END` grammar.
    #[error("Corrupt property block at offset {offset}: {reason}")]
    CorruptProperties {
        /// Byte offset inside the property block.
        offset: usize,
        /// A description of the violation.
        reason: String,
    },

    /// The stream ended before a declared section was complete.
    #[error("Truncated {section}: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Which section was being read.
        section: Section,
        /// Bytes declared by the record headers.
        expected: u64,
        /// Bytes actually available.
        actual: u64,
    },

    /// A configured resource limit was exceeded.
    #[error("Resource limit exceeded: {0}")]
    ResourceLimitExceeded(String),

    /// A row of the rewrite-rule file could not be used.
    #[error("file {path}, line {line}: {reason}")]
    RuleFile {
        /// Name of the rule file.
        path: String,
        /// 1-based line number of the offending row.
        line: u64,
        /// Description of the problem.
        reason: String,
    },

    /// The rewrite-rule file is missing or cannot be opened.
    #[error("cannot read rule file {path}: {source}")]
    RuleFileUnreadable {
        /// Name of the rule file.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A rewrite rule carries a pattern that is not a valid regular expression.
    #[error("Invalid regex pattern '{pattern}' for property '{property}': {reason}")]
    InvalidRegex {
        /// The property the rule applies to.
        property: String,
        /// The invalid pattern.
        pattern: String,
        /// Description of why the pattern is invalid.
        reason: String,
    },
}

impl Error {
    /// Returns `true` if the input stream violates the dump grammar.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidPreamble(_)
                | Error::UnsupportedVersion { .. }
                | Error::MalformedHeader { .. }
                | Error::InvalidHeaderValue { .. }
                | Error::CorruptProperties { .. }
        )
    }

    /// Returns `true` if the input ended inside a declared section.
    pub fn is_truncation(&self) -> bool {
        matches!(self, Error::Truncated { .. })
    }

    /// Returns `true` if the error comes from the rewrite-rule configuration.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Error::RuleFile { .. } | Error::RuleFileUnreadable { .. } | Error::InvalidRegex { .. }
        )
    }

    /// Returns `true` if this error might be recoverable.
    ///
    /// Only transient I/O kinds qualify. Everything else leaves the stream
    /// desynchronized or stems from a bad configuration.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Io(e) => matches!(
                e.kind(),
                io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted | io::ErrorKind::TimedOut
            ),
            _ => false,
        }
    }

    /// Creates a CorruptProperties error.
    pub fn corrupt_properties(offset: usize, reason: impl Into<String>) -> Self {
        Error::CorruptProperties {
            offset,
            reason: reason.into(),
        }
    }

    /// Creates a RuleFile error.
    pub fn rule_file(path: impl Into<String>, line: u64, reason: impl Into<String>) -> Self {
        Error::RuleFile {
            path: path.into(),
            line,
            reason: reason.into(),
        }
    }
}

/// A specialized Result type for dump-stream operations.
pub type Result<T> = std::result::Result<T, Error>;
