//! # svndump-rewrite
//!
//! A streaming rewriter for Subversion dump files.
//!
//! The crate reads a dump stream (as produced by `svnadmin dump`) record by
//! record, rewrites property values with regular-expression rules, and
//! writes an equivalent dump. Derived headers (`Prop-content-length`,
//! `Text-content-length`, `Text-content-md5` and `Content-length`) are
//! recomputed for every record, so rewritten output stays loadable.
//!
//! ## Quick Start
//!
//! ### Rewriting a Dump
//!
//! ```rust,no_run
//! use svndump_rewrite::{RuleSet, TranscodeOptions, transcode, Result};
//! use std::fs::File;
//!
//! fn main() -> Result<()> {
//!     let rules = RuleSet::from_csv_path("authors.csv")?;
//!     let input = File::open("repo.dump")?;
//!     let output = File::create("repo-rewritten.dump")?;
//!
//!     let stats = transcode(input, output, &TranscodeOptions::new(rules))?;
//!     println!("{} revisions, {} properties rewritten",
//!         stats.revisions,
//!         stats.properties_rewritten);
//!     Ok(())
//! }
//! ```
//!
//! ### Working With Records
//!
//! ```rust
//! use svndump_rewrite::read::DumpReader;
//! use svndump_rewrite::write::DumpWriter;
//! use svndump_rewrite::Result;
//!
//! fn strip_logs(input: &[u8]) -> Result<Vec<u8>> {
//!     let mut reader = DumpReader::new(input)?;
//!     let mut writer = DumpWriter::new(Vec::new());
//!     writer.write_preamble(reader.preamble())?;
//!     while let Some(mut lump) = reader.next_lump()? {
//!         lump.properties_mut().remove("svn:log");
//!         writer.write_lump(&mut lump)?;
//!     }
//!     Ok(writer.finish()?.0)
//! }
//!
//! let dump = b"SVN-fs-dump-format-version: 2\n\nUUID: 5e7d-01\n\n";
//! assert_eq!(strip_logs(dump)?, dump);
//! # Ok::<(), svndump_rewrite::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli` | No | Command-line interface tool |
//!
//! ## Modules
//!
//! - [`format`]: Dump format constants and the preamble, header and property codecs
//! - [`lump`]: The in-memory record and derived-header regeneration
//! - [`read`]: Stream reading
//! - [`rewrite`]: Property rewrite rules
//! - [`write`]: Stream writing
//! - [`transcode`]: The read, rewrite, write loop
//! - [`progress`]: Per-record observers
//! - [`checksum`]: Content digests
//! - [`error`]: Error types

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod checksum;
pub mod error;
pub mod format;
pub mod lump;
pub mod progress;
pub mod read;
pub mod rewrite;
pub mod transcode;
pub mod write;

pub use error::{Error, Result, Section};
pub use lump::{Lump, NodeAction, NodeKind};

// Re-export the format types most callers touch
pub use format::headers::HeaderSet;
pub use format::preamble::Preamble;
pub use format::properties::{PropertySet, PropertyValue};

// Re-export reading and writing API at crate root for convenience
pub use read::{DumpReader, ReadOptions};
pub use write::{DumpWriter, WriteStats};

// Re-export rewriting API
pub use rewrite::{RewriteRule, RuleSet};

// Re-export transcoding API
pub use transcode::{TranscodeOptions, TranscodeStats, transcode, transcode_with_observer};

// Re-export progress API
pub use progress::{DebugTrace, LumpObserver, NoProgress, observer_fn};
