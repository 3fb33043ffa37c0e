//! Shared test utilities for integration tests.
//!
//! This module provides a small dump-stream builder plus helpers used
//! across the integration test files.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test file
//! compiles as a separate crate and may only use a subset of these helpers.

#![allow(dead_code)]

use svndump_rewrite::{RuleSet, TranscodeOptions, transcode};

/// UUID used by every dump built in tests.
pub const UUID: &str = "7bf7a5ef-cabf-0310-b7d4-93df341afa7e";

/// Encodes `props` as a property block, always closed by `PROPS-END`.
pub fn prop_block(props: &[(&str, &str)]) -> Vec<u8> {
    let mut out = Vec::new();
    for (name, value) in props {
        out.extend_from_slice(format!("K {}\n{}\nV {}\n{}\n", name.len(), name, value.len(), value).as_bytes());
    }
    out.extend_from_slice(b"PROPS-END\n");
    out
}

/// Builds dump streams the way `svnadmin dump` lays them out.
///
/// Length headers are computed from the parts given; no digest header is
/// emitted unless passed explicitly.
#[derive(Debug, Clone)]
pub struct DumpBuilder {
    bytes: Vec<u8>,
}

impl Default for DumpBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DumpBuilder {
    /// Starts a format-2 dump.
    pub fn new() -> Self {
        Self::with_version("2")
    }

    /// Starts a dump declaring `version`.
    pub fn with_version(version: &str) -> Self {
        let bytes = format!(
            "SVN-fs-dump-format-version: {}\n\nUUID: {}\n\n",
            version, UUID
        )
        .into_bytes();
        Self { bytes }
    }

    /// Appends a revision record with the given revision properties.
    pub fn revision(mut self, rev: u64, props: &[(&str, &str)]) -> Self {
        let block = prop_block(props);
        self.bytes.extend_from_slice(
            format!(
                "Revision-number: {}\nProp-content-length: {}\nContent-length: {}\n\n",
                rev,
                block.len(),
                block.len()
            )
            .as_bytes(),
        );
        self.bytes.extend_from_slice(&block);
        self.bytes.push(b'\n');
        self
    }

    /// Appends a node record.
    ///
    /// `props` of `None` omits the property block; `content` of `None`
    /// omits the text headers.
    pub fn node(
        mut self,
        headers: &[(&str, &str)],
        props: Option<&[(&str, &str)]>,
        content: Option<&[u8]>,
    ) -> Self {
        let block = props.map(prop_block);
        for (name, value) in headers {
            self.bytes
                .extend_from_slice(format!("{}: {}\n", name, value).as_bytes());
        }
        let prop_len = block.as_ref().map_or(0, Vec::len);
        let text_len = content.map_or(0, <[u8]>::len);
        if block.is_some() {
            self.bytes
                .extend_from_slice(format!("Prop-content-length: {}\n", prop_len).as_bytes());
        }
        if content.is_some() {
            self.bytes
                .extend_from_slice(format!("Text-content-length: {}\n", text_len).as_bytes());
        }
        if block.is_some() || content.is_some() {
            self.bytes.extend_from_slice(
                format!("Content-length: {}\n", prop_len + text_len).as_bytes(),
            );
        }
        self.bytes.push(b'\n');
        if let Some(block) = &block {
            self.bytes.extend_from_slice(block);
        }
        if let Some(content) = content {
            self.bytes.extend_from_slice(content);
        }
        self.bytes.extend_from_slice(b"\n\n");
        self
    }

    /// Appends raw bytes.
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    /// Returns the dump bytes.
    pub fn build(self) -> Vec<u8> {
        self.bytes
    }
}

/// Builds a rule set from `(property, pattern, replacement)` triples.
pub fn rules(triples: &[(&str, &str, &str)]) -> RuleSet {
    let mut set = RuleSet::new();
    for (property, pattern, replacement) in triples {
        set.add(*property, pattern, *replacement)
            .expect("test rule must compile");
    }
    set
}

/// Transcodes `input` in memory with `rules`.
pub fn run(input: &[u8], rules: RuleSet) -> svndump_rewrite::Result<Vec<u8>> {
    let mut output = Vec::new();
    transcode(input, &mut output, &TranscodeOptions::new(rules))?;
    Ok(output)
}

/// Transcodes `input` in memory with `rules`, returning what was written
/// even when transcoding fails.
pub fn run_partial(
    input: &[u8],
    rules: RuleSet,
) -> (Vec<u8>, svndump_rewrite::Result<svndump_rewrite::TranscodeStats>) {
    let mut output = Vec::new();
    let result = transcode(input, &mut output, &TranscodeOptions::new(rules));
    (output, result)
}

/// Extracts the error from a Result, panicking if it's Ok.
///
/// # Panics
///
/// Panics if the result is `Ok(_)`.
pub fn expect_err<T, E>(result: Result<T, E>) -> E {
    match result {
        Ok(_) => panic!("Expected error but got Ok"),
        Err(e) => e,
    }
}

/// Returns the value of header `name` in the first record whose
/// `Node-path` is `path`.
pub fn node_header(dump: &[u8], path: &str, name: &str) -> Option<String> {
    let text = String::from_utf8_lossy(dump);
    let marker = format!("Node-path: {}\n", path);
    let start = text.find(&marker)?;
    let block_end = text[start..].find("\n\n").map(|i| start + i)?;
    text[start..block_end]
        .lines()
        .find_map(|line| line.strip_prefix(&format!("{}: ", name)).map(str::to_string))
}
