//! Options for reading dump streams.

/// Options controlling how a [`DumpReader`](super::DumpReader) reads records.
///
/// Each record's property block and text content are held in memory in
/// full, so the largest record bounds memory use. Set
/// [`max_record_bytes`](ReadOptions::max_record_bytes) to reject records
/// above a size instead of allocating for them.
///
/// # Example
///
/// ```rust
/// use svndump_rewrite::read::ReadOptions;
///
/// let options = ReadOptions::new().max_record_bytes(Some(256 * 1024 * 1024));
/// assert_eq!(options.record_limit(), Some(256 * 1024 * 1024));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReadOptions {
    max_record_bytes: Option<u64>,
}

impl ReadOptions {
    /// Creates options with no record size limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the largest accepted property block plus text content, in bytes.
    pub fn max_record_bytes(mut self, limit: Option<u64>) -> Self {
        self.max_record_bytes = limit;
        self
    }

    /// The configured record size limit.
    pub fn record_limit(&self) -> Option<u64> {
        self.max_record_bytes
    }
}
