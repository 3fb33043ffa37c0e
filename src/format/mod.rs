//! Dump format constants, definitions, and low-level codecs.
//!
//! A dump stream starts with a preamble (format version and repository
//! UUID) followed by a sequence of records. Each record is an RFC822-style
//! header block, an optional property block and optional text content.

pub mod headers;
pub mod preamble;
pub mod properties;

/// Header names used by dump records.
pub mod header_name {
    /// Starts a revision record.
    pub const REVISION_NUMBER: &str = "Revision-number";
    /// Path of the node a node record acts on.
    pub const NODE_PATH: &str = "Node-path";
    /// `file` or `dir`.
    pub const NODE_KIND: &str = "Node-kind";
    /// `change`, `add`, `delete` or `replace`.
    pub const NODE_ACTION: &str = "Node-action";
    /// Source path of a copy.
    pub const NODE_COPYFROM_PATH: &str = "Node-copyfrom-path";
    /// Byte length of the property block.
    pub const PROP_CONTENT_LENGTH: &str = "Prop-content-length";
    /// Byte length of the text content.
    pub const TEXT_CONTENT_LENGTH: &str = "Text-content-length";
    /// Lowercase hex MD5 of the text content.
    pub const TEXT_CONTENT_MD5: &str = "Text-content-md5";
    /// Sum of property block and text content lengths.
    pub const CONTENT_LENGTH: &str = "Content-length";
}

/// Key of the first preamble line.
pub const FORMAT_VERSION_KEY: &str = "SVN-fs-dump-format-version";

/// Key of the second preamble line.
pub const UUID_KEY: &str = "UUID";

/// Sentinel terminating a property block.
pub const PROPS_END: &[u8] = b"PROPS-END";

/// Declared format versions this tool accepts.
///
/// Version 3 was never an official revision of the format; it is accepted
/// and handled as version 2.
pub const SUPPORTED_VERSIONS: &[&str] = &["2", "3"];

/// Maps a declared format version to the layout it actually uses.
///
/// Returns `None` for versions with no known layout.
pub fn equivalent_format(version: &str) -> Option<u32> {
    match version {
        "1" => Some(1),
        "2" => Some(2),
        "3" => Some(2),
        _ => None,
    }
}

/// Returns `true` if `version` is one of [`SUPPORTED_VERSIONS`].
pub fn is_supported_version(version: &str) -> bool {
    SUPPORTED_VERSIONS.contains(&version)
}
