//! In-memory dump record ("lump").
//!
//! A [`Lump`] combines a record's headers, its decoded properties and its
//! raw text content. Derived headers (lengths and the content digest) are
//! never trusted after a mutation: [`Lump::regenerate_headers`] recomputes
//! them from the current state right before the record is written.

use crate::checksum::md5_hex;
use crate::format::header_name;
use crate::format::headers::HeaderSet;
use crate::format::properties::{PropertySet, encode_properties};

/// Value of the `Node-action` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeAction {
    /// Modify an existing node.
    Change,
    /// Create a node.
    Add,
    /// Remove a node.
    Delete,
    /// Delete then add in one step.
    Replace,
}

impl NodeAction {
    /// Parses a header value. Unknown actions yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "change" => Some(Self::Change),
            "add" => Some(Self::Add),
            "delete" => Some(Self::Delete),
            "replace" => Some(Self::Replace),
            _ => None,
        }
    }

    /// The header value for this action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Change => "change",
            Self::Add => "add",
            Self::Delete => "delete",
            Self::Replace => "replace",
        }
    }
}

/// Value of the `Node-kind` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A versioned file.
    File,
    /// A versioned directory.
    Dir,
}

impl NodeKind {
    /// Parses a header value. Unknown kinds yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "file" => Some(Self::File),
            "dir" => Some(Self::Dir),
            _ => None,
        }
    }

    /// The header value for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Dir => "dir",
        }
    }
}

/// One record of a dump stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lump {
    headers: HeaderSet,
    property_block: Vec<u8>,
    properties: PropertySet,
    content: Vec<u8>,
}

impl Lump {
    /// Creates a record from its parts.
    ///
    /// `property_block` holds the raw block as read; it is replaced by a
    /// fresh encoding of `properties` in [`regenerate_headers`].
    ///
    /// [`regenerate_headers`]: Lump::regenerate_headers
    pub fn from_parts(
        headers: HeaderSet,
        property_block: Vec<u8>,
        properties: PropertySet,
        content: Vec<u8>,
    ) -> Self {
        Self {
            headers,
            property_block,
            properties,
            content,
        }
    }

    /// Creates a record with the given headers and nothing else.
    pub fn with_headers(headers: HeaderSet) -> Self {
        Self {
            headers,
            ..Self::default()
        }
    }

    /// The record headers.
    pub fn headers(&self) -> &HeaderSet {
        &self.headers
    }

    /// Mutable access to the record headers.
    pub fn headers_mut(&mut self) -> &mut HeaderSet {
        &mut self.headers
    }

    /// The decoded properties.
    pub fn properties(&self) -> &PropertySet {
        &self.properties
    }

    /// Mutable access to the decoded properties.
    pub fn properties_mut(&mut self) -> &mut PropertySet {
        &mut self.properties
    }

    /// Replaces the property set.
    pub fn set_properties(&mut self, properties: PropertySet) {
        self.properties = properties;
    }

    /// The property block bytes: as read until headers are regenerated,
    /// then as they will be written.
    pub fn property_block(&self) -> &[u8] {
        &self.property_block
    }

    /// The raw text content.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Replaces the text content.
    pub fn set_content(&mut self, content: Vec<u8>) {
        self.content = content;
    }

    /// Returns `true` for a revision record.
    pub fn is_revision(&self) -> bool {
        self.headers.contains(header_name::REVISION_NUMBER)
    }

    /// The revision number, for revision records.
    pub fn revision_number(&self) -> Option<u64> {
        self.headers
            .get(header_name::REVISION_NUMBER)
            .and_then(|v| v.trim().parse().ok())
    }

    /// The `Node-action` header, if recognized.
    pub fn node_action(&self) -> Option<NodeAction> {
        self.headers
            .get(header_name::NODE_ACTION)
            .and_then(NodeAction::parse)
    }

    /// The `Node-kind` header, if recognized.
    pub fn node_kind(&self) -> Option<NodeKind> {
        self.headers
            .get(header_name::NODE_KIND)
            .and_then(NodeKind::parse)
    }

    /// The `Node-path` header.
    pub fn node_path(&self) -> Option<&str> {
        self.headers.get(header_name::NODE_PATH)
    }

    /// Whether text-content headers must be emitted even for empty content.
    ///
    /// An added file that is not a copy must declare its (possibly zero)
    /// length and digest.
    fn requires_text_headers(&self) -> bool {
        let copy_source = self
            .headers
            .get(header_name::NODE_COPYFROM_PATH)
            .is_some_and(|p| !p.is_empty());
        self.node_action() == Some(NodeAction::Add)
            && self.node_kind() == Some(NodeKind::File)
            && !copy_source
    }

    /// Re-encodes the property block and recomputes every derived header.
    ///
    /// Steps, in order:
    /// 1. encode the properties, or force an empty block for a delete record;
    /// 2. set or drop `Prop-content-length`;
    /// 3. set or drop `Text-content-length` and `Text-content-md5`;
    /// 4. set or drop `Content-length`.
    pub fn regenerate_headers(&mut self) {
        self.property_block = if self.node_action() == Some(NodeAction::Delete) {
            Vec::new()
        } else {
            encode_properties(&self.properties)
        };

        let prop_len = self.property_block.len();
        if prop_len > 0 {
            self.headers
                .set(header_name::PROP_CONTENT_LENGTH, prop_len.to_string());
        } else {
            self.headers.remove(header_name::PROP_CONTENT_LENGTH);
        }

        let text_len = self.content.len();
        if text_len > 0 || self.requires_text_headers() {
            self.headers
                .set(header_name::TEXT_CONTENT_LENGTH, text_len.to_string());
            self.headers
                .set(header_name::TEXT_CONTENT_MD5, md5_hex(&self.content));
        } else {
            self.headers.remove(header_name::TEXT_CONTENT_LENGTH);
            self.headers.remove(header_name::TEXT_CONTENT_MD5);
        }

        if prop_len > 0 || text_len > 0 {
            self.headers
                .set(header_name::CONTENT_LENGTH, (prop_len + text_len).to_string());
        } else {
            self.headers.remove(header_name::CONTENT_LENGTH);
        }
    }
}
