//! Property block codec.
//!
//! The property block is a sequence of length-prefixed records:
//!
//! ```text
//! K <name-len>\n<name>\nV <value-len>\n<value>\n   set a property
//! D <name-len>\n<name>\n                           delete a property
//! PROPS-END\n                                      end of block
//! ```
//!
//! Lengths are decimal byte counts, so names and values may themselves
//! contain newlines.

use crate::format::PROPS_END;
use crate::{Error, Result};

/// Value of one entry in a [`PropertySet`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyValue {
    /// The property is set to these bytes.
    Value(Vec<u8>),
    /// The property is explicitly deleted from the node on replay.
    Deleted,
}

impl PropertyValue {
    /// Returns the value bytes, or `None` for a tombstone.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Value(v) => Some(v),
            Self::Deleted => None,
        }
    }

    /// Returns `true` for a tombstone.
    pub fn is_deleted(&self) -> bool {
        matches!(self, Self::Deleted)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Value(value.as_bytes().to_vec())
    }
}

impl From<Vec<u8>> for PropertyValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Value(value)
    }
}

/// Ordered mapping from property name to value or tombstone.
///
/// A name that is absent means "untouched"; [`PropertyValue::Deleted`] means
/// "remove on replay".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertySet {
    entries: Vec<(String, PropertyValue)>,
}

impl PropertySet {
    /// Creates an empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry for `name`, if present.
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// Returns a mutable reference to the entry for `name`, if present.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut PropertyValue> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    /// Sets `name`, appending it if new.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<PropertyValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Marks `name` as deleted.
    pub fn delete(&mut self, name: impl Into<String>) {
        self.set(name, PropertyValue::Deleted);
    }

    /// Drops `name` from the set entirely, leaving the property untouched.
    pub fn remove(&mut self, name: &str) -> Option<PropertyValue> {
        let pos = self.entries.iter().position(|(k, _)| k == name)?;
        Some(self.entries.remove(pos).1)
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates mutably over entries in insertion order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut PropertyValue)> {
        self.entries.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Decodes a property block.
///
/// Bytes following the `PROPS-END` sentinel are ignored.
///
/// # Errors
///
/// Returns [`Error::CorruptProperties`] if the block does not follow the
/// record grammar or ends before `PROPS-END`.
pub fn decode_properties(buf: &[u8]) -> Result<PropertySet> {
    let mut props = PropertySet::new();
    let mut pos = 0;

    loop {
        let rest = &buf[pos..];
        let want_value = if rest.starts_with(b"K ") {
            true
        } else if rest.starts_with(b"D ") {
            false
        } else if rest.starts_with(PROPS_END) {
            return Ok(props);
        } else if rest.is_empty() {
            return Err(Error::corrupt_properties(pos, "missing PROPS-END"));
        } else {
            return Err(Error::corrupt_properties(
                pos,
                "unrecognized record in properties section",
            ));
        };

        let (name, next) = read_field(buf, pos)?;
        let name = String::from_utf8(name.to_vec())
            .map_err(|_| Error::corrupt_properties(pos, "property name is not UTF-8"))?;
        pos = next;

        if want_value {
            if !buf[pos..].starts_with(b"V ") {
                return Err(Error::corrupt_properties(
                    pos,
                    format!("expected value record for property '{}'", name),
                ));
            }
            let (value, next) = read_field(buf, pos)?;
            props.set(name, PropertyValue::Value(value.to_vec()));
            pos = next;
        } else {
            props.delete(name);
        }
    }
}

/// Reads one `X <len>\n<bytes>\n` field starting at `start`.
///
/// Returns the payload and the offset just past its trailing newline.
fn read_field(buf: &[u8], start: usize) -> Result<(&[u8], usize)> {
    let digits_start = start + 2;
    let nl = buf[digits_start..]
        .iter()
        .position(|&b| b == b'\n')
        .map(|i| digits_start + i)
        .ok_or_else(|| Error::corrupt_properties(start, "unterminated length line"))?;

    let len: usize = std::str::from_utf8(&buf[digits_start..nl])
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| Error::corrupt_properties(digits_start, "invalid length"))?;

    let data_start = nl + 1;
    let data_end = data_start
        .checked_add(len)
        .filter(|&end| end < buf.len())
        .ok_or_else(|| {
            Error::corrupt_properties(data_start, format!("length {} overruns block", len))
        })?;
    if buf[data_end] != b'\n' {
        return Err(Error::corrupt_properties(
            data_end,
            "missing newline after record data",
        ));
    }
    Ok((&buf[data_start..data_end], data_end + 1))
}

/// Encodes `props` as a property block.
///
/// An empty set encodes to an empty block; otherwise the block ends with
/// `PROPS-END\n`.
pub fn encode_properties(props: &PropertySet) -> Vec<u8> {
    let mut out = Vec::new();
    if props.is_empty() {
        return out;
    }
    for (name, value) in props.iter() {
        match value {
            PropertyValue::Deleted => push_field(&mut out, b'D', name.as_bytes()),
            PropertyValue::Value(v) => {
                push_field(&mut out, b'K', name.as_bytes());
                push_field(&mut out, b'V', v);
            }
        }
    }
    out.extend_from_slice(PROPS_END);
    out.push(b'\n');
    out
}

fn push_field(out: &mut Vec<u8>, tag: u8, data: &[u8]) {
    out.push(tag);
    out.push(b' ');
    out.extend_from_slice(data.len().to_string().as_bytes());
    out.push(b'\n');
    out.extend_from_slice(data);
    out.push(b'\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_single_property() {
        let props = decode_properties(b"K 3\nfoo\nV 3\nbar\nPROPS-END\n").unwrap();
        assert_eq!(props.len(), 1);
        assert_eq!(props.get("foo"), Some(&PropertyValue::from("bar")));
    }

    #[test]
    fn test_decode_tombstone() {
        let props = decode_properties(b"D 8\nsvn:mime\nK 1\na\nV 0\n\nPROPS-END\n").unwrap();
        assert_eq!(props.get("svn:mime"), Some(&PropertyValue::Deleted));
        assert_eq!(props.get("a"), Some(&PropertyValue::Value(Vec::new())));
        let names: Vec<&str> = props.iter().map(|(k, _)| k).collect();
        assert_eq!(names, ["svn:mime", "a"]);
    }

    #[test]
    fn test_value_with_embedded_newlines() {
        let block = b"K 7\nsvn:log\nV 11\nline1\nline2\nPROPS-END\n";
        let props = decode_properties(block).unwrap();
        assert_eq!(
            props.get("svn:log").and_then(PropertyValue::as_bytes),
            Some(&b"line1\nline2"[..])
        );
        assert_eq!(encode_properties(&props), block);
    }

    #[test]
    fn test_trailing_bytes_after_end_ignored() {
        let props = decode_properties(b"PROPS-END\ngarbage").unwrap();
        assert!(props.is_empty());
    }

    #[test]
    fn test_unrecognized_record() {
        let err = decode_properties(b"X 3\nfoo\nPROPS-END\n").unwrap_err();
        assert!(matches!(err, Error::CorruptProperties { offset: 0, .. }));
        assert!(err.to_string().contains("unrecognized record"));
    }

    #[test]
    fn test_missing_value_record() {
        let err = decode_properties(b"K 3\nfoo\nPROPS-END\n").unwrap_err();
        assert!(matches!(err, Error::CorruptProperties { offset: 8, .. }));
    }

    #[test]
    fn test_missing_props_end() {
        let err = decode_properties(b"K 3\nfoo\nV 3\nbar\n").unwrap_err();
        assert!(err.to_string().contains("PROPS-END"));
    }

    #[test]
    fn test_length_overrun() {
        let err = decode_properties(b"K 30\nfoo\nV 3\nbar\nPROPS-END\n").unwrap_err();
        assert!(err.is_format_error());
    }

    #[test]
    fn test_wrong_length_misses_newline() {
        let err = decode_properties(b"K 2\nfoo\nV 3\nbar\nPROPS-END\n").unwrap_err();
        assert!(err.to_string().contains("missing newline"));
    }

    #[test]
    fn test_bad_length_digits() {
        let err = decode_properties(b"K x\nfoo\nV 3\nbar\nPROPS-END\n").unwrap_err();
        assert!(err.to_string().contains("invalid length"));
    }

    #[test]
    fn test_encode_empty_set_is_empty() {
        assert!(encode_properties(&PropertySet::new()).is_empty());
    }

    #[test]
    fn test_encode_order_and_tombstones() {
        let mut props = PropertySet::new();
        props.set("svn:log", "msg");
        props.delete("svn:executable");
        assert_eq!(
            encode_properties(&props),
            b"K 7\nsvn:log\nV 3\nmsg\nD 14\nsvn:executable\nPROPS-END\n"
        );
    }

    #[test]
    fn test_binary_value_survives() {
        let mut props = PropertySet::new();
        props.set("bin", vec![0u8, 0xff, b'\n', 0x80]);
        let decoded = decode_properties(&encode_properties(&props)).unwrap();
        assert_eq!(decoded, props);
    }
}
