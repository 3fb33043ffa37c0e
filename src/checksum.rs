//! Content digest for the `Text-content-md5` header.
//!
//! ```rust
//! use svndump_rewrite::checksum::md5_hex;
//!
//! assert_eq!(md5_hex(b""), "d41d8cd98f00b204e9800998ecf8427e");
//! ```

use md5::{Digest, Md5};

/// Computes the lowercase hex MD5 of `data`.
pub fn md5_hex(data: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}
