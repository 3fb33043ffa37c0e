//! Fuzz target for the property block decoder.
//!
//! Decoding arbitrary bytes must never panic, and any decoded set must
//! encode to a block that decodes to the same set.
//!
//! Run with: cargo +nightly fuzz run property_decode

#![no_main]

use libfuzzer_sys::fuzz_target;
use svndump_rewrite::format::properties::{decode_properties, encode_properties};

fuzz_target!(|data: &[u8]| {
    if let Ok(props) = decode_properties(data) {
        let encoded = encode_properties(&props);
        if props.is_empty() {
            assert!(encoded.is_empty());
            return;
        }
        let again = decode_properties(&encoded).expect("encoded block must decode");
        assert_eq!(again, props);
    }
});
