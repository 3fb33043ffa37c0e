//! Fuzz target for reading and re-writing arbitrary dump streams.
//!
//! Any input the reader accepts must be written back without error, and
//! the written stream must read back to the same number of records.
//!
//! Run with: cargo +nightly fuzz run dump_read

#![no_main]

use libfuzzer_sys::fuzz_target;
use svndump_rewrite::read::{DumpReader, ReadOptions};
use svndump_rewrite::write::DumpWriter;

fuzz_target!(|data: &[u8]| {
    let options = ReadOptions::new().max_record_bytes(Some(1 << 20));
    let Ok(mut reader) = DumpReader::with_options(data, options) else {
        return;
    };

    let mut writer = DumpWriter::new(Vec::new());
    if writer.write_preamble(reader.preamble()).is_err() {
        return;
    }
    let mut records = 0u64;
    while let Ok(Some(mut lump)) = reader.next_lump() {
        if writer.write_lump(&mut lump).is_err() {
            return;
        }
        records += 1;
    }

    let Ok((bytes, _)) = writer.finish() else {
        return;
    };
    let reread = DumpReader::new(&bytes[..]).expect("written preamble must parse");
    let count = reread
        .map(|r| r.expect("written record must parse"))
        .count() as u64;
    assert_eq!(count, records);
});
