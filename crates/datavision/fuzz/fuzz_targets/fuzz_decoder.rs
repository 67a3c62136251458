//! Fuzz target for upload decoding.
//!
//! This fuzzer tests that the decoder:
//! 1. Never panics on arbitrary bytes, for either text or workbook extensions
//! 2. Only produces rows whose keys are known headers

#![no_main]

use datavision::{Decoder, FileDecoder};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 64 * 1024 {
        return;
    }

    let decoder = FileDecoder::new();
    for name in ["fuzz.csv", "fuzz.tsv", "fuzz.xlsx", "fuzz.xls", "fuzz.ods"] {
        if let Ok(table) = decoder.decode(data, name) {
            for row in &table.rows {
                assert!(row.keys().all(|k| table.headers.contains(k)));
            }
        }
    }
});
