//! Fuzz target for date parsing and period rollups.
//!
//! This fuzzer tests that:
//! 1. The multi-format date parser never panics on any input
//! 2. Rolling up rows with fuzzed dates never panics and yields sorted labels

#![no_main]

use datavision::analysis::{aggregate, parse_date};
use datavision::{DecodedTable, Period};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10_000 {
        return;
    }

    if let Ok(content) = std::str::from_utf8(data) {
        let _ = parse_date(content);

        let table = DecodedTable::from_records(["date", "value"], vec![vec![content, "1"]]);
        for period in [Period::Day, Period::Week, Period::Month, Period::Year, Period::Other] {
            let data = aggregate(&table.rows, "date", "value", period);
            assert!(data.windows(2).all(|w| w[0].period <= w[1].period));
        }
    }
});
