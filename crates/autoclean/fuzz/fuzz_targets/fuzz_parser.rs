//! Fuzz target for the delimited reader.
//!
//! The reader must never panic on malformed bytes: invalid UTF-8, ragged
//! rows, stray quotes and mixed delimiters all end in a table or an error.

#![no_main]

use autoclean::Parser;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    if let Ok(table) = Parser::new().parse_bytes(data) {
        for row in &table.rows {
            assert_eq!(row.len(), table.column_count());
        }
    }
});
