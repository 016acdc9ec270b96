//! Fuzz target for the data parser.
//!
//! This fuzzer tests that the CSV parser:
//! 1. Never panics on malformed input
//! 2. Handles all delimiter combinations
//! 3. Doesn't allocate unbounded memory

#![no_main]

use augur::input::Parser;
use libfuzzer_sys::fuzz_target;
use std::io::Write;

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    let parser = Parser::new();

    // In-memory decoding with every supported delimiter
    for delimiter in [b',', b'\t', b';', b'|'] {
        let _ = parser.parse_bytes(data, delimiter);
    }

    // Full file path with delimiter auto-detection and hashing
    if let Ok(mut temp_file) = tempfile::Builder::new().suffix(".csv").tempfile() {
        if temp_file.write_all(data).is_ok() {
            let _ = parser.parse_file(temp_file.path());
        }
    }
});
