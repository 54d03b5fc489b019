#![no_main]
use libfuzzer_sys::fuzz_target;
use std::collections::HashSet;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    let keywords: HashSet<Vec<u8>> = magic_identify::identify::HeuristicsConfig::default()
        .keywords
        .iter()
        .map(|k| k.as_bytes().to_vec())
        .collect();
    let _ = magic_identify::identify::heuristic::count_markers(Cursor::new(data), &keywords);
});
