#![no_main]

use libfuzzer_sys::fuzz_target;

// Fuzz target: slice decoder on arbitrary bytes.
//
// Decoding is infallible, so the checks are structural:
// - no panics on any input
// - a partial tail never accounts for more bytes than the input has
fuzz_target!(|data: &[u8]| {
    let decoded = idmap_decoder::IdmapDecoder::decode(data);
    assert!(decoded.end.trailing_bytes() <= data.len());
    assert!(decoded.fallback_names <= decoded.records.len());
});
