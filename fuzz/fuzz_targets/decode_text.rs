#![no_main]

use libfuzzer_sys::fuzz_target;

// Fuzz target: name decoding.
//
// - valid UTF-8 comes back unchanged
// - anything else maps one byte to one char, never U+FFFD
fuzz_target!(|data: &[u8]| {
    let decoded = idmap_wire::decode_text(data.to_vec());
    match std::str::from_utf8(data) {
        Ok(s) => assert_eq!(decoded.as_str(), s),
        Err(_) => {
            assert!(decoded.is_fallback());
            assert_eq!(decoded.as_str().chars().count(), data.len());
            assert!(!decoded.as_str().contains('\u{fffd}'));
        }
    }
});
