#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use idmap_decoder::{IdmapDecoder, StreamEnd};
use idmap_encoder::IdmapEncoder;

#[derive(Debug, Arbitrary)]
struct FuzzRecord {
    offset: u32,
    name: String,
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    records: Vec<FuzzRecord>,
    /// Extra bytes appended after the last record, capped below one
    /// record header so they can only ever be a partial tail.
    stray: Vec<u8>,
}

// Fuzz target: UTF-8 records survive encode → decode unchanged, and stray
// trailing bytes never alter the decoded records.
fuzz_target!(|input: FuzzInput| {
    let mut encoder = IdmapEncoder::new();
    for r in &input.records {
        encoder.add_name(r.offset, &r.name);
    }
    let Ok(mut payload) = encoder.encode() else {
        return;
    };

    let clean = IdmapDecoder::decode(&payload);
    assert_eq!(clean.end, StreamEnd::Exhausted);
    assert_eq!(clean.records.len(), input.records.len());
    for (decoded, original) in clean.records.iter().zip(&input.records) {
        assert_eq!(decoded.offset, original.offset);
        assert_eq!(decoded.name, original.name);
    }

    let stray = &input.stray[..input.stray.len().min(5)];
    payload.extend_from_slice(stray);
    let noisy = IdmapDecoder::decode(&payload);
    assert_eq!(noisy.records, clean.records);
});
