#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;

// Fuzz target: the reader-based stream must agree with the slice decoder
// on every input, records and end state alike.
fuzz_target!(|data: &[u8]| {
    let slice = idmap_decoder::IdmapDecoder::decode(data);

    let mut stream = idmap_decoder::RecordStream::new(Cursor::new(data)).unwrap();
    let records: Vec<_> = stream.by_ref().map(Result::unwrap).collect();

    assert_eq!(records, slice.records);
    assert_eq!(stream.end(), Some(slice.end));
});
