//! Decoder edge cases that cut across the sync, slice and async paths.

use std::io::Cursor;

use idmap_decoder::{AsyncRecordStream, IdmapDecoder, RecordStream, StreamEnd};
use idmap_encoder::IdmapEncoder;
use idmap_tests::synthetic_map;
use idmap_wire::record::MAX_NAME_LEN;
use idmap_wire::{Record, RecordField, TextEncoding};

fn sync_records(payload: &[u8]) -> (Vec<Record>, Option<StreamEnd>) {
    let mut stream = RecordStream::new(Cursor::new(payload.to_vec())).unwrap();
    let records = stream.by_ref().map(Result::unwrap).collect();
    (records, stream.end())
}

#[test]
fn max_length_name_roundtrips() {
    let name = "N".repeat(MAX_NAME_LEN);
    let payload = IdmapEncoder::new()
        .add_name(0xDEAD_BEEF, &name)
        .encode()
        .unwrap();

    let (records, end) = sync_records(&payload);
    assert_eq!(records, [Record::new(0xDEAD_BEEF, name)]);
    assert_eq!(end, Some(StreamEnd::Exhausted));
}

#[test]
fn max_offset_is_preserved() {
    let payload = IdmapEncoder::new()
        .add_name(u32::MAX, "last")
        .encode()
        .unwrap();
    assert_eq!(IdmapDecoder::decode(&payload).records[0].offset, u32::MAX);
}

#[test]
fn declared_length_beyond_file_is_truncation() {
    // name_len = 0xFFFF, only 4 name bytes present.
    let payload = [0x01, 0, 0, 0, 0xFF, 0xFF, b'a', b'b', b'c', b'd'];
    let (records, end) = sync_records(&payload);
    assert!(records.is_empty());
    assert_eq!(
        end,
        Some(StreamEnd::Truncated {
            at: 0,
            field: RecordField::NameBytes,
            needed: 0xFFFF,
            available: 4,
        })
    );
}

#[test]
fn utf8_that_looks_like_latin1_stays_utf8() {
    // "ü" in UTF-8 is C3 BC, which is also two valid Latin-1 characters.
    let payload = IdmapEncoder::new().add_name(1, "ü").encode().unwrap();
    let entry = IdmapDecoder::entries(&payload).next().unwrap();
    assert_eq!(entry.encoding, TextEncoding::Utf8);
    assert_eq!(entry.record.name, "ü");
}

#[test]
fn fallback_applies_per_record_not_per_file() {
    let payload = IdmapEncoder::new()
        .add_name(1, "ok")
        .add_raw(2, &[0x80])
        .add_name(3, "日本")
        .encode()
        .unwrap();

    let encodings: Vec<TextEncoding> = IdmapDecoder::entries(&payload)
        .map(|e| e.encoding)
        .collect();
    assert_eq!(
        encodings,
        [TextEncoding::Utf8, TextEncoding::Latin1, TextEncoding::Utf8]
    );
}

#[test]
fn slice_and_reader_decoders_agree_on_every_prefix() {
    let payload = IdmapEncoder::new()
        .add_name(0x10, "a")
        .add_raw(0x20, &[0xFF, 0xFE])
        .add_name(0x30, "")
        .encode()
        .unwrap();

    for cut in 0..=payload.len() {
        let slice = IdmapDecoder::decode(&payload[..cut]);
        let (records, end) = sync_records(&payload[..cut]);
        assert_eq!(slice.records, records, "cut at {cut}");
        assert_eq!(Some(slice.end), end, "cut at {cut}");
    }
}

#[tokio::test]
async fn async_stream_agrees_with_sync_stream() {
    let mut payload = synthetic_map(100);
    payload.extend_from_slice(&[0x10, 0x00, 0x00]);

    let (sync, sync_end) = sync_records(&payload);

    let mut stream = AsyncRecordStream::new(Cursor::new(payload));
    let mut records = Vec::new();
    while let Some(entry) = stream.next().await {
        records.push(entry.unwrap().record);
    }

    assert_eq!(records, sync);
    assert_eq!(stream.end(), sync_end);
    assert_eq!(records.len(), 100);
}
