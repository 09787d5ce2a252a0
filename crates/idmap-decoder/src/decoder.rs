use idmap_wire::{Record, RecordFrame, TextEncoding, WireError};

use crate::end::{Entry, StreamEnd};

/// The result of decoding an in-memory `.idmap` payload.
///
/// ```text
/// ┌──────────────────────────────────────────────────────┐
/// │ DecodedMap                                           │
/// │   records:        Vec<Record> ← wire order           │
/// │   end:            StreamEnd   ← boundary or cut      │
/// │   fallback_names: usize       ← Latin-1 decoded      │
/// └──────────────────────────────────────────────────────┘
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedMap {
    pub records: Vec<Record>,
    pub end: StreamEnd,
    pub fallback_names: usize,
}

/// Synchronous decoder for a payload that is already in memory.
///
/// Same record rules as [`RecordStream`](crate::RecordStream), without the
/// I/O: a slice cannot fail to read, so decoding cannot fail either. A
/// partial trailing record is dropped and described by
/// [`DecodedMap::end`].
///
/// # Example
///
/// ```rust
/// use idmap_decoder::{IdmapDecoder, StreamEnd};
/// use idmap_encoder::IdmapEncoder;
///
/// let payload = IdmapEncoder::new()
///     .add_name(0x10, "foo")
///     .add_name(0x20, "bar")
///     .encode()
///     .unwrap();
///
/// let decoded = IdmapDecoder::decode(&payload);
/// assert_eq!(decoded.records.len(), 2);
/// assert_eq!(decoded.end, StreamEnd::Exhausted);
/// ```
pub struct IdmapDecoder;

impl IdmapDecoder {
    /// Decode every complete record in `payload`.
    #[must_use]
    pub fn decode(payload: &[u8]) -> DecodedMap {
        let mut entries = Self::entries(payload);
        let mut records = Vec::new();
        let mut fallback_names = 0;

        for entry in entries.by_ref() {
            if entry.encoding == TextEncoding::Latin1 {
                fallback_names += 1;
            }
            records.push(entry.record);
        }

        DecodedMap {
            records,
            end: entries.end().unwrap_or(StreamEnd::Exhausted),
            fallback_names,
        }
    }

    /// Iterate records in `payload` with their positions and encodings.
    #[must_use]
    pub fn entries(payload: &[u8]) -> Entries<'_> {
        Entries {
            payload,
            pos: 0,
            end: None,
        }
    }
}

/// Iterator returned by [`IdmapDecoder::entries`].
pub struct Entries<'a> {
    payload: &'a [u8],
    pos: usize,
    end: Option<StreamEnd>,
}

impl Entries<'_> {
    /// How iteration finished. `None` until the last record is yielded.
    #[must_use]
    pub fn end(&self) -> Option<StreamEnd> {
        self.end
    }
}

impl Iterator for Entries<'_> {
    type Item = Entry;

    fn next(&mut self) -> Option<Entry> {
        if self.end.is_some() {
            return None;
        }
        if self.pos >= self.payload.len() {
            self.end = Some(StreamEnd::Exhausted);
            return None;
        }

        match RecordFrame::read_at(self.payload, self.pos) {
            Ok((frame, consumed)) => {
                let position = self.pos as u64;
                #[allow(clippy::cast_possible_truncation)]
                let name_len = frame.name.len() as u16;
                self.pos += consumed;

                let (record, encoding) = frame.into_record();
                Some(Entry {
                    position,
                    name_len,
                    encoding,
                    record,
                })
            }
            Err(WireError::UnexpectedEof {
                field,
                offset,
                needed,
                available,
            }) => {
                self.end = Some(StreamEnd::Truncated {
                    at: offset as u64,
                    field,
                    needed,
                    available,
                });
                None
            }
            // read_at only reports short input; treat anything else as the end.
            Err(_) => {
                self.end = Some(StreamEnd::Exhausted);
                None
            }
        }
    }
}
