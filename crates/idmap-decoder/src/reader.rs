use std::io::{Read, Seek, SeekFrom};

use idmap_wire::record::RECORD_HEADER_SIZE;
use idmap_wire::{Record, RecordField, RecordHeader, TextEncoding, WireError, decode_text};
use tracing::debug;

use crate::end::{Entry, StreamEnd};
use crate::error::DecodeError;

/// Lazy record decoder over a seekable byte source.
///
/// The source is measured once up front (seek to end, seek back to 0),
/// then read strictly front to back. Records are decoded one at a time
/// as the caller pulls them, so memory use is bounded by the longest
/// name, not the file size.
///
/// ```text
///   new(reader) ── seek End(0) → total_len ── seek Start(0)
///        │
///        ▼
///   ┌───────────┐  pos < total_len   ┌──────────────────────────┐
///   │ Reading   │ ─────────────────▶ │ header (6) → name (N)    │──▶ Record
///   └───────────┘                    └──────────────────────────┘
///        │ pos == total_len               │ short read
///        ▼                                ▼
///   Done(Exhausted)                  Done(Truncated { .. })
/// ```
///
/// A record cut short by the end of the source is not an error. The
/// stream simply ends and [`end`](Self::end) reports where. Only real I/O
/// failures surface as [`DecodeError`].
///
/// # Example
///
/// ```rust
/// use std::io::Cursor;
/// use idmap_decoder::{RecordStream, StreamEnd};
///
/// let bytes = [0x10, 0, 0, 0, 3, 0, b'f', b'o', b'o', 0xAA];
/// let mut stream = RecordStream::new(Cursor::new(bytes)).unwrap();
///
/// let names: Vec<String> = stream.by_ref().map(|r| r.unwrap().name).collect();
/// assert_eq!(names, ["foo"]);
/// assert!(matches!(stream.end(), Some(StreamEnd::Truncated { .. })));
/// ```
pub struct RecordStream<R> {
    reader: R,
    total_len: u64,
    pos: u64,
    state: StreamState,
    end: Option<StreamEnd>,
    fallback_names: usize,
    /// Header scratch buffer, reused across records.
    buf: Vec<u8>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StreamState {
    Reading,
    Done,
}

impl<R: Read + Seek> RecordStream<R> {
    /// Measure `reader` and position it at the start.
    ///
    /// # Errors
    ///
    /// [`DecodeError::Measure`] if either seek fails.
    pub fn new(mut reader: R) -> Result<Self, DecodeError> {
        let total_len = reader.seek(SeekFrom::End(0)).map_err(DecodeError::Measure)?;
        reader.seek(SeekFrom::Start(0)).map_err(DecodeError::Measure)?;
        Ok(Self::with_len(reader, total_len))
    }
}

impl<R: Read> RecordStream<R> {
    /// Wrap a reader whose length is already known.
    ///
    /// The reader must be positioned at the first record. No more than
    /// `total_len` bytes are read from it.
    pub fn with_len(reader: R, total_len: u64) -> Self {
        Self {
            reader,
            total_len,
            pos: 0,
            state: StreamState::Reading,
            end: None,
            fallback_names: 0,
            buf: Vec::with_capacity(RECORD_HEADER_SIZE),
        }
    }

    /// Total source length measured at construction.
    #[must_use]
    pub fn total_len(&self) -> u64 {
        self.total_len
    }

    /// Bytes consumed so far. Always a record boundary.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// How the stream finished, or `None` while records remain (or after
    /// an I/O error).
    #[must_use]
    pub fn end(&self) -> Option<StreamEnd> {
        self.end
    }

    /// Names decoded through the Latin-1 fallback so far.
    #[must_use]
    pub fn fallback_names(&self) -> usize {
        self.fallback_names
    }

    /// Decode the next record along with its position and encoding.
    ///
    /// Returns `None` once the stream has ended, whether by exhaustion,
    /// truncation, or a previous error.
    pub fn next_entry(&mut self) -> Option<Result<Entry, DecodeError>> {
        if self.state == StreamState::Done {
            return None;
        }

        match self.read_entry() {
            Ok(Some(entry)) => Some(Ok(entry)),
            Ok(None) => {
                self.state = StreamState::Done;
                None
            }
            Err(e) => {
                self.state = StreamState::Done;
                Some(Err(e))
            }
        }
    }

    fn read_entry(&mut self) -> Result<Option<Entry>, DecodeError> {
        if self.pos >= self.total_len {
            self.end = Some(StreamEnd::Exhausted);
            return Ok(None);
        }

        let start = self.pos;

        // 1 + 2: offset and name_len, read together. A short read is split
        // back into the field it fell in by RecordHeader::read_from.
        let mut header_buf = std::mem::take(&mut self.buf);
        header_buf.clear();
        self.read_up_to(&mut header_buf, RECORD_HEADER_SIZE, start)?;
        let header = RecordHeader::read_from(&header_buf);
        self.buf = header_buf;

        let header = match header {
            Ok(h) => h,
            Err(WireError::UnexpectedEof {
                field,
                needed,
                available,
                ..
            }) => {
                return Ok(self.truncated(start, field, needed, available));
            }
            Err(other) => return Err(other.into()),
        };

        // 3: name bytes
        let name_len = usize::from(header.name_len);
        let mut name = Vec::with_capacity(name_len);
        self.read_up_to(&mut name, name_len, start)?;
        if name.len() < name_len {
            return Ok(self.truncated(start, RecordField::NameBytes, name_len, name.len()));
        }

        // 4: text decoding never fails
        let decoded = decode_text(name);
        let encoding = decoded.encoding();
        if encoding == TextEncoding::Latin1 {
            self.fallback_names += 1;
            debug!(position = start, "name is not UTF-8, decoded as Latin-1");
        }

        Ok(Some(Entry {
            position: start,
            name_len: header.name_len,
            encoding,
            record: Record {
                offset: header.offset,
                name: decoded.into_string(),
            },
        }))
    }

    /// Append up to `n` bytes to `buf`, never reading past `total_len`.
    fn read_up_to(&mut self, buf: &mut Vec<u8>, n: usize, record_start: u64) -> Result<(), DecodeError> {
        let remaining = self.total_len.saturating_sub(self.pos);
        let limit = remaining.min(n as u64);

        let read = (&mut self.reader)
            .take(limit)
            .read_to_end(buf)
            .map_err(|source| DecodeError::Read {
                offset: record_start,
                source,
            })?;
        self.pos += read as u64;
        Ok(())
    }

    fn truncated(
        &mut self,
        at: u64,
        field: RecordField,
        needed: usize,
        available: usize,
    ) -> Option<Entry> {
        debug!(at, %field, needed, available, "record truncated at end of source");
        self.end = Some(StreamEnd::Truncated {
            at,
            field,
            needed,
            available,
        });
        None
    }
}

impl<R: Read> Iterator for RecordStream<R> {
    type Item = Result<Record, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_entry().map(|r| r.map(|entry| entry.record))
    }
}
