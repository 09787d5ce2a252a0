use idmap_wire::record::RECORD_HEADER_SIZE;
use idmap_wire::{RecordField, RecordHeader, TextEncoding, WireError, decode_text};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::end::{Entry, StreamEnd};
use crate::error::DecodeError;

/// Asynchronous record decoder. Yields records one at a time from any
/// `AsyncRead` source without buffering the whole file.
///
/// The async source has no length to measure up front, so "end of data"
/// means the reader returned EOF. The record rules are otherwise the same
/// as [`RecordStream`](crate::RecordStream):
///
/// ```text
///   EOF before any byte of a record   → StreamEnd::Exhausted
///   EOF inside a record               → StreamEnd::Truncated { .. }
///   I/O error                         → Err(DecodeError::Read)
/// ```
///
/// # Example
///
/// ```rust,no_run
/// use idmap_decoder::AsyncRecordStream;
/// use tokio::io::AsyncRead;
///
/// async fn names(reader: impl AsyncRead + Unpin) -> Vec<String> {
///     let mut stream = AsyncRecordStream::new(reader);
///     let mut out = Vec::new();
///     while let Some(entry) = stream.next().await {
///         out.push(entry.unwrap().record.name);
///     }
///     out
/// }
/// ```
pub struct AsyncRecordStream<R> {
  reader: R,
  state: StreamState,
  pos: u64,
  end: Option<StreamEnd>,
  /// Header read buffer, reused across records.
  buf: Vec<u8>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StreamState {
  Reading,
  Done,
}

impl<R: AsyncRead + Unpin> AsyncRecordStream<R> {
  #[must_use]
  pub fn new(reader: R) -> Self {
    Self {
      reader,
      state: StreamState::Reading,
      pos: 0,
      end: None,
      buf: Vec::with_capacity(RECORD_HEADER_SIZE),
    }
  }

  /// How the stream finished, once it has.
  #[must_use]
  pub fn end(&self) -> Option<StreamEnd> {
    self.end
  }

  /// Read the next record.
  ///
  /// Returns `Some(Ok(entry))` per record, `None` once the stream has
  /// ended, or `Some(Err(..))` once on an I/O error.
  pub async fn next(&mut self) -> Option<Result<Entry, DecodeError>> {
    if self.state == StreamState::Done {
      return None;
    }

    match self.read_entry().await {
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

  async fn read_entry(&mut self) -> Result<Option<Entry>, DecodeError> {
    let start = self.pos;

    let mut header_buf = std::mem::take(&mut self.buf);
    header_buf.clear();
    self.read_up_to(&mut header_buf, RECORD_HEADER_SIZE, start).await?;

    if header_buf.is_empty() {
      self.buf = header_buf;
      self.end = Some(StreamEnd::Exhausted);
      return Ok(None);
    }

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
        self.end = Some(StreamEnd::Truncated {
          at: start,
          field,
          needed,
          available,
        });
        return Ok(None);
      }
      Err(other) => return Err(other.into()),
    };

    let name_len = usize::from(header.name_len);
    let mut name = Vec::with_capacity(name_len);
    self.read_up_to(&mut name, name_len, start).await?;
    if name.len() < name_len {
      self.end = Some(StreamEnd::Truncated {
        at: start,
        field: RecordField::NameBytes,
        needed: name_len,
        available: name.len(),
      });
      return Ok(None);
    }

    let decoded = decode_text(name);
    let encoding: TextEncoding = decoded.encoding();

    Ok(Some(Entry {
      position: start,
      name_len: header.name_len,
      encoding,
      record: idmap_wire::Record {
        offset: header.offset,
        name: decoded.into_string(),
      },
    }))
  }

  /// Append up to `n` bytes to `buf`, stopping early only at EOF.
  async fn read_up_to(
    &mut self,
    buf: &mut Vec<u8>,
    n: usize,
    record_start: u64,
  ) -> Result<(), DecodeError> {
    let read = (&mut self.reader)
      .take(n as u64)
      .read_to_end(buf)
      .await
      .map_err(|source| DecodeError::Read {
        offset: record_start,
        source,
      })?;
    self.pos += read as u64;
    Ok(())
  }
}
