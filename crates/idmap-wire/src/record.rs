use std::fmt;

use crate::error::WireError;
use crate::text::{TextEncoding, decode_text};

/// Size of the little-endian `offset` field.
pub const OFFSET_SIZE: usize = 4;

/// Size of the little-endian `name_len` field.
pub const NAME_LEN_SIZE: usize = 2;

/// Fixed bytes in front of every name.
pub const RECORD_HEADER_SIZE: usize = OFFSET_SIZE + NAME_LEN_SIZE;

/// Longest name a record can carry.
pub const MAX_NAME_LEN: usize = u16::MAX as usize;

/// The three fields of a record, in wire order.
///
/// Used to say which field a truncated input ended in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordField {
    Offset,
    NameLength,
    NameBytes,
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Offset => "offset",
            Self::NameLength => "name length",
            Self::NameBytes => "name bytes",
        })
    }
}

/// The fixed 6-byte prefix of a record.
///
/// ```text
/// ┌────────┬─────────┬──────────────────────────────────────┐
/// │ Offset │ Size    │ Description                          │
/// ├────────┼─────────┼──────────────────────────────────────┤
/// │ 0x00   │ 4 bytes │ offset   (u32 LE, relative to base)  │
/// │ 0x04   │ 2 bytes │ name_len (u16 LE)                    │
/// │ 0x06   │ N bytes │ name bytes, N = name_len             │
/// └────────┴─────────┴──────────────────────────────────────┘
/// ```
///
/// There is no file header, magic number or footer. A file is just these
/// records back to back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordHeader {
    pub offset: u32,
    pub name_len: u16,
}

impl RecordHeader {
    #[must_use]
    pub fn new(offset: u32, name_len: u16) -> Self {
        Self { offset, name_len }
    }

    /// Total bytes the record occupies on the wire, header included.
    #[must_use]
    pub fn record_len(self) -> usize {
        RECORD_HEADER_SIZE + usize::from(self.name_len)
    }

    /// Write the 6-byte prefix into `buf`.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::UnexpectedEof`] if `buf` is shorter than
    /// [`RECORD_HEADER_SIZE`].
    pub fn write_to(&self, buf: &mut [u8]) -> Result<(), WireError> {
        if buf.len() < RECORD_HEADER_SIZE {
            return Err(WireError::UnexpectedEof {
                field: RecordField::Offset,
                offset: 0,
                needed: RECORD_HEADER_SIZE,
                available: buf.len(),
            });
        }

        buf[0..4].copy_from_slice(&self.offset.to_le_bytes());
        buf[4..6].copy_from_slice(&self.name_len.to_le_bytes());
        Ok(())
    }

    /// Parse the 6-byte prefix from the start of `buf`.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::UnexpectedEof`] naming the field that was cut
    /// short: [`RecordField::Offset`] if fewer than 4 bytes are present,
    /// [`RecordField::NameLength`] if fewer than 6.
    pub fn read_from(buf: &[u8]) -> Result<Self, WireError> {
        let Some(offset_bytes) = buf.first_chunk::<OFFSET_SIZE>() else {
            return Err(WireError::UnexpectedEof {
                field: RecordField::Offset,
                offset: 0,
                needed: OFFSET_SIZE,
                available: buf.len(),
            });
        };
        let offset = u32::from_le_bytes(*offset_bytes);

        let rest = &buf[OFFSET_SIZE..];
        let Some(len_bytes) = rest.first_chunk::<NAME_LEN_SIZE>() else {
            return Err(WireError::UnexpectedEof {
                field: RecordField::NameLength,
                offset: 0,
                needed: NAME_LEN_SIZE,
                available: rest.len(),
            });
        };
        let name_len = u16::from_le_bytes(*len_bytes);

        Ok(Self { offset, name_len })
    }
}

/// A decoded record: a name bound to an offset from the image base.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Record {
    pub offset: u32,
    pub name: String,
}

impl Record {
    pub fn new(offset: u32, name: impl Into<String>) -> Self {
        Self {
            offset,
            name: name.into(),
        }
    }
}

/// A record with its name still as raw bytes.
///
/// This is what sits on the wire. Converting it to a [`Record`] runs the
/// UTF-8 / Latin-1 name decoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordFrame {
    pub offset: u32,
    pub name: Vec<u8>,
}

impl RecordFrame {
    /// Write this frame to `w`.
    ///
    /// # Returns
    ///
    /// Total number of bytes written.
    ///
    /// # Errors
    ///
    /// - [`WireError::NameTooLong`] if the name exceeds [`MAX_NAME_LEN`].
    /// - [`WireError::Io`] if the writer fails.
    pub fn write_to(&self, w: &mut impl std::io::Write) -> Result<usize, WireError> {
        let name_len = u16::try_from(self.name.len()).map_err(|_| WireError::NameTooLong {
            len: self.name.len(),
            limit: MAX_NAME_LEN,
        })?;

        let mut header = [0u8; RECORD_HEADER_SIZE];
        RecordHeader::new(self.offset, name_len).write_to(&mut header)?;
        w.write_all(&header)?;
        w.write_all(&self.name)?;

        Ok(RECORD_HEADER_SIZE + self.name.len())
    }

    /// Read one frame starting at `pos` in `payload`.
    ///
    /// # Returns
    ///
    /// The frame and the number of bytes it occupied.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if the payload ends inside the record.
    /// The error's `offset` is `pos`.
    pub fn read_at(payload: &[u8], pos: usize) -> Result<(Self, usize), WireError> {
        let buf = payload.get(pos..).unwrap_or_default();

        let header = RecordHeader::read_from(buf).map_err(|e| match e {
            WireError::UnexpectedEof {
                field,
                needed,
                available,
                ..
            } => WireError::UnexpectedEof {
                field,
                offset: pos,
                needed,
                available,
            },
            other => other,
        })?;

        let name_len = usize::from(header.name_len);
        let body = &buf[RECORD_HEADER_SIZE..];
        let Some(name) = body.get(..name_len) else {
            return Err(WireError::UnexpectedEof {
                field: RecordField::NameBytes,
                offset: pos,
                needed: name_len,
                available: body.len(),
            });
        };

        let frame = Self {
            offset: header.offset,
            name: name.to_vec(),
        };
        Ok((frame, header.record_len()))
    }

    /// Decode the name and produce a [`Record`], keeping track of which
    /// encoding was used.
    #[must_use]
    pub fn into_record(self) -> (Record, TextEncoding) {
        let decoded = decode_text(self.name);
        let encoding = decoded.encoding();
        let record = Record {
            offset: self.offset,
            name: decoded.into_string(),
        };
        (record, encoding)
    }
}
