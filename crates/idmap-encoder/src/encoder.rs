use idmap_wire::RecordFrame;
use idmap_wire::record::{MAX_NAME_LEN, RECORD_HEADER_SIZE};

use crate::error::EncodeError;

/// Builds `.idmap` payloads.
///
/// Records are appended with [`add_name`](Self::add_name) (UTF-8 text) or
/// [`add_raw`](Self::add_raw) (arbitrary name bytes) and written out in
/// insertion order. Duplicate offsets are kept as-is.
///
/// # Usage
///
/// ```rust
/// use idmap_encoder::IdmapEncoder;
///
/// let payload = IdmapEncoder::new()
///     .add_name(0x10, "foo")
///     .add_name(0x20, "bar")
///     .encode()
///     .unwrap();
///
/// assert_eq!(payload.len(), 2 * (6 + 3));
/// ```
///
/// # Output layout
///
/// ```text
/// ┌───────────┬───────────┬──────────────┬───────────┬─────
/// │ offset u32│ len u16   │ name[len]    │ offset u32│ ...
/// └───────────┴───────────┴──────────────┴───────────┴─────
/// ```
///
/// No header, no trailer. Name length limits are checked at
/// [`encode`](Self::encode) time, not when the record is added, so the
/// builder calls can be chained.
#[derive(Clone, Debug, Default)]
pub struct IdmapEncoder {
    frames: Vec<RecordFrame>,
}

impl IdmapEncoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record whose name is UTF-8 text.
    pub fn add_name(&mut self, offset: u32, name: &str) -> &mut Self {
        self.add_raw(offset, name.as_bytes())
    }

    /// Append a record with raw name bytes.
    ///
    /// The bytes are written verbatim; they do not have to be UTF-8.
    pub fn add_raw(&mut self, offset: u32, name: &[u8]) -> &mut Self {
        self.frames.push(RecordFrame {
            offset,
            name: name.to_vec(),
        });
        self
    }

    /// Number of records added so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Serialize all records into a new buffer.
    ///
    /// An encoder with no records produces an empty payload, which is a
    /// valid `.idmap` file with zero records.
    ///
    /// # Errors
    ///
    /// [`EncodeError::NameTooLong`] if any name exceeds 65535 bytes.
    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        let size = self
            .frames
            .iter()
            .map(|f| RECORD_HEADER_SIZE + f.name.len())
            .sum();
        let mut out = Vec::with_capacity(size);
        self.write_to(&mut out)?;
        Ok(out)
    }

    /// Serialize all records into `w`.
    ///
    /// Name lengths are validated before anything is written, so a
    /// failing call leaves `w` untouched.
    ///
    /// # Returns
    ///
    /// Total number of bytes written.
    ///
    /// # Errors
    ///
    /// - [`EncodeError::NameTooLong`] if any name exceeds 65535 bytes.
    /// - [`EncodeError::Io`] / [`EncodeError::Wire`] if the writer fails.
    pub fn write_to(&self, w: &mut impl std::io::Write) -> Result<usize, EncodeError> {
        self.validate()?;

        let mut written = 0;
        for frame in &self.frames {
            written += frame.write_to(w)?;
        }
        Ok(written)
    }

    fn validate(&self) -> Result<(), EncodeError> {
        match self
            .frames
            .iter()
            .position(|f| f.name.len() > MAX_NAME_LEN)
        {
            Some(index) => Err(EncodeError::NameTooLong {
                index,
                len: self.frames[index].name.len(),
                limit: MAX_NAME_LEN,
            }),
            None => Ok(()),
        }
    }
}
