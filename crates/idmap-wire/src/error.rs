use crate::record::RecordField;

/// Errors raised by the record layer.
///
/// ```text
///   WireError
///   ├── UnexpectedEof      ← buffer ended inside a record
///   ├── NameTooLong        ← name does not fit the u16 length prefix
///   └── Io(std::io::Error) ← from the underlying writer
/// ```
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// Input ended before `field` could be read in full.
    ///
    /// `offset` is the byte position of the record that was being read,
    /// measured from the start of the input.
    #[error(
        "unexpected end of input in {field} of record at offset {offset}: \
         needed {needed} bytes, {available} available"
    )]
    UnexpectedEof {
        field: RecordField,
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A name is longer than the 16-bit length prefix can describe.
    #[error("name is {len} bytes, limit is {limit}")]
    NameTooLong { len: usize, limit: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
