/// Errors that can end a record stream early.
///
/// Truncated input is not in this list: a record cut short by the end of
/// the source ends the stream normally and is reported through
/// [`StreamEnd::Truncated`](crate::StreamEnd::Truncated) instead.
///
/// ```text
///   DecodeError
///   ├── Measure   ← seeking to the end (or back) of the source failed
///   ├── Read      ← the source returned an I/O error mid-stream
///   └── Wire      ← record layer error other than short input
/// ```
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The source's total length could not be determined.
    ///
    /// Raised before any record is read, so nothing has been decoded.
    #[error("cannot measure source length: {0}")]
    Measure(#[source] std::io::Error),

    /// A read failed after decoding had started.
    ///
    /// `offset` is the start of the record that was being read.
    #[error("read failed in record at offset {offset}: {source}")]
    Read {
        offset: u64,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Wire(#[from] idmap_wire::WireError),
}
