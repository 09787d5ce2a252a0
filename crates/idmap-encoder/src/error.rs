use idmap_wire::WireError;

/// Errors that can occur while encoding an `.idmap` payload.
///
/// ```text
///   EncodeError
///   ├── NameTooLong        ← a name exceeds the u16 length prefix
///   ├── Wire(WireError)    ← from idmap-wire serialization
///   └── Io(std::io::Error) ← from the output writer
/// ```
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// Record `index` has a name longer than 65535 bytes.
    #[error("name of record {index} is {len} bytes, limit is {limit}")]
    NameTooLong {
        index: usize,
        len: usize,
        limit: usize,
    },

    #[error(transparent)]
    Wire(#[from] WireError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
