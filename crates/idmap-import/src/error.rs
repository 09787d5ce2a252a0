use idmap_decoder::{DecodeError, StreamEnd};

/// Errors that end an import run.
///
/// Only [`SourceUnavailable`](Self::SourceUnavailable) guarantees that
/// nothing was applied. The others stop a run that is already under way;
/// they carry `applied`, the number of names that reached the sink before
/// the stop. Those names are not rolled back.
///
/// ```text
/// ┌───────────────────┬───────────────────────────────────────────────┐
/// │ Variant           │ Cause                                         │
/// ├───────────────────┼───────────────────────────────────────────────┤
/// │ SourceUnavailable │ Source could not be opened or measured        │
/// │ Read              │ I/O error while reading records               │
/// │ AddressOverflow   │ base + offset does not fit in 64 bits         │
/// │ Truncated         │ Partial tail under TruncationPolicy::Strict   │
/// └───────────────────┴───────────────────────────────────────────────┘
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("cannot open {origin}: {error}")]
    SourceUnavailable {
        origin: String,
        #[source]
        error: std::io::Error,
    },

    #[error("failed reading {origin} after {applied} names: {error}")]
    Read {
        origin: String,
        applied: usize,
        #[source]
        error: DecodeError,
    },

    #[error("address overflow: base {base:#X} + offset {offset:#X} (after {applied} names)")]
    AddressOverflow {
        base: u64,
        offset: u32,
        applied: usize,
    },

    #[error("{origin} ends inside a record ({applied} names applied): {end:?}")]
    Truncated {
        origin: String,
        applied: usize,
        end: StreamEnd,
    },
}

impl ImportError {
    /// Names applied before the run stopped.
    #[must_use]
    pub fn applied(&self) -> usize {
        match self {
            Self::SourceUnavailable { .. } => 0,
            Self::Read { applied, .. }
            | Self::AddressOverflow { applied, .. }
            | Self::Truncated { applied, .. } => *applied,
        }
    }
}
