use idmap_wire::{Record, RecordField, TextEncoding};

/// How a record stream finished.
///
/// Both variants are normal completion. `Truncated` is a diagnostic only:
/// every complete record before the cut has already been yielded and the
/// partial tail is dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamEnd {
    /// The source ended exactly on a record boundary.
    Exhausted,

    /// The source ended inside the record starting at `at`.
    ///
    /// `needed` and `available` refer to `field` alone, not the whole
    /// record.
    Truncated {
        at: u64,
        field: RecordField,
        needed: usize,
        available: usize,
    },
}

impl StreamEnd {
    #[must_use]
    pub fn is_truncated(self) -> bool {
        matches!(self, Self::Truncated { .. })
    }

    /// Number of stray bytes left after the last complete record.
    #[must_use]
    pub fn trailing_bytes(self) -> usize {
        match self {
            Self::Exhausted => 0,
            Self::Truncated {
                field, available, ..
            } => match field {
                RecordField::Offset => available,
                RecordField::NameLength => idmap_wire::record::OFFSET_SIZE + available,
                RecordField::NameBytes => idmap_wire::record::RECORD_HEADER_SIZE + available,
            },
        }
    }
}

/// A decoded record plus where it came from.
///
/// Iterating a stream yields plain [`Record`]s. `Entry` is for callers
/// that also want the wire position, the raw name length, or to know
/// whether the name needed the Latin-1 fallback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    /// Byte position of the record's first byte.
    pub position: u64,
    /// The `name_len` field as read from the wire.
    pub name_len: u16,
    pub encoding: TextEncoding,
    pub record: Record,
}
