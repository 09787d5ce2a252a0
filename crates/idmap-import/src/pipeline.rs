use idmap_decoder::{DecodeError, RecordStream, StreamEnd};
use idmap_wire::TextEncoding;
use tracing::{debug, info, warn};

use crate::config::{ImportConfig, TruncationPolicy};
use crate::error::ImportError;
use crate::sink::{BaseAddressProvider, NamingSink};
use crate::source::ByteSource;

/// Outcome of a completed import run.
///
/// `applied_count` is the tally the caller normally cares about. The
/// other fields are diagnostics: none of them turn a run into a failure
/// unless [`TruncationPolicy::Strict`] is configured.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImportResult {
    /// Names passed to the sink.
    pub applied_count: usize,
    /// Whether the source ended on a record boundary.
    pub end: StreamEnd,
    /// Applied names that were decoded as Latin-1.
    pub fallback_names: usize,
    /// Records with empty names that were not applied
    /// (`skip_empty_names` only).
    pub skipped_empty: usize,
}

/// Absolute address for `offset` relative to `base`.
///
/// Returns `None` when the sum does not fit in 64 bits.
#[must_use]
pub fn resolve_address(base: u64, offset: u32) -> Option<u64> {
    base.checked_add(u64::from(offset))
}

/// Reads an `.idmap` source and applies every record to a naming sink.
///
/// ```text
///   ByteSource ──open──▶ RecordStream ──Record──▶ base + offset ──▶ NamingSink
///                             │                                        │
///                        StreamEnd                              applied_count
/// ```
///
/// Records are applied one by one in file order as they are decoded.
/// There is no rollback: if the run stops early, every name applied
/// before the stop stays applied.
///
/// # Example
///
/// ```rust
/// use idmap_encoder::IdmapEncoder;
/// use idmap_import::{ImportPipeline, MemorySource, SymbolTable};
///
/// let payload = IdmapEncoder::new()
///     .add_name(0x10, "foo")
///     .add_name(0x20, "bar")
///     .encode()
///     .unwrap();
///
/// let mut table = SymbolTable::new();
/// let result = ImportPipeline::default()
///     .run(MemorySource::new(payload), 0x1_4000_0000, &mut table)
///     .unwrap();
///
/// assert_eq!(result.applied_count, 2);
/// assert_eq!(table.latest(0x1_4000_0010), Some("foo"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ImportPipeline {
    config: ImportConfig,
}

impl ImportPipeline {
    #[must_use]
    pub fn new(config: ImportConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Run an import with the base address taken from `provider`.
    ///
    /// # Errors
    ///
    /// Same as [`run`](Self::run).
    pub fn run_with<S, P, K>(
        &self,
        source: S,
        provider: &P,
        sink: &mut K,
    ) -> Result<ImportResult, ImportError>
    where
        S: ByteSource,
        P: BaseAddressProvider + ?Sized,
        K: NamingSink + ?Sized,
    {
        self.run(source, provider.base_address(), sink)
    }

    /// Decode `source` and apply each record at `base_address + offset`.
    ///
    /// # Errors
    ///
    /// - [`ImportError::SourceUnavailable`] if the source cannot be opened
    ///   or measured. Nothing has been applied.
    /// - [`ImportError::Read`] on an I/O error mid-stream.
    /// - [`ImportError::AddressOverflow`] if `base_address + offset`
    ///   exceeds `u64::MAX`.
    /// - [`ImportError::Truncated`] if the source ends inside a record and
    ///   the policy is [`TruncationPolicy::Strict`].
    pub fn run<S, K>(
        &self,
        source: S,
        base_address: u64,
        sink: &mut K,
    ) -> Result<ImportResult, ImportError>
    where
        S: ByteSource,
        K: NamingSink + ?Sized,
    {
        let origin = source.describe();
        info!(%origin, "processing");
        info!("image base is {base_address:#X}");

        let reader = source
            .open()
            .map_err(|error| ImportError::SourceUnavailable {
                origin: origin.clone(),
                error,
            })?;

        let mut stream = RecordStream::new(reader).map_err(|e| match e {
            DecodeError::Measure(error) => ImportError::SourceUnavailable {
                origin: origin.clone(),
                error,
            },
            error => ImportError::Read {
                origin: origin.clone(),
                applied: 0,
                error,
            },
        })?;
        debug!(total_len = stream.total_len(), "source measured");

        let mut applied_count = 0;
        let mut fallback_names = 0;
        let mut skipped_empty = 0;

        while let Some(entry) = stream.next_entry() {
            let entry = entry.map_err(|error| ImportError::Read {
                origin: origin.clone(),
                applied: applied_count,
                error,
            })?;
            let record = entry.record;

            if self.config.skip_empty_names && record.name.is_empty() {
                skipped_empty += 1;
                continue;
            }

            let address = resolve_address(base_address, record.offset).ok_or_else(|| {
                ImportError::AddressOverflow {
                    base: base_address,
                    offset: record.offset,
                    applied: applied_count,
                }
            })?;

            debug!(
                address = %format_args!("{address:#X}"),
                name = %record.name,
                "apply"
            );
            sink.apply_name(address, &record.name);

            applied_count += 1;
            if entry.encoding == TextEncoding::Latin1 {
                fallback_names += 1;
            }
        }

        let end = stream.end().unwrap_or(StreamEnd::Exhausted);
        if let StreamEnd::Truncated {
            at,
            field,
            needed,
            available,
        } = end
        {
            warn!(
                at,
                %field,
                needed,
                available,
                "source ends inside a record, partial record ignored"
            );
            if self.config.truncation == TruncationPolicy::Strict {
                return Err(ImportError::Truncated {
                    origin,
                    applied: applied_count,
                    end,
                });
            }
        }

        info!("done, imported {applied_count} names");
        Ok(ImportResult {
            applied_count,
            end,
            fallback_names,
            skipped_empty,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Cursor, Read, Seek, SeekFrom, Write as _};

    use idmap_encoder::IdmapEncoder;
    use idmap_wire::RecordField;

    use super::*;
    use crate::sink::{ResolvedName, SymbolTable};
    use crate::source::{FileSource, MemorySource};

    fn resolved(address: u64, name: &str) -> ResolvedName {
        ResolvedName {
            address,
            name: name.to_owned(),
        }
    }

    /// Serves `bytes` normally up to `fail_from`, then errors on every read.
    struct FlakySource {
        bytes: Vec<u8>,
        fail_from: u64,
    }

    struct FlakyReader {
        inner: Cursor<Vec<u8>>,
        fail_from: u64,
    }

    impl Read for FlakyReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let pos = self.inner.position();
            if pos >= self.fail_from {
                return Err(io::Error::other("device went away"));
            }
            let room = usize::try_from(self.fail_from - pos).unwrap_or(usize::MAX);
            let len = buf.len().min(room);
            self.inner.read(&mut buf[..len])
        }
    }

    impl Seek for FlakyReader {
        fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
            self.inner.seek(pos)
        }
    }

    impl ByteSource for FlakySource {
        type Reader = FlakyReader;

        fn open(self) -> io::Result<Self::Reader> {
            Ok(FlakyReader {
                inner: Cursor::new(self.bytes),
                fail_from: self.fail_from,
            })
        }

        fn describe(&self) -> String {
            "flaky".to_owned()
        }
    }

    fn import(payload: Vec<u8>, base: u64) -> (ImportResult, SymbolTable) {
        let mut table = SymbolTable::new();
        let result = ImportPipeline::default()
            .run(MemorySource::new(payload), base, &mut table)
            .unwrap();
        (result, table)
    }

    #[test]
    fn applies_each_record_at_base_plus_offset() {
        let payload = IdmapEncoder::new()
            .add_name(0x10, "foo")
            .add_name(0x20, "bar")
            .encode()
            .unwrap();

        let (result, table) = import(payload, 0x1_4000_0000);
        assert_eq!(result.applied_count, 2);
        assert_eq!(result.end, StreamEnd::Exhausted);
        assert_eq!(
            table.entries(),
            [
                resolved(0x1_4000_0010, "foo"),
                resolved(0x1_4000_0020, "bar")
            ]
        );
    }

    #[test]
    fn truncated_only_record_applies_nothing() {
        // offset 0x20, name_len 5, 3 name bytes, EOF
        let payload = vec![0x20, 0, 0, 0, 5, 0, b'm', b'a', b'i'];
        let (result, table) = import(payload, 0x1000);

        assert_eq!(result.applied_count, 0);
        assert!(table.is_empty());
        assert_eq!(
            result.end,
            StreamEnd::Truncated {
                at: 0,
                field: RecordField::NameBytes,
                needed: 5,
                available: 3,
            }
        );
    }

    #[test]
    fn empty_name_is_applied() {
        let payload = IdmapEncoder::new().add_name(0x40, "").encode().unwrap();
        let (result, table) = import(payload, 0x1000);
        assert_eq!(result.applied_count, 1);
        assert_eq!(table.entries(), [resolved(0x1040, "")]);
    }

    #[test]
    fn empty_name_can_be_skipped() {
        let payload = IdmapEncoder::new()
            .add_name(0x40, "")
            .add_name(0x50, "kept")
            .encode()
            .unwrap();

        let pipeline = ImportPipeline::new(ImportConfig {
            skip_empty_names: true,
            ..ImportConfig::default()
        });
        let mut table = SymbolTable::new();
        let result = pipeline
            .run(MemorySource::new(payload), 0, &mut table)
            .unwrap();

        assert_eq!(result.applied_count, 1);
        assert_eq!(result.skipped_empty, 1);
        assert_eq!(table.entries(), [resolved(0x50, "kept")]);
    }

    #[test]
    fn latin1_names_are_applied_and_counted() {
        let payload = IdmapEncoder::new()
            .add_raw(0x8, &[b'n', 0xE4, b'm'])
            .encode()
            .unwrap();
        let (result, table) = import(payload, 0);

        assert_eq!(result.applied_count, 1);
        assert_eq!(result.fallback_names, 1);
        assert_eq!(table.entries(), [resolved(0x8, "n\u{e4}m")]);
    }

    #[test]
    fn strict_policy_fails_after_applying_complete_records() {
        let mut payload = IdmapEncoder::new().add_name(0x10, "foo").encode().unwrap();
        payload.push(0x01);

        let pipeline = ImportPipeline::new(ImportConfig {
            truncation: TruncationPolicy::Strict,
            ..ImportConfig::default()
        });
        let mut table = SymbolTable::new();
        let err = pipeline
            .run(MemorySource::new(payload), 0x1000, &mut table)
            .unwrap_err();

        assert!(matches!(err, ImportError::Truncated { applied: 1, .. }));
        assert_eq!(err.applied(), 1);
        assert_eq!(table.entries(), [resolved(0x1010, "foo")]);
    }

    #[test]
    fn read_error_mid_stream_keeps_applied_names() {
        let payload = IdmapEncoder::new()
            .add_name(0x10, "foo")
            .add_name(0x20, "bar")
            .encode()
            .unwrap();

        let mut table = SymbolTable::new();
        let err = ImportPipeline::default()
            .run(
                FlakySource {
                    bytes: payload,
                    fail_from: 10,
                },
                0x1000,
                &mut table,
            )
            .unwrap_err();

        assert!(matches!(err, ImportError::Read { applied: 1, .. }));
        assert_eq!(err.applied(), 1);
        assert_eq!(table.entries(), [resolved(0x1010, "foo")]);
    }

    #[test]
    fn missing_file_is_source_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let mut calls = 0;
        let mut sink = |_: u64, _: &str| calls += 1;

        let err = ImportPipeline::default()
            .run(FileSource::new(dir.path().join("missing.idmap")), 0, &mut sink)
            .unwrap_err();

        assert!(matches!(err, ImportError::SourceUnavailable { .. }));
        assert_eq!(err.applied(), 0);
        assert_eq!(calls, 0);
    }

    #[test]
    fn empty_file_is_a_successful_zero() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut table = SymbolTable::new();
        let result = ImportPipeline::default()
            .run(FileSource::new(file.path()), 0, &mut table)
            .unwrap();
        assert_eq!(result.applied_count, 0);
        assert_eq!(result.end, StreamEnd::Exhausted);
    }

    #[test]
    fn reads_records_from_file() {
        let payload = IdmapEncoder::new()
            .add_name(0x100, "GMalloc")
            .add_name(0x200, "GWorld")
            .encode()
            .unwrap();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&payload).unwrap();
        file.flush().unwrap();

        let mut table = SymbolTable::new();
        let result = ImportPipeline::default()
            .run_with(FileSource::new(file.path()), &0x7FF6_0000_0000u64, &mut table)
            .unwrap();

        assert_eq!(result.applied_count, 2);
        assert_eq!(table.latest(0x7FF6_0000_0200), Some("GWorld"));
    }

    #[test]
    fn overflowing_address_stops_the_run() {
        let payload = IdmapEncoder::new()
            .add_name(0, "fits")
            .add_name(1, "overflows")
            .encode()
            .unwrap();

        let mut table = SymbolTable::new();
        let err = ImportPipeline::default()
            .run(MemorySource::new(payload), u64::MAX, &mut table)
            .unwrap_err();

        assert!(matches!(
            err,
            ImportError::AddressOverflow {
                base: u64::MAX,
                offset: 1,
                applied: 1,
            }
        ));
        assert_eq!(table.entries(), [resolved(u64::MAX, "fits")]);
    }

    #[test]
    fn resolve_address_checks_overflow() {
        assert_eq!(resolve_address(0x1000, 0x20), Some(0x1020));
        assert_eq!(resolve_address(u64::MAX, 0), Some(u64::MAX));
        assert_eq!(resolve_address(u64::MAX, 1), None);
    }
}
