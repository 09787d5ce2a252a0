/// Implementation of `idmap inspect`.
///
/// Reads an `.idmap` file and prints one line per record, followed by a
/// footer describing how the file ended.
///
/// # Output format
///
/// ```text
/// Record 0 @0x0000: offset=0x00000010 len=3 utf-8 "foo"
/// Record 1 @0x0009: offset=0x00000020 len=2 latin-1 "fé"
/// ---
/// 2 records, 17 bytes, ends on a record boundary
/// ```
use std::fmt::Write as _;
use std::fs;

use anyhow::{Context, Result};
use idmap_decoder::{Entry, IdmapDecoder, StreamEnd};

use crate::InspectArgs;

/// Run the `idmap inspect` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn run(args: &InspectArgs) -> Result<()> {
    let bytes =
        fs::read(&args.file).with_context(|| format!("cannot read {}", args.file.display()))?;
    print!("{}", render(&bytes, args.limit));
    Ok(())
}

fn render(bytes: &[u8], limit: Option<usize>) -> String {
    let mut out = String::new();
    let mut entries = IdmapDecoder::entries(bytes);
    let mut count = 0usize;

    for entry in entries.by_ref() {
        if limit.is_none_or(|max| count < max) {
            let _ = writeln!(out, "{}", record_line(count, &entry));
        }
        count += 1;
    }

    out.push_str("---\n");
    let _ = writeln!(
        out,
        "{count} record{}, {} bytes, {}",
        if count == 1 { "" } else { "s" },
        bytes.len(),
        end_description(entries.end().unwrap_or(StreamEnd::Exhausted))
    );
    out
}

fn record_line(index: usize, entry: &Entry) -> String {
    format!(
        "Record {index} @{:#06x}: offset={:#010x} len={} {} {:?}",
        entry.position,
        entry.record.offset,
        entry.name_len,
        entry.encoding.label(),
        entry.record.name
    )
}

/// Describes how a file ended, in the form used by `inspect` and `validate`.
pub fn end_description(end: StreamEnd) -> String {
    match end {
        StreamEnd::Exhausted => "ends on a record boundary".to_string(),
        StreamEnd::Truncated {
            at,
            field,
            needed,
            available,
        } => format!(
            "ends inside record at {at:#06x} ({field}: needed {needed}, {available} available; {} trailing bytes ignored)",
            end.trailing_bytes()
        ),
    }
}
