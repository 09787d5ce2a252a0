/// Implementation of `idmap import`.
///
/// Runs the import pipeline against an in-memory [`SymbolTable`] and
/// prints the resolved table. The host symbol table is the thing a real
/// integration would write to; here the table is the output.
///
/// # Output
///
/// ```text
/// text:  0x140000010  foo
///        0x140000020  bar
///
/// json:  [{"address":"0x140000010","name":"foo"}, ...]
/// ```
///
/// A summary line (`Imported N names.`) is printed on stderr. If the run
/// fails part way, the names applied so far are still written out before
/// the error is returned.
use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write as _};

use anyhow::{Context, Result};
use idmap_import::{
    FileSource, ImportConfig, ImportPipeline, ResolvedName, SymbolTable, TruncationPolicy,
};
use serde::Serialize;
use tracing::info;

use crate::{ImportArgs, OutputFormat};

/// Run the `idmap import` command.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, a read fails, an address
/// overflows, the file is truncated under `--strict`, or the output cannot
/// be written.
pub fn run(args: &ImportArgs) -> Result<()> {
    let config = ImportConfig {
        truncation: if args.strict {
            TruncationPolicy::Strict
        } else {
            TruncationPolicy::Silent
        },
        skip_empty_names: args.skip_empty,
    };

    let mut table = SymbolTable::new();
    let outcome =
        ImportPipeline::new(config).run(FileSource::new(&args.file), args.base, &mut table);

    // Names applied before a failure are printed too.
    if outcome.is_ok() || !table.is_empty() {
        write_table(args, table.entries())?;
    }

    let result = outcome.with_context(|| format!("import of {} failed", args.file.display()))?;

    if result.fallback_names > 0 {
        info!(
            "{} name(s) were not valid UTF-8 and were read as Latin-1",
            result.fallback_names
        );
    }
    eprintln!("Imported {} names.", result.applied_count);
    Ok(())
}

fn write_table(args: &ImportArgs, entries: &[ResolvedName]) -> Result<()> {
    let rendered = match args.format {
        OutputFormat::Text => render_text(entries),
        OutputFormat::Json => render_json(entries)?,
    };

    if let Some(path) = &args.output {
        fs::write(path, rendered.as_bytes())
            .with_context(|| format!("cannot write {}", path.display()))?;
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(rendered.as_bytes())
            .context("cannot write to stdout")?;
    }
    Ok(())
}

/// Parse a base address given as decimal or `0x`-prefixed hex.
///
/// Underscores are allowed as digit separators (`0x1_4000_0000`).
///
/// # Errors
///
/// Returns a message suitable for clap if the value is not a valid `u64`.
pub fn parse_address(s: &str) -> Result<u64, String> {
    let cleaned: String = s.trim().chars().filter(|&c| c != '_').collect();
    let parsed = match cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => cleaned.parse::<u64>(),
    };
    parsed.map_err(|e| format!("invalid address {s:?}: {e}"))
}

// ── Renderers ─────────────────────────────────────────────────────────────────

fn render_text(entries: &[ResolvedName]) -> String {
    entries
        .iter()
        .fold(String::new(), |mut out, e| {
            let _ = writeln!(out, "{:#X}  {}", e.address, e.name);
            out
        })
}

#[derive(Serialize)]
struct JsonEntry<'a> {
    address: String,
    name: &'a str,
}

fn render_json(entries: &[ResolvedName]) -> Result<String> {
    let rows: Vec<JsonEntry<'_>> = entries
        .iter()
        .map(|e| JsonEntry {
            address: format!("{:#X}", e.address),
            name: &e.name,
        })
        .collect();
    let mut out = serde_json::to_string_pretty(&rows).context("cannot serialize table")?;
    out.push('\n');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use idmap_encoder::IdmapEncoder;

    use super::*;

    fn entry(address: u64, name: &str) -> ResolvedName {
        ResolvedName {
            address,
            name: name.to_owned(),
        }
    }

    #[test]
    fn parses_hex_and_decimal_addresses() {
        assert_eq!(parse_address("0x140000000"), Ok(0x1_4000_0000));
        assert_eq!(parse_address("0X1000"), Ok(0x1000));
        assert_eq!(parse_address("0x1_4000_0000"), Ok(0x1_4000_0000));
        assert_eq!(parse_address("4096"), Ok(4096));
    }

    #[test]
    fn rejects_bad_addresses() {
        assert!(parse_address("0xZZ").is_err());
        assert!(parse_address("-1").is_err());
        assert!(parse_address("0x1_0000_0000_0000_0000").is_err());
    }

    #[test]
    fn text_rendering_one_line_per_name() {
        let out = render_text(&[entry(0x1_4000_0010, "foo"), entry(0x1_4000_0020, "")]);
        assert_eq!(out, "0x140000010  foo\n0x140000020  \n");
    }

    fn import_args(file: &std::path::Path, output: &std::path::Path, strict: bool) -> ImportArgs {
        ImportArgs {
            file: file.to_path_buf(),
            base: 0x1_4000_0000,
            strict,
            skip_empty: false,
            format: OutputFormat::Text,
            output: Some(output.to_path_buf()),
        }
    }

    #[test]
    fn writes_table_to_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("game.idmap");
        let output = dir.path().join("table.txt");
        let payload = IdmapEncoder::new()
            .add_name(0x10, "foo")
            .add_name(0x20, "bar")
            .encode()
            .unwrap();
        fs::write(&input, payload).unwrap();

        run(&import_args(&input, &output, false)).unwrap();

        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "0x140000010  foo\n0x140000020  bar\n"
        );
    }

    #[test]
    fn strict_failure_still_writes_applied_names() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("cut.idmap");
        let output = dir.path().join("table.txt");
        let mut payload = IdmapEncoder::new().add_name(0x10, "foo").encode().unwrap();
        payload.extend_from_slice(&[0x20, 0x00]);
        fs::write(&input, payload).unwrap();

        let err = run(&import_args(&input, &output, true)).unwrap_err();

        assert!(format!("{err:#}").contains("import of"));
        assert_eq!(fs::read_to_string(&output).unwrap(), "0x140000010  foo\n");
    }

    #[test]
    fn missing_input_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("table.txt");

        assert!(run(&import_args(&dir.path().join("missing.idmap"), &output, false)).is_err());
        assert!(!output.exists());
    }

    #[test]
    fn json_rendering_uses_hex_strings() {
        let out = render_json(&[entry(0x10, "a\"b")]).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed[0]["address"], "0x10");
        assert_eq!(parsed[0]["name"], "a\"b");
    }
}
