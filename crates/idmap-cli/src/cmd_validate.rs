/// Implementation of `idmap validate`.
///
/// Decodes the whole file and reports whether it ends on a record
/// boundary. Decoding itself never fails, so "invalid" here means a
/// truncated tail, the only structural defect the format can have.
///
/// # Success output
///
/// ```text
/// ✓ Records: 4 complete records
/// ✓ Encoding: all names are UTF-8
/// ✓ Boundary: ends on a record boundary
/// ```
///
/// # Failure output
///
/// ```text
/// ✓ Records: 1 complete record
/// ! Encoding: 1 name decoded as Latin-1
/// ✗ Boundary: ends inside record at 0x0009 (offset: needed 4, 2 available; 2 trailing bytes ignored)
/// ```
use std::fs;

use anyhow::{Context, Result, anyhow};
use idmap_decoder::{DecodedMap, IdmapDecoder};

use crate::ValidateArgs;
use crate::cmd_inspect::end_description;

/// Run the `idmap validate` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read or ends inside a record.
pub fn run(args: &ValidateArgs) -> Result<()> {
    let bytes =
        fs::read(&args.file).with_context(|| format!("cannot read {}", args.file.display()))?;

    let decoded = IdmapDecoder::decode(&bytes);
    let (report, ok) = report(&decoded);
    print!("{report}");

    if ok {
        Ok(())
    } else {
        Err(anyhow!("validation failed"))
    }
}

fn report(decoded: &DecodedMap) -> (String, bool) {
    let n = decoded.records.len();
    let mut out = format!(
        "✓ Records: {n} complete record{}\n",
        if n == 1 { "" } else { "s" }
    );

    match decoded.fallback_names {
        0 => out.push_str("✓ Encoding: all names are UTF-8\n"),
        k => out.push_str(&format!(
            "! Encoding: {k} name{} decoded as Latin-1\n",
            if k == 1 { "" } else { "s" }
        )),
    }

    let ok = !decoded.end.is_truncated();
    let mark = if ok { '✓' } else { '✗' };
    out.push_str(&format!("{mark} Boundary: {}\n", end_description(decoded.end)));

    (out, ok)
}
