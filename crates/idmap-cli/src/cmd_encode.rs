/// Implementation of `idmap encode`.
///
/// Builds an `.idmap` file from a JSON manifest.
///
/// # Manifest format
///
/// ```json
/// {
///   "symbols": [
///     { "offset": 16, "name": "foo" },
///     { "offset": "0x20", "name": "bar" },
///     { "offset": "0x30", "name_bytes": [102, 233] }
///   ]
/// }
/// ```
///
/// `offset` is a number or a decimal / `0x` hex string and must fit in 32
/// bits. Exactly one of `name` (UTF-8 text) or `name_bytes` (raw bytes,
/// for names that are not UTF-8) must be present.
use std::fs;

use anyhow::{Context, Result, anyhow, bail};
use idmap_encoder::IdmapEncoder;
use tracing::info;

use crate::EncodeArgs;
use crate::cmd_import::parse_address;

// ── Manifest serde types ──────────────────────────────────────────────────────

#[derive(serde::Deserialize)]
struct Manifest {
    symbols: Vec<ManifestSymbol>,
}

#[derive(serde::Deserialize)]
struct ManifestSymbol {
    offset: ManifestOffset,
    name: Option<String>,
    name_bytes: Option<Vec<u8>>,
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum ManifestOffset {
    Number(u64),
    Text(String),
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Run the `idmap encode` command.
///
/// # Errors
///
/// Returns an error if the manifest cannot be read or parsed, an entry is
/// invalid, or the output file cannot be written.
pub fn run(args: &EncodeArgs) -> Result<()> {
    let manifest_src = fs::read_to_string(&args.input)
        .with_context(|| format!("cannot read {}", args.input.display()))?;

    let bytes = encode_manifest(&manifest_src)
        .with_context(|| format!("failed to encode manifest {}", args.input.display()))?;

    fs::write(&args.output, &bytes)
        .with_context(|| format!("cannot write {}", args.output.display()))?;

    info!("Wrote {} bytes to {}", bytes.len(), args.output.display());
    Ok(())
}

fn encode_manifest(src: &str) -> Result<Vec<u8>> {
    let manifest: Manifest = serde_json::from_str(src).context("invalid manifest JSON")?;

    let mut encoder = IdmapEncoder::new();
    for (idx, symbol) in manifest.symbols.iter().enumerate() {
        apply_symbol(&mut encoder, symbol).with_context(|| format!("symbol {idx}"))?;
    }

    encoder.encode().context("IdmapEncoder::encode failed")
}

fn apply_symbol(encoder: &mut IdmapEncoder, symbol: &ManifestSymbol) -> Result<()> {
    let offset = parse_offset(&symbol.offset)?;

    match (&symbol.name, &symbol.name_bytes) {
        (Some(name), None) => {
            encoder.add_name(offset, name);
        }
        (None, Some(bytes)) => {
            encoder.add_raw(offset, bytes);
        }
        (Some(_), Some(_)) => bail!("both `name` and `name_bytes` given"),
        (None, None) => bail!("missing `name` or `name_bytes`"),
    }
    Ok(())
}

fn parse_offset(offset: &ManifestOffset) -> Result<u32> {
    let wide = match offset {
        ManifestOffset::Number(n) => *n,
        ManifestOffset::Text(s) => parse_address(s).map_err(|e| anyhow!(e))?,
    };
    u32::try_from(wide).map_err(|_| anyhow!("offset {wide:#X} does not fit in 32 bits"))
}
