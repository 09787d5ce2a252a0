/// idmap command-line tool: import, inspect, validate, and build
/// `.idmap` offset→name files.
///
/// # Command overview
///
/// ```text
/// idmap <COMMAND> [OPTIONS]
///
/// Commands:
///   import     Resolve every record against a base address and print the symbol table
///   inspect    Print each record with its position, length and encoding
///   validate   Check that a file ends on a record boundary
///   encode     Create an .idmap file from a JSON manifest
///   help       Print help information
///
/// Global options:
///   -v, --verbose    Debug-level logging on stderr (RUST_LOG overrides)
///   -h, --help       Print help
///   -V, --version    Print version
/// ```
///
/// # Exit codes
///
/// | Code | Meaning                                          |
/// |------|--------------------------------------------------|
/// | 0    | Success                                          |
/// | 1    | Error (unreadable file, truncated under --strict) |
///
/// Logs and errors go to stderr so stdout can be piped cleanly.
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

mod cmd_encode;
mod cmd_import;
mod cmd_inspect;
mod cmd_validate;

// ── CLI root ──────────────────────────────────────────────────────────────────

/// The idmap command-line tool.
#[derive(Parser)]
#[command(name = "idmap", version, about = "Offset-to-symbol map tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,
}

// ── Sub-commands ──────────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum Commands {
    /// Resolve records against a base address and print the symbol table.
    Import(ImportArgs),
    /// Print every record in an .idmap file.
    Inspect(InspectArgs),
    /// Check an .idmap file for a truncated tail.
    Validate(ValidateArgs),
    /// Create an .idmap file from a JSON manifest.
    Encode(EncodeArgs),
}

// ── Argument structs ──────────────────────────────────────────────────────────

/// Arguments for `idmap import`.
///
/// ```text
/// ┌──────────────┬──────────────────────────────────────────────────────┐
/// │ Flag         │ Effect                                               │
/// ├──────────────┼──────────────────────────────────────────────────────┤
/// │ --base ADDR  │ Image base, decimal or 0x-prefixed hex (required)    │
/// │ --strict     │ Fail if the file ends inside a record                │
/// │ --skip-empty │ Do not apply records with an empty name              │
/// │ --format     │ text (default) | json                                │
/// │ -o / --output│ Write the table to a file instead of stdout          │
/// └──────────────┴──────────────────────────────────────────────────────┘
/// ```
#[derive(clap::Args)]
pub struct ImportArgs {
    /// Path to the `.idmap` file.
    pub file: PathBuf,

    /// Address the image was loaded at.
    #[arg(long, value_parser = cmd_import::parse_address)]
    pub base: u64,

    /// Treat a partial trailing record as an error.
    #[arg(long)]
    pub strict: bool,

    /// Skip records whose name is empty.
    #[arg(long)]
    pub skip_empty: bool,

    /// Output format for the resolved table.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write the resolved table to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Arguments for `idmap inspect`.
#[derive(clap::Args)]
pub struct InspectArgs {
    /// Path to the `.idmap` file.
    pub file: PathBuf,

    /// Show at most this many records.
    #[arg(long)]
    pub limit: Option<usize>,
}

/// Arguments for `idmap validate`.
#[derive(clap::Args)]
pub struct ValidateArgs {
    /// Path to the `.idmap` file.
    pub file: PathBuf,
}

/// Arguments for `idmap encode`.
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
#[derive(clap::Args)]
pub struct EncodeArgs {
    /// Path to the JSON manifest.
    pub input: PathBuf,

    /// Output `.idmap` file path.
    #[arg(short, long)]
    pub output: PathBuf,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Import(args) => cmd_import::run(&args),
        Commands::Inspect(args) => cmd_inspect::run(&args),
        Commands::Validate(args) => cmd_validate::run(&args),
        Commands::Encode(args) => cmd_encode::run(&args),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
