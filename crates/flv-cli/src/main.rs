/// FLV command-line tool: inspect, validate and summarise `.flv` files.
///
/// # Command overview
///
/// ```text
/// flv <COMMAND> [OPTIONS]
///
/// Commands:
///   inspect    Print the header and one line per tag
///   validate   Decode every tag and report the first problem
///   stats      Print per-type counts, sizes and timing
///   help       Print help information
///
/// Global options:
///   -v, --verbose    Log decoder activity to stderr (same as RUST_LOG=debug)
///   -h, --help       Print help
///   -V, --version    Print version
/// ```
///
/// # Exit codes
///
/// | Code | Meaning                                 |
/// |------|-----------------------------------------|
/// | 0    | Success                                 |
/// | 1    | Error (I/O failure, invalid file, etc.) |
///
/// Reports go to stdout; errors and logs go to stderr.
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flv_decoder::{Decoder, DecoderConfig};
use tracing_subscriber::EnvFilter;

mod cmd_inspect;
mod cmd_stats;
mod cmd_validate;

// ── CLI root ──────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "flv", version, about = "FLV stream inspector")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log decoder activity to stderr. `RUST_LOG` takes precedence.
    #[arg(short, long, global = true)]
    verbose: bool,
}

// ── Sub-commands ──────────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum Commands {
    /// Print the file header and a one-line summary of each tag.
    Inspect(InspectArgs),
    /// Decode every tag and fail on the first error.
    Validate(ValidateArgs),
    /// Print tag counts, payload sizes and timestamp range.
    Stats(StatsArgs),
}

// ── Argument structs ──────────────────────────────────────────────────────────

/// Arguments for `flv inspect`.
///
/// ```text
/// ┌─────────────┬────────────────────────────────────────────────────┐
/// │ Flag        │ Effect                                             │
/// ├─────────────┼────────────────────────────────────────────────────┤
/// │ --limit N   │ Stop after N tags                                  │
/// │ --show-data │ Hex dump the first 16 sample bytes of each tag     │
/// └─────────────┴────────────────────────────────────────────────────┘
/// ```
#[derive(clap::Args)]
pub struct InspectArgs {
    /// Path to the `.flv` file to inspect.
    pub file: PathBuf,

    /// Stop after this many tags.
    #[arg(long)]
    pub limit: Option<usize>,

    /// Show the first bytes of each audio/video payload in hex.
    #[arg(long)]
    pub show_data: bool,
}

/// Arguments for `flv validate`.
#[derive(clap::Args)]
pub struct ValidateArgs {
    /// Path to the `.flv` file to validate.
    pub file: PathBuf,

    /// Also require correct previous-tag-size fields and zero stream ids.
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for `flv stats`.
#[derive(clap::Args)]
pub struct StatsArgs {
    /// Path to the `.flv` file to analyse.
    pub file: PathBuf,
}

/// Open `path` and read its FLV header.
pub(crate) fn open(path: &Path, config: DecoderConfig) -> Result<Decoder<BufReader<File>>> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    Decoder::with_config(BufReader::new(file), config)
        .with_context(|| format!("{} is not a readable FLV file", path.display()))
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Inspect(args) => cmd_inspect::run(&args),
        Commands::Validate(args) => cmd_validate::run(&args),
        Commands::Stats(args) => cmd_stats::run(&args),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
