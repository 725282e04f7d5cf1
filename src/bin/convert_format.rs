//! convert-format
//!
//! Copies every record from one store into a new store of any backend.
//!
//! ```text
//! convert-format INPUT_TYPE INPUT_PATH OUTPUT_TYPE OUTPUT_PATH
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use datumstore::{convert, open_store, BackendKind, Config, Mode, StoreError};
use tracing_subscriber::{fmt, EnvFilter};

/// Convert an input format to another.
/// Supported formats are leveldb, lmdb and datumfile.
#[derive(Parser, Debug)]
#[command(name = "convert-format")]
#[command(version)]
struct Args {
    /// Input backend (leveldb, lmdb, datumfile)
    input_type: String,

    /// Input store location (must exist)
    input_path: PathBuf,

    /// Output backend (leveldb, lmdb, datumfile)
    output_type: String,

    /// Output store location (must not exist)
    output_path: PathBuf,

    /// Fail if the input ends in a truncated or oversized record
    #[arg(long)]
    strict: bool,

    /// Largest readable record in MiB
    #[arg(long, default_value = "100")]
    max_entry_mb: u64,

    /// fsync the output on commit
    #[arg(long)]
    sync: bool,
}

/// Exit status when a backend is not recognized or not compiled in
const EXIT_UNUSABLE_BACKEND: u8 = 2;
/// Exit status when `--strict` and the input was not read to a clean end
const EXIT_INCOMPLETE: u8 = 3;

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,datumstore=debug"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    // Resolve both backends before touching the filesystem
    let (input_kind, output_kind) = match resolve(&args.input_type, &args.output_type) {
        Ok(kinds) => kinds,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::from(EXIT_UNUSABLE_BACKEND);
        }
    };

    match run(&args, input_kind, output_kind) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(EXIT_INCOMPLETE),
        Err(e) => {
            tracing::error!("Conversion failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn resolve(input: &str, output: &str) -> Result<(BackendKind, BackendKind), StoreError> {
    let kinds: (BackendKind, BackendKind) = (input.parse()?, output.parse()?);
    for kind in [kinds.0, kinds.1] {
        if !kind.is_available() {
            return Err(StoreError::BackendUnavailable(kind));
        }
    }
    Ok(kinds)
}

/// Returns false when `--strict` rejects an incomplete read
fn run(args: &Args, input_kind: BackendKind, output_kind: BackendKind) -> Result<bool, StoreError> {
    let config = Config::builder()
        .max_entry_size(args.max_entry_mb * 1024 * 1024)
        .sync_on_commit(args.sync)
        .build()?;

    tracing::info!(
        "Converting {} {} -> {} {}",
        input_kind,
        args.input_path.display(),
        output_kind,
        args.output_path.display()
    );

    let mut input = open_store(input_kind, &args.input_path, Mode::Read, &config)?;
    let mut cursor = input.new_cursor()?;

    let mut output = open_store(output_kind, &args.output_path, Mode::New, &config)?;
    let summary = {
        let mut txn = output.new_transaction()?;
        convert(&mut cursor, &mut txn)?
    };
    output.close()?;
    input.close()?;

    tracing::info!("Copied {} records ({} bytes)", summary.records, summary.bytes);

    if let Some(reason) = summary.stop_reason.filter(|r| !r.is_clean()) {
        tracing::warn!("Input ended early: {}", reason);
        if args.strict {
            return Ok(false);
        }
    }
    Ok(true)
}
