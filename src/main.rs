// src/main.rs
mod batch;
mod extractors;
mod sources;
mod storage;
mod utils;

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use storage::{ReportFormat, ReportWriter};
use utils::AppError;

/// Combines credit-bureau JSON reports into one spreadsheet
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Process every matching report in a folder
    Scan {
        /// Folder holding the bureau report files
        #[arg(short, long)]
        input_dir: PathBuf,

        /// File name pattern to pick up
        #[arg(short, long, default_value = sources::DEFAULT_PATTERN)]
        pattern: String,

        #[command(flatten)]
        export: ExportArgs,
    },
    /// Process the given report files
    Files {
        /// Report files to combine
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        export: ExportArgs,
    },
}

const STDOUT_OUTPUT: &str = "-";

#[derive(Args, Debug)]
struct ExportArgs {
    /// Output spreadsheet: .xlsx workbook, .csv, or `-` for CSV on stdout
    #[arg(short, long, default_value = storage::DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Replace the output file if it already exists
    #[arg(short, long)]
    force: bool,

    /// Also write a JSON summary of the run next to the output
    #[arg(short, long)]
    summary: bool,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Parse CLI Arguments
    let cli = Cli::parse();

    // 2. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging(&cli.log_level);
    tracing::info!("Starting processing for args: {:?}", cli.command);

    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    run(cli, &mut stdout.lock(), &mut stderr.lock()).await?;
    Ok(())
}

/// Runs one batch and returns the number of exported rows.
/// Per-file errors of the `files` command go to `err`; `--output -` sends the table to `out`.
async fn run<O: Write, E: Write>(cli: Cli, out: &mut O, err: &mut E) -> Result<usize, AppError> {
    // 3. Collect input paths
    let (paths, export, inline_errors) = match cli.command {
        Command::Scan { input_dir, pattern, export } => {
            (sources::scan_folder(&input_dir, &pattern)?, export, false)
        }
        Command::Files { files, export } => (files, export, true),
    };

    if paths.is_empty() {
        return Err(AppError::NothingToExport(0));
    }

    // 4. Initialize writer before doing any work so bad output paths fail fast
    let to_stdout = export.output == Path::new(STDOUT_OUTPUT);
    let writer = if to_stdout {
        None
    } else {
        Some(ReportWriter::new(&export.output, export.force)?)
    };
    let destination = writer
        .as_ref()
        .map(|w| w.output_path().display().to_string())
        .unwrap_or_else(|| "stdout".to_string());
    tracing::info!("Processing {} files into {}", paths.len(), destination);

    // 5. Load and extract
    let (documents, read_failures) = sources::load_documents(&paths).await;
    let outcome = batch::assemble(&documents).with_failures(read_failures);

    if inline_errors {
        for failure in &outcome.failures {
            writeln!(err, "Failed to read {}: {}", failure.identifier, failure.reason())?;
        }
    }

    if outcome.is_empty() {
        tracing::error!("No documents could be processed; nothing exported");
        return Err(AppError::NothingToExport(paths.len()));
    }

    // 6. Export
    match writer {
        Some(writer) => {
            let path = writer.write_rows(&outcome.rows)?;
            if export.summary {
                writer.write_summary(&outcome)?;
            }
            tracing::info!(
                "Successfully generated report with {} rows at {} ({} failed)",
                outcome.success_count(),
                path.display(),
                outcome.failure_count()
            );
        }
        None => {
            let bytes = storage::render_rows(&outcome.rows, ReportFormat::Csv)?;
            out.write_all(&bytes)?;
            out.flush()?;
            if export.summary {
                tracing::warn!("--summary ignored when writing to stdout");
            }
            tracing::info!(
                "Streamed report with {} rows to stdout ({} failed)",
                outcome.success_count(),
                outcome.failure_count()
            );
        }
    }

    Ok(outcome.success_count())
}
