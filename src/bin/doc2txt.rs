//! CLI binary for doc2txt.
//!
//! `doc2txt serve` runs the HTTP service; `doc2txt extract` converts one
//! local file. Both map their flags onto the library's config types.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use doc2txt::{DocumentFormat, ExtractionConfig, ExtractionPipeline, ServerConfig};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Extract plain text from PDF, image and DOCX files.
#[derive(Parser, Debug)]
#[command(
    name = "doc2txt",
    version,
    about = "Extract plain text from PDF, image and DOCX files",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose logging (debug level).
    #[arg(short, long, global = true, env = "DOC2TXT_VERBOSE")]
    verbose: bool,

    /// Only log errors.
    #[arg(short, long, global = true, env = "DOC2TXT_QUIET", conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP extraction service.
    Serve(ServeArgs),
    /// Extract text from a single local file.
    Extract(ExtractArgs),
}

#[derive(Args, Debug)]
struct EngineArgs {
    /// Pages of one PDF in flight between rendering and OCR.
    #[arg(long, env = "DOC2TXT_PAGE_CONCURRENCY", default_value_t = 4)]
    page_concurrency: usize,

    /// Concurrent PDF rasterisation jobs.
    #[arg(long, env = "DOC2TXT_RENDER_WORKERS", default_value_t = 1)]
    render_workers: usize,

    /// Concurrent OCR / decode / DOCX jobs [default: available CPUs].
    #[arg(long, env = "DOC2TXT_ENGINE_WORKERS")]
    engine_workers: Option<usize>,

    /// Directory for temporary files [default: OS temp dir].
    #[arg(long, env = "DOC2TXT_TEMP_DIR")]
    temp_dir: Option<PathBuf>,

    /// Path to libpdfium, or the directory containing it.
    #[arg(long, env = "DOC2TXT_PDFIUM_LIB")]
    pdfium_lib: Option<PathBuf>,
}

impl EngineArgs {
    fn to_config(&self) -> Result<ExtractionConfig> {
        let mut builder = ExtractionConfig::builder()
            .page_concurrency(self.page_concurrency)
            .render_workers(self.render_workers);
        if let Some(n) = self.engine_workers {
            builder = builder.engine_workers(n);
        }
        if let Some(ref dir) = self.temp_dir {
            builder = builder.temp_dir(dir);
        }
        if let Some(ref lib) = self.pdfium_lib {
            builder = builder.pdfium_library(lib);
        }
        builder.build().context("Invalid engine configuration")
    }
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Interface to bind.
    #[arg(long, env = "DOC2TXT_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on.
    #[arg(short, long, env = "DOC2TXT_PORT", default_value_t = 8000)]
    port: u16,

    /// Largest accepted upload, in MiB.
    #[arg(long, env = "DOC2TXT_MAX_UPLOAD_MB", default_value_t = 50)]
    max_upload_mb: usize,

    #[command(flatten)]
    engine: EngineArgs,
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// File to extract.
    input: PathBuf,

    /// Document format [default: from the file extension].
    #[arg(short, long)]
    format: Option<DocumentFormat>,

    /// Write the text to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    engine: EngineArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Serve(args) => serve(args).await,
        Command::Extract(args) => extract(args).await,
    }
}

async fn serve(args: ServeArgs) -> Result<()> {
    let pipeline = ExtractionPipeline::from_config(args.engine.to_config()?);
    let server = ServerConfig {
        host: args.host,
        port: args.port,
        max_upload_bytes: args.max_upload_mb.saturating_mul(1024 * 1024),
    };
    info!(
        "Starting doc2txt {} (max upload {} MiB)",
        env!("CARGO_PKG_VERSION"),
        args.max_upload_mb
    );
    doc2txt::server::run(pipeline, server)
        .await
        .context("HTTP server failed")
}

async fn extract(args: ExtractArgs) -> Result<()> {
    let pipeline = ExtractionPipeline::from_config(args.engine.to_config()?);
    let artifact = pipeline
        .extract_file(&args.input, args.format)
        .await
        .with_context(|| format!("Failed to extract '{}'", args.input.display()))?;

    match args.output {
        Some(path) => {
            artifact
                .write_to(&path)
                .await
                .with_context(|| format!("Failed to write '{}'", path.display()))?;
            info!("Wrote {} bytes to {}", artifact.len(), path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(artifact.content())?;
            stdout.write_all(b"\n")?;
            stdout.flush()?;
        }
    }
    Ok(())
}
