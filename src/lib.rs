//! # doc2txt
//!
//! Extract plain text from PDF, image and DOCX uploads.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF    stage to temp file ─► render pages (pdfium) ─► OCR each page (Tesseract)
//!        ─► sort by page ─► "--- PAGE N ---\n<text>" blocks joined by "\n"
//! image  decode (image crate) ─► OCR
//! DOCX   parse (docx-rs) ─► paragraph and table text, one block per line
//! ```
//!
//! All engine calls are blocking and run on a bounded
//! [`WorkerPool`](pool::WorkerPool). A request either yields the complete
//! text or fails with a single [`ExtractError`]; there are no partial
//! results and no retries.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use doc2txt::{ExtractionConfig, ExtractionPipeline};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pipeline = ExtractionPipeline::from_config(ExtractionConfig::default());
//!     let artifact = pipeline.extract_file("scan.pdf", None).await?;
//!     println!("{}", artifact.text());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `doc2txt` binary (clap + anyhow + tracing-subscriber + dotenvy) |
//!
//! ## Runtime requirements
//!
//! - `libpdfium` for PDF rendering (working directory, system library path,
//!   or [`ExtractionConfig::pdfium_library`]).
//! - The `tesseract` executable on `PATH` for OCR.
//!
//! DOCX extraction needs neither.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod artifact;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod pool;
pub mod server;
pub mod temp;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use artifact::TextArtifact;
pub use config::{ExtractionConfig, ExtractionConfigBuilder, ServerConfig};
pub use document::{DocumentFormat, SourceDocument};
pub use engine::{DocxTextExtractor, PageRenderer, RenderSession, TextRecognizer};
pub use error::{ErrorKind, ExtractError};
pub use extract::{Engines, ExtractionPipeline};
pub use output::{ExtractedPage, ExtractionResult, PageImage};
pub use temp::{TempResource, TempResourceManager};
