//! Extraction entry points.
//!
//! [`ExtractionPipeline`] owns the engine handles, the worker pool and the
//! temp-resource manager. It is built once per process and shared across
//! requests (it is cheap to clone). Every method runs one request to
//! completion: it either returns the full text or an error, never a partial
//! result.

use crate::artifact::TextArtifact;
use crate::config::ExtractionConfig;
use crate::document::{DocumentFormat, SourceDocument};
use crate::engine::{
    DocxRsExtractor, DocxTextExtractor, PageRenderer, PdfiumRenderer, TesseractRecognizer,
    TextRecognizer,
};
use crate::error::ExtractError;
use crate::output::ExtractionResult;
use crate::pipeline;
use crate::pool::WorkerPool;
use crate::temp::TempResourceManager;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// The three engine capabilities a pipeline drives.
#[derive(Clone)]
pub struct Engines {
    pub recognizer: Arc<dyn TextRecognizer>,
    pub renderer: Arc<dyn PageRenderer>,
    pub docx: Arc<dyn DocxTextExtractor>,
}

impl Engines {
    pub fn new(
        recognizer: Arc<dyn TextRecognizer>,
        renderer: Arc<dyn PageRenderer>,
        docx: Arc<dyn DocxTextExtractor>,
    ) -> Self {
        Self {
            recognizer,
            renderer,
            docx,
        }
    }

    /// Tesseract, pdfium and docx-rs, wired to `config`.
    pub fn production(config: &ExtractionConfig, temp: &TempResourceManager) -> Self {
        Self::new(
            Arc::new(TesseractRecognizer::new(temp.clone())),
            Arc::new(PdfiumRenderer::new(config.pdfium_library.clone())),
            Arc::new(DocxRsExtractor::new()),
        )
    }
}

/// Shared extraction service.
#[derive(Clone)]
pub struct ExtractionPipeline {
    pub(crate) recognizer: Arc<dyn TextRecognizer>,
    pub(crate) renderer: Arc<dyn PageRenderer>,
    pub(crate) docx: Arc<dyn DocxTextExtractor>,
    pub(crate) pool: WorkerPool,
    pub(crate) temp: TempResourceManager,
    pub(crate) config: ExtractionConfig,
}

impl ExtractionPipeline {
    /// Build a pipeline around caller-supplied engines.
    pub fn new(config: ExtractionConfig, engines: Engines) -> Self {
        let temp = TempResourceManager::new(config.temp_dir.clone());
        Self::with_temp(config, engines, temp)
    }

    /// Build a pipeline backed by the production engines.
    ///
    /// Engines are bound lazily: a missing `tesseract` binary or libpdfium
    /// is reported per request as [`ErrorKind::EngineUnavailable`] or
    /// [`ErrorKind::RecognitionFailure`].
    ///
    /// [`ErrorKind::EngineUnavailable`]: crate::ErrorKind::EngineUnavailable
    /// [`ErrorKind::RecognitionFailure`]: crate::ErrorKind::RecognitionFailure
    pub fn from_config(config: ExtractionConfig) -> Self {
        let temp = TempResourceManager::new(config.temp_dir.clone());
        let engines = Engines::production(&config, &temp);
        Self::with_temp(config, engines, temp)
    }

    fn with_temp(config: ExtractionConfig, engines: Engines, temp: TempResourceManager) -> Self {
        info!(
            "Extraction pipeline: page_concurrency={}, render_workers={}, engine_workers={}, temp_dir={}",
            config.page_concurrency,
            config.render_workers,
            config.engine_workers,
            temp.dir().display()
        );
        Self {
            recognizer: engines.recognizer,
            renderer: engines.renderer,
            docx: engines.docx,
            pool: WorkerPool::new(config.render_workers, config.engine_workers),
            temp,
            config,
        }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// The temp-resource manager used for staged files.
    pub fn temp(&self) -> &TempResourceManager {
        &self.temp
    }

    /// Extract text from `doc`, dispatching on its declared format.
    pub async fn extract(&self, doc: SourceDocument) -> Result<ExtractionResult, ExtractError> {
        let format = doc.format();
        let size = doc.len();
        let start = Instant::now();
        info!("Extracting {} document ({} bytes)", format, size);

        let result = match format {
            DocumentFormat::Pdf => pipeline::pdf::run(self, doc.bytes()).await,
            DocumentFormat::Image => pipeline::image::run(self, doc.into_bytes()).await,
            DocumentFormat::Docx => pipeline::docx::run(self, doc.into_bytes()).await,
        };

        match &result {
            Ok(_) => info!(
                "{} extraction finished in {}ms",
                format,
                start.elapsed().as_millis()
            ),
            Err(e) => error!("{} extraction failed ({}): {}", format, e.kind(), e),
        }
        result
    }

    /// PDF → `--- PAGE N ---` blocks.
    pub async fn extract_pdf(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        self.extract(SourceDocument::new(bytes, DocumentFormat::Pdf))
            .await
            .map(ExtractionResult::into_text)
    }

    /// Image → recognised text.
    pub async fn extract_image(&self, bytes: impl Into<Vec<u8>>) -> Result<String, ExtractError> {
        self.extract(SourceDocument::new(bytes, DocumentFormat::Image))
            .await
            .map(ExtractionResult::into_text)
    }

    /// DOCX → paragraph and table text.
    pub async fn extract_docx(&self, bytes: impl Into<Vec<u8>>) -> Result<String, ExtractError> {
        self.extract(SourceDocument::new(bytes, DocumentFormat::Docx))
            .await
            .map(ExtractionResult::into_text)
    }

    /// Extract and package the text as the downloadable artifact for the
    /// document's format.
    pub async fn extract_to_artifact(
        &self,
        doc: SourceDocument,
    ) -> Result<TextArtifact, ExtractError> {
        let format = doc.format();
        let text = self.extract(doc).await?.into_text();
        Ok(TextArtifact::for_format(text, format))
    }

    /// Read `path` and extract it. The format is inferred from the extension
    /// when `format` is `None`.
    pub async fn extract_file(
        &self,
        path: impl AsRef<Path>,
        format: Option<DocumentFormat>,
    ) -> Result<TextArtifact, ExtractError> {
        let path = path.as_ref();
        let format = format
            .or_else(|| DocumentFormat::from_path(path))
            .ok_or_else(|| ExtractError::UnknownFormat {
                path: path.to_path_buf(),
            })?;

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ExtractError::InputRead {
                path: path.to_path_buf(),
                source,
            })?;

        self.extract_to_artifact(SourceDocument::new(bytes, format))
            .await
    }
}

impl std::fmt::Debug for ExtractionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractionPipeline")
            .field("pool", &self.pool)
            .field("temp", &self.temp)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
