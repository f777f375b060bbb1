//! Capability interfaces for the external engines the pipeline drives.
//!
//! Each trait exposes exactly one capability and is object-safe, so the
//! pipeline holds `Arc<dyn …>` handles and tests can substitute stubs:
//!
//! | Trait | Capability | Production impl |
//! |-------|------------|-----------------|
//! | [`TextRecognizer`]    | raster → text             | [`ocr::TesseractRecognizer`] |
//! | [`PageRenderer`]      | PDF page → raster          | [`render::PdfiumRenderer`] |
//! | [`DocxTextExtractor`] | DOCX bytes → text          | [`docx::DocxRsExtractor`] |
//!
//! All methods are blocking. Callers run them through
//! [`crate::pool::WorkerPool`].

pub mod docx;
pub mod ocr;
pub mod render;

use crate::error::ExtractError;
use image::DynamicImage;
use std::path::Path;

pub use docx::DocxRsExtractor;
pub use ocr::TesseractRecognizer;
pub use render::PdfiumRenderer;

/// Optical character recognition over a single raster image.
pub trait TextRecognizer: Send + Sync {
    /// Recognise the visible text in `image` using engine defaults.
    ///
    /// A blank image yields `Ok("")`. Engine errors surface as
    /// [`ExtractError::RecognitionFailure`].
    fn recognize(&self, image: &DynamicImage) -> Result<String, ExtractError>;
}

/// An opened PDF document that can rasterise its pages.
pub trait RenderSession {
    fn page_count(&self) -> usize;

    /// Render the 0-based `page_index` at the engine's default resolution.
    fn render(&self, page_index: usize) -> Result<DynamicImage, ExtractError>;
}

/// PDF rasterisation.
///
/// pdfium documents borrow the library binding that opened them, so rather
/// than returning a document the renderer lends one to `visit` for the
/// duration of the call.
pub trait PageRenderer: Send + Sync {
    /// Open the PDF at `pdf` and hand it to `visit`.
    ///
    /// Fails with [`ExtractError::DocumentParse`] when the file is not a
    /// readable PDF.
    fn with_document(
        &self,
        pdf: &Path,
        visit: &mut dyn FnMut(&dyn RenderSession) -> Result<(), ExtractError>,
    ) -> Result<(), ExtractError>;
}

/// Visible-text extraction from a DOCX container.
pub trait DocxTextExtractor: Send + Sync {
    /// Return paragraph and table text in document order.
    ///
    /// Must be a pure function of `bytes`.
    fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractError>;
}
