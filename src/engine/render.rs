//! PDF rasterisation via pdfium.
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which keeps
//! global state and is not async-safe; every call here is made from a
//! blocking worker (see [`crate::pool::WorkerPool::render`]). The library is
//! bound per document, so a missing libpdfium surfaces as a request error
//! instead of preventing the service from starting.
//!
//! Pages are rendered at pdfium's natural size (one pixel per PDF point,
//! i.e. 72 DPI) with no DPI override.

use super::{PageRenderer, RenderSession};
use crate::document::DocumentFormat;
use crate::error::ExtractError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// [`PageRenderer`] backed by pdfium.
#[derive(Debug, Clone, Default)]
pub struct PdfiumRenderer {
    library: Option<PathBuf>,
}

impl PdfiumRenderer {
    /// Bind to libpdfium at `library` (a file, or a directory containing the
    /// platform library), or search the working directory and then the
    /// system library path when `None`.
    pub fn new(library: Option<PathBuf>) -> Self {
        Self { library }
    }

    fn bind(&self) -> Result<Pdfium, ExtractError> {
        let unavailable = |e: PdfiumError| ExtractError::EngineUnavailable {
            engine: "pdfium",
            detail: format!("{e:?}"),
        };

        let bindings = match &self.library {
            Some(path) if path.is_dir() => {
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(path))
            }
            Some(path) => Pdfium::bind_to_library(path),
            None => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
                .or_else(|_| Pdfium::bind_to_system_library()),
        }
        .map_err(unavailable)?;

        Ok(Pdfium::new(bindings))
    }
}

impl PageRenderer for PdfiumRenderer {
    fn with_document(
        &self,
        pdf: &Path,
        visit: &mut dyn FnMut(&dyn RenderSession) -> Result<(), ExtractError>,
    ) -> Result<(), ExtractError> {
        let pdfium = self.bind()?;

        let document =
            pdfium
                .load_pdf_from_file(pdf, None)
                .map_err(|e| ExtractError::DocumentParse {
                    format: DocumentFormat::Pdf,
                    detail: format!("{e:?}"),
                })?;

        let session = PdfiumSession {
            document: &document,
            render_config: PdfRenderConfig::new().scale_page_by_factor(1.0),
        };
        info!("PDF loaded: {} pages", session.page_count());

        visit(&session)
    }
}

struct PdfiumSession<'a, 'b> {
    document: &'a PdfDocument<'b>,
    render_config: PdfRenderConfig,
}

impl RenderSession for PdfiumSession<'_, '_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn render(&self, page_index: usize) -> Result<DynamicImage, ExtractError> {
        let failed = |e: PdfiumError| ExtractError::RasterisationFailed {
            page: page_index + 1,
            detail: format!("{e:?}"),
        };

        let index = PdfPageIndex::try_from(page_index).map_err(|_| {
            ExtractError::RasterisationFailed {
                page: page_index + 1,
                detail: "page index exceeds pdfium's range".into(),
            }
        })?;

        let page = self.document.pages().get(index).map_err(failed)?;
        let bitmap = page
            .render_with_config(&self.render_config)
            .map_err(failed)?;

        let image = bitmap.as_image();
        debug!(
            "Rendered page {} → {}x{} px",
            page_index + 1,
            image.width(),
            image.height()
        );

        Ok(image)
    }
}
