//! Tesseract OCR adapter.
//!
//! `rusty-tesseract` drives the `tesseract` executable and exchanges images
//! through the file system, so each recognition stages the raster as a PNG
//! [`TempResource`](crate::temp::TempResource) that is removed as soon as the
//! call returns. The engine runs with English language data and its own
//! segmentation defaults. No resolution hint is passed and no preprocessing
//! is applied.

use super::TextRecognizer;
use crate::error::ExtractError;
use crate::temp::TempResourceManager;
use image::{DynamicImage, ImageFormat};
use rusty_tesseract::{Args, Image};
use std::io::Cursor;
use tracing::debug;

/// [`TextRecognizer`] backed by the Tesseract command-line engine.
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    temp: TempResourceManager,
}

impl TesseractRecognizer {
    pub fn new(temp: TempResourceManager) -> Self {
        Self { temp }
    }

    /// Whether the `tesseract` executable can be run.
    pub fn is_available() -> bool {
        rusty_tesseract::get_tesseract_version().is_ok()
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(&self, image: &DynamicImage) -> Result<String, ExtractError> {
        let png = encode_png(image)?;
        let staged = self.temp.stage(".png", &png)?;

        let input = Image::from_path(staged.path().to_path_buf()).map_err(|e| {
            ExtractError::RecognitionFailure {
                page: None,
                detail: format!("tesseract rejected staged image: {e}"),
            }
        })?;

        let raw = rusty_tesseract::image_to_string(&input, &engine_args()).map_err(|e| {
            ExtractError::RecognitionFailure {
                page: None,
                detail: e.to_string(),
            }
        })?;

        staged.release()?;

        let text = normalize_engine_output(&raw);
        debug!(
            "Recognised {}x{} image → {} chars",
            image.width(),
            image.height(),
            text.len()
        );
        Ok(text)
    }
}

/// `Args::default()` pins `--dpi 150`. Leave it unset so Tesseract reads the
/// resolution from the image or estimates it.
fn engine_args() -> Args {
    Args {
        dpi: None,
        ..Args::default()
    }
}

fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, ExtractError> {
    let mut buf = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| ExtractError::RecognitionFailure {
            page: None,
            detail: format!("could not encode raster for the engine: {e}"),
        })?;
    Ok(buf)
}

/// Drop the trailing newline and form feed Tesseract appends after the last
/// line. A blank page therefore comes back as `""`.
fn normalize_engine_output(raw: &str) -> String {
    raw.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn png_encoding_round_trips_dimensions() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(17, 9, Rgb([255, 255, 255])));
        let png = encode_png(&img).unwrap();
        assert_eq!(&png[1..4], b"PNG");
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (17, 9));
    }

    #[test]
    fn engine_args_leave_resolution_to_tesseract() {
        let args = engine_args();
        assert!(args.dpi.is_none());
        assert_eq!(args.lang, "eng");
        assert!(args.config_variables.is_empty());
    }

    #[test]
    fn engine_padding_is_stripped() {
        assert_eq!(normalize_engine_output("Hello World\n\x0c"), "Hello World");
        assert_eq!(normalize_engine_output(" \n\x0c"), "");
        assert_eq!(normalize_engine_output(""), "");
        assert_eq!(normalize_engine_output("  indented\nline\n"), "  indented\nline");
    }
}
