//! Image → OCR text.

use crate::error::ExtractError;
use crate::extract::ExtractionPipeline;
use crate::output::ExtractionResult;
use image::DynamicImage;
use std::sync::Arc;
use tracing::debug;

pub(crate) async fn run(
    pipeline: &ExtractionPipeline,
    bytes: Vec<u8>,
) -> Result<ExtractionResult, ExtractError> {
    let recognizer = Arc::clone(&pipeline.recognizer);
    let text = pipeline
        .pool
        .engine(move || {
            let image = decode(&bytes)?;
            debug!("Decoded image: {}x{}", image.width(), image.height());
            recognizer.recognize(&image)
        })
        .await?;
    Ok(ExtractionResult::Text { text })
}

/// Decode any format the `image` crate was built with, guessing from the
/// leading magic bytes.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, ExtractError> {
    image::load_from_memory(bytes).map_err(|e| ExtractError::UnsupportedImageFormat {
        detail: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn encoded(format: ImageFormat) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 4, Rgb([10, 20, 30])));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), format).unwrap();
        buf
    }

    #[test]
    fn decodes_png_and_jpeg() {
        for format in [ImageFormat::Png, ImageFormat::Jpeg, ImageFormat::Bmp] {
            let img = decode(&encoded(format)).unwrap();
            assert_eq!((img.width(), img.height()), (8, 4), "{format:?}");
        }
    }

    #[test]
    fn garbage_is_unsupported() {
        let err = decode(b"definitely not pixels").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedImageFormat);
        assert_eq!(decode(&[]).unwrap_err().kind(), ErrorKind::UnsupportedImageFormat);
    }

    #[test]
    fn truncated_png_is_unsupported() {
        let png = encoded(ImageFormat::Png);
        let err = decode(&png[..png.len() / 2]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedImageFormat);
    }
}
