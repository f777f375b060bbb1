//! DOCX → plain text. No rendering and no OCR.

use crate::error::ExtractError;
use crate::extract::ExtractionPipeline;
use crate::output::ExtractionResult;
use std::sync::Arc;
use tracing::debug;

pub(crate) async fn run(
    pipeline: &ExtractionPipeline,
    bytes: Vec<u8>,
) -> Result<ExtractionResult, ExtractError> {
    let extractor = Arc::clone(&pipeline.docx);
    let text = pipeline
        .pool
        .engine(move || extractor.extract_text(&bytes))
        .await?;
    debug!("DOCX extracted: {} chars", text.len());
    Ok(ExtractionResult::Text { text })
}
