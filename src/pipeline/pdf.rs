//! PDF → page images → OCR → `--- PAGE N ---` text.
//!
//! The upload is staged to a `.pdf` temp file because pdfium opens documents
//! by path. A single render job walks the pages in order and pushes each
//! raster into a bounded channel; the async side pulls from it and spawns one
//! recognition task per page, never holding more than `page_concurrency`
//! of them. A full channel blocks the renderer, so at most
//! `2 × page_concurrency` page bitmaps are alive for one request.
//!
//! On the first recognition error the channel is closed, the renderer stops
//! at its next send, outstanding recognitions are drained, and the error is
//! returned. The staged PDF is removed only after the renderer has finished
//! with it.

use crate::engine::{PageRenderer, RenderSession, TextRecognizer};
use crate::error::ExtractError;
use crate::extract::ExtractionPipeline;
use crate::output::{ExtractedPage, ExtractionResult, PageImage};
use crate::pool::WorkerPool;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

pub(crate) async fn run(
    pipeline: &ExtractionPipeline,
    bytes: &[u8],
) -> Result<ExtractionResult, ExtractError> {
    let staged = pipeline.temp.stage(".pdf", bytes)?;
    let pdf_path = staged.path().to_path_buf();
    let page_concurrency = pipeline.config.page_concurrency.max(1);

    let (tx, rx) = mpsc::channel::<PageImage>(page_concurrency);

    let renderer = Arc::clone(&pipeline.renderer);
    let render = pipeline
        .pool
        .render(move || render_pages(renderer.as_ref(), &pdf_path, tx));
    let recognise = recognise_pages(
        pipeline.pool.clone(),
        Arc::clone(&pipeline.recognizer),
        rx,
        page_concurrency,
    );

    let (rendered, recognised) = tokio::join!(render, recognise);
    let total = rendered?;
    let pages = recognised?;

    staged.release()?;

    let result = ExtractionResult::from_pages(pages);
    check_complete(&result, total)?;
    info!("PDF extraction complete: {} pages", total);
    Ok(result)
}

/// Blocking: open the document and send every page, in order, into `tx`.
///
/// Returns the document's page count. Stops early without error when the
/// receiver has gone away.
fn render_pages(
    renderer: &dyn PageRenderer,
    pdf: &Path,
    tx: mpsc::Sender<PageImage>,
) -> Result<usize, ExtractError> {
    let mut total = 0;
    renderer.with_document(pdf, &mut |doc: &dyn RenderSession| {
        total = doc.page_count();
        for index in 0..total {
            let image = doc.render(index)?;
            if tx.blocking_send(PageImage::new(index, image)).is_err() {
                debug!("Recognition stopped; rendering abandoned at page {}", index + 1);
                break;
            }
        }
        Ok(())
    })?;
    Ok(total)
}

async fn recognise_pages(
    pool: WorkerPool,
    recognizer: Arc<dyn TextRecognizer>,
    mut rx: mpsc::Receiver<PageImage>,
    limit: usize,
) -> Result<Vec<ExtractedPage>, ExtractError> {
    let mut in_flight: JoinSet<Result<ExtractedPage, ExtractError>> = JoinSet::new();
    let mut pages = Vec::new();
    let mut rendering = true;
    let mut failure: Option<ExtractError> = None;

    loop {
        tokio::select! {
            next = rx.recv(), if rendering && failure.is_none() && in_flight.len() < limit => {
                match next {
                    Some(page) => {
                        in_flight.spawn(recognise_page(pool.clone(), Arc::clone(&recognizer), page));
                    }
                    None => rendering = false,
                }
            }
            Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                let outcome = joined.unwrap_or_else(|e| {
                    Err(ExtractError::Internal(format!("recognition task failed: {e}")))
                });
                match outcome {
                    Ok(page) => pages.push(page),
                    Err(e) if failure.is_none() => {
                        warn!("Aborting PDF extraction: {}", e);
                        rx.close();
                        failure = Some(e);
                    }
                    Err(e) => debug!("Further recognition error ignored: {}", e),
                }
            }
            else => break,
        }
    }

    match failure {
        Some(e) => Err(e),
        None => Ok(pages),
    }
}

async fn recognise_page(
    pool: WorkerPool,
    recognizer: Arc<dyn TextRecognizer>,
    page: PageImage,
) -> Result<ExtractedPage, ExtractError> {
    let page_num = page.page_num();
    let text = pool
        .engine(move || recognizer.recognize(&page.image))
        .await
        .map_err(|e| e.on_page(page_num))?;
    debug!("Page {}: {} chars recognised", page_num, text.len());
    Ok(ExtractedPage { page_num, text })
}

/// Every page `1..=total` must be present exactly once.
fn check_complete(result: &ExtractionResult, total: usize) -> Result<(), ExtractError> {
    let ExtractionResult::Pages { pages } = result else {
        return Err(ExtractError::Internal("PDF flow produced no pages".into()));
    };
    let complete = pages.len() == total
        && pages
            .iter()
            .enumerate()
            .all(|(i, page)| page.page_num == i + 1);
    if complete {
        Ok(())
    } else {
        Err(ExtractError::Internal(format!(
            "document has {} pages but {} were recognised",
            total,
            pages.len()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(nums: &[usize]) -> ExtractionResult {
        ExtractionResult::from_pages(
            nums.iter()
                .map(|&n| ExtractedPage {
                    page_num: n,
                    text: format!("p{n}"),
                })
                .collect(),
        )
    }

    #[test]
    fn complete_set_passes() {
        assert!(check_complete(&pages(&[3, 1, 2]), 3).is_ok());
        assert!(check_complete(&pages(&[]), 0).is_ok());
    }

    #[test]
    fn missing_or_duplicate_pages_fail() {
        assert!(check_complete(&pages(&[1, 2]), 3).is_err());
        assert!(check_complete(&pages(&[1, 1, 2]), 3).is_err());
        assert!(check_complete(&pages(&[2, 3]), 2).is_err());
    }
}
