//! Intermediate and final values produced by the pipeline.

use image::DynamicImage;

/// A rasterised PDF page waiting for recognition.
///
/// Lives only as long as that page's recognition step.
pub struct PageImage {
    /// 0-based page index in the source document.
    pub index: usize,
    pub image: DynamicImage,
}

impl PageImage {
    pub fn new(index: usize, image: DynamicImage) -> Self {
        Self { index, image }
    }

    /// 1-based page number for logs and markers.
    pub fn page_num(&self) -> usize {
        self.index + 1
    }
}

/// Recognised text for one PDF page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPage {
    /// 1-based page number.
    pub page_num: usize,
    pub text: String,
}

impl ExtractedPage {
    /// Build from a 0-based page index.
    pub fn from_index(index: usize, text: impl Into<String>) -> Self {
        Self {
            page_num: index + 1,
            text: text.into(),
        }
    }

    /// The labelled block this page contributes to the joined output.
    pub fn render_block(&self) -> String {
        format!("--- PAGE {} ---\n{}", self.page_num, self.text)
    }
}

/// Outcome of a successful extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionResult {
    /// PDF output: pages in ascending order, one per source page.
    Pages { pages: Vec<ExtractedPage> },
    /// Image or DOCX output.
    Text { text: String },
}

impl ExtractionResult {
    /// Assemble pages into a result, sorting by page number.
    ///
    /// Recognition may finish out of order; the output contract is source
    /// order, so sorting happens here rather than at collection time.
    pub fn from_pages(mut pages: Vec<ExtractedPage>) -> Self {
        pages.sort_by_key(|p| p.page_num);
        ExtractionResult::Pages { pages }
    }

    /// The final text: page blocks joined with `\n`, or the plain text.
    pub fn text(&self) -> String {
        match self {
            ExtractionResult::Pages { pages } => pages
                .iter()
                .map(ExtractedPage::render_block)
                .collect::<Vec<_>>()
                .join("\n"),
            ExtractionResult::Text { text } => text.clone(),
        }
    }

    /// Number of PDF pages, or `None` for unpaged results.
    pub fn page_count(&self) -> Option<usize> {
        match self {
            ExtractionResult::Pages { pages } => Some(pages.len()),
            ExtractionResult::Text { .. } => None,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            ExtractionResult::Text { text } => text,
            pages => pages.text(),
        }
    }
}
