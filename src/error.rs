//! Error types for the doc2txt library.
//!
//! Every failure is terminal for the request that hit it: there are no
//! retries and no partial results. [`ExtractError`] carries the detail for
//! logs and messages, while [`ErrorKind`] is the small, stable taxonomy that
//! callers (the HTTP layer in particular) branch on.

use crate::document::DocumentFormat;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of an [`ExtractError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed PDF/DOCX container, or a PDF page that cannot be rasterised.
    DocumentParseError,
    /// Image bytes could not be decoded.
    UnsupportedImageFormat,
    /// The OCR engine reported an error.
    RecognitionFailure,
    /// Transient storage could not be created or written.
    ResourceAcquisitionFailure,
    /// A required engine (pdfium, tesseract) could not be loaded.
    EngineUnavailable,
    /// Builder validation failed.
    InvalidConfig,
    /// A local input file could not be read or its format inferred.
    InvalidInput,
    /// Bug or worker crash.
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::DocumentParseError => "DocumentParseError",
            ErrorKind::UnsupportedImageFormat => "UnsupportedImageFormat",
            ErrorKind::RecognitionFailure => "RecognitionFailure",
            ErrorKind::ResourceAcquisitionFailure => "ResourceAcquisitionFailure",
            ErrorKind::EngineUnavailable => "EngineUnavailable",
            ErrorKind::InvalidConfig => "InvalidConfig",
            ErrorKind::InvalidInput => "InvalidInput",
            ErrorKind::Internal => "Internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All errors returned by the extraction pipeline.
#[derive(Debug, Error)]
pub enum ExtractError {
    // ── Document errors ───────────────────────────────────────────────────
    /// The PDF or DOCX container could not be opened.
    #[error("{format} document could not be parsed: {detail}")]
    DocumentParse {
        format: DocumentFormat,
        detail: String,
    },

    /// pdfium opened the document but failed on one page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    /// The image decoder rejected the payload.
    #[error("Unsupported or corrupt image: {detail}")]
    UnsupportedImageFormat { detail: String },

    // ── Engine errors ─────────────────────────────────────────────────────
    /// Tesseract returned an error. `page` is 1-based when the image came
    /// from a PDF page.
    #[error("{}", recognition_message(.page, .detail))]
    RecognitionFailure { page: Option<usize>, detail: String },

    /// A native engine could not be located or bound.
    #[error("{engine} is not available: {detail}")]
    EngineUnavailable {
        engine: &'static str,
        detail: String,
    },

    // ── Resource errors ───────────────────────────────────────────────────
    /// Temporary storage could not be created.
    #[error("Failed to create temporary file in '{}': {source}", .dir.display())]
    TempCreate {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Temporary storage was created but could not be written or read back.
    #[error("Temporary file I/O failed for '{}': {source}", .path.display())]
    TempIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The extracted text could not be written to its destination.
    #[error("Failed to write output to '{}': {source}", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Input errors ──────────────────────────────────────────────────────
    /// A local input file could not be read.
    #[error("Failed to read '{}': {source}", .path.display())]
    InputRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No format was given and none could be inferred from the file name.
    #[error("Cannot infer document format from '{}' (expected .pdf, .docx or an image extension)", .path.display())]
    UnknownFormat { path: PathBuf },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

fn recognition_message(page: &Option<usize>, detail: &str) -> String {
    match page {
        Some(p) => format!("Text recognition failed on page {p}: {detail}"),
        None => format!("Text recognition failed: {detail}"),
    }
}

impl ExtractError {
    /// Map this error onto the request-level taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExtractError::DocumentParse { .. } | ExtractError::RasterisationFailed { .. } => {
                ErrorKind::DocumentParseError
            }
            ExtractError::UnsupportedImageFormat { .. } => ErrorKind::UnsupportedImageFormat,
            ExtractError::RecognitionFailure { .. } => ErrorKind::RecognitionFailure,
            ExtractError::TempCreate { .. }
            | ExtractError::TempIo { .. }
            | ExtractError::OutputWrite { .. } => ErrorKind::ResourceAcquisitionFailure,
            ExtractError::InputRead { .. } | ExtractError::UnknownFormat { .. } => {
                ErrorKind::InvalidInput
            }
            ExtractError::EngineUnavailable { .. } => ErrorKind::EngineUnavailable,
            ExtractError::InvalidConfig(_) => ErrorKind::InvalidConfig,
            ExtractError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Attach a 1-based page number to a recognition failure that lacks one.
    pub(crate) fn on_page(self, page: usize) -> Self {
        match self {
            ExtractError::RecognitionFailure { page: None, detail } => {
                ExtractError::RecognitionFailure {
                    page: Some(page),
                    detail,
                }
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_errors_share_a_kind() {
        let e = ExtractError::DocumentParse {
            format: DocumentFormat::Pdf,
            detail: "bad xref".into(),
        };
        assert_eq!(e.kind(), ErrorKind::DocumentParseError);

        let e = ExtractError::RasterisationFailed {
            page: 2,
            detail: "oom".into(),
        };
        assert_eq!(e.kind(), ErrorKind::DocumentParseError);
    }

    #[test]
    fn document_parse_display_names_format() {
        let e = ExtractError::DocumentParse {
            format: DocumentFormat::Docx,
            detail: "missing word/document.xml".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("DOCX"), "got: {msg}");
        assert!(msg.contains("word/document.xml"), "got: {msg}");
    }

    #[test]
    fn recognition_display_with_and_without_page() {
        let e = ExtractError::RecognitionFailure {
            page: None,
            detail: "tesseract crashed".into(),
        };
        assert_eq!(e.to_string(), "Text recognition failed: tesseract crashed");

        let e = e.on_page(3);
        assert!(e.to_string().contains("page 3"));
        assert_eq!(e.kind(), ErrorKind::RecognitionFailure);
    }

    #[test]
    fn on_page_keeps_existing_page() {
        let e = ExtractError::RecognitionFailure {
            page: Some(1),
            detail: "x".into(),
        }
        .on_page(7);
        assert!(matches!(
            e,
            ExtractError::RecognitionFailure { page: Some(1), .. }
        ));
    }

    #[test]
    fn temp_errors_are_resource_failures() {
        let e = ExtractError::TempCreate {
            dir: PathBuf::from("/nonexistent"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(e.kind(), ErrorKind::ResourceAcquisitionFailure);
        assert!(e.to_string().contains("/nonexistent"));
    }

    #[test]
    fn input_errors_name_the_path() {
        let e = ExtractError::UnknownFormat {
            path: PathBuf::from("notes.txt"),
        };
        assert_eq!(e.kind(), ErrorKind::InvalidInput);
        assert!(e.to_string().contains("notes.txt"));
    }

    #[test]
    fn kind_strings_are_stable() {
        assert_eq!(ErrorKind::UnsupportedImageFormat.to_string(), "UnsupportedImageFormat");
        assert_eq!(
            ErrorKind::ResourceAcquisitionFailure.as_str(),
            "ResourceAcquisitionFailure"
        );
    }
}
