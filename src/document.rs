//! Inbound documents and their declared formats.
//!
//! The format is never sniffed from content: it comes from the route the
//! document arrived on (or, for the CLI, from a flag or the file extension).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// The three payload kinds the pipeline understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Image,
    Docx,
}

impl DocumentFormat {
    pub const ALL: [DocumentFormat; 3] =
        [DocumentFormat::Pdf, DocumentFormat::Image, DocumentFormat::Docx];

    /// Lower-case name used in routes and CLI flags.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Image => "image",
            DocumentFormat::Docx => "docx",
        }
    }

    /// Suggested download name for the text extracted from this format.
    pub fn artifact_filename(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf_extracted.txt",
            DocumentFormat::Image => "image_extracted.txt",
            DocumentFormat::Docx => "docx_extracted.txt",
        }
    }

    /// Guess the declared format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "docx" => Some(DocumentFormat::Docx),
            "png" | "jpg" | "jpeg" | "gif" | "bmp" | "tif" | "tiff" | "webp" => {
                Some(DocumentFormat::Image)
            }
            _ => None,
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Pdf => f.write_str("PDF"),
            DocumentFormat::Image => f.write_str("image"),
            DocumentFormat::Docx => f.write_str("DOCX"),
        }
    }
}

impl FromStr for DocumentFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "image" | "img" => Ok(DocumentFormat::Image),
            "docx" => Ok(DocumentFormat::Docx),
            other => Err(format!(
                "unknown document format '{other}' (expected pdf, image or docx)"
            )),
        }
    }
}

/// An uploaded payload plus the format it was declared as.
///
/// Immutable once constructed; the pipeline invocation that receives it owns
/// it and drops it when the request ends.
#[derive(Clone)]
pub struct SourceDocument {
    bytes: Vec<u8>,
    format: DocumentFormat,
}

impl SourceDocument {
    pub fn new(bytes: impl Into<Vec<u8>>, format: DocumentFormat) -> Self {
        Self {
            bytes: bytes.into(),
            format,
        }
    }

    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl fmt::Debug for SourceDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceDocument")
            .field("format", &self.format)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_filenames() {
        assert_eq!(DocumentFormat::Pdf.artifact_filename(), "pdf_extracted.txt");
        assert_eq!(DocumentFormat::Image.artifact_filename(), "image_extracted.txt");
        assert_eq!(DocumentFormat::Docx.artifact_filename(), "docx_extracted.txt");
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("a/b/report.PDF")),
            Some(DocumentFormat::Pdf)
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("scan.jpeg")),
            Some(DocumentFormat::Image)
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("memo.docx")),
            Some(DocumentFormat::Docx)
        );
        assert_eq!(DocumentFormat::from_path(Path::new("memo.doc")), None);
        assert_eq!(DocumentFormat::from_path(Path::new("README")), None);
    }

    #[test]
    fn format_from_str() {
        assert_eq!("PDF".parse::<DocumentFormat>(), Ok(DocumentFormat::Pdf));
        assert_eq!(" image ".parse::<DocumentFormat>(), Ok(DocumentFormat::Image));
        assert!("xlsx".parse::<DocumentFormat>().is_err());
    }

    #[test]
    fn debug_hides_payload() {
        let doc = SourceDocument::new(vec![0u8; 1024], DocumentFormat::Pdf);
        let dbg = format!("{doc:?}");
        assert!(dbg.contains("1024"));
        assert!(!dbg.contains("[0, 0"));
    }
}
