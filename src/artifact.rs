//! Downloadable text artifacts.
//!
//! A [`TextArtifact`] is the extracted text encoded as UTF-8, together with
//! the filename and content type it is served under. The byte content is
//! exactly the text's UTF-8 encoding: no BOM and no trailing newline.

use crate::document::DocumentFormat;
use crate::error::ExtractError;
use std::path::Path;

/// MIME type every artifact is served with.
pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Extracted text ready to be sent to a client or written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextArtifact {
    content: Vec<u8>,
    filename: String,
}

impl TextArtifact {
    /// Package `text` under `filename`.
    pub fn build(text: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            content: text.into().into_bytes(),
            filename: filename.into(),
        }
    }

    /// Package `text` under the fixed name for `format`
    /// (`pdf_extracted.txt`, `image_extracted.txt`, `docx_extracted.txt`).
    pub fn for_format(text: impl Into<String>, format: DocumentFormat) -> Self {
        Self::build(text, format.artifact_filename())
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn into_content(self) -> Vec<u8> {
        self.content
    }

    /// The content as text. Always valid: it was built from a `String`.
    pub fn text(&self) -> &str {
        std::str::from_utf8(&self.content).unwrap_or_default()
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn content_type(&self) -> &'static str {
        TEXT_CONTENT_TYPE
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// `Content-Disposition` header value offering the artifact as a download.
    pub fn content_disposition(&self) -> String {
        format!(
            "attachment; filename=\"{}\"",
            self.filename.replace(['"', '\\'], "_")
        )
    }

    /// Write the content to `path` atomically: a sibling temp file is written
    /// first and then renamed over the destination, so readers never observe
    /// a partial file.
    pub async fn write_to(&self, path: impl AsRef<Path>) -> Result<(), ExtractError> {
        let path = path.as_ref();
        let failed = |source| ExtractError::OutputWrite {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(failed)?;
        }

        let tmp_path = path.with_extension("txt.tmp");
        tokio::fs::write(&tmp_path, &self.content)
            .await
            .map_err(failed)?;

        if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(failed(e));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_is_exact_utf8() {
        let text = "--- PAGE 1 ---\nHéllo wörld";
        let artifact = TextArtifact::for_format(text, DocumentFormat::Pdf);
        assert_eq!(artifact.content(), text.as_bytes());
        assert_eq!(artifact.len(), text.len());
        assert_eq!(artifact.text(), text);
        assert_eq!(artifact.filename(), "pdf_extracted.txt");
        assert_eq!(artifact.content_type(), "text/plain; charset=utf-8");
    }

    #[test]
    fn empty_text_is_empty_artifact() {
        let artifact = TextArtifact::for_format("", DocumentFormat::Image);
        assert!(artifact.is_empty());
        assert_eq!(artifact.filename(), "image_extracted.txt");
    }

    #[test]
    fn content_disposition_quotes_filename() {
        let artifact = TextArtifact::for_format("x", DocumentFormat::Docx);
        assert_eq!(
            artifact.content_disposition(),
            "attachment; filename=\"docx_extracted.txt\""
        );
        let odd = TextArtifact::build("x", "a\"b.txt");
        assert_eq!(odd.content_disposition(), "attachment; filename=\"a_b.txt\"");
    }

    #[tokio::test]
    async fn write_to_creates_parents_and_leaves_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out").join("docx_extracted.txt");
        let artifact = TextArtifact::for_format("Sample", DocumentFormat::Docx);

        artifact.write_to(&dest).await.unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), b"Sample");
        let entries: Vec<_> = std::fs::read_dir(dest.parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries.len(), 1, "unexpected files: {entries:?}");
    }

    #[tokio::test]
    async fn write_to_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("result.txt");
        std::fs::write(&dest, "old contents that are longer").unwrap();

        TextArtifact::build("new", "result.txt")
            .write_to(&dest)
            .await
            .unwrap();
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "new");
    }
}
