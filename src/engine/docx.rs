//! DOCX text extraction using docx-rs.
//!
//! Reads the section headers first, then the document body in order, then
//! the section footers. Paragraph text is the concatenation of its runs
//! (hyperlink runs included); tabs and breaks inside runs become `\t` and
//! `\n`. Paragraphs are separated by `\n`, table cells by `\t` and table
//! rows by `\n`. Empty paragraphs between blocks stay as empty lines, but
//! whitespace around the whole text is trimmed.

use super::DocxTextExtractor;
use crate::document::DocumentFormat;
use crate::error::ExtractError;
use docx_rs::{
    DocumentChild, FooterChild, HeaderChild, Paragraph, ParagraphChild, Run, RunChild, Table,
    TableCellContent, TableChild, TableRowChild,
};

/// [`DocxTextExtractor`] backed by docx-rs.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxRsExtractor;

impl DocxRsExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl DocxTextExtractor for DocxRsExtractor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        let docx = docx_rs::read_docx(bytes).map_err(|e| ExtractError::DocumentParse {
            format: DocumentFormat::Docx,
            detail: e.to_string(),
        })?;

        let section = &docx.document.section_property;
        let mut blocks: Vec<String> = Vec::new();

        for (_, header) in section.get_headers() {
            for child in &header.children {
                match child {
                    HeaderChild::Paragraph(p) => blocks.push(paragraph_text(p)),
                    HeaderChild::Table(t) => blocks.push(table_text(t)),
                    _ => {}
                }
            }
        }

        for child in &docx.document.children {
            match child {
                DocumentChild::Paragraph(p) => blocks.push(paragraph_text(p)),
                DocumentChild::Table(t) => blocks.push(table_text(t)),
                _ => {}
            }
        }

        for (_, footer) in section.get_footers() {
            for child in &footer.children {
                match child {
                    FooterChild::Paragraph(p) => blocks.push(paragraph_text(p)),
                    FooterChild::Table(t) => blocks.push(table_text(t)),
                    _ => {}
                }
            }
        }

        Ok(blocks.join("\n").trim().to_string())
    }
}

fn paragraph_text(p: &Paragraph) -> String {
    let mut text = String::new();
    for child in &p.children {
        match child {
            ParagraphChild::Run(r) => push_run(&mut text, r),
            ParagraphChild::Hyperlink(h) => {
                for child in &h.children {
                    if let ParagraphChild::Run(r) = child {
                        push_run(&mut text, r);
                    }
                }
            }
            _ => {}
        }
    }
    text
}

fn push_run(text: &mut String, run: &Run) {
    for child in &run.children {
        match child {
            RunChild::Text(t) => text.push_str(&t.text),
            RunChild::Tab(_) => text.push('\t'),
            RunChild::Break(_) => text.push('\n'),
            _ => {}
        }
    }
}

fn table_text(t: &Table) -> String {
    t.rows
        .iter()
        .map(|row| {
            let TableChild::TableRow(r) = row;
            r.cells
                .iter()
                .map(|cell| {
                    let TableRowChild::TableCell(c) = cell;
                    c.children
                        .iter()
                        .filter_map(|content| match content {
                            TableCellContent::Paragraph(p) => Some(paragraph_text(p)),
                            _ => None,
                        })
                        .collect::<Vec<_>>()
                        .join("\n")
                })
                .collect::<Vec<_>>()
                .join("\t")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{Docx, Footer, Header, TableCell, TableRow};
    use std::io::Cursor;

    fn pack(docx: Docx) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        docx.build().pack(&mut buf).expect("pack docx");
        buf.into_inner()
    }

    fn para(text: &str) -> Paragraph {
        Paragraph::new().add_run(Run::new().add_text(text))
    }

    #[test]
    fn single_paragraph() {
        let bytes = pack(Docx::new().add_paragraph(para("Sample")));
        let text = DocxRsExtractor::new().extract_text(&bytes).unwrap();
        assert_eq!(text, "Sample");
    }

    #[test]
    fn runs_concatenate_and_paragraphs_split_lines() {
        let bytes = pack(
            Docx::new()
                .add_paragraph(
                    Paragraph::new()
                        .add_run(Run::new().add_text("Hello, "))
                        .add_run(Run::new().add_text("world")),
                )
                .add_paragraph(para("Second")),
        );
        let text = DocxRsExtractor::new().extract_text(&bytes).unwrap();
        assert_eq!(text, "Hello, world\nSecond");
    }

    #[test]
    fn tables_are_tab_separated() {
        let table = Table::new(vec![
            TableRow::new(vec![
                TableCell::new().add_paragraph(para("a1")),
                TableCell::new().add_paragraph(para("b1")),
            ]),
            TableRow::new(vec![
                TableCell::new().add_paragraph(para("a2")),
                TableCell::new().add_paragraph(para("b2")),
            ]),
        ]);
        let bytes = pack(Docx::new().add_paragraph(para("Before")).add_table(table));
        let text = DocxRsExtractor::new().extract_text(&bytes).unwrap();
        assert_eq!(text, "Before\na1\tb1\na2\tb2");
    }

    #[test]
    fn headers_lead_and_outer_blank_lines_are_trimmed() {
        let bytes = pack(
            Docx::new()
                .header(Header::new().add_paragraph(para("HeaderText")))
                .add_paragraph(para("Body"))
                .add_paragraph(Paragraph::new()),
        );
        let text = DocxRsExtractor::new().extract_text(&bytes).unwrap();
        assert_eq!(text, "HeaderText\nBody");
    }

    #[test]
    fn footers_follow_the_body() {
        let bytes = pack(
            Docx::new()
                .add_paragraph(Paragraph::new())
                .add_paragraph(para("Body"))
                .add_paragraph(Paragraph::new())
                .add_paragraph(para("End"))
                .footer(Footer::new().add_paragraph(para("Page footer"))),
        );
        let text = DocxRsExtractor::new().extract_text(&bytes).unwrap();
        assert_eq!(text, "Body\n\nEnd\nPage footer");
    }

    #[test]
    fn extraction_is_deterministic() {
        let bytes = pack(
            Docx::new()
                .add_paragraph(para("One"))
                .add_paragraph(para("Two")),
        );
        let extractor = DocxRsExtractor::new();
        let first = extractor.extract_text(&bytes).unwrap();
        for _ in 0..5 {
            assert_eq!(extractor.extract_text(&bytes).unwrap(), first);
        }
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let err = DocxRsExtractor::new()
            .extract_text(b"this is not a zip archive")
            .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::DocumentParseError);
    }

    #[test]
    fn empty_input_is_a_parse_error() {
        assert!(DocxRsExtractor::new().extract_text(&[]).is_err());
    }
}
