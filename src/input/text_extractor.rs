//! Text extraction from various file formats

use crate::error::{IntervuError, Result};
use crate::processing::document::ExtractedDocument;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use std::path::Path;
use tokio::fs;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<ExtractedDocument>> + Send;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<ExtractedDocument> {
        let bytes = fs::read(path)
            .await
            .map_err(|e| IntervuError::extraction(path, e))?;

        let pages = pdf_extract::extract_text_from_mem_by_pages(&bytes)
            .map_err(|e| IntervuError::extraction(path, e.to_string()))?;

        Ok(assemble_pages(&pages))
    }
}

/// One chunk per non-blank page, labelled with its 1-based page number
fn assemble_pages(pages: &[String]) -> ExtractedDocument {
    let mut full_text = String::new();
    let mut chunks = Vec::new();

    for (idx, page_text) in pages.iter().enumerate() {
        full_text.push_str(page_text);
        full_text.push('\n');

        let trimmed = page_text.trim();
        if !trimmed.is_empty() {
            chunks.push(format!("Page {}: {}", idx + 1, trimmed));
        }
    }

    ExtractedDocument::new(full_text.trim().to_string(), chunks)
}

pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    async fn extract(&self, path: &Path) -> Result<ExtractedDocument> {
        let bytes = fs::read(path)
            .await
            .map_err(|e| IntervuError::extraction(path, e))?;

        let body = parse_docx(&bytes).map_err(|e| IntervuError::extraction(path, e))?;
        Ok(body.into_document())
    }
}

/// Body paragraphs and top-level table rows of a .docx, in reading order
#[derive(Debug, Default)]
struct DocxBody {
    paragraphs: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl DocxBody {
    fn into_document(self) -> ExtractedDocument {
        let mut full_text = String::new();
        let mut chunks = Vec::new();

        for paragraph in &self.paragraphs {
            if !paragraph.trim().is_empty() {
                full_text.push_str(paragraph);
                full_text.push('\n');
                chunks.push(paragraph.trim().to_string());
            }
        }

        for row in &self.rows {
            if row.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }
            let row_text = row
                .iter()
                .map(|cell| cell.trim())
                .collect::<Vec<_>>()
                .join(" | ");
            full_text.push_str(&row_text);
            full_text.push('\n');
            chunks.push(row_text.trim().to_string());
        }

        ExtractedDocument::new(full_text.trim().to_string(), chunks)
    }
}

fn parse_docx(bytes: &[u8]) -> std::result::Result<DocxBody, BoxError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive.by_name("word/document.xml")?.read_to_string(&mut xml)?;
    parse_document_xml(&xml)
}

fn parse_document_xml(xml: &str) -> std::result::Result<DocxBody, BoxError> {
    let mut reader = Reader::from_str(xml);
    let mut body = DocxBody::default();

    let mut table_depth = 0usize;
    let mut paragraph: Option<String> = None;
    let mut in_text = false;
    let mut cell: Option<Vec<String>> = None;
    let mut row: Option<Vec<String>> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:tbl" => table_depth += 1,
                b"w:tr" if table_depth == 1 => row = Some(Vec::new()),
                b"w:tc" if table_depth == 1 => cell = Some(Vec::new()),
                b"w:p" => paragraph = Some(String::new()),
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" => push_char(&mut paragraph, '\t'),
                b"w:br" | b"w:cr" => push_char(&mut paragraph, '\n'),
                b"w:p" => finish_paragraph(String::new(), table_depth, &mut cell, &mut body),
                _ => {}
            },
            Event::Text(t) => {
                if in_text {
                    if let Some(p) = paragraph.as_mut() {
                        p.push_str(&t.unescape()?);
                    }
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => {
                    if let Some(text) = paragraph.take() {
                        finish_paragraph(text, table_depth, &mut cell, &mut body);
                    }
                }
                b"w:tc" if table_depth == 1 => {
                    if let (Some(paragraphs), Some(r)) = (cell.take(), row.as_mut()) {
                        r.push(paragraphs.join("\n"));
                    }
                }
                b"w:tr" if table_depth == 1 => {
                    if let Some(r) = row.take() {
                        body.rows.push(r);
                    }
                }
                b"w:tbl" => table_depth = table_depth.saturating_sub(1),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(body)
}

fn push_char(paragraph: &mut Option<String>, c: char) {
    if let Some(p) = paragraph.as_mut() {
        p.push(c);
    }
}

/// Nested-table paragraphs are dropped; only direct cell paragraphs count
fn finish_paragraph(
    text: String,
    table_depth: usize,
    cell: &mut Option<Vec<String>>,
    body: &mut DocxBody,
) {
    match table_depth {
        0 => body.paragraphs.push(text),
        1 => {
            if let Some(c) = cell.as_mut() {
                c.push(text);
            }
        }
        _ => {}
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<ExtractedDocument> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| IntervuError::extraction(path, e))?;
        Ok(split_paragraphs(content))
    }
}

/// Blank-line delimited paragraphs; full text is kept verbatim
fn split_paragraphs(content: String) -> ExtractedDocument {
    let chunks = content
        .split("\n\n")
        .map(|chunk| chunk.trim())
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| chunk.to_string())
        .collect();
    ExtractedDocument::new(content, chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>  Jane Doe  </w:t></w:r></w:p>
    <w:p/>
    <w:p><w:r><w:t xml:space="preserve">Rust </w:t></w:r><w:r><w:t>&amp; Go</w:t></w:r></w:p>
    <w:tbl>
      <w:tr>
        <w:tc><w:p><w:r><w:t>2020</w:t></w:r></w:p></w:tc>
        <w:tc><w:p><w:r><w:t> Acme </w:t></w:r></w:p></w:tc>
      </w:tr>
      <w:tr>
        <w:tc><w:p/></w:tc>
        <w:tc><w:p><w:r><w:t>   </w:t></w:r></w:p></w:tc>
      </w:tr>
    </w:tbl>
    <w:p><w:r><w:t>Trailing</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

    #[test]
    fn test_pdf_pages_are_labelled_and_blank_pages_skipped() {
        let pages = vec![
            "First page text\n".to_string(),
            "   \n".to_string(),
            "Third page".to_string(),
        ];
        let doc = assemble_pages(&pages);

        assert_eq!(doc.chunks, vec!["Page 1: First page text", "Page 3: Third page"]);
        assert_eq!(doc.full_text, "First page text\n\n   \n\nThird page");
    }

    #[test]
    fn test_docx_paragraphs_then_rows() {
        let body = parse_document_xml(DOCUMENT_XML).unwrap();
        assert_eq!(body.paragraphs.len(), 4);
        assert_eq!(body.rows.len(), 2);

        let doc = body.into_document();
        assert_eq!(doc.chunks, vec!["Jane Doe", "Rust & Go", "Trailing", "2020 | Acme"]);
        assert_eq!(doc.full_text, "Jane Doe  \nRust & Go\nTrailing\n2020 | Acme");
    }

    #[test]
    fn test_docx_rejects_non_zip_bytes() {
        assert!(parse_docx(b"definitely not a zip archive").is_err());
    }

    #[test]
    fn test_plain_text_splits_on_blank_lines() {
        let doc = split_paragraphs("Summary\nline two\n\n\n\nSkills: Rust\n\n   \n\n".to_string());
        assert_eq!(doc.chunks, vec!["Summary\nline two", "Skills: Rust"]);
        assert_eq!(doc.full_text, "Summary\nline two\n\n\n\nSkills: Rust\n\n   \n\n");
    }
}
