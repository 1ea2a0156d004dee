//! Document parser: turns an uploaded file into plain text.
//!
//! Dispatch is on the declared MIME type (substring match), falling back to
//! the filename extension when the client sent no useful type. No OCR and no
//! layout awareness: text is concatenated in reading order.

use bytes::Bytes;
use docx_rs::{DocumentChild, ParagraphChild, RunChild};
use thiserror::Error;

/// An uploaded file as received from the client.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Word,
    PlainText,
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unsupported document format '{0}'")]
    Unsupported(String),

    #[error("failed to read PDF: {0}")]
    Pdf(String),

    #[error("failed to read Word document: {0}")]
    Word(String),

    #[error("text file is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl DocumentKind {
    /// Classifies a declared MIME type. Order matters: a type naming both
    /// "pdf" and "text" is treated as PDF.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let mime = mime.to_ascii_lowercase();
        if mime.contains("pdf") {
            Some(DocumentKind::Pdf)
        } else if mime.contains("word") {
            Some(DocumentKind::Word)
        } else if mime.contains("text") {
            Some(DocumentKind::PlainText)
        } else {
            None
        }
    }

    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = std::path::Path::new(filename)
            .extension()?
            .to_str()?
            .to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "docx" => Some(DocumentKind::Word),
            "txt" => Some(DocumentKind::PlainText),
            _ => None,
        }
    }
}

impl UploadedDocument {
    /// The declared type wins; the extension is only consulted when the
    /// client declared nothing or a generic octet stream.
    pub fn kind(&self) -> Option<DocumentKind> {
        match self.content_type.as_deref() {
            Some(mime) if !mime.is_empty() && mime != "application/octet-stream" => {
                DocumentKind::from_mime(mime)
            }
            _ => DocumentKind::from_filename(&self.filename),
        }
    }
}

/// Extracts plain text from an uploaded document.
///
/// PDF extraction is CPU-bound and can panic on malformed input; callers on
/// the async runtime should go through [`parse_document_blocking`].
pub fn parse_document(document: &UploadedDocument) -> Result<String, ParseError> {
    match document.kind() {
        Some(DocumentKind::Pdf) => parse_pdf(&document.bytes),
        Some(DocumentKind::Word) => parse_docx(&document.bytes),
        Some(DocumentKind::PlainText) => Ok(String::from_utf8(document.bytes.to_vec())?),
        None => Err(ParseError::Unsupported(
            document
                .content_type
                .clone()
                .unwrap_or_else(|| document.filename.clone()),
        )),
    }
}

/// Runs [`parse_document`] on the blocking pool. A panic inside a parser
/// library is reported as a parse failure for that one document.
pub async fn parse_document_blocking(document: UploadedDocument) -> Result<String, ParseError> {
    let kind = document.kind();
    tokio::task::spawn_blocking(move || parse_document(&document))
        .await
        .unwrap_or_else(|join_err| {
            let reason = format!("parser aborted: {join_err}");
            Err(match kind {
                Some(DocumentKind::Word) => ParseError::Word(reason),
                _ => ParseError::Pdf(reason),
            })
        })
}

fn parse_pdf(bytes: &[u8]) -> Result<String, ParseError> {
    // Pages are emitted in order; pages without a text layer add nothing.
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| ParseError::Pdf(e.to_string()))
}

fn parse_docx(bytes: &[u8]) -> Result<String, ParseError> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| ParseError::Word(e.to_string()))?;

    let mut text = String::new();
    for child in docx.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            push_paragraph_text(&paragraph.children, &mut text);
            text.push('\n');
        }
    }
    Ok(text)
}

/// Run text of a paragraph, including runs nested inside hyperlinks.
fn push_paragraph_text(children: &[ParagraphChild], text: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for run_child in &run.children {
                    match run_child {
                        RunChild::Text(t) => text.push_str(&t.text),
                        RunChild::Tab(_) => text.push('\t'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => push_paragraph_text(&link.children, text),
            _ => {}
        }
    }
}

/// Builds a minimal .docx in memory. Test-only helper shared with the pipeline tests.
#[cfg(test)]
pub fn build_docx(paragraphs: &[&str]) -> Vec<u8> {
    use docx_rs::{Docx, Paragraph, Run};
    use std::io::Cursor;

    let docx = paragraphs.iter().fold(Docx::new(), |docx, p| {
        docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*p)))
    });
    let mut cursor = Cursor::new(Vec::new());
    docx.build().pack(&mut cursor).unwrap();
    cursor.into_inner()
}
