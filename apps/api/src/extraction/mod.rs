//! Text extraction: turns an uploaded resume into ordered, overlapping segments.
//!
//! PDF decoding is CPU-bound and must run inside `tokio::task::spawn_blocking`
//! (the evaluation pipeline does this).

pub mod splitter;

use std::panic::{self, AssertUnwindSafe};

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

pub use splitter::TextSplitter;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// The uploaded file. Cloning is cheap; the bytes are shared.
#[derive(Debug, Clone)]
pub struct Document {
    pub filename: String,
    pub bytes: Bytes,
}

impl Document {
    pub fn new(filename: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    /// Cheap header check; does not validate the rest of the file.
    pub fn looks_like_pdf(bytes: &[u8]) -> bool {
        bytes.starts_with(PDF_MAGIC)
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }
}

/// A bounded slice of extracted text, the unit of retrieval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    /// Position in extraction order, starting at 0.
    pub ordinal: usize,
    pub text: String,
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("document could not be parsed: {0}")]
    Unreadable(String),

    #[error("document contains no extractable text")]
    NoText,

    #[error("extraction task aborted: {0}")]
    Aborted(String),
}

/// Pulls text out of a document and cuts it into segments.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, document: &Document) -> Result<Vec<Segment>, ExtractionError>;
}

/// Default extractor: `pdf-extract` for decoding, recursive splitter for chunking.
#[derive(Debug, Clone, Default)]
pub struct PdfTextExtractor {
    splitter: TextSplitter,
}

impl PdfTextExtractor {
    pub fn new(splitter: TextSplitter) -> Self {
        Self { splitter }
    }
}

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, document: &Document) -> Result<Vec<Segment>, ExtractionError> {
        let bytes = document.bytes.as_ref();

        // pdf-extract panics on some malformed inputs instead of returning Err.
        let text = panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes)))
            .map_err(|_| ExtractionError::Unreadable("PDF decoder panicked".to_string()))?
            .map_err(|e| ExtractionError::Unreadable(e.to_string()))?;

        let segments = segments_from_text(&self.splitter, &text)?;
        debug!(
            "Extracted {} chars into {} segments (size {}, overlap {}) from '{}'",
            text.chars().count(),
            segments.len(),
            self.splitter.chunk_size(),
            self.splitter.chunk_overlap(),
            document.filename
        );
        Ok(segments)
    }
}

/// Splits already-decoded text into numbered segments.
pub fn segments_from_text(splitter: &TextSplitter, text: &str) -> Result<Vec<Segment>, ExtractionError> {
    if text.trim().is_empty() {
        return Err(ExtractionError::NoText);
    }

    let segments: Vec<Segment> = splitter
        .split(text)
        .into_iter()
        .enumerate()
        .map(|(ordinal, text)| Segment { ordinal, text })
        .collect();

    if segments.is_empty() {
        return Err(ExtractionError::NoText);
    }
    Ok(segments)
}

/// Renders the full segment list as the resume content embedded in a query.
pub fn render_content(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looks_like_pdf_checks_magic() {
        assert!(Document::looks_like_pdf(b"%PDF-1.7\n%..."));
        assert!(!Document::looks_like_pdf(b"PK\x03\x04 docx"));
        assert!(!Document::looks_like_pdf(b""));
    }

    #[test]
    fn test_segments_are_numbered_in_order() {
        let splitter = TextSplitter::new(20, 0);
        let segments =
            segments_from_text(&splitter, "Jane Doe\n\nSkills: Python, Go\n\nExperience: 5 years").unwrap();
        let ordinals: Vec<usize> = segments.iter().map(|s| s.ordinal).collect();
        assert_eq!(ordinals, vec![0, 1, 2]);
        assert_eq!(segments[0].text, "Jane Doe");
    }

    #[test]
    fn test_whitespace_only_text_is_no_text() {
        let err = segments_from_text(&TextSplitter::default(), "\n \x0c \n").unwrap_err();
        assert!(matches!(err, ExtractionError::NoText));
    }

    /// Builds a one-page PDF with a single Helvetica text run per line of `lines`.
    fn one_page_pdf(lines: &[&str]) -> Bytes {
        let content: String = lines
            .iter()
            .enumerate()
            .map(|(i, line)| format!("BT /F1 12 Tf 72 {} Td ({line}) Tj ET\n", 720 - 14 * i))
            .collect();
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R \
             /Resources << /Font << /F1 5 0 R >> >> >>"
                .to_string(),
            format!("<< /Length {} >>\nstream\n{content}\nendstream", content.len()),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        ];

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
        }

        let xref_offset = pdf.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in offsets {
            xref.push_str(&format!("{offset:010} 00000 n \n"));
        }
        xref.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
            objects.len() + 1
        ));
        pdf.extend_from_slice(xref.as_bytes());
        Bytes::from(pdf)
    }

    #[test]
    fn test_pdf_text_is_extracted_into_one_segment() {
        let resume = "Jane Doe. Skills: Python, Go. Experience: 5 years backend.";
        let document = Document::new("jane_doe.pdf", one_page_pdf(&[resume]));
        assert!(Document::looks_like_pdf(&document.bytes));

        let segments = PdfTextExtractor::default().extract(&document).unwrap();
        assert_eq!(
            segments,
            vec![Segment {
                ordinal: 0,
                text: resume.to_string(),
            }]
        );
    }

    #[test]
    fn test_pdf_without_text_is_no_text() {
        let document = Document::new("blank.pdf", one_page_pdf(&[]));
        let err = PdfTextExtractor::default().extract(&document).unwrap_err();
        assert!(matches!(err, ExtractionError::NoText), "got {err:?}");
    }

    #[test]
    fn test_garbage_bytes_are_unreadable() {
        let document = Document::new("resume.pdf", Bytes::from_static(b"%PDF-1.4 this is not a pdf"));
        let err = PdfTextExtractor::default().extract(&document).unwrap_err();
        assert!(matches!(err, ExtractionError::Unreadable(_)), "got {err:?}");
    }

    #[test]
    fn test_render_content_joins_with_newline() {
        let segments = vec![
            Segment {
                ordinal: 0,
                text: "Jane Doe.".to_string(),
            },
            Segment {
                ordinal: 1,
                text: "Skills: Python, Go.".to_string(),
            },
        ];
        assert_eq!(render_content(&segments), "Jane Doe.\nSkills: Python, Go.");
    }
}
