//! PDF text extraction.
//!
//! `pdf-extract` is tried first; when it errors, panics, or yields no text the
//! document is re-read page by page with `lopdf`.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use lopdf::Document;
use thiserror::Error;
use tracing::{debug, warn};

const PDF_MAGIC: &[u8] = b"%PDF-";
const PANIC_MESSAGE: &str = "extractor panicked on this document";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("The uploaded file is empty")]
    Empty,

    #[error("The uploaded file is not a PDF document")]
    NotPdf,

    #[error("Both extraction methods failed. pdf-extract: {primary}, lopdf: {fallback}")]
    BothFailed { primary: String, fallback: String },

    #[error("No extractable text found. The PDF may be scanned, image-only, or password protected")]
    NoText,
}

/// Extracts the full text of a PDF held in memory.
///
/// The result is trimmed and guaranteed non-empty.
pub fn extract_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    extract_text_with(bytes, pdf_extract::extract_text_from_mem)
}

/// True when `lopdf` can parse the document structure.
pub fn validate_pdf(bytes: &[u8]) -> bool {
    Document::load_mem(bytes).is_ok()
}

fn extract_text_with<F, E>(bytes: &[u8], primary: F) -> Result<String, ExtractionError>
where
    F: FnOnce(&[u8]) -> Result<String, E>,
    E: fmt::Display,
{
    if bytes.is_empty() {
        return Err(ExtractionError::Empty);
    }
    if !has_pdf_magic(bytes) {
        return Err(ExtractionError::NotPdf);
    }

    let primary = match run_primary(bytes, primary) {
        Ok(text) if !text.is_empty() => {
            debug!("pdf-extract produced {} chars", text.len());
            return Ok(text);
        }
        Ok(_) => None,
        Err(e) => {
            warn!("pdf-extract failed: {e}. Trying lopdf...");
            Some(e)
        }
    };

    match (primary, extract_with_lopdf(bytes)) {
        (_, Ok(text)) if !text.is_empty() => {
            debug!("lopdf produced {} chars", text.len());
            Ok(text)
        }
        (Some(primary), Err(fallback)) => Err(ExtractionError::BothFailed { primary, fallback }),
        _ if !validate_pdf(bytes) => Err(ExtractionError::NotPdf),
        _ => Err(ExtractionError::NoText),
    }
}

fn has_pdf_magic(bytes: &[u8]) -> bool {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    bytes[start..].starts_with(PDF_MAGIC)
}

fn run_primary<F, E>(bytes: &[u8], primary: F) -> Result<String, String>
where
    F: FnOnce(&[u8]) -> Result<String, E>,
    E: fmt::Display,
{
    // pdf-extract panics on some malformed inputs instead of returning an error.
    match panic::catch_unwind(AssertUnwindSafe(|| primary(bytes))) {
        Ok(Ok(text)) => Ok(text.trim().to_string()),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err(PANIC_MESSAGE.to_string()),
    }
}

fn extract_with_lopdf(bytes: &[u8]) -> Result<String, String> {
    let doc = Document::load_mem(bytes).map_err(|e| e.to_string())?;

    let mut text = String::new();
    for page_number in doc.get_pages().keys() {
        let page_text = doc
            .extract_text(&[*page_number])
            .map_err(|e| format!("page {page_number}: {e}"))?;
        text.push_str(&page_text);
        if !text.ends_with('\n') {
            text.push('\n');
        }
    }

    Ok(text.trim().to_string())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    /// Builds a single-page PDF with one text block per line.
    pub(crate) fn sample_pdf(lines: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut operations = Vec::new();
        for (i, line) in lines.iter().enumerate() {
            let y = 720 - (i as i64) * 16;
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), 12.into()]));
            operations.push(Operation::new("Td", vec![72.into(), y.into()]));
            operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_empty_upload_rejected() {
        assert!(matches!(extract_text(&[]), Err(ExtractionError::Empty)));
    }

    #[test]
    fn test_non_pdf_rejected() {
        let result = extract_text(b"Jane Doe\nSenior Rust Engineer");
        assert!(matches!(result, Err(ExtractionError::NotPdf)));
    }

    #[test]
    fn test_magic_allows_leading_whitespace() {
        assert!(has_pdf_magic(b"\n  %PDF-1.7"));
        assert!(!has_pdf_magic(b"PK\x03\x04"));
    }

    const TRUNCATED: &[u8] = b"%PDF-1.5\n1 0 obj\n<< /Type /Catalog";

    #[test]
    fn test_truncated_pdf_reports_both_failures() {
        match extract_text(TRUNCATED) {
            Err(ExtractionError::BothFailed { primary, fallback }) => {
                assert_eq!(
                    primary,
                    "PDF error: Invalid cross-reference table (invalid start value)"
                );
                assert_eq!(fallback, "Invalid cross-reference table (invalid start value)");
            }
            other => panic!("expected BothFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_both_failed_message_names_both_causes() {
        let err = ExtractionError::BothFailed {
            primary: "bad xref".to_string(),
            fallback: "missing trailer".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("pdf-extract: bad xref"), "{message}");
        assert!(message.contains("lopdf: missing trailer"), "{message}");
    }

    #[test]
    fn test_primary_panic_falls_back_to_lopdf() {
        let bytes = sample_pdf(&["Staff Engineer", "Kubernetes operators"]);
        let text = extract_text_with(&bytes, |_| -> Result<String, String> {
            panic!("font table overflow")
        })
        .unwrap();
        assert!(text.contains("Kubernetes operators"), "got {text:?}");
    }

    #[test]
    fn test_primary_panic_is_reported_when_fallback_also_fails() {
        let result = extract_text_with(TRUNCATED, |_| -> Result<String, String> {
            panic!("font table overflow")
        });
        match result {
            Err(ExtractionError::BothFailed { primary, .. }) => {
                assert_eq!(primary, PANIC_MESSAGE)
            }
            other => panic!("expected BothFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_whitespace_only_primary_output_falls_through() {
        let bytes = sample_pdf(&["Jane Doe", "Platform Engineer"]);
        let text = extract_text_with(&bytes, |_| Ok::<_, String>(" \n\t ".to_string())).unwrap();
        assert!(text.contains("Platform Engineer"), "got {text:?}");
    }

    #[test]
    fn test_unparseable_document_without_text_is_not_pdf() {
        let result = extract_text_with(TRUNCATED, |_| Ok::<_, String>(String::new()));
        assert!(matches!(result, Err(ExtractionError::NotPdf)));
    }

    #[test]
    fn test_validate_pdf() {
        assert!(validate_pdf(&sample_pdf(&["hello"])));
        assert!(!validate_pdf(TRUNCATED));
        assert!(!validate_pdf(b"Jane Doe"));
    }

    #[test]
    fn test_lopdf_fallback_reads_text() {
        let bytes = sample_pdf(&["Jane Doe", "Senior Rust Engineer"]);
        let text = extract_with_lopdf(&bytes).unwrap();
        assert!(text.contains("Jane Doe"), "got {text:?}");
        assert!(text.contains("Senior Rust Engineer"), "got {text:?}");
    }

    #[test]
    fn test_extract_text_returns_trimmed_content() {
        let bytes = sample_pdf(&["Experience", "Built distributed systems in Rust"]);
        let text = extract_text(&bytes).unwrap();
        assert!(text.contains("Rust"), "got {text:?}");
        assert_eq!(text, text.trim());
    }

    #[test]
    fn test_sample_pdf_parses() {
        let bytes = sample_pdf(&["hello"]);
        assert!(has_pdf_magic(&bytes));
        assert_eq!(Document::load_mem(&bytes).unwrap().get_pages().len(), 1);
    }
}
