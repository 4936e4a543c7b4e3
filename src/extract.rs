//! Text acquisition from typed input, plain-text uploads, and PDFs.
//!
//! PDF extraction is best effort: pages are extracted individually and
//! joined with newlines. Any failure, including a panic inside the PDF
//! library, degrades to an empty string so the caller reports "no text".

use thiserror::Error;

use crate::models::{ContentKind, RawInput};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("PDF extraction failed: {0}")]
    Pdf(String),
    #[error("PDF extraction panicked")]
    Panicked,
}

/// Resolve raw input to text. Never fails; unreadable PDFs yield `""`.
pub fn acquire_text(input: &RawInput) -> String {
    match input {
        RawInput::Text(text) => text.clone(),
        RawInput::Bytes {
            bytes,
            kind: ContentKind::Plain,
        } => decode_plain(bytes),
        RawInput::Bytes {
            bytes,
            kind: ContentKind::Pdf,
        } => extract_pdf_lossy(bytes),
    }
}

/// Decode UTF-8, dropping invalid sequences rather than substituting them.
pub fn decode_plain(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .chars()
        .filter(|c| *c != char::REPLACEMENT_CHARACTER)
        .collect()
}

/// Extract text from PDF bytes, one newline after each non-empty page.
pub fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    let pages = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
        .map_err(|_| ExtractError::Panicked)?
        .map_err(|e| ExtractError::Pdf(e.to_string()))?;

    let mut text = String::new();
    for page in pages.iter().filter(|p| !p.is_empty()) {
        text.push_str(page);
        text.push('\n');
    }
    Ok(text.trim().to_string())
}

/// [`extract_pdf`], logging and swallowing the error.
pub fn extract_pdf_lossy(bytes: &[u8]) -> String {
    match extract_pdf(bytes) {
        Ok(text) => text,
        Err(e) => {
            log::warn!("Error extracting PDF: {}", e);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_pdf_returns_error() {
        let err = extract_pdf(b"not a pdf").unwrap_err();
        assert!(matches!(err, ExtractError::Pdf(_) | ExtractError::Panicked));
    }

    #[test]
    fn invalid_pdf_degrades_to_empty() {
        assert_eq!(extract_pdf_lossy(b"%PDF-1.4 garbage"), "");
        let input = RawInput::Bytes {
            bytes: b"not a pdf".to_vec(),
            kind: ContentKind::Pdf,
        };
        assert_eq!(acquire_text(&input), "");
    }

    #[test]
    fn plain_bytes_drop_invalid_utf8() {
        assert_eq!(decode_plain(b"ok \xff\xfe text"), "ok  text");
        let input = RawInput::Bytes {
            bytes: "caf\u{e9}".as_bytes().to_vec(),
            kind: ContentKind::Plain,
        };
        assert_eq!(acquire_text(&input), "caf\u{e9}");
    }

    #[test]
    fn typed_text_passes_through() {
        let input = RawInput::Text("  as typed \n".to_string());
        assert_eq!(acquire_text(&input), "  as typed \n");
    }
}
