//! PDF text extraction via the pdf-extract crate.
//!
//! Complex PDFs may emit glyph warnings on stderr during extraction;
//! those are noise from the font mapper and do not affect the result.

use std::path::Path;

use pdf_extract::extract_text;

use super::IngestError;

/// Extract readable text from a PDF file.
///
/// Image-only and empty documents yield no text and are reported as
/// `NoPdfText` so the caller can tell the user why inspection produced
/// nothing.
pub fn extract_pdf_text(path: &Path) -> Result<String, IngestError> {
    let raw = extract_text(path).map_err(|e| IngestError::Pdf(e.to_string()))?;

    let text = raw.trim();
    if text.is_empty() {
        return Err(IngestError::NoPdfText);
    }
    Ok(text.to_string())
}
