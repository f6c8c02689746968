//! Single-document text extraction: rasterize, OCR, truncate.

// Clippy pedantic allows:
// - DPI and dimension calculations involve various cast types
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]

use image::ImageFormat;
use leptess::LepTess;
use once_cell::sync::Lazy;
use pdfium_render::prelude::*;
use std::sync::Mutex;
use thiserror::Error;
use tracing::debug;

/// PDF points per inch - standard PostScript/PDF unit conversion factor.
const PDF_POINTS_PER_INCH: f32 = 72.0;

/// Rasterization resolution. 150 DPI balances OCR quality against speed.
const RENDER_DPI: u32 = 150;

/// Only the first pages of a multi-page document are processed, a
/// speed/completeness tradeoff: checklist-relevant content sits up front.
pub const MAX_PAGES: usize = 3;

/// Character budget per extracted document, bounding downstream request
/// size.
pub const MAX_TEXT_CHARS: usize = 15_000;

/// Tesseract language pack used for recognition.
const OCR_LANGUAGE: &str = "eng";

// PDFium is not thread-safe. Rasterization takes this process-wide lock;
// OCR runs unlocked so workers still overlap on the slow stage.
static PDFIUM_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// An uploaded document: display name plus raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentBlob {
    /// Display name, echoed into the extracted text's source marker
    pub filename: String,
    /// Raw file contents
    pub bytes: Vec<u8>,
}

impl DocumentBlob {
    /// Create a blob from a name and its raw bytes.
    #[must_use = "creates the blob to be extracted"]
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }
}

/// Extraction-internal errors. Callers of [`extract_text`] never see
/// these; they are folded into the error-as-text stand-in.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The PDF could not be loaded or parsed
    #[error("failed to load PDF: {0}")]
    PdfLoad(String),

    /// A page could not be rendered to a bitmap
    #[error("failed to render page {page}: {message}")]
    Render {
        /// 1-based page number
        page: usize,
        /// Underlying render failure
        message: String,
    },

    /// A rendered page could not be encoded as PNG
    #[error("failed to encode page image: {0}")]
    Encode(String),

    /// Tesseract failed to initialize or recognize
    #[error("OCR failed: {0}")]
    Ocr(String),
}

/// Extract bounded plain text from one document.
///
/// The output always starts with a `FILE_NAME: <name>` marker so the
/// classifier can attribute findings to their source file, followed by
/// OCR text of at most [`MAX_PAGES`] pages, truncated to
/// [`MAX_TEXT_CHARS`] characters. On any internal failure the returned
/// string encodes the error message instead; the run continues.
#[must_use = "returns the text the classifier will see for this document"]
pub fn extract_text(blob: &DocumentBlob) -> String {
    match try_extract_text(blob) {
        Ok(text) => text,
        Err(e) => {
            debug!("extraction failed for {}: {}", blob.filename, e);
            format!("Error reading {}: {}", blob.filename, e)
        }
    }
}

fn try_extract_text(blob: &DocumentBlob) -> Result<String, ExtractError> {
    let pages = rasterize_pages(&blob.bytes)?;

    let mut text = format!("FILE_NAME: {}\n", blob.filename);
    for png in &pages {
        text.push_str(&ocr_png(png)?);
    }

    Ok(truncate_chars(text, MAX_TEXT_CHARS))
}

/// Render the first [`MAX_PAGES`] pages to PNG bytes.
fn rasterize_pages(bytes: &[u8]) -> Result<Vec<Vec<u8>>, ExtractError> {
    let _guard = PDFIUM_LOCK
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);

    let pdfium = Pdfium::default();
    let document = pdfium
        .load_pdf_from_byte_slice(bytes, None)
        .map_err(|e| ExtractError::PdfLoad(e.to_string()))?;

    let mut pages = Vec::with_capacity(MAX_PAGES);
    for (i, page) in document.pages().iter().take(MAX_PAGES).enumerate() {
        let width = page.width().value;
        let height = page.height().value;

        let render_config = PdfRenderConfig::new()
            .set_target_width((width * RENDER_DPI as f32 / PDF_POINTS_PER_INCH) as i32)
            .set_target_height((height * RENDER_DPI as f32 / PDF_POINTS_PER_INCH) as i32);

        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| ExtractError::Render {
                page: i + 1,
                message: e.to_string(),
            })?;

        let image = bitmap.as_image();
        let mut png_bytes = Vec::new();
        image
            .write_to(&mut std::io::Cursor::new(&mut png_bytes), ImageFormat::Png)
            .map_err(|e| ExtractError::Encode(e.to_string()))?;

        pages.push(png_bytes);
    }

    Ok(pages)
}

/// Recognize text in one PNG page image.
fn ocr_png(png: &[u8]) -> Result<String, ExtractError> {
    let mut engine =
        LepTess::new(None, OCR_LANGUAGE).map_err(|e| ExtractError::Ocr(e.to_string()))?;
    engine
        .set_image_from_mem(png)
        .map_err(|e| ExtractError::Ocr(e.to_string()))?;
    engine
        .get_utf8_text()
        .map_err(|e| ExtractError::Ocr(e.to_string()))
}

/// Truncate to at most `max_chars` characters on a char boundary.
fn truncate_chars(mut text: String, max_chars: usize) -> String {
    if let Some((byte_index, _)) = text.char_indices().nth(max_chars) {
        text.truncate(byte_index);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_is_a_noop_under_budget() {
        let text = "short".to_string();
        assert_eq!(truncate_chars(text, 100), "short");
    }

    #[test]
    fn truncate_counts_chars_not_bytes() {
        let text = "é".repeat(10);
        let truncated = truncate_chars(text, 4);
        assert_eq!(truncated.chars().count(), 4);
        assert_eq!(truncated, "éééé");
    }

    #[test]
    fn truncate_at_exact_budget_keeps_everything() {
        let text = "abcd".to_string();
        assert_eq!(truncate_chars(text, 4), "abcd");
    }

    #[test]
    #[ignore = "requires a system pdfium library"]
    fn unreadable_file_becomes_error_text() {
        let blob = DocumentBlob::new("broken.pdf", b"definitely not a pdf".to_vec());
        let text = extract_text(&blob);
        assert!(text.starts_with("Error reading broken.pdf:"));
    }
}
