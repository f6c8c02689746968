//! # vetkit-ocr
//!
//! Text extraction from scanned PDF submissions.
//!
//! One extraction turns an in-memory PDF into a bounded plain-text
//! representation: the first pages are rasterized with pdfium, each page
//! image goes through Tesseract, and the result is truncated so a single
//! oversized file cannot blow the downstream request budget.
//!
//! ## Failure policy
//!
//! [`extract_text`] never fails. A corrupt or unreadable file produces an
//! `Error reading <name>: ...` string in place of its text; one bad file
//! must not abort the rest of the run.
//!
//! ## Concurrency
//!
//! [`ExtractionRunner`] fans extraction out over a bounded rayon pool and
//! returns outputs in input order. PDFium itself is not thread-safe, so
//! rasterization is serialized behind a process-wide lock while OCR (the
//! slow stage) runs in parallel.

pub mod extract;
pub mod runner;

pub use extract::{extract_text, DocumentBlob, ExtractError, MAX_PAGES, MAX_TEXT_CHARS};
pub use runner::ExtractionRunner;
