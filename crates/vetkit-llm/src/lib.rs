//! # vetkit-llm
//!
//! Async client for the Gemini `generateContent` endpoint, covering both
//! classification flows:
//!
//! - **Checklist audit**: a batch of OCR-extracted texts is concatenated
//!   with document separators and classified against the required-document
//!   catalog; remote failures are absorbed into an empty batch result.
//! - **Vendor table**: one whole PDF is sent inline (base64) to the
//!   multimodal model to read a compliance table off mixed typed and
//!   handwritten content; failures here surface to the caller.
//!
//! Responses are requested as JSON (`response_mime_type`) and normalized
//! by `vetkit-core` - fences stripped, array-wrapped objects coerced,
//! malformed bodies degraded to empty results.

pub mod gemini;
pub mod prompts;

pub use gemini::{GeminiClient, GeminiModel};
pub use prompts::{checklist_audit_prompt, DOCUMENT_SEPARATOR, VENDOR_TABLE_PROMPT};
