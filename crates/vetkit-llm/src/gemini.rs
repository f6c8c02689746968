//! Gemini `generateContent` REST client.
//!
//! One client instance serves both flows. Requests declare
//! `response_mime_type: application/json`; bodies still come back as plain
//! text and go through `vetkit-core` normalization. Token usage from
//! `usageMetadata` is logged per call.

use anyhow::{Context, Result};
use base64::Engine;
use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::prompts::{checklist_audit_prompt, DOCUMENT_SEPARATOR, VENDOR_TABLE_PROMPT};
use vetkit_core::{parse_vendor_table, ClassifierResult, VendorRow};

/// Environment variable holding the API credential.
///
/// This is the only credential source; keys never appear in code or
/// configuration files.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini request payload.
#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    Inline {
        #[serde(rename = "inline_data")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "response_mime_type")]
    response_mime_type: String,
}

/// Gemini response payload.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct UsageMetadata {
    #[serde(rename = "promptTokenCount", default)]
    prompt_token_count: u32,
    #[serde(rename = "candidatesTokenCount", default)]
    candidates_token_count: u32,
}

/// Gemini model variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum GeminiModel {
    /// Fast, cheaper model for bulk text batches
    Flash25,
    /// Stronger model, better on scanned layouts and handwriting
    #[default]
    Pro25,
}

impl GeminiModel {
    /// Get the API model identifier string.
    #[inline]
    #[must_use = "returns the Gemini model identifier"]
    pub const fn model_id(&self) -> &str {
        match self {
            Self::Flash25 => "gemini-2.5-flash",
            Self::Pro25 => "gemini-2.5-pro",
        }
    }
}

impl std::fmt::Display for GeminiModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.model_id())
    }
}

impl std::str::FromStr for GeminiModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gemini-2.5-flash" | "flash" => Ok(Self::Flash25),
            "gemini-2.5-pro" | "pro" => Ok(Self::Pro25),
            _ => Err(format!(
                "unknown Gemini model '{s}'. Valid options: gemini-2.5-flash, flash, gemini-2.5-pro, pro"
            )),
        }
    }
}

/// HTTP client for Gemini API requests.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: GeminiModel,
}

impl GeminiClient {
    /// Create a client with the given API key and the default model.
    #[must_use = "creates the Gemini client"]
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model: GeminiModel::default(),
        }
    }

    /// Create a client from the `GEMINI_API_KEY` environment variable.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is not set.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .with_context(|| format!("{API_KEY_ENV} not set. Export it before running"))?;
        Ok(Self::new(api_key))
    }

    /// Select a different model.
    #[must_use = "returns the client with the new model"]
    pub fn with_model(mut self, model: GeminiModel) -> Self {
        self.model = model;
        self
    }

    /// Apply a per-request timeout. The default policy is none: a hung
    /// remote call stalls the run, and callers opting into bounded
    /// execution set this explicitly.
    #[must_use = "returns the client with the timeout applied"]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        self
    }

    /// Classify one batch of extracted texts against the checklist.
    ///
    /// Absorbs every failure: a remote-call error or malformed response
    /// becomes [`ClassifierResult::Empty`] with a warning, never an `Err`,
    /// so one bad batch cannot abort the run.
    pub async fn classify_batch(
        &self,
        batch: &[String],
        audit_date: NaiveDate,
    ) -> ClassifierResult {
        let prompt = checklist_audit_prompt(audit_date);
        let combined = batch.join(DOCUMENT_SEPARATOR);

        let parts = vec![Part::Text { text: prompt }, Part::Text { text: combined }];

        match self.generate(parts).await {
            Ok(body) => ClassifierResult::from_response_text(&body),
            Err(e) => {
                warn!("batch classification failed, continuing with empty result: {e:#}");
                ClassifierResult::Empty
            }
        }
    }

    /// Extract the vendor compliance table from one whole PDF.
    ///
    /// The document goes to the model inline so handwriting and layout
    /// survive; batching OCR text here would destroy the visual evidence
    /// the status rules depend on.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote call fails or the response is not a
    /// JSON array of rows; the caller surfaces it and continues with an
    /// empty table.
    pub async fn extract_vendor_table(&self, pdf_bytes: &[u8]) -> Result<Vec<VendorRow>> {
        let pdf_b64 = base64::engine::general_purpose::STANDARD.encode(pdf_bytes);

        let parts = vec![
            Part::Text {
                text: VENDOR_TABLE_PROMPT.to_string(),
            },
            Part::Inline {
                inline_data: InlineData {
                    mime_type: "application/pdf".to_string(),
                    data: pdf_b64,
                },
            },
        ];

        let body = self.generate(parts).await?;
        Ok(parse_vendor_table(&body)?)
    }

    /// Send one `generateContent` request and return the response text.
    async fn generate(&self, parts: Vec<Part>) -> Result<String> {
        let start = Instant::now();

        let request = GenerateRequest {
            contents: vec![RequestContent { parts }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
            },
        };

        let url = format!("{API_BASE}/{}:generateContent", self.model.model_id());
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .context("Failed to send request to Gemini")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini API error ({status}): {error_text}");
        }

        let generate_response: GenerateResponse = response
            .json()
            .await
            .context("Failed to parse Gemini response")?;

        if let Some(usage) = &generate_response.usage_metadata {
            info!(
                "{}: {} prompt tokens, {} response tokens, {:.3}s",
                self.model,
                usage.prompt_token_count,
                usage.candidates_token_count,
                start.elapsed().as_secs_f64()
            );
        }

        response_text(generate_response).context("Gemini response carried no text candidate")
    }
}

/// Pull the first candidate's concatenated text out of a response.
fn response_text(response: GenerateResponse) -> Option<String> {
    let candidate = response.candidates.into_iter().next()?;
    let content = candidate.content?;
    if content.parts.is_empty() {
        return None;
    }
    Some(
        content
            .parts
            .into_iter()
            .map(|p| p.text)
            .collect::<String>(),
    )
}
