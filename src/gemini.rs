//! Gemini API client for prescription image transcription.
//!
//! The HTTP surface never talks to Gemini directly — handlers go through the
//! [`VisionModel`] trait so tests can substitute [`MockVisionModel`] and the
//! upstream provider stays swappable.

use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Public Gemini REST endpoint.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Per-request timeout. Handwriting transcription of a full prescription
/// page typically completes well under a minute.
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    #[error("Cannot reach Gemini API at {0}")]
    Connection(String),

    #[error("Gemini request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Gemini API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Gemini reply contained no text")]
    EmptyReply,

    #[error("Failed to parse Gemini response: {0}")]
    ResponseParsing(String),
}

/// Seam between the API layer and the hosted vision model.
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Send one image plus an instruction prompt, return the model's
    /// free-text reply.
    async fn transcribe(
        &self,
        image: &[u8],
        mime_type: &str,
        prompt: &str,
    ) -> Result<String, GeminiError>;
}

/// Gemini `generateContent` client.
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            client,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(GEMINI_API_BASE, &config.gemini_api_key, &config.gemini_model)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

// ── Wire types for generateContent ──────────────────────────

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData<'a>,
    },
    Text {
        text: &'a str,
    },
}

#[derive(Serialize)]
struct InlineData<'a> {
    #[serde(rename = "mimeType")]
    mime_type: &'a str,
    data: String,
}

/// Sampling parameters for `generateContent`.
#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "topP")]
    top_p: f32,
    #[serde(rename = "topK")]
    top_k: u32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            top_p: 0.95,
            top_k: 40,
            max_output_tokens: 8192,
        }
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Concatenate the text parts of the first candidate.
fn extract_reply_text(response: GenerateResponse) -> Result<String, GeminiError> {
    let text: String = response
        .candidates
        .unwrap_or_default()
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|p| p.text)
        .collect();

    if text.trim().is_empty() {
        return Err(GeminiError::EmptyReply);
    }
    Ok(text)
}

#[async_trait]
impl VisionModel for GeminiClient {
    async fn transcribe(
        &self,
        image: &[u8],
        mime_type: &str,
        prompt: &str,
    ) -> Result<String, GeminiError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![
                    Part::Inline {
                        inline_data: InlineData {
                            mime_type,
                            data: base64::engine::general_purpose::STANDARD.encode(image),
                        },
                    },
                    Part::Text { text: prompt },
                ],
            }],
            generation_config: GenerationConfig::default(),
        };

        let response = self.client.post(&url).json(&body).send().await.map_err(|e| {
            if e.is_connect() {
                GeminiError::Connection(self.base_url.clone())
            } else if e.is_timeout() {
                GeminiError::Timeout(REQUEST_TIMEOUT_SECS)
            } else {
                GeminiError::HttpClient(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| GeminiError::ResponseParsing(e.to_string()))?;

        extract_reply_text(parsed)
    }
}

/// Mock vision model for testing — canned reply or forced failure.
pub struct MockVisionModel {
    reply: String,
    fail: bool,
}

impl MockVisionModel {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            fail: false,
        }
    }

    /// A mock whose every call fails with an upstream API error.
    pub fn failing() -> Self {
        Self {
            reply: String::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl VisionModel for MockVisionModel {
    async fn transcribe(
        &self,
        _image: &[u8],
        _mime_type: &str,
        _prompt: &str,
    ) -> Result<String, GeminiError> {
        if self.fail {
            return Err(GeminiError::Api {
                status: 500,
                body: "mock failure".into(),
            });
        }
        Ok(self.reply.clone())
    }
}
