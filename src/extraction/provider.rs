use base64::Engine;
use serde::{Deserialize, Serialize};

use super::ExtractionError;
use crate::config;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Vision model abstraction (allows mocking)
pub trait VisionClient {
    /// Send a JPEG image plus an instruction prompt, return the raw text reply.
    fn analyze_image(&self, image_jpeg: &[u8], prompt: &str) -> Result<String, ExtractionError>;
}

/// Gemini HTTP client for prescription image analysis.
pub struct GeminiClient {
    api_key: String,
    model: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl GeminiClient {
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            client,
            timeout_secs,
        }
    }

    /// Build a client from the environment, or `MissingApiKey`.
    pub fn from_env() -> Result<Self, ExtractionError> {
        let api_key = config::vision_api_key().ok_or(ExtractionError::MissingApiKey)?;
        Ok(Self::new(&api_key, &config::vision_model(), DEFAULT_TIMEOUT_SECS))
    }
}

/// Request body for generateContent
#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Serialize)]
struct InlineData {
    mime_type: &'static str,
    data: String,
}

/// Response body from generateContent
#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl VisionClient for GeminiClient {
    fn analyze_image(&self, image_jpeg: &[u8], prompt: &str) -> Result<String, ExtractionError> {
        let url = format!(
            "{GEMINI_API_BASE}/models/{}:generateContent?key={}",
            self.model, self.api_key
        );
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part {
                        text: None,
                        inline_data: Some(InlineData {
                            mime_type: "image/jpeg",
                            data: base64::engine::general_purpose::STANDARD.encode(image_jpeg),
                        }),
                    },
                    Part {
                        text: Some(prompt),
                        inline_data: None,
                    },
                ],
            }],
        };

        let response = self.client.post(&url).json(&body).send().map_err(|e| {
            if e.is_timeout() {
                ExtractionError::HttpClient(format!(
                    "Request timed out after {}s",
                    self.timeout_secs
                ))
            } else {
                ExtractionError::HttpClient(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ExtractionError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .map_err(|e| ExtractionError::JsonParsing(e.to_string()))?;

        let text = parsed
            .candidates
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|p| p.text)
            .collect::<String>();

        if text.is_empty() {
            return Err(ExtractionError::EmptyResponse);
        }
        Ok(text)
    }
}

/// Mock vision client for testing — returns a configurable reply.
pub struct MockVisionClient {
    response: String,
}

impl MockVisionClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
        }
    }
}

impl VisionClient for MockVisionClient {
    fn analyze_image(&self, _image_jpeg: &[u8], _prompt: &str) -> Result<String, ExtractionError> {
        Ok(self.response.clone())
    }
}

/// Stand-in used when no API key is configured. Every call fails with
/// `ExtractionError::MissingApiKey`.
pub struct UnconfiguredVisionClient;

impl VisionClient for UnconfiguredVisionClient {
    fn analyze_image(&self, _image_jpeg: &[u8], _prompt: &str) -> Result<String, ExtractionError> {
        Err(ExtractionError::MissingApiKey)
    }
}
