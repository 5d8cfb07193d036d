//! Prescription image extraction.
//!
//! A `VisionClient` carries the image and prompt to the provider; the
//! parser turns the reply into a `PrescriptionAnalysis`. Everything
//! downstream of the parser treats missing or malformed fields as
//! absent, so extraction never has to be perfect to be useful.

pub mod parser;
pub mod prompt;
pub mod provider;
pub mod sample;
pub mod types;

pub use parser::parse_analysis_response;
pub use provider::{GeminiClient, MockVisionClient, UnconfiguredVisionClient, VisionClient};
pub use sample::sample_analysis;
pub use types::PrescriptionAnalysis;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Vision API key is not configured (set GEMINI_API_KEY)")]
    MissingApiKey,

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Vision API returned error (status {status}): {body}")]
    ApiError { status: u16, body: String },

    #[error("Empty reply from vision model")]
    EmptyResponse,

    #[error("Malformed analysis reply: {0}")]
    MalformedResponse(String),

    #[error("JSON parsing error: {0}")]
    JsonParsing(String),
}

/// Run one prescription image through the provider and parse the reply.
pub fn analyze_prescription_image(
    client: &dyn VisionClient,
    image_jpeg: &[u8],
) -> Result<PrescriptionAnalysis, ExtractionError> {
    let reply = client.analyze_image(image_jpeg, prompt::ANALYSIS_PROMPT)?;
    parser::parse_analysis_response(&reply)
}
