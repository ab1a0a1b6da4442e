/// Gemini HTTP API client for the evaluation call.
///
/// Talks to the `generateContent` REST endpoint using the synchronous `ureq`
/// HTTP client. One call per evaluation, no retries, no caching.
///
/// The credential, model, and base URL all come from [`ProviderConfig`], so
/// tests can point the client at a local mock server.
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ProviderConfig;

// ---------------------------------------------------------------------------
// Request / response types for the Gemini API
// ---------------------------------------------------------------------------

/// A text fragment inside a content block.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

/// A role-tagged content block.
#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part>,
}

/// Request body for `POST /v1beta/models/{model}:generateContent`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

/// Output constraints: JSON only, shaped by the schema.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a Value,
}

/// Response body from `generateContent`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

/// Present when the prompt itself was refused.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

/// Error envelope returned with non-2xx statuses.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    status: String,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Synchronous Gemini client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    base_url: String,
    model: String,
    api_key: Option<String>,
    timeout: Option<Duration>,
}

impl GeminiClient {
    /// Build a client from the resolved provider config.
    pub fn from_config(config: &ProviderConfig) -> Self {
        Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config
                .api_key
                .as_deref()
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .map(str::to_string),
            timeout: (config.timeout_ms > 0).then(|| Duration::from_millis(config.timeout_ms)),
        }
    }

    /// Full `generateContent` URL for the configured model.
    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// Send one generation request and return the model's text.
    ///
    /// Fails without touching the network when no credential is configured.
    pub fn generate(&self, system: &str, prompt: &str, schema: &Value) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .context("no API key configured (set GEMINI_API_KEY)")?;

        let body = GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: system.to_string(),
                }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema,
            },
        };

        let mut request = ureq::post(&self.endpoint()).set("x-goog-api-key", api_key);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let resp = match request.send_json(&body) {
            Ok(resp) => resp,
            Err(ureq::Error::Status(code, resp)) => {
                let detail = resp
                    .into_string()
                    .ok()
                    .and_then(|text| serde_json::from_str::<ErrorEnvelope>(&text).ok())
                    .map(|env| format!("{} {}", env.error.status, env.error.message))
                    .unwrap_or_default();
                anyhow::bail!("provider returned HTTP {code}: {}", detail.trim());
            }
            Err(e) => return Err(e).context("provider request failed"),
        };

        let parsed: GenerateResponse = resp
            .into_json()
            .context("failed to parse provider response envelope")?;

        let text = candidate_text(&parsed);
        if text.trim().is_empty() {
            match empty_reason(&parsed) {
                Some(reason) => anyhow::bail!("provider returned no text ({reason})"),
                None => anyhow::bail!("provider returned no text"),
            }
        }

        Ok(text)
    }

    /// Return the model name for logging.
    pub fn model_name(&self) -> &str {
        &self.model
    }

    /// Whether a credential is available.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Why a reply carried no text: a blocked prompt, or the first candidate's
/// finish reason.
fn empty_reason(response: &GenerateResponse) -> Option<String> {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_deref())
    {
        return Some(format!("prompt blocked: {reason}"));
    }
    response
        .candidates
        .first()
        .and_then(|c| c.finish_reason.as_deref())
        .map(|reason| format!("finish reason: {reason}"))
}

/// Concatenate the text parts of the first candidate.
fn candidate_text(response: &GenerateResponse) -> String {
    response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .map(|p| p.text.as_str())
                .collect::<String>()
        })
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
