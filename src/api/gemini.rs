//! Gemini `generateContent` client.
//!
//! Replays the prior turns as `contents`, appends the live user message and
//! reads the first candidate's text back. Transport and HTTP failures are
//! classified into [`RemoteError`] so callers never see a raw reqwest error.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use super::{ChatModel, ChatRequest, ModelReply, RemoteError};
use crate::core::message::{Speaker, Turn};
use crate::utils::url::generate_content_url;

/// Generation parameters sent with every request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    settings: GenerationSettings,
}

impl GeminiClient {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            settings,
        }
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }
}

#[async_trait]
impl ChatModel for GeminiClient {
    async fn send(&self, request: ChatRequest) -> Result<ModelReply, RemoteError> {
        let url = generate_content_url(&self.base_url, &self.settings.model);
        let timeout = request.timeout;
        let body = build_request_body(&request, &self.settings);

        debug!(
            model = %self.settings.model,
            prior_turns = request.prior_turns.len(),
            "sending generateContent request"
        );

        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .timeout(timeout)
            .json(&body)
            .send()
            .await
            .map_err(|err| map_transport_error(err, timeout))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            let error = map_http_error(status, &error_text);
            warn!(status = status.as_u16(), error = %error, "generateContent failed");
            return Err(error);
        }

        let payload = response
            .text()
            .await
            .map_err(|err| map_transport_error(err, timeout))?;
        let parsed: GenerateContentResponse =
            serde_json::from_str(&payload).map_err(|err| RemoteError::Decode(err.to_string()))?;

        let reply = extract_reply(parsed);
        debug!(has_text = reply.text.is_some(), "generateContent completed");
        Ok(reply)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub(crate) struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub(crate) struct Part {
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CandidatePart {
    pub text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn turn_to_content(turn: &Turn) -> Content {
    Content {
        role: turn.speaker().to_api_role().to_string(),
        parts: vec![Part {
            text: turn.text().to_string(),
        }],
    }
}

pub(crate) fn build_request_body(
    request: &ChatRequest,
    settings: &GenerationSettings,
) -> GenerateContentRequest {
    let mut contents: Vec<Content> = request.prior_turns.iter().map(turn_to_content).collect();
    contents.push(turn_to_content(&Turn::new(
        Speaker::User,
        request.new_message.as_str(),
    )));

    GenerateContentRequest {
        contents,
        generation_config: GenerationConfig {
            temperature: settings.temperature,
            max_output_tokens: settings.max_output_tokens,
        },
    }
}

/// Joins the text parts of the first candidate. A response without
/// candidates (for example a prompt blocked by safety filters) is an empty
/// reply rather than an error.
pub(crate) fn extract_reply(response: GenerateContentResponse) -> ModelReply {
    let Some(candidate) = response.candidates.into_iter().next() else {
        return ModelReply::empty();
    };

    if let Some(reason) = candidate.finish_reason.as_deref() {
        if reason != "STOP" {
            debug!(finish_reason = reason, "candidate finished early");
        }
    }

    let text: String = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        ModelReply::empty()
    } else {
        ModelReply::text(text)
    }
}

fn map_transport_error(err: reqwest::Error, timeout: Duration) -> RemoteError {
    if err.is_timeout() {
        RemoteError::Timeout(timeout)
    } else if err.is_decode() {
        RemoteError::Decode(err.to_string())
    } else {
        RemoteError::Network(err.to_string())
    }
}

fn error_summary(body: &str) -> (Option<String>, String) {
    match serde_json::from_str::<ErrorWrapper>(body) {
        Ok(wrapper) => {
            let message = wrapper
                .error
                .message
                .map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
                .unwrap_or_else(|| body.trim().to_string());
            (wrapper.error.status, message)
        }
        Err(_) => {
            let trimmed = body.trim();
            let message = if trimmed.is_empty() {
                "<empty>".to_string()
            } else {
                trimmed.to_string()
            };
            (None, message)
        }
    }
}

pub(crate) fn map_http_error(status: StatusCode, body: &str) -> RemoteError {
    let (google_status, message) = error_summary(body);
    let google_status = google_status.unwrap_or_default();

    if status == StatusCode::UNAUTHORIZED
        || status == StatusCode::FORBIDDEN
        || google_status == "UNAUTHENTICATED"
        || google_status == "PERMISSION_DENIED"
        || body.contains("API_KEY_INVALID")
    {
        return RemoteError::Unauthorized(message);
    }

    if status == StatusCode::TOO_MANY_REQUESTS || google_status == "RESOURCE_EXHAUSTED" {
        return RemoteError::QuotaExceeded(message);
    }

    let message = if google_status.is_empty() {
        message
    } else {
        format!("{google_status}: {message}")
    };
    RemoteError::Http {
        status: status.as_u16(),
        message,
    }
}
