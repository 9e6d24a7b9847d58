//! Remote model seam.
//!
//! The conversation engine only talks to a [`ChatModel`]; [`gemini`] holds
//! the HTTP implementation used at runtime.

pub mod gemini;

use async_trait::async_trait;
use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

use crate::core::message::Turn;

pub use gemini::GeminiClient;

/// One call to the remote model: the replayed history plus the live message.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub prior_turns: Vec<Turn>,
    pub new_message: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModelReply {
    pub text: Option<String>,
}

impl ModelReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    pub fn empty() -> Self {
        Self { text: None }
    }

    /// The reply text when it carries anything besides whitespace.
    pub fn usable_text(self) -> Option<String> {
        self.text.filter(|text| !text.trim().is_empty())
    }
}

#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn send(&self, request: ChatRequest) -> Result<ModelReply, RemoteError>;
}

#[async_trait]
impl<T: ChatModel + ?Sized> ChatModel for Box<T> {
    async fn send(&self, request: ChatRequest) -> Result<ModelReply, RemoteError> {
        (**self).send(request).await
    }
}

/// Every way a remote call can fail. None of these stop the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    Timeout(Duration),
    Network(String),
    Unauthorized(String),
    QuotaExceeded(String),
    Http { status: u16, message: String },
    Decode(String),
    Cancelled,
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteError::Timeout(limit) => {
                write!(f, "request timed out after {}s", limit.as_secs())
            }
            RemoteError::Network(message) => write!(f, "network error: {message}"),
            RemoteError::Unauthorized(message) => write!(f, "invalid API key: {message}"),
            RemoteError::QuotaExceeded(message) => write!(f, "quota exceeded: {message}"),
            RemoteError::Http { status, message } => {
                write!(f, "API request failed with status {status}: {message}")
            }
            RemoteError::Decode(message) => write!(f, "unreadable API response: {message}"),
            RemoteError::Cancelled => write!(f, "request cancelled"),
        }
    }
}

impl StdError for RemoteError {}
