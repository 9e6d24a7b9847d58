//! Conversation store and replay engine.
//!
//! The engine owns one [`Transcript`] per session and is the only code that
//! mutates it. Each submit appends the user turn, replays everything before
//! it through a freshly built [`ChatSession`], and appends the assistant turn
//! only when the model produced usable text.

use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::api::{ChatModel, RemoteError};
use crate::core::constants::default_request_timeout;
use crate::core::message::Turn;
use crate::core::session::{ChatSession, MemoryTranscriptStore, SessionId, TranscriptStore};
use crate::core::transcript::Transcript;


/// Result of one submit. Remote problems end up here rather than in an `Err`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Ok(String),
    EmptyResponse,
    Failure(RemoteError),
}

impl SubmitOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, SubmitOutcome::Ok(_))
    }
}

/// What happens to the user turn when its exchange does not produce an
/// answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// The question stays in the transcript and is replayed as context on
    /// the next submit.
    #[default]
    KeepUserTurn,
    /// The unanswered question is removed again.
    RollbackUserTurn,
}

impl FailurePolicy {
    pub fn from_rollback_flag(rollback: bool) -> Self {
        if rollback {
            FailurePolicy::RollbackUserTurn
        } else {
            FailurePolicy::KeepUserTurn
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    pub request_timeout: Duration,
    pub failure_policy: FailurePolicy,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            request_timeout: default_request_timeout(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

/// Caller mistakes. Neither variant touches any transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    NotInitialized(SessionId),
    EmptyMessage,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::NotInitialized(id) => write!(f, "session {id} has not been initialized"),
            SessionError::EmptyMessage => write!(f, "message must not be empty"),
        }
    }
}

impl StdError for SessionError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Empty,
    Seeded,
    Active,
}

pub struct ChatEngine<M, S = MemoryTranscriptStore> {
    model: M,
    store: S,
    settings: EngineSettings,
}

impl<M: ChatModel> ChatEngine<M, MemoryTranscriptStore> {
    pub fn new(model: M, settings: EngineSettings) -> Self {
        Self::with_store(model, MemoryTranscriptStore::new(), settings)
    }
}

impl<M: ChatModel, S: TranscriptStore> ChatEngine<M, S> {
    pub fn with_store(model: M, store: S, settings: EngineSettings) -> Self {
        Self {
            model,
            store,
            settings,
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Seeds a transcript for `id` unless one exists. Returns whether a new
    /// transcript was created.
    pub fn initialize(&mut self, id: &SessionId) -> bool {
        if self.store.contains(id) {
            return false;
        }
        self.store.insert(id.clone(), Transcript::seeded());
        info!(session = %id, "session initialized");
        true
    }

    pub fn reset(&mut self, id: &SessionId) {
        match self.store.get_mut(id) {
            Some(transcript) => transcript.reset(),
            None => self.store.insert(id.clone(), Transcript::seeded()),
        }
        info!(session = %id, "session reset");
    }

    pub fn transcript(&self, id: &SessionId) -> Option<&Transcript> {
        self.store.get(id)
    }

    pub fn state(&self, id: &SessionId) -> SessionState {
        match self.store.get(id) {
            None => SessionState::Empty,
            Some(transcript) if transcript.is_seeded_only() => SessionState::Seeded,
            Some(_) => SessionState::Active,
        }
    }

    pub async fn submit(
        &mut self,
        id: &SessionId,
        user_text: &str,
    ) -> Result<SubmitOutcome, SessionError> {
        self.submit_with_cancel(id, user_text, &CancellationToken::new())
            .await
    }

    /// Runs one exchange. Cancelling `cancel` while the call is in flight
    /// resolves it as [`RemoteError::Cancelled`].
    pub async fn submit_with_cancel(
        &mut self,
        id: &SessionId,
        user_text: &str,
        cancel: &CancellationToken,
    ) -> Result<SubmitOutcome, SessionError> {
        if user_text.trim().is_empty() {
            return Err(SessionError::EmptyMessage);
        }

        let transcript = self
            .store
            .get_mut(id)
            .ok_or_else(|| SessionError::NotInitialized(id.clone()))?;
        transcript.push(Turn::user(user_text));

        let replayed = &transcript.turns()[..transcript.len() - 1];
        let session = ChatSession::replaying(replayed, self.settings.request_timeout);
        debug!(
            session = %id,
            replayed_turns = session.history().len(),
            "submitting message"
        );

        let outcome = match session.send_message(&self.model, user_text, cancel).await {
            Ok(reply) => match reply.usable_text() {
                Some(text) => SubmitOutcome::Ok(text),
                None => SubmitOutcome::EmptyResponse,
            },
            Err(error) => SubmitOutcome::Failure(error),
        };

        let transcript = self
            .store
            .get_mut(id)
            .ok_or_else(|| SessionError::NotInitialized(id.clone()))?;
        let rollback = self.settings.failure_policy == FailurePolicy::RollbackUserTurn;
        match &outcome {
            SubmitOutcome::Ok(text) => transcript.push(Turn::assistant(text.as_str())),
            SubmitOutcome::EmptyResponse => {
                warn!(session = %id, "remote call returned no text");
                if rollback {
                    transcript.pop_unanswered_user();
                }
            }
            SubmitOutcome::Failure(error) => {
                warn!(session = %id, error = %error, "remote call failed");
                if rollback {
                    transcript.pop_unanswered_user();
                }
            }
        }

        Ok(outcome)
    }
}
