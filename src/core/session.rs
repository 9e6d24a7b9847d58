//! Per-session state: the keyed transcript store and the derived model
//! session that is rebuilt from a transcript on every submit.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::api::{ChatModel, ChatRequest, ModelReply, RemoteError};
use crate::core::message::Turn;
use crate::core::transcript::Transcript;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Random 128-bit identifier rendered as lowercase hex.
    pub fn generate() -> Result<Self, getrandom::Error> {
        let mut bytes = [0u8; 16];
        getrandom::fill(&mut bytes)?;
        let id = bytes.iter().map(|byte| format!("{byte:02x}")).collect();
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Durable home of every session's transcript.
pub trait TranscriptStore: Send {
    fn get(&self, id: &SessionId) -> Option<&Transcript>;
    fn get_mut(&mut self, id: &SessionId) -> Option<&mut Transcript>;
    fn insert(&mut self, id: SessionId, transcript: Transcript);
    fn remove(&mut self, id: &SessionId) -> Option<Transcript>;

    fn contains(&self, id: &SessionId) -> bool {
        self.get(id).is_some()
    }
}

#[derive(Debug, Default)]
pub struct MemoryTranscriptStore {
    transcripts: HashMap<SessionId, Transcript>,
}

impl MemoryTranscriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.transcripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transcripts.is_empty()
    }
}

impl TranscriptStore for MemoryTranscriptStore {
    fn get(&self, id: &SessionId) -> Option<&Transcript> {
        self.transcripts.get(id)
    }

    fn get_mut(&mut self, id: &SessionId) -> Option<&mut Transcript> {
        self.transcripts.get_mut(id)
    }

    fn insert(&mut self, id: SessionId, transcript: Transcript) {
        self.transcripts.insert(id, transcript);
    }

    fn remove(&mut self, id: &SessionId) -> Option<Transcript> {
        self.transcripts.remove(id)
    }
}

/// Model-side view of a conversation, derived from transcript turns.
///
/// Built fresh for each submit and dropped afterwards, so it can never lag
/// behind the transcript it was built from.
#[derive(Debug, Clone)]
pub struct ChatSession {
    history: Vec<Turn>,
    timeout: Duration,
}

impl ChatSession {
    pub fn replaying(history: &[Turn], timeout: Duration) -> Self {
        Self {
            history: history.to_vec(),
            timeout,
        }
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn request(&self, message: &str) -> ChatRequest {
        ChatRequest {
            prior_turns: self.history.clone(),
            new_message: message.to_string(),
            timeout: self.timeout,
        }
    }

    /// Sends `message` with the history as context. Resolves to
    /// [`RemoteError::Timeout`] once the bound elapses, whatever the model
    /// implementation does, and to [`RemoteError::Cancelled`] if `cancel`
    /// fires first.
    pub async fn send_message(
        &self,
        model: &dyn ChatModel,
        message: &str,
        cancel: &CancellationToken,
    ) -> Result<ModelReply, RemoteError> {
        let request = self.request(message);
        tokio::select! {
            result = tokio::time::timeout(self.timeout, model.send(request)) => {
                match result {
                    Ok(reply) => reply,
                    Err(_) => Err(RemoteError::Timeout(self.timeout)),
                }
            }
            _ = cancel.cancelled() => Err(RemoteError::Cancelled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_hex_and_distinct() {
        let first = SessionId::generate().unwrap();
        let second = SessionId::generate().unwrap();
        assert_eq!(first.as_str().len(), 32);
        assert!(first.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(first, second);
    }

    #[test]
    fn memory_store_keeps_sessions_apart() {
        let mut store = MemoryTranscriptStore::new();
        let alice = SessionId::new("alice");
        let bob = SessionId::new("bob");

        store.insert(alice.clone(), Transcript::seeded());
        store.insert(bob.clone(), Transcript::seeded());
        store
            .get_mut(&alice)
            .unwrap()
            .push(Turn::user("apa itu energi?"));

        assert_eq!(store.get(&alice).unwrap().len(), 3);
        assert_eq!(store.get(&bob).unwrap().len(), 2);
        assert_eq!(store.len(), 2);

        assert!(store.remove(&alice).is_some());
        assert!(!store.contains(&alice));
    }

    #[test]
    fn request_carries_history_message_and_timeout() {
        let transcript = Transcript::seeded();
        let session = ChatSession::replaying(transcript.turns(), Duration::from_secs(60));
        let request = session.request("E = mc^2?");

        assert_eq!(request.prior_turns, transcript.turns());
        assert_eq!(request.new_message, "E = mc^2?");
        assert_eq!(request.timeout, Duration::from_secs(60));
    }
}
