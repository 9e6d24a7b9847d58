//! State for one interactive terminal session: the engine, the session it
//! is bound to, the conversation log, and pending notices for the display.

use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::api::ChatModel;
use crate::core::engine::{ChatEngine, EngineSettings, SessionError, SubmitOutcome};
use crate::core::message::Turn;
use crate::core::session::SessionId;
use crate::core::transcript::Transcript;
use crate::utils::logging::LoggingState;

pub type DynChatModel = Box<dyn ChatModel>;

pub struct App {
    engine: ChatEngine<DynChatModel>,
    session_id: SessionId,
    pub logging: LoggingState,
    notices: Vec<String>,
}

impl App {
    pub fn new(
        model: DynChatModel,
        settings: EngineSettings,
        session_id: SessionId,
        logging: LoggingState,
    ) -> Self {
        let mut engine = ChatEngine::new(model, settings);
        engine.initialize(&session_id);
        Self {
            engine,
            session_id,
            logging,
            notices: Vec::new(),
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Borrow of the live transcript. The app seeds its session on
    /// construction and `clear` re-seeds, so this is always present.
    pub fn transcript(&self) -> Option<&Transcript> {
        self.engine.transcript(&self.session_id)
    }

    pub async fn submit(
        &mut self,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<SubmitOutcome, SessionError> {
        let outcome = self
            .engine
            .submit_with_cancel(&self.session_id, text, cancel)
            .await?;

        self.log_turn(&Turn::user(text));
        if let SubmitOutcome::Ok(reply) = &outcome {
            self.log_turn(&Turn::assistant(reply.as_str()));
        }
        Ok(outcome)
    }

    pub fn clear(&mut self) {
        self.engine.reset(&self.session_id);
    }

    pub fn notify(&mut self, message: impl Into<String>) {
        self.notices.push(message.into());
    }

    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    fn log_turn(&mut self, turn: &Turn) {
        if let Err(err) = self.logging.log_turn(turn) {
            warn!(error = %err, "failed to write conversation log");
            self.notify(format!("Log error: {err}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::{create_test_app, ScriptedModel};
    use tempfile::TempDir;

    #[tokio::test]
    async fn submit_logs_both_sides_of_a_successful_exchange() {
        let dir = TempDir::new().unwrap();
        let log_path = dir.path().join("chat.log");
        let mut app = create_test_app(ScriptedModel::replying(&["p = mv"]));
        app.logging.set_log_file(log_path.clone()).unwrap();

        let outcome = app
            .submit("momentum?", &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(outcome, SubmitOutcome::Ok("p = mv".to_string()));
        assert_eq!(app.transcript().unwrap().len(), 4);
        let contents = std::fs::read_to_string(log_path).unwrap();
        assert_eq!(contents, "You: momentum?\n\np = mv\n\n");
    }

    #[tokio::test]
    async fn clear_restores_the_preamble() {
        let mut app = create_test_app(ScriptedModel::replying(&["a"]));
        app.submit("q", &CancellationToken::new()).await.unwrap();
        assert_eq!(app.transcript().unwrap().len(), 4);

        app.clear();
        assert_eq!(app.transcript().unwrap(), &Transcript::seeded());
    }

    #[test]
    fn notices_are_drained_once() {
        let mut app = create_test_app(ScriptedModel::replying(&[]));
        app.notify("one");
        app.notify("two");
        assert_eq!(app.take_notices(), vec!["one", "two"]);
        assert!(app.take_notices().is_empty());
    }
}
