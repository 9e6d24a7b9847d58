use crate::api::{ChatModel, ChatRequest, ModelReply, RemoteError};
use crate::core::app::App;
use crate::core::engine::EngineSettings;
use crate::core::session::SessionId;
use crate::utils::logging::LoggingState;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub enum Scripted {
    Reply(ModelReply),
    Fail(RemoteError),
    /// Never answers within any realistic timeout.
    Hang,
}

/// Plays back queued responses and records every request it receives.
/// An exhausted script behaves like [`Scripted::Hang`].
#[derive(Clone)]
pub struct ScriptedModel {
    script: Arc<Mutex<VecDeque<Scripted>>>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl ScriptedModel {
    pub fn with(script: Vec<Scripted>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn replying(replies: &[&str]) -> Self {
        Self::with(
            replies
                .iter()
                .map(|text| Scripted::Reply(ModelReply::text(*text)))
                .collect(),
        )
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn send(&self, request: ChatRequest) -> Result<ModelReply, RemoteError> {
        self.requests.lock().unwrap().push(request);
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Scripted::Reply(reply)) => Ok(reply),
            Some(Scripted::Fail(error)) => Err(error),
            Some(Scripted::Hang) | None => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(ModelReply::text("too late"))
            }
        }
    }
}

pub fn create_test_app(model: ScriptedModel) -> App {
    App::new(
        Box::new(model),
        EngineSettings::default(),
        SessionId::new("test-session"),
        LoggingState::new(None).unwrap(),
    )
}
