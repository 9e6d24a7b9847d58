//! One-shot question without the chat loop.

use std::error::Error;

use tokio_util::sync::CancellationToken;

use crate::core::app::App;
use crate::core::engine::SubmitOutcome;
use crate::ui::chat_loop::cancel_on_interrupt;
use crate::ui::render::outcome_lines;

pub fn exit_code(outcome: &SubmitOutcome) -> i32 {
    if outcome.is_ok() {
        0
    } else {
        1
    }
}

pub async fn ask_once(
    app: &mut App,
    question: &str,
    cancel: &CancellationToken,
) -> Result<SubmitOutcome, Box<dyn Error>> {
    Ok(app.submit(question, cancel).await?)
}

/// Prints the reply on stdout, or the apology on stderr, and returns the
/// process exit code.
pub async fn run_ask(mut app: App, question: Vec<String>) -> Result<i32, Box<dyn Error>> {
    let question = question.join(" ");
    if question.trim().is_empty() {
        eprintln!("Usage: physbot ask <question>");
        return Ok(1);
    }

    let cancel = CancellationToken::new();
    let outcome = cancel_on_interrupt(&cancel, ask_once(&mut app, &question, &cancel)).await?;

    for line in outcome_lines(&outcome) {
        if outcome.is_ok() {
            println!("{line}");
        } else {
            eprintln!("{line}");
        }
    }
    for notice in app.take_notices() {
        eprintln!("{notice}");
    }
    Ok(exit_code(&outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ModelReply, RemoteError};
    use crate::utils::test_utils::{create_test_app, Scripted, ScriptedModel};

    #[tokio::test]
    async fn answered_question_exits_zero() {
        let app = create_test_app(ScriptedModel::replying(&["W = F·s"]));
        let code = run_ask(app, vec!["rumus".into(), "usaha?".into()])
            .await
            .unwrap();
        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn question_words_are_joined() {
        let model = ScriptedModel::replying(&["W = F·s"]);
        let app = create_test_app(model.clone());
        run_ask(app, vec!["rumus".into(), "usaha?".into()])
            .await
            .unwrap();
        assert_eq!(model.requests()[0].new_message, "rumus usaha?");
    }

    #[tokio::test]
    async fn empty_and_failed_replies_exit_one() {
        let app = create_test_app(ScriptedModel::with(vec![Scripted::Reply(
            ModelReply::empty(),
        )]));
        assert_eq!(run_ask(app, vec!["q".into()]).await.unwrap(), 1);

        let app = create_test_app(ScriptedModel::with(vec![Scripted::Fail(
            RemoteError::Unauthorized("API key not valid".to_string()),
        )]));
        assert_eq!(run_ask(app, vec!["q".into()]).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn blank_question_is_a_usage_error() {
        let model = ScriptedModel::replying(&[]);
        let app = create_test_app(model.clone());
        assert_eq!(run_ask(app, vec!["  ".into()]).await.unwrap(), 1);
        assert!(model.requests().is_empty());
    }
}
