//! Line-oriented chat loop.
//!
//! Reads one question per line from stdin, runs it through the engine and
//! prints the outcome. Ctrl+C while waiting cancels the pending call;
//! Ctrl+C at the prompt leaves the chat.

use std::error::Error;
use std::future::Future;
use std::io::{self, Write};

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::commands::{process_input, CommandResult};
use crate::core::app::App;
use crate::core::message::Speaker;
use crate::ui::render;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Quit,
}

fn print_prompt() -> io::Result<()> {
    print!("> ");
    io::stdout().flush()
}

fn flush_notices(app: &mut App) {
    for notice in app.take_notices() {
        render::print_notice(&notice);
    }
}

pub async fn run_chat(app: App) -> Result<(), Box<dyn Error>> {
    run_chat_with_input(app, BufReader::new(tokio::io::stdin())).await
}

pub async fn run_chat_with_input<R>(mut app: App, input: R) -> Result<(), Box<dyn Error>>
where
    R: AsyncBufRead + Unpin,
{
    render::print_banner();
    if let Some(transcript) = app.transcript() {
        render::print_transcript(transcript);
    }
    render::print_notice(render::INPUT_HINT);
    flush_notices(&mut app);

    let mut lines = input.lines();
    loop {
        print_prompt()?;
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                println!();
                None
            }
        };
        let Some(line) = line else {
            break;
        };

        let cancel = CancellationToken::new();
        let control = cancel_on_interrupt(&cancel, handle_line(&mut app, &line, &cancel)).await;

        if control == LoopControl::Quit {
            break;
        }
    }

    info!(session = %app.session_id(), "chat ended");
    Ok(())
}

/// Drives `work` to completion, cancelling `cancel` on Ctrl+C. The signal
/// listener is polled first so it is installed before `work` starts.
pub async fn cancel_on_interrupt<F: Future>(cancel: &CancellationToken, work: F) -> F::Output {
    tokio::pin!(work);
    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);
    let mut interrupted = false;

    loop {
        tokio::select! {
            biased;
            result = &mut interrupt, if !interrupted => {
                interrupted = true;
                if result.is_ok() {
                    debug!("interrupt received, cancelling request");
                    cancel.cancel();
                }
            }
            output = &mut work => return output,
        }
    }
}

/// Handles one line of input: a slash command or a question.
pub async fn handle_line(app: &mut App, line: &str, cancel: &CancellationToken) -> LoopControl {
    if line.trim().is_empty() {
        return LoopControl::Continue;
    }

    let control = match process_input(app, line) {
        CommandResult::Continue => LoopControl::Continue,
        CommandResult::Quit => LoopControl::Quit,
        CommandResult::ProcessAsMessage(message) => {
            ask(app, &message, cancel).await;
            LoopControl::Continue
        }
    };
    flush_notices(app);
    control
}

async fn ask(app: &mut App, message: &str, cancel: &CancellationToken) {
    render::print_message(Speaker::User, message);
    render::print_notice(render::THINKING);

    match app.submit(message, cancel).await {
        Ok(outcome) => {
            debug!(ok = outcome.is_ok(), "rendering outcome");
            render::print_outcome(&outcome);
        }
        Err(err) => app.notify(err.to_string()),
    }
}
