mod registry;

pub use registry::{all_commands, CommandInvocation};

use crate::core::app::App;
use crate::core::transcript::Transcript;
use crate::utils::logging::{format_turn, write_entry};
use chrono::Utc;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};


#[derive(Debug, PartialEq, Eq)]
pub enum CommandResult {
    Continue,
    ProcessAsMessage(String),
    Quit,
}

pub fn process_input(app: &mut App, input: &str) -> CommandResult {
    let trimmed = input.trim();

    let Some(rest) = trimmed.strip_prefix('/') else {
        return CommandResult::ProcessAsMessage(input.to_string());
    };

    let mut parts = rest.splitn(2, ' ');
    let command_name = match parts.next() {
        Some(name) if !name.is_empty() => name,
        _ => return CommandResult::ProcessAsMessage(input.to_string()),
    };
    let args = parts.next().unwrap_or("").trim();

    // Unknown slash words are ordinary questions ("/s is the unit of...").
    match registry::find_command(command_name) {
        Some(command) => (command.handler)(app, CommandInvocation { args }),
        None => CommandResult::ProcessAsMessage(input.to_string()),
    }
}

fn timestamp_now() -> String {
    chrono::Local::now()
        .format("%Y-%m-%d %H:%M:%S %Z")
        .to_string()
}

pub(super) fn handle_help(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    let mut help = String::from("Commands:");
    for command in all_commands() {
        help.push_str(&format!("\n  {:<18} {}", command.usage, command.help));
    }
    help.push_str(&format!("\nLogging: {}", app.logging.status_string()));
    app.notify(help);
    CommandResult::Continue
}

pub(super) fn handle_clear(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    app.clear();
    if let Err(err) = app
        .logging
        .log_marker(&format!("Conversation cleared at {}", timestamp_now()))
    {
        app.notify(format!("Log error: {err}"));
    }
    app.notify("Riwayat chat dihapus.");
    CommandResult::Continue
}

pub(super) fn handle_log(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    match invocation.args_len() {
        0 => {
            let marker = if app.logging.is_active() {
                format!("Logging paused at {}", timestamp_now())
            } else {
                format!("Logging resumed at {}", timestamp_now())
            };
            match app.logging.toggle_logging(&marker) {
                Ok(message) => app.notify(message),
                Err(err) => app.notify(format!("Log error: {err}")),
            }
        }
        1 => {
            let filename = invocation.args;
            match app.logging.set_log_file(PathBuf::from(filename)) {
                Ok(message) => {
                    let marker = format!("Logging started at {}", timestamp_now());
                    if let Err(err) = app.logging.log_marker(&marker) {
                        app.notify(format!("Log error: {err}"));
                    }
                    app.notify(message);
                }
                Err(err) => app.notify(format!("Logfile error: {err}")),
            }
        }
        _ => app.notify("Usage: /log [filename]"),
    }
    CommandResult::Continue
}

pub(super) fn handle_dump(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    let filename = match invocation.args_len() {
        0 => default_dump_filename(),
        1 => invocation.args.to_string(),
        _ => {
            app.notify("Usage: /dump [filename]");
            return CommandResult::Continue;
        }
    };

    let result = match app.transcript() {
        Some(transcript) => dump_transcript(transcript, Path::new(&filename)),
        None => Err("No conversation to dump.".into()),
    };
    match result {
        Ok(()) => app.notify(format!("Conversation dumped to: {filename}")),
        Err(err) => app.notify(format!("Dump error: {err}")),
    }
    CommandResult::Continue
}

pub(super) fn handle_quit(_app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::Quit
}

pub fn default_dump_filename() -> String {
    format!("physbot-log-{}.txt", Utc::now().format("%Y-%m-%d"))
}

/// Writes every turn in log format. Existing files are never overwritten.
pub fn dump_transcript(
    transcript: &Transcript,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|err| -> Box<dyn std::error::Error> {
            if err.kind() == std::io::ErrorKind::AlreadyExists {
                format!("{} already exists", path.display()).into()
            } else {
                Box::new(err)
            }
        })?;

    let mut writer = BufWriter::new(file);
    for turn in transcript.turns() {
        write_entry(&mut writer, &format_turn(turn))?;
    }
    writer.flush()?;
    Ok(())
}
