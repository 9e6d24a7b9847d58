//! Text shown in the terminal around the conversation.

use ratatui::crossterm::style::Stylize;

use crate::api::RemoteError;
use crate::core::engine::SubmitOutcome;
use crate::core::message::{Speaker, Turn};
use crate::core::transcript::Transcript;

pub const TITLE: &str = "⚛️ Chatbot Ahli Fisika";
pub const DESCRIPTION: &str = "Selamat datang! Saya adalah Chatbot Ahli Fisika.\n\
Anda bisa bertanya tentang rumus atau konsep Fisika.\n\
Saya akan memberikan jawaban singkat dan faktual, serta menolak pertanyaan non-fisika.";
pub const INPUT_HINT: &str = "Tulis pertanyaan Anda di sini... (/help untuk perintah)";
pub const THINKING: &str = "Chatbot sedang berpikir... (Ctrl+C untuk membatalkan)";
pub const EMPTY_REPLY_MESSAGE: &str =
    "Maaf, saya tidak bisa memberikan balasan. Respons API kosong atau tidak valid.";
pub const FAILURE_HINT: &str = "Kemungkinan penyebab: masalah koneksi internet, \
API Key tidak valid/melebihi kuota, atau masalah internal server Gemini.";

pub fn speaker_label(speaker: Speaker) -> &'static str {
    match speaker {
        Speaker::User => "You:",
        Speaker::Assistant => "Assistant:",
    }
}

pub fn failure_message(error: &RemoteError) -> String {
    format!("Maaf, terjadi kesalahan saat berkomunikasi dengan Gemini: {error}")
}

/// Assistant-side lines for an outcome, unstyled.
pub fn outcome_lines(outcome: &SubmitOutcome) -> Vec<String> {
    match outcome {
        SubmitOutcome::Ok(reply) => vec![reply.clone()],
        SubmitOutcome::EmptyResponse => vec![EMPTY_REPLY_MESSAGE.to_string()],
        SubmitOutcome::Failure(error) => vec![failure_message(error), FAILURE_HINT.to_string()],
    }
}

pub fn print_banner() {
    println!("{}", TITLE.bold());
    println!("{DESCRIPTION}");
    println!();
}

pub fn print_turn(turn: &Turn) {
    print_message(turn.speaker(), turn.text());
}

pub fn print_message(speaker: Speaker, text: &str) {
    let label = speaker_label(speaker);
    match speaker {
        Speaker::User => println!("{} {}", label.cyan().bold(), text.cyan()),
        Speaker::Assistant => println!("{} {text}", label.green().bold()),
    }
    println!();
}

pub fn print_transcript(transcript: &Transcript) {
    for turn in transcript.turns() {
        print_turn(turn);
    }
}

pub fn print_outcome(outcome: &SubmitOutcome) {
    for line in outcome_lines(outcome) {
        print_message(Speaker::Assistant, &line);
    }
}

pub fn print_notice(notice: &str) {
    println!("{}", notice.dark_grey());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn ok_outcome_prints_reply_verbatim() {
        let outcome = SubmitOutcome::Ok("F = m·a".to_string());
        assert_eq!(outcome_lines(&outcome), vec!["F = m·a"]);
    }

    #[test]
    fn empty_outcome_uses_fixed_apology() {
        assert_eq!(
            outcome_lines(&SubmitOutcome::EmptyResponse),
            vec![EMPTY_REPLY_MESSAGE]
        );
    }

    #[test]
    fn failure_outcome_includes_detail_and_hint() {
        let outcome = SubmitOutcome::Failure(RemoteError::Timeout(Duration::from_secs(60)));
        let lines = outcome_lines(&outcome);
        assert_eq!(lines.len(), 2);
        assert!(lines[0]
            .starts_with("Maaf, terjadi kesalahan saat berkomunikasi dengan Gemini: "));
        assert!(lines[0].contains(&RemoteError::Timeout(Duration::from_secs(60)).to_string()));
        assert_eq!(lines[1], FAILURE_HINT);
    }

    #[test]
    fn labels() {
        assert_eq!(speaker_label(Speaker::User), "You:");
        assert_eq!(speaker_label(Speaker::Assistant), "Assistant:");
    }
}
