//! Masked single-line prompt for entering the API key.

use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode},
};
use std::fmt;
use std::io::{self, Write};
use std::time::Duration;

const MASK_CHAR: char = '•';
const REVEALED_TAIL: usize = 4;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretInput {
    text: String,
    reveal_tail: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretAction {
    Insert(char),
    Paste(String),
    Backspace,
    DeleteWord,
    ClearAll,
    ToggleReveal,
    Submit,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretOutcome {
    Continue,
    Submit(String),
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct PromptError(String);

impl fmt::Display for PromptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for PromptError {}

impl From<io::Error> for PromptError {
    fn from(err: io::Error) -> Self {
        PromptError(err.to_string())
    }
}

impl SecretInput {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn apply(&mut self, action: SecretAction) -> SecretOutcome {
        match action {
            SecretAction::Insert(ch) => self.text.push(ch),
            SecretAction::Paste(pasted) => {
                // Keys pasted from a browser often carry a trailing newline.
                self.text
                    .extend(pasted.chars().filter(|ch| !ch.is_control()));
            }
            SecretAction::Backspace => {
                self.text.pop();
            }
            SecretAction::DeleteWord => {
                let kept = self.text.trim_end().rfind(char::is_whitespace);
                self.text.truncate(kept.map_or(0, |idx| idx + 1));
            }
            SecretAction::ClearAll => self.text.clear(),
            SecretAction::ToggleReveal => self.reveal_tail = !self.reveal_tail,
            SecretAction::Submit => return SecretOutcome::Submit(self.text.trim().to_string()),
            SecretAction::Cancel => return SecretOutcome::Cancelled,
        }
        SecretOutcome::Continue
    }

    /// Every character is masked except, when revealing, the last few.
    pub fn masked(&self) -> String {
        let total = self.text.chars().count();
        let visible = if self.reveal_tail {
            REVEALED_TAIL.min(total)
        } else {
            0
        };
        let mut out: String = std::iter::repeat(MASK_CHAR).take(total - visible).collect();
        out.extend(self.text.chars().skip(total - visible));
        out
    }
}

fn map_key(key: &KeyEvent) -> Option<SecretAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => Some(SecretAction::Submit),
        KeyCode::Esc => Some(SecretAction::Cancel),
        KeyCode::Char('c') if ctrl => Some(SecretAction::Cancel),
        KeyCode::Char('u') if ctrl => Some(SecretAction::ClearAll),
        KeyCode::Char('w') if ctrl => Some(SecretAction::DeleteWord),
        KeyCode::Char('r') if ctrl => Some(SecretAction::ToggleReveal),
        KeyCode::Backspace => Some(SecretAction::Backspace),
        KeyCode::Char(ch) if !ctrl => Some(SecretAction::Insert(ch)),
        _ => None,
    }
}

fn redraw(prompt: &str, input: &SecretInput) -> io::Result<()> {
    print!("\r\x1b[K{prompt}{}", input.masked());
    io::stdout().flush()
}

/// Reads a secret in raw mode. Ctrl+R toggles showing the last characters.
pub fn prompt_secret(prompt: &str) -> Result<String, PromptError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, event::EnableBracketedPaste)?;

    let result = (|| -> Result<String, PromptError> {
        let mut input = SecretInput::default();
        redraw(prompt, &input)?;
        loop {
            if !event::poll(Duration::from_millis(100))? {
                continue;
            }
            let action = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => map_key(&key),
                Event::Paste(text) => Some(SecretAction::Paste(text)),
                _ => None,
            };
            let Some(action) = action else { continue };
            match input.apply(action) {
                SecretOutcome::Continue => redraw(prompt, &input)?,
                SecretOutcome::Submit(value) => break Ok(value),
                SecretOutcome::Cancelled => break Err(PromptError("Cancelled by user".into())),
            }
        }
    })();

    let restore_raw = disable_raw_mode();
    let restore_paste = execute!(stdout, event::DisableBracketedPaste);
    println!();

    let value = result?;
    restore_raw?;
    restore_paste?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> SecretInput {
        let mut input = SecretInput::default();
        for ch in text.chars() {
            input.apply(SecretAction::Insert(ch));
        }
        input
    }

    #[test]
    fn masks_everything_by_default() {
        let input = typed("AIzaSecret");
        assert_eq!(input.masked(), "••••••••••");
    }

    #[test]
    fn reveal_shows_only_the_tail() {
        let mut input = typed("AIzaSecret");
        input.apply(SecretAction::ToggleReveal);
        assert_eq!(input.masked(), "••••••cret");

        let mut short = typed("ab");
        short.apply(SecretAction::ToggleReveal);
        assert_eq!(short.masked(), "ab");
    }

    #[test]
    fn paste_drops_control_characters() {
        let mut input = SecretInput::default();
        input.apply(SecretAction::Paste("key-123\r\n".to_string()));
        assert_eq!(input.text(), "key-123");
    }

    #[test]
    fn editing_actions() {
        let mut input = typed("first second");
        input.apply(SecretAction::DeleteWord);
        assert_eq!(input.text(), "first ");
        input.apply(SecretAction::Backspace);
        assert_eq!(input.text(), "first");
        input.apply(SecretAction::ClearAll);
        assert_eq!(input.text(), "");
    }

    #[test]
    fn submit_trims_and_cancel_aborts() {
        let mut input = typed("  key  ");
        assert_eq!(
            input.apply(SecretAction::Submit),
            SecretOutcome::Submit("key".to_string())
        );
        assert_eq!(input.apply(SecretAction::Cancel), SecretOutcome::Cancelled);
    }

    #[test]
    fn ctrl_keys_map_to_editing_actions() {
        let ctrl = |ch| KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL);
        assert_eq!(map_key(&ctrl('c')), Some(SecretAction::Cancel));
        assert_eq!(map_key(&ctrl('r')), Some(SecretAction::ToggleReveal));
        assert_eq!(
            map_key(&KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE)),
            Some(SecretAction::Insert('x'))
        );
        assert_eq!(map_key(&ctrl('z')), None);
    }
}
