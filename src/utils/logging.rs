//! Plain-text conversation log.
//!
//! User turns are written as `You: <text>`, assistant turns as-is, and log
//! markers with a `## ` prefix. Every entry is followed by a blank line.

use crate::core::message::{Speaker, Turn};
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const USER_PREFIX: &str = "You: ";

pub fn format_turn(turn: &Turn) -> String {
    match turn.speaker() {
        Speaker::User => format!("{USER_PREFIX}{}", turn.text()),
        Speaker::Assistant => turn.text().to_string(),
    }
}

pub fn write_entry<W: Write>(writer: &mut W, content: &str) -> std::io::Result<()> {
    for line in content.lines() {
        writeln!(writer, "{line}")?;
    }
    writeln!(writer)
}

pub struct LoggingState {
    file_path: Option<PathBuf>,
    is_active: bool,
}

impl LoggingState {
    /// A path given up front (from `--log`) starts logging immediately.
    pub fn new(log_file: Option<PathBuf>) -> Result<Self, Box<dyn std::error::Error>> {
        let mut logging = LoggingState {
            file_path: None,
            is_active: false,
        };
        if let Some(path) = log_file {
            logging.set_log_file(path)?;
        }
        Ok(logging)
    }

    pub fn set_log_file(&mut self, path: PathBuf) -> Result<String, Box<dyn std::error::Error>> {
        Self::test_file_access(&path)?;

        let message = format!("Logging enabled to: {}", path.display());
        self.file_path = Some(path);
        self.is_active = true;
        Ok(message)
    }

    /// Pauses or resumes logging. `marker` is written to the log on both
    /// transitions so gaps are visible in the file.
    pub fn toggle_logging(&mut self, marker: &str) -> Result<String, Box<dyn std::error::Error>> {
        let Some(path) = self.file_path.clone() else {
            return Err("No log file specified. Use /log <filename> to enable logging first.".into());
        };

        if self.is_active {
            self.log_marker(marker)?;
            self.is_active = false;
            Ok(format!("Logging paused (file: {})", path.display()))
        } else {
            self.is_active = true;
            self.log_marker(marker)?;
            Ok(format!("Logging resumed to: {}", path.display()))
        }
    }

    pub fn log_turn(&self, turn: &Turn) -> Result<(), Box<dyn std::error::Error>> {
        self.log_raw(&format_turn(turn))
    }

    pub fn log_marker(&self, marker: &str) -> Result<(), Box<dyn std::error::Error>> {
        self.log_raw(&format!("## {marker}"))
    }

    fn log_raw(&self, content: &str) -> Result<(), Box<dyn std::error::Error>> {
        let Some(path) = self.file_path.as_ref().filter(|_| self.is_active) else {
            return Ok(());
        };

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut writer = BufWriter::new(file);
        write_entry(&mut writer, content)?;
        writer.flush()?;
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn status_string(&self) -> String {
        let file_name = |path: &Path| {
            path.file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .into_owned()
        };
        match (&self.file_path, self.is_active) {
            (None, _) => "disabled".to_string(),
            (Some(path), true) => format!("active ({})", file_name(path)),
            (Some(path), false) => format!("paused ({})", file_name(path)),
        }
    }

    fn test_file_access(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn logs_turns_in_transcript_format() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chat.log");
        let logging = LoggingState::new(Some(path.clone())).unwrap();
        assert!(logging.is_active());

        logging.log_turn(&Turn::user("Apa itu F = ma?")).unwrap();
        logging
            .log_turn(&Turn::assistant("Hukum Newton II.\nF adalah gaya."))
            .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "You: Apa itu F = ma?\n\nHukum Newton II.\nF adalah gaya.\n\n"
        );
    }

    #[test]
    fn toggle_pauses_and_resumes_with_markers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chat.log");
        let mut logging = LoggingState::new(Some(path.clone())).unwrap();

        let paused = logging.toggle_logging("Logging paused").unwrap();
        assert!(paused.starts_with("Logging paused"));
        assert!(!logging.is_active());
        assert_eq!(logging.status_string(), "paused (chat.log)");

        logging.log_turn(&Turn::user("not written")).unwrap();

        logging.toggle_logging("Logging resumed").unwrap();
        assert_eq!(logging.status_string(), "active (chat.log)");

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "## Logging paused\n\n## Logging resumed\n\n");
    }

    #[test]
    fn toggle_without_file_is_an_error() {
        let mut logging = LoggingState::new(None).unwrap();
        assert_eq!(logging.status_string(), "disabled");
        assert!(logging.toggle_logging("marker").is_err());
        assert!(logging.log_turn(&Turn::user("ignored")).is_ok());
    }
}
