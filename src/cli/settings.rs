//! `physbot set` / `physbot unset`.

use std::fmt;

use crate::core::config::data::{InvalidValue, EXPECT_POSITIVE, EXPECT_TEMPERATURE};
use crate::core::config::{Config, ConfigOrchestrator};
use crate::utils::url::normalize_base_url;

#[derive(Debug, PartialEq)]
pub enum SettingError {
    UnknownKey(String),
    InvalidValue {
        key: &'static str,
        input: String,
        expected: &'static str,
    },
    InvalidBoolean(String),
    ConfigError(String),
}

impl SettingError {
    pub fn print(&self) {
        match self {
            SettingError::InvalidBoolean(input) => {
                eprintln!("❌ Invalid boolean value: {input}");
                eprintln!("   Use 'on' or 'off' (also accepts true/false, yes/no)");
            }
            SettingError::UnknownKey(_) => {
                eprintln!("❌ {self}");
                eprintln!("   Known keys: {}", SettingKey::ALL_NAMES.join(", "));
            }
            other => eprintln!("❌ {other}"),
        }
    }
}

impl fmt::Display for SettingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingError::UnknownKey(key) => write!(f, "Unknown config key: {key}"),
            SettingError::InvalidValue {
                key,
                input,
                expected,
            } => write!(f, "Invalid value for {key}: {input} (expected {expected})"),
            SettingError::InvalidBoolean(input) => write!(f, "Invalid boolean value: {input}"),
            SettingError::ConfigError(msg) => write!(f, "Failed to save configuration: {msg}"),
        }
    }
}

impl std::error::Error for SettingError {}

impl From<InvalidValue> for SettingError {
    fn from(err: InvalidValue) -> Self {
        SettingError::InvalidValue {
            key: err.key,
            input: err.value,
            expected: err.expected,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    Model,
    BaseUrl,
    Temperature,
    MaxOutputTokens,
    RequestTimeoutSecs,
    RollbackFailedTurns,
}

impl SettingKey {
    pub const ALL_NAMES: [&'static str; 6] = [
        "model",
        "base-url",
        "temperature",
        "max-output-tokens",
        "request-timeout-secs",
        "rollback-failed-turns",
    ];

    pub fn parse(input: &str) -> Result<Self, SettingError> {
        // Accept the snake_case spelling too.
        match input.trim().replace('_', "-").as_str() {
            "model" => Ok(SettingKey::Model),
            "base-url" => Ok(SettingKey::BaseUrl),
            "temperature" => Ok(SettingKey::Temperature),
            "max-output-tokens" => Ok(SettingKey::MaxOutputTokens),
            "request-timeout-secs" => Ok(SettingKey::RequestTimeoutSecs),
            "rollback-failed-turns" => Ok(SettingKey::RollbackFailedTurns),
            _ => Err(SettingError::UnknownKey(input.to_string())),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SettingKey::Model => "model",
            SettingKey::BaseUrl => "base-url",
            SettingKey::Temperature => "temperature",
            SettingKey::MaxOutputTokens => "max-output-tokens",
            SettingKey::RequestTimeoutSecs => "request-timeout-secs",
            SettingKey::RollbackFailedTurns => "rollback-failed-turns",
        }
    }

    pub fn clear(self, config: &mut Config) {
        match self {
            SettingKey::Model => config.model = None,
            SettingKey::BaseUrl => config.base_url = None,
            SettingKey::Temperature => config.temperature = None,
            SettingKey::MaxOutputTokens => config.max_output_tokens = None,
            SettingKey::RequestTimeoutSecs => config.request_timeout_secs = None,
            SettingKey::RollbackFailedTurns => config.rollback_failed_turns = None,
        }
    }
}

/// A validated value for one configuration key.
#[derive(Debug, Clone, PartialEq)]
pub enum Setting {
    Model(String),
    BaseUrl(String),
    Temperature(f32),
    MaxOutputTokens(u32),
    RequestTimeoutSecs(u64),
    RollbackFailedTurns(bool),
}

pub fn parse_bool(input: &str) -> Option<bool> {
    match input.to_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

pub fn format_bool(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

impl Setting {
    /// Parses `input` for `key` and checks it against the same rules that
    /// apply when the config file is loaded.
    pub fn parse(key: SettingKey, input: &str) -> Result<Self, SettingError> {
        let input = input.trim();
        let invalid = |expected| SettingError::InvalidValue {
            key: key.name(),
            input: input.to_string(),
            expected,
        };

        let setting = match key {
            SettingKey::Model => Setting::Model(input.to_string()),
            SettingKey::BaseUrl => Setting::BaseUrl(normalize_base_url(input)),
            SettingKey::Temperature => input
                .parse()
                .map(Setting::Temperature)
                .map_err(|_| invalid(EXPECT_TEMPERATURE))?,
            SettingKey::MaxOutputTokens => input
                .parse()
                .map(Setting::MaxOutputTokens)
                .map_err(|_| invalid(EXPECT_POSITIVE))?,
            SettingKey::RequestTimeoutSecs => input
                .parse()
                .map(Setting::RequestTimeoutSecs)
                .map_err(|_| invalid(EXPECT_POSITIVE))?,
            SettingKey::RollbackFailedTurns => parse_bool(input)
                .map(Setting::RollbackFailedTurns)
                .ok_or_else(|| SettingError::InvalidBoolean(input.to_string()))?,
        };

        let mut candidate = Config::default();
        setting.clone().apply(&mut candidate);
        candidate.validate()?;
        Ok(setting)
    }

    pub fn key(&self) -> SettingKey {
        match self {
            Setting::Model(_) => SettingKey::Model,
            Setting::BaseUrl(_) => SettingKey::BaseUrl,
            Setting::Temperature(_) => SettingKey::Temperature,
            Setting::MaxOutputTokens(_) => SettingKey::MaxOutputTokens,
            Setting::RequestTimeoutSecs(_) => SettingKey::RequestTimeoutSecs,
            Setting::RollbackFailedTurns(_) => SettingKey::RollbackFailedTurns,
        }
    }

    pub fn display_value(&self) -> String {
        match self {
            Setting::Model(value) | Setting::BaseUrl(value) => value.clone(),
            Setting::Temperature(value) => value.to_string(),
            Setting::MaxOutputTokens(value) => value.to_string(),
            Setting::RequestTimeoutSecs(value) => value.to_string(),
            Setting::RollbackFailedTurns(value) => format_bool(*value).to_string(),
        }
    }

    pub fn apply(self, config: &mut Config) {
        match self {
            Setting::Model(value) => config.model = Some(value),
            Setting::BaseUrl(value) => config.base_url = Some(value),
            Setting::Temperature(value) => config.temperature = Some(value),
            Setting::MaxOutputTokens(value) => config.max_output_tokens = Some(value),
            Setting::RequestTimeoutSecs(value) => config.request_timeout_secs = Some(value),
            Setting::RollbackFailedTurns(value) => config.rollback_failed_turns = Some(value),
        }
    }
}

/// With no key or no value, prints the effective configuration.
pub fn run_set(
    orchestrator: &ConfigOrchestrator,
    key: Option<String>,
    value: Option<Vec<String>>,
) -> Result<String, SettingError> {
    let value = value
        .map(|parts| parts.join(" "))
        .filter(|value| !value.trim().is_empty());
    let (key, value) = match (key, value) {
        (Some(key), Some(value)) => (SettingKey::parse(&key)?, value),
        (key, _) => {
            if let Some(key) = key {
                SettingKey::parse(&key)?;
            }
            let config = orchestrator
                .load_with_cache()
                .map_err(|err| SettingError::ConfigError(err.to_string()))?;
            config.print_all();
            return Ok(String::new());
        }
    };

    let setting = Setting::parse(key, &value)?;
    let message = format!(
        "✅ Set {} to: {}",
        setting.key().name(),
        setting.display_value()
    );
    orchestrator
        .mutate(move |config| {
            setting.apply(config);
            Ok(())
        })
        .map_err(|err| SettingError::ConfigError(err.to_string()))?;
    Ok(message)
}

pub fn run_unset(orchestrator: &ConfigOrchestrator, key: &str) -> Result<String, SettingError> {
    let key = SettingKey::parse(key)?;
    orchestrator
        .mutate(|config| {
            key.clear(config);
            Ok(())
        })
        .map_err(|err| SettingError::ConfigError(err.to_string()))?;
    Ok(format!("✅ Unset {}", key.name()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    fn orchestrator(dir: &TempDir) -> ConfigOrchestrator {
        ConfigOrchestrator::new(dir.path().join("config.toml"))
    }

    #[test]
    fn keys_accept_both_spellings() {
        assert_eq!(
            SettingKey::parse("max_output_tokens").unwrap(),
            SettingKey::MaxOutputTokens
        );
        assert_eq!(
            SettingKey::parse("request-timeout-secs").unwrap(),
            SettingKey::RequestTimeoutSecs
        );
        assert_eq!(
            SettingKey::parse("theme"),
            Err(SettingError::UnknownKey("theme".to_string()))
        );
        for name in SettingKey::ALL_NAMES {
            assert_eq!(SettingKey::parse(name).unwrap().name(), name);
        }
    }

    #[test]
    fn temperature_must_be_in_range() {
        assert_eq!(
            Setting::parse(SettingKey::Temperature, "0.7").unwrap(),
            Setting::Temperature(0.7)
        );
        assert!(Setting::parse(SettingKey::Temperature, "2.5").is_err());
        assert!(Setting::parse(SettingKey::Temperature, "-0.1").is_err());
        assert!(Setting::parse(SettingKey::Temperature, "hot").is_err());
    }

    #[test]
    fn counts_must_be_positive() {
        assert_eq!(
            Setting::parse(SettingKey::MaxOutputTokens, "1024").unwrap(),
            Setting::MaxOutputTokens(1024)
        );
        assert!(Setting::parse(SettingKey::MaxOutputTokens, "0").is_err());
        assert!(Setting::parse(SettingKey::RequestTimeoutSecs, "-5").is_err());
        assert!(Setting::parse(SettingKey::RequestTimeoutSecs, "1.5").is_err());
    }

    #[test]
    fn base_url_is_normalized_and_checked() {
        assert_eq!(
            Setting::parse(SettingKey::BaseUrl, "https://proxy.test/v1beta/").unwrap(),
            Setting::BaseUrl("https://proxy.test/v1beta".to_string())
        );
        assert!(Setting::parse(SettingKey::BaseUrl, "proxy.test").is_err());
    }

    #[test]
    fn booleans_accept_common_spellings() {
        for on in ["on", "TRUE", "yes", "1"] {
            assert_eq!(parse_bool(on), Some(true));
        }
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(
            Setting::parse(SettingKey::RollbackFailedTurns, "maybe"),
            Err(SettingError::InvalidBoolean("maybe".to_string()))
        );
    }

    #[test]
    fn set_then_unset_round_trips_through_disk() {
        let dir = TempDir::new().unwrap();
        let orchestrator = orchestrator(&dir);

        let message = run_set(
            &orchestrator,
            Some("request-timeout-secs".to_string()),
            Some(vec!["90".to_string()]),
        )
        .unwrap();
        assert_eq!(message, "✅ Set request-timeout-secs to: 90");

        run_set(
            &orchestrator,
            Some("rollback-failed-turns".to_string()),
            Some(vec!["on".to_string()]),
        )
        .unwrap();

        let reloaded = Config::load_from_path(orchestrator.path()).unwrap();
        assert_eq!(reloaded.request_timeout(), Duration::from_secs(90));
        assert!(reloaded.rollback_failed_turns());

        assert_eq!(
            run_unset(&orchestrator, "request-timeout-secs").unwrap(),
            "✅ Unset request-timeout-secs"
        );
        let reloaded = Config::load_from_path(orchestrator.path()).unwrap();
        assert_eq!(reloaded.request_timeout_secs, None);
        assert_eq!(reloaded.rollback_failed_turns, Some(true));
    }

    #[test]
    fn invalid_values_write_nothing() {
        let dir = TempDir::new().unwrap();
        let orchestrator = orchestrator(&dir);

        let err = run_set(
            &orchestrator,
            Some("temperature".to_string()),
            Some(vec!["9".to_string()]),
        )
        .unwrap_err();

        assert!(matches!(err, SettingError::InvalidValue { key: "temperature", .. }));
        assert!(!orchestrator.path().exists());
    }

    #[test]
    fn multi_word_values_are_joined() {
        let dir = TempDir::new().unwrap();
        let orchestrator = orchestrator(&dir);

        run_set(
            &orchestrator,
            Some("model".to_string()),
            Some(vec!["models/gemini-1.5-pro".to_string(), "".to_string()]),
        )
        .unwrap();

        let reloaded = Config::load_from_path(orchestrator.path()).unwrap();
        assert_eq!(reloaded.model(), "models/gemini-1.5-pro");
    }

    #[test]
    fn set_with_key_but_no_value_prints_configuration() {
        let dir = TempDir::new().unwrap();
        let orchestrator = orchestrator(&dir);

        assert_eq!(
            run_set(&orchestrator, Some("temperature".to_string()), None),
            Ok(String::new())
        );
        assert_eq!(
            run_set(
                &orchestrator,
                Some("temperature".to_string()),
                Some(vec![" ".to_string()])
            ),
            Ok(String::new())
        );
        assert_eq!(run_set(&orchestrator, None, None), Ok(String::new()));
        assert!(!orchestrator.path().exists());
    }

    #[test]
    fn empty_model_is_rejected() {
        assert!(matches!(
            Setting::parse(SettingKey::Model, "  "),
            Err(SettingError::InvalidValue { key: "model", .. })
        ));
    }

    #[test]
    fn set_without_value_rejects_unknown_keys() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            run_set(&orchestrator(&dir), Some("colour".to_string()), None),
            Err(SettingError::UnknownKey("colour".to_string()))
        );
    }
}
