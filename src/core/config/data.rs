use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::gemini::GenerationSettings;
use crate::core::constants::{
    GEMINI_BASE_URL, MAX_OUTPUT_TOKENS, MODEL_NAME, REQUEST_TIMEOUT_SECS, TEMPERATURE,
};
use crate::core::engine::{EngineSettings, FailurePolicy};

/// On-disk configuration. Every field is optional; unset fields fall back
/// to the built-in constants.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Gemini model identifier (e.g., "gemini-1.5-flash")
    pub model: Option<String>,
    /// API root, without the `models/...` suffix
    pub base_url: Option<String>,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
    pub request_timeout_secs: Option<u64>,
    /// Drop the question from the transcript when its answer fails
    pub rollback_failed_turns: Option<bool>,
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}

impl Config {
    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(MODEL_NAME)
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(GEMINI_BASE_URL)
    }

    pub fn temperature(&self) -> f32 {
        self.temperature.unwrap_or(TEMPERATURE)
    }

    pub fn max_output_tokens(&self) -> u32 {
        self.max_output_tokens.unwrap_or(MAX_OUTPUT_TOKENS)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(REQUEST_TIMEOUT_SECS))
    }

    pub fn rollback_failed_turns(&self) -> bool {
        self.rollback_failed_turns.unwrap_or(false)
    }

    pub fn generation_settings(&self) -> GenerationSettings {
        GenerationSettings {
            model: self.model().to_string(),
            temperature: self.temperature(),
            max_output_tokens: self.max_output_tokens(),
        }
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            request_timeout: self.request_timeout(),
            failure_policy: FailurePolicy::from_rollback_flag(self.rollback_failed_turns()),
        }
    }

    /// Checks every explicitly set value. Unset fields use the built-in
    /// defaults and are always valid.
    pub fn validate(&self) -> Result<(), InvalidValue> {
        if let Some(model) = &self.model {
            if model.trim().is_empty() {
                return Err(InvalidValue::new("model", model, EXPECT_MODEL));
            }
        }
        if let Some(url) = &self.base_url {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(InvalidValue::new("base-url", url, EXPECT_URL));
            }
        }
        if let Some(temperature) = self.temperature {
            if !TEMPERATURE_RANGE.contains(&temperature) {
                return Err(InvalidValue::new(
                    "temperature",
                    temperature,
                    EXPECT_TEMPERATURE,
                ));
            }
        }
        if self.max_output_tokens == Some(0) {
            return Err(InvalidValue::new("max-output-tokens", 0, EXPECT_POSITIVE));
        }
        if self.request_timeout_secs == Some(0) {
            return Err(InvalidValue::new("request-timeout-secs", 0, EXPECT_POSITIVE));
        }
        Ok(())
    }
}

pub const TEMPERATURE_RANGE: RangeInclusive<f32> = 0.0..=2.0;

pub(crate) const EXPECT_MODEL: &str = "a model name";
pub(crate) const EXPECT_URL: &str = "an http(s) URL";
pub(crate) const EXPECT_TEMPERATURE: &str = "a number between 0.0 and 2.0";
pub(crate) const EXPECT_POSITIVE: &str = "a positive whole number";

/// A configuration value that parses but is outside the accepted range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidValue {
    pub key: &'static str,
    pub value: String,
    pub expected: &'static str,
}

impl InvalidValue {
    fn new(key: &'static str, value: impl fmt::Display, expected: &'static str) -> Self {
        Self {
            key,
            value: value.to_string(),
            expected,
        }
    }
}

impl fmt::Display for InvalidValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} = {} (expected {})",
            self.key, self.value, self.expected
        )
    }
}

impl std::error::Error for InvalidValue {}
