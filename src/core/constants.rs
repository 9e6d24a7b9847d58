use std::time::Duration;

pub const MODEL_NAME: &str = "gemini-1.5-flash";
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Low temperature keeps answers short and factual.
pub const TEMPERATURE: f32 = 0.4;
pub const MAX_OUTPUT_TOKENS: u32 = 500;
pub const REQUEST_TIMEOUT_SECS: u64 = 60;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const KEYRING_SERVICE: &str = "physbot";
pub const KEYRING_USER: &str = "gemini";

pub const PREAMBLE_USER: &str = "Kamu adalah ahli fisika. Tuliskan rumus tentang Fisika. Jawaban singkat. Tolak pertanyaan non-fisika.";
pub const PREAMBLE_ASSISTANT: &str = "Baik! Berikan rumus yang ingin anda ketahui.";

pub fn default_request_timeout() -> Duration {
    Duration::from_secs(REQUEST_TIMEOUT_SECS)
}
