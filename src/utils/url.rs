//! Endpoint construction for the Gemini REST API.

/// Strip trailing slashes so endpoint paths can be appended safely.
///
/// ```
/// use physbot::utils::url::normalize_base_url;
///
/// assert_eq!(
///     normalize_base_url("https://generativelanguage.googleapis.com/v1beta//"),
///     "https://generativelanguage.googleapis.com/v1beta"
/// );
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{normalized_base}/{endpoint}")
}

/// URL of the non-streaming `generateContent` method for `model`.
///
/// A `models/` prefix on the model name is accepted and not duplicated.
///
/// ```
/// use physbot::utils::url::generate_content_url;
///
/// assert_eq!(
///     generate_content_url("https://example.test/v1beta/", "gemini-1.5-flash"),
///     "https://example.test/v1beta/models/gemini-1.5-flash:generateContent"
/// );
/// ```
pub fn generate_content_url(base_url: &str, model: &str) -> String {
    let model = model.trim().trim_start_matches("models/");
    construct_api_url(base_url, &format!("models/{model}:generateContent"))
}
