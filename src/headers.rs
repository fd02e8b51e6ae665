use std::collections::BTreeMap;

use crate::config::DocgenApiConfig;

pub const HEADER_ACCEPT: &str = "accept";
pub const HEADER_CONTENT_TYPE: &str = "content-type";
pub const HEADER_AUTHORIZATION: &str = "authorization";
pub const HEADER_USER_AGENT: &str = "user-agent";

pub const MIME_JSON: &str = "application/json";
pub const MIME_EVENT_STREAM: &str = "text/event-stream";

/// Build a deterministic header map for backend requests.
///
/// The authorization header is attached only when an access token is held;
/// unauthenticated calls (code exchange, refresh) go out without one.
pub fn build_headers(
    config: &DocgenApiConfig,
    access_token: Option<&str>,
) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();

    headers.insert(HEADER_CONTENT_TYPE.to_owned(), MIME_JSON.to_owned());
    headers.insert(HEADER_ACCEPT.to_owned(), MIME_JSON.to_owned());
    headers.insert(HEADER_USER_AGENT.to_owned(), resolve_user_agent(config));

    if let Some(token) = access_token.map(str::trim).filter(|token| !token.is_empty()) {
        headers.insert(HEADER_AUTHORIZATION.to_owned(), format!("Bearer {token}"));
    }

    for (key, value) in &config.extra_headers {
        headers.insert(key.trim().to_ascii_lowercase(), value.trim().to_owned());
    }

    headers
}

fn resolve_user_agent(config: &DocgenApiConfig) -> String {
    match config.user_agent.as_deref().map(str::trim) {
        Some(explicit) if !explicit.is_empty() => explicit.to_owned(),
        _ => default_user_agent(),
    }
}

fn default_user_agent() -> String {
    concat!("docgen_api/", env!("CARGO_PKG_VERSION")).to_owned()
}
