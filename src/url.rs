use reqwest::Url;

use crate::error::DocgenApiError;

/// Default base URL for docgen backend requests.
pub const DEFAULT_DOCGEN_BASE_URL: &str = "http://localhost:8000";

/// GitHub authorization endpoint used for login delegation.
pub const GITHUB_AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";

/// OAuth scopes requested during login delegation.
pub const GITHUB_OAUTH_SCOPE: &str = "user:email repo read:org";

/// Normalize a configured base URL.
///
/// Normalization rules:
/// 1) empty/whitespace input falls back to the default base URL
/// 2) trailing slashes are stripped so endpoint joins stay single-slash
pub fn normalize_base_url(input: &str) -> String {
    let base = if input.trim().is_empty() {
        DEFAULT_DOCGEN_BASE_URL
    } else {
        input.trim()
    };

    base.trim_end_matches('/').to_string()
}

/// Join a normalized base URL with an endpoint path.
pub fn endpoint_url(base: &str, path: &str) -> String {
    let base = normalize_base_url(base);
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}

/// Build the GitHub authorization redirect for login delegation.
///
/// The redirect itself is the host's responsibility; this only constructs
/// the target with the client id, callback and scope query-encoded.
pub fn github_authorize_url(client_id: &str, redirect_uri: &str) -> Result<String, DocgenApiError> {
    if client_id.trim().is_empty() {
        return Err(DocgenApiError::InvalidBaseUrl(
            "GitHub client id is required to build an authorize URL".to_owned(),
        ));
    }

    let url = Url::parse_with_params(
        GITHUB_AUTHORIZE_URL,
        &[
            ("client_id", client_id.trim()),
            ("redirect_uri", redirect_uri.trim()),
            ("scope", GITHUB_OAUTH_SCOPE),
        ],
    )
    .map_err(|error| DocgenApiError::InvalidBaseUrl(error.to_string()))?;

    Ok(url.into())
}

/// Build the callback exchange URL with the one-time authorization code.
pub fn callback_exchange_url(base: &str, code: &str) -> Result<String, DocgenApiError> {
    let mut url = Url::parse(&endpoint_url(base, "/auth/github/callback"))
        .map_err(|error| DocgenApiError::InvalidBaseUrl(error.to_string()))?;
    url.query_pairs_mut().append_pair("code", code.trim());
    Ok(url.into())
}
