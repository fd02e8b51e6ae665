use std::collections::BTreeMap;
use std::time::Duration;

use crate::url::DEFAULT_DOCGEN_BASE_URL;

/// Transport configuration for docgen backend requests.
#[derive(Debug, Clone)]
pub struct DocgenApiConfig {
    /// Base URL for backend endpoints.
    pub base_url: String,
    /// GitHub OAuth application client id used to build the authorize URL.
    pub github_client_id: String,
    /// Callback URI the authorization delegation redirects back to.
    pub redirect_uri: String,
    /// Optional `User-Agent` override.
    pub user_agent: Option<String>,
    /// Additional headers merged into request headers.
    pub extra_headers: BTreeMap<String, String>,
    /// Optional request timeout. Generation streams are long-lived, so no
    /// timeout is applied unless the caller imposes one.
    pub timeout: Option<Duration>,
}

impl Default for DocgenApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_DOCGEN_BASE_URL.to_string(),
            github_client_id: String::new(),
            redirect_uri: String::new(),
            user_agent: None,
            extra_headers: BTreeMap::new(),
            timeout: None,
        }
    }
}

impl DocgenApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_github_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.github_client_id = client_id.into();
        self
    }

    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = redirect_uri.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn insert_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.insert(key.into(), value.into());
        self
    }

    pub fn with_headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        self.extra_headers.extend(headers);
        self
    }
}
