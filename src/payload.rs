use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Rotation request for `/auth/refresh`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Token pair returned by the exchange and refresh endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
}

/// Canonical request payload for `/api/documentation/generate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateDocsRequest {
    /// Source files to document, keyed by path.
    pub files: BTreeMap<String, String>,
    /// Default: "readme".
    #[serde(default = "default_doc_type")]
    pub doc_type: String,
    /// Default: false. The streaming path forces this on.
    #[serde(default)]
    pub stream: bool,
}

fn default_doc_type() -> String {
    "readme".to_string()
}

impl GenerateDocsRequest {
    pub fn new(files: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            files: files.into_iter().collect(),
            doc_type: default_doc_type(),
            stream: false,
        }
    }

    pub fn with_doc_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = doc_type.into();
        self
    }

    pub fn streaming(mut self) -> Self {
        self.stream = true;
        self
    }
}

/// Identity record returned by `/api/user/me`; opaque beyond shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub role: String,
}
