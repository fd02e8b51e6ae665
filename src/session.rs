use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex as AsyncMutex;

use crate::config::DocgenApiConfig;
use crate::error::{parse_error_message, DocgenApiError};
use crate::payload::{RefreshRequest, TokenResponse, UserProfile};
use crate::storage::{TokenStorage, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use crate::url::{callback_exchange_url, endpoint_url, github_authorize_url};

/// The stored credential tuple. Both fields present or the pair is absent;
/// no partial pair is ever stored or reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Lifecycle phase of the session.
///
/// `Checking` is transient and entered exactly once per process, during the
/// startup identity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Uninitialized,
    Checking,
    Authenticated,
    Unauthenticated,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub user: Option<UserProfile>,
    pub phase: SessionPhase,
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        matches!(self.phase, SessionPhase::Uninitialized | SessionPhase::Checking)
    }

    pub fn is_authenticated(&self) -> bool {
        self.phase == SessionPhase::Authenticated
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            user: None,
            phase: SessionPhase::Uninitialized,
        }
    }
}

/// Single source of truth for authentication state and the only component
/// permitted to mutate the stored credential pair.
pub struct SessionManager {
    http: Client,
    config: DocgenApiConfig,
    storage: Arc<dyn TokenStorage>,
    state: Mutex<SessionState>,
    refresh_lock: AsyncMutex<()>,
    refresh_generation: AtomicU64,
    checked: AtomicBool,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("config", &self.config)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    pub fn new(
        config: DocgenApiConfig,
        storage: Arc<dyn TokenStorage>,
    ) -> Result<Self, DocgenApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(DocgenApiError::from)?;
        Ok(Self {
            http,
            config,
            storage,
            state: Mutex::new(SessionState::default()),
            refresh_lock: AsyncMutex::new(()),
            refresh_generation: AtomicU64::new(0),
            checked: AtomicBool::new(false),
        })
    }

    pub fn config(&self) -> &DocgenApiConfig {
        &self.config
    }

    /// Build the GitHub authorization redirect for login delegation.
    ///
    /// No network call happens here; the host performs the navigation and
    /// later hands the one-time callback code to [`Self::complete_login`].
    pub fn authorize_url(&self) -> Result<String, DocgenApiError> {
        github_authorize_url(&self.config.github_client_id, &self.config.redirect_uri)
    }

    /// Exchange a one-time authorization code for a credential pair.
    ///
    /// An empty code fails before any network call. On success the pair is
    /// persisted and the session is established; navigating to the
    /// authenticated area is the caller's responsibility.
    pub async fn complete_login(&self, code: &str) -> Result<CredentialPair, DocgenApiError> {
        if code.trim().is_empty() {
            return Err(DocgenApiError::AuthExchange(
                "authorization code is required".to_owned(),
            ));
        }

        let url = callback_exchange_url(&self.config.base_url, code)?;
        let response = self.http.post(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DocgenApiError::AuthExchange(parse_error_message(
                status, &body,
            )));
        }

        let tokens = response.json::<TokenResponse>().await?;
        let pair = CredentialPair {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        };
        self.store_pair(&pair);
        self.refresh_generation.fetch_add(1, Ordering::AcqRel);
        self.set_session(None, SessionPhase::Authenticated);
        Ok(pair)
    }

    /// Rotate the stored pair using the refresh token.
    ///
    /// Returns false without a network call when no refresh token is held,
    /// and false without mutating stored state on any exchange failure.
    /// Concurrent callers coalesce onto one in-flight exchange: refresh
    /// token exchanges are typically one-shot on the server, so a second
    /// concurrent exchange with the same token would invalidate the session
    /// for whichever caller loses the race.
    pub async fn refresh(&self) -> bool {
        let observed = self.refresh_generation.load(Ordering::Acquire);
        let _guard = self.refresh_lock.lock().await;
        if self.refresh_generation.load(Ordering::Acquire) != observed {
            // Another caller rotated the pair while we waited; share its outcome.
            return self.credential_pair().is_some();
        }

        let Some(refresh_token) = self.storage.get(REFRESH_TOKEN_KEY) else {
            return false;
        };

        let url = endpoint_url(&self.config.base_url, "/auth/refresh");
        let request = RefreshRequest { refresh_token };
        let response = match self.http.post(url).json(&request).send().await {
            Ok(response) => response,
            Err(error) => {
                log::warn!("token refresh failed: {error}");
                return false;
            }
        };
        if !response.status().is_success() {
            log::warn!("token refresh rejected: HTTP {}", response.status());
            return false;
        }
        match response.json::<TokenResponse>().await {
            Ok(tokens) => {
                self.store_pair(&CredentialPair {
                    access_token: tokens.access_token,
                    refresh_token: tokens.refresh_token,
                });
                self.refresh_generation.fetch_add(1, Ordering::AcqRel);
                true
            }
            Err(error) => {
                log::warn!("token refresh returned an unreadable body: {error}");
                false
            }
        }
    }

    /// Startup identity check; resolves the session exactly once.
    ///
    /// An expired session is an expected steady-state condition, so
    /// failures here collapse into `Unauthenticated` instead of surfacing
    /// as errors. A server-rejected access token gets one refresh attempt;
    /// refresh failure clears the stored pair, while any other error leaves
    /// stored tokens intact.
    pub async fn check_session(&self) -> SessionState {
        if self.checked.swap(true, Ordering::AcqRel) {
            return self.state();
        }
        self.set_phase(SessionPhase::Checking);

        let Some(token) = self.storage.get(ACCESS_TOKEN_KEY) else {
            self.set_session(None, SessionPhase::Unauthenticated);
            return self.state();
        };

        match self.fetch_profile(&token).await {
            Ok(user) => self.set_session(Some(user), SessionPhase::Authenticated),
            Err(DocgenApiError::Status(StatusCode::UNAUTHORIZED, _)) => {
                if self.refresh().await {
                    // Authenticated with the rotated pair; the identity
                    // record arrives on the next authenticated request.
                    self.set_session(None, SessionPhase::Authenticated);
                } else {
                    self.clear_tokens();
                    self.set_session(None, SessionPhase::Unauthenticated);
                }
            }
            Err(error) => {
                log::warn!("session check failed: {error}");
                self.set_session(None, SessionPhase::Unauthenticated);
            }
        }

        self.state()
    }

    /// Clear both tokens and session state unconditionally; always succeeds.
    /// Navigating back to the landing area is the host's job.
    pub fn logout(&self) {
        self.clear_tokens();
        self.set_session(None, SessionPhase::Unauthenticated);
    }

    pub fn state(&self) -> SessionState {
        self.state
            .lock()
            .expect("session state lock poisoned")
            .clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.credential_pair().map(|pair| pair.access_token)
    }

    /// The stored pair, or `None` when either half is missing.
    pub fn credential_pair(&self) -> Option<CredentialPair> {
        let access_token = self.storage.get(ACCESS_TOKEN_KEY)?;
        let refresh_token = self.storage.get(REFRESH_TOKEN_KEY)?;
        Some(CredentialPair {
            access_token,
            refresh_token,
        })
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<UserProfile, DocgenApiError> {
        let url = endpoint_url(&self.config.base_url, "/api/user/me");
        let response = self.http.get(url).bearer_auth(access_token).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DocgenApiError::Status(
                status,
                parse_error_message(status, &body),
            ));
        }
        response.json::<UserProfile>().await.map_err(DocgenApiError::from)
    }

    fn store_pair(&self, pair: &CredentialPair) {
        self.storage.set(ACCESS_TOKEN_KEY, &pair.access_token);
        self.storage.set(REFRESH_TOKEN_KEY, &pair.refresh_token);
    }

    fn clear_tokens(&self) {
        self.storage.clear(ACCESS_TOKEN_KEY);
        self.storage.clear(REFRESH_TOKEN_KEY);
    }

    fn set_phase(&self, phase: SessionPhase) {
        self.state
            .lock()
            .expect("session state lock poisoned")
            .phase = phase;
    }

    fn set_session(&self, user: Option<UserProfile>, phase: SessionPhase) {
        let mut state = self.state.lock().expect("session state lock poisoned");
        state.user = user;
        state.phase = phase;
    }
}
