//! Session and streaming transport client for the docgen backend.
//!
//! This crate owns the authentication lifecycle and the wire behavior for
//! the documentation-generation endpoints: bearer-token requests with a
//! transparent single refresh-and-retry on authorization failure, and an
//! incremental parser for the newline-delimited `data: <json>` stream that
//! delivers generated documentation. It contains no UI or routing code;
//! the OAuth redirect itself is the host's job — this core only builds the
//! authorize URL and consumes the callback code.
//!
//! Token persistence goes through the [`TokenStorage`] abstraction so the
//! core runs against an in-memory fake in tests and any durable substrate
//! in production.

pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod headers;
pub mod payload;
pub mod session;
pub mod sse;
pub mod storage;
pub mod url;

pub use client::{CancellationSignal, DocgenApiClient, StreamResult};
pub use config::DocgenApiConfig;
pub use error::DocgenApiError;
pub use events::{DocEventAccumulator, DocStreamEvent};
pub use payload::{GenerateDocsRequest, RefreshRequest, TokenResponse, UserProfile};
pub use session::{CredentialPair, SessionManager, SessionPhase, SessionState};
pub use sse::SseStreamParser;
pub use storage::{
    FileTokenStorage, MemoryTokenStorage, TokenStorage, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY,
};
pub use url::normalize_base_url;
