use std::future::Future;
use std::sync::{atomic::AtomicBool, atomic::Ordering, Arc};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, Response, StatusCode};
use serde_json::Value;

use crate::config::DocgenApiConfig;
use crate::error::{parse_error_message, DocgenApiError};
use crate::events::DocStreamEvent;
use crate::headers::{build_headers, HEADER_ACCEPT, MIME_EVENT_STREAM};
use crate::payload::{GenerateDocsRequest, UserProfile};
use crate::session::SessionManager;
use crate::sse::SseStreamParser;
use crate::url::endpoint_url;

/// Optional cancellation signal shared across request and stream loops.
pub type CancellationSignal = Arc<AtomicBool>;

const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(25);

pub const USER_ME_PATH: &str = "/api/user/me";
pub const GENERATE_PATH: &str = "/api/documentation/generate";

/// Authenticated request client with the single refresh-and-retry contract.
#[derive(Debug)]
pub struct DocgenApiClient {
    http: Client,
    session: Arc<SessionManager>,
}

/// Collected outcome of a generation stream.
#[derive(Debug, Clone)]
pub struct StreamResult {
    pub events: Vec<DocStreamEvent>,
    pub completed: bool,
}

impl DocgenApiClient {
    pub fn new(session: Arc<SessionManager>) -> Result<Self, DocgenApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = session.config().timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(DocgenApiError::from)?;
        Ok(Self { http, session })
    }

    pub fn config(&self) -> &DocgenApiConfig {
        self.session.config()
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// Headers are rebuilt per dispatch so a replay after refresh picks up
    /// the rotated access token.
    fn header_map(&self, streaming: bool) -> Result<HeaderMap, DocgenApiError> {
        let token = self.session.access_token();
        let headers = build_headers(self.session.config(), token.as_deref());
        let mut out = HeaderMap::new();
        for (key, value) in headers {
            out.insert(
                HeaderName::from_bytes(key.as_bytes())
                    .map_err(|_| DocgenApiError::InvalidHeader(format!("invalid key: {key}")))?,
                HeaderValue::from_str(&value).map_err(|_| {
                    DocgenApiError::InvalidHeader(format!("invalid value for {key}"))
                })?,
            );
        }
        if streaming {
            out.insert(
                HeaderName::from_static(HEADER_ACCEPT),
                HeaderValue::from_static(MIME_EVENT_STREAM),
            );
        }
        Ok(out)
    }

    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        streaming: bool,
    ) -> Result<Response, DocgenApiError> {
        let url = endpoint_url(&self.session.config().base_url, path);
        let mut request = self
            .http
            .request(method, url)
            .headers(self.header_map(streaming)?);
        if let Some(body) = body {
            request = request.json(body);
        }
        request.send().await.map_err(DocgenApiError::from)
    }

    /// One authenticated request with the refresh-and-retry contract.
    ///
    /// Exactly-unauthorized triggers one refresh; refresh success replays
    /// the request once and returns that outcome verbatim, refresh failure
    /// fails without a replay. The replay bound is structural — classify,
    /// refresh, replay — not a retry loop.
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, DocgenApiError> {
        let response = self.dispatch(method.clone(), path, body, false).await?;
        let response = if response.status() == StatusCode::UNAUTHORIZED {
            if !self.session.refresh().await {
                return Err(DocgenApiError::Unauthorized);
            }
            self.dispatch(method, path, body, false).await?
        } else {
            response
        };

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            // Still rejected after a successful refresh; surfaced as-is.
            return Err(DocgenApiError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DocgenApiError::Status(
                status,
                parse_error_message(status, &body),
            ));
        }

        response.json::<Value>().await.map_err(DocgenApiError::from)
    }

    pub async fn current_user(&self) -> Result<UserProfile, DocgenApiError> {
        let value = self.call(Method::GET, USER_ME_PATH, None).await?;
        serde_json::from_value(value).map_err(DocgenApiError::from)
    }

    /// Buffered generation; the streaming flag is forced off.
    pub async fn generate_documentation(
        &self,
        request: &GenerateDocsRequest,
    ) -> Result<Value, DocgenApiError> {
        let mut payload = request.clone();
        payload.stream = false;
        let body = serde_json::to_value(&payload)?;
        self.call(Method::POST, GENERATE_PATH, Some(&body)).await
    }

    /// Streamed generation; events reach the sink synchronously in arrival
    /// order, before the next chunk is read.
    ///
    /// This path performs no refresh-and-retry: generation streams are
    /// long-lived and a mid-stream unauthorized response has no recovery,
    /// so any pre-stream failure surfaces immediately and the chunk loop is
    /// never entered.
    pub async fn stream_documentation<F>(
        &self,
        request: &GenerateDocsRequest,
        cancellation: Option<&CancellationSignal>,
        mut on_event: F,
    ) -> Result<(), DocgenApiError>
    where
        F: FnMut(DocStreamEvent),
    {
        let mut payload = request.clone();
        payload.stream = true;
        let body = serde_json::to_value(&payload)?;

        let response = await_or_cancel(
            self.dispatch(Method::POST, GENERATE_PATH, Some(&body), true),
            cancellation,
        )
        .await??;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(DocgenApiError::Status(
                status,
                parse_error_message(status, &text),
            ));
        }

        let mut bytes = response.bytes_stream();
        let mut parser = SseStreamParser::default();

        loop {
            let Some(chunk) = await_or_cancel(bytes.next(), cancellation).await? else {
                break;
            };
            if is_cancelled(cancellation) {
                return Err(DocgenApiError::Cancelled);
            }
            let chunk = chunk.map_err(DocgenApiError::from)?;
            for event in parser.feed(&chunk) {
                on_event(event);
            }
        }

        if is_cancelled(cancellation) {
            return Err(DocgenApiError::Cancelled);
        }
        if !parser.is_empty_buffer() {
            // An unterminated final line is not a complete event.
            log::debug!("discarding unterminated stream residue");
        }

        Ok(())
    }

    pub async fn stream_documentation_collected(
        &self,
        request: &GenerateDocsRequest,
        cancellation: Option<&CancellationSignal>,
    ) -> Result<StreamResult, DocgenApiError> {
        let mut events = Vec::new();
        self.stream_documentation(request, cancellation, |event| {
            events.push(event);
        })
        .await?;

        let completed = events.iter().any(DocStreamEvent::is_complete);
        Ok(StreamResult { events, completed })
    }
}

fn is_cancelled(cancel: Option<&CancellationSignal>) -> bool {
    cancel.is_some_and(|token| token.load(Ordering::Acquire))
}

async fn await_or_cancel<F>(
    future: F,
    cancellation: Option<&CancellationSignal>,
) -> Result<F::Output, DocgenApiError>
where
    F: Future,
{
    if cancellation.is_none() {
        return Ok(future.await);
    }

    let mut future = Box::pin(future);

    loop {
        if is_cancelled(cancellation) {
            return Err(DocgenApiError::Cancelled);
        }

        if let Ok(output) = tokio::time::timeout(CANCEL_POLL_INTERVAL, &mut future).await {
            if is_cancelled(cancellation) {
                return Err(DocgenApiError::Cancelled);
            }
            return Ok(output);
        }
    }
}
