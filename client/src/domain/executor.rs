//! Request executor.
//!
//! Builds one request from an [`EndpointDescriptor`], signs it with the
//! stored token, sends it exactly once and classifies the response.
//!
//! ## Invariants
//! - At most one `Authorization` header, present only when a token is stored.
//! - A `401` clears token and role, navigates to the login view once, and
//!   yields [`Outcome::Unauthorized`]. No other path touches the store or
//!   the navigator.
//! - No retries, backoff or timeouts are applied here.

use std::sync::Arc;

use http::StatusCode;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use super::endpoint::{EndpointDescriptor, EndpointParams, RequestBody, RequestBuildError};
use super::navigation::View;
use super::outcome::{Failure, Outcome, Payload};
use super::ports::{HttpTransport, Navigator, OutboundRequest, TransportResponse};
use super::session::SessionHandle;

const UNAUTHORIZED: u16 = 401;

/// Sends catalog requests on behalf of the current session.
#[derive(Clone)]
pub struct RequestExecutor {
    base_url: Url,
    transport: Arc<dyn HttpTransport>,
    session: SessionHandle,
    navigator: Arc<dyn Navigator>,
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl RequestExecutor {
    /// Create an executor targeting `base_url`.
    #[must_use]
    pub fn new(
        base_url: Url,
        transport: Arc<dyn HttpTransport>,
        session: SessionHandle,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            base_url,
            transport,
            session,
            navigator,
        }
    }

    /// Session handle shared with the guard and the views.
    #[must_use]
    pub const fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// Navigator used for redirects.
    #[must_use]
    pub fn navigator(&self) -> Arc<dyn Navigator> {
        Arc::clone(&self.navigator)
    }

    /// Execute `endpoint` with `params` and `body`.
    ///
    /// Never fails: build errors, store read errors and transport errors all
    /// become [`Outcome::Failure`] without a status code.
    pub async fn execute(
        &self,
        endpoint: &EndpointDescriptor,
        params: &EndpointParams,
        body: RequestBody,
    ) -> Outcome {
        let request = match self.build_request(endpoint, params, &body) {
            Ok(request) => request,
            Err(failure) => {
                warn!(endpoint = endpoint.name(), error = %failure, "request not sent");
                return Outcome::Failure(failure);
            }
        };

        debug!(
            endpoint = endpoint.name(),
            method = %endpoint.method(),
            url = %request.url,
            authenticated = request.header_values("authorization").next().is_some(),
            "dispatching request"
        );

        match self.transport.send(request).await {
            Ok(response) => self.classify(endpoint, response),
            Err(error) => {
                warn!(endpoint = endpoint.name(), %error, "request failed before a response");
                Outcome::Failure(Failure::local(error.to_string()))
            }
        }
    }

    /// Serialise `payload` as JSON and execute `endpoint`.
    ///
    /// A payload that cannot be serialised becomes a [`Failure`] without a
    /// status code and nothing is sent.
    pub async fn execute_json<T>(
        &self,
        endpoint: &EndpointDescriptor,
        params: &EndpointParams,
        payload: &T,
    ) -> Outcome
    where
        T: Serialize + Sync + ?Sized,
    {
        match RequestBody::json(payload) {
            Ok(body) => self.execute(endpoint, params, body).await,
            Err(error) => Outcome::Failure(build_failure(error)),
        }
    }

    fn build_request(
        &self,
        endpoint: &EndpointDescriptor,
        params: &EndpointParams,
        body: &RequestBody,
    ) -> Result<OutboundRequest, Failure> {
        let url = endpoint
            .resolve_url(&self.base_url, params)
            .map_err(build_failure)?;
        let body = endpoint.encode_body(body).map_err(build_failure)?;
        let token = self
            .session
            .token()
            .map_err(|error| Failure::local(error.to_string()))?;

        let mut headers = vec![("Accept".to_owned(), "application/json".to_owned())];
        if let Some(content_type) = endpoint.encoding().content_type() {
            headers.push(("Content-Type".to_owned(), content_type.to_owned()));
        }
        if let Some(token) = token {
            headers.push(("Authorization".to_owned(), token.bearer()));
        }

        Ok(OutboundRequest {
            method: endpoint.method(),
            url,
            headers,
            body,
        })
    }

    fn classify(&self, endpoint: &EndpointDescriptor, response: TransportResponse) -> Outcome {
        let status = response.status;
        if status == UNAUTHORIZED {
            self.tear_down(endpoint);
            return Outcome::Unauthorized;
        }
        if (200..300).contains(&status) {
            return success_payload(&response).map_or_else(
                |message| {
                    warn!(endpoint = endpoint.name(), status, %message, "unreadable success body");
                    Outcome::Failure(Failure::with_status(message, status))
                },
                Outcome::Success,
            );
        }

        let message = error_message(status, &response.body);
        warn!(endpoint = endpoint.name(), status, %message, "request rejected");
        Outcome::Failure(Failure::with_status(message, status))
    }

    fn tear_down(&self, endpoint: &EndpointDescriptor) {
        info!(endpoint = endpoint.name(), "unauthorised response; ending session");
        if let Err(error) = self.session.clear() {
            warn!(%error, "session store could not be cleared");
        }
        self.navigator.navigate(View::Login);
    }
}

fn build_failure(error: RequestBuildError) -> Failure {
    Failure::local(error.to_string())
}

fn is_json(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|value| value.split(';').next())
        .map(str::trim)
        .is_some_and(|essence| {
            essence.eq_ignore_ascii_case("application/json")
                || essence.to_ascii_lowercase().ends_with("+json")
        })
}

fn success_payload(response: &TransportResponse) -> Result<Payload, String> {
    if !is_json(response.content_type.as_deref()) {
        return Ok(Payload::Text(
            String::from_utf8_lossy(&response.body).into_owned(),
        ));
    }
    if response.body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Payload::Json(Value::Null));
    }
    serde_json::from_slice(&response.body)
        .map(Payload::Json)
        .map_err(|error| format!("response body is not valid JSON: {error}"))
}

/// Message for a non-2xx response.
///
/// Prefers `detail`, then `message`, from a JSON body. Validation errors
/// carrying a list of `{ "msg": ... }` entries are joined with `"; "`.
fn error_message(status: u16, body: &[u8]) -> String {
    serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|document| message_field(&document))
        .unwrap_or_else(|| status_line(status))
}

fn message_field(document: &Value) -> Option<String> {
    let detail = document.get("detail").and_then(|detail| match detail {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Array(entries) => {
            let parts: Vec<&str> = entries
                .iter()
                .filter_map(|entry| entry.get("msg").and_then(Value::as_str))
                .collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        _ => None,
    });
    detail.or_else(|| {
        document
            .get("message")
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
            .map(str::to_owned)
    })
}

fn status_line(status: u16) -> String {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .map_or_else(
            || format!("HTTP Error: {status}"),
            |reason| format!("{status} {reason}"),
        )
}
