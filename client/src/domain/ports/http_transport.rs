//! Driven port for sending one HTTP request.
//!
//! The domain builds a fully-formed [`OutboundRequest`]; adapters only move
//! bytes. Response classification stays in the executor so that every
//! transport shares the same `401` and error-message rules.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use super::define_port_error;
use crate::domain::HttpMethod;

/// A request ready to hand to a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Absolute URL including the query string.
    pub url: Url,
    /// Header name/value pairs in the order they should be sent.
    pub headers: Vec<(String, String)>,
    /// Serialised request body, if any.
    pub body: Option<Vec<u8>>,
}

impl OutboundRequest {
    /// All values for header `name`, compared case-insensitively.
    pub fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Body decoded as UTF-8, lossily. Empty when there is no body.
    #[must_use]
    pub fn body_text(&self) -> String {
        self.body
            .as_deref()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .unwrap_or_default()
    }
}

/// Raw response returned by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Value of the `Content-Type` header, if present.
    pub content_type: Option<String>,
    /// Response body bytes.
    pub body: Vec<u8>,
}

define_port_error! {
    /// Errors raised before a response status is available.
    pub enum TransportError {
        /// The request never reached the server or the connection dropped.
        Connection { message: String } =>
            "network request failed: {message}",
        /// Headers arrived but the body could not be read.
        Body { message: String } =>
            "response body could not be read: {message}",
        /// The adapter refused to build the request.
        InvalidRequest { message: String } =>
            "request could not be sent: {message}",
    }
}

/// Port for dispatching a single request. Implementations must not retry.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send `request` once and return the raw response.
    async fn send(&self, request: OutboundRequest) -> Result<TransportResponse, TransportError>;
}

/// One canned reply served by [`ScriptedTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedReply {
    status: u16,
    content_type: Option<String>,
    body: Vec<u8>,
    delay: Duration,
}

impl ScriptedReply {
    /// JSON reply with the given status.
    #[must_use]
    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        Self {
            status,
            content_type: Some("application/json".to_owned()),
            body: body.to_string().into_bytes(),
            delay: Duration::ZERO,
        }
    }

    /// Plain-text reply with the given status.
    #[must_use]
    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: Some("text/plain; charset=utf-8".to_owned()),
            body: body.as_bytes().to_vec(),
            delay: Duration::ZERO,
        }
    }

    /// Reply with an explicit content type and raw body bytes.
    #[must_use]
    pub fn raw(status: u16, content_type: &str, body: &[u8]) -> Self {
        Self {
            status,
            content_type: Some(content_type.to_owned()),
            body: body.to_vec(),
            delay: Duration::ZERO,
        }
    }

    /// Reply with an empty body and no content type.
    #[must_use]
    pub fn empty(status: u16) -> Self {
        Self {
            status,
            content_type: None,
            body: Vec::new(),
            delay: Duration::ZERO,
        }
    }

    /// Hold the reply back for `delay` before resolving.
    #[must_use]
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

type RouteKey = (HttpMethod, String);

/// In-memory transport serving canned replies per method and path.
///
/// Replies for the same route are served first-in first-out. Requests with
/// no scripted reply fail with [`TransportError::Connection`], which is how a
/// refused connection surfaces from the real adapter.
///
/// # Examples
/// ```
/// use amep_client::domain::HttpMethod;
/// use amep_client::domain::ports::{ScriptedReply, ScriptedTransport};
/// use serde_json::json;
///
/// let transport = ScriptedTransport::default();
/// transport.reply(HttpMethod::Get, "/student/leaderboard", ScriptedReply::json(200, &json!([])));
/// assert!(transport.requests().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    replies: Mutex<HashMap<RouteKey, VecDeque<ScriptedReply>>>,
    requests: Mutex<Vec<OutboundRequest>>,
}

impl ScriptedTransport {
    /// Queue `reply` for the next request matching `method` and `path`.
    pub fn reply(&self, method: HttpMethod, path: &str, reply: ScriptedReply) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry((method, path.to_owned()))
            .or_default()
            .push_back(reply);
    }

    /// Requests received so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn next_reply(&self, method: HttpMethod, path: &str) -> Option<ScriptedReply> {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(&(method, path.to_owned()))
            .and_then(VecDeque::pop_front)
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: OutboundRequest) -> Result<TransportResponse, TransportError> {
        let method = request.method;
        let path = request.url.path().to_owned();
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        let reply = self.next_reply(method, &path).ok_or_else(|| {
            TransportError::connection(format!("no scripted reply for {method} {path}"))
        })?;
        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }
        Ok(TransportResponse {
            status: reply.status,
            content_type: reply.content_type,
            body: reply.body,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Behaviour of the scripted transport double.
    use super::*;
    use serde_json::json;

    fn request(method: HttpMethod, path: &str) -> OutboundRequest {
        let url = Url::parse("http://amep.test")
            .and_then(|base| base.join(path))
            .expect("fixture url");
        OutboundRequest {
            method,
            url,
            headers: vec![("Authorization".to_owned(), "Bearer abc".to_owned())],
            body: None,
        }
    }

    #[tokio::test]
    async fn serves_replies_in_order_per_route() {
        let transport = ScriptedTransport::default();
        transport.reply(HttpMethod::Get, "/a", ScriptedReply::json(200, &json!(1)));
        transport.reply(HttpMethod::Get, "/a", ScriptedReply::json(200, &json!(2)));

        let first = transport
            .send(request(HttpMethod::Get, "/a"))
            .await
            .expect("first reply");
        let second = transport
            .send(request(HttpMethod::Get, "/a"))
            .await
            .expect("second reply");

        assert_eq!(first.body, b"1");
        assert_eq!(second.body, b"2");
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn unscripted_routes_fail_like_a_refused_connection() {
        let transport = ScriptedTransport::default();
        transport.reply(HttpMethod::Get, "/a", ScriptedReply::empty(204));

        let err = transport
            .send(request(HttpMethod::Post, "/a"))
            .await
            .expect_err("POST /a is not scripted");
        assert!(matches!(err, TransportError::Connection { .. }));
    }

    #[test]
    fn header_lookup_ignores_case() {
        let req = request(HttpMethod::Get, "/a");
        assert_eq!(req.header_values("authorization").collect::<Vec<_>>(), ["Bearer abc"]);
    }
}
