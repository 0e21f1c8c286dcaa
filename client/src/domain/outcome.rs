//! Request outcomes.
//!
//! Every executed request resolves to exactly one [`Outcome`] variant. The
//! executor never panics and never hands back a raw transport error; callers
//! that prefer `?` propagation opt in through [`Outcome::into_result`].

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Body of a successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Parsed body of a response that declared a JSON content type.
    Json(Value),
    /// Raw body of any other response.
    Text(String),
}

impl Payload {
    /// Borrow the JSON document, if any.
    #[must_use]
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }
}

/// A request that completed without a usable result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    message: String,
    status: Option<u16>,
}

impl Failure {
    /// Failure reported by the server with `status`.
    pub fn with_status(message: impl Into<String>, status: u16) -> Self {
        Self {
            message: message.into(),
            status: Some(status),
        }
    }

    /// Failure that happened before any status was available.
    pub fn local(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status, when the server answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        self.status
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (HTTP {status})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Classified result of one request.
///
/// # Examples
/// ```
/// use amep_client::domain::{Outcome, Payload};
/// use serde_json::json;
///
/// let outcome = Outcome::Success(Payload::Json(json!({ "message": "ok" })));
/// let decoded: Outcome<serde_json::Map<String, serde_json::Value>> = outcome.decode();
/// assert!(decoded.is_success());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T = Payload> {
    /// 2xx response.
    Success(T),
    /// 401 response; the session has already been torn down.
    Unauthorized,
    /// Any other result.
    Failure(Failure),
}

impl<T> Outcome<T> {
    /// Whether this is [`Outcome::Success`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Whether this is [`Outcome::Unauthorized`].
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Borrow the failure, if any.
    #[must_use]
    pub const fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Failure(failure) => Some(failure),
            _ => None,
        }
    }

    /// Consume into the success value, discarding the other variants.
    pub fn success(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Transform the success value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Success(value) => Outcome::Success(f(value)),
            Self::Unauthorized => Outcome::Unauthorized,
            Self::Failure(failure) => Outcome::Failure(failure),
        }
    }

    /// Chain a step that itself produces an outcome.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Outcome<U>) -> Outcome<U> {
        match self {
            Self::Success(value) => f(value),
            Self::Unauthorized => Outcome::Unauthorized,
            Self::Failure(failure) => Outcome::Failure(failure),
        }
    }

    /// Convert into a `Result` for `?` propagation.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Unauthorized`] or [`RequestError::Failed`]
    /// for the corresponding variants.
    pub fn into_result(self) -> Result<T, RequestError> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Unauthorized => Err(RequestError::Unauthorized),
            Self::Failure(failure) => Err(RequestError::Failed(failure)),
        }
    }
}

impl Outcome<Payload> {
    /// Deserialise a success payload into `T`.
    ///
    /// Text payloads are offered to `T` as a JSON string. A shape mismatch
    /// becomes a [`Failure`] without a status code.
    pub fn decode<T: DeserializeOwned>(self) -> Outcome<T> {
        self.and_then(|payload| {
            let value = match payload {
                Payload::Json(value) => value,
                Payload::Text(text) => Value::String(text),
            };
            match serde_json::from_value(value) {
                Ok(decoded) => Outcome::Success(decoded),
                Err(error) => Outcome::Failure(Failure::local(format!(
                    "unexpected response shape: {error}"
                ))),
            }
        })
    }
}

/// Error form of a non-success [`Outcome`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// The server rejected the credentials and the session was cleared.
    #[error("session expired; sign in again")]
    Unauthorized,
    /// The request failed.
    #[error("{0}")]
    Failed(Failure),
}
