//! Endpoint descriptors and request assembly.
//!
//! A descriptor fully determines method, path shape, accepted query keys and
//! body encoding. Callers supply only identifiers and payloads through
//! [`EndpointParams`] and [`RequestBody`]; everything else is fixed at
//! compile time.

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use url::{Url, form_urlencoded};

/// `Content-Type` for JSON bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json";
/// `Content-Type` for form-encoded bodies.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP methods used by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
}

impl HttpMethod {
    /// Upper-case method token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an endpoint's request body is serialised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEncoding {
    /// No request body.
    None,
    /// `application/json`
    Json,
    /// `application/x-www-form-urlencoded`
    Form,
}

impl BodyEncoding {
    /// `Content-Type` header value, if the encoding carries a body.
    #[must_use]
    pub const fn content_type(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Json => Some(JSON_CONTENT_TYPE),
            Self::Form => Some(FORM_CONTENT_TYPE),
        }
    }
}

impl fmt::Display for BodyEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "no body",
            Self::Json => "JSON",
            Self::Form => "form",
        })
    }
}

/// A query parameter an endpoint accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryParam {
    name: &'static str,
    required: bool,
}

impl QueryParam {
    /// Parameter that must always be sent.
    #[must_use]
    pub const fn required(name: &'static str) -> Self {
        Self {
            name,
            required: true,
        }
    }

    /// Parameter that is omitted when the caller has no value.
    #[must_use]
    pub const fn optional(name: &'static str) -> Self {
        Self {
            name,
            required: false,
        }
    }

    /// Query key.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the key must be present.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }
}

/// Static definition of one backend operation.
///
/// Path templates use `{name}` for whole-segment placeholders.
///
/// # Examples
/// ```
/// use amep_client::domain::{BodyEncoding, EndpointDescriptor, EndpointParams, QueryParam};
/// use url::Url;
///
/// const DETAIL: EndpointDescriptor =
///     EndpointDescriptor::get("class_detail", "/classes/{class_id}");
/// const LIST: EndpointDescriptor = EndpointDescriptor::get("list", "/student/assignments")
///     .with_query(&[QueryParam::required("student_id"), QueryParam::optional("status")]);
///
/// let base = Url::parse("http://localhost:8000").expect("base url");
/// let url = DETAIL
///     .resolve_url(&base, &EndpointParams::new().path("class_id", 7))
///     .expect("url builds");
/// assert_eq!(url.as_str(), "http://localhost:8000/classes/7");
///
/// let url = LIST
///     .resolve_url(&base, &EndpointParams::new().query("student_id", 42).query_opt("status", None::<&str>))
///     .expect("url builds");
/// assert_eq!(url.as_str(), "http://localhost:8000/student/assignments?student_id=42");
/// assert_eq!(LIST.encoding(), BodyEncoding::None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointDescriptor {
    name: &'static str,
    method: HttpMethod,
    path: &'static str,
    query: &'static [QueryParam],
    encoding: BodyEncoding,
}

impl EndpointDescriptor {
    /// `GET` endpoint without a body.
    #[must_use]
    pub const fn get(name: &'static str, path: &'static str) -> Self {
        Self {
            name,
            method: HttpMethod::Get,
            path,
            query: &[],
            encoding: BodyEncoding::None,
        }
    }

    /// `POST` endpoint with the given body encoding.
    #[must_use]
    pub const fn post(name: &'static str, path: &'static str, encoding: BodyEncoding) -> Self {
        Self {
            name,
            method: HttpMethod::Post,
            path,
            query: &[],
            encoding,
        }
    }

    /// Declare the query parameters the endpoint accepts.
    #[must_use]
    pub const fn with_query(mut self, query: &'static [QueryParam]) -> Self {
        self.query = query;
        self
    }

    /// Logical operation name, used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// Path template.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    /// Declared query parameters.
    #[must_use]
    pub const fn query(&self) -> &'static [QueryParam] {
        self.query
    }

    /// Body encoding.
    #[must_use]
    pub const fn encoding(&self) -> BodyEncoding {
        self.encoding
    }

    /// Build the absolute URL for this endpoint.
    ///
    /// Path placeholders are filled from `params` and percent-encoded; query
    /// parameters follow the caller's insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`RequestBuildError`] when a placeholder or required query key
    /// has no value, when `params` names something the endpoint does not
    /// declare, or when `base` cannot carry a path.
    pub fn resolve_url(
        &self,
        base: &Url,
        params: &EndpointParams,
    ) -> Result<Url, RequestBuildError> {
        let segments = self.render_segments(params)?;
        let query = self.validated_query(params)?;

        let mut url = base.clone();
        url.set_query(None);
        url.set_fragment(None);
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| RequestBuildError::InvalidBaseUrl {
                    base: base.to_string(),
                })?;
            path.pop_if_empty();
            path.extend(segments.iter().map(String::as_str));
        }
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in query {
                pairs.append_pair(name, value);
            }
        }
        Ok(url)
    }

    /// Serialise `body` for this endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`RequestBuildError::BodyMismatch`] when the body kind does
    /// not match the endpoint's encoding.
    pub fn encode_body(&self, body: &RequestBody) -> Result<Option<Vec<u8>>, RequestBuildError> {
        match (self.encoding, body) {
            (BodyEncoding::None, RequestBody::Empty) => Ok(None),
            (BodyEncoding::Json, RequestBody::Json(value)) => Ok(Some(value.to_string().into_bytes())),
            (BodyEncoding::Form, RequestBody::Form(fields)) => Ok(Some(fields.encode().into_bytes())),
            (expected, found) => Err(RequestBuildError::BodyMismatch {
                endpoint: self.name,
                expected,
                found: found.kind(),
            }),
        }
    }

    fn render_segments(&self, params: &EndpointParams) -> Result<Vec<String>, RequestBuildError> {
        let mut used = Vec::new();
        let mut segments = Vec::new();
        for segment in self.path.split('/').skip(1) {
            match placeholder_name(segment) {
                Some(name) => {
                    let value = params
                        .path_value(name)
                        .filter(|value| !value.is_empty())
                        .ok_or(RequestBuildError::MissingPathParameter {
                            endpoint: self.name,
                            name,
                        })?;
                    used.push(name);
                    segments.push(value.to_owned());
                }
                None => segments.push(segment.to_owned()),
            }
        }

        if let Some((name, _)) = params.path.iter().find(|(name, _)| !used.contains(name)) {
            return Err(RequestBuildError::UnexpectedPathParameter {
                endpoint: self.name,
                name: *name,
            });
        }
        Ok(segments)
    }

    fn validated_query<'p>(
        &self,
        params: &'p EndpointParams,
    ) -> Result<Vec<(&'static str, &'p str)>, RequestBuildError> {
        for (name, _) in &params.query {
            if !self.query.iter().any(|declared| declared.name == *name) {
                return Err(RequestBuildError::UndeclaredQueryParameter {
                    endpoint: self.name,
                    name: *name,
                });
            }
        }
        if let Some(missing) = self
            .query
            .iter()
            .filter(|declared| declared.required)
            .find(|declared| !params.query.iter().any(|(name, _)| *name == declared.name))
        {
            return Err(RequestBuildError::MissingQueryParameter {
                endpoint: self.name,
                name: missing.name,
            });
        }
        Ok(params
            .query
            .iter()
            .map(|(name, value)| (*name, value.as_str()))
            .collect())
    }
}

fn placeholder_name(segment: &str) -> Option<&str> {
    segment.strip_prefix('{')?.strip_suffix('}')
}

/// Variable parts of a request: path identifiers and query values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointParams {
    path: Vec<(&'static str, String)>,
    query: Vec<(&'static str, String)>,
}

impl EndpointParams {
    /// Empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill the `{name}` placeholder.
    #[must_use]
    pub fn path(mut self, name: &'static str, value: impl fmt::Display) -> Self {
        self.path.push((name, value.to_string()));
        self
    }

    /// Append a query parameter.
    #[must_use]
    pub fn query(mut self, name: &'static str, value: impl fmt::Display) -> Self {
        self.query.push((name, value.to_string()));
        self
    }

    /// Append a query parameter only when `value` is present.
    #[must_use]
    pub fn query_opt<T: fmt::Display>(self, name: &'static str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.query(name, value),
            None => self,
        }
    }

    fn path_value(&self, name: &str) -> Option<&str> {
        self.path
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Ordered form fields for `application/x-www-form-urlencoded` bodies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields(Vec<(String, String)>);

impl FormFields {
    /// Empty field list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl fmt::Display) -> Self {
        self.0.push((name.into(), value.to_string()));
        self
    }

    /// Encode as `key=value` pairs joined by `&`, in insertion order.
    ///
    /// # Examples
    /// ```
    /// use amep_client::domain::FormFields;
    ///
    /// let fields = FormFields::new().field("student_id", 42).field("note", "a&b");
    /// assert_eq!(fields.encode(), "student_id=42&note=a%26b");
    /// ```
    #[must_use]
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (name, value) in &self.0 {
            serializer.append_pair(name, value);
        }
        serializer.finish()
    }
}

/// Payload supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// JSON document.
    Json(Value),
    /// Ordered form fields.
    Form(FormFields),
}

impl RequestBody {
    /// Serialise `value` into a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`RequestBuildError::Serialize`] when `value` cannot be
    /// represented as JSON.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, RequestBuildError> {
        serde_json::to_value(value)
            .map(Self::Json)
            .map_err(|error| RequestBuildError::Serialize {
                message: error.to_string(),
            })
    }

    const fn kind(&self) -> &'static str {
        match self {
            Self::Empty => "no body",
            Self::Json(_) => "JSON",
            Self::Form(_) => "form",
        }
    }
}

/// Reasons a request could not be assembled.
///
/// These are caller mistakes rather than server responses; the executor
/// reports them as a failure without a status code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestBuildError {
    /// A path placeholder had no value.
    #[error("{endpoint}: missing path parameter '{name}'")]
    MissingPathParameter {
        /// Endpoint name.
        endpoint: &'static str,
        /// Placeholder name.
        name: &'static str,
    },
    /// A path value was supplied for a placeholder the template lacks.
    #[error("{endpoint}: unexpected path parameter '{name}'")]
    UnexpectedPathParameter {
        /// Endpoint name.
        endpoint: &'static str,
        /// Supplied name.
        name: &'static str,
    },
    /// A required query key was not supplied.
    #[error("{endpoint}: missing query parameter '{name}'")]
    MissingQueryParameter {
        /// Endpoint name.
        endpoint: &'static str,
        /// Query key.
        name: &'static str,
    },
    /// A query key the endpoint does not declare.
    #[error("{endpoint}: undeclared query parameter '{name}'")]
    UndeclaredQueryParameter {
        /// Endpoint name.
        endpoint: &'static str,
        /// Query key.
        name: &'static str,
    },
    /// Body kind does not match the endpoint's encoding.
    #[error("{endpoint}: expected {expected} body, got {found}")]
    BodyMismatch {
        /// Endpoint name.
        endpoint: &'static str,
        /// Encoding the endpoint declares.
        expected: BodyEncoding,
        /// Kind of body supplied.
        found: &'static str,
    },
    /// The payload could not be serialised.
    #[error("request body could not be serialised: {message}")]
    Serialize {
        /// Serialiser message.
        message: String,
    },
    /// The configured base URL cannot carry a path.
    #[error("base URL '{base}' cannot be used for API requests")]
    InvalidBaseUrl {
        /// Offending base URL.
        base: String,
    },
}

#[cfg(test)]
mod tests {
    //! Regression coverage for URL and body assembly.
    use super::*;
    use rstest::{fixture, rstest};
    use serde_json::json;

    const DETAIL: EndpointDescriptor =
        EndpointDescriptor::get("assignment_detail", "/student/assignments/{assignment_id}");
    const LIST: EndpointDescriptor = EndpointDescriptor::get("notifications", "/notifications/")
        .with_query(&[
            QueryParam::optional("skip"),
            QueryParam::optional("limit"),
            QueryParam::optional("unread"),
        ]);
    const BADGES: EndpointDescriptor = EndpointDescriptor::get("badges", "/student/badges")
        .with_query(&[QueryParam::required("student_id")]);
    const SUBMIT: EndpointDescriptor = EndpointDescriptor::post(
        "submit_assignment",
        "/student/assignments/submit",
        BodyEncoding::Form,
    );

    #[fixture]
    fn base() -> Url {
        Url::parse("http://localhost:8000").expect("base url")
    }

    #[rstest]
    fn fills_and_encodes_path_placeholders(base: Url) {
        let url = DETAIL
            .resolve_url(&base, &EndpointParams::new().path("assignment_id", "a/b c"))
            .expect("url builds");
        assert_eq!(url.path(), "/student/assignments/a%2Fb%20c");
    }

    #[rstest]
    fn keeps_trailing_slash_routes(base: Url) {
        let url = LIST
            .resolve_url(&base, &EndpointParams::new())
            .expect("url builds");
        assert_eq!(url.as_str(), "http://localhost:8000/notifications/");
    }

    #[rstest]
    fn preserves_base_path_prefix() {
        let base = Url::parse("https://amep.example/api/").expect("base url");
        let url = DETAIL
            .resolve_url(&base, &EndpointParams::new().path("assignment_id", 3))
            .expect("url builds");
        assert_eq!(url.as_str(), "https://amep.example/api/student/assignments/3");
    }

    #[rstest]
    fn query_follows_insertion_order_and_omits_absent_values(base: Url) {
        let params = EndpointParams::new()
            .query("unread", true)
            .query_opt("skip", None::<u32>)
            .query("limit", 5);
        let url = LIST.resolve_url(&base, &params).expect("url builds");
        assert_eq!(url.query(), Some("unread=true&limit=5"));
    }

    #[rstest]
    #[case::missing_path(
        DETAIL,
        EndpointParams::new(),
        RequestBuildError::MissingPathParameter { endpoint: "assignment_detail", name: "assignment_id" }
    )]
    #[case::empty_path_value(
        DETAIL,
        EndpointParams::new().path("assignment_id", ""),
        RequestBuildError::MissingPathParameter { endpoint: "assignment_detail", name: "assignment_id" }
    )]
    #[case::unexpected_path(
        BADGES,
        EndpointParams::new().query("student_id", 1).path("class_id", 2),
        RequestBuildError::UnexpectedPathParameter { endpoint: "badges", name: "class_id" }
    )]
    #[case::missing_query(
        BADGES,
        EndpointParams::new(),
        RequestBuildError::MissingQueryParameter { endpoint: "badges", name: "student_id" }
    )]
    #[case::undeclared_query(
        BADGES,
        EndpointParams::new().query("student_id", 1).query("api_key", "x"),
        RequestBuildError::UndeclaredQueryParameter { endpoint: "badges", name: "api_key" }
    )]
    fn rejects_malformed_params(
        base: Url,
        #[case] endpoint: EndpointDescriptor,
        #[case] params: EndpointParams,
        #[case] expected: RequestBuildError,
    ) {
        assert_eq!(endpoint.resolve_url(&base, &params), Err(expected));
    }

    #[test]
    fn encodes_form_bodies_in_field_order() {
        let body = RequestBody::Form(FormFields::new().field("student_id", 42).field("assignment_id", 7));
        let encoded = SUBMIT.encode_body(&body).expect("form encodes");
        assert_eq!(encoded.as_deref(), Some(&b"student_id=42&assignment_id=7"[..]));
    }

    #[test]
    fn rejects_body_kind_mismatch() {
        let err = SUBMIT
            .encode_body(&RequestBody::Json(json!({ "student_id": 42 })))
            .expect_err("form endpoint rejects JSON");
        assert_eq!(
            err.to_string(),
            "submit_assignment: expected form body, got JSON"
        );
    }

    #[test]
    fn get_endpoints_send_no_body() {
        assert_eq!(DETAIL.encode_body(&RequestBody::Empty), Ok(None));
        assert_eq!(DETAIL.encoding().content_type(), None);
    }

    #[test]
    fn cannot_be_a_base_urls_are_rejected() {
        let base = Url::parse("mailto:teacher@amep.test").expect("parses");
        let err = DETAIL
            .resolve_url(&base, &EndpointParams::new().path("assignment_id", 1))
            .expect_err("mailto cannot carry a path");
        assert!(matches!(err, RequestBuildError::InvalidBaseUrl { .. }));
    }
}
