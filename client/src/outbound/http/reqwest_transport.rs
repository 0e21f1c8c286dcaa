//! Reqwest-backed HTTP transport.
//!
//! This adapter owns transport details only: header and body forwarding and
//! mapping reqwest failures into [`TransportError`]. Status handling stays in
//! the domain executor. No client-side timeout is configured.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};

use crate::domain::HttpMethod;
use crate::domain::ports::{HttpTransport, OutboundRequest, TransportError, TransportResponse};

const DEFAULT_USER_AGENT: &str = concat!("amep-client/", env!("CARGO_PKG_VERSION"));

/// Transport that performs real HTTP requests.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a transport with the default client configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder().user_agent(DEFAULT_USER_AGENT).build()?;
        Ok(Self::with_client(client))
    }

    /// Wrap an existing client, for example one with custom TLS roots.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: OutboundRequest) -> Result<TransportResponse, TransportError> {
        let OutboundRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let mut builder = self.client.request(to_reqwest_method(method), url);
        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response
            .bytes()
            .await
            .map_err(|error| TransportError::body(error.to_string()))?;

        Ok(TransportResponse {
            status,
            content_type,
            body: body.to_vec(),
        })
    }
}

const fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
    }
}

fn map_transport_error(error: reqwest::Error) -> TransportError {
    if error.is_builder() {
        TransportError::invalid_request(error.to_string())
    } else {
        TransportError::connection(error.to_string())
    }
}
