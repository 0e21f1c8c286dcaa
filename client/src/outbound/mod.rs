//! Outbound adapters implementing domain ports.
//!
//! - `http`: reqwest transport for `HttpTransport`.
//! - `storage`: JSON session file for `TokenStore`.

pub mod http;
pub mod storage;
