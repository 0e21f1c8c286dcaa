//! HTTP outbound adapters.
//!
//! Provides the reqwest implementation of the `HttpTransport` port.

mod reqwest_transport;

pub use reqwest_transport::ReqwestTransport;
