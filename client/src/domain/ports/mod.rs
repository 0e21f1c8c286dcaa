//! Ports at the edge of the client hexagon.
//!
//! The domain drives three kinds of infrastructure: session storage, HTTP
//! transport, and view navigation. Each is a trait here so the executor and
//! guard can be tested with in-memory doubles and wired to real adapters in
//! the binary.

mod macros;
pub(crate) use macros::define_port_error;

mod http_transport;
mod navigator;
mod token_store;

pub use http_transport::{
    HttpTransport, OutboundRequest, ScriptedReply, ScriptedTransport, TransportError,
    TransportResponse,
};
#[cfg(test)]
pub use navigator::MockNavigator;
pub use navigator::{Navigator, RecordingNavigator};
#[cfg(test)]
pub use token_store::MockTokenStore;
pub use token_store::{InMemoryTokenStore, TokenStore, TokenStoreError};
