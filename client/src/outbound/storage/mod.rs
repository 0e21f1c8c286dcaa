//! Storage outbound adapters.
//!
//! Provides the file-backed implementation of the `TokenStore` port.

mod atomic_io;
mod file_token_store;

pub use file_token_store::FileTokenStore;
