//! Authenticated API client for the AMEP learning platform.
//!
//! The [`domain`] module holds the session model, the request executor and
//! the endpoint catalog. [`outbound`] adapts them to reqwest and the file
//! system, and [`inbound`] drives them from the `amep` command line.

pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod settings;
