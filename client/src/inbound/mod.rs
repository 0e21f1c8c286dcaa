//! Inbound adapters that drive the domain services.

pub mod cli;
