//! Proxy Probe - Proxy Parser and Liveness Checker
//!
//! Parses proxy connection strings into their components and checks whether
//! a proxy is usable by sending a test request through it.

pub mod proxy;

pub use proxy::*;

/// Application result type
pub type Result<T> = anyhow::Result<T>;
