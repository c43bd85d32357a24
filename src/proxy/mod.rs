//! Proxy module for parsing and checking proxies
//!
//! This module provides functionality for:
//! - Parsing `protocol://[user:pass@]host:port` strings into records
//! - Formatting records back to their canonical string
//! - Probing a single proxy with a test request through it

pub mod checker;
pub mod diagnostics;
pub mod models;
pub mod parser;
pub mod transport;

pub use checker::{CheckError, CheckerConfig, LivenessChecker};
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, LogSink, Severity};
pub use models::{LivenessReport, ProxyAuth, ProxyCheckStatus, ProxyRecord, ProxyType};
pub use parser::{ParseError, ProxyParser};
pub use transport::{
    ProbeRequest, ProbeResponse, ProxyEndpoint, ProxyTransport, ReqwestTransport, TransportError,
};
