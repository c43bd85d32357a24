//! Proxy parser module for parsing `protocol://[user:pass@]host:port` strings

use crate::proxy::diagnostics::{Diagnostic, DiagnosticSink, LogSink};
use crate::proxy::models::ProxyRecord;
use crate::Result;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

const PROTOCOL_SEPARATOR: &str = "://";

/// Characters trimmed from both ends of a proxy string
const TRIMMED: &[char] = &[' ', '\t', '\r', '\n'];

/// Why a proxy string could not be turned into a usable record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty proxy string")]
    Empty,
    #[error("missing protocol in proxy: {0}")]
    MissingProtocol(String),
    #[error("empty protocol in proxy: {0}")]
    EmptyProtocol(String),
    #[error("invalid credentials format in proxy: {0}")]
    InvalidCredentials(String),
    #[error("missing port in proxy: {0}")]
    MissingPort(String),
    #[error("empty host in proxy: {0}")]
    EmptyHost(String),
    #[error("missing port number in proxy: {0}")]
    MissingPortNumber(String),
    #[error("invalid port format in proxy: {0}")]
    InvalidPortFormat(String),
    #[error("invalid port number {port} in proxy: {proxy}")]
    InvalidPortNumber { port: i64, proxy: String },
}

/// Proxy parser that reports malformed input to a diagnostic sink
#[derive(Clone)]
pub struct ProxyParser {
    sink: Arc<dyn DiagnosticSink>,
}

impl ProxyParser {
    pub fn new(sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { sink }
    }

    /// Parse a single proxy string
    ///
    /// Never fails: malformed input yields an unusable record and one error
    /// diagnostic.
    pub fn parse(&self, raw: &str) -> ProxyRecord {
        let mut record = ProxyRecord::default();
        self.reparse(&mut record, raw);
        record
    }

    /// Reset `record` and parse `raw` into it
    ///
    /// Fields assigned before the failing step keep their values. In
    /// particular an out-of-range port only zeroes `port`.
    pub fn reparse(&self, record: &mut ProxyRecord, raw: &str) {
        record.reset();
        if let Err(e) = parse_into(record, raw) {
            self.sink.emit(&Diagnostic::error(format!("Error: {}", e)));
        }
    }

    /// Parse a proxy string, returning the first failure instead of reporting it
    pub fn try_parse(raw: &str) -> std::result::Result<ProxyRecord, ParseError> {
        let mut record = ProxyRecord::default();
        parse_into(&mut record, raw)?;
        Ok(record)
    }

    /// Parse proxies from a string (one per line)
    ///
    /// Blank lines and `#` comments are skipped; unusable records are dropped.
    pub fn parse_string(&self, content: &str) -> Vec<ProxyRecord> {
        content
            .lines()
            .map(|line| line.trim_matches(TRIMMED))
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| self.parse(line))
            .filter(ProxyRecord::is_usable)
            .collect()
    }

    /// Parse proxies from a file
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<ProxyRecord>> {
        let content = fs::read_to_string(path)?;
        Ok(self.parse_string(&content))
    }
}

impl Default for ProxyParser {
    fn default() -> Self {
        Self::new(Arc::new(LogSink))
    }
}

fn parse_into(record: &mut ProxyRecord, raw: &str) -> std::result::Result<(), ParseError> {
    let proxy = raw.trim_matches(TRIMMED);
    if proxy.is_empty() {
        return Err(ParseError::Empty);
    }

    let protocol_end = proxy
        .find(PROTOCOL_SEPARATOR)
        .ok_or_else(|| ParseError::MissingProtocol(proxy.to_string()))?;
    record.protocol = proxy[..protocol_end].to_string();
    if record.protocol.is_empty() {
        return Err(ParseError::EmptyProtocol(proxy.to_string()));
    }

    let mut rest = &proxy[protocol_end + PROTOCOL_SEPARATOR.len()..];
    if let Some(at_pos) = rest.find('@') {
        let credentials = &rest[..at_pos];
        let (username, password) = credentials
            .split_once(':')
            .ok_or_else(|| ParseError::InvalidCredentials(proxy.to_string()))?;
        record.username = username.to_string();
        record.password = password.to_string();
        rest = &rest[at_pos + 1..];
    }

    let (host, port) = rest
        .split_once(':')
        .ok_or_else(|| ParseError::MissingPort(proxy.to_string()))?;
    record.host = host.to_string();
    if record.host.is_empty() {
        return Err(ParseError::EmptyHost(proxy.to_string()));
    }

    if port.is_empty() {
        return Err(ParseError::MissingPortNumber(proxy.to_string()));
    }
    let value =
        leading_integer(port).ok_or_else(|| ParseError::InvalidPortFormat(proxy.to_string()))?;
    match u16::try_from(value) {
        Ok(port) if port != 0 => {
            record.port = port;
            Ok(())
        }
        _ => Err(ParseError::InvalidPortNumber {
            port: value,
            proxy: proxy.to_string(),
        }),
    }
}

/// Read the integer at the start of `s`
///
/// Leading whitespace and one sign are accepted and trailing text is ignored.
/// Returns `None` without digits or when the value overflows an `i32`.
fn leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start_matches(|c: char| c.is_ascii_whitespace() || c == '\x0b');
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits: &str = &digits[..digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len())];
    if digits.is_empty() {
        return None;
    }

    let mut value: i64 = 0;
    for b in digits.bytes() {
        value = value * 10 + i64::from(b - b'0');
        if value > i64::from(i32::MAX) + 1 {
            return None;
        }
    }

    let value = if negative { -value } else { value };
    i32::try_from(value).ok().map(i64::from)
}
