//! Proxy data models

use crate::proxy::checker::LivenessChecker;
use crate::proxy::parser::ProxyParser;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Proxy type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ProxyType {
    #[default]
    Http,
    Https,
    Socks4,
    Socks4a,
    Socks5,
    Socks5h,
}

impl ProxyType {
    /// Map a protocol name to a known proxy type
    pub fn from_protocol(protocol: &str) -> Option<Self> {
        match protocol {
            "http" => Some(ProxyType::Http),
            "https" => Some(ProxyType::Https),
            "socks4" => Some(ProxyType::Socks4),
            "socks4a" => Some(ProxyType::Socks4a),
            "socks5" => Some(ProxyType::Socks5),
            "socks5h" => Some(ProxyType::Socks5h),
            _ => None,
        }
    }

    /// Whether requests go through an HTTP proxy tunnel rather than SOCKS
    pub fn is_http(&self) -> bool {
        matches!(self, ProxyType::Http | ProxyType::Https)
    }
}

impl fmt::Display for ProxyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProxyType::Http => write!(f, "http"),
            ProxyType::Https => write!(f, "https"),
            ProxyType::Socks4 => write!(f, "socks4"),
            ProxyType::Socks4a => write!(f, "socks4a"),
            ProxyType::Socks5 => write!(f, "socks5"),
            ProxyType::Socks5h => write!(f, "socks5h"),
        }
    }
}

/// Proxy authentication credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyAuth {
    pub username: String,
    pub password: String,
}

impl ProxyAuth {
    pub fn new(username: String, password: String) -> Self {
        Self { username, password }
    }
}

/// One proxy endpoint candidate, as parsed from `protocol://[user:pass@]host:port`
///
/// A record is usable only when `host` is non-empty and `port` is non-zero.
/// Parsing never fails outright; malformed input leaves the record unusable.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProxyRecord {
    pub protocol: String,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl ProxyRecord {
    /// Parse a proxy string, reporting problems through the `log` facade
    pub fn parse(raw: &str) -> Self {
        ProxyParser::default().parse(raw)
    }

    /// Reset every field and parse `raw` into this record
    pub fn reparse(&mut self, raw: &str) {
        ProxyParser::default().reparse(self, raw);
    }

    /// Clear every field back to the unparsed state
    pub fn reset(&mut self) {
        self.protocol.clear();
        self.host.clear();
        self.port = 0;
        self.username.clear();
        self.password.clear();
    }

    pub fn is_usable(&self) -> bool {
        !self.host.is_empty() && self.port != 0
    }

    /// The recognized proxy type, if the protocol is one of the known names
    pub fn proxy_type(&self) -> Option<ProxyType> {
        ProxyType::from_protocol(&self.protocol)
    }

    /// Credentials used for authentication; both parts must be non-empty
    pub fn auth(&self) -> Option<ProxyAuth> {
        if self.username.is_empty() || self.password.is_empty() {
            return None;
        }
        Some(ProxyAuth::new(self.username.clone(), self.password.clone()))
    }

    /// Canonical `protocol://[user:pass@]host:port` form, or `""` when unusable
    pub fn format(&self) -> String {
        if !self.is_usable() {
            return String::new();
        }

        let auth_part = self.auth().map_or(String::new(), |auth| {
            format!("{}:{}@", auth.username, auth.password)
        });

        format!("{}://{}{}:{}", self.protocol, auth_part, self.host, self.port)
    }

    /// Probe the proxy with the default checker
    pub async fn check_liveness(&self) -> LivenessReport {
        LivenessChecker::new().check(self).await
    }
}

impl fmt::Display for ProxyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format())
    }
}

/// Result of proxy check operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProxyCheckStatus {
    Working,
    Failed(String),
    Timeout,
}

/// Detailed result of a liveness check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessReport {
    /// Canonical form of the proxy that was checked
    pub proxy: String,
    pub status: ProxyCheckStatus,
    /// Human-readable description of the outcome
    pub diagnostic: String,
    pub response_time_ms: Option<u64>,
}

impl LivenessReport {
    pub fn working(proxy: String, diagnostic: String, response_time_ms: u64) -> Self {
        Self {
            proxy,
            status: ProxyCheckStatus::Working,
            diagnostic,
            response_time_ms: Some(response_time_ms),
        }
    }

    pub fn failed(proxy: String, error: String, diagnostic: String) -> Self {
        Self {
            proxy,
            status: ProxyCheckStatus::Failed(error),
            diagnostic,
            response_time_ms: None,
        }
    }

    pub fn timeout(proxy: String, diagnostic: String) -> Self {
        Self {
            proxy,
            status: ProxyCheckStatus::Timeout,
            diagnostic,
            response_time_ms: None,
        }
    }

    pub fn is_working(&self) -> bool {
        matches!(self.status, ProxyCheckStatus::Working)
    }

    /// The `(ok, diagnostic)` pair
    pub fn ok(&self) -> (bool, String) {
        (self.is_working(), self.diagnostic.clone())
    }
}
