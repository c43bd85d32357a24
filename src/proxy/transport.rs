//! HTTP-over-proxy transport used by the liveness checker

use crate::proxy::models::{ProxyAuth, ProxyType};
use async_trait::async_trait;
use reqwest::{redirect, Client, Proxy as ReqwestProxy};
use std::error::Error as StdError;
use std::time::Duration;
use thiserror::Error;

/// Maximum number of redirects followed when redirects are enabled
const MAX_REDIRECTS: usize = 10;

/// Where and how to tunnel a probe request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyEndpoint {
    pub kind: ProxyType,
    pub host: String,
    pub port: u16,
    pub auth: Option<ProxyAuth>,
}

impl ProxyEndpoint {
    /// Proxy URL without credentials, using the scheme the HTTP client expects
    pub fn url(&self) -> String {
        if self.kind.is_http() {
            format!("http://{}:{}", self.host, self.port)
        } else {
            format!("{}://{}:{}", self.kind, self.host, self.port)
        }
    }
}

/// A single GET request routed through a proxy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRequest {
    pub url: String,
    pub user_agent: String,
    pub follow_redirects: bool,
    pub timeout: Duration,
    pub proxy: ProxyEndpoint,
}

/// Status code and raw body of a completed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Failure below the HTTP layer: building the client, connecting, or reading
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("failed to configure client: {0}")]
    Client(String),
    #[error("{0}")]
    Request(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        let message = error_chain(&e);
        if e.is_timeout() {
            TransportError::Timeout(message)
        } else if e.is_builder() {
            TransportError::Client(message)
        } else {
            TransportError::Request(message)
        }
    }
}

/// Join an error and its `source()` chain with `": "`
///
/// A cause already quoted by the message before it is skipped.
fn error_chain(error: &dyn StdError) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !text.is_empty() && !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

/// Performs a GET request through a configured proxy
#[async_trait]
pub trait ProxyTransport: Send + Sync {
    async fn get(&self, request: &ProbeRequest) -> Result<ProbeResponse, TransportError>;
}

/// `reqwest`-backed transport; builds an independent client for every request
#[derive(Debug, Clone, Copy, Default)]
pub struct ReqwestTransport;

impl ReqwestTransport {
    pub fn new() -> Self {
        Self
    }

    /// Create a reqwest client with the proxy
    fn create_client(&self, request: &ProbeRequest) -> Result<Client, TransportError> {
        let mut proxy = ReqwestProxy::all(request.proxy.url())?;
        if let Some(auth) = &request.proxy.auth {
            proxy = proxy.basic_auth(&auth.username, &auth.password);
        }

        let policy = if request.follow_redirects {
            redirect::Policy::limited(MAX_REDIRECTS)
        } else {
            redirect::Policy::none()
        };

        let client = Client::builder()
            .proxy(proxy)
            .user_agent(request.user_agent.as_str())
            .redirect(policy)
            .timeout(request.timeout)
            .pool_max_idle_per_host(0)
            .build()?;

        Ok(client)
    }
}

#[async_trait]
impl ProxyTransport for ReqwestTransport {
    async fn get(&self, request: &ProbeRequest) -> Result<ProbeResponse, TransportError> {
        let client = self.create_client(request)?;
        let response = client.get(&request.url).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        Ok(ProbeResponse { status, body })
    }
}
