//! HTTP client for node endpoints
//!
//! Every call returns an explicit [`EndpointError`] instead of bubbling a
//! transport error up the stack, so a dead node only ever degrades its own
//! record.

use crate::error::{Result, ScanError};
use crate::types::{EpochResponse, HealthResponse, NodeRegistryPayload};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);
pub const DEFAULT_USER_AGENT: &str = concat!("rustchain-weekly-scan/", env!("CARGO_PKG_VERSION"));

/// Failure of a single endpoint request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EndpointError {
    #[error("request timed out")]
    Timeout,

    #[error("unexpected HTTP status {status}")]
    Status { status: u16 },

    #[error("transport error: {reason}")]
    Transport { reason: String },

    #[error("invalid JSON payload: {reason}")]
    InvalidJson { reason: String },
}

impl EndpointError {
    /// Stable short code used in reports
    pub fn code(&self) -> String {
        match self {
            EndpointError::Timeout => "timeout".to_string(),
            EndpointError::Status { status } => format!("http_{status}"),
            EndpointError::Transport { reason } => format!("url_error:{reason}"),
            EndpointError::InvalidJson { .. } => "invalid_json".to_string(),
        }
    }

    fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return EndpointError::Timeout;
        }
        if let Some(status) = err.status() {
            return EndpointError::Status {
                status: status.as_u16(),
            };
        }
        if err.is_decode() {
            return EndpointError::InvalidJson {
                reason: err.to_string(),
            };
        }

        // The innermost cause carries the useful part ("connection refused", ...)
        let mut source: &dyn std::error::Error = &err;
        while let Some(next) = source.source() {
            source = next;
        }
        EndpointError::Transport {
            reason: source.to_string(),
        }
    }
}

/// Result of a single endpoint request
pub type EndpointResult<T> = std::result::Result<T, EndpointError>;

/// HTTP client shared by every probe of a scan
#[derive(Clone, Debug)]
pub struct NodeClient {
    http_client: reqwest::Client,
}

impl NodeClient {
    /// Create a client with default timeout and TLS verification disabled
    pub fn new() -> Result<Self> {
        NodeClientBuilder::default().build()
    }

    /// Create a new client using the builder pattern
    pub fn builder() -> NodeClientBuilder {
        NodeClientBuilder::default()
    }

    /// GET `/health`
    pub async fn health(&self, base_url: &str) -> EndpointResult<HealthResponse> {
        self.get_json(base_url, "/health").await
    }

    /// GET `/epoch`
    pub async fn epoch(&self, base_url: &str) -> EndpointResult<EpochResponse> {
        self.get_json(base_url, "/epoch").await
    }

    /// GET `/api/miners`
    ///
    /// Elements are returned raw; required keys are checked per element by
    /// the probe so one malformed row does not hide the rest.
    pub async fn miners(&self, base_url: &str) -> EndpointResult<Vec<Value>> {
        self.get_json(base_url, "/api/miners").await
    }

    /// GET `/api/nodes` (seed only)
    pub async fn nodes(&self, base_url: &str) -> EndpointResult<NodeRegistryPayload> {
        self.get_json(base_url, "/api/nodes").await
    }

    /// Generic GET that decodes a JSON body
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        base_url: &str,
        path: &str,
    ) -> EndpointResult<T> {
        let url = format!("{}{}", base_url.trim_end_matches('/'), path);
        debug!("GET {}", url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(EndpointError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            debug!("GET {} returned {}", url, status);
            return Err(EndpointError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(EndpointError::from_reqwest)?;

        serde_json::from_slice(&body).map_err(|e| EndpointError::InvalidJson {
            reason: e.to_string(),
        })
    }
}

/// Builder for constructing a NodeClient with custom configuration
#[derive(Default)]
pub struct NodeClientBuilder {
    timeout: Option<Duration>,
    verify_tls: bool,
    admin_key: Option<String>,
    user_agent: Option<String>,
}

impl NodeClientBuilder {
    /// Set the per-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Verify TLS certificates (off by default, nodes use self-signed certs)
    pub fn verify_tls(mut self, verify: bool) -> Self {
        self.verify_tls = verify;
        self
    }

    /// Send an admin key as `X-Admin-Key` and `X-API-Key`
    pub fn admin_key(mut self, key: Option<String>) -> Self {
        self.admin_key = key.filter(|k| !k.trim().is_empty());
        self
    }

    /// Override the `User-Agent` header
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build the client
    pub fn build(self) -> Result<NodeClient> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(key) = &self.admin_key {
            let value = HeaderValue::from_str(key.trim())
                .map_err(|_| ScanError::config("admin key contains invalid header characters"))?;
            headers.insert(HeaderName::from_static("x-admin-key"), value.clone());
            headers.insert(HeaderName::from_static("x-api-key"), value);
        }

        let http_client = reqwest::Client::builder()
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .user_agent(
                self.user_agent
                    .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            )
            .default_headers(headers)
            .danger_accept_invalid_certs(!self.verify_tls)
            .build()?;

        Ok(NodeClient { http_client })
    }
}
