//! Command transport.
//!
//! A [`DeviceSession`] owns the HTTP connection context for one device
//! address. It is opened lazily, reused across calls and released with
//! [`DeviceSession::close`]. Sessions hold no per-request state, so one
//! session can carry many concurrent commands; the device itself gives no
//! ordering guarantee between them.

use crate::protocol::{Command, Response, COMMAND_PATH};
use crate::{Error, Result, DEFAULT_PORT, DEFAULT_TIMEOUT};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, info_span, warn, Instrument, Span};

/// Sends one command and classifies the outcome.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends a command and returns the decoded response.
    ///
    /// Fails with [`Error::ConnectionFailure`] on transport faults,
    /// [`Error::MalformedResponse`] if the body is not a JSON object and
    /// [`Error::CommandRejected`] if `error_code` is nonzero.
    async fn send(&self, command: Command) -> Result<Response>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, command: Command) -> Result<Response> {
        (**self).send(command).await
    }
}

/// HTTP session to a single device.
pub struct DeviceSession {
    host: String,
    port: u16,
    base_url: String,
    timeout: Duration,
    span: Span,
    client: Mutex<Option<Client>>,
}

impl DeviceSession {
    /// Creates a session with default port and timeout.
    pub fn new(host: impl Into<String>) -> Self {
        Self::builder(host).build()
    }

    /// Starts building a session.
    pub fn builder(host: impl Into<String>) -> SessionBuilder {
        SessionBuilder {
            host: host.into(),
            port: DEFAULT_PORT,
            timeout: DEFAULT_TIMEOUT,
            span: None,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the command endpoint URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Opens the HTTP session. Calling this on an open session is a no-op.
    pub fn open(&self) -> Result<()> {
        self.client().map(|_| ())
    }

    /// Releases the HTTP session. The next command reopens it.
    pub fn close(&self) {
        let mut client = self.client.lock().unwrap_or_else(PoisonError::into_inner);
        if client.take().is_some() {
            debug!(parent: &self.span, "Closed device session");
        }
    }

    /// Whether the HTTP session is currently open.
    pub fn is_open(&self) -> bool {
        self.client
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn client(&self) -> Result<Client> {
        let mut guard = self.client.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(client) = guard.as_ref() {
            return Ok(client.clone());
        }
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(Error::ConnectionFailure)?;
        debug!(parent: &self.span, "Opened device session to {}", self.base_url);
        *guard = Some(client.clone());
        Ok(client)
    }

    async fn post(&self, client: Client, command: Command) -> Result<Response> {
        debug!("Sending command: {}", command.to_json());

        let reply = client
            .post(&self.base_url)
            .json(&command)
            .send()
            .await
            .map_err(|e| {
                warn!("Command {} failed to reach device: {}", command.name(), e);
                Error::ConnectionFailure(e)
            })?;

        let status = reply.status();
        // The device labels JSON as text/html, so read text and parse it ourselves.
        let body = reply.text().await.map_err(Error::ConnectionFailure)?;
        // A non-2xx status fails even when the body reports error_code 0.
        if !status.is_success() {
            warn!("Command {} returned HTTP {}", command.name(), status);
            return Err(Error::HttpStatus(status.as_u16()));
        }
        debug!("Response: {}", body);

        let response = Response::parse(&body).inspect_err(|_| {
            warn!("Invalid JSON response to {}: {}", command.name(), body);
        })?;
        response.into_result(command.name()).inspect_err(|e| {
            warn!("{}", e);
        })
    }
}

#[async_trait]
impl Transport for DeviceSession {
    async fn send(&self, command: Command) -> Result<Response> {
        let client = self.client()?;
        self.post(client, command)
            .instrument(self.span.clone())
            .await
    }
}

impl std::fmt::Debug for DeviceSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceSession")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("open", &self.is_open())
            .finish()
    }
}

/// Builder for [`DeviceSession`].
#[derive(Debug)]
pub struct SessionBuilder {
    host: String,
    port: u16,
    timeout: Duration,
    span: Option<Span>,
}

impl SessionBuilder {
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Per-request timeout covering connect, send and body read.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Span that all request logging for this session is recorded under.
    pub fn span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn build(self) -> DeviceSession {
        let span = self
            .span
            .unwrap_or_else(|| info_span!("timesgate", host = %self.host, port = self.port));
        DeviceSession {
            base_url: format!("http://{}:{}{}", self.host, self.port, COMMAND_PATH),
            host: self.host,
            port: self.port,
            timeout: self.timeout,
            span,
            client: Mutex::new(None),
        }
    }
}

/// Serializable session settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Device address (IP or hostname)
    pub host: String,

    /// HTTP port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Per-request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT.as_millis() as u64
}

impl SessionConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: default_port(),
            timeout_ms: default_timeout_ms(),
        }
    }

    /// Returns a builder preloaded with these settings.
    pub fn builder(&self) -> SessionBuilder {
        DeviceSession::builder(self.host.clone())
            .port(self.port)
            .timeout(Duration::from_millis(self.timeout_ms))
    }
}
