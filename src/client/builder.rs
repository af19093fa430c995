//! Client builder.
//!
//! [`ClientBuilder`] collects the target, community and walk settings, then
//! either opens a UDP transport ([`connect`](ClientBuilder::connect)) or
//! wraps one supplied by the caller ([`build_with`](ClientBuilder::build_with)).

use std::time::Duration;

use bytes::Bytes;

use crate::client::{ClientConfig, DEFAULT_TIMEOUT};
use crate::error::{Error, Result};
use crate::transport::{Transport, UdpTransport};
use crate::util::resolve_target;
use crate::version::Version;

use super::Client;

/// Builder for constructing SNMP clients.
///
/// # Example
///
/// ```rust,no_run
/// use snmp_walker::ClientBuilder;
/// use std::time::Duration;
///
/// # async fn example() -> snmp_walker::Result<()> {
/// let client = ClientBuilder::new("192.168.1.1:161", "public")
///     .timeout(Duration::from_millis(1500))
///     .max_walk_results(10_000)
///     .connect()
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    target: String,
    community: Bytes,
    version: Version,
    timeout: Duration,
    max_walk_results: Option<usize>,
    verify_request_id: bool,
}

impl ClientBuilder {
    /// Create a new client builder.
    ///
    /// `target` is a host name or IP address, optionally with a port
    /// (default 161).
    pub fn new(target: impl Into<String>, community: impl Into<Bytes>) -> Self {
        Self {
            target: target.into(),
            community: community.into(),
            version: Version::V2c,
            timeout: DEFAULT_TIMEOUT,
            max_walk_results: None,
            verify_request_id: true,
        }
    }

    /// Set the per-step timeout (default: 5 seconds).
    ///
    /// A walk step that gets no usable reply within this time aborts the
    /// walk. There are no retries.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the message version (default: v2c).
    pub fn version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    /// Stop walks after this many results (default: unlimited).
    ///
    /// A walk that hits the limit ends as aborted with
    /// [`WalkAbortReason::ResultLimit`](crate::WalkAbortReason::ResultLimit),
    /// keeping everything collected so far.
    pub fn max_walk_results(mut self, limit: usize) -> Self {
        self.max_walk_results = Some(limit);
        self
    }

    /// Check reply request ids against the request (default: true).
    ///
    /// When disabled, the first datagram to arrive is taken as the reply.
    pub fn verify_request_id(mut self, verify: bool) -> Self {
        self.verify_request_id = verify;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.timeout.is_zero() {
            return Err(Error::Config("timeout must be non-zero".into()).boxed());
        }
        if self.max_walk_results == Some(0) {
            return Err(Error::Config("max_walk_results must be at least 1".into()).boxed());
        }
        Ok(())
    }

    fn build_config(&self) -> ClientConfig {
        ClientConfig {
            version: self.version,
            community: self.community.clone(),
            timeout: self.timeout,
            max_walk_results: self.max_walk_results,
            verify_request_id: self.verify_request_id,
        }
    }

    /// Resolve the target and connect a UDP transport to it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an invalid configuration or an
    /// unresolvable target, and [`Error::Network`] if the socket cannot be
    /// opened.
    pub async fn connect(self) -> Result<Client<UdpTransport>> {
        self.validate()?;
        let addr = resolve_target(&self.target)?;
        let transport = UdpTransport::connect(addr).await?;
        Ok(Client::new(transport, self.build_config()))
    }

    /// Build a client over an existing transport.
    ///
    /// The target string is ignored; the transport's peer is used.
    pub fn build_with<T: Transport>(self, transport: T) -> Result<Client<T>> {
        self.validate()?;
        Ok(Client::new(transport, self.build_config()))
    }
}
