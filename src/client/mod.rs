//! SNMP client implementation.

mod builder;
mod walk;

pub use builder::ClientBuilder;
pub use walk::{Walk, WalkOutcome, WalkResult, WalkState};

use crate::error::{Error, Result};
use crate::format::hex::Hex;
use crate::message::{CommunityMessage, GetResponse, parse_get_response};
use crate::oid::Oid;
use crate::transport::{Transport, UdpTransport};
use crate::version::Version;
use bytes::Bytes;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicI32, Ordering};
use std::time::Duration;
use tokio::time::Instant;
use tracing::instrument;

/// Default per-step timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Process-wide request id counter.
///
/// Seeded from the clock so ids differ from a previous run that the agent
/// may still be answering.
static NEXT_REQUEST_ID: LazyLock<AtomicI32> = LazyLock::new(|| {
    use std::time::{SystemTime, UNIX_EPOCH};
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as i32)
        .unwrap_or(1);
    AtomicI32::new(seed.wrapping_abs().max(1))
});

impl Client<UdpTransport> {
    /// Create a new SNMP client builder.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use snmp_walker::Client;
    /// use std::time::Duration;
    ///
    /// # async fn example() -> snmp_walker::Result<()> {
    /// let client = Client::builder("192.168.1.1", "public")
    ///     .timeout(Duration::from_secs(2))
    ///     .connect()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn builder(target: impl Into<String>, community: impl Into<Bytes>) -> ClientBuilder {
        ClientBuilder::new(target, community)
    }
}

/// SNMP client.
///
/// Generic over transport type, with `UdpTransport` as default. Cloning is
/// cheap and shares the transport.
#[derive(Clone)]
pub struct Client<T: Transport = UdpTransport> {
    inner: Arc<ClientInner<T>>,
}

struct ClientInner<T: Transport> {
    transport: T,
    config: ClientConfig,
}

/// Client configuration.
///
/// Most users should use [`ClientBuilder`] rather than constructing this directly.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// SNMP version (default: V2c)
    pub version: Version,
    /// Community string (default: "public")
    pub community: Bytes,
    /// Per-step timeout (default: 5 seconds)
    pub timeout: Duration,
    /// Maximum results from a single walk (default: None/unlimited)
    pub max_walk_results: Option<usize>,
    /// Discard replies whose request id does not match (default: true)
    pub verify_request_id: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            version: Version::V2c,
            community: Bytes::from_static(b"public"),
            timeout: DEFAULT_TIMEOUT,
            max_walk_results: None,
            verify_request_id: true,
        }
    }
}

impl<T: Transport> Client<T> {
    /// Create a new client with the given transport and config.
    pub fn new(transport: T, config: ClientConfig) -> Self {
        Self {
            inner: Arc::new(ClientInner { transport, config }),
        }
    }

    /// The remote address requests go to.
    pub fn peer_addr(&self) -> SocketAddr {
        self.inner.transport.peer_addr()
    }

    /// The active configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    fn next_request_id(&self) -> i32 {
        NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed)
    }

    fn encode_get_next(&self, request_id: i32, oid: &Oid) -> Result<Bytes> {
        CommunityMessage::get_next(
            self.inner.config.version,
            self.inner.config.community.clone(),
            request_id,
            oid,
        )
        .encode()
    }

    /// Fail with [`Error::EncodingLimitExceeded`] if a GetNext for `oid`
    /// cannot be framed with any request id.
    fn check_encodable(&self, oid: &Oid) -> Result<()> {
        // i32::MAX needs the widest request-id INTEGER
        self.encode_get_next(i32::MAX, oid).map(|_| ())
    }

    /// Send one GetNext and wait for its reply.
    ///
    /// The error status in the reply is returned as-is; interpreting it is
    /// up to the caller. With request id verification on, replies for other
    /// requests are dropped and the wait continues until the step's deadline.
    #[instrument(skip(self), err, fields(snmp.target = %self.peer_addr(), snmp.oid = %oid, snmp.request_id = tracing::field::Empty))]
    pub async fn get_next(&self, oid: &Oid) -> Result<GetResponse> {
        let request_id = self.next_request_id();
        tracing::Span::current().record("snmp.request_id", request_id);

        let data = self.encode_get_next(request_id, oid)?;

        tracing::trace!(target: "snmp_walker::client", { snmp.bytes = data.len() }, "sending request");
        self.inner.transport.send(&data).await?;

        let timeout = self.inner.config.timeout;
        let deadline = Instant::now() + timeout;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(self.timeout_error(timeout));
            }

            let (response_data, source) = match self.inner.transport.recv(remaining).await {
                Ok(received) => received,
                Err(e) if matches!(*e, Error::Timeout { .. }) => {
                    tracing::debug!(target: "snmp_walker::client", { snmp.request_id = request_id, elapsed = ?timeout }, "request timed out");
                    return Err(self.timeout_error(timeout));
                }
                Err(e) => return Err(e),
            };
            tracing::trace!(target: "snmp_walker::client", { snmp.bytes = response_data.len(), snmp.source = %source }, "received response");

            let response = parse_get_response(response_data.clone(), Some(source))
                .inspect_err(|_| {
                    tracing::trace!(target: "snmp_walker::client", { snmp.data = %Hex(&response_data) }, "unparseable response");
                })?;

            if self.inner.config.verify_request_id && response.request_id != request_id {
                tracing::warn!(target: "snmp_walker::client", { expected_request_id = request_id, actual_request_id = response.request_id, peer = %source }, "request ID mismatch in response, discarding");
                continue;
            }

            return Ok(response);
        }
    }

    fn timeout_error(&self, elapsed: Duration) -> Box<Error> {
        Error::Timeout {
            target: self.peer_addr(),
            elapsed,
        }
        .boxed()
    }

    /// Walk the subtree under `oid` with repeated GetNext requests.
    ///
    /// The start OID and community are checked against the single-byte
    /// framing limit before anything is sent.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use snmp_walker::{Client, oid};
    ///
    /// # async fn example() -> snmp_walker::Result<()> {
    /// let client = Client::builder("192.168.1.1", "public").connect().await?;
    /// let outcome = client.walk(oid!(1, 3, 6, 1, 2, 1, 1))?.run().await;
    /// for vb in outcome.results.iter() {
    ///     println!("{}", vb);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self), err, fields(snmp.target = %self.peer_addr(), snmp.oid = %oid))]
    pub fn walk(&self, oid: Oid) -> Result<Walk<T>> {
        self.check_encodable(&oid)?;
        Ok(Walk::new(
            self.clone(),
            oid,
            self.inner.config.max_walk_results,
        ))
    }
}
