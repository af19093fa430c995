//! Mock transport for testing.
//!
//! Provides a scripted transport that plays back queued replies without a
//! network, so walks can be driven step by step.

use super::Transport;
use crate::error::{Error, Result};
use crate::message::CommunityMessage;
use crate::oid::Oid;
use crate::pdu::Pdu;
use crate::value::Value;
use crate::varbind::VarBind;
use crate::version::Version;
use bytes::Bytes;
use std::collections::VecDeque;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// A scripted reply to the next request.
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// Return this data; the request id is patched to match the request
    Data(Bytes),
    /// Return this data as-is
    RawData(Bytes),
    /// Fail immediately with a timeout error
    Timeout,
    /// Sleep for the full receive timeout, then fail with a timeout error
    Silence,
    /// Fail with an I/O error
    IoError(String),
}

/// A request sent through the mock transport.
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    /// The raw request data
    pub data: Bytes,
    /// Request id, when the request decodes
    pub request_id: Option<i32>,
    /// First varbind OID, when the request decodes
    pub oid: Option<Oid>,
}

struct MockTransportInner {
    target: SocketAddr,
    responses: VecDeque<MockResponse>,
    requests: Vec<RecordedRequest>,
    /// Played when the queue is empty; `None` means silence.
    default_response: Option<MockResponse>,
    last_request_id: Option<i32>,
}

/// Mock transport for testing walks.
///
/// # Example
///
/// ```rust
/// use snmp_walker::transport::{MockTransport, ResponseBuilder};
/// use snmp_walker::{oid, Value};
///
/// let mut mock = MockTransport::new("127.0.0.1:161".parse().unwrap());
///
/// mock.queue_response(
///     ResponseBuilder::new(0)
///         .varbind(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0), Value::from("router"))
///         .build_v2c(b"public"),
/// );
/// mock.queue_timeout();
/// assert_eq!(mock.queued_response_count(), 2);
/// ```
#[derive(Clone)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

impl MockTransport {
    /// Create a new mock transport.
    pub fn new(target: SocketAddr) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockTransportInner {
                target,
                responses: VecDeque::new(),
                requests: Vec::new(),
                default_response: None,
                last_request_id: None,
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockTransportInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Queue a reply whose request id will be patched to match the request.
    ///
    /// Use [`queue_raw_response`](Self::queue_raw_response) to test request
    /// id mismatches.
    pub fn queue_response(&mut self, data: impl Into<Bytes>) {
        self.state()
            .responses
            .push_back(MockResponse::Data(data.into()));
    }

    /// Queue a reply returned byte for byte.
    pub fn queue_raw_response(&mut self, data: impl Into<Bytes>) {
        self.state()
            .responses
            .push_back(MockResponse::RawData(data.into()));
    }

    /// Queue an immediate timeout.
    pub fn queue_timeout(&mut self) {
        self.state().responses.push_back(MockResponse::Timeout);
    }

    /// Queue a receive that waits out the whole timeout.
    pub fn queue_silence(&mut self) {
        self.state().responses.push_back(MockResponse::Silence);
    }

    /// Queue an IO error.
    pub fn queue_io_error(&mut self, msg: impl Into<String>) {
        self.state()
            .responses
            .push_back(MockResponse::IoError(msg.into()));
    }

    /// Set the reply used once the queue is empty.
    pub fn set_default_response(&mut self, response: MockResponse) {
        self.state().default_response = Some(response);
    }

    /// All requests sent so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state().requests.clone()
    }

    /// Clear recorded requests.
    pub fn clear_requests(&self) {
        self.state().requests.clear();
    }

    /// Number of queued replies not yet played.
    pub fn queued_response_count(&self) -> usize {
        self.state().responses.len()
    }

    fn patch_request_id(data: Bytes, request_id: i32) -> Bytes {
        let Ok(mut msg) = CommunityMessage::decode(data.clone()) else {
            return data;
        };
        msg.pdu.request_id = request_id;
        msg.encode().unwrap_or(data)
    }
}

impl Transport for MockTransport {
    async fn send(&self, data: &[u8]) -> Result<()> {
        let data = Bytes::copy_from_slice(data);
        let decoded = CommunityMessage::decode(data.clone()).ok();
        let request_id = decoded.as_ref().map(|m| m.pdu.request_id);
        let oid = decoded.and_then(|m| m.pdu.varbinds.into_iter().next().map(|vb| vb.oid));

        let mut state = self.state();
        state.requests.push(RecordedRequest {
            data,
            request_id,
            oid,
        });
        state.last_request_id = request_id;
        Ok(())
    }

    async fn recv(&self, timeout: Duration) -> Result<(Bytes, SocketAddr)> {
        let (response, target, last_request_id) = {
            let mut state = self.state();
            let response = state
                .responses
                .pop_front()
                .or_else(|| state.default_response.clone())
                .unwrap_or(MockResponse::Silence);
            (response, state.target, state.last_request_id)
        };

        match response {
            MockResponse::Data(data) => {
                let data = match last_request_id {
                    Some(id) => Self::patch_request_id(data, id),
                    None => data,
                };
                Ok((data, target))
            }
            MockResponse::RawData(data) => Ok((data, target)),
            MockResponse::Timeout => Err(Error::Timeout {
                target,
                elapsed: timeout,
            }
            .boxed()),
            MockResponse::Silence => {
                tokio::time::sleep(timeout).await;
                Err(Error::Timeout {
                    target,
                    elapsed: timeout,
                }
                .boxed())
            }
            MockResponse::IoError(msg) => Err(Error::Network {
                target,
                source: std::io::Error::other(msg),
            }
            .boxed()),
        }
    }

    fn peer_addr(&self) -> SocketAddr {
        self.state().target
    }

    fn local_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::LOCALHOST, 0))
    }
}

/// Builder for GetResponse messages.
pub struct ResponseBuilder {
    request_id: i32,
    varbinds: Vec<VarBind>,
    error_status: i32,
    error_index: i32,
}

impl ResponseBuilder {
    /// Create a new response builder with the given request ID.
    pub fn new(request_id: i32) -> Self {
        Self {
            request_id,
            varbinds: Vec::new(),
            error_status: 0,
            error_index: 0,
        }
    }

    /// Add a varbind to the response.
    pub fn varbind(mut self, oid: Oid, value: Value) -> Self {
        self.varbinds.push(VarBind::new(oid, value));
        self
    }

    /// Set the error status.
    pub fn error_status(mut self, status: i32) -> Self {
        self.error_status = status;
        self
    }

    /// Set the error index.
    pub fn error_index(mut self, index: i32) -> Self {
        self.error_index = index;
        self
    }

    /// Build a v2c response.
    ///
    /// A response too large for single-byte framing builds as an empty
    /// buffer, which the client reports as malformed.
    pub fn build_v2c(self, community: &[u8]) -> Bytes {
        self.build(Version::V2c, community)
    }

    /// Build a v1 response.
    pub fn build_v1(self, community: &[u8]) -> Bytes {
        self.build(Version::V1, community)
    }

    fn build(self, version: Version, community: &[u8]) -> Bytes {
        let pdu = Pdu {
            error_status: self.error_status,
            error_index: self.error_index,
            ..Pdu::response(self.request_id, self.varbinds)
        };
        CommunityMessage::new(version, Bytes::copy_from_slice(community), pdu)
            .encode()
            .unwrap_or_default()
    }
}
