//! Transport layer abstraction.
//!
//! Provides the `Transport` trait and the UDP implementation a walk runs
//! over. A scripted [`MockTransport`] is available for tests behind the
//! `testing` feature.

mod udp;

#[cfg(any(test, feature = "testing"))]
mod mock;

pub use udp::*;

#[cfg(any(test, feature = "testing"))]
pub use mock::*;

use crate::error::Result;
use bytes::Bytes;
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

/// Client-side transport abstraction.
///
/// A transport carries one datagram out and one datagram back per call. It
/// does not correlate replies; the client checks request ids itself.
///
/// # Clone Requirement
///
/// Walks own a clone of the client and therefore of the transport.
/// Implementations keep their state behind an `Arc`, so cloning is a
/// reference count increment. Clones share the socket, so two walks must not
/// run over the same transport at the same time.
pub trait Transport: Send + Sync + Clone {
    /// Send one request datagram to the peer.
    fn send(&self, data: &[u8]) -> impl Future<Output = Result<()>> + Send;

    /// Wait at most `timeout` for one datagram.
    ///
    /// Returns the payload and its source address, or
    /// [`Error::Timeout`](crate::Error::Timeout) when nothing arrives in time.
    fn recv(&self, timeout: Duration) -> impl Future<Output = Result<(Bytes, SocketAddr)>> + Send;

    /// The remote address this transport sends to and receives from.
    fn peer_addr(&self) -> SocketAddr;

    /// Local bind address.
    fn local_addr(&self) -> SocketAddr;
}
