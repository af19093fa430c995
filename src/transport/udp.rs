//! UDP transport implementation.

use super::Transport;
use crate::error::{Error, Result};
use crate::util::bind_ephemeral_udp_socket;
use bytes::Bytes;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::timeout;

/// Largest datagram read off the socket.
const RECV_BUFFER_SIZE: usize = 65535;

/// UDP transport for a single target.
///
/// Owns one connected UDP socket, so the kernel drops datagrams from any
/// other peer.
#[derive(Clone)]
pub struct UdpTransport {
    inner: Arc<UdpTransportInner>,
}

struct UdpTransportInner {
    socket: UdpSocket,
    target: SocketAddr,
    local_addr: SocketAddr,
}

impl UdpTransport {
    /// Connect to a target address.
    ///
    /// Creates an ephemeral UDP socket bound to the appropriate address family.
    /// For IPv6 targets, the socket has `IPV6_V6ONLY` set to true.
    pub async fn connect(target: SocketAddr) -> Result<Self> {
        tracing::debug!(target: "snmp_walker::client", { snmp.target = %target }, "connecting UDP transport");

        let network = |source| Error::Network { target, source }.boxed();

        let socket = bind_ephemeral_udp_socket(target).await.map_err(network)?;
        socket.connect(target).await.map_err(network)?;
        let local_addr = socket.local_addr().map_err(network)?;

        tracing::debug!(
            target: "snmp_walker::client",
            { snmp.target = %target, snmp.local_addr = %local_addr },
            "UDP transport connected"
        );

        Ok(Self {
            inner: Arc::new(UdpTransportInner {
                socket,
                target,
                local_addr,
            }),
        })
    }
}

impl Transport for UdpTransport {
    async fn send(&self, data: &[u8]) -> Result<()> {
        tracing::trace!(
            target: "snmp_walker::client",
            { snmp.target = %self.inner.target, snmp.bytes = data.len() },
            "UDP send"
        );
        self.inner
            .socket
            .send(data)
            .await
            .map_err(|source| {
                Error::Network {
                    target: self.inner.target,
                    source,
                }
                .boxed()
            })?;
        Ok(())
    }

    async fn recv(&self, recv_timeout: Duration) -> Result<(Bytes, SocketAddr)> {
        let mut buf = vec![0u8; RECV_BUFFER_SIZE];

        match timeout(recv_timeout, self.inner.socket.recv(&mut buf)).await {
            Ok(Ok(len)) => {
                buf.truncate(len);
                tracing::trace!(
                    target: "snmp_walker::client",
                    { snmp.target = %self.inner.target, snmp.bytes = len },
                    "UDP recv complete"
                );
                Ok((Bytes::from(buf), self.inner.target))
            }
            Ok(Err(source)) => {
                tracing::trace!(
                    target: "snmp_walker::client",
                    { snmp.target = %self.inner.target, error = %source },
                    "UDP recv error"
                );
                Err(Error::Network {
                    target: self.inner.target,
                    source,
                }
                .boxed())
            }
            Err(_) => {
                tracing::trace!(
                    target: "snmp_walker::client",
                    { snmp.target = %self.inner.target, snmp.timeout_ms = recv_timeout.as_millis() as u64 },
                    "UDP recv timeout"
                );
                Err(Error::Timeout {
                    target: self.inner.target,
                    elapsed: recv_timeout,
                }
                .boxed())
            }
        }
    }

    fn peer_addr(&self) -> SocketAddr {
        self.inner.target
    }

    fn local_addr(&self) -> SocketAddr {
        self.inner.local_addr
    }
}
