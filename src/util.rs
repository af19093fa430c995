//! Internal utilities.

use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs};

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;

use crate::error::{Error, Result};

/// Standard SNMP agent port.
pub const DEFAULT_PORT: u16 = 161;

/// Create and bind a UDP socket.
///
/// IPv6 sockets get `IPV6_V6ONLY` so they never see IPv4-mapped peers.
pub(crate) fn bind_udp_socket(addr: SocketAddr) -> io::Result<UdpSocket> {
    let domain = if addr.is_ipv6() {
        Domain::IPV6
    } else {
        Domain::IPV4
    };

    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;

    if addr.is_ipv6() {
        socket.set_only_v6(true)?;
    }

    // tokio requires a non-blocking std socket
    socket.set_nonblocking(true)?;

    socket.bind(&addr.into())?;

    UdpSocket::from_std(socket.into())
}

/// Bind an ephemeral UDP socket in the same address family as `target`.
pub(crate) async fn bind_ephemeral_udp_socket(target: SocketAddr) -> io::Result<UdpSocket> {
    let bind_addr = if target.is_ipv6() {
        SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
    } else {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
    };

    bind_udp_socket(bind_addr)
}

/// Resolve a target string to a socket address.
///
/// Accepts `host`, `host:port`, `a.b.c.d`, `[v6]` and `[v6]:port`. A bare
/// IPv6 literal without brackets is also accepted. Missing ports default to
/// [`DEFAULT_PORT`]. Host names go through the system resolver and the first
/// address wins.
pub fn resolve_target(target: &str) -> Result<SocketAddr> {
    let target = target.trim();
    if target.is_empty() {
        return Err(Error::Config("empty target".into()).boxed());
    }

    if let Ok(addr) = target.parse::<SocketAddr>() {
        return Ok(addr);
    }
    if let Ok(ip) = target.parse::<std::net::IpAddr>() {
        return Ok(SocketAddr::new(ip, DEFAULT_PORT));
    }
    if let Some(Ok(ip)) = target
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .map(str::parse::<Ipv6Addr>)
    {
        return Ok(SocketAddr::from((ip, DEFAULT_PORT)));
    }

    let with_port = if target.contains(':') {
        target.to_string()
    } else {
        format!("{}:{}", target, DEFAULT_PORT)
    };

    let mut addrs = with_port
        .to_socket_addrs()
        .map_err(|e| Error::Config(format!("cannot resolve {}: {}", target, e).into()).boxed())?;

    addrs
        .next()
        .ok_or_else(|| Error::Config(format!("{} resolved to no addresses", target).into()).boxed())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_udp_socket_ipv4() {
        let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let socket = bind_udp_socket(addr).unwrap();
        let local = socket.local_addr().unwrap();
        assert!(local.is_ipv4());
        assert_ne!(local.port(), 0);
    }

    #[tokio::test]
    async fn test_bind_ephemeral_follows_target_family() {
        let target: SocketAddr = "192.168.1.1:161".parse().unwrap();
        let socket = bind_ephemeral_udp_socket(target).await.unwrap();
        assert!(socket.local_addr().unwrap().is_ipv4());
    }

    #[test]
    fn test_resolve_ip_literals() {
        assert_eq!(
            resolve_target("192.0.2.1").unwrap(),
            "192.0.2.1:161".parse().unwrap()
        );
        assert_eq!(
            resolve_target("192.0.2.1:1161").unwrap(),
            "192.0.2.1:1161".parse().unwrap()
        );
        assert_eq!(
            resolve_target("[2001:db8::1]").unwrap(),
            "[2001:db8::1]:161".parse().unwrap()
        );
        assert_eq!(
            resolve_target("2001:db8::1").unwrap(),
            "[2001:db8::1]:161".parse().unwrap()
        );
        assert_eq!(
            resolve_target("[::1]:10161").unwrap(),
            "[::1]:10161".parse().unwrap()
        );
    }

    #[test]
    fn test_resolve_localhost_default_port() {
        let addr = resolve_target("localhost").unwrap();
        assert_eq!(addr.port(), DEFAULT_PORT);
        assert!(addr.ip().is_loopback());
    }

    #[test]
    fn test_resolve_empty_rejected() {
        let err = resolve_target("  ").unwrap_err();
        assert!(matches!(*err, Error::Config(_)));
    }
}
