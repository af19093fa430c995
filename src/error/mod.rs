//! Error types for snmp-walker.
//!
//! This module provides:
//!
//! - [`Error`] - The main error type
//! - [`ErrorStatus`] - SNMP protocol errors returned by agents (RFC 3416)
//! - [`WalkAbortReason`] - Reasons a walk ended before leaving its subtree
//!
//! # Error Handling
//!
//! Errors are boxed for efficiency: `Result<T> = Result<T, Box<Error>>`.
//!
//! ```rust
//! use snmp_walker::{Error, Result};
//!
//! fn handle_error(result: Result<()>) {
//!     match result {
//!         Ok(()) => println!("Success"),
//!         Err(e) => match &*e {
//!             Error::Timeout { target, elapsed } => {
//!                 println!("{} silent for {:?}", target, elapsed);
//!             }
//!             Error::EncodingLimitExceeded { what, length } => {
//!                 println!("{} is {} bytes, cannot be framed", what, length);
//!             }
//!             _ => println!("Error: {}", e),
//!         }
//!     }
//! }
//! ```

pub(crate) mod internal;

use std::net::SocketAddr;
use std::time::Duration;

/// Placeholder target address used when no target is known.
///
/// Used in error contexts where the peer cannot be determined, such as
/// parsing a buffer that did not come off a socket.
pub(crate) const UNKNOWN_TARGET: SocketAddr =
    SocketAddr::new(std::net::IpAddr::V4(std::net::Ipv4Addr::new(0, 0, 0, 0)), 0);

// Detailed decode failures are logged, then collapsed to a public variant:
//
// tracing::debug!(
//     target: "snmp_walker::ber",
//     { snmp.offset = 42, kind = %DecodeErrorKind::TruncatedData },
//     "decode error details here"
// );
// return Err(Error::MalformedResponse { target }.boxed());

/// Result type alias using the library's boxed Error type.
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Reason a walk was aborted.
///
/// A walk that leaves its subtree, reaches `endOfMibView`, or receives an
/// empty varbind list ends normally and has no abort reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WalkAbortReason {
    /// No reply arrived within the per-step timeout.
    Timeout,
    /// A reply could not be parsed.
    MalformedResponse,
    /// Agent returned an OID that was already recorded.
    Cycle,
    /// The next request could not be framed with single-byte lengths.
    EncodingLimitExceeded,
    /// The transport failed to send or receive.
    Network,
    /// Agent reported an error status other than `noSuchName`.
    AgentError { status: ErrorStatus, index: u32 },
    /// The configured result limit was reached.
    ResultLimit,
    /// The walk's cancellation token fired.
    Cancelled,
}

impl std::fmt::Display for WalkAbortReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout => write!(f, "timeout"),
            Self::MalformedResponse => write!(f, "malformed response"),
            Self::Cycle => write!(f, "cycle detected"),
            Self::EncodingLimitExceeded => write!(f, "encoding limit exceeded"),
            Self::Network => write!(f, "network error"),
            Self::AgentError { status, index } => {
                write!(f, "agent error {} at index {}", status, index)
            }
            Self::ResultLimit => write!(f, "result limit reached"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// The main error type for all snmp-walker operations.
///
/// Errors are boxed (via [`Result`]) to keep the size small on the stack.
///
/// ```
/// use snmp_walker::Error;
///
/// fn is_transient(error: &Error) -> bool {
///     matches!(error, Error::Timeout { .. } | Error::Network { .. })
/// }
/// ```
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Network failure (connection refused, unreachable, etc.)
    #[error("network error communicating with {target}: {source}")]
    Network {
        target: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// No reply within the step timeout.
    #[error("timeout after {elapsed:?} waiting for {target}")]
    Timeout { target: SocketAddr, elapsed: Duration },

    /// Malformed response from agent.
    #[error("malformed response from {target}")]
    MalformedResponse { target: SocketAddr },

    /// A structure needs a length byte of 128 or more.
    #[error("{what} is {length} bytes, exceeds single-byte length limit")]
    EncodingLimitExceeded { what: &'static str, length: usize },

    /// Walk ended abnormally.
    #[error("walk aborted for {target}: {reason}")]
    WalkAborted {
        target: SocketAddr,
        reason: WalkAbortReason,
    },

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(Box<str>),

    /// Invalid OID format.
    #[error("invalid OID: {0}")]
    InvalidOid(Box<str>),
}

impl Error {
    /// Box this error (convenience for constructing boxed errors).
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }
}

/// SNMP protocol error status codes (RFC 3416).
///
/// Only the GetNext-relevant codes get their own variant; anything else is
/// kept as [`ErrorStatus::Unknown`] with its raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum ErrorStatus {
    /// Operation completed successfully (status = 0).
    NoError,
    /// Response message would be too large for transport (status = 1).
    TooBig,
    /// Requested OID not found (status = 2). SNMPv1 end-of-view signal.
    NoSuchName,
    /// Invalid value (status = 3).
    BadValue,
    /// Read-only object (status = 4).
    ReadOnly,
    /// Unspecified error occurred (status = 5).
    GenErr,
    /// Object exists but access is denied (status = 6).
    NoAccess,
    /// Access denied by VACM (status = 16).
    AuthorizationError,
    /// Any other status code.
    Unknown(i32),
}

impl ErrorStatus {
    /// Create from raw status code.
    pub fn from_i32(value: i32) -> Self {
        match value {
            0 => Self::NoError,
            1 => Self::TooBig,
            2 => Self::NoSuchName,
            3 => Self::BadValue,
            4 => Self::ReadOnly,
            5 => Self::GenErr,
            6 => Self::NoAccess,
            16 => Self::AuthorizationError,
            other => Self::Unknown(other),
        }
    }

    /// Convert to raw status code.
    pub fn as_i32(&self) -> i32 {
        match self {
            Self::NoError => 0,
            Self::TooBig => 1,
            Self::NoSuchName => 2,
            Self::BadValue => 3,
            Self::ReadOnly => 4,
            Self::GenErr => 5,
            Self::NoAccess => 6,
            Self::AuthorizationError => 16,
            Self::Unknown(code) => *code,
        }
    }
}

impl std::fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoError => write!(f, "noError"),
            Self::TooBig => write!(f, "tooBig"),
            Self::NoSuchName => write!(f, "noSuchName"),
            Self::BadValue => write!(f, "badValue"),
            Self::ReadOnly => write!(f, "readOnly"),
            Self::GenErr => write!(f, "genErr"),
            Self::NoAccess => write!(f, "noAccess"),
            Self::AuthorizationError => write!(f, "authorizationError"),
            Self::Unknown(code) => write!(f, "status({})", code),
        }
    }
}
