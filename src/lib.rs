//! # snmp-walker
//!
//! Async SNMPv2c subtree walker built on Tokio.
//!
//! A walk sends GetNext requests one at a time, starting at a given OID and
//! continuing from each OID the agent returns, until the agent steps outside
//! the requested subtree. Timeouts, cycles and unparseable replies end the
//! walk early without losing what was already collected.
//!
//! ## Features
//!
//! - Hand-rolled BER codec for the GetNext/GetResponse subset, with
//!   single-byte length framing enforced on both sides
//! - Bounds-checked decoding: malformed datagrams are errors, never panics
//! - Walks as a [`Stream`](futures_core::Stream) of [`VarBind`]s or driven to
//!   a [`WalkOutcome`]
//! - Pluggable [`Transport`], with a scripted mock behind the `testing`
//!   feature
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use snmp_walker::{Client, WalkState, oid};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> snmp_walker::Result<()> {
//!     let client = Client::builder("192.168.1.1", "public")
//!         .timeout(Duration::from_secs(2))
//!         .connect()
//!         .await?;
//!
//!     let outcome = client.walk(oid!(1, 3, 6, 1, 2, 1, 1))?.run().await;
//!     for (oid, value) in outcome.results.rendered() {
//!         println!("{} = {}", oid, value);
//!     }
//!     if let WalkState::Aborted(reason) = outcome.state {
//!         eprintln!("walk stopped early: {}", reason);
//!     }
//!     Ok(())
//! }
//! ```

pub mod ber;
pub mod client;
pub mod error;
pub mod format;
pub mod message;
pub mod oid;
pub mod pdu;
pub mod transport;
pub mod util;
pub mod value;
pub mod varbind;
pub mod version;

#[cfg(feature = "cli")]
pub mod cli;

// Re-exports for convenience
pub use client::{
    Client, ClientBuilder, ClientConfig, Walk, WalkOutcome, WalkResult, WalkState,
};
pub use error::{Error, ErrorStatus, Result, WalkAbortReason};
pub use message::{GetResponse, parse_get_response};
pub use oid::Oid;
pub use transport::{Transport, UdpTransport};
pub use value::Value;
pub use varbind::VarBind;
pub use version::Version;

/// Type alias for a client using a dedicated UDP socket.
pub type UdpClient = Client<UdpTransport>;

/// Testing utilities exposed via the `testing` feature.
#[cfg(feature = "testing")]
pub mod testing {
    pub use crate::transport::{MockResponse, MockTransport, RecordedRequest, ResponseBuilder};
}
