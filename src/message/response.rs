//! GetResponse parsing.
//!
//! This is a shape parser for the one reply a walk step expects, not a
//! general BER tree walker. It skips the version and community fields
//! without interpreting them and skips any other TLV until it finds the
//! Response PDU, so agents that add or reorder header fields still parse.

use std::net::SocketAddr;

use bytes::Bytes;

use crate::ber::{Decoder, tag};
use crate::error::internal::DecodeErrorKind;
use crate::error::{Error, ErrorStatus, Result, UNKNOWN_TARGET};
use crate::oid::Oid;
use crate::value::Value;

/// The fields a walk step reads from a GetResponse.
#[derive(Debug, Clone, PartialEq)]
pub struct GetResponse {
    /// Request ID echoed by the agent
    pub request_id: i32,
    /// Raw error status
    pub error_status: i32,
    /// Raw error index
    pub error_index: i32,
    /// OID of the first varbind, `None` when the varbind list is empty
    pub next_oid: Option<Oid>,
    /// Value of the first varbind, `None` when the varbind stops after its OID
    pub value: Option<Value>,
}

impl GetResponse {
    /// Error status as an enum.
    pub fn status(&self) -> ErrorStatus {
        ErrorStatus::from_i32(self.error_status)
    }
}

/// Parse a GetResponse datagram.
///
/// `source` only labels errors and log events. Any structural mismatch or
/// a buffer that ends early is [`Error::MalformedResponse`]; no input
/// panics.
pub fn parse_get_response(data: Bytes, source: Option<SocketAddr>) -> Result<GetResponse> {
    let mut decoder = match source {
        Some(addr) => Decoder::with_target(data, addr),
        None => Decoder::new(data),
    };

    let mut message = decoder.read_sequence()?;

    // version, community
    message.skip_tlv()?;
    message.skip_tlv()?;

    loop {
        match message.peek_tag() {
            Some(tag::pdu::RESPONSE) => break,
            Some(_) => {
                message.skip_tlv()?;
            }
            None => {
                tracing::debug!(target: "snmp_walker::ber", { snmp.offset = message.offset(), kind = %DecodeErrorKind::MissingPdu }, "no Response PDU in message");
                return Err(Error::MalformedResponse {
                    target: source.unwrap_or(UNKNOWN_TARGET),
                }
                .boxed());
            }
        }
    }

    let mut pdu = message.read_constructed(tag::pdu::RESPONSE)?;
    let request_id = pdu.read_integer32()?;
    let error_status = pdu.read_integer32()?;
    let error_index = pdu.read_integer32()?;

    let mut varbinds = pdu.read_sequence()?;
    let (next_oid, value) = if varbinds.is_empty() {
        (None, None)
    } else {
        let mut varbind = varbinds.read_sequence()?;
        let oid = varbind.read_oid()?;
        let value = if varbind.is_empty() {
            None
        } else {
            Some(Value::decode(&mut varbind)?)
        };
        (Some(oid), value)
    };

    Ok(GetResponse {
        request_id,
        error_status,
        error_index,
        next_oid,
        value,
    })
}
