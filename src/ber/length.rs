//! BER length encoding and decoding.
//!
//! Only the X.690 short form is framed: a single byte, bit 8 clear,
//! value 0-127. Long-form and indefinite lengths are rejected on decode,
//! and payloads of 128 bytes or more cannot be encoded.

use std::net::SocketAddr;

use crate::error::internal::DecodeErrorKind;
use crate::error::{Error, Result, UNKNOWN_TARGET};

/// Largest payload a single length byte can describe.
pub const MAX_LENGTH: usize = 0x7F;

/// Encode a length as its single length byte.
///
/// `what` names the structure for the error message.
pub fn encode_length(len: usize, what: &'static str) -> Result<u8> {
    if len > MAX_LENGTH {
        return Err(Error::EncodingLimitExceeded { what, length: len }.boxed());
    }
    Ok(len as u8)
}

/// Decode a length from bytes, returning (length, bytes_consumed).
///
/// The `base_offset` parameter is only used for error logging.
pub fn decode_length(
    data: &[u8],
    base_offset: usize,
    target: Option<SocketAddr>,
) -> Result<(usize, usize)> {
    let target = target.unwrap_or(UNKNOWN_TARGET);
    let Some(&first) = data.first() else {
        tracing::debug!(target: "snmp_walker::ber", { snmp.offset = %base_offset, kind = %DecodeErrorKind::TruncatedData }, "truncated data: missing length");
        return Err(Error::MalformedResponse { target }.boxed());
    };

    if first == 0x80 {
        tracing::debug!(target: "snmp_walker::ber", { snmp.offset = %base_offset, kind = %DecodeErrorKind::IndefiniteLength }, "indefinite length");
        return Err(Error::MalformedResponse { target }.boxed());
    }

    if first & 0x80 != 0 {
        tracing::debug!(target: "snmp_walker::ber", { snmp.offset = %base_offset, kind = %DecodeErrorKind::LongFormLength(first) }, "long-form length");
        return Err(Error::MalformedResponse { target }.boxed());
    }

    Ok((first as usize, 1))
}
