//! BER encoding.
//!
//! [`EncodeBuf`] writes back to front: the innermost content is pushed
//! first and each enclosing header is prepended once its payload length is
//! known. Push methods are infallible so nested closures stay simple; the
//! first framing violation is remembered and reported by
//! [`EncodeBuf::finish`].

use bytes::Bytes;

use super::length::encode_length;
use super::tag;
use crate::error::{Error, Result};
use crate::oid::Oid;

/// Prepend-style BER encoder.
#[derive(Default)]
pub struct EncodeBuf {
    // Bytes stored in reverse order.
    rev: Vec<u8>,
    error: Option<Box<Error>>,
}

impl EncodeBuf {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    /// Create an empty buffer with room for `cap` bytes.
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            rev: Vec::with_capacity(cap),
            error: None,
        }
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.rev.len()
    }

    /// Whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.rev.is_empty()
    }

    fn fail(&mut self, err: Box<Error>) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    /// Prepend a single tag byte.
    pub fn push_tag(&mut self, tag: u8) {
        self.rev.push(tag);
    }

    /// Prepend raw bytes, keeping their order.
    pub fn push_bytes(&mut self, data: &[u8]) {
        self.rev.extend(data.iter().rev());
    }

    /// Prepend a length byte for a payload called `what`.
    pub fn push_length_of(&mut self, len: usize, what: &'static str) {
        match encode_length(len, what) {
            Ok(byte) => self.rev.push(byte),
            Err(e) => {
                self.fail(e);
                // Keep the buffer shape consistent; the result is discarded.
                self.rev.push(0);
            }
        }
    }

    /// Prepend a length byte.
    pub fn push_length(&mut self, len: usize) {
        self.push_length_of(len, "value");
    }

    /// Prepend a constructed TLV whose content is written by `f`.
    pub fn push_constructed<F>(&mut self, tag: u8, f: F)
    where
        F: FnOnce(&mut Self),
    {
        let start = self.len();
        f(self);
        let len = self.len() - start;
        let what = if tag == tag::universal::SEQUENCE {
            "SEQUENCE"
        } else {
            "PDU"
        };
        self.push_length_of(len, what);
        self.push_tag(tag);
    }

    /// Prepend a SEQUENCE whose content is written by `f`.
    pub fn push_sequence<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Self),
    {
        self.push_constructed(tag::universal::SEQUENCE, f);
    }

    /// Prepend an INTEGER in minimal two's-complement form.
    pub fn push_integer(&mut self, value: i64) {
        self.push_integer_with_tag(tag::universal::INTEGER, value);
    }

    fn push_integer_with_tag(&mut self, tag: u8, value: i64) {
        let bytes = value.to_be_bytes();
        let mut start = 0;
        // Drop redundant sign bytes, keeping the one that carries the sign.
        while start < bytes.len() - 1 {
            let (b, next) = (bytes[start], bytes[start + 1]);
            if (b == 0x00 && next & 0x80 == 0) || (b == 0xFF && next & 0x80 != 0) {
                start += 1;
            } else {
                break;
            }
        }
        let content = &bytes[start..];
        self.push_bytes(content);
        self.push_length(content.len());
        self.push_tag(tag);
    }

    /// Prepend an unsigned 32-bit application value (Counter32, Gauge32, TimeTicks).
    pub fn push_unsigned32(&mut self, tag: u8, value: u32) {
        self.push_integer_with_tag(tag, i64::from(value));
    }

    /// Prepend an OCTET STRING.
    pub fn push_octet_string(&mut self, data: &[u8]) {
        self.push_bytes(data);
        self.push_length_of(data.len(), "OCTET STRING");
        self.push_tag(tag::universal::OCTET_STRING);
    }

    /// Prepend a NULL.
    pub fn push_null(&mut self) {
        self.push_length(0);
        self.push_tag(tag::universal::NULL);
    }

    /// Prepend an OBJECT IDENTIFIER.
    pub fn push_oid(&mut self, oid: &Oid) {
        match oid.to_ber_checked() {
            Ok(content) => {
                self.push_bytes(&content);
                self.push_length_of(content.len(), "OBJECT IDENTIFIER");
            }
            Err(e) => {
                self.fail(e);
                self.push_length(0);
            }
        }
        self.push_tag(tag::universal::OBJECT_IDENTIFIER);
    }

    /// Finish encoding, returning the bytes in wire order.
    ///
    /// Fails with [`Error::EncodingLimitExceeded`] (or the OID error) if any
    /// push could not be framed.
    pub fn finish(mut self) -> Result<Bytes> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.rev.reverse();
        Ok(Bytes::from(self.rev))
    }
}
