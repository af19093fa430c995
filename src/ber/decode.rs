//! BER decoding.
//!
//! Zero-copy decoding using `Bytes` to avoid allocations. Every read is
//! bounds-checked; running off the end of the buffer is reported as
//! [`Error::MalformedResponse`], never a panic.

use std::net::SocketAddr;

use super::length::decode_length;
use super::tag;
use crate::error::internal::DecodeErrorKind;
use crate::error::{Error, Result, UNKNOWN_TARGET};
use crate::oid::Oid;
use bytes::Bytes;

/// BER decoder that reads from a byte buffer.
pub struct Decoder {
    data: Bytes,
    offset: usize,
    target: Option<SocketAddr>,
}

impl Decoder {
    /// Create a new decoder from bytes.
    pub fn new(data: Bytes) -> Self {
        Self {
            data,
            offset: 0,
            target: None,
        }
    }

    /// Create a decoder from bytes with a target address for error context.
    pub fn with_target(data: Bytes, target: SocketAddr) -> Self {
        Self {
            data,
            offset: 0,
            target: Some(target),
        }
    }

    /// Create a decoder from a byte slice (copies the data).
    pub fn from_slice(data: &[u8]) -> Self {
        Self::new(Bytes::copy_from_slice(data))
    }

    fn target(&self) -> SocketAddr {
        self.target.unwrap_or(UNKNOWN_TARGET)
    }

    fn malformed(&self, kind: DecodeErrorKind, msg: &'static str) -> Box<Error> {
        tracing::debug!(target: "snmp_walker::ber", { snmp.offset = %self.offset, kind = %kind }, "{}", msg);
        Error::MalformedResponse {
            target: self.target(),
        }
        .boxed()
    }

    /// Get the current offset.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Get remaining bytes.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.offset)
    }

    /// Check if we've reached the end.
    pub fn is_empty(&self) -> bool {
        self.offset >= self.data.len()
    }

    /// Peek at the next tag without consuming it.
    pub fn peek_tag(&self) -> Option<u8> {
        self.data.get(self.offset).copied()
    }

    /// Read a single byte.
    pub fn read_byte(&mut self) -> Result<u8> {
        let Some(&byte) = self.data.get(self.offset) else {
            return Err(self.malformed(
                DecodeErrorKind::TruncatedData,
                "truncated data: unexpected end of input",
            ));
        };
        self.offset += 1;
        Ok(byte)
    }

    /// Read a tag byte.
    pub fn read_tag(&mut self) -> Result<u8> {
        self.read_byte()
    }

    /// Read a single-byte length.
    pub fn read_length(&mut self) -> Result<usize> {
        let rest = self.data.get(self.offset..).unwrap_or_default();
        let (len, consumed) = decode_length(rest, self.offset, self.target)?;
        self.offset += consumed;
        Ok(len)
    }

    /// Read a tag and its length together.
    pub fn read_tag_length(&mut self) -> Result<(u8, usize)> {
        let tag = self.read_tag()?;
        let len = self.read_length()?;
        Ok((tag, len))
    }

    /// Read raw bytes without copying.
    pub fn read_bytes(&mut self, len: usize) -> Result<Bytes> {
        // saturating_add keeps a huge len from wrapping past the check
        let end = self.offset.saturating_add(len);
        if end > self.data.len() {
            let available = self.remaining();
            return Err(self.malformed(
                DecodeErrorKind::InsufficientData {
                    needed: len,
                    available,
                },
                "insufficient data",
            ));
        }
        let bytes = self.data.slice(self.offset..end);
        self.offset = end;
        Ok(bytes)
    }

    /// Read and expect a specific tag, returning the content length.
    pub fn expect_tag(&mut self, expected: u8) -> Result<usize> {
        let tag = self.read_tag()?;
        if tag != expected {
            self.offset -= 1;
            return Err(self.malformed(
                DecodeErrorKind::UnexpectedTag {
                    expected,
                    actual: tag,
                },
                "unexpected tag",
            ));
        }
        self.read_length()
    }

    /// Read a BER INTEGER.
    pub fn read_integer(&mut self) -> Result<i64> {
        let len = self.expect_tag(tag::universal::INTEGER)?;
        self.read_integer_value(len)
    }

    /// Read an INTEGER that must fit in 32 bits (request-id, error fields).
    pub fn read_integer32(&mut self) -> Result<i32> {
        let value = self.read_integer()?;
        i32::try_from(value).map_err(|_| {
            self.malformed(DecodeErrorKind::IntegerOverflow, "32-bit integer out of range")
        })
    }

    /// Read integer value given the length.
    ///
    /// Two's-complement, sign-extended from the first byte. A zero-length
    /// payload reads as 0. Payloads longer than 8 bytes keep their first 8.
    pub fn read_integer_value(&mut self, len: usize) -> Result<i64> {
        let bytes = self.read_bytes(len)?;
        if len > 8 {
            tracing::warn!(target: "snmp_walker::ber", { snmp.offset = %self.offset, length = len }, "integer too long, truncating to 8 bytes");
        }

        let is_negative = bytes.first().is_some_and(|b| b & 0x80 != 0);
        let mut value: i64 = if is_negative { -1 } else { 0 };

        for &byte in bytes.iter().take(8) {
            value = (value << 8) | i64::from(byte);
        }

        Ok(value)
    }

    /// Read an unsigned 32-bit integer with specific tag.
    pub fn read_unsigned32(&mut self, expected_tag: u8) -> Result<u32> {
        let len = self.expect_tag(expected_tag)?;
        self.read_unsigned32_value(len)
    }

    /// Read unsigned 32-bit integer value given length.
    ///
    /// Never sign-extended. A 5-byte form is accepted only with a leading
    /// zero; anything wider does not fit 32 bits and is malformed.
    pub fn read_unsigned32_value(&mut self, len: usize) -> Result<u32> {
        let bytes = self.read_bytes(len)?;
        if len > 5 || (len == 5 && bytes[0] != 0) {
            return Err(self.malformed(
                DecodeErrorKind::IntegerOverflow,
                "unsigned integer exceeds 32 bits",
            ));
        }

        let mut value: u32 = 0;
        for &byte in bytes.iter() {
            value = (value << 8) | u32::from(byte);
        }

        Ok(value)
    }

    /// Read an OCTET STRING.
    pub fn read_octet_string(&mut self) -> Result<Bytes> {
        let len = self.expect_tag(tag::universal::OCTET_STRING)?;
        self.read_bytes(len)
    }

    /// Read an OBJECT IDENTIFIER.
    pub fn read_oid(&mut self) -> Result<Oid> {
        let len = self.expect_tag(tag::universal::OBJECT_IDENTIFIER)?;
        self.read_oid_value(len)
    }

    /// Read an OID given a pre-read length.
    pub fn read_oid_value(&mut self, len: usize) -> Result<Oid> {
        let bytes = self.read_bytes(len)?;
        Oid::decode_ber(&bytes).map_err(|kind| self.malformed(kind, "invalid OID encoding"))
    }

    /// Read a SEQUENCE, returning a decoder for its contents.
    pub fn read_sequence(&mut self) -> Result<Decoder> {
        self.read_constructed(tag::universal::SEQUENCE)
    }

    /// Read a constructed type with a specific tag, returning a decoder for its contents.
    pub fn read_constructed(&mut self, expected_tag: u8) -> Result<Decoder> {
        let len = self.expect_tag(expected_tag)?;
        self.sub_decoder(len)
    }

    /// Skip a TLV (tag-length-value) without parsing, returning its tag.
    pub fn skip_tlv(&mut self) -> Result<u8> {
        let (tag, len) = self.read_tag_length()?;
        let new_offset = self.offset.saturating_add(len);
        if new_offset > self.data.len() {
            return Err(self.malformed(DecodeErrorKind::TlvOverflow, "TLV extends past end of data"));
        }
        self.offset = new_offset;
        Ok(tag)
    }

    /// Create a sub-decoder for a portion of the remaining data.
    pub fn sub_decoder(&mut self, len: usize) -> Result<Decoder> {
        let content = self.read_bytes(len)?;
        Ok(Decoder {
            data: content,
            offset: 0,
            target: self.target,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_integer() {
        let mut dec = Decoder::from_slice(&[0x02, 0x01, 0x00]);
        assert_eq!(dec.read_integer().unwrap(), 0);

        let mut dec = Decoder::from_slice(&[0x02, 0x01, 0x7F]);
        assert_eq!(dec.read_integer().unwrap(), 127);

        let mut dec = Decoder::from_slice(&[0x02, 0x02, 0x00, 0x80]);
        assert_eq!(dec.read_integer().unwrap(), 128);

        let mut dec = Decoder::from_slice(&[0x02, 0x01, 0xFF]);
        assert_eq!(dec.read_integer().unwrap(), -1);

        let mut dec = Decoder::from_slice(&[0x02, 0x01, 0x80]);
        assert_eq!(dec.read_integer().unwrap(), -128);

        let mut dec = Decoder::from_slice(&[0x02, 0x02, 0xFF, 0x7F]);
        assert_eq!(dec.read_integer().unwrap(), -129);
    }

    #[test]
    fn test_zero_length_integer_is_zero() {
        let mut dec = Decoder::from_slice(&[0x02, 0x00]);
        assert_eq!(dec.read_integer().unwrap(), 0);
        assert!(dec.is_empty());
    }

    #[test]
    fn test_accept_non_minimal_integer() {
        let mut dec = Decoder::from_slice(&[0x02, 0x02, 0x00, 0x01]);
        assert_eq!(dec.read_integer().unwrap(), 1);

        let mut dec = Decoder::from_slice(&[0x02, 0x03, 0x00, 0x00, 0x80]);
        assert_eq!(dec.read_integer().unwrap(), 128);

        let mut dec = Decoder::from_slice(&[0x02, 0x02, 0xFF, 0xFF]);
        assert_eq!(dec.read_integer().unwrap(), -1);
    }

    #[test]
    fn test_integer_overflow_truncation() {
        // 9-byte integer keeps its first 8 bytes
        let mut dec =
            Decoder::from_slice(&[0x02, 0x09, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09]);
        assert_eq!(dec.read_integer().unwrap(), 0x0102030405060708);
        assert!(dec.is_empty());
    }

    #[test]
    fn test_integer32_range() {
        let mut dec = Decoder::from_slice(&[0x02, 0x04, 0x7F, 0xFF, 0xFF, 0xFF]);
        assert_eq!(dec.read_integer32().unwrap(), i32::MAX);

        let mut dec = Decoder::from_slice(&[0x02, 0x05, 0x01, 0x00, 0x00, 0x00, 0x00]);
        assert!(dec.read_integer32().is_err());
    }

    #[test]
    fn test_unsigned_not_sign_extended() {
        let mut dec = Decoder::from_slice(&[0x41, 0x01, 0xFF]);
        assert_eq!(dec.read_unsigned32(tag::application::COUNTER32).unwrap(), 255);

        let mut dec = Decoder::from_slice(&[0x42, 0x05, 0x00, 0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(
            dec.read_unsigned32(tag::application::GAUGE32).unwrap(),
            u32::MAX
        );
    }

    #[test]
    fn test_unsigned_wider_than_32_bits_rejected() {
        let mut dec = Decoder::from_slice(&[0x41, 0x05, 0x01, 0x00, 0x00, 0x00, 0x00]);
        let err = dec.read_unsigned32(tag::application::COUNTER32).unwrap_err();
        assert!(matches!(*err, Error::MalformedResponse { .. }));

        let mut dec = Decoder::from_slice(&[0x43, 0x06, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01]);
        assert!(dec.read_unsigned32(tag::application::TIMETICKS).is_err());
    }

    #[test]
    fn test_decode_octet_string() {
        let mut dec = Decoder::from_slice(&[0x04, 0x05, b'h', b'e', b'l', b'l', b'o']);
        let s = dec.read_octet_string().unwrap();
        assert_eq!(&s[..], b"hello");
    }

    #[test]
    fn test_decode_oid() {
        let mut dec = Decoder::from_slice(&[0x06, 0x03, 0x2B, 0x06, 0x01]);
        let oid = dec.read_oid().unwrap();
        assert_eq!(oid.arcs(), &[1, 3, 6, 1]);
    }

    #[test]
    fn test_decode_truncated_oid_subidentifier() {
        let mut dec = Decoder::from_slice(&[0x06, 0x02, 0x2B, 0x86]);
        assert!(dec.read_oid().is_err());
    }

    #[test]
    fn test_decode_sequence() {
        let mut dec = Decoder::from_slice(&[0x30, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x02]);
        let mut seq = dec.read_sequence().unwrap();
        assert_eq!(seq.read_integer().unwrap(), 1);
        assert_eq!(seq.read_integer().unwrap(), 2);
        assert!(seq.is_empty());
    }

    #[test]
    fn test_read_past_end() {
        let mut dec = Decoder::from_slice(&[0x30]);
        assert_eq!(dec.read_byte().unwrap(), 0x30);
        assert!(dec.read_byte().is_err());
        assert!(dec.read_length().is_err());
    }

    #[test]
    fn test_read_bytes_rejects_oversized_length() {
        let mut dec = Decoder::from_slice(&[0x01, 0x02, 0x03]);
        let err = dec.read_bytes(100).unwrap_err();
        assert!(
            matches!(*err, Error::MalformedResponse { .. }),
            "expected MalformedResponse error, got {:?}",
            err
        );
        assert_eq!(dec.offset(), 0);
    }

    #[test]
    fn test_read_bytes_huge_length_does_not_wrap() {
        let mut dec = Decoder::from_slice(&[0x01]);
        dec.read_byte().unwrap();
        assert!(dec.read_bytes(usize::MAX).is_err());
    }

    #[test]
    fn test_skip_tlv_rejects_oversized_length() {
        let mut dec = Decoder::from_slice(&[0x04, 0x10, 0xAA, 0xBB, 0xCC]);
        let err = dec.skip_tlv().unwrap_err();
        assert!(matches!(*err, Error::MalformedResponse { .. }));
    }

    #[test]
    fn test_skip_tlv_returns_tag() {
        let mut dec = Decoder::from_slice(&[0x04, 0x01, 0xAA, 0x05, 0x00]);
        assert_eq!(dec.skip_tlv().unwrap(), 0x04);
        assert_eq!(dec.peek_tag(), Some(0x05));
    }

    #[test]
    fn test_error_carries_target() {
        let target: SocketAddr = "192.0.2.1:161".parse().unwrap();
        let mut dec = Decoder::with_target(Bytes::from_static(&[0x02]), target);
        match *dec.read_integer().unwrap_err() {
            Error::MalformedResponse { target: t } => assert_eq!(t, target),
            other => panic!("unexpected error {:?}", other),
        }
    }
}
