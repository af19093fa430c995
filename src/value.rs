//! SNMP value types.
//!
//! The `Value` enum represents the scalar types a walk can return, including
//! the SNMPv2c exception values.

use crate::ber::{Decoder, EncodeBuf, tag};
use crate::error::Result;
use crate::format::hex;
use crate::oid::Oid;
use bytes::Bytes;

/// SNMP value.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Value {
    /// INTEGER (ASN.1 primitive, signed). Wider than the 32 bits SMI allows
    /// so over-long agent encodings survive up to 8 bytes.
    Integer(i64),

    /// OCTET STRING (arbitrary bytes).
    OctetString(Bytes),

    /// NULL
    Null,

    /// OBJECT IDENTIFIER
    ObjectIdentifier(Oid),

    /// Counter32 (unsigned 32-bit, wrapping)
    Counter32(u32),

    /// Gauge32 / Unsigned32 (unsigned 32-bit, non-wrapping)
    Gauge32(u32),

    /// TimeTicks (hundredths of seconds)
    TimeTicks(u32),

    /// noSuchObject exception.
    NoSuchObject,

    /// noSuchInstance exception.
    NoSuchInstance,

    /// endOfMibView exception - there is nothing after the requested OID.
    ///
    /// ```
    /// use snmp_walker::Value;
    ///
    /// let response = Value::EndOfMibView;
    /// assert!(response.is_exception());
    /// assert_eq!(response.to_string(), "endOfMibView");
    /// ```
    EndOfMibView,

    /// Unrecognized tag, kept with its raw payload.
    Unknown { tag: u8, data: Bytes },
}

impl Value {
    /// Try to get as i64.
    ///
    /// ```
    /// use snmp_walker::Value;
    ///
    /// assert_eq!(Value::Integer(-100).as_i64(), Some(-100));
    /// assert_eq!(Value::Counter32(42).as_i64(), None);
    /// ```
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as u32.
    ///
    /// Returns `Some` for [`Value::Counter32`], [`Value::Gauge32`],
    /// [`Value::TimeTicks`], or an [`Value::Integer`] in `u32` range.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Value::Counter32(v) | Value::Gauge32(v) | Value::TimeTicks(v) => Some(*v),
            Value::Integer(v) => u32::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Raw bytes of an [`Value::OctetString`].
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::OctetString(v) => Some(v),
            _ => None,
        }
    }

    /// Best-effort ASCII rendering of an [`Value::OctetString`].
    ///
    /// Bytes outside 7-bit ASCII become `?`.
    ///
    /// ```
    /// use snmp_walker::Value;
    /// use bytes::Bytes;
    ///
    /// let v = Value::OctetString(Bytes::from_static(b"caf\xc3\xa9"));
    /// assert_eq!(v.as_ascii_lossy().as_deref(), Some("caf??"));
    /// ```
    pub fn as_ascii_lossy(&self) -> Option<String> {
        self.as_bytes().map(ascii_lossy)
    }

    /// Try to get as OID.
    pub fn as_oid(&self) -> Option<&Oid> {
        match self {
            Value::ObjectIdentifier(oid) => Some(oid),
            _ => None,
        }
    }

    /// Check if this is an exception value.
    pub fn is_exception(&self) -> bool {
        matches!(
            self,
            Value::NoSuchObject | Value::NoSuchInstance | Value::EndOfMibView
        )
    }

    /// BER tag this value encodes with.
    pub fn tag(&self) -> u8 {
        match self {
            Value::Integer(_) => tag::universal::INTEGER,
            Value::OctetString(_) => tag::universal::OCTET_STRING,
            Value::Null => tag::universal::NULL,
            Value::ObjectIdentifier(_) => tag::universal::OBJECT_IDENTIFIER,
            Value::Counter32(_) => tag::application::COUNTER32,
            Value::Gauge32(_) => tag::application::GAUGE32,
            Value::TimeTicks(_) => tag::application::TIMETICKS,
            Value::NoSuchObject => tag::context::NO_SUCH_OBJECT,
            Value::NoSuchInstance => tag::context::NO_SUCH_INSTANCE,
            Value::EndOfMibView => tag::context::END_OF_MIB_VIEW,
            Value::Unknown { tag, .. } => *tag,
        }
    }

    /// Encode to BER.
    pub fn encode(&self, buf: &mut EncodeBuf) {
        match self {
            Value::Integer(v) => buf.push_integer(*v),
            Value::OctetString(data) => buf.push_octet_string(data),
            Value::Null => buf.push_null(),
            Value::ObjectIdentifier(oid) => buf.push_oid(oid),
            Value::Counter32(v) | Value::Gauge32(v) | Value::TimeTicks(v) => {
                buf.push_unsigned32(self.tag(), *v)
            }
            Value::NoSuchObject | Value::NoSuchInstance | Value::EndOfMibView => {
                buf.push_length(0);
                buf.push_tag(self.tag());
            }
            Value::Unknown { tag: t, data } => {
                buf.push_bytes(data);
                buf.push_length(data.len());
                buf.push_tag(*t);
            }
        }
    }

    /// Decode one value TLV.
    ///
    /// Unknown tags are not an error; they come back as [`Value::Unknown`].
    /// A NULL or exception with a non-zero length still decodes, with the
    /// declared payload skipped.
    pub fn decode(decoder: &mut Decoder) -> Result<Self> {
        let (tag, len) = decoder.read_tag_length()?;

        match tag {
            tag::universal::INTEGER => Ok(Value::Integer(decoder.read_integer_value(len)?)),
            tag::universal::OCTET_STRING => Ok(Value::OctetString(decoder.read_bytes(len)?)),
            tag::universal::NULL => {
                decoder.read_bytes(len)?;
                Ok(Value::Null)
            }
            tag::universal::OBJECT_IDENTIFIER => {
                Ok(Value::ObjectIdentifier(decoder.read_oid_value(len)?))
            }
            tag::application::COUNTER32 => Ok(Value::Counter32(decoder.read_unsigned32_value(len)?)),
            tag::application::GAUGE32 => Ok(Value::Gauge32(decoder.read_unsigned32_value(len)?)),
            tag::application::TIMETICKS => Ok(Value::TimeTicks(decoder.read_unsigned32_value(len)?)),
            tag::context::NO_SUCH_OBJECT => {
                decoder.read_bytes(len)?;
                Ok(Value::NoSuchObject)
            }
            tag::context::NO_SUCH_INSTANCE => {
                decoder.read_bytes(len)?;
                Ok(Value::NoSuchInstance)
            }
            tag::context::END_OF_MIB_VIEW => {
                decoder.read_bytes(len)?;
                Ok(Value::EndOfMibView)
            }
            _ => {
                let data = decoder.read_bytes(len)?;
                Ok(Value::Unknown { tag, data })
            }
        }
    }
}

fn ascii_lossy(data: &[u8]) -> String {
    data.iter()
        .map(|&b| if b.is_ascii() { b as char } else { '?' })
        .collect()
}

/// Console rendering used for walk output.
///
/// ```
/// use snmp_walker::{Value, oid};
///
/// assert_eq!(Value::TimeTicks(360000).to_string(), "360000");
/// assert_eq!(Value::Null.to_string(), "null");
/// assert_eq!(Value::ObjectIdentifier(oid!(1, 3, 6, 1)).to_string(), "1.3.6.1");
/// ```
impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::OctetString(data) => f.write_str(&ascii_lossy(data)),
            Value::Null => write!(f, "null"),
            Value::ObjectIdentifier(oid) => write!(f, "{}", oid),
            Value::Counter32(v) | Value::Gauge32(v) | Value::TimeTicks(v) => write!(f, "{}", v),
            Value::NoSuchObject => write!(f, "noSuchObject"),
            Value::NoSuchInstance => write!(f, "noSuchInstance"),
            Value::EndOfMibView => write!(f, "endOfMibView"),
            Value::Unknown { tag, data } if data.is_empty() => write!(f, "[Type: 0x{:02X}]", tag),
            Value::Unknown { tag, data } => {
                write!(f, "[Type: 0x{:02X}] {}", tag, hex::encode(data))
            }
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v.into())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::OctetString(Bytes::copy_from_slice(s.as_bytes()))
    }
}

impl From<Bytes> for Value {
    fn from(data: Bytes) -> Self {
        Value::OctetString(data)
    }
}

impl From<Oid> for Value {
    fn from(oid: Oid) -> Self {
        Value::ObjectIdentifier(oid)
    }
}
