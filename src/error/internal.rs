//! Detailed error kinds that are logged but never surfaced in [`Error`](super::Error).
//!
//! Decode and encode failures are reported to callers as coarse public
//! variants. The precise cause goes to `tracing` so it can be recovered from
//! debug logs without widening the public error type.

/// BER decode failure causes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// Expected different tag.
    UnexpectedTag { expected: u8, actual: u8 },
    /// Input ended before the structure did.
    TruncatedData,
    /// Long-form length byte (only single-byte lengths are framed).
    LongFormLength(u8),
    /// Indefinite length (0x80).
    IndefiniteLength,
    /// Declared length runs past the enclosing buffer.
    InsufficientData { needed: usize, available: usize },
    /// TLV extends past end of data.
    TlvOverflow,
    /// INTEGER does not fit the field it was read into.
    IntegerOverflow,
    /// OID content was empty.
    EmptyOid,
    /// Last subidentifier still had its continuation bit set.
    TruncatedSubidentifier,
    /// Subidentifier does not fit in 32 bits.
    SubidentifierOverflow,
    /// More arcs than `MAX_OID_LEN`.
    TooManyArcs { count: usize },
    /// No GetResponse PDU found inside the message.
    MissingPdu,
    /// PDU tag other than the one expected.
    UnknownPduType(u8),
    /// Version field outside the community-based range.
    UnknownVersion(i64),
}

impl std::fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedTag { expected, actual } => {
                write!(f, "expected tag 0x{:02X}, got 0x{:02X}", expected, actual)
            }
            Self::TruncatedData => write!(f, "unexpected end of data"),
            Self::LongFormLength(b) => write!(f, "long-form length 0x{:02X} not supported", b),
            Self::IndefiniteLength => write!(f, "indefinite length encoding not supported"),
            Self::InsufficientData { needed, available } => {
                write!(f, "need {} bytes but only {} remaining", needed, available)
            }
            Self::TlvOverflow => write!(f, "TLV extends past end of data"),
            Self::IntegerOverflow => write!(f, "integer overflow"),
            Self::EmptyOid => write!(f, "empty OID encoding"),
            Self::TruncatedSubidentifier => write!(f, "truncated OID subidentifier"),
            Self::SubidentifierOverflow => write!(f, "subidentifier overflow"),
            Self::TooManyArcs { count } => write!(f, "OID has too many arcs ({})", count),
            Self::MissingPdu => write!(f, "missing PDU in message"),
            Self::UnknownPduType(t) => write!(f, "unknown PDU type: 0x{:02X}", t),
            Self::UnknownVersion(v) => write!(f, "unknown SNMP version: {}", v),
        }
    }
}

/// OID validation failure causes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OidErrorKind {
    /// Empty OID string.
    Empty,
    /// Component was not a decimal `u32`.
    InvalidArc,
    /// First arc must be 0, 1, or 2.
    InvalidFirstArc(u32),
    /// Second arc too large for first arc value.
    InvalidSecondArc { first: u32, second: u32 },
    /// `arc1 * 40 + arc2` does not fit the single first byte.
    FirstSubidentifierTooLarge { first: u32, second: u32 },
    /// OID too short (minimum 2 arcs).
    TooShort,
    /// OID has too many arcs.
    TooManyArcs { count: usize, max: usize },
}

impl std::fmt::Display for OidErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty OID"),
            Self::InvalidArc => write!(f, "invalid arc value"),
            Self::InvalidFirstArc(v) => write!(f, "first arc must be 0, 1, or 2, got {}", v),
            Self::InvalidSecondArc { first, second } => {
                write!(f, "second arc {} too large for first arc {}", second, first)
            }
            Self::FirstSubidentifierTooLarge { first, second } => {
                write!(f, "arcs {}.{} do not fit in one subidentifier byte", first, second)
            }
            Self::TooShort => write!(f, "OID must have at least 2 arcs"),
            Self::TooManyArcs { count, max } => {
                write!(f, "OID has {} arcs, exceeds maximum {}", count, max)
            }
        }
    }
}
