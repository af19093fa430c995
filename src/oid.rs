//! Object Identifier (OID) type.
//!
//! OIDs are stored as `SmallVec<[u32; 16]>` to avoid heap allocation for common OIDs.

use crate::error::internal::{DecodeErrorKind, OidErrorKind};
use crate::error::{Error, Result, UNKNOWN_TARGET};
use smallvec::SmallVec;
use std::fmt;

/// Maximum number of arcs (subidentifiers) allowed in an OID.
///
/// Per RFC 2578 Section 3.5: "there are at most 128 sub-identifiers in a value".
pub const MAX_OID_LEN: usize = 128;

/// Object Identifier.
///
/// Stored as a sequence of arc values (u32). Ordering is lexicographic by
/// arcs, which is the order GetNext walks in.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Oid {
    arcs: SmallVec<[u32; 16]>,
}

impl Oid {
    /// Create an OID from arc values.
    ///
    /// No validation is done; see [`validate()`](Self::validate).
    ///
    /// ```
    /// use snmp_walker::oid::Oid;
    ///
    /// let oid = Oid::new([1, 3, 6, 1]);
    /// assert_eq!(oid.len(), 4);
    /// ```
    pub fn new(arcs: impl IntoIterator<Item = u32>) -> Self {
        Self {
            arcs: arcs.into_iter().collect(),
        }
    }

    /// Create an OID from a slice of arcs.
    pub fn from_slice(arcs: &[u32]) -> Self {
        Self {
            arcs: SmallVec::from_slice(arcs),
        }
    }

    /// Parse an OID from dotted string notation (e.g., "1.3.6.1.2.1.1.1.0").
    ///
    /// The result is validated: at least two arcs, first arc 0, 1 or 2, and
    /// second arc at most 39 under arcs 0 and 1. The first two arcs must also
    /// pack into one byte, so `2.47` is the largest pair under arc 2. A
    /// single leading dot is tolerated (`.1.3.6.1`).
    ///
    /// ```
    /// use snmp_walker::oid::Oid;
    ///
    /// let oid = Oid::parse("1.3.6.1.2.1.1.1.0").unwrap();
    /// assert_eq!(oid.arcs(), &[1, 3, 6, 1, 2, 1, 1, 1, 0]);
    ///
    /// assert!(Oid::parse("").is_err());
    /// assert!(Oid::parse("1").is_err());
    /// assert!(Oid::parse("1..3").is_err());
    /// assert!(Oid::parse("3.1").is_err());
    /// assert!(Oid::parse("2.48").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let body = s.strip_prefix('.').unwrap_or(s);
        if body.is_empty() {
            return Err(invalid_oid(OidErrorKind::Empty, s));
        }

        let mut arcs = SmallVec::new();
        for part in body.split('.') {
            // u32::from_str accepts a leading '+', which is not an arc
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid_oid(OidErrorKind::InvalidArc, s));
            }
            let arc: u32 = part
                .parse()
                .map_err(|_| invalid_oid(OidErrorKind::InvalidArc, s))?;
            arcs.push(arc);
        }

        let oid = Self { arcs };
        oid.validate()?;
        if oid.first_subidentifier() >= 0x80 {
            return Err(invalid_oid(
                OidErrorKind::FirstSubidentifierTooLarge {
                    first: oid.arcs[0],
                    second: oid.arcs[1],
                },
                s,
            ));
        }
        Ok(oid)
    }

    /// Get the arc values.
    pub fn arcs(&self) -> &[u32] {
        &self.arcs
    }

    /// Get the number of arcs.
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    /// Check if the OID is empty.
    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    /// Check if this OID starts with another OID.
    ///
    /// An OID always starts with itself.
    ///
    /// ```
    /// use snmp_walker::oid;
    ///
    /// let sys_descr = oid!(1, 3, 6, 1, 2, 1, 1, 1, 0);
    /// assert!(sys_descr.starts_with(&oid!(1, 3, 6, 1, 2, 1, 1)));
    /// assert!(!sys_descr.starts_with(&oid!(1, 3, 6, 1, 2, 1, 2)));
    /// assert!(sys_descr.starts_with(&sys_descr));
    /// ```
    pub fn starts_with(&self, other: &Oid) -> bool {
        self.arcs.len() >= other.arcs.len() && self.arcs[..other.arcs.len()] == other.arcs[..]
    }

    /// Create a child OID by appending an arc.
    pub fn child(&self, arc: u32) -> Oid {
        let mut arcs = self.arcs.clone();
        arcs.push(arc);
        Oid { arcs }
    }

    /// Validate OID arcs per X.690 Section 8.19.4 and [`MAX_OID_LEN`].
    ///
    /// - at least two arcs
    /// - arc1 must be 0, 1, or 2
    /// - arc2 must be <= 39 when arc1 is 0 or 1
    pub fn validate(&self) -> Result<()> {
        let (arc1, arc2) = match self.arcs.as_slice() {
            [] => return Err(invalid_oid(OidErrorKind::Empty, &self.to_string())),
            [_] => return Err(invalid_oid(OidErrorKind::TooShort, &self.to_string())),
            [a, b, ..] => (*a, *b),
        };

        if arc1 > 2 {
            return Err(invalid_oid(OidErrorKind::InvalidFirstArc(arc1), &self.to_string()));
        }
        if arc1 < 2 && arc2 >= 40 {
            return Err(invalid_oid(
                OidErrorKind::InvalidSecondArc {
                    first: arc1,
                    second: arc2,
                },
                &self.to_string(),
            ));
        }
        if self.arcs.len() > MAX_OID_LEN {
            return Err(invalid_oid(
                OidErrorKind::TooManyArcs {
                    count: self.arcs.len(),
                    max: MAX_OID_LEN,
                },
                &self.to_string(),
            ));
        }
        Ok(())
    }

    /// Encode the OID content octets (no tag or length).
    ///
    /// The first two arcs share one byte, `arc1 * 40 + arc2`, which must be
    /// below 128; a larger value is [`Error::EncodingLimitExceeded`]. Every
    /// later arc is base-128, most significant group first, with the high
    /// bit set on all groups but the last.
    ///
    /// ```
    /// use snmp_walker::oid;
    ///
    /// assert_eq!(oid!(1, 3, 6, 1).to_ber_checked().unwrap(), vec![0x2B, 0x06, 0x01]);
    /// assert!(oid!(2, 48).to_ber_checked().is_err());
    /// ```
    pub fn to_ber_checked(&self) -> Result<Vec<u8>> {
        self.validate()?;

        let first = self.first_subidentifier();
        if first >= 0x80 {
            return Err(Error::EncodingLimitExceeded {
                what: "first OID subidentifier",
                length: usize::try_from(first).unwrap_or(usize::MAX),
            }
            .boxed());
        }

        let mut bytes = Vec::with_capacity(self.arcs.len() + 4);
        bytes.push(first as u8);
        for &arc in &self.arcs[2..] {
            encode_subidentifier(&mut bytes, arc);
        }
        Ok(bytes)
    }

    /// `arc1 * 40 + arc2`, widened so any pair of `u32` arcs fits.
    ///
    /// Callers must have validated that there are at least two arcs.
    fn first_subidentifier(&self) -> u64 {
        u64::from(self.arcs[0]) * 40 + u64::from(self.arcs[1])
    }

    /// Decode OID content octets.
    ///
    /// Errors are reported as [`Error::MalformedResponse`] with no target.
    pub fn from_ber(data: &[u8]) -> Result<Self> {
        Self::decode_ber(data).map_err(|kind| {
            tracing::debug!(target: "snmp_walker::ber", { kind = %kind }, "invalid OID encoding");
            Error::MalformedResponse {
                target: UNKNOWN_TARGET,
            }
            .boxed()
        })
    }

    /// Decode OID content octets, keeping the precise failure.
    pub(crate) fn decode_ber(data: &[u8]) -> std::result::Result<Self, DecodeErrorKind> {
        if data.is_empty() {
            return Err(DecodeErrorKind::EmptyOid);
        }

        let mut arcs = SmallVec::new();

        // X.690: values 80 and up all belong to arc 2
        let (first, mut i) = decode_subidentifier(data)?;
        if first < 40 {
            arcs.push(0);
            arcs.push(first);
        } else if first < 80 {
            arcs.push(1);
            arcs.push(first - 40);
        } else {
            arcs.push(2);
            arcs.push(first - 80);
        }

        while i < data.len() {
            let (arc, consumed) = decode_subidentifier(&data[i..])?;
            arcs.push(arc);
            i += consumed;

            if arcs.len() > MAX_OID_LEN {
                return Err(DecodeErrorKind::TooManyArcs { count: arcs.len() });
            }
        }

        Ok(Self { arcs })
    }
}

fn invalid_oid(kind: OidErrorKind, input: &str) -> Box<Error> {
    tracing::debug!(target: "snmp_walker::oid", { snmp.oid = %input, kind = %kind }, "invalid OID");
    Error::InvalidOid(format!("{}: {}", input, kind).into()).boxed()
}

fn encode_subidentifier(bytes: &mut Vec<u8>, value: u32) {
    // Number of 7-bit groups, at least one for zero
    let groups = ((32 - value.leading_zeros()) as usize).div_ceil(7).max(1);

    for i in (0..groups).rev() {
        let mut byte = ((value >> (i * 7)) & 0x7F) as u8;
        if i > 0 {
            byte |= 0x80;
        }
        bytes.push(byte);
    }
}

/// Decode a subidentifier, returning (value, bytes_consumed).
fn decode_subidentifier(data: &[u8]) -> std::result::Result<(u32, usize), DecodeErrorKind> {
    let mut value: u32 = 0;

    for (i, &byte) in data.iter().enumerate() {
        if value > (u32::MAX >> 7) {
            return Err(DecodeErrorKind::SubidentifierOverflow);
        }
        value = (value << 7) | u32::from(byte & 0x7F);
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }

    Err(DecodeErrorKind::TruncatedSubidentifier)
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Oid({})", self)
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for arc in &self.arcs {
            if !first {
                write!(f, ".")?;
            }
            write!(f, "{}", arc)?;
            first = false;
        }
        Ok(())
    }
}

impl std::str::FromStr for Oid {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<&[u32]> for Oid {
    fn from(arcs: &[u32]) -> Self {
        Self::from_slice(arcs)
    }
}

impl<const N: usize> From<[u32; N]> for Oid {
    fn from(arcs: [u32; N]) -> Self {
        Self::new(arcs)
    }
}

impl PartialOrd for Oid {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Oid {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.arcs.cmp(&other.arcs)
    }
}

/// Macro to build an OID from literal arcs.
///
/// ```
/// use snmp_walker::oid;
///
/// let sys_descr = oid!(1, 3, 6, 1, 2, 1, 1, 1, 0);
/// assert_eq!(sys_descr.to_string(), "1.3.6.1.2.1.1.1.0");
/// ```
#[macro_export]
macro_rules! oid {
    ($($arc:expr),* $(,)?) => {
        $crate::oid::Oid::from_slice(&[$($arc),*])
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let oid = Oid::parse("1.3.6.1.2.1.1.1.0").unwrap();
        assert_eq!(oid.arcs(), &[1, 3, 6, 1, 2, 1, 1, 1, 0]);
        assert_eq!(Oid::parse(".1.3.6.1").unwrap(), oid!(1, 3, 6, 1));
    }

    #[test]
    fn test_parse_rejects() {
        for bad in ["", ".", "1", "1.", "1..3", "1.3.x", "1.3.-6", "1.3.+6", "3.0", "0.40", "1.3.99999999999"] {
            let err = Oid::parse(bad).unwrap_err();
            assert!(
                matches!(*err, Error::InvalidOid(_)),
                "{:?} gave {:?}",
                bad,
                err
            );
        }
    }

    #[test]
    fn test_display_roundtrip() {
        let original = oid!(1, 3, 6, 1, 4, 1, 9, 9, 42);
        let parsed: Oid = original.to_string().parse().unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_starts_with() {
        let oid = Oid::parse("1.3.6.1.2.1.1.1.0").unwrap();
        let prefix = Oid::parse("1.3.6.1").unwrap();
        assert!(oid.starts_with(&prefix));
        assert!(!prefix.starts_with(&oid));
        // prefix match is by arc, not by text
        assert!(!oid!(1, 3, 6, 1, 2, 1, 10).starts_with(&oid!(1, 3, 6, 1, 2, 1, 1)));
    }

    #[test]
    fn test_ordering() {
        assert!(oid!(1, 3, 6, 1, 2) < oid!(1, 3, 6, 1, 10));
        assert!(oid!(1, 3, 6, 1) < oid!(1, 3, 6, 1, 0));
    }

    #[test]
    fn test_ber_encoding() {
        assert_eq!(oid!(1, 3, 6, 1).to_ber_checked().unwrap(), vec![0x2B, 0x06, 0x01]);
        assert_eq!(oid!(0, 0).to_ber_checked().unwrap(), vec![0x00]);
        assert_eq!(oid!(2, 47).to_ber_checked().unwrap(), vec![0x7F]);
    }

    #[test]
    fn test_ber_multibyte_arcs() {
        // 128 = 0x81 0x00, 16383 = 0xFF 0x7F, 2^28 - 1 = 0xFF 0xFF 0xFF 0x7F
        let oid = oid!(1, 3, 128, 16383, 268_435_455);
        assert_eq!(
            oid.to_ber_checked().unwrap(),
            vec![0x2B, 0x81, 0x00, 0xFF, 0x7F, 0xFF, 0xFF, 0xFF, 0x7F]
        );
        let enterprise = oid!(1, 3, 6, 1, 4, 1, 2021);
        let ber = enterprise.to_ber_checked().unwrap();
        assert_eq!(&ber[ber.len() - 2..], &[0x8F, 0x65]);
        assert_eq!(Oid::from_ber(&ber).unwrap(), enterprise);
    }

    #[test]
    fn test_ber_u32_max_arc() {
        let oid = oid!(1, 3, u32::MAX);
        let ber = oid.to_ber_checked().unwrap();
        assert_eq!(ber, vec![0x2B, 0x8F, 0xFF, 0xFF, 0xFF, 0x7F]);
        assert_eq!(Oid::from_ber(&ber).unwrap(), oid);
    }

    #[test]
    fn test_first_subidentifier_limit() {
        let err = oid!(2, 48).to_ber_checked().unwrap_err();
        assert!(matches!(*err, Error::EncodingLimitExceeded { .. }));
        assert!(oid!(3, 0).to_ber_checked().is_err());
        assert!(oid!(1).to_ber_checked().is_err());

        let err = Oid::from_slice(&[2, u32::MAX]).to_ber_checked().unwrap_err();
        match *err {
            Error::EncodingLimitExceeded { length, .. } => assert!(length >= 0x80),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_oversized_first_subidentifier() {
        assert!(Oid::parse("2.47").is_ok());
        for text in ["2.48", "2.4294967295"] {
            let err = Oid::parse(text).unwrap_err();
            assert!(matches!(*err, Error::InvalidOid(_)), "{text} gave {err:?}");
        }
    }

    #[test]
    fn test_decode_first_byte_split() {
        assert_eq!(Oid::from_ber(&[0x2B]).unwrap().arcs(), &[1, 3]);
        assert_eq!(Oid::from_ber(&[0x27]).unwrap().arcs(), &[0, 39]);
        assert_eq!(Oid::from_ber(&[0x50]).unwrap().arcs(), &[2, 0]);
        assert_eq!(Oid::from_ber(&[0x7F]).unwrap().arcs(), &[2, 47]);
    }

    #[test]
    fn test_decode_errors() {
        assert_eq!(Oid::decode_ber(&[]), Err(DecodeErrorKind::EmptyOid));
        assert_eq!(
            Oid::decode_ber(&[0x2B, 0x86]),
            Err(DecodeErrorKind::TruncatedSubidentifier)
        );
        assert_eq!(
            Oid::decode_ber(&[0x2B, 0x90, 0x80, 0x80, 0x80, 0x00]),
            Err(DecodeErrorKind::SubidentifierOverflow)
        );
        assert!(Oid::from_ber(&[0x2B, 0xFF]).is_err());
    }

    #[test]
    fn test_oid_non_minimal_subidentifier() {
        assert_eq!(Oid::from_ber(&[0x2B, 0x80, 0x01]).unwrap().arcs(), &[1, 3, 1]);
        assert_eq!(Oid::from_ber(&[0x2B, 0x80, 0x00]).unwrap().arcs(), &[1, 3, 0]);
    }

    #[test]
    fn test_from_ber_enforces_max_oid_len() {
        let mut at_limit = vec![0x2B];
        at_limit.extend(std::iter::repeat_n(0x01, MAX_OID_LEN - 2));
        assert_eq!(Oid::from_ber(&at_limit).unwrap().len(), MAX_OID_LEN);

        let mut over_limit = vec![0x2B];
        over_limit.extend(std::iter::repeat_n(0x01, MAX_OID_LEN - 1));
        assert!(Oid::from_ber(&over_limit).is_err());
    }

    #[test]
    fn test_macro() {
        let oid = oid!(1, 3, 6, 1,);
        assert_eq!(oid.arcs(), &[1, 3, 6, 1]);
    }
}
