//! Hexadecimal rendering of raw bytes.

use std::fmt;

/// Encode bytes as lowercase hex with no separators.
///
/// ```
/// use snmp_walker::format::hex::encode;
///
/// assert_eq!(encode(&[0xde, 0xad, 0xbe, 0xef]), "deadbeef");
/// ```
pub fn encode(bytes: &[u8]) -> String {
    Hex(bytes).to_string()
}

/// Lazy hex formatter for log fields.
///
/// Formats only when the event is actually recorded.
///
/// ```
/// use snmp_walker::format::hex::Hex;
///
/// assert_eq!(format!("{}", Hex(&[0x30, 0x0c])), "300c");
/// ```
pub struct Hex<'a>(pub &'a [u8]);

impl fmt::Display for Hex<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Hex<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
