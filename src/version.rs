//! SNMP protocol version.

/// Community-based SNMP version.
///
/// SNMPv1 and SNMPv2c share the message layout a walk uses; only the
/// version field differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Version {
    /// SNMPv1 (wire value 0)
    V1,
    /// SNMPv2c (wire value 1)
    #[default]
    V2c,
}

impl Version {
    /// Wire value of the version field.
    pub fn as_i32(self) -> i32 {
        match self {
            Version::V1 => 0,
            Version::V2c => 1,
        }
    }

    /// Parse the wire value of the version field.
    pub fn from_i32(value: i64) -> Option<Self> {
        match value {
            0 => Some(Version::V1),
            1 => Some(Version::V2c),
            _ => None,
        }
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Version::V1 => write!(f, "v1"),
            Version::V2c => write!(f, "v2c"),
        }
    }
}

impl std::str::FromStr for Version {
    type Err = Box<crate::Error>;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "1" | "v1" => Ok(Version::V1),
            "2c" | "v2c" => Ok(Version::V2c),
            _ => Err(crate::Error::Config(format!("unsupported SNMP version: {}", s).into()).boxed()),
        }
    }
}
