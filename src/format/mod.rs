//! Rendering helpers for raw SNMP data.
//!
//! Value rendering itself lives on [`Value`](crate::Value)'s `Display`; this
//! module holds the byte-level pieces shared by values and log output.

pub mod hex;
