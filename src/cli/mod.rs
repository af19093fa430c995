//! Command-line support for the `snmp-walk` binary.

pub mod args;
