//! Shared test infrastructure for snmp-walker.
//!
//! Provides TestAgent (a loopback GetNext responder) and MIB fixtures.

// Not every test file uses every helper
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod agent;
pub mod fixtures;

pub use agent::TestAgent;
pub use fixtures::{interface_table, system_mib};
