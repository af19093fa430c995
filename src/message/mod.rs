//! SNMP message wrappers.
//!
//! - [`CommunityMessage`] - v1/v2c message, used to build GetNext requests
//! - [`parse_get_response`] - tolerant parser for the agent's reply

mod community;
mod response;

pub use community::CommunityMessage;
pub use response::{GetResponse, parse_get_response};
