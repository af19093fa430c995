//! BER (Basic Encoding Rules) codec for the SNMP subset a walk needs.
//!
//! Lengths are single-byte only (X.690 short form). [`EncodeBuf`] refuses
//! to frame anything longer and [`Decoder`] rejects long-form lengths.

mod decode;
mod encode;
pub mod length;
pub mod tag;

pub use decode::Decoder;
pub use encode::EncodeBuf;
