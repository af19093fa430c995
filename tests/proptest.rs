//! Property-based tests for the codec and parser.

use bytes::Bytes;
use proptest::prelude::*;
use snmp_walker::ber::{Decoder, EncodeBuf};
use snmp_walker::message::CommunityMessage;
use snmp_walker::oid::Oid;
use snmp_walker::pdu::Pdu;
use snmp_walker::value::Value;
use snmp_walker::{VarBind, Version, parse_get_response};

/// OIDs whose BER form fits a single length byte and a single first byte.
fn encodable_oid() -> impl Strategy<Value = Oid> {
    let build = |first: u32, second: u32, rest: Vec<u32>| {
        let mut arcs = vec![first, second];
        arcs.extend(rest);
        Oid::from_slice(&arcs)
    };
    prop_oneof![
        (0u32..=1, 0u32..40, prop::collection::vec(0u32..(1 << 28), 0..20))
            .prop_map(move |(first, second, rest)| build(first, second, rest)),
        (0u32..48, prop::collection::vec(0u32..(1 << 28), 0..20))
            .prop_map(move |(second, rest)| build(2, second, rest)),
    ]
}

/// Short OIDs, so a few varbinds still fit single-byte framing.
fn short_oid() -> impl Strategy<Value = Oid> {
    (0u32..40, prop::collection::vec(0u32..(1 << 28), 0..6)).prop_map(|(second, rest)| {
        let mut arcs = vec![1, second];
        arcs.extend(rest);
        Oid::from_slice(&arcs)
    })
}

fn any_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i32>().prop_map(|n| Value::Integer(n.into())),
        prop::collection::vec(any::<u8>(), 0..16).prop_map(|b| Value::OctetString(b.into())),
        Just(Value::Null),
        short_oid().prop_map(Value::ObjectIdentifier),
        any::<u32>().prop_map(Value::Counter32),
        any::<u32>().prop_map(Value::Gauge32),
        any::<u32>().prop_map(Value::TimeTicks),
        Just(Value::NoSuchObject),
        Just(Value::NoSuchInstance),
        Just(Value::EndOfMibView),
    ]
}

fn response_message() -> impl Strategy<Value = Bytes> {
    (
        any::<i32>(),
        prop::collection::vec((short_oid(), any_value()), 0..3),
    )
        .prop_filter_map("too large for single-byte framing", |(request_id, varbinds)| {
            let varbinds = varbinds
                .into_iter()
                .map(|(oid, value)| VarBind::new(oid, value))
                .collect();
            CommunityMessage::v2c(
                Bytes::from_static(b"public"),
                Pdu::response(request_id, varbinds),
            )
            .encode()
            .ok()
        })
}

proptest! {
    #[test]
    fn oid_roundtrip(oid in encodable_oid()) {
        let ber = oid.to_ber_checked().unwrap();
        prop_assert_eq!(Oid::from_ber(&ber).unwrap(), oid);
    }

    #[test]
    fn oid_text_roundtrip(oid in encodable_oid()) {
        prop_assert_eq!(Oid::parse(&oid.to_string()).unwrap(), oid);
    }

    #[test]
    fn integer_roundtrip(n in any::<i32>()) {
        let mut buf = EncodeBuf::new();
        Value::Integer(n.into()).encode(&mut buf);
        let bytes = buf.finish().unwrap();
        // minimal two's complement: at most 4 content bytes for an i32
        prop_assert!(bytes.len() <= 6);
        let decoded = Value::decode(&mut Decoder::new(bytes)).unwrap();
        prop_assert_eq!(decoded, Value::Integer(n.into()));
    }

    #[test]
    fn unsigned_roundtrip(n in any::<u32>()) {
        for value in [Value::Counter32(n), Value::Gauge32(n), Value::TimeTicks(n)] {
            let mut buf = EncodeBuf::new();
            value.encode(&mut buf);
            let decoded = Value::decode(&mut Decoder::new(buf.finish().unwrap())).unwrap();
            prop_assert_eq!(decoded, value);
        }
    }

    #[test]
    fn parser_never_panics(data in prop::collection::vec(any::<u8>(), 0..300)) {
        let _ = parse_get_response(Bytes::from(data), None);
    }

    #[test]
    fn request_is_not_a_response(oid in encodable_oid(), cut in 0usize..200) {
        let msg = CommunityMessage::get_next(Version::V2c, Bytes::from_static(b"public"), 7, &oid);
        if let Ok(bytes) = msg.encode() {
            let cut = cut.min(bytes.len());
            prop_assert!(parse_get_response(bytes.slice(..cut), None).is_err());
        }
    }

    #[test]
    fn truncated_response_is_rejected(bytes in response_message()) {
        prop_assert!(parse_get_response(bytes.clone(), None).is_ok());
        for cut in 0..bytes.len() {
            prop_assert!(
                parse_get_response(bytes.slice(..cut), None).is_err(),
                "accepted {} of {} bytes",
                cut,
                bytes.len()
            );
        }
    }

    #[test]
    fn truncated_response_body_is_rejected(bytes in response_message()) {
        // Re-frame the outer SEQUENCE around each cut so the failure has to
        // come from the PDU, varbind list or value.
        for cut in 2..bytes.len() {
            let mut framed = bytes[..cut].to_vec();
            framed[1] = (cut - 2) as u8;
            prop_assert!(
                parse_get_response(Bytes::from(framed), None).is_err(),
                "accepted body cut at {} of {} bytes",
                cut,
                bytes.len()
            );
        }
    }

    #[test]
    fn oid_decoder_never_panics(data in prop::collection::vec(any::<u8>(), 0..64)) {
        let _ = Oid::from_ber(&data);
    }
}
