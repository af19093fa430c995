//! Standard test fixtures with realistic MIB data.

use snmp_walker::{Oid, Value, oid};
use std::collections::BTreeMap;

/// Standard system MIB entries (1.3.6.1.2.1.1).
///
/// sysDescr.0 through sysServices.0, seven entries.
pub fn system_mib() -> BTreeMap<Oid, Value> {
    let mut data = BTreeMap::new();

    data.insert(
        oid!(1, 3, 6, 1, 2, 1, 1, 1, 0),
        Value::OctetString("Test SNMP Agent".into()),
    );
    data.insert(
        oid!(1, 3, 6, 1, 2, 1, 1, 2, 0),
        Value::ObjectIdentifier(oid!(1, 3, 6, 1, 4, 1, 99999)),
    );
    data.insert(oid!(1, 3, 6, 1, 2, 1, 1, 3, 0), Value::TimeTicks(123456));
    data.insert(
        oid!(1, 3, 6, 1, 2, 1, 1, 4, 0),
        Value::OctetString("admin@test.local".into()),
    );
    data.insert(
        oid!(1, 3, 6, 1, 2, 1, 1, 5, 0),
        Value::OctetString("test-agent".into()),
    );
    data.insert(
        oid!(1, 3, 6, 1, 2, 1, 1, 6, 0),
        Value::OctetString("Test Lab".into()),
    );
    data.insert(oid!(1, 3, 6, 1, 2, 1, 1, 7, 0), Value::Integer(72));

    data
}

/// A small ifTable slice (1.3.6.1.2.1.2): ifNumber.0 plus ifIndex, ifDescr
/// and ifInOctets for `count` interfaces.
pub fn interface_table(count: u32) -> BTreeMap<Oid, Value> {
    let mut data = BTreeMap::new();

    data.insert(oid!(1, 3, 6, 1, 2, 1, 2, 1, 0), Value::Integer(count.into()));

    let entry = oid!(1, 3, 6, 1, 2, 1, 2, 2, 1);
    for i in 1..=count {
        data.insert(entry.child(1).child(i), Value::Integer(i.into()));
        data.insert(
            entry.child(2).child(i),
            Value::OctetString(format!("eth{}", i - 1).into()),
        );
        data.insert(entry.child(10).child(i), Value::Counter32(i * 1000));
    }

    data
}
