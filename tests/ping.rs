use openttd_admin::ping::PingTable;

#[test]
fn pongs_in_reverse_order_s5() {
    let mut table = PingTable::new();
    let first = table.next();
    let second = table.next();

    // server answers out of order
    assert!(table.resolve(second).is_some());
    assert!(table.resolve(first).is_some());

    // every payload matched exactly once
    assert!(table.resolve(first).is_none());
    assert!(table.resolve(second).is_none());
}

#[test]
fn disconnect_clears_outstanding_pings() {
    let mut table = PingTable::new();
    table.next();
    table.next();
    table.reset();
    let fresh = table.next();
    // after reset, old payloads are gone even though the counter kept advancing
    assert!(table.resolve(fresh).is_some());
}
