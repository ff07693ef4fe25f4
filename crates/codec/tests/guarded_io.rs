//! Clock-gated register access.
//!
//! Every read/write must enable the current route's provider before the
//! bus access and release it afterwards; a dead or unpowerable route must
//! produce a typed error and zero bus traffic.

// Test files legitimately use unwrap()/expect() for readable assertions.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

mod common;

use codec::{CodecError, MacroId};
use common::{card, ops_for, EventLog, MockMacro, RX_DAIS, SPEAKER_DAIS, TX_DAIS};
use std::sync::atomic::Ordering;

/// Write-then-read round trip through the transport, clock-gated on each
/// side.
#[test]
fn write_then_read_round_trips() {
    let log = EventLog::leak();
    let codec = card(2);
    let tx = MockMacro::leak(MacroId::Tx, log);
    let rx = MockMacro::leak(MacroId::Rx, log);
    codec.attach(MacroId::Tx, ops_for(tx, 0x1000, &TX_DAIS)).unwrap();
    codec.attach(MacroId::Rx, ops_for(rx, 0x2000, &RX_DAIS)).unwrap();

    codec.write(MacroId::Rx, 0x40, 0xA5).unwrap();
    assert_eq!(codec.read(MacroId::Rx, 0x40), Ok(0xA5));

    assert_eq!(codec.transport().writes.load(Ordering::SeqCst), 1);
    assert_eq!(codec.transport().reads.load(Ordering::SeqCst), 1);
}

/// Each access enables the route provider, operates, then releases it.
#[test]
fn access_brackets_provider_enable_and_release() {
    let log = EventLog::leak();
    let codec = card(2);
    let tx = MockMacro::leak(MacroId::Tx, log);
    let rx = MockMacro::leak(MacroId::Rx, log);
    codec.attach(MacroId::Tx, ops_for(tx, 0x1000, &TX_DAIS)).unwrap();
    codec.attach(MacroId::Rx, ops_for(rx, 0x2000, &RX_DAIS)).unwrap();

    let before = log.len();
    codec.read(MacroId::Rx, 0x00).unwrap();
    assert_eq!(
        log.events_from(before),
        vec![(MacroId::Tx, "clk_on"), (MacroId::Tx, "clk_off")],
        "Rx's registers are clocked by Tx over the primary route"
    );
}

/// Accesses address the target macro's own register window.
#[test]
fn access_uses_the_target_macros_window() {
    let log = EventLog::leak();
    let codec = card(2);
    let tx = MockMacro::leak(MacroId::Tx, log);
    let rx = MockMacro::leak(MacroId::Rx, log);
    codec.attach(MacroId::Tx, ops_for(tx, 0x1000, &TX_DAIS)).unwrap();
    codec.attach(MacroId::Rx, ops_for(rx, 0x2000, &RX_DAIS)).unwrap();

    codec.write(MacroId::Rx, 0x04, 7).unwrap();
    // Same offset in Tx's window is untouched.
    assert_eq!(codec.read(MacroId::Tx, 0x04), Ok(0));
    assert_eq!(codec.read(MacroId::Rx, 0x04), Ok(7));
}

/// A dead current route (provider detached or never attached) yields
/// ClockProviderUnavailable and zero transport calls.
#[test]
fn dead_route_produces_no_bus_traffic() {
    let log = EventLog::leak();
    let codec = card(2);
    let rx = MockMacro::leak(MacroId::Rx, log);
    let spk = MockMacro::leak(MacroId::Speaker, log);
    // Hub-less board: Rx's primary route points at the absent Tx.
    codec.attach(MacroId::Rx, ops_for(rx, 0x2000, &RX_DAIS)).unwrap();
    codec.attach(MacroId::Speaker, ops_for(spk, 0x3000, &SPEAKER_DAIS)).unwrap();

    assert_eq!(
        codec.read(MacroId::Rx, 0x00),
        Err(CodecError::ClockProviderUnavailable)
    );
    assert_eq!(
        codec.write(MacroId::Rx, 0x00, 1),
        Err(CodecError::ClockProviderUnavailable)
    );
    assert_eq!(codec.transport().reads.load(Ordering::SeqCst), 0);
    assert_eq!(codec.transport().writes.load(Ordering::SeqCst), 0);
}

/// A provider that refuses to power up blocks the access before the bus.
#[test]
fn enable_failure_blocks_the_access() {
    let log = EventLog::leak();
    let codec = card(2);
    let tx = MockMacro::leak(MacroId::Tx, log);
    let rx = MockMacro::leak(MacroId::Rx, log);
    codec.attach(MacroId::Tx, ops_for(tx, 0x1000, &TX_DAIS)).unwrap();
    codec.attach(MacroId::Rx, ops_for(rx, 0x2000, &RX_DAIS)).unwrap();
    tx.fail_enable.store(true, Ordering::SeqCst);

    assert_eq!(codec.read(MacroId::Rx, 0x00), Err(CodecError::ClockEnableFailed));
    assert_eq!(codec.transport().reads.load(Ordering::SeqCst), 0);
}

/// A failed clock release after a completed access is suppressed: the
/// access result stands.
#[test]
fn release_failure_does_not_override_a_completed_access() {
    let log = EventLog::leak();
    let codec = card(2);
    let tx = MockMacro::leak(MacroId::Tx, log);
    let rx = MockMacro::leak(MacroId::Rx, log);
    codec.attach(MacroId::Tx, ops_for(tx, 0x1000, &TX_DAIS)).unwrap();
    codec.attach(MacroId::Rx, ops_for(rx, 0x2000, &RX_DAIS)).unwrap();

    codec.write(MacroId::Rx, 0x10, 0x3C).unwrap();
    tx.fail_disable.store(true, Ordering::SeqCst);

    assert_eq!(codec.read(MacroId::Rx, 0x10), Ok(0x3C));
    assert_eq!(log.count(MacroId::Tx, "clk_off_fail"), 1, "release was attempted");
}

/// Access to a macro with no populated slot is rejected before any clock
/// or bus activity.
#[test]
fn access_requires_attachment() {
    let log = EventLog::leak();
    let codec = card(2);
    let tx = MockMacro::leak(MacroId::Tx, log);
    codec.attach(MacroId::Tx, ops_for(tx, 0x1000, &TX_DAIS)).unwrap();

    assert_eq!(codec.read(MacroId::Voice, 0x00), Err(CodecError::NotAttached));
    assert_eq!(codec.write(MacroId::Voice, 0x00, 1), Err(CodecError::NotAttached));
    assert_eq!(codec.transport().reads.load(Ordering::SeqCst), 0);
    assert_eq!(codec.transport().writes.load(Ordering::SeqCst), 0);
    assert_eq!(log.count(MacroId::Tx, "clk_on"), 0);
}

/// After a hub-less assembly rebinds Speaker to itself, its register
/// accesses ride its own clock.
#[test]
fn self_clocked_macro_accesses_its_own_registers() {
    let log = EventLog::leak();
    let codec = card(1);
    let spk = MockMacro::leak(MacroId::Speaker, log);
    codec.attach(MacroId::Speaker, ops_for(spk, 0x3000, &SPEAKER_DAIS)).unwrap();
    assert!(codec.assembled());

    codec.write(MacroId::Speaker, 0x08, 0x5A).unwrap();
    assert_eq!(codec.read(MacroId::Speaker, 0x08), Ok(0x5A));
    assert!(log.count(MacroId::Speaker, "clk_on") >= 2);
    assert_eq!(log.count(MacroId::Tx, "clk_on"), 0);
}
