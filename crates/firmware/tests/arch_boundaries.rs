//! Architecture boundary tests. Run with `cargo test -p firmware --test arch_boundaries`
// Architecture test file: assertions on constants are intentional.
#![allow(clippy::assertions_on_constants, clippy::unwrap_used)]
//!
//! Layering rules:
//!   Rule 1: fault-record is target-independent and builds on the host
//!   Rule 2: firmware sinks do not require the `hardware` feature
//!   Rule 3: the record format is owned by fault-record, never redefined here
//!
//! These are compile-time rules enforced by the workspace dependency graph.
//! If this test binary links without `hardware`, the boundaries hold.

/// The core crate compiles and runs on the host, with its build profile
/// taken from the host default.
#[test]
fn fault_record_is_target_independent() {
    let profile = fault_record::TargetProfile::BUILD;
    assert!(
        fault_record::ArchFamily::ALL.contains(&profile.arch()),
        "host build must still resolve to one of the supported families"
    );
}

/// Sinks are usable without any hardware crate.
#[test]
fn sinks_are_hardware_independent() {
    fn _assert_fmt_write<T: core::fmt::Write>() {}
    _assert_fmt_write::<firmware::IoWriter<&mut [u8]>>();
    _assert_fmt_write::<firmware::LineSink<fn(&str), { firmware::sink::LINE_CAPACITY }>>();
}

/// The record size the firmware links is the size the decoder expects.
#[test]
fn record_size_is_shared() {
    assert_eq!(core::mem::size_of::<fault_record::FaultRecord>(), fault_record::FaultRecord::SIZE);
    assert_eq!(fault_record::FaultRecord::SIZE, 140);
}

/// Whatever RAM held before the first capture reads back as a record that
/// validation rejects, never as a trusted one.
#[test]
fn arbitrary_uninit_contents_are_a_rejected_record() {
    assert_eq!(core::mem::align_of::<fault_record::FaultRecord>(), core::mem::align_of::<u32>());
    let garbage = [0xA5u8; fault_record::FaultRecord::SIZE];
    let record = fault_record::FaultRecord::from_le_bytes(&garbage).unwrap();
    assert!(record.validate().is_err());
}
