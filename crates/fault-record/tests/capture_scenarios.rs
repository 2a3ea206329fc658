//! End-to-end capture → validate → report scenarios on a simulated trap.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]

use fault_record::mocks::{CountingHook, SimulatedTrap};
use fault_record::registers::{
    CFSR_BFARVALID, CFSR_DIVBYZERO, CFSR_MSTKERR, CFSR_PRECISERR, CFSR_STKERR, EXC_RETURN_DCRS,
    HFSR_FORCED,
};
use fault_record::{
    capture, print_report, record_fault, ArchFamily, FaultRecord, RecordError, ReportOutcome,
    ScbRegister, StackAlias, StateContext, TargetProfile,
};
use proptest::prelude::*;

fn report(record: &FaultRecord, profile: &TargetProfile) -> (ReportOutcome, String) {
    let mut text = String::new();
    let outcome = print_report(record, profile, &mut text).unwrap_or(ReportOutcome::NoRecord);
    (outcome, text)
}

fn bus_fault_trap(bfar: u32) -> SimulatedTrap {
    SimulatedTrap::new(0xFFFF_FFFD)
        .with_xpsr(0x0000_0005)
        .with_psp(StackAlias::Primary, 0x2000_2000)
        .with_frame(0x2000_2000, &[1, 2, 3, 4, 5, 6, 0x0800_1000, 0x0100_0000])
        .with_scb(
            StackAlias::Primary,
            ScbRegister::Cfsr,
            CFSR_PRECISERR | CFSR_BFARVALID,
        )
        .with_scb(StackAlias::Primary, ScbRegister::Bfar, bfar)
}

#[test]
fn every_profile_produces_a_sealed_record() {
    for arch in ArchFamily::ALL {
        for secure in [false, true] {
            let profile = TargetProfile::new(arch, secure);
            let mut record = FaultRecord::zeroed();
            capture(&mut record, &profile, &bus_fault_trap(0x4002_0000));
            assert_eq!(record.validate(), Ok(()), "{}", arch.name());
            assert_eq!(record.checksum, record.compute_checksum());
            assert_eq!(record.descriptor(), profile.descriptor());
        }
    }
}

#[test]
fn stacking_error_reports_unknown_pc_but_keeps_live_state() {
    let profile = TargetProfile::new(ArchFamily::Armv7EM, false);
    let trap = SimulatedTrap::new(0xFFFF_FFFD)
        .with_xpsr(0x0000_0004)
        .with_msp(StackAlias::Primary, 0x2001_FF00)
        .with_psp(StackAlias::Primary, 0x2000_0010)
        .with_frame(0x2000_0010, &[0x5555_5555; 8])
        .with_scb(StackAlias::Primary, ScbRegister::Cfsr, CFSR_MSTKERR);
    let mut record = FaultRecord::zeroed();
    capture(&mut record, &profile, &trap);

    let (outcome, text) = report(&record, &profile);
    assert_eq!(
        outcome,
        ReportOutcome::Printed {
            stacked_context_valid: false
        }
    );
    assert!(text.contains("   - PC:             unknown\n"));
    assert!(text.contains("   - MSP:            0x2001FF00\n"));
    assert!(text.contains("   - PSP:            0x20000010\n"));
    assert!(text.contains("   - CFSR:           0x00000010\n"));
    assert!(!text.contains("Exception stacked state context"));
    assert!(!text.contains("R0:"));
    assert!(!text.contains("R12:"));
    assert!(!text.contains("55555555"));
}

#[test]
fn second_capture_replaces_the_first() {
    let profile = TargetProfile::new(ArchFamily::Armv7EM, false);
    let mut record = FaultRecord::zeroed();

    capture(&mut record, &profile, &bus_fault_trap(0x4002_0000));
    let second = SimulatedTrap::new(0xFFFF_FFF9)
        .with_xpsr(0x0000_0006)
        .with_msp(StackAlias::Primary, 0x2001_0000)
        .with_frame(0x2001_0000, &[9, 9, 9, 9, 9, 9, 0x0800_2000, 0x0100_0000])
        .with_scb(StackAlias::Primary, ScbRegister::Cfsr, CFSR_DIVBYZERO);
    capture(&mut record, &profile, &second);

    let (_, text) = report(&record, &profile);
    assert!(text.contains("UsageFault - Divide by 0"));
    assert!(text.contains("0x08002000"));
    assert!(!text.contains("BusFault"));
    assert!(!text.contains("0x40020000"));
    assert!(!text.contains("0x08001000"));
}

#[test]
fn non_extended_builds_never_print_r4_to_r11() {
    for arch in [ArchFamily::Armv6M, ArchFamily::Armv7M, ArchFamily::Armv7EM] {
        let profile = TargetProfile::new(arch, false);
        // DCRS clear would mean "additional context stacked" on Armv8-M.
        let exc_return = 0xFFFF_FFFD & !EXC_RETURN_DCRS;
        let mut frame = [0xFEFA_125A_u32; 18];
        if let Some(last) = frame.last_mut() {
            *last = 0x0100_0000;
        }
        let trap = SimulatedTrap::new(exc_return)
            .with_psp(StackAlias::Primary, 0x2000_3000)
            .with_frame(0x2000_3000, &frame);
        let mut record = FaultRecord::zeroed();
        capture(&mut record, &profile, &trap);

        assert!(record.additional_context().is_none());
        assert!(record.stack_limits().is_none());
        let (_, text) = report(&record, &profile);
        for name in ["R4:", "R5:", "R8:", "R11:", "MSPLIM", "PSPLIM", "State:"] {
            assert!(!text.contains(name), "{} printed for {}", name, arch.name());
        }
    }
}

#[test]
fn armv8m_prints_additional_context_when_signature_matches() {
    let profile = TargetProfile::new(ArchFamily::Armv8MMainline, false);
    let mut frame = [0u32; 18];
    if let Some(signature) = frame.first_mut() {
        *signature = 0xFEFA_125B;
    }
    for (i, word) in frame.iter_mut().enumerate().skip(2) {
        *word = 0x0000_0400 | u32::try_from(i).unwrap_or(0);
    }
    // Secure, MSP, handler, DCRS = 0.
    let trap = SimulatedTrap::new(0xFFFF_FFD1)
        .with_xpsr(0x0000_0006)
        .with_msp(StackAlias::Primary, 0x3000_1000)
        .with_frame(0x3000_1000, &frame);
    let mut record = FaultRecord::zeroed();
    capture(&mut record, &profile, &trap);

    let (_, text) = report(&record, &profile);
    assert!(text.contains("   - R4:             0x00000402\n"));
    assert!(text.contains("   - R11:            0x00000409\n"));
    assert!(text.contains("  State:             Secure\n"));
    assert!(text.contains("  Exception Handler: Non-Secure - UsageFault\n"));
    // R0 directly follows R3, then R4.
    let r3 = text.find("R3:").unwrap_or(usize::MAX);
    let r4 = text.find("R4:").unwrap_or(0);
    let r12 = text.find("R12:").unwrap_or(0);
    assert!(r3 < r4 && r4 < r12);
}

#[test]
fn secure_recorder_reads_non_secure_fault_bank() {
    let profile = TargetProfile::new(ArchFamily::Armv8MMainline, true);
    // Non-secure thread on PSP; only the Non-secure bank saw the stacking error.
    let trap = SimulatedTrap::new(0xFFFF_FFBC)
        .with_xpsr(0x0000_0003)
        .with_psp(StackAlias::NonSecure, 0x2000_4000)
        .with_psp(StackAlias::Primary, 0x3000_4000)
        .with_frame(0x2000_4000, &[0xAAAA_AAAA; 8])
        .with_scb(StackAlias::NonSecure, ScbRegister::Cfsr, CFSR_STKERR)
        .with_scb(StackAlias::NonSecure, ScbRegister::Hfsr, HFSR_FORCED)
        .with_scb(StackAlias::Primary, ScbRegister::Hfsr, 0x0000_0002)
        .with_scb(StackAlias::NonSecure, ScbRegister::Bfar, 0x4001_0000)
        .with_scb(StackAlias::Primary, ScbRegister::Bfar, 0x5001_0000);
    let mut record = FaultRecord::zeroed();
    capture(&mut record, &profile, &trap);

    assert_eq!(record.state_context, StateContext::default());
    assert!(!record.stacked_context_valid(&profile));
    assert_eq!(record.common.psp, 0x2000_4000);

    let regs = record.fault_registers().expect("Mainline records fault registers");
    assert_eq!(regs.cfsr, CFSR_STKERR);
    assert_eq!(regs.hfsr, HFSR_FORCED);
    assert_eq!(regs.bfar, 0x4001_0000);

    let (outcome, text) = report(&record, &profile);
    assert_eq!(
        outcome,
        ReportOutcome::Printed {
            stacked_context_valid: false
        }
    );
    assert!(text.contains("   - PC:             unknown\n"));
    assert!(text.contains("   - CFSR:           0x00001000\n"));
}

#[test]
fn baseline_limits_follow_the_secure_stack_bit() {
    let profile = TargetProfile::new(ArchFamily::Armv8MBaseline, true);

    let secure_trap = SimulatedTrap::new(0xFFFF_FFFD).with_msplim(StackAlias::Primary, 0x3000_0000);
    let mut record = FaultRecord::zeroed();
    capture(&mut record, &profile, &secure_trap);
    let (_, text) = report(&record, &profile);
    assert!(text.contains("   - MSPLIM:         0x30000000\n"));

    let non_secure_trap = SimulatedTrap::new(0xFFFF_FFBC);
    capture(&mut record, &profile, &non_secure_trap);
    let (_, text) = report(&record, &profile);
    assert!(!text.contains("MSPLIM"));
    assert!(!text.contains("PSPLIM"));
}

#[test]
fn record_fault_invokes_hook_once_after_sealing() {
    let profile = TargetProfile::BUILD;
    let mut record = FaultRecord::zeroed();
    let mut hook = CountingHook::default();
    record_fault(&mut record, &profile, &bus_fault_trap(0), &mut hook);
    assert_eq!(hook.calls(), 1);
    assert!(record.is_trustworthy());
}

proptest! {
    /// Any single corrupted byte in the body yields only the checksum message.
    #[test]
    fn corrupted_byte_reports_only_checksum_failure(offset in 8usize..FaultRecord::SIZE, flip in 1u8..=255) {
        let profile = TargetProfile::new(ArchFamily::Armv8MMainline, true);
        let mut record = FaultRecord::zeroed();
        capture(&mut record, &profile, &bus_fault_trap(0x4002_0000));

        let mut bytes = record.to_le_bytes();
        if let Some(byte) = bytes.get_mut(offset) {
            *byte ^= flip;
        }
        let corrupted = FaultRecord::from_le_bytes(&bytes).unwrap_or_default();

        let (outcome, text) = report(&corrupted, &profile);
        prop_assert_eq!(outcome, ReportOutcome::InvalidChecksum);
        prop_assert_eq!(
            text.as_str(),
            "\n  Invalid checksum of the recorded fault information !!!\n\n"
        );
        let is_checksum_error = matches!(corrupted.validate(), Err(RecordError::InvalidChecksum { .. }));
        prop_assert!(is_checksum_error);
    }

    /// Capture always seals a record whose checksum matches its body.
    #[test]
    fn captured_checksum_round_trips(
        xpsr in any::<u32>(),
        cfsr in any::<u32>(),
        sp in any::<u32>(),
        frame in proptest::array::uniform8(any::<u32>()),
    ) {
        let profile = TargetProfile::new(ArchFamily::Armv7EM, false);
        let trap = SimulatedTrap::new(0xFFFF_FFF9)
            .with_xpsr(xpsr)
            .with_msp(StackAlias::Primary, sp)
            .with_frame(sp, &frame)
            .with_scb(StackAlias::Primary, ScbRegister::Cfsr, cfsr);
        let mut record = FaultRecord::zeroed();
        capture(&mut record, &profile, &trap);
        prop_assert_eq!(record.compute_checksum(), record.checksum);
        prop_assert!(record.is_trustworthy());
    }
}
