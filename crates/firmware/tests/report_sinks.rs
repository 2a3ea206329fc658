//! Report output through the firmware sinks.
// Test file: unwrap/indexing are intentional test mechanisms.
#![allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
//!
//! The same report must reach every sink line for line: the defmt sink
//! splits it into lines, the UART sink translates line endings.

use core::fmt::Write;

use fault_record::mocks::SimulatedTrap;
use fault_record::registers::CFSR_UNDEFINSTR;
use fault_record::{
    capture, print_report, ArchFamily, FaultRecord, ReportOutcome, ScbRegister, StackAlias,
    TargetProfile,
};
use firmware::{IoWriter, LineSink};

const PROFILE: TargetProfile = TargetProfile::new(ArchFamily::Armv7EM, false);

fn usage_fault_record() -> FaultRecord {
    let trap = SimulatedTrap::new(0xFFFF_FFF9)
        .with_xpsr(0x0000_0006)
        .with_msp(StackAlias::Primary, 0x2400_1000)
        .with_frame(0x2400_1000, &[0, 1, 2, 3, 12, 0x0800_0101, 0x0800_0200, 0x0100_0000])
        .with_scb(StackAlias::Primary, ScbRegister::Cfsr, CFSR_UNDEFINSTR);
    let mut record = FaultRecord::zeroed();
    capture(&mut record, &PROFILE, &trap);
    record
}

fn reference_text(record: &FaultRecord) -> String {
    let mut text = String::new();
    print_report(record, &PROFILE, &mut text).unwrap();
    text
}

#[test]
fn line_sink_receives_every_report_line() {
    let record = usage_fault_record();
    let expected = reference_text(&record);

    let mut lines: Vec<String> = Vec::new();
    let mut sink = LineSink::<_, 160>::new(|line: &str| lines.push(line.to_owned()));
    let outcome = print_report(&record, &PROFILE, &mut sink).unwrap();
    sink.finish();
    drop(sink);

    assert_eq!(
        outcome,
        ReportOutcome::Printed {
            stacked_context_valid: true
        }
    );
    let expected_lines: Vec<&str> = expected.lines().collect();
    assert_eq!(lines, expected_lines);
    assert!(lines.iter().any(|l| l.contains("UsageFault - Execution of undefined instruction")));
}

#[test]
fn uart_sink_sends_crlf_report() {
    let record = usage_fault_record();
    let expected = reference_text(&record).replace('\n', "\r\n");

    const LEN: usize = 2048;
    let mut buf = [0u8; LEN];
    let mut remaining: &mut [u8] = &mut buf;
    {
        let mut uart = IoWriter::new(&mut remaining).crlf();
        print_report(&record, &PROFILE, &mut uart).unwrap();
    }
    let written = LEN - remaining.len();
    assert_eq!(core::str::from_utf8(&buf[..written]).unwrap(), expected);
}

#[test]
fn cleared_record_reports_absence_through_sink() {
    let mut record = usage_fault_record();
    record.clear();

    let mut lines: Vec<String> = Vec::new();
    let mut sink = LineSink::<_, 160>::new(|line: &str| lines.push(line.to_owned()));
    let outcome = print_report(&record, &PROFILE, &mut sink).unwrap();
    sink.finish();
    drop(sink);

    assert_eq!(outcome, ReportOutcome::NoRecord);
    assert!(lines.iter().all(|l| !l.contains("PC")));
}

#[test]
fn small_uart_buffer_surfaces_as_fmt_error() {
    let record = usage_fault_record();
    let mut buf = [0u8; 16];
    let mut remaining: &mut [u8] = &mut buf;
    let mut uart = IoWriter::new(&mut remaining);
    assert!(print_report(&record, &PROFILE, &mut uart).is_err());
    assert!(uart.write_str("x").is_err());
}
