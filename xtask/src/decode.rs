//! Offline decoding of a dumped fault record.
//!
//! Typical use with a probe attached after the faulted board has reset:
//!
//! ```text
//! probe-rs read b32 --chip STM32H743ZITx <FAULT_RECORD address> 35 > fault.txt
//! cargo xtask decode fault.txt
//! ```

use std::path::Path;

use anyhow::{bail, Context, Result};
use fault_record::{
    print_report, ArchFamily, Exception, FaultRecord, FormatDescriptor, RecordError,
    ReportOutcome, TargetProfile,
};
use serde::Serialize;

/// JSON view of a decoded record.
#[derive(Serialize)]
struct DecodedRecord {
    arch: ArchFamily,
    secure: bool,
    valid: bool,
    error: Option<String>,
    exception: Option<String>,
    descriptor: FormatDescriptor,
    record: FaultRecord,
    report: String,
}

pub fn run(input: &Path, arch: &str, secure: bool, json: bool) -> Result<()> {
    let arch = ArchFamily::from_name(arch).with_context(|| {
        let names: Vec<&str> = ArchFamily::ALL.iter().map(|a| a.name()).collect();
        format!("unknown architecture '{arch}', expected one of: {}", names.join(", "))
    })?;
    if secure && !arch.is_armv8m() {
        bail!("--secure requires an Armv8-M architecture, got {}", arch.name());
    }
    let requested = TargetProfile::new(arch, secure);

    let bytes =
        std::fs::read(input).with_context(|| format!("failed to read {}", input.display()))?;
    let record = parse_record(&bytes)
        .with_context(|| format!("{} is not a fault record image", input.display()))?;

    let profile = if record.validate().is_ok() {
        profile_for(record.descriptor(), requested)
    } else {
        requested
    };
    if profile != requested {
        tracing::warn!(
            stored = %format!("{:#010x}", record.format),
            expected = %format!("{:#010x}", requested.descriptor().to_bits()),
            decoding_as = profile.arch().name(),
            secure = profile.secure(),
            "format descriptor does not match --arch/--secure"
        );
    }

    let mut report = String::new();
    let outcome = print_report(&record, &profile, &mut report).context("formatting report")?;
    tracing::debug!(?outcome, "decoded");

    if json {
        let validation = record.validate();
        let decoded = DecodedRecord {
            arch: profile.arch(),
            secure: profile.secure(),
            valid: matches!(outcome, ReportOutcome::Printed { .. }),
            error: validation.err().map(|e| e.to_string()),
            exception: validation
                .is_ok()
                .then(|| Exception::from_xpsr(record.common.xpsr).to_string()),
            descriptor: record.descriptor(),
            record,
            report,
        };
        println!("{}", serde_json::to_string_pretty(&decoded)?);
    } else {
        print!("{report}");
    }
    Ok(())
}

/// Profile whose layout flags match the stored descriptor.
///
/// The requested profile wins when it matches. Otherwise the most capable
/// family with the same layout is used, so no status bit goes undecoded.
fn profile_for(descriptor: FormatDescriptor, requested: TargetProfile) -> TargetProfile {
    let same_layout = |profile: &TargetProfile| {
        let candidate = profile.descriptor();
        candidate.fault_registers == descriptor.fault_registers
            && candidate.extended == descriptor.extended
            && candidate.secure == descriptor.secure
    };
    if same_layout(&requested) {
        return requested;
    }
    ArchFamily::ALL
        .iter()
        .rev()
        .map(|&arch| TargetProfile::new(arch, descriptor.secure))
        .find(same_layout)
        .unwrap_or(requested)
}

/// Accept either the raw little-endian image or whitespace-separated hex
/// words (`probe-rs read b32` output, optionally with `addr:` prefixes).
fn parse_record(bytes: &[u8]) -> Result<FaultRecord> {
    if let Some(words) = std::str::from_utf8(bytes).ok().and_then(parse_hex_words) {
        tracing::debug!(words = words.len(), "parsed hex dump");
        let words: [u32; FaultRecord::WORDS] = words
            .get(..FaultRecord::WORDS)
            .and_then(|w| w.try_into().ok())
            .ok_or(RecordError::Truncated {
                expected: FaultRecord::SIZE,
                actual: words.len().saturating_mul(4),
            })?;
        return Ok(FaultRecord::from_words(&words));
    }
    tracing::debug!(bytes = bytes.len(), "treating input as raw image");
    Ok(FaultRecord::from_le_bytes(bytes)?)
}

/// `None` unless every token is a hex word or an address label.
fn parse_hex_words(text: &str) -> Option<Vec<u32>> {
    let mut words = Vec::new();
    for token in text.split_whitespace() {
        if token.ends_with(':') {
            continue;
        }
        let digits = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
            .unwrap_or(token);
        words.push(u32::from_str_radix(digits, 16).ok()?);
    }
    (!words.is_empty()).then_some(words)
}

#[cfg(test)]
#[allow(clippy::indexing_slicing, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;
    use fault_record::mocks::SimulatedTrap;
    use fault_record::registers::CFSR_STKOF;
    use fault_record::{capture, ScbRegister, StackAlias};
    use std::io::Write;

    fn captured() -> FaultRecord {
        let profile = TargetProfile::new(ArchFamily::Armv7EM, false);
        let trap = SimulatedTrap::new(0xFFFF_FFF9)
            .with_xpsr(3)
            .with_msp(StackAlias::Primary, 0x2400_0100)
            .with_frame(0x2400_0100, &[1, 2, 3, 4, 5, 6, 0x0800_1234, 0x0100_0000]);
        let mut record = FaultRecord::zeroed();
        capture(&mut record, &profile, &trap);
        record
    }

    #[test]
    fn raw_image_is_decoded() {
        let record = captured();
        let parsed = parse_record(&record.to_le_bytes()).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn probe_rs_dump_is_decoded() {
        let record = captured();
        let words = record.to_words();
        let mut text = String::from("0x24000000: ");
        for (i, word) in words.iter().enumerate() {
            text.push_str(&format!("{word:08x}"));
            text.push(if i % 4 == 3 { '\n' } else { ' ' });
        }
        let parsed = parse_record(text.as_bytes()).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn short_hex_dump_is_rejected() {
        let err = parse_record(b"5274746c 00000000 00000001").unwrap_err();
        assert!(err.to_string().contains("expected at least 140"), "{err}");
    }

    #[test]
    fn hex_words_accept_prefixes() {
        assert_eq!(parse_hex_words("0x10 0X20 ff"), Some(vec![0x10, 0x20, 0xFF]));
        assert_eq!(parse_hex_words("not hex"), None);
        assert_eq!(parse_hex_words("   "), None);
    }

    #[test]
    fn run_decodes_file_end_to_end() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&captured().to_le_bytes()).unwrap();
        run(file.path(), "armv7em", false, false).unwrap();
        run(file.path(), "armv7em", false, true).unwrap();
    }

    #[test]
    fn mismatched_arch_decodes_with_recorded_layout() {
        let requested = TargetProfile::new(ArchFamily::Armv7EM, false);
        let recorded = TargetProfile::new(ArchFamily::Armv8MBaseline, true);
        let profile = profile_for(recorded.descriptor(), requested);
        assert_eq!(profile, recorded);
        assert_eq!(profile_for(requested.descriptor(), requested), requested);

        let mainline = TargetProfile::new(ArchFamily::Armv8MMainline, false);
        let profile = profile_for(mainline.descriptor(), requested);
        assert!(profile.arch().is_armv8m() && !profile.arch().is_baseline());
        assert_eq!(profile.stacking_error_mask(), mainline.stacking_error_mask());
    }

    #[test]
    fn stacking_error_uses_recorded_profile() {
        // Armv8-M Mainline record with only STKOF set: Armv7E-M has no STKOF bit.
        let recorded = TargetProfile::new(ArchFamily::Armv8MMainline, false);
        let trap = SimulatedTrap::new(0xFFFF_FFFD)
            .with_xpsr(6)
            .with_psp(StackAlias::Primary, 0x2000_0100)
            .with_frame(0x2000_0100, &[1, 2, 3, 4, 5, 6, 0x0800_1234, 0x0100_0000])
            .with_scb(StackAlias::Primary, ScbRegister::Cfsr, CFSR_STKOF);
        let mut record = FaultRecord::zeroed();
        capture(&mut record, &recorded, &trap);

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&record.to_le_bytes()).unwrap();
        run(file.path(), "armv7em", false, false).unwrap();

        let requested = TargetProfile::new(ArchFamily::Armv7EM, false);
        let profile = profile_for(record.descriptor(), requested);
        assert!(!record.stacked_context_valid(&profile));
    }

    #[test]
    fn run_rejects_secure_on_armv7() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(run(file.path(), "armv7em", true, false).is_err());
        assert!(run(file.path(), "cortex-m7", false, false).is_err());
    }
}
