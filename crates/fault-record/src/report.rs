//! Decoder/printer: renders a stored fault record as human-readable text.
//!
//! Output goes to any [`core::fmt::Write`] sink. The firmware hands it a UART
//! writer or a defmt line buffer, host tooling a `String` or stdout.
//!
//! # Layout
//!
//! ```text
//!
//! --- Last recorded Fault information (v0.1) ---
//!
//!   Exception Handler: HardFault
//!   Mode:              Thread
//!   Fault:             HardFault - Escalated fault (...)
//!   Fault:             UsageFault - Execution of undefined instruction
//!
//!    - PC:             0x08000F3C
//!    - MSP:            0x2001FFD8
//!    - PSP:            0x00000000
//!
//!   Exception stacked state context:
//!    - R0:             0x00000000
//!    ...
//! ```
//!
//! Checksum failures stop the report before any field is printed. A frame
//! that failed to stack replaces PC with `unknown` and drops the register
//! blocks; live registers and fault status are still shown.

use core::fmt::{self, Write};

use crate::config::LABEL_WIDTH;
use crate::error::RecordError;
use crate::log::{log_debug, log_warn};
use crate::profile::TargetProfile;
use crate::record::FaultRecord;
use crate::registers::{
    ExcReturn, CFSR_BFARVALID, CFSR_DACCVIOL, CFSR_DIVBYZERO, CFSR_IACCVIOL, CFSR_IBUSERR,
    CFSR_IMPRECISERR, CFSR_INVPC, CFSR_INVSTATE, CFSR_LSPERR, CFSR_MLSPERR, CFSR_MMARVALID,
    CFSR_MSTKERR, CFSR_MUNSTKERR, CFSR_NOCP, CFSR_PRECISERR, CFSR_STKERR, CFSR_STKOF,
    CFSR_UNALIGNED, CFSR_UNDEFINSTR, CFSR_UNSTKERR, HFSR_DEBUGEVT, HFSR_FORCED, HFSR_VECTTBL,
    IPSR_MASK, SFSR_AUVIOL, SFSR_INVEP, SFSR_INVER, SFSR_INVIS, SFSR_INVTRAN, SFSR_LSERR,
    SFSR_LSPERR, SFSR_SFARVALID,
};

const NO_RECORD: &str = "\n--- No recorded Fault information ---\n\n";
const INVALID_CHECKSUM: &str = "\n  Invalid checksum of the recorded fault information !!!\n\n";

/// What [`print_report`] found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReportOutcome {
    /// No completed capture is stored.
    NoRecord,
    /// A capture is stored but its body is corrupt; nothing was printed.
    InvalidChecksum,
    /// The record was printed.
    Printed {
        /// The hardware-stacked frame was trustworthy and printed.
        stacked_context_valid: bool,
    },
}

// ─── Exception identity ──────────────────────────────────────────────────────

/// Exception that ran the capture, from the IPSR field of the stored xPSR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Exception {
    /// Exception 3.
    HardFault,
    /// Exception 4.
    MemManage,
    /// Exception 5.
    BusFault,
    /// Exception 6.
    UsageFault,
    /// Exception 7 (Armv8-M Mainline with the Security Extension).
    SecureFault,
    /// Any other exception number.
    Unknown(u32),
}

impl Exception {
    /// Decode the exception number held in `xpsr`.
    pub const fn from_xpsr(xpsr: u32) -> Self {
        match xpsr & IPSR_MASK {
            3 => Self::HardFault,
            4 => Self::MemManage,
            5 => Self::BusFault,
            6 => Self::UsageFault,
            7 => Self::SecureFault,
            other => Self::Unknown(other),
        }
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HardFault => f.write_str("HardFault"),
            Self::MemManage => f.write_str("MemManage fault"),
            Self::BusFault => f.write_str("BusFault"),
            Self::UsageFault => f.write_str("UsageFault"),
            Self::SecureFault => f.write_str("SecureFault"),
            Self::Unknown(number) => write!(f, "unknown, exception number = {number}"),
        }
    }
}

// ─── Fault categories ────────────────────────────────────────────────────────

/// Which profiles implement a given status bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Availability {
    Always,
    LazyStacking,
    StackOverflow,
}

impl Availability {
    const fn on(self, profile: &TargetProfile) -> bool {
        match self {
            Self::Always => true,
            Self::LazyStacking => profile.arch().has_lazy_stacking_faults(),
            Self::StackOverflow => profile.arch().has_stack_overflow_fault(),
        }
    }
}

struct FaultCause {
    mask: u32,
    message: &'static str,
    availability: Availability,
}

const fn cause(mask: u32, message: &'static str) -> FaultCause {
    FaultCause {
        mask,
        message,
        availability: Availability::Always,
    }
}

const fn cause_if(mask: u32, message: &'static str, availability: Availability) -> FaultCause {
    FaultCause {
        mask,
        message,
        availability,
    }
}

struct FaultCategory {
    name: &'static str,
    causes: &'static [FaultCause],
    /// Status bit that validates the category's address register.
    address_valid: u32,
}

const HARD_FAULT: FaultCategory = FaultCategory {
    name: "HardFault",
    causes: &[
        cause(HFSR_VECTTBL, "Bus error on vector read"),
        cause(
            HFSR_FORCED,
            "Escalated fault (original fault was disabled or it caused another lower priority fault)",
        ),
        cause(HFSR_DEBUGEVT, "Breakpoint hit with Debug Monitor disabled"),
    ],
    address_valid: 0,
};

const MEM_MANAGE: FaultCategory = FaultCategory {
    name: "MemManage",
    causes: &[
        cause(
            CFSR_IACCVIOL,
            "Instruction execution failure due to MPU violation or fault",
        ),
        cause(CFSR_DACCVIOL, "Data access failure due to MPU violation or fault"),
        cause(
            CFSR_MUNSTKERR,
            "Exception exit unstacking failure due to MPU access violation",
        ),
        cause(
            CFSR_MSTKERR,
            "Exception entry stacking failure due to MPU access violation",
        ),
        cause_if(
            CFSR_MLSPERR,
            "Floating-point lazy stacking failure due to MPU access violation",
            Availability::LazyStacking,
        ),
    ],
    address_valid: CFSR_MMARVALID,
};

const BUS_FAULT: FaultCategory = FaultCategory {
    name: "BusFault",
    causes: &[
        cause(CFSR_IBUSERR, "Instruction prefetch failure due to bus fault"),
        cause(CFSR_PRECISERR, "Data access failure due to bus fault (precise)"),
        cause(
            CFSR_IMPRECISERR,
            "Data access failure due to bus fault (imprecise)",
        ),
        cause(
            CFSR_UNSTKERR,
            "Exception exit unstacking failure due to bus fault",
        ),
        cause(CFSR_STKERR, "Exception entry stacking failure due to bus fault"),
        cause_if(
            CFSR_LSPERR,
            "Floating-point lazy stacking failure due to bus fault",
            Availability::LazyStacking,
        ),
    ],
    address_valid: CFSR_BFARVALID,
};

const USAGE_FAULT: FaultCategory = FaultCategory {
    name: "UsageFault",
    causes: &[
        cause(CFSR_UNDEFINSTR, "Execution of undefined instruction"),
        cause(
            CFSR_INVSTATE,
            "Execution of Thumb instruction with Thumb mode turned off",
        ),
        cause(CFSR_INVPC, "Invalid exception return value"),
        cause(
            CFSR_NOCP,
            "Coprocessor instruction with coprocessor disabled or non-existent",
        ),
        cause_if(CFSR_STKOF, "Stack overflow", Availability::StackOverflow),
        cause(CFSR_UNALIGNED, "Unaligned load/store"),
        cause(CFSR_DIVBYZERO, "Divide by 0"),
    ],
    address_valid: 0,
};

const SECURE_FAULT: FaultCategory = FaultCategory {
    name: "SecureFault",
    causes: &[
        cause(
            SFSR_INVEP,
            "Invalid entry point due to invalid attempt to enter Secure state",
        ),
        cause(
            SFSR_INVIS,
            "Invalid integrity signature in exception stack frame found on unstacking",
        ),
        cause(
            SFSR_INVER,
            "Invalid exception return due to mismatch on EXC_RETURN.DCRS or EXC_RETURN.ES",
        ),
        cause(
            SFSR_AUVIOL,
            "Attribution unit violation due to Non-secure access to Secure address space",
        ),
        cause(
            SFSR_INVTRAN,
            "Invalid transaction caused by domain crossing branch not flagged as such",
        ),
        cause(
            SFSR_LSPERR,
            "Lazy stacking preservation failure due to SAU or IDAU violation",
        ),
        cause(SFSR_LSERR, "Lazy stacking activation or deactivation failure"),
    ],
    address_valid: SFSR_SFARVALID,
};

/// One `Fault:` line, if any of the category's bits are set.
fn write_fault_line<W>(
    out: &mut W,
    profile: &TargetProfile,
    category: &FaultCategory,
    status: u32,
    address: u32,
) -> fmt::Result
where
    W: Write + ?Sized,
{
    let mut causes = category
        .causes
        .iter()
        .filter(|c| c.availability.on(profile) && status & c.mask != 0)
        .peekable();
    if causes.peek().is_none() {
        return Ok(());
    }

    write!(out, "  {:<width$} {} - ", "Fault:", category.name, width = LABEL_WIDTH)?;
    for (i, c) in causes.enumerate() {
        if i > 0 {
            out.write_str("; ")?;
        }
        out.write_str(c.message)?;
    }
    if category.address_valid != 0 && status & category.address_valid != 0 {
        write!(out, ", fault address 0x{address:08X}")?;
    }
    writeln!(out)
}

// ─── Printer ─────────────────────────────────────────────────────────────────

fn write_register<W>(out: &mut W, label: &str, value: u32) -> fmt::Result
where
    W: Write + ?Sized,
{
    writeln!(out, "   {label:<width$}0x{value:08X}", width = LABEL_WIDTH)
}

/// Print the stored record.
///
/// `profile` is the profile of the reporting build: it decides which status
/// bits are decoded and the stacking-error mask. Which blocks are printed is
/// decided by the record's own format descriptor.
///
/// # Errors
///
/// Only errors returned by `out` are propagated. An absent or corrupt record
/// is reported in the output and in the returned [`ReportOutcome`].
pub fn print_report<W>(
    record: &FaultRecord,
    profile: &TargetProfile,
    out: &mut W,
) -> Result<ReportOutcome, fmt::Error>
where
    W: Write + ?Sized,
{
    match record.validate() {
        Ok(()) => {}
        Err(RecordError::NoRecord) => {
            log_debug!("no fault record stored");
            out.write_str(NO_RECORD)?;
            return Ok(ReportOutcome::NoRecord);
        }
        Err(error) => {
            log_warn!("fault record rejected: {}", error);
            out.write_str(INVALID_CHECKSUM)?;
            return Ok(ReportOutcome::InvalidChecksum);
        }
    }

    let descriptor = record.descriptor();
    let exc_return = ExcReturn::new(record.common.exc_return);
    let stacked_context_valid = record.stacked_context_valid(profile);
    log_debug!(
        "printing fault record, format {:#x}, stacked context valid: {}",
        record.format,
        stacked_context_valid
    );

    writeln!(
        out,
        "\n--- Last recorded Fault information (v{}.{}) ---\n",
        descriptor.version.major, descriptor.version.minor
    )?;

    // Exception identity, world and mode.
    write!(out, "  {:<width$} ", "Exception Handler:", width = LABEL_WIDTH)?;
    if descriptor.extended {
        out.write_str(if descriptor.secure {
            "Secure - "
        } else {
            "Non-Secure - "
        })?;
    }
    writeln!(out, "{}", Exception::from_xpsr(record.common.xpsr))?;

    if descriptor.extended {
        let state = if exc_return.from_secure_stack() {
            "Secure"
        } else {
            "Non-Secure"
        };
        writeln!(out, "  {:<width$} {state}", "State:", width = LABEL_WIDTH)?;
    }

    let mode = if exc_return.from_thread_mode() {
        "Thread"
    } else {
        "Handler"
    };
    writeln!(out, "  {:<width$} {mode}", "Mode:", width = LABEL_WIDTH)?;

    // Decoded fault status.
    if let Some(regs) = record.fault_registers() {
        write_fault_line(out, profile, &HARD_FAULT, regs.hfsr, 0)?;
        write_fault_line(out, profile, &MEM_MANAGE, regs.cfsr, regs.mmfar)?;
        write_fault_line(out, profile, &BUS_FAULT, regs.cfsr, regs.bfar)?;
        write_fault_line(out, profile, &USAGE_FAULT, regs.cfsr, 0)?;
    }
    if let Some(secure) = record.secure_fault_registers() {
        write_fault_line(out, profile, &SECURE_FAULT, secure.sfsr, secure.sfar)?;
    }

    // Program counter and live stack registers.
    writeln!(out)?;
    write!(out, "   {:<width$}", "- PC:", width = LABEL_WIDTH)?;
    if stacked_context_valid {
        writeln!(out, "0x{:08X}", record.state_context.return_address)?;
    } else {
        writeln!(out, "unknown")?;
    }
    // Baseline has no Non-secure limit aliases; the limits are only
    // meaningful there when the faulting context ran on a Secure stack.
    let limits = record
        .stack_limits()
        .filter(|_| !profile.arch().is_baseline() || exc_return.from_secure_stack());
    write_register(out, "- MSP:", record.common.msp)?;
    if let Some(limits) = limits {
        write_register(out, "- MSPLIM:", limits.msplim)?;
    }
    write_register(out, "- PSP:", record.common.psp)?;
    if let Some(limits) = limits {
        write_register(out, "- PSPLIM:", limits.psplim)?;
    }
    writeln!(out)?;

    // Hardware-stacked frame.
    if stacked_context_valid {
        let ctx = &record.state_context;
        writeln!(out, "  Exception stacked state context:")?;
        write_register(out, "- R0:", ctx.r0)?;
        write_register(out, "- R1:", ctx.r1)?;
        write_register(out, "- R2:", ctx.r2)?;
        write_register(out, "- R3:", ctx.r3)?;
        if let Some(additional) = record
            .additional_context()
            .filter(|additional| additional.signature_valid())
        {
            for (label, value) in additional.named_registers() {
                write_register(out, label, value)?;
            }
        }
        write_register(out, "- R12:", ctx.r12)?;
        write_register(out, "- LR:", ctx.lr)?;
        write_register(out, "- ReturnAddress:", ctx.return_address)?;
        write_register(out, "- xPSR:", ctx.xpsr)?;
        writeln!(out)?;
    }

    // Raw fault status.
    if let Some(regs) = record.fault_registers() {
        writeln!(out, "  Fault registers:")?;
        write_register(out, "- CFSR:", regs.cfsr)?;
        write_register(out, "- HFSR:", regs.hfsr)?;
        write_register(out, "- DFSR:", regs.dfsr)?;
        write_register(out, "- MMFAR:", regs.mmfar)?;
        write_register(out, "- BFAR:", regs.bfar)?;
        write_register(out, "- AFSR:", regs.afsr)?;
        if let Some(secure) = record.secure_fault_registers() {
            write_register(out, "- SFSR:", secure.sfsr)?;
            write_register(out, "- SFAR:", secure.sfar)?;
        }
        writeln!(out)?;
    }

    Ok(ReportOutcome::Printed {
        stacked_context_valid,
    })
}

/// [`Display`](fmt::Display) adapter over [`print_report`].
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    record: &'a FaultRecord,
    profile: TargetProfile,
}

impl<'a> Report<'a> {
    /// Render `record` as decoded by `profile`.
    pub const fn new(record: &'a FaultRecord, profile: TargetProfile) -> Self {
        Self { record, profile }
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        print_report(self.record, &self.profile, f).map(|_| ())
    }
}
