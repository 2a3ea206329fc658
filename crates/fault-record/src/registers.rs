//! Cortex-M register encodings consumed by capture and decoder.
//!
//! # References
//!
//! - ARMv7-M ARM DDI0403E §B1.5.8 (EXC_RETURN), §B3.2.15–B3.2.18 (CFSR/HFSR)
//! - ARMv8-M ARM DDI0553B §D1.2.95 (EXC_RETURN), §D1.2.203 (SFSR)
//!
//! # System Control Block fault registers
//!
//! | Register | Offset | Secure/primary address | Non-secure alias |
//! |----------|--------|------------------------|------------------|
//! | CFSR     | 0x28   | 0xE000_ED28            | 0xE002_ED28      |
//! | HFSR     | 0x2C   | 0xE000_ED2C            | 0xE002_ED2C      |
//! | DFSR     | 0x30   | 0xE000_ED30            | 0xE002_ED30      |
//! | MMFAR    | 0x34   | 0xE000_ED34            | 0xE002_ED34      |
//! | BFAR     | 0x38   | 0xE000_ED38            | 0xE002_ED38      |
//! | AFSR     | 0x3C   | 0xE000_ED3C            | 0xE002_ED3C      |
//! | SFSR     | 0xE4   | 0xE000_EDE4            | n/a              |
//! | SFAR     | 0xE8   | 0xE000_EDE8            | n/a              |

// ─── EXC_RETURN ──────────────────────────────────────────────────────────────

/// EXC_RETURN.SPSEL: frame was stacked on the process stack.
pub const EXC_RETURN_SPSEL: u32 = 1 << 2;
/// EXC_RETURN.Mode: the exception was taken from Thread mode.
pub const EXC_RETURN_MODE: u32 = 1 << 3;
/// EXC_RETURN.FType: standard (non-FP) frame.
pub const EXC_RETURN_FTYPE: u32 = 1 << 4;
/// EXC_RETURN.DCRS: default callee register stacking (additional state
/// context was *not* pushed).
pub const EXC_RETURN_DCRS: u32 = 1 << 5;
/// EXC_RETURN.S: frame was stacked on a Secure stack.
pub const EXC_RETURN_S: u32 = 1 << 6;

/// IPSR field of xPSR (active exception number).
pub const IPSR_MASK: u32 = 0x1FF;

// ─── CFSR: MemManage ─────────────────────────────────────────────────────────

/// Instruction access violation.
pub const CFSR_IACCVIOL: u32 = 1 << 0;
/// Data access violation.
pub const CFSR_DACCVIOL: u32 = 1 << 1;
/// MemManage fault on unstacking.
pub const CFSR_MUNSTKERR: u32 = 1 << 3;
/// MemManage fault on stacking.
pub const CFSR_MSTKERR: u32 = 1 << 4;
/// MemManage fault during FP lazy state preservation.
pub const CFSR_MLSPERR: u32 = 1 << 5;
/// MMFAR holds a valid address.
pub const CFSR_MMARVALID: u32 = 1 << 7;

// ─── CFSR: BusFault ──────────────────────────────────────────────────────────

/// Instruction bus error.
pub const CFSR_IBUSERR: u32 = 1 << 8;
/// Precise data bus error.
pub const CFSR_PRECISERR: u32 = 1 << 9;
/// Imprecise data bus error.
pub const CFSR_IMPRECISERR: u32 = 1 << 10;
/// BusFault on unstacking.
pub const CFSR_UNSTKERR: u32 = 1 << 11;
/// BusFault on stacking.
pub const CFSR_STKERR: u32 = 1 << 12;
/// BusFault during FP lazy state preservation.
pub const CFSR_LSPERR: u32 = 1 << 13;
/// BFAR holds a valid address.
pub const CFSR_BFARVALID: u32 = 1 << 15;

// ─── CFSR: UsageFault ────────────────────────────────────────────────────────

/// Undefined instruction.
pub const CFSR_UNDEFINSTR: u32 = 1 << 16;
/// Invalid state (EPSR.T or EPSR.IT).
pub const CFSR_INVSTATE: u32 = 1 << 17;
/// Invalid EXC_RETURN on exception return.
pub const CFSR_INVPC: u32 = 1 << 18;
/// No coprocessor.
pub const CFSR_NOCP: u32 = 1 << 19;
/// Stack limit violation (Armv8-M Mainline).
pub const CFSR_STKOF: u32 = 1 << 20;
/// Unaligned access.
pub const CFSR_UNALIGNED: u32 = 1 << 24;
/// Integer divide by zero.
pub const CFSR_DIVBYZERO: u32 = 1 << 25;

// ─── HFSR ────────────────────────────────────────────────────────────────────

/// Bus fault on vector table read.
pub const HFSR_VECTTBL: u32 = 1 << 1;
/// Escalated configurable fault.
pub const HFSR_FORCED: u32 = 1 << 30;
/// Debug event with the debug monitor disabled.
pub const HFSR_DEBUGEVT: u32 = 1 << 31;

// ─── SFSR ────────────────────────────────────────────────────────────────────

/// Invalid Secure state entry point.
pub const SFSR_INVEP: u32 = 1 << 0;
/// Invalid integrity signature on unstacking.
pub const SFSR_INVIS: u32 = 1 << 1;
/// Invalid exception return.
pub const SFSR_INVER: u32 = 1 << 2;
/// Attribution unit violation.
pub const SFSR_AUVIOL: u32 = 1 << 3;
/// Invalid transition.
pub const SFSR_INVTRAN: u32 = 1 << 4;
/// Lazy state preservation error.
pub const SFSR_LSPERR: u32 = 1 << 5;
/// SFAR holds a valid address.
pub const SFSR_SFARVALID: u32 = 1 << 6;
/// Lazy state activation or deactivation error.
pub const SFSR_LSERR: u32 = 1 << 7;

// ─── SCB addresses ───────────────────────────────────────────────────────────

/// System Control Block base (Secure, or the only bank on non-TrustZone parts).
pub const SCB_BASE: u32 = 0xE000_ED00;
/// Non-secure alias of the System Control Block.
pub const SCB_BASE_NS: u32 = 0xE002_ED00;

/// Which bank of a banked register or stack pointer to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StackAlias {
    /// The register bank of the world the recorder runs in.
    Primary,
    /// The Non-secure alias, reachable from the Secure world only.
    NonSecure,
}

impl StackAlias {
    /// SCB base address of this bank.
    pub const fn scb_base(self) -> u32 {
        match self {
            Self::Primary => SCB_BASE,
            Self::NonSecure => SCB_BASE_NS,
        }
    }
}

/// Fault status registers read from the System Control Block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScbRegister {
    /// Configurable Fault Status Register.
    Cfsr,
    /// HardFault Status Register.
    Hfsr,
    /// Debug Fault Status Register.
    Dfsr,
    /// MemManage Fault Address Register.
    Mmfar,
    /// BusFault Address Register.
    Bfar,
    /// Auxiliary Fault Status Register.
    Afsr,
    /// Secure Fault Status Register.
    Sfsr,
    /// Secure Fault Address Register.
    Sfar,
}

impl ScbRegister {
    /// Byte offset from the SCB base.
    pub const fn offset(self) -> u32 {
        match self {
            Self::Cfsr => 0x28,
            Self::Hfsr => 0x2C,
            Self::Dfsr => 0x30,
            Self::Mmfar => 0x34,
            Self::Bfar => 0x38,
            Self::Afsr => 0x3C,
            Self::Sfsr => 0xE4,
            Self::Sfar => 0xE8,
        }
    }

    /// Absolute address of this register in the given bank.
    pub const fn address(self, alias: StackAlias) -> u32 {
        alias.scb_base().wrapping_add(self.offset())
    }
}

/// Decoded trap-return encoding (the LR value on exception entry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ExcReturn(u32);

impl ExcReturn {
    /// Wrap a raw EXC_RETURN value.
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw register value.
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// `true` if the pre-fault frame was pushed on a process stack.
    pub const fn uses_process_stack(self) -> bool {
        self.0 & EXC_RETURN_SPSEL != 0
    }

    /// `true` if the fault was taken from Thread mode.
    pub const fn from_thread_mode(self) -> bool {
        self.0 & EXC_RETURN_MODE != 0
    }

    /// `true` if the frame was pushed on a Secure stack (Armv8-M).
    pub const fn from_secure_stack(self) -> bool {
        self.0 & EXC_RETURN_S != 0
    }

    /// `true` if the additional state context (integrity signature and
    /// R4–R11) was pushed ahead of the basic frame (Armv8-M, DCRS == 0).
    pub const fn additional_context_stacked(self) -> bool {
        self.0 & EXC_RETURN_DCRS == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exc_return_thread_psp() {
        // 0xFFFF_FFFD: return to Thread mode, process stack, no FP.
        let e = ExcReturn::new(0xFFFF_FFFD);
        assert!(e.uses_process_stack());
        assert!(e.from_thread_mode());
        assert!(!e.additional_context_stacked());
        assert!(e.from_secure_stack());
    }

    #[test]
    fn exc_return_handler_msp() {
        let e = ExcReturn::new(0xFFFF_FFF1);
        assert!(!e.uses_process_stack());
        assert!(!e.from_thread_mode());
    }

    #[test]
    fn exc_return_non_secure_with_additional_context() {
        // Armv8-M Secure handler interrupting Non-secure thread: S=0, DCRS=0.
        let e = ExcReturn::new(0xFFFF_FF9C);
        assert!(!e.from_secure_stack());
        assert!(e.additional_context_stacked());
        assert!(e.uses_process_stack());
    }

    #[test]
    fn scb_register_addresses() {
        assert_eq!(ScbRegister::Cfsr.address(StackAlias::Primary), 0xE000_ED28);
        assert_eq!(ScbRegister::Cfsr.address(StackAlias::NonSecure), 0xE002_ED28);
        assert_eq!(ScbRegister::Afsr.address(StackAlias::Primary), 0xE000_ED3C);
        assert_eq!(ScbRegister::Sfar.address(StackAlias::Primary), 0xE000_EDE8);
    }
}
