//! Context capture: fills the fault record from the trap state.
//!
//! The algorithm is portable; everything that touches the core is behind
//! [`TrapRegisters`]. On hardware that trait is implemented over a snapshot
//! taken by the naked trap entry (see the `firmware` crate), so by the time
//! [`capture`] runs it is already on a known-good stack.
//!
//! # Ordering
//!
//! ```text
//! clear record → decode EXC_RETURN → test stacking error
//!   → format → stacked frame (if valid) → live registers
//!   → stack limits → fault registers → checksum → fence → magic
//! ```
//!
//! `magic` is the only field a reader trusts without further checks, so it is
//! stored after everything else and behind a compiler fence.

use core::sync::atomic::{compiler_fence, Ordering};

use crate::config::MAGIC;
use crate::exit_hook::ExitHook;
use crate::profile::TargetProfile;
use crate::record::{
    AdditionalStateContext, CommonRegisters, FaultRecord, FaultRegisters, SecureFaultRegisters,
    StackLimits, StateContext,
};
use crate::registers::{ExcReturn, ScbRegister, StackAlias};

/// Read access to the core state at trap entry.
///
/// Stack pointer and limit values must be the ones live at trap entry, not
/// whatever the capture routine itself is running on.
pub trait TrapRegisters {
    /// EXC_RETURN value the core placed in LR on exception entry.
    fn exc_return(&self) -> u32;

    /// xPSR as seen inside the handler.
    fn xpsr(&self) -> u32;

    /// Main stack pointer of the given bank.
    fn msp(&self, alias: StackAlias) -> u32;

    /// Process stack pointer of the given bank.
    fn psp(&self, alias: StackAlias) -> u32;

    /// Main stack limit of the given bank (Armv8-M).
    fn msplim(&self, alias: StackAlias) -> u32;

    /// Process stack limit of the given bank (Armv8-M).
    fn psplim(&self, alias: StackAlias) -> u32;

    /// System Control Block fault register of the given bank.
    fn scb(&self, alias: StackAlias, register: ScbRegister) -> u32;

    /// One word of the hardware-stacked frame.
    ///
    /// Only called for addresses inside a frame the caller has established
    /// as successfully stacked.
    fn read_frame_word(&self, address: u32) -> u32;
}

/// Sequential reader over a stacked exception frame.
struct FrameCursor<'a, T: ?Sized> {
    trap: &'a T,
    address: u32,
}

impl<'a, T: TrapRegisters + ?Sized> FrameCursor<'a, T> {
    fn new(trap: &'a T, base: u32) -> Self {
        Self {
            trap,
            address: base,
        }
    }

    fn take<const N: usize>(&mut self) -> [u32; N] {
        core::array::from_fn(|_| {
            let word = self.trap.read_frame_word(self.address);
            self.address = self.address.wrapping_add(4);
            word
        })
    }
}

/// Which register bank the faulting context used.
///
/// A Secure-world recorder trapping a Non-secure context (EXC_RETURN.S == 0)
/// has to read the Non-secure aliases; everything else uses the primary bank.
pub fn stack_alias(profile: &TargetProfile, exc_return: ExcReturn) -> StackAlias {
    if profile.secure() && !exc_return.from_secure_stack() {
        StackAlias::NonSecure
    } else {
        StackAlias::Primary
    }
}

/// Fill `record` from the trap state. Cannot fail.
///
/// On return the record is complete, checksummed and stamped with the magic.
/// A frame that failed to stack is left zeroed; its absence is detectable
/// from the captured fault status.
pub fn capture<T>(record: &mut FaultRecord, profile: &TargetProfile, trap: &T)
where
    T: TrapRegisters + ?Sized,
{
    record.clear();

    let exc_return = ExcReturn::new(trap.exc_return());
    let alias = stack_alias(profile, exc_return);
    let frame_base = if exc_return.uses_process_stack() {
        trap.psp(alias)
    } else {
        trap.msp(alias)
    };

    let cfsr = profile
        .has_fault_registers()
        .then(|| trap.scb(alias, ScbRegister::Cfsr));
    let frame_valid = cfsr.map_or(true, |cfsr| cfsr & profile.stacking_error_mask() == 0);

    record.format = profile.descriptor().to_bits();

    if frame_valid {
        let mut frame = FrameCursor::new(trap, frame_base);
        // The additional state context sits below the basic frame.
        if profile.is_extended() && exc_return.additional_context_stacked() {
            record.additional_context = AdditionalStateContext::from_words(frame.take());
        }
        record.state_context = StateContext::from_words(frame.take());
    }

    record.common = CommonRegisters {
        xpsr: trap.xpsr(),
        exc_return: exc_return.raw(),
        msp: trap.msp(alias),
        psp: trap.psp(alias),
    };

    if profile.is_extended()
        && (alias == StackAlias::Primary || profile.has_non_secure_stack_limits())
    {
        record.stack_limits = StackLimits {
            msplim: trap.msplim(alias),
            psplim: trap.psplim(alias),
        };
    }

    if let Some(cfsr) = cfsr {
        record.fault_registers = FaultRegisters {
            cfsr,
            hfsr: trap.scb(alias, ScbRegister::Hfsr),
            dfsr: trap.scb(alias, ScbRegister::Dfsr),
            mmfar: trap.scb(alias, ScbRegister::Mmfar),
            bfar: trap.scb(alias, ScbRegister::Bfar),
            afsr: trap.scb(alias, ScbRegister::Afsr),
        };
    }

    if profile.has_secure_fault_registers() {
        // SFSR/SFAR are not banked.
        record.secure_fault_registers = SecureFaultRegisters {
            sfsr: trap.scb(StackAlias::Primary, ScbRegister::Sfsr),
            sfar: trap.scb(StackAlias::Primary, ScbRegister::Sfar),
        };
    }

    record.checksum = record.compute_checksum();
    compiler_fence(Ordering::SeqCst);
    record.magic = MAGIC;
}

/// Capture, then hand control to the exit hook.
pub fn record_fault<T, H>(record: &mut FaultRecord, profile: &TargetProfile, trap: &T, hook: &mut H)
where
    T: TrapRegisters + ?Sized,
    H: ExitHook + ?Sized,
{
    capture(record, profile, trap);
    hook.on_exit();
}
