//! [`TrapRegisters`] over the entry snapshot and the live core.

use core::arch::asm;
use core::ptr;

use fault_record::{ScbRegister, StackAlias, TrapRegisters};

use super::EntrySnapshot;

/// Core state at trap entry.
///
/// Primary-bank stack pointers and limits come from the snapshot the entry
/// took before switching stacks. Everything else is still live when capture
/// runs and is read directly.
pub(super) struct CortexMTrap {
    snapshot: EntrySnapshot,
}

impl CortexMTrap {
    pub(super) const fn new(snapshot: EntrySnapshot) -> Self {
        Self { snapshot }
    }
}

impl TrapRegisters for CortexMTrap {
    fn exc_return(&self) -> u32 {
        self.snapshot.exc_return
    }

    fn xpsr(&self) -> u32 {
        let xpsr: u32;
        // SAFETY: reading a special register has no side effects.
        unsafe { asm!("mrs {}, xpsr", out(reg) xpsr, options(nomem, nostack, preserves_flags)) };
        xpsr
    }

    fn msp(&self, alias: StackAlias) -> u32 {
        match alias {
            StackAlias::Primary => self.snapshot.msp,
            StackAlias::NonSecure => non_secure::msp(),
        }
    }

    fn psp(&self, alias: StackAlias) -> u32 {
        match alias {
            StackAlias::Primary => self.snapshot.psp,
            StackAlias::NonSecure => non_secure::psp(),
        }
    }

    fn msplim(&self, alias: StackAlias) -> u32 {
        match alias {
            StackAlias::Primary => self.snapshot.msplim,
            StackAlias::NonSecure => non_secure::msplim(),
        }
    }

    fn psplim(&self, alias: StackAlias) -> u32 {
        match alias {
            StackAlias::Primary => self.snapshot.psplim,
            StackAlias::NonSecure => non_secure::psplim(),
        }
    }

    fn scb(&self, alias: StackAlias, register: ScbRegister) -> u32 {
        let address = register.address(alias) as usize as *const u32;
        // SAFETY: SCB fault registers are always-mapped, word-aligned system
        // registers; capture only asks for the ones the profile says exist.
        unsafe { ptr::read_volatile(address) }
    }

    fn read_frame_word(&self, address: u32) -> u32 {
        // SAFETY: capture only reads inside a frame the core stacked without
        // a stacking error, so the words are mapped and aligned.
        unsafe { ptr::read_volatile(address as usize as *const u32) }
    }
}

/// Non-secure banked registers, readable from the Secure world only.
#[cfg(all(feature = "secure", fault_entry_stack_limits))]
mod non_secure {
    use core::arch::asm;

    macro_rules! read_special {
        ($name:ident, $reg:literal) => {
            pub(super) fn $name() -> u32 {
                let value: u32;
                // SAFETY: reading a special register has no side effects.
                unsafe {
                    asm!(concat!("mrs {}, ", $reg), out(reg) value, options(nomem, nostack, preserves_flags))
                };
                value
            }
        };
    }

    read_special!(msp, "msp_ns");
    read_special!(psp, "psp_ns");

    #[cfg(fault_entry_mainline_v8)]
    read_special!(msplim, "msplim_ns");
    #[cfg(fault_entry_mainline_v8)]
    read_special!(psplim, "psplim_ns");

    // Baseline has no Non-secure stack limits.
    #[cfg(not(fault_entry_mainline_v8))]
    pub(super) const fn msplim() -> u32 {
        0
    }
    #[cfg(not(fault_entry_mainline_v8))]
    pub(super) const fn psplim() -> u32 {
        0
    }
}

/// Non-secure recorders never select the Non-secure alias.
#[cfg(not(all(feature = "secure", fault_entry_stack_limits)))]
mod non_secure {
    pub(super) const fn msp() -> u32 {
        0
    }
    pub(super) const fn psp() -> u32 {
        0
    }
    pub(super) const fn msplim() -> u32 {
        0
    }
    pub(super) const fn psplim() -> u32 {
        0
    }
}
