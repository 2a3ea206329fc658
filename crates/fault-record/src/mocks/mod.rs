//! Simulated trap state for exercising capture without hardware.
//!
//! [`SimulatedTrap`] stands in for the naked trap entry snapshot and the
//! System Control Block; [`CountingHook`] records exit hook invocations.

#![cfg(feature = "std")]

use heapless::LinearMap;

use crate::capture::TrapRegisters;
use crate::exit_hook::ExitHook;
use crate::registers::{ScbRegister, StackAlias};

/// Frame words the simulated stack memory can hold.
const FRAME_CAPACITY: usize = 64;

/// Stack pointer and limit values of one register bank.
#[derive(Debug, Clone, Copy, Default)]
struct Bank {
    msp: u32,
    psp: u32,
    msplim: u32,
    psplim: u32,
}

/// In-memory trap state.
///
/// Unset registers and unmapped stack addresses read as zero.
#[derive(Debug, Clone)]
pub struct SimulatedTrap {
    exc_return: u32,
    xpsr: u32,
    primary: Bank,
    non_secure: Bank,
    scb: LinearMap<(StackAlias, ScbRegister), u32, 16>,
    memory: LinearMap<u32, u32, FRAME_CAPACITY>,
}

impl SimulatedTrap {
    /// Trap with the given EXC_RETURN and everything else zero.
    pub fn new(exc_return: u32) -> Self {
        Self {
            exc_return,
            xpsr: 0,
            primary: Bank::default(),
            non_secure: Bank::default(),
            scb: LinearMap::new(),
            memory: LinearMap::new(),
        }
    }

    fn bank_mut(&mut self, alias: StackAlias) -> &mut Bank {
        match alias {
            StackAlias::Primary => &mut self.primary,
            StackAlias::NonSecure => &mut self.non_secure,
        }
    }

    fn bank(&self, alias: StackAlias) -> &Bank {
        match alias {
            StackAlias::Primary => &self.primary,
            StackAlias::NonSecure => &self.non_secure,
        }
    }

    /// Set the handler xPSR (exception number in bits 0..9).
    #[must_use]
    pub fn with_xpsr(mut self, xpsr: u32) -> Self {
        self.xpsr = xpsr;
        self
    }

    /// Set a main stack pointer.
    #[must_use]
    pub fn with_msp(mut self, alias: StackAlias, value: u32) -> Self {
        self.bank_mut(alias).msp = value;
        self
    }

    /// Set a process stack pointer.
    #[must_use]
    pub fn with_psp(mut self, alias: StackAlias, value: u32) -> Self {
        self.bank_mut(alias).psp = value;
        self
    }

    /// Set a main stack limit.
    #[must_use]
    pub fn with_msplim(mut self, alias: StackAlias, value: u32) -> Self {
        self.bank_mut(alias).msplim = value;
        self
    }

    /// Set a process stack limit.
    #[must_use]
    pub fn with_psplim(mut self, alias: StackAlias, value: u32) -> Self {
        self.bank_mut(alias).psplim = value;
        self
    }

    /// Set a System Control Block register.
    ///
    /// Registers beyond the map capacity are silently dropped.
    #[must_use]
    pub fn with_scb(mut self, alias: StackAlias, register: ScbRegister, value: u32) -> Self {
        let _ = self.scb.insert((alias, register), value);
        self
    }

    /// Place consecutive words in stack memory starting at `base`.
    ///
    /// Words beyond the memory capacity are silently dropped.
    #[must_use]
    pub fn with_frame(mut self, base: u32, words: &[u32]) -> Self {
        let mut address = base;
        for &word in words {
            let _ = self.memory.insert(address, word);
            address = address.wrapping_add(4);
        }
        self
    }
}

impl TrapRegisters for SimulatedTrap {
    fn exc_return(&self) -> u32 {
        self.exc_return
    }

    fn xpsr(&self) -> u32 {
        self.xpsr
    }

    fn msp(&self, alias: StackAlias) -> u32 {
        self.bank(alias).msp
    }

    fn psp(&self, alias: StackAlias) -> u32 {
        self.bank(alias).psp
    }

    fn msplim(&self, alias: StackAlias) -> u32 {
        self.bank(alias).msplim
    }

    fn psplim(&self, alias: StackAlias) -> u32 {
        self.bank(alias).psplim
    }

    fn scb(&self, alias: StackAlias, register: ScbRegister) -> u32 {
        self.scb.get(&(alias, register)).copied().unwrap_or(0)
    }

    fn read_frame_word(&self, address: u32) -> u32 {
        self.memory.get(&address).copied().unwrap_or(0)
    }
}

/// Exit hook that counts how often it ran and returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountingHook {
    calls: u32,
}

impl CountingHook {
    /// Number of times the hook ran.
    pub fn calls(&self) -> u32 {
        self.calls
    }
}

impl ExitHook for CountingHook {
    fn on_exit(&mut self) {
        self.calls = self.calls.wrapping_add(1);
    }
}
